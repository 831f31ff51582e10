//! Linear threshold classifiers (single neurons) and their compilation
//! into an obdd via the weighted-sum level grid.
//!
//! Weights and threshold are carried as strings until `with_precision`
//! quantizes them; only an integer classifier can be compiled.
use std::fmt;
use fxhash::{FxHashMap, FxHashSet};
use crate::errors::{NncError, Result};
use crate::obdd::{ObddManager, Oid};

/// A neuron: `sum(w[i] * x[i]) >= threshold` over binary inputs.
#[derive(Debug, Clone)]
pub struct Classifier {
  pub name: String,
  pub size: u32,
  pub weights: Vec<String>,
  pub threshold: String,
  pub is_integer: bool }

impl Classifier {

  /// parse the colon-delimited neuron format. `size`, `threshold` and
  /// `weights` are required; a `bias` field is not recognized.
  pub fn parse(text: &str)->Result<Classifier> {
    let mut fields: FxHashMap<&str, &str> = FxHashMap::default();
    for line in text.lines() {
      if line.trim().is_empty() { continue }
      let (field, value) = line.split_once(':').ok_or_else(|| NncError::Parse(
        format!("expected 'field: value', got {:?}", line)))?;
      fields.insert(field.trim(), value.trim()); }
    let need = |field: &str| fields.get(field).copied().ok_or_else(
      || NncError::Parse(format!("missing required field {:?}", field)));
    let size: u32 = need("size")?.parse()
      .map_err(|_| NncError::Parse(format!("bad size: {:?}", fields["size"])))?;
    let threshold = need("threshold")?.to_string();
    threshold.parse::<f64>()
      .map_err(|_| NncError::Parse(format!("threshold {:?} is not numeric", threshold)))?;
    let weights: Vec<String> =
      need("weights")?.split_whitespace().map(String::from).collect();
    for w in &weights {
      w.parse::<f64>()
        .map_err(|_| NncError::Parse(format!("weight {:?} is not numeric", w)))?; }
    if weights.len() != size as usize {
      return Err(NncError::Parse(format!(
        "size says {} weights, found {}", size, weights.len()))) }
    let name = fields.get("name").copied().unwrap_or("none").to_string();
    Ok(Classifier { name, size, weights, threshold, is_integer: false }) }

  pub fn read(path: &str)->Result<Classifier> {
    let text = std::fs::read_to_string(path)?;
    Classifier::parse(&text) }

  pub fn save(&self, path: &str)->Result<()> {
    std::fs::write(path, format!("{}", self))?;
    Ok(()) }

  fn biggest_weight(&self)->Result<f64> {
    let mut biggest = 0.0f64;
    for w in &self.weights {
      let w: f64 = w.parse()
        .map_err(|_| NncError::Parse(format!("weight {:?} is not numeric", w)))?;
      if w.abs() > biggest { biggest = w.abs() }}
    Ok(biggest) }

  /// rescale so the largest absolute weight keeps `digits` significant
  /// digits, then truncate toward zero. the result is integer and
  /// compilable.
  pub fn with_precision(&self, digits: u32)->Result<Classifier> {
    let biggest = self.biggest_weight()?;
    let adjusted = if biggest == 0.0 { 0 } else { biggest.log10().floor() as i32 };
    let scale = 10f64.powi(digits as i32 - 1 - adjusted);
    let quantize = |s: &str|->Result<String> {
      let v: f64 = s.parse()
        .map_err(|_| NncError::Parse(format!("{:?} is not numeric", s)))?;
      let scaled = scale * v;
      if !scaled.is_finite() {
        return Err(NncError::Quantization(format!(
          "{} * {} is not a finite integer", scale, v))) }
      Ok(format!("{}", scaled as i64)) };
    let weights = self.weights.iter().map(|w| quantize(w))
      .collect::<Result<Vec<String>>>()?;
    let threshold = quantize(&self.threshold)?;
    Ok(Classifier { name: self.name.clone(), size: self.size,
                    weights, threshold, is_integer: true }) }

  fn integer_weights(&self)->Result<(Vec<i64>, i64)> {
    let weights = self.weights.iter().map(|w| w.parse().map_err(
      |_| NncError::Quantization(format!("weight {:?} is not an integer", w))))
      .collect::<Result<Vec<i64>>>()?;
    let threshold = self.threshold.parse().map_err(
      |_| NncError::Quantization(format!("threshold {:?} is not an integer", self.threshold)))?;
    Ok((weights, threshold)) }

  /// (sum of negative weights, sum of positive weights): the reachable
  /// range of the weighted sum
  pub fn bounds(&self)->Result<(i64, i64)> {
    let (weights, _) = self.integer_weights()?;
    let mut lower = 0;
    let mut upper = 0;
    for w in weights {
      if w < 0 { lower += w } else { upper += w }}
    Ok((lower, upper)) }

  /// compile the threshold function to an obdd: grow the grid of
  /// reachable partial sums level by level, map the final sums to
  /// terminals, then allocate decisions bottom-up through the unique
  /// table so equal `(dvar, hi, lo)` triples collapse.
  pub fn compile(&self)->Result<(ObddManager, Oid)> {
    if !self.is_integer {
      return Err(NncError::InvariantViolation(
        "compile requires an integer classifier; call with_precision first".to_string())) }
    let (weights, threshold) = self.integer_weights()?;
    let n = self.size as usize;
    let mut reach: Vec<FxHashSet<i64>> = vec![FxHashSet::default(); n + 2];
    reach[1].insert(0);
    for i in 1..=n {
      let w = weights[i - 1];
      let sums: Vec<i64> = reach[i].iter().copied().collect();
      for p in sums {
        reach[i + 1].insert(p + w);
        reach[i + 1].insert(p); }}
    let mut mgr = ObddManager::new(self.size);
    let (one, zero) = (mgr.one_sink(), mgr.zero_sink());
    let mut level_sums: Vec<i64> = reach[n + 1].iter().copied().collect();
    level_sums.sort_unstable();
    let mut next: FxHashMap<i64, Oid> = level_sums.iter()
      .map(|&p| (p, if p >= threshold { one } else { zero })).collect();
    for i in (1..=n).rev() {
      let w = weights[i - 1];
      let mut sums: Vec<i64> = reach[i].iter().copied().collect();
      sums.sort_unstable();
      let mut level: FxHashMap<i64, Oid> = FxHashMap::default();
      for p in sums {
        let node = mgr.new_node(i as u32, next[&(p + w)], next[&p]);
        level.insert(p, node); }
      next = level; }
    debug!("compiled {} ({} nodes, {} cache hits)",
           self.name, mgr.node_count(), mgr.cache_hits);
    Ok((mgr, next[&0])) }}

impl fmt::Display for Classifier {
  fn fmt(&self, f: &mut fmt::Formatter)->fmt::Result {
    writeln!(f, "name: {}", self.name)?;
    writeln!(f, "size: {}", self.size)?;
    writeln!(f, "weights: {}", self.weights.join(" "))?;
    write!(f, "threshold: {}", self.threshold) }}


#[cfg(test)] mod test {
  use super::*;

  const NEURON: &str = "name: example\nsize: 3\nweights: 1 -2 3\nthreshold: 2\n";

  #[test] fn test_parse() {
    let c = Classifier::parse(NEURON).expect("parse");
    assert_eq!(c.name, "example");
    assert_eq!(c.size, 3);
    assert_eq!(c.weights, vec!["1", "-2", "3"]);
    assert_eq!(c.threshold, "2");
    assert!(!c.is_integer); }

  #[test] fn test_parse_missing_field() {
    assert!(Classifier::parse("size: 2\nweights: 1 1\n").is_err());
    // a bias field does not stand in for the threshold
    assert!(Classifier::parse("size: 2\nweights: 1 1\nbias: 1\n").is_err()); }

  #[test] fn test_parse_bad_weight() {
    assert!(Classifier::parse("size: 2\nweights: 1 x\nthreshold: 1\n").is_err()); }

  #[test] fn test_parse_size_mismatch() {
    assert!(Classifier::parse("size: 3\nweights: 1 1\nthreshold: 1\n").is_err()); }

  #[test] fn test_with_precision_fractional() {
    let c = Classifier::parse("size: 2\nweights: 0.05 -0.03\nthreshold: 0.01\n")
      .expect("parse");
    let d = c.with_precision(2).expect("precision");
    assert!(d.is_integer);
    // biggest weight 0.05 scaled to 2 significant digits
    assert_eq!(d.weights, vec!["50", "-30"]);
    assert_eq!(d.threshold, "10"); }

  #[test] fn test_with_precision_integer() {
    let c = Classifier::parse("size: 3\nweights: 2 -3 5\nthreshold: 1\n")
      .expect("parse");
    let d = c.with_precision(1).expect("precision");
    assert_eq!(d.weights, vec!["2", "-3", "5"]);
    assert_eq!(d.threshold, "1"); }

  #[test] fn test_compile_requires_integer() {
    let c = Classifier::parse(NEURON).expect("parse");
    assert!(c.compile().is_err()); }

  #[test] fn test_bounds() {
    let c = Classifier::parse(NEURON).expect("parse");
    let d = c.with_precision(1).expect("precision");
    assert_eq!(d.bounds().expect("bounds"), (-2, 4)); }

  #[test] fn test_display_roundtrip() {
    let c = Classifier::parse(NEURON).expect("parse");
    let again = Classifier::parse(&format!("{}", c)).expect("reparse");
    assert_eq!(again.weights, c.weights);
    assert_eq!(again.threshold, c.threshold); }}
