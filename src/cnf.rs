//! CNF clause sets in DIMACS form.
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use fxhash::FxHashSet;
use crate::errors::{NncError, Result};

/// A conjunction of clauses over variables `1..=var_count`.
/// Clauses are plain vectors of nonzero signed literals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cnf {
  pub var_count: i64,
  pub clauses: Vec<Vec<i64>> }

impl Cnf {
  pub fn new(var_count: i64, clauses: Vec<Vec<i64>>) -> Cnf {
    Cnf { var_count, clauses }}

  /// condition on a literal: drop satisfied clauses, shrink the rest
  pub fn condition(&self, lit: i64) -> Cnf {
    let mut clauses = Vec::new();
    for clause in &self.clauses {
      if clause.contains(&lit) { continue }
      clauses.push(clause.iter().copied().filter(|&l| l != -lit).collect()); }
    Cnf::new(self.var_count, clauses) }

  /// true if every clause contains one of the given literals
  pub fn is_model(&self, model: &[i64]) -> bool {
    let model: FxHashSet<i64> = model.iter().copied().collect();
    self.clauses.iter().all(|clause| clause.iter().any(|lit| model.contains(lit))) }

  pub fn write(&self, path: &str) -> Result<()> {
    let mut f = File::create(path)?;
    write!(f, "{}", self)?;
    Ok(()) }

  /// DIMACS reader. `c` comments and blank lines are skipped. A clause
  /// count that disagrees with the header is only worth a warning.
  pub fn read(path: &str) -> Result<Cnf> {
    let f = File::open(path)?;
    let mut header: Option<(i64, usize)> = None;
    let mut clauses = Vec::new();
    for line in BufReader::new(f).lines() {
      let line = line?;
      let line = line.trim();
      if line.is_empty() || line.starts_with('c') { continue }
      if line.starts_with('p') {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 4 || fields[1] != "cnf" {
          return Err(NncError::Parse(format!("bad dimacs header: {:?}", line))) }
        let var_count = fields[2].parse()
          .map_err(|_| NncError::Parse(format!("bad var count: {:?}", fields[2])))?;
        let clause_count = fields[3].parse()
          .map_err(|_| NncError::Parse(format!("bad clause count: {:?}", fields[3])))?;
        header = Some((var_count, clause_count)); }
      else {
        let lits: Vec<i64> = line.split_whitespace()
          .map(|s| s.parse().map_err(|_| NncError::Parse(format!("bad literal: {:?}", s))))
          .collect::<Result<Vec<i64>>>()?;
        match lits.last() {
          Some(0) => clauses.push(lits[..lits.len()-1].to_vec()),
          _ => return Err(NncError::Parse(format!("clause not 0-terminated: {:?}", line))) }}}
    let (var_count, clause_count) = header
      .ok_or_else(|| NncError::Parse("missing dimacs header".to_string()))?;
    if clauses.len() != clause_count {
      warn!("inconsistent clause count: header says {}, found {}",
            clause_count, clauses.len()); }
    Ok(Cnf::new(var_count, clauses)) }}

impl fmt::Display for Cnf {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    writeln!(f, "p cnf {} {}", self.var_count, self.clauses.len())?;
    for clause in &self.clauses {
      for lit in clause { write!(f, "{} ", lit)?; }
      writeln!(f, "0")?; }
    Ok(()) }}


#[cfg(test)] mod test {
  use super::*;

  #[test] fn test_condition() {
    let cnf = Cnf::new(3, vec![vec![1, 2], vec![-1, 3], vec![2, 3]]);
    let cond = cnf.condition(1);
    assert_eq!(cond.clauses, vec![vec![3], vec![2, 3]]); }

  #[test] fn test_is_model() {
    let cnf = Cnf::new(2, vec![vec![1, 2], vec![-1, 2]]);
    assert!(cnf.is_model(&[1, 2]));
    assert!(cnf.is_model(&[-1, 2]));
    assert!(!cnf.is_model(&[1, -2])); }

  #[test] fn test_display() {
    let cnf = Cnf::new(2, vec![vec![1, -2], vec![2]]);
    assert_eq!(format!("{}", cnf), "p cnf 2 2\n1 -2 0\n2 0\n"); }

  #[test] fn test_roundtrip() {
    let path = std::env::temp_dir().join("nnc-test-cnf.cnf");
    let path = path.to_str().expect("temp path");
    let cnf = Cnf::new(3, vec![vec![1, 2, -3], vec![-2]]);
    cnf.write(path).expect("write");
    let back = Cnf::read(path).expect("read");
    assert_eq!(cnf, back); }}
