//! NNF circuits: hash-consed and/or/literal gates, hierarchical
//! sub-circuit gates, negation, model counting, flattening, and the
//! line-oriented `nnf` text format.
//!
//! Gates live in an arena owned by the manager and are referred to by
//! [`Gid`] indices. The manager is the sole constructor: and/or children
//! are sorted by gid and the sorted tuple is the hash-cons key, so
//! structurally equal gates share one arena slot. Both polarities of
//! every literal are pre-created, as are the terminals: an empty `And`
//! is true, an empty `Or` is false.
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use fxhash::{FxHashMap, FxHashSet};
use num_bigint::BigUint;
use num_traits::{One, Zero};
use crate::errors::{NncError, Result};
use crate::cnf::Cnf;
use crate::linear::Classifier;

/// digits of precision used to quantize sub-circuit neurons when the
/// caller does not pick one
pub const DEFAULT_PRECISION: u32 = 2;

/// Index of a gate in an [`NnfManager`] arena.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Gid(usize);

impl Gid {
  pub fn id(self)->usize { self.0 }}

#[derive(Debug)]
pub enum Gate {
  Literal { lit: i64 },
  And { children: Vec<Gid> },
  Or { dvar: u32, children: Vec<Gid> },
  Sub { children: Vec<Gid>, filename: String, sub: Option<Box<SubCircuit>> }}

/// A compiled sub-circuit cached on its `Sub` gate: the gate's children
/// are the inputs, wired positionally to variables `1..=k` of this nnf.
#[derive(Debug)]
pub struct SubCircuit {
  pub manager: NnfManager,
  pub nnf: Nnf }

/// A root gate plus its cached counts.
#[derive(Debug, Clone)]
pub struct Nnf {
  pub root: Gid,
  pub node_count: usize,
  pub edge_count: usize,
  pub var_count: u32 }

impl fmt::Display for Nnf {
  fn fmt(&self, f: &mut fmt::Formatter)->fmt::Result {
    write!(f, "nnf {} {} {}", self.node_count, self.edge_count, self.var_count) }}

#[derive(Debug, PartialEq, Eq, Hash)]
enum GateKey {
  And(Vec<Gid>),
  Or(Vec<Gid>),
  Sub(Vec<Gid>, String) }

#[derive(Debug)]
pub struct NnfManager {
  pub var_count: u32,
  gates: Vec<Gate>,
  cache: FxHashMap<GateKey, Gid>,
  /// cached complement per gate, mutually linked
  negated: Vec<Option<Gid>>,
  zero: Gid,
  one: Gid,
  pub cache_hits: u64,
  pub cache_misses: u64 }

impl NnfManager {

  pub fn new(var_count: u32)->NnfManager {
    let mut mgr = NnfManager {
      var_count,
      gates: Vec::new(),
      cache: FxHashMap::default(),
      negated: Vec::new(),
      zero: Gid(0),
      one: Gid(0),
      cache_hits: 0,
      cache_misses: 0 };
    mgr.zero = mgr.new_or(Vec::new());
    mgr.one = mgr.new_and(Vec::new());
    for var in 1..=var_count as i64 {
      mgr.push_gate(Gate::Literal { lit: -var });
      mgr.push_gate(Gate::Literal { lit: var }); }
    mgr }

  pub fn true_gate(&self)->Gid { self.one }
  pub fn false_gate(&self)->Gid { self.zero }

  pub fn gate(&self, g: Gid)->&Gate { &self.gates[g.0] }

  pub fn gate_count(&self)->usize { self.gates.len() }

  pub fn is_true(&self, g: Gid)->bool {
    matches!(&self.gates[g.0], Gate::And { children } if children.is_empty()) }
  pub fn is_false(&self, g: Gid)->bool {
    matches!(&self.gates[g.0], Gate::Or { children, .. } if children.is_empty()) }
  pub fn is_input(&self, g: Gid)->bool {
    matches!(&self.gates[g.0], Gate::Literal { .. }) }

  /// the pre-created gate for a literal. both polarities of every
  /// variable exist from construction.
  pub fn literal(&self, lit: i64)->Gid {
    assert!(lit != 0 && lit.unsigned_abs() <= self.var_count as u64,
            "literal out of range: {}", lit);
    let var = lit.unsigned_abs() as usize;
    Gid(2 + 2 * (var - 1) + usize::from(lit > 0)) }

  fn push_gate(&mut self, gate: Gate)->Gid {
    let g = Gid(self.gates.len());
    self.gates.push(gate);
    self.negated.push(None);
    g }

  pub fn new_and(&mut self, mut children: Vec<Gid>)->Gid {
    children.sort();
    let key = GateKey::And(children.clone());
    if let Some(&g) = self.cache.get(&key) { self.cache_hits += 1; return g }
    self.cache_misses += 1;
    let g = self.push_gate(Gate::And { children });
    self.cache.insert(key, g);
    g }

  pub fn new_or(&mut self, children: Vec<Gid>)->Gid {
    self.new_or_with_dvar(0, children) }

  /// the decision variable is carried but takes no part in the
  /// hash-cons key, so it never splits otherwise-equal gates
  pub fn new_or_with_dvar(&mut self, dvar: u32, mut children: Vec<Gid>)->Gid {
    children.sort();
    let key = GateKey::Or(children.clone());
    if let Some(&g) = self.cache.get(&key) { self.cache_hits += 1; return g }
    self.cache_misses += 1;
    let g = self.push_gate(Gate::Or { dvar, children });
    self.cache.insert(key, g);
    g }

  /// sub-circuit gates key on the child tuple as given plus the
  /// filename; children are positional inputs and must not be sorted
  pub fn new_sub(&mut self, children: Vec<Gid>, filename: &str)->Gid {
    let key = GateKey::Sub(children.clone(), filename.to_string());
    if let Some(&g) = self.cache.get(&key) { self.cache_hits += 1; return g }
    self.cache_misses += 1;
    let g = self.push_gate(Gate::Sub {
      children, filename: filename.to_string(), sub: None });
    self.cache.insert(key, g);
    g }

  pub fn children(&self, g: Gid)->&[Gid] {
    match &self.gates[g.0] {
      Gate::Literal { .. } => &[],
      Gate::And { children } => children,
      Gate::Or { children, .. } => children,
      Gate::Sub { children, .. } => children }}

  ////////////////////////////////////////////////////////////////
  // traversal & counts
  ////////////////////////////////////////////////////////////////

  /// DAG post-order: children before parents, each gate once.
  /// Traversal marks live in a local scratch set, not on the gates.
  pub fn post_order(&self, root: Gid)->Vec<Gid> {
    let mut seen: FxHashSet<Gid> = FxHashSet::default();
    let mut out = Vec::new();
    let mut stack: Vec<(Gid, usize)> = vec![(root, 0)];
    seen.insert(root);
    while let Some((g, ci)) = stack.pop() {
      let children = self.children(g);
      if ci < children.len() {
        stack.push((g, ci + 1));
        let c = children[ci];
        if !seen.contains(&c) {
          seen.insert(c);
          stack.push((c, 0)); }}
      else { out.push(g) }}
    out }

  pub fn count(&self, root: Gid)->usize { self.post_order(root).len() }

  pub fn size(&self, root: Gid)->usize { self.count_and_size(root).1 }

  pub fn count_and_size(&self, root: Gid)->(usize, usize) {
    let mut nodes = 0;
    let mut edges = 0;
    for g in self.post_order(root) {
      nodes += 1;
      edges += self.children(g).len(); }
    (nodes, edges) }

  /// wrap a root with its cached counts
  pub fn nnf(&self, root: Gid)->Nnf {
    let (node_count, edge_count) = self.count_and_size(root);
    Nnf { root, node_count, edge_count, var_count: self.var_count }}

  ////////////////////////////////////////////////////////////////
  // negation
  ////////////////////////////////////////////////////////////////

  /// complement a gate: literals flip sign, and/or swap by De Morgan.
  /// complements are cached and mutually linked, so a repeat call is a
  /// table lookup. sub-circuit gates are not negatable.
  pub fn negate(&mut self, g: Gid)->Result<Gid> {
    if let Some(n) = self.negated[g.0] { return Ok(n) }
    enum Shape { Lit(i64), And(Vec<Gid>), Or(Vec<Gid>), Sub }
    let shape = match &self.gates[g.0] {
      Gate::Literal { lit } => Shape::Lit(*lit),
      Gate::And { children } => Shape::And(children.clone()),
      Gate::Or { children, .. } => Shape::Or(children.clone()),
      Gate::Sub { .. } => Shape::Sub };
    let neg = match shape {
      Shape::Lit(lit) => self.literal(-lit),
      Shape::And(children) => {
        let ch = children.into_iter().map(|c| self.negate(c))
          .collect::<Result<Vec<Gid>>>()?;
        self.new_or(ch) }
      Shape::Or(children) => {
        let ch = children.into_iter().map(|c| self.negate(c))
          .collect::<Result<Vec<Gid>>>()?;
        self.new_and(ch) }
      Shape::Sub => return Err(NncError::NotNegatable) };
    self.negated[g.0] = Some(neg);
    self.negated[neg.0] = Some(g);
    Ok(neg) }

  ////////////////////////////////////////////////////////////////
  // queries
  ////////////////////////////////////////////////////////////////

  /// annotate every reachable gate with the variables of its subtree
  fn used_variables(&self, root: Gid)->Result<FxHashMap<Gid, FxHashSet<u32>>> {
    let mut vars: FxHashMap<Gid, FxHashSet<u32>> = FxHashMap::default();
    for g in self.post_order(root) {
      let vs = match &self.gates[g.0] {
        Gate::Literal { lit } => {
          let mut s = FxHashSet::default();
          s.insert(lit.unsigned_abs() as u32);
          s }
        Gate::And { children } | Gate::Or { children, .. } => {
          let mut s = FxHashSet::default();
          for c in children { s.extend(vars[c].iter().copied()) }
          s }
        Gate::Sub { .. } => return Err(NncError::UnknownGateType(
          "sub-circuit gates carry no variable annotation; flatten first".to_string())) };
      vars.insert(g, vs); }
    Ok(vars) }

  /// weighted model count: ands multiply, ors sum with each child
  /// scaled by 2^(gap) for the variables it leaves free, and the root
  /// is scaled up to the full variable set
  pub fn model_count(&self, nnf: &Nnf)->Result<BigUint> {
    let vars = self.used_variables(nnf.root)?;
    let mut counts: FxHashMap<Gid, BigUint> = FxHashMap::default();
    for g in self.post_order(nnf.root) {
      let c = match &self.gates[g.0] {
        Gate::Literal { .. } => BigUint::one(),
        Gate::And { children } => {
          let mut c = BigUint::one();
          for ch in children { c *= &counts[ch] }
          c }
        Gate::Or { children, .. } => {
          let node_vars = vars[&g].len();
          let mut c = BigUint::zero();
          for ch in children {
            let gap = node_vars - vars[ch].len();
            c += &counts[ch] << gap; }
          c }
        Gate::Sub { .. } => return Err(NncError::UnknownGateType(
          "cannot count a circuit containing sub-circuit gates; flatten first".to_string())) };
      counts.insert(g, c); }
    let gap = nnf.var_count as usize - vars[&nnf.root].len();
    Ok(counts.remove(&nnf.root).expect("root visited by post-order") << gap) }

  /// short-circuit evaluation of `inst` (1-indexed, values 0/1).
  /// sub-circuit gates are materialized on demand and evaluated with an
  /// instantiation rebuilt from their input wires.
  pub fn is_model(&mut self, root: Gid, inst: &[u8])->Result<bool> {
    debug_assert!(inst.len() > self.var_count as usize, "instantiation too short");
    self.materialize_subs(root, None)?;
    let mut memo = FxHashMap::default();
    self.eval(root, inst, &mut memo) }

  fn eval(&self, g: Gid, inst: &[u8], memo: &mut FxHashMap<Gid, bool>)->Result<bool> {
    if let Some(&v) = memo.get(&g) { return Ok(v) }
    let v = match &self.gates[g.0] {
      Gate::Literal { lit } => {
        let var = lit.unsigned_abs() as usize;
        let val = u8::from(*lit > 0);
        inst[var] == val }
      Gate::And { children } => {
        let mut sat = true;
        for &c in children {
          if !self.eval(c, inst, memo)? { sat = false; break }}
        sat }
      Gate::Or { children, .. } => {
        let mut sat = false;
        for &c in children {
          if self.eval(c, inst, memo)? { sat = true; break }}
        sat }
      Gate::Sub { children, sub, .. } => {
        let sub = sub.as_ref().ok_or_else(|| NncError::InvariantViolation(
          "sub-circuit not materialized".to_string()))?;
        let mut sub_inst = vec![0u8; sub.manager.var_count as usize + 1];
        for (i, &c) in children.iter().enumerate() {
          if i + 1 > sub.manager.var_count as usize { break }
          sub_inst[i + 1] = u8::from(self.eval(c, inst, memo)?); }
        let mut sub_memo = FxHashMap::default();
        sub.manager.eval(sub.nnf.root, &sub_inst, &mut sub_memo)? }};
    memo.insert(g, v);
    Ok(v) }

  ////////////////////////////////////////////////////////////////
  // sub-circuit materialization & flattening
  ////////////////////////////////////////////////////////////////

  /// compile the sub-circuit of every reachable `Sub` gate that does
  /// not already carry one
  pub fn materialize_subs(&mut self, root: Gid, precision: Option<u32>)->Result<()> {
    for g in self.post_order(root) {
      if matches!(self.gates[g.0], Gate::Sub { .. }) {
        self.make_sub_nnf(g, precision)?; }}
    Ok(()) }

  fn make_sub_nnf(&mut self, g: Gid, precision: Option<u32>)->Result<()> {
    let filename = match &self.gates[g.0] {
      Gate::Sub { sub: Some(_), .. } => return Ok(()),
      Gate::Sub { filename, .. } => filename.clone(),
      _ => return Err(NncError::InvariantViolation(
        "make_sub_nnf on a non-sub gate".to_string())) };
    let precision = precision.unwrap_or(DEFAULT_PRECISION);
    match Path::new(&filename).extension().and_then(|e| e.to_str()) {
      None | Some("neuron") => {
        debug!("materializing sub-circuit from {}", filename);
        let c = Classifier::read(&filename)?;
        let d = c.with_precision(precision)?;
        let (omgr, oroot) = d.compile()?;
        let (manager, nnf) = omgr.obdd_to_nnf(oroot);
        if let Gate::Sub { sub, .. } = &mut self.gates[g.0] {
          *sub = Some(Box::new(SubCircuit { manager, nnf })) }
        Ok(()) }
      Some(ext) => Err(NncError::UnsupportedExtension(ext.to_string())) }}

  /// replace every `Sub` gate by its sub-circuit inlined over the
  /// gate's input wires. outer variable ids are preserved; sub-circuit
  /// variable ids never escape the gate boundary.
  pub fn flatten(&mut self, nnf: &Nnf, precision: Option<u32>)->Result<Nnf> {
    self.materialize_subs(nnf.root, precision)?;
    enum Shape { Lit, And(Vec<Gid>), Or(u32, Vec<Gid>), Sub(Vec<Gid>) }
    let mut data: FxHashMap<Gid, Gid> = FxHashMap::default();
    for g in self.post_order(nnf.root) {
      let shape = match &self.gates[g.0] {
        Gate::Literal { .. } => Shape::Lit,
        Gate::And { children } => Shape::And(children.clone()),
        Gate::Or { dvar, children } => Shape::Or(*dvar, children.clone()),
        Gate::Sub { children, .. } => Shape::Sub(children.clone()) };
      let alpha = match shape {
        Shape::Lit => g,
        Shape::And(children) => {
          let ch = children.iter().map(|c| data[c]).collect();
          self.new_and(ch) }
        Shape::Or(dvar, children) => {
          let ch = children.iter().map(|c| data[c]).collect();
          self.new_or_with_dvar(dvar, ch) }
        Shape::Sub(children) => {
          let sub = match &mut self.gates[g.0] {
            Gate::Sub { sub, .. } => sub.take().ok_or_else(|| NncError::InvariantViolation(
              "sub-circuit not materialized".to_string()))?,
            _ => return Err(NncError::InvariantViolation(
              "gate changed shape during flatten".to_string())) };
          let inlined = self.inline_sub(&sub, &children, &data);
          if let Gate::Sub { sub: slot, .. } = &mut self.gates[g.0] {
            *slot = Some(sub) }
          inlined? }};
      data.insert(g, alpha); }
    let root = data[&nnf.root];
    Ok(self.nnf(root)) }

  /// post-order the sub-circuit, wiring its literals to the translated
  /// input gates (negated for negative polarity) and recreating its
  /// internal gates in this manager
  fn inline_sub(&mut self, sub: &SubCircuit, inputs: &[Gid],
                data: &FxHashMap<Gid, Gid>)->Result<Gid> {
    let mut sdata: FxHashMap<Gid, Gid> = FxHashMap::default();
    for a in sub.manager.post_order(sub.nnf.root) {
      let beta = match sub.manager.gate(a) {
        Gate::Literal { lit } => {
          let var = lit.unsigned_abs() as usize;
          let wired = inputs.get(var - 1).copied()
            .ok_or_else(|| NncError::InvariantViolation(
              "sub-circuit variable has no input wire".to_string()))?;
          let wired = data[&wired];
          if *lit < 0 { self.negate(wired)? } else { wired } }
        Gate::And { children } => {
          let ch = children.iter().map(|c| sdata[c]).collect();
          self.new_and(ch) }
        Gate::Or { dvar, children } => {
          let (d, ch) = (*dvar, children.iter().map(|c| sdata[c]).collect());
          self.new_or_with_dvar(d, ch) }
        Gate::Sub { .. } => return Err(NncError::UnknownGateType(
          "nested sub-circuit gates are not supported".to_string())) };
      sdata.insert(a, beta); }
    Ok(sdata[&sub.nnf.root]) }

  ////////////////////////////////////////////////////////////////
  // compilation support
  ////////////////////////////////////////////////////////////////

  /// in-edge count per gate, plus one for the root: exactly the number
  /// of `ref` calls a compiled gate must receive to survive all parent
  /// constructions
  pub fn prime_ref_count(&self, root: Gid)->Result<Vec<u32>> {
    let mut rc = vec![0u32; self.gates.len()];
    for g in self.post_order(root) {
      match &self.gates[g.0] {
        Gate::Literal { .. } => {}
        Gate::And { children } | Gate::Or { children, .. } =>
          for c in children { rc[c.0] += 1 },
        Gate::Sub { .. } => return Err(NncError::UnknownGateType(
          "cannot compile a circuit containing sub-circuit gates; flatten first".to_string())) }}
    rc[root.0] += 1;
    Ok(rc) }

  ////////////////////////////////////////////////////////////////
  // io
  ////////////////////////////////////////////////////////////////

  pub fn read(path: &str)->Result<(NnfManager, Nnf)> {
    let text = std::fs::read_to_string(path)?;
    Self::parse(&text) }

  /// parse the `nnf N E V` text format. nodes refer to earlier nodes
  /// by 0-based file index. `S` lines carry an offset field that is
  /// validated and ignored.
  pub fn parse(text: &str)->Result<(NnfManager, Nnf)> {
    fn num<T: std::str::FromStr>(s: &str)->Result<T> {
      s.parse().map_err(|_| NncError::Parse(format!("bad number: {:?}", s))) }
    fn resolve(nodes: &[Gid], ids: &[&str])->Result<Vec<Gid>> {
      ids.iter().map(|s| {
        let i: usize = num(s)?;
        nodes.get(i).copied().ok_or_else(|| NncError::Parse(
          format!("node index {} refers past the current node", i))) })
        .collect() }
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());
    let header: Vec<&str> = lines.next()
      .ok_or_else(|| NncError::Parse("empty nnf file".to_string()))?
      .split_whitespace().collect();
    if header.len() != 4 || header[0] != "nnf" {
      return Err(NncError::Parse(format!("bad nnf header: {:?}", header.join(" ")))) }
    let node_count: usize = num(header[1])?;
    let edge_count: usize = num(header[2])?;
    let var_count: u32 = num(header[3])?;
    let mut mgr = NnfManager::new(var_count);
    let mut nodes: Vec<Gid> = Vec::with_capacity(node_count);
    for line in lines {
      let f: Vec<&str> = line.split_whitespace().collect();
      let node = match f[0] {
        "L" => {
          if f.len() != 2 {
            return Err(NncError::Parse(format!("bad literal line: {:?}", line))) }
          let lit: i64 = num(f[1])?;
          if lit == 0 || lit.unsigned_abs() > var_count as u64 {
            return Err(NncError::Parse(format!("literal out of range: {}", lit))) }
          mgr.literal(lit) }
        "A" => {
          if f.len() < 2 {
            return Err(NncError::Parse(format!("bad and line: {:?}", line))) }
          let k: usize = num(f[1])?;
          let children = resolve(&nodes, &f[2..])?;
          if children.len() != k {
            return Err(NncError::Parse(format!("and arity mismatch: {:?}", line))) }
          mgr.new_and(children) }
        "O" => {
          if f.len() < 3 {
            return Err(NncError::Parse(format!("bad or line: {:?}", line))) }
          let dvar: u32 = num(f[1])?;
          let k: usize = num(f[2])?;
          let children = resolve(&nodes, &f[3..])?;
          if children.len() != k {
            return Err(NncError::Parse(format!("or arity mismatch: {:?}", line))) }
          mgr.new_or_with_dvar(dvar, children) }
        "S" => {
          if f.len() < 2 {
            return Err(NncError::Parse(format!("bad sub-circuit line: {:?}", line))) }
          let k: usize = num(f[1])?;
          if f.len() != k + 4 {
            return Err(NncError::Parse(format!("bad sub-circuit line: {:?}", line))) }
          let children = resolve(&nodes, &f[2..2 + k])?;
          let _offset: i64 = num(f[2 + k])?;
          mgr.new_sub(children, f[3 + k]) }
        tag => return Err(NncError::UnknownGateType(tag.to_string())) };
      nodes.push(node); }
    if nodes.len() != node_count {
      return Err(NncError::Parse(format!(
        "header claims {} nodes, file has {}", node_count, nodes.len()))) }
    let root = *nodes.last().ok_or_else(|| NncError::Parse(
      "nnf file has no nodes".to_string()))?;
    Ok((mgr, Nnf { root, node_count, edge_count, var_count })) }

  /// write the canonical text form: nodes reindexed to traversal
  /// order, `L`/`A`/`O` lines only. a circuit still containing `Sub`
  /// gates cannot be persisted.
  pub fn save(&self, path: &str, nnf: &Nnf)->Result<()> {
    let order = self.post_order(nnf.root);
    if order.iter().any(|&g| matches!(self.gates[g.0], Gate::Sub { .. })) {
      return Err(NncError::UnsupportedPersistence) }
    let mut f = File::create(path)?;
    writeln!(f, "{}", nnf)?;
    let mut idmap: FxHashMap<Gid, usize> = FxHashMap::default();
    for (i, &g) in order.iter().enumerate() {
      idmap.insert(g, i);
      match &self.gates[g.0] {
        Gate::Literal { lit } => writeln!(f, "L {}", lit)?,
        Gate::And { children } => {
          write!(f, "A {}", children.len())?;
          for c in children { write!(f, " {}", idmap[c])? }
          writeln!(f)?; }
        Gate::Or { dvar, children } => {
          write!(f, "O {} {}", dvar, children.len())?;
          for c in children { write!(f, " {}", idmap[c])? }
          writeln!(f)?; }
        Gate::Sub { .. } => return Err(NncError::UnsupportedPersistence) }}
    Ok(()) }

  /// tseitin encoding: literal wires are the literal values, gate
  /// wires count up from `var_count + 1` in traversal order. the last
  /// wire is the output and doubles as the clause set's var count.
  pub fn nnf_to_cnf(&self, nnf: &Nnf)->Result<Cnf> {
    let order = self.post_order(nnf.root);
    let mut index: FxHashMap<Gid, i64> = FxHashMap::default();
    let mut next = self.var_count as i64 + 1;
    for &g in &order {
      match &self.gates[g.0] {
        Gate::Literal { lit } => { index.insert(g, *lit); }
        Gate::And { .. } | Gate::Or { .. } => {
          index.insert(g, next);
          next += 1; }
        Gate::Sub { .. } => return Err(NncError::UnsupportedPersistence) }}
    let mut clauses = Vec::new();
    let mut me = 0;
    for &g in &order {
      me = index[&g];
      match &self.gates[g.0] {
        Gate::Literal { .. } => {}
        Gate::And { children } => {
          let mut clause = vec![me];
          for c in children {
            clauses.push(vec![-me, index[c]]);
            clause.push(-index[c]); }
          clauses.push(clause); }
        Gate::Or { children, .. } => {
          let mut clause = vec![-me];
          for c in children {
            clauses.push(vec![me, -index[c]]);
            clause.push(index[c]); }
          clauses.push(clause); }
        Gate::Sub { .. } => return Err(NncError::UnsupportedPersistence) }}
    Ok(Cnf::new(me, clauses)) }}

include!("test-nnf.rs");
