//! Ordered binary decision diagrams: manager, nodes, reduction,
//! traversal, model counting, and the nnf/cnf/vtree/sdd exporters.
//!
//! Nodes live in an arena owned by the manager and are referred to by
//! [`Oid`] indices. Decision nodes satisfy the ordering invariant: both
//! branches are either terminal or branch on a strictly larger variable.
//! Variables are 1-indexed and appear top-to-bottom in index order.
use std::fmt;
use std::fs::File;
use std::io::Write;
use fxhash::FxHashMap;
use num_bigint::BigUint;
use num_traits::{One, Zero};
use crate::errors::{NncError, Result};
use crate::cnf::Cnf;
use crate::nnf::{Gid, Nnf, NnfManager};

/// Index of a node in an [`ObddManager`] arena.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Oid(usize);

impl Oid {
  pub fn nid(self)->usize { self.0 }
  /// terminals are always the first two arena slots
  pub fn is_terminal(self)->bool { self.0 < 2 }
  pub fn is_decision(self)->bool { self.0 >= 2 }
  pub fn is_false(self)->bool { self.0 == 0 }
  pub fn is_true(self)->bool { self.0 == 1 }}

impl fmt::Display for Oid {
  fn fmt(&self, f: &mut fmt::Formatter)->fmt::Result {
    match self.0 {
      0 => write!(f, "O"),
      1 => write!(f, "I"),
      n => write!(f, "@{}", n) }}}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObddNode {
  Terminal { sign: bool },
  Decision { dvar: u32, hi: Oid, lo: Oid }}

/// Owns the node arena, the two terminals, and one unique table per
/// variable, keyed on the `(hi, lo)` pair.
#[derive(Debug)]
pub struct ObddManager {
  pub var_count: u32,
  nodes: Vec<ObddNode>,
  cache: Vec<FxHashMap<(usize, usize), Oid>>,
  pub cache_hits: u64,
  pub cache_misses: u64 }

impl ObddManager {

  pub fn new(var_count: u32)->ObddManager {
    ObddManager {
      var_count,
      nodes: vec![ObddNode::Terminal { sign: false },
                  ObddNode::Terminal { sign: true }],
      cache: vec![FxHashMap::default(); var_count as usize + 1],
      cache_hits: 0,
      cache_misses: 0 }}

  pub fn zero_sink(&self)->Oid { Oid(0) }
  pub fn one_sink(&self)->Oid { Oid(1) }

  pub fn node(&self, n: Oid)->ObddNode { self.nodes[n.0] }

  pub fn node_count(&self)->usize { self.nodes.len() }

  /// level of a node for the ordering invariant (terminals sit below
  /// every variable)
  fn level(&self, n: Oid)->u32 {
    match self.nodes[n.0] {
      ObddNode::Terminal { .. } => self.var_count + 1,
      ObddNode::Decision { dvar, .. } => dvar }}

  /// unique-table node constructor. note that `hi == lo` still
  /// allocates a decision: reduction is a separate explicit step.
  pub fn new_node(&mut self, dvar: u32, hi: Oid, lo: Oid)->Oid {
    debug_assert!(dvar >= 1 && dvar <= self.var_count, "dvar out of range");
    debug_assert!(self.level(hi) > dvar && self.level(lo) > dvar,
                  "branch variables must sit strictly below the decision");
    let key = (hi.0, lo.0);
    if let Some(&n) = self.cache[dvar as usize].get(&key) {
      self.cache_hits += 1;
      return n }
    self.cache_misses += 1;
    let n = Oid(self.nodes.len());
    self.nodes.push(ObddNode::Decision { dvar, hi, lo });
    self.cache[dvar as usize].insert(key, n);
    n }

  /// post-order iterator: hi subtree, then lo subtree, then the node;
  /// each reachable node exactly once. Traversal state lives in the
  /// iterator, so the arena stays untouched.
  pub fn post_order(&self, root: Oid)->ObddIter {
    ObddIter { mgr: self, seen: vec![false; self.nodes.len()],
               stack: vec![(root, 0)] }}

  /// standard reduction: substitute already-reduced branches, collapse
  /// decisions whose branches coincide. returns the root's final
  /// representative; applying it twice is a fixpoint.
  pub fn reduce(&mut self, root: Oid)->Oid {
    let order: Vec<Oid> = self.post_order(root).collect();
    let mut repl: FxHashMap<Oid, Oid> = FxHashMap::default();
    for n in order {
      let (dvar, mut hi, mut lo) = match self.nodes[n.0] {
        ObddNode::Terminal { .. } => continue,
        ObddNode::Decision { dvar, hi, lo } => (dvar, hi, lo) };
      if let Some(&r) = repl.get(&hi) { hi = r }
      if let Some(&r) = repl.get(&lo) { lo = r }
      self.nodes[n.0] = ObddNode::Decision { dvar, hi, lo };
      if hi == lo { repl.insert(n, hi); }}
    repl.get(&root).copied().unwrap_or(root) }

  /// semantic model count over `var_count` variables: terminals carry
  /// 0 or 2^var_count, each decision averages its branches. exact by
  /// construction.
  pub fn model_count(&self, root: Oid, var_count: u32)->BigUint {
    let mut counts: FxHashMap<Oid, BigUint> = FxHashMap::default();
    for n in self.post_order(root) {
      let c = match self.nodes[n.0] {
        ObddNode::Terminal { sign } =>
          if sign { BigUint::one() << var_count as usize } else { BigUint::zero() },
        ObddNode::Decision { hi, lo, .. } =>
          (&counts[&hi] + &counts[&lo]) >> 1 };
      counts.insert(n, c); }
    counts.remove(&root).expect("root visited by post-order") }

  /// walk the decision path selected by `inst` (1-indexed, values 0/1)
  pub fn is_model(&self, root: Oid, inst: &[u8])->bool {
    let mut n = root;
    loop {
      match self.nodes[n.0] {
        ObddNode::Terminal { sign } => return sign,
        ObddNode::Decision { dvar, hi, lo } =>
          n = if inst[dvar as usize] != 0 { hi } else { lo } }}}

  /// lazily enumerate partial assignments reaching the `one` terminal.
  /// variables untested on a path are omitted.
  pub fn models(&self, root: Oid)->Models { Models { mgr: self, want: true, stack: vec![(root, Vec::new())] }}

  /// lazily enumerate partial assignments reaching the `zero` terminal
  pub fn non_models(&self, root: Oid)->Models { Models { mgr: self, want: false, stack: vec![(root, Vec::new())] }}

  /// number of reachable decision nodes
  pub fn count(&self, root: Oid)->usize {
    self.post_order(root).filter(|n| n.is_decision()).count() }

  /// (reachable decisions, reachable decisions branching on `dvar`)
  pub fn count_with_dvar(&self, root: Oid, dvar: u32)->(usize, usize) {
    let mut count = 0; let mut dvar_count = 0;
    for n in self.post_order(root) {
      if let ObddNode::Decision { dvar: d, .. } = self.nodes[n.0] {
        count += 1;
        if d == dvar { dvar_count += 1 }}}
    (count, dvar_count) }

  pub fn count_terminals(&self, root: Oid)->usize {
    self.post_order(root).filter(|n| n.is_terminal()).count() }

  ////////////////////////////////////////////////////////////////
  // exporters
  ////////////////////////////////////////////////////////////////

  /// rebuild the obdd as an nnf circuit in a fresh manager:
  /// decision(v, hi, lo) becomes or(and(v, hi'), and(-v, lo'))
  pub fn obdd_to_nnf(&self, root: Oid)->(NnfManager, Nnf) {
    let mut mgr = NnfManager::new(self.var_count);
    let mut data: FxHashMap<Oid, Gid> = FxHashMap::default();
    for n in self.post_order(root) {
      let alpha = match self.nodes[n.0] {
        ObddNode::Terminal { sign } =>
          if sign { mgr.true_gate() } else { mgr.false_gate() },
        ObddNode::Decision { dvar, hi, lo } => {
          let plit = mgr.literal(dvar as i64);
          let nlit = mgr.literal(-(dvar as i64));
          let hi = mgr.new_and(vec![plit, data[&hi]]);
          let lo = mgr.new_and(vec![nlit, data[&lo]]);
          mgr.new_or(vec![hi, lo]) }};
      data.insert(n, alpha); }
    let root_gate = data[&root];
    let nnf = mgr.nnf(root_gate);
    (mgr, nnf) }

  /// tseitin encoding: one output wire per node, wires numbered by
  /// post-order index plus `base_index` (the caller picks a base past
  /// its own variables). returns the cnf and the root's wire.
  pub fn obdd_to_cnf(&self, root: Oid, base_index: i64)->(Cnf, i64) {
    let mut clauses = Vec::new();
    let mut index: FxHashMap<Oid, i64> = FxHashMap::default();
    let mut me = base_index;
    for (i, n) in self.post_order(root).enumerate() {
      index.insert(n, i as i64);
      me = base_index + i as i64;
      match self.nodes[n.0] {
        ObddNode::Terminal { sign } =>
          clauses.push(vec![if sign { me } else { -me }]),
        ObddNode::Decision { dvar, hi, lo } => {
          // me <=> (dvar & hi | -dvar & lo)
          let v = dvar as i64;
          let h = base_index + index[&hi];
          let l = base_index + index[&lo];
          clauses.push(vec![-me, l, v]);
          clauses.push(vec![-me, h, -v]);
          clauses.push(vec![-me, l, h]);
          clauses.push(vec![me, -l, v]);
          clauses.push(vec![me, -h, -v]); }}}
    (Cnf::new(me, clauses), me) }

  /// write a right-linear vtree over `var_count` variables: leaves at
  /// even ids, internal nodes chaining down the right spine
  pub fn save_vtree(&self, path: &str)->Result<()> {
    let mut f = File::create(path)?;
    let n = self.var_count as i64;
    writeln!(f, "vtree {}", 2 * n - 1)?;
    for var in 1..=n {
      writeln!(f, "L {} {}", 2 * (var - 1), var)?; }
    if n >= 2 {
      let last = 2 * (n - 1) - 1;
      writeln!(f, "I {} {} {}", last, last - 1, last + 1)?;
      let mut id = last - 2;
      while id > 0 {
        writeln!(f, "I {} {} {}", id, id - 1, id + 2)?;
        id -= 2; }}
    Ok(()) }

  /// write the obdd in the sdd text format against the right-linear
  /// vtree of `save_vtree`. decisions on the last variable collapse to
  /// literal or terminal ids instead of decision lines.
  pub fn save_sdd(&self, path: &str, root: Oid)->Result<()> {
    let last_var = self.var_count;
    let (count, last_count) = self.count_with_dvar(root, last_var);
    let terminal_count = self.count_terminals(root);
    let node_count =
      count + terminal_count + 2 * self.var_count as usize - last_count;
    let mut f = File::create(path)?;
    writeln!(f, "sdd {}", node_count)?;
    let mut node_id: i64 = 0;
    // literal ids range from 0 to 2n-1: negative then positive per var
    for var in 1..=self.var_count as i64 {
      let vtree_id = 2 * (var - 1);
      writeln!(f, "L {} {} {}", node_id, vtree_id, -var)?;
      node_id += 1;
      writeln!(f, "L {} {} {}", node_id, vtree_id, var)?;
      node_id += 1; }
    let mut cache: FxHashMap<Oid, i64> = FxHashMap::default();
    let mut true_id: Option<i64> = None;
    let mut false_id: Option<i64> = None;
    for n in self.post_order(root) {
      let new_node_id = match self.nodes[n.0] {
        ObddNode::Terminal { sign } => {
          if sign { true_id = Some(node_id) } else { false_id = Some(node_id) }
          writeln!(f, "{} {}", if sign { "T" } else { "F" }, node_id)?;
          node_id += 1;
          node_id - 1 }
        ObddNode::Decision { dvar, hi, lo } => {
          let (neg_id, pos_id) = (2 * (dvar as i64 - 1), 2 * (dvar as i64 - 1) + 1);
          if dvar == last_var {
            // both branches are terminal here; fold into the vtree leaf
            let pick = |id: Option<i64>| id.ok_or_else(|| NncError::InvariantViolation(
              "terminal not visited before last-variable decision".to_string()));
            match (hi.is_true(), lo.is_true()) {
              (true, true) => pick(true_id)?,
              (false, false) => pick(false_id)?,
              (true, false) => pos_id,
              (false, true) => neg_id }}
          else {
            let vtree_id = 2 * (dvar as i64 - 1) + 1;
            writeln!(f, "D {} {} 2 {} {} {} {}",
                     node_id, vtree_id, pos_id, cache[&hi], neg_id, cache[&lo])?;
            node_id += 1;
            node_id - 1 }}};
      cache.insert(n, new_node_id); }
    Ok(()) }}

/// explicit-stack post-order iterator over reachable obdd nodes
pub struct ObddIter<'a> {
  mgr: &'a ObddManager,
  seen: Vec<bool>,
  stack: Vec<(Oid, u8)> }

impl<'a> Iterator for ObddIter<'a> {
  type Item = Oid;
  fn next(&mut self)->Option<Oid> {
    while let Some((n, state)) = self.stack.pop() {
      if self.seen[n.0] { continue }
      match self.mgr.nodes[n.0] {
        ObddNode::Terminal { .. } => {
          self.seen[n.0] = true;
          return Some(n) }
        ObddNode::Decision { hi, lo, .. } => match state {
          0 => {
            self.stack.push((n, 1));
            if !self.seen[hi.0] { self.stack.push((hi, 0)) }}
          1 => {
            self.stack.push((n, 2));
            if !self.seen[lo.0] { self.stack.push((lo, 0)) }}
          _ => {
            self.seen[n.0] = true;
            return Some(n) }}}}
    None }}

/// depth-first enumeration of paths to one terminal sign. yields the
/// `(var, value)` assignments along each path, hi branches first.
pub struct Models<'a> {
  mgr: &'a ObddManager,
  want: bool,
  stack: Vec<(Oid, Vec<(u32, u8)>)> }

impl<'a> Iterator for Models<'a> {
  type Item = Vec<(u32, u8)>;
  fn next(&mut self)->Option<Vec<(u32, u8)>> {
    while let Some((n, path)) = self.stack.pop() {
      match self.mgr.nodes[n.0] {
        ObddNode::Terminal { sign } =>
          if sign == self.want { return Some(path) },
        ObddNode::Decision { dvar, hi, lo } => {
          let mut lo_path = path.clone();
          lo_path.push((dvar, 0));
          let mut hi_path = path;
          hi_path.push((dvar, 1));
          self.stack.push((lo, lo_path));
          self.stack.push((hi, hi_path)); }}}
    None }}

include!("test-obdd.rs");
