//! A small reference decision-diagram engine bound to the compilation
//! driver contract: hash-consed reduced obdd nodes, apply-based
//! conjoin/disjoin with a memo cache, external reference counts, and
//! mark-and-sweep collection into a free list.
//!
//! The engine keeps a fixed variable order (variable 1 on top), so
//! `minimize_limited` has nothing to reorder and is accepted as a
//! no-op. Handles of collected nodes dangle; the reference-count
//! discipline of the driver strategies is what keeps live handles
//! valid across collections.
use fxhash::{FxHashMap, FxHashSet};
use num_bigint::BigUint;
use num_traits::Zero;
use crate::compile::DecisionDiagramManager;

/// Handle to a node in a [`RefBdd`]. 0 and 1 are the terminals.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bid(usize);

impl Bid {
  pub fn is_terminal(self)->bool { self.0 < 2 }}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
  Term(bool),
  Node { var: u32, hi: usize, lo: usize },
  Free }

#[derive(Debug)]
pub struct RefBdd {
  cells: Vec<Cell>,
  rc: Vec<u32>,
  unique: FxHashMap<(u32, usize, usize), usize>,
  memo: FxHashMap<(bool, usize, usize), usize>,
  free: Vec<usize>,
  /// allocated decision cells
  alloc: usize,
  /// allocated decision cells with reference count zero
  dead: usize,
  auto: bool,
  /// dead-node threshold for collections in auto mode
  pub auto_gc_limit: usize }

impl RefBdd {

  pub fn new()->RefBdd {
    RefBdd {
      cells: vec![Cell::Term(false), Cell::Term(true)],
      rc: vec![0, 0],
      unique: FxHashMap::default(),
      memo: FxHashMap::default(),
      free: Vec::new(),
      alloc: 0,
      dead: 0,
      auto: false,
      auto_gc_limit: 1 << 14 }}

  /// hash-consed constructor; equal branches short-circuit, so the
  /// diagram stays reduced
  fn mk(&mut self, var: u32, hi: usize, lo: usize)->usize {
    if hi == lo { return hi }
    if let Some(&n) = self.unique.get(&(var, hi, lo)) { return n }
    let idx = match self.free.pop() {
      Some(i) => {
        self.cells[i] = Cell::Node { var, hi, lo };
        self.rc[i] = 0;
        i }
      None => {
        self.cells.push(Cell::Node { var, hi, lo });
        self.rc.push(0);
        self.cells.len() - 1 }};
    self.unique.insert((var, hi, lo), idx);
    self.alloc += 1;
    self.dead += 1;
    idx }

  fn expand(&self, n: usize)->(u32, usize, usize) {
    match self.cells[n] {
      Cell::Node { var, hi, lo } => (var, hi, lo),
      Cell::Term(_) => (u32::MAX, n, n),
      Cell::Free => panic!("dangling node handle {}", n) }}

  fn apply(&mut self, is_and: bool, a: usize, b: usize)->usize {
    if is_and {
      if a == 0 || b == 0 { return 0 }
      if a == 1 { return b }
      if b == 1 { return a }}
    else {
      if a == 1 || b == 1 { return 1 }
      if a == 0 { return b }
      if b == 0 { return a }}
    if a == b { return a }
    let key = (is_and, a.min(b), a.max(b));
    if let Some(&r) = self.memo.get(&key) { return r }
    let (va, ha, la) = self.expand(a);
    let (vb, hb, lb) = self.expand(b);
    let v = va.min(vb);
    let (ah, al) = if va == v { (ha, la) } else { (a, a) };
    let (bh, bl) = if vb == v { (hb, lb) } else { (b, b) };
    let h = self.apply(is_and, ah, bh);
    let l = self.apply(is_and, al, bl);
    let r = self.mk(v, h, l);
    self.memo.insert(key, r);
    r }

  /// mark from every referenced node (plus the given roots), sweep the
  /// rest into the free list, drop them from the unique table, and
  /// clear the apply cache
  fn collect(&mut self, protect: &[usize]) {
    let mut marked = vec![false; self.cells.len()];
    let mut stack: Vec<usize> = protect.to_vec();
    for (i, &rc) in self.rc.iter().enumerate() {
      if rc > 0 { stack.push(i) }}
    while let Some(n) = stack.pop() {
      if n < 2 || marked[n] { continue }
      marked[n] = true;
      if let Cell::Node { hi, lo, .. } = self.cells[n] {
        stack.push(hi);
        stack.push(lo); }}
    let mut swept = 0;
    for i in 2..self.cells.len() {
      if marked[i] { continue }
      if let Cell::Node { var, hi, lo } = self.cells[i] {
        self.unique.remove(&(var, hi, lo));
        self.cells[i] = Cell::Free;
        self.free.push(i);
        self.alloc -= 1;
        self.dead -= 1;
        swept += 1; }}
    self.memo.clear();
    debug!("collected {} nodes, {} still allocated", swept, self.alloc); }

  fn maybe_auto_collect(&mut self, protect: &[usize]) {
    if self.auto && self.dead >= self.auto_gc_limit {
      self.collect(protect); }}

  /// reachable decision nodes, children before parents
  fn reachable(&self, root: Bid)->Vec<usize> {
    let mut seen: FxHashSet<usize> = FxHashSet::default();
    let mut out = Vec::new();
    let mut stack = vec![(root.0, 0u8)];
    while let Some((n, state)) = stack.pop() {
      if seen.contains(&n) { continue }
      match self.cells[n] {
        Cell::Term(_) => { seen.insert(n); }
        Cell::Free => panic!("dangling node handle {}", n),
        Cell::Node { hi, lo, .. } => match state {
          0 => {
            stack.push((n, 1));
            stack.push((lo, 0));
            stack.push((hi, 0)); }
          _ => {
            seen.insert(n);
            out.push(n); }}}}
    out }

  pub fn node_count(&self, root: Bid)->usize { self.reachable(root).len() }

  pub fn ref_count(&self, n: Bid)->u32 { self.rc[n.0] }

  pub fn allocated(&self)->usize { self.alloc }

  pub fn is_model(&self, root: Bid, inst: &[u8])->bool {
    let mut n = root.0;
    loop {
      match self.cells[n] {
        Cell::Term(sign) => return sign,
        Cell::Free => panic!("dangling node handle {}", n),
        Cell::Node { var, hi, lo } =>
          n = if inst[var as usize] != 0 { hi } else { lo } }}}

  /// count satisfying assignments over variables `1..=var_count`,
  /// padding across the levels a reduced diagram skips
  pub fn model_count(&self, root: Bid, var_count: u32)->BigUint {
    // base[n]: count over the levels strictly below n's variable
    let mut base: FxHashMap<usize, BigUint> = FxHashMap::default();
    let from = |base: &FxHashMap<usize, BigUint>, m: usize, level: u32|->BigUint {
      match self.cells[m] {
        Cell::Term(false) => BigUint::zero(),
        Cell::Term(true) => BigUint::from(1u32) << (var_count + 1 - level) as usize,
        Cell::Node { var, .. } => &base[&m] << (var - level) as usize,
        Cell::Free => panic!("dangling node handle {}", m) }};
    for n in self.reachable(root) {
      if let Cell::Node { var, hi, lo } = self.cells[n] {
        let count = from(&base, hi, var + 1) + from(&base, lo, var + 1);
        base.insert(n, count); }}
    from(&base, root.0, 1) }}

impl Default for RefBdd { fn default()->Self { Self::new() }}

impl DecisionDiagramManager for RefBdd {
  type Node = Bid;

  fn literal(&mut self, lit: i64)->Bid {
    assert!(lit != 0, "literal 0 is not a variable");
    let var = lit.unsigned_abs() as u32;
    if lit > 0 { Bid(self.mk(var, 1, 0)) } else { Bid(self.mk(var, 0, 1)) }}

  fn top(&mut self)->Bid { Bid(1) }
  fn bot(&mut self)->Bid { Bid(0) }

  fn conjoin(&mut self, a: &Bid, b: &Bid)->Bid {
    self.maybe_auto_collect(&[a.0, b.0]);
    Bid(self.apply(true, a.0, b.0)) }

  fn disjoin(&mut self, a: &Bid, b: &Bid)->Bid {
    self.maybe_auto_collect(&[a.0, b.0]);
    Bid(self.apply(false, a.0, b.0)) }

  fn ref_node(&mut self, n: &Bid) {
    if n.is_terminal() { return }
    self.rc[n.0] += 1;
    if self.rc[n.0] == 1 { self.dead -= 1 }}

  fn deref_node(&mut self, n: &Bid) {
    if n.is_terminal() { return }
    assert!(self.rc[n.0] > 0, "deref of unreferenced node {}", n.0);
    self.rc[n.0] -= 1;
    if self.rc[n.0] == 0 { self.dead += 1 }}

  fn live_count(&self)->usize { self.alloc - self.dead }
  fn dead_count(&self)->usize { self.dead }

  fn garbage_collect(&mut self) { self.collect(&[]) }

  fn minimize_limited(&mut self) {
    debug!("minimize_limited: variable order is fixed, nothing to reorder"); }

  fn auto_gc_and_minimize_on(&mut self) { self.auto = true }
  fn auto_gc_and_minimize_off(&mut self) { self.auto = false }}

include!("test-dd.rs");
