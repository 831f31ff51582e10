//! Rebuilding an nnf circuit inside an external decision-diagram
//! manager, under several reference-counting and garbage-collection
//! policies.
//!
//! All strategies share one skeleton: post-order the circuit, hold each
//! gate's compiled diagram in a payload table, fold and/or gates with
//! the manager's conjoin/disjoin. They differ in when diagrams are
//! ref'd, deref'd, and when the manager is asked to collect garbage.
//! Every strategy returns the root diagram with a net reference count
//! of zero; callers wanting to retain it must ref it themselves.
use fxhash::FxHashMap;
use crate::errors::{NncError, Result};
use crate::nnf::{Gate, Gid, Nnf, NnfManager};

/// The contract an external decision-diagram engine must satisfy.
/// Handles are cheap opaque ids; `conjoin`/`disjoin` may trigger the
/// engine's own housekeeping internally.
pub trait DecisionDiagramManager {
  type Node: Clone + PartialEq;
  fn literal(&mut self, lit: i64)->Self::Node;
  fn top(&mut self)->Self::Node;
  fn bot(&mut self)->Self::Node;
  fn conjoin(&mut self, a: &Self::Node, b: &Self::Node)->Self::Node;
  fn disjoin(&mut self, a: &Self::Node, b: &Self::Node)->Self::Node;
  fn ref_node(&mut self, n: &Self::Node);
  fn deref_node(&mut self, n: &Self::Node);
  fn live_count(&self)->usize;
  fn dead_count(&self)->usize;
  fn garbage_collect(&mut self);
  fn minimize_limited(&mut self);
  fn auto_gc_and_minimize_on(&mut self);
  fn auto_gc_and_minimize_off(&mut self); }

/// compilation progress reporting, throttled so large runs log at a
/// useful rate near the end
struct Progress { total: usize, count: usize }

impl Progress {
  fn new(total: usize)->Progress {
    info!("compiling {} gates", total);
    Progress { total, count: 0 }}
  fn update(&mut self) {
    self.count += 1;
    let (c, t) = (self.count, self.total);
    if c * 1000 >= t * 999
      || (c * 100 >= t * 99 && c % 50 == 0)
      || (c * 10 >= t * 9 && c % 500 == 0)
      || c % 5000 == 0 {
      debug!("compiled {}/{} gates", c, t) }}}

fn unsupported_gate()->NncError {
  NncError::UnknownGateType(
    "sub-circuit gates must be flattened before compiling".to_string()) }

/// plain strategy: no reference counting, no collection. best for
/// small circuits where the manager never needs to reclaim anything.
pub fn compile_nnf<M: DecisionDiagramManager>(
    mgr: &NnfManager, nnf: &Nnf, dd: &mut M)->Result<M::Node> {
  let order = mgr.post_order(nnf.root);
  let mut v = Progress::new(order.len());
  let mut data: FxHashMap<Gid, M::Node> = FxHashMap::default();
  for g in order {
    let alpha = match mgr.gate(g) {
      Gate::Literal { lit } => dd.literal(*lit),
      Gate::And { children } => {
        let mut alpha = dd.top();
        for c in children { alpha = dd.conjoin(&alpha, &data[c]) }
        alpha }
      Gate::Or { children, .. } => {
        let mut alpha = dd.bot();
        for c in children { alpha = dd.disjoin(&alpha, &data[c]) }
        alpha }
      Gate::Sub { .. } => return Err(unsupported_gate()) };
    data.insert(g, alpha);
    v.update(); }
  Ok(data.remove(&nnf.root).expect("root compiled last")) }

/// automatic strategy: primed ref counts keep each compiled gate alive
/// exactly as long as a parent still needs it, and the manager's own
/// gc/minimize machinery runs throughout.
pub fn compile_nnf_automatic<M: DecisionDiagramManager>(
    mgr: &NnfManager, nnf: &Nnf, dd: &mut M)->Result<M::Node> {
  let rc = mgr.prime_ref_count(nnf.root)?;
  dd.auto_gc_and_minimize_on();
  let result = compile_counted(mgr, nnf, dd, &rc, &mut |_: &mut M| {});
  dd.auto_gc_and_minimize_off();
  let alpha = result?;
  dd.deref_node(&alpha);
  Ok(alpha) }

/// manual strategy: same ref discipline, but collection is triggered
/// from out here whenever the dead count doubles past a threshold, and
/// minimization likewise on the live count.
pub fn compile_nnf_manual<M: DecisionDiagramManager>(
    mgr: &NnfManager, nnf: &Nnf, dd: &mut M)->Result<M::Node> {
  let rc = mgr.prime_ref_count(nnf.root)?;
  let mut gc_last_size = 34000;
  let mut min_last_size = 34000;
  let alpha = compile_counted(mgr, nnf, dd, &rc, &mut |dd: &mut M| {
    if dd.dead_count() >= 2 * gc_last_size {
      gc_last_size *= 2;
      debug!("garbage collecting at {} dead nodes", dd.dead_count());
      dd.garbage_collect(); }
    if dd.live_count() >= 2 * min_last_size {
      min_last_size *= 2;
      debug!("minimizing at {} live nodes", dd.live_count());
      dd.minimize_limited(); }})?;
  dd.deref_node(&alpha);
  Ok(alpha) }

/// shared skeleton for the counted strategies: compile each gate,
/// deref children as they are consumed, ref the result once per
/// primed reference, then let the policy hook run.
fn compile_counted<M: DecisionDiagramManager>(
    mgr: &NnfManager, nnf: &Nnf, dd: &mut M, rc: &[u32],
    policy: &mut dyn FnMut(&mut M))->Result<M::Node> {
  let order = mgr.post_order(nnf.root);
  let mut v = Progress::new(order.len());
  let mut data: FxHashMap<Gid, M::Node> = FxHashMap::default();
  for g in order {
    let alpha = match mgr.gate(g) {
      Gate::Literal { lit } => dd.literal(*lit),
      Gate::And { children } => {
        let mut alpha = dd.top();
        for c in children {
          alpha = dd.conjoin(&alpha, &data[c]);
          dd.deref_node(&data[c]); }
        alpha }
      Gate::Or { children, .. } => {
        let mut alpha = dd.bot();
        for c in children {
          alpha = dd.disjoin(&alpha, &data[c]);
          dd.deref_node(&data[c]); }
        alpha }
      Gate::Sub { .. } => return Err(unsupported_gate()) };
    for _ in 0..rc[g.id()] { dd.ref_node(&alpha) }
    data.insert(g, alpha);
    policy(dd);
    v.update(); }
  Ok(data.remove(&nnf.root).expect("root compiled last")) }

/// recursive strategy: the fold accumulator is ref'd around each child
/// descent so partial conjunctions survive any collection the descent
/// triggers. suited to deep circuits.
pub fn compile_nnf_recursive<M: DecisionDiagramManager>(
    mgr: &NnfManager, nnf: &Nnf, dd: &mut M)->Result<M::Node> {
  let rc = mgr.prime_ref_count(nnf.root)?;
  let mut v = Progress::new(mgr.count(nnf.root));
  dd.auto_gc_and_minimize_on();
  let mut data: FxHashMap<Gid, M::Node> = FxHashMap::default();
  let result = compile_recursive_step(mgr, nnf.root, dd, &rc, &mut data, &mut v);
  dd.auto_gc_and_minimize_off();
  let alpha = result?;
  dd.deref_node(&alpha);
  Ok(alpha) }

fn compile_recursive_step<M: DecisionDiagramManager>(
    mgr: &NnfManager, g: Gid, dd: &mut M, rc: &[u32],
    data: &mut FxHashMap<Gid, M::Node>, v: &mut Progress)->Result<M::Node> {
  if let Some(alpha) = data.get(&g) { return Ok(alpha.clone()) }
  enum Fold { Lit(i64), Conjoin(Vec<Gid>), Disjoin(Vec<Gid>) }
  let fold = match mgr.gate(g) {
    Gate::Literal { lit } => Fold::Lit(*lit),
    Gate::And { children } => Fold::Conjoin(children.clone()),
    Gate::Or { children, .. } => Fold::Disjoin(children.clone()),
    Gate::Sub { .. } => return Err(unsupported_gate()) };
  let alpha = match fold {
    Fold::Lit(lit) => dd.literal(lit),
    Fold::Conjoin(children) => {
      let mut alpha = dd.top();
      for c in children {
        dd.ref_node(&alpha);
        let beta = compile_recursive_step(mgr, c, dd, rc, data, v)?;
        dd.deref_node(&alpha);
        alpha = dd.conjoin(&alpha, &beta);
        dd.deref_node(&beta); }
      alpha }
    Fold::Disjoin(children) => {
      let mut alpha = dd.bot();
      for c in children {
        dd.ref_node(&alpha);
        let beta = compile_recursive_step(mgr, c, dd, rc, data, v)?;
        dd.deref_node(&alpha);
        alpha = dd.disjoin(&alpha, &beta);
        dd.deref_node(&beta); }
      alpha }};
  v.update();
  for _ in 0..rc[g.id()] { dd.ref_node(&alpha) }
  data.insert(g, alpha.clone());
  Ok(alpha) }

/// longest directed distance from the root for every reachable gate
fn label_depths(mgr: &NnfManager, root: Gid)->FxHashMap<Gid, usize> {
  let mut depth: FxHashMap<Gid, usize> = FxHashMap::default();
  let mut stack = vec![(root, 0usize)];
  while let Some((g, d)) = stack.pop() {
    if let Some(&cur) = depth.get(&g) {
      if cur >= d { continue }}
    depth.insert(g, d);
    for &c in mgr.children(g) { stack.push((c, d + 1)) }}
  depth }

/// group gates by depth, deepest first. within a bucket gates keep
/// their traversal order so repeated runs are identical.
fn bucket_by_depth(mgr: &NnfManager, root: Gid)->Vec<Vec<Gid>> {
  let depth = label_depths(mgr, root);
  let deepest = depth.values().copied().max().unwrap_or(0);
  let mut buckets: Vec<Vec<Gid>> = vec![Vec::new(); deepest + 1];
  for g in mgr.post_order(root) { buckets[depth[&g]].push(g) }
  buckets }

/// by-depth strategy: process the deepest bucket first, so every child
/// diagram exists, and is about to be consumed exactly once, when its
/// parent's bucket comes up. collection thresholds are fixed rather
/// than doubled.
pub fn compile_nnf_by_depth<M: DecisionDiagramManager>(
    mgr: &NnfManager, nnf: &Nnf, dd: &mut M)->Result<M::Node> {
  let rc = mgr.prime_ref_count(nnf.root)?;
  let gc_limit = 1 << 15;
  let min_limit = 1 << 15;
  let buckets = bucket_by_depth(mgr, nnf.root);
  let mut v = Progress::new(buckets.iter().map(|b| b.len()).sum());
  let mut data: FxHashMap<Gid, M::Node> = FxHashMap::default();
  for (depth, bucket) in buckets.iter().enumerate().rev() {
    debug!("depth {}: {} gates", depth, bucket.len());
    for &g in bucket {
      let alpha = match mgr.gate(g) {
        Gate::Literal { lit } => dd.literal(*lit),
        Gate::And { children } => {
          let mut alpha = dd.top();
          for c in children {
            alpha = dd.conjoin(&alpha, &data[c]);
            dd.deref_node(&data[c]); }
          alpha }
        Gate::Or { children, .. } => {
          let mut alpha = dd.bot();
          for c in children {
            alpha = dd.disjoin(&alpha, &data[c]);
            dd.deref_node(&data[c]); }
          alpha }
        Gate::Sub { .. } => return Err(unsupported_gate()) };
      for _ in 0..rc[g.id()] { dd.ref_node(&alpha) }
      data.insert(g, alpha);
      if dd.dead_count() >= 2 * gc_limit {
        debug!("garbage collecting: {} live, {} dead", dd.live_count(), dd.dead_count());
        dd.garbage_collect(); }
      if dd.live_count() >= 2 * min_limit {
        debug!("minimizing: {} live, {} dead", dd.live_count(), dd.dead_count());
        dd.minimize_limited(); }
      v.update(); }}
  let alpha = data.remove(&nnf.root).expect("root sits in the depth-0 bucket");
  dd.deref_node(&alpha);
  Ok(alpha) }

include!("test-compile.rs");
