// compilation driver test suite: every strategy rebuilds the same
// circuits in the reference engine and must agree on the result

#[cfg(test)] use crate::dd::RefBdd;
#[cfg(test)] use crate::linear::Classifier;
#[cfg(test)] use num_bigint::BigUint;

#[cfg(test)]
fn neuron_nnf(text: &str)->(NnfManager, Nnf) {
  let c = Classifier::parse(text).expect("parse");
  let d = c.with_precision(1).expect("precision");
  let (omgr, root) = d.compile().expect("compile");
  omgr.obdd_to_nnf(root) }

#[cfg(test)]
fn xor_like()->(NnfManager, Nnf) {
  neuron_nnf("name: t\nsize: 2\nweights: 1 1\nthreshold: 1\n") }

#[cfg(test)]
fn majority_five()->(NnfManager, Nnf) {
  neuron_nnf("name: maj\nsize: 5\nweights: 1 1 1 1 1\nthreshold: 3\n") }

#[test] fn test_compile_plain() {
  let (mgr, nnf) = xor_like();
  let mut dd = RefBdd::new();
  let alpha = compile_nnf(&mgr, &nnf, &mut dd).expect("compile");
  assert_eq!(dd.model_count(alpha, 2), BigUint::from(3u32)) }

#[test] fn test_compile_automatic() {
  let (mgr, nnf) = xor_like();
  let mut dd = RefBdd::new();
  let alpha = compile_nnf_automatic(&mgr, &nnf, &mut dd).expect("compile");
  assert_eq!(dd.model_count(alpha, 2), BigUint::from(3u32));
  assert_eq!(dd.ref_count(alpha), 0, "the returned root carries no net reference") }

#[test] fn test_compile_manual() {
  let (mgr, nnf) = majority_five();
  let mut dd = RefBdd::new();
  let alpha = compile_nnf_manual(&mgr, &nnf, &mut dd).expect("compile");
  assert_eq!(dd.model_count(alpha, 5), BigUint::from(16u32));
  assert_eq!(dd.ref_count(alpha), 0) }

#[test] fn test_compile_recursive() {
  let (mgr, nnf) = majority_five();
  let mut dd = RefBdd::new();
  let alpha = compile_nnf_recursive(&mgr, &nnf, &mut dd).expect("compile");
  assert_eq!(dd.model_count(alpha, 5), BigUint::from(16u32));
  assert_eq!(dd.ref_count(alpha), 0) }

#[test] fn test_compile_by_depth() {
  let (mgr, nnf) = majority_five();
  let mut dd = RefBdd::new();
  let alpha = compile_nnf_by_depth(&mgr, &nnf, &mut dd).expect("compile");
  assert_eq!(dd.model_count(alpha, 5), BigUint::from(16u32));
  assert_eq!(dd.ref_count(alpha), 0) }

#[test] fn test_strategies_agree() {
  let (mgr, nnf) = majority_five();
  let strategies: [fn(&NnfManager, &Nnf, &mut RefBdd)->Result<crate::dd::Bid>; 5] =
    [compile_nnf, compile_nnf_automatic, compile_nnf_manual,
     compile_nnf_recursive, compile_nnf_by_depth];
  let mut counts = Vec::new();
  for strategy in strategies {
    let mut dd = RefBdd::new();
    let alpha = strategy(&mgr, &nnf, &mut dd).expect("compile");
    counts.push(dd.model_count(alpha, 5)); }
  assert!(counts.windows(2).all(|w| w[0] == w[1]), "counts: {:?}", counts) }

#[test] fn test_compile_automatic_under_gc_pressure() {
  let (mgr, nnf) = majority_five();
  let mut dd = RefBdd::new();
  // collect on almost every operation: the ref discipline alone must
  // keep every payload diagram alive
  dd.auto_gc_limit = 1;
  let alpha = compile_nnf_automatic(&mgr, &nnf, &mut dd).expect("compile");
  assert_eq!(dd.model_count(alpha, 5), BigUint::from(16u32)) }

#[test] fn test_compile_recursive_under_gc_pressure() {
  let (mgr, nnf) = majority_five();
  let mut dd = RefBdd::new();
  dd.auto_gc_limit = 1;
  let alpha = compile_nnf_recursive(&mgr, &nnf, &mut dd).expect("compile");
  assert_eq!(dd.model_count(alpha, 5), BigUint::from(16u32)) }

#[test] fn test_retaining_the_root_across_collection() {
  let (mgr, nnf) = xor_like();
  let mut dd = RefBdd::new();
  let alpha = compile_nnf_automatic(&mgr, &nnf, &mut dd).expect("compile");
  dd.ref_node(&alpha);
  dd.garbage_collect();
  assert_eq!(dd.model_count(alpha, 2), BigUint::from(3u32)) }

#[test] fn test_compile_rejects_sub() {
  let mut mgr = NnfManager::new(1);
  let s = mgr.new_sub(vec![mgr.literal(1)], "w.neuron");
  let nnf = mgr.nnf(s);
  let mut dd = RefBdd::new();
  assert!(matches!(compile_nnf(&mgr, &nnf, &mut dd),
                   Err(NncError::UnknownGateType(_))));
  assert!(matches!(compile_nnf_automatic(&mgr, &nnf, &mut dd),
                   Err(NncError::UnknownGateType(_)))) }

#[test] fn test_depth_buckets() {
  let mut mgr = NnfManager::new(3);
  let shared = mgr.new_or(vec![mgr.literal(1), mgr.literal(2)]);
  let inner = mgr.new_and(vec![shared, mgr.literal(3)]);
  let root = mgr.new_or(vec![shared, inner]);
  let depth = label_depths(&mgr, root);
  assert_eq!(depth[&root], 0);
  assert_eq!(depth[&inner], 1);
  assert_eq!(depth[&shared], 2, "shared gates take their longest distance");
  assert_eq!(depth[&mgr.literal(1)], 3);
  let buckets = bucket_by_depth(&mgr, root);
  assert_eq!(buckets.len(), 4);
  assert_eq!(buckets[0], vec![root]) }
