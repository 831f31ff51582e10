// obdd test suite

#[cfg(test)] use crate::linear::Classifier;

#[cfg(test)]
fn compile_neuron(text: &str, digits: u32)->(ObddManager, Oid) {
  let c = Classifier::parse(text).expect("parse");
  let d = c.with_precision(digits).expect("precision");
  d.compile().expect("compile") }

#[test] fn test_unique_table() {
  let mut mgr = ObddManager::new(2);
  let (one, zero) = (mgr.one_sink(), mgr.zero_sink());
  let a = mgr.new_node(2, one, zero);
  let b = mgr.new_node(2, one, zero);
  assert_eq!(a, b, "equal triples must share a node");
  let c = mgr.new_node(2, zero, one);
  assert!(a != c);
  // hi == lo still allocates a decision; reduction is a separate step
  let d = mgr.new_node(1, a, a);
  assert!(d.is_decision()) }

#[test] fn test_post_order() {
  let mut mgr = ObddManager::new(2);
  let (one, zero) = (mgr.one_sink(), mgr.zero_sink());
  let x2 = mgr.new_node(2, one, zero);
  let root = mgr.new_node(1, one, x2);
  let order: Vec<Oid> = mgr.post_order(root).collect();
  assert_eq!(order, vec![one, zero, x2, root],
             "children before parents, hi subtree before lo") }

#[test] fn test_neuron_two_of_weight_one() {
  let (mut mgr, root) = compile_neuron(
    "name: t\nsize: 2\nweights: 1 1\nthreshold: 1\n", 1);
  let before = mgr.post_order(root).count();
  let root = mgr.reduce(root);
  let after = mgr.post_order(root).count();
  assert!(after < before, "reduction must drop the redundant decision");
  match mgr.node(root) {
    ObddNode::Decision { dvar, hi, lo } => {
      assert_eq!(dvar, 1);
      assert!(hi.is_true());
      match mgr.node(lo) {
        ObddNode::Decision { dvar, hi, lo } => {
          assert_eq!(dvar, 2);
          assert!(hi.is_true());
          assert!(lo.is_false()) }
        _ => panic!("expected a decision on x2 under the root") }}
    _ => panic!("expected a decision on x1 at the root") }
  assert_eq!(mgr.model_count(root, 2), BigUint::from(3u32));
  let models: Vec<_> = mgr.models(root).collect();
  assert_eq!(models, vec![vec![(1, 1)], vec![(1, 0), (2, 1)]]);
  let non_models: Vec<_> = mgr.non_models(root).collect();
  assert_eq!(non_models, vec![vec![(1, 0), (2, 0)]]) }

#[test] fn test_majority_neuron() {
  let (mut mgr, root) = compile_neuron(
    "name: maj\nsize: 3\nweights: 1 1 1\nthreshold: 2\n", 1);
  assert_eq!(mgr.count(root), 6, "one decision per reachable partial sum");
  let root = mgr.reduce(root);
  assert_eq!(mgr.model_count(root, 3), BigUint::from(4u32)) }

#[test] fn test_ordering_invariant() {
  let (mgr, root) = compile_neuron(
    "name: w\nsize: 4\nweights: 2 -1 3 1\nthreshold: 2\n", 1);
  for n in mgr.post_order(root) {
    if let ObddNode::Decision { dvar, hi, lo } = mgr.node(n) {
      for branch in [hi, lo] {
        match mgr.node(branch) {
          ObddNode::Terminal { .. } => {}
          ObddNode::Decision { dvar: d, .. } =>
            assert!(d > dvar, "branch variable must sit strictly below") }}}}}

#[test] fn test_zero_weights() {
  let (mut mgr, root) = compile_neuron(
    "name: z\nsize: 2\nweights: 0 0\nthreshold: 0\n", 1);
  let root = mgr.reduce(root);
  assert!(root.is_true());
  assert_eq!(mgr.model_count(root, 2), BigUint::from(4u32)) }

#[test] fn test_unreachable_threshold() {
  let (mut mgr, root) = compile_neuron(
    "name: u\nsize: 2\nweights: 1 1\nthreshold: 3\n", 1);
  let root = mgr.reduce(root);
  assert!(root.is_false());
  assert_eq!(mgr.model_count(root, 2), BigUint::from(0u32)) }

#[test] fn test_reduce_fixpoint() {
  let (mut mgr, root) = compile_neuron(
    "name: maj\nsize: 3\nweights: 1 1 1\nthreshold: 2\n", 1);
  let r1 = mgr.reduce(root);
  let r2 = mgr.reduce(r1);
  assert_eq!(r1, r2) }

#[test] fn test_is_model() {
  let (mut mgr, root) = compile_neuron(
    "name: t\nsize: 2\nweights: 1 1\nthreshold: 1\n", 1);
  let root = mgr.reduce(root);
  assert!(mgr.is_model(root, &[0, 1, 0]));
  assert!(mgr.is_model(root, &[0, 0, 1]));
  assert!(mgr.is_model(root, &[0, 1, 1]));
  assert!(!mgr.is_model(root, &[0, 0, 0])) }

#[test] fn test_quantization_preserves_models() {
  let c = Classifier::parse("size: 3\nweights: 2 -3 5\nthreshold: 1\n")
    .expect("parse");
  let mut expected = None;
  for digits in 1..=4 {
    let d = c.with_precision(digits).expect("precision");
    let (mut mgr, root) = d.compile().expect("compile");
    let root = mgr.reduce(root);
    let count = mgr.model_count(root, 3);
    if let Some(e) = &expected { assert_eq!(&count, e, "digits = {}", digits) }
    else { expected = Some(count) }}}

#[test] fn test_obdd_to_nnf_agrees() {
  let (mgr, root) = compile_neuron(
    "name: t\nsize: 2\nweights: 1 1\nthreshold: 1\n", 1);
  let (mut nmgr, nnf) = mgr.obdd_to_nnf(root);
  assert_eq!(nmgr.model_count(&nnf).expect("count"), mgr.model_count(root, 2));
  for bits in 0..4u8 {
    let inst = [0, bits & 1, (bits >> 1) & 1];
    assert_eq!(nmgr.is_model(nnf.root, &inst).expect("eval"),
               mgr.is_model(root, &inst),
               "assignment {:?}", inst) }}

#[test] fn test_obdd_to_cnf() {
  let (mut mgr, root) = compile_neuron(
    "name: t\nsize: 2\nweights: 1 1\nthreshold: 1\n", 1);
  let root = mgr.reduce(root);
  let (cnf, out_wire) = mgr.obdd_to_cnf(root, 3);
  assert_eq!(cnf.var_count, out_wire);
  for bits in 0..4u8 {
    let inst = [0, bits & 1, (bits >> 1) & 1];
    let mut model = vec![
      if inst[1] != 0 { 1 } else { -1 },
      if inst[2] != 0 { 2 } else { -2 }];
    for (i, n) in mgr.post_order(root).enumerate() {
      let wire = 3 + i as i64;
      model.push(if mgr.is_model(n, &inst) { wire } else { -wire }); }
    assert!(cnf.is_model(&model), "consistent wires satisfy the cnf");
    // flipping the output wire breaks its defining clauses
    let flipped: Vec<i64> = model.iter()
      .map(|&l| if l.abs() == out_wire { -l } else { l }).collect();
    assert!(!cnf.is_model(&flipped)) }}

#[test] fn test_save_vtree() {
  let mgr = ObddManager::new(3);
  let path = std::env::temp_dir().join("nnc-test.vtree");
  let path = path.to_str().expect("temp path");
  mgr.save_vtree(path).expect("save");
  assert_eq!(std::fs::read_to_string(path).expect("read"),
             "vtree 5\nL 0 1\nL 2 2\nL 4 3\nI 3 2 4\nI 1 0 3\n") }

#[test] fn test_save_sdd() {
  let (mut mgr, root) = compile_neuron(
    "name: t\nsize: 2\nweights: 1 1\nthreshold: 1\n", 1);
  let root = mgr.reduce(root);
  let path = std::env::temp_dir().join("nnc-test.sdd");
  let path = path.to_str().expect("temp path");
  mgr.save_sdd(path, root).expect("save");
  assert_eq!(std::fs::read_to_string(path).expect("read"),
             "sdd 7\nL 0 0 -1\nL 1 0 1\nL 2 2 -2\nL 3 2 2\nT 4\nF 5\nD 6 1 2 1 4 0 3\n") }
