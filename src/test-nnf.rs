// nnf test suite

#[cfg(test)]
fn small_circuit(mgr: &mut NnfManager)->Gid {
  // and(or(x1, -x2), x3)
  let or = mgr.new_or(vec![mgr.literal(1), mgr.literal(-2)]);
  let l3 = mgr.literal(3);
  mgr.new_and(vec![or, l3]) }

#[cfg(test)]
fn all_insts(var_count: usize)->Vec<Vec<u8>> {
  (0..1u32 << var_count).map(|bits| {
    let mut inst = vec![0u8; var_count + 1];
    for v in 0..var_count { inst[v + 1] = ((bits >> v) & 1) as u8 }
    inst }).collect() }

#[test] fn test_terminals() {
  let mut mgr = NnfManager::new(2);
  assert!(mgr.is_true(mgr.true_gate()));
  assert!(mgr.is_false(mgr.false_gate()));
  assert_eq!(mgr.new_and(Vec::new()), mgr.true_gate());
  assert_eq!(mgr.new_or(Vec::new()), mgr.false_gate()) }

#[test] fn test_literal_table() {
  let mgr = NnfManager::new(3);
  assert!(mgr.is_input(mgr.literal(1)));
  assert_eq!(mgr.literal(-2), mgr.literal(-2));
  assert!(mgr.literal(2) != mgr.literal(-2));
  match mgr.gate(mgr.literal(-3)) {
    Gate::Literal { lit } => assert_eq!(*lit, -3),
    _ => panic!("expected a literal") }}

#[test] fn test_hash_consing() {
  let mut mgr = NnfManager::new(3);
  let (a, b) = (mgr.literal(1), mgr.literal(2));
  let g1 = mgr.new_and(vec![a, b]);
  let g2 = mgr.new_and(vec![b, a]);
  assert_eq!(g1, g2, "child order must not split equal gates");
  match mgr.gate(g1) {
    Gate::And { children } => {
      let mut sorted = children.clone();
      sorted.sort();
      assert_eq!(children, &sorted, "children stored in canonical order") }
    _ => panic!("expected an and gate") }}

#[test] fn test_or_dvar_outside_key() {
  let mut mgr = NnfManager::new(2);
  let (a, b) = (mgr.literal(1), mgr.literal(2));
  let g1 = mgr.new_or_with_dvar(1, vec![a, b]);
  let g2 = mgr.new_or_with_dvar(2, vec![a, b]);
  assert_eq!(g1, g2, "the decision variable never splits equal gates") }

#[test] fn test_empty_gate_models() {
  let mut mgr = NnfManager::new(2);
  let t = mgr.true_gate();
  let f = mgr.false_gate();
  assert!(mgr.is_model(t, &[0, 0, 0]).expect("eval"));
  assert!(!mgr.is_model(f, &[0, 1, 1]).expect("eval")) }

#[test] fn test_is_model() {
  let mut mgr = NnfManager::new(3);
  let root = small_circuit(&mut mgr);
  // satisfied by x3 and (x1 or not x2)
  assert!(mgr.is_model(root, &[0, 1, 0, 1]).expect("eval"));
  assert!(mgr.is_model(root, &[0, 0, 0, 1]).expect("eval"));
  assert!(!mgr.is_model(root, &[0, 0, 1, 1]).expect("eval"));
  assert!(!mgr.is_model(root, &[0, 1, 0, 0]).expect("eval")) }

#[test] fn test_negation_involution() {
  let mut mgr = NnfManager::new(3);
  let root = small_circuit(&mut mgr);
  let neg = mgr.negate(root).expect("negate");
  assert_eq!(mgr.negate(neg).expect("negate"), root);
  assert_eq!(mgr.negate(mgr.literal(1)).expect("negate"), mgr.literal(-1));
  for inst in all_insts(3) {
    assert_eq!(mgr.is_model(neg, &inst).expect("eval"),
               !mgr.is_model(root, &inst).expect("eval"),
               "assignment {:?}", inst) }}

#[test] fn test_negation_de_morgan() {
  let mut mgr = NnfManager::new(2);
  let root = mgr.new_and(vec![mgr.literal(1), mgr.literal(2)]);
  let neg = mgr.negate(root).expect("negate");
  match mgr.gate(neg) {
    Gate::Or { children, .. } => {
      assert_eq!(children, &vec![mgr.literal(-1), mgr.literal(-2)]) }
    _ => panic!("negated and must be an or") }}

#[test] fn test_negate_sub_fails() {
  let mut mgr = NnfManager::new(2);
  let s = mgr.new_sub(vec![mgr.literal(1)], "w.neuron");
  assert!(matches!(mgr.negate(s), Err(NncError::NotNegatable))) }

#[test] fn test_model_count_gap_scaling() {
  let mgr = NnfManager::new(3);
  let nnf = mgr.nnf(mgr.literal(1));
  // x1 alone leaves two variables free
  assert_eq!(mgr.model_count(&nnf).expect("count"), BigUint::from(4u32)) }

#[test] fn test_model_count_disjoint_or() {
  let mut mgr = NnfManager::new(2);
  let a = mgr.new_and(vec![mgr.literal(1), mgr.literal(2)]);
  let b = mgr.new_and(vec![mgr.literal(-1), mgr.literal(2)]);
  let root = mgr.new_or(vec![a, b]);
  let nnf = mgr.nnf(root);
  assert_eq!(mgr.model_count(&nnf).expect("count"), BigUint::from(2u32)) }

#[test] fn test_count_and_size() {
  let mut mgr = NnfManager::new(3);
  let root = small_circuit(&mut mgr);
  assert_eq!(mgr.count_and_size(root), (5, 4)) }

#[test] fn test_save_load_roundtrip() {
  let mut mgr = NnfManager::new(3);
  let root = small_circuit(&mut mgr);
  let nnf = mgr.nnf(root);
  let count = mgr.model_count(&nnf).expect("count");
  let path = std::env::temp_dir().join("nnc-test-roundtrip.nnf");
  let path = path.to_str().expect("temp path");
  mgr.save(path, &nnf).expect("save");
  let (back_mgr, back) = NnfManager::read(path).expect("read");
  assert_eq!((back.node_count, back.edge_count, back.var_count),
             (nnf.node_count, nnf.edge_count, nnf.var_count));
  assert_eq!(back_mgr.count_and_size(back.root),
             (nnf.node_count, nnf.edge_count));
  assert_eq!(back_mgr.model_count(&back).expect("count"), count) }

#[test] fn test_save_sub_fails() {
  let mut mgr = NnfManager::new(2);
  let s = mgr.new_sub(vec![mgr.literal(1), mgr.literal(2)], "w.neuron");
  let nnf = mgr.nnf(s);
  let path = std::env::temp_dir().join("nnc-test-sub.nnf");
  assert!(matches!(mgr.save(path.to_str().expect("temp path"), &nnf),
                   Err(NncError::UnsupportedPersistence))) }

#[test] fn test_parse_sub_line() {
  let text = "nnf 3 2 2\nL 1\nL 2\nS 2 0 1 0 w.neuron\n";
  let (mgr, nnf) = NnfManager::parse(text).expect("parse");
  match mgr.gate(nnf.root) {
    Gate::Sub { children, filename, .. } => {
      assert_eq!(children, &vec![mgr.literal(1), mgr.literal(2)]);
      assert_eq!(filename, "w.neuron") }
    _ => panic!("expected a sub-circuit gate") }}

#[test] fn test_parse_errors() {
  assert!(matches!(NnfManager::parse("nnf 1 0 1\nX 1\n"),
                   Err(NncError::UnknownGateType(_))));
  assert!(matches!(NnfManager::parse("cnf 1 0 1\nL 1\n"),
                   Err(NncError::Parse(_))));
  // header node count must match the file
  assert!(matches!(NnfManager::parse("nnf 2 0 1\nL 1\n"),
                   Err(NncError::Parse(_))));
  // literals must fit the declared variable count
  assert!(matches!(NnfManager::parse("nnf 1 0 1\nL 2\n"),
                   Err(NncError::Parse(_))));
  // children may only refer to earlier nodes
  assert!(matches!(NnfManager::parse("nnf 2 2 1\nA 1 1\nL 1\n"),
                   Err(NncError::Parse(_)))) }

#[test] fn test_nnf_to_cnf() {
  let mut mgr = NnfManager::new(3);
  let root = small_circuit(&mut mgr);
  let nnf = mgr.nnf(root);
  let cnf = mgr.nnf_to_cnf(&nnf).expect("encode");
  assert_eq!(cnf.var_count, 5, "two gate wires past the three variables");
  for inst in all_insts(3) {
    let or_val = inst[1] != 0 || inst[2] == 0;
    let and_val = or_val && inst[3] != 0;
    let mut model = Vec::new();
    for v in 1..=3i64 {
      model.push(if inst[v as usize] != 0 { v } else { -v }) }
    model.push(if or_val { 4 } else { -4 });
    model.push(if and_val { 5 } else { -5 });
    assert!(cnf.is_model(&model), "consistent wires satisfy the encoding");
    let flipped: Vec<i64> = model.iter()
      .map(|&l| if l.abs() == 5 { -l } else { l }).collect();
    assert!(!cnf.is_model(&flipped)) }}

#[test] fn test_nnf_to_cnf_sub_fails() {
  let mut mgr = NnfManager::new(1);
  let s = mgr.new_sub(vec![mgr.literal(1)], "w.neuron");
  let nnf = mgr.nnf(s);
  assert!(matches!(mgr.nnf_to_cnf(&nnf), Err(NncError::UnsupportedPersistence))) }

#[test] fn test_prime_ref_count() {
  let mut mgr = NnfManager::new(3);
  let shared = mgr.new_or(vec![mgr.literal(1), mgr.literal(2)]);
  let inner = mgr.new_or(vec![shared, mgr.literal(-3)]);
  let root = mgr.new_and(vec![shared, inner]);
  let rc = mgr.prime_ref_count(root).expect("prime");
  assert_eq!(rc[shared.id()], 2, "one ref per parent edge");
  assert_eq!(rc[inner.id()], 1);
  assert_eq!(rc[root.id()], 1, "the root gets the caller's ref") }

#[test] fn test_sub_unknown_extension() {
  let mut mgr = NnfManager::new(1);
  let s = mgr.new_sub(vec![mgr.literal(1)], "circuit.xyz");
  assert!(matches!(mgr.is_model(s, &[0, 1]),
                   Err(NncError::UnsupportedExtension(_)))) }

#[cfg(test)]
fn write_and_neuron(filename: &str)->String {
  let path = std::env::temp_dir().join(filename);
  std::fs::write(&path, "name: and\nsize: 2\nweights: 1 1\nthreshold: 2\n")
    .expect("write neuron");
  path.to_str().expect("temp path").to_string() }

#[test] fn test_sub_is_model() {
  let neuron = write_and_neuron("nnc-test-sub-is-model.neuron");
  let mut mgr = NnfManager::new(2);
  let inputs = vec![mgr.literal(1), mgr.literal(2)];
  let s = mgr.new_sub(inputs, &neuron);
  let root = mgr.new_and(vec![s]);
  assert!(mgr.is_model(root, &[0, 1, 1]).expect("eval"));
  assert!(!mgr.is_model(root, &[0, 1, 0]).expect("eval"));
  assert!(!mgr.is_model(root, &[0, 0, 1]).expect("eval")) }

#[test] fn test_flatten_inlines_neuron() {
  let neuron = write_and_neuron("nnc-test-flatten.neuron");
  let mut mgr = NnfManager::new(2);
  let inputs = vec![mgr.literal(1), mgr.literal(2)];
  let s = mgr.new_sub(inputs, &neuron);
  let root = mgr.new_and(vec![s]);
  let nnf = mgr.nnf(root);
  let flat = mgr.flatten(&nnf, Some(1)).expect("flatten");
  // the flattened circuit is a plain and/or circuit computing x1 and x2
  assert_eq!(mgr.model_count(&flat).expect("count"), BigUint::one());
  for inst in all_insts(2) {
    assert_eq!(mgr.is_model(flat.root, &inst).expect("eval"),
               mgr.is_model(nnf.root, &inst).expect("eval"),
               "assignment {:?}", inst) }}

#[test] fn test_flatten_negative_sub_literals() {
  // a neuron rejecting its single input compiles to a negated wire
  let path = std::env::temp_dir().join("nnc-test-not.neuron");
  std::fs::write(&path, "name: not\nsize: 1\nweights: -1\nthreshold: 0\n")
    .expect("write neuron");
  let mut mgr = NnfManager::new(1);
  let s = mgr.new_sub(vec![mgr.literal(1)], path.to_str().expect("temp path"));
  let nnf = mgr.nnf(s);
  let flat = mgr.flatten(&nnf, Some(1)).expect("flatten");
  assert!(mgr.is_model(flat.root, &[0, 0]).expect("eval"));
  assert!(!mgr.is_model(flat.root, &[0, 1]).expect("eval")) }

#[test] fn test_flatten_without_subs_is_stable() {
  let mut mgr = NnfManager::new(3);
  let root = small_circuit(&mut mgr);
  let nnf = mgr.nnf(root);
  let flat = mgr.flatten(&nnf, None).expect("flatten");
  assert_eq!(flat.root, nnf.root, "hash-consing keeps untouched gates shared") }
