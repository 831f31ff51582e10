//! benchmarks for the threshold compiler and the nnf rebuild driver
use nnc::{compile_nnf_by_depth, Classifier, RefBdd};

fn main() { divan::main() }

fn majority(n: usize, t: i64)->String {
  format!("name: majority\nsize: {}\nweights: {}\nthreshold: {}\n",
          n, vec!["1"; n].join(" "), t) }

#[divan::bench]
fn threshold_to_obdd() {
  let c = Classifier::parse(&majority(15, 8)).expect("parse");
  let d = c.with_precision(2).expect("precision");
  let (mut mgr, root) = d.compile().expect("compile");
  divan::black_box(mgr.reduce(root)); }

#[divan::bench]
fn nnf_rebuild_by_depth() {
  let c = Classifier::parse(&majority(12, 6)).expect("parse");
  let d = c.with_precision(2).expect("precision");
  let (omgr, root) = d.compile().expect("compile");
  let (nmgr, nnf) = omgr.obdd_to_nnf(root);
  let mut dd = RefBdd::new();
  divan::black_box(compile_nnf_by_depth(&nmgr, &nnf, &mut dd).expect("compile")); }
