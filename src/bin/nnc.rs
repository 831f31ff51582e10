//! command-line driver: read a (possibly hierarchical) nnf circuit,
//! flatten it, sanity-check the flattening, and rebuild the result in
//! the reference decision-diagram engine.
#[macro_use] extern crate log;
use std::env;
use simplelog::{Config, LevelFilter, TermLogger};
use nnc::{compile_nnf_by_depth, read_csv, DecisionDiagramManager,
          NnfManager, RefBdd, Result};

fn usage(prog: &str)-> ! {
  eprintln!("usage: {} NNF-FILENAME [DIGITS-OF-PRECISION] [DATASET-FILENAME]", prog);
  std::process::exit(1) }

/// xorshift64: enough randomness for a sanity check, no seed state to
/// carry between runs
fn xorshift(state: &mut u64)->u64 {
  let mut x = *state;
  x ^= x << 13;
  x ^= x >> 7;
  x ^= x << 17;
  *state = x;
  x }

fn main() {
  let _ = TermLogger::init(LevelFilter::Info, Config::default());
  let args: Vec<String> = env::args().collect();
  if !(2..=4).contains(&args.len()) { usage(&args[0]) }
  let precision: u32 = match args.get(2) {
    None => 4,
    Some(s) => match s.parse() { Ok(p) => p, Err(_) => usage(&args[0]) }};
  let dataset = args.get(3).map(|s| s.as_str());
  info!("nnc {}", env!("CARGO_PKG_VERSION"));
  if let Err(e) = run(&args[1], precision, dataset) {
    eprintln!("error: {}", e);
    std::process::exit(1); }}

fn run(nnf_filename: &str, precision: u32, dataset: Option<&str>)->Result<()> {
  info!("reading {}", nnf_filename);
  let (mut manager, nnf) = NnfManager::read(nnf_filename)?;
  info!("flattening with {} digit(s) of precision", precision);
  let flat = manager.flatten(&nnf, Some(precision))?;
  info!("{} node count", flat.node_count);
  info!("{} edge count", flat.edge_count);

  // the hierarchical circuit and its flattening must agree everywhere;
  // spot-check a batch of random instantiations
  let var_count = manager.var_count as usize;
  let mut state = 0x9e3779b97f4a7c15u64;
  let total = 100;
  let mut agree = 0;
  let mut positive = 0;
  for _ in 0..total {
    let inst: Vec<u8> = (0..=var_count).map(|_| (xorshift(&mut state) & 1) as u8).collect();
    let one = manager.is_model(nnf.root, &inst)?;
    let two = manager.is_model(flat.root, &inst)?;
    if one == two { agree += 1 }
    if one { positive += 1 }}
  info!("{}/{} agree", agree, total);
  info!("{}/{} positive", positive, total);

  let mut dd = RefBdd::new();
  let alpha = compile_nnf_by_depth(&manager, &flat, &mut dd)?;
  info!("{} compiled node count", dd.node_count(alpha));

  if let Some(path) = dataset {
    let rows = read_csv(path)?;
    let n = rows.len();
    let mut correct = 0;
    for row in &rows {
      let mut inst = vec![0u8; var_count + 1];
      for (i, &x) in row[..row.len() - 1].iter().enumerate() {
        if i < var_count { inst[i + 1] = u8::from(x != 0) }}
      let label = row[row.len() - 1] != 0;
      if manager.is_model(flat.root, &inst)? == label { correct += 1 }}
    info!("test accuracy: {}/{} = {:.4}", correct, n, correct as f64 / n as f64); }

  info!("live size: {}", dd.live_count());
  info!("dead size: {}", dd.dead_count());
  dd.garbage_collect();
  info!("after collecting: live {}, dead {}", dd.live_count(), dd.dead_count());
  Ok(()) }
