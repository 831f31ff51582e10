//! CSV dataset loading: one example per line, comma-separated integers,
//! last column is the label.
use std::fs::File;
use std::io::{BufRead, BufReader};
use crate::errors::{NncError, Result};

pub fn read_csv(path: &str) -> Result<Vec<Vec<i64>>> {
  let f = File::open(path)?;
  let mut dataset = Vec::new();
  for line in BufReader::new(f).lines() {
    let line = line?;
    let line = line.trim();
    if line.is_empty() { continue }
    let row: Vec<i64> = line.split(',')
      .map(|s| s.trim().parse()
        .map_err(|_| NncError::Parse(format!("bad csv value: {:?}", s))))
      .collect::<Result<Vec<i64>>>()?;
    dataset.push(row); }
  Ok(dataset) }

#[test] fn test_read_csv() {
  let path = std::env::temp_dir().join("nnc-test-data.csv");
  let path = path.to_str().expect("temp path");
  std::fs::write(path, "1,0,1\n0,0,0\n").expect("write");
  let rows = read_csv(path).expect("read");
  assert_eq!(rows, vec![vec![1, 0, 1], vec![0, 0, 0]]); }
