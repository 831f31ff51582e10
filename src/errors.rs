//! Error taxonomy shared by every compilation path.
//!
//! Every error is fatal to the compilation that raised it; there is no
//! retry or partial-result recovery. I/O errors pass through unchanged.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NncError {
  #[error("parse error: {0}")]
  Parse(String),
  #[error("quantization error: {0}")]
  Quantization(String),
  #[error("unknown gate type: {0}")]
  UnknownGateType(String),
  #[error("sub-circuit gates cannot be negated")]
  NotNegatable,
  #[error("unknown sub-circuit extension: {0}")]
  UnsupportedExtension(String),
  #[error("circuits containing sub-circuit gates cannot be persisted; flatten first")]
  UnsupportedPersistence,
  #[error("invariant violation: {0}")]
  InvariantViolation(String),
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, NncError>;

#[test] fn test_error_display() {
  let e = NncError::Parse("bad header".to_string());
  assert_eq!(format!("{}", e), "parse error: bad header");
  assert_eq!(format!("{}", NncError::NotNegatable),
             "sub-circuit gates cannot be negated"); }
