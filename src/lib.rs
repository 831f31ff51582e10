//! A crate for compiling threshold neurons and nnf circuits into
//! decision diagrams.
//!
//! The pipeline: parse a neuron, quantize its weights, compile the
//! threshold function to an obdd, convert that to an nnf circuit,
//! flatten hierarchical circuits whose leaves are themselves neurons,
//! and rebuild the result inside a reference-counted decision-diagram
//! manager.

#[macro_use] extern crate log;

/// Error taxonomy shared by every compilation path.
pub mod errors;
pub use errors::{NncError, Result};

/// Linear threshold classifiers (neurons) and the threshold compiler.
pub mod linear;
pub use linear::Classifier;

/// Ordered binary decision diagrams and their exporters.
pub mod obdd;
pub use obdd::{ObddManager, ObddNode, Oid};

/// NNF circuits: hash-consed gates, queries, flattening, text format.
pub mod nnf;
pub use nnf::{Gate, Gid, Nnf, NnfManager};

/// CNF clause sets in DIMACS form.
pub mod cnf;
pub use cnf::Cnf;

/// Rebuilding an nnf inside an external decision-diagram manager.
pub mod compile;
pub use compile::{DecisionDiagramManager, compile_nnf, compile_nnf_automatic,
                  compile_nnf_by_depth, compile_nnf_manual, compile_nnf_recursive};

/// A reference decision-diagram engine bound to the driver contract.
pub mod dd;
pub use dd::{Bid, RefBdd};

/// CSV dataset loading.
pub mod data;
pub use data::read_csv;
