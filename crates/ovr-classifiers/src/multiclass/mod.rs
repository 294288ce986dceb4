//! Multiclass strategies built on top of binary classifiers.
pub mod one_vs_rest;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use one_vs_rest::{argmax, binary_labels, unique_sorted, OneVsRestClassifier, OneVsRestConfig};
pub use state::{OneVsRestState, STATE_FORMAT_VERSION};
