//! Binary classifiers and the contract they share.
//!
//! `classifier_trait` defines [`BinaryClassifier`] and [`ClassifierFactory`];
//! the remaining modules are the concrete classifiers shipped with the crate.
pub mod gbdt;
pub mod linear_svc;
pub mod logistic;
pub mod utils;

pub mod classifier_trait;
pub mod factory;

pub use classifier_trait::{BinaryClassifier, ClassifierFactory};
pub use utils::ModelBlob;
