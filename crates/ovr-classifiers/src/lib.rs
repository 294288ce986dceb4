//! ovr-classifiers: one-vs-rest multiclass classification on top of binary classifiers.
//!
//! The crate provides a small set of binary classifiers (linear SVM, logistic
//! regression and GBDT) behind a common [`BinaryClassifier`] contract, and the
//! [`OneVsRestClassifier`] meta-estimator that trains one of them per class
//! and resolves predictions by taking the highest score. Fitted composites can
//! be persisted as JSON and restored later.
//!
//! Data loading, feature standardization and accuracy scoring live alongside
//! so the CLI and integration tests can use the crate end to end.
pub mod config;
pub mod data_handling;
pub mod error;
pub mod io;
pub mod metrics;
pub mod models;
pub mod multiclass;
pub mod preprocessing;

pub use config::{ModelConfig, ModelType};
pub use data_handling::{Dataset, Label};
pub use error::{ClassifierError, Result};
pub use models::{BinaryClassifier, ClassifierFactory, ModelBlob};
pub use multiclass::{OneVsRestClassifier, OneVsRestConfig, OneVsRestState};
