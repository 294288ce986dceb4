//! Persistence of a One-vs-Rest composite.
//!
//! The persisted form is a nested JSON document:
//!
//! ```text
//! {
//!   "format_version": 1,
//!   "config": { "estimator": { ... }, "parallel": false },
//!   "classes": [ ... ],
//!   "n_features": 4,
//!   "estimators": [ { "kind": "linear_svc", "state": { ... } }, ... ]
//! }
//! ```
//!
//! `estimators[k]` is the blob of the classifier for `classes[k]`, written by
//! that classifier's own `dump` and read back through the factory's
//! `restore`.
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{ClassifierError, Result};
use crate::models::classifier_trait::{BinaryClassifier, ClassifierFactory};
use crate::models::utils::ModelBlob;
use crate::multiclass::one_vs_rest::{FittedModel, OneVsRestClassifier, OneVsRestConfig};

pub const STATE_FORMAT_VERSION: u32 = 1;

/// Serializable snapshot of a One-vs-Rest composite.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct OneVsRestState<F, L> {
    pub format_version: u32,
    pub config: OneVsRestConfig<F>,
    /// Empty for an unfitted composite.
    pub classes: Vec<L>,
    pub n_features: Option<usize>,
    pub estimators: Vec<ModelBlob>,
}

impl<F, L> OneVsRestClassifier<F, L>
where
    F: ClassifierFactory + Clone,
    L: Ord + Clone,
{
    pub fn to_state(&self) -> Result<OneVsRestState<F, L>> {
        let (classes, n_features, estimators) = match &self.fitted {
            Some(fitted) => (
                fitted.classes.clone(),
                Some(fitted.n_features),
                fitted
                    .estimators
                    .iter()
                    .map(|e| e.dump())
                    .collect::<Result<Vec<_>>>()?,
            ),
            None => (Vec::new(), None, Vec::new()),
        };
        Ok(OneVsRestState {
            format_version: STATE_FORMAT_VERSION,
            config: self.config.clone(),
            classes,
            n_features,
            estimators,
        })
    }

    /// Rebuild a composite from a snapshot, checking that the class list and
    /// the classifier blobs line up.
    pub fn from_state(state: OneVsRestState<F, L>) -> Result<Self> {
        if state.format_version != STATE_FORMAT_VERSION {
            return Err(ClassifierError::IncompatibleState(format!(
                "unsupported format version {} (expected {})",
                state.format_version, STATE_FORMAT_VERSION
            )));
        }
        if state.estimators.len() != state.classes.len() {
            return Err(ClassifierError::IncompatibleState(format!(
                "{} estimators for {} classes",
                state.estimators.len(),
                state.classes.len()
            )));
        }

        let mut composite = OneVsRestClassifier::with_config(state.config);
        if state.classes.is_empty() {
            return Ok(composite);
        }

        if state.classes.len() < 2 {
            return Err(ClassifierError::IncompatibleState(format!(
                "a fitted model needs at least 2 classes, found {}",
                state.classes.len()
            )));
        }
        if !state.classes.windows(2).all(|w| w[0] < w[1]) {
            return Err(ClassifierError::IncompatibleState(
                "class labels are not sorted and unique".to_string(),
            ));
        }
        let n_features = state.n_features.ok_or_else(|| {
            ClassifierError::IncompatibleState("missing training feature count".to_string())
        })?;

        let factory = &composite.config.estimator;
        let estimators = state
            .estimators
            .iter()
            .enumerate()
            .map(|(k, blob)| {
                if blob.kind != factory.kind() {
                    return Err(ClassifierError::IncompatibleState(format!(
                        "estimator {} is a '{}' blob but the configured classifier is '{}'",
                        k,
                        blob.kind,
                        factory.kind()
                    )));
                }
                factory.restore(blob).map_err(|e| match e {
                    ClassifierError::IncompatibleState(msg) => {
                        ClassifierError::IncompatibleState(format!("estimator {}: {}", k, msg))
                    }
                    other => other,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        log::debug!(
            "Restored one-vs-rest classifier with {} classes",
            state.classes.len()
        );
        composite.fitted = Some(FittedModel {
            classes: state.classes,
            estimators,
            n_features,
        });
        Ok(composite)
    }
}

impl<F, L> OneVsRestClassifier<F, L>
where
    F: ClassifierFactory + Clone + Serialize + DeserializeOwned,
    L: Ord + Clone + Serialize + DeserializeOwned,
{
    /// Serialize the composite to JSON bytes.
    pub fn dump(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&self.to_state()?)?)
    }

    /// Inverse of [`dump`](Self::dump).
    pub fn load(bytes: &[u8]) -> Result<Self> {
        let state: OneVsRestState<F, L> = serde_json::from_slice(bytes).map_err(|e| {
            ClassifierError::IncompatibleState(format!("unreadable state: {}", e))
        })?;
        Self::from_state(state)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.dump()?)?;
        Ok(())
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::load(&bytes)
    }
}
