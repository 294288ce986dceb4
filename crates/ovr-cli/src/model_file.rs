//! On-disk bundle written by `ovr train` and read by `ovr predict`.
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use ovr_classifiers::config::ModelConfig;
use ovr_classifiers::preprocessing::StandardScaler;
use ovr_classifiers::{Label, OneVsRestClassifier, OneVsRestState};

pub type Composite = OneVsRestClassifier<ModelConfig, Label>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelFile {
    pub label_column: String,
    pub feature_names: Vec<String>,
    pub scaler: Option<StandardScaler>,
    pub model: OneVsRestState<ModelConfig, Label>,
}

impl ModelFile {
    pub fn new(
        classifier: &Composite,
        scaler: Option<StandardScaler>,
        label_column: String,
        feature_names: Vec<String>,
    ) -> Result<Self> {
        Ok(Self {
            label_column,
            feature_names,
            scaler,
            model: classifier.to_state()?,
        })
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write model: {}", path.as_ref().display()))?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read(&path)
            .with_context(|| format!("Failed to read model: {}", path.as_ref().display()))?;
        let file: ModelFile = serde_json::from_slice(&content)
            .with_context(|| format!("Failed to parse model: {}", path.as_ref().display()))?;
        Ok(file)
    }

    /// Rebuild the fitted classifier stored in this file.
    pub fn classifier(&self) -> Result<Composite> {
        let classifier = Composite::from_state(self.model.clone())
            .context("Model file holds an incompatible classifier state")?;
        if !classifier.is_fitted() {
            anyhow::bail!("Model file holds an unfitted classifier");
        }
        Ok(classifier)
    }
}
