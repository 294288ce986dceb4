use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use ovr_classifiers::config::ModelConfig;

/// Parameters for training a one-vs-rest model from a labeled table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrainConfig {
    /// Prototype for the per-class binary classifiers.
    pub model: ModelConfig,
    pub parallel: bool,
    /// Standardize features before training. The fitted scaler is stored in
    /// the model file and reapplied at prediction time.
    pub scale_features: bool,
    pub label_column: String,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            parallel: false,
            scale_features: true,
            label_column: "label".to_string(),
        }
    }
}

/// Load a training configuration from a JSON file.
pub fn load_train_config<P: AsRef<Path>>(path: P) -> Result<TrainConfig> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
    let config: TrainConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;
    Ok(config)
}
