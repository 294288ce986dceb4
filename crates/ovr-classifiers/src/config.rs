use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Central configuration for the binary classifiers in the crate.
///
/// A `ModelConfig` is the prototype handed to the One-vs-Rest composite: it
/// never holds fitted state, and every per-class classifier is built fresh
/// from it.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ModelConfig {
    /// Step size for gradient based learners and GBDT shrinkage. Ignored by
    /// `LinearSvc`, which follows the Pegasos step schedule.
    pub learning_rate: f64,

    #[serde(flatten)]
    pub model_type: ModelType,
}

/// Supported binary classifiers and their hyper-parameters.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub enum ModelType {
    LinearSvc(LinearSvcParams),
    LogisticRegression(LogisticRegressionParams),
    GBDT(GbdtParams),
}

/// Mini-batch Pegasos linear SVM.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LinearSvcParams {
    /// Regularization strength (lambda).
    pub reg_param: f64,
    pub max_iter: usize,
    pub batch_size: usize,
    pub fit_bias: bool,
    /// Value of the constant feature appended when `fit_bias` is set.
    pub bias_scale: f64,
    pub random_seed: u64,
}

impl Default for LinearSvcParams {
    fn default() -> Self {
        Self {
            reg_param: 1e-4,
            max_iter: 1000,
            batch_size: 20,
            fit_bias: true,
            bias_scale: 1.0,
            random_seed: 42,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LogisticRegressionParams {
    pub reg_param: f64,
    pub max_iter: usize,
    pub fit_bias: bool,
}

impl Default for LogisticRegressionParams {
    fn default() -> Self {
        Self {
            reg_param: 1e-4,
            max_iter: 500,
            fit_bias: true,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GbdtParams {
    pub max_depth: u32,
    pub num_boost_round: u32,
    pub debug: bool,
    pub training_optimization_level: u8,
    pub loss_type: String,
}

impl Default for GbdtParams {
    fn default() -> Self {
        Self {
            max_depth: 6,
            num_boost_round: 50,
            debug: false,
            training_optimization_level: 2,
            loss_type: "LogLikelyhood".to_string(),
        }
    }
}

impl Default for ModelType {
    fn default() -> Self {
        ModelType::LinearSvc(LinearSvcParams::default())
    }
}

impl ModelType {
    /// Stable tag stored next to every persisted classifier of this type.
    pub fn kind(&self) -> &'static str {
        match self {
            ModelType::LinearSvc(_) => crate::models::linear_svc::KIND,
            ModelType::LogisticRegression(_) => crate::models::logistic::KIND,
            ModelType::GBDT(_) => crate::models::gbdt::KIND,
        }
    }
}

impl FromStr for ModelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linear_svc" | "svc" => Ok(ModelType::LinearSvc(LinearSvcParams::default())),
            "logistic" | "logistic_regression" => Ok(ModelType::LogisticRegression(
                LogisticRegressionParams::default(),
            )),
            "gbdt" => Ok(ModelType::GBDT(GbdtParams::default())),
            _ => Err(format!(
                "Unknown model type: {}. Valid options are: linear_svc, logistic_regression, gbdt",
                s
            )),
        }
    }
}

impl ModelConfig {
    pub fn new(learning_rate: f64, model_type: ModelType) -> Self {
        Self {
            learning_rate,
            model_type,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            model_type: ModelType::default(),
        }
    }
}
