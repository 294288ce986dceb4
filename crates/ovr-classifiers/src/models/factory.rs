use crate::config::{ModelConfig, ModelType};
use crate::error::Result;
use crate::models::classifier_trait::{BinaryClassifier, ClassifierFactory};
use crate::models::gbdt::GBDTClassifier;
use crate::models::linear_svc::LinearSvc;
use crate::models::logistic::LogisticRegression;
use crate::models::utils::ModelBlob;

/// Build a boxed, unfitted classifier from a `ModelConfig`.
pub fn build_model(params: &ModelConfig) -> Box<dyn BinaryClassifier> {
    match &params.model_type {
        ModelType::LinearSvc(p) => Box::new(LinearSvc::new(p.clone())),
        ModelType::LogisticRegression(p) => {
            Box::new(LogisticRegression::new(params.learning_rate, p.clone()))
        }
        ModelType::GBDT(p) => Box::new(GBDTClassifier::new(params.learning_rate, p.clone())),
    }
}

/// Rebuild a fitted classifier of the kind configured in `params`.
///
/// The blob must carry the same kind tag as `params.model_type`.
pub fn restore_model(params: &ModelConfig, blob: &ModelBlob) -> Result<Box<dyn BinaryClassifier>> {
    Ok(match &params.model_type {
        ModelType::LinearSvc(_) => Box::new(LinearSvc::from_blob(blob)?),
        ModelType::LogisticRegression(_) => Box::new(LogisticRegression::from_blob(blob)?),
        ModelType::GBDT(_) => Box::new(GBDTClassifier::from_blob(blob)?),
    })
}

impl ClassifierFactory for ModelConfig {
    type Model = Box<dyn BinaryClassifier>;

    fn kind(&self) -> &str {
        self.model_type.kind()
    }

    fn build(&self) -> Self::Model {
        build_model(self)
    }

    fn restore(&self, blob: &ModelBlob) -> Result<Self::Model> {
        restore_model(self, blob)
    }
}
