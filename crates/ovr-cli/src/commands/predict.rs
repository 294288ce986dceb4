use std::path::Path;

use anyhow::{Context, Result};

use ovr_classifiers::io::{
    read_labeled_csv_with_config, write_predictions, write_predictions_to, CsvReaderConfig,
};
use ovr_classifiers::metrics::accuracy_score;
use ovr_classifiers::Label;

use crate::model_file::ModelFile;

#[derive(Debug)]
pub struct PredictionResult {
    pub predictions: Vec<Label>,
    /// Present when the input table carries the label column.
    pub accuracy: Option<f64>,
}

/// Predict every row of `data_path` with the model stored at `model_path`.
pub fn run_prediction<P: AsRef<Path>, Q: AsRef<Path>>(
    model_path: P,
    data_path: Q,
) -> Result<PredictionResult> {
    let model_file = ModelFile::load(&model_path)?;
    let classifier = model_file.classifier()?;

    let reader_config = CsvReaderConfig {
        label_column: model_file.label_column.clone(),
        feature_columns: Some(model_file.feature_names.clone()),
        ..CsvReaderConfig::for_path(&data_path)
    };
    let dataset = read_labeled_csv_with_config(&data_path, &reader_config)?;

    let x = match &model_file.scaler {
        Some(scaler) => scaler.transform(&dataset.x)?,
        None => dataset.x.clone(),
    };
    let predictions = classifier
        .predict(&x)
        .with_context(|| format!("Failed to predict {}", data_path.as_ref().display()))?;

    let accuracy = match dataset.y.as_deref() {
        Some(y) => {
            let accuracy = accuracy_score(y, &predictions)?;
            log::info!("Accuracy: {:.4}", accuracy);
            Some(accuracy)
        }
        None => None,
    };

    Ok(PredictionResult {
        predictions,
        accuracy,
    })
}

/// Write predictions to `output_path`, or to stdout when it is `None`.
pub fn write_prediction_output<P: AsRef<Path>>(
    result: &PredictionResult,
    output_path: Option<P>,
) -> Result<()> {
    match output_path {
        Some(path) => write_predictions(path, &result.predictions),
        None => write_predictions_to(std::io::stdout().lock(), &result.predictions),
    }
}
