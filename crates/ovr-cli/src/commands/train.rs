use std::path::Path;

use anyhow::{Context, Result};

use ovr_classifiers::io::{read_labeled_csv_with_config, CsvReaderConfig};
use ovr_classifiers::preprocessing::StandardScaler;
use ovr_classifiers::OneVsRestClassifier;

use crate::config::TrainConfig;
use crate::model_file::{Composite, ModelFile};

/// Summary of a finished training run.
#[derive(Debug)]
pub struct TrainSummary {
    pub n_samples: usize,
    pub n_classes: usize,
    pub train_accuracy: f64,
}

/// Train a one-vs-rest model on `data_path` and write the model file to `output_path`.
pub fn run_training<P: AsRef<Path>, Q: AsRef<Path>>(
    data_path: P,
    output_path: Q,
    config: &TrainConfig,
) -> Result<TrainSummary> {
    let reader_config = CsvReaderConfig {
        label_column: config.label_column.clone(),
        ..CsvReaderConfig::for_path(&data_path)
    };
    let dataset = read_labeled_csv_with_config(&data_path, &reader_config)?;
    dataset.log_summary();
    let y = dataset.y.as_deref().with_context(|| {
        format!(
            "Training data has no '{}' column: {}",
            config.label_column,
            data_path.as_ref().display()
        )
    })?;

    let (scaler, x) = if config.scale_features {
        let (scaler, x) = StandardScaler::fit_transform(&dataset.x)?;
        (Some(scaler), x)
    } else {
        (None, dataset.x.clone())
    };

    let mut classifier: Composite =
        OneVsRestClassifier::new(config.model.clone()).parallel(config.parallel);
    classifier
        .fit(&x, y)
        .context("Failed to fit one-vs-rest classifier")?;
    let train_accuracy = classifier.score(&x, y)?;
    log::info!("Training accuracy: {:.4}", train_accuracy);

    let n_classes = classifier.classes().map_or(0, |c| c.len());
    ModelFile::new(
        &classifier,
        scaler,
        config.label_column.clone(),
        dataset.feature_names.clone(),
    )?
    .save(&output_path)?;
    log::info!("Wrote model to {}", output_path.as_ref().display());

    Ok(TrainSummary {
        n_samples: dataset.n_samples(),
        n_classes,
        train_accuracy,
    })
}
