//! Integration tests for CLI config parsing, util helpers and the train/predict commands.

use std::io::Write;

use ovr_classifiers::config::ModelType;
use ovr_classifiers::Label;
use ovr_cli::commands::predict::run_prediction;
use ovr_cli::commands::train::run_training;
use ovr_cli::config::{load_train_config, TrainConfig};
use ovr_cli::model_file::ModelFile;
use ovr_cli::util::validate_tsv_or_csv_file;

fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

fn training_table() -> String {
    let mut csv = String::from("id,x1,x2,label\n");
    let centers = [(0.0, 6.0, "red"), (6.0, -6.0, "green"), (-6.0, -6.0, "blue")];
    let mut id = 0;
    for (cx, cy, label) in centers {
        for dx in [-0.5, 0.0, 0.5] {
            for dy in [-0.5, 0.0, 0.5] {
                csv.push_str(&format!("{},{},{},{}\n", id, cx + dx, cy + dy, label));
                id += 1;
            }
        }
    }
    csv
}

// ---------------------------------------------------------------------------
// validate_tsv_or_csv_file
// ---------------------------------------------------------------------------

#[test]
fn validate_csv_file_exists() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "data.csv", "");
    assert!(validate_tsv_or_csv_file(&path).is_ok());
}

#[test]
fn validate_wrong_extension_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "data.txt", "");
    assert!(validate_tsv_or_csv_file(&path).is_err());
}

#[test]
fn validate_nonexistent_file_errors() {
    assert!(validate_tsv_or_csv_file("/nonexistent/path/data.tsv").is_err());
}

// ---------------------------------------------------------------------------
// TrainConfig
// ---------------------------------------------------------------------------

#[test]
fn train_config_default_values() {
    let cfg = TrainConfig::default();
    assert!(!cfg.parallel);
    assert!(cfg.scale_features);
    assert_eq!(cfg.label_column, "label");
}

#[test]
fn train_config_partial_json_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        &dir,
        "config.json",
        r#"{"model": {"learning_rate": 0.3, "GBDT": {"max_depth": 3}}, "parallel": true}"#,
    );
    let cfg = load_train_config(&path).unwrap();
    assert!(cfg.parallel);
    assert_eq!(cfg.model.learning_rate, 0.3);
    assert!(matches!(cfg.model.model_type, ModelType::GBDT(ref p) if p.max_depth == 3));
    assert_eq!(cfg.label_column, "label");
}

#[test]
fn train_config_invalid_json_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "config.json", "{ not json");
    let err = load_train_config(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config"));
}

// ---------------------------------------------------------------------------
// train + predict
// ---------------------------------------------------------------------------

#[test]
fn trained_model_file_predicts_training_rows() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_file(&dir, "train.csv", &training_table());
    let model = dir.path().join("model.json");

    let mut config = TrainConfig::default();
    config.model.model_type = "logistic".parse().unwrap();
    let summary = run_training(&data, &model, &config).unwrap();
    assert_eq!(summary.n_samples, 27);
    assert_eq!(summary.n_classes, 3);
    assert!(summary.train_accuracy >= 0.95);

    let file = ModelFile::load(&model).unwrap();
    assert!(file.scaler.is_some());
    assert_eq!(file.feature_names, vec!["x1", "x2"]);
    assert_eq!(
        file.model.classes,
        vec![Label::from("blue"), Label::from("green"), Label::from("red")]
    );

    let result = run_prediction(&model, &data).unwrap();
    assert_eq!(result.predictions.len(), 27);
    assert!(result.accuracy.unwrap() >= 0.95);
}

#[test]
fn unlabeled_table_predicts_without_accuracy() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_file(&dir, "train.csv", &training_table());
    let model = dir.path().join("model.json");
    run_training(&data, &model, &TrainConfig::default()).unwrap();

    let unlabeled = write_file(&dir, "new.csv", "x2,x1\n6.0,0.0\n-6.0,-6.0\n");
    let result = run_prediction(&model, &unlabeled).unwrap();
    assert!(result.accuracy.is_none());
    assert_eq!(
        result.predictions,
        vec![Label::from("red"), Label::from("blue")]
    );
}

#[test]
fn training_without_label_column_errors() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_file(&dir, "train.csv", "x1,x2\n1,2\n3,4\n");
    let model = dir.path().join("model.json");
    let err = run_training(&data, &model, &TrainConfig::default()).unwrap_err();
    assert!(err.to_string().contains("no 'label' column"));
    assert!(!model.exists());
}
