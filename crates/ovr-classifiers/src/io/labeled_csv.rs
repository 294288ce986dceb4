//! Delimited text reader for labeled feature tables.
use std::collections::HashSet;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use csv::StringRecord;
use ndarray::Array2;

use crate::data_handling::{Dataset, Label};

/// Configuration for reading labeled CSV / TSV files.
#[derive(Debug, Clone)]
pub struct CsvReaderConfig {
    pub delimiter: u8,
    /// Column holding class labels. When it is absent from the header the
    /// file is read as unlabeled.
    pub label_column: String,
    /// Optional list of feature columns to load (in order).
    /// When `None`, every column except the label and `ignore_columns` is a feature.
    pub feature_columns: Option<Vec<String>>,
    pub ignore_columns: Vec<String>,
}

impl Default for CsvReaderConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            label_column: "label".to_string(),
            feature_columns: None,
            ignore_columns: vec!["id".to_string()],
        }
    }
}

impl CsvReaderConfig {
    /// Default configuration with the delimiter guessed from the extension.
    pub fn for_path<P: AsRef<Path>>(path: P) -> Self {
        let is_tsv = path
            .as_ref()
            .extension()
            .and_then(|s| s.to_str())
            .map_or(false, |ext| ext.eq_ignore_ascii_case("tsv"));
        Self {
            delimiter: if is_tsv { b'\t' } else { b',' },
            ..Self::default()
        }
    }
}

/// Read a labeled table with the default configuration for its extension.
pub fn read_labeled_csv<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    let config = CsvReaderConfig::for_path(&path);
    read_labeled_csv_with_config(path, &config)
}

pub fn read_labeled_csv_with_config<P: AsRef<Path>>(
    path: P,
    config: &CsvReaderConfig,
) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(config.delimiter)
        .has_headers(true)
        .from_path(&path)
        .with_context(|| format!("Failed to open data file: {}", path.as_ref().display()))?;

    let headers = reader
        .headers()
        .context("Failed to read header row")?
        .clone();

    let label_idx = find_column(&headers, &config.label_column);
    let feature_indices = resolve_feature_indices(&headers, config, label_idx)?;
    if feature_indices.is_empty() {
        return Err(anyhow!("No feature columns detected in header"));
    }

    let mut features = Vec::new();
    let mut labels = Vec::new();

    for (row_idx, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read row {}", row_idx + 1))?;

        if let Some(idx) = label_idx {
            let raw = record
                .get(idx)
                .ok_or_else(|| anyhow!("Missing label value at row {}", row_idx + 1))?;
            // Label parsing is infallible: non-integers become text labels.
            let label: Label = raw.parse().unwrap_or_else(|never| match never {});
            labels.push(label);
        }

        for &idx in &feature_indices {
            let value = record
                .get(idx)
                .ok_or_else(|| anyhow!("Missing feature value at row {}", row_idx + 1))?;
            let parsed = value.trim().parse::<f64>().with_context(|| {
                format!(
                    "Invalid feature '{}' at row {}",
                    headers.get(idx).unwrap_or(""),
                    row_idx + 1
                )
            })?;
            features.push(parsed);
        }
    }

    let n_features = feature_indices.len();
    let n_samples = features.len() / n_features;
    let x = Array2::from_shape_vec((n_samples, n_features), features)
        .context("Failed to build feature matrix")?;

    let feature_names = feature_indices
        .iter()
        .map(|&idx| headers.get(idx).unwrap_or("").to_string())
        .collect();

    let y = label_idx.map(|_| labels);
    let dataset = Dataset::new(x, y, feature_names)?;
    log::debug!(
        "Read {} rows x {} features from {}",
        dataset.n_samples(),
        dataset.n_features(),
        path.as_ref().display()
    );
    Ok(dataset)
}

/// Write one predicted label per line under a `prediction` header.
pub fn write_predictions<P: AsRef<Path>>(path: P, predictions: &[Label]) -> Result<()> {
    let file = std::fs::File::create(&path)
        .with_context(|| format!("Failed to create {}", path.as_ref().display()))?;
    write_predictions_to(file, predictions)
}

pub fn write_predictions_to<W: std::io::Write>(writer: W, predictions: &[Label]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(["prediction"])?;
    for label in predictions {
        writer.write_record([label.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.trim().eq_ignore_ascii_case(name))
}

fn resolve_feature_indices(
    headers: &StringRecord,
    config: &CsvReaderConfig,
    label_idx: Option<usize>,
) -> Result<Vec<usize>> {
    if let Some(names) = &config.feature_columns {
        let mut indices = Vec::with_capacity(names.len());
        for name in names {
            let idx = find_column(headers, name)
                .ok_or_else(|| anyhow!("Missing feature column '{}'", name))?;
            indices.push(idx);
        }
        return Ok(indices);
    }

    let ignore: HashSet<String> = config
        .ignore_columns
        .iter()
        .map(|name| name.to_ascii_lowercase())
        .collect();

    Ok(headers
        .iter()
        .enumerate()
        .filter(|(idx, header)| {
            Some(*idx) != label_idx && !ignore.contains(&header.trim().to_ascii_lowercase())
        })
        .map(|(idx, _)| idx)
        .collect())
}
