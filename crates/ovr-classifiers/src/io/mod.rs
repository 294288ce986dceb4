//! IO utilities for loading labeled feature tables.

pub mod labeled_csv;

pub use labeled_csv::{
    read_labeled_csv, read_labeled_csv_with_config, write_predictions, write_predictions_to,
    CsvReaderConfig,
};
