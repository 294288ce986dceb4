use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use std::path::PathBuf;
use std::str::FromStr;

use ovr_classifiers::config::ModelType;
use ovr_cli::commands::predict::{run_prediction, write_prediction_output};
use ovr_cli::commands::train::run_training;
use ovr_cli::config::{load_train_config, TrainConfig};
use ovr_cli::util::validate_tsv_or_csv_file;

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(
            env_logger::Env::default()
                .filter_or("OVR_LOG", "error,ovr_classifiers=info,ovr_cli=info"),
        )
        .init();

    let matches = Command::new("ovr")
        .version(clap::crate_version!())
        .about("One-vs-Rest multiclass training and prediction")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("train")
                .about("Train a one-vs-rest classifier on a labeled CSV/TSV table")
                .arg(
                    Arg::new("config")
                        .help("Path to training configuration file (defaults when omitted)")
                        .required(false)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("train_data")
                        .short('d')
                        .long("train_data")
                        .help("Path to the labeled training table (.csv or .tsv)")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output_file")
                        .short('o')
                        .long("output_file")
                        .help("File path that the trained model will be written to")
                        .default_value("ovr_model.json")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("model_type")
                        .long("model-type")
                        .help("Override the binary classifier type from the JSON config.")
                        .value_parser(["linear_svc", "logistic_regression", "gbdt"])
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("label_column")
                        .long("label-column")
                        .help("Name of the column holding class labels.")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new()),
                )
                .arg(
                    Arg::new("parallel")
                        .long("parallel")
                        .help("Train the per-class classifiers concurrently.")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("predict")
                .about("Predict class labels with a trained model")
                .arg(
                    Arg::new("model")
                        .short('m')
                        .long("model")
                        .help("Path to a model file written by `ovr train`")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("data")
                        .short('d')
                        .long("data")
                        .help("Path to the table to predict (.csv or .tsv)")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output_file")
                        .short('o')
                        .long("output")
                        .help("Path to write predictions (CSV). Defaults to stdout.")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("train", train_matches)) => handle_train(train_matches),
        Some(("predict", predict_matches)) => handle_predict(predict_matches),
        _ => unreachable!(),
    }
}

fn handle_train(matches: &ArgMatches) -> Result<()> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(config_path) => {
            eprintln!("[ovr] Using config: {:?}", config_path);
            load_train_config(config_path)?
        }
        None => {
            let config = TrainConfig::default();
            let default_json = serde_json::to_string_pretty(&config).unwrap_or_default();
            eprintln!("[ovr] No config provided; using defaults:\n{}", default_json);
            config
        }
    };

    if let Some(model_type) = matches.get_one::<String>("model_type") {
        config.model.model_type = ModelType::from_str(model_type).map_err(anyhow::Error::msg)?;
    }
    if let Some(label_column) = matches.get_one::<String>("label_column") {
        config.label_column = label_column.clone();
    }
    if matches.get_flag("parallel") {
        config.parallel = true;
    }

    let data_path: &PathBuf = matches
        .get_one("train_data")
        .ok_or_else(|| anyhow::anyhow!("--train_data is required"))?;
    let output_path: &PathBuf = matches
        .get_one("output_file")
        .ok_or_else(|| anyhow::anyhow!("--output_file is required"))?;
    validate_tsv_or_csv_file(data_path)?;

    eprintln!("[ovr] Training on: {:?}", data_path);
    let summary = run_training(data_path, output_path, &config)?;
    eprintln!(
        "[ovr] Trained {} classes on {} samples (training accuracy {:.4}). Model written to {:?}",
        summary.n_classes, summary.n_samples, summary.train_accuracy, output_path
    );
    Ok(())
}

fn handle_predict(matches: &ArgMatches) -> Result<()> {
    let model_path: &PathBuf = matches
        .get_one("model")
        .ok_or_else(|| anyhow::anyhow!("--model is required"))?;
    let data_path: &PathBuf = matches
        .get_one("data")
        .ok_or_else(|| anyhow::anyhow!("--data is required"))?;
    let output_path: Option<&PathBuf> = matches.get_one("output_file");
    validate_tsv_or_csv_file(data_path)?;

    let result = run_prediction(model_path, data_path)?;
    write_prediction_output(&result, output_path)?;
    if let Some(accuracy) = result.accuracy {
        eprintln!("[ovr] Accuracy: {:.4}", accuracy);
    }
    eprintln!("[ovr] Predicted {} samples.", result.predictions.len());
    Ok(())
}
