pub mod commands;
pub mod config;
pub mod model_file;
pub mod util;
