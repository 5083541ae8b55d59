//! Configuration loading, validation and persistence.

mod file;
mod paths;
mod types;
mod validate;

pub use file::{load_config_file, load_default_config, save_config, save_default_config};
pub use paths::{config_dir, config_file_path};
pub use types::{AnalysisConfig, Config, ModelConfig, OutputConfig};
pub use validate::validate_analysis;
