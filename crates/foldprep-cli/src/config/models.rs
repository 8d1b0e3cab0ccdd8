use crate::cli::OverwriteArg;
use foldprep::engine::config as core_config;
use std::path::PathBuf;

pub struct AppConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub overwrite: OverwriteArg,
    pub pipeline: core_config::PipelineConfig,
}
