use crate::cli::{EscaperArg, OverwriteArg};
use foldprep::engine::config as core_config;

pub struct DefaultsConfig {
    pub overwrite: OverwriteArg,
    pub escaper: EscaperArg,
    pub jq_bin: String,
    pub max_seqs: usize,
    pub format_mode: u8,
    pub sequence_extension: String,
    pub ligand_extension: String,
    pub default_ligand_table: String,
    pub isolate_queries: bool,
    pub dialect: String,
    pub version: u32,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            overwrite: OverwriteArg::Ask,
            escaper: EscaperArg::Json,
            jq_bin: "jq".to_string(),
            max_seqs: core_config::DEFAULT_MAX_SEQS,
            format_mode: core_config::DEFAULT_FORMAT_MODE,
            sequence_extension: core_config::DEFAULT_SEQUENCE_EXTENSION.to_string(),
            ligand_extension: core_config::DEFAULT_LIGAND_EXTENSION.to_string(),
            default_ligand_table: core_config::DEFAULT_LIGAND_TABLE.to_string(),
            isolate_queries: true,
            dialect: core_config::DEFAULT_DIALECT.to_string(),
            version: core_config::DEFAULT_VERSION,
        }
    }
}
