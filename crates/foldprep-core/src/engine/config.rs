use crate::core::io::escape::EscaperKind;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_MAX_SEQS: usize = 1000;
pub const DEFAULT_FORMAT_MODE: u8 = 3;
pub const DEFAULT_DIALECT: &str = "alphafold3";
pub const DEFAULT_VERSION: u32 = 2;
pub const DEFAULT_SEQUENCE_EXTENSION: &str = "fasta";
pub const DEFAULT_LIGAND_EXTENSION: &str = "tsv";
pub const DEFAULT_LIGAND_TABLE: &str = "Uniform.tsv";

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Settings passed through to the external aligner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignerConfig {
    pub executable: PathBuf,
    pub database: PathBuf,
    pub threads: usize,
    pub max_seqs: usize,
    pub format_mode: u8,
}

/// Fixed tags written into every output document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentConfig {
    pub dialect: String,
    pub version: u32,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            dialect: DEFAULT_DIALECT.to_string(),
            version: DEFAULT_VERSION,
        }
    }
}

/// How input files are recognized and paired inside the input location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputLayout {
    pub sequence_extension: String,
    pub ligand_extension: String,
    pub default_ligand_table: String,
}

impl Default for InputLayout {
    fn default() -> Self {
        Self {
            sequence_extension: DEFAULT_SEQUENCE_EXTENSION.to_string(),
            ligand_extension: DEFAULT_LIGAND_EXTENSION.to_string(),
            default_ligand_table: DEFAULT_LIGAND_TABLE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub aligner: AlignerConfig,
    pub document: DocumentConfig,
    pub layout: InputLayout,
    pub escaper: EscaperKind,
    /// Give each protein its own single-record query file instead of the whole sequence-set file.
    pub isolate_queries: bool,
}

#[derive(Default)]
pub struct PipelineConfigBuilder {
    executable: Option<PathBuf>,
    database: Option<PathBuf>,
    threads: Option<usize>,
    max_seqs: Option<usize>,
    format_mode: Option<u8>,
    dialect: Option<String>,
    version: Option<u32>,
    sequence_extension: Option<String>,
    ligand_extension: Option<String>,
    default_ligand_table: Option<String>,
    escaper: Option<EscaperKind>,
    isolate_queries: Option<bool>,
}

impl PipelineConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn executable(mut self, path: PathBuf) -> Self {
        self.executable = Some(path);
        self
    }
    pub fn database(mut self, path: PathBuf) -> Self {
        self.database = Some(path);
        self
    }
    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }
    pub fn max_seqs(mut self, max_seqs: usize) -> Self {
        self.max_seqs = Some(max_seqs);
        self
    }
    pub fn format_mode(mut self, mode: u8) -> Self {
        self.format_mode = Some(mode);
        self
    }
    pub fn dialect(mut self, dialect: impl Into<String>) -> Self {
        self.dialect = Some(dialect.into());
        self
    }
    pub fn version(mut self, version: u32) -> Self {
        self.version = Some(version);
        self
    }
    pub fn sequence_extension(mut self, extension: impl Into<String>) -> Self {
        self.sequence_extension = Some(extension.into());
        self
    }
    pub fn ligand_extension(mut self, extension: impl Into<String>) -> Self {
        self.ligand_extension = Some(extension.into());
        self
    }
    pub fn default_ligand_table(mut self, name: impl Into<String>) -> Self {
        self.default_ligand_table = Some(name.into());
        self
    }
    pub fn escaper(mut self, escaper: EscaperKind) -> Self {
        self.escaper = Some(escaper);
        self
    }
    pub fn isolate_queries(mut self, isolate: bool) -> Self {
        self.isolate_queries = Some(isolate);
        self
    }

    pub fn build(self) -> Result<PipelineConfig, ConfigError> {
        let threads = self
            .threads
            .ok_or(ConfigError::MissingParameter("threads"))?;
        if threads == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "threads",
                reason: "must be at least 1".to_string(),
            });
        }
        let max_seqs = self.max_seqs.unwrap_or(DEFAULT_MAX_SEQS);
        if max_seqs == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "max_seqs",
                reason: "must be at least 1".to_string(),
            });
        }

        let aligner = AlignerConfig {
            executable: self
                .executable
                .ok_or(ConfigError::MissingParameter("executable"))?,
            database: self
                .database
                .ok_or(ConfigError::MissingParameter("database"))?,
            threads,
            max_seqs,
            format_mode: self.format_mode.unwrap_or(DEFAULT_FORMAT_MODE),
        };

        let defaults = InputLayout::default();
        let layout = InputLayout {
            sequence_extension: normalize_extension(
                "sequence_extension",
                self.sequence_extension
                    .unwrap_or(defaults.sequence_extension),
            )?,
            ligand_extension: normalize_extension(
                "ligand_extension",
                self.ligand_extension.unwrap_or(defaults.ligand_extension),
            )?,
            default_ligand_table: self
                .default_ligand_table
                .unwrap_or(defaults.default_ligand_table),
        };

        let document_defaults = DocumentConfig::default();
        Ok(PipelineConfig {
            aligner,
            document: DocumentConfig {
                dialect: self.dialect.unwrap_or(document_defaults.dialect),
                version: self.version.unwrap_or(document_defaults.version),
            },
            layout,
            escaper: self.escaper.unwrap_or_default(),
            isolate_queries: self.isolate_queries.unwrap_or(true),
        })
    }
}

fn normalize_extension(name: &'static str, extension: String) -> Result<String, ConfigError> {
    let trimmed = extension.trim_start_matches('.');
    if trimmed.is_empty() {
        return Err(ConfigError::InvalidParameter {
            name,
            reason: "extension cannot be empty".to_string(),
        });
    }
    Ok(trimmed.to_string())
}
