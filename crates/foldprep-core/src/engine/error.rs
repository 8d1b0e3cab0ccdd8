use super::config::ConfigError;
use crate::core::io::document::DocumentError;
use crate::core::io::fasta::FastaError;
use crate::core::io::ligand_table::LigandTableError;
use crate::core::io::output_location::OutputLocationError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to read sequence-set file '{path}': {source}", path = path.display())]
    SequenceFile {
        path: PathBuf,
        #[source]
        source: FastaError,
    },

    #[error("Duplicate protein identifier '{id}' in '{path}'", path = path.display())]
    DuplicateIdentifier { path: PathBuf, id: String },

    #[error(transparent)]
    LigandTable(#[from] LigandTableError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    OutputLocation(#[from] OutputLocationError),

    #[error("Failed to write run summary: {0}")]
    Summary(#[from] csv::Error),

    #[error("I/O error at '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
