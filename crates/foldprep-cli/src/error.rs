use foldprep::engine::error::EngineError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Document generation failed: {0}")]
    Pipeline(#[from] EngineError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    Argument(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_errors_say_what_failed() {
        let err: CliError = EngineError::DuplicateIdentifier {
            path: PathBuf::from("in/p.fasta"),
            id: "P1".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Document generation failed: Duplicate protein identifier 'P1' in 'in/p.fasta'"
        );
    }

    #[test]
    fn file_parsing_errors_name_the_file() {
        let err = CliError::FileParsing {
            path: PathBuf::from("foldprep.toml"),
            source: anyhow::anyhow!("expected `]`"),
        };
        assert_eq!(
            err.to_string(),
            "Failed to parse file 'foldprep.toml': expected `]`"
        );
    }
}
