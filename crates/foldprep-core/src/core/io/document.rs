use crate::core::models::document::OutputDocument;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

const INDENT: &[u8] = b"    ";

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("I/O error while writing '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to encode document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to move document into place at '{path}': {source}", path = path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: tempfile::PersistError,
    },
}

/// File name of the document generated for a sequence-set file, e.g. `p.fasta.json`.
pub fn document_file_name(sequence_file_name: &str) -> String {
    format!("{}.json", sequence_file_name)
}

/// Writes the document as JSON indented by four spaces.
pub fn write_to(document: &OutputDocument, writer: &mut impl Write) -> Result<(), DocumentError> {
    let mut serializer = Serializer::with_formatter(writer, PrettyFormatter::with_indent(INDENT));
    document.serialize(&mut serializer)?;
    Ok(())
}

/// Writes the document next to `path` and renames it into place, so readers never observe a
/// partially written file.
pub fn write_to_path(document: &OutputDocument, path: &Path) -> Result<(), DocumentError> {
    let io_err = |source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let staging = NamedTempFile::new_in(dir).map_err(io_err)?;
    {
        let mut writer = BufWriter::new(staging.as_file());
        write_to(document, &mut writer)?;
        writer.write_all(b"\n").map_err(io_err)?;
        writer.flush().map_err(io_err)?;
    }
    staging.persist(path).map_err(|source| DocumentError::Persist {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}
