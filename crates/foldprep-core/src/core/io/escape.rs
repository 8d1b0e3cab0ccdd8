use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EscapeError {
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to run '{program}': {source}", program = program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("'{program}' exited with status {code:?}: {stderr}", program = program.display())]
    Failed {
        program: PathBuf,
        code: Option<i32>,
        stderr: String,
    },
    #[error("Escaper produced non-UTF-8 output")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Turns a SMILES string into text that can sit between the quotes of a JSON string.
pub trait SmilesEscaper {
    fn escape(&self, smiles: &str) -> Result<String, EscapeError>;
}

/// Escapes in-process with the JSON string encoder.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonEscaper;

impl SmilesEscaper for JsonEscaper {
    fn escape(&self, smiles: &str) -> Result<String, EscapeError> {
        let quoted = serde_json::to_string(smiles)?;
        Ok(strip_quotes(&quoted).to_string())
    }
}

/// Escapes by piping the value through `jq -R .`.
#[derive(Debug, Clone)]
pub struct JqEscaper {
    program: PathBuf,
}

impl JqEscaper {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl SmilesEscaper for JqEscaper {
    fn escape(&self, smiles: &str) -> Result<String, EscapeError> {
        let spawn_err = |source| EscapeError::Spawn {
            program: self.program.clone(),
            source,
        };

        let mut child = Command::new(&self.program)
            .args(["-R", "."])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_err)?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(smiles.as_bytes()).map_err(spawn_err)?;
        }

        let output = child.wait_with_output().map_err(spawn_err)?;
        if !output.status.success() {
            return Err(EscapeError::Failed {
                program: self.program.clone(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8(output.stdout)?;
        Ok(strip_quotes(stdout.trim()).to_string())
    }
}

fn strip_quotes(text: &str) -> &str {
    text.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(text)
}

/// Which escaper a pipeline run uses.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EscaperKind {
    #[default]
    Json,
    Jq {
        program: PathBuf,
    },
}

impl EscaperKind {
    pub fn build(&self) -> Box<dyn SmilesEscaper> {
        match self {
            EscaperKind::Json => Box::new(JsonEscaper),
            EscaperKind::Jq { program } => Box::new(JqEscaper::new(program.clone())),
        }
    }
}
