use crate::cli::{EscaperArg, OverwriteArg};
use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileAlignerConfig {
    pub max_seqs: Option<usize>,
    pub format_mode: Option<u8>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileInputConfig {
    pub sequence_extension: Option<String>,
    pub ligand_extension: Option<String>,
    pub default_ligand_table: Option<String>,
    pub isolate_queries: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileLigandConfig {
    pub escaper: Option<EscaperArg>,
    pub jq_bin: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileDocumentConfig {
    pub dialect: Option<String>,
    pub version: Option<u32>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileOutputConfig {
    pub overwrite: Option<OverwriteArg>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub aligner: Option<FileAlignerConfig>,
    pub input: Option<FileInputConfig>,
    pub ligands: Option<FileLigandConfig>,
    pub document: Option<FileDocumentConfig>,
    pub output: Option<FileOutputConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration file {:?}", path);
        let content = std::fs::read_to_string(path).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        Self::parse(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        let config = FileConfig::parse("").unwrap();
        assert!(config.aligner.is_none());
        assert!(config.output.is_none());
    }

    #[test]
    fn full_file_parses() {
        let config = FileConfig::parse(
            r#"
            [aligner]
            max-seqs = 500
            format-mode = 3

            [input]
            sequence-extension = "fa"
            ligand-extension = "tsv"
            default-ligand-table = "Shared.tsv"
            isolate-queries = false

            [ligands]
            escaper = "jq"
            jq-bin = "/usr/local/bin/jq"

            [document]
            dialect = "alphafold3"
            version = 2

            [output]
            overwrite = "redirect"
            "#,
        )
        .unwrap();

        assert_eq!(config.aligner.unwrap().max_seqs, Some(500));
        let input = config.input.unwrap();
        assert_eq!(input.sequence_extension.as_deref(), Some("fa"));
        assert_eq!(input.isolate_queries, Some(false));
        assert_eq!(config.ligands.unwrap().escaper, Some(EscaperArg::Jq));
        assert_eq!(config.output.unwrap().overwrite, Some(OverwriteArg::Redirect));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(FileConfig::parse("[aligner]\nmax_hits = 3\n").is_err());
        assert!(FileConfig::parse("[extra]\n").is_err());
    }

    #[test]
    fn unreadable_file_is_a_parsing_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = FileConfig::from_file(&dir.path().join("missing.toml"));
        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }
}
