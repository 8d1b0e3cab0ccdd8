use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::AppConfig;
use crate::cli::{Cli, EscaperArg};
use crate::error::{CliError, Result};
use foldprep::core::io::escape::EscaperKind;
use foldprep::engine::config as core_config;

/// Merges command-line arguments, the optional TOML file and built-in defaults, in that order.
pub fn build_config(args: &Cli) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let aligner_file = file_config.aligner.unwrap_or_default();
    let input_file = file_config.input.unwrap_or_default();
    let ligands_file = file_config.ligands.unwrap_or_default();
    let document_file = file_config.document.unwrap_or_default();
    let output_file = file_config.output.unwrap_or_default();

    let max_seqs = args
        .max_seqs
        .or(aligner_file.max_seqs)
        .unwrap_or(defaults.max_seqs);
    let format_mode = aligner_file.format_mode.unwrap_or(defaults.format_mode);

    let default_ligand_table = args
        .default_ligand_table
        .clone()
        .or(input_file.default_ligand_table)
        .unwrap_or(defaults.default_ligand_table);
    let isolate_queries = if args.whole_file_queries {
        false
    } else {
        input_file
            .isolate_queries
            .unwrap_or(defaults.isolate_queries)
    };

    let escaper = match args
        .escaper
        .or(ligands_file.escaper)
        .unwrap_or(defaults.escaper)
    {
        EscaperArg::Json => EscaperKind::Json,
        EscaperArg::Jq => EscaperKind::Jq {
            program: args
                .jq_bin
                .clone()
                .or(ligands_file.jq_bin)
                .unwrap_or_else(|| defaults.jq_bin.into()),
        },
    };

    let pipeline = core_config::PipelineConfigBuilder::new()
        .executable(args.mmseqs_bin.clone())
        .database(args.mmseqs_db.clone())
        .threads(args.cpu)
        .max_seqs(max_seqs)
        .format_mode(format_mode)
        .sequence_extension(
            input_file
                .sequence_extension
                .unwrap_or(defaults.sequence_extension),
        )
        .ligand_extension(
            input_file
                .ligand_extension
                .unwrap_or(defaults.ligand_extension),
        )
        .default_ligand_table(default_ligand_table)
        .isolate_queries(isolate_queries)
        .dialect(document_file.dialect.unwrap_or(defaults.dialect))
        .version(document_file.version.unwrap_or(defaults.version))
        .escaper(escaper)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(AppConfig {
        input_path: args.input_path.clone(),
        output_path: args.output_path.clone(),
        overwrite: args
            .overwrite
            .or(output_file.overwrite)
            .unwrap_or(defaults.overwrite),
        pipeline,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OverwriteArg;
    use clap::Parser;
    use std::path::PathBuf;

    fn parse(extra: &[&str]) -> Cli {
        let mut args = vec![
            "foldprep",
            "-i",
            "in",
            "-o",
            "out",
            "--cpu",
            "4",
            "--mmseqs-bin",
            "mmseqs",
            "--mmseqs-db",
            "/db/uniref90",
        ];
        args.extend_from_slice(extra);
        Cli::try_parse_from(args).unwrap()
    }

    fn write_config(content: &str) -> (tempfile::TempDir, String) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("foldprep.toml");
        std::fs::write(&path, content).unwrap();
        let path = path.to_string_lossy().into_owned();
        (dir, path)
    }

    #[test]
    fn defaults_apply_without_a_config_file() {
        let config = build_config(&parse(&[])).unwrap();
        assert_eq!(config.overwrite, OverwriteArg::Ask);
        assert_eq!(config.pipeline.aligner.threads, 4);
        assert_eq!(config.pipeline.aligner.max_seqs, 1000);
        assert_eq!(config.pipeline.layout.default_ligand_table, "Uniform.tsv");
        assert_eq!(config.pipeline.escaper, EscaperKind::Json);
        assert!(config.pipeline.isolate_queries);
    }

    #[test]
    fn file_values_override_defaults() {
        let (_dir, path) = write_config(
            "[aligner]\nmax-seqs = 200\n\n[input]\nsequence-extension = \"fa\"\n\n[output]\noverwrite = \"redirect\"\n",
        );
        let config = build_config(&parse(&["-c", &path])).unwrap();
        assert_eq!(config.pipeline.aligner.max_seqs, 200);
        assert_eq!(config.pipeline.layout.sequence_extension, "fa");
        assert_eq!(config.overwrite, OverwriteArg::Redirect);
    }

    #[test]
    fn arguments_override_file_values() {
        let (_dir, path) = write_config(
            "[aligner]\nmax-seqs = 200\n\n[input]\nisolate-queries = true\n\n[ligands]\nescaper = \"json\"\n",
        );
        let config = build_config(&parse(&[
            "-c",
            &path,
            "--max-seqs",
            "50",
            "--whole-file-queries",
            "--escaper",
            "jq",
            "--jq-bin",
            "/opt/jq",
        ]))
        .unwrap();
        assert_eq!(config.pipeline.aligner.max_seqs, 50);
        assert!(!config.pipeline.isolate_queries);
        assert_eq!(
            config.pipeline.escaper,
            EscaperKind::Jq {
                program: PathBuf::from("/opt/jq")
            }
        );
    }

    #[test]
    fn jq_defaults_to_the_binary_on_path() {
        let config = build_config(&parse(&["--escaper", "jq"])).unwrap();
        assert_eq!(
            config.pipeline.escaper,
            EscaperKind::Jq {
                program: PathBuf::from("jq")
            }
        );
    }

    #[test]
    fn zero_cpu_is_a_config_error() {
        let mut cli = parse(&[]);
        cli.cpu = 0;
        assert!(matches!(build_config(&cli), Err(CliError::Config(_))));
    }

    #[test]
    fn malformed_config_file_is_reported() {
        let (_dir, path) = write_config("[aligner\n");
        assert!(matches!(
            build_config(&parse(&["-c", &path])),
            Err(CliError::FileParsing { .. })
        ));
    }
}
