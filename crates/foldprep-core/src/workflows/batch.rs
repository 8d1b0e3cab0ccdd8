use super::assemble;
use crate::core::io::escape::SmilesEscaper;
use crate::core::io::summary::{self, SUMMARY_FILE_NAME, SummaryRow};
use crate::engine::aligner::{Aligner, MmseqsAligner, WORK_DIR_NAME};
use crate::engine::config::PipelineConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, instrument, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// What a batch run produced.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub documents: Vec<PathBuf>,
    pub failures: Vec<FileFailure>,
    pub summary: Vec<SummaryRow>,
}

impl BatchReport {
    pub fn files_seen(&self) -> usize {
        self.documents.len() + self.failures.len()
    }
}

/// Lists sequence-set files in `input_dir` with the given extension, sorted by file name.
pub fn discover(input_dir: &Path, extension: &str) -> Result<Vec<PathBuf>, EngineError> {
    let io_err = |source| EngineError::Io {
        path: input_dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(input_dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        let matches = path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext.to_string_lossy() == extension);
        if matches {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Runs the pipeline over every sequence-set file in `input_dir` using the configured
/// external aligner and escaper.
pub fn run(
    input_dir: &Path,
    output_dir: &Path,
    config: &PipelineConfig,
    reporter: &ProgressReporter,
) -> Result<BatchReport, EngineError> {
    let aligner =
        MmseqsAligner::new(config.aligner.clone(), output_dir).map_err(|source| {
            EngineError::Io {
                path: output_dir.join(WORK_DIR_NAME),
                source,
            }
        })?;
    let escaper = config.escaper.build();
    run_with(
        input_dir,
        output_dir,
        config,
        &aligner,
        escaper.as_ref(),
        reporter,
    )
}

/// Same as [`run`] with caller-supplied aligner and escaper.
///
/// A file that cannot be assembled is logged and recorded in the report; the remaining
/// files are still processed.
#[instrument(skip_all, name = "batch", fields(input = %input_dir.display()))]
pub fn run_with(
    input_dir: &Path,
    output_dir: &Path,
    config: &PipelineConfig,
    aligner: &dyn Aligner,
    escaper: &dyn SmilesEscaper,
    reporter: &ProgressReporter,
) -> Result<BatchReport, EngineError> {
    let files = discover(input_dir, &config.layout.sequence_extension)?;
    let mut report = BatchReport::default();

    if files.is_empty() {
        warn!(
            "No .{} files found in {:?}!",
            config.layout.sequence_extension, input_dir
        );
        return Ok(report);
    }
    info!("Found {} sequence-set file(s) in {:?}", files.len(), input_dir);

    let total = files.len();
    for (index, file) in files.iter().enumerate() {
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        reporter.report(Progress::PhaseStart {
            name: format!("[{}/{}] {}", index + 1, total, name),
        });

        match assemble::run(file, output_dir, config, aligner, escaper, reporter) {
            Ok(assembly) => {
                report.documents.push(assembly.document_path);
                report.summary.extend(assembly.summary);
            }
            Err(e) => {
                error!("Failed to process {:?}: {}", file, e);
                reporter.report(Progress::Message(format!("✗ {}: {}", name, e)));
                report.failures.push(FileFailure {
                    path: file.clone(),
                    reason: e.to_string(),
                });
            }
        }
        reporter.report(Progress::PhaseFinish);
    }

    summary::write_to_path(&report.summary, &output_dir.join(SUMMARY_FILE_NAME))?;

    if report.failures.is_empty() {
        info!("All {} sequence-set file(s) processed successfully!", total);
    } else {
        warn!(
            "{} of {} sequence-set file(s) could not be processed.",
            report.failures.len(),
            total
        );
    }
    Ok(report)
}
