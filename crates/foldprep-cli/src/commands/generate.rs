use crate::config::AppConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use foldprep::core::io::summary::{AlignmentStatus, SUMMARY_FILE_NAME};
use foldprep::engine::progress::ProgressReporter;
use foldprep::workflows::batch::{self, BatchReport};
use std::path::Path;
use tracing::{info, warn};

pub fn run(config: &AppConfig, output_dir: &Path) -> Result<BatchReport> {
    if !config.input_path.is_dir() {
        return Err(CliError::Argument(format!(
            "Input folder '{}' does not exist or is not a directory",
            config.input_path.display()
        )));
    }

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Generating documents from {} into {}",
        config.input_path.display(),
        output_dir.display()
    );
    info!("Invoking the batch workflow...");

    let report = batch::run(&config.input_path, output_dir, &config.pipeline, &reporter)?;

    if report.files_seen() == 0 {
        println!(
            "Warning: no .{} files found in {}.",
            config.pipeline.layout.sequence_extension,
            config.input_path.display()
        );
        return Ok(report);
    }

    for document in &report.documents {
        println!("  ✓ {}", document.display());
    }
    for failure in &report.failures {
        println!("  ✗ {}: {}", failure.path.display(), failure.reason);
    }

    let failed_alignments = report
        .summary
        .iter()
        .filter(|row| row.alignment == AlignmentStatus::Failed)
        .count();
    if failed_alignments > 0 {
        warn!(
            "{} protein(s) were written without an MSA.",
            failed_alignments
        );
        println!(
            "Note: {} protein(s) have no MSA; see {} for details.",
            failed_alignments,
            output_dir.join(SUMMARY_FILE_NAME).display()
        );
    }

    println!(
        "Wrote {} document(s); {} file(s) failed.",
        report.documents.len(),
        report.failures.len()
    );
    Ok(report)
}
