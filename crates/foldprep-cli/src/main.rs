mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod ui;
mod utils;

use crate::cli::Cli;
use crate::error::{CliError, Result};
use clap::Parser;
use foldprep::core::io::output_location;
use foldprep::engine::error::EngineError;
use tracing::{debug, error, info};

fn main() {
    if let Err(e) = run_app() {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let cli = Cli::parse();
    let app_config = config::build_config(&cli)?;

    let policy = ui::resolve_overwrite_policy(&app_config.output_path, app_config.overwrite)?;
    let existed = app_config.output_path.exists();
    let output_dir = output_location::prepare(&app_config.output_path, policy)
        .map_err(EngineError::from)?;
    if existed {
        if output_dir == app_config.output_path {
            println!("Deleted and recreated {}", output_dir.display());
        } else {
            println!("Using new output folder {}", output_dir.display());
        }
    }

    logging::setup_logging(
        cli.verbose,
        cli.quiet,
        Some(&output_dir.join(logging::LOG_FILE_NAME)),
    )?;

    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default().into_hooks();
    eyre_hook.install().map_err(|e| CliError::Other(e.into()))?;
    std::panic::set_hook(Box::new(move |pi| {
        error!("{}", panic_hook.panic_report(pi));
    }));

    info!("🚀 foldprep v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);
    info!("Output location: {:?}", output_dir);

    let command_result = commands::generate::run(&app_config, &output_dir);

    match &command_result {
        Ok(report) if report.failures.is_empty() => {
            info!("✅ Run completed successfully.");
            println!("✅ Run completed successfully.");
        }
        Ok(report) => {
            info!(
                "Run completed with {} failed file(s).",
                report.failures.len()
            );
            println!(
                "⚠ Run completed with {} failed file(s); see {} for details.",
                report.failures.len(),
                output_dir.join(logging::LOG_FILE_NAME).display()
            );
        }
        Err(e) => {
            error!("❌ Run failed: {}", e);
            eprintln!("❌ Run failed: {}", e);
        }
    }

    command_result.map(|_| ())
}
