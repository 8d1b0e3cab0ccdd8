use chrono::{DateTime, Local};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// What to do when the requested output location already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverwritePolicy {
    /// Refuse to use an existing location.
    Fail,
    /// Delete the existing location and recreate it empty.
    Overwrite,
    /// Leave it alone and use a timestamped sibling instead.
    Redirect,
}

#[derive(Debug, Error)]
pub enum OutputLocationError {
    #[error("Output location '{path}' already exists", path = path.display())]
    AlreadyExists { path: PathBuf },
    #[error("Failed to delete output location '{path}': {source}", path = path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to create output location '{path}': {source}", path = path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Makes `requested` usable as an empty-or-new output location and returns the path to use.
pub fn prepare(requested: &Path, policy: OverwritePolicy) -> Result<PathBuf, OutputLocationError> {
    prepare_at(requested, policy, Local::now())
}

/// Same as [`prepare`] with an explicit clock for the redirect timestamp.
pub fn prepare_at(
    requested: &Path,
    policy: OverwritePolicy,
    now: DateTime<Local>,
) -> Result<PathBuf, OutputLocationError> {
    if !requested.exists() {
        create(requested)?;
        return Ok(requested.to_path_buf());
    }

    match policy {
        OverwritePolicy::Fail => Err(OutputLocationError::AlreadyExists {
            path: requested.to_path_buf(),
        }),
        OverwritePolicy::Overwrite => {
            fs::remove_dir_all(requested).map_err(|source| OutputLocationError::Remove {
                path: requested.to_path_buf(),
                source,
            })?;
            create(requested)?;
            info!("Deleted and recreated output location {:?}", requested);
            Ok(requested.to_path_buf())
        }
        OverwritePolicy::Redirect => {
            let redirected = timestamped_sibling(requested, now);
            if redirected.exists() {
                return Err(OutputLocationError::AlreadyExists { path: redirected });
            }
            create(&redirected)?;
            info!("Using new output location {:?}", redirected);
            Ok(redirected)
        }
    }
}

/// `out/` at 2025-03-01 12:30:05 becomes `out_20250301_123005`.
pub fn timestamped_sibling(requested: &Path, now: DateTime<Local>) -> PathBuf {
    let base = requested.to_string_lossy();
    let base = base.trim_end_matches(['/', '\\']);
    PathBuf::from(format!("{}_{}", base, now.format(TIMESTAMP_FORMAT)))
}

fn create(path: &Path) -> Result<(), OutputLocationError> {
    fs::create_dir_all(path).map_err(|source| OutputLocationError::Create {
        path: path.to_path_buf(),
        source,
    })
}
