//! # Engine Module
//!
//! The stateful side of the pipeline: how a run is configured, how the external aligner is
//! driven for each protein, how progress is reported and how failures are classified.
//!
//! - **Configuration** ([`config`]) - Aligner settings, document tags and input layout
//! - **Aligner Adapter** ([`aligner`]) - The four-step external MSA search per protein
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//! - **Error Handling** ([`error`]) - Errors that stop processing of a sequence-set file
//!
//! Per-protein alignment failures are not errors at this level; they surface as
//! [`aligner::AlignmentResult::Failed`] and are logged where they happen.

pub mod aligner;
pub mod config;
pub mod error;
pub mod progress;
