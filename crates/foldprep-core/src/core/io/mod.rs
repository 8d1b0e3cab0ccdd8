//! File-level input and output for the pipeline.
//!
//! Readers and writers here are stateless: each one turns a path or stream into a model
//! type from [`crate::core::models`] or back, and reports failures through its own error
//! type. Conditions the pipeline tolerates (bad table rows, escaper failures) are logged
//! and absorbed at this level.

pub mod document;
pub mod escape;
pub mod fasta;
pub mod ligand_table;
pub mod output_location;
pub mod summary;
