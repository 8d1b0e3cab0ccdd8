//! # Workflows Module
//!
//! Entry points that run the pipeline end to end.
//!
//! - **Document Assembly** ([`assemble`]) - Aligns every protein of one sequence-set file,
//!   attaches its ligands and writes the output document.
//! - **Batch Processing** ([`batch`]) - Finds all sequence-set files in an input location
//!   and assembles each one, writing a per-protein run summary at the end.
//!
//! Per-protein problems (failed alignments, bad ligand rows) never stop a workflow. A
//! sequence-set file that cannot be read stops only that file.

pub mod assemble;
pub mod batch;
