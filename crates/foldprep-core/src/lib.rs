//! # foldprep Core Library
//!
//! Prepares structure-prediction input documents by combining per-protein MSA searches
//! with optional ligand associations keyed by protein identifier.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer layout so that each concern can be tested on its own.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`SequenceRecord`, `LigandTable`,
//!   `OutputDocument`) and the file-level I/O around them: FASTA reading, ligand table
//!   loading, SMILES escaping, document writing and output location handling.
//!
//! - **[`engine`]: The Logic Core.** Pipeline configuration, the external aligner adapter
//!   that drives the four-step MSA search, progress reporting and the error taxonomy.
//!
//! - **[`workflows`]: The Public API.** The document assembler, which merges alignment
//!   results and ligand records for one sequence-set file, and the batch driver, which
//!   runs the assembler over a whole input location.

pub mod core;
pub mod engine;
pub mod workflows;
