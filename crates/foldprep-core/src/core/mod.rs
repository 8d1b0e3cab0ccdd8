//! # Core Module
//!
//! Data models and file I/O shared by the engine and the workflows.
//!
//! - **Models** ([`models`]) - Sequence records, ligand records and tables, and the output
//!   document with its protein-then-ligand ordering.
//! - **File I/O** ([`io`]) - FASTA reading, ligand table loading, SMILES escaping, atomic
//!   document writing, run summaries and output location preparation.

pub mod io;
pub mod models;
