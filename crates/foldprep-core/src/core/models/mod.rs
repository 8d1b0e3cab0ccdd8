//! Plain data types describing pipeline inputs and outputs.

pub mod document;
pub mod ligand;
pub mod sequence;
