use serde::ser::Error as _;
use serde::{Serialize, Serializer};
use serde_json::value::RawValue;
use std::collections::HashMap;

/// A SMILES string as it will be embedded in the output document.
///
/// `Escaped` holds text that has already been made safe for a JSON string literal and is
/// written verbatim between quotes. `Raw` holds the untouched table value, used when the
/// escaper failed; it goes through the regular JSON string encoder instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Smiles {
    Escaped(String),
    Raw(String),
}

impl Smiles {
    pub fn as_str(&self) -> &str {
        match self {
            Smiles::Escaped(text) | Smiles::Raw(text) => text,
        }
    }

    pub fn is_escaped(&self) -> bool {
        matches!(self, Smiles::Escaped(_))
    }
}

impl Serialize for Smiles {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Smiles::Escaped(text) => {
                let literal = RawValue::from_string(format!("\"{}\"", text)).map_err(|e| {
                    S::Error::custom(format!("escaped SMILES '{}' is not a JSON string: {}", text, e))
                })?;
                literal.serialize(serializer)
            }
            Smiles::Raw(text) => serializer.serialize_str(text),
        }
    }
}

/// One row of a ligand table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LigandRecord {
    pub protein_id: String,
    pub ligand_id: String,
    pub smiles: Smiles,
}

/// Ligand records grouped by the protein they belong to, in table order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LigandTable {
    by_protein: HashMap<String, Vec<LigandRecord>>,
}

impl LigandTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record after any records already stored for the same protein.
    pub fn push(&mut self, record: LigandRecord) {
        self.by_protein
            .entry(record.protein_id.clone())
            .or_default()
            .push(record);
    }

    pub fn get(&self, protein_id: &str) -> Option<&[LigandRecord]> {
        self.by_protein.get(protein_id).map(Vec::as_slice)
    }

    pub fn protein_count(&self) -> usize {
        self.by_protein.len()
    }

    pub fn record_count(&self) -> usize {
        self.by_protein.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_protein.is_empty()
    }
}

/// Where the ligand table used for a sequence-set file came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LigandSource {
    /// A table sharing the sequence-set file's base name.
    Matched,
    /// The shared fallback table of the input location.
    Default,
    /// Neither table exists.
    None,
}
