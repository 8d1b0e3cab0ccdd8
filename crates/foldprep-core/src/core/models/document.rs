use super::ligand::{LigandRecord, Smiles};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProteinEntry {
    pub id: Vec<String>,
    pub sequence: String,
    /// MSA artifact path relative to the output location; absent when alignment failed.
    #[serde(rename = "unpairedMsaPath", skip_serializing_if = "Option::is_none")]
    pub unpaired_msa_path: Option<PathBuf>,
}

impl ProteinEntry {
    pub fn new(
        id: impl Into<String>,
        sequence: impl Into<String>,
        unpaired_msa_path: Option<PathBuf>,
    ) -> Self {
        Self {
            id: vec![id.into()],
            sequence: sequence.into(),
            unpaired_msa_path,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LigandEntry {
    pub id: Vec<String>,
    pub smiles: Smiles,
}

impl From<&LigandRecord> for LigandEntry {
    fn from(record: &LigandRecord) -> Self {
        Self {
            id: vec![record.ligand_id.clone()],
            smiles: record.smiles.clone(),
        }
    }
}

/// One element of the document's `sequences` list, serialized as
/// `{"protein": {...}}` or `{"ligand": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SequenceEntry {
    Protein(ProteinEntry),
    Ligand(LigandEntry),
}

impl SequenceEntry {
    pub fn is_protein(&self) -> bool {
        matches!(self, SequenceEntry::Protein(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputDocument {
    pub name: String,
    sequences: Vec<SequenceEntry>,
    pub dialect: String,
    pub version: u32,
}

impl OutputDocument {
    /// Builds a document whose `sequences` are all `proteins` followed by all `ligands`.
    ///
    /// Both lists keep their own order, so the protein-before-ligand layout holds no matter
    /// how protein and ligand collection were interleaved by the caller.
    pub fn new(
        name: impl Into<String>,
        proteins: Vec<ProteinEntry>,
        ligands: Vec<LigandEntry>,
        dialect: impl Into<String>,
        version: u32,
    ) -> Self {
        let mut sequences = Vec::with_capacity(proteins.len() + ligands.len());
        sequences.extend(proteins.into_iter().map(SequenceEntry::Protein));
        sequences.extend(ligands.into_iter().map(SequenceEntry::Ligand));
        Self {
            name: name.into(),
            sequences,
            dialect: dialect.into(),
            version,
        }
    }

    pub fn sequences(&self) -> &[SequenceEntry] {
        &self.sequences
    }

    pub fn proteins(&self) -> impl Iterator<Item = &ProteinEntry> {
        self.sequences.iter().filter_map(|entry| match entry {
            SequenceEntry::Protein(protein) => Some(protein),
            SequenceEntry::Ligand(_) => None,
        })
    }

    pub fn ligands(&self) -> impl Iterator<Item = &LigandEntry> {
        self.sequences.iter().filter_map(|entry| match entry {
            SequenceEntry::Ligand(ligand) => Some(ligand),
            SequenceEntry::Protein(_) => None,
        })
    }
}
