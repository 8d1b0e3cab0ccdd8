use crate::core::models::ligand::LigandSource;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

pub const SUMMARY_FILE_NAME: &str = "summary.tsv";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignmentStatus {
    Ok,
    Failed,
}

/// Per-protein outcome of a run, one row of `summary.tsv`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub file: String,
    pub protein_id: String,
    pub alignment: AlignmentStatus,
    pub ligand_table: LigandSource,
    pub ligands: usize,
}

pub fn write_to(rows: &[SummaryRow], writer: impl Write) -> Result<(), csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(writer);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_to_path(rows: &[SummaryRow], path: &Path) -> Result<(), csv::Error> {
    let file = std::fs::File::create(path)?;
    write_to(rows, file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_written_as_tsv_with_header() {
        let rows = vec![
            SummaryRow {
                file: "p.fasta".to_string(),
                protein_id: "P1".to_string(),
                alignment: AlignmentStatus::Ok,
                ligand_table: LigandSource::Matched,
                ligands: 1,
            },
            SummaryRow {
                file: "p.fasta".to_string(),
                protein_id: "P2".to_string(),
                alignment: AlignmentStatus::Failed,
                ligand_table: LigandSource::Matched,
                ligands: 0,
            },
        ];

        let mut buffer = Vec::new();
        write_to(&rows, &mut buffer).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "file\tprotein_id\talignment\tligand_table\tligands\n\
             p.fasta\tP1\tok\tmatched\t1\n\
             p.fasta\tP2\tfailed\tmatched\t0\n"
        );
    }

    #[test]
    fn empty_summary_has_no_rows() {
        let mut buffer = Vec::new();
        write_to(&[], &mut buffer).unwrap();
        assert!(buffer.is_empty());
    }
}
