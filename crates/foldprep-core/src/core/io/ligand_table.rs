use super::escape::SmilesEscaper;
use crate::core::models::ligand::{LigandRecord, LigandTable, Smiles};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error, warn};

const FIELD_DELIMITER: char = '\t';

#[derive(Debug, Error)]
pub enum LigandTableError {
    #[error("Failed to read ligand table '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Loads a tab-separated ligand table (`protein_id`, `ligand_id`, `smiles`, ...).
///
/// A missing file yields an empty table. Rows with fewer than three fields or bytes that
/// are not UTF-8 are logged and skipped; a SMILES value the escaper rejects is kept
/// unescaped.
pub fn load(path: &Path, escaper: &dyn SmilesEscaper) -> Result<LigandTable, LigandTableError> {
    if !path.exists() {
        debug!("Ligand table {:?} does not exist, using an empty table.", path);
        return Ok(LigandTable::new());
    }

    let io_err = |source| LigandTableError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(io_err)?;
    read_from(BufReader::new(file), &path.display().to_string(), escaper).map_err(io_err)
}

/// Parses ligand rows from any buffered reader. `source` names the input in log messages.
pub fn read_from(
    reader: impl BufRead,
    source: &str,
    escaper: &dyn SmilesEscaper,
) -> io::Result<LigandTable> {
    let mut table = LigandTable::new();
    let mut skipped = 0usize;

    for (line_num, line_res) in reader.split(b'\n').enumerate() {
        let bytes = line_res?;
        let Ok(line) = std::str::from_utf8(&bytes) else {
            warn!(
                "Skipping line {} in {}: not valid UTF-8",
                line_num + 1,
                source
            );
            skipped += 1;
            continue;
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let fields: Vec<&str> = trimmed.split(FIELD_DELIMITER).collect();
        let [protein_id, ligand_id, smiles, ..] = fields[..] else {
            warn!(
                "Skipping invalid line {} in {}: {}",
                line_num + 1,
                source,
                trimmed
            );
            skipped += 1;
            continue;
        };

        let smiles = match escaper.escape(smiles) {
            Ok(escaped) => Smiles::Escaped(escaped),
            Err(e) => {
                error!(
                    "Error JSON-escaping SMILES for ligand '{}' ({}:{}): {}. Using the raw value.",
                    ligand_id,
                    source,
                    line_num + 1,
                    e
                );
                Smiles::Raw(smiles.to_string())
            }
        };

        table.push(LigandRecord {
            protein_id: protein_id.to_string(),
            ligand_id: ligand_id.to_string(),
            smiles,
        });
    }

    debug!(
        "Loaded {} ligand record(s) for {} protein(s) from {} ({} line(s) skipped).",
        table.record_count(),
        table.protein_count(),
        source,
        skipped
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::escape::{EscapeError, JsonEscaper};
    use std::io::Cursor;

    struct FailingEscaper;

    impl SmilesEscaper for FailingEscaper {
        fn escape(&self, _smiles: &str) -> Result<String, EscapeError> {
            Err(EscapeError::Failed {
                program: PathBuf::from("jq"),
                code: Some(1),
                stderr: "unavailable".to_string(),
            })
        }
    }

    fn parse(text: &str) -> LigandTable {
        read_from(Cursor::new(text), "test.tsv", &JsonEscaper).unwrap()
    }

    fn ligand_ids(table: &LigandTable, protein: &str) -> Vec<String> {
        table
            .get(protein)
            .map(|records| records.iter().map(|r| r.ligand_id.clone()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn reads_rows_grouped_by_protein_in_table_order() {
        let table = parse("P1\tL1\tCCO\nP2\tL3\tO\nP1\tL2\tCCN\n");
        assert_eq!(ligand_ids(&table, "P1"), vec!["L1", "L2"]);
        assert_eq!(ligand_ids(&table, "P2"), vec!["L3"]);
        assert_eq!(
            table.get("P1").unwrap()[0].smiles,
            Smiles::Escaped("CCO".to_string())
        );
    }

    #[test]
    fn row_with_two_fields_is_skipped() {
        let table = parse("P1\tL1\n");
        assert!(table.get("P1").is_none());
        assert!(table.is_empty());
    }

    #[test]
    fn invalid_rows_do_not_stop_loading() {
        let table = parse("P1\tL1\nP2\tL2\tCCO\n");
        assert!(table.get("P1").is_none());
        assert_eq!(ligand_ids(&table, "P2"), vec!["L2"]);
    }

    #[test]
    fn non_utf8_row_is_skipped_and_loading_continues() {
        let bytes = b"P1\tL1\tCCO\nP2\tL\xe9\tO\nP3\tL3\tN\n".to_vec();
        let table = read_from(Cursor::new(bytes), "test.tsv", &JsonEscaper).unwrap();
        assert_eq!(ligand_ids(&table, "P1"), vec!["L1"]);
        assert!(table.get("P2").is_none());
        assert_eq!(ligand_ids(&table, "P3"), vec!["L3"]);
    }

    #[test]
    fn crlf_line_endings_are_accepted() {
        let table = parse("P1\tL1\tCCO\r\nP2\tL2\tO\r\n");
        assert_eq!(table.get("P1").unwrap()[0].smiles.as_str(), "CCO");
        assert_eq!(ligand_ids(&table, "P2"), vec!["L2"]);
    }

    #[test]
    fn blank_and_whitespace_lines_are_ignored() {
        let table = parse("\n   \n\t\nP1\tL1\tCCO\n\n");
        assert_eq!(table.record_count(), 1);
    }

    #[test]
    fn surrounding_whitespace_and_extra_columns_are_dropped() {
        let table = parse("  P1\tL1\tCCO\tnote\t \n");
        let record = &table.get("P1").unwrap()[0];
        assert_eq!(record.ligand_id, "L1");
        assert_eq!(record.smiles.as_str(), "CCO");
    }

    #[test]
    fn duplicate_rows_are_kept() {
        let table = parse("P1\tL1\tCCO\nP1\tL1\tCCO\n");
        assert_eq!(table.get("P1").unwrap().len(), 2);
    }

    #[test]
    fn escaper_failure_falls_back_to_raw_smiles() {
        let table = read_from(Cursor::new("P1\tL1\tC\\C\n"), "test.tsv", &FailingEscaper).unwrap();
        assert_eq!(
            table.get("P1").unwrap()[0].smiles,
            Smiles::Raw("C\\C".to_string())
        );
    }

    #[test]
    fn missing_file_yields_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let table = load(&dir.path().join("absent.tsv"), &JsonEscaper).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn loading_the_same_bytes_twice_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("p.tsv");
        std::fs::write(&path, "P1\tL1\tCCO\nP2\tL2\tF/C=C\\F\nbad\nP1\tL3\tO\n").unwrap();

        let first = load(&path, &JsonEscaper).unwrap();
        let second = load(&path, &JsonEscaper).unwrap();
        assert_eq!(first, second);
    }
}
