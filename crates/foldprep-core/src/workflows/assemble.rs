use crate::core::io::document::{self, document_file_name};
use crate::core::io::escape::SmilesEscaper;
use crate::core::io::fasta::{self, FastaReader};
use crate::core::io::ligand_table;
use crate::core::io::summary::{AlignmentStatus, SummaryRow};
use crate::core::models::document::{LigandEntry, OutputDocument, ProteinEntry};
use crate::core::models::ligand::{LigandSource, LigandTable};
use crate::core::models::sequence::SequenceRecord;
use crate::engine::aligner::{Aligner, WORK_DIR_NAME};
use crate::engine::config::{InputLayout, PipelineConfig};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// Result of assembling one sequence-set file.
#[derive(Debug, Clone)]
pub struct Assembly {
    pub document: OutputDocument,
    pub document_path: PathBuf,
    pub summary: Vec<SummaryRow>,
}

/// The ligand table chosen for a sequence-set file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLigandTable {
    pub path: Option<PathBuf>,
    pub source: LigandSource,
}

/// Picks `<stem>.<ligand-extension>` next to the sequence-set file, else the shared default
/// table in the same directory, else nothing.
pub fn resolve_ligand_table(sequence_file: &Path, layout: &InputLayout) -> ResolvedLigandTable {
    let matched = sequence_file.with_extension(&layout.ligand_extension);
    if matched.is_file() {
        return ResolvedLigandTable {
            path: Some(matched),
            source: LigandSource::Matched,
        };
    }

    let fallback = sequence_file.with_file_name(&layout.default_ligand_table);
    if fallback.is_file() {
        return ResolvedLigandTable {
            path: Some(fallback),
            source: LigandSource::Default,
        };
    }

    ResolvedLigandTable {
        path: None,
        source: LigandSource::None,
    }
}

/// Builds and writes the output document for one sequence-set file.
///
/// Every protein is aligned and emitted in file order. Its ligands are collected on a
/// separate list, so the document holds all proteins first and then all ligands grouped by
/// protein. Alignment failures and missing ligands only affect the protein they belong to.
#[instrument(skip_all, name = "assemble", fields(file = %sequence_file.display()))]
pub fn run(
    sequence_file: &Path,
    output_dir: &Path,
    config: &PipelineConfig,
    aligner: &dyn Aligner,
    escaper: &dyn SmilesEscaper,
    reporter: &ProgressReporter,
) -> Result<Assembly, EngineError> {
    let name = file_name(sequence_file);
    let scope = artifact_scope(sequence_file);
    info!("Processing {}", name);

    let resolved = resolve_ligand_table(sequence_file, &config.layout);
    let ligand_table = match &resolved.path {
        Some(path) => {
            info!("Using ligand table {:?} ({:?})", path, resolved.source);
            ligand_table::load(path, escaper)?
        }
        None => {
            info!("No ligand table found for {}", name);
            LigandTable::new()
        }
    };

    let records = read_records(sequence_file)?;
    ensure_unique_ids(sequence_file, &records)?;

    let work_dir = output_dir.join(WORK_DIR_NAME).join(&scope);
    if config.isolate_queries && !records.is_empty() {
        fs::create_dir_all(&work_dir).map_err(|source| EngineError::Io {
            path: work_dir.clone(),
            source,
        })?;
    }

    reporter.report(Progress::TaskStart {
        total_steps: records.len() as u64,
    });

    let mut proteins = Vec::with_capacity(records.len());
    let mut ligands = Vec::new();
    let mut summary = Vec::with_capacity(records.len());

    for record in &records {
        let query = if config.isolate_queries {
            write_query(record, &work_dir)?
        } else {
            sequence_file.to_path_buf()
        };

        let alignment = aligner.align(&scope, &record.id, &query);
        let msa_path = alignment.path().map(|path| relative_to(path, output_dir));
        proteins.push(ProteinEntry::new(
            record.id.as_str(),
            record.sequence.as_str(),
            msa_path,
        ));

        let attached = ligand_table.get(&record.id).unwrap_or_default();
        ligands.extend(attached.iter().map(LigandEntry::from));

        summary.push(SummaryRow {
            file: name.clone(),
            protein_id: record.id.clone(),
            alignment: if alignment.is_success() {
                AlignmentStatus::Ok
            } else {
                AlignmentStatus::Failed
            },
            ligand_table: resolved.source,
            ligands: attached.len(),
        });
        reporter.report(Progress::TaskIncrement);
    }
    reporter.report(Progress::TaskFinish);

    let document = OutputDocument::new(
        name.as_str(),
        proteins,
        ligands,
        config.document.dialect.as_str(),
        config.document.version,
    );
    let document_path = output_dir.join(document_file_name(&name));
    document::write_to_path(&document, &document_path)?;
    info!("Completed {} -> {:?}", name, document_path);

    Ok(Assembly {
        document,
        document_path,
        summary,
    })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Namespace for a file's alignment artifacts: its name without the sequence extension.
fn artifact_scope(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name(path))
}

fn read_records(sequence_file: &Path) -> Result<Vec<SequenceRecord>, EngineError> {
    let to_engine = |source| EngineError::SequenceFile {
        path: sequence_file.to_path_buf(),
        source,
    };
    FastaReader::open(sequence_file)
        .map_err(to_engine)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(to_engine)
}

fn ensure_unique_ids(sequence_file: &Path, records: &[SequenceRecord]) -> Result<(), EngineError> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        if !seen.insert(record.id.as_str()) {
            return Err(EngineError::DuplicateIdentifier {
                path: sequence_file.to_path_buf(),
                id: record.id.clone(),
            });
        }
    }
    Ok(())
}

fn write_query(record: &SequenceRecord, work_dir: &Path) -> Result<PathBuf, EngineError> {
    let path = work_dir.join(format!("{}.fasta", record.id));
    fasta::write_record_to_path(record, &path).map_err(|source| EngineError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

fn relative_to(path: &Path, base: &Path) -> PathBuf {
    match path.strip_prefix(base) {
        Ok(relative) => relative.to_path_buf(),
        Err(_) => {
            warn!(
                "MSA {:?} is outside the output location {:?}; keeping the path as is.",
                path, base
            );
            path.to_path_buf()
        }
    }
}
