use crate::core::models::sequence::SequenceRecord;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FastaError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: FastaParseErrorKind,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FastaParseErrorKind {
    #[error("Sequence data found before the first '>' header")]
    MissingHeader,
    #[error("Header line has no identifier")]
    EmptyIdentifier,
}

/// Streaming reader over FASTA records.
///
/// The identifier is the first whitespace-delimited token of the header; sequence lines are
/// concatenated with surrounding whitespace removed. Blank lines are ignored anywhere.
pub struct FastaReader<R: BufRead> {
    reader: R,
    line_buf: String,
    line_num: usize,
    pending_id: Option<String>,
    started: bool,
}

impl FastaReader<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, FastaError> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> FastaReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_buf: String::with_capacity(256),
            line_num: 0,
            pending_id: None,
            started: false,
        }
    }

    fn next_line(&mut self) -> Result<bool, FastaError> {
        self.line_buf.clear();
        let read = self.reader.read_line(&mut self.line_buf)?;
        if read > 0 {
            self.line_num += 1;
        }
        Ok(read > 0)
    }

    fn parse_header(&self) -> Result<String, FastaError> {
        self.line_buf[1..]
            .split_whitespace()
            .next()
            .map(str::to_string)
            .ok_or(FastaError::Parse {
                line: self.line_num,
                kind: FastaParseErrorKind::EmptyIdentifier,
            })
    }

    fn seek_first_header(&mut self) -> Result<(), FastaError> {
        self.started = true;
        while self.next_line()? {
            if self.line_buf.trim().is_empty() {
                continue;
            }
            if !self.line_buf.starts_with('>') {
                return Err(FastaError::Parse {
                    line: self.line_num,
                    kind: FastaParseErrorKind::MissingHeader,
                });
            }
            self.pending_id = Some(self.parse_header()?);
            break;
        }
        Ok(())
    }

    pub fn read_next(&mut self) -> Result<Option<SequenceRecord>, FastaError> {
        if !self.started {
            self.seek_first_header()?;
        }

        let Some(id) = self.pending_id.take() else {
            return Ok(None);
        };

        let mut sequence = String::new();
        while self.next_line()? {
            if self.line_buf.starts_with('>') {
                self.pending_id = Some(self.parse_header()?);
                break;
            }
            sequence.push_str(self.line_buf.trim());
        }

        Ok(Some(SequenceRecord { id, sequence }))
    }
}

impl<R: BufRead> Iterator for FastaReader<R> {
    type Item = Result<SequenceRecord, FastaError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_next().transpose()
    }
}

/// Writes a single record as a two-line FASTA entry.
pub fn write_record(record: &SequenceRecord, writer: &mut impl Write) -> io::Result<()> {
    writeln!(writer, ">{}", record.id)?;
    writeln!(writer, "{}", record.sequence)
}

pub fn write_record_to_path<P: AsRef<Path>>(record: &SequenceRecord, path: P) -> io::Result<()> {
    let mut file = io::BufWriter::new(File::create(path)?);
    write_record(record, &mut file)?;
    file.flush()
}
