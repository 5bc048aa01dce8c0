//! FASTA record reading and writing.
//!
//! The pipeline filters and copies individual records, so this parser is
//! record-oriented rather than alignment-oriented. Identifiers are the first
//! whitespace-delimited token of the header line; the remainder of the
//! header is kept as the description.
//!
//! ## FASTA Format
//!
//! ```text
//! >sequence_identifier optional description
//! ACGTACGTACGT...
//! >another_sequence
//! TGCATGCATGCA...
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use thiserror::Error;

/// Errors that can occur during FASTA parsing.
#[derive(Error, Debug)]
pub enum FastaError {
    #[error("Failed to open file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Empty FASTA file")]
    EmptyFile,

    #[error("Invalid FASTA format: {0}")]
    InvalidFormat(String),

    #[error("Sequence without header at line {0}")]
    SequenceWithoutHeader(usize),
}

/// Result type for FASTA operations.
pub type FastaResult<T> = Result<T, FastaError>;

/// A single FASTA record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Identifier (first token of the header, without '>')
    pub id: String,
    /// Remainder of the header line, if any
    pub desc: Option<String>,
    /// Residue string (nucleotides or amino acids)
    pub seq: String,
}

impl Record {
    /// Creates a new record without a description.
    pub fn new(id: impl Into<String>, seq: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            desc: None,
            seq: seq.into(),
        }
    }

    /// Writes the record in FASTA format.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        match &self.desc {
            Some(desc) => writeln!(writer, ">{} {}", self.id, desc)?,
            None => writeln!(writer, ">{}", self.id)?,
        }
        writeln!(writer, "{}", self.seq)
    }
}

/// Reads all records from a FASTA file.
pub fn read_records<P: AsRef<Path>>(path: P) -> FastaResult<Vec<Record>> {
    let file = File::open(&path)?;
    let reader = BufReader::new(file);
    parse_records(reader)
}

/// Parses FASTA records from a reader.
///
/// Handles multi-line sequences and skips empty lines.
pub fn parse_records<R: BufRead>(reader: R) -> FastaResult<Vec<Record>> {
    let mut records: Vec<Record> = Vec::new();
    let mut current: Option<Record> = None;
    let mut line_number = 0;

    for line_result in reader.lines() {
        line_number += 1;
        let line = line_result?;
        let line = line.trim();

        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix('>') {
            if let Some(record) = current.take() {
                records.push(record);
            }

            let mut parts = header.splitn(2, char::is_whitespace);
            let id = parts.next().unwrap_or(header).to_string();
            if id.is_empty() {
                return Err(FastaError::InvalidFormat(format!(
                    "Empty sequence identifier at line {}",
                    line_number
                )));
            }
            let desc = parts
                .next()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(String::from);

            current = Some(Record {
                id,
                desc,
                seq: String::new(),
            });
        } else {
            match current.as_mut() {
                Some(record) => {
                    // Most FASTA lines carry no internal whitespace
                    if line.bytes().all(|b| !b.is_ascii_whitespace()) {
                        record.seq.push_str(line);
                    } else {
                        record.seq.extend(line.chars().filter(|c| !c.is_whitespace()));
                    }
                }
                None => return Err(FastaError::SequenceWithoutHeader(line_number)),
            }
        }
    }

    if let Some(record) = current {
        records.push(record);
    }

    if records.is_empty() {
        return Err(FastaError::EmptyFile);
    }

    Ok(records)
}

/// Parses FASTA records from a string.
///
/// Useful for testing or processing in-memory data.
pub fn parse_records_str(content: &str) -> FastaResult<Vec<Record>> {
    parse_records(content.as_bytes())
}
