//! Per-sequence alignment statistics table.
//!
//! The aligner exports its statistics as semicolon-delimited CSV with one
//! header row; the first field of every data row is the sequence
//! identifier. The viewer re-reads the file on every lookup, so the table
//! is never cached here.

use std::fs::File;
use std::path::Path;

use thiserror::Error;

/// Errors that can occur while reading a statistics table.
#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Failed to open file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Malformed statistics table: {0}")]
    Malformed(#[from] csv::Error),

    #[error("Statistics table has no header row")]
    MissingHeader,
}

/// Result type for statistics-table operations.
pub type StatsResult<T> = Result<T, StatsError>;

fn reader_for(path: &Path) -> StatsResult<csv::Reader<File>> {
    let file = File::open(path)?;
    Ok(csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .flexible(true)
        .from_reader(file))
}

/// Returns true if any row's first field equals the identifier.
pub fn contains<P: AsRef<Path>>(path: P, id: &str) -> StatsResult<bool> {
    let mut reader = reader_for(path.as_ref())?;
    for row in reader.records() {
        let row = row?;
        if row.get(0) == Some(id) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Finds the row whose first field equals the identifier.
///
/// Returns the header row together with the matching data row, ready for
/// tabular display; `None` if the identifier is absent.
pub fn lookup<P: AsRef<Path>>(
    path: P,
    id: &str,
) -> StatsResult<Option<(Vec<String>, Vec<String>)>> {
    let mut reader = reader_for(path.as_ref())?;
    let header: Vec<String> = reader
        .headers()
        .map_err(StatsError::Malformed)?
        .iter()
        .map(String::from)
        .collect();
    if header.is_empty() {
        return Err(StatsError::MissingHeader);
    }

    for row in reader.records() {
        let row = row?;
        if row.get(0) == Some(id) {
            let fields = row.iter().map(String::from).collect();
            return Ok(Some((header, fields)));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "seqName;initialSeqLength;alignedSeqLength;FS;stop\n\
                          Example_1234;642;660;1;0\n\
                          Example_5678;511;660;0;2\n";

    fn sample_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_contains() {
        let file = sample_file();
        assert!(contains(file.path(), "Example_1234").unwrap());
        assert!(contains(file.path(), "Example_5678").unwrap());
        assert!(!contains(file.path(), "Example_0000").unwrap());
    }

    #[test]
    fn test_lookup_returns_header_and_row() {
        let file = sample_file();
        let (header, row) = lookup(file.path(), "Example_5678").unwrap().unwrap();

        assert_eq!(header[0], "seqName");
        assert_eq!(header.len(), 5);
        assert_eq!(row, vec!["Example_5678", "511", "660", "0", "2"]);
    }

    #[test]
    fn test_lookup_absent_id() {
        let file = sample_file();
        assert!(lookup(file.path(), "nope").unwrap().is_none());
    }

    #[test]
    fn test_header_is_not_a_data_row() {
        let file = sample_file();
        // "seqName" is the header, not an identifier
        assert!(!contains(file.path(), "seqName").unwrap());
    }
}
