//! Hit extractor stage.
//!
//! Unions the hit identifiers from every search output, then scans the
//! source FASTA directory and writes the first occurrence of each wanted
//! record into the combined alignment input. Duplicate identifiers are
//! reported and skipped; identifiers never found are reported as missing.
//! The two checks are independent: missing identifiers are reported whether
//! or not duplicates occurred.

use std::collections::HashSet;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};

use crate::fasta;
use crate::formats::blast_xml;
use crate::pipeline::db::{fasta_files, sorted_entries};

/// Counts reported back to the orchestrator.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExtractSummary {
    /// Records written to the combined FASTA
    pub written: usize,
    /// Identifiers seen again after already being written
    pub duplicates: usize,
    /// Identifiers never found in any source file
    pub missing: usize,
}

/// Collects the set of unique hit identifiers across all search outputs.
///
/// A file that cannot be parsed is reported and skipped: the search stage
/// already surfaced the failure, and a truncated output should not sink the
/// identifiers gathered from the others.
pub fn collect_hit_ids(out_dir: &Path) -> Result<HashSet<String>> {
    let mut ids = HashSet::new();
    for entry in sorted_entries(out_dir)? {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        match blast_xml::parse_file(&path) {
            Ok(output) => {
                for hit in output.hits() {
                    ids.insert(hit.identifier().to_string());
                }
            }
            Err(err) => {
                eprintln!(
                    "Warning: skipping unreadable search output {}: {}",
                    path.display(),
                    err
                );
            }
        }
    }
    Ok(ids)
}

/// Writes every hit sequence found in the source directory to `combined`.
///
/// Records appear in the order first encountered during the (sorted)
/// directory scan.
pub fn extract_hits(fasta_dir: &Path, out_dir: &Path, combined: &Path) -> Result<ExtractSummary> {
    let ids = collect_hit_ids(out_dir)?;
    write_matching_records(fasta_dir, &ids, combined)
}

/// The scan half of the extractor, separated so it is testable with a fixed
/// identifier set.
pub fn write_matching_records(
    fasta_dir: &Path,
    ids: &HashSet<String>,
    combined: &Path,
) -> Result<ExtractSummary> {
    let file = File::create(combined)
        .with_context(|| format!("Failed to create {}", combined.display()))?;
    let mut writer = BufWriter::new(file);

    let mut needed: HashSet<&str> = ids.iter().map(String::as_str).collect();
    let mut summary = ExtractSummary::default();

    for path in fasta_files(fasta_dir)? {
        let records = fasta::read_records(&path)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        for record in records {
            if !ids.contains(&record.id) {
                continue;
            }
            if needed.remove(record.id.as_str()) {
                record
                    .write_to(&mut writer)
                    .with_context(|| format!("Failed to write {}", combined.display()))?;
                summary.written += 1;
            } else {
                eprintln!(
                    "Warning: duplicate identifier '{}' in {} (first occurrence kept)",
                    record.id,
                    path.display()
                );
                summary.duplicates += 1;
            }
        }
    }

    let mut never_found: Vec<&str> = needed.into_iter().collect();
    never_found.sort_unstable();
    for id in never_found {
        eprintln!("Warning: hit identifier '{}' not found in any source FASTA", id);
        summary.missing += 1;
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, content: &str) {
        let mut file = File::create(dir.join(name)).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    fn id_set(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_exact_universe_in_scan_order() {
        let src = tempfile::tempdir().unwrap();
        write_file(src.path(), "a.fasta", ">seq1\nAAAA\n>seq2\nCCCC\n");
        write_file(src.path(), "b.fasta", ">seq3\nGGGG\n");

        let out = tempfile::tempdir().unwrap();
        let combined = out.path().join("combined.fasta");
        let summary =
            write_matching_records(src.path(), &id_set(&["seq1", "seq2", "seq3"]), &combined)
                .unwrap();

        assert_eq!(summary, ExtractSummary { written: 3, duplicates: 0, missing: 0 });
        let content = fs::read_to_string(&combined).unwrap();
        assert_eq!(content, ">seq1\nAAAA\n>seq2\nCCCC\n>seq3\nGGGG\n");
    }

    #[test]
    fn test_non_hits_are_filtered_out() {
        let src = tempfile::tempdir().unwrap();
        write_file(src.path(), "a.fasta", ">seq1\nAAAA\n>seq2\nCCCC\n");

        let out = tempfile::tempdir().unwrap();
        let combined = out.path().join("combined.fasta");
        let summary = write_matching_records(src.path(), &id_set(&["seq2"]), &combined).unwrap();

        assert_eq!(summary.written, 1);
        assert_eq!(fs::read_to_string(&combined).unwrap(), ">seq2\nCCCC\n");
    }

    #[test]
    fn test_duplicate_written_once_and_reported() {
        let src = tempfile::tempdir().unwrap();
        write_file(src.path(), "a.fasta", ">seq1\nAAAA\n");
        write_file(src.path(), "b.fasta", ">seq1\nTTTT\n");

        let out = tempfile::tempdir().unwrap();
        let combined = out.path().join("combined.fasta");
        let summary = write_matching_records(src.path(), &id_set(&["seq1"]), &combined).unwrap();

        assert_eq!(summary.written, 1);
        assert_eq!(summary.duplicates, 1);
        // The first occurrence (a.fasta, sorted order) wins
        assert_eq!(fs::read_to_string(&combined).unwrap(), ">seq1\nAAAA\n");
    }

    #[test]
    fn test_missing_reported_without_duplicates() {
        let src = tempfile::tempdir().unwrap();
        write_file(src.path(), "a.fasta", ">seq1\nAAAA\n");

        let out = tempfile::tempdir().unwrap();
        let combined = out.path().join("combined.fasta");
        let summary =
            write_matching_records(src.path(), &id_set(&["seq1", "ghost"]), &combined).unwrap();

        // Missing is reported even though no duplicate occurred
        assert_eq!(summary, ExtractSummary { written: 1, duplicates: 0, missing: 1 });
    }

    #[test]
    fn test_collect_ids_from_outputs() {
        let out = tempfile::tempdir().unwrap();
        write_file(out.path(), "genes.fasta_blastout", blast_xml::SAMPLE_XML);
        write_file(out.path(), "broken.fasta_blastout", "not xml");

        let ids = collect_hit_ids(out.path()).unwrap();
        assert_eq!(ids, id_set(&["Example_1234", "Example_5678"]));
    }
}
