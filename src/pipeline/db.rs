//! Database builder stage.
//!
//! Runs `makeblastdb` over every FASTA file in the source directory, then
//! stages the results: generated index files are moved into the database
//! directory, the FASTA sources are copied in beside them (originals stay
//! in place). Indexing and staging are separate functions so the
//! move/copy contract is testable without the external binary.

use std::fs;
use std::path::Path;
use std::process::Command;

use anyhow::{bail, Context, Result};

use crate::config::{is_fasta_name, MoleculeType};
use crate::tools::run_checked;

/// Builds the search database from a directory of FASTA files.
///
/// Creates `db_dir` idempotently. Fails on the first indexing error rather
/// than leaving a silently unusable database behind.
pub fn build(fasta_dir: &Path, db_type: MoleculeType, db_dir: &Path) -> Result<()> {
    let mut indexed = 0;
    for path in fasta_files(fasta_dir)? {
        index_fasta(&path, db_type)
            .with_context(|| format!("Indexing {} failed", path.display()))?;
        indexed += 1;
    }
    if indexed == 0 {
        bail!("No FASTA files found in {}", fasta_dir.display());
    }

    stage_outputs(fasta_dir, db_dir)?;
    eprintln!("Built database from {} FASTA file(s) into {}", indexed, db_dir.display());
    Ok(())
}

/// Runs the indexing tool on one FASTA file.
///
/// `-parse_seqids` keeps the original identifiers addressable in the
/// generated index.
fn index_fasta(fasta: &Path, db_type: MoleculeType) -> Result<()> {
    let mut command = Command::new("makeblastdb");
    command
        .arg("-in")
        .arg(fasta)
        .arg("-parse_seqids")
        .arg("-dbtype")
        .arg(db_type.to_string());
    run_checked(command)?;
    Ok(())
}

/// Moves generated index files into `db_dir` and copies the FASTA sources
/// in as well, leaving the originals untouched.
pub fn stage_outputs(fasta_dir: &Path, db_dir: &Path) -> Result<()> {
    fs::create_dir_all(db_dir)
        .with_context(|| format!("Failed to create {}", db_dir.display()))?;

    for entry in sorted_entries(fasta_dir)? {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = entry.file_name();
        let dest = db_dir.join(&name);
        if is_fasta_name(&name.to_string_lossy()) {
            fs::copy(&path, &dest)
                .with_context(|| format!("Failed to copy {} to {}", path.display(), dest.display()))?;
        } else {
            fs::rename(&path, &dest)
                .with_context(|| format!("Failed to move {} to {}", path.display(), dest.display()))?;
        }
    }
    Ok(())
}

/// FASTA-named files in the directory, sorted for a deterministic scan.
pub fn fasta_files(dir: &Path) -> Result<Vec<std::path::PathBuf>> {
    Ok(sorted_entries(dir)?
        .into_iter()
        .filter(|e| e.path().is_file() && is_fasta_name(&e.file_name().to_string_lossy()))
        .map(|e| e.path())
        .collect())
}

pub(crate) fn sorted_entries(dir: &Path) -> Result<Vec<fs::DirEntry>> {
    let mut entries: Vec<fs::DirEntry> = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?
        .collect::<std::io::Result<_>>()?;
    entries.sort_by_key(|e| e.file_name());
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    fn touch(dir: &Path, name: &str, content: &str) {
        let mut file = File::create(dir.join(name)).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    #[test]
    fn test_stage_moves_index_files_and_copies_fasta() {
        let src = tempfile::tempdir().unwrap();
        let db = tempfile::tempdir().unwrap();
        let db_dir = db.path().join("blastdb");

        touch(src.path(), "genes.fasta", ">a\nACGT\n");
        touch(src.path(), "genes.fasta.nhr", "index");
        touch(src.path(), "genes.fasta.nin", "index");
        touch(src.path(), "genes.fasta.nsq", "index");

        stage_outputs(src.path(), &db_dir).unwrap();

        // Index files moved out of the source directory
        assert!(!src.path().join("genes.fasta.nhr").exists());
        assert!(db_dir.join("genes.fasta.nhr").exists());
        assert!(db_dir.join("genes.fasta.nin").exists());
        assert!(db_dir.join("genes.fasta.nsq").exists());

        // FASTA copied, original untouched
        assert!(src.path().join("genes.fasta").exists());
        assert!(db_dir.join("genes.fasta").exists());
        assert_eq!(
            fs::read_to_string(db_dir.join("genes.fasta")).unwrap(),
            ">a\nACGT\n"
        );
    }

    #[test]
    fn test_stage_is_idempotent_on_directory_creation() {
        let src = tempfile::tempdir().unwrap();
        let db = tempfile::tempdir().unwrap();
        touch(src.path(), "genes.fa", ">a\nACGT\n");

        stage_outputs(src.path(), db.path()).unwrap();
        stage_outputs(src.path(), db.path()).unwrap();
        assert!(db.path().join("genes.fa").exists());
    }

    #[test]
    fn test_fasta_files_sorted_and_filtered() {
        let src = tempfile::tempdir().unwrap();
        touch(src.path(), "b.fasta", "");
        touch(src.path(), "a.fa", "");
        touch(src.path(), "notes.txt", "");

        let files = fasta_files(src.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.fa", "b.fasta"]);
    }

    #[test]
    fn test_build_fails_on_empty_directory() {
        let src = tempfile::tempdir().unwrap();
        let db = tempfile::tempdir().unwrap();
        let result = build(src.path(), MoleculeType::Nucl, db.path());
        assert!(result.is_err());
    }
}
