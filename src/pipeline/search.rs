//! Search runner stage.
//!
//! One similarity search per database FASTA file, program chosen from the
//! (query, database) molecule-type pair. Output is BLAST XML (`-outfmt 5`),
//! written beside the database and then moved into the search-output
//! directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};

use crate::config::{MoleculeType, PipelineConfig, BLASTOUT_SUFFIX};
use crate::pipeline::db::fasta_files;
use crate::tools::run_checked;

/// Fixed significance threshold for accepting a hit.
pub const EVALUE: &str = "1e-5";

/// The search program variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlastProgram {
    /// nucleotide query vs nucleotide database
    Blastn,
    /// translated nucleotide query vs protein database
    Blastx,
    /// protein query vs translated nucleotide database
    Tblastn,
    /// protein query vs protein database
    Blastp,
}

impl BlastProgram {
    /// Selects the program for a (query, database) molecule-type pair.
    ///
    /// Deterministic and exhaustive: the two valid molecule types leave no
    /// other combination.
    pub fn select(query: MoleculeType, db: MoleculeType) -> Self {
        match (query, db) {
            (MoleculeType::Nucl, MoleculeType::Nucl) => BlastProgram::Blastn,
            (MoleculeType::Nucl, MoleculeType::Prot) => BlastProgram::Blastx,
            (MoleculeType::Prot, MoleculeType::Nucl) => BlastProgram::Tblastn,
            (MoleculeType::Prot, MoleculeType::Prot) => BlastProgram::Blastp,
        }
    }

    /// The external binary to invoke.
    pub fn command_name(&self) -> &'static str {
        match self {
            BlastProgram::Blastn => "blastn",
            BlastProgram::Blastx => "blastx",
            BlastProgram::Tblastn => "tblastn",
            BlastProgram::Blastp => "blastp",
        }
    }
}

impl std::fmt::Display for BlastProgram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.command_name())
    }
}

/// Builds the argument list for one search invocation.
pub fn search_args(
    query: &Path,
    db_file: &Path,
    out_file: &Path,
    threads: usize,
    max_hits: usize,
) -> Vec<String> {
    vec![
        "-query".to_string(),
        query.display().to_string(),
        "-db".to_string(),
        db_file.display().to_string(),
        "-evalue".to_string(),
        EVALUE.to_string(),
        "-num_threads".to_string(),
        threads.to_string(),
        "-max_target_seqs".to_string(),
        max_hits.to_string(),
        "-outfmt".to_string(),
        "5".to_string(),
        "-out".to_string(),
        out_file.display().to_string(),
    ]
}

/// Runs one search per database FASTA and moves the outputs into `out_dir`.
///
/// Returns the number of searches executed.
pub fn run(config: &PipelineConfig, db_dir: &Path, out_dir: &Path) -> Result<usize> {
    let program = BlastProgram::select(config.query_type, config.db_type);
    eprintln!(
        "Searching with {} ({} query vs {} database)",
        program, config.query_type, config.db_type
    );

    let mut produced: Vec<PathBuf> = Vec::new();
    for db_file in fasta_files(db_dir)? {
        let name = db_file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let out_file = PathBuf::from(format!("{}{}", name, BLASTOUT_SUFFIX));

        let mut command = Command::new(program.command_name());
        command.args(search_args(
            &config.query,
            &db_file,
            &out_file,
            config.threads,
            config.max_hits,
        ));
        run_checked(command)
            .with_context(|| format!("Search against {} failed", db_file.display()))?;
        produced.push(out_file);
    }

    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;
    for out_file in &produced {
        let dest = out_dir.join(out_file);
        fs::rename(out_file, &dest)
            .with_context(|| format!("Failed to move {} to {}", out_file.display(), dest.display()))?;
    }

    Ok(produced.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use MoleculeType::{Nucl, Prot};

    #[test]
    fn test_program_selection_is_exhaustive() {
        assert_eq!(BlastProgram::select(Nucl, Nucl), BlastProgram::Blastn);
        assert_eq!(BlastProgram::select(Nucl, Prot), BlastProgram::Blastx);
        assert_eq!(BlastProgram::select(Prot, Nucl), BlastProgram::Tblastn);
        assert_eq!(BlastProgram::select(Prot, Prot), BlastProgram::Blastp);
    }

    #[test]
    fn test_command_names() {
        assert_eq!(BlastProgram::Blastn.command_name(), "blastn");
        assert_eq!(BlastProgram::Tblastn.to_string(), "tblastn");
    }

    #[test]
    fn test_search_args() {
        let args = search_args(
            Path::new("query.fasta"),
            Path::new("blastdb/genes.fasta"),
            Path::new("genes.fasta_blastout"),
            4,
            5,
        );

        let joined = args.join(" ");
        assert!(joined.contains("-query query.fasta"));
        assert!(joined.contains("-db blastdb/genes.fasta"));
        assert!(joined.contains("-evalue 1e-5"));
        assert!(joined.contains("-num_threads 4"));
        assert!(joined.contains("-max_target_seqs 5"));
        assert!(joined.contains("-outfmt 5"));
        assert!(joined.contains("-out genes.fasta_blastout"));
    }
}
