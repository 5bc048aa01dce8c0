//! Pipeline configuration and filesystem layout.
//!
//! Every stage receives an explicit [`PipelineConfig`] instead of reading
//! global CLI state, so the library functions stay callable on their own.

use std::path::PathBuf;

use clap::ValueEnum;

/// Recognized FASTA file extensions.
pub const FASTA_EXTS: [&str; 3] = [".fasta", ".fa", ".fas"];

/// Directory receiving the generated index files plus FASTA copies.
pub const BLASTDB_DIR: &str = "blastdb";
/// Directory receiving one BLAST XML output per database FASTA.
pub const BLASTOUT_DIR: &str = "blastout";
/// Suffix appended to each search output file.
pub const BLASTOUT_SUFFIX: &str = "_blastout";
/// Combined FASTA of all hit sequences, input to the aligner.
pub const ALIGNMENT_SEQS: &str = "alignment_seqs.fasta";
/// Directory receiving the aligner outputs.
pub const ALIGNMENT_DIR: &str = "alignment";
/// Prefix shared by every aligner output file.
pub const ALIGNMENT_PREFIX: &str = "alignment";
/// Directory receiving the inferred tree.
pub const TREE_DIR: &str = "tree";
/// Per-sequence statistics table exported by the aligner.
pub const SEQ_STATS_CSV: &str = "alignment_seq_stats.csv";
/// Per-site statistics table exported by the aligner.
pub const SITE_STATS_CSV: &str = "alignment_frequencies_stats.csv";
/// Cleaned nucleotide alignment, the tree-inference input.
pub const NT_NOFS_FASTA: &str = "alignment_NT_NoFS.fasta";
/// Tree file consumed by the viewer.
pub const TREE_FILE: &str = "alignment_NT_NoFS.fasta.treefile";

/// Molecule type of a sequence set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MoleculeType {
    /// Nucleotide alphabet
    Nucl,
    /// Amino acid alphabet
    Prot,
}

impl std::fmt::Display for MoleculeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoleculeType::Nucl => write!(f, "nucl"),
            MoleculeType::Prot => write!(f, "prot"),
        }
    }
}

/// Everything the pipeline stages need, resolved once from the CLI.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Query sequence file.
    pub query: PathBuf,
    /// Molecule type of the query.
    pub query_type: MoleculeType,
    /// Directory holding the source FASTA files.
    pub fasta_dir: PathBuf,
    /// Molecule type of the database FASTA files.
    pub db_type: MoleculeType,
    /// Thread count passed through to the external tools.
    pub threads: usize,
    /// Maximum hits reported per search.
    pub max_hits: usize,
    /// MACSE jar; `None` stops the pipeline after the search stage.
    pub aligner: Option<PathBuf>,
    /// IQ-TREE executable; `None` skips tree inference.
    pub iqtree: Option<PathBuf>,
}

/// Returns true if the file name carries a recognized FASTA extension.
pub fn is_fasta_name(name: &str) -> bool {
    FASTA_EXTS.iter().any(|ext| name.ends_with(ext))
}
