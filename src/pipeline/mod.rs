//! The linear analysis pipeline.
//!
//! Stages run strictly sequentially, each reading the filesystem artifacts
//! the previous stage wrote:
//!
//! 1. `db`: index the source FASTA files into a search database
//! 2. `search`: one similarity search per database file
//! 3. `extract`: collect hit sequences into one combined FASTA
//! 4. `align`: multiple-sequence alignment + statistics export
//! 5. `align::run_tree` (optional): tree inference on the cleaned alignment
//!
//! Every external invocation is a blocking call checked for success;
//! parallelism, if any, lives inside the external tools via their thread
//! count flags.

pub mod align;
pub mod db;
pub mod extract;
pub mod search;

use std::path::Path;

use anyhow::Result;

use crate::config::{PipelineConfig, ALIGNMENT_SEQS, BLASTDB_DIR, BLASTOUT_DIR};

/// Runs the pipeline end to end.
///
/// Without an aligner path the pipeline stops after the search stage;
/// without an IQ-TREE path the tree file remains an externally produced
/// input.
pub fn run_pipeline(config: &PipelineConfig) -> Result<()> {
    let db_dir = Path::new(BLASTDB_DIR);
    let out_dir = Path::new(BLASTOUT_DIR);

    db::build(&config.fasta_dir, config.db_type, db_dir)?;

    let searches = search::run(config, db_dir, out_dir)?;
    eprintln!("Completed {} search(es) into {}", searches, out_dir.display());

    let jar = match &config.aligner {
        Some(jar) => jar,
        None => {
            eprintln!("No aligner given; stopping after the search stage");
            return Ok(());
        }
    };

    let summary = extract::extract_hits(&config.fasta_dir, out_dir, Path::new(ALIGNMENT_SEQS))?;
    eprintln!(
        "Collected {} hit sequence(s) into {} ({} duplicate(s), {} missing)",
        summary.written, ALIGNMENT_SEQS, summary.duplicates, summary.missing
    );

    align::run(jar)?;
    if let Some(iqtree) = &config.iqtree {
        align::run_tree(iqtree, config.threads)?;
    }

    Ok(())
}
