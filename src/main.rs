//! KaleView - Sequence Search Pipeline and Result Viewer
//!
//! ## Usage
//!
//! ```bash
//! # Index, search, extract, align, infer a tree
//! kaleview run -q query.fasta --qtype prot -f genomes/ --ftype nucl \
//!     -t 8 --aligner macse.jar --iqtree iqtree2
//!
//! # Browse the results
//! kaleview view
//! ```
//!
//! The `run` subcommand writes its artifacts into the working directory
//! (`blastdb/`, `blastout/`, `alignment/`, `tree/`); `view` reads the
//! same layout, overridable per directory.

// Use jemalloc for better memory management (returns memory to OS)
#[cfg(not(target_os = "windows"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use kaleview::config::{MoleculeType, PipelineConfig};
use kaleview::controller::run_app;
use kaleview::model::{AppState, ViewerPaths};
use kaleview::pipeline::run_pipeline;

/// KaleView - BLAST/MACSE pipeline with a terminal result viewer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the analysis pipeline: index, search, extract, align
    Run(RunArgs),
    /// Open the interactive result viewer
    View(ViewArgs),
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Query sequence file
    #[arg(short = 'q', long = "query")]
    query: PathBuf,

    /// Molecule type of the query
    #[arg(long = "qtype", value_enum)]
    qtype: MoleculeType,

    /// Directory of FASTA files to index and search
    #[arg(short = 'f', long = "fastas")]
    fastas: PathBuf,

    /// Molecule type of the FASTA files
    #[arg(long = "ftype", value_enum)]
    ftype: MoleculeType,

    /// Thread count passed to the external tools
    #[arg(short = 't', long = "threads", default_value = "1")]
    threads: usize,

    /// Maximum hits reported per search
    #[arg(short = 'm', long = "max-hits", default_value = "10")]
    max_hits: usize,

    /// MACSE jar; omit to stop after the search stage
    #[arg(long = "aligner")]
    aligner: Option<PathBuf>,

    /// IQ-TREE executable; omit to skip tree inference
    #[arg(long = "iqtree", requires = "aligner")]
    iqtree: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ViewArgs {
    /// Directory holding the aligner outputs
    #[arg(long = "alignment-dir", default_value = "alignment")]
    alignment_dir: PathBuf,

    /// Directory holding the search outputs
    #[arg(long = "blastout-dir", default_value = "blastout")]
    blastout_dir: PathBuf,

    /// Newick tree file
    #[arg(long = "tree", default_value = "tree/alignment_NT_NoFS.fasta.treefile")]
    tree: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Run(args) => {
            if args.threads < 1 {
                anyhow::bail!("Thread count must be at least 1 (got {})", args.threads);
            }
            if !args.query.is_file() {
                anyhow::bail!("Query file not found: {}", args.query.display());
            }
            if !args.fastas.is_dir() {
                anyhow::bail!("FASTA directory not found: {}", args.fastas.display());
            }

            let config = PipelineConfig {
                query: args.query,
                query_type: args.qtype,
                fasta_dir: args.fastas,
                db_type: args.ftype,
                threads: args.threads,
                max_hits: args.max_hits,
                aligner: args.aligner,
                iqtree: args.iqtree,
            };
            run_pipeline(&config)?;
        }
        Command::View(args) => {
            let paths = ViewerPaths::from_layout(&args.alignment_dir, &args.blastout_dir, &args.tree);
            let state = AppState::new(paths);
            run_app(state)?;
        }
    }

    Ok(())
}
