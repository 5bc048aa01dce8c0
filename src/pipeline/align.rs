//! Alignment runner stage.
//!
//! Three invocations of the MACSE jar in fixed order: align, export
//! statistics, export the cleaned alignment. Statistics come from the
//! frameshift-preserving alignment and must be exported before the cleanup
//! pass replaces the very codons they describe. All `alignment*` files are
//! then staged into the alignment directory.

use std::fs;
use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result};

use crate::config::{
    ALIGNMENT_DIR, ALIGNMENT_PREFIX, ALIGNMENT_SEQS, NT_NOFS_FASTA, SEQ_STATS_CSV, SITE_STATS_CSV,
    TREE_DIR, TREE_FILE,
};
use crate::tools::run_checked;

/// Frameshift-preserving nucleotide alignment.
const NT_FASTA: &str = "alignment_NT.fasta";
/// Frameshift-preserving amino-acid alignment.
const AA_FASTA: &str = "alignment_AA.fasta";
/// Cleaned amino-acid alignment.
const AA_NOFS_FASTA: &str = "alignment_AA_NoFS.fasta";
/// Placeholder codon for internal stops in the cleaned alignment.
const STOP_PLACEHOLDER: &str = "NNN";
/// Placeholder codon for frameshifts in the cleaned alignment.
const FRAMESHIFT_PLACEHOLDER: &str = "---";

fn macse(jar: &Path, prog: &str) -> Command {
    let mut command = Command::new("java");
    command.arg("-jar").arg(jar).arg("-prog").arg(prog);
    command
}

/// Runs the three-step alignment and stages the outputs.
pub fn run(jar: &Path) -> Result<()> {
    // 1. Codon-aware alignment, frameshift and stop artifacts preserved
    let mut align = macse(jar, "alignSequences");
    align
        .arg("-seq")
        .arg(ALIGNMENT_SEQS)
        .arg("-out_NT")
        .arg(NT_FASTA)
        .arg("-out_AA")
        .arg(AA_FASTA);
    run_checked(align).context("Alignment failed")?;

    // 2. Statistics from the frameshift-preserving alignment; must precede
    //    the cleanup pass, which rewrites the codons these tables describe
    let mut stats = macse(jar, "exportAlignment");
    stats
        .arg("-align")
        .arg(NT_FASTA)
        .arg("-out_stat_per_seq")
        .arg(SEQ_STATS_CSV)
        .arg("-out_stat_per_site")
        .arg(SITE_STATS_CSV);
    run_checked(stats).context("Statistics export failed")?;

    // 3. Cleaned alignment with fixed placeholder codons
    let mut cleanup = macse(jar, "exportAlignment");
    cleanup
        .arg("-align")
        .arg(NT_FASTA)
        .arg("-codonForInternalStop")
        .arg(STOP_PLACEHOLDER)
        .arg("-codonForInternalFS")
        .arg(FRAMESHIFT_PLACEHOLDER)
        .arg("-out_NT")
        .arg(NT_NOFS_FASTA)
        .arg("-out_AA")
        .arg(AA_NOFS_FASTA);
    run_checked(cleanup).context("Alignment cleanup failed")?;

    stage_outputs(Path::new("."), Path::new(ALIGNMENT_DIR))?;
    eprintln!("Alignment artifacts staged into {}", ALIGNMENT_DIR);
    Ok(())
}

/// Moves every `alignment*` file from `work_dir` into `dest`.
pub fn stage_outputs(work_dir: &Path, dest: &Path) -> Result<()> {
    fs::create_dir_all(dest).with_context(|| format!("Failed to create {}", dest.display()))?;

    for entry in fs::read_dir(work_dir)
        .with_context(|| format!("Failed to read directory {}", work_dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = entry.file_name();
        if name.to_string_lossy().starts_with(ALIGNMENT_PREFIX) {
            let target = dest.join(&name);
            fs::rename(&path, &target).with_context(|| {
                format!("Failed to move {} to {}", path.display(), target.display())
            })?;
        }
    }
    Ok(())
}

/// Infers the tree from the cleaned nucleotide alignment and stages the
/// tree file where the viewer expects it.
pub fn run_tree(iqtree: &Path, threads: usize) -> Result<()> {
    let input = Path::new(ALIGNMENT_DIR).join(NT_NOFS_FASTA);

    let mut command = Command::new(iqtree);
    command
        .arg("-s")
        .arg(&input)
        .arg("-T")
        .arg(threads.to_string());
    run_checked(command).context("Tree inference failed")?;

    // IQ-TREE writes its outputs beside the input alignment
    let produced = Path::new(ALIGNMENT_DIR).join(TREE_FILE);
    let tree_dir = Path::new(TREE_DIR);
    fs::create_dir_all(tree_dir)
        .with_context(|| format!("Failed to create {}", tree_dir.display()))?;
    let dest = tree_dir.join(TREE_FILE);
    fs::rename(&produced, &dest).with_context(|| {
        format!("Failed to move {} to {}", produced.display(), dest.display())
    })?;
    eprintln!("Tree written to {}", dest.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    fn touch(dir: &Path, name: &str) {
        File::create(dir.join(name))
            .unwrap()
            .write_all(b"x")
            .unwrap();
    }

    #[test]
    fn test_stage_moves_only_prefixed_files() {
        let work = tempfile::tempdir().unwrap();
        let dest = work.path().join("alignment");

        touch(work.path(), "alignment_NT.fasta");
        touch(work.path(), "alignment_seq_stats.csv");
        touch(work.path(), "query.fasta");

        stage_outputs(work.path(), &dest).unwrap();

        assert!(dest.join("alignment_NT.fasta").exists());
        assert!(dest.join("alignment_seq_stats.csv").exists());
        assert!(!work.path().join("alignment_NT.fasta").exists());
        // Unrelated files stay put
        assert!(work.path().join("query.fasta").exists());
        assert!(!dest.join("query.fasta").exists());
    }

    #[test]
    fn test_stage_ignores_directories() {
        let work = tempfile::tempdir().unwrap();
        let dest = work.path().join("out");
        fs::create_dir(work.path().join("alignment_old")).unwrap();
        touch(work.path(), "alignment_AA.fasta");

        stage_outputs(work.path(), &dest).unwrap();

        assert!(dest.join("alignment_AA.fasta").exists());
        assert!(work.path().join("alignment_old").is_dir());
    }
}
