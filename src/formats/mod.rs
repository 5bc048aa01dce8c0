//! Parsers for the structured result formats the pipeline produces and the
//! viewer consumes.
//!
//! - `blast_xml`: NCBI BLAST XML (`-outfmt 5`) search reports
//! - `seq_stats`: semicolon-delimited per-sequence statistics tables
//! - `newick`: phylogenetic trees, plus the ASCII renderer
//!
//! Each format gets its own error enum; FASTA lives at the crate root
//! (`crate::fasta`) since every pipeline stage touches it.

pub mod blast_xml;
pub mod newick;
pub mod seq_stats;
