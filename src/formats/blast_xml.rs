//! BLAST XML (`-outfmt 5`) parser.
//!
//! Serde mirror of the NCBI `BlastOutput` DTD, covering the fields the
//! pipeline and viewer consume: hit identifiers, alignment spans, and the
//! score/statistic block of each HSP. One search output file corresponds to
//! exactly one (query, database-file) pair.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while reading a search output file.
#[derive(Error, Debug)]
pub enum BlastXmlError {
    #[error("Failed to open file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Empty search output file")]
    EmptyFile,

    #[error("Malformed BLAST XML: {0}")]
    Malformed(#[from] quick_xml::DeError),
}

/// Result type for BLAST XML operations.
pub type BlastXmlResult<T> = Result<T, BlastXmlError>;

/// Root element of a BLAST XML report.
#[derive(Debug, Deserialize)]
#[serde(rename = "BlastOutput")]
pub struct BlastOutput {
    #[serde(rename = "BlastOutput_program", default)]
    pub program: String,
    #[serde(rename = "BlastOutput_query-def", default)]
    pub query_def: String,
    #[serde(rename = "BlastOutput_db", default)]
    pub db: String,
    #[serde(rename = "BlastOutput_iterations", default)]
    iterations: Iterations,
}

#[derive(Debug, Default, Deserialize)]
struct Iterations {
    #[serde(rename = "Iteration", default)]
    iterations: Vec<Iteration>,
}

/// One query iteration (one per query sequence).
#[derive(Debug, Deserialize)]
pub struct Iteration {
    #[serde(rename = "Iteration_iter-num", default)]
    pub num: u32,
    #[serde(rename = "Iteration_hits", default)]
    hits: IterationHits,
}

#[derive(Debug, Default, Deserialize)]
struct IterationHits {
    #[serde(rename = "Hit", default)]
    hits: Vec<Hit>,
}

/// A matched database sequence with its local alignments.
#[derive(Debug, Deserialize)]
pub struct Hit {
    #[serde(rename = "Hit_num", default)]
    pub num: u32,
    #[serde(rename = "Hit_id", default)]
    pub id: String,
    #[serde(rename = "Hit_def", default)]
    pub def: String,
    #[serde(rename = "Hit_accession", default)]
    pub accession: String,
    #[serde(rename = "Hit_len", default)]
    pub len: u64,
    #[serde(rename = "Hit_hsps", default)]
    hsps: HitHsps,
}

#[derive(Debug, Default, Deserialize)]
struct HitHsps {
    #[serde(rename = "Hsp", default)]
    hsps: Vec<Hsp>,
}

/// A single local alignment region within a hit.
#[derive(Debug, Deserialize)]
pub struct Hsp {
    #[serde(rename = "Hsp_num", default)]
    pub num: u32,
    #[serde(rename = "Hsp_bit-score", default)]
    pub bit_score: f64,
    #[serde(rename = "Hsp_evalue", default)]
    pub evalue: f64,
    #[serde(rename = "Hsp_query-from", default)]
    pub query_from: u64,
    #[serde(rename = "Hsp_query-to", default)]
    pub query_to: u64,
    #[serde(rename = "Hsp_hit-from", default)]
    pub hit_from: u64,
    #[serde(rename = "Hsp_hit-to", default)]
    pub hit_to: u64,
    #[serde(rename = "Hsp_identity", default)]
    pub identity: u64,
    #[serde(rename = "Hsp_gaps", default)]
    pub gaps: u64,
    #[serde(rename = "Hsp_align-len", default)]
    pub align_len: u64,
}

impl BlastOutput {
    /// Iterates over every hit across all iterations.
    pub fn hits(&self) -> impl Iterator<Item = &Hit> {
        self.iterations
            .iterations
            .iter()
            .flat_map(|it| it.hits.hits.iter())
    }
}

impl Hit {
    /// The identifier used throughout the pipeline.
    ///
    /// First whitespace-delimited token of `Hit_def`, the same rule applied
    /// to FASTA headers, so the extractor's lookup key matches the source
    /// universe. Falls back to `Hit_id` when the definition is empty.
    pub fn identifier(&self) -> &str {
        self.def
            .split_whitespace()
            .next()
            .unwrap_or(self.id.as_str())
    }

    /// All local alignments of this hit, best first as BLAST reports them.
    pub fn hsps(&self) -> &[Hsp] {
        &self.hsps.hsps
    }
}

/// Parses a search output file.
pub fn parse_file<P: AsRef<Path>>(path: P) -> BlastXmlResult<BlastOutput> {
    let content = std::fs::read_to_string(&path)?;
    if content.trim().is_empty() {
        return Err(BlastXmlError::EmptyFile);
    }
    parse_str(&content)
}

/// Parses BLAST XML from a string.
pub fn parse_str(content: &str) -> BlastXmlResult<BlastOutput> {
    Ok(quick_xml::de::from_str(content)?)
}

#[cfg(test)]
pub(crate) const SAMPLE_XML: &str = r#"<?xml version="1.0"?>
<BlastOutput>
  <BlastOutput_program>tblastn</BlastOutput_program>
  <BlastOutput_query-def>query_prot</BlastOutput_query-def>
  <BlastOutput_db>genes.fasta</BlastOutput_db>
  <BlastOutput_iterations>
    <Iteration>
      <Iteration_iter-num>1</Iteration_iter-num>
      <Iteration_hits>
        <Hit>
          <Hit_num>1</Hit_num>
          <Hit_id>gnl|BL_ORD_ID|0</Hit_id>
          <Hit_def>Example_1234 putative kinase</Hit_def>
          <Hit_accession>0</Hit_accession>
          <Hit_len>642</Hit_len>
          <Hit_hsps>
            <Hsp>
              <Hsp_num>1</Hsp_num>
              <Hsp_bit-score>211.5</Hsp_bit-score>
              <Hsp_evalue>3.2e-55</Hsp_evalue>
              <Hsp_query-from>1</Hsp_query-from>
              <Hsp_query-to>198</Hsp_query-to>
              <Hsp_hit-from>13</Hsp_hit-from>
              <Hsp_hit-to>606</Hsp_hit-to>
              <Hsp_identity>102</Hsp_identity>
              <Hsp_gaps>4</Hsp_gaps>
              <Hsp_align-len>200</Hsp_align-len>
            </Hsp>
          </Hit_hsps>
        </Hit>
        <Hit>
          <Hit_num>2</Hit_num>
          <Hit_id>gnl|BL_ORD_ID|1</Hit_id>
          <Hit_def>Example_5678</Hit_def>
          <Hit_accession>1</Hit_accession>
          <Hit_len>511</Hit_len>
          <Hit_hsps>
            <Hsp>
              <Hsp_num>1</Hsp_num>
              <Hsp_bit-score>98.2</Hsp_bit-score>
              <Hsp_evalue>1.1e-20</Hsp_evalue>
              <Hsp_query-from>20</Hsp_query-from>
              <Hsp_query-to>150</Hsp_query-to>
              <Hsp_hit-from>1</Hsp_hit-from>
              <Hsp_hit-to>393</Hsp_hit-to>
              <Hsp_identity>61</Hsp_identity>
              <Hsp_gaps>0</Hsp_gaps>
              <Hsp_align-len>131</Hsp_align-len>
            </Hsp>
          </Hit_hsps>
        </Hit>
      </Iteration_hits>
    </Iteration>
  </BlastOutput_iterations>
</BlastOutput>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sample_report() {
        let output = parse_str(SAMPLE_XML).unwrap();
        assert_eq!(output.program, "tblastn");
        assert_eq!(output.db, "genes.fasta");

        let hits: Vec<&Hit> = output.hits().collect();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].identifier(), "Example_1234");
        assert_eq!(hits[1].identifier(), "Example_5678");
    }

    #[test]
    fn test_hsp_statistics() {
        let output = parse_str(SAMPLE_XML).unwrap();
        let first = output.hits().next().unwrap();
        let hsp = &first.hsps()[0];

        assert_eq!(hsp.bit_score, 211.5);
        assert_eq!(hsp.evalue, 3.2e-55);
        assert_eq!(hsp.identity, 102);
        assert_eq!(hsp.gaps, 4);
        assert_eq!((hsp.hit_from, hsp.hit_to), (13, 606));
    }

    #[test]
    fn test_identifier_falls_back_to_hit_id() {
        let xml = SAMPLE_XML.replace(
            "<Hit_def>Example_1234 putative kinase</Hit_def>",
            "<Hit_def></Hit_def>",
        );
        let output = parse_str(&xml).unwrap();
        let first = output.hits().next().unwrap();
        assert_eq!(first.identifier(), "gnl|BL_ORD_ID|0");
    }

    #[test]
    fn test_no_hits_is_empty_not_error() {
        let xml = r#"<?xml version="1.0"?>
<BlastOutput>
  <BlastOutput_program>blastn</BlastOutput_program>
  <BlastOutput_iterations>
    <Iteration>
      <Iteration_iter-num>1</Iteration_iter-num>
      <Iteration_hits></Iteration_hits>
    </Iteration>
  </BlastOutput_iterations>
</BlastOutput>
"#;
        let output = parse_str(xml).unwrap();
        assert_eq!(output.hits().count(), 0);
    }

    #[test]
    fn test_malformed_is_error() {
        assert!(matches!(
            parse_str("not xml at all"),
            Err(BlastXmlError::Malformed(_))
        ));
    }
}
