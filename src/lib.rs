//! # KaleView - Sequence Search Pipeline and Result Viewer
//!
//! Builds a BLAST database from a directory of FASTA files, searches a
//! query against it, collects the hit sequences, aligns them with MACSE,
//! and lets you browse the results in a terminal UI.
//!
//! ## Architecture
//!
//! - `config`: pipeline configuration and filesystem layout constants
//! - `fasta`: FASTA file parsing and record writing
//! - `formats`: parsers for BLAST XML, Newick trees, and statistics CSVs
//! - `tools`: checked invocation of external programs
//! - `pipeline`: the sequential analysis stages
//! - `model`: viewer state machine and update subscribers
//! - `event`: keyboard event handling
//! - `ui`: TUI rendering with ratatui
//! - `controller`: terminal lifecycle and the main loop

pub mod config;
pub mod controller;
pub mod event;
pub mod fasta;
pub mod formats;
pub mod model;
pub mod pipeline;
pub mod tools;
pub mod ui;
