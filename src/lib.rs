//! FlowLint report exporter library.
//!
//! This crate exposes programmatic APIs for turning workflow-analysis
//! findings into shareable reports. The analysis engine that produces the
//! findings is an external collaborator; everything here is pure
//! transformation plus thin host plumbing.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Discovery and effective configuration resolution.
//! - `models`: Data models for findings, runs, and summaries.
//! - `run`: Run construction, input parsing, and severity aggregation.
//! - `export`: The report formatters (stylish, JSON, CSV, SARIF, JUnit,
//!   GitHub Actions log/summary).
//! - `host`: Injected platform capabilities (version, clipboard, files).
//! - `output`: Human/JSON printers and multi-format export.
//! - `utils`: Supporting helpers.
pub mod cli;
pub mod config;
pub mod export;
pub mod host;
pub mod models;
pub mod output;
pub mod run;
pub mod utils;
