//! Common types and utilities for the exflow analyzer.
//!
//! This crate provides foundational pieces used across all exflow crates:
//! - Analysis limits and thresholds
//! - Analysis options (deserializable from `exflow.json`)
//! - Diagnostic types and message templates

// Centralized limits and thresholds
pub mod limits;

// Options controlling the exception analysis
pub mod options;
pub use options::AnalysisOptions;

// Diagnostics produced for unhandled exceptions
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory};
