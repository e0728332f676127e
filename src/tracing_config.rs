//! Tracing subscriber setup.
//!
//! Output format is chosen by `EXFLOW_LOG_FORMAT`:
//!
//! - `text` (default): flat `tracing-subscriber` lines
//! - `tree`: indented spans via `tracing-tree`, handy for following one
//!   `is_handled_at` ascent or `thrown_exceptions` walk
//! - `json`: one JSON object per span/event
//!
//! ```bash
//! EXFLOW_LOG=debug EXFLOW_LOG_FORMAT=tree my-host-tool
//! EXFLOW_LOG="exflow_checker=trace,exflow_solver=debug" my-host-tool
//! ```
//!
//! Nothing is installed unless `EXFLOW_LOG` (or `RUST_LOG`) is set.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Flat `tracing-subscriber` lines (default).
    Text,
    /// Indented span tree via `tracing-tree`.
    Tree,
    /// Newline-delimited JSON objects.
    Json,
}

impl LogFormat {
    /// Parse a format name, case-insensitively. Unknown names mean `Text`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    /// Read `EXFLOW_LOG_FORMAT`.
    fn from_env() -> Self {
        Self::parse(&std::env::var("EXFLOW_LOG_FORMAT").unwrap_or_default())
    }
}

/// Build an `EnvFilter` from `EXFLOW_LOG`, falling back to `RUST_LOG`.
///
/// `EXFLOW_LOG` wins when both are set. Values use `RUST_LOG` syntax
/// (`debug`, `exflow_checker=trace`).
fn build_filter() -> EnvFilter {
    if let Ok(val) = std::env::var("EXFLOW_LOG") {
        EnvFilter::builder().parse_lossy(val)
    } else {
        EnvFilter::from_default_env()
    }
}

/// Install the global subscriber, writing to stderr.
///
/// Does nothing unless `EXFLOW_LOG` or `RUST_LOG` is set. Safe to call more
/// than once; a subscriber installed earlier (by this or by the host) is
/// left in place.
pub fn init_tracing() {
    let has_exflow_log = std::env::var("EXFLOW_LOG").is_ok();
    let has_rust_log = std::env::var("RUST_LOG").is_ok();
    if !has_exflow_log && !has_rust_log {
        return;
    }

    let filter = build_filter();
    let result = match LogFormat::from_env() {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_deferred_spans(true)
                .with_span_retrace(true)
                .with_targets(true);
            Registry::default().with(filter).with(tree_layer).try_init()
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);
            Registry::default().with(filter).with(json_layer).try_init()
        }
        LogFormat::Text => {
            let text_layer = fmt::layer().with_writer(std::io::stderr);
            Registry::default().with(filter).with(text_layer).try_init()
        }
    };
    if result.is_err() {
        tracing::debug!("global tracing subscriber already installed");
    }
}
