//! Options controlling the exception analysis.

use crate::limits;
use serde::Deserialize;

/// Knobs for one analysis run.
///
/// Deserialized from the `analysis` section of `exflow.json`; every field is
/// optional and defaults to the behaviour described on the field.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisOptions {
    /// Intersect the throws lists of ambiguous overload candidates.
    pub overload_intersection: bool,
    /// Use the precise types of a rethrown, never reassigned catch parameter.
    pub precise_rethrow: bool,
    /// Treat a server-page file boundary as handling every exception.
    pub permissive_server_pages: bool,
    /// Treat lambdas and method references without a functional interface
    /// type as handling every exception.
    pub permissive_missing_functional_type: bool,
    /// Depth limit for the bottom-up thrown-exception walk.
    pub max_tree_depth: u32,
    /// Parent-hop limit for the handled-at ascent.
    pub max_ascent_depth: u32,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        AnalysisOptions {
            overload_intersection: true,
            precise_rethrow: true,
            permissive_server_pages: true,
            permissive_missing_functional_type: true,
            max_tree_depth: limits::MAX_TREE_WALK_DEPTH,
            max_ascent_depth: limits::MAX_ASCENT_DEPTH,
        }
    }
}

impl AnalysisOptions {
    /// Options with every permissive default switched off.
    ///
    /// Used by strict batch runs that prefer false positives over silence.
    pub fn strict() -> Self {
        AnalysisOptions {
            permissive_server_pages: false,
            permissive_missing_functional_type: false,
            ..AnalysisOptions::default()
        }
    }
}
