//! exflow: checked-exception flow analysis over Java-like syntax trees.
//!
//! The work is split across the workspace crates, re-exported here:
//!
//! - [`common`]: limits, [`AnalysisOptions`], diagnostics
//! - [`syntax`]: the arena syntax tree
//! - [`solver`]: type handles, the [`TypeOracle`] seam and [`TypeTable`]
//! - [`checker`]: the thrown/unhandled analyses
//!
//! This crate adds `exflow.json` loading ([`config`]) and tracing setup
//! ([`tracing_config`]).

pub use exflow_checker as checker;
pub use exflow_common as common;
pub use exflow_solver as solver;
pub use exflow_syntax as syntax;

pub use exflow_checker::{
    ExceptionAnalyzer, ExceptionHooks, ExceptionSet, FlowOracle, Resolver, SyntacticFlowOracle,
    TableResolver, UnhandledExceptionReporter, sort_most_specific_first,
};
pub use exflow_common::{AnalysisOptions, Diagnostic};
pub use exflow_solver::{TypeId, TypeOracle, TypeTable};
pub use exflow_syntax::{NodeArena, NodeIndex};

pub mod config;
pub mod tracing_config;

/// Diagnostics for every unhandled checked exception under `root`, using
/// the syntactic flow oracle.
pub fn report_unhandled(
    arena: &NodeArena,
    types: &dyn TypeOracle,
    resolver: &dyn Resolver,
    hooks: &ExceptionHooks,
    options: &AnalysisOptions,
    root: NodeIndex,
) -> Vec<Diagnostic> {
    let flow = SyntacticFlowOracle::new(arena).with_max_depth(options.max_tree_depth);
    let analyzer = ExceptionAnalyzer::new(arena, types, &flow, resolver)
        .with_hooks(hooks)
        .with_options(options.clone());
    UnhandledExceptionReporter::new(&analyzer).report(root, NodeIndex::NONE)
}
