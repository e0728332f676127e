//! Checked-exception flow analysis.
//!
//! Given a syntax tree ([`exflow_syntax`]) and a type oracle
//! ([`exflow_solver`]), the [`ExceptionAnalyzer`] answers two questions:
//!
//! - which exception types can evaluating a node throw
//!   ([`ExceptionAnalyzer::thrown_exceptions`]), and
//! - which of those escape every handler up to a boundary
//!   ([`ExceptionAnalyzer::unhandled_exceptions`]).
//!
//! Results are [`ExceptionSet`]s: sets with no member a subtype of another.
//! Name resolution and control flow are answered by the host through
//! [`Resolver`] and [`FlowOracle`].

pub mod analyzer;
pub mod exception_set;
mod handled;
pub mod hooks;
pub mod oracles;
mod overloads;
mod precise;
pub mod reachability;
pub mod reporter;
pub mod sites;
pub mod sort;
mod thrown;
pub mod table_resolver;

pub use analyzer::ExceptionAnalyzer;
pub use exception_set::ExceptionSet;
pub use hooks::{CustomExceptionHandler, ExceptionHooks, FragmentExceptionHandler};
pub use oracles::{
    Callable, CallableKind, Candidate, FlowCancelled, FlowOracle, ResolvedCall, Resolver,
};
pub use reachability::SyntacticFlowOracle;
pub use reporter::UnhandledExceptionReporter;
pub use sites::UnhandledSite;
pub use sort::sort_most_specific_first;
pub use table_resolver::TableResolver;
