//! The analysis entry point.
//!
//! An [`ExceptionAnalyzer`] borrows one syntax tree and the host's oracles.
//! It holds no mutable state, so one analyzer can serve any number of
//! queries, and separate analyzers over separate trees can run on separate
//! threads. The query families live in sibling modules:
//!
//! - `thrown`: what a subtree throws (bottom-up)
//! - `handled`: whether an exception escaping a node is handled (ascent)
//! - `overloads`: intersection of throws across ambiguous candidates
//! - `precise`: rethrow of caught exceptions
//! - `sites`: per-site collection of unhandled exceptions

use crate::exception_set::ExceptionSet;
use crate::hooks::ExceptionHooks;
use crate::oracles::{Candidate, FlowCancelled, FlowOracle, Resolver};
use exflow_common::AnalysisOptions;
use exflow_solver::{TypeId, TypeOracle, WellKnownType};
use exflow_syntax::{NodeArena, NodeIndex};
use smallvec::SmallVec;
use std::sync::LazyLock;
use tracing::debug;

static NO_HOOKS: LazyLock<ExceptionHooks> = LazyLock::new(ExceptionHooks::new);

pub struct ExceptionAnalyzer<'a> {
    pub(crate) arena: &'a NodeArena,
    pub(crate) types: &'a dyn TypeOracle,
    pub(crate) flow: &'a dyn FlowOracle,
    pub(crate) resolver: &'a dyn Resolver,
    pub(crate) hooks: &'a ExceptionHooks,
    pub(crate) options: AnalysisOptions,
    /// `RuntimeException` and `Error`, when the oracle knows them.
    unchecked_roots: SmallVec<[TypeId; 2]>,
}

impl<'a> ExceptionAnalyzer<'a> {
    pub fn new(
        arena: &'a NodeArena,
        types: &'a dyn TypeOracle,
        flow: &'a dyn FlowOracle,
        resolver: &'a dyn Resolver,
    ) -> Self {
        let unchecked_roots = [WellKnownType::RuntimeException, WellKnownType::Error]
            .into_iter()
            .filter_map(|which| types.well_known(which))
            .collect();
        ExceptionAnalyzer {
            arena,
            types,
            flow,
            resolver,
            hooks: &NO_HOOKS,
            options: AnalysisOptions::default(),
            unchecked_roots,
        }
    }

    pub fn with_hooks(mut self, hooks: &'a ExceptionHooks) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_options(mut self, options: AnalysisOptions) -> Self {
        self.options = options;
        self
    }

    pub fn arena(&self) -> &'a NodeArena {
        self.arena
    }

    pub fn types(&self) -> &'a dyn TypeOracle {
        self.types
    }

    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    // =========================================================================
    // Classification
    // =========================================================================

    /// `RuntimeException`, `Error` and their subtypes.
    pub fn is_unchecked(&self, ty: TypeId) -> bool {
        self.unchecked_roots
            .iter()
            .any(|&root| self.types.is_subtype(ty, root))
    }

    pub fn is_checked(&self, ty: TypeId) -> bool {
        !self.is_unchecked(ty)
    }

    pub(crate) fn unchecked_roots(&self) -> &[TypeId] {
        &self.unchecked_roots
    }

    // =========================================================================
    // Shared helpers
    // =========================================================================

    pub(crate) fn add(&self, set: &mut ExceptionSet, ty: TypeId) {
        set.add(self.types, ty);
    }

    pub(crate) fn merge(&self, set: &mut ExceptionSet, other: &ExceptionSet) {
        set.add_all(self.types, other);
    }

    /// A candidate's `throws` clause under its site substitution.
    ///
    /// Entries that do not substitute to a class type are dropped.
    pub(crate) fn substituted_throws(&self, candidate: &Candidate) -> SmallVec<[TypeId; 4]> {
        candidate
            .callable
            .throws
            .iter()
            .filter_map(|&ty| self.types.substitute(ty, &candidate.substitution))
            .collect()
    }

    pub(crate) fn declared_exceptions(&self, candidate: &Candidate) -> ExceptionSet {
        let mut set = ExceptionSet::new();
        set.extend_from(self.types, self.substituted_throws(candidate));
        set
    }

    /// Whether `exception` is a subtype of some entry of `throws`.
    pub(crate) fn throws_cover(&self, throws: &[TypeId], exception: TypeId) -> bool {
        throws
            .iter()
            .any(|&declared| self.types.is_subtype(exception, declared))
    }

    /// Normal completion of `block`, with cancellation read as abrupt.
    pub(crate) fn can_complete_normally(&self, block: NodeIndex) -> bool {
        match self.flow.block_can_complete_normally(block) {
            Ok(completes) => completes,
            Err(FlowCancelled) => {
                debug!(block = block.0, "flow analysis cancelled, assuming abrupt completion");
                false
            }
        }
    }
}

impl std::fmt::Debug for ExceptionAnalyzer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExceptionAnalyzer")
            .field("nodes", &self.arena.len())
            .field("hooks", self.hooks)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
