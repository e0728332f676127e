//! A resolver backed by explicit tables.
//!
//! Hosts that resolve names up front (or tests) record the answer for each
//! node and resource type here instead of implementing [`Resolver`].

use crate::oracles::{Candidate, ResolvedCall, Resolver};
use exflow_solver::TypeId;
use exflow_syntax::NodeIndex;
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};

#[derive(Debug, Default)]
pub struct TableResolver {
    calls: FxHashMap<NodeIndex, ResolvedCall>,
    closers: FxHashMap<TypeId, Candidate>,
    functional: FxHashMap<NodeIndex, Candidate>,
    expression_types: FxHashMap<NodeIndex, TypeId>,
    /// Threads currently comparing overloads. Keyed per thread so one
    /// host thread's overload resolution never hides declared exceptions
    /// from analyses running on other threads.
    comparing_overloads: Mutex<FxHashSet<ThreadId>>,
}

impl TableResolver {
    pub fn new() -> Self {
        TableResolver::default()
    }

    pub fn add_call(&mut self, site: NodeIndex, primary: Candidate) {
        self.calls.insert(site, ResolvedCall::single(primary));
    }

    /// Record an ambiguous resolution: `primary` plus the other applicable
    /// candidates.
    pub fn add_ambiguous_call(
        &mut self,
        site: NodeIndex,
        primary: Candidate,
        alternatives: Vec<Candidate>,
    ) {
        self.calls.insert(
            site,
            ResolvedCall {
                primary,
                alternatives,
            },
        );
    }

    pub fn add_closer(&mut self, resource_type: TypeId, closer: Candidate) {
        self.closers.insert(resource_type, closer);
    }

    pub fn add_functional_method(&mut self, expr: NodeIndex, method: Candidate) {
        self.functional.insert(expr, method);
    }

    pub fn set_expression_type(&mut self, expr: NodeIndex, ty: TypeId) {
        self.expression_types.insert(expr, ty);
    }

    /// Mark the calling thread as (not) comparing overloads.
    pub fn set_comparing_overloads(&self, comparing: bool) {
        let current = thread::current().id();
        let mut threads = self.comparing_threads();
        if comparing {
            threads.insert(current);
        } else {
            threads.remove(&current);
        }
    }

    fn comparing_threads(&self) -> MutexGuard<'_, FxHashSet<ThreadId>> {
        self.comparing_overloads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Resolver for TableResolver {
    fn resolve_call(&self, site: NodeIndex) -> Option<ResolvedCall> {
        self.calls.get(&site).cloned()
    }

    fn resolve_closer(&self, resource_type: TypeId) -> Option<Candidate> {
        self.closers.get(&resource_type).cloned()
    }

    fn functional_method(&self, expr: NodeIndex) -> Option<Candidate> {
        self.functional.get(&expr).cloned()
    }

    fn expression_type(&self, expr: NodeIndex) -> Option<TypeId> {
        self.expression_types.get(&expr).copied()
    }

    fn is_comparing_overloads(&self) -> bool {
        self.comparing_threads().contains(&thread::current().id())
    }
}
