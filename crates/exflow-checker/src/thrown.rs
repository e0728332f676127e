//! Bottom-up computation of thrown exception sets.

use crate::analyzer::ExceptionAnalyzer;
use crate::exception_set::ExceptionSet;
use crate::oracles::{CallableKind, Candidate};
use exflow_common::limits::{STACK_GROWTH, STACK_RED_ZONE};
use exflow_solver::{TypeId, WellKnownType};
use exflow_syntax::{NodeData, NodeIndex, TryData};
use tracing::{debug, trace};

impl<'a> ExceptionAnalyzer<'a> {
    /// Every exception type that evaluating `node` may throw, checked or
    /// not.
    ///
    /// Lambdas, method references and the bodies of named classes
    /// contribute nothing: creating them executes no code. Unknown or
    /// unresolved constructs contribute nothing beyond their children.
    #[tracing::instrument(level = "debug", skip(self), fields(node = node.0))]
    pub fn thrown_exceptions(&self, node: NodeIndex) -> ExceptionSet {
        self.thrown_at(node, 0)
    }

    /// [`Self::thrown_exceptions`] restricted to checked types.
    pub fn thrown_checked_exceptions(&self, node: NodeIndex) -> ExceptionSet {
        let mut set = self.thrown_exceptions(node);
        set.retain(|ty| self.is_checked(ty));
        set
    }

    pub(crate) fn thrown_at(&self, node: NodeIndex, depth: u32) -> ExceptionSet {
        if depth > self.options.max_tree_depth {
            debug!(node = node.0, depth, "thrown walk depth limit reached");
            return ExceptionSet::new();
        }
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || {
            self.thrown_by_node(node, depth)
        })
    }

    fn thrown_by_node(&self, idx: NodeIndex, depth: u32) -> ExceptionSet {
        let Some(node) = self.arena.get(idx) else {
            return ExceptionSet::new();
        };
        trace!(node = idx.0, kind = ?node.kind(), "thrown_by_node");

        match &node.data {
            NodeData::Class(class) => {
                if class.is_anonymous() {
                    self.thrown_by_all(class.arguments.iter(), depth)
                } else {
                    ExceptionSet::new()
                }
            }
            NodeData::Lambda(_) | NodeData::MethodRef(_) => ExceptionSet::new(),
            NodeData::Call(_) | NodeData::New(_) => {
                let mut set = self.call_site_exceptions(idx);
                let children = self.thrown_by_all(self.arena.children(idx), depth);
                self.merge(&mut set, &children);
                set
            }
            NodeData::Throw(throw) => {
                let mut set = ExceptionSet::new();
                set.extend_from(self.types, self.throw_statement_types(throw.expression, depth));
                let operand = self.thrown_at(throw.expression, depth + 1);
                self.merge(&mut set, &operand);
                set
            }
            NodeData::Try(try_data) => self.try_statement_exceptions(try_data, depth),
            NodeData::ResourceVariable(resource) => {
                let mut set = self.closer_exceptions(idx);
                let init = self.thrown_at(resource.initializer, depth + 1);
                self.merge(&mut set, &init);
                set
            }
            _ => self.thrown_by_all(self.arena.children(idx), depth),
        }
    }

    fn thrown_by_all(
        &self,
        children: impl IntoIterator<Item = NodeIndex>,
        depth: u32,
    ) -> ExceptionSet {
        let mut set = ExceptionSet::new();
        for child in children {
            let thrown = self.thrown_at(child, depth + 1);
            self.merge(&mut set, &thrown);
        }
        set
    }

    /// Exceptions declared by whatever a `Call`, `New` or `MethodRef` site
    /// invokes. Operands are not included.
    pub(crate) fn call_site_exceptions(&self, site: NodeIndex) -> ExceptionSet {
        if self.resolver.is_comparing_overloads() {
            trace!(site = site.0, "overload comparison in progress, no declared throws");
            return ExceptionSet::new();
        }
        let Some(resolved) = self.resolver.resolve_call(site) else {
            trace!(site = site.0, "unresolved call site");
            return ExceptionSet::new();
        };
        if self.is_array_clone(site, &resolved.primary) {
            return ExceptionSet::new();
        }
        if self.options.overload_intersection && resolved.is_ambiguous() {
            if let Some(set) = self.ambiguous_call_exceptions(&resolved) {
                return set;
            }
        }
        self.declared_exceptions(&resolved.primary)
    }

    /// The `clone()` method declared on the root class, invoked on an array.
    fn is_array_clone(&self, site: NodeIndex, candidate: &Candidate) -> bool {
        if candidate.callable.kind != CallableKind::Method || candidate.callable.name != "clone" {
            return false;
        }
        let Some(object) = self.types.well_known(WellKnownType::Object) else {
            return false;
        };
        if candidate.callable.declaring_class != object {
            return false;
        }
        let qualifier = match self.arena.get(site).map(|node| &node.data) {
            Some(NodeData::Call(call)) => call.qualifier,
            Some(NodeData::MethodRef(method_ref)) => method_ref.qualifier,
            _ => return false,
        };
        self.resolver
            .expression_type(qualifier)
            .is_some_and(|ty| self.types.is_array(ty))
    }

    fn try_statement_exceptions(&self, try_data: &TryData, depth: u32) -> ExceptionSet {
        let mut set = ExceptionSet::new();
        for resource in self.resources_of(try_data) {
            let thrown = self.resource_exceptions(resource, depth + 1);
            self.merge(&mut set, &thrown);
        }
        let body = self.thrown_at(try_data.try_block, depth + 1);
        self.merge(&mut set, &body);

        for clause in try_data.catch_clauses.iter() {
            for handler in self.catch_alternatives(clause) {
                set.remove_covered_by(self.types, handler);
            }
        }
        for clause in try_data.catch_clauses.iter() {
            let thrown = self.thrown_at(clause, depth + 1);
            self.merge(&mut set, &thrown);
        }

        if try_data.finally_block.is_some() {
            let finally = self.thrown_at(try_data.finally_block, depth + 1);
            if self.can_complete_normally(try_data.finally_block) {
                self.merge(&mut set, &finally);
            } else {
                trace!("finally completes abruptly, pending exceptions are discarded");
                set = finally;
            }
        }
        set
    }

    /// A resource's closer exceptions plus whatever producing it throws.
    pub(crate) fn resource_exceptions(&self, resource: NodeIndex, depth: u32) -> ExceptionSet {
        match self.arena.get(resource).map(|node| &node.data) {
            Some(NodeData::ResourceVariable(_)) => self.thrown_at(resource, depth),
            Some(_) => {
                let mut set = self.closer_exceptions(resource);
                let expr = self.thrown_at(resource, depth);
                self.merge(&mut set, &expr);
                set
            }
            None => ExceptionSet::new(),
        }
    }

    pub(crate) fn resources_of(&self, try_data: &TryData) -> Vec<NodeIndex> {
        self.arena
            .get(try_data.resource_list)
            .and_then(|node| self.arena.get_resource_list(node))
            .map(|list| list.resources.iter().collect())
            .unwrap_or_default()
    }

    /// Alternatives of a catch clause's parameter type (one unless it is a
    /// multi-catch).
    pub(crate) fn catch_alternatives(&self, clause: NodeIndex) -> smallvec::SmallVec<[TypeId; 4]> {
        self.catch_parameter_type(clause)
            .map(|ty| self.types.disjuncts(ty))
            .unwrap_or_default()
    }

    pub(crate) fn catch_parameter_type(&self, clause: NodeIndex) -> Option<TypeId> {
        let catch = self
            .arena
            .get(clause)
            .and_then(|node| self.arena.get_catch_clause(node))?;
        let param = self
            .arena
            .get(catch.parameter)
            .and_then(|node| self.arena.get_parameter(node))?;
        param.declared_type.is_some().then_some(param.declared_type)
    }

    // =========================================================================
    // Resources
    // =========================================================================

    /// Exceptions declared by the `close()` call implied by `resource`, a
    /// resource variable or a resource expression.
    pub fn closer_exceptions(&self, resource: NodeIndex) -> ExceptionSet {
        let resource_type = match self.arena.get(resource).map(|node| &node.data) {
            Some(NodeData::ResourceVariable(var)) => var.declared_type,
            Some(_) => self
                .resolver
                .expression_type(resource)
                .unwrap_or(TypeId::NONE),
            None => TypeId::NONE,
        };
        if resource_type.is_none() {
            return ExceptionSet::new();
        }
        match self.resolver.resolve_closer(resource_type) {
            Some(closer) => self.declared_exceptions(&closer),
            None => {
                trace!(resource = resource.0, "resource type has no closer");
                ExceptionSet::new()
            }
        }
    }

    // =========================================================================
    // Method references
    // =========================================================================

    /// Exceptions the method a reference points to declares. This is what
    /// invoking the functional interface may throw, as opposed to creating
    /// the reference, which throws nothing.
    pub fn method_reference_exceptions(&self, method_ref: NodeIndex) -> ExceptionSet {
        match self.arena.get(method_ref).map(|node| &node.data) {
            Some(NodeData::MethodRef(_)) => self.call_site_exceptions(method_ref),
            _ => ExceptionSet::new(),
        }
    }
}
