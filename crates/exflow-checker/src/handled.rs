//! Ascent from a node toward a boundary, looking for a construct that
//! handles an exception escaping the node.

use crate::analyzer::ExceptionAnalyzer;
use crate::exception_set::ExceptionSet;
use exflow_solver::TypeId;
use exflow_syntax::{FileKind, NodeData, NodeIndex, TryData};
use tracing::{debug, trace};

impl<'a> ExceptionAnalyzer<'a> {
    /// Checked exceptions thrown by `node` that nothing between `node` and
    /// `top` handles. `top` itself is never consulted; pass `NONE` to ascend
    /// to the root.
    ///
    /// For a method reference this is about invoking the referenced method,
    /// so the method's declared exceptions are considered.
    #[tracing::instrument(level = "debug", skip(self), fields(node = node.0, top = top.0))]
    pub fn unhandled_exceptions(&self, node: NodeIndex, top: NodeIndex) -> ExceptionSet {
        let thrown = if self.is_method_reference(node) {
            self.method_reference_exceptions(node)
        } else {
            self.thrown_exceptions(node)
        };
        self.unhandled_among(node, thrown, top)
    }

    /// Closer exceptions of a try resource that nothing up to `top` handles.
    pub fn unhandled_closer_exceptions(&self, resource: NodeIndex, top: NodeIndex) -> ExceptionSet {
        let thrown = self.closer_exceptions(resource);
        self.unhandled_among(resource, thrown, top)
    }

    pub(crate) fn unhandled_among(
        &self,
        node: NodeIndex,
        thrown: ExceptionSet,
        top: NodeIndex,
    ) -> ExceptionSet {
        let mut unhandled = ExceptionSet::new();
        for ty in thrown {
            if self.is_checked(ty) && !self.is_handled_at(node, ty, top) {
                self.add(&mut unhandled, ty);
            }
        }
        unhandled
    }

    /// Whether `exception`, escaping from `element`, is handled by some
    /// construct strictly between `element` and `top`.
    pub fn is_handled_at(&self, element: NodeIndex, exception: TypeId, top: NodeIndex) -> bool {
        let mut element = element;
        for _ in 0..self.options.max_ascent_depth {
            match self.handled_step(element, exception, top) {
                Step::Handled(handled) => return handled,
                Step::Ascend(parent) => element = parent,
            }
        }
        debug!(
            element = element.0,
            "ascent limit reached, treating exception as unhandled"
        );
        false
    }

    /// One level of the ascent: the rule for `element`'s parent.
    fn handled_step(&self, element: NodeIndex, exception: TypeId, top: NodeIndex) -> Step {
        let parent = self.arena.parent_of(element);
        if parent.is_none() || parent == top {
            return Step::Handled(false);
        }
        if self.is_method_reference(element) {
            return Step::Handled(self.is_handled_by_functional_method(element, exception));
        }
        let Some(parent_node) = self.arena.get(parent) else {
            return Step::Handled(false);
        };
        trace!(element = element.0, parent = parent.0, kind = ?parent_node.kind(), "handled_step");

        match &parent_node.data {
            NodeData::Method(method) => Step::Handled(self.throws_cover(&method.throws, exception)),
            NodeData::Class(class) => {
                if class.is_anonymous() {
                    Step::Ascend(parent)
                } else {
                    Step::Handled(false)
                }
            }
            NodeData::Lambda(_) => {
                Step::Handled(self.is_handled_by_functional_method(parent, exception))
            }
            NodeData::Initializer(init) if !init.is_static && self.in_named_class(parent) => {
                Step::Handled(self.all_constructors_declare(parent, exception))
            }
            NodeData::Field(field)
                if !field.is_static
                    && field.initializer == element
                    && self.in_named_class(parent) =>
            {
                Step::Handled(self.all_constructors_declare(parent, exception))
            }
            NodeData::Try(try_data) => {
                if self.try_handles(try_data, element, exception) {
                    Step::Handled(true)
                } else {
                    Step::Ascend(parent)
                }
            }
            NodeData::CodeFragment(_) => Step::Handled(
                self.hooks
                    .fragment_handler(parent)
                    .is_some_and(|handler| handler.is_handled_exception(exception)),
            ),
            NodeData::SourceFile(file) => Step::Handled(
                file.file_kind == FileKind::ServerPage && self.options.permissive_server_pages,
            ),
            _ => {
                if self
                    .hooks
                    .custom_handles(self.arena, element, exception, top)
                {
                    Step::Handled(true)
                } else {
                    Step::Ascend(parent)
                }
            }
        }
    }

    fn try_handles(&self, try_data: &TryData, element: NodeIndex, exception: TypeId) -> bool {
        let from_body = element == try_data.try_block
            || (try_data.resource_list.is_some() && element == try_data.resource_list);
        if from_body {
            return self.catches_cover(try_data, exception) || self.finally_is_abrupt(try_data);
        }
        if try_data.catch_clauses.contains(element) {
            return self.finally_is_abrupt(try_data);
        }
        false
    }

    fn catches_cover(&self, try_data: &TryData, exception: TypeId) -> bool {
        try_data.catch_clauses.iter().any(|clause| {
            self.catch_alternatives(clause)
                .iter()
                .any(|&handler| self.types.is_subtype(exception, handler))
        })
    }

    fn finally_is_abrupt(&self, try_data: &TryData) -> bool {
        try_data.finally_block.is_some() && !self.can_complete_normally(try_data.finally_block)
    }

    /// The functional interface method implemented by `expr` declares
    /// `exception`. Without a known functional type the answer is
    /// configurable.
    fn is_handled_by_functional_method(&self, expr: NodeIndex, exception: TypeId) -> bool {
        match self.resolver.functional_method(expr) {
            Some(method) => self.throws_cover(&self.substituted_throws(&method), exception),
            None => self.options.permissive_missing_functional_type,
        }
    }

    /// Every constructor of the class declaring `member` declares
    /// `exception`. A class without explicit constructors handles nothing.
    fn all_constructors_declare(&self, member: NodeIndex, exception: TypeId) -> bool {
        let class = self.arena.parent_of(member);
        let constructors = self.arena.constructors_of(class);
        !constructors.is_empty()
            && constructors.iter().all(|&ctor| {
                self.arena
                    .get(ctor)
                    .and_then(|node| self.arena.get_method(node))
                    .is_some_and(|method| self.throws_cover(&method.throws, exception))
            })
    }

    /// `member` is declared directly in a named class.
    fn in_named_class(&self, member: NodeIndex) -> bool {
        let class = self.arena.parent_of(member);
        self.arena
            .get(class)
            .and_then(|node| self.arena.get_class(node))
            .is_some_and(|class| !class.is_anonymous())
    }

    pub(crate) fn is_method_reference(&self, node: NodeIndex) -> bool {
        self.arena
            .get(node)
            .is_some_and(|n| matches!(n.data, NodeData::MethodRef(_)))
    }
}

enum Step {
    Handled(bool),
    Ascend(NodeIndex),
}
