//! Precise rethrow of caught exceptions.
//!
//! Rethrowing an effectively final catch parameter throws only what the try
//! block can actually deliver to that clause, which may be narrower than the
//! parameter's declared type.

use crate::analyzer::ExceptionAnalyzer;
use crate::exception_set::ExceptionSet;
use exflow_solver::TypeId;
use exflow_syntax::{NodeData, NodeIndex, NodeKind, ParameterData};
use smallvec::SmallVec;

impl<'a> ExceptionAnalyzer<'a> {
    /// Types raised by `throw expr`.
    pub(crate) fn throw_statement_types(
        &self,
        expr: NodeIndex,
        depth: u32,
    ) -> SmallVec<[TypeId; 4]> {
        if let Some((clause, param)) = self.caught_parameter(expr) {
            if self.options.precise_rethrow && !param.reassigned {
                return self.precise_types_at(clause, depth);
            }
            return self.types.disjuncts(param.declared_type);
        }
        let static_type = self.resolver.expression_type(expr).or_else(|| {
            match self.arena.get(expr).map(|node| &node.data) {
                Some(NodeData::New(new)) => new.class_type.is_some().then_some(new.class_type),
                _ => None,
            }
        });
        static_type
            .map(|ty| self.types.disjuncts(ty))
            .unwrap_or_default()
    }

    /// The exception types that can actually reach catch clause `clause`.
    ///
    /// Candidates are the checked exceptions thrown by the try block and its
    /// resources plus the unchecked roots. For each alternative `C` of the
    /// clause's parameter type, a candidate `T <: C` is kept as is and a
    /// candidate `T :> C` contributes `C`. Types caught by earlier clauses of
    /// the same try statement are removed.
    pub fn precise_catch_types(&self, clause: NodeIndex) -> SmallVec<[TypeId; 4]> {
        self.precise_types_at(clause, 0)
    }

    fn precise_types_at(&self, clause: NodeIndex, depth: u32) -> SmallVec<[TypeId; 4]> {
        let alternatives = self.catch_alternatives(clause);
        let try_idx = self.arena.parent_of(clause);
        let Some(try_data) = self
            .arena
            .get(try_idx)
            .and_then(|node| self.arena.get_try(node))
        else {
            return alternatives;
        };

        let mut thrown = ExceptionSet::new();
        for resource in self.resources_of(try_data) {
            let set = self.resource_exceptions(resource, depth + 1);
            self.merge(&mut thrown, &set);
        }
        let body = self.thrown_at(try_data.try_block, depth + 1);
        self.merge(&mut thrown, &body);

        let candidates = thrown
            .iter()
            .filter(|&ty| self.is_checked(ty))
            .chain(self.unchecked_roots().iter().copied());

        let mut precise: SmallVec<[TypeId; 4]> = SmallVec::new();
        for ty in candidates {
            let reaching = alternatives.iter().find_map(|&alt| {
                if self.types.is_subtype(ty, alt) {
                    Some(ty)
                } else if self.types.is_subtype(alt, ty) {
                    Some(alt)
                } else {
                    None
                }
            });
            if let Some(reaching) = reaching {
                if !precise.contains(&reaching) {
                    precise.push(reaching);
                }
            }
        }

        for earlier in try_data.catch_clauses.iter().take_while(|&c| c != clause) {
            for handler in self.catch_alternatives(earlier) {
                precise.retain(|ty| !self.types.is_subtype(*ty, handler));
            }
        }
        precise
    }

    /// The catch clause and parameter `expr` refers to, if it names a catch
    /// parameter.
    pub(crate) fn caught_parameter(
        &self,
        expr: NodeIndex,
    ) -> Option<(NodeIndex, &'a ParameterData)> {
        let arena = self.arena;
        let reference = arena.get(expr).and_then(|node| arena.get_reference(node))?;
        let param = arena
            .get(reference.declaration)
            .and_then(|node| arena.get_parameter(node))?;
        let clause = arena.parent_of(reference.declaration);
        (arena.kind_of(clause) == Some(NodeKind::Catch)).then_some((clause, param))
    }
}
