//! Exceptions of calls whose target is ambiguous among overloads.

use crate::analyzer::ExceptionAnalyzer;
use crate::exception_set::ExceptionSet;
use crate::oracles::{CallableKind, Candidate, ResolvedCall};
use exflow_solver::TypeId;
use smallvec::SmallVec;
use tracing::trace;

impl<'a> ExceptionAnalyzer<'a> {
    /// Exceptions every remaining candidate agrees on.
    ///
    /// Candidates overridden by another candidate are dropped first. Returns
    /// `None` when at most one candidate survives, leaving the primary
    /// candidate's declaration in charge.
    pub(crate) fn ambiguous_call_exceptions(
        &self,
        resolved: &ResolvedCall,
    ) -> Option<ExceptionSet> {
        let candidates = resolved.candidates();
        let survivors: SmallVec<[&Candidate; 4]> = candidates
            .iter()
            .copied()
            .filter(|candidate| !candidates.iter().any(|other| self.overrides(other, candidate)))
            .collect();
        if survivors.len() < 2 {
            return None;
        }

        let mut retained: Option<SmallVec<[TypeId; 4]>> = None;
        for candidate in survivors {
            let thrown = self.substituted_throws(candidate);
            if thrown.iter().all(|&ty| self.is_unchecked(ty)) {
                trace!(
                    callable = %candidate.callable.name,
                    "candidate declares no checked exceptions"
                );
                return Some(ExceptionSet::new());
            }
            retained = Some(match retained {
                None => thrown,
                Some(current) => self.retain_exceptions(&current, &thrown),
            });
        }

        let mut set = ExceptionSet::new();
        set.extend_from(self.types, retained.unwrap_or_default());
        Some(set)
    }

    /// Pairwise intersection of two throws clauses.
    ///
    /// A type survives when the other side declares it or a supertype. When
    /// the other side declares a subtype of it instead, the subtype survives,
    /// provided both are checked or both are unchecked.
    pub(crate) fn retain_exceptions(
        &self,
        current: &[TypeId],
        other: &[TypeId],
    ) -> SmallVec<[TypeId; 4]> {
        let mut out: SmallVec<[TypeId; 4]> = SmallVec::new();
        let mut keep = |ty: TypeId| {
            if !out.contains(&ty) {
                out.push(ty);
            }
        };
        for &ty in current {
            for &theirs in other {
                if self.types.is_subtype(ty, theirs) {
                    keep(ty);
                } else if self.types.is_subtype(theirs, ty)
                    && self.is_unchecked(theirs) == self.is_unchecked(ty)
                {
                    keep(theirs);
                }
            }
        }
        out
    }

    /// `a` overrides `b`: a distinct method declared in a proper subtype of
    /// `b`'s declaring class. Constructors are not inherited and never
    /// override.
    fn overrides(&self, a: &Candidate, b: &Candidate) -> bool {
        if a.callable.kind != CallableKind::Method || b.callable.kind != CallableKind::Method {
            return false;
        }
        let (sub, sup) = (a.callable.declaring_class, b.callable.declaring_class);
        !a.is_same_callable(b) && sub != sup && self.types.is_subtype(sub, sup)
    }
}
