//! The type oracle seam consumed by the exception analysis.

use crate::substitution::Substitution;
use crate::types::{TypeId, WellKnownType};
use smallvec::{SmallVec, smallvec};

/// Read-only view of the host's type system.
///
/// Implementations must be safe to query from several analysis threads at
/// once; the analysis itself never mutates the oracle.
pub trait TypeOracle: Send + Sync {
    /// `sub <: sup`, reflexive.
    fn is_subtype(&self, sub: TypeId, sup: TypeId) -> bool;

    /// Apply `subst` to `ty`.
    ///
    /// Returns `None` when the result is not a class-like type (for example a
    /// type parameter bound to an array or primitive); such entries are
    /// dropped from throws lists.
    fn substitute(&self, ty: TypeId, subst: &Substitution) -> Option<TypeId>;

    /// Alternatives of a disjunctive type, or `[ty]` for any other type.
    fn disjuncts(&self, ty: TypeId) -> SmallVec<[TypeId; 4]> {
        smallvec![ty]
    }

    /// Whether `ty` is an array type.
    fn is_array(&self, ty: TypeId) -> bool;

    /// Handle of a well-known root, if the type system has it.
    fn well_known(&self, which: WellKnownType) -> Option<TypeId>;

    /// Human-readable name for diagnostics and logs.
    fn display(&self, ty: TypeId) -> String;

    /// `a` and `b` are mutual subtypes.
    fn is_same_type(&self, a: TypeId, b: TypeId) -> bool {
        a == b || (self.is_subtype(a, b) && self.is_subtype(b, a))
    }
}
