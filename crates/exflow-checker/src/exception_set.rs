//! Antichain of exception types.
//!
//! An [`ExceptionSet`] never holds two types where one is a subtype of the
//! other: adding a type already covered by a member is a no-op, and adding a
//! more general type evicts the members it covers. Insertion order of the
//! survivors is preserved.

use exflow_common::limits::INLINE_EXCEPTIONS;
use exflow_solver::{TypeId, TypeOracle};
use smallvec::SmallVec;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExceptionSet {
    types: SmallVec<[TypeId; INLINE_EXCEPTIONS]>,
}

impl ExceptionSet {
    pub fn new() -> Self {
        ExceptionSet::default()
    }

    /// Insert `ty`, keeping the antichain invariant.
    ///
    /// Returns `true` if `ty` is a member afterwards because of this call.
    pub fn add(&mut self, types: &dyn TypeOracle, ty: TypeId) -> bool {
        if ty.is_none() {
            return false;
        }
        if self.types.iter().any(|&member| types.is_subtype(ty, member)) {
            return false;
        }
        self.types.retain(|member| !types.is_subtype(*member, ty));
        self.types.push(ty);
        true
    }

    pub fn add_all(&mut self, types: &dyn TypeOracle, other: &ExceptionSet) {
        for &ty in &other.types {
            self.add(types, ty);
        }
    }

    pub fn extend_from(&mut self, types: &dyn TypeOracle, iter: impl IntoIterator<Item = TypeId>) {
        for ty in iter {
            self.add(types, ty);
        }
    }

    /// Drop every member that is a subtype of `handler` (what a catch
    /// clause of that type absorbs).
    pub fn remove_covered_by(&mut self, types: &dyn TypeOracle, handler: TypeId) {
        self.types.retain(|member| !types.is_subtype(*member, handler));
    }

    pub fn retain(&mut self, mut keep: impl FnMut(TypeId) -> bool) {
        self.types.retain(|member| keep(*member));
    }

    pub fn contains(&self, ty: TypeId) -> bool {
        self.types.contains(&ty)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.types.iter().copied()
    }

    pub fn as_slice(&self) -> &[TypeId] {
        &self.types
    }

    pub fn into_vec(self) -> Vec<TypeId> {
        self.types.into_vec()
    }
}

impl IntoIterator for ExceptionSet {
    type Item = TypeId;
    type IntoIter = smallvec::IntoIter<[TypeId; INLINE_EXCEPTIONS]>;

    fn into_iter(self) -> Self::IntoIter {
        self.types.into_iter()
    }
}

impl<'s> IntoIterator for &'s ExceptionSet {
    type Item = TypeId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'s, TypeId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.types.iter().copied()
    }
}
