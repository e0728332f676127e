//! Type-parameter substitutions attached to resolved calls.

use crate::types::TypeId;
use rustc_hash::FxHashMap;

/// Mapping from type parameters to the types they are bound to at one use
/// site. The empty substitution is the identity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Substitution {
    map: FxHashMap<TypeId, TypeId>,
}

impl Substitution {
    pub fn new() -> Self {
        Substitution::default()
    }

    pub fn identity() -> Self {
        Substitution::default()
    }

    /// Build a substitution binding `params[i]` to `args[i]`.
    ///
    /// Extra entries on either side are ignored (raw or partially applied
    /// generic types keep their remaining parameters unbound).
    pub fn from_pairs(params: &[TypeId], args: &[TypeId]) -> Self {
        let map = params
            .iter()
            .copied()
            .zip(args.iter().copied())
            .collect();
        Substitution { map }
    }

    pub fn with(mut self, param: TypeId, arg: TypeId) -> Self {
        self.map.insert(param, arg);
        self
    }

    pub fn get(&self, param: TypeId) -> Option<TypeId> {
        self.map.get(&param).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
