//! Self-contained type oracle.
//!
//! `TypeTable` stores every type as a [`TypeKind`] in a single vector and
//! hands out [`TypeId`] indices. Arrays, instantiations and disjunctions are
//! hash-consed so structurally equal types share an id; classes and type
//! parameters are nominal and always get a fresh id.
//!
//! The table is built up front with `&mut self` methods. Types created while
//! applying substitutions during analysis go through the interior lock, so a
//! built table can be shared across analysis threads.

use crate::oracle::TypeOracle;
use crate::substitution::Substitution;
use crate::types::{TypeId, TypeKind, WellKnownType};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use std::collections::VecDeque;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::trace;

/// Bound on nested type-parameter bounds and array element chains.
const MAX_SUBTYPE_DEPTH: u32 = 64;

#[derive(Debug, Default)]
struct TableInner {
    types: Vec<TypeKind>,
    interned: FxHashMap<TypeKind, TypeId>,
    classes_by_name: FxHashMap<String, TypeId>,
    well_known: FxHashMap<WellKnownType, TypeId>,
}

impl TableInner {
    fn kind(&self, ty: TypeId) -> Option<&TypeKind> {
        if ty.is_none() {
            None
        } else {
            self.types.get(ty.0 as usize)
        }
    }

    fn push(&mut self, kind: TypeKind) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(kind);
        id
    }

    fn intern(&mut self, kind: TypeKind) -> TypeId {
        if let Some(&id) = self.interned.get(&kind) {
            return id;
        }
        let id = self.push(kind.clone());
        self.interned.insert(kind, id);
        id
    }

    fn is_object(&self, ty: TypeId) -> bool {
        self.well_known.get(&WellKnownType::Object) == Some(&ty)
    }

    /// Strip type arguments: `Box<T>` erases to `Box`.
    fn erase(&self, ty: TypeId) -> TypeId {
        match self.kind(ty) {
            Some(TypeKind::Instantiation { origin, .. }) => *origin,
            _ => ty,
        }
    }

    fn is_subtype(&self, sub: TypeId, sup: TypeId, depth: u32) -> bool {
        if sub == sup {
            return true;
        }
        if depth > MAX_SUBTYPE_DEPTH {
            trace!(?sub, ?sup, "subtype depth exceeded");
            return false;
        }
        let (Some(sub_kind), Some(sup_kind)) = (self.kind(sub), self.kind(sup)) else {
            return false;
        };

        if let TypeKind::Disjunction(alts) = sub_kind {
            return alts.iter().all(|&alt| self.is_subtype(alt, sup, depth + 1));
        }
        if let TypeKind::Disjunction(alts) = sup_kind {
            return alts.iter().any(|&alt| self.is_subtype(sub, alt, depth + 1));
        }

        match sub_kind {
            TypeKind::Primitive(_) => false,
            TypeKind::TypeParam { bound, .. } => {
                if bound.is_none() {
                    self.is_object(sup)
                } else {
                    self.is_subtype(*bound, sup, depth + 1)
                }
            }
            TypeKind::Array(elem) => match sup_kind {
                TypeKind::Array(sup_elem) => self.is_subtype(*elem, *sup_elem, depth + 1),
                _ => self.is_object(sup),
            },
            TypeKind::Class { .. } | TypeKind::Instantiation { .. } => {
                self.is_object(sup) || self.class_extends(self.erase(sub), self.erase(sup))
            }
            TypeKind::Disjunction(_) => false,
        }
    }

    /// Breadth-first search of declared supertypes. Tolerates cycles.
    fn class_extends(&self, sub: TypeId, target: TypeId) -> bool {
        if !matches!(self.kind(target), Some(TypeKind::Class { .. })) {
            return false;
        }
        let mut visited = FxHashSet::default();
        let mut queue = VecDeque::from([sub]);
        while let Some(current) = queue.pop_front() {
            if current == target {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            if let Some(TypeKind::Class { supertypes, .. }) = self.kind(current) {
                queue.extend(supertypes.iter().map(|&s| self.erase(s)));
            }
        }
        false
    }

    fn display(&self, ty: TypeId) -> String {
        match self.kind(ty) {
            None => "<none>".to_string(),
            Some(TypeKind::Class { name, .. }) => name.clone(),
            Some(TypeKind::TypeParam { name, .. }) => name.clone(),
            Some(TypeKind::Primitive(name)) => name.clone(),
            Some(TypeKind::Array(elem)) => format!("{}[]", self.display(*elem)),
            Some(TypeKind::Instantiation { origin, args }) => {
                let args: Vec<String> = args.iter().map(|&a| self.display(a)).collect();
                format!("{}<{}>", self.display(*origin), args.join(", "))
            }
            Some(TypeKind::Disjunction(alts)) => {
                let alts: Vec<String> = alts.iter().map(|&a| self.display(a)).collect();
                alts.join(" | ")
            }
        }
    }
}

/// Reference [`TypeOracle`] implementation.
#[derive(Debug, Default)]
pub struct TypeTable {
    inner: RwLock<TableInner>,
}

impl TypeTable {
    pub fn new() -> Self {
        TypeTable::default()
    }

    /// A table pre-populated with the `java.lang` exception roots:
    /// `Object`, `Throwable extends Object`, `Exception extends Throwable`,
    /// `RuntimeException extends Exception` and `Error extends Throwable`.
    pub fn with_java_roots() -> Self {
        let mut table = TypeTable::new();
        let object = table.define_class(WellKnownType::Object.qualified_name(), &[]);
        let throwable = table.define_class(WellKnownType::Throwable.qualified_name(), &[object]);
        let exception = table.define_class(WellKnownType::Exception.qualified_name(), &[throwable]);
        let runtime =
            table.define_class(WellKnownType::RuntimeException.qualified_name(), &[exception]);
        let error = table.define_class(WellKnownType::Error.qualified_name(), &[throwable]);

        table.set_well_known(WellKnownType::Object, object);
        table.set_well_known(WellKnownType::Throwable, throwable);
        table.set_well_known(WellKnownType::Exception, exception);
        table.set_well_known(WellKnownType::RuntimeException, runtime);
        table.set_well_known(WellKnownType::Error, error);
        table
    }

    fn read(&self) -> RwLockReadGuard<'_, TableInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, TableInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn inner_mut(&mut self) -> &mut TableInner {
        self.inner.get_mut().unwrap_or_else(PoisonError::into_inner)
    }

    /// Declare a non-generic class. Re-declaring a name returns the
    /// existing id unchanged.
    pub fn define_class(&mut self, name: &str, supertypes: &[TypeId]) -> TypeId {
        self.define_generic_class(name, &[], supertypes).0
    }

    /// Declare a generic class together with its type parameters.
    ///
    /// Each parameter is bounded by the root (`TypeId::NONE`).
    pub fn define_generic_class(
        &mut self,
        name: &str,
        type_param_names: &[&str],
        supertypes: &[TypeId],
    ) -> (TypeId, Vec<TypeId>) {
        let inner = self.inner_mut();
        if let Some(&existing) = inner.classes_by_name.get(name) {
            let params = match inner.kind(existing) {
                Some(TypeKind::Class { type_params, .. }) => type_params.clone(),
                _ => Vec::new(),
            };
            return (existing, params);
        }
        let type_params: Vec<TypeId> = type_param_names
            .iter()
            .map(|param| {
                inner.push(TypeKind::TypeParam {
                    name: (*param).to_string(),
                    bound: TypeId::NONE,
                })
            })
            .collect();
        let id = inner.push(TypeKind::Class {
            name: name.to_string(),
            supertypes: supertypes.to_vec(),
            type_params: type_params.clone(),
        });
        inner.classes_by_name.insert(name.to_string(), id);
        (id, type_params)
    }

    /// Declare a free type parameter (for generic methods).
    pub fn type_param(&mut self, name: &str, bound: TypeId) -> TypeId {
        self.inner_mut().push(TypeKind::TypeParam {
            name: name.to_string(),
            bound,
        })
    }

    pub fn primitive(&mut self, name: &str) -> TypeId {
        self.inner_mut().intern(TypeKind::Primitive(name.to_string()))
    }

    pub fn array_of(&self, element: TypeId) -> TypeId {
        self.write().intern(TypeKind::Array(element))
    }

    pub fn instantiate(&self, origin: TypeId, args: &[TypeId]) -> TypeId {
        self.write().intern(TypeKind::Instantiation {
            origin,
            args: args.to_vec(),
        })
    }

    /// Disjunction of the given alternatives. A single alternative is
    /// returned as-is.
    pub fn disjunction(&self, alternatives: &[TypeId]) -> TypeId {
        match alternatives {
            [single] => *single,
            _ => self
                .write()
                .intern(TypeKind::Disjunction(SmallVec::from_slice(alternatives))),
        }
    }

    pub fn set_well_known(&mut self, which: WellKnownType, ty: TypeId) {
        self.inner_mut().well_known.insert(which, ty);
    }

    pub fn class_by_name(&self, name: &str) -> Option<TypeId> {
        self.read().classes_by_name.get(name).copied()
    }

    pub fn kind(&self, ty: TypeId) -> Option<TypeKind> {
        self.read().kind(ty).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The substitution binding a generic class's parameters to the
    /// arguments of `ty`. Identity for anything that is not an instantiation.
    pub fn substitution_for(&self, ty: TypeId) -> Substitution {
        let inner = self.read();
        let Some(TypeKind::Instantiation { origin, args }) = inner.kind(ty) else {
            return Substitution::identity();
        };
        match inner.kind(*origin) {
            Some(TypeKind::Class { type_params, .. }) => {
                Substitution::from_pairs(type_params, args)
            }
            _ => Substitution::identity(),
        }
    }

    /// Structurally apply `subst`, creating new types as needed.
    fn apply(&self, ty: TypeId, subst: &Substitution) -> TypeId {
        let Some(kind) = self.kind(ty) else {
            return ty;
        };
        match kind {
            TypeKind::TypeParam { .. } => subst.get(ty).unwrap_or(ty),
            TypeKind::Instantiation { origin, args } => {
                let new_args: Vec<TypeId> = args.iter().map(|&a| self.apply(a, subst)).collect();
                if new_args == args {
                    ty
                } else {
                    self.instantiate(origin, &new_args)
                }
            }
            TypeKind::Array(elem) => {
                let new_elem = self.apply(elem, subst);
                if new_elem == elem { ty } else { self.array_of(new_elem) }
            }
            TypeKind::Disjunction(alts) => {
                let new_alts: SmallVec<[TypeId; 4]> =
                    alts.iter().map(|&a| self.apply(a, subst)).collect();
                if new_alts == alts {
                    ty
                } else {
                    self.disjunction(&new_alts)
                }
            }
            TypeKind::Class { .. } | TypeKind::Primitive(_) => ty,
        }
    }
}

impl TypeOracle for TypeTable {
    fn is_subtype(&self, sub: TypeId, sup: TypeId) -> bool {
        self.read().is_subtype(sub, sup, 0)
    }

    fn substitute(&self, ty: TypeId, subst: &Substitution) -> Option<TypeId> {
        let result = if subst.is_empty() {
            ty
        } else {
            self.apply(ty, subst)
        };
        match self.read().kind(result) {
            Some(
                TypeKind::Class { .. }
                | TypeKind::Instantiation { .. }
                | TypeKind::TypeParam { .. }
                | TypeKind::Disjunction(_),
            ) => Some(result),
            _ => {
                trace!(?ty, ?result, "substitution produced a non-class type");
                None
            }
        }
    }

    fn disjuncts(&self, ty: TypeId) -> SmallVec<[TypeId; 4]> {
        match self.read().kind(ty) {
            Some(TypeKind::Disjunction(alts)) => alts.clone(),
            _ => SmallVec::from_slice(&[ty]),
        }
    }

    fn is_array(&self, ty: TypeId) -> bool {
        matches!(self.read().kind(ty), Some(TypeKind::Array(_)))
    }

    fn well_known(&self, which: WellKnownType) -> Option<TypeId> {
        self.read().well_known.get(&which).copied()
    }

    fn display(&self, ty: TypeId) -> String {
        self.read().display(ty)
    }
}
