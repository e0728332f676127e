//! Type layer for the exflow analyzer.
//!
//! The exception analysis never inspects types structurally. It only asks
//! the [`TypeOracle`] whether one type is a subtype of another, applies
//! [`Substitution`]s, and expands disjunctive (multi-catch) types. This crate
//! defines that seam plus [`TypeTable`], a self-contained oracle that models
//! classes, type parameters, arrays, primitives and disjunctions.

pub mod oracle;
pub mod substitution;
pub mod table;
pub mod types;

pub use oracle::TypeOracle;
pub use substitution::Substitution;
pub use table::TypeTable;
pub use types::{TypeId, TypeKind, WellKnownType};
