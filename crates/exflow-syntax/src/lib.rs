//! Syntax tree for the exflow analyzer.
//!
//! Nodes live in a [`NodeArena`] and are addressed by [`NodeIndex`]. Every
//! node records its parent, so analyses can ascend from any node toward the
//! file root without owning the tree. Node payloads are a closed sum type,
//! [`NodeData`], covering the constructs that matter for exception flow; any
//! other construct is an opaque [`NodeData::Other`] container.
//!
//! Trees are built bottom-up: children are added first and adopted by the
//! parent when the parent is added.

pub mod base;
pub mod node;
mod node_access;
mod node_arena;

pub use base::{NodeIndex, NodeList};
pub use node::*;
pub use node_access::Ancestors;
