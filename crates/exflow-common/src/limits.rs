//! Centralized limits for the exception analysis.
//!
//! Both analyzers are recursive over the syntax tree. Trees coming from
//! editors can be arbitrarily deep (generated code, long call chains), so
//! every recursion is bounded by one of the constants below. The values are
//! defaults; [`crate::AnalysisOptions`] can override them per invocation.

/// Maximum depth of the bottom-up `thrown_by` walk.
///
/// Each nested expression or statement adds a frame. Past this depth the
/// remaining subtree contributes nothing to the thrown set.
///
/// ```java
/// // Long fluent chains nest one call expression per link:
/// builder.a().b().c().d() /* ... thousands of links ... */ .build();
/// ```
pub const MAX_TREE_WALK_DEPTH: u32 = 2_000;

/// Maximum number of parent hops in one `is_handled_at` ascent.
///
/// The ascent strictly moves toward the root, so this only triggers on
/// malformed trees with parent cycles. When exceeded the exception is
/// treated as not handled.
pub const MAX_ASCENT_DEPTH: u32 = 10_000;

/// Stack headroom kept free before the walk switches to a fresh segment.
pub const STACK_RED_ZONE: usize = 64 * 1024;

/// Size of each additional stack segment allocated for deep walks.
pub const STACK_GROWTH: usize = 1024 * 1024;

/// Inline capacity for per-node exception sets.
///
/// Most call sites declare zero to three exception types.
pub const INLINE_EXCEPTIONS: usize = 4;
