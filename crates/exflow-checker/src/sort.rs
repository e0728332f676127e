//! Ordering of exception types for catch clauses and messages.

use exflow_solver::{TypeId, TypeOracle};

/// Sort `types` so that no type precedes one of its subtypes.
///
/// The tail is sorted first, then a single bubbling pass sinks each general
/// type below the more specific type that follows it. Unrelated types keep
/// their relative order.
pub fn sort_most_specific_first(types: &dyn TypeOracle, list: &mut [TypeId]) {
    if list.len() < 2 {
        return;
    }
    sort_most_specific_first(types, &mut list[1..]);
    for i in 0..list.len() - 1 {
        if list[i] != list[i + 1] && types.is_subtype(list[i + 1], list[i]) {
            list.swap(i, i + 1);
        }
    }
}
