//! Pluggable handled-exception rules.

use exflow_solver::TypeId;
use exflow_syntax::{NodeArena, NodeIndex};
use rustc_hash::FxHashMap;

/// Extra rule consulted at every ancestor without a built-in rule.
pub trait CustomExceptionHandler: Send + Sync {
    /// Whether `exception`, escaping from `element`, is handled there.
    fn is_handled(
        &self,
        arena: &NodeArena,
        element: NodeIndex,
        exception: TypeId,
        top: NodeIndex,
    ) -> bool;
}

impl<F> CustomExceptionHandler for F
where
    F: Fn(&NodeArena, NodeIndex, TypeId, NodeIndex) -> bool + Send + Sync,
{
    fn is_handled(
        &self,
        arena: &NodeArena,
        element: NodeIndex,
        exception: TypeId,
        top: NodeIndex,
    ) -> bool {
        self(arena, element, exception, top)
    }
}

/// Host decision for exceptions escaping a code fragment.
pub trait FragmentExceptionHandler: Send + Sync {
    fn is_handled_exception(&self, exception: TypeId) -> bool;
}

impl<F> FragmentExceptionHandler for F
where
    F: Fn(TypeId) -> bool + Send + Sync,
{
    fn is_handled_exception(&self, exception: TypeId) -> bool {
        self(exception)
    }
}

/// Registered handler hooks, shared read-only by every analysis.
#[derive(Default)]
pub struct ExceptionHooks {
    custom: Vec<Box<dyn CustomExceptionHandler>>,
    fragments: FxHashMap<NodeIndex, Box<dyn FragmentExceptionHandler>>,
}

impl ExceptionHooks {
    pub fn new() -> Self {
        ExceptionHooks::default()
    }

    pub fn add_custom_handler(&mut self, handler: impl CustomExceptionHandler + 'static) {
        self.custom.push(Box::new(handler));
    }

    pub fn set_fragment_handler(
        &mut self,
        fragment: NodeIndex,
        handler: impl FragmentExceptionHandler + 'static,
    ) {
        self.fragments.insert(fragment, Box::new(handler));
    }

    pub fn custom_handlers(&self) -> impl Iterator<Item = &dyn CustomExceptionHandler> {
        self.custom.iter().map(|handler| handler.as_ref())
    }

    pub fn fragment_handler(&self, fragment: NodeIndex) -> Option<&dyn FragmentExceptionHandler> {
        self.fragments.get(&fragment).map(|handler| handler.as_ref())
    }

    /// Whether any custom handler claims `exception` at `element`.
    pub(crate) fn custom_handles(
        &self,
        arena: &NodeArena,
        element: NodeIndex,
        exception: TypeId,
        top: NodeIndex,
    ) -> bool {
        self.custom_handlers()
            .any(|handler| handler.is_handled(arena, element, exception, top))
    }
}

impl std::fmt::Debug for ExceptionHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExceptionHooks")
            .field("custom", &self.custom.len())
            .field("fragments", &self.fragments.len())
            .finish()
    }
}
