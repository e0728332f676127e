//! Collaborators the analysis consults but does not implement.
//!
//! The analysis never resolves names, computes expression types or builds
//! control-flow graphs itself. Hosts provide those answers through the
//! traits below; [`crate::TableResolver`] and
//! [`crate::SyntacticFlowOracle`] are small in-crate implementations used by
//! tests and simple hosts.

use exflow_solver::{Substitution, TypeId};
use exflow_syntax::NodeIndex;
use std::fmt;
use std::sync::Arc;

// =============================================================================
// Control flow
// =============================================================================

/// The control-flow oracle gave up on a block (incomplete code, timeout).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlowCancelled;

impl fmt::Display for FlowCancelled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("control-flow analysis cancelled")
    }
}

impl std::error::Error for FlowCancelled {}

pub trait FlowOracle: Send + Sync {
    /// Whether execution can fall off the end of `block`.
    ///
    /// `Err(FlowCancelled)` is read as "cannot complete normally".
    fn block_can_complete_normally(&self, block: NodeIndex) -> Result<bool, FlowCancelled>;
}

// =============================================================================
// Resolution
// =============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CallableKind {
    #[default]
    Method,
    Constructor,
}

/// A resolved method or constructor as seen from a call site.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Callable {
    pub name: String,
    pub kind: CallableKind,
    /// Class that declares the callable.
    pub declaring_class: TypeId,
    /// Declared `throws` clause, in terms of the callable's own type
    /// parameters.
    pub throws: Vec<TypeId>,
}

impl Callable {
    pub fn method(name: &str, declaring_class: TypeId, throws: &[TypeId]) -> Callable {
        Callable {
            name: name.to_string(),
            kind: CallableKind::Method,
            declaring_class,
            throws: throws.to_vec(),
        }
    }

    pub fn constructor(declaring_class: TypeId, throws: &[TypeId]) -> Callable {
        Callable {
            name: "<init>".to_string(),
            kind: CallableKind::Constructor,
            declaring_class,
            throws: throws.to_vec(),
        }
    }
}

/// A callable paired with the substitution inferred at one site.
#[derive(Clone, Debug)]
pub struct Candidate {
    pub callable: Arc<Callable>,
    pub substitution: Substitution,
}

impl Candidate {
    pub fn new(callable: Arc<Callable>) -> Candidate {
        Candidate {
            callable,
            substitution: Substitution::identity(),
        }
    }

    pub fn with_substitution(callable: Arc<Callable>, substitution: Substitution) -> Candidate {
        Candidate {
            callable,
            substitution,
        }
    }

    pub(crate) fn is_same_callable(&self, other: &Candidate) -> bool {
        Arc::ptr_eq(&self.callable, &other.callable) || self.callable == other.callable
    }
}

/// Result of resolving a call, object creation or method reference.
#[derive(Clone, Debug)]
pub struct ResolvedCall {
    /// The candidate the resolver settled on.
    pub primary: Candidate,
    /// Other candidates still applicable when resolution was ambiguous.
    pub alternatives: Vec<Candidate>,
}

impl ResolvedCall {
    pub fn single(primary: Candidate) -> ResolvedCall {
        ResolvedCall {
            primary,
            alternatives: Vec::new(),
        }
    }

    pub fn is_ambiguous(&self) -> bool {
        self.alternatives
            .iter()
            .any(|alt| !alt.is_same_callable(&self.primary))
    }

    /// Primary first, then the alternatives, without duplicates.
    pub fn candidates(&self) -> Vec<&Candidate> {
        let mut out: Vec<&Candidate> = vec![&self.primary];
        for alt in &self.alternatives {
            if !out.iter().any(|seen| seen.is_same_callable(alt)) {
                out.push(alt);
            }
        }
        out
    }
}

pub trait Resolver: Send + Sync {
    /// Resolve a `Call`, `New` or `MethodRef` node.
    fn resolve_call(&self, site: NodeIndex) -> Option<ResolvedCall>;

    /// The `close()` method invoked for a resource of `resource_type`.
    fn resolve_closer(&self, resource_type: TypeId) -> Option<Candidate>;

    /// The single abstract method a lambda or method reference implements.
    fn functional_method(&self, expr: NodeIndex) -> Option<Candidate>;

    /// Static type of an expression.
    fn expression_type(&self, expr: NodeIndex) -> Option<TypeId>;

    /// The host is in the middle of choosing between overloads, and calls
    /// seen now must not report declared exceptions. Answered for the
    /// calling thread.
    fn is_comparing_overloads(&self) -> bool {
        false
    }
}
