//! Type handles and type shapes.

use smallvec::SmallVec;

/// Opaque handle to a type owned by a [`crate::TypeOracle`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl TypeId {
    /// Sentinel for "no type".
    pub const NONE: TypeId = TypeId(u32::MAX);

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    pub const fn is_some(self) -> bool {
        self.0 != u32::MAX
    }
}

impl Default for TypeId {
    fn default() -> Self {
        TypeId::NONE
    }
}

/// Roots of the exception hierarchy the analysis needs by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WellKnownType {
    /// The universal root class (`java.lang.Object`).
    Object,
    /// Root of everything throwable.
    Throwable,
    /// Root of ordinary exceptions.
    Exception,
    /// Root of unchecked exceptions.
    RuntimeException,
    /// Root of unchecked errors.
    Error,
}

impl WellKnownType {
    pub const ALL: [WellKnownType; 5] = [
        WellKnownType::Object,
        WellKnownType::Throwable,
        WellKnownType::Exception,
        WellKnownType::RuntimeException,
        WellKnownType::Error,
    ];

    /// Fully qualified name used by [`crate::TypeTable::with_java_roots`].
    pub const fn qualified_name(self) -> &'static str {
        match self {
            WellKnownType::Object => "java.lang.Object",
            WellKnownType::Throwable => "java.lang.Throwable",
            WellKnownType::Exception => "java.lang.Exception",
            WellKnownType::RuntimeException => "java.lang.RuntimeException",
            WellKnownType::Error => "java.lang.Error",
        }
    }
}

/// Shape of a type stored in a [`crate::TypeTable`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// A class or interface declaration.
    Class {
        name: String,
        supertypes: Vec<TypeId>,
        type_params: Vec<TypeId>,
    },
    /// A generic class applied to type arguments (`Box<IOException>`).
    Instantiation { origin: TypeId, args: Vec<TypeId> },
    /// A type variable with its upper bound (`TypeId::NONE` for the root).
    TypeParam { name: String, bound: TypeId },
    /// An array of the element type.
    Array(TypeId),
    /// A primitive or otherwise non-class type.
    Primitive(String),
    /// Alternatives of a multi-catch parameter (`A | B`).
    Disjunction(SmallVec<[TypeId; 4]>),
}
