//! Node payloads and the arena that owns them.

use crate::base::{NodeIndex, NodeList};
use exflow_solver::TypeId;

// =============================================================================
// File-level boundaries
// =============================================================================

/// What kind of file a [`SourceFileData`] root represents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FileKind {
    /// An ordinary compilation unit.
    #[default]
    Source,
    /// A server-page template whose generated code handles every exception.
    ServerPage,
}

#[derive(Clone, Debug, Default)]
pub struct SourceFileData {
    pub file_name: String,
    pub file_kind: FileKind,
    pub statements: NodeList,
}

/// An isolated snippet evaluated by a host (debugger watches, consoles).
///
/// The host decides which exceptions the snippet may leave unhandled via a
/// fragment handler registered for this node.
#[derive(Clone, Debug, Default)]
pub struct CodeFragmentData {
    pub statements: NodeList,
}

// =============================================================================
// Declarations
// =============================================================================

#[derive(Clone, Debug, Default)]
pub struct ClassData {
    /// `None` for anonymous classes.
    pub name: Option<String>,
    pub class_type: TypeId,
    /// Constructor arguments of an anonymous class (`new T(args) { ... }`).
    pub arguments: NodeList,
    pub members: NodeList,
}

impl ClassData {
    pub fn is_anonymous(&self) -> bool {
        self.name.is_none()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MethodKind {
    #[default]
    Method,
    Constructor,
}

/// A method or constructor declaration.
#[derive(Clone, Debug, Default)]
pub struct MethodData {
    pub name: String,
    pub kind: MethodKind,
    pub is_static: bool,
    /// Types listed in the `throws` clause.
    pub throws: Vec<TypeId>,
    pub parameters: NodeList,
    pub body: NodeIndex,
}

impl MethodData {
    pub fn is_constructor(&self) -> bool {
        self.kind == MethodKind::Constructor
    }
}

#[derive(Clone, Debug, Default)]
pub struct FieldData {
    pub name: String,
    pub is_static: bool,
    pub field_type: TypeId,
    pub initializer: NodeIndex,
}

/// A class initializer block (`{ ... }` or `static { ... }`).
#[derive(Clone, Debug, Default)]
pub struct InitializerData {
    pub is_static: bool,
    pub body: NodeIndex,
}

/// A method, lambda or catch parameter.
#[derive(Clone, Debug, Default)]
pub struct ParameterData {
    pub name: String,
    /// Declared type; a disjunction for multi-catch parameters.
    pub declared_type: TypeId,
    /// The parameter is assigned somewhere in its scope (not effectively final).
    pub reassigned: bool,
}

// =============================================================================
// Statements
// =============================================================================

#[derive(Clone, Debug, Default)]
pub struct BlockData {
    pub statements: NodeList,
}

#[derive(Clone, Debug, Default)]
pub struct ThrowData {
    pub expression: NodeIndex,
}

#[derive(Clone, Debug, Default)]
pub struct TryData {
    /// A [`ResourceListData`] node, or `NONE` for a plain try.
    pub resource_list: NodeIndex,
    pub try_block: NodeIndex,
    pub catch_clauses: NodeList,
    pub finally_block: NodeIndex,
}

#[derive(Clone, Debug, Default)]
pub struct ResourceListData {
    pub resources: NodeList,
}

/// A variable declared in a try-with-resources header.
#[derive(Clone, Debug, Default)]
pub struct ResourceVariableData {
    pub name: String,
    pub declared_type: TypeId,
    pub initializer: NodeIndex,
}

#[derive(Clone, Debug, Default)]
pub struct CatchClauseData {
    pub parameter: NodeIndex,
    pub block: NodeIndex,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JumpKind {
    #[default]
    Return,
    Break,
    Continue,
}

/// `return`, `break` or `continue`.
#[derive(Clone, Debug, Default)]
pub struct JumpData {
    pub kind: JumpKind,
    /// Returned value, if any.
    pub expression: NodeIndex,
}

// =============================================================================
// Expressions
// =============================================================================

/// A method call `qualifier.name(arguments)`.
#[derive(Clone, Debug, Default)]
pub struct CallData {
    pub method_name: String,
    pub qualifier: NodeIndex,
    pub arguments: NodeList,
}

/// An object creation `new T(arguments)`.
///
/// With an anonymous class body the arguments belong to the class node,
/// mirroring how the class is what receives them.
#[derive(Clone, Debug, Default)]
pub struct NewData {
    pub class_type: TypeId,
    pub arguments: NodeList,
    pub anonymous_class: NodeIndex,
}

#[derive(Clone, Debug, Default)]
pub struct LambdaData {
    pub parameters: NodeList,
    pub body: NodeIndex,
}

/// A method reference `qualifier::name`.
#[derive(Clone, Debug, Default)]
pub struct MethodRefData {
    pub qualifier: NodeIndex,
    pub method_name: String,
}

/// A simple name referring to a declaration.
#[derive(Clone, Debug, Default)]
pub struct ReferenceData {
    pub name: String,
    /// Declaration the name resolves to, or `NONE` if unresolved.
    pub declaration: NodeIndex,
}

/// Any construct without its own exception semantics.
#[derive(Clone, Debug, Default)]
pub struct OtherData {
    /// Free-form description for logs (`"if"`, `"binary"`, ...).
    pub label: String,
    pub children: NodeList,
}

// =============================================================================
// Node
// =============================================================================

/// Payload of a node. One variant per construct relevant to exception flow.
#[derive(Clone, Debug)]
pub enum NodeData {
    SourceFile(SourceFileData),
    CodeFragment(CodeFragmentData),
    Class(ClassData),
    Method(MethodData),
    Field(FieldData),
    Initializer(InitializerData),
    Parameter(ParameterData),
    Block(BlockData),
    Throw(ThrowData),
    Try(TryData),
    ResourceList(ResourceListData),
    ResourceVariable(ResourceVariableData),
    Catch(CatchClauseData),
    Jump(JumpData),
    Call(CallData),
    New(NewData),
    Lambda(LambdaData),
    MethodRef(MethodRefData),
    Reference(ReferenceData),
    Other(OtherData),
}

/// Fieldless mirror of [`NodeData`] for logging and cheap comparisons.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    SourceFile,
    CodeFragment,
    Class,
    Method,
    Field,
    Initializer,
    Parameter,
    Block,
    Throw,
    Try,
    ResourceList,
    ResourceVariable,
    Catch,
    Jump,
    Call,
    New,
    Lambda,
    MethodRef,
    Reference,
    Other,
}

impl NodeData {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::SourceFile(_) => NodeKind::SourceFile,
            NodeData::CodeFragment(_) => NodeKind::CodeFragment,
            NodeData::Class(_) => NodeKind::Class,
            NodeData::Method(_) => NodeKind::Method,
            NodeData::Field(_) => NodeKind::Field,
            NodeData::Initializer(_) => NodeKind::Initializer,
            NodeData::Parameter(_) => NodeKind::Parameter,
            NodeData::Block(_) => NodeKind::Block,
            NodeData::Throw(_) => NodeKind::Throw,
            NodeData::Try(_) => NodeKind::Try,
            NodeData::ResourceList(_) => NodeKind::ResourceList,
            NodeData::ResourceVariable(_) => NodeKind::ResourceVariable,
            NodeData::Catch(_) => NodeKind::Catch,
            NodeData::Jump(_) => NodeKind::Jump,
            NodeData::Call(_) => NodeKind::Call,
            NodeData::New(_) => NodeKind::New,
            NodeData::Lambda(_) => NodeKind::Lambda,
            NodeData::MethodRef(_) => NodeKind::MethodRef,
            NodeData::Reference(_) => NodeKind::Reference,
            NodeData::Other(_) => NodeKind::Other,
        }
    }
}

/// A node: source span plus payload.
#[derive(Clone, Debug)]
pub struct Node {
    pub pos: u32,
    pub end: u32,
    pub data: NodeData,
}

impl Node {
    #[inline]
    pub fn kind(&self) -> NodeKind {
        self.data.kind()
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.end.saturating_sub(self.pos)
    }
}

/// Per-node information maintained by the arena rather than the payload.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExtendedNodeInfo {
    pub parent: NodeIndex,
}

/// Owner of every node of one tree.
#[derive(Clone, Debug, Default)]
pub struct NodeArena {
    pub(crate) nodes: Vec<Node>,
    pub(crate) extended_info: Vec<ExtendedNodeInfo>,
}
