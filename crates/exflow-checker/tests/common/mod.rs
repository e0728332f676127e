//! Tree-building helpers shared by the checker integration tests.
#![allow(dead_code)]

use exflow_checker::{
    Callable, Candidate, ExceptionAnalyzer, ExceptionHooks, FlowCancelled, FlowOracle,
    TableResolver,
};
use exflow_common::AnalysisOptions;
use exflow_solver::{Substitution, TypeId, TypeOracle, TypeTable, WellKnownType};
use exflow_syntax::*;
use std::sync::Arc;

/// A flow oracle that always gives up.
pub struct CancelledFlow;

impl FlowOracle for CancelledFlow {
    fn block_can_complete_normally(&self, _block: NodeIndex) -> Result<bool, FlowCancelled> {
        Err(FlowCancelled)
    }
}

pub struct Fixture {
    pub arena: NodeArena,
    pub table: TypeTable,
    pub resolver: TableResolver,
    pub hooks: ExceptionHooks,
    pub options: AnalysisOptions,
    pub object: TypeId,
    pub exception: TypeId,
    pub runtime: TypeId,
    pub error: TypeId,
    pub io: TypeId,
    pub fnf: TypeId,
    pub sql: TypeId,
    pub npe: TypeId,
    pub service: TypeId,
    pos: u32,
}

impl Fixture {
    pub fn new() -> Fixture {
        let mut table = TypeTable::with_java_roots();
        let well_known = |which| table.well_known(which).expect("java roots");
        let object = well_known(WellKnownType::Object);
        let exception = well_known(WellKnownType::Exception);
        let runtime = well_known(WellKnownType::RuntimeException);
        let error = well_known(WellKnownType::Error);
        let io = table.define_class("java.io.IOException", &[exception]);
        let fnf = table.define_class("java.io.FileNotFoundException", &[io]);
        let sql = table.define_class("java.sql.SQLException", &[exception]);
        let npe = table.define_class("java.lang.NullPointerException", &[runtime]);
        let service = table.define_class("com.example.Service", &[object]);
        Fixture {
            arena: NodeArena::new(),
            table,
            resolver: TableResolver::new(),
            hooks: ExceptionHooks::new(),
            options: AnalysisOptions::default(),
            object,
            exception,
            runtime,
            error,
            io,
            fnf,
            sql,
            npe,
            service,
            pos: 0,
        }
    }

    pub fn analyzer<'a>(&'a self, flow: &'a dyn FlowOracle) -> ExceptionAnalyzer<'a> {
        ExceptionAnalyzer::new(&self.arena, &self.table, flow, &self.resolver)
            .with_hooks(&self.hooks)
            .with_options(self.options.clone())
    }

    pub fn name(&self, ty: TypeId) -> String {
        self.table.display(ty)
    }

    fn add(&mut self, data: NodeData) -> NodeIndex {
        let pos = self.pos;
        self.pos += 10;
        self.arena.add_node(pos, pos + 5, data)
    }

    // -------------------------------------------------------------------------
    // Expressions
    // -------------------------------------------------------------------------

    pub fn method_candidate(&self, name: &str, throws: &[TypeId]) -> Candidate {
        Candidate::new(Arc::new(Callable::method(name, self.service, throws)))
    }

    /// `name(args)` resolving to a method of `Service` declaring `throws`.
    pub fn call_with_args(
        &mut self,
        name: &str,
        args: &[NodeIndex],
        throws: &[TypeId],
    ) -> NodeIndex {
        let call = self.add(NodeData::Call(CallData {
            method_name: name.to_string(),
            qualifier: NodeIndex::NONE,
            arguments: NodeList::from(args),
        }));
        let candidate = self.method_candidate(name, throws);
        self.resolver.add_call(call, candidate);
        call
    }

    pub fn call(&mut self, name: &str, throws: &[TypeId]) -> NodeIndex {
        self.call_with_args(name, &[], throws)
    }

    pub fn unresolved_call(&mut self, name: &str) -> NodeIndex {
        self.add(NodeData::Call(CallData {
            method_name: name.to_string(),
            qualifier: NodeIndex::NONE,
            arguments: NodeList::new(),
        }))
    }

    /// `qualifier.name()` with an explicit candidate.
    pub fn qualified_call(
        &mut self,
        qualifier: NodeIndex,
        name: &str,
        candidate: Candidate,
    ) -> NodeIndex {
        let call = self.add(NodeData::Call(CallData {
            method_name: name.to_string(),
            qualifier,
            arguments: NodeList::new(),
        }));
        self.resolver.add_call(call, candidate);
        call
    }

    pub fn reference(&mut self, name: &str, declaration: NodeIndex) -> NodeIndex {
        self.add(NodeData::Reference(ReferenceData {
            name: name.to_string(),
            declaration,
        }))
    }

    /// `new T()` with no constructor exceptions.
    pub fn new_instance(&mut self, ty: TypeId) -> NodeIndex {
        self.add(NodeData::New(NewData {
            class_type: ty,
            arguments: NodeList::new(),
            anonymous_class: NodeIndex::NONE,
        }))
    }

    pub fn lambda(&mut self, body: NodeIndex) -> NodeIndex {
        self.add(NodeData::Lambda(LambdaData {
            parameters: NodeList::new(),
            body,
        }))
    }

    /// `Service::name` referring to a method declaring `throws`.
    pub fn method_ref(&mut self, name: &str, throws: &[TypeId]) -> NodeIndex {
        let method_ref = self.add(NodeData::MethodRef(MethodRefData {
            qualifier: NodeIndex::NONE,
            method_name: name.to_string(),
        }));
        let candidate = self.method_candidate(name, throws);
        self.resolver.add_call(method_ref, candidate);
        method_ref
    }

    /// The lambda or method reference `expr` implements a functional
    /// method declaring `throws`.
    pub fn implements_functional(&mut self, expr: NodeIndex, throws: &[TypeId]) {
        let sam = self.method_candidate("apply", throws);
        self.resolver.add_functional_method(expr, sam);
    }

    pub fn other(&mut self, label: &str, children: &[NodeIndex]) -> NodeIndex {
        self.add(NodeData::Other(OtherData {
            label: label.to_string(),
            children: NodeList::from(children),
        }))
    }

    // -------------------------------------------------------------------------
    // Statements
    // -------------------------------------------------------------------------

    pub fn block(&mut self, statements: &[NodeIndex]) -> NodeIndex {
        self.add(NodeData::Block(BlockData {
            statements: NodeList::from(statements),
        }))
    }

    pub fn throw_expr(&mut self, expression: NodeIndex) -> NodeIndex {
        self.add(NodeData::Throw(ThrowData { expression }))
    }

    /// `throw new T();`
    pub fn throw_new(&mut self, ty: TypeId) -> NodeIndex {
        let created = self.new_instance(ty);
        self.throw_expr(created)
    }

    pub fn ret(&mut self) -> NodeIndex {
        self.add(NodeData::Jump(JumpData {
            kind: JumpKind::Return,
            expression: NodeIndex::NONE,
        }))
    }

    pub fn parameter(&mut self, name: &str, ty: TypeId) -> NodeIndex {
        self.add(NodeData::Parameter(ParameterData {
            name: name.to_string(),
            declared_type: ty,
            reassigned: false,
        }))
    }

    /// A catch parameter that is assigned somewhere in its clause.
    pub fn reassigned_parameter(&mut self, name: &str, ty: TypeId) -> NodeIndex {
        self.add(NodeData::Parameter(ParameterData {
            name: name.to_string(),
            declared_type: ty,
            reassigned: true,
        }))
    }

    pub fn catch_clause(&mut self, parameter: NodeIndex, block: NodeIndex) -> NodeIndex {
        self.add(NodeData::Catch(CatchClauseData { parameter, block }))
    }

    /// `catch (T e) { statements }`, returning the clause.
    pub fn catch(&mut self, ty: TypeId, statements: &[NodeIndex]) -> NodeIndex {
        let param = self.parameter("e", ty);
        let block = self.block(statements);
        self.catch_clause(param, block)
    }

    pub fn try_stmt(
        &mut self,
        try_block: NodeIndex,
        catches: &[NodeIndex],
        finally: Option<NodeIndex>,
    ) -> NodeIndex {
        self.add(NodeData::Try(TryData {
            resource_list: NodeIndex::NONE,
            try_block,
            catch_clauses: NodeList::from(catches),
            finally_block: finally.unwrap_or(NodeIndex::NONE),
        }))
    }

    pub fn resource_variable(&mut self, ty: TypeId, initializer: NodeIndex) -> NodeIndex {
        self.add(NodeData::ResourceVariable(ResourceVariableData {
            name: "r".to_string(),
            declared_type: ty,
            initializer,
        }))
    }

    pub fn try_with_resources(
        &mut self,
        resources: &[NodeIndex],
        try_block: NodeIndex,
        catches: &[NodeIndex],
    ) -> NodeIndex {
        let list = self.add(NodeData::ResourceList(ResourceListData {
            resources: NodeList::from(resources),
        }));
        self.add(NodeData::Try(TryData {
            resource_list: list,
            try_block,
            catch_clauses: NodeList::from(catches),
            finally_block: NodeIndex::NONE,
        }))
    }

    /// Register `close()` on `resource_type` declaring `throws`.
    pub fn closer(
        &mut self,
        resource_type: TypeId,
        throws: &[TypeId],
        substitution: Substitution,
    ) {
        let close = Arc::new(Callable::method("close", resource_type, throws));
        self.resolver
            .add_closer(resource_type, Candidate::with_substitution(close, substitution));
    }

    // -------------------------------------------------------------------------
    // Declarations
    // -------------------------------------------------------------------------

    pub fn method(&mut self, name: &str, throws: &[TypeId], body: NodeIndex) -> NodeIndex {
        self.add(NodeData::Method(MethodData {
            name: name.to_string(),
            kind: MethodKind::Method,
            is_static: false,
            throws: throws.to_vec(),
            parameters: NodeList::new(),
            body,
        }))
    }

    pub fn constructor(&mut self, throws: &[TypeId]) -> NodeIndex {
        let body = self.block(&[]);
        self.add(NodeData::Method(MethodData {
            name: "<init>".to_string(),
            kind: MethodKind::Constructor,
            is_static: false,
            throws: throws.to_vec(),
            parameters: NodeList::new(),
            body,
        }))
    }

    pub fn field(&mut self, is_static: bool, initializer: NodeIndex) -> NodeIndex {
        self.add(NodeData::Field(FieldData {
            name: "f".to_string(),
            is_static,
            field_type: self.object,
            initializer,
        }))
    }

    pub fn initializer(&mut self, is_static: bool, body: NodeIndex) -> NodeIndex {
        self.add(NodeData::Initializer(InitializerData { is_static, body }))
    }

    pub fn class(&mut self, name: &str, members: &[NodeIndex]) -> NodeIndex {
        self.add(NodeData::Class(ClassData {
            name: Some(name.to_string()),
            class_type: self.service,
            arguments: NodeList::new(),
            members: NodeList::from(members),
        }))
    }

    pub fn anonymous_class(
        &mut self,
        arguments: &[NodeIndex],
        members: &[NodeIndex],
    ) -> NodeIndex {
        self.add(NodeData::Class(ClassData {
            name: None,
            class_type: self.service,
            arguments: NodeList::from(arguments),
            members: NodeList::from(members),
        }))
    }

    /// `new Service(args) { members }`
    pub fn new_anonymous(&mut self, class: NodeIndex) -> NodeIndex {
        self.add(NodeData::New(NewData {
            class_type: self.service,
            arguments: NodeList::new(),
            anonymous_class: class,
        }))
    }

    pub fn source_file(
        &mut self,
        file_name: &str,
        file_kind: FileKind,
        statements: &[NodeIndex],
    ) -> NodeIndex {
        self.add(NodeData::SourceFile(SourceFileData {
            file_name: file_name.to_string(),
            file_kind,
            statements: NodeList::from(statements),
        }))
    }

    pub fn code_fragment(&mut self, statements: &[NodeIndex]) -> NodeIndex {
        self.add(NodeData::CodeFragment(CodeFragmentData {
            statements: NodeList::from(statements),
        }))
    }
}
