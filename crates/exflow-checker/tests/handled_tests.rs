mod common;

use common::{CancelledFlow, Fixture};
use exflow_checker::SyntacticFlowOracle;
use exflow_common::AnalysisOptions;
use exflow_solver::TypeId;
use exflow_syntax::{FileKind, NodeArena, NodeIndex};

const NONE: NodeIndex = NodeIndex::NONE;

#[test]
fn method_throws_clause_handles_subtypes() {
    let mut fx = Fixture::new();
    let read = fx.call("read", &[fx.fnf]);
    let body = fx.block(&[read]);
    let method = fx.method("m", &[fx.io], body);
    let class = fx.class("A", &[method]);
    fx.source_file("A.java", FileKind::Source, &[class]);

    let flow = SyntacticFlowOracle::new(&fx.arena);
    let analyzer = fx.analyzer(&flow);
    assert!(analyzer.unhandled_exceptions(read, NONE).is_empty());
    assert!(analyzer.is_handled_at(read, fx.fnf, NONE));
    assert!(!analyzer.is_handled_at(read, fx.sql, NONE));
}

#[test]
fn method_without_throws_leaves_exception_unhandled() {
    let mut fx = Fixture::new();
    let read = fx.call("read", &[fx.io, fx.npe]);
    let body = fx.block(&[read]);
    let method = fx.method("m", &[], body);
    fx.class("A", &[method]);

    let flow = SyntacticFlowOracle::new(&fx.arena);
    let unhandled = fx.analyzer(&flow).unhandled_exceptions(read, NONE);
    assert_eq!(unhandled.as_slice(), &[fx.io]);
}

#[test]
fn top_boundary_stops_the_ascent() {
    // void m() throws IOException { try { risky(); } catch (RuntimeException e) {} }
    let mut fx = Fixture::new();
    let risky = fx.call("risky", &[fx.io]);
    let try_block = fx.block(&[risky]);
    let catch = fx.catch(fx.runtime, &[]);
    let try_stmt = fx.try_stmt(try_block, &[catch], None);
    let body = fx.block(&[try_stmt]);
    let method = fx.method("m", &[fx.io], body);
    fx.class("A", &[method]);

    let flow = SyntacticFlowOracle::new(&fx.arena);
    let analyzer = fx.analyzer(&flow);
    assert!(analyzer.unhandled_exceptions(risky, NONE).is_empty());
    assert_eq!(
        analyzer.unhandled_exceptions(risky, body).as_slice(),
        &[fx.io]
    );
    assert!(!analyzer.is_handled_at(risky, fx.io, try_block));
}

#[test]
fn named_class_body_handles_nothing() {
    let mut fx = Fixture::new();
    let read = fx.call("read", &[fx.io]);
    let field = fx.field(true, read);
    let class = fx.class("A", &[field]);
    let body = fx.block(&[class]);
    fx.method("outer", &[fx.io], body);

    let flow = SyntacticFlowOracle::new(&fx.arena);
    let unhandled = fx.analyzer(&flow).unhandled_exceptions(read, NONE);
    assert_eq!(unhandled.as_slice(), &[fx.io]);
}

#[test]
fn instance_field_needs_every_constructor_to_declare() {
    let mut fx = Fixture::new();
    let load = fx.call("load", &[fx.io]);
    let field = fx.field(false, load);
    let plain = fx.constructor(&[fx.io]);
    let broad = fx.constructor(&[fx.exception]);
    fx.class("A", &[field, plain, broad]);

    let flow = SyntacticFlowOracle::new(&fx.arena);
    assert!(fx.analyzer(&flow).unhandled_exceptions(load, NONE).is_empty());
}

#[test]
fn one_constructor_missing_the_declaration_is_enough_to_fail() {
    let mut fx = Fixture::new();
    let load = fx.call("load", &[fx.io]);
    let field = fx.field(false, load);
    let declares = fx.constructor(&[fx.io]);
    let other = fx.constructor(&[fx.sql]);
    fx.class("A", &[field, declares, other]);

    let flow = SyntacticFlowOracle::new(&fx.arena);
    let unhandled = fx.analyzer(&flow).unhandled_exceptions(load, NONE);
    assert_eq!(unhandled.as_slice(), &[fx.io]);
}

#[test]
fn class_without_constructors_does_not_handle_initializer_exceptions() {
    let mut fx = Fixture::new();
    let load = fx.call("load", &[fx.io]);
    let body = fx.block(&[load]);
    let init = fx.initializer(false, body);
    fx.class("A", &[init]);

    let flow = SyntacticFlowOracle::new(&fx.arena);
    let unhandled = fx.analyzer(&flow).unhandled_exceptions(load, NONE);
    assert_eq!(unhandled.as_slice(), &[fx.io]);
}

#[test]
fn instance_initializer_handled_by_constructors() {
    let mut fx = Fixture::new();
    let load = fx.call("load", &[fx.fnf]);
    let body = fx.block(&[load]);
    let init = fx.initializer(false, body);
    let ctor = fx.constructor(&[fx.io]);
    fx.class("A", &[init, ctor]);

    let static_load = fx.call("load", &[fx.fnf]);
    let static_body = fx.block(&[static_load]);
    let static_init = fx.initializer(true, static_body);
    let static_ctor = fx.constructor(&[fx.io]);
    fx.class("B", &[static_init, static_ctor]);

    let flow = SyntacticFlowOracle::new(&fx.arena);
    let analyzer = fx.analyzer(&flow);
    assert!(analyzer.unhandled_exceptions(load, NONE).is_empty());
    assert_eq!(
        analyzer.unhandled_exceptions(static_load, NONE).as_slice(),
        &[fx.fnf]
    );
}

#[test]
fn anonymous_class_defers_to_enclosing_code() {
    // void m() throws IOException { new Service(arg()) {{ read(); }}; }
    let mut fx = Fixture::new();
    let arg = fx.call("arg", &[fx.io]);
    let read = fx.call("read", &[fx.io]);
    let init_body = fx.block(&[read]);
    let init = fx.initializer(false, init_body);
    let class = fx.anonymous_class(&[arg], &[init]);
    let creation = fx.new_anonymous(class);
    let body = fx.block(&[creation]);
    fx.method("m", &[fx.io], body);

    let flow = SyntacticFlowOracle::new(&fx.arena);
    let analyzer = fx.analyzer(&flow);
    assert!(analyzer.unhandled_exceptions(read, NONE).is_empty());
    assert!(analyzer.unhandled_exceptions(arg, NONE).is_empty());
}

#[test]
fn anonymous_class_method_uses_its_own_throws_clause() {
    let mut fx = Fixture::new();
    let read = fx.call("read", &[fx.io]);
    let run_body = fx.block(&[read]);
    let run = fx.method("run", &[], run_body);
    let class = fx.anonymous_class(&[], &[run]);
    let creation = fx.new_anonymous(class);
    let body = fx.block(&[creation]);
    fx.method("m", &[fx.io], body);

    let flow = SyntacticFlowOracle::new(&fx.arena);
    let unhandled = fx.analyzer(&flow).unhandled_exceptions(read, NONE);
    assert_eq!(unhandled.as_slice(), &[fx.io]);
}

#[test]
fn lambda_body_checked_against_functional_method() {
    let mut fx = Fixture::new();
    let read = fx.call("read", &[fx.io]);
    let lambda_body = fx.block(&[read]);
    let lambda = fx.lambda(lambda_body);
    let run = fx.call_with_args("run", &[lambda], &[]);
    let body = fx.block(&[run]);
    fx.method("m", &[fx.io], body);

    fx.implements_functional(lambda, &[]);
    let flow = SyntacticFlowOracle::new(&fx.arena);
    let unhandled = fx.analyzer(&flow).unhandled_exceptions(read, NONE);
    assert_eq!(unhandled.as_slice(), &[fx.io]);

    fx.implements_functional(lambda, &[fx.exception]);
    let flow = SyntacticFlowOracle::new(&fx.arena);
    assert!(fx.analyzer(&flow).unhandled_exceptions(read, NONE).is_empty());
}

#[test]
fn lambda_without_functional_type_follows_options() {
    let mut fx = Fixture::new();
    let read = fx.call("read", &[fx.io]);
    let lambda_body = fx.block(&[read]);
    fx.lambda(lambda_body);

    let flow = SyntacticFlowOracle::new(&fx.arena);
    assert!(fx.analyzer(&flow).unhandled_exceptions(read, NONE).is_empty());

    fx.options = AnalysisOptions::strict();
    let unhandled = fx.analyzer(&flow).unhandled_exceptions(read, NONE);
    assert_eq!(unhandled.as_slice(), &[fx.io]);
}

#[test]
fn method_reference_checked_against_functional_method() {
    let mut fx = Fixture::new();
    let method_ref = fx.method_ref("read", &[fx.io]);
    let run = fx.call_with_args("run", &[method_ref], &[]);
    let body = fx.block(&[run]);
    fx.method("m", &[fx.io], body);

    fx.implements_functional(method_ref, &[]);
    let flow = SyntacticFlowOracle::new(&fx.arena);
    let unhandled = fx.analyzer(&flow).unhandled_exceptions(method_ref, NONE);
    assert_eq!(unhandled.as_slice(), &[fx.io]);

    fx.implements_functional(method_ref, &[fx.io]);
    let flow = SyntacticFlowOracle::new(&fx.arena);
    assert!(fx
        .analyzer(&flow)
        .unhandled_exceptions(method_ref, NONE)
        .is_empty());
}

#[test]
fn sibling_catch_does_not_handle_catch_body() {
    let mut fx = Fixture::new();
    let read = fx.call("read", &[fx.io]);
    let try_block = fx.block(&[read]);
    let wrap = fx.throw_new(fx.sql);
    let catch_io = fx.catch(fx.io, &[wrap]);
    let catch_sql = fx.catch(fx.sql, &[]);
    let try_stmt = fx.try_stmt(try_block, &[catch_io, catch_sql], None);
    let body = fx.block(&[try_stmt]);
    fx.method("m", &[], body);

    let flow = SyntacticFlowOracle::new(&fx.arena);
    let analyzer = fx.analyzer(&flow);
    assert!(analyzer.unhandled_exceptions(read, NONE).is_empty());
    assert_eq!(
        analyzer.unhandled_exceptions(wrap, NONE).as_slice(),
        &[fx.sql]
    );
}

#[test]
fn abrupt_finally_handles_try_and_catch_bodies() {
    let mut fx = Fixture::new();
    let read = fx.call("read", &[fx.io]);
    let try_block = fx.block(&[read]);
    let wrap = fx.throw_new(fx.sql);
    let catch = fx.catch(fx.runtime, &[wrap]);
    let ret = fx.ret();
    let finally = fx.block(&[ret]);
    let try_stmt = fx.try_stmt(try_block, &[catch], Some(finally));
    let body = fx.block(&[try_stmt]);
    fx.method("m", &[], body);

    let flow = SyntacticFlowOracle::new(&fx.arena);
    let analyzer = fx.analyzer(&flow);
    assert!(analyzer.unhandled_exceptions(read, NONE).is_empty());
    assert!(analyzer.unhandled_exceptions(wrap, NONE).is_empty());
    assert!(analyzer.unhandled_exceptions(try_stmt, NONE).is_empty());
}

#[test]
fn outer_catch_handles_what_the_inner_try_lets_through() {
    // try { try { read(); query(); } catch (SQLException e) { throw new IO(); } }
    // catch (IOException e) {}
    let mut fx = Fixture::new();
    let read = fx.call("read", &[fx.io]);
    let query = fx.call("query", &[fx.sql]);
    let inner_block = fx.block(&[read, query]);
    let rethrow = fx.throw_new(fx.io);
    let inner_catch = fx.catch(fx.sql, &[rethrow]);
    let inner = fx.try_stmt(inner_block, &[inner_catch], None);
    let outer_block = fx.block(&[inner]);
    let outer_catch = fx.catch(fx.io, &[]);
    let outer = fx.try_stmt(outer_block, &[outer_catch], None);
    let body = fx.block(&[outer]);
    fx.method("m", &[], body);

    let flow = SyntacticFlowOracle::new(&fx.arena);
    let analyzer = fx.analyzer(&flow);
    assert!(analyzer.unhandled_exceptions(read, NONE).is_empty());
    assert!(analyzer.unhandled_exceptions(query, NONE).is_empty());
    assert!(analyzer.unhandled_exceptions(rethrow, NONE).is_empty());
    assert!(analyzer.unhandled_exceptions(inner, NONE).is_empty());
    assert!(analyzer.unhandled_exceptions(outer, NONE).is_empty());
}

#[test]
fn inner_abrupt_finally_handles_before_a_mismatched_outer_catch() {
    // try { try { read(); } finally { return; } } catch (SQLException e) {}
    let mut fx = Fixture::new();
    let read = fx.call("read", &[fx.io]);
    let inner_block = fx.block(&[read]);
    let ret = fx.ret();
    let finally = fx.block(&[ret]);
    let inner = fx.try_stmt(inner_block, &[], Some(finally));
    let outer_block = fx.block(&[inner]);
    let outer_catch = fx.catch(fx.sql, &[]);
    fx.try_stmt(outer_block, &[outer_catch], None);

    let load = fx.call("load", &[fx.io]);
    let plain_block = fx.block(&[load]);
    let plain_inner = fx.try_stmt(plain_block, &[], None);
    let plain_outer_block = fx.block(&[plain_inner]);
    let plain_catch = fx.catch(fx.sql, &[]);
    fx.try_stmt(plain_outer_block, &[plain_catch], None);

    let flow = SyntacticFlowOracle::new(&fx.arena);
    let analyzer = fx.analyzer(&flow);
    assert!(analyzer.unhandled_exceptions(read, NONE).is_empty());
    assert_eq!(
        analyzer.unhandled_exceptions(load, NONE).as_slice(),
        &[fx.io]
    );
}

#[test]
fn static_members_are_not_covered_by_constructors() {
    let mut fx = Fixture::new();
    let load = fx.call("load", &[fx.io]);
    let field = fx.field(true, load);
    let init = fx.call("init", &[fx.io]);
    let static_body = fx.block(&[init]);
    let static_block = fx.initializer(true, static_body);
    let ctor = fx.constructor(&[fx.io]);
    fx.class("A", &[field, static_block, ctor]);

    let flow = SyntacticFlowOracle::new(&fx.arena);
    let analyzer = fx.analyzer(&flow);
    assert_eq!(
        analyzer.unhandled_exceptions(load, NONE).as_slice(),
        &[fx.io]
    );
    assert_eq!(
        analyzer.unhandled_exceptions(init, NONE).as_slice(),
        &[fx.io]
    );
}

#[test]
fn finally_body_is_not_covered_by_its_own_catches() {
    let mut fx = Fixture::new();
    let try_block = fx.block(&[]);
    let catch = fx.catch(fx.sql, &[]);
    let cleanup = fx.throw_new(fx.sql);
    let finally = fx.block(&[cleanup]);
    let try_stmt = fx.try_stmt(try_block, &[catch], Some(finally));
    let body = fx.block(&[try_stmt]);
    fx.method("m", &[], body);

    let flow = SyntacticFlowOracle::new(&fx.arena);
    let unhandled = fx.analyzer(&flow).unhandled_exceptions(cleanup, NONE);
    assert_eq!(unhandled.as_slice(), &[fx.sql]);
}

#[test]
fn cancelled_flow_counts_as_abrupt_finally() {
    let mut fx = Fixture::new();
    let read = fx.call("read", &[fx.io]);
    let try_block = fx.block(&[read]);
    let finally = fx.block(&[]);
    let try_stmt = fx.try_stmt(try_block, &[], Some(finally));
    let body = fx.block(&[try_stmt]);
    fx.method("m", &[], body);

    let flow = SyntacticFlowOracle::new(&fx.arena);
    assert_eq!(
        fx.analyzer(&flow).unhandled_exceptions(read, NONE).as_slice(),
        &[fx.io]
    );
    assert!(fx
        .analyzer(&CancelledFlow)
        .unhandled_exceptions(read, NONE)
        .is_empty());
}

#[test]
fn code_fragment_asks_its_handler() {
    let mut fx = Fixture::new();
    let read = fx.call("read", &[fx.io]);
    let query = fx.call("query", &[fx.sql]);
    let fragment = fx.code_fragment(&[read, query]);
    let orphan_read = fx.call("read", &[fx.io]);
    fx.code_fragment(&[orphan_read]);

    let io = fx.io;
    fx.hooks
        .set_fragment_handler(fragment, move |ty: TypeId| ty == io);

    let flow = SyntacticFlowOracle::new(&fx.arena);
    let analyzer = fx.analyzer(&flow);
    assert!(analyzer.unhandled_exceptions(read, NONE).is_empty());
    assert_eq!(
        analyzer.unhandled_exceptions(query, NONE).as_slice(),
        &[fx.sql]
    );
    assert_eq!(
        analyzer.unhandled_exceptions(orphan_read, NONE).as_slice(),
        &[fx.io]
    );
}

#[test]
fn server_pages_handle_everything_unless_strict() {
    let mut fx = Fixture::new();
    let page_read = fx.call("read", &[fx.io]);
    fx.source_file("index.jsp", FileKind::ServerPage, &[page_read]);
    let source_read = fx.call("read", &[fx.io]);
    fx.source_file("A.java", FileKind::Source, &[source_read]);

    let flow = SyntacticFlowOracle::new(&fx.arena);
    let analyzer = fx.analyzer(&flow);
    assert!(analyzer.unhandled_exceptions(page_read, NONE).is_empty());
    assert_eq!(
        analyzer.unhandled_exceptions(source_read, NONE).as_slice(),
        &[fx.io]
    );

    fx.options.permissive_server_pages = false;
    let unhandled = fx.analyzer(&flow).unhandled_exceptions(page_read, NONE);
    assert_eq!(unhandled.as_slice(), &[fx.io]);
}

#[test]
fn custom_handler_claims_exceptions_at_generic_ancestors() {
    let mut fx = Fixture::new();
    let read = fx.call("read", &[fx.io]);
    let guarded = fx.other("guarded", &[read]);
    let body = fx.block(&[guarded]);
    fx.method("m", &[], body);
    let unguarded_read = fx.call("read", &[fx.io]);
    let other_body = fx.block(&[unguarded_read]);
    fx.method("n", &[], other_body);

    fx.hooks.add_custom_handler(
        |arena: &NodeArena, element: NodeIndex, _: TypeId, _: NodeIndex| {
            arena
                .get(arena.parent_of(element))
                .and_then(|node| arena.get_other(node))
                .is_some_and(|other| other.label == "guarded")
        },
    );

    let flow = SyntacticFlowOracle::new(&fx.arena);
    let analyzer = fx.analyzer(&flow);
    assert!(analyzer.unhandled_exceptions(read, NONE).is_empty());
    assert_eq!(
        analyzer.unhandled_exceptions(unguarded_read, NONE).as_slice(),
        &[fx.io]
    );
}

#[test]
fn detached_node_is_never_handled() {
    let mut fx = Fixture::new();
    let read = fx.call("read", &[fx.io]);

    let flow = SyntacticFlowOracle::new(&fx.arena);
    let analyzer = fx.analyzer(&flow);
    assert!(!analyzer.is_handled_at(read, fx.io, NONE));
    assert!(!analyzer.is_handled_at(NONE, fx.io, NONE));
}
