mod common;

use common::*;
use plasma_compiler::expression::{Expr, MemberKey};
use plasma_compiler::template::ast::{AttrValue, Node};
use plasma_compiler::{compile, CompileError, CompileOptions};

fn compile_err(children: Vec<Node>) -> CompileError {
    compile(&program(children), CompileOptions::default())
        .expect_err("compilation should fail")
}

#[test]
fn non_expression_event_handler_is_an_error_with_position() {
    let file = source("<div on:click=\"x\"></div>");
    let mut dir = directive(
        "on",
        "click",
        AttrValue::Literal {
            value: "x".to_string(),
            span: span(&file, 15, 16),
        },
    );
    dir.span = span(&file, 5, 17);

    let err = compile_err(vec![elem_full("div", vec![], vec![dir], vec![])]);
    let rendered = err.render();
    assert!(rendered.contains("Event handler must be expression at template.html@0:5"));
    assert!(rendered.contains("[-->]on:click"));
}

#[test]
fn unknown_event_modifier_is_an_error() {
    let mut dir = directive("on", "click", AttrValue::Expression(prop("go")));
    dir.modifiers = vec!["debounce".to_string()];
    let err = compile_err(vec![elem_full("div", vec![], vec![dir], vec![])]);
    assert_eq!(err.message, "Unknown event modifier :debounce");
}

#[test]
fn ref_attribute_requires_a_name() {
    use plasma_compiler::template::ast::Attribute;
    let err = compile_err(vec![elem(
        "div",
        vec![Attribute {
            name: "ref".to_string(),
            value: AttrValue::Empty,
            span: dummy_span(),
        }],
        vec![],
    )]);
    assert_eq!(err.message, "Ref attribute must have a name");
}

#[test]
fn arrows_are_rejected_outside_event_handlers() {
    let arrow = Expr::Arrow {
        params: vec![],
        body: Box::new(prop("x")),
        span: dummy_span(),
    };
    let err = compile_err(vec![elem("div", vec![], vec![expr_text(arrow)])]);
    assert_eq!(err.message, "Arrow functions are only allowed in event handlers");
}

#[test]
fn computed_callees_are_rejected() {
    let expr = Expr::Call {
        callee: Box::new(Expr::Member {
            object: Box::new(prop("handlers")),
            path: vec![MemberKey::Computed(Box::new(prop("key")))],
            span: dummy_span(),
        }),
        arguments: vec![],
        span: dummy_span(),
    };
    let err = compile_err(vec![elem("div", vec![], vec![expr_text(expr)])]);
    assert_eq!(err.message, "Unable to compile call with a computed callee");
}

#[test]
fn unknown_namespace_prefix_is_an_error() {
    let err = compile_err(vec![elem("foo:rect", vec![], vec![])]);
    assert_eq!(err.message, "Unknown namespace prefix foo");
}

#[test]
fn animation_directives_require_a_name() {
    let err = compile_err(vec![elem_full(
        "div",
        vec![],
        vec![directive("animate", "in", AttrValue::Empty)],
        vec![],
    )]);
    assert_eq!(err.message, "Animation must have a name");
}

#[test]
fn unsupported_handler_expressions_are_rejected() {
    use plasma_compiler::expression::BinaryOp;
    let expr = Expr::Binary {
        op: BinaryOp::Add,
        left: Box::new(prop("a")),
        right: Box::new(prop("b")),
        span: dummy_span(),
    };
    let err = compile_err(vec![elem_full(
        "div",
        vec![],
        vec![directive("on", "click", AttrValue::Expression(expr))],
        vec![],
    )]);
    assert_eq!(err.message, "Unable to compile event handler");
}

#[test]
fn errors_without_a_span_render_the_bare_message() {
    let err = CompileError::new("Content is not allowed outside of template", None);
    assert_eq!(err.render(), "Content is not allowed outside of template");
    assert_eq!(err.to_string(), "Content is not allowed outside of template");
}

#[test]
fn warnings_do_not_abort_compilation() {
    let result = compile_nodes(vec![
        elem("missing-widget", vec![], vec![]),
        elem("what-ever", vec![], vec![]),
    ]);
    assert_eq!(result.warnings.len(), 2);
    assert!(result.code.contains("export default function template$0"));
}
