mod common;

use common::*;
use plasma_compiler::template::ast::{
    ChooseStatement, ConditionBranch, IfStatement, Node,
};

fn branch(test: Option<plasma_compiler::expression::Expr>, children: Vec<Node>) -> ConditionBranch {
    ConditionBranch {
        test,
        children,
        span: dummy_span(),
    }
}

#[test]
fn if_statement_mounts_a_block() {
    let result = compile_nodes(vec![elem(
        "div",
        vec![],
        vec![Node::If(IfStatement {
            branches: vec![branch(
                Some(prop("enabled")),
                vec![elem("p", vec![], vec![text("ok")])],
            )],
            span: dummy_span(),
        })],
    )]);

    assert_eq!(
        result.code,
        "import { elem, elemWithText, insert, createInjector, mountBlock, updateBlock, unmountBlock, addDisposeCallback } from \"@plasma/runtime\";\n\
         \n\
         function ifBody$0(host, injector, scope) {\n\
         \x20\x20insert(injector, elemWithText('p', 'ok'));\n\
         }\n\
         \n\
         function ifEntry$0(host, scope) {\n\
         \x20\x20if (host.props.enabled) {\n\
         \x20\x20\x20\x20return ifBody$0;\n\
         \x20\x20}\n\
         }\n\
         \n\
         export default function template$0(host, scope) {\n\
         \x20\x20const target$0 = host.componentView;\n\
         \x20\x20const div$0 = target$0.appendChild(elem('div'));\n\
         \x20\x20const inj$0 = createInjector(div$0);\n\
         \x20\x20scope.if$0 = mountBlock(host, inj$0, ifEntry$0);\n\
         \x20\x20addDisposeCallback(host, template$0Unmount);\n\
         \x20\x20return template$0Update;\n\
         }\n\
         \n\
         function template$0Update(host, scope) {\n\
         \x20\x20updateBlock(scope.if$0);\n\
         }\n\
         \n\
         function template$0Unmount(scope) {\n\
         \x20\x20scope.if$0 = unmountBlock(scope.if$0);\n\
         }\n"
    );
}

#[test]
fn else_branches_chain_in_source_order() {
    let result = compile_nodes(vec![elem(
        "div",
        vec![],
        vec![Node::If(IfStatement {
            branches: vec![
                branch(Some(prop("a")), vec![text("1")]),
                branch(Some(prop("b")), vec![text("2")]),
                branch(None, vec![text("3")]),
            ],
            span: dummy_span(),
        })],
    )]);

    assert!(result.code.contains("if (host.props.a) {"));
    assert!(result.code.contains("} else if (host.props.b) {"));
    assert!(result.code.contains("} else {"));
    assert_before(&result.code, "return ifBody$0;", "return ifBody$1;");
    assert_before(&result.code, "return ifBody$1;", "return ifBody$2;");
}

#[test]
fn default_only_branch_returns_unconditionally() {
    let result = compile_nodes(vec![elem(
        "div",
        vec![],
        vec![Node::Choose(ChooseStatement {
            branches: vec![branch(None, vec![text("always")])],
            span: dummy_span(),
        })],
    )]);

    assert!(result.code.contains(
        "function chooseEntry$0(host, scope) {\n  return chooseBody$0;\n}"
    ));
    assert!(result.code.contains("mountBlock(host, inj$0, chooseEntry$0);"));
}

#[test]
fn empty_branch_mounts_nothing() {
    let result = compile_nodes(vec![elem(
        "div",
        vec![],
        vec![Node::If(IfStatement {
            branches: vec![
                branch(Some(prop("a")), vec![text("1")]),
                branch(None, vec![]),
            ],
            span: dummy_span(),
        })],
    )]);

    // The else arm exists but returns no block.
    assert!(result.code.contains("} else {"));
    assert_eq!(result.code.matches("return ifBody$").count(), 1);
}

#[test]
fn attribute_only_condition_stages_attributes_in_place() {
    let result = compile_nodes(vec![elem(
        "div",
        vec![attr("class", "base")],
        vec![Node::If(IfStatement {
            branches: vec![branch(
                Some(prop("active")),
                vec![Node::Attribute(attr("class", "active"))],
            )],
            span: dummy_span(),
        })],
    )]);

    assert!(result.code.contains(
        "function ifAttr$0(host, injector, scope) {\n\
         \x20\x20if (host.props.active) {\n\
         \x20\x20\x20\x20setAttribute(injector, 'class', 'active');\n\
         \x20\x20}\n\
         \x20\x20return 0;\n\
         }"
    ));
    // Mount and update both run the shared staging function; the update
    // pass reads the injector from a destructured local.
    assert_eq!(result.code.matches("ifAttr$0(host, inj$0, scope);").count(), 2);
    assert!(result.code.contains("const { inj$0 } = scope;"));
    // The base attribute is routed through the same injector and committed
    // once per render pass, mount and update.
    assert!(result.code.contains("setAttribute(inj$0, 'class', 'base');"));
    assert_eq!(result.code.matches("finalizeAttributes(").count(), 2);
    assert!(!result.code.contains("mountBlock"));
}

#[test]
fn choose_blocks_get_their_own_prefix() {
    let result = compile_nodes(vec![elem(
        "div",
        vec![],
        vec![Node::Choose(ChooseStatement {
            branches: vec![
                branch(Some(prop("a")), vec![text("1")]),
                branch(None, vec![text("2")]),
            ],
            span: dummy_span(),
        })],
    )]);

    assert!(result.code.contains("function chooseBody$0(host, injector, scope)"));
    assert!(result.code.contains("function chooseBody$1(host, injector, scope)"));
    assert!(result.code.contains("function chooseEntry$0(host, scope)"));
    assert!(result.code.contains("scope.choose$0 = unmountBlock(scope.choose$0);"));
}

#[test]
fn nested_conditions_get_their_own_blocks() {
    let result = compile_nodes(vec![elem(
        "div",
        vec![],
        vec![Node::If(IfStatement {
            branches: vec![branch(
                Some(prop("outer")),
                vec![Node::If(IfStatement {
                    branches: vec![branch(Some(prop("inner")), vec![text("deep")])],
                    span: dummy_span(),
                })],
            )],
            span: dummy_span(),
        })],
    )]);

    // The outer body's symbol is allocated when its block opens, before
    // the inner condition compiles.
    assert!(result.code.contains("function ifBody$0(host, injector, scope)"));
    assert!(result.code.contains("function ifBody$1(host, injector, scope)"));
    assert!(result.code.contains("function ifEntry$0(host, scope)"));
    assert!(result.code.contains("function ifEntry$1(host, scope)"));
    // The inner condition mounts against the outer body's injector parameter.
    assert!(result.code.contains("scope.if$0 = mountBlock(host, injector, ifEntry$0);"));
}
