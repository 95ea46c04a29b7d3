mod common;

use common::*;
use plasma_compiler::expression::{Expr, MemberKey};
use plasma_compiler::template::ast::{AttrValue, Node, PartialDefinition, PartialStatement, VariableStatement};
use plasma_compiler::{compile, CompileOptions};

#[test]
fn dynamic_attribute_and_text() {
    let result = compile_nodes(vec![elem(
        "div",
        vec![attr_expr("class", prop("cls"))],
        vec![expr_text(prop("name"))],
    )]);

    assert_eq!(
        result.code,
        "import { elem, createInjector, setAttribute, text, updateText, finalizeAttributes, addDisposeCallback } from \"@plasma/runtime\";\n\
         \n\
         export default function template$0(host, scope) {\n\
         \x20\x20const target$0 = host.componentView;\n\
         \x20\x20const div$0 = target$0.appendChild(elem('div'));\n\
         \x20\x20const inj$0 = scope.inj$0 = createInjector(div$0);\n\
         \x20\x20setAttribute(inj$0, 'class', host.props.cls);\n\
         \x20\x20scope.text$0 = div$0.appendChild(text(host.props.name));\n\
         \x20\x20finalizeAttributes(inj$0);\n\
         \x20\x20addDisposeCallback(host, template$0Unmount);\n\
         \x20\x20return template$0Update;\n\
         }\n\
         \n\
         function template$0Update(host, scope) {\n\
         \x20\x20const { inj$0 } = scope;\n\
         \x20\x20setAttribute(scope.inj$0, 'class', host.props.cls);\n\
         \x20\x20updateText(scope.text$0, host.props.name);\n\
         \x20\x20finalizeAttributes(inj$0);\n\
         }\n\
         \n\
         function template$0Unmount(scope) {\n\
         \x20\x20scope.inj$0 = null;\n\
         \x20\x20scope.text$0 = null;\n\
         }\n"
    );
}

#[test]
fn state_reads_resolve_against_host_state() {
    let result = compile_nodes(vec![elem(
        "div",
        vec![],
        vec![expr_text(state_field("count"))],
    )]);
    assert!(result.code.contains("text(host.state.count)"));
    assert!(result.code.contains("updateText(scope.text$0, host.state.count);"));
}

#[test]
fn store_reads_subscribe_the_component() {
    let result = compile_nodes(vec![elem(
        "div",
        vec![],
        vec![expr_text(store_field("items")), expr_text(store_field("user"))],
    )]);
    assert!(result.code.contains("text(host.store.data.items)"));
    assert!(result.code.contains("subscribeStore(host, ['items', 'user']);"));
    assert_before(&result.code, "subscribeStore(", "addDisposeCallback(");
    assert!(result.code.contains("subscribeStore"));
}

#[test]
fn member_chains_compile_to_safe_getters() {
    let expr = Expr::Member {
        object: Box::new(prop("user")),
        path: vec![
            MemberKey::Property("address".to_string()),
            MemberKey::Property("city".to_string()),
        ],
        span: dummy_span(),
    };
    let result = compile_nodes(vec![elem("div", vec![], vec![expr_text(expr)])]);
    assert!(result
        .code
        .contains("get(host.props.user, 'address', 'city')"));
    assert!(result.code.contains("import { "));
    assert!(result.code.contains("get"));
}

#[test]
fn global_member_chains_stay_native() {
    let expr = Expr::Member {
        object: Box::new(ident("Math", plasma_compiler::expression::IdentifierContext::Global)),
        path: vec![MemberKey::Property("PI".to_string())],
        span: dummy_span(),
    };
    let result = compile_nodes(vec![elem("div", vec![], vec![expr_text(expr)])]);
    assert!(result.code.contains("text(Math.PI)"));
    assert!(!result.code.contains("get(Math"));
}

#[test]
fn method_calls_compile_to_safe_calls() {
    let expr = Expr::Call {
        callee: Box::new(Expr::Member {
            object: Box::new(prop("user")),
            path: vec![MemberKey::Property("format".to_string())],
            span: dummy_span(),
        }),
        arguments: vec![prop("mode")],
        span: dummy_span(),
    };
    let result = compile_nodes(vec![elem("div", vec![], vec![expr_text(expr)])]);
    assert!(result
        .code
        .contains("call(host.props.user, 'format', [host.props.mode])"));
}

#[test]
fn helpers_are_imported_and_receive_the_host() {
    let mut options = CompileOptions::default();
    options.helpers.insert(
        "./helpers".to_string(),
        vec!["truncate".to_string(), "unusedHelper".to_string()],
    );
    let expr = Expr::Call {
        callee: Box::new(prop("truncate")),
        arguments: vec![prop("name")],
        span: dummy_span(),
    };
    let result = compile(
        &program(vec![elem("div", vec![], vec![expr_text(expr)])]),
        options,
    )
    .unwrap();
    assert!(result.code.contains("truncate(host, host.props.name)"));
    assert!(result
        .code
        .contains("import { truncate } from \"./helpers\";"));
    assert!(!result.code.contains("unusedHelper"));
}

#[test]
fn variables_live_on_the_scope_under_their_own_name() {
    let result = compile_nodes(vec![elem(
        "div",
        vec![],
        vec![
            Node::Variable(VariableStatement {
                name: "fullName".to_string(),
                value: prop("name"),
                span: dummy_span(),
            }),
            expr_text(variable("fullName")),
        ],
    )]);

    // Assigned in mount and re-assigned on every update.
    assert_eq!(result.code.matches("scope.fullName = host.props.name;").count(), 2);
    assert!(result.code.contains("text(scope.fullName)"));
}

#[test]
fn inner_html_uses_a_module_level_getter() {
    let result = compile_nodes(vec![elem(
        "div",
        vec![],
        vec![Node::InnerHtml(plasma_compiler::template::ast::InnerHtml {
            expression: prop("markup"),
            span: dummy_span(),
        })],
    )]);

    assert!(result.code.contains(
        "function html$0(host, scope) {\n  return host.props.markup;\n}"
    ));
    assert!(result
        .code
        .contains("scope.html$1 = mountInnerHTML(host, inj$0, html$0);"));
    assert!(result.code.contains("updateInnerHTML(scope.html$1);"));
    assert!(result
        .code
        .contains("scope.html$1 = unmountInnerHTML(scope.html$1);"));
}

#[test]
fn dynamic_ref_is_kept_current_on_update() {
    let result = compile_nodes(vec![elem(
        "div",
        vec![attr_expr("ref", prop("refName"))],
        vec![],
    )]);

    assert!(result
        .code
        .contains("setRef(host, host.props.refName, div$0);"));
    assert!(result
        .code
        .contains("setRef(host, host.props.refName, scope.div$0);"));
    assert_eq!(result.code.matches("finalizeRefs(host);").count(), 2);
    assert!(result.code.contains("scope.div$0 = null;"));
}

#[test]
fn animate_in_runs_after_mount() {
    let result = compile_nodes(vec![elem_full(
        "div",
        vec![],
        vec![directive(
            "animate",
            "in",
            AttrValue::Literal {
                value: "fade".to_string(),
                span: dummy_span(),
            },
        )],
        vec![],
    )]);
    assert!(result.code.contains("animateIn(div$0, 'fade');"));
}

#[test]
fn animate_out_defers_unmount_into_a_callback() {
    let result = compile_nodes(vec![elem_full(
        "div",
        vec![],
        vec![directive(
            "animate",
            "out",
            AttrValue::Literal {
                value: "slide".to_string(),
                span: dummy_span(),
            },
        )],
        vec![expr_text(prop("name"))],
    )]);

    assert!(result
        .code
        .contains("animateOut(scope.div$0, 'slide', scope, animOut$0);"));
    assert!(result.code.contains(
        "function animOut$0(scope) {\n  scope.text$0 = null;\n  scope.div$0 = null;\n}"
    ));
    // The nulling moved into the callback.
    assert_eq!(result.code.matches("scope.text$0 = null;").count(), 1);
}

#[test]
fn partial_definitions_land_in_the_partials_object() {
    let result = compile_nodes(vec![
        Node::PartialDefinition(PartialDefinition {
            name: "button".to_string(),
            params: vec![(
                "label".to_string(),
                Expr::StringLiteral {
                    value: "OK".to_string(),
                    span: dummy_span(),
                },
            )],
            children: vec![elem("span", vec![], vec![expr_text(variable("label"))])],
            span: dummy_span(),
        }),
        elem(
            "div",
            vec![],
            vec![Node::Partial(PartialStatement {
                name: "button".to_string(),
                params: vec![("label".to_string(), prop("title"))],
                span: dummy_span(),
            })],
        ),
    ]);

    assert!(result.code.contains("const partials = {"));
    assert!(result.code.contains("body: partialButton$0,"));
    assert!(result.code.contains("defaults: { label: 'OK' }"));
    assert!(result
        .code
        .contains("function partialButton$0(host, injector, scope) {"));
    assert!(result.code.contains("text(scope.label)"));

    // An overridden partial can replace content anywhere in the subtree,
    // so the partial-bearing div itself attaches through the root injector
    // and the partial mounts through the div's own.
    assert!(result.code.contains("const inj$0 = createInjector(target$0);"));
    assert!(result.code.contains("insert(inj$0, elem('div'))"));
    assert!(result.code.contains("const inj$1 = createInjector(div$0);"));
    assert!(result.code.contains(
        "scope.partial$0 = mountPartial(host, inj$1, host.props['partial:button'] || partials.button, { label: host.props.title });"
    ));
    assert!(result.code.contains(
        "updatePartial(scope.partial$0, host.props['partial:button'] || partials.button, { label: host.props.title });"
    ));
    assert!(result
        .code
        .contains("scope.partial$0 = unmountPartial(scope.partial$0);"));
}
