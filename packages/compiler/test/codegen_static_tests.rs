mod common;

use common::*;
use plasma_compiler::{compile, CompileOptions};

#[test]
fn static_element_with_text_and_attribute() {
    let result = compile_nodes(vec![elem(
        "div",
        vec![attr("class", "hello")],
        vec![text("world")],
    )]);

    assert_eq!(
        result.code,
        "import { elemWithText } from \"@plasma/runtime\";\n\
         \n\
         export default function template$0(host, scope) {\n\
         \x20\x20const target$0 = host.componentView;\n\
         \x20\x20const div$0 = target$0.appendChild(elemWithText('div', 'world'));\n\
         \x20\x20div$0.setAttribute('class', 'hello');\n\
         }\n"
    );
    assert!(result.warnings.is_empty());
}

#[test]
fn static_templates_have_no_update_or_unmount() {
    let result = compile_nodes(vec![elem(
        "div",
        vec![],
        vec![text("a"), elem("span", vec![], vec![text("b")])],
    )]);

    assert!(!result.code.contains("template$0Update"));
    assert!(!result.code.contains("template$0Unmount"));
    assert!(!result.code.contains("scope."));
}

#[test]
fn mixed_children_use_plain_factories() {
    let result = compile_nodes(vec![elem(
        "div",
        vec![],
        vec![text("a"), elem("span", vec![], vec![text("b")])],
    )]);

    assert!(result
        .code
        .contains("import { elem, text, elemWithText } from \"@plasma/runtime\";"));
    assert!(result
        .code
        .contains("const div$0 = target$0.appendChild(elem('div'));"));
    assert!(result.code.contains("div$0.appendChild(text('a'));"));
    assert!(result
        .code
        .contains("div$0.appendChild(elemWithText('span', 'b'));"));
}

#[test]
fn empty_template_still_exports_a_mount_function() {
    let result = compile_nodes(vec![]);
    assert!(result
        .code
        .contains("export default function template$0(host, scope) {"));
    assert!(!result.code.contains("componentView"));
}

#[test]
fn css_scope_is_passed_to_element_factories() {
    let mut options = CompileOptions::default();
    options.css_scope = Some("e3f9a1".to_string());
    let result = compile(
        &program(vec![elem("div", vec![], vec![text("world")])]),
        options,
    )
    .unwrap();
    assert!(result.code.contains("elemWithText('div', 'world', 'e3f9a1')"));
}

#[test]
fn component_name_disambiguates_the_export() {
    let mut options = CompileOptions::default();
    options.component = Some("my-view".to_string());
    let result = compile(&program(vec![elem("div", vec![], vec![])]), options).unwrap();
    assert!(result
        .code
        .contains("export default function templateMyView$0(host, scope) {"));
}

#[test]
fn indent_option_controls_generated_indentation() {
    let mut options = CompileOptions::default();
    options.indent = "\t".to_string();
    let result = compile(&program(vec![elem("div", vec![], vec![])]), options).unwrap();
    assert!(result.code.contains("\n\tconst target$0 = host.componentView;"));
}

#[test]
fn compilation_produces_a_source_map() {
    let result = compile_nodes(vec![elem("div", vec![], vec![text("world")])]);
    let map = result.map.unwrap();
    assert_eq!(map.version, 3);
    assert!(map.sources.iter().any(|s| s == "template.html"));
    assert!(!map.mappings.is_empty());
}

#[test]
fn unknown_directive_warns_but_compiles() {
    use plasma_compiler::template::ast::AttrValue;
    let result = compile_nodes(vec![elem_full(
        "div",
        vec![],
        vec![directive(
            "bogus",
            "thing",
            AttrValue::Literal {
                value: "x".to_string(),
                span: dummy_span(),
            },
        )],
        vec![],
    )]);
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].message.contains("Unknown directive bogus:thing"));
    assert!(result.code.contains("export default function template$0"));
}

#[test]
fn namespaced_elements_use_a_module_level_constant() {
    let result = compile_nodes(vec![elem(
        "svg:svg",
        vec![attr("xmlns:svg", "http://www.w3.org/2000/svg")],
        vec![elem("svg:path", vec![attr("svg:d", "M0 0")], vec![])],
    )]);

    assert!(result
        .code
        .contains("const ns_svg$0 = 'http://www.w3.org/2000/svg';"));
    assert!(result.code.contains("elemNS('svg', ns_svg$0)"));
    assert!(result.code.contains("elemNS('path', ns_svg$0)"));
    assert!(result
        .code
        .contains(".setAttributeNS(ns_svg$0, 'd', 'M0 0');"));
    // The xmlns declaration itself is not emitted as an attribute.
    assert!(!result.code.contains("xmlns"));
}

#[test]
fn static_ref_registers_on_mount() {
    let result = compile_nodes(vec![elem("div", vec![attr("ref", "main")], vec![])]);
    assert!(result.code.contains("setRef(host, 'main', div$0);"));
    assert!(result.code.contains("finalizeRefs(host);"));
    assert!(!result.code.contains("template$0Update"));
}
