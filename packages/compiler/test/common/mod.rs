//! Shared AST builders for the codegen test suites.

#![allow(dead_code)]

use plasma_compiler::expression::{Expr, IdentifierContext};
use plasma_compiler::parse_util::{ParseLocation, ParseSourceFile, ParseSourceSpan};
use plasma_compiler::template::ast::{
    AttrValue, Attribute, Directive, Element, ExpressionText, Node, Program, Template, Text,
};
use plasma_compiler::{compile, CompileOptions, CompileResult};

pub fn source(content: &str) -> ParseSourceFile {
    ParseSourceFile::new(content.to_string(), "template.html".to_string())
}

pub fn loc(file: &ParseSourceFile, offset: usize) -> ParseLocation {
    let mut line = 0;
    let mut col = 0;
    for (i, ch) in file.content.char_indices() {
        if i >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 0;
        } else {
            col += 1;
        }
    }
    ParseLocation::new(file.clone(), offset, line, col)
}

pub fn span(file: &ParseSourceFile, start: usize, end: usize) -> ParseSourceSpan {
    ParseSourceSpan::new(loc(file, start), loc(file, end))
}

pub fn dummy_span() -> ParseSourceSpan {
    let file = source("");
    span(&file, 0, 0)
}

pub fn ident(name: &str, context: IdentifierContext) -> Expr {
    Expr::Identifier {
        name: name.to_string(),
        context,
        span: dummy_span(),
    }
}

pub fn prop(name: &str) -> Expr {
    ident(name, IdentifierContext::Property)
}

pub fn state_field(name: &str) -> Expr {
    ident(name, IdentifierContext::State)
}

pub fn store_field(name: &str) -> Expr {
    ident(name, IdentifierContext::Store)
}

pub fn variable(name: &str) -> Expr {
    ident(name, IdentifierContext::Variable)
}

pub fn text(value: &str) -> Node {
    Node::Text(Text {
        value: value.to_string(),
        span: dummy_span(),
    })
}

pub fn expr_text(expression: Expr) -> Node {
    Node::ExpressionText(ExpressionText {
        expression,
        span: dummy_span(),
    })
}

pub fn attr(name: &str, value: &str) -> Attribute {
    Attribute {
        name: name.to_string(),
        value: AttrValue::Literal {
            value: value.to_string(),
            span: dummy_span(),
        },
        span: dummy_span(),
    }
}

pub fn attr_expr(name: &str, expr: Expr) -> Attribute {
    Attribute {
        name: name.to_string(),
        value: AttrValue::Expression(expr),
        span: dummy_span(),
    }
}

pub fn directive(prefix: &str, name: &str, value: AttrValue) -> Directive {
    Directive {
        prefix: prefix.to_string(),
        name: name.to_string(),
        modifiers: Vec::new(),
        value,
        span: dummy_span(),
    }
}

pub fn elem(name: &str, attributes: Vec<Attribute>, children: Vec<Node>) -> Node {
    elem_full(name, attributes, Vec::new(), children)
}

pub fn elem_full(
    name: &str,
    attributes: Vec<Attribute>,
    directives: Vec<Directive>,
    children: Vec<Node>,
) -> Node {
    Node::Element(Element {
        name: name.to_string(),
        attributes,
        directives,
        children,
        span: dummy_span(),
    })
}

pub fn program(children: Vec<Node>) -> Program {
    Program {
        imports: Vec::new(),
        template: Template {
            children,
            span: dummy_span(),
        },
        span: dummy_span(),
    }
}

pub fn compile_nodes(children: Vec<Node>) -> CompileResult {
    compile(&program(children), CompileOptions::default()).expect("compilation failed")
}

/// Assert that `earlier` appears before `later` in the generated code.
pub fn assert_before(code: &str, earlier: &str, later: &str) {
    let a = code
        .find(earlier)
        .unwrap_or_else(|| panic!("missing {:?} in:\n{}", earlier, code));
    let b = code
        .find(later)
        .unwrap_or_else(|| panic!("missing {:?} in:\n{}", later, code));
    assert!(a < b, "{:?} should precede {:?} in:\n{}", earlier, later, code);
}
