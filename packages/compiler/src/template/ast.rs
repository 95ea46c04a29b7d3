//! Template AST handed to the code generator by the template parser.
//!
//! A closed union over node kinds: adding or removing a kind is a
//! compile-time-checked change for every visitor in the crate.

use crate::expression::Expr;
use crate::parse_util::ParseSourceSpan;
use serde::{Deserialize, Serialize};

/// A parsed template file: component imports followed by the template body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub imports: Vec<ComponentImport>,
    pub template: Template,
    pub span: ParseSourceSpan,
}

/// `<link rel="import" href="./sub.html" as="sub-component" />`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentImport {
    /// Tag name the component is registered under.
    pub name: String,
    /// Module the component definition is imported from.
    pub href: String,
    pub span: ParseSourceSpan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub children: Vec<Node>,
    pub span: ParseSourceSpan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    Element(Element),
    /// `<attribute name="value" />` statement: applies an attribute to the
    /// nearest enclosing element, usually under a conditional branch.
    Attribute(Attribute),
    Text(Text),
    /// `{expr}` in text position.
    ExpressionText(ExpressionText),
    If(IfStatement),
    Choose(ChooseStatement),
    ForEach(ForEachStatement),
    Variable(VariableStatement),
    InnerHtml(InnerHtml),
    PartialDefinition(PartialDefinition),
    Partial(PartialStatement),
}

impl Node {
    pub fn span(&self) -> &ParseSourceSpan {
        match self {
            Node::Element(n) => &n.span,
            Node::Attribute(n) => &n.span,
            Node::Text(n) => &n.span,
            Node::ExpressionText(n) => &n.span,
            Node::If(n) => &n.span,
            Node::Choose(n) => &n.span,
            Node::ForEach(n) => &n.span,
            Node::Variable(n) => &n.span,
            Node::InnerHtml(n) => &n.span,
            Node::PartialDefinition(n) => &n.span,
            Node::Partial(n) => &n.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Tag name, including an optional `prefix:` XML namespace part.
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub directives: Vec<Directive>,
    pub children: Vec<Node>,
    pub span: ParseSourceSpan,
}

impl Element {
    /// Split the tag name into a namespace prefix and a local name.
    pub fn split_name(&self) -> (Option<&str>, &str) {
        match self.name.split_once(':') {
            Some((prefix, local)) if !prefix.is_empty() => (Some(prefix), local),
            _ => (None, self.name.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: AttrValue,
    pub span: ParseSourceSpan,
}

impl Attribute {
    pub fn split_name(&self) -> (Option<&str>, &str) {
        match self.name.split_once(':') {
            Some((prefix, local)) if !prefix.is_empty() => (Some(prefix), local),
            _ => (None, self.name.as_str()),
        }
    }
}

/// `on:click={...}`, `ref:name`, `animate:in="..."` and friends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Directive {
    pub prefix: String,
    pub name: String,
    /// Trailing `:`-separated modifiers, e.g. `on:click:stop:prevent`.
    pub modifiers: Vec<String>,
    pub value: AttrValue,
    pub span: ParseSourceSpan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttrValue {
    /// Attribute without a value: `<input disabled>`.
    Empty,
    Literal {
        value: String,
        span: ParseSourceSpan,
    },
    Expression(Expr),
}

impl AttrValue {
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            AttrValue::Literal { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, AttrValue::Expression(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub value: String,
    pub span: ParseSourceSpan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionText {
    pub expression: Expr,
    pub span: ParseSourceSpan,
}

/// `<if test={...}>…</if>` with optional `<else-if>`/`<else>` branches,
/// normalized by the parser into a branch list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfStatement {
    pub branches: Vec<ConditionBranch>,
    pub span: ParseSourceSpan,
}

/// `<choose>` with `<when test={...}>` cases and an optional `<otherwise>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChooseStatement {
    pub branches: Vec<ConditionBranch>,
    pub span: ParseSourceSpan,
}

/// One conditional branch; `test` is `None` for the default branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionBranch {
    pub test: Option<Expr>,
    pub children: Vec<Node>,
    pub span: ParseSourceSpan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForEachStatement {
    pub select: Expr,
    /// Presence of a key switches to keyed iteration at compile time.
    pub key: Option<Expr>,
    pub children: Vec<Node>,
    pub span: ParseSourceSpan,
}

/// `<var name={expr} />` — assigns a template variable readable as `@name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableStatement {
    pub name: String,
    pub value: Expr,
    pub span: ParseSourceSpan,
}

/// `<div innerHTML={expr} />`-style raw HTML injection point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InnerHtml {
    pub expression: Expr,
    pub span: ParseSourceSpan,
}

/// `<partial:name param={...}>…</partial:name>` — a named, overridable
/// content template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialDefinition {
    pub name: String,
    /// Parameter defaults.
    pub params: Vec<(String, Expr)>,
    pub children: Vec<Node>,
    pub span: ParseSourceSpan,
}

/// `<insert:name param={...} />` — renders a partial, preferring a
/// caller-provided override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialStatement {
    pub name: String,
    pub params: Vec<(String, Expr)>,
    pub span: ParseSourceSpan,
}
