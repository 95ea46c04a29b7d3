//! Template expression AST.
//!
//! Produced by the embedded expression parser; every variant carries the
//! span of the expression text inside the template. The accessor root of an
//! identifier is decided by its sigil at parse time: bare names read
//! component props, `#name` reads state, `$name` reads the store and
//! `@name` reads a local template variable.

use crate::parse_util::ParseSourceSpan;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdentifierContext {
    /// Bare name, resolves to `host.props`.
    Property,
    /// `#name`, resolves to `host.state`.
    State,
    /// `$name`, resolves to store data.
    Store,
    /// `@name`, resolves to a local scope variable.
    Variable,
    /// Well-known global (`Math`, `JSON`, …) or an event-handler parameter.
    Global,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Identifier {
        name: String,
        context: IdentifierContext,
        span: ParseSourceSpan,
    },
    StringLiteral {
        value: String,
        span: ParseSourceSpan,
    },
    NumberLiteral {
        value: f64,
        span: ParseSourceSpan,
    },
    BooleanLiteral {
        value: bool,
        span: ParseSourceSpan,
    },
    NullLiteral {
        span: ParseSourceSpan,
    },
    /// A property access chain: `object` followed by one or more keys.
    Member {
        object: Box<Expr>,
        path: Vec<MemberKey>,
        span: ParseSourceSpan,
    },
    Call {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
        span: ParseSourceSpan,
    },
    Unary {
        op: UnaryOp,
        argument: Box<Expr>,
        span: ParseSourceSpan,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
        span: ParseSourceSpan,
    },
    Conditional {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
        span: ParseSourceSpan,
    },
    ArrayLiteral {
        elements: Vec<Expr>,
        span: ParseSourceSpan,
    },
    ObjectLiteral {
        properties: Vec<(String, Expr)>,
        span: ParseSourceSpan,
    },
    /// Only valid as an event handler value.
    Arrow {
        params: Vec<String>,
        body: Box<Expr>,
        span: ParseSourceSpan,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MemberKey {
    /// `.name`
    Property(String),
    /// `[expr]`
    Computed(Box<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Not,
    Negate,
}

impl UnaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Negate => "-",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Equals,
    NotEquals,
    Lower,
    LowerEquals,
    Bigger,
    BiggerEquals,
    And,
    Or,
}

impl BinaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "%",
            BinaryOp::Equals => "===",
            BinaryOp::NotEquals => "!==",
            BinaryOp::Lower => "<",
            BinaryOp::LowerEquals => "<=",
            BinaryOp::Bigger => ">",
            BinaryOp::BiggerEquals => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

impl Expr {
    pub fn span(&self) -> &ParseSourceSpan {
        match self {
            Expr::Identifier { span, .. }
            | Expr::StringLiteral { span, .. }
            | Expr::NumberLiteral { span, .. }
            | Expr::BooleanLiteral { span, .. }
            | Expr::NullLiteral { span }
            | Expr::Member { span, .. }
            | Expr::Call { span, .. }
            | Expr::Unary { span, .. }
            | Expr::Binary { span, .. }
            | Expr::Conditional { span, .. }
            | Expr::ArrayLiteral { span, .. }
            | Expr::ObjectLiteral { span, .. }
            | Expr::Arrow { span, .. } => span,
        }
    }
}
