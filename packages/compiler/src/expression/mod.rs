pub mod ast;

pub use ast::{BinaryOp, Expr, IdentifierContext, MemberKey, UnaryOp};
