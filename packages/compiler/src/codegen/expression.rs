//! Compiles template expressions into JS accessor code.
//!
//! Member chains are rewritten into null-safe `get(root, 'a', 'b')` runtime
//! calls and method calls on props/state/store members into
//! `call(object, 'name', [args])`, so the runtime can defend against
//! undefined intermediate values without verbose generated chains. Every
//! compiled accessor records the runtime symbols, helpers and store keys it
//! relies on.

use crate::codegen::state::CompileState;
use crate::codegen::symbols::Runtime;
use crate::error::{CompileError, Result};
use crate::expression::{Expr, IdentifierContext, MemberKey};
use crate::output::Chunk;
use crate::util::{property_access, quote_string};

/// Extra name bindings available while compiling: event-handler parameters
/// and arrow-function arguments, each mapped to the identifier they render
/// as.
#[derive(Debug, Clone, Default)]
pub struct ExprEnv {
    pub locals: Vec<(String, String)>,
}

impl ExprEnv {
    pub fn with_locals(locals: &[(&str, &str)]) -> Self {
        ExprEnv {
            locals: locals
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    fn lookup(&self, name: &str) -> Option<&str> {
        self.locals
            .iter()
            .rev()
            .find(|(local, _)| local == name)
            .map(|(_, rendered)| rendered.as_str())
    }
}

pub fn compile_expr(state: &mut CompileState, expr: &Expr) -> Result<Chunk> {
    compile_expr_in(state, expr, &ExprEnv::default())
}

pub fn compile_expr_in(state: &mut CompileState, expr: &Expr, env: &ExprEnv) -> Result<Chunk> {
    match expr {
        Expr::Identifier {
            name,
            context,
            span,
        } => {
            let rendered = match context {
                IdentifierContext::Property => {
                    property_access(&format!("{}.props", state.host()), name)
                }
                IdentifierContext::State => {
                    property_access(&format!("{}.state", state.host()), name)
                }
                IdentifierContext::Store => {
                    state.store(name);
                    property_access(&format!("{}.store.data", state.host()), name)
                }
                IdentifierContext::Variable => property_access(state.scope(), name),
                IdentifierContext::Global => env
                    .lookup(name)
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| name.clone()),
            };
            Ok(Chunk::spanned(rendered, span))
        }
        Expr::StringLiteral { value, span } => Ok(Chunk::spanned(quote_string(value), span)),
        Expr::NumberLiteral { value, span } => Ok(Chunk::spanned(format_number(*value), span)),
        Expr::BooleanLiteral { value, span } => Ok(Chunk::spanned(value.to_string(), span)),
        Expr::NullLiteral { span } => Ok(Chunk::spanned("null", span)),
        Expr::Member { object, path, span } => compile_member(state, object, path, span, env),
        Expr::Call {
            callee,
            arguments,
            span,
        } => compile_call(state, callee, arguments, span, env),
        Expr::Unary { op, argument, .. } => {
            let mut chunk = Chunk::text(op.as_str());
            chunk.append(operand(state, argument, env)?);
            Ok(chunk)
        }
        Expr::Binary { op, left, right, .. } => {
            let mut chunk = operand(state, left, env)?;
            chunk.push_text(format!(" {} ", op.as_str()));
            chunk.append(operand(state, right, env)?);
            Ok(chunk)
        }
        Expr::Conditional {
            test,
            consequent,
            alternate,
            ..
        } => {
            let mut chunk = operand(state, test, env)?;
            chunk.push_text(" ? ");
            chunk.append(operand(state, consequent, env)?);
            chunk.push_text(" : ");
            chunk.append(operand(state, alternate, env)?);
            Ok(chunk)
        }
        Expr::ArrayLiteral { elements, .. } => {
            let mut chunk = Chunk::text("[");
            for (i, element) in elements.iter().enumerate() {
                if i > 0 {
                    chunk.push_text(", ");
                }
                chunk.append(compile_expr_in(state, element, env)?);
            }
            chunk.push_text("]");
            Ok(chunk)
        }
        Expr::ObjectLiteral { properties, .. } => {
            compile_object(state, properties, env)
        }
        Expr::Arrow { span, .. } => Err(CompileError::at(
            "Arrow functions are only allowed in event handlers",
            span,
        )),
    }
}

/// Render `{ key: value, … }` from named expression pairs.
pub fn compile_object(
    state: &mut CompileState,
    properties: &[(String, Expr)],
    env: &ExprEnv,
) -> Result<Chunk> {
    if properties.is_empty() {
        return Ok(Chunk::text("{}"));
    }
    let mut chunk = Chunk::text("{ ");
    for (i, (key, value)) in properties.iter().enumerate() {
        if i > 0 {
            chunk.push_text(", ");
        }
        chunk.push_text(crate::util::quote_object_key(key));
        chunk.push_text(": ");
        chunk.append(compile_expr_in(state, value, env)?);
    }
    chunk.push_text(" }");
    Ok(chunk)
}

/// Wrap nested binaries/conditionals in parens when used as an operand.
fn operand(state: &mut CompileState, expr: &Expr, env: &ExprEnv) -> Result<Chunk> {
    let needs_parens = matches!(expr, Expr::Binary { .. } | Expr::Conditional { .. });
    let inner = compile_expr_in(state, expr, env)?;
    if needs_parens {
        let mut chunk = Chunk::text("(");
        chunk.append(inner);
        chunk.push_text(")");
        Ok(chunk)
    } else {
        Ok(inner)
    }
}

fn is_global(expr: &Expr, env: &ExprEnv) -> bool {
    matches!(
        expr,
        Expr::Identifier {
            context: IdentifierContext::Global,
            name,
            ..
        } if env.lookup(name).is_none()
    )
}

fn compile_member(
    state: &mut CompileState,
    object: &Expr,
    path: &[MemberKey],
    span: &crate::parse_util::ParseSourceSpan,
    env: &ExprEnv,
) -> Result<Chunk> {
    if path.is_empty() {
        return compile_expr_in(state, object, env);
    }

    // Globals keep native chaining; there is nothing to defend against.
    if is_global(object, env) {
        let mut chunk = compile_expr_in(state, object, env)?;
        for key in path {
            match key {
                MemberKey::Property(name) => {
                    chunk.push_text(format!(".{}", name));
                }
                MemberKey::Computed(expr) => {
                    chunk.push_text("[");
                    chunk.append(compile_expr_in(state, expr, env)?);
                    chunk.push_text("]");
                }
            }
        }
        return Ok(chunk);
    }

    let mut chunk = Chunk::spanned(format!("{}(", state.runtime(Runtime::GET)), span);
    chunk.append(compile_expr_in(state, object, env)?);
    for key in path {
        chunk.push_text(", ");
        match key {
            MemberKey::Property(name) => {
                chunk.push_text(quote_string(name));
            }
            MemberKey::Computed(expr) => {
                chunk.append(compile_expr_in(state, expr, env)?);
            }
        }
    }
    chunk.push_text(")");
    Ok(chunk)
}

fn compile_call(
    state: &mut CompileState,
    callee: &Expr,
    arguments: &[Expr],
    span: &crate::parse_util::ParseSourceSpan,
    env: &ExprEnv,
) -> Result<Chunk> {
    let mut args = Vec::with_capacity(arguments.len());
    for argument in arguments {
        args.push(compile_expr_in(state, argument, env)?);
    }

    match callee {
        // Helper functions take the host as their first argument.
        Expr::Identifier { name, context, .. }
            if *context == IdentifierContext::Property && state.helper(name) =>
        {
            let mut chunk = Chunk::spanned(format!("{}({}", name, state.host()), span);
            for arg in args {
                chunk.push_text(", ");
                chunk.append(arg);
            }
            chunk.push_text(")");
            Ok(chunk)
        }
        Expr::Identifier {
            name,
            context,
            span: ident_span,
        } => {
            let object = match context {
                IdentifierContext::Property => format!("{}.props", state.host()),
                IdentifierContext::State => format!("{}.state", state.host()),
                IdentifierContext::Store => {
                    state.store(name);
                    format!("{}.store.data", state.host())
                }
                IdentifierContext::Variable => state.scope().to_string(),
                IdentifierContext::Global => {
                    // Native call: a known global or a handler parameter.
                    let mut chunk = compile_expr_in(state, callee, env)?;
                    chunk.push_text("(");
                    append_args(&mut chunk, args);
                    chunk.push_text(")");
                    return Ok(chunk);
                }
            };
            Ok(safe_call(state, Chunk::text(object), name, args, ident_span))
        }
        Expr::Member { object, path, .. } => {
            if is_global(object, env) {
                let mut chunk = compile_member(state, object, path, span, env)?;
                chunk.push_text("(");
                append_args(&mut chunk, args);
                chunk.push_text(")");
                return Ok(chunk);
            }
            let (last, rest) = path.split_last().expect("member path is never empty");
            let name = match last {
                MemberKey::Property(name) => name,
                MemberKey::Computed(_) => {
                    return Err(CompileError::at(
                        "Unable to compile call with a computed callee",
                        span,
                    ))
                }
            };
            let target = compile_member(state, object, rest, span, env)?;
            Ok(safe_call(state, target, name, args, span))
        }
        other => Err(CompileError::at(
            "Unable to compile expression as a callable",
            other.span(),
        )),
    }
}

fn append_args(chunk: &mut Chunk, args: Vec<Chunk>) {
    for (i, arg) in args.into_iter().enumerate() {
        if i > 0 {
            chunk.push_text(", ");
        }
        chunk.append(arg);
    }
}

/// `call(object, 'name'[, [args]])` — the runtime looks the method up and
/// bails out on undefined intermediates.
fn safe_call(
    state: &mut CompileState,
    object: Chunk,
    name: &str,
    args: Vec<Chunk>,
    span: &crate::parse_util::ParseSourceSpan,
) -> Chunk {
    let mut chunk = Chunk::spanned(format!("{}(", state.runtime(Runtime::CALL)), span);
    chunk.append(object);
    chunk.push_text(format!(", {}", quote_string(name)));
    if !args.is_empty() {
        chunk.push_text(", [");
        append_args(&mut chunk, args);
        chunk.push_text("]");
    }
    chunk.push_text(")");
    chunk
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
