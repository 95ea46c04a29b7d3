//! Event handler entities.
//!
//! Every handler value is normalized into a named top-level function with
//! the `(host, event, target)` signature: a bare function reference is
//! called with those three, a call expression keeps its own arguments and
//! gets them appended, an arrow maps its parameters onto `event` and
//! `target`, and a helper call keeps the usual host-prepended convention.
//!
//! Registration is static (`addStaticEvent`/`removeStaticEvent`) unless
//! the handler closes over template variables that may be reassigned
//! between updates; those re-register through the injector on every pass
//! and are committed by `finalizeEvents`.

use crate::codegen::entities::element;
use crate::codegen::entity::{ElementFlags, EntityId, EntityKind};
use crate::codegen::expression::{compile_expr_in, ExprEnv};
use crate::codegen::state::CompileState;
use crate::codegen::symbols::Runtime;
use crate::error::{CompileError, Result};
use crate::expression::{Expr, IdentifierContext, MemberKey};
use crate::output::Chunk;
use crate::template::ast::{AttrValue, Directive};
use crate::util::{dash_case_to_camel_case, quote_string};

pub fn compile_event(state: &mut CompileState, elem: EntityId, dir: &Directive) -> Result<()> {
    let expr = match &dir.value {
        AttrValue::Expression(expr) => expr,
        _ => return Err(CompileError::at("Event handler must be expression", &dir.span)),
    };

    let handler = state.symbol(&handler_base(&dir.name));
    let statement = handler_statement(state, expr)?;
    // A handler that reads template variables resolves them through the
    // scope object, which the runtime passes as a fourth argument.
    let scope_param = if uses_variables(expr) {
        format!(", {}", state.scope())
    } else {
        String::new()
    };
    let mut fn_chunk = Chunk::text(format!(
        "function {}({}, event, target{}) {{",
        handler,
        state.host(),
        scope_param
    ));
    fn_chunk.indent();
    for modifier in &dir.modifiers {
        match modifier.as_str() {
            "stop" => {
                fn_chunk.newline();
                fn_chunk.push_text("event.stopPropagation();");
            }
            "prevent" => {
                fn_chunk.newline();
                fn_chunk.push_text("event.preventDefault();");
            }
            other => {
                return Err(CompileError::at(
                    format!("Unknown event modifier :{}", other),
                    &dir.span,
                ))
            }
        }
    }
    fn_chunk.newline();
    fn_chunk.append(statement);
    fn_chunk.push_text(";");
    fn_chunk.dedent();
    fn_chunk.newline();
    fn_chunk.push_text("}");
    state.output.push(fn_chunk);

    let data = state.entity(elem);
    let routed = data.kind == EntityKind::BlockRoot
        || data.flags.events_via_injector()
        || uses_variables(expr);

    let event = quote_string(&dir.name);
    if routed {
        if state.entity(elem).kind != EntityKind::BlockRoot {
            state.entity_mut(elem).flags |= ElementFlags::DYNAMIC_EVENTS;
        }
        let inj = element::injector(state, elem)?;
        let id = state.add_entity(EntityKind::Event, &handler_base(&dir.name), Some(&dir.span));
        state.set_shared(id, move |s| {
            let mut chunk = Chunk::text(format!("{}(", s.runtime(Runtime::ADD_EVENT)));
            chunk.append(s.read_chunk(inj));
            chunk.push_text(format!(
                ", {}, {}, {}, {}",
                event,
                handler,
                s.host(),
                s.scope()
            ));
            chunk.push_text(")");
            Ok(chunk)
        })?;
        state.append_entity(id);
        return Ok(());
    }

    let id = state.add_entity(EntityKind::Event, &handler_base(&dir.name), Some(&dir.span));
    let mount_event = event.clone();
    let mount_handler = handler.clone();
    state.set_mount(id, move |s| {
        let mut chunk = Chunk::text(format!("{}(", s.runtime(Runtime::ADD_STATIC_EVENT)));
        chunk.append(s.read_chunk(elem));
        chunk.push_text(format!(
            ", {}, {}, {}, {})",
            mount_event,
            mount_handler,
            s.host(),
            s.scope()
        ));
        Ok(chunk)
    })?;
    state.set_unmount(id, move |s| {
        let mut chunk = Chunk::text(format!("{}(", s.runtime(Runtime::REMOVE_STATIC_EVENT)));
        chunk.append(s.read_chunk(elem));
        chunk.push_text(format!(", {}, {})", event, handler));
        Ok(chunk)
    })?;
    state.append_entity(id);
    Ok(())
}

fn handler_base(event: &str) -> String {
    format!("on{}", crate::util::capitalize(&dash_case_to_camel_case(event)))
}

/// The single statement inside the handler function body.
fn handler_statement(state: &mut CompileState, expr: &Expr) -> Result<Chunk> {
    let env = ExprEnv::with_locals(&[("event", "event"), ("target", "target")]);
    match expr {
        Expr::Arrow { params, body, .. } => {
            let mut locals = Vec::new();
            for (param, rendered) in params.iter().zip(["event", "target"]) {
                locals.push((param.clone(), rendered.to_string()));
            }
            let env = ExprEnv { locals };
            compile_expr_in(state, body, &env)
        }
        Expr::Call {
            callee,
            arguments,
            span,
        } => {
            // Helper calls keep the host-prepended convention and are
            // compiled as ordinary expressions.
            if let Expr::Identifier { name, context, .. } = callee.as_ref() {
                if *context == IdentifierContext::Property && state.options.helper_module(name).is_some() {
                    return compile_expr_in(state, expr, &env);
                }
            }
            let callee = callable(state, callee, &env, span)?;
            let mut chunk = callee;
            chunk.push_text("(");
            for argument in arguments {
                chunk.append(compile_expr_in(state, argument, &env)?);
                chunk.push_text(", ");
            }
            chunk.push_text(format!("{}, event, target)", state.host()));
            Ok(chunk)
        }
        Expr::Identifier { span, .. } | Expr::Member { span, .. } => {
            let mut chunk = callable(state, expr, &env, span)?;
            chunk.push_text(format!("({}, event, target)", state.host()));
            Ok(chunk)
        }
        other => Err(CompileError::at(
            "Unable to compile event handler",
            other.span(),
        )),
    }
}

/// Compile an expression used as a function value. A plain member chain
/// keeps native access so the call binds `this` to the owning object.
fn callable(
    state: &mut CompileState,
    expr: &Expr,
    env: &ExprEnv,
    span: &crate::parse_util::ParseSourceSpan,
) -> Result<Chunk> {
    match expr {
        Expr::Identifier { .. } => compile_expr_in(state, expr, env),
        Expr::Member { object, path, .. } => {
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
            Ok(chunk)
        }
        _ => Err(CompileError::at("Unable to compile event handler", span)),
    }
}

/// Whether the handler reads template variables; those can be reassigned
/// between renders, so the handler must be re-registered on every pass.
fn uses_variables(expr: &Expr) -> bool {
    match expr {
        Expr::Identifier { context, .. } => *context == IdentifierContext::Variable,
        Expr::StringLiteral { .. }
        | Expr::NumberLiteral { .. }
        | Expr::BooleanLiteral { .. }
        | Expr::NullLiteral { .. } => false,
        Expr::Member { object, path, .. } => {
            uses_variables(object)
                || path.iter().any(|key| match key {
                    MemberKey::Property(_) => false,
                    MemberKey::Computed(expr) => uses_variables(expr),
                })
        }
        Expr::Call {
            callee, arguments, ..
        } => uses_variables(callee) || arguments.iter().any(uses_variables),
        Expr::Unary { argument, .. } => uses_variables(argument),
        Expr::Binary { left, right, .. } => uses_variables(left) || uses_variables(right),
        Expr::Conditional {
            test,
            consequent,
            alternate,
            ..
        } => uses_variables(test) || uses_variables(consequent) || uses_variables(alternate),
        Expr::ArrayLiteral { elements, .. } => elements.iter().any(uses_variables),
        Expr::ObjectLiteral { properties, .. } => {
            properties.iter().any(|(_, value)| uses_variables(value))
        }
        Expr::Arrow { body, .. } => uses_variables(body),
    }
}
