//! Text node entities: static text and `{expr}` interpolations.

use crate::codegen::entities::element;
use crate::codegen::entity::EntityKind;
use crate::codegen::expression::compile_expr;
use crate::codegen::state::CompileState;
use crate::codegen::symbols::Runtime;
use crate::error::Result;
use crate::output::Chunk;
use crate::template::ast::{ExpressionText, Text};
use crate::util::quote_string;

pub fn compile_text(state: &mut CompileState, text: &Text) -> Result<()> {
    let id = state.add_entity(EntityKind::Text, "text", Some(&text.span));
    let via = element::attach_point(state, id, None)?;
    state.append_entity(id);
    let mut factory = Chunk::spanned(format!("{}(", state.runtime(Runtime::TEXT)), &text.span);
    factory.push_text(quote_string(&text.value));
    factory.push_text(")");
    element::mount_attached(state, id, via, factory)
}

pub fn compile_expression_text(state: &mut CompileState, text: &ExpressionText) -> Result<()> {
    let id = state.add_entity(EntityKind::Text, "text", Some(&text.span));
    let via = element::attach_point(state, id, None)?;
    state.append_entity(id);

    let value = compile_expr(state, &text.expression)?;
    let mut factory = Chunk::spanned(format!("{}(", state.runtime(Runtime::TEXT)), &text.span);
    factory.append(value.clone());
    factory.push_text(")");
    element::mount_attached(state, id, via, factory)?;

    state.set_update(id, move |s| {
        let mut chunk = Chunk::text(format!("{}(", s.runtime(Runtime::UPDATE_TEXT)));
        chunk.append(s.read_chunk(id));
        chunk.push_text(", ");
        chunk.append(value);
        chunk.push_text(")");
        Ok(chunk)
    })?;
    state.entity_mut(id).update_dirty = true;
    Ok(())
}
