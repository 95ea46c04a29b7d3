//! Raw HTML injection entities.
//!
//! The source expression becomes a module-level getter; the runtime parses
//! and swaps the markup whenever the getter's value changes.

use crate::codegen::entities::{self, element};
use crate::codegen::entity::EntityKind;
use crate::codegen::expression::compile_expr;
use crate::codegen::state::CompileState;
use crate::codegen::symbols::Runtime;
use crate::error::Result;
use crate::output::Chunk;
use crate::template::ast::InnerHtml;

pub fn compile_inner_html(state: &mut CompileState, node: &InnerHtml) -> Result<()> {
    let getter = state.symbol("html");
    let value = compile_expr(state, &node.expression)?;
    let getter_chunk = entities::getter_fn(state, &getter, value);
    state.output.push(getter_chunk);

    let id = state.add_entity(EntityKind::InnerHtml, "html", Some(&node.span));
    let inj = element::block_anchor(state, id)?;
    state.append_entity(id);

    state.set_mount(id, |s| {
        let mut chunk = Chunk::text(format!(
            "{}({}, ",
            s.runtime(Runtime::MOUNT_INNER_HTML),
            s.host()
        ));
        chunk.append(s.read_chunk(inj));
        chunk.push_text(format!(", {})", getter));
        Ok(chunk)
    })?;
    state.set_update(id, |s| {
        let mut chunk = Chunk::text(format!("{}(", s.runtime(Runtime::UPDATE_INNER_HTML)));
        chunk.append(s.read_chunk(id));
        chunk.push_text(")");
        Ok(chunk)
    })?;
    state.entity_mut(id).update_dirty = true;
    state.set_unmount(id, |s| {
        let mut chunk = Chunk::text(format!(
            "{} = {}(",
            s.scope_ref(id),
            s.runtime(Runtime::UNMOUNT_INNER_HTML)
        ));
        chunk.append(s.read_chunk(id));
        chunk.push_text(")");
        Ok(chunk)
    })?;
    Ok(())
}
