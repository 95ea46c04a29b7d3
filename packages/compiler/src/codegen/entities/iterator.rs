//! `<for-each>` iteration entities.
//!
//! The collection getter and optional key getter become module-level
//! functions; the body becomes a child block. A key expression switches
//! the whole construct to the keyed runtime primitives at compile time.
//! Inside the body block the runtime exposes the current `value`, `index`
//! and `key` as scope variables, so `@value`-style reads need no special
//! handling here.

use crate::codegen::entities::{self, element};
use crate::codegen::entity::EntityKind;
use crate::codegen::expression::compile_expr;
use crate::codegen::state::CompileState;
use crate::codegen::symbols::Runtime;
use crate::error::Result;
use crate::output::Chunk;
use crate::template::ast::ForEachStatement;

pub fn compile_for_each(state: &mut CompileState, stmt: &ForEachStatement) -> Result<()> {
    let select = state.symbol("forSelect");
    let select_value = compile_expr(state, &stmt.select)?;
    let select_chunk = entities::getter_fn(state, &select, select_value);
    state.output.push(select_chunk);

    let key = match &stmt.key {
        Some(key_expr) => {
            let key = state.symbol("forKey");
            let key_value = compile_expr(state, key_expr)?;
            let key_chunk = entities::getter_fn(state, &key, key_value);
            state.output.push(key_chunk);
            Some(key)
        }
        None => None,
    };

    let body = state.run_child_block("forBody", |s| {
        crate::visitor::visit_children(s, &stmt.children)
    })?;

    let id = state.add_entity(EntityKind::Iterator, "for", Some(&stmt.span));
    let inj = element::block_anchor(state, id)?;
    state.append_entity(id);

    let keyed = key.is_some();
    state.set_mount(id, move |s| {
        let runtime = if keyed {
            Runtime::MOUNT_KEY_ITERATOR
        } else {
            Runtime::MOUNT_ITERATOR
        };
        let mut chunk = Chunk::text(format!("{}({}, ", s.runtime(runtime), s.host()));
        chunk.append(s.read_chunk(inj));
        chunk.push_text(format!(", {}", select));
        if let Some(key) = key {
            chunk.push_text(format!(", {}", key));
        }
        chunk.push_text(format!(", {})", body));
        Ok(chunk)
    })?;
    state.set_update(id, move |s| {
        let runtime = if keyed {
            Runtime::UPDATE_KEY_ITERATOR
        } else {
            Runtime::UPDATE_ITERATOR
        };
        let mut chunk = Chunk::text(format!("{}(", s.runtime(runtime)));
        chunk.append(s.read_chunk(id));
        chunk.push_text(")");
        Ok(chunk)
    })?;
    state.entity_mut(id).update_dirty = true;
    state.set_unmount(id, move |s| {
        let runtime = if keyed {
            Runtime::UNMOUNT_KEY_ITERATOR
        } else {
            Runtime::UNMOUNT_ITERATOR
        };
        let mut chunk = Chunk::text(format!(
            "{} = {}(",
            s.scope_ref(id),
            s.runtime(runtime)
        ));
        chunk.append(s.read_chunk(id));
        chunk.push_text(")");
        Ok(chunk)
    })?;
    Ok(())
}
