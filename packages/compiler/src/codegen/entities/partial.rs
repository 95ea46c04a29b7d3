//! Partials: named, overridable content templates.
//!
//! A definition compiles its body as a child block and lands in the
//! module-level partials object together with its parameter defaults. A
//! usage site prefers a caller-provided override (`partial:name` prop on
//! the host) over the local definition and re-resolves that choice on
//! every update, so a parent can swap the partial at runtime.

use crate::codegen::entities::element;
use crate::codegen::entity::EntityKind;
use crate::codegen::expression::{compile_object, ExprEnv};
use crate::codegen::state::{CompileState, PartialDeclaration};
use crate::codegen::symbols::Runtime;
use crate::error::Result;
use crate::output::Chunk;
use crate::template::ast::{PartialDefinition, PartialStatement};
use crate::util::dash_case_to_camel_case;

pub fn compile_partial_definition(state: &mut CompileState, def: &PartialDefinition) -> Result<()> {
    let capitalized = crate::util::capitalize(&dash_case_to_camel_case(&def.name));
    let block = state.run_child_block(&format!("partial{}", capitalized), |s| {
        crate::visitor::visit_children(s, &def.children)
    })?;
    let defaults = compile_object(state, &def.params, &ExprEnv::default())?;
    state
        .partials
        .insert(def.name.clone(), PartialDeclaration { block, defaults });
    Ok(())
}

pub fn compile_partial(state: &mut CompileState, stmt: &PartialStatement) -> Result<()> {
    let params = compile_object(state, &stmt.params, &ExprEnv::default())?;
    let getter = format!(
        "{} || {}",
        crate::util::property_access(
            &format!("{}.props", state.host()),
            &format!("partial:{}", stmt.name)
        ),
        crate::util::property_access(&state.options.partials.clone(), &stmt.name)
    );

    let id = state.add_entity(EntityKind::Partial, "partial", Some(&stmt.span));
    let inj = element::block_anchor(state, id)?;
    state.append_entity(id);

    let mount_params = params.clone();
    let mount_getter = getter.clone();
    state.set_mount(id, move |s| {
        let mut chunk = Chunk::text(format!(
            "{}({}, ",
            s.runtime(Runtime::MOUNT_PARTIAL),
            s.host()
        ));
        chunk.append(s.read_chunk(inj));
        chunk.push_text(format!(", {}, ", mount_getter));
        chunk.append(mount_params);
        chunk.push_text(")");
        Ok(chunk)
    })?;
    state.set_update(id, move |s| {
        let mut chunk = Chunk::text(format!("{}(", s.runtime(Runtime::UPDATE_PARTIAL)));
        chunk.append(s.read_chunk(id));
        chunk.push_text(format!(", {}, ", getter));
        chunk.append(params);
        chunk.push_text(")");
        Ok(chunk)
    })?;
    state.entity_mut(id).update_dirty = true;
    state.set_unmount(id, |s| {
        let mut chunk = Chunk::text(format!(
            "{} = {}(",
            s.scope_ref(id),
            s.runtime(Runtime::UNMOUNT_PARTIAL)
        ));
        chunk.append(s.read_chunk(id));
        chunk.push_text(")");
        Ok(chunk)
    })?;
    Ok(())
}
