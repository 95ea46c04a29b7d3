//! `<var>` statements.
//!
//! Template variables live on the scope object under their declared name,
//! not a generated symbol, so `@name` reads resolve without bookkeeping.
//! The assignment runs in mount and again on every update; downstream
//! expressions always see the current value.

use crate::codegen::entity::EntityKind;
use crate::codegen::expression::compile_expr;
use crate::codegen::state::CompileState;
use crate::error::Result;
use crate::output::Chunk;
use crate::template::ast::VariableStatement;
use crate::util::property_access;

pub fn compile_variable(state: &mut CompileState, stmt: &VariableStatement) -> Result<()> {
    let value = compile_expr(state, &stmt.value)?;
    let target = property_access(state.scope(), &stmt.name);
    let id = state.add_entity(EntityKind::Variable, &stmt.name, Some(&stmt.span));
    state.set_shared(id, move |_| {
        let mut chunk = Chunk::text(format!("{} = ", target));
        chunk.append(value.clone());
        Ok(chunk)
    })?;
    state.append_entity(id);
    Ok(())
}
