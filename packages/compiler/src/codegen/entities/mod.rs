//! Construct-specific entity builders.
//!
//! Each module turns one template construct into entities on the current
//! block: the mount value, the update/unmount behavior, and any module-level
//! functions (entry functions, handlers, child blocks) it needs.

use crate::codegen::state::CompileState;
use crate::output::Chunk;

pub mod attribute;
pub mod condition;
pub mod element;
pub mod event;
pub mod inner_html;
pub mod iterator;
pub mod partial;
pub mod text;
pub mod variable;

/// A module-level `function name(host, scope) { return <value>; }` getter,
/// the shape iterator select/key functions and inner-HTML sources share.
pub(crate) fn getter_fn(state: &CompileState, name: &str, value: Chunk) -> Chunk {
    let mut chunk = Chunk::text(format!(
        "function {}({}, {}) {{",
        name,
        state.host(),
        state.scope()
    ));
    chunk.indent();
    chunk.newline();
    chunk.push_text("return ");
    chunk.append(value);
    chunk.push_text(";");
    chunk.dedent();
    chunk.newline();
    chunk.push_text("}");
    chunk
}
