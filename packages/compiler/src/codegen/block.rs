//! Block-level function synthesis.
//!
//! A block is one generated function family: `name` (mount), `nameUpdate`
//! and `nameUnmount`. Entities accumulate on the block while its subtree is
//! visited; `generate_block` consumes them exactly once and renders the
//! three functions, omitting any whose body would be empty.

use crate::codegen::entity::{EntityId, RenderPhase};
use crate::codegen::state::CompileState;
use crate::codegen::symbols::Runtime;
use crate::error::Result;
use crate::output::chunk::{Chunk, Part};
use crate::util::quote_string;
use indexmap::IndexSet;

/// A function rendered alongside the block's own triplet, e.g. the callback
/// an `animate:out` directive defers the subtree's unmount code into.
#[derive(Debug)]
pub struct DeferredFn {
    pub name: String,
    /// Statements, still carrying deferred symbol reads.
    pub body: Vec<Chunk>,
}

#[derive(Debug)]
pub struct BlockContext {
    pub name: String,
    /// Top-level entities of this block, in emission order.
    pub entities: Vec<EntityId>,
    /// Child blocks do not own their mount point; they receive the
    /// injector as an explicit parameter after `host`.
    pub uses_injector: bool,
    /// The exported template block: `export default`, store subscription.
    pub is_root: bool,
    pub refs_in_mount: bool,
    pub refs_in_update: bool,
    pub deferred_fns: Vec<DeferredFn>,
}

impl BlockContext {
    pub fn new(name: String, uses_injector: bool, is_root: bool) -> Self {
        BlockContext {
            name,
            entities: Vec::new(),
            uses_injector,
            is_root,
            refs_in_mount: false,
            refs_in_update: false,
            deferred_fns: Vec::new(),
        }
    }

    pub fn update_name(&self) -> String {
        format!("{}Update", self.name)
    }

    pub fn unmount_name(&self) -> String {
        format!("{}Unmount", self.name)
    }
}

/// Per-phase names that must be destructured from scope at function start
/// because the phase read them more than once.
#[derive(Default)]
struct Destructured {
    update: IndexSet<String>,
    unmount: IndexSet<String>,
}

impl Destructured {
    fn mark(&mut self, phase: RenderPhase, symbol: &str) {
        match phase {
            RenderPhase::Mount => {}
            RenderPhase::Update => {
                self.update.insert(symbol.to_string());
            }
            RenderPhase::Unmount => {
                self.unmount.insert(symbol.to_string());
            }
        }
    }
}

/// Resolve deferred symbol reads into identifier text. Mount-phase reads
/// render the local (or raw) name; the first cross-phase read renders the
/// scope slot; repeated reads in one phase render the bare name and request
/// a destructuring at that phase's function start.
fn resolve_chunk(state: &CompileState, chunk: &Chunk, destructured: &mut Destructured) -> Chunk {
    let mut resolved = Chunk::new();
    for part in chunk.parts() {
        match part {
            Part::Symbol {
                entity,
                phase,
                ordinal,
            } => {
                let data = state.entity(*entity);
                let text = match phase {
                    RenderPhase::Mount => data
                        .raw
                        .clone()
                        .unwrap_or_else(|| data.symbol.clone()),
                    RenderPhase::Update | RenderPhase::Unmount => {
                        if *ordinal == 1 {
                            format!("{}.{}", state.scope(), data.symbol)
                        } else {
                            destructured.mark(*phase, &data.symbol);
                            data.symbol.clone()
                        }
                    }
                };
                resolved.push_text(text);
            }
            other => {
                resolved.push(other.clone());
            }
        }
    }
    resolved
}

/// The mount statement for one entity, wrapped according to its final
/// usage counters. Promotion is decided here, once, after the whole block
/// has been visited.
fn mount_statement(
    state: &CompileState,
    id: EntityId,
    destructured: &mut Destructured,
) -> Option<Chunk> {
    let data = state.entity(id);
    let cross = data.usage.cross();

    if let Some(raw) = &data.raw {
        // Parameter-backed symbol: only persist it when later phases read it.
        if cross > 0 {
            return Some(Chunk::text(format!(
                "{}.{} = {};",
                state.scope(),
                data.symbol,
                raw
            )));
        }
        return None;
    }

    let value = data.mount.as_ref()?;
    let resolved = resolve_chunk(state, value, destructured);
    let mut stmt = match (cross > 0, data.usage.mount > 0) {
        (true, true) => Chunk::text(format!(
            "const {} = {}.{} = ",
            data.symbol,
            state.scope(),
            data.symbol
        )),
        (true, false) => Chunk::text(format!("{}.{} = ", state.scope(), data.symbol)),
        (false, true) => Chunk::text(format!("const {} = ", data.symbol)),
        (false, false) => Chunk::new(),
    };
    stmt.append(resolved);
    stmt.push_text(";");
    Some(stmt)
}

struct Collected {
    mount: Vec<Chunk>,
    update: Vec<Chunk>,
    unmount: Vec<Chunk>,
    nulled: Vec<EntityId>,
}

/// Depth-first collection: mount code in emission order and all
/// descendants' update/unmount code in the same traversal, so update
/// ordering mirrors the DOM structure.
fn collect(
    state: &CompileState,
    ids: &[EntityId],
    out: &mut Collected,
    destructured: &mut Destructured,
) {
    for &id in ids {
        let data = state.entity(id);
        if let Some(stmt) = mount_statement(state, id, destructured) {
            out.mount.push(stmt);
        }
        if let Some(update) = &data.update {
            let mut stmt = resolve_chunk(state, update, destructured);
            stmt.push_text(";");
            out.update.push(stmt);
        }
        if let Some(unmount) = &data.unmount {
            let mut stmt = resolve_chunk(state, unmount, destructured);
            stmt.push_text(";");
            out.unmount.push(stmt);
        }
        if data.needs_nulling() {
            out.nulled.push(id);
        }
        collect(state, &data.children, out, destructured);
    }
}

fn render_function(export_default: bool, name: &str, params: &[&str], stmts: Vec<Chunk>) -> Chunk {
    let mut chunk = Chunk::new();
    if export_default {
        chunk.push_text("export default ");
    }
    chunk.push_text(format!("function {}({}) {{", name, params.join(", ")));
    chunk.indent();
    for stmt in stmts {
        chunk.newline();
        chunk.append(stmt);
    }
    chunk.dedent();
    chunk.newline();
    chunk.push_text("}");
    chunk
}

fn destructuring_statement(scope: &str, names: &IndexSet<String>) -> Chunk {
    let list = names.iter().cloned().collect::<Vec<_>>().join(", ");
    Chunk::text(format!("const {{ {} }} = {};", list, scope))
}

/// Synthesize the block's functions from its accumulated entities and
/// append them to the output in mount/update/unmount order, followed by
/// any deferred callbacks.
pub fn generate_block(state: &mut CompileState, block: BlockContext) -> Result<Vec<Chunk>> {
    let mut destructured = Destructured::default();
    let mut out = Collected {
        mount: Vec::new(),
        update: Vec::new(),
        unmount: Vec::new(),
        nulled: Vec::new(),
    };
    collect(state, &block.entities, &mut out, &mut destructured);

    let mut unmount_stmts = out.unmount;
    for id in out.nulled {
        unmount_stmts.push(Chunk::text(format!("{} = null;", state.scope_ref(id))));
    }

    let mut update_stmts = out.update;
    if block.refs_in_update {
        update_stmts.push(Chunk::text(format!(
            "{}({});",
            state.runtime(Runtime::FINALIZE_REFS),
            state.host()
        )));
    }

    let mut mount_stmts = out.mount;
    if block.refs_in_mount {
        mount_stmts.push(Chunk::text(format!(
            "{}({});",
            state.runtime(Runtime::FINALIZE_REFS),
            state.host()
        )));
    }
    if block.is_root && !state.used_store.is_empty() {
        let keys = state
            .used_store
            .iter()
            .map(|key| quote_string(key))
            .collect::<Vec<_>>()
            .join(", ");
        mount_stmts.push(Chunk::text(format!(
            "{}({}, [{}]);",
            state.runtime(Runtime::SUBSCRIBE_STORE),
            state.host(),
            keys
        )));
    }
    if !unmount_stmts.is_empty() {
        mount_stmts.push(Chunk::text(format!(
            "{}({}, {});",
            state.runtime(Runtime::ADD_DISPOSE_CALLBACK),
            state.host(),
            block.unmount_name()
        )));
    }
    if !update_stmts.is_empty() {
        mount_stmts.push(Chunk::text(format!("return {};", block.update_name())));
    }

    let host = state.host().to_string();
    let scope = state.scope().to_string();
    let mount_params: Vec<&str> = if block.uses_injector {
        vec![host.as_str(), "injector", scope.as_str()]
    } else {
        vec![host.as_str(), scope.as_str()]
    };

    let mut chunks = Vec::new();
    chunks.push(render_function(
        block.is_root,
        &block.name,
        &mount_params,
        mount_stmts,
    ));

    if !update_stmts.is_empty() {
        if !destructured.update.is_empty() {
            update_stmts.insert(0, destructuring_statement(&scope, &destructured.update));
        }
        chunks.push(render_function(
            false,
            &block.update_name(),
            &[host.as_str(), scope.as_str()],
            update_stmts,
        ));
    }

    if !unmount_stmts.is_empty() {
        if !destructured.unmount.is_empty() {
            unmount_stmts.insert(0, destructuring_statement(&scope, &destructured.unmount));
        }
        chunks.push(render_function(
            false,
            &block.unmount_name(),
            &[scope.as_str()],
            unmount_stmts,
        ));
    }

    for deferred in block.deferred_fns {
        let mut callback_destructured = Destructured::default();
        let mut stmts = Vec::new();
        for chunk in &deferred.body {
            let mut stmt = resolve_chunk(state, chunk, &mut callback_destructured);
            stmt.push_text(";");
            stmts.push(stmt);
        }
        if !callback_destructured.unmount.is_empty() {
            stmts.insert(
                0,
                destructuring_statement(&scope, &callback_destructured.unmount),
            );
        }
        chunks.push(render_function(
            false,
            &deferred.name,
            &[scope.as_str()],
            stmts,
        ));
    }

    Ok(chunks)
}
