//! Global, per-compilation context shared by the code generators.
//!
//! Owns the entity arena, the block and element stacks, the current render
//! phase, and the registries (runtime symbols, helpers, store keys,
//! components, namespaces) the final module assembly is driven by.
//!
//! The current-block and current-element pointers follow a strict
//! save/restore discipline: every `run_*` helper restores the previous
//! pointer on all exit paths, including `?`-propagated errors, so a failed
//! nested visit never leaves the state pointing into a dead scope.

use crate::codegen::block::{generate_block, BlockContext};
use crate::codegen::entity::{EntityData, EntityId, EntityKind, RenderPhase};
use crate::error::{CompileWarning, Result};
use crate::options::CompileOptions;
use crate::output::chunk::{Chunk, Part};
use crate::parse_util::{sanitize_identifier, ParseSourceSpan};
use crate::template::ast::ComponentImport;
use crate::util::dash_case_to_camel_case;
use indexmap::{IndexMap, IndexSet};
use std::collections::{HashMap, HashSet};

/// Static registration record for an imported child component.
#[derive(Debug, Clone)]
pub struct ComponentRegistration {
    /// JS import symbol the component definition binds to.
    pub symbol: String,
    pub href: String,
    pub used: bool,
    pub span: ParseSourceSpan,
}

/// A compiled partial definition, addressable by name at runtime.
#[derive(Debug)]
pub struct PartialDeclaration {
    /// Name of the block function implementing the partial's body.
    pub block: String,
    /// Rendered `{ name: default, … }` object literal.
    pub defaults: Chunk,
}

pub struct CompileState {
    pub options: CompileOptions,
    entities: Vec<EntityData>,
    block_stack: Vec<BlockContext>,
    element_stack: Vec<EntityId>,
    phase: Option<RenderPhase>,
    symbol_counters: HashMap<String, u32>,
    /// Runtime symbols referenced by generated code, in first-use order.
    pub used_runtime: IndexSet<&'static str>,
    /// Helper functions referenced by expressions, in first-use order.
    pub used_helpers: IndexSet<String>,
    /// Store keys read by expressions; drives `subscribeStore`.
    pub used_store: IndexSet<String>,
    components: IndexMap<String, ComponentRegistration>,
    /// Module-level namespace constants: URI → symbol.
    ns_consts: IndexMap<String, String>,
    /// Lexical `xmlns:*` frames, innermost last.
    ns_stack: Vec<HashMap<String, String>>,
    /// Compiled partial definitions by partial name.
    pub partials: IndexMap<String, PartialDeclaration>,
    /// Finalized module-level chunks (functions), in generation order.
    pub output: Vec<Chunk>,
    pub warnings: Vec<CompileWarning>,
    warned_labels: HashSet<String>,
}

impl CompileState {
    pub fn new(options: CompileOptions) -> Self {
        CompileState {
            options,
            entities: Vec::new(),
            block_stack: Vec::new(),
            element_stack: Vec::new(),
            phase: None,
            symbol_counters: HashMap::new(),
            used_runtime: IndexSet::new(),
            used_helpers: IndexSet::new(),
            used_store: IndexSet::new(),
            components: IndexMap::new(),
            ns_consts: IndexMap::new(),
            ns_stack: Vec::new(),
            partials: IndexMap::new(),
            output: Vec::new(),
            warnings: Vec::new(),
            warned_labels: HashSet::new(),
        }
    }

    /* Symbols */

    /// Generate a unique JS symbol from a semantic name.
    pub fn symbol(&mut self, name: &str) -> String {
        let base = sanitize_identifier(name);
        let counter = self.symbol_counters.entry(base.clone()).or_insert(0);
        let symbol = format!(
            "{}{}{}{}",
            self.options.prefix, base, self.options.suffix, counter
        );
        *counter += 1;
        symbol
    }

    /* Entity arena */

    pub fn entity(&self, id: EntityId) -> &EntityData {
        &self.entities[id.0]
    }

    pub fn entity_mut(&mut self, id: EntityId) -> &mut EntityData {
        &mut self.entities[id.0]
    }

    pub fn add_entity(
        &mut self,
        kind: EntityKind,
        name: &str,
        span: Option<&ParseSourceSpan>,
    ) -> EntityId {
        let symbol = self.symbol(name);
        self.entities.push(EntityData::new(kind, symbol, span));
        EntityId(self.entities.len() - 1)
    }

    /// Nest `child` under `parent`; nesting order is emission order.
    pub fn add_child(&mut self, parent: EntityId, child: EntityId) {
        self.entities[parent.0].children.push(child);
    }

    /// Attach an entity at the current position: under the current element
    /// if one is open, otherwise at the top level of the current block.
    pub fn append_entity(&mut self, id: EntityId) {
        if let Some(&parent) = self.element_stack.last() {
            self.add_child(parent, id);
        } else {
            self.current_block_mut().entities.push(id);
        }
    }

    /* Render phases */

    pub fn current_phase(&self) -> RenderPhase {
        self.phase.unwrap_or(RenderPhase::Mount)
    }

    fn enter_phase<T>(
        &mut self,
        phase: RenderPhase,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        let prev = self.phase.replace(phase);
        let result = f(self);
        self.phase = prev;
        result
    }

    pub fn mount<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.enter_phase(RenderPhase::Mount, f)
    }

    pub fn update<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.enter_phase(RenderPhase::Update, f)
    }

    pub fn unmount<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.enter_phase(RenderPhase::Unmount, f)
    }

    /// Record a read of an entity's symbol in the current phase. The read
    /// ordinal is captured here and fixes how the reference renders, so the
    /// representation stays stable however often the chunk is revisited.
    pub fn read(&mut self, id: EntityId) -> Part {
        let phase = self.current_phase();
        let ordinal = self.entities[id.0].usage.bump(phase);
        Part::Symbol {
            entity: id,
            phase,
            ordinal,
        }
    }

    /// Convenience: a one-part chunk reading an entity's symbol.
    pub fn read_chunk(&mut self, id: EntityId) -> Chunk {
        let mut chunk = Chunk::new();
        let part = self.read(id);
        chunk.push(part);
        chunk
    }

    /* Phase thunks */

    pub fn set_mount(
        &mut self,
        id: EntityId,
        f: impl FnOnce(&mut Self) -> Result<Chunk>,
    ) -> Result<()> {
        let chunk = self.mount(f)?;
        self.entities[id.0].mount = Some(chunk);
        Ok(())
    }

    pub fn set_update(
        &mut self,
        id: EntityId,
        f: impl FnOnce(&mut Self) -> Result<Chunk>,
    ) -> Result<()> {
        let chunk = self.update(f)?;
        self.entities[id.0].update = Some(chunk);
        Ok(())
    }

    pub fn set_unmount(
        &mut self,
        id: EntityId,
        f: impl FnOnce(&mut Self) -> Result<Chunk>,
    ) -> Result<()> {
        let chunk = self.unmount(f)?;
        self.entities[id.0].unmount = Some(chunk);
        Ok(())
    }

    /// Register identical mount and update behavior. The thunk runs once per
    /// phase: the construct behaves the same, but its symbol reads must be
    /// counted separately in each phase's bookkeeping.
    pub fn set_shared(
        &mut self,
        id: EntityId,
        f: impl Fn(&mut Self) -> Result<Chunk>,
    ) -> Result<()> {
        let mount = self.mount(&f)?;
        let update = self.update(&f)?;
        let entity = &mut self.entities[id.0];
        entity.mount = Some(mount);
        entity.update = Some(update);
        Ok(())
    }

    /* Blocks */

    pub fn current_block(&self) -> &BlockContext {
        self.block_stack.last().expect("no current block")
    }

    pub fn current_block_mut(&mut self) -> &mut BlockContext {
        self.block_stack.last_mut().expect("no current block")
    }

    fn run_block_inner(
        &mut self,
        name: &str,
        uses_injector: bool,
        is_root: bool,
        f: impl FnOnce(&mut Self) -> Result<()>,
    ) -> Result<String> {
        let block_name = self.symbol(name);
        self.block_stack.push(BlockContext::new(
            block_name.clone(),
            uses_injector,
            is_root,
        ));
        let result = f(self);
        let block = self.block_stack.pop().expect("block stack underflow");
        result?;
        let chunks = generate_block(self, block)?;
        self.output.extend(chunks);
        Ok(block_name)
    }

    /// Open a new block, let `f` produce entities into it, then synthesize
    /// the block's mount/update/unmount functions into the output. Returns
    /// the block's unique name for callers that reference it.
    pub fn run_block(&mut self, name: &str, f: impl FnOnce(&mut Self) -> Result<()>) -> Result<String> {
        self.run_block_inner(name, false, false, f)
    }

    /// The top-level template block: exported mount, store subscription.
    pub fn run_template_block(
        &mut self,
        name: &str,
        f: impl FnOnce(&mut Self) -> Result<()>,
    ) -> Result<String> {
        self.run_block_inner(name, false, true, f)
    }

    /// A block whose content operates through an injector argument instead
    /// of direct DOM references: conditional branches, loop bodies, slot
    /// defaults. The block root stands in for the injector parameter.
    pub fn run_child_block(
        &mut self,
        name: &str,
        f: impl FnOnce(&mut Self) -> Result<()>,
    ) -> Result<String> {
        self.run_block_inner(name, true, false, |state| {
            let root = state.add_entity(EntityKind::BlockRoot, "block", None);
            let injector = state.add_entity(EntityKind::Injector, "injector", None);
            state.entity_mut(injector).raw = Some("injector".to_string());
            state.entity_mut(root).injector = Some(injector);
            state.add_child(root, injector);
            state.current_block_mut().entities.push(root);
            state.run_element_frame(root, HashMap::new(), f)
        })
    }

    /* Elements */

    pub fn current_element(&self) -> Option<EntityId> {
        self.element_stack.last().copied()
    }

    /// Make `element` the current element and bind its `xmlns:*` frame for
    /// the duration of `f`. Both are restored on every exit path.
    pub fn run_element_frame(
        &mut self,
        element: EntityId,
        ns_frame: HashMap<String, String>,
        f: impl FnOnce(&mut Self) -> Result<()>,
    ) -> Result<()> {
        self.element_stack.push(element);
        self.ns_stack.push(ns_frame);
        let result = f(self);
        self.ns_stack.pop();
        self.element_stack.pop();
        result
    }

    /* Registries */

    /// Mark a runtime symbol as used and hand it back for emission.
    pub fn runtime(&mut self, symbol: &'static str) -> &'static str {
        self.used_runtime.insert(symbol);
        symbol
    }

    /// Mark a helper function as used. Returns false when no configured
    /// helper module provides it.
    pub fn helper(&mut self, name: &str) -> bool {
        if self.options.helper_module(name).is_some() {
            self.used_helpers.insert(name.to_string());
            true
        } else {
            false
        }
    }

    pub fn store(&mut self, key: &str) {
        self.used_store.insert(key.to_string());
    }

    /// Module-level constant symbol for the namespace URI bound to `prefix`
    /// in the current lexical scope, if any.
    pub fn namespace(&mut self, prefix: &str) -> Option<String> {
        let uri = self
            .ns_stack
            .iter()
            .rev()
            .find_map(|frame| frame.get(prefix))?
            .clone();
        if let Some(symbol) = self.ns_consts.get(&uri) {
            return Some(symbol.clone());
        }
        let symbol = self.symbol(&format!("ns_{}", prefix));
        self.ns_consts.insert(uri, symbol.clone());
        Some(symbol)
    }

    /// Namespace constants to emit at module level: (symbol, URI) pairs.
    pub fn namespace_constants(&self) -> Vec<(String, String)> {
        self.ns_consts
            .iter()
            .map(|(uri, symbol)| (symbol.clone(), uri.clone()))
            .collect()
    }

    pub fn register_component(&mut self, import: &ComponentImport) {
        let symbol = crate::util::capitalize(&dash_case_to_camel_case(&import.name));
        self.components.insert(
            import.name.clone(),
            ComponentRegistration {
                symbol,
                href: import.href.clone(),
                used: false,
                span: import.span.clone(),
            },
        );
    }

    /// Whether an element name refers to a registered component. Warns once
    /// per tag name when the element looks like a component (hyphenated)
    /// but was never imported; a plain custom element is still valid HTML,
    /// so this is not an error.
    pub fn is_component(&mut self, name: &str, span: &ParseSourceSpan) -> bool {
        if self.components.contains_key(name) {
            return true;
        }
        if name.contains('-') {
            self.warn_once(
                name,
                format!(
                    "Missing component definition for <{}>, did you forget to import it?",
                    name
                ),
                Some(span),
            );
        }
        false
    }

    /// Look up a registered component and mark it as referenced, so only
    /// imports that are actually used end up in the module prologue.
    pub fn get_component(&mut self, name: &str) -> Option<ComponentRegistration> {
        let reg = self.components.get_mut(name)?;
        reg.used = true;
        Some(reg.clone())
    }

    /// Used component imports in declaration order: (symbol, href).
    pub fn component_imports(&self) -> Vec<(String, String)> {
        self.components
            .values()
            .filter(|reg| reg.used)
            .map(|reg| (reg.symbol.clone(), reg.href.clone()))
            .collect()
    }

    /* Diagnostics */

    pub fn warn_once(
        &mut self,
        label: &str,
        message: String,
        span: Option<&ParseSourceSpan>,
    ) {
        if !self.warned_labels.insert(label.to_string()) {
            return;
        }
        let warning = CompileWarning {
            message,
            span: span.cloned(),
        };
        if let Some(callback) = &self.options.warn {
            callback(&warning);
        }
        self.warnings.push(warning);
    }

    /* Accessor roots used across the generators */

    pub fn host(&self) -> &str {
        &self.options.host
    }

    pub fn scope(&self) -> &str {
        &self.options.scope
    }

    /// `scope.<symbol>` for an entity, as literal text. Used for assignment
    /// targets; plain value reads go through `read` so they are counted.
    pub fn scope_ref(&self, id: EntityId) -> String {
        format!("{}.{}", self.options.scope, self.entities[id.0].symbol)
    }
}
