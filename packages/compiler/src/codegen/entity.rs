//! The entity model: one entity per template construct that contributes
//! mount, update or unmount code.
//!
//! An entity's JS representation is decided by how often its symbol is read
//! in each phase, and the promotion is monotonic:
//!
//! * never read — the mount value is emitted inline, no symbol materializes;
//! * read during mount — a local `const` declaration;
//! * first read in update/unmount — the mount value is additionally stored
//!   on the per-instance scope object, and that read renders `scope.name`;
//! * second and later reads within one phase — the bare name, backed by a
//!   single `const { name, … } = scope` destructuring the owning block
//!   prepends to that phase's function.
//!
//! Reads are recorded with their 1-based ordinal when the code thunks run,
//! so a symbol's rendering is fixed at first read and never re-derived.

use crate::output::Chunk;
use crate::parse_util::ParseSourceSpan;
use bitflags::bitflags;

bitflags! {
    /// Static-vs-dynamic classification of an element's own content,
    /// computed once at construction by a bounded subtree walk. Conditions
    /// and loops are opaque recomputation units, so the walk stops at them.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ElementFlags: u8 {
        /// Content may structurally change (conditions, loops, inner HTML).
        const DYNAMIC_CONTENT = 1 << 0;
        /// A partial-bearing subtree sits anywhere inside.
        const PARTIALS = 1 << 1;
        /// At least one attribute needs re-evaluation on update.
        const DYNAMIC_ATTRIBUTES = 1 << 2;
        /// Event listeners live under conditional content.
        const DYNAMIC_EVENTS = 1 << 3;
        /// The element is a registered child component.
        const COMPONENT = 1 << 4;
    }
}

impl ElementFlags {
    /// Content must attach through an injector so the runtime has an
    /// anchor to re-render or remove it later.
    pub fn content_via_injector(&self) -> bool {
        self.intersects(
            ElementFlags::DYNAMIC_CONTENT | ElementFlags::PARTIALS | ElementFlags::COMPONENT,
        )
    }

    pub fn attrs_via_injector(&self) -> bool {
        self.intersects(ElementFlags::DYNAMIC_ATTRIBUTES) || self.contains(ElementFlags::COMPONENT)
    }

    pub fn events_via_injector(&self) -> bool {
        self.intersects(ElementFlags::DYNAMIC_EVENTS)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderPhase {
    Mount,
    Update,
    Unmount,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UsageStats {
    pub mount: u32,
    pub update: u32,
    pub unmount: u32,
}

impl UsageStats {
    /// Combined update+unmount use; any cross-phase use forces the value
    /// into a scope slot so it survives past the mount call.
    pub fn cross(&self) -> u32 {
        self.update + self.unmount
    }

    pub fn for_phase(&self, phase: RenderPhase) -> u32 {
        match phase {
            RenderPhase::Mount => self.mount,
            RenderPhase::Update => self.update,
            RenderPhase::Unmount => self.unmount,
        }
    }

    pub fn bump(&mut self, phase: RenderPhase) -> u32 {
        let counter = match phase {
            RenderPhase::Mount => &mut self.mount,
            RenderPhase::Update => &mut self.update,
            RenderPhase::Unmount => &mut self.unmount,
        };
        *counter += 1;
        *counter
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Element,
    Component,
    Injector,
    Text,
    Attribute,
    Event,
    Condition,
    Iterator,
    Variable,
    InnerHtml,
    Partial,
    /// Root of a child block; stands in for the injector parameter.
    BlockRoot,
    /// Free-standing statement with no DOM identity of its own
    /// (finalizers, slot accumulators, animations).
    Statement,
}

#[derive(Debug)]
pub struct EntityData {
    pub kind: EntityKind,
    /// Generated JS symbol, derived from the construct's semantic name.
    pub symbol: String,
    /// When set, mount-phase reads render this text instead of a declared
    /// local (used for function parameters such as a child block's
    /// injector). Cross-phase reads still promote to a scope slot.
    pub raw: Option<String>,
    pub span: Option<ParseSourceSpan>,
    pub usage: UsageStats,
    /// Mount-phase value expression; the owning block wraps it according
    /// to the final usage counters.
    pub mount: Option<Chunk>,
    pub update: Option<Chunk>,
    pub unmount: Option<Chunk>,
    pub children: Vec<EntityId>,
    /// Lazily created injector entity, kept as the first child so it
    /// mounts before any content that needs it.
    pub injector: Option<EntityId>,
    /// The update chunk evaluates to a dirty flag and may be folded into a
    /// slot-update accumulator.
    pub update_dirty: bool,
    /// Unmount nulling is handled elsewhere (animate:out transplants).
    pub no_null: bool,
    /// Element classification; empty for non-element entities.
    pub flags: ElementFlags,
    /// Target slot name when the element sits in component content.
    pub slot: Option<String>,
}

impl EntityData {
    pub fn new(kind: EntityKind, symbol: String, span: Option<&ParseSourceSpan>) -> Self {
        EntityData {
            kind,
            symbol,
            raw: None,
            span: span.cloned(),
            usage: UsageStats::default(),
            mount: None,
            update: None,
            unmount: None,
            children: Vec::new(),
            injector: None,
            update_dirty: false,
            no_null: false,
            flags: ElementFlags::empty(),
            slot: None,
        }
    }

    /// Whether the unmount function must null this entity's scope slot:
    /// it was read past mount but defines no cleanup of its own.
    pub fn needs_nulling(&self) -> bool {
        self.usage.cross() > 0 && self.unmount.is_none() && !self.no_null
    }
}
