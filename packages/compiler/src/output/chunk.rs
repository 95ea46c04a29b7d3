//! The builder the code generators assemble output from.
//!
//! A `Chunk` is a flat list of parts: text (optionally tied to a source
//! span), structural markers (newline, indent), and deferred entity-symbol
//! reads. Position bookkeeping travels with the text it belongs to, so the
//! final emission cannot drift out of sync with the mappings.
//!
//! Symbol reads stay deferred because an entity's storage class (plain
//! local, scope slot, destructured local) is only known once its block has
//! been fully visited; `BlockContext::generate` resolves them into text.

use crate::codegen::entity::{EntityId, RenderPhase};
use crate::parse_util::ParseSourceSpan;
use smallvec::SmallVec;

#[derive(Debug, Clone)]
pub enum Part {
    Text(String),
    Spanned {
        text: String,
        span: ParseSourceSpan,
    },
    /// Deferred read of an entity's symbol; `ordinal` is the 1-based read
    /// number within `phase`, assigned when the read was recorded.
    Symbol {
        entity: EntityId,
        phase: RenderPhase,
        ordinal: u32,
    },
    Newline,
    Indent,
    Dedent,
}

#[derive(Debug, Clone, Default)]
pub struct Chunk {
    parts: SmallVec<[Part; 4]>,
}

impl Chunk {
    pub fn new() -> Self {
        Chunk::default()
    }

    pub fn text(text: impl Into<String>) -> Self {
        let mut chunk = Chunk::new();
        chunk.push_text(text);
        chunk
    }

    pub fn spanned(text: impl Into<String>, span: &ParseSourceSpan) -> Self {
        let mut chunk = Chunk::new();
        chunk.push_spanned(text, span);
        chunk
    }

    pub fn push(&mut self, part: Part) -> &mut Self {
        self.parts.push(part);
        self
    }

    pub fn push_text(&mut self, text: impl Into<String>) -> &mut Self {
        let text = text.into();
        if text.is_empty() {
            return self;
        }
        // Merge adjacent plain text to keep part lists short.
        if let Some(Part::Text(last)) = self.parts.last_mut() {
            last.push_str(&text);
        } else {
            self.parts.push(Part::Text(text));
        }
        self
    }

    pub fn push_spanned(&mut self, text: impl Into<String>, span: &ParseSourceSpan) -> &mut Self {
        let text = text.into();
        if !text.is_empty() {
            self.parts.push(Part::Spanned {
                text,
                span: span.clone(),
            });
        }
        self
    }

    pub fn append(&mut self, other: Chunk) -> &mut Self {
        for part in other.parts {
            match part {
                Part::Text(text) => {
                    self.push_text(text);
                }
                other => {
                    self.parts.push(other);
                }
            }
        }
        self
    }

    pub fn newline(&mut self) -> &mut Self {
        self.parts.push(Part::Newline);
        self
    }

    pub fn indent(&mut self) -> &mut Self {
        self.parts.push(Part::Indent);
        self
    }

    pub fn dedent(&mut self) -> &mut Self {
        self.parts.push(Part::Dedent);
        self
    }

    /// Prefix the chunk with plain text, keeping existing parts in place.
    pub fn prepend_text(&mut self, text: impl Into<String>) -> &mut Self {
        let text = text.into();
        if !text.is_empty() {
            self.parts.insert(0, Part::Text(text));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn into_parts(self) -> SmallVec<[Part; 4]> {
        self.parts
    }
}

impl From<&str> for Chunk {
    fn from(text: &str) -> Self {
        Chunk::text(text)
    }
}

impl From<String> for Chunk {
    fn from(text: String) -> Self {
        Chunk::text(text)
    }
}
