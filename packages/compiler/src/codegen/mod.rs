//! Template-to-JS code generation.
//!
//! The generator walks the template AST once, turning every construct into
//! an entity with per-phase code chunks (see [`entity`]), and synthesizes
//! one function family per block (see [`block`]). Symbol storage decisions
//! are deferred until a block's usage counters are final.

pub mod block;
pub mod entities;
pub mod entity;
pub mod expression;
pub mod state;
pub mod symbols;
