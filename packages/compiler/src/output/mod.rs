pub mod chunk;
pub mod emitter;
pub mod source_map;

pub use chunk::{Chunk, Part};
pub use emitter::EmitterContext;
pub use source_map::{SourceMap, SourceMapGenerator};
