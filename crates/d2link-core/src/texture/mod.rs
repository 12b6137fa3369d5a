//! Texture classification.
//!
//! Textures cross the render boundary as anonymous pixel data plus a content
//! hash. Classification recovers what a texture is for, first by hash lookup
//! against curated per-category lists, then refined by which draw routine
//! submitted it.

mod category;
mod hashes;
mod index;

pub use category::{TextureCategory, refine_category};
pub use index::ClassificationIndex;
