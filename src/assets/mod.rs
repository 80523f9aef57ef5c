//! Asset system: decoding model files and caching the results.
//!
//! - [`decoder`] defines the [`AssetDecoder`] seam and the file-backed decoder
//! - [`obj`] and [`gltf`] convert OBJ and glTF/GLB files into scene objects
//! - [`cache`] memoizes decoded objects and hands out independent clones
//!
//! Draco-compressed glTF primitives are not supported; such files fail to
//! decode and are reported like any other malformed asset.

pub mod cache;
pub mod decoder;
pub mod gltf;
pub mod obj;

pub use cache::{AssetCache, CacheStats};
pub use decoder::{AssetDecoder, AssetFormat, FileDecoder};
