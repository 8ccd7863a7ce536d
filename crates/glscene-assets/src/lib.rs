#![forbid(unsafe_code)]
#![deny(missing_debug_implementations)]

//! CPU-side asset loading: where assets live, image decoding, and Wavefront OBJ/MTL import.
//!
//! Nothing here needs a GL context; the runtime uploads what these loaders produce.

pub mod images;
pub mod obj;
pub mod root;

pub use images::{fallback_image, load_image, ImageData};
pub use obj::{load_obj, parse_mtl, parse_obj, MaterialData, MeshData, ModelData, ModelVertex};
pub use root::AssetsRoot;

pub use glscene_core::EngineError;
