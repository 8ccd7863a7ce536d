#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_debug_implementations)]

//! Backend-agnostic building blocks shared by every glscene crate.
//!
//! Nothing in here touches GL: errors, configuration, the fly camera, the scene catalog and
//! the small bits of per-frame math the scenes need (transparency ordering).

pub mod camera;
pub mod config;
pub mod error;
pub mod order;
pub mod scene_kind;

pub use camera::{Camera, CameraMovement};
pub use config::{load_typed_json, CameraConfig, ViewerConfig, WindowConfig};
pub use error::EngineError;
pub use order::sort_back_to_front;
pub use scene_kind::SceneKind;
