//! The demo scenes and the factory that builds them.
//!
//! A scene is constructed without touching GL (`build_scene`), then owns every GL object it
//! creates between `setup` and `destroy`. The host clears the default framebuffer with
//! [`Scene::clear_color`] before each `draw`.
#![allow(clippy::missing_safety_doc)]
#![deny(missing_debug_implementations)]

use glscene_assets::AssetsRoot;
use glscene_core::{Camera, SceneKind};
use glscene_runtime_glow::{EngineError, FrameCtx, Texture2d};

mod blending;
mod cubemap;
mod framebuffer;
mod light;
pub mod lighting;
mod mirror;
mod model;
mod props;
pub mod shaders;
mod stencil;
mod test_scene;
mod triangle;

pub use blending::BlendingScene;
pub use cubemap::CubemapScene;
pub use framebuffer::FramebufferScene;
pub use light::LightScene;
pub use mirror::MirrorFramebufferScene;
pub use model::ModelScene;
pub use stencil::StencilScene;
pub use test_scene::TestScene;
pub use triangle::TriangleScene;

pub const DEFAULT_CLEAR_COLOR: [f32; 4] = [0.1, 0.1, 0.1, 1.0];

/// What a scene needs from the host at setup time.
#[derive(Debug, Clone)]
pub struct SceneContext {
    pub assets: AssetsRoot,
    pub width: i32,
    pub height: i32,
}

impl SceneContext {
    /// Load `textures/<name>` unflipped, falling back to the checker texture.
    pub unsafe fn texture(&self, gl: &glow::Context, name: &str) -> Result<Texture2d, EngineError> {
        Texture2d::load_or_fallback(gl, &self.assets.texture(name), false)
    }
}

pub trait Scene: std::fmt::Debug {
    fn kind(&self) -> SceneKind;

    fn clear_color(&self) -> [f32; 4] {
        DEFAULT_CLEAR_COLOR
    }

    /// Create GL objects and set static uniforms/state. Called once before `draw`.
    unsafe fn setup(&mut self, gl: &glow::Context, ctx: &SceneContext) -> Result<(), EngineError>;

    /// Issue this frame's draw calls. Must leave the default framebuffer bound.
    unsafe fn draw(&mut self, gl: &glow::Context, camera: &Camera, frame: FrameCtx);

    /// Reallocate window-sized resources.
    unsafe fn resize(&mut self, _gl: &glow::Context, _width: i32, _height: i32) -> Result<(), EngineError> {
        Ok(())
    }

    /// Flip the "render through a framebuffer" mode. Returns the new state; scenes without the
    /// mode always return `false`.
    fn toggle_offscreen(&mut self) -> bool {
        false
    }

    /// Release everything `setup` created. Safe to call more than once.
    unsafe fn destroy(&mut self, gl: &glow::Context);
}

/// Scene factory. No GL work happens until [`Scene::setup`].
pub fn build_scene(kind: SceneKind) -> Box<dyn Scene> {
    match kind {
        SceneKind::Triangle => Box::<TriangleScene>::default(),
        SceneKind::Light => Box::<LightScene>::default(),
        SceneKind::Model => Box::<ModelScene>::default(),
        SceneKind::Stencil => Box::<StencilScene>::default(),
        SceneKind::Blending => Box::<BlendingScene>::default(),
        SceneKind::Framebuffer => Box::<FramebufferScene>::default(),
        SceneKind::MirrorFramebuffer => Box::<MirrorFramebufferScene>::default(),
        SceneKind::Cubemap => Box::<CubemapScene>::default(),
        SceneKind::Test => Box::<TestScene>::default(),
    }
}

/// `(key, name, description)` per scene, in menu order.
pub fn scene_catalog() -> Vec<(usize, &'static str, &'static str)> {
    SceneKind::ALL
        .iter()
        .map(|k| (k.index() + 1, k.name(), k.description()))
        .collect()
}
