//! Host glue (policy layer): window, GL context/surface, input and timing.
//!
//! Kept apart from the runtime so scenes never see winit or glutin types.
#![deny(missing_debug_implementations)]

use std::ffi::CString;
use std::num::NonZeroU32;

use glow::HasContext;
use glscene_core::{EngineError, WindowConfig};
use glutin::config::{Config, ConfigTemplateBuilder};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentContext, PossiblyCurrentContext,
    Version,
};
use glutin::display::{Display, GetGlDisplay};
use glutin::prelude::*;
use glutin::surface::{Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface};
use raw_window_handle::{HasRawWindowHandle, RawWindowHandle};
use winit::event_loop::EventLoop;
use winit::window::{CursorGrabMode, Window, WindowBuilder};

pub mod clock;
pub mod input;

pub use clock::FrameClock;
pub use input::{look_offsets, movement_for_key, InputState, KeyLatch};

fn non_zero(v: u32) -> NonZeroU32 {
    NonZeroU32::new(v).unwrap_or(NonZeroU32::MIN)
}

/// A window with a current GL 3.3 core context and a loaded `glow::Context`.
pub struct Host {
    pub window: Window,
    pub gl: glow::Context,
    gl_surface: Surface<WindowSurface>,
    gl_context: PossiblyCurrentContext,
}

impl std::fmt::Debug for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host")
            .field("window", &self.window.id())
            .field("size", &self.size())
            .finish_non_exhaustive()
    }
}

/// Framebuffer the scenes need: RGBA8 color, 24-bit depth and an 8-bit stencil for outlines.
fn config_template() -> ConfigTemplateBuilder {
    ConfigTemplateBuilder::new()
        .with_alpha_size(8)
        .with_depth_size(24)
        .with_stencil_size(8)
        .with_transparency(false)
}

/// Index of the candidate with the most MSAA samples; the earliest wins ties.
pub fn most_samples(samples: impl IntoIterator<Item = u8>) -> Option<usize> {
    samples
        .into_iter()
        .enumerate()
        .fold(None, |best: Option<(usize, u8)>, (i, n)| match best {
            Some((_, m)) if m >= n => best,
            _ => Some((i, n)),
        })
        .map(|(i, _)| i)
}

/// Context versions to try, newest first. `None` lets the driver pick any core profile.
const CONTEXT_VERSIONS: [Option<(u8, u8)>; 2] = [Some((3, 3)), None];

unsafe fn create_context(
    display: &Display,
    config: &Config,
    handle: RawWindowHandle,
) -> Result<NotCurrentContext, EngineError> {
    let mut last_error = None;
    for version in CONTEXT_VERSIONS {
        let api = ContextApi::OpenGl(version.map(|(major, minor)| Version::new(major, minor)));
        let attributes = ContextAttributesBuilder::new()
            .with_profile(GlProfile::Core)
            .with_context_api(api)
            .build(Some(handle));
        match display.create_context(config, &attributes) {
            Ok(context) => return Ok(context),
            Err(e) => {
                tracing::debug!(?version, error = %e, "GL context request refused");
                last_error = Some(e);
            }
        }
    }
    Err(EngineError::GlCreate(format!(
        "create_context: {}",
        last_error.map_or_else(|| "no context version requested".to_string(), |e| e.to_string())
    )))
}

fn swap_interval(vsync: bool) -> SwapInterval {
    if vsync {
        SwapInterval::Wait(NonZeroU32::MIN)
    } else {
        SwapInterval::DontWait
    }
}

impl Host {
    pub fn new(event_loop: &EventLoop<()>, cfg: &WindowConfig) -> Result<Self, EngineError> {
        let window_builder = WindowBuilder::new()
            .with_title(cfg.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                cfg.width as f64,
                cfg.height as f64,
            ));

        let (window, gl_config) = glutin_winit::DisplayBuilder::new()
            .with_window_builder(Some(window_builder))
            .build(event_loop, config_template(), |configs| {
                let configs: Vec<Config> = configs.collect();
                let best = most_samples(configs.iter().map(|c| c.num_samples())).unwrap_or(0);
                // glutin only calls the picker with at least one matching config
                configs.into_iter().nth(best).expect("GL config picker called with no configs")
            })
            .map_err(|e| EngineError::GlCreate(format!("no usable GL config: {e}")))?;
        let window =
            window.ok_or_else(|| EngineError::GlCreate("display builder created no window".into()))?;

        let gl_display = gl_config.display();
        let handle = window.raw_window_handle();
        let (width, height) = {
            let s = window.inner_size();
            (s.width.max(1), s.height.max(1))
        };

        let surface_attributes = SurfaceAttributesBuilder::<WindowSurface>::new().build(
            handle,
            non_zero(width),
            non_zero(height),
        );
        let (context, gl_surface) = unsafe {
            let context = create_context(&gl_display, &gl_config, handle)?;
            let surface = gl_display
                .create_window_surface(&gl_config, &surface_attributes)
                .map_err(|e| EngineError::GlCreate(format!("create_window_surface: {e}")))?;
            (context, surface)
        };
        let gl_context = context
            .make_current(&gl_surface)
            .map_err(|e| EngineError::GlCreate(format!("make_current: {e}")))?;

        if let Err(e) = gl_surface.set_swap_interval(&gl_context, swap_interval(cfg.vsync)) {
            tracing::warn!(error = %e, vsync = cfg.vsync, "swap interval not applied");
        }

        let gl = unsafe {
            glow::Context::from_loader_function(|s| match CString::new(s) {
                Ok(name) => gl_display.get_proc_address(name.as_c_str()) as *const _,
                Err(_) => std::ptr::null(),
            })
        };

        let version = gl.version();
        tracing::info!(
            major = version.major,
            minor = version.minor,
            vendor = %version.vendor_info,
            samples = gl_config.num_samples(),
            width,
            height,
            "GL context ready"
        );

        Ok(Self {
            window,
            gl,
            gl_surface,
            gl_context,
        })
    }

    /// Inner size in physical pixels, each side at least 1.
    pub fn size(&self) -> (u32, u32) {
        let s = self.window.inner_size();
        (s.width.max(1), s.height.max(1))
    }

    pub fn resize(&self, width: u32, height: u32) {
        let (w, h) = (width.max(1), height.max(1));
        self.gl_surface
            .resize(&self.gl_context, non_zero(w), non_zero(h));
        unsafe {
            self.gl.viewport(0, 0, w as i32, h as i32);
        }
    }

    pub fn swap_buffers(&self) -> Result<(), EngineError> {
        self.gl_surface
            .swap_buffers(&self.gl_context)
            .map_err(|e| EngineError::GlCreate(format!("swap_buffers: {e}")))
    }

    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }

    /// Grab and hide the cursor for mouse look, or release it.
    pub fn set_cursor_captured(&self, captured: bool) {
        let grab = if captured {
            self.window
                .set_cursor_grab(CursorGrabMode::Confined)
                .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Locked))
        } else {
            self.window.set_cursor_grab(CursorGrabMode::None)
        };
        if let Err(e) = grab {
            tracing::warn!(error = %e, captured, "cursor grab not applied");
        }
        self.window.set_cursor_visible(!captured);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_most_samples_first_on_ties() {
        assert_eq!(most_samples([0, 4, 2, 4]), Some(1));
        assert_eq!(most_samples([0, 0]), Some(0));
        assert_eq!(most_samples(std::iter::empty()), None);
    }

    #[test]
    fn core_33_is_requested_before_any_version() {
        assert_eq!(CONTEXT_VERSIONS[0], Some((3, 3)));
        assert_eq!(CONTEXT_VERSIONS.last(), Some(&None));
    }

    #[test]
    fn vsync_waits_one_frame() {
        assert!(matches!(swap_interval(true), SwapInterval::Wait(n) if n.get() == 1));
        assert!(matches!(swap_interval(false), SwapInterval::DontWait));
    }
}
