//! Bookkeeping for GL objects created while a multi-step setup is still in progress.
//!
//! Every object handed to [`GlTracker::track`] is remembered; if a later step fails,
//! [`GlTracker::release`] deletes all of them in reverse creation order. On success the tracker
//! is simply dropped and ownership stays with the built value.

use glow::HasContext;

use crate::{Cubemap, RenderTarget, ShaderProgram, Texture2d};

/// One raw GL object name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlHandle {
    Program(glow::NativeProgram),
    VertexArray(glow::NativeVertexArray),
    Buffer(glow::NativeBuffer),
    Texture(glow::NativeTexture),
    Framebuffer(glow::NativeFramebuffer),
    Renderbuffer(glow::NativeRenderbuffer),
}

impl GlHandle {
    pub unsafe fn delete(self, gl: &glow::Context) {
        match self {
            GlHandle::Program(p) => gl.delete_program(p),
            GlHandle::VertexArray(v) => gl.delete_vertex_array(v),
            GlHandle::Buffer(b) => gl.delete_buffer(b),
            GlHandle::Texture(t) => gl.delete_texture(t),
            GlHandle::Framebuffer(f) => gl.delete_framebuffer(f),
            GlHandle::Renderbuffer(r) => gl.delete_renderbuffer(r),
        }
    }
}

/// Anything that owns GL objects.
pub trait GlResource {
    fn handles(&self) -> Vec<GlHandle>;
}

#[derive(Debug, Default)]
pub struct GlTracker {
    handles: Vec<GlHandle>,
}

impl GlTracker {
    /// Remember `item`'s objects and hand it back.
    pub fn track<T: GlResource>(&mut self, item: T) -> T {
        self.handles.extend(item.handles());
        item
    }

    pub fn push(&mut self, handle: GlHandle) {
        self.handles.push(handle);
    }

    pub fn handles(&self) -> &[GlHandle] {
        &self.handles
    }

    /// Delete everything tracked so far, newest first.
    pub unsafe fn release(self, gl: &glow::Context) {
        if !self.handles.is_empty() {
            tracing::debug!(objects = self.handles.len(), "releasing partially built GL objects");
        }
        for handle in self.handles.into_iter().rev() {
            handle.delete(gl);
        }
    }
}

/// Run `build`, releasing whatever it tracked if it fails.
pub unsafe fn build_tracked<T, E>(
    gl: &glow::Context,
    build: impl FnOnce(&mut GlTracker) -> Result<T, E>,
) -> Result<T, E> {
    let mut tracker = GlTracker::default();
    match build(&mut tracker) {
        Ok(value) => Ok(value),
        Err(e) => {
            tracker.release(gl);
            Err(e)
        }
    }
}

impl<T: GlResource> GlResource for Option<T> {
    fn handles(&self) -> Vec<GlHandle> {
        self.as_ref().map(GlResource::handles).unwrap_or_default()
    }
}

impl GlResource for ShaderProgram {
    fn handles(&self) -> Vec<GlHandle> {
        vec![GlHandle::Program(self.program)]
    }
}

impl GlResource for Texture2d {
    fn handles(&self) -> Vec<GlHandle> {
        vec![GlHandle::Texture(self.tex)]
    }
}

impl GlResource for Cubemap {
    fn handles(&self) -> Vec<GlHandle> {
        vec![GlHandle::Texture(self.tex)]
    }
}

impl GlResource for RenderTarget {
    fn handles(&self) -> Vec<GlHandle> {
        vec![
            GlHandle::Framebuffer(self.fbo),
            GlHandle::Texture(self.tex),
            GlHandle::Renderbuffer(self.rbo),
        ]
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use super::*;

    fn id(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    #[test]
    fn tracks_every_object_of_a_render_target() {
        let target = RenderTarget {
            fbo: glow::NativeFramebuffer(id(1)),
            tex: glow::NativeTexture(id(2)),
            rbo: glow::NativeRenderbuffer(id(3)),
            w: 8,
            h: 8,
        };
        let mut tracker = GlTracker::default();
        let program = tracker.track(ShaderProgram {
            program: glow::NativeProgram(id(4)),
            label: "lit".into(),
        });
        let target = tracker.track(target);

        assert_eq!(program.label, "lit");
        assert_eq!(target.w, 8);
        assert_eq!(
            tracker.handles(),
            &[
                GlHandle::Program(glow::NativeProgram(id(4))),
                GlHandle::Framebuffer(glow::NativeFramebuffer(id(1))),
                GlHandle::Texture(glow::NativeTexture(id(2))),
                GlHandle::Renderbuffer(glow::NativeRenderbuffer(id(3))),
            ]
        );
    }

    #[test]
    fn absent_optional_resources_track_nothing() {
        let mut tracker = GlTracker::default();
        let none: Option<Texture2d> = tracker.track(None);
        assert!(none.is_none());
        tracker.track(Some(Cubemap {
            tex: glow::NativeTexture(id(9)),
        }));
        assert_eq!(tracker.handles(), &[GlHandle::Texture(glow::NativeTexture(id(9)))]);
    }
}
