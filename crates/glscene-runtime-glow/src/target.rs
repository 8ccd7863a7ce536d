use glow::HasContext;

use crate::tracker::{build_tracked, GlHandle};
use crate::EngineError;

/// Offscreen render target (FBO + color texture + depth/stencil renderbuffer).
#[derive(Debug)]
pub struct RenderTarget {
    pub fbo: glow::NativeFramebuffer,
    pub tex: glow::NativeTexture,
    pub rbo: glow::NativeRenderbuffer,
    pub w: i32,
    pub h: i32,
}

impl RenderTarget {
    /// Reallocate storage at the new size. Keeps the same object ids.
    pub unsafe fn resize(&mut self, gl: &glow::Context, w: i32, h: i32) {
        self.w = w.max(1);
        self.h = h.max(1);
        alloc_storage(gl, self.tex, self.rbo, self.w, self.h);
    }

    /// Bind for drawing and set the viewport to the target size.
    pub unsafe fn bind(&self, gl: &glow::Context) {
        gl.bind_framebuffer(glow::FRAMEBUFFER, Some(self.fbo));
        gl.viewport(0, 0, self.w, self.h);
    }

    pub unsafe fn destroy(&mut self, gl: &glow::Context) {
        gl.delete_framebuffer(self.fbo);
        gl.delete_texture(self.tex);
        gl.delete_renderbuffer(self.rbo);
    }
}

unsafe fn alloc_storage(
    gl: &glow::Context,
    tex: glow::NativeTexture,
    rbo: glow::NativeRenderbuffer,
    w: i32,
    h: i32,
) {
    gl.bind_texture(glow::TEXTURE_2D, Some(tex));
    gl.tex_image_2d(
        glow::TEXTURE_2D,
        0,
        glow::RGBA8 as i32,
        w,
        h,
        0,
        glow::RGBA,
        glow::UNSIGNED_BYTE,
        None,
    );
    gl.bind_texture(glow::TEXTURE_2D, None);

    gl.bind_renderbuffer(glow::RENDERBUFFER, Some(rbo));
    gl.renderbuffer_storage(glow::RENDERBUFFER, glow::DEPTH24_STENCIL8, w, h);
    gl.bind_renderbuffer(glow::RENDERBUFFER, None);
}

pub unsafe fn create_render_target(
    gl: &glow::Context,
    w: i32,
    h: i32,
) -> Result<RenderTarget, EngineError> {
    let (fbo, tex, rbo) = build_tracked(gl, |created| -> Result<_, EngineError> {
        let fbo = gl
            .create_framebuffer()
            .map_err(|e| EngineError::GlCreate(format!("create_framebuffer failed: {e:?}")))?;
        created.push(GlHandle::Framebuffer(fbo));
        let tex = gl
            .create_texture()
            .map_err(|e| EngineError::GlCreate(format!("create_texture failed: {e:?}")))?;
        created.push(GlHandle::Texture(tex));
        let rbo = gl
            .create_renderbuffer()
            .map_err(|e| EngineError::GlCreate(format!("create_renderbuffer failed: {e:?}")))?;
        Ok((fbo, tex, rbo))
    })?;

    gl.bind_texture(glow::TEXTURE_2D, Some(tex));
    gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, glow::LINEAR as i32);
    gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);
    gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE as i32);
    gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::CLAMP_TO_EDGE as i32);

    let ww = w.max(1);
    let hh = h.max(1);
    alloc_storage(gl, tex, rbo, ww, hh);

    gl.bind_framebuffer(glow::FRAMEBUFFER, Some(fbo));
    gl.framebuffer_texture_2d(
        glow::FRAMEBUFFER,
        glow::COLOR_ATTACHMENT0,
        glow::TEXTURE_2D,
        Some(tex),
        0,
    );
    gl.framebuffer_renderbuffer(
        glow::FRAMEBUFFER,
        glow::DEPTH_STENCIL_ATTACHMENT,
        glow::RENDERBUFFER,
        Some(rbo),
    );

    let status = gl.check_framebuffer_status(glow::FRAMEBUFFER);
    if status != glow::FRAMEBUFFER_COMPLETE {
        gl.bind_framebuffer(glow::FRAMEBUFFER, None);
        gl.delete_framebuffer(fbo);
        gl.delete_texture(tex);
        gl.delete_renderbuffer(rbo);
        return Err(EngineError::GlCreate(format!(
            "framebuffer incomplete: 0x{status:x}"
        )));
    }

    gl.bind_framebuffer(glow::FRAMEBUFFER, None);
    tracing::debug!(width = ww, height = hh, "render target created");

    Ok(RenderTarget {
        fbo,
        tex,
        rbo,
        w: ww,
        h: hh,
    })
}
