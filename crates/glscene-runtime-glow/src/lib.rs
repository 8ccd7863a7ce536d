//! glscene runtime (glow/OpenGL backend)
//
// This crate contains the GL side of the demo scenes only:
// - compile/link shaders and set uniforms
// - upload meshes, textures, cubemaps and models
// - manage offscreen render targets (FBO + color texture + depth/stencil)
// - release half-built object sets when a setup step fails
//
// It does NOT contain windowing, input, or scene policy.
#![allow(clippy::missing_safety_doc)]
#![deny(missing_debug_implementations)]

use glam::{Mat4, Vec3};
use glow::HasContext;

pub mod mesh;
pub mod model;
pub mod target;
pub mod texture;
pub mod tracker;

pub use glscene_core::EngineError;
pub use mesh::{model_vertex_layout, GpuMesh};
pub use model::GpuModel;
pub use target::{create_render_target, RenderTarget};
pub use texture::{Cubemap, Texture2d, TextureWrap};
pub use tracker::{build_tracked, GlHandle, GlResource, GlTracker};

/// The two programmable stages every scene program has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn gl_enum(self) -> u32 {
        match self {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        }
    }

    /// Wrap a driver info log in the error for this stage.
    pub fn compile_error(self, log: String) -> EngineError {
        match self {
            ShaderStage::Vertex => EngineError::VertexCompile(log),
            ShaderStage::Fragment => EngineError::FragmentCompile(log),
        }
    }
}

unsafe fn compile_stage(
    gl: &glow::Context,
    stage: ShaderStage,
    src: &str,
) -> Result<glow::NativeShader, EngineError> {
    let shader = gl
        .create_shader(stage.gl_enum())
        .map_err(|e| EngineError::GlCreate(format!("create_shader({stage:?}) failed: {e:?}")))?;
    gl.shader_source(shader, src);
    gl.compile_shader(shader);
    if gl.get_shader_compile_status(shader) {
        return Ok(shader);
    }
    let log = gl.get_shader_info_log(shader);
    gl.delete_shader(shader);
    Err(stage.compile_error(log))
}

/// Link compiled stages. The stages stay owned by the caller.
unsafe fn link_stages(
    gl: &glow::Context,
    stages: &[glow::NativeShader],
) -> Result<glow::NativeProgram, EngineError> {
    let program = gl
        .create_program()
        .map_err(|e| EngineError::GlCreate(format!("create_program failed: {e:?}")))?;
    for &stage in stages {
        gl.attach_shader(program, stage);
    }
    gl.link_program(program);
    for &stage in stages {
        gl.detach_shader(program, stage);
    }
    if gl.get_program_link_status(program) {
        return Ok(program);
    }
    let log = gl.get_program_info_log(program);
    gl.delete_program(program);
    Err(EngineError::Link(log))
}

/// Compile both stages and link them. Shader objects never outlive this call.
pub unsafe fn compile_program(
    gl: &glow::Context,
    vert_src: &str,
    frag_src: &str,
) -> Result<glow::NativeProgram, EngineError> {
    let mut stages = Vec::with_capacity(2);
    for (stage, src) in [(ShaderStage::Vertex, vert_src), (ShaderStage::Fragment, frag_src)] {
        match compile_stage(gl, stage, src) {
            Ok(shader) => stages.push(shader),
            Err(e) => {
                for shader in stages {
                    gl.delete_shader(shader);
                }
                return Err(e);
            }
        }
    }

    let linked = link_stages(gl, &stages);
    for shader in stages {
        gl.delete_shader(shader);
    }
    linked
}

/// A linked program plus name-based uniform setters.
///
/// Setters look the location up on every call; uniforms the program does not declare (or that
/// the driver optimised away) are skipped.
#[derive(Debug)]
pub struct ShaderProgram {
    pub program: glow::NativeProgram,
    pub label: String,
}

impl ShaderProgram {
    pub unsafe fn new(
        gl: &glow::Context,
        vert_src: &str,
        frag_src: &str,
        label: &str,
    ) -> Result<Self, EngineError> {
        let program = compile_program(gl, vert_src, frag_src).map_err(|e| {
            tracing::error!(program = label, error = %e, "shader program failed");
            e
        })?;
        tracing::debug!(program = label, "shader program compiled");
        Ok(Self {
            program,
            label: label.to_string(),
        })
    }

    pub unsafe fn use_program(&self, gl: &glow::Context) {
        gl.use_program(Some(self.program));
    }

    unsafe fn location(&self, gl: &glow::Context, name: &str) -> Option<glow::NativeUniformLocation> {
        gl.get_uniform_location(self.program, name)
    }

    pub unsafe fn set_bool(&self, gl: &glow::Context, name: &str, value: bool) {
        self.set_int(gl, name, value as i32);
    }

    pub unsafe fn set_int(&self, gl: &glow::Context, name: &str, value: i32) {
        if let Some(loc) = self.location(gl, name) {
            gl.uniform_1_i32(Some(&loc), value);
        }
    }

    pub unsafe fn set_float(&self, gl: &glow::Context, name: &str, value: f32) {
        if let Some(loc) = self.location(gl, name) {
            gl.uniform_1_f32(Some(&loc), value);
        }
    }

    pub unsafe fn set_vec3(&self, gl: &glow::Context, name: &str, value: Vec3) {
        if let Some(loc) = self.location(gl, name) {
            gl.uniform_3_f32(Some(&loc), value.x, value.y, value.z);
        }
    }

    pub unsafe fn set_mat4(&self, gl: &glow::Context, name: &str, value: &Mat4) {
        if let Some(loc) = self.location(gl, name) {
            gl.uniform_matrix_4_f32_slice(Some(&loc), false, &value.to_cols_array());
        }
    }

    /// Sets `model`, `view` and `projection`.
    pub unsafe fn set_mvp(&self, gl: &glow::Context, model: &Mat4, view: &Mat4, projection: &Mat4) {
        self.set_mat4(gl, "model", model);
        self.set_mat4(gl, "view", view);
        self.set_mat4(gl, "projection", projection);
    }

    pub unsafe fn destroy(&mut self, gl: &glow::Context) {
        gl.delete_program(self.program);
    }
}

// -------------------------------------------------------------------------------------------------
// Per-frame host data + state baseline
// -------------------------------------------------------------------------------------------------

/// Per-frame context supplied by the host.
#[derive(Clone, Copy, Debug)]
pub struct FrameCtx {
    pub width: i32,
    pub height: i32,
    /// Seconds since the viewer started.
    pub time: f32,
    pub frame: u64,
}

impl FrameCtx {
    pub fn aspect(&self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }
}

/// Return fixed-function state to the baseline every scene's `setup` assumes.
pub unsafe fn reset_state(gl: &glow::Context) {
    gl.bind_framebuffer(glow::FRAMEBUFFER, None);
    gl.bind_vertex_array(None);
    gl.use_program(None);
    gl.active_texture(glow::TEXTURE0);

    gl.disable(glow::DEPTH_TEST);
    gl.depth_func(glow::LESS);
    gl.depth_mask(true);

    gl.disable(glow::STENCIL_TEST);
    gl.stencil_mask(0xFF);
    gl.stencil_func(glow::ALWAYS, 0, 0xFF);
    gl.stencil_op(glow::KEEP, glow::KEEP, glow::KEEP);

    gl.disable(glow::BLEND);
    gl.blend_func(glow::ONE, glow::ZERO);
    gl.disable(glow::CULL_FACE);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_errors_name_their_stage() {
        let err = ShaderStage::Vertex.compile_error("0:1: syntax error".into());
        assert!(matches!(err, EngineError::VertexCompile(ref log) if log == "0:1: syntax error"));
        assert!(matches!(
            ShaderStage::Fragment.compile_error(String::new()),
            EngineError::FragmentCompile(_)
        ));
        assert_eq!(ShaderStage::Vertex.gl_enum(), glow::VERTEX_SHADER);
        assert_eq!(ShaderStage::Fragment.gl_enum(), glow::FRAGMENT_SHADER);
    }

    #[test]
    fn aspect_tolerates_zero_height() {
        let ctx = FrameCtx {
            width: 800,
            height: 0,
            time: 0.0,
            frame: 0,
        };
        assert_eq!(ctx.aspect(), 800.0);

        let ctx = FrameCtx { height: 600, ..ctx };
        assert!((ctx.aspect() - 4.0 / 3.0).abs() < 1e-6);
    }
}
