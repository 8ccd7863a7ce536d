use glow::HasContext;
use glscene_core::{Camera, SceneKind};
use glscene_runtime_glow::{build_tracked, EngineError, FrameCtx, ShaderProgram};

use crate::props::{Props, MARBLE_TEXTURE};
use crate::shaders::{SINGLE_COLOR_FRAG, TEXTURED_FRAG, TEXTURED_VERT};
use crate::{Scene, SceneContext};

pub(crate) const OUTLINE_SCALE: f32 = 1.1;

#[derive(Debug)]
struct Gpu {
    shader: ShaderProgram,
    outline: ShaderProgram,
    props: Props,
}

/// Object outlines: cubes write stencil 1, then slightly larger copies draw where it isn't 1.
#[derive(Debug, Default)]
pub struct StencilScene {
    gpu: Option<Gpu>,
}

impl Scene for StencilScene {
    fn kind(&self) -> SceneKind {
        SceneKind::Stencil
    }

    unsafe fn setup(&mut self, gl: &glow::Context, ctx: &SceneContext) -> Result<(), EngineError> {
        let gpu = build_tracked(gl, |created| -> Result<_, EngineError> {
            let shader = created.track(ShaderProgram::new(
                gl,
                TEXTURED_VERT,
                TEXTURED_FRAG,
                "textured",
            )?);
            let outline = created.track(ShaderProgram::new(
                gl,
                TEXTURED_VERT,
                SINGLE_COLOR_FRAG,
                "single_color",
            )?);
            shader.use_program(gl);
            shader.set_int(gl, "texture1", 0);

            Ok(Gpu {
                shader,
                outline,
                props: created.track(Props::new(gl, ctx, MARBLE_TEXTURE, false)?),
            })
        })?;
        self.gpu = Some(gpu);

        gl.enable(glow::DEPTH_TEST);
        gl.depth_func(glow::LESS);
        gl.enable(glow::STENCIL_TEST);
        gl.stencil_func(glow::NOTEQUAL, 1, 0xFF);
        gl.stencil_op(glow::KEEP, glow::KEEP, glow::REPLACE);
        Ok(())
    }

    unsafe fn draw(&mut self, gl: &glow::Context, camera: &Camera, frame: FrameCtx) {
        let Some(gpu) = &self.gpu else {
            return;
        };
        let view = camera.view_matrix();
        let projection = camera.projection(frame.aspect());

        gpu.outline.use_program(gl);
        gpu.outline.set_mat4(gl, "view", &view);
        gpu.outline.set_mat4(gl, "projection", &projection);

        gpu.shader.use_program(gl);
        gpu.shader.set_mat4(gl, "view", &view);
        gpu.shader.set_mat4(gl, "projection", &projection);

        // floor leaves the stencil buffer untouched
        gl.stencil_mask(0x00);
        gpu.props.draw_floor(gl, &gpu.shader);

        gl.stencil_func(glow::ALWAYS, 1, 0xFF);
        gl.stencil_mask(0xFF);
        gpu.props.draw_cubes(gl, &gpu.shader, 1.0);

        gl.stencil_func(glow::NOTEQUAL, 1, 0xFF);
        gl.stencil_mask(0x00);
        gl.disable(glow::DEPTH_TEST);
        gpu.outline.use_program(gl);
        gpu.props.draw_cubes(gl, &gpu.outline, OUTLINE_SCALE);

        // the viewer's stencil clear needs the mask back at 0xFF
        gl.stencil_mask(0xFF);
        gl.stencil_func(glow::ALWAYS, 0, 0xFF);
        gl.enable(glow::DEPTH_TEST);
    }

    unsafe fn destroy(&mut self, gl: &glow::Context) {
        if let Some(mut gpu) = self.gpu.take() {
            gpu.shader.destroy(gl);
            gpu.outline.destroy(gl);
            gpu.props.destroy(gl);
        }
    }
}
