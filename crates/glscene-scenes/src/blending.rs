use glow::HasContext;
use glscene_core::{Camera, SceneKind};
use glscene_runtime_glow::{build_tracked, EngineError, FrameCtx, ShaderProgram};

use crate::props::{Props, MARBLE_TEXTURE};
use crate::shaders::{TEXTURED_FRAG, TEXTURED_VERT};
use crate::{Scene, SceneContext};

#[derive(Debug)]
struct Gpu {
    shader: ShaderProgram,
    props: Props,
}

/// Semi-transparent windows composited back-to-front over opaque geometry.
#[derive(Debug, Default)]
pub struct BlendingScene {
    gpu: Option<Gpu>,
}

impl Scene for BlendingScene {
    fn kind(&self) -> SceneKind {
        SceneKind::Blending
    }

    unsafe fn setup(&mut self, gl: &glow::Context, ctx: &SceneContext) -> Result<(), EngineError> {
        let gpu = build_tracked(gl, |created| -> Result<_, EngineError> {
            let shader = created.track(ShaderProgram::new(
                gl,
                TEXTURED_VERT,
                TEXTURED_FRAG,
                "textured",
            )?);
            shader.use_program(gl);
            shader.set_int(gl, "texture1", 0);

            Ok(Gpu {
                shader,
                props: created.track(Props::new(gl, ctx, MARBLE_TEXTURE, true)?),
            })
        })?;
        self.gpu = Some(gpu);

        gl.enable(glow::DEPTH_TEST);
        gl.enable(glow::BLEND);
        gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
        Ok(())
    }

    unsafe fn draw(&mut self, gl: &glow::Context, camera: &Camera, frame: FrameCtx) {
        let Some(gpu) = &self.gpu else {
            return;
        };
        gpu.shader.use_program(gl);
        gpu.shader.set_mat4(gl, "view", &camera.view_matrix());
        gpu.shader.set_mat4(gl, "projection", &camera.projection(frame.aspect()));

        gpu.props.draw_floor(gl, &gpu.shader);
        gpu.props.draw_cubes(gl, &gpu.shader, 1.0);
        gpu.props.draw_windows(gl, &gpu.shader, camera.position);
    }

    unsafe fn destroy(&mut self, gl: &glow::Context) {
        if let Some(mut gpu) = self.gpu.take() {
            gpu.shader.destroy(gl);
            gpu.props.destroy(gl);
        }
    }
}
