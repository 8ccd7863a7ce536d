use glow::HasContext;
use glscene_core::{Camera, SceneKind};
use glscene_geometry as geometry;
use glscene_runtime_glow::{
    build_tracked, create_render_target, EngineError, FrameCtx, GpuMesh, RenderTarget,
    ShaderProgram,
};

use crate::props::Props;
use crate::shaders::{SCREEN_FRAG, SCREEN_VERT, TEXTURED_FRAG, TEXTURED_VERT};
use crate::{Scene, SceneContext, DEFAULT_CLEAR_COLOR};

/// Draws `target`'s colour texture through `quad` with the screen shader. Depth test is left
/// disabled.
pub(crate) unsafe fn composite(
    gl: &glow::Context,
    screen: &ShaderProgram,
    quad: &GpuMesh,
    target: &RenderTarget,
) {
    gl.disable(glow::DEPTH_TEST);
    screen.use_program(gl);
    gl.active_texture(glow::TEXTURE0);
    gl.bind_texture(glow::TEXTURE_2D, Some(target.tex));
    quad.draw(gl);
}

/// Bind `target` and clear it for a fresh scene pass.
pub(crate) unsafe fn begin_offscreen(gl: &glow::Context, target: &RenderTarget) {
    target.bind(gl);
    gl.enable(glow::DEPTH_TEST);
    let [r, g, b, a] = DEFAULT_CLEAR_COLOR;
    gl.clear_color(r, g, b, a);
    gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT | glow::STENCIL_BUFFER_BIT);
}

/// Bind the default framebuffer with a full-window viewport.
pub(crate) unsafe fn end_offscreen(gl: &glow::Context, frame: FrameCtx) {
    gl.bind_framebuffer(glow::FRAMEBUFFER, None);
    gl.viewport(0, 0, frame.width.max(1), frame.height.max(1));
}

#[derive(Debug)]
struct Gpu {
    shader: ShaderProgram,
    screen: ShaderProgram,
    props: Props,
    quad: GpuMesh,
    target: RenderTarget,
}

/// Scene rendered into a window-sized target, then shown on a fullscreen quad.
#[derive(Debug, Default)]
pub struct FramebufferScene {
    gpu: Option<Gpu>,
}

impl Scene for FramebufferScene {
    fn kind(&self) -> SceneKind {
        SceneKind::Framebuffer
    }

    unsafe fn setup(&mut self, gl: &glow::Context, ctx: &SceneContext) -> Result<(), EngineError> {
        let gpu = build_tracked(gl, |created| -> Result<_, EngineError> {
            let shader = created.track(ShaderProgram::new(
                gl,
                TEXTURED_VERT,
                TEXTURED_FRAG,
                "textured",
            )?);
            let screen = created.track(ShaderProgram::new(gl, SCREEN_VERT, SCREEN_FRAG, "screen")?);
            shader.use_program(gl);
            shader.set_int(gl, "texture1", 0);
            screen.use_program(gl);
            screen.set_int(gl, "screenTexture", 0);

            Ok(Gpu {
                shader,
                screen,
                props: created.track(Props::new(gl, ctx, "container.jpg", false)?),
                quad: created.track(GpuMesh::upload(gl, &geometry::screen_quad())?),
                target: created.track(create_render_target(gl, ctx.width, ctx.height)?),
            })
        })?;
        self.gpu = Some(gpu);
        gl.enable(glow::DEPTH_TEST);
        Ok(())
    }

    unsafe fn draw(&mut self, gl: &glow::Context, camera: &Camera, frame: FrameCtx) {
        let Some(gpu) = &self.gpu else {
            return;
        };
        begin_offscreen(gl, &gpu.target);

        gpu.shader.use_program(gl);
        gpu.shader.set_mat4(gl, "view", &camera.view_matrix());
        gpu.shader.set_mat4(gl, "projection", &camera.projection(frame.aspect()));
        gpu.props.draw_cubes(gl, &gpu.shader, 1.0);
        gpu.props.draw_floor(gl, &gpu.shader);

        end_offscreen(gl, frame);
        composite(gl, &gpu.screen, &gpu.quad, &gpu.target);
    }

    unsafe fn resize(&mut self, gl: &glow::Context, width: i32, height: i32) -> Result<(), EngineError> {
        if let Some(gpu) = &mut self.gpu {
            gpu.target.resize(gl, width, height);
        }
        Ok(())
    }

    unsafe fn destroy(&mut self, gl: &glow::Context) {
        if let Some(mut gpu) = self.gpu.take() {
            gpu.shader.destroy(gl);
            gpu.screen.destroy(gl);
            gpu.props.destroy(gl);
            gpu.quad.destroy(gl);
            gpu.target.destroy(gl);
        }
    }
}
