use glam::Mat4;
use glow::HasContext;
use glscene_core::{Camera, SceneKind};
use glscene_geometry as geometry;
use glscene_runtime_glow::{
    build_tracked, create_render_target, EngineError, FrameCtx, GpuMesh, RenderTarget,
    ShaderProgram,
};

use crate::framebuffer::{begin_offscreen, composite, end_offscreen};
use crate::props::{Props, MARBLE_TEXTURE};
use crate::shaders::{SCREEN_FRAG, SCREEN_VERT, TEXTURED_FRAG, TEXTURED_VERT};
use crate::{Scene, SceneContext};

#[derive(Debug)]
struct Gpu {
    shader: ShaderProgram,
    screen: ShaderProgram,
    props: Props,
    screen_quad: GpuMesh,
    mirror_quad: GpuMesh,
    main: RenderTarget,
    mirror: RenderTarget,
}

impl Gpu {
    unsafe fn draw_world(&self, gl: &glow::Context, view: &Mat4, projection: &Mat4, camera: &Camera) {
        self.shader.use_program(gl);
        self.shader.set_mat4(gl, "view", view);
        self.shader.set_mat4(gl, "projection", projection);
        self.props.draw_floor(gl, &self.shader);
        self.props.draw_cubes(gl, &self.shader, 1.0);
        self.props.draw_windows(gl, &self.shader, camera.position);
    }
}

/// The blending layout seen twice: forward into the main target, backward into a rear-view
/// target shown in a strip at the top of the screen.
#[derive(Debug, Default)]
pub struct MirrorFramebufferScene {
    gpu: Option<Gpu>,
}

impl Scene for MirrorFramebufferScene {
    fn kind(&self) -> SceneKind {
        SceneKind::MirrorFramebuffer
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
                props: created.track(Props::new(gl, ctx, MARBLE_TEXTURE, true)?),
                screen_quad: created.track(GpuMesh::upload(gl, &geometry::screen_quad())?),
                mirror_quad: created.track(GpuMesh::upload(gl, &geometry::mirror_quad())?),
                main: created.track(create_render_target(gl, ctx.width, ctx.height)?),
                mirror: created.track(create_render_target(gl, ctx.width, ctx.height)?),
            })
        })?;
        self.gpu = Some(gpu);

        gl.enable(glow::DEPTH_TEST);
        gl.depth_func(glow::LESS);
        gl.enable(glow::BLEND);
        gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
        Ok(())
    }

    unsafe fn draw(&mut self, gl: &glow::Context, camera: &Camera, frame: FrameCtx) {
        let Some(gpu) = &self.gpu else {
            return;
        };
        let projection = camera.projection(frame.aspect());

        begin_offscreen(gl, &gpu.main);
        gpu.draw_world(gl, &camera.view_matrix(), &projection, camera);

        let rear = camera.mirrored();
        begin_offscreen(gl, &gpu.mirror);
        gpu.draw_world(gl, &rear.view_matrix(), &projection, &rear);

        end_offscreen(gl, frame);
        composite(gl, &gpu.screen, &gpu.screen_quad, &gpu.main);
        composite(gl, &gpu.screen, &gpu.mirror_quad, &gpu.mirror);
    }

    unsafe fn resize(&mut self, gl: &glow::Context, width: i32, height: i32) -> Result<(), EngineError> {
        if let Some(gpu) = &mut self.gpu {
            gpu.main.resize(gl, width, height);
            gpu.mirror.resize(gl, width, height);
        }
        Ok(())
    }

    unsafe fn destroy(&mut self, gl: &glow::Context) {
        if let Some(mut gpu) = self.gpu.take() {
            gpu.shader.destroy(gl);
            gpu.screen.destroy(gl);
            gpu.props.destroy(gl);
            gpu.screen_quad.destroy(gl);
            gpu.mirror_quad.destroy(gl);
            gpu.main.destroy(gl);
            gpu.mirror.destroy(gl);
        }
    }
}
