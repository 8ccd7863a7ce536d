use glam::{Mat4, Vec3};
use glow::HasContext;
use glscene_core::{Camera, SceneKind};
use glscene_geometry as geometry;
use glscene_runtime_glow::{
    build_tracked, create_render_target, Cubemap, EngineError, FrameCtx, GpuMesh, RenderTarget,
    ShaderProgram,
};

use crate::framebuffer::{begin_offscreen, composite, end_offscreen};
use crate::props::CUBE_POSITIONS;
use crate::shaders::{
    ENVIRO_MAPPING_FRAG, ENVIRO_MAPPING_VERT, SCREEN_FRAG, SCREEN_VERT, SKYBOX_FRAG, SKYBOX_VERT,
};
use crate::{Scene, SceneContext};

#[derive(Debug)]
struct Gpu {
    reflect: ShaderProgram,
    skybox: ShaderProgram,
    screen: ShaderProgram,
    cube: GpuMesh,
    sky_cube: GpuMesh,
    screen_quad: GpuMesh,
    cubemap: Cubemap,
    target: RenderTarget,
}

/// Skybox plus two cubes reflecting it. Optionally routed through an offscreen target.
#[derive(Debug, Default)]
pub struct CubemapScene {
    gpu: Option<Gpu>,
    offscreen: bool,
}

impl Scene for CubemapScene {
    fn kind(&self) -> SceneKind {
        SceneKind::Cubemap
    }

    unsafe fn setup(&mut self, gl: &glow::Context, ctx: &SceneContext) -> Result<(), EngineError> {
        let gpu = build_tracked(gl, |created| -> Result<_, EngineError> {
            let reflect = created.track(ShaderProgram::new(
                gl,
                ENVIRO_MAPPING_VERT,
                ENVIRO_MAPPING_FRAG,
                "enviro_mapping",
            )?);
            let skybox = created.track(ShaderProgram::new(gl, SKYBOX_VERT, SKYBOX_FRAG, "skybox")?);
            let screen = created.track(ShaderProgram::new(gl, SCREEN_VERT, SCREEN_FRAG, "screen")?);
            reflect.use_program(gl);
            reflect.set_int(gl, "skybox", 0);
            skybox.use_program(gl);
            skybox.set_int(gl, "skybox", 0);
            screen.use_program(gl);
            screen.set_int(gl, "screenTexture", 0);

            Ok(Gpu {
                reflect,
                skybox,
                screen,
                cube: created.track(GpuMesh::upload(gl, &geometry::cube_with_normals())?),
                sky_cube: created.track(GpuMesh::upload(gl, &geometry::cube_no_texture())?),
                screen_quad: created.track(GpuMesh::upload(gl, &geometry::screen_quad())?),
                cubemap: created.track(Cubemap::load(gl, &ctx.assets.skybox_faces())?),
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
        if self.offscreen {
            begin_offscreen(gl, &gpu.target);
        } else {
            gl.enable(glow::DEPTH_TEST);
        }

        let view = camera.view_matrix();
        let projection = camera.projection(frame.aspect());
        gpu.cubemap.bind(gl, 0);

        gpu.reflect.use_program(gl);
        gpu.reflect.set_vec3(gl, "cameraPos", camera.position);
        gpu.reflect.set_mat4(gl, "view", &view);
        gpu.reflect.set_mat4(gl, "projection", &projection);
        for pos in CUBE_POSITIONS {
            gpu.reflect.set_mat4(gl, "model", &Mat4::from_translation(pos));
            gpu.cube.draw(gl);
        }

        // skybox last: it sits at depth 1.0, so LEQUAL lets it fill only the untouched pixels
        gl.depth_func(glow::LEQUAL);
        gpu.skybox.use_program(gl);
        gpu.skybox.set_mat4(gl, "view", &camera.skybox_view());
        gpu.skybox.set_mat4(gl, "projection", &projection);
        gpu.sky_cube.draw(gl);
        gl.depth_func(glow::LESS);

        if self.offscreen {
            end_offscreen(gl, frame);
            composite(gl, &gpu.screen, &gpu.screen_quad, &gpu.target);
        }
    }

    unsafe fn resize(&mut self, gl: &glow::Context, width: i32, height: i32) -> Result<(), EngineError> {
        if let Some(gpu) = &mut self.gpu {
            gpu.target.resize(gl, width, height);
        }
        Ok(())
    }

    fn toggle_offscreen(&mut self) -> bool {
        self.offscreen = !self.offscreen;
        self.offscreen
    }

    unsafe fn destroy(&mut self, gl: &glow::Context) {
        if let Some(mut gpu) = self.gpu.take() {
            gpu.reflect.destroy(gl);
            gpu.skybox.destroy(gl);
            gpu.screen.destroy(gl);
            gpu.cube.destroy(gl);
            gpu.sky_cube.destroy(gl);
            gpu.screen_quad.destroy(gl);
            gpu.cubemap.destroy(gl);
            gpu.target.destroy(gl);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skybox_view_ignores_camera_position() {
        let near = Camera::new(Vec3::ZERO);
        let far = Camera::new(Vec3::new(50.0, -3.0, 12.0));
        assert!(near.skybox_view().abs_diff_eq(far.skybox_view(), 1e-6));
        assert!(!near.view_matrix().abs_diff_eq(far.view_matrix(), 1e-6));
    }
}
