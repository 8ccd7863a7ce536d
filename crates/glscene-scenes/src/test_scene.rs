use glam::{Mat4, Vec3};
use glow::HasContext;
use glscene_core::{Camera, SceneKind};
use glscene_geometry as geometry;
use glscene_runtime_glow::{build_tracked, EngineError, FrameCtx, GpuMesh, ShaderProgram};

use crate::props::CUBE_POSITIONS;
use crate::shaders::{FLAT_FRAG, FLAT_VERT};
use crate::{Scene, SceneContext};

const OBJECT_COLOR: Vec3 = Vec3::new(1.0, 0.0, 0.0);

#[derive(Debug)]
struct Gpu {
    shader: ShaderProgram,
    cube: GpuMesh,
}

/// Scratch scene: the two shared cubes in a flat colour.
#[derive(Debug, Default)]
pub struct TestScene {
    gpu: Option<Gpu>,
}

impl Scene for TestScene {
    fn kind(&self) -> SceneKind {
        SceneKind::Test
    }

    unsafe fn setup(&mut self, gl: &glow::Context, _ctx: &SceneContext) -> Result<(), EngineError> {
        let gpu = build_tracked(gl, |created| -> Result<_, EngineError> {
            let shader = created.track(ShaderProgram::new(gl, FLAT_VERT, FLAT_FRAG, "test")?);
            shader.use_program(gl);
            shader.set_vec3(gl, "objectColor", OBJECT_COLOR);

            Ok(Gpu {
                shader,
                cube: created.track(GpuMesh::upload(gl, &geometry::cube_no_normal())?),
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
        let view = camera.view_matrix();
        let projection = camera.projection(frame.aspect());
        gpu.shader.use_program(gl);
        for pos in CUBE_POSITIONS {
            gpu.shader.set_mvp(gl, &Mat4::from_translation(pos), &view, &projection);
            gpu.cube.draw(gl);
        }
    }

    unsafe fn destroy(&mut self, gl: &glow::Context) {
        if let Some(mut gpu) = self.gpu.take() {
            gpu.shader.destroy(gl);
            gpu.cube.destroy(gl);
        }
    }
}
