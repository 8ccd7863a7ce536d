use glscene_core::{Camera, SceneKind};
use glscene_geometry as geometry;
use glscene_runtime_glow::{build_tracked, EngineError, FrameCtx, GpuMesh, ShaderProgram};

use crate::shaders::{TRIANGLE_FRAG, TRIANGLE_VERT};
use crate::{Scene, SceneContext};

#[derive(Debug)]
struct Gpu {
    shader: ShaderProgram,
    mesh: GpuMesh,
}

/// Clip-space triangle with per-vertex colours. Ignores the camera.
#[derive(Debug, Default)]
pub struct TriangleScene {
    gpu: Option<Gpu>,
}

impl Scene for TriangleScene {
    fn kind(&self) -> SceneKind {
        SceneKind::Triangle
    }

    fn clear_color(&self) -> [f32; 4] {
        [0.2, 0.3, 0.3, 1.0]
    }

    unsafe fn setup(&mut self, gl: &glow::Context, _ctx: &SceneContext) -> Result<(), EngineError> {
        let gpu = build_tracked(gl, |created| -> Result<_, EngineError> {
            Ok(Gpu {
                shader: created.track(ShaderProgram::new(
                    gl,
                    TRIANGLE_VERT,
                    TRIANGLE_FRAG,
                    "triangle",
                )?),
                mesh: created.track(GpuMesh::upload(gl, &geometry::triangle())?),
            })
        })?;
        self.gpu = Some(gpu);
        Ok(())
    }

    unsafe fn draw(&mut self, gl: &glow::Context, _camera: &Camera, _frame: FrameCtx) {
        let Some(gpu) = &self.gpu else {
            return;
        };
        gpu.shader.use_program(gl);
        gpu.mesh.draw(gl);
    }

    unsafe fn destroy(&mut self, gl: &glow::Context) {
        if let Some(mut gpu) = self.gpu.take() {
            gpu.shader.destroy(gl);
            gpu.mesh.destroy(gl);
        }
    }
}
