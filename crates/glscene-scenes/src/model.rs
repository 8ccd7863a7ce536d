use glam::Mat4;
use glow::HasContext;
use glscene_assets::load_obj;
use glscene_core::{Camera, SceneKind};
use glscene_runtime_glow::{build_tracked, EngineError, FrameCtx, GpuModel, ShaderProgram};

use crate::lighting;
use crate::shaders::{LIT_FRAG, LIT_VERT};
use crate::{Scene, SceneContext};

pub(crate) const MODEL_PATH: &str = "backpack/backpack.obj";

#[derive(Debug)]
struct Gpu {
    shader: ShaderProgram,
    model: GpuModel,
}

/// Imported OBJ model under the same light rig as the light scene.
#[derive(Debug, Default)]
pub struct ModelScene {
    gpu: Option<Gpu>,
}

impl Scene for ModelScene {
    fn kind(&self) -> SceneKind {
        SceneKind::Model
    }

    fn clear_color(&self) -> [f32; 4] {
        [0.0, 0.0, 0.0, 1.0]
    }

    unsafe fn setup(&mut self, gl: &glow::Context, ctx: &SceneContext) -> Result<(), EngineError> {
        let data = load_obj(ctx.assets.model(MODEL_PATH))?;

        let (shader, model) = build_tracked(gl, |created| -> Result<_, EngineError> {
            let shader = created.track(ShaderProgram::new(gl, LIT_VERT, LIT_FRAG, "lit")?);
            shader.use_program(gl);
            lighting::apply_static_lighting(gl, &shader);
            let model = created.track(GpuModel::upload(gl, &data)?);
            Ok((shader, model))
        })?;
        tracing::info!(
            meshes = data.meshes.len(),
            triangles = data.triangle_count(),
            "model ready"
        );

        self.gpu = Some(Gpu { shader, model });
        gl.enable(glow::DEPTH_TEST);
        Ok(())
    }

    unsafe fn draw(&mut self, gl: &glow::Context, camera: &Camera, frame: FrameCtx) {
        let Some(gpu) = &self.gpu else {
            return;
        };
        gpu.shader.use_program(gl);
        lighting::update_camera_lights(gl, &gpu.shader, camera);
        gpu.shader.set_mvp(
            gl,
            &Mat4::IDENTITY,
            &camera.view_matrix(),
            &camera.projection(frame.aspect()),
        );
        gpu.model.draw(gl, &gpu.shader);
    }

    unsafe fn destroy(&mut self, gl: &glow::Context) {
        if let Some(mut gpu) = self.gpu.take() {
            gpu.shader.destroy(gl);
            gpu.model.destroy(gl);
        }
    }
}
