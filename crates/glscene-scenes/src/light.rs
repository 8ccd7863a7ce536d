use glam::{Mat4, Vec3};
use glow::HasContext;
use glscene_core::{Camera, SceneKind};
use glscene_geometry as geometry;
use glscene_runtime_glow::{build_tracked, EngineError, FrameCtx, GpuMesh, ShaderProgram, Texture2d};

use crate::lighting::{self, POINT_LIGHT_POSITIONS};
use crate::shaders::{FLAT_FRAG, FLAT_VERT, LIT_FRAG, LIT_VERT};
use crate::{Scene, SceneContext};

const CUBE_POSITIONS: [Vec3; 10] = [
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(2.0, 5.0, -15.0),
    Vec3::new(-1.5, -2.2, -2.5),
    Vec3::new(-3.8, -2.0, -12.3),
    Vec3::new(2.4, -0.4, -3.5),
    Vec3::new(-1.7, 3.0, -7.5),
    Vec3::new(1.3, -2.0, -2.5),
    Vec3::new(1.5, 2.0, -2.5),
    Vec3::new(1.5, 0.2, -1.5),
    Vec3::new(-1.3, 1.0, -1.5),
];

const CUBE_ROTATION_AXIS: Vec3 = Vec3::new(1.0, 0.3, 0.5);
const LAMP_SCALE: f32 = 0.2;

/// Model matrix of the `i`-th container: translated, then rotated `20° * i`.
pub(crate) fn container_transform(i: usize) -> Mat4 {
    let angle = (20.0 * i as f32).to_radians();
    Mat4::from_translation(CUBE_POSITIONS[i])
        * Mat4::from_axis_angle(CUBE_ROTATION_AXIS.normalize(), angle)
}

#[derive(Debug)]
struct Gpu {
    lit: ShaderProgram,
    lamp: ShaderProgram,
    cube: GpuMesh,
    diffuse: Texture2d,
    specular: Texture2d,
}

/// Lighting maps: containers lit by a directional light, four point lights and a flashlight.
#[derive(Debug, Default)]
pub struct LightScene {
    gpu: Option<Gpu>,
}

impl Scene for LightScene {
    fn kind(&self) -> SceneKind {
        SceneKind::Light
    }

    unsafe fn setup(&mut self, gl: &glow::Context, ctx: &SceneContext) -> Result<(), EngineError> {
        let gpu = build_tracked(gl, |created| -> Result<_, EngineError> {
            let lit = created.track(ShaderProgram::new(gl, LIT_VERT, LIT_FRAG, "lit")?);
            let lamp = created.track(ShaderProgram::new(gl, FLAT_VERT, FLAT_FRAG, "light_source")?);

            lit.use_program(gl);
            lit.set_int(gl, "material.diffuse", 0);
            lit.set_int(gl, "material.specular", 1);
            lighting::apply_static_lighting(gl, &lit);

            lamp.use_program(gl);
            lamp.set_vec3(gl, "objectColor", Vec3::ONE);

            Ok(Gpu {
                lit,
                lamp,
                cube: created.track(GpuMesh::upload(gl, &geometry::cube())?),
                diffuse: created.track(ctx.texture(gl, "container2.png")?),
                specular: created.track(ctx.texture(gl, "container2_specular.png")?),
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
        let view = camera.view_matrix();
        let projection = camera.projection(frame.aspect());

        gpu.lit.use_program(gl);
        lighting::update_camera_lights(gl, &gpu.lit, camera);
        gpu.diffuse.bind(gl, 0);
        gpu.specular.bind(gl, 1);
        for i in 0..CUBE_POSITIONS.len() {
            gpu.lit.set_mvp(gl, &container_transform(i), &view, &projection);
            gpu.cube.draw(gl);
        }
        gl.active_texture(glow::TEXTURE0);

        gpu.lamp.use_program(gl);
        for pos in POINT_LIGHT_POSITIONS {
            let model = Mat4::from_translation(pos) * Mat4::from_scale(Vec3::splat(LAMP_SCALE));
            gpu.lamp.set_mvp(gl, &model, &view, &projection);
            gpu.cube.draw(gl);
        }
    }

    unsafe fn destroy(&mut self, gl: &glow::Context) {
        if let Some(mut gpu) = self.gpu.take() {
            gpu.lit.destroy(gl);
            gpu.lamp.destroy(gl);
            gpu.cube.destroy(gl);
            gpu.diffuse.destroy(gl);
            gpu.specular.destroy(gl);
        }
    }
}
