//! Light rig shared by the light and model scenes.

use glam::Vec3;
use glscene_core::Camera;
use glscene_runtime_glow::ShaderProgram;

/// Must match `NR_POINT_LIGHTS` in `lit.frag`.
pub const POINT_LIGHT_COUNT: usize = 4;

pub const POINT_LIGHT_POSITIONS: [Vec3; POINT_LIGHT_COUNT] = [
    Vec3::new(0.7, 0.2, 2.0),
    Vec3::new(2.3, -3.3, -4.0),
    Vec3::new(-4.0, 2.0, -12.0),
    Vec3::new(0.0, 0.0, -3.0),
];

pub const DIR_LIGHT_DIRECTION: Vec3 = Vec3::new(-0.2, -1.0, -0.3);

pub const ATTENUATION_CONSTANT: f32 = 1.0;
pub const ATTENUATION_LINEAR: f32 = 0.09;
pub const ATTENUATION_QUADRATIC: f32 = 0.032;

pub const SPOT_CUTOFF_DEG: f32 = 12.5;
pub const SPOT_OUTER_CUTOFF_DEG: f32 = 17.5;

pub const MATERIAL_SHININESS: f32 = 0.25 * 128.0;

/// `pointLights[i].field`
pub fn point_light_uniform(index: usize, field: &str) -> String {
    format!("pointLights[{index}].{field}")
}

/// Material shininess, directional light and point lights. The program must be in use.
pub unsafe fn apply_static_lighting(gl: &glow::Context, shader: &ShaderProgram) {
    shader.set_float(gl, "material.shininess", MATERIAL_SHININESS);

    shader.set_vec3(gl, "dirLight.direction", DIR_LIGHT_DIRECTION);
    shader.set_vec3(gl, "dirLight.ambient", Vec3::splat(0.05));
    shader.set_vec3(gl, "dirLight.diffuse", Vec3::splat(0.4));
    shader.set_vec3(gl, "dirLight.specular", Vec3::splat(0.5));

    for (i, pos) in POINT_LIGHT_POSITIONS.iter().enumerate() {
        shader.set_vec3(gl, &point_light_uniform(i, "position"), *pos);
        shader.set_vec3(gl, &point_light_uniform(i, "ambient"), Vec3::splat(0.1));
        shader.set_vec3(gl, &point_light_uniform(i, "diffuse"), Vec3::splat(0.8));
        shader.set_vec3(gl, &point_light_uniform(i, "specular"), Vec3::ONE);
        shader.set_float(gl, &point_light_uniform(i, "constant"), ATTENUATION_CONSTANT);
        shader.set_float(gl, &point_light_uniform(i, "linear"), ATTENUATION_LINEAR);
        shader.set_float(gl, &point_light_uniform(i, "quadratic"), ATTENUATION_QUADRATIC);
    }

    shader.set_float(gl, "spotLight.cutOff", SPOT_CUTOFF_DEG.to_radians().cos());
    shader.set_float(gl, "spotLight.outerCutOff", SPOT_OUTER_CUTOFF_DEG.to_radians().cos());
    shader.set_vec3(gl, "spotLight.ambient", Vec3::splat(0.1));
    shader.set_vec3(gl, "spotLight.diffuse", Vec3::splat(0.8));
    shader.set_vec3(gl, "spotLight.specular", Vec3::ONE);
    shader.set_float(gl, "spotLight.constant", ATTENUATION_CONSTANT);
    shader.set_float(gl, "spotLight.linear", ATTENUATION_LINEAR);
    shader.set_float(gl, "spotLight.quadratic", ATTENUATION_QUADRATIC);
}

/// Flashlight follows the camera.
pub unsafe fn update_camera_lights(gl: &glow::Context, shader: &ShaderProgram, camera: &Camera) {
    shader.set_vec3(gl, "viewPos", camera.position);
    shader.set_vec3(gl, "spotLight.position", camera.position);
    shader.set_vec3(gl, "spotLight.direction", camera.front);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shaders::LIT_FRAG;

    #[test]
    fn point_light_names() {
        assert_eq!(point_light_uniform(0, "position"), "pointLights[0].position");
        assert_eq!(point_light_uniform(3, "quadratic"), "pointLights[3].quadratic");
    }

    #[test]
    fn point_light_fields_exist_in_shader() {
        for field in ["position", "constant", "linear", "quadratic", "ambient", "diffuse", "specular"] {
            assert!(LIT_FRAG.contains(&format!(" {field};")), "PointLight.{field}");
        }
    }

    #[test]
    fn spot_cone_is_ordered() {
        let inner = SPOT_CUTOFF_DEG.to_radians().cos();
        let outer = SPOT_OUTER_CUTOFF_DEG.to_radians().cos();
        assert!(inner > outer);
        assert!((inner - 0.976_296).abs() < 1e-5);
    }
}
