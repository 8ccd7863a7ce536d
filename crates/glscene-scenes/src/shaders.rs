//! GLSL 330 core sources, embedded at build time.

pub const TRIANGLE_VERT: &str = include_str!("../shaders/triangle.vert");
pub const TRIANGLE_FRAG: &str = include_str!("../shaders/triangle.frag");

/// Phong lighting with diffuse/specular maps, one directional, four point and one spot light.
pub const LIT_VERT: &str = include_str!("../shaders/lit.vert");
pub const LIT_FRAG: &str = include_str!("../shaders/lit.frag");

/// Position-only geometry in a single `objectColor`.
pub const FLAT_VERT: &str = include_str!("../shaders/flat.vert");
pub const FLAT_FRAG: &str = include_str!("../shaders/flat.frag");

pub const TEXTURED_VERT: &str = include_str!("../shaders/textured.vert");
pub const TEXTURED_FRAG: &str = include_str!("../shaders/textured.frag");
/// Outline colour; pairs with [`TEXTURED_VERT`].
pub const SINGLE_COLOR_FRAG: &str = include_str!("../shaders/single_color.frag");

pub const SCREEN_VERT: &str = include_str!("../shaders/screen.vert");
pub const SCREEN_FRAG: &str = include_str!("../shaders/screen.frag");

pub const ENVIRO_MAPPING_VERT: &str = include_str!("../shaders/enviro_mapping.vert");
pub const ENVIRO_MAPPING_FRAG: &str = include_str!("../shaders/enviro_mapping.frag");

pub const SKYBOX_VERT: &str = include_str!("../shaders/skybox.vert");
pub const SKYBOX_FRAG: &str = include_str!("../shaders/skybox.frag");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_source_declares_glsl_330_core() {
        for src in [
            TRIANGLE_VERT,
            TRIANGLE_FRAG,
            LIT_VERT,
            LIT_FRAG,
            FLAT_VERT,
            FLAT_FRAG,
            TEXTURED_VERT,
            TEXTURED_FRAG,
            SINGLE_COLOR_FRAG,
            SCREEN_VERT,
            SCREEN_FRAG,
            ENVIRO_MAPPING_VERT,
            ENVIRO_MAPPING_FRAG,
            SKYBOX_VERT,
            SKYBOX_FRAG,
        ] {
            assert!(src.starts_with("#version 330 core"));
        }
    }

    #[test]
    fn lit_shader_declares_the_uniforms_the_scenes_set() {
        for name in ["material", "dirLight", "pointLights[NR_POINT_LIGHTS]", "spotLight", "viewPos"] {
            assert!(LIT_FRAG.contains(name), "lit.frag is missing {name}");
        }
        assert!(LIT_FRAG.contains("#define NR_POINT_LIGHTS 4"));
    }
}
