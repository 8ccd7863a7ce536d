//! Floor, two cubes and the transparent windows shared by the stencil, blending, framebuffer
//! and mirror scenes.

use glam::{Mat4, Vec3};
use glscene_core::sort_back_to_front;
use glscene_geometry as geometry;
use glscene_runtime_glow::{
    build_tracked, EngineError, GlHandle, GlResource, GpuMesh, ShaderProgram, Texture2d,
};

use crate::SceneContext;

pub(crate) const CUBE_POSITIONS: [Vec3; 2] = [Vec3::new(-1.0, 0.0, -1.0), Vec3::new(2.0, 0.0, 0.0)];

pub(crate) const WINDOW_POSITIONS: [Vec3; 5] = [
    Vec3::new(-1.5, 0.0, -0.48),
    Vec3::new(1.5, 0.0, 0.51),
    Vec3::new(0.0, 0.0, 0.7),
    Vec3::new(-0.3, 0.0, -2.3),
    Vec3::new(0.5, 0.0, -0.6),
];

pub(crate) const FLOOR_TEXTURE: &str = "metal.png";
pub(crate) const MARBLE_TEXTURE: &str = "marble.jpg";
pub(crate) const WINDOW_TEXTURE: &str = "blending_transparent_window.png";

#[derive(Debug)]
struct Windows {
    quad: GpuMesh,
    tex: Texture2d,
}

/// GPU resources for the shared layout. Draw calls expect a program using `textured.vert`
/// to be in use, with `view`/`projection` already set.
#[derive(Debug)]
pub(crate) struct Props {
    cube: GpuMesh,
    plane: GpuMesh,
    cube_tex: Texture2d,
    floor_tex: Texture2d,
    windows: Option<Windows>,
}

impl Props {
    pub(crate) unsafe fn new(
        gl: &glow::Context,
        ctx: &SceneContext,
        cube_texture: &str,
        with_windows: bool,
    ) -> Result<Self, EngineError> {
        build_tracked(gl, |created| -> Result<_, EngineError> {
            let windows = if with_windows {
                Some(Windows {
                    quad: created.track(GpuMesh::upload(gl, &geometry::quad_3d())?),
                    tex: created.track(ctx.texture(gl, WINDOW_TEXTURE)?),
                })
            } else {
                None
            };
            Ok(Self {
                cube: created.track(GpuMesh::upload(gl, &geometry::cube_no_normal())?),
                plane: created.track(GpuMesh::upload(gl, &geometry::plane())?),
                cube_tex: created.track(ctx.texture(gl, cube_texture)?),
                floor_tex: created.track(ctx.texture(gl, FLOOR_TEXTURE)?),
                windows,
            })
        })
    }

    pub(crate) unsafe fn draw_floor(&self, gl: &glow::Context, shader: &ShaderProgram) {
        self.floor_tex.bind(gl, 0);
        shader.set_mat4(gl, "model", &Mat4::IDENTITY);
        self.plane.draw(gl);
    }

    pub(crate) unsafe fn draw_cubes(&self, gl: &glow::Context, shader: &ShaderProgram, scale: f32) {
        self.cube_tex.bind(gl, 0);
        for pos in CUBE_POSITIONS {
            let model = Mat4::from_translation(pos) * Mat4::from_scale(Vec3::splat(scale));
            shader.set_mat4(gl, "model", &model);
            self.cube.draw(gl);
        }
    }

    /// Farthest window first; needs blending enabled by the caller.
    pub(crate) unsafe fn draw_windows(&self, gl: &glow::Context, shader: &ShaderProgram, eye: Vec3) {
        let Some(windows) = &self.windows else {
            return;
        };
        windows.tex.bind(gl, 0);
        for pos in sort_back_to_front(eye, &WINDOW_POSITIONS) {
            shader.set_mat4(gl, "model", &Mat4::from_translation(pos));
            windows.quad.draw(gl);
        }
    }

    pub(crate) unsafe fn destroy(&mut self, gl: &glow::Context) {
        self.cube.destroy(gl);
        self.plane.destroy(gl);
        self.cube_tex.destroy(gl);
        self.floor_tex.destroy(gl);
        if let Some(mut w) = self.windows.take() {
            w.quad.destroy(gl);
            w.tex.destroy(gl);
        }
    }
}

impl GlResource for Props {
    fn handles(&self) -> Vec<GlHandle> {
        let mut handles = self.cube.handles();
        handles.extend(self.plane.handles());
        handles.extend(self.cube_tex.handles());
        handles.extend(self.floor_tex.handles());
        if let Some(w) = &self.windows {
            handles.extend(w.quad.handles());
            handles.extend(w.tex.handles());
        }
        handles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_sort_from_default_camera() {
        let order = sort_back_to_front(Vec3::new(0.0, 0.0, 3.0), &WINDOW_POSITIONS);
        assert_eq!(order.first(), Some(&Vec3::new(-0.3, 0.0, -2.3)));
        assert_eq!(order.last(), Some(&Vec3::new(0.0, 0.0, 0.7)));
    }
}
