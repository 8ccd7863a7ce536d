use std::collections::HashMap;
use std::path::{Path, PathBuf};

use glow::HasContext;
use glscene_assets::ModelData;

use crate::tracker::{build_tracked, GlHandle, GlResource, GlTracker};
use crate::{EngineError, GpuMesh, ShaderProgram, Texture2d};

#[derive(Debug)]
struct ModelPart {
    mesh: GpuMesh,
    diffuse: Option<usize>,
    specular: Option<usize>,
}

/// An imported model on the GPU. Textures are shared between meshes that use the same file.
///
/// Meshes without a diffuse map sample white; without a specular map, black.
#[derive(Debug)]
pub struct GpuModel {
    parts: Vec<ModelPart>,
    textures: Vec<Texture2d>,
    white: Texture2d,
    black: Texture2d,
}

impl GpuModel {
    pub unsafe fn upload(gl: &glow::Context, model: &ModelData) -> Result<Self, EngineError> {
        build_tracked(gl, |created| Self::upload_parts(gl, model, created))
    }

    unsafe fn upload_parts(
        gl: &glow::Context,
        model: &ModelData,
        created: &mut GlTracker,
    ) -> Result<Self, EngineError> {
        let mut textures = Vec::new();
        let mut cache: HashMap<PathBuf, usize> = HashMap::new();

        let mut texture_slot = |created: &mut GlTracker,
                                rel: Option<&Path>|
         -> Result<Option<usize>, EngineError> {
            let Some(rel) = rel else {
                return Ok(None);
            };
            let path = model.directory.join(rel);
            if let Some(slot) = cache.get(&path) {
                return Ok(Some(*slot));
            }
            let tex = created.track(Texture2d::load_or_fallback(gl, &path, true)?);
            textures.push(tex);
            cache.insert(path, textures.len() - 1);
            Ok(Some(textures.len() - 1))
        };

        let mut parts = Vec::with_capacity(model.meshes.len());
        for mesh in &model.meshes {
            let diffuse = texture_slot(created, mesh.material.diffuse_map.as_deref())?;
            let specular = texture_slot(created, mesh.material.specular_map.as_deref())?;
            parts.push(ModelPart {
                mesh: created.track(GpuMesh::upload_model_mesh(gl, mesh)?),
                diffuse,
                specular,
            });
        }

        tracing::debug!(
            meshes = parts.len(),
            textures = textures.len(),
            "model uploaded"
        );

        Ok(Self {
            parts,
            textures,
            white: created.track(Texture2d::solid(gl, [255, 255, 255, 255])?),
            black: created.track(Texture2d::solid(gl, [0, 0, 0, 255])?),
        })
    }

    /// Draw every mesh with `shader`, which must already be in use.
    pub unsafe fn draw(&self, gl: &glow::Context, shader: &ShaderProgram) {
        shader.set_int(gl, "material.diffuse", 0);
        shader.set_int(gl, "material.specular", 1);
        for part in &self.parts {
            part.diffuse
                .map_or(&self.white, |i| &self.textures[i])
                .bind(gl, 0);
            part.specular
                .map_or(&self.black, |i| &self.textures[i])
                .bind(gl, 1);
            part.mesh.draw(gl);
        }
        gl.active_texture(glow::TEXTURE0);
    }

    pub unsafe fn destroy(&mut self, gl: &glow::Context) {
        for part in &mut self.parts {
            part.mesh.destroy(gl);
        }
        for tex in &mut self.textures {
            tex.destroy(gl);
        }
        self.white.destroy(gl);
        self.black.destroy(gl);
        self.parts.clear();
        self.textures.clear();
    }
}

impl GlResource for GpuModel {
    fn handles(&self) -> Vec<GlHandle> {
        let meshes = self.parts.iter().flat_map(|p| p.mesh.handles());
        let textures = self
            .textures
            .iter()
            .chain([&self.white, &self.black])
            .flat_map(|t| t.handles());
        meshes.chain(textures).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use super::*;

    fn tex(n: u32) -> Texture2d {
        Texture2d {
            tex: glow::NativeTexture(NonZeroU32::new(n).unwrap()),
            width: 1,
            height: 1,
        }
    }

    #[test]
    fn shared_textures_are_reported_once() {
        let model = GpuModel {
            parts: Vec::new(),
            textures: vec![tex(1)],
            white: tex(2),
            black: tex(3),
        };
        let handles = model.handles();
        assert_eq!(handles.len(), 3);
        assert_eq!(handles[0], GlHandle::Texture(tex(1).tex));
        assert_eq!(handles[2], GlHandle::Texture(tex(3).tex));
    }
}
