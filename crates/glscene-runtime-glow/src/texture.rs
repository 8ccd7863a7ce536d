use std::path::{Path, PathBuf};

use glow::HasContext;
use glscene_assets::{fallback_image, load_image, ImageData};

use crate::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureWrap {
    Repeat,
    ClampToEdge,
}

impl TextureWrap {
    /// Images with alpha clamp so transparent edges don't pick up the opposite border.
    pub fn for_image(img: &ImageData) -> Self {
        if img.has_alpha {
            TextureWrap::ClampToEdge
        } else {
            TextureWrap::Repeat
        }
    }

    fn gl(self) -> i32 {
        match self {
            TextureWrap::Repeat => glow::REPEAT as i32,
            TextureWrap::ClampToEdge => glow::CLAMP_TO_EDGE as i32,
        }
    }
}

#[derive(Debug)]
pub struct Texture2d {
    pub tex: glow::NativeTexture,
    pub width: u32,
    pub height: u32,
}

impl Texture2d {
    /// Upload RGBA8 pixels with mipmaps and trilinear filtering.
    pub unsafe fn from_image(
        gl: &glow::Context,
        img: &ImageData,
        wrap: TextureWrap,
    ) -> Result<Self, EngineError> {
        let tex = gl
            .create_texture()
            .map_err(|e| EngineError::GlCreate(format!("create_texture failed: {e:?}")))?;

        gl.bind_texture(glow::TEXTURE_2D, Some(tex));
        gl.tex_image_2d(
            glow::TEXTURE_2D,
            0,
            glow::RGBA8 as i32,
            img.width as i32,
            img.height as i32,
            0,
            glow::RGBA,
            glow::UNSIGNED_BYTE,
            Some(img.pixels.as_slice()),
        );
        gl.generate_mipmap(glow::TEXTURE_2D);

        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, wrap.gl());
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, wrap.gl());
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_MIN_FILTER,
            glow::LINEAR_MIPMAP_LINEAR as i32,
        );
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);
        gl.bind_texture(glow::TEXTURE_2D, None);

        Ok(Self {
            tex,
            width: img.width,
            height: img.height,
        })
    }

    /// Load `path`, or upload the fallback checker if it can't be decoded.
    ///
    /// Only GL object creation can fail here.
    pub unsafe fn load_or_fallback(
        gl: &glow::Context,
        path: &Path,
        flip_vertically: bool,
    ) -> Result<Self, EngineError> {
        let img = match load_image(path, flip_vertically) {
            Ok(img) => img,
            Err(e) => {
                tracing::warn!(error = %e, "texture missing, using fallback");
                fallback_image()
            }
        };
        Self::from_image(gl, &img, TextureWrap::for_image(&img))
    }

    /// 1x1 texture of a single colour.
    pub unsafe fn solid(gl: &glow::Context, rgba: [u8; 4]) -> Result<Self, EngineError> {
        let img = ImageData {
            width: 1,
            height: 1,
            pixels: rgba.to_vec(),
            has_alpha: false,
        };
        Self::from_image(gl, &img, TextureWrap::Repeat)
    }

    pub unsafe fn bind(&self, gl: &glow::Context, unit: u32) {
        gl.active_texture(glow::TEXTURE0 + unit);
        gl.bind_texture(glow::TEXTURE_2D, Some(self.tex));
    }

    pub unsafe fn destroy(&mut self, gl: &glow::Context) {
        gl.delete_texture(self.tex);
    }
}

#[derive(Debug)]
pub struct Cubemap {
    pub tex: glow::NativeTexture,
}

impl Cubemap {
    /// Faces in `+X, -X, +Y, -Y, +Z, -Z` order. Faces are uploaded unflipped.
    pub unsafe fn load(gl: &glow::Context, faces: &[PathBuf; 6]) -> Result<Self, EngineError> {
        let tex = gl
            .create_texture()
            .map_err(|e| EngineError::GlCreate(format!("create_texture(cubemap) failed: {e:?}")))?;
        gl.bind_texture(glow::TEXTURE_CUBE_MAP, Some(tex));

        for (i, face) in faces.iter().enumerate() {
            let img = match load_image(face, false) {
                Ok(img) => img,
                Err(e) => {
                    tracing::warn!(face = i, error = %e, "cubemap face missing, using fallback");
                    fallback_image()
                }
            };
            gl.tex_image_2d(
                glow::TEXTURE_CUBE_MAP_POSITIVE_X + i as u32,
                0,
                glow::RGBA8 as i32,
                img.width as i32,
                img.height as i32,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                Some(img.pixels.as_slice()),
            );
        }

        for (param, value) in [
            (glow::TEXTURE_MIN_FILTER, glow::LINEAR),
            (glow::TEXTURE_MAG_FILTER, glow::LINEAR),
            (glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE),
            (glow::TEXTURE_WRAP_T, glow::CLAMP_TO_EDGE),
            (glow::TEXTURE_WRAP_R, glow::CLAMP_TO_EDGE),
        ] {
            gl.tex_parameter_i32(glow::TEXTURE_CUBE_MAP, param, value as i32);
        }
        gl.bind_texture(glow::TEXTURE_CUBE_MAP, None);

        Ok(Self { tex })
    }

    pub unsafe fn bind(&self, gl: &glow::Context, unit: u32) {
        gl.active_texture(glow::TEXTURE0 + unit);
        gl.bind_texture(glow::TEXTURE_CUBE_MAP, Some(self.tex));
    }

    pub unsafe fn destroy(&mut self, gl: &glow::Context) {
        gl.delete_texture(self.tex);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_follows_alpha() {
        let mut img = fallback_image();
        assert_eq!(TextureWrap::for_image(&img), TextureWrap::Repeat);
        img.has_alpha = true;
        assert_eq!(TextureWrap::for_image(&img), TextureWrap::ClampToEdge);
    }
}
