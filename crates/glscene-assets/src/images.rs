use std::path::Path;

use glscene_core::EngineError;

/// Decoded RGBA8 pixels, row-major.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
    /// Whether the source image carried an alpha channel (affects wrap mode on upload).
    pub has_alpha: bool,
}

impl std::fmt::Debug for ImageData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageData")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.pixels.len())
            .field("has_alpha", &self.has_alpha)
            .finish()
    }
}

impl ImageData {
    pub const CHANNELS: u32 = 4;

    /// Convert to RGBA8, optionally flipped so the first row is the image bottom
    /// (GL texture origin).
    pub fn from_dynamic(img: image::DynamicImage, flip_vertically: bool) -> Self {
        let has_alpha = img.color().has_alpha();
        let img = if flip_vertically { img.flipv() } else { img };
        let rgba = img.into_rgba8();
        Self {
            width: rgba.width(),
            height: rgba.height(),
            pixels: rgba.into_raw(),
            has_alpha,
        }
    }
}

/// Decode any supported image into RGBA8.
pub fn load_image(path: impl AsRef<Path>, flip_vertically: bool) -> Result<ImageData, EngineError> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|e| EngineError::Image {
        path: path.to_path_buf(),
        msg: e.to_string(),
    })?;

    let data = ImageData::from_dynamic(img, flip_vertically);
    tracing::debug!(
        path = %path.display(),
        width = data.width,
        height = data.height,
        "image decoded"
    );
    Ok(data)
}

/// 2x2 magenta/black checker used when a texture cannot be loaded.
pub fn fallback_image() -> ImageData {
    const M: [u8; 4] = [255, 0, 255, 255];
    const K: [u8; 4] = [0, 0, 0, 255];
    ImageData {
        width: 2,
        height: 2,
        pixels: [M, K, K, M].concat(),
        has_alpha: false,
    }
}
