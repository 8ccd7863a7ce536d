//! Viewer configuration (JSON).
//!
//! Every field is optional; missing fields fall back to the defaults below. Unknown fields are
//! rejected so typos in a config file surface as errors instead of silently doing nothing.

use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::camera::{self, Camera};
use crate::error::EngineError;
use crate::scene_kind::SceneKind;

/// Read and deserialize a JSON file into `T`.
pub fn load_typed_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, EngineError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| EngineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| EngineError::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "glscene".to_string(),
            width: 800,
            height: 600,
            vsync: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub yaw: f32,
    pub pitch: f32,
    pub speed: f32,
    pub sensitivity: f32,
    pub zoom: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 3.0],
            yaw: camera::DEFAULT_YAW,
            pitch: camera::DEFAULT_PITCH,
            speed: camera::DEFAULT_SPEED,
            sensitivity: camera::DEFAULT_SENSITIVITY,
            zoom: camera::DEFAULT_ZOOM,
        }
    }
}

impl CameraConfig {
    pub fn build(&self) -> Camera {
        let mut cam = Camera::with_angles(Vec3::from(self.position), Vec3::Y, self.yaw, self.pitch);
        cam.movement_speed = self.speed;
        cam.mouse_sensitivity = self.sensitivity;
        cam.zoom = self.zoom;
        cam
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    pub window: WindowConfig,
    pub scene: SceneKind,
    /// Explicit assets directory. When absent the viewer searches upward for `assets/`.
    pub assets: Option<PathBuf>,
    pub camera: CameraConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            scene: SceneKind::Light,
            assets: None,
            camera: CameraConfig::default(),
        }
    }
}

impl ViewerConfig {
    /// Load and validate a config file.
    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let cfg: ViewerConfig = load_typed_json(path)?;
        cfg.validate(path)?;
        Ok(cfg)
    }

    /// `origin` is only used to label errors.
    pub fn validate(&self, origin: &Path) -> Result<(), EngineError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(EngineError::invalid_config(
                origin,
                format!(
                    "window size must be non-zero (got {}x{})",
                    self.window.width, self.window.height
                ),
            ));
        }
        let cam = &self.camera;
        if !(camera::ZOOM_MIN..=camera::ZOOM_MAX).contains(&cam.zoom) {
            return Err(EngineError::invalid_config(
                origin,
                format!(
                    "camera.zoom must be within [{}, {}] (got {})",
                    camera::ZOOM_MIN,
                    camera::ZOOM_MAX,
                    cam.zoom
                ),
            ));
        }
        if !(-camera::PITCH_LIMIT..=camera::PITCH_LIMIT).contains(&cam.pitch) {
            return Err(EngineError::invalid_config(
                origin,
                format!(
                    "camera.pitch must be within [-{0}, {0}] (got {1})",
                    camera::PITCH_LIMIT,
                    cam.pitch
                ),
            ));
        }
        if !(cam.speed > 0.0) {
            return Err(EngineError::invalid_config(
                origin,
                format!("camera.speed must be positive (got {})", cam.speed),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<ViewerConfig, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[test]
    fn empty_object_gives_defaults() {
        let cfg = parse("{}").unwrap();
        assert_eq!(cfg, ViewerConfig::default());
        cfg.validate(Path::new("<inline>")).unwrap();
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = parse(r#"{ "scene": "cubemap", "window": { "width": 1280 } }"#).unwrap();
        assert_eq!(cfg.scene, SceneKind::Cubemap);
        assert_eq!(cfg.window.width, 1280);
        assert_eq!(cfg.window.height, 600);
        assert_eq!(cfg.camera, CameraConfig::default());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(parse(r#"{ "scnee": "light" }"#).is_err());
        assert!(parse(r#"{ "window": { "fullscreen": true } }"#).is_err());
    }

    #[test]
    fn zero_height_fails_validation() {
        let cfg = parse(r#"{ "window": { "height": 0 } }"#).unwrap();
        let err = cfg.validate(Path::new("viewer.json")).unwrap_err();
        assert!(err.to_string().contains("non-zero"), "{err}");
    }

    #[test]
    fn zoom_and_pitch_ranges_are_enforced() {
        let cfg = parse(r#"{ "camera": { "zoom": 90.0 } }"#).unwrap();
        assert!(cfg.validate(Path::new("x")).is_err());

        let cfg = parse(r#"{ "camera": { "pitch": -95.0 } }"#).unwrap();
        assert!(cfg.validate(Path::new("x")).is_err());

        let cfg = parse(r#"{ "camera": { "speed": 0.0 } }"#).unwrap();
        assert!(cfg.validate(Path::new("x")).is_err());
    }

    #[test]
    fn camera_config_builds_matching_camera() {
        let cfg = CameraConfig {
            position: [1.0, 2.0, 3.0],
            zoom: 30.0,
            speed: 5.0,
            ..CameraConfig::default()
        };
        let cam = cfg.build();
        assert_eq!(cam.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(cam.zoom, 30.0);
        assert_eq!(cam.movement_speed, 5.0);
    }

    #[test]
    fn missing_file_maps_to_io_error() {
        let err = ViewerConfig::from_json_path("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, EngineError::Io { .. }));
    }
}
