use std::path::{Path, PathBuf};

use glscene_core::EngineError;

const ASSETS_DIR: &str = "assets";

/// Skybox faces in GL cubemap order: +X, -X, +Y, -Y, +Z, -Z.
pub const SKYBOX_FACES: [&str; 6] = [
    "right.jpg",
    "left.jpg",
    "top.jpg",
    "bottom.jpg",
    "front.jpg",
    "back.jpg",
];

/// Root of the runtime asset tree (`textures/`, `textures/skybox/`, `models/`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetsRoot {
    dir: PathBuf,
}

impl AssetsRoot {
    /// Walk `start` and its ancestors looking for an `assets/` directory.
    pub fn discover(start: impl AsRef<Path>) -> Result<Self, EngineError> {
        let start = start.as_ref();
        for dir in start.ancestors() {
            let candidate = dir.join(ASSETS_DIR);
            if candidate.is_dir() {
                tracing::debug!(path = %candidate.display(), "assets root discovered");
                return Ok(Self { dir: candidate });
            }
        }
        Err(EngineError::AssetsNotFound {
            start_dir: start.to_path_buf(),
        })
    }

    /// Use `dir` as the root as-is.
    pub fn from_dir(dir: impl Into<PathBuf>) -> Result<Self, EngineError> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(EngineError::AssetsNotFound { start_dir: dir });
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn texture(&self, name: &str) -> PathBuf {
        self.dir.join("textures").join(name)
    }

    pub fn model(&self, rel: &str) -> PathBuf {
        self.dir.join("models").join(rel)
    }

    pub fn skybox_faces(&self) -> [PathBuf; 6] {
        SKYBOX_FACES.map(|face| self.dir.join("textures").join("skybox").join(face))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_tree(name: &str) -> PathBuf {
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let p = std::env::temp_dir().join(format!("glscene_assets_{name}_{ts}"));
        fs::create_dir_all(&p).unwrap();
        p
    }

    #[test]
    fn discover_walks_up_to_assets_dir() {
        let root = temp_tree("discover");
        fs::create_dir_all(root.join("assets/textures")).unwrap();
        let nested = root.join("target/debug/deps");
        fs::create_dir_all(&nested).unwrap();

        let found = AssetsRoot::discover(&nested).expect("assets should be found");
        assert_eq!(found.dir(), root.join("assets"));

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn from_dir_rejects_missing_directory() {
        let root = temp_tree("missing");
        let err = AssetsRoot::from_dir(root.join("nope")).unwrap_err();
        assert!(matches!(err, EngineError::AssetsNotFound { .. }));
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn paths_follow_layout() {
        let root = temp_tree("layout");
        let assets = AssetsRoot::from_dir(&root).unwrap();
        assert_eq!(assets.texture("metal.png"), root.join("textures/metal.png"));
        assert_eq!(
            assets.model("backpack/backpack.obj"),
            root.join("models/backpack/backpack.obj")
        );
        let faces = assets.skybox_faces();
        assert!(faces[0].ends_with("skybox/right.jpg"));
        assert!(faces[2].ends_with("skybox/top.jpg"));
        assert!(faces[5].ends_with("skybox/back.jpg"));
        let _ = fs::remove_dir_all(root);
    }
}
