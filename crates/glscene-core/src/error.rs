use std::path::PathBuf;

use thiserror::Error;

/// Engine-level errors used across glscene crates.
///
/// This type lives in `glscene-core` and is re-exported by the GL runtime so scenes and hosts
/// only ever deal with one error enum.
#[derive(Debug, Error)]
pub enum EngineError {
    // ---- Assets / config ----
    #[error("assets not found (starting at {})", start_dir.display())]
    AssetsNotFound { start_dir: PathBuf },

    #[error("io error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("json parse error at {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config at {}: {msg}", path.display())]
    InvalidConfig { path: PathBuf, msg: String },

    #[error("image load failed at {}: {msg}", path.display())]
    Image { path: PathBuf, msg: String },

    #[error("model error at {}:{line}: {msg}", path.display())]
    Model {
        path: PathBuf,
        line: usize,
        msg: String,
    },

    // ---- Runtime-facing (backend) ----
    #[error("vertex shader compile error: {0}")]
    VertexCompile(String),

    #[error("fragment shader compile error: {0}")]
    FragmentCompile(String),

    #[error("program link error: {0}")]
    Link(String),

    #[error("backend object creation failed: {0}")]
    GlCreate(String),

    // ---- Fallback ----
    #[error("{0}")]
    Other(String),
}

impl EngineError {
    pub fn other<T: Into<String>>(s: T) -> Self {
        EngineError::Other(s.into())
    }

    pub fn invalid_config(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        EngineError::InvalidConfig {
            path: path.into(),
            msg: msg.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn display_includes_path_and_message() {
        let e = EngineError::invalid_config("viewer.json", "width must be > 0");
        assert_eq!(
            e.to_string(),
            "invalid config at viewer.json: width must be > 0"
        );
    }

    #[test]
    fn io_error_exposes_source() {
        let e = EngineError::Io {
            path: PathBuf::from("missing.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "nope"),
        };
        assert!(e.source().is_some());
        assert!(e.to_string().contains("missing.json"));
    }

    #[test]
    fn model_error_reports_line() {
        let e = EngineError::Model {
            path: PathBuf::from("cube.obj"),
            line: 12,
            msg: "bad index".into(),
        };
        assert_eq!(e.to_string(), "model error at cube.obj:12: bad index");
    }
}
