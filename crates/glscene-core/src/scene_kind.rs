use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The closed set of demo scenes the factory knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneKind {
    Triangle,
    Light,
    Model,
    Stencil,
    Blending,
    Framebuffer,
    MirrorFramebuffer,
    Cubemap,
    Test,
}

impl SceneKind {
    /// Menu order. `ALL[i]` is bound to number key `i + 1` by the viewer.
    pub const ALL: [SceneKind; 9] = [
        SceneKind::Triangle,
        SceneKind::Light,
        SceneKind::Model,
        SceneKind::Stencil,
        SceneKind::Blending,
        SceneKind::Framebuffer,
        SceneKind::MirrorFramebuffer,
        SceneKind::Cubemap,
        SceneKind::Test,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SceneKind::Triangle => "triangle",
            SceneKind::Light => "light",
            SceneKind::Model => "model",
            SceneKind::Stencil => "stencil",
            SceneKind::Blending => "blending",
            SceneKind::Framebuffer => "framebuffer",
            SceneKind::MirrorFramebuffer => "mirror",
            SceneKind::Cubemap => "cubemap",
            SceneKind::Test => "test",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            SceneKind::Triangle => "vertex-colored triangle",
            SceneKind::Light => "lighting maps with directional, point and spot lights",
            SceneKind::Model => "OBJ model with the lit shader",
            SceneKind::Stencil => "stencil-buffer object outlines",
            SceneKind::Blending => "sorted alpha-blended windows",
            SceneKind::Framebuffer => "offscreen framebuffer shown on a screen quad",
            SceneKind::MirrorFramebuffer => "scene plus rear-view mirror from a second framebuffer",
            SceneKind::Cubemap => "skybox with environment-mapped cubes",
            SceneKind::Test => "flat-colored scratch scene",
        }
    }

    pub fn index(self) -> usize {
        SceneKind::ALL
            .iter()
            .position(|k| *k == self)
            .unwrap_or_default()
    }

    pub fn from_index(index: usize) -> Option<SceneKind> {
        SceneKind::ALL.get(index).copied()
    }
}

impl fmt::Display for SceneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SceneKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        SceneKind::ALL
            .iter()
            .copied()
            .find(|k| k.name() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = SceneKind::ALL.iter().map(|k| k.name()).collect();
                format!("unknown scene '{s}' (expected one of: {})", known.join(", "))
            })
    }
}

impl Serialize for SceneKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for SceneKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for kind in SceneKind::ALL {
            assert_eq!(kind.name().parse::<SceneKind>(), Ok(kind));
        }
    }

    #[test]
    fn parsing_is_case_insensitive() {
        assert_eq!(" Mirror ".parse::<SceneKind>(), Ok(SceneKind::MirrorFramebuffer));
        assert_eq!("CUBEMAP".parse::<SceneKind>(), Ok(SceneKind::Cubemap));
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = "none".parse::<SceneKind>().unwrap_err();
        assert!(err.contains("unknown scene"), "{err}");
    }

    #[test]
    fn index_matches_menu_order() {
        for (i, kind) in SceneKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
            assert_eq!(SceneKind::from_index(i), Some(*kind));
        }
        assert_eq!(SceneKind::from_index(SceneKind::ALL.len()), None);
    }

    #[test]
    fn serde_uses_stable_names() {
        let json = serde_json::to_string(&SceneKind::MirrorFramebuffer).unwrap();
        assert_eq!(json, "\"mirror\"");
        let back: SceneKind = serde_json::from_str("\"stencil\"").unwrap();
        assert_eq!(back, SceneKind::Stencil);
        assert!(serde_json::from_str::<SceneKind>("\"lava\"").is_err());
    }
}
