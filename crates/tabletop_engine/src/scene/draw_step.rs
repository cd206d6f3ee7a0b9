//! Declarative draw steps
//!
//! A scene is an ordered list of [`DrawStep`]s. Each names a primitive, its
//! transform, and how its surface is shaded. Order matters for translucent
//! parts, which are composited by draw order and alpha blending.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::foundation::math::{Vec2, Vec3, Vec4};
use crate::render::mesh::MeshKind;

/// Albedo source for a draw; flat color and texture are mutually exclusive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Surface {
    /// Solid RGBA color, alpha below 1 for translucent parts
    Flat {
        /// RGBA color
        color: Vec4,
    },
    /// Registered texture tiled by `uv_scale`
    Textured {
        /// Texture tag
        tag: String,
        /// UV tiling factors
        uv_scale: Vec2,
    },
}

/// One object drawn per frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawStep {
    /// Human-readable name used in logs
    pub label: String,
    /// Primitive to draw
    pub mesh: MeshKind,
    /// Object-space scale
    pub scale: Vec3,
    /// Euler angles in degrees, applied X then Y then Z
    pub rotation: Vec3,
    /// World position
    pub position: Vec3,
    /// Albedo source
    pub surface: Surface,
    /// Optional lighting response tag
    #[serde(default)]
    pub material: Option<String>,
}

impl DrawStep {
    /// Start a step with identity transform and opaque white surface
    #[must_use]
    pub fn new(label: &str, mesh: MeshKind) -> Self {
        Self {
            label: label.to_string(),
            mesh,
            scale: Vec3::new(1.0, 1.0, 1.0),
            rotation: Vec3::zeros(),
            position: Vec3::zeros(),
            surface: Surface::Flat {
                color: Vec4::new(1.0, 1.0, 1.0, 1.0),
            },
            material: None,
        }
    }

    /// Set the scale
    #[must_use]
    pub fn scaled(mut self, x: f32, y: f32, z: f32) -> Self {
        self.scale = Vec3::new(x, y, z);
        self
    }

    /// Set rotation in degrees around X, Y, and Z
    #[must_use]
    pub fn rotated(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation = Vec3::new(x, y, z);
        self
    }

    /// Set the position
    #[must_use]
    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = Vec3::new(x, y, z);
        self
    }

    /// Shade with a flat RGBA color
    #[must_use]
    pub fn flat(mut self, r: f32, g: f32, b: f32, a: f32) -> Self {
        self.surface = Surface::Flat {
            color: Vec4::new(r, g, b, a),
        };
        self
    }

    /// Shade with a texture tiled `u` by `v` times
    #[must_use]
    pub fn textured(mut self, tag: &str, u: f32, v: f32) -> Self {
        self.surface = Surface::Textured {
            tag: tag.to_string(),
            uv_scale: Vec2::new(u, v),
        };
        self
    }

    /// Light with a catalog material
    #[must_use]
    pub fn with_material(mut self, tag: &str) -> Self {
        self.material = Some(tag.to_string());
        self
    }

    /// Texture tag, when textured
    #[must_use]
    pub fn texture_tag(&self) -> Option<&str> {
        match &self.surface {
            Surface::Textured { tag, .. } => Some(tag),
            Surface::Flat { .. } => None,
        }
    }

    /// True when the surface is a flat color with alpha below 1
    #[must_use]
    pub fn is_translucent(&self) -> bool {
        matches!(self.surface, Surface::Flat { color } if color.w < 1.0)
    }
}

/// Image file to register under a tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureSource {
    /// Path relative to the configured texture directory
    pub path: PathBuf,
    /// Tag draw steps refer to
    pub tag: String,
}

impl TextureSource {
    /// Create a texture source
    #[must_use]
    pub fn new(path: &str, tag: &str) -> Self {
        Self {
            path: PathBuf::from(path),
            tag: tag.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_builder() {
        let step = DrawStep::new("lid", MeshKind::Cylinder)
            .scaled(1.45, 0.001, 1.45)
            .rotated(0.0, 75.0, 0.0)
            .at(-3.0, 10.0, 0.0)
            .textured("canlid_texture", 1.0, 1.0)
            .with_material("metal");

        assert_relative_eq!(step.rotation.y, 75.0);
        assert_eq!(step.texture_tag(), Some("canlid_texture"));
        assert_eq!(step.material.as_deref(), Some("metal"));
        assert!(!step.is_translucent());
    }

    #[test]
    fn test_flat_replaces_texture() {
        let step = DrawStep::new("stem", MeshKind::Cylinder)
            .textured("foam_texture", 1.0, 1.0)
            .flat(1.0, 1.0, 1.0, 0.3);
        assert_eq!(step.texture_tag(), None);
        assert!(step.is_translucent());
    }

    #[test]
    fn test_ron_round_trip() {
        let step = DrawStep::new("apple", MeshKind::Sphere)
            .scaled(3.0, 1.6, 3.0)
            .textured("apple_texture", 1.0, 1.0)
            .with_material("apple");
        let text = ron::to_string(&step).unwrap();
        let parsed: DrawStep = ron::from_str(&text).unwrap();
        assert_eq!(parsed, step);
    }
}
