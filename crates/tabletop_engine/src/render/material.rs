//! Material catalog
//!
//! A small, append-only table of lighting responses keyed by tag. Built once
//! while a scene is prepared and read-only afterwards.

use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec3;
use crate::render::LookupError;

/// Lighting response uploaded alongside a draw
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Diffuse reflectance
    pub diffuse: Vec3,
    /// Specular reflectance
    pub specular: Vec3,
    /// Specular exponent
    pub shininess: f32,
}

impl Material {
    /// Create a material
    #[must_use]
    pub const fn new(diffuse: Vec3, specular: Vec3, shininess: f32) -> Self {
        Self {
            diffuse,
            specular,
            shininess,
        }
    }

    /// Matte light gray with no highlight, uploaded when a lookup misses
    #[must_use]
    pub fn fallback() -> Self {
        Self::new(Vec3::new(0.8, 0.8, 0.8), Vec3::zeros(), 1.0)
    }
}

/// Named material definition as authored in a scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialDef {
    /// Tag draw steps refer to
    pub tag: String,
    /// Diffuse reflectance
    pub diffuse: Vec3,
    /// Specular reflectance
    pub specular: Vec3,
    /// Specular exponent
    pub shininess: f32,
}

impl MaterialDef {
    /// Create a definition
    #[must_use]
    pub fn new(tag: &str, diffuse: Vec3, specular: Vec3, shininess: f32) -> Self {
        Self {
            tag: tag.to_string(),
            diffuse,
            specular,
            shininess,
        }
    }
}

/// Material definition errors
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum MaterialError {
    /// Shininess is negative or not finite
    #[error("Material '{tag}' has invalid shininess {value}")]
    InvalidShininess {
        /// Material tag
        tag: String,
        /// Rejected value
        value: f32,
    },
}

/// Append-only material table with first-match lookup
#[derive(Debug, Default, Clone)]
pub struct MaterialCatalog {
    entries: Vec<(String, Material)>,
}

impl MaterialCatalog {
    /// Create an empty catalog
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a material; duplicate tags are kept and shadowed by the first
    pub fn define(&mut self, tag: &str, diffuse: Vec3, specular: Vec3, shininess: f32) -> Result<(), MaterialError> {
        if !shininess.is_finite() || shininess < 0.0 {
            return Err(MaterialError::InvalidShininess {
                tag: tag.to_string(),
                value: shininess,
            });
        }
        log::debug!("Defined material '{}'", tag);
        self.entries.push((tag.to_string(), Material::new(diffuse, specular, shininess)));
        Ok(())
    }

    /// Append an authored definition
    pub fn define_from(&mut self, def: &MaterialDef) -> Result<(), MaterialError> {
        self.define(&def.tag, def.diffuse, def.specular, def.shininess)
    }

    /// First material registered under `tag`
    pub fn find(&self, tag: &str) -> Result<&Material, LookupError> {
        self.entries
            .iter()
            .find(|(name, _)| name == tag)
            .map(|(_, material)| material)
            .ok_or_else(|| LookupError::MaterialNotFound(tag.to_string()))
    }

    /// True when a material is registered under `tag`
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.find(tag).is_ok()
    }

    /// Number of definitions
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is defined
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_define_and_find() {
        let mut catalog = MaterialCatalog::new();
        catalog
            .define("plate", Vec3::new(0.4, 0.4, 0.4), Vec3::new(0.2, 0.2, 0.2), 30.0)
            .unwrap();

        let plate = catalog.find("plate").unwrap();
        assert_relative_eq!(plate.diffuse, Vec3::new(0.4, 0.4, 0.4));
        assert_relative_eq!(plate.shininess, 30.0);
    }

    #[test]
    fn test_first_definition_wins() {
        let mut catalog = MaterialCatalog::new();
        catalog.define("paper", Vec3::new(0.2, 0.2, 0.3), Vec3::zeros(), 0.1).unwrap();
        catalog.define("paper", Vec3::new(1.0, 1.0, 1.0), Vec3::zeros(), 8.0).unwrap();

        assert_eq!(catalog.len(), 2);
        assert_relative_eq!(catalog.find("paper").unwrap().shininess, 0.1);
    }

    #[test]
    fn test_missing_tag_is_distinguishable() {
        let catalog = MaterialCatalog::new();
        assert_eq!(
            catalog.find("velvet"),
            Err(LookupError::MaterialNotFound("velvet".to_string()))
        );
    }

    #[test]
    fn test_invalid_shininess_rejected() {
        let mut catalog = MaterialCatalog::new();
        assert!(catalog.define("bad", Vec3::zeros(), Vec3::zeros(), -1.0).is_err());
        assert!(catalog.define("nan", Vec3::zeros(), Vec3::zeros(), f32::NAN).is_err());
        assert!(catalog.is_empty());
    }
}
