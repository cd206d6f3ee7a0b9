//! Write-only shader uniform interface
//!
//! The scene code never reads uniforms back; it pushes named values into a
//! [`ShaderSink`]. A GPU program binding implements the trait by forwarding
//! to its uniform locations. [`UniformTable`] is the host implementation: it
//! keeps the latest value per name plus per-name upload counts, which is
//! what the app's headless pipeline and the tests observe.

use std::collections::HashMap;

use crate::foundation::math::{Mat4, Vec2, Vec3, Vec4};

/// Reserved uniform names shared with the shading program
pub mod names {
    /// Model matrix
    pub const MODEL: &str = "model";
    /// View matrix
    pub const VIEW: &str = "view";
    /// Projection matrix
    pub const PROJECTION: &str = "projection";
    /// Camera position in world space
    pub const VIEW_POSITION: &str = "viewPosition";
    /// Flat RGBA color
    pub const OBJECT_COLOR: &str = "objectColor";
    /// Sampler slot index
    pub const OBJECT_TEXTURE: &str = "objectTexture";
    /// Texturing toggle
    pub const USE_TEXTURE: &str = "bUseTexture";
    /// Lighting toggle
    pub const USE_LIGHTING: &str = "bUseLighting";
    /// UV tiling factors
    pub const UV_SCALE: &str = "UVscale";
    /// Material diffuse color
    pub const MATERIAL_DIFFUSE: &str = "material.diffuseColor";
    /// Material specular color
    pub const MATERIAL_SPECULAR: &str = "material.specularColor";
    /// Material shininess exponent
    pub const MATERIAL_SHININESS: &str = "material.shininess";

    /// Field of the directional light struct, e.g. `directionalLight.ambient`
    #[must_use]
    pub fn directional_light(field: &str) -> String {
        format!("directionalLight.{field}")
    }

    /// Field of a point light array element, e.g. `pointLights[1].position`
    #[must_use]
    pub fn point_light(index: usize, field: &str) -> String {
        format!("pointLights[{index}].{field}")
    }
}

/// A single uniform value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    /// 4x4 matrix
    Mat4(Mat4),
    /// Two-component vector
    Vec2(Vec2),
    /// Three-component vector
    Vec3(Vec3),
    /// Four-component vector
    Vec4(Vec4),
    /// Scalar
    Float(f32),
    /// Integer, used for sampler slots
    Int(i32),
    /// Feature toggle
    Bool(bool),
}

/// Sink accepting named uniform uploads
pub trait ShaderSink {
    /// Upload one named value
    fn set_uniform(&mut self, name: &str, value: UniformValue);

    /// Upload a 4x4 matrix
    fn set_mat4(&mut self, name: &str, value: &Mat4) {
        self.set_uniform(name, UniformValue::Mat4(*value));
    }

    /// Upload a two-component vector
    fn set_vec2(&mut self, name: &str, value: Vec2) {
        self.set_uniform(name, UniformValue::Vec2(value));
    }

    /// Upload a three-component vector
    fn set_vec3(&mut self, name: &str, value: Vec3) {
        self.set_uniform(name, UniformValue::Vec3(value));
    }

    /// Upload a four-component vector
    fn set_vec4(&mut self, name: &str, value: Vec4) {
        self.set_uniform(name, UniformValue::Vec4(value));
    }

    /// Upload a scalar
    fn set_float(&mut self, name: &str, value: f32) {
        self.set_uniform(name, UniformValue::Float(value));
    }

    /// Upload an integer
    fn set_int(&mut self, name: &str, value: i32) {
        self.set_uniform(name, UniformValue::Int(value));
    }

    /// Upload a boolean
    fn set_bool(&mut self, name: &str, value: bool) {
        self.set_uniform(name, UniformValue::Bool(value));
    }
}

/// In-memory uniform store
#[derive(Debug, Default, Clone)]
pub struct UniformTable {
    values: HashMap<String, UniformValue>,
    upload_counts: HashMap<String, usize>,
    total_uploads: usize,
}

impl UniformTable {
    /// Create an empty table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest value uploaded under `name`
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&UniformValue> {
        self.values.get(name)
    }

    /// Latest matrix under `name`, if the value is a matrix
    #[must_use]
    pub fn mat4(&self, name: &str) -> Option<Mat4> {
        match self.values.get(name) {
            Some(UniformValue::Mat4(m)) => Some(*m),
            _ => None,
        }
    }

    /// Latest two-component vector under `name`
    #[must_use]
    pub fn vec2(&self, name: &str) -> Option<Vec2> {
        match self.values.get(name) {
            Some(UniformValue::Vec2(v)) => Some(*v),
            _ => None,
        }
    }

    /// Latest three-component vector under `name`
    #[must_use]
    pub fn vec3(&self, name: &str) -> Option<Vec3> {
        match self.values.get(name) {
            Some(UniformValue::Vec3(v)) => Some(*v),
            _ => None,
        }
    }

    /// Latest four-component vector under `name`
    #[must_use]
    pub fn vec4(&self, name: &str) -> Option<Vec4> {
        match self.values.get(name) {
            Some(UniformValue::Vec4(v)) => Some(*v),
            _ => None,
        }
    }

    /// Latest scalar under `name`
    #[must_use]
    pub fn float(&self, name: &str) -> Option<f32> {
        match self.values.get(name) {
            Some(UniformValue::Float(v)) => Some(*v),
            _ => None,
        }
    }

    /// Latest integer under `name`
    #[must_use]
    pub fn int(&self, name: &str) -> Option<i32> {
        match self.values.get(name) {
            Some(UniformValue::Int(v)) => Some(*v),
            _ => None,
        }
    }

    /// Latest boolean under `name`
    #[must_use]
    pub fn bool(&self, name: &str) -> Option<bool> {
        match self.values.get(name) {
            Some(UniformValue::Bool(v)) => Some(*v),
            _ => None,
        }
    }

    /// Number of uploads made under `name`
    #[must_use]
    pub fn upload_count(&self, name: &str) -> usize {
        self.upload_counts.get(name).copied().unwrap_or(0)
    }

    /// Number of uploads across all names
    #[must_use]
    pub const fn total_uploads(&self) -> usize {
        self.total_uploads
    }

    /// Number of distinct names ever uploaded
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when nothing has been uploaded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ShaderSink for UniformTable {
    fn set_uniform(&mut self, name: &str, value: UniformValue) {
        log::trace!("uniform {} = {:?}", name, value);
        self.values.insert(name.to_string(), value);
        *self.upload_counts.entry(name.to_string()).or_insert(0) += 1;
        self.total_uploads += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_latest_value_wins() {
        let mut table = UniformTable::new();
        table.set_float(names::MATERIAL_SHININESS, 2.0);
        table.set_float(names::MATERIAL_SHININESS, 30.0);

        assert_relative_eq!(table.float(names::MATERIAL_SHININESS).unwrap(), 30.0);
        assert_eq!(table.upload_count(names::MATERIAL_SHININESS), 2);
        assert_eq!(table.total_uploads(), 2);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_typed_getters_reject_other_kinds() {
        let mut table = UniformTable::new();
        table.set_bool(names::USE_TEXTURE, true);

        assert_eq!(table.bool(names::USE_TEXTURE), Some(true));
        assert_eq!(table.int(names::USE_TEXTURE), None);
        assert_eq!(table.mat4(names::MODEL), None);
    }

    #[test]
    fn test_light_names() {
        assert_eq!(names::directional_light("bActive"), "directionalLight.bActive");
        assert_eq!(names::point_light(1, "position"), "pointLights[1].position");
    }
}
