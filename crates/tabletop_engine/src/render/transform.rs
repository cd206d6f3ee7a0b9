//! Per-draw transform and shading state
//!
//! The model matrix is always composed as `T * Rz * Ry * Rx * S`: scale in
//! object space first, then X, Y and Z rotations, then translation. Changing
//! this order changes how rotations compose on non-uniformly scaled parts.

use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec2, Vec3, Vec4};
use crate::render::material::{Material, MaterialCatalog};
use crate::render::shader_sink::{names, ShaderSink};
use crate::render::texture::{TextureRegistry, TextureSlot};
use crate::render::LookupError;

/// Build a model matrix from scale, Euler angles in degrees, and position
#[must_use]
pub fn compose_model_matrix(scale: Vec3, rotation_degrees: Vec3, position: Vec3) -> Mat4 {
    let rotation_x = Mat4::rotation_x(utils::deg_to_rad(rotation_degrees.x));
    let rotation_y = Mat4::rotation_y(utils::deg_to_rad(rotation_degrees.y));
    let rotation_z = Mat4::rotation_z(utils::deg_to_rad(rotation_degrees.z));
    let translation = Mat4::new_translation(&position);
    let scaling = Mat4::new_nonuniform_scaling(&scale);

    translation * rotation_z * rotation_y * rotation_x * scaling
}

/// Pushes model transform and shading selection for the next draw
///
/// Borrows the sink and both registries for the duration of a frame. Each
/// setter is independent; together they form the shading state the next
/// mesh draw sees.
pub struct TransformComposer<'a, S: ShaderSink + ?Sized> {
    sink: &'a mut S,
    textures: &'a TextureRegistry,
    materials: &'a MaterialCatalog,
}

impl<'a, S: ShaderSink + ?Sized> TransformComposer<'a, S> {
    /// Create a composer over a sink and the scene registries
    pub fn new(sink: &'a mut S, textures: &'a TextureRegistry, materials: &'a MaterialCatalog) -> Self {
        Self {
            sink,
            textures,
            materials,
        }
    }

    /// Upload the model matrix for `scale`, rotations in degrees, and `position`
    pub fn apply(&mut self, scale: Vec3, rot_x: f32, rot_y: f32, rot_z: f32, position: Vec3) {
        let model = compose_model_matrix(scale, Vec3::new(rot_x, rot_y, rot_z), position);
        self.sink.set_mat4(names::MODEL, &model);
    }

    /// Disable texturing and upload a solid RGBA color
    pub fn set_flat_color(&mut self, color: Vec4) {
        self.sink.set_bool(names::USE_TEXTURE, false);
        self.sink.set_vec4(names::OBJECT_COLOR, color);
    }

    /// Enable texturing with the texture registered under `tag`
    ///
    /// On a miss texturing is disabled and no slot is uploaded.
    pub fn set_texture(&mut self, tag: &str) -> Result<TextureSlot, LookupError> {
        match self.textures.find_slot(tag) {
            Ok(slot) => {
                self.sink.set_bool(names::USE_TEXTURE, true);
                self.sink.set_int(names::OBJECT_TEXTURE, slot.as_uniform());
                Ok(slot)
            }
            Err(err) => {
                self.sink.set_bool(names::USE_TEXTURE, false);
                Err(err)
            }
        }
    }

    /// Upload UV tiling factors for the next textured draw
    pub fn set_texture_uv_scale(&mut self, u: f32, v: f32) {
        self.sink.set_vec2(names::UV_SCALE, Vec2::new(u, v));
    }

    /// Upload the lighting response registered under `tag`
    ///
    /// On a miss, including an empty catalog, [`Material::fallback`] is
    /// uploaded so the draw never inherits the previous object's material.
    pub fn set_material(&mut self, tag: &str) -> Result<(), LookupError> {
        let (material, result) = match self.materials.find(tag) {
            Ok(material) => (*material, Ok(())),
            Err(err) => (Material::fallback(), Err(err)),
        };
        self.sink.set_vec3(names::MATERIAL_DIFFUSE, material.diffuse);
        self.sink.set_vec3(names::MATERIAL_SPECULAR, material.specular);
        self.sink.set_float(names::MATERIAL_SHININESS, material.shininess);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::ImageData;
    use crate::foundation::math::Point3;
    use crate::render::shader_sink::UniformTable;
    use crate::render::texture::HostTextureStore;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-6;

    #[test]
    fn test_apply_matches_translate_rotate_scale() {
        let textures = TextureRegistry::new(16);
        let materials = MaterialCatalog::new();
        let mut table = UniformTable::new();
        TransformComposer::new(&mut table, &textures, &materials).apply(
            Vec3::new(2.0, 1.0, 1.0),
            0.0,
            90.0,
            0.0,
            Vec3::new(5.0, 0.0, 0.0),
        );

        let expected = Mat4::new_translation(&Vec3::new(5.0, 0.0, 0.0))
            * Mat4::rotation_y(utils::deg_to_rad(90.0))
            * Mat4::new_nonuniform_scaling(&Vec3::new(2.0, 1.0, 1.0));
        assert_relative_eq!(table.mat4(names::MODEL).unwrap(), expected, epsilon = EPSILON);

        // Scale applies before the quarter turn: +X stretches along -Z
        let tip = expected.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(tip.coords, Vec3::new(5.0, 0.0, -2.0), epsilon = 1e-5);
    }

    #[test]
    fn test_rotation_order_is_z_after_y_after_x() {
        let model = compose_model_matrix(Vec3::new(1.0, 1.0, 1.0), Vec3::new(90.0, 90.0, 0.0), Vec3::zeros());
        // Rx maps +Y to +Z, then Ry maps +Z to +X
        let moved = model.transform_vector(&Vec3::y());
        assert_relative_eq!(moved, Vec3::x(), epsilon = 1e-5);
    }

    #[test]
    fn test_flat_color_disables_texturing() {
        let textures = TextureRegistry::new(16);
        let materials = MaterialCatalog::new();
        let mut table = UniformTable::new();
        let mut composer = TransformComposer::new(&mut table, &textures, &materials);
        composer.set_flat_color(Vec4::new(1.0, 1.0, 1.0, 0.3));

        assert_eq!(table.bool(names::USE_TEXTURE), Some(false));
        assert_relative_eq!(table.vec4(names::OBJECT_COLOR).unwrap().w, 0.3);
    }

    #[test]
    fn test_texture_hit_uploads_slot() {
        let mut backend = HostTextureStore::new();
        let mut textures = TextureRegistry::for_backend(&backend);
        textures
            .register_image(&mut backend, &ImageData::solid_color(2, 2, &[1, 2, 3]), "pages")
            .unwrap();
        textures
            .register_image(&mut backend, &ImageData::solid_color(2, 2, &[1, 2, 3]), "wall")
            .unwrap();
        let materials = MaterialCatalog::new();
        let mut table = UniformTable::new();

        let slot = TransformComposer::new(&mut table, &textures, &materials).set_texture("wall");
        assert_eq!(slot, Ok(TextureSlot(1)));
        assert_eq!(table.bool(names::USE_TEXTURE), Some(true));
        assert_eq!(table.int(names::OBJECT_TEXTURE), Some(1));
    }

    #[test]
    fn test_texture_miss_uploads_no_slot() {
        let textures = TextureRegistry::new(16);
        let materials = MaterialCatalog::new();
        let mut table = UniformTable::new();

        let result = TransformComposer::new(&mut table, &textures, &materials).set_texture("ghost");
        assert!(result.is_err());
        assert_eq!(table.bool(names::USE_TEXTURE), Some(false));
        assert_eq!(table.upload_count(names::OBJECT_TEXTURE), 0);
    }

    #[test]
    fn test_uv_scale() {
        let textures = TextureRegistry::new(16);
        let materials = MaterialCatalog::new();
        let mut table = UniformTable::new();
        TransformComposer::new(&mut table, &textures, &materials).set_texture_uv_scale(2.0, 2.0);
        assert_relative_eq!(table.vec2(names::UV_SCALE).unwrap(), Vec2::new(2.0, 2.0));
    }

    #[test]
    fn test_material_miss_uploads_fallback_not_stale_values() {
        let textures = TextureRegistry::new(16);
        let mut materials = MaterialCatalog::new();
        materials
            .define("metal", Vec3::new(0.4, 0.4, 0.0), Vec3::new(0.7, 0.7, 0.6), 90.0)
            .unwrap();
        let mut table = UniformTable::new();
        let mut composer = TransformComposer::new(&mut table, &textures, &materials);

        assert!(composer.set_material("metal").is_ok());
        assert_eq!(
            composer.set_material("velvet"),
            Err(LookupError::MaterialNotFound("velvet".to_string()))
        );

        let fallback = Material::fallback();
        assert_relative_eq!(table.float(names::MATERIAL_SHININESS).unwrap(), fallback.shininess);
        assert_relative_eq!(table.vec3(names::MATERIAL_DIFFUSE).unwrap(), fallback.diffuse);
    }
}
