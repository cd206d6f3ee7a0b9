//! The authored tabletop still life
//!
//! A counter top and back wall framing a drink can, a stemmed glass built
//! from seven translucent primitives stacked on one axis, a closed book, and
//! an apple. Texture files are resolved against the configured texture
//! directory.

use crate::foundation::math::Vec3;
use crate::render::lighting::LightingEnvironment;
use crate::render::material::MaterialDef;
use crate::render::mesh::MeshKind;
use crate::scene::{DrawStep, SceneDefinition, TextureSource};

impl SceneDefinition {
    /// The built-in tabletop scene
    #[must_use]
    pub fn still_life() -> Self {
        Self {
            textures: textures(),
            materials: materials(),
            lighting: LightingEnvironment::morning_room(),
            steps: steps(),
        }
    }
}

fn textures() -> Vec<TextureSource> {
    [
        ("bookcover.jpg", "bookcover_texture"),
        ("bookside.jpg", "bookside_texture"),
        ("counter.jpg", "counter_texture"),
        ("pages.jpg", "pages_texture"),
        ("wall.jpg", "wall_texture"),
        ("can.jpg", "can_texture"),
        ("canlid.jpg", "canlid_texture"),
        ("apple.jpg", "apple_texture"),
        ("carbonated.jpg", "carbonated_texture"),
        ("foam.jpg", "foam_texture"),
    ]
    .into_iter()
    .map(|(path, tag)| TextureSource::new(path, tag))
    .collect()
}

fn materials() -> Vec<MaterialDef> {
    let gray = |v: f32| Vec3::new(v, v, v);
    vec![
        MaterialDef::new("metal", Vec3::new(40.4, 0.4, 0.0), Vec3::new(50.7, 50.7, 40.6), 90.0),
        MaterialDef::new("paper", Vec3::new(0.2, 0.2, 0.3), gray(0.0), 0.1),
        MaterialDef::new("glass", gray(0.2), Vec3::new(21.0, 16.0, 11.0), 95.0),
        MaterialDef::new("plate", gray(0.4), gray(0.2), 30.0),
        MaterialDef::new("backdrop", Vec3::new(0.8, 0.8, 0.9), gray(0.0), 2.0),
        MaterialDef::new("apple", Vec3::new(0.4, 0.2, 0.4), Vec3::new(0.1, 0.05, 0.1), 0.55),
    ]
}

fn glass_part(label: &str, mesh: MeshKind, alpha: f32) -> DrawStep {
    DrawStep::new(label, mesh).flat(1.0, 1.0, 1.0, alpha).with_material("glass")
}

fn steps() -> Vec<DrawStep> {
    vec![
        DrawStep::new("counter top", MeshKind::Plane)
            .scaled(50.0, 1.0, 20.0)
            .at(0.0, -0.6, 0.0)
            .textured("counter_texture", 2.0, 2.0)
            .with_material("plate"),
        DrawStep::new("can body", MeshKind::Cylinder)
            .scaled(1.5, 8.0, 1.5)
            .at(-3.0, 2.0, 0.0)
            .textured("can_texture", 1.0, 1.0)
            .with_material("metal"),
        DrawStep::new("can lid", MeshKind::Cylinder)
            .scaled(1.45, 0.001, 1.45)
            .rotated(0.0, 75.0, 0.0)
            .at(-3.0, 10.0, 0.0)
            .textured("canlid_texture", 1.0, 1.0)
            .with_material("metal"),
        glass_part("glass stem", MeshKind::Cylinder, 0.3)
            .scaled(0.25, 1.0, 0.25)
            .at(-6.0, 3.4, 3.0),
        glass_part("glass foot", MeshKind::Cylinder, 0.4)
            .scaled(1.3, 1.0, 1.3)
            .at(-6.0, 2.0, 3.0),
        glass_part("glass rim", MeshKind::TaperedCylinder, 0.7)
            .scaled(1.4, 1.5, 1.4)
            .at(-6.0, 6.3, 3.0),
        glass_part("glass band", MeshKind::Cylinder, 0.7)
            .scaled(1.4, 0.5, 1.4)
            .at(-6.0, 5.8, 3.0),
        glass_part("glass bowl", MeshKind::Sphere, 0.7)
            .scaled(1.4, 1.5, 1.4)
            .at(-6.0, 5.9, 3.0),
        glass_part("glass foot cone", MeshKind::Cone, 0.3)
            .scaled(1.3, 0.5, 1.3)
            .at(-6.0, 3.0, 3.0),
        glass_part("glass stem cone", MeshKind::Cone, 0.3)
            .scaled(1.0, -1.0, 1.0)
            .at(-6.0, 5.0, 3.0),
        DrawStep::new("book pages", MeshKind::Box)
            .scaled(15.0, 2.0, 10.0)
            .at(-2.0, 1.0, 2.5)
            .textured("pages_texture", 1.0, 1.0)
            .with_material("paper"),
        DrawStep::new("book top cover", MeshKind::Box)
            .scaled(10.5, 0.25, 15.5)
            .rotated(0.0, 90.0, 0.0)
            .at(-2.0, 2.0, 2.5)
            .textured("bookcover_texture", 1.0, 1.0)
            .with_material("paper"),
        DrawStep::new("book bottom cover", MeshKind::Box)
            .scaled(10.5, 0.25, 15.5)
            .rotated(0.0, 90.0, 0.0)
            .at(-2.0, -0.25, 2.5)
            .textured("bookcover_texture", 1.0, 1.0)
            .with_material("paper"),
        DrawStep::new("book spine", MeshKind::Box)
            .scaled(15.5, 0.25, 2.5)
            .rotated(90.0, 0.0, 0.0)
            .at(-2.0, 0.9, 7.75)
            .textured("bookside_texture", 1.0, 1.0)
            .with_material("paper"),
        DrawStep::new("back wall", MeshKind::Plane)
            .scaled(50.0, 0.25, 30.0)
            .rotated(90.0, 0.0, 0.0)
            .at(0.0, 20.0, -4.0)
            .textured("wall_texture", 1.0, 1.0)
            .with_material("backdrop"),
        DrawStep::new("apple", MeshKind::Sphere)
            .scaled(3.0, 1.6, 3.0)
            .rotated(-1.0, 90.0, -10.0)
            .at(1.7, 3.4, 3.0)
            .textured("apple_texture", 1.0, 1.0)
            .with_material("apple"),
    ]
}
