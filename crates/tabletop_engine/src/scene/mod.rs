//! Scene composition
//!
//! A [`SceneDefinition`] lists the textures, materials, lights, and ordered
//! draw steps of one hand-authored scene. [`SceneComposer`] turns it into
//! resident resources once and replays the steps every frame.
//! [`FrameDriver`] runs one frame end to end: clock, keys, view, draws.

pub mod composer;
pub mod draw_step;
pub mod frame;
pub mod still_life;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

pub use composer::{FrameStats, PrepareReport, SceneComposer};
pub use draw_step::{DrawStep, Surface, TextureSource};
pub use frame::FrameDriver;

use crate::config::{Config, ConfigError};
use crate::render::lighting::{LightingEnvironment, LightingError};
use crate::render::material::{MaterialDef, MaterialError};
use crate::render::mesh::{MeshError, MeshKind};
use crate::render::texture::TextureError;

/// Everything needed to prepare and draw a scene
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDefinition {
    /// Images to register, in slot order
    pub textures: Vec<TextureSource>,
    /// Materials to define
    pub materials: Vec<MaterialDef>,
    /// Static light rig
    pub lighting: LightingEnvironment,
    /// Objects in draw order
    pub steps: Vec<DrawStep>,
}

impl Config for SceneDefinition {}

impl SceneDefinition {
    /// Distinct meshes used by the steps, in first-use order
    #[must_use]
    pub fn mesh_kinds(&self) -> Vec<MeshKind> {
        let mut kinds = Vec::new();
        for step in &self.steps {
            if !kinds.contains(&step.mesh) {
                kinds.push(step.mesh);
            }
        }
        kinds
    }
}

/// Scene preparation and drawing errors
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    /// Fatal texture failure such as running out of texture units
    #[error("Texture error: {0}")]
    Texture(#[from] TextureError),

    /// Invalid material definition
    #[error("Material error: {0}")]
    Material(#[from] MaterialError),

    /// Invalid light rig
    #[error("Lighting error: {0}")]
    Lighting(#[from] LightingError),

    /// Mesh build or draw failure
    #[error("Mesh error: {0}")]
    Mesh(#[from] MeshError),

    /// Scene file could not be read
    #[error("Scene file error: {0}")]
    Config(#[from] ConfigError),

    /// `prepare` called twice
    #[error("Scene is already prepared")]
    AlreadyPrepared,

    /// `render` called before `prepare`
    #[error("Scene has not been prepared")]
    NotPrepared,
}
