//! # Tabletop Engine
//!
//! Scene state management for a single hand-authored still life: texture
//! and material registries, static lighting, primitive meshes, per-draw
//! transform composition, and a free-flying camera driven by pointer,
//! scroll, and key input.
//!
//! ## Features
//!
//! - **Texture Registry**: decode, flip, upload with mipmaps, one slot per texture
//! - **Material Catalog**: tagged diffuse/specular/shininess responses
//! - **Transform Composer**: `T * Rz * Ry * Rx * S` model matrices and shading toggles
//! - **Scene Composition**: declarative draw steps replayed in authored order
//! - **Camera Controller**: yaw/pitch pointer look, scroll speed, WASDQE movement
//! - **View Assembly**: perspective or orthographic projection every frame
//!
//! GPU access sits behind the [`render::ShaderSink`], [`render::TextureBackend`]
//! and [`render::MeshLibrary`] traits. Host implementations of all three ship
//! with the crate.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tabletop_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::default();
//!     let mut sink = UniformTable::new();
//!     let mut textures = HostTextureStore::new();
//!     let mut meshes = PrimitiveMeshes::new();
//!
//!     let mut composer = SceneComposer::from_config(SceneDefinition::still_life(), &config.textures, &textures);
//!     composer.prepare(&mut sink, &mut textures, &mut meshes)?;
//!
//!     let mut driver = FrameDriver::from_config(&config);
//!     let keys = KeyState::new();
//!     driver.frame(0.0, &keys, &composer, &mut sink, &mut meshes)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod assets;
pub mod config;
pub mod foundation;
pub mod input;
pub mod render;
pub mod scene;

/// Common imports for applications driving a scene
pub mod prelude {
    pub use crate::config::{AppConfig, Config, ConfigError};
    pub use crate::foundation::math::{Mat4, Vec2, Vec3, Vec4};
    pub use crate::input::{CameraController, KeyCode, KeyInput, KeyState};
    pub use crate::render::{
        Camera, HostTextureStore, LookupError, MeshKind, MeshLibrary, PrimitiveMeshes, ProjectionMode, ShaderSink,
        TextureBackend, UniformTable, ViewAssembler, ViewContext,
    };
    pub use crate::scene::{DrawStep, FrameDriver, SceneComposer, SceneDefinition, SceneError};
}
