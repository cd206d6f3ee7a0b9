//! Rendering state
//!
//! Everything between the scene description and the GPU: the uniform sink,
//! texture and material registries, lights, primitive meshes, the model
//! transform composer, and the camera/view assembly.

pub mod camera;
pub mod lighting;
pub mod material;
pub mod mesh;
pub mod shader_sink;
pub mod texture;
pub mod transform;
pub mod view;

pub use camera::{Camera, CameraMovement};
pub use lighting::{DirectionalLight, LightingEnvironment, PointLight};
pub use material::{Material, MaterialCatalog, MaterialDef};
pub use mesh::{Mesh, MeshKind, MeshLibrary, PrimitiveMeshes};
pub use shader_sink::{ShaderSink, UniformTable, UniformValue};
pub use texture::{HostTextureStore, TextureBackend, TextureRegistry, TextureSlot};
pub use transform::{compose_model_matrix, TransformComposer};
pub use view::{ProjectionMode, ViewAssembler, ViewContext};

/// A tag lookup found nothing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// No texture registered under the tag
    #[error("No texture registered under tag '{0}'")]
    TextureNotFound(String),

    /// No material defined under the tag
    #[error("No material defined under tag '{0}'")]
    MaterialNotFound(String),
}
