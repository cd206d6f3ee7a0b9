//! Scene composition driver
//!
//! `prepare` makes every resource of a [`SceneDefinition`] resident exactly
//! once, in a fixed order: materials, lights, meshes, textures, bindings.
//! A failed `prepare` leaves no textures or materials behind.
//! `render` then replays the draw steps in authored order every frame.
//!
//! Missing textures and materials never abort a frame. A step whose texture
//! is missing is drawn in [`FALLBACK_COLOR`]; a step whose material is
//! missing gets [`Material::fallback`]. Both are reported once at prepare
//! time and counted per frame in [`FrameStats`].
//!
//! [`Material::fallback`]: crate::render::material::Material::fallback

use std::path::{Path, PathBuf};

use crate::config::TextureConfig;
use crate::foundation::math::Vec4;
use crate::render::material::MaterialCatalog;
use crate::render::mesh::{MeshKind, MeshLibrary};
use crate::render::shader_sink::ShaderSink;
use crate::render::texture::{TextureBackend, TextureError, TextureRegistry};
use crate::render::transform::TransformComposer;
use crate::scene::{SceneDefinition, SceneError, Surface};

/// Flat color drawn in place of a missing texture
pub const FALLBACK_COLOR: Vec4 = Vec4::new(1.0, 0.0, 1.0, 1.0);

/// Outcome of [`SceneComposer::prepare`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrepareReport {
    /// Materials defined
    pub materials_defined: usize,
    /// Meshes newly built
    pub meshes_built: usize,
    /// Textures registered
    pub textures_loaded: usize,
    /// Tags whose image could not be used
    pub textures_failed: Vec<String>,
    /// Step labels referring to an unknown texture or material
    pub unresolved_steps: Vec<String>,
}

/// Counters for one rendered frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Draw calls issued
    pub draws: usize,
    /// Steps drawn with the fallback color
    pub texture_fallbacks: usize,
    /// Steps drawn with the fallback material
    pub material_fallbacks: usize,
}

/// Owns the scene registries and drives preparation and per-frame drawing
#[derive(Debug)]
pub struct SceneComposer {
    definition: SceneDefinition,
    texture_root: PathBuf,
    textures: TextureRegistry,
    materials: MaterialCatalog,
    prepared: bool,
}

impl SceneComposer {
    /// Create a composer whose texture registry matches the backend's unit count
    pub fn new<B: TextureBackend>(definition: SceneDefinition, texture_root: impl AsRef<Path>, backend: &B) -> Self {
        Self {
            definition,
            texture_root: texture_root.as_ref().to_path_buf(),
            textures: TextureRegistry::for_backend(backend),
            materials: MaterialCatalog::new(),
            prepared: false,
        }
    }

    /// Create a composer reading textures from the configured directory with the configured sampler
    pub fn from_config<B: TextureBackend>(definition: SceneDefinition, config: &TextureConfig, backend: &B) -> Self {
        Self {
            textures: TextureRegistry::for_backend(backend).with_params(config.params()),
            ..Self::new(definition, &config.directory, backend)
        }
    }

    /// Make every scene resource resident
    ///
    /// Every primitive mesh is built, whether or not a step draws it.
    /// Texture decode failures and unsupported channel counts are logged and
    /// skipped. Running out of texture units, an invalid material or light
    /// rig, and mesh build failures abort with an error; the textures and
    /// materials registered so far are then released so `prepare` can be
    /// retried from a clean state.
    pub fn prepare<S, B, M>(&mut self, sink: &mut S, backend: &mut B, meshes: &mut M) -> Result<PrepareReport, SceneError>
    where
        S: ShaderSink + ?Sized,
        B: TextureBackend,
        M: MeshLibrary + ?Sized,
    {
        if self.prepared {
            return Err(SceneError::AlreadyPrepared);
        }
        log::info!(
            "Preparing scene: {} textures, {} materials, {} steps",
            self.definition.textures.len(),
            self.definition.materials.len(),
            self.definition.steps.len()
        );

        let report = match self.make_resident(sink, backend, meshes) {
            Ok(report) => report,
            Err(err) => {
                log::error!("Scene preparation failed, rolling back: {}", err);
                self.textures.release_all(backend);
                self.materials = MaterialCatalog::new();
                return Err(err);
            }
        };
        self.prepared = true;

        log::info!(
            "Scene prepared: {} materials, {} meshes built, {} textures loaded, {} failed",
            report.materials_defined,
            report.meshes_built,
            report.textures_loaded,
            report.textures_failed.len()
        );
        Ok(report)
    }

    fn make_resident<S, B, M>(&mut self, sink: &mut S, backend: &mut B, meshes: &mut M) -> Result<PrepareReport, SceneError>
    where
        S: ShaderSink + ?Sized,
        B: TextureBackend,
        M: MeshLibrary + ?Sized,
    {
        let mut report = PrepareReport::default();

        for def in &self.definition.materials {
            self.materials.define_from(def)?;
            report.materials_defined += 1;
        }

        self.definition.lighting.upload(sink)?;

        for kind in MeshKind::ALL {
            if meshes.load(kind)? {
                report.meshes_built += 1;
            }
        }
        log::debug!(
            "Steps draw {} of {} primitive kinds",
            self.definition.mesh_kinds().len(),
            MeshKind::ALL.len()
        );

        for source in &self.definition.textures {
            let path = self.texture_root.join(&source.path);
            match self.textures.load(backend, &path, &source.tag) {
                Ok(_) => report.textures_loaded += 1,
                Err(err @ (TextureError::Decode(_) | TextureError::UnsupportedChannels { .. })) => {
                    log::warn!("Skipping texture '{}': {}", source.tag, err);
                    report.textures_failed.push(source.tag.clone());
                }
                Err(err) => return Err(err.into()),
            }
        }
        self.textures.bind_all(backend)?;

        report.unresolved_steps = self.unresolved_steps();
        Ok(report)
    }

    fn unresolved_steps(&self) -> Vec<String> {
        let mut unresolved = Vec::new();
        for step in &self.definition.steps {
            let mut missing = false;
            if let Some(tag) = step.texture_tag() {
                if self.textures.find_slot(tag).is_err() {
                    log::warn!("Step '{}' will use the fallback color: texture '{}' is not registered", step.label, tag);
                    missing = true;
                }
            }
            if let Some(tag) = &step.material {
                if !self.materials.contains(tag) {
                    log::warn!("Step '{}' will use the fallback material: '{}' is not defined", step.label, tag);
                    missing = true;
                }
            }
            if missing {
                unresolved.push(step.label.clone());
            }
        }
        unresolved
    }

    /// Draw every step in authored order
    pub fn render<S, M>(&self, sink: &mut S, meshes: &mut M) -> Result<FrameStats, SceneError>
    where
        S: ShaderSink + ?Sized,
        M: MeshLibrary + ?Sized,
    {
        if !self.prepared {
            return Err(SceneError::NotPrepared);
        }
        let mut stats = FrameStats::default();
        let mut composer = TransformComposer::new(sink, &self.textures, &self.materials);
        meshes.begin_frame();

        for step in &self.definition.steps {
            composer.apply(step.scale, step.rotation.x, step.rotation.y, step.rotation.z, step.position);

            if let Surface::Textured { tag, uv_scale } = &step.surface {
                if composer.set_texture(tag).is_ok() {
                    composer.set_texture_uv_scale(uv_scale.x, uv_scale.y);
                } else {
                    log::trace!("Step '{}': texture '{}' missing", step.label, tag);
                    composer.set_flat_color(FALLBACK_COLOR);
                    stats.texture_fallbacks += 1;
                }
            }
            if let Some(tag) = &step.material {
                if composer.set_material(tag).is_err() {
                    log::trace!("Step '{}': material '{}' missing", step.label, tag);
                    stats.material_fallbacks += 1;
                }
            }
            if let Surface::Flat { color } = &step.surface {
                composer.set_flat_color(*color);
            }

            meshes.draw(step.mesh)?;
            stats.draws += 1;
        }

        Ok(stats)
    }

    /// Release every texture through the backend
    pub fn shutdown<B: TextureBackend>(&mut self, backend: &mut B) {
        self.textures.release_all(backend);
        self.prepared = false;
        log::info!("Scene shut down");
    }

    /// Registered textures
    #[must_use]
    pub const fn textures(&self) -> &TextureRegistry {
        &self.textures
    }

    /// Defined materials
    #[must_use]
    pub const fn materials(&self) -> &MaterialCatalog {
        &self.materials
    }

    /// True between a successful `prepare` and `shutdown`
    #[must_use]
    pub const fn is_prepared(&self) -> bool {
        self.prepared
    }
}
