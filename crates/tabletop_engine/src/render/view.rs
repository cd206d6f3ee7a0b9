//! View and projection assembly
//!
//! Turns the camera and the projection mode into the `view` and
//! `projection` matrices. Both matrices and the eye position are uploaded
//! every frame whether or not anything changed.

use serde::{Deserialize, Serialize};

use crate::config::{AppConfig, DisplayConfig, ProjectionConfig};
use crate::foundation::math::{utils, Mat4, Mat4Ext};
use crate::render::camera::Camera;
use crate::render::shader_sink::{names, ShaderSink};

/// Projection used for the frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProjectionMode {
    /// Field of view follows the camera zoom
    #[default]
    Perspective,
    /// Fixed symmetric box
    Orthographic,
}

/// Mutable per-session view state owned by the frame loop
#[derive(Debug, Clone)]
pub struct ViewContext {
    /// The free-flying camera
    pub camera: Camera,
    /// Current projection mode
    pub projection_mode: ProjectionMode,
    close_requested: bool,
}

impl ViewContext {
    /// Create a context in perspective mode
    #[must_use]
    pub const fn new(camera: Camera) -> Self {
        Self {
            camera,
            projection_mode: ProjectionMode::Perspective,
            close_requested: false,
        }
    }

    /// Create a context from application configuration
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(Camera::from_config(&config.camera))
    }

    /// Ask the frame loop to stop after the current frame
    pub fn request_close(&mut self) {
        if !self.close_requested {
            log::info!("Shutdown requested");
        }
        self.close_requested = true;
    }

    /// True once shutdown has been requested
    #[must_use]
    pub const fn close_requested(&self) -> bool {
        self.close_requested
    }

    /// Switch projection mode, logging real changes
    pub fn set_projection_mode(&mut self, mode: ProjectionMode) {
        if self.projection_mode != mode {
            log::info!("Projection mode {:?} -> {:?}", self.projection_mode, mode);
            self.projection_mode = mode;
        }
    }
}

/// Builds view and projection matrices for a fixed display surface
#[derive(Debug, Clone)]
pub struct ViewAssembler {
    aspect: f32,
    ortho_half_extent: f32,
    near: f32,
    far: f32,
}

impl ViewAssembler {
    /// Create an assembler for a display surface and projection volume
    #[must_use]
    pub fn new(display: &DisplayConfig, projection: &ProjectionConfig) -> Self {
        Self {
            aspect: display.aspect_ratio(),
            ortho_half_extent: projection.ortho_half_extent,
            near: projection.near,
            far: projection.far,
        }
    }

    /// Create an assembler from application configuration
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.display, &config.projection)
    }

    /// Projection matrix for `mode`; perspective field of view is `zoom` degrees
    #[must_use]
    pub fn projection_matrix(&self, mode: ProjectionMode, zoom: f32) -> Mat4 {
        match mode {
            ProjectionMode::Perspective => {
                Mat4::perspective(utils::deg_to_rad(zoom), self.aspect, self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                let e = self.ortho_half_extent;
                Mat4::orthographic(-e, e, -e, e, self.near, self.far)
            }
        }
    }

    /// View and projection matrices for the current state
    #[must_use]
    pub fn assemble(&self, context: &ViewContext) -> (Mat4, Mat4) {
        (
            context.camera.view_matrix(),
            self.projection_matrix(context.projection_mode, context.camera.zoom),
        )
    }

    /// Upload `view`, `projection`, and `viewPosition`
    pub fn upload<S: ShaderSink + ?Sized>(&self, context: &ViewContext, sink: &mut S) -> (Mat4, Mat4) {
        let (view, projection) = self.assemble(context);
        sink.set_mat4(names::VIEW, &view);
        sink.set_mat4(names::PROJECTION, &projection);
        sink.set_vec3(names::VIEW_POSITION, context.camera.position);
        (view, projection)
    }
}
