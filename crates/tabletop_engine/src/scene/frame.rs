//! Per-frame orchestration
//!
//! One frame runs to completion on the calling thread: tick the clock, apply
//! held keys, upload view and projection, then draw the scene. The window
//! layer only forwards events and timestamps.

use crate::config::AppConfig;
use crate::foundation::time::FrameClock;
use crate::input::{CameraController, KeyInput};
use crate::render::mesh::MeshLibrary;
use crate::render::shader_sink::ShaderSink;
use crate::render::view::{ViewAssembler, ViewContext};
use crate::scene::{FrameStats, SceneComposer, SceneError};

/// Owns the view context and everything that mutates it between frames
#[derive(Debug)]
pub struct FrameDriver {
    clock: FrameClock,
    controller: CameraController,
    assembler: ViewAssembler,
    context: ViewContext,
}

impl FrameDriver {
    /// Create a driver from application configuration
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            clock: FrameClock::new(config.frame.max_frame_delta),
            controller: CameraController::new(),
            assembler: ViewAssembler::from_config(config),
            context: ViewContext::from_config(config),
        }
    }

    /// Forward an absolute pointer position
    pub fn on_pointer_moved(&mut self, x: f64, y: f64) {
        self.controller.on_pointer_moved(&mut self.context, x, y);
    }

    /// Forward a scroll offset
    pub fn on_scroll(&mut self, y_offset: f64) {
        self.controller.on_scroll(&mut self.context, y_offset);
    }

    /// Run one frame at timestamp `now` seconds
    pub fn frame<S, M, I>(
        &mut self,
        now: f64,
        input: &I,
        composer: &SceneComposer,
        sink: &mut S,
        meshes: &mut M,
    ) -> Result<FrameStats, SceneError>
    where
        S: ShaderSink + ?Sized,
        M: MeshLibrary + ?Sized,
        I: KeyInput + ?Sized,
    {
        let delta_time = self.clock.tick(now);
        self.controller.poll_keys(&mut self.context, input, delta_time);
        self.assembler.upload(&self.context, sink);
        let stats = composer.render(sink, meshes)?;

        if self.clock.frame_count() % 600 == 0 {
            log::debug!(
                "Frame {}: {} draws, {:.1} fps average",
                self.clock.frame_count(),
                stats.draws,
                self.clock.average_fps()
            );
        }
        Ok(stats)
    }

    /// Current view state
    #[must_use]
    pub const fn context(&self) -> &ViewContext {
        &self.context
    }

    /// Mutable view state
    pub fn context_mut(&mut self) -> &mut ViewContext {
        &mut self.context
    }

    /// Frame clock
    #[must_use]
    pub const fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// True once a shutdown has been requested
    #[must_use]
    pub const fn should_close(&self) -> bool {
        self.context.close_requested()
    }
}
