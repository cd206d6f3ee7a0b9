//! Window, input wiring, and the frame loop

use glfw::{Action, CursorMode, Key, WindowEvent};

use tabletop_engine::config::{AppConfig, Config, ConfigError};
use tabletop_engine::input::{KeyCode, KeyInput};
use tabletop_engine::render::{HostTextureStore, PrimitiveMeshes, UniformTable};
use tabletop_engine::scene::{FrameDriver, SceneComposer, SceneDefinition, SceneError};

/// Upper bound on how long the loop waits for events between frames
const FRAME_INTERVAL: f64 = 1.0 / 60.0;

/// Application errors
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// GLFW could not be initialized
    #[error("GLFW initialization failed: {0}")]
    WindowInit(String),

    /// The window could not be created
    #[error("Window creation failed")]
    WindowCreation,

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Scene preparation or drawing failed
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),
}

/// Adapts the window's key state to the engine's polling interface
struct WindowKeys<'a> {
    window: &'a glfw::PWindow,
}

impl KeyInput for WindowKeys<'_> {
    fn is_pressed(&self, key: KeyCode) -> bool {
        let glfw_key = match key {
            KeyCode::W => Key::W,
            KeyCode::A => Key::A,
            KeyCode::S => Key::S,
            KeyCode::D => Key::D,
            KeyCode::Q => Key::Q,
            KeyCode::E => Key::E,
            KeyCode::P => Key::P,
            KeyCode::O => Key::O,
            KeyCode::Escape => Key::Escape,
        };
        self.window.get_key(glfw_key) == Action::Press
    }
}

/// Owns the window and every piece of scene state for the session
pub struct TabletopApp {
    glfw: glfw::Glfw,
    window: glfw::PWindow,
    events: glfw::GlfwReceiver<(f64, WindowEvent)>,
    driver: FrameDriver,
    composer: SceneComposer,
    sink: UniformTable,
    textures: HostTextureStore,
    meshes: PrimitiveMeshes,
}

impl TabletopApp {
    /// Open the window and prepare the scene
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let mut glfw = glfw::init(glfw::fail_on_errors).map_err(|e| AppError::WindowInit(format!("{e:?}")))?;
        glfw.window_hint(glfw::WindowHint::ClientApi(glfw::ClientApiHint::NoApi));
        glfw.window_hint(glfw::WindowHint::Resizable(false));

        let (mut window, events) = glfw
            .create_window(
                config.display.width,
                config.display.height,
                &config.display.title,
                glfw::WindowMode::Windowed,
            )
            .ok_or(AppError::WindowCreation)?;

        window.set_key_polling(true);
        window.set_cursor_pos_polling(true);
        window.set_scroll_polling(true);
        window.set_close_polling(true);
        window.set_cursor_mode(CursorMode::Disabled);
        log::info!(
            "Window created: {}x{} '{}'",
            config.display.width,
            config.display.height,
            config.display.title
        );

        let definition = match &config.scene_file {
            Some(path) => {
                log::info!("Loading scene from {:?}", path);
                SceneDefinition::load_from_file(path)?
            }
            None => SceneDefinition::still_life(),
        };

        let mut sink = UniformTable::new();
        let mut textures = HostTextureStore::new();
        let mut meshes = PrimitiveMeshes::new();
        let mut composer = SceneComposer::from_config(definition, &config.textures, &textures);
        let report = composer.prepare(&mut sink, &mut textures, &mut meshes)?;
        if !report.textures_failed.is_empty() {
            log::warn!("Textures unavailable: {}", report.textures_failed.join(", "));
        }

        Ok(Self {
            glfw,
            window,
            events,
            driver: FrameDriver::from_config(config),
            composer,
            sink,
            textures,
            meshes,
        })
    }

    /// Run frames until shutdown is requested
    pub fn run(&mut self) -> Result<(), AppError> {
        log::info!("Entering frame loop");

        while !self.window.should_close() && !self.driver.should_close() {
            self.glfw.wait_events_timeout(FRAME_INTERVAL);
            for (_, event) in glfw::flush_messages(&self.events) {
                match event {
                    WindowEvent::CursorPos(x, y) => self.driver.on_pointer_moved(x, y),
                    WindowEvent::Scroll(_, y) => self.driver.on_scroll(y),
                    WindowEvent::Close => self.driver.context_mut().request_close(),
                    _ => {}
                }
            }

            let keys = WindowKeys { window: &self.window };
            let now = self.glfw.get_time();
            self.driver
                .frame(now, &keys, &self.composer, &mut self.sink, &mut self.meshes)?;
        }

        let clock = self.driver.clock();
        log::info!(
            "Frame loop finished after {} frames ({:.1} fps average, {} uniform uploads)",
            clock.frame_count(),
            clock.average_fps(),
            self.sink.total_uploads()
        );
        self.window.set_should_close(true);
        Ok(())
    }
}

impl Drop for TabletopApp {
    fn drop(&mut self) {
        self.composer.shutdown(&mut self.textures);
    }
}
