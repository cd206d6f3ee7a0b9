//! Whole-frame behaviour: clock, key polling, view upload, scene draw

use crate::config::AppConfig;
use crate::foundation::logging;
use crate::foundation::math::{Mat4, Vec3};
use crate::input::{KeyCode, KeyState};
use crate::render::mesh::PrimitiveMeshes;
use crate::render::shader_sink::{names, UniformTable};
use crate::render::texture::HostTextureStore;
use crate::render::view::ProjectionMode;
use crate::scene::{FrameDriver, SceneComposer, SceneDefinition};
use approx::assert_relative_eq;

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    struct Harness {
        driver: FrameDriver,
        composer: SceneComposer,
        table: UniformTable,
        meshes: PrimitiveMeshes,
    }

    impl Harness {
        fn new() -> Self {
            logging::init_for_tests();
            let config = AppConfig::default();
            let mut backend = HostTextureStore::new();
            let mut meshes = PrimitiveMeshes::new();
            let mut table = UniformTable::new();
            let mut composer = SceneComposer::new(SceneDefinition::still_life(), "missing-dir", &backend);
            composer.prepare(&mut table, &mut backend, &mut meshes).unwrap();
            Self {
                driver: FrameDriver::from_config(&config),
                composer,
                table,
                meshes,
            }
        }

        fn frame(&mut self, now: f64, keys: &KeyState) {
            self.driver
                .frame(now, keys, &self.composer, &mut self.table, &mut self.meshes)
                .unwrap();
        }
    }

    #[test]
    fn test_first_frame_does_not_move() {
        let mut harness = Harness::new();
        let start = harness.driver.context().camera.position;
        harness.frame(100.0, &KeyState::with_pressed(&[KeyCode::W]));
        assert_relative_eq!(harness.driver.context().camera.position, start, epsilon = EPSILON);
        assert_eq!(harness.meshes.stats().draw_calls, 16);
    }

    #[test]
    fn test_forward_key_moves_by_speed_times_delta() {
        let mut harness = Harness::new();
        let idle = KeyState::new();
        harness.frame(1.0, &idle);
        let start = harness.driver.context().camera.position;
        let front = harness.driver.context().camera.front;

        harness.frame(1.1, &KeyState::with_pressed(&[KeyCode::W]));
        let moved = harness.driver.context().camera.position;
        assert_relative_eq!(moved, start + front * 0.5, epsilon = 1e-4);
        assert_relative_eq!(
            harness.table.vec3(names::VIEW_POSITION).unwrap(),
            moved,
            epsilon = EPSILON
        );
    }

    #[test]
    fn test_stalled_frame_is_clamped() {
        let mut harness = Harness::new();
        harness.frame(1.0, &KeyState::new());
        let start = harness.driver.context().camera.position;
        let front = harness.driver.context().camera.front;

        // A ten second stall moves no further than the 0.25 s ceiling allows
        harness.frame(11.0, &KeyState::with_pressed(&[KeyCode::W]));
        assert_relative_eq!(
            harness.driver.context().camera.position,
            start + front * 1.25,
            epsilon = 1e-4
        );
    }

    #[test]
    fn test_view_and_projection_uploaded_every_frame() {
        let mut harness = Harness::new();
        let idle = KeyState::new();
        for i in 0..4 {
            harness.frame(f64::from(i) * 0.016, &idle);
        }
        assert_eq!(harness.table.upload_count(names::VIEW), 4);
        assert_eq!(harness.table.upload_count(names::PROJECTION), 4);
        assert_eq!(harness.table.upload_count(names::VIEW_POSITION), 4);
    }

    #[test]
    fn test_orthographic_key_changes_uploaded_projection() {
        let mut harness = Harness::new();
        harness.frame(0.0, &KeyState::new());
        let perspective = harness.table.mat4(names::PROJECTION).unwrap();

        harness.frame(0.016, &KeyState::with_pressed(&[KeyCode::O]));
        assert_eq!(harness.driver.context().projection_mode, ProjectionMode::Orthographic);
        let ortho = harness.table.mat4(names::PROJECTION).unwrap();
        assert!(ortho != perspective);
        assert_relative_eq!(ortho[(3, 3)], 1.0, epsilon = EPSILON);
        assert_relative_eq!(ortho[(0, 0)], 0.1, epsilon = EPSILON);
    }

    #[test]
    fn test_pointer_and_scroll_through_driver() {
        let mut harness = Harness::new();
        let yaw = harness.driver.context().camera.yaw;

        harness.driver.on_pointer_moved(300.0, 300.0);
        harness.driver.on_pointer_moved(350.0, 300.0);
        assert_relative_eq!(harness.driver.context().camera.yaw, yaw + 5.0, epsilon = EPSILON);

        for _ in 0..10 {
            harness.driver.on_scroll(-1.0);
        }
        assert_relative_eq!(harness.driver.context().camera.movement_speed, 1.0);

        harness.frame(0.0, &KeyState::new());
        let view: Mat4 = harness.table.mat4(names::VIEW).unwrap();
        let eye = harness.driver.context().camera.position;
        let eye_in_view = view.transform_point(&eye.into());
        assert_relative_eq!(eye_in_view.coords, Vec3::zeros(), epsilon = 1e-4);
    }

    #[test]
    fn test_escape_stops_the_loop() {
        let mut harness = Harness::new();
        assert!(!harness.driver.should_close());
        harness.frame(0.0, &KeyState::with_pressed(&[KeyCode::Escape]));
        assert!(harness.driver.should_close());
    }
}
