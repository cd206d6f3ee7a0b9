//! Static scene lighting
//!
//! One directional light plus a short array of point lights, uploaded once
//! when a scene is prepared. The shading program reserves
//! [`MAX_POINT_LIGHTS`] point-light slots; unused slots are uploaded as
//! inactive so stale values never contribute.

use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec3;
use crate::render::shader_sink::{names, ShaderSink};

/// Point-light slots reserved by the shading program
pub const MAX_POINT_LIGHTS: usize = 4;

/// Parallel light such as low sun through a window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionalLight {
    /// Direction the light travels
    pub direction: Vec3,
    /// Ambient contribution
    pub ambient: Vec3,
    /// Diffuse contribution
    pub diffuse: Vec3,
    /// Specular contribution
    pub specular: Vec3,
}

/// Omnidirectional light at a position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointLight {
    /// World position
    pub position: Vec3,
    /// Ambient contribution
    pub ambient: Vec3,
    /// Diffuse contribution
    pub diffuse: Vec3,
    /// Specular contribution
    pub specular: Vec3,
}

/// Lighting configuration errors
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LightingError {
    /// More point lights than the program has slots for
    #[error("At most {max} point lights are supported, got {count}")]
    TooManyPointLights {
        /// Requested count
        count: usize,
        /// Slot count
        max: usize,
    },
}

/// Complete light rig for a scene
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LightingEnvironment {
    /// Optional directional light
    pub directional: Option<DirectionalLight>,
    /// Point lights, at most [`MAX_POINT_LIGHTS`]
    pub point_lights: Vec<PointLight>,
}

impl LightingEnvironment {
    /// Warm low-angle daylight with two soft fill lamps
    #[must_use]
    pub fn morning_room() -> Self {
        let intensity = 0.8;
        Self {
            directional: Some(DirectionalLight {
                direction: Vec3::new(-1.0, -1.0, -0.3),
                ambient: Vec3::new(0.4, 0.4, 0.35) * intensity,
                diffuse: Vec3::new(1.0, 0.85, 0.65) * intensity,
                specular: Vec3::new(0.9, 0.8, 0.6) * intensity,
            }),
            point_lights: vec![
                PointLight {
                    position: Vec3::new(-4.0, 5.0, 2.0),
                    ambient: Vec3::new(0.15, 0.15, 0.15),
                    diffuse: Vec3::new(0.25, 0.25, 0.3),
                    specular: Vec3::new(0.1, 0.1, 0.1),
                },
                PointLight {
                    position: Vec3::new(2.0, 6.0, -3.0),
                    ambient: Vec3::new(0.2, 0.18, 0.15),
                    diffuse: Vec3::new(0.45, 0.4, 0.35),
                    specular: Vec3::new(0.5, 0.4, 0.3),
                },
            ],
        }
    }

    /// Append a point light
    pub fn add_point_light(&mut self, light: PointLight) -> Result<(), LightingError> {
        if self.point_lights.len() >= MAX_POINT_LIGHTS {
            return Err(LightingError::TooManyPointLights {
                count: self.point_lights.len() + 1,
                max: MAX_POINT_LIGHTS,
            });
        }
        self.point_lights.push(light);
        Ok(())
    }

    /// Check the point-light count against the program's slots
    pub fn validate(&self) -> Result<(), LightingError> {
        if self.point_lights.len() > MAX_POINT_LIGHTS {
            return Err(LightingError::TooManyPointLights {
                count: self.point_lights.len(),
                max: MAX_POINT_LIGHTS,
            });
        }
        Ok(())
    }

    /// Push every light and the lighting toggle to the sink
    pub fn upload<S: ShaderSink + ?Sized>(&self, sink: &mut S) -> Result<(), LightingError> {
        self.validate()?;
        sink.set_bool(names::USE_LIGHTING, true);

        match &self.directional {
            Some(light) => {
                sink.set_vec3(&names::directional_light("direction"), light.direction);
                sink.set_vec3(&names::directional_light("ambient"), light.ambient);
                sink.set_vec3(&names::directional_light("diffuse"), light.diffuse);
                sink.set_vec3(&names::directional_light("specular"), light.specular);
                sink.set_bool(&names::directional_light("bActive"), true);
            }
            None => sink.set_bool(&names::directional_light("bActive"), false),
        }

        for index in 0..MAX_POINT_LIGHTS {
            match self.point_lights.get(index) {
                Some(light) => {
                    sink.set_vec3(&names::point_light(index, "position"), light.position);
                    sink.set_vec3(&names::point_light(index, "ambient"), light.ambient);
                    sink.set_vec3(&names::point_light(index, "diffuse"), light.diffuse);
                    sink.set_vec3(&names::point_light(index, "specular"), light.specular);
                    sink.set_bool(&names::point_light(index, "bActive"), true);
                }
                None => sink.set_bool(&names::point_light(index, "bActive"), false),
            }
        }

        log::info!(
            "Uploaded lighting: directional {}, {} point lights",
            if self.directional.is_some() { "on" } else { "off" },
            self.point_lights.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::shader_sink::UniformTable;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-6;

    #[test]
    fn test_morning_room_values() {
        let env = LightingEnvironment::morning_room();
        let sun = env.directional.unwrap();
        assert_relative_eq!(sun.ambient, Vec3::new(0.32, 0.32, 0.28), epsilon = EPSILON);
        assert_relative_eq!(sun.diffuse, Vec3::new(0.8, 0.68, 0.52), epsilon = EPSILON);
        assert_eq!(env.point_lights.len(), 2);
    }

    #[test]
    fn test_upload_marks_unused_slots_inactive() {
        let mut table = UniformTable::new();
        LightingEnvironment::morning_room().upload(&mut table).unwrap();

        assert_eq!(table.bool(names::USE_LIGHTING), Some(true));
        assert_eq!(table.bool("directionalLight.bActive"), Some(true));
        assert_eq!(table.bool("pointLights[0].bActive"), Some(true));
        assert_eq!(table.bool("pointLights[1].bActive"), Some(true));
        assert_eq!(table.bool("pointLights[2].bActive"), Some(false));
        assert_eq!(table.bool("pointLights[3].bActive"), Some(false));
        assert_relative_eq!(
            table.vec3("pointLights[1].position").unwrap(),
            Vec3::new(2.0, 6.0, -3.0),
            epsilon = EPSILON
        );
    }

    #[test]
    fn test_point_light_limit() {
        let mut env = LightingEnvironment::default();
        let lamp = LightingEnvironment::morning_room().point_lights[0];
        for _ in 0..MAX_POINT_LIGHTS {
            env.add_point_light(lamp).unwrap();
        }
        assert_eq!(
            env.add_point_light(lamp),
            Err(LightingError::TooManyPointLights { count: 5, max: 4 })
        );
    }
}
