//! Light sources.

use serde::{Deserialize, Serialize};
use whitted_math::{Interval, Ray, Vec3};

use crate::Color;

/// Distance falloff of a point light: `1 / (constant + linear*d + quadratic*d^2)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Default for Attenuation {
    fn default() -> Self {
        Self {
            constant: 0.3,
            linear: 0.3,
            quadratic: 0.4,
        }
    }
}

impl Attenuation {
    /// No falloff at all.
    pub const NONE: Attenuation = Attenuation {
        constant: 1.0,
        linear: 0.0,
        quadratic: 0.0,
    };

    pub fn factor(&self, distance: f32) -> f32 {
        let denom = self.constant + self.linear * distance + self.quadratic * distance * distance;
        if denom > 0.0 {
            1.0 / denom
        } else {
            0.0
        }
    }
}

/// A light source illuminating the scene.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Light {
    /// Parallel rays travelling along `direction`, e.g. the sun.
    Directional {
        direction: Vec3,
        color: Color,
        intensity: f32,
    },

    /// Omnidirectional emitter at a position.
    Point {
        position: Vec3,
        color: Color,
        intensity: f32,
        #[serde(default)]
        attenuation: Attenuation,
    },
}

/// Illumination arriving at a surface point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightSample {
    /// Unit vector from the point toward the light.
    pub direction: Vec3,

    /// Incident radiance (color times intensity after falloff).
    pub intensity: Color,
}

impl Light {
    /// White directional light shining along `direction`.
    pub fn directional(direction: Vec3, intensity: f32) -> Self {
        Light::Directional {
            direction,
            color: Color::ONE,
            intensity,
        }
    }

    /// White point light with the default attenuation.
    pub fn point(position: Vec3, intensity: f32) -> Self {
        Light::Point {
            position,
            color: Color::ONE,
            intensity,
            attenuation: Attenuation::default(),
        }
    }

    pub fn with_color(mut self, new_color: Color) -> Self {
        match &mut self {
            Light::Directional { color, .. } | Light::Point { color, .. } => *color = new_color,
        }
        self
    }

    /// Direction and intensity of the light as seen from `point`.
    pub fn sample(&self, point: Vec3) -> LightSample {
        match self {
            Light::Directional {
                direction,
                color,
                intensity,
            } => LightSample {
                direction: (-*direction).normalize_or_zero(),
                intensity: *color * *intensity,
            },
            Light::Point {
                position,
                color,
                intensity,
                attenuation,
            } => {
                let to_light = *position - point;
                LightSample {
                    direction: to_light.normalize_or_zero(),
                    intensity: *color * *intensity * attenuation.factor(to_light.length()),
                }
            }
        }
    }

    /// Ray from `origin` toward the light and the range of `t` in which a hit blocks it.
    ///
    /// A point light's ray reaches the light at `t = 1`, so only blockers strictly
    /// between the origin and the light count.
    pub fn shadow_ray(&self, origin: Vec3) -> (Ray, Interval) {
        match self {
            Light::Directional { direction, .. } => {
                (Ray::new(origin, -*direction), Interval::forward())
            }
            Light::Point { position, .. } => {
                (Ray::new(origin, *position - origin), Interval::segment())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directional_sample() {
        let light = Light::directional(Vec3::new(0.0, -2.0, 0.0), 0.5);
        let sample = light.sample(Vec3::new(10.0, 3.0, -7.0));
        assert_eq!(sample.direction, Vec3::Y);
        assert_eq!(sample.intensity, Color::splat(0.5));
    }

    #[test]
    fn test_point_attenuation() {
        let light = Light::point(Vec3::new(0.0, 2.0, 0.0), 1.0).with_color(Color::new(1.0, 0.0, 0.0));
        let sample = light.sample(Vec3::ZERO);
        assert!((sample.direction - Vec3::Y).length() < 1e-6);
        // 1 / (0.3 + 0.3*2 + 0.4*4)
        let expected = 1.0 / 2.5;
        assert!((sample.intensity.x - expected).abs() < 1e-6);
        assert_eq!(sample.intensity.y, 0.0);
    }

    #[test]
    fn test_attenuation_none() {
        assert_eq!(Attenuation::NONE.factor(100.0), 1.0);
        let broken = Attenuation {
            constant: 0.0,
            linear: 0.0,
            quadratic: 0.0,
        };
        assert_eq!(broken.factor(1.0), 0.0);
    }

    #[test]
    fn test_shadow_ray_ranges() {
        let origin = Vec3::new(1.0, 0.0, 0.0);

        let (ray, range) = Light::point(Vec3::new(1.0, 4.0, 0.0), 1.0).shadow_ray(origin);
        assert_eq!(ray.at(1.0), Vec3::new(1.0, 4.0, 0.0));
        assert!(range.accepts(0.5));
        assert!(!range.accepts(1.0));

        let (ray, range) = Light::directional(Vec3::NEG_Y, 1.0).shadow_ray(origin);
        assert_eq!(ray.direction(), Vec3::Y);
        assert!(range.accepts(1e6));
    }

    #[test]
    fn test_serde_tagged() {
        let light = Light::point(Vec3::new(1.0, 2.0, 3.0), 4.0);
        let json = serde_json::to_string(&light).unwrap();
        assert!(json.contains("\"type\":\"point\""));
        let back: Light = serde_json::from_str(&json).unwrap();
        assert_eq!(back, light);

        // Attenuation may be omitted
        let parsed: Light = serde_json::from_str(
            r#"{"type":"point","position":[0,1,0],"color":[1,1,1],"intensity":2.0}"#,
        )
        .unwrap();
        assert!(matches!(parsed, Light::Point { attenuation, .. } if attenuation == Attenuation::default()));
    }
}
