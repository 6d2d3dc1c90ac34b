//! What a ray sees when it escapes the scene.

use serde::{Deserialize, Serialize};
use whitted_math::Vec3;

use crate::Color;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Background {
    /// The same color in every direction.
    Solid { color: Color },

    /// Vertical blend from `ground` (looking straight down) to `sky` (straight up).
    Gradient { sky: Color, ground: Color },
}

impl Default for Background {
    fn default() -> Self {
        Self::basic_sky()
    }
}

impl Background {
    pub fn solid(color: Color) -> Self {
        Background::Solid { color }
    }

    /// Light blue sky fading to white at the horizon and below.
    pub fn basic_sky() -> Self {
        Background::Gradient {
            sky: Color::new(0.5, 0.7, 1.0),
            ground: Color::ONE,
        }
    }

    /// Color seen along `direction` (need not be normalized).
    pub fn color(&self, direction: Vec3) -> Color {
        match self {
            Background::Solid { color } => *color,
            Background::Gradient { sky, ground } => {
                let unit_direction = direction.normalize_or_zero();
                let t = 0.5 * (unit_direction.y + 1.0);
                *ground * (1.0 - t) + *sky * t
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_ignores_direction() {
        let bg = Background::solid(Color::new(0.1, 0.2, 0.3));
        assert_eq!(bg.color(Vec3::Y), bg.color(Vec3::new(1.0, -5.0, 2.0)));
    }

    #[test]
    fn test_gradient_endpoints() {
        let bg = Background::Gradient {
            sky: Color::new(0.0, 0.0, 1.0),
            ground: Color::new(1.0, 0.0, 0.0),
        };
        assert!((bg.color(Vec3::new(0.0, 10.0, 0.0)) - Color::new(0.0, 0.0, 1.0)).length() < 1e-6);
        assert!((bg.color(Vec3::NEG_Y) - Color::new(1.0, 0.0, 0.0)).length() < 1e-6);
        assert!((bg.color(Vec3::X) - Color::new(0.5, 0.0, 0.5)).length() < 1e-6);
    }

    #[test]
    fn test_serde_round_trip() {
        let bg = Background::basic_sky();
        let json = serde_json::to_string(&bg).unwrap();
        let back: Background = serde_json::from_str(&json).unwrap();
        assert_eq!(bg, back);
    }
}
