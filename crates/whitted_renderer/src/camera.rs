//! Pinhole camera for primary ray generation.

use serde::{Deserialize, Serialize};
use whitted_math::{Ray, Vec3};

/// Where the camera sits and what it sees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraSettings {
    pub look_from: Vec3,
    pub look_at: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub vfov: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            look_from: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            up: Vec3::Y,
            vfov: 90.0,
        }
    }
}

/// Camera for generating rays into the scene.
///
/// The viewport is a rectangle one unit in front of the eye; `(u, v) = (0, 0)` is its
/// bottom-left corner and `(1, 1)` its top-right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    settings: CameraSettings,
    aspect: f32,

    // Derived viewport
    origin: Vec3,
    lower_left: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
}

impl Camera {
    /// Create a camera with a square aspect ratio.
    pub fn new(look_from: Vec3, look_at: Vec3, up: Vec3, vfov: f32) -> Self {
        Self::from_settings(
            CameraSettings {
                look_from,
                look_at,
                up,
                vfov,
            },
            1.0,
        )
    }

    pub fn from_settings(settings: CameraSettings, aspect: f32) -> Self {
        let theta = settings.vfov.to_radians();
        let viewport_height = 2.0 * (theta / 2.0).tan();
        let viewport_width = viewport_height * aspect;

        // Camera basis vectors
        let w = (settings.look_from - settings.look_at)
            .try_normalize()
            .unwrap_or(Vec3::Z);
        let u = settings.up.cross(w).try_normalize().unwrap_or(Vec3::X);
        let v = w.cross(u);

        let origin = settings.look_from;
        let horizontal = viewport_width * u;
        let vertical = viewport_height * v;
        let lower_left = origin - horizontal / 2.0 - vertical / 2.0 - w;

        Self {
            settings,
            aspect,
            origin,
            lower_left,
            horizontal,
            vertical,
        }
    }

    /// The same camera with a different width/height ratio.
    pub fn with_aspect(&self, aspect: f32) -> Self {
        Self::from_settings(self.settings, aspect)
    }

    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Ray from the eye through viewport point `(u, v)`.
    pub fn get_ray(&self, u: f32, v: f32) -> Ray {
        let target = self.lower_left + u * self.horizontal + v * self.vertical;
        Ray::new(self.origin, target - self.origin)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_settings(CameraSettings::default(), 1.0)
    }
}
