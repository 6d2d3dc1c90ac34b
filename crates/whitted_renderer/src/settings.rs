//! Render configuration.

use serde::{Deserialize, Serialize};

use crate::{RenderError, RenderResult};

/// Deepest recursion a render may request.
///
/// Shading recurses once per bounce on the worker's stack, so the depth must stay bounded.
pub const MAX_TRACE_DEPTH: u32 = 256;

/// Options consumed by [`crate::render`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    /// Each pixel gets `samples_per_axis^2` stratified samples
    pub samples_per_axis: u32,
    /// Maximum recursion depth of secondary rays
    pub max_depth: u32,
    /// Contributions weighted below this are not traced
    pub min_weight: f32,
    pub shadows: bool,
    pub reflections: bool,
    pub refractions: bool,
    /// Seed for the sub-pixel jitter
    pub seed: u64,
    /// Worker threads; `None` uses the global rayon pool
    pub threads: Option<usize>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            samples_per_axis: 2,
            max_depth: 10,
            min_weight: 0.05,
            shadows: true,
            reflections: true,
            refractions: true,
            seed: 42,
            threads: None,
        }
    }
}

impl RenderSettings {
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_samples_per_axis(mut self, samples_per_axis: u32) -> Self {
        self.samples_per_axis = samples_per_axis;
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn samples_per_pixel(&self) -> u32 {
        self.samples_per_axis * self.samples_per_axis
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Reject settings a render cannot run with.
    pub fn validate(&self) -> RenderResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::ZeroResolution);
        }
        if self.samples_per_axis == 0 {
            return Err(RenderError::ZeroSamples);
        }
        if self.max_depth > MAX_TRACE_DEPTH {
            return Err(RenderError::depth_too_large(self.max_depth));
        }
        if !(0.0..=1.0).contains(&self.min_weight) {
            return Err(RenderError::InvalidMinWeight(self.min_weight));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = RenderSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.samples_per_pixel(), 4);
        assert!((settings.aspect() - 4.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_validation_errors() {
        let base = RenderSettings::default();

        let zero = base.clone().with_resolution(0, 10);
        assert!(matches!(zero.validate(), Err(RenderError::ZeroResolution)));

        let no_samples = base.clone().with_samples_per_axis(0);
        assert!(matches!(no_samples.validate(), Err(RenderError::ZeroSamples)));

        let deep = base.clone().with_max_depth(MAX_TRACE_DEPTH + 1);
        assert!(matches!(
            deep.validate(),
            Err(RenderError::DepthTooLarge { depth: 257, limit: 256 })
        ));
        assert!(base.clone().with_max_depth(MAX_TRACE_DEPTH).validate().is_ok());

        for bad in [-0.1, 1.5, f32::NAN] {
            let settings = RenderSettings {
                min_weight: bad,
                ..base.clone()
            };
            assert!(matches!(settings.validate(), Err(RenderError::InvalidMinWeight(_))));
        }
    }
}
