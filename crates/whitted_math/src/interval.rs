use crate::RAY_EPSILON;

/// A range of ray parameters.
///
/// Hit acceptance is half-open: `min < t <= max`, so a hit exactly at the ray origin is
/// never accepted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Every hit in front of the ray origin, past the self-intersection epsilon.
    pub const fn forward() -> Self {
        Self::new(RAY_EPSILON, f32::INFINITY)
    }

    /// Hits strictly between the ray origin and the ray's `t = 1` point.
    ///
    /// Used for shadow rays whose direction spans the whole distance to a point light.
    pub fn segment() -> Self {
        Self::new(RAY_EPSILON, 1.0 - RAY_EPSILON)
    }

    /// Returns the size of the interval (max - min).
    pub fn size(&self) -> f32 {
        self.max - self.min
    }

    /// Returns true if `t` is an accepted hit distance (`min < t <= max`).
    pub fn accepts(&self, t: f32) -> bool {
        self.min < t && t <= self.max
    }

    /// Returns true if x is within the interval [min, max] (inclusive).
    pub fn contains(&self, x: f32) -> bool {
        self.min <= x && x <= self.max
    }

    /// Creates an interval that surrounds two other intervals.
    pub fn surrounding(a: &Interval, b: &Interval) -> Interval {
        Interval::new(a.min.min(b.min), a.max.max(b.max))
    }

    /// An empty interval (min > max, contains nothing).
    pub const EMPTY: Interval = Interval {
        min: f32::INFINITY,
        max: f32::NEG_INFINITY,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_size() {
        assert_eq!(Interval::new(2.0, 7.0).size(), 5.0);
        assert_eq!(Interval::new(-5.0, 5.0).size(), 10.0);
    }

    #[test]
    fn test_accepts_is_half_open() {
        let interval = Interval::new(0.0, 10.0);

        assert!(!interval.accepts(0.0));
        assert!(interval.accepts(10.0));
        assert!(interval.accepts(5.0));
        assert!(!interval.accepts(10.1));
    }

    #[test]
    fn test_forward_rejects_self_hits() {
        let forward = Interval::forward();
        assert!(!forward.accepts(0.0));
        assert!(!forward.accepts(RAY_EPSILON));
        assert!(forward.accepts(1e6));
    }

    #[test]
    fn test_segment_stops_before_target() {
        let segment = Interval::segment();
        assert!(segment.accepts(0.5));
        assert!(!segment.accepts(1.0));
        assert!(!segment.accepts(2.0));
    }

    #[test]
    fn test_interval_empty() {
        let empty = Interval::EMPTY;
        assert!(empty.min > empty.max);
        assert!(!empty.contains(0.0));
        assert!(!empty.accepts(0.0));
    }

    #[test]
    fn test_surrounding() {
        let s = Interval::surrounding(&Interval::new(1.0, 2.0), &Interval::new(-1.0, 0.5));
        assert_eq!(s, Interval::new(-1.0, 2.0));
    }
}
