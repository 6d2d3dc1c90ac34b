//! Ray counters for a single render.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Counters shared by every worker of one render.
///
/// Updates use relaxed atomics; the counts are only read once all workers have joined.
#[derive(Debug, Default)]
pub struct RenderStats {
    primary: AtomicU64,
    shadow: AtomicU64,
    reflection: AtomicU64,
    refraction: AtomicU64,
}

impl RenderStats {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record_primary(&self) {
        self.primary.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_shadow(&self) {
        self.shadow.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_reflection(&self) {
        self.reflection.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_refraction(&self) {
        self.refraction.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            primary_rays: self.primary.load(Ordering::Relaxed),
            shadow_rays: self.shadow.load(Ordering::Relaxed),
            reflection_rays: self.reflection.load(Ordering::Relaxed),
            refraction_rays: self.refraction.load(Ordering::Relaxed),
        }
    }
}

/// Plain copy of the counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub primary_rays: u64,
    pub shadow_rays: u64,
    pub reflection_rays: u64,
    pub refraction_rays: u64,
}

impl StatsSnapshot {
    pub fn total(&self) -> u64 {
        self.primary_rays + self.shadow_rays + self.reflection_rays + self.refraction_rays
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rays (primary {}, shadow {}, reflection {}, refraction {})",
            self.total(),
            self.primary_rays,
            self.shadow_rays,
            self.reflection_rays,
            self.refraction_rays
        )
    }
}
