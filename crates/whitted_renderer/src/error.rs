//! Errors reported before a render starts.

use thiserror::Error;
use whitted_core::MeshError;

use crate::MAX_TRACE_DEPTH;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("image resolution must be non-zero")]
    ZeroResolution,

    #[error("samples per axis must be at least 1")]
    ZeroSamples,

    #[error("max depth {depth} exceeds the supported limit of {limit}")]
    DepthTooLarge { depth: u32, limit: u32 },

    #[error("minimum weight must be a finite value in [0, 1], got {0}")]
    InvalidMinWeight(f32),

    #[error("failed to build render thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error(transparent)]
    Mesh(#[from] MeshError),
}

impl RenderError {
    pub(crate) fn depth_too_large(depth: u32) -> Self {
        RenderError::DepthTooLarge {
            depth,
            limit: MAX_TRACE_DEPTH,
        }
    }
}

pub type RenderResult<T> = Result<T, RenderError>;
