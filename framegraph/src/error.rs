//! Error types for frame graph execution.
//!
//! Mistakes in graph construction (unknown handles, linking after culling,
//! making a referenced node a leaf) are programming errors and panic. Only
//! failures reported by the external driver or allocator travel through these
//! types.

use thiserror::Error;

/// Errors reported by a [`DriverApi`](crate::driver::DriverApi) or a
/// [`ResourceAllocator`](crate::driver::ResourceAllocator).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DriverError {
    #[error("Failed to allocate resource '{name}': {reason}")]
    AllocationFailed { name: String, reason: String },
    #[error("Out of GPU memory")]
    OutOfMemory,
    #[error("Device lost")]
    DeviceLost,
    #[error("Driver error: {0}")]
    Other(String),
}

/// Errors that can occur while executing a compiled frame graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameGraphError {
    /// A resource could not be materialised before the pass that first uses it.
    #[error("Resource allocation failed: {0}")]
    Driver(#[from] DriverError),
    /// A pass executor reported a failure.
    #[error("Pass '{pass}' failed: {source}")]
    PassFailed {
        pass: String,
        #[source]
        source: DriverError,
    },
}

pub type FrameGraphResult<T> = Result<T, FrameGraphError>;
