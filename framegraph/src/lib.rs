//! # RedLilium Frame Graph
//!
//! Per-frame scheduling of render passes and the transient resources they use.
//!
//! ## Overview
//!
//! This crate provides:
//! - [`DependencyGraph`] - Reference-counted dependency graph with culling
//! - [`FrameGraph`] - Passes and versioned resources, compiled and executed per frame
//! - [`DriverApi`] and [`ResourceAllocator`] - The GPU seams a frame graph drives
//! - A recording dummy driver (feature `dummy`) for testing without a GPU
//!
//! ## Example
//!
//! ```ignore
//! use redlilium_framegraph::{DummyAllocator, DummyDriver, FrameGraph};
//!
//! let mut allocator = DummyAllocator::new();
//! let mut driver = DummyDriver::new();
//! let mut fg = FrameGraph::new(&mut allocator);
//! let color = fg.create_texture("color", descriptor);
//! let (_, color) = fg.add_pass("draw", |b| b.write(color), |_, _, _| Ok(()));
//! fg.present(color);
//! fg.compile().execute(&mut driver)?;
//! ```

pub mod profiling;

pub mod driver;
pub mod error;
pub mod frame_graph;
pub mod graph;
pub mod types;

// Re-export main types for convenience
#[cfg(feature = "dummy")]
pub use driver::{DummyAllocator, DummyDriver};
pub use driver::{
    BufferHandle, DriverApi, RenderPassParams, RenderTargetHandle, ResourceAllocator,
    TextureHandle,
};
pub use error::{DriverError, FrameGraphError, FrameGraphResult};
pub use frame_graph::{
    FrameGraph, FrameGraphConfig, FrameGraphNode, PassBuilder, PassHandle, PassKind,
    PassResources, ResourceHandle,
};
pub use graph::{DependencyGraph, GraphNode, Node, NodeId};
pub use types::{
    BufferDescriptor, BufferUsage, ClearValue, Extent3d, ResourceDescriptor, TextureDescriptor,
    TextureFormat, TextureUsage,
};

/// Frame graph library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the frame graph subsystem.
pub fn init() {
    log::info!("RedLilium Frame Graph v{} initialized", VERSION);
}
