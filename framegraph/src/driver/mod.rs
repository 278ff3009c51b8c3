//! Interfaces to the external GPU driver.
//!
//! The frame graph never talks to a graphics API itself. Pass executors issue
//! commands through [`DriverApi`], and transient resources are created and
//! destroyed through [`ResourceAllocator`]. Both are implemented by the
//! rendering backend; [`DummyDriver`] and [`DummyAllocator`] record calls for
//! tests and tooling.

#[cfg(feature = "dummy")]
mod dummy;

#[cfg(feature = "dummy")]
pub use dummy::{DriverCommand, DummyAllocator, DummyDriver};

use crate::error::DriverError;
use crate::types::{BufferDescriptor, ClearValue, TextureDescriptor};

/// Handle to a GPU texture owned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// Handle to a GPU buffer owned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub u64);

/// Handle to a render target owned by the backend (e.g. swap chain backed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderTargetHandle(pub u64);

/// Parameters for beginning a render pass.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RenderPassParams {
    /// Viewport width in pixels.
    pub width: u32,
    /// Viewport height in pixels.
    pub height: u32,
    /// Clear applied when the pass begins.
    pub clear: ClearValue,
}

impl RenderPassParams {
    /// Create parameters for a pass covering `width` x `height`.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            clear: ClearValue::None,
        }
    }

    /// Set the clear value.
    pub fn with_clear(mut self, clear: ClearValue) -> Self {
        self.clear = clear;
        self
    }
}

/// Command submission interface handed to pass executors.
///
/// Executors must not keep the driver beyond the call they receive it in.
pub trait DriverApi {
    /// Open a debug group, shown by GPU debuggers.
    fn push_group_marker(&mut self, name: &str);

    /// Close the innermost debug group.
    fn pop_group_marker(&mut self);

    /// Begin rendering into `target`.
    fn begin_render_pass(
        &mut self,
        target: RenderTargetHandle,
        params: &RenderPassParams,
    ) -> Result<(), DriverError>;

    /// End the current render pass.
    fn end_render_pass(&mut self);

    /// Submit everything recorded so far.
    fn flush(&mut self);
}

/// Allocator for the backing storage of transient frame graph resources.
pub trait ResourceAllocator {
    /// Create a texture for the named resource.
    fn create_texture(
        &mut self,
        name: &str,
        descriptor: &TextureDescriptor,
    ) -> Result<TextureHandle, DriverError>;

    /// Destroy a texture created by [`create_texture`](Self::create_texture).
    fn destroy_texture(&mut self, texture: TextureHandle);

    /// Create a buffer for the named resource.
    fn create_buffer(
        &mut self,
        name: &str,
        descriptor: &BufferDescriptor,
    ) -> Result<BufferHandle, DriverError>;

    /// Destroy a buffer created by [`create_buffer`](Self::create_buffer).
    fn destroy_buffer(&mut self, buffer: BufferHandle);
}
