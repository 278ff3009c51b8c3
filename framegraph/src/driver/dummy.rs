//! Recording driver and allocator for testing without a GPU.
//!
//! Nothing here touches hardware. Every call is logged at trace level and
//! recorded so tests can assert on what the frame graph asked for.

use std::collections::HashSet;

use crate::error::DriverError;
use crate::types::{BufferDescriptor, TextureDescriptor};

use super::{
    BufferHandle, DriverApi, RenderPassParams, RenderTargetHandle, ResourceAllocator,
    TextureHandle,
};

/// A command received by [`DummyDriver`].
#[derive(Debug, Clone, PartialEq)]
pub enum DriverCommand {
    PushGroupMarker(String),
    PopGroupMarker,
    BeginRenderPass {
        target: RenderTargetHandle,
        params: RenderPassParams,
    },
    EndRenderPass,
    Flush,
}

/// Dummy driver that records commands.
#[derive(Debug, Default)]
pub struct DummyDriver {
    commands: Vec<DriverCommand>,
    fail_render_passes: bool,
}

impl DummyDriver {
    /// Create a new dummy driver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the backend name.
    pub fn name(&self) -> &'static str {
        "Dummy Driver"
    }

    /// Make every subsequent `begin_render_pass` fail with `DeviceLost`.
    pub fn fail_render_passes(&mut self) {
        self.fail_render_passes = true;
    }

    /// All commands recorded so far.
    pub fn commands(&self) -> &[DriverCommand] {
        &self.commands
    }

    /// Names of the group markers pushed so far, in order.
    pub fn group_markers(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DriverCommand::PushGroupMarker(name) => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl DriverApi for DummyDriver {
    fn push_group_marker(&mut self, name: &str) {
        log::trace!("DummyDriver: push group marker '{}'", name);
        self.commands
            .push(DriverCommand::PushGroupMarker(name.to_string()));
    }

    fn pop_group_marker(&mut self) {
        log::trace!("DummyDriver: pop group marker");
        self.commands.push(DriverCommand::PopGroupMarker);
    }

    fn begin_render_pass(
        &mut self,
        target: RenderTargetHandle,
        params: &RenderPassParams,
    ) -> Result<(), DriverError> {
        if self.fail_render_passes {
            return Err(DriverError::DeviceLost);
        }
        log::trace!(
            "DummyDriver: begin render pass on {:?} ({}x{})",
            target,
            params.width,
            params.height
        );
        self.commands.push(DriverCommand::BeginRenderPass {
            target,
            params: *params,
        });
        Ok(())
    }

    fn end_render_pass(&mut self) {
        log::trace!("DummyDriver: end render pass");
        self.commands.push(DriverCommand::EndRenderPass);
    }

    fn flush(&mut self) {
        log::trace!("DummyDriver: flush");
        self.commands.push(DriverCommand::Flush);
    }
}

/// Dummy allocator that hands out sequential handles and tracks live ones.
#[derive(Debug, Default)]
pub struct DummyAllocator {
    next_handle: u64,
    live_textures: HashSet<TextureHandle>,
    live_buffers: HashSet<BufferHandle>,
    created: Vec<String>,
    destroyed: usize,
    fail_on: Option<String>,
}

impl DummyAllocator {
    /// Create a new dummy allocator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make creation of the resource called `name` fail.
    pub fn fail_on(&mut self, name: impl Into<String>) {
        self.fail_on = Some(name.into());
    }

    /// Names of all resources created so far, in creation order.
    pub fn created(&self) -> &[String] {
        &self.created
    }

    /// Number of destroy calls received.
    pub fn destroyed_count(&self) -> usize {
        self.destroyed
    }

    /// Number of textures and buffers currently alive.
    pub fn live_count(&self) -> usize {
        self.live_textures.len() + self.live_buffers.len()
    }

    fn allocate(&mut self, name: &str) -> Result<u64, DriverError> {
        if self.fail_on.as_deref() == Some(name) {
            return Err(DriverError::AllocationFailed {
                name: name.to_string(),
                reason: "injected failure".to_string(),
            });
        }
        let handle = self.next_handle;
        self.next_handle += 1;
        self.created.push(name.to_string());
        Ok(handle)
    }
}

impl ResourceAllocator for DummyAllocator {
    fn create_texture(
        &mut self,
        name: &str,
        descriptor: &TextureDescriptor,
    ) -> Result<TextureHandle, DriverError> {
        log::trace!(
            "DummyAllocator: creating {} texture '{}' ({}x{}x{}, {} bytes)",
            if descriptor.format.is_depth() { "depth" } else { "color" },
            name,
            descriptor.size.width,
            descriptor.size.height,
            descriptor.size.depth,
            descriptor.base_level_bytes()
        );
        let texture = TextureHandle(self.allocate(name)?);
        self.live_textures.insert(texture);
        Ok(texture)
    }

    fn destroy_texture(&mut self, texture: TextureHandle) {
        log::trace!("DummyAllocator: destroying texture {:?}", texture);
        assert!(
            self.live_textures.remove(&texture),
            "destroying unknown texture {texture:?}"
        );
        self.destroyed += 1;
    }

    fn create_buffer(
        &mut self,
        name: &str,
        descriptor: &BufferDescriptor,
    ) -> Result<BufferHandle, DriverError> {
        log::trace!(
            "DummyAllocator: creating buffer '{}' (size: {})",
            name,
            descriptor.size
        );
        let buffer = BufferHandle(self.allocate(name)?);
        self.live_buffers.insert(buffer);
        Ok(buffer)
    }

    fn destroy_buffer(&mut self, buffer: BufferHandle) {
        log::trace!("DummyAllocator: destroying buffer {:?}", buffer);
        assert!(
            self.live_buffers.remove(&buffer),
            "destroying unknown buffer {buffer:?}"
        );
        self.destroyed += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BufferUsage, TextureFormat, TextureUsage};

    #[test]
    fn test_dummy_driver_records_commands() {
        let mut driver = DummyDriver::new();
        driver.push_group_marker("main");
        driver
            .begin_render_pass(RenderTargetHandle(1), &RenderPassParams::new(64, 64))
            .unwrap();
        driver.end_render_pass();
        driver.pop_group_marker();
        driver.flush();

        assert_eq!(driver.name(), "Dummy Driver");
        assert_eq!(driver.group_markers(), vec!["main"]);
        assert_eq!(driver.commands().len(), 5);
        assert_eq!(driver.commands().last(), Some(&DriverCommand::Flush));
    }

    #[test]
    fn test_dummy_driver_injected_failure() {
        let mut driver = DummyDriver::new();
        driver.fail_render_passes();
        let result = driver.begin_render_pass(RenderTargetHandle(0), &RenderPassParams::default());
        assert_eq!(result, Err(DriverError::DeviceLost));
        assert!(driver.commands().is_empty());
    }

    #[test]
    fn test_dummy_allocator_tracks_live_resources() {
        let mut allocator = DummyAllocator::new();
        let texture = allocator
            .create_texture(
                "color",
                &TextureDescriptor::new_2d(8, 8, TextureFormat::Rgba8Unorm, TextureUsage::SAMPLED),
            )
            .unwrap();
        let buffer = allocator
            .create_buffer("lights", &BufferDescriptor::new(64, BufferUsage::STORAGE))
            .unwrap();
        assert_eq!(allocator.live_count(), 2);
        assert_ne!(texture.0, buffer.0);

        allocator.destroy_texture(texture);
        allocator.destroy_buffer(buffer);
        assert_eq!(allocator.live_count(), 0);
        assert_eq!(allocator.destroyed_count(), 2);
        assert_eq!(allocator.created(), &["color".to_string(), "lights".to_string()]);
    }

    #[test]
    fn test_dummy_allocator_injected_failure() {
        let mut allocator = DummyAllocator::new();
        allocator.fail_on("broken");
        let result = allocator.create_buffer("broken", &BufferDescriptor::default());
        assert!(matches!(result, Err(DriverError::AllocationFailed { .. })));
        assert_eq!(allocator.live_count(), 0);
    }
}
