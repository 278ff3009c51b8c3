//! Declaration of pass dependencies.

use crate::types::{BufferDescriptor, TextureDescriptor};

use super::pass::PassHandle;
use super::resource::ResourceHandle;
use super::FrameGraph;

/// Declares the resources a pass creates, reads and writes.
///
/// Obtained from [`FrameGraph::pass_builder`] or handed to the setup closure
/// of [`FrameGraph::add_pass`].
pub struct PassBuilder<'g, 'a> {
    graph: &'g mut FrameGraph<'a>,
    pass: PassHandle,
}

impl<'g, 'a> PassBuilder<'g, 'a> {
    pub(super) fn new(graph: &'g mut FrameGraph<'a>, pass: PassHandle) -> Self {
        Self { graph, pass }
    }

    /// The pass being declared.
    pub fn pass(&self) -> PassHandle {
        self.pass
    }

    /// Name of the pass being declared.
    pub fn name(&self) -> &str {
        self.graph.pass_name(self.pass)
    }

    /// Create a transient texture. It must still be written or read to be used.
    pub fn create_texture(&mut self, name: &str, descriptor: TextureDescriptor) -> ResourceHandle {
        self.graph.create_texture(name, descriptor)
    }

    /// Create a transient buffer.
    pub fn create_buffer(&mut self, name: &str, descriptor: BufferDescriptor) -> ResourceHandle {
        self.graph.create_buffer(name, descriptor)
    }

    /// Declare that the pass reads `handle`.
    pub fn read(&mut self, handle: ResourceHandle) -> ResourceHandle {
        self.graph.read(self.pass, handle)
    }

    /// Declare that the pass writes `handle`. Use the returned handle for
    /// later accesses.
    pub fn write(&mut self, handle: ResourceHandle) -> ResourceHandle {
        self.graph.write(self.pass, handle)
    }

    /// Keep the pass alive even if none of its outputs are consumed.
    pub fn side_effect(&mut self) {
        self.graph.side_effect(self.pass);
    }
}
