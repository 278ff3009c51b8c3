//! Resource descriptors for frame graph resources.
//!
//! Descriptors are plain values: the frame graph stores them per virtual
//! resource and hands them to the [`ResourceAllocator`](crate::driver::ResourceAllocator)
//! when a resource is materialised.

mod buffer;
mod common;
mod texture;

pub use buffer::{BufferDescriptor, BufferUsage};
pub use common::{ClearValue, Extent3d};
pub use texture::{TextureDescriptor, TextureFormat, TextureUsage};

/// Descriptor of any resource the frame graph can track.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceDescriptor {
    /// A texture or render target.
    Texture(TextureDescriptor),
    /// A GPU buffer.
    Buffer(BufferDescriptor),
}

impl ResourceDescriptor {
    /// Get this descriptor as a texture descriptor, if it is one.
    pub fn as_texture(&self) -> Option<&TextureDescriptor> {
        if let ResourceDescriptor::Texture(desc) = self {
            Some(desc)
        } else {
            None
        }
    }

    /// Get this descriptor as a buffer descriptor, if it is one.
    pub fn as_buffer(&self) -> Option<&BufferDescriptor> {
        if let ResourceDescriptor::Buffer(desc) = self {
            Some(desc)
        } else {
            None
        }
    }

    /// Check if this describes a texture.
    pub fn is_texture(&self) -> bool {
        matches!(self, ResourceDescriptor::Texture(_))
    }

    /// Check if this describes a buffer.
    pub fn is_buffer(&self) -> bool {
        matches!(self, ResourceDescriptor::Buffer(_))
    }
}

impl From<TextureDescriptor> for ResourceDescriptor {
    fn from(desc: TextureDescriptor) -> Self {
        ResourceDescriptor::Texture(desc)
    }
}

impl From<BufferDescriptor> for ResourceDescriptor {
    fn from(desc: BufferDescriptor) -> Self {
        ResourceDescriptor::Buffer(desc)
    }
}
