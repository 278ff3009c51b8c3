//! Virtual resources and their version nodes.

use crate::driver::{
    BufferHandle, RenderTargetHandle, ResourceAllocator, TextureHandle,
};
use crate::error::DriverError;
use crate::graph::{GraphNode, NodeId};
use crate::types::ResourceDescriptor;

/// Handle to one version of a frame graph resource.
///
/// Every write to a resource that already has content produces a new version,
/// and only the latest version of a resource may be read, written or
/// presented. `ResourceHandle` is `Copy`; it is only valid within the
/// `FrameGraph` that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceHandle {
    index: u32,
    version: u32,
}

impl ResourceHandle {
    pub(super) fn new(index: u32, version: u32) -> Self {
        Self { index, version }
    }

    pub(super) fn index(self) -> usize {
        self.index as usize
    }

    /// Version of the resource this handle refers to.
    pub fn version(self) -> u32 {
        self.version
    }
}

/// Graph node for one version of a resource.
#[derive(Debug)]
pub struct ResourceNode {
    label: String,
}

impl ResourceNode {
    pub(super) fn new(name: &str, resource: ResourceHandle) -> Self {
        Self {
            label: format!("{} v{}", name, resource.version()),
        }
    }
}

impl GraphNode for ResourceNode {
    fn name(&self) -> &str {
        &self.label
    }

    fn on_culled(&mut self) {
        log::trace!("Resource '{}' not needed this frame", self.label);
    }
}

/// GPU object backing a virtual resource while it is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Backing {
    Texture(TextureHandle),
    Buffer(BufferHandle),
}

/// Frame graph bookkeeping for one resource across all its versions.
#[derive(Debug)]
pub(super) struct VirtualResource {
    pub(super) name: String,
    pub(super) descriptor: ResourceDescriptor,
    /// External render target for imported resources. Imported resources are
    /// never created or destroyed by the frame graph.
    pub(super) imported: Option<RenderTargetHandle>,
    /// Graph node of each version, indexed by version.
    pub(super) versions: Vec<NodeId>,
    /// First and last surviving pass (by creation index) using the resource.
    pub(super) first_use: Option<usize>,
    pub(super) last_use: Option<usize>,
    /// Latest pass (by creation index) declaring the current version.
    pub(super) last_access: Option<usize>,
    pub(super) backing: Option<Backing>,
}

impl VirtualResource {
    pub(super) fn new(
        name: &str,
        descriptor: ResourceDescriptor,
        imported: Option<RenderTargetHandle>,
    ) -> Self {
        Self {
            name: name.to_string(),
            descriptor,
            imported,
            versions: Vec::new(),
            first_use: None,
            last_use: None,
            last_access: None,
            backing: None,
        }
    }

    /// Current (latest) version number.
    pub(super) fn version(&self) -> u32 {
        self.versions.len().saturating_sub(1) as u32
    }

    /// Graph node of the latest version.
    pub(super) fn current_node(&self) -> NodeId {
        *self
            .versions
            .last()
            .unwrap_or_else(|| unreachable!("resource '{}' has no version", self.name))
    }

    pub(super) fn is_imported(&self) -> bool {
        self.imported.is_some()
    }

    /// Record that the pass at `pass_index` uses this resource.
    pub(super) fn mark_used(&mut self, pass_index: usize) {
        self.first_use.get_or_insert(pass_index);
        self.last_use = Some(pass_index);
    }

    /// Create the backing object through the allocator.
    pub(super) fn materialize(
        &mut self,
        allocator: &mut dyn ResourceAllocator,
    ) -> Result<(), DriverError> {
        debug_assert!(!self.is_imported(), "imported resources are never materialized");
        debug_assert!(self.backing.is_none(), "resource '{}' materialized twice", self.name);

        let backing = match &self.descriptor {
            ResourceDescriptor::Texture(desc) => {
                Backing::Texture(allocator.create_texture(&self.name, desc)?)
            }
            ResourceDescriptor::Buffer(desc) => {
                Backing::Buffer(allocator.create_buffer(&self.name, desc)?)
            }
        };
        log::trace!("Materialized resource '{}' as {:?}", self.name, backing);
        self.backing = Some(backing);
        Ok(())
    }

    /// Destroy the backing object, if any.
    pub(super) fn release(&mut self, allocator: &mut dyn ResourceAllocator) {
        match self.backing.take() {
            Some(Backing::Texture(texture)) => allocator.destroy_texture(texture),
            Some(Backing::Buffer(buffer)) => allocator.destroy_buffer(buffer),
            None => return,
        }
        log::trace!("Released resource '{}'", self.name);
    }
}
