//! Resource access for pass executors.

use crate::driver::{BufferHandle, RenderTargetHandle, TextureHandle};
use crate::types::ResourceDescriptor;

use super::pass::PassNode;
use super::resource::{Backing, ResourceHandle, VirtualResource};

/// Resolves the virtual resources a pass declared into concrete driver
/// handles while the pass executes.
///
/// Any version of a declared resource resolves to the same backing object.
/// Asking for a resource the pass did not declare is a programming error and
/// panics.
pub struct PassResources<'r> {
    pass: &'r PassNode,
    resources: &'r [VirtualResource],
}

impl<'r> PassResources<'r> {
    pub(super) fn new(pass: &'r PassNode, resources: &'r [VirtualResource]) -> Self {
        Self { pass, resources }
    }

    /// Name of the executing pass.
    pub fn pass_name(&self) -> &str {
        &self.pass.name
    }

    fn declared(&self, handle: ResourceHandle) -> &'r VirtualResource {
        let resource = self
            .resources
            .get(handle.index())
            .unwrap_or_else(|| panic!("unknown resource handle {handle:?}"));
        assert!(
            self.pass.uses(handle),
            "pass '{}' did not declare resource '{}'",
            self.pass.name,
            resource.name
        );
        resource
    }

    /// Descriptor of a declared resource.
    pub fn descriptor(&self, handle: ResourceHandle) -> &'r ResourceDescriptor {
        &self.declared(handle).descriptor
    }

    /// Concrete texture backing a declared texture resource.
    pub fn texture(&self, handle: ResourceHandle) -> TextureHandle {
        let resource = self.declared(handle);
        match resource.backing {
            Some(Backing::Texture(texture)) => texture,
            _ => panic!("resource '{}' is not a materialized texture", resource.name),
        }
    }

    /// Concrete buffer backing a declared buffer resource.
    pub fn buffer(&self, handle: ResourceHandle) -> BufferHandle {
        let resource = self.declared(handle);
        match resource.backing {
            Some(Backing::Buffer(buffer)) => buffer,
            _ => panic!("resource '{}' is not a materialized buffer", resource.name),
        }
    }

    /// External render target of a declared imported resource.
    pub fn render_target(&self, handle: ResourceHandle) -> RenderTargetHandle {
        let resource = self.declared(handle);
        resource
            .imported
            .unwrap_or_else(|| panic!("resource '{}' is not an imported render target", resource.name))
    }
}
