//! Per-frame pass scheduling built on the dependency graph.
//!
//! A [`FrameGraph`] records passes and the versioned resources they read and
//! write. `compile()` culls everything the presented outputs (and passes with
//! side effects) do not need, then computes where each surviving resource is
//! first and last used. `execute()` runs the surviving passes in declaration
//! order, creating transient resources just before their first use and
//! destroying them right after their last use.
//!
//! Edges follow the dependency direction: a pass links to every resource
//! version it reads, and a resource version links to the pass that wrote it.

mod builder;
mod config;
mod pass;
mod pass_resources;
mod resource;

#[cfg(all(test, feature = "dummy"))]
mod tests;

pub use builder::PassBuilder;
pub use config::FrameGraphConfig;
pub use pass::{PassExecutor, PassHandle, PassKind, PassNode};
pub use pass_resources::PassResources;
pub use resource::{ResourceHandle, ResourceNode};

use std::io::{self, Write};

use crate::driver::{DriverApi, RenderTargetHandle, ResourceAllocator};
use crate::error::{DriverError, FrameGraphError, FrameGraphResult};
use crate::graph::{DependencyGraph, GraphNode, NodeId};
use crate::profiling::{profile_plot, profile_scope, profile_scope_dynamic};
use crate::types::{BufferDescriptor, ResourceDescriptor, TextureDescriptor};

use resource::VirtualResource;

/// Node stored in the frame graph's dependency graph.
#[derive(Debug)]
pub enum FrameGraphNode {
    Pass(PassNode),
    Resource(ResourceNode),
    /// Leaf that keeps passes with side effects alive.
    Sink,
}

impl FrameGraphNode {
    /// Get the pass payload, if this node is a pass.
    pub fn as_pass(&self) -> Option<&PassNode> {
        match self {
            Self::Pass(pass) => Some(pass),
            _ => None,
        }
    }
}

impl GraphNode for FrameGraphNode {
    fn name(&self) -> &str {
        match self {
            Self::Pass(pass) => GraphNode::name(pass),
            Self::Resource(resource) => resource.name(),
            Self::Sink => "side effects",
        }
    }

    fn on_culled(&mut self) {
        match self {
            Self::Pass(pass) => pass.on_culled(),
            Self::Resource(resource) => resource.on_culled(),
            Self::Sink => {}
        }
    }
}

/// A single frame's pass and resource graph.
///
/// The frame graph borrows the resource allocator for its whole lifetime and
/// is meant to be built, compiled, executed and dropped within one frame.
pub struct FrameGraph<'a> {
    config: FrameGraphConfig,
    allocator: &'a mut dyn ResourceAllocator,
    graph: DependencyGraph<FrameGraphNode>,
    /// Graph node of each pass, indexed by `PassHandle`.
    passes: Vec<NodeId>,
    resources: Vec<VirtualResource>,
    side_effects: Option<NodeId>,
    compiled: bool,
    executed: bool,
}

impl<'a> FrameGraph<'a> {
    /// Create an empty frame graph with the default configuration.
    pub fn new(allocator: &'a mut dyn ResourceAllocator) -> Self {
        Self::with_config(allocator, FrameGraphConfig::default())
    }

    /// Create an empty frame graph.
    pub fn with_config(allocator: &'a mut dyn ResourceAllocator, config: FrameGraphConfig) -> Self {
        Self {
            config,
            allocator,
            graph: DependencyGraph::new(),
            passes: Vec::new(),
            resources: Vec::new(),
            side_effects: None,
            compiled: false,
            executed: false,
        }
    }

    pub fn config(&self) -> &FrameGraphConfig {
        &self.config
    }

    // ---------------------------------------------------------------------
    // Declaration
    // ---------------------------------------------------------------------

    /// Declare a transient texture owned by the frame graph.
    pub fn create_texture(&mut self, name: &str, descriptor: TextureDescriptor) -> ResourceHandle {
        self.create_resource(name, ResourceDescriptor::Texture(descriptor), None)
    }

    /// Declare a transient buffer owned by the frame graph.
    pub fn create_buffer(&mut self, name: &str, descriptor: BufferDescriptor) -> ResourceHandle {
        self.create_resource(name, ResourceDescriptor::Buffer(descriptor), None)
    }

    /// Register an externally owned render target, such as a swap chain image.
    ///
    /// The frame graph never creates or destroys imported resources.
    pub fn import(
        &mut self,
        name: &str,
        descriptor: TextureDescriptor,
        target: RenderTargetHandle,
    ) -> ResourceHandle {
        self.create_resource(name, ResourceDescriptor::Texture(descriptor), Some(target))
    }

    fn create_resource(
        &mut self,
        name: &str,
        descriptor: ResourceDescriptor,
        imported: Option<RenderTargetHandle>,
    ) -> ResourceHandle {
        self.assert_declaring();
        let handle = ResourceHandle::new(self.resources.len() as u32, 0);
        let node = self
            .graph
            .add_node(FrameGraphNode::Resource(ResourceNode::new(name, handle)));

        let mut resource = VirtualResource::new(name, descriptor, imported);
        resource.versions.push(node);
        self.resources.push(resource);

        log::trace!(
            "Declared {} resource '{}'",
            if imported.is_some() { "imported" } else { "transient" },
            name
        );
        handle
    }

    /// Add a pass with its executor. Declare its resources through
    /// [`FrameGraph::pass_builder`].
    pub fn create_pass<F>(&mut self, name: &str, executor: F) -> PassHandle
    where
        F: FnOnce(&PassResources<'_>, &mut dyn DriverApi) -> Result<(), DriverError> + 'static,
    {
        self.create_pass_node(name, PassKind::Render, Some(Box::new(executor)))
    }

    /// Add a pass in one step.
    ///
    /// `setup` declares the pass resources and returns the data the executor
    /// needs, usually the handles it declared. `execute` receives that data
    /// when the pass runs. The pass handle and a copy of the data are returned
    /// so later passes can consume the outputs.
    pub fn add_pass<D, S, E>(&mut self, name: &str, setup: S, execute: E) -> (PassHandle, D)
    where
        D: Clone + 'static,
        S: FnOnce(&mut PassBuilder<'_, 'a>) -> D,
        E: FnOnce(&D, &PassResources<'_>, &mut dyn DriverApi) -> Result<(), DriverError> + 'static,
    {
        let pass = self.create_pass_node(name, PassKind::Render, None);
        let data = setup(&mut PassBuilder::new(self, pass));

        let captured = data.clone();
        let executor: PassExecutor = Box::new(
            move |resources: &PassResources<'_>, driver: &mut dyn DriverApi| {
                execute(&captured, resources, driver)
            },
        );
        self.pass_node_mut(pass).executor = Some(executor);
        (pass, data)
    }

    fn create_pass_node(
        &mut self,
        name: &str,
        kind: PassKind,
        executor: Option<PassExecutor>,
    ) -> PassHandle {
        self.assert_declaring();
        let handle = PassHandle::new(self.passes.len() as u32);
        let node = self
            .graph
            .add_node(FrameGraphNode::Pass(PassNode::new(name, kind, executor)));
        self.passes.push(node);
        log::trace!("Declared pass '{}'", name);
        handle
    }

    /// Get a builder to declare the resources of `pass`.
    pub fn pass_builder(&mut self, pass: PassHandle) -> PassBuilder<'_, 'a> {
        self.pass_id(pass);
        PassBuilder::new(self, pass)
    }

    /// Declare that `pass` reads the resource version `handle`.
    ///
    /// Reading the same version twice is a no-op. A pass cannot read a version
    /// it wrote itself, nor one written by a pass created after it.
    pub fn read(&mut self, pass: PassHandle, handle: ResourceHandle) -> ResourceHandle {
        self.assert_declaring();
        let pass_id = self.pass_id(pass);
        let version_node = self.latest(handle).current_node();

        if self.pass_node(pass).reads.contains(&handle) {
            return handle;
        }
        if let Some(&writer) = self.graph.node(version_node).links().first() {
            assert!(
                writer != pass_id,
                "pass '{}' cannot read resource '{}' it writes",
                self.pass_name(pass),
                self.resources[handle.index()].name
            );
            // Pass nodes get ids in creation order, which is execution order.
            assert!(
                writer.index() < pass_id.index(),
                "pass '{}' cannot read resource '{}' before its writer '{}' runs",
                self.pass_name(pass),
                self.resources[handle.index()].name,
                self.graph.node(writer).payload().name()
            );
        }

        self.graph.link(pass_id, version_node);
        self.pass_node_mut(pass).reads.push(handle);
        let resource = &mut self.resources[handle.index()];
        resource.last_access = resource.last_access.max(Some(pass.index()));
        handle
    }

    /// Declare that `pass` writes the resource behind `handle`.
    ///
    /// If the current version already has a writer or readers a new version is
    /// created, so the returned handle must be used for every later access.
    /// The writing pass must not be created before any pass that already
    /// uses the current version.
    pub fn write(&mut self, pass: PassHandle, handle: ResourceHandle) -> ResourceHandle {
        self.assert_declaring();
        let pass_id = self.pass_id(pass);
        let (current, version, name, last_access) = {
            let resource = self.latest(handle);
            (
                resource.current_node(),
                resource.version(),
                resource.name.clone(),
                resource.last_access,
            )
        };

        let node = self.graph.node(current);
        if node.links().contains(&pass_id) {
            return handle;
        }
        if let Some(last) = last_access {
            assert!(
                pass.index() >= last,
                "pass '{}' cannot write resource '{}' already used by later pass '{}'",
                self.pass_name(pass),
                name,
                self.pass_name(PassHandle::new(last as u32))
            );
        }

        let (written, version_node) = if node.links().is_empty() && node.ref_count() == 0 {
            (handle, current)
        } else {
            let next = ResourceHandle::new(handle.index() as u32, version + 1);
            let id = self
                .graph
                .add_node(FrameGraphNode::Resource(ResourceNode::new(&name, next)));
            self.resources[handle.index()].versions.push(id);
            (next, id)
        };

        self.graph.link(version_node, pass_id);
        self.pass_node_mut(pass).writes.push(written);
        self.resources[handle.index()].last_access = Some(pass.index());
        log::trace!(
            "Pass '{}' writes '{}' v{}",
            self.pass_name(pass),
            name,
            written.version()
        );
        written
    }

    /// Keep `pass` alive even when nothing consumes its outputs.
    pub fn side_effect(&mut self, pass: PassHandle) {
        self.assert_declaring();
        let pass_id = self.pass_id(pass);
        if self.pass_node(pass).side_effect {
            return;
        }

        let sink = match self.side_effects {
            Some(sink) => sink,
            None => {
                let sink = self.graph.add_node(FrameGraphNode::Sink);
                self.graph.make_leaf(sink);
                self.side_effects = Some(sink);
                sink
            }
        };
        self.graph.link(sink, pass_id);
        self.pass_node_mut(pass).side_effect = true;
    }

    /// Mark `handle` as a required output of the frame.
    ///
    /// Adds an internal present pass that reads the resource and is made a
    /// leaf, so the resource and everything it depends on survive culling.
    pub fn present(&mut self, handle: ResourceHandle) -> PassHandle {
        let name = format!("Present {}", self.latest(handle).name);
        let pass = self.create_pass_node(&name, PassKind::Present, None);
        self.read(pass, handle);
        let pass_id = self.pass_id(pass);
        self.graph.make_leaf(pass_id);
        pass
    }

    // ---------------------------------------------------------------------
    // Compilation
    // ---------------------------------------------------------------------

    /// Cull unused passes and resources and plan resource lifetimes.
    ///
    /// # Panics
    ///
    /// Panics if called twice, or if cycle checking is enabled and the graph
    /// has a cycle.
    pub fn compile(&mut self) -> &mut Self {
        profile_scope!("FrameGraph::compile");
        assert!(!self.compiled, "frame graph '{}' already compiled", self.config.label);

        if self.config.check_cycles {
            assert!(
                self.graph.is_acyclic(),
                "frame graph '{}' contains a dependency cycle",
                self.config.label
            );
        }

        let culled = self.graph.cull();

        for (pass_index, &node_id) in self.passes.iter().enumerate() {
            let node = self.graph.node(node_id);
            if node.is_culled() {
                continue;
            }
            let Some(pass) = node.payload().as_pass() else {
                unreachable!("pass handle points at a non-pass node");
            };
            for handle in pass.reads.iter().chain(pass.writes.iter()) {
                self.resources[handle.index()].mark_used(pass_index);
            }
        }

        for (resource_index, resource) in self.resources.iter().enumerate() {
            if resource.is_imported() {
                continue;
            }
            if let (Some(first), Some(last)) = (resource.first_use, resource.last_use) {
                let first_pass = pass_payload_mut(&mut self.graph, self.passes[first]);
                first_pass.devirtualize.push(resource_index);
                let last_pass = pass_payload_mut(&mut self.graph, self.passes[last]);
                last_pass.destroy.push(resource_index);
            }
        }

        self.compiled = true;

        let culled_passes = self
            .passes
            .iter()
            .filter(|&&id| self.graph.node(id).is_culled())
            .count();
        profile_plot!("framegraph_culled_passes", culled_passes as f64);
        log::debug!(
            "Frame graph '{}' compiled: {}/{} passes culled, {}/{} nodes culled",
            self.config.label,
            culled_passes,
            self.passes.len(),
            culled,
            self.graph.len()
        );
        self
    }

    // ---------------------------------------------------------------------
    // Execution
    // ---------------------------------------------------------------------

    /// Run every surviving pass in declaration order, then flush the driver.
    ///
    /// Culled passes never reach the driver. If a resource cannot be created or
    /// a pass fails, every resource created so far is destroyed and the error
    /// is returned.
    ///
    /// # Panics
    ///
    /// Panics if the graph was not compiled, or was already executed.
    pub fn execute(&mut self, driver: &mut dyn DriverApi) -> FrameGraphResult<()> {
        profile_scope!("FrameGraph::execute");
        assert!(self.compiled, "execute() called before compile()");
        assert!(!self.executed, "frame graph '{}' already executed", self.config.label);
        self.executed = true;

        if let Err(err) = self.execute_passes(driver) {
            log::debug!("Frame graph '{}' aborted: {}", self.config.label, err);
            for resource in &mut self.resources {
                resource.release(&mut *self.allocator);
            }
            return Err(err);
        }

        driver.flush();
        Ok(())
    }

    fn execute_passes(&mut self, driver: &mut dyn DriverApi) -> FrameGraphResult<()> {
        for &node_id in &self.passes {
            let node = self.graph.node_mut(node_id);
            if node.is_culled() {
                continue;
            }
            let pass = pass_payload_mut_of(node.payload_mut());

            for &index in &pass.devirtualize {
                self.resources[index].materialize(&mut *self.allocator)?;
            }

            match pass.kind {
                PassKind::Present => log::trace!("{}", pass.name),
                PassKind::Render => {
                    let executor = pass.executor.take();
                    let pass = &*pass;
                    profile_scope_dynamic!(pass.name.as_str());
                    log::trace!("Executing pass '{}'", pass.name);

                    driver.push_group_marker(&pass.name);
                    let result = match executor {
                        Some(executor) => {
                            executor(&PassResources::new(pass, &self.resources), &mut *driver)
                        }
                        None => Ok(()),
                    };
                    driver.pop_group_marker();

                    result.map_err(|source| FrameGraphError::PassFailed {
                        pass: pass.name.clone(),
                        source,
                    })?;
                }
            }

            for &index in &pass.destroy {
                self.resources[index].release(&mut *self.allocator);
            }
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    /// The underlying dependency graph.
    pub fn graph(&self) -> &DependencyGraph<FrameGraphNode> {
        &self.graph
    }

    /// Number of passes, including internal present passes.
    pub fn pass_count(&self) -> usize {
        self.passes.len()
    }

    /// Number of distinct resources, regardless of versions.
    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    pub fn is_compiled(&self) -> bool {
        self.compiled
    }

    pub fn pass_name(&self, pass: PassHandle) -> &str {
        &self.pass_node(pass).name
    }

    /// Get a pass node.
    pub fn pass(&self, pass: PassHandle) -> &PassNode {
        self.pass_node(pass)
    }

    /// Check if a pass was culled. Only meaningful after `compile()`.
    pub fn is_pass_culled(&self, pass: PassHandle) -> bool {
        self.graph.node(self.pass_id(pass)).is_culled()
    }

    /// Check if a resource version was culled. Only meaningful after
    /// `compile()`.
    pub fn is_resource_culled(&self, handle: ResourceHandle) -> bool {
        let resource = self.resource(handle);
        self.graph
            .node(resource.versions[handle.version() as usize])
            .is_culled()
    }

    pub fn resource_name(&self, handle: ResourceHandle) -> &str {
        &self.resource(handle).name
    }

    pub fn descriptor(&self, handle: ResourceHandle) -> &ResourceDescriptor {
        &self.resource(handle).descriptor
    }

    /// Latest version handle of the resource behind `handle`.
    pub fn latest_version(&self, handle: ResourceHandle) -> ResourceHandle {
        let resource = self.resource(handle);
        ResourceHandle::new(handle.index() as u32, resource.version())
    }

    /// Creation index of the first and last surviving pass using a resource,
    /// or `None` if no surviving pass uses it. Only meaningful after
    /// `compile()`.
    pub fn resource_lifetime(&self, handle: ResourceHandle) -> Option<(PassHandle, PassHandle)> {
        let resource = self.resource(handle);
        match (resource.first_use, resource.last_use) {
            (Some(first), Some(last)) => Some((
                PassHandle::new(first as u32),
                PassHandle::new(last as u32),
            )),
            _ => None,
        }
    }

    /// Write a Graphviz view of the graph, named after the configured label.
    /// Writes nothing in release builds.
    pub fn export_graphviz<W: Write>(&self, out: &mut W) -> io::Result<()> {
        self.graph.export_graphviz(out, Some(&self.config.label))
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    fn assert_declaring(&self) {
        assert!(
            !self.compiled,
            "frame graph '{}' cannot be modified after compile()",
            self.config.label
        );
    }

    fn pass_id(&self, pass: PassHandle) -> NodeId {
        *self
            .passes
            .get(pass.index())
            .unwrap_or_else(|| panic!("invalid pass handle {pass:?}"))
    }

    fn pass_node(&self, pass: PassHandle) -> &PassNode {
        match self.graph.node(self.pass_id(pass)).payload() {
            FrameGraphNode::Pass(node) => node,
            _ => unreachable!("pass handle points at a non-pass node"),
        }
    }

    fn pass_node_mut(&mut self, pass: PassHandle) -> &mut PassNode {
        let id = self.pass_id(pass);
        pass_payload_mut(&mut self.graph, id)
    }

    fn resource(&self, handle: ResourceHandle) -> &VirtualResource {
        let resource = self
            .resources
            .get(handle.index())
            .unwrap_or_else(|| panic!("invalid resource handle {handle:?}"));
        assert!(
            handle.version() <= resource.version(),
            "invalid version {} of resource '{}'",
            handle.version(),
            resource.name
        );
        resource
    }

    /// Get a resource whose handle must refer to its latest version.
    fn latest(&self, handle: ResourceHandle) -> &VirtualResource {
        let resource = self.resource(handle);
        assert!(
            handle.version() == resource.version(),
            "stale handle to resource '{}': v{} used but latest is v{}",
            resource.name,
            handle.version(),
            resource.version()
        );
        resource
    }
}

fn pass_payload_mut(graph: &mut DependencyGraph<FrameGraphNode>, id: NodeId) -> &mut PassNode {
    pass_payload_mut_of(graph.node_mut(id).payload_mut())
}

fn pass_payload_mut_of(node: &mut FrameGraphNode) -> &mut PassNode {
    match node {
        FrameGraphNode::Pass(pass) => pass,
        _ => unreachable!("pass handle points at a non-pass node"),
    }
}
