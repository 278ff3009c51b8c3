//! Pass nodes.

use crate::driver::DriverApi;
use crate::error::DriverError;
use crate::graph::GraphNode;

use super::pass_resources::PassResources;
use super::resource::ResourceHandle;

/// Handle to a pass in a frame graph.
///
/// Passes are numbered in creation order, which is also their execution
/// order. `PassHandle` is only valid within the `FrameGraph` that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PassHandle(u32);

impl PassHandle {
    pub(super) fn new(index: u32) -> Self {
        Self(index)
    }

    pub(super) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Work recorded by a pass, run once by `FrameGraph::execute`.
pub type PassExecutor =
    Box<dyn FnOnce(&PassResources<'_>, &mut dyn DriverApi) -> Result<(), DriverError>>;

/// What a pass node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    /// A pass declared by the caller.
    Render,
    /// The internal pass created by `FrameGraph::present`. It has no
    /// executor and keeps the presented resource alive.
    Present,
}

/// Graph node for a pass.
pub struct PassNode {
    pub(super) name: String,
    pub(super) kind: PassKind,
    pub(super) executor: Option<PassExecutor>,
    pub(super) reads: Vec<ResourceHandle>,
    pub(super) writes: Vec<ResourceHandle>,
    pub(super) side_effect: bool,
    /// Resources to create before this pass runs, by resource index.
    pub(super) devirtualize: Vec<usize>,
    /// Resources to destroy after this pass runs, by resource index.
    pub(super) destroy: Vec<usize>,
}

impl PassNode {
    pub(super) fn new(name: &str, kind: PassKind, executor: Option<PassExecutor>) -> Self {
        Self {
            name: name.to_string(),
            kind,
            executor,
            reads: Vec::new(),
            writes: Vec::new(),
            side_effect: false,
            devirtualize: Vec::new(),
            destroy: Vec::new(),
        }
    }

    /// Pass name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Pass kind.
    pub fn kind(&self) -> PassKind {
        self.kind
    }

    /// Resource versions this pass reads.
    pub fn reads(&self) -> &[ResourceHandle] {
        &self.reads
    }

    /// Resource versions this pass produces.
    pub fn writes(&self) -> &[ResourceHandle] {
        &self.writes
    }

    /// Whether the pass was forced alive with `side_effect()`.
    pub fn has_side_effect(&self) -> bool {
        self.side_effect
    }

    /// Check if the pass declared any version of the resource.
    pub(super) fn uses(&self, handle: ResourceHandle) -> bool {
        self.reads
            .iter()
            .chain(self.writes.iter())
            .any(|used| used.index() == handle.index())
    }
}

impl std::fmt::Debug for PassNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PassNode")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("has_executor", &self.executor.is_some())
            .field("reads", &self.reads)
            .field("writes", &self.writes)
            .field("side_effect", &self.side_effect)
            .finish()
    }
}

impl GraphNode for PassNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn on_culled(&mut self) {
        log::trace!("Pass '{}' culled", self.name);
        self.executor = None;
    }
}
