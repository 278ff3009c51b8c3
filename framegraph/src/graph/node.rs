//! Graph vertices.

/// Identifier of a node inside one [`DependencyGraph`](super::DependencyGraph).
///
/// Ids are handed out sequentially from 0 and double as the node's index in
/// the graph arena. They are only meaningful for the graph that created them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn new(index: u32) -> Self {
        Self(index)
    }

    /// Index of this node in its graph.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "N{}", self.0)
    }
}

/// Behaviour a concrete node type plugs into the graph.
pub trait GraphNode {
    /// Diagnostic label, used by the Graphviz exporter and logging.
    fn name(&self) -> &str;

    /// Called by [`DependencyGraph::cull`](super::DependencyGraph::cull) exactly
    /// once for every node whose reference count drops to zero.
    fn on_culled(&mut self);
}

/// A vertex of the dependency graph.
///
/// `links` are the nodes this node depends on. `ref_count` is the number of
/// nodes depending on this one, plus one if the node was made a leaf.
#[derive(Debug)]
pub struct Node<N> {
    id: NodeId,
    links: Vec<NodeId>,
    ref_count: u32,
    payload: N,
}

impl<N> Node<N> {
    pub(crate) fn new(id: NodeId, payload: N) -> Self {
        Self {
            id,
            links: Vec::new(),
            ref_count: 0,
            payload,
        }
    }

    /// Unique id of this node.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Nodes this node depends on, in link order.
    pub fn links(&self) -> &[NodeId] {
        &self.links
    }

    /// How many nodes link to this one.
    ///
    /// Before culling this is the number of incoming edges (plus one for a
    /// leaf). After culling it is the number of live incoming edges, and 0
    /// for every culled node.
    pub fn ref_count(&self) -> u32 {
        self.ref_count
    }

    /// Whether this node was culled. Only valid after culling.
    pub fn is_culled(&self) -> bool {
        self.ref_count == 0
    }

    /// Mark this node as a required output so culling keeps it alive.
    ///
    /// # Panics
    ///
    /// Panics if something already links to this node.
    pub fn make_leaf(&mut self) {
        assert!(
            self.ref_count == 0,
            "make_leaf() on node {} which already has {} reference(s)",
            self.id,
            self.ref_count
        );
        self.ref_count = 1;
    }

    /// Remove one reference and return the new count.
    ///
    /// # Panics
    ///
    /// Panics if the count is already zero, which means an edge was culled twice.
    pub fn dec_ref(&mut self) -> u32 {
        assert!(
            self.ref_count >= 1,
            "dec_ref() on node {} with no references left",
            self.id
        );
        self.ref_count -= 1;
        self.ref_count
    }

    /// The concrete node value.
    pub fn payload(&self) -> &N {
        &self.payload
    }

    /// The concrete node value, mutably.
    pub fn payload_mut(&mut self) -> &mut N {
        &mut self.payload
    }

    pub(crate) fn push_link(&mut self, to: NodeId) {
        self.links.push(to);
    }

    pub(crate) fn inc_ref(&mut self) {
        self.ref_count += 1;
    }
}
