//! Dependency graph with reference-counted culling.
//!
//! A [`DependencyGraph`] owns every node declared for one frame. Edges point
//! from a node to the nodes it depends on ("we hold a reference to them"), and
//! every node counts how many nodes depend on it. [`DependencyGraph::cull`]
//! then walks backwards from the nodes nobody depends on and releases
//! everything that is not reachable from a leaf.
//!
//! # Example
//!
//! ```
//! use redlilium_framegraph::graph::{DependencyGraph, GraphNode};
//!
//! struct Named(&'static str);
//!
//! impl GraphNode for Named {
//!     fn name(&self) -> &str {
//!         self.0
//!     }
//!     fn on_culled(&mut self) {}
//! }
//!
//! let mut graph = DependencyGraph::new();
//! let shadow = graph.add_node(Named("shadow"));
//! let lighting = graph.add_node(Named("lighting"));
//! let debug = graph.add_node(Named("debug"));
//!
//! graph.link(lighting, shadow);
//! graph.make_leaf(lighting);
//! graph.cull();
//!
//! assert!(!graph.node(shadow).is_culled());
//! assert!(graph.node(debug).is_culled());
//! ```
//!
//! The graph must be acyclic. This is not checked while linking; use
//! [`DependencyGraph::is_acyclic`] where a hard guarantee is needed.

mod graphviz;
mod node;

pub use node::{GraphNode, Node, NodeId};

use std::collections::VecDeque;

use crate::profiling::{profile_plot, profile_scope};

/// A per-frame DAG of nodes that supports culling of unused nodes.
#[derive(Debug)]
pub struct DependencyGraph<N> {
    /// Nodes in creation order. Culling never reorders or removes entries.
    nodes: Vec<Node<N>>,
    /// Set once `cull()` has run; the graph is read-only from then on.
    culled: bool,
}

impl<N> Default for DependencyGraph<N> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            culled: false,
        }
    }
}

impl<N: GraphNode> DependencyGraph<N> {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new empty graph with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            culled: false,
        }
    }

    /// Add a node and return its id.
    pub fn add_node(&mut self, payload: N) -> NodeId {
        self.add_node_with(|_| payload)
    }

    /// Add a node whose payload needs to know its own id.
    ///
    /// The id is reserved first and `build` finishes the node, so the graph
    /// never observes a partially constructed payload.
    pub fn add_node_with(&mut self, build: impl FnOnce(NodeId) -> N) -> NodeId {
        assert!(!self.culled, "cannot add nodes to a graph that was already culled");
        let index = u32::try_from(self.nodes.len()).expect("dependency graph exceeds u32::MAX nodes");
        let id = NodeId::new(index);
        let payload = build(id);
        self.nodes.push(Node::new(id, payload));
        id
    }

    /// Record that `from` depends on `to`.
    ///
    /// Appends `to` to the links of `from` and adds one reference to `to`.
    /// No check is made that the graph stays acyclic.
    ///
    /// # Panics
    ///
    /// Panics if either id is unknown or the graph was already culled.
    pub fn link(&mut self, from: NodeId, to: NodeId) {
        assert!(!self.culled, "cannot link nodes after the graph was culled");
        assert!(from.index() < self.nodes.len(), "invalid node id {from}");
        assert!(to.index() < self.nodes.len(), "invalid node id {to}");

        self.nodes[to.index()].inc_ref();
        self.nodes[from.index()].push_link(to);
    }

    /// Mark a node as a required output of the frame.
    ///
    /// # Panics
    ///
    /// Panics if the node already has references, or after culling.
    pub fn make_leaf(&mut self, id: NodeId) {
        assert!(!self.culled, "cannot make a leaf after the graph was culled");
        self.node_mut(id).make_leaf();
    }

    /// Cull every node that no leaf depends on, directly or transitively.
    ///
    /// Links are not removed; only reference counts change. Each culled
    /// node gets exactly one [`GraphNode::on_culled`] call. Runs in
    /// O(nodes + edges) and returns the number of culled nodes.
    ///
    /// # Panics
    ///
    /// Panics if the graph was already culled. A second pass would treat the
    /// post-cull counts as ground truth.
    pub fn cull(&mut self) -> usize {
        profile_scope!("DependencyGraph::cull");
        assert!(!self.culled, "cull() may only run once per graph");
        self.culled = true;

        let mut stack: Vec<NodeId> = Vec::with_capacity(self.nodes.len());
        stack.extend(
            self.nodes
                .iter()
                .filter(|node| node.ref_count() == 0)
                .map(Node::id),
        );

        let mut culled = 0;
        while let Some(id) = stack.pop() {
            let link_count = self.nodes[id.index()].links().len();
            for i in 0..link_count {
                let linked = self.nodes[id.index()].links()[i];
                if self.nodes[linked.index()].dec_ref() == 0 {
                    stack.push(linked);
                }
            }

            let node = &mut self.nodes[id.index()];
            log::trace!("Culling node {} '{}'", id, node.payload().name());
            node.payload_mut().on_culled();
            culled += 1;
        }

        profile_plot!("framegraph_culled_nodes", culled);
        log::debug!(
            "Dependency graph culled {} of {} nodes",
            culled,
            self.nodes.len()
        );
        culled
    }

    /// Check that the links form a DAG.
    ///
    /// Kahn's algorithm over the link edges; leaf marks are ignored.
    pub fn is_acyclic(&self) -> bool {
        let n = self.nodes.len();
        let mut in_degree = vec![0u32; n];
        for node in &self.nodes {
            for &to in node.links() {
                in_degree[to.index()] += 1;
            }
        }

        let mut queue: VecDeque<NodeId> = self
            .nodes
            .iter()
            .map(Node::id)
            .filter(|id| in_degree[id.index()] == 0)
            .collect();

        let mut visited = 0;
        while let Some(id) = queue.pop_front() {
            visited += 1;
            for &to in self.nodes[id.index()].links() {
                in_degree[to.index()] -= 1;
                if in_degree[to.index()] == 0 {
                    queue.push_back(to);
                }
            }
        }

        visited == n
    }
}

impl<N> DependencyGraph<N> {
    /// Get a node by id.
    ///
    /// # Panics
    ///
    /// Panics if the id does not belong to this graph.
    pub fn node(&self, id: NodeId) -> &Node<N> {
        assert!(id.index() < self.nodes.len(), "invalid node id {id}");
        &self.nodes[id.index()]
    }

    /// Get a node by id, mutably.
    ///
    /// # Panics
    ///
    /// Panics if the id does not belong to this graph.
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node<N> {
        assert!(id.index() < self.nodes.len(), "invalid node id {id}");
        &mut self.nodes[id.index()]
    }

    /// All nodes in creation order.
    pub fn nodes(&self) -> &[Node<N>] {
        &self.nodes
    }

    /// Number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether [`cull`](Self::cull) has already run.
    pub fn is_culled(&self) -> bool {
        self.culled
    }

    /// Drop every node, keeping the allocation for the next frame.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.culled = false;
    }
}
