//! Shared helpers for the frame graph integration tests.

#![allow(dead_code)]

use redlilium_framegraph::{
    DependencyGraph, Extent3d, GraphNode, NodeId, TextureDescriptor, TextureFormat, TextureUsage,
};

/// Graph payload that counts how often it was culled.
#[derive(Debug)]
pub struct Tracked {
    pub name: String,
    pub culled: u32,
}

impl Tracked {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            culled: 0,
        }
    }
}

impl GraphNode for Tracked {
    fn name(&self) -> &str {
        &self.name
    }

    fn on_culled(&mut self) {
        self.culled += 1;
    }
}

/// Build a graph with `count` nodes named `n0..n{count}`.
pub fn tracked_graph(count: usize) -> (DependencyGraph<Tracked>, Vec<NodeId>) {
    let mut graph = DependencyGraph::with_capacity(count);
    let ids = (0..count)
        .map(|i| graph.add_node(Tracked::new(format!("n{i}"))))
        .collect();
    (graph, ids)
}

/// Names of the culled nodes, in node order.
pub fn culled_names(graph: &DependencyGraph<Tracked>) -> Vec<&str> {
    graph
        .nodes()
        .iter()
        .filter(|node| node.is_culled())
        .map(|node| node.payload().name.as_str())
        .collect()
}

/// Square mip-level sized color texture.
pub fn mip_level(base: u32, level: u32) -> TextureDescriptor {
    let size = Extent3d::new_2d(base, base).mip_level(level);
    TextureDescriptor::new_2d(
        size.width,
        size.height,
        TextureFormat::Rgba16Float,
        TextureUsage::COLOR_ATTACHMENT | TextureUsage::SAMPLED,
    )
}
