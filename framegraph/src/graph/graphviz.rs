//! Graphviz export of a dependency graph for debugging.

use std::io::{self, Write};

use super::{DependencyGraph, GraphNode};

impl<N: GraphNode> DependencyGraph<N> {
    /// Write a Graphviz (DOT) view of the graph.
    ///
    /// Every node is labelled with its name, reference count and creation
    /// sequence; culled nodes are drawn in a darker colour. Only available in
    /// debug builds: in release builds nothing is written.
    pub fn export_graphviz<W: Write>(&self, out: &mut W, name: Option<&str>) -> io::Result<()> {
        #[cfg(debug_assertions)]
        {
            let graph_name = name.unwrap_or("graph");
            writeln!(out, "digraph \"{}\" {{", escape(graph_name))?;
            writeln!(out, "rankdir = LR")?;
            writeln!(out, "bgcolor = black")?;
            writeln!(
                out,
                "node [shape=rectangle, fontname=\"helvetica\", fontsize=10]"
            )?;
            writeln!(out)?;

            for node in self.nodes() {
                let ref_count = node.ref_count();
                writeln!(
                    out,
                    "\"{}\" [label=\"{}\\nrefs: {}\\nseq: {}\", style=filled, fillcolor={}]",
                    node.id(),
                    escape(node.payload().name()),
                    ref_count,
                    node.id().index(),
                    if ref_count > 0 { "darkorange" } else { "darkorange4" }
                )?;
            }

            writeln!(out)?;
            for node in self.nodes() {
                write!(out, "{} -> {{ ", node.id())?;
                for link in node.links() {
                    write!(out, "{link} ")?;
                }
                writeln!(out, "}} [color=red2]")?;
            }

            writeln!(out, "}}")?;
        }

        #[cfg(not(debug_assertions))]
        let _ = (out, name);

        Ok(())
    }
}

#[cfg(debug_assertions)]
fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}
