//! Frame graph configuration.

/// Configuration for a [`FrameGraph`](super::FrameGraph).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameGraphConfig {
    /// Name used in log messages and as the Graphviz graph name.
    pub label: String,
    /// Verify the graph is acyclic before culling. Enabled in debug builds.
    pub check_cycles: bool,
}

impl Default for FrameGraphConfig {
    fn default() -> Self {
        Self {
            label: "frame".to_string(),
            check_cycles: cfg!(debug_assertions),
        }
    }
}

impl FrameGraphConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Enable or disable the cycle check in `compile()`.
    pub fn with_cycle_check(mut self, enabled: bool) -> Self {
        self.check_cycles = enabled;
        self
    }
}
