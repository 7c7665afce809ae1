//! A named node with declared upstream and downstream neighbours.

use std::collections::BTreeSet;

/// A unit of the dependency graph, as handed over by a declaration loader.
///
/// A dependency may be declared from either side: `b.add_upstream("a")` and
/// `a.add_downstream("b")` both say that `b` depends on `a`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    name: String,
    downstreams: BTreeSet<String>,
    upstreams: BTreeSet<String>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            downstreams: BTreeSet::new(),
            upstreams: BTreeSet::new(),
        }
    }

    /// Declare that `downstream` depends on this module.
    pub fn add_downstream(&mut self, downstream: impl Into<String>) -> &mut Self {
        self.downstreams.insert(downstream.into());
        self
    }

    /// Declare that this module depends on `upstream`.
    pub fn add_upstream(&mut self, upstream: impl Into<String>) -> &mut Self {
        self.upstreams.insert(upstream.into());
        self
    }

    pub fn with_downstream(mut self, downstream: impl Into<String>) -> Self {
        self.add_downstream(downstream);
        self
    }

    pub fn with_upstream(mut self, upstream: impl Into<String>) -> Self {
        self.add_upstream(upstream);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn downstreams(&self) -> &BTreeSet<String> {
        &self.downstreams
    }

    pub fn upstreams(&self) -> &BTreeSet<String> {
        &self.upstreams
    }
}
