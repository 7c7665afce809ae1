//! The validated, levelled, transitively-reduced module graph.
//!
//! Construction runs every check up front and fails fast:
//!   1. registration keys match module names, no duplicates
//!   2. every declared neighbour resolves to a registered module
//!   3. the unified upstream relation is acyclic
//!   4. upstream closures and direct (reduced) relations are tabulated
//!   5. modules are partitioned into levels
//!
//! After construction the graph is immutable and every query is a table
//! lookup, so a `&DependencyGraph` can be shared freely between threads.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::debug;

use super::module::Module;
use crate::error::{Error, Relation, Result};

static EMPTY: BTreeSet<String> = BTreeSet::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    Unseen,
    OnPath,
    Done,
}

/// The analysed dependency graph.
///
/// Edges in `digraph` run from upstream to downstream and represent the
/// unified relation: a module's explicit upstream declarations plus every
/// module that lists it as a downstream.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    modules: BTreeMap<String, Module>,
    digraph: DiGraph<String, ()>,
    node_index: HashMap<String, NodeIndex>,
    upstream_closure: HashMap<String, BTreeSet<String>>,
    direct_upstreams: HashMap<String, BTreeSet<String>>,
    direct_downstreams: HashMap<String, BTreeSet<String>>,
    levels: Vec<BTreeSet<String>>,
    level_index: HashMap<String, usize>,
}

impl DependencyGraph {
    /// Build from a collection of modules. Two modules sharing a name are
    /// rejected.
    pub fn new(modules: impl IntoIterator<Item = Module>) -> Result<Self> {
        let mut map = BTreeMap::new();
        for module in modules {
            if map.contains_key(module.name()) {
                return Err(Error::DuplicateModule {
                    name: module.name().to_string(),
                });
            }
            map.insert(module.name().to_string(), module);
        }
        Self::build(map)
    }

    /// Build from a name → module registration. Every key must equal the
    /// name of the module registered under it.
    pub fn from_map(modules: impl IntoIterator<Item = (String, Module)>) -> Result<Self> {
        let mut map = BTreeMap::new();
        for (key, module) in modules {
            if key != module.name() {
                return Err(Error::NameMismatch {
                    key,
                    name: module.name().to_string(),
                });
            }
            if map.contains_key(&key) {
                return Err(Error::DuplicateModule { name: key });
            }
            map.insert(key, module);
        }
        Self::build(map)
    }

    fn build(modules: BTreeMap<String, Module>) -> Result<Self> {
        check_references(&modules)?;

        let mut digraph: DiGraph<String, ()> = DiGraph::new();
        let mut node_index: HashMap<String, NodeIndex> = HashMap::new();
        for name in modules.keys() {
            let idx = digraph.add_node(name.clone());
            node_index.insert(name.clone(), idx);
        }
        for module in modules.values() {
            let this = node_index[module.name()];
            for downstream in module.downstreams() {
                digraph.update_edge(this, node_index[downstream.as_str()], ());
            }
            for upstream in module.upstreams() {
                digraph.update_edge(node_index[upstream.as_str()], this, ());
            }
        }

        let mut graph = Self {
            modules,
            digraph,
            node_index,
            upstream_closure: HashMap::new(),
            direct_upstreams: HashMap::new(),
            direct_downstreams: HashMap::new(),
            levels: Vec::new(),
            level_index: HashMap::new(),
        };

        graph.check_acyclic()?;
        graph.reduce()?;
        graph.assign_levels()?;
        Ok(graph)
    }

    // ─── Validation ──────────────────────────────────────────────────────────

    /// Walk the unified relation downstream, then upstream, from every module
    /// with an explicit on-path set. Revisiting a module that is still on the
    /// current walk is a cycle, reported against the walk's origin.
    fn check_acyclic(&self) -> Result<()> {
        let roots: Vec<NodeIndex> = self.modules.keys().map(|n| self.node_index[n]).collect();

        for direction in [Direction::Outgoing, Direction::Incoming] {
            let mut state = vec![Visit::Unseen; self.digraph.node_count()];

            for &root in &roots {
                if state[root.index()] != Visit::Unseen {
                    continue;
                }
                state[root.index()] = Visit::OnPath;
                let mut stack: Vec<(NodeIndex, Vec<NodeIndex>)> =
                    vec![(root, self.neighbours(root, direction))];

                loop {
                    let Some(top) = stack.last_mut() else {
                        break;
                    };
                    match top.1.pop() {
                        Some(next) => match state[next.index()] {
                            Visit::OnPath => {
                                return Err(Error::Cycle {
                                    module: self.digraph[root].clone(),
                                });
                            }
                            Visit::Done => {}
                            Visit::Unseen => {
                                state[next.index()] = Visit::OnPath;
                                stack.push((next, self.neighbours(next, direction)));
                            }
                        },
                        None => {
                            let node = top.0;
                            state[node.index()] = Visit::Done;
                            stack.pop();
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn neighbours(&self, idx: NodeIndex, direction: Direction) -> Vec<NodeIndex> {
        self.digraph.neighbors_directed(idx, direction).collect()
    }

    // ─── Transitive reduction ────────────────────────────────────────────────

    /// Tabulate the upstream closure of every module, then drop from each
    /// module's unified upstream set every entry that is already upstream of
    /// another entry.
    fn reduce(&mut self) -> Result<()> {
        let order = toposort(&self.digraph, None).map_err(|cycle| {
            Error::InternalConsistency(format!(
                "topological sort failed at \"{}\" after acyclicity check",
                self.digraph[cycle.node_id()]
            ))
        })?;

        for &idx in &order {
            let mut closure = BTreeSet::new();
            for up in self.digraph.neighbors_directed(idx, Direction::Incoming) {
                let up_name = &self.digraph[up];
                closure.insert(up_name.clone());
                if let Some(inherited) = self.upstream_closure.get(up_name) {
                    closure.extend(inherited.iter().cloned());
                }
            }
            self.upstream_closure.insert(self.digraph[idx].clone(), closure);
        }

        for name in self.modules.keys() {
            self.direct_downstreams.entry(name.clone()).or_default();
        }

        for name in self.modules.keys() {
            let unified = self.upstreams(name);
            let direct: BTreeSet<String> = unified
                .iter()
                .filter(|u| {
                    !unified
                        .iter()
                        .any(|u2| u2 != *u && self.is_upstream(u.as_str(), u2.as_str()))
                })
                .cloned()
                .collect();

            for up in &direct {
                self.direct_downstreams
                    .entry(up.clone())
                    .or_default()
                    .insert(name.clone());
            }
            self.direct_upstreams.insert(name.clone(), direct);
        }
        Ok(())
    }

    // ─── Levels ──────────────────────────────────────────────────────────────

    /// Repeatedly collect every unassigned module whose direct upstreams are
    /// all assigned, and commit the batch as the next level.
    fn assign_levels(&mut self) -> Result<()> {
        let module_count = self.modules.len();
        let mut iterations = 0usize;

        while self.level_index.len() < module_count {
            iterations += 1;
            if iterations > module_count {
                return Err(Error::InternalConsistency(format!(
                    "level assignment did not finish after {} iterations for {} modules",
                    iterations - 1,
                    module_count
                )));
            }

            let level: BTreeSet<String> = self
                .modules
                .keys()
                .filter(|name| !self.level_index.contains_key(name.as_str()))
                .filter(|name| {
                    self.direct_upstreams(name)
                        .iter()
                        .all(|up| self.level_index.contains_key(up))
                })
                .cloned()
                .collect();

            if level.is_empty() {
                return Err(Error::InternalConsistency(format!(
                    "level {} would be empty with {} modules unassigned",
                    self.levels.len(),
                    module_count - self.level_index.len()
                )));
            }

            let number = self.levels.len();
            for name in &level {
                debug!(level = number, "{}", level_line(name, self.direct_upstreams(name)));
                self.level_index.insert(name.clone(), number);
            }
            self.levels.push(level);
        }
        Ok(())
    }

    // ─── Queries ─────────────────────────────────────────────────────────────

    /// Levels in dependency order: every module's direct upstreams live on
    /// earlier levels.
    pub fn levels(&self) -> &[BTreeSet<String>] {
        &self.levels
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn level_of(&self, name: &str) -> Option<usize> {
        self.level_index.get(name).copied()
    }

    /// Number of modules on the most crowded level.
    pub fn max_level_width(&self) -> usize {
        self.levels.iter().map(BTreeSet::len).max().unwrap_or(0)
    }

    /// The reduced upstream set of `name`. Empty for unknown names.
    pub fn direct_upstreams(&self, name: &str) -> &BTreeSet<String> {
        self.direct_upstreams.get(name).unwrap_or(&EMPTY)
    }

    /// Modules whose reduced upstream set contains `name`. Empty for unknown
    /// names.
    pub fn direct_downstreams(&self, name: &str) -> &BTreeSet<String> {
        self.direct_downstreams.get(name).unwrap_or(&EMPTY)
    }

    /// The unified, unreduced upstream set of `name`.
    pub fn upstreams(&self, name: &str) -> BTreeSet<String> {
        match self.node_index.get(name) {
            None => BTreeSet::new(),
            Some(&idx) => self
                .digraph
                .neighbors_directed(idx, Direction::Incoming)
                .map(|up| self.digraph[up].clone())
                .collect(),
        }
    }

    /// Every module `name` depends on, directly or not.
    pub fn upstream_closure(&self, name: &str) -> &BTreeSet<String> {
        self.upstream_closure.get(name).unwrap_or(&EMPTY)
    }

    /// True if `a` is in the (possibly indirect) upstream closure of `b`.
    pub fn is_upstream(&self, a: &str, b: &str) -> bool {
        self.upstream_closure(b).contains(a)
    }

    pub fn module(&self, name: &str) -> Option<&Module> {
        self.modules.get(name)
    }

    pub fn module_names(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn level_report(&self) -> LevelReport<'_> {
        LevelReport { graph: self }
    }
}

fn check_references(modules: &BTreeMap<String, Module>) -> Result<()> {
    for module in modules.values() {
        let declared = module
            .downstreams()
            .iter()
            .map(|n| (n, Relation::Downstream))
            .chain(module.upstreams().iter().map(|n| (n, Relation::Upstream)));
        for (reference, relation) in declared {
            if !modules.contains_key(reference) {
                return Err(Error::UnknownReference {
                    module: module.name().to_string(),
                    reference: reference.clone(),
                    relation,
                });
            }
        }
    }
    Ok(())
}

fn level_line(name: &str, upstreams: &BTreeSet<String>) -> String {
    if upstreams.is_empty() {
        return name.to_string();
    }
    let ups: Vec<&str> = upstreams.iter().map(String::as_str).collect();
    format!("{} -> {}", name, ups.join(", "))
}

// ─── LevelReport ─────────────────────────────────────────────────────────────

const RULE: &str = "---------------------------------------------";

/// Human-readable level listing: one `module -> upstream, ...` line per
/// module, levels separated by rules.
pub struct LevelReport<'a> {
    graph: &'a DependencyGraph,
}

impl fmt::Display for LevelReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{RULE}")?;
        for level in self.graph.levels() {
            for name in level {
                writeln!(f, "{}", level_line(name, self.graph.direct_upstreams(name)))?;
            }
            writeln!(f, "{RULE}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/rust/test_graph_analysis.rs"]
mod tests;
