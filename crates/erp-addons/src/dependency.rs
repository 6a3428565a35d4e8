//! Dependency graph and deterministic load-order resolution.
//!
//! Addons declare the addons they depend on; installing must process every
//! dependency before its dependents. This module builds the graph over a
//! set of manifests and produces a topological order via Kahn's algorithm,
//! breaking ties between unconstrained addons lexicographically by name so
//! the order is reproducible across runs.
//!
//! # Example
//!
//! ```
//! use erp_addons::dependency::DependencyGraph;
//!
//! let mut graph = DependencyGraph::new();
//! graph.add_node("base");
//! graph.add_node("sale");
//! graph.add_dependency("sale", "base");
//!
//! let order = graph.resolve_order().unwrap();
//! assert_eq!(order, vec!["base", "sale"]);
//! ```

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap};

use crate::error::{Error, Result};
use crate::manifest::AddonManifest;

/// Directed graph of "depends-on" relations between addons.
///
/// Edges point from dependent to dependency: if `sale` depends on `base`,
/// the edge is `sale -> base`, and resolution returns `base` before `sale`.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    nodes: BTreeSet<String>,
    /// Addon -> the addons it depends on.
    edges: BTreeMap<String, BTreeSet<String>>,
}

impl DependencyGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from a set of manifests.
    ///
    /// Fails with [`Error::MissingDependency`] when a declared dependency
    /// does not appear among the manifests.
    pub fn from_manifests<'a>(
        manifests: impl IntoIterator<Item = &'a AddonManifest>,
    ) -> Result<Self> {
        let manifests: Vec<&AddonManifest> = manifests.into_iter().collect();
        let mut graph = Self::new();
        for manifest in &manifests {
            graph.add_node(&manifest.addon.name);
        }
        for manifest in &manifests {
            for dep in &manifest.addon.depends {
                if !graph.nodes.contains(dep) {
                    return Err(Error::MissingDependency {
                        addon: manifest.addon.name.clone(),
                        dependency: dep.clone(),
                    });
                }
                graph.add_dependency(&manifest.addon.name, dep);
            }
        }
        Ok(graph)
    }

    /// Add a node to the graph. Adding an existing node is a no-op.
    pub fn add_node(&mut self, name: &str) {
        self.nodes.insert(name.to_string());
        self.edges.entry(name.to_string()).or_default();
    }

    /// Declare that `addon` depends on `dependency`.
    ///
    /// Both nodes are created if missing; a dependency on an undiscovered
    /// addon surfaces later through [`from_manifests`](Self::from_manifests)
    /// validation or as an unsatisfiable order.
    pub fn add_dependency(&mut self, addon: &str, dependency: &str) {
        self.add_node(addon);
        self.add_node(dependency);
        self.edges
            .entry(addon.to_string())
            .or_default()
            .insert(dependency.to_string());
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(|deps| deps.len()).sum()
    }

    /// Direct dependencies of `addon`, sorted.
    pub fn dependencies_of(&self, addon: &str) -> Vec<&str> {
        self.edges
            .get(addon)
            .map(|deps| deps.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Resolve the load order using Kahn's algorithm.
    ///
    /// Every addon appears strictly after all of its dependencies; addons
    /// with no mutual ordering constraint are ordered by name, so repeated
    /// calls on the same graph return the identical sequence.
    ///
    /// # Errors
    ///
    /// [`Error::DependencyCycle`] naming the participating addons when the
    /// graph is cyclic. No partial order is returned on failure.
    pub fn resolve_order(&self) -> Result<Vec<String>> {
        // Reverse adjacency: dependency -> the addons that depend on it.
        let mut dependents: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        let mut in_degree: BTreeMap<&str, usize> = BTreeMap::new();
        for node in &self.nodes {
            in_degree.insert(node.as_str(), 0);
        }
        for (addon, deps) in &self.edges {
            for dep in deps {
                dependents.entry(dep.as_str()).or_default().push(addon.as_str());
                *in_degree.entry(addon.as_str()).or_insert(0) += 1;
            }
        }

        // Min-heap on name keeps extraction of ready nodes deterministic.
        let mut ready: BinaryHeap<Reverse<&str>> = in_degree
            .iter()
            .filter(|&(_, &deg)| deg == 0)
            .map(|(&name, _)| Reverse(name))
            .collect();

        let mut order = Vec::with_capacity(self.nodes.len());
        while let Some(Reverse(current)) = ready.pop() {
            order.push(current.to_string());
            for &dependent in dependents.get(current).into_iter().flatten() {
                if let Some(degree) = in_degree.get_mut(dependent) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.push(Reverse(dependent));
                    }
                }
            }
        }

        if order.len() != self.nodes.len() {
            let placed: BTreeSet<&str> = order.iter().map(String::as_str).collect();
            let participants: Vec<String> = self
                .nodes
                .iter()
                .filter(|n| !placed.contains(n.as_str()))
                .cloned()
                .collect();
            return Err(Error::DependencyCycle { participants });
        }
        Ok(order)
    }
}
