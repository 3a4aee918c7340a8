//! Dependency graph (DAG) for component execution
//! Computes the transitive closure of a target, topological order and cycles

pub mod error;

pub use error::GraphError;

use crate::registry::ComponentRegistry;
use crate::types::{ComponentId, ComponentKind};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};

/// Node in the dependency graph representing one component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: ComponentId,
    pub kind: ComponentKind,
    pub dependencies: Vec<ComponentId>,
    pub dependents: Vec<ComponentId>,
}

impl GraphNode {
    pub fn new(id: ComponentId, kind: ComponentKind) -> Self {
        Self {
            id,
            kind,
            dependencies: Vec::new(),
            dependents: Vec::new(),
        }
    }

    /// Add dependency to this node
    pub fn add_dependency(&mut self, dependency: ComponentId) {
        if !self.dependencies.contains(&dependency) {
            self.dependencies.push(dependency);
        }
    }

    /// Add dependent to this node
    pub fn add_dependent(&mut self, dependent: ComponentId) {
        if !self.dependents.contains(&dependent) {
            self.dependents.push(dependent);
        }
    }

    pub fn has_dependencies(&self) -> bool {
        !self.dependencies.is_empty()
    }
}

/// Dependency graph for component execution ordering
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    nodes: BTreeMap<ComponentId, GraphNode>,
    targets: Vec<ComponentId>,
}

impl DependencyGraph {
    /// Create new empty dependency graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Transitive closure of `target` as declared in the registry
    pub fn for_target(
        registry: &ComponentRegistry,
        target: &ComponentId,
    ) -> Result<Self, GraphError> {
        Self::for_targets(registry, std::slice::from_ref(target))
    }

    /// Transitive closure of every target
    pub fn for_targets(
        registry: &ComponentRegistry,
        targets: &[ComponentId],
    ) -> Result<Self, GraphError> {
        let mut graph = Self::new();
        let mut pending: VecDeque<ComponentId> = VecDeque::new();

        for target in targets {
            if !registry.contains(target) {
                return Err(GraphError::UnknownComponent(target.clone()));
            }
            graph.targets.push(target.clone());
            pending.push_back(target.clone());
        }

        while let Some(current) = pending.pop_front() {
            if graph.nodes.contains_key(&current) {
                continue;
            }

            let entry = registry
                .get(&current)
                .map_err(|_| GraphError::UnknownComponent(current.clone()))?;
            graph.add_node(current.clone(), entry.metadata.kind);

            for dependency in entry.dependencies.all() {
                if !registry.contains(dependency) {
                    return Err(GraphError::UnknownDependency {
                        component: dependency.clone(),
                        required_by: current.clone(),
                    });
                }
                pending.push_back(dependency.clone());
            }
        }

        // Edges are added once every node exists
        let ids: Vec<ComponentId> = graph.nodes.keys().cloned().collect();
        for id in ids {
            let dependencies = registry
                .dependencies(&id)
                .map_err(|_| GraphError::UnknownComponent(id.clone()))?;
            for dependency in dependencies.all() {
                graph.add_dependency(&id, dependency)?;
            }
        }

        if let Some(cycle) = graph.detect_cycle() {
            return Err(GraphError::CircularDependency { cycle });
        }

        Ok(graph)
    }

    /// Add node to the dependency graph
    pub fn add_node(&mut self, id: ComponentId, kind: ComponentKind) {
        self.nodes
            .entry(id.clone())
            .or_insert_with(|| GraphNode::new(id, kind));
    }

    /// Add dependency edge between two components
    /// `from` depends on `to` - meaning `to` must run before `from`
    pub fn add_dependency(&mut self, from: &ComponentId, to: &ComponentId) -> Result<(), GraphError> {
        if !self.nodes.contains_key(from) {
            return Err(GraphError::DependencyGraphCorrupted {
                details: format!(
                    "Dependent component '{}' not found when adding dependency on '{}'",
                    from, to
                ),
            });
        }

        if !self.nodes.contains_key(to) {
            return Err(GraphError::DependencyGraphCorrupted {
                details: format!(
                    "Dependency '{}' not found when adding dependency from '{}'",
                    to, from
                ),
            });
        }

        if let Some(node) = self.nodes.get_mut(from) {
            node.add_dependency(to.clone());
        }
        if let Some(node) = self.nodes.get_mut(to) {
            node.add_dependent(from.clone());
        }

        Ok(())
    }

    pub fn contains(&self, id: &ComponentId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node(&self, id: &ComponentId) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    pub fn targets(&self) -> &[ComponentId] {
        &self.targets
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get_dependencies(&self, id: &ComponentId) -> Vec<ComponentId> {
        self.nodes
            .get(id)
            .map(|n| n.dependencies.clone())
            .unwrap_or_default()
    }

    pub fn get_dependents(&self, id: &ComponentId) -> Vec<ComponentId> {
        self.nodes
            .get(id)
            .map(|n| n.dependents.clone())
            .unwrap_or_default()
    }

    /// Perform topological sort to get execution order.
    /// Ready nodes are taken in identifier order so runs are reproducible.
    pub fn topological_sort(&self) -> Result<Vec<ComponentId>, GraphError> {
        if let Some(cycle) = self.detect_cycle() {
            return Err(GraphError::CircularDependency { cycle });
        }

        // Kahn's algorithm
        let mut in_degree: BTreeMap<&ComponentId, usize> = BTreeMap::new();
        let mut ready: BTreeSet<&ComponentId> = BTreeSet::new();
        let mut result = Vec::with_capacity(self.nodes.len());

        for (id, node) in &self.nodes {
            let degree = node.dependencies.len();
            in_degree.insert(id, degree);
            if degree == 0 {
                ready.insert(id);
            }
        }

        while let Some(current) = ready.iter().next().copied() {
            ready.remove(current);
            result.push(current.clone());

            if let Some(node) = self.nodes.get(current) {
                for dependent in &node.dependents {
                    if let Some(degree) = in_degree.get_mut(dependent) {
                        *degree -= 1;
                        if *degree == 0 {
                            ready.insert(dependent);
                        }
                    }
                }
            }
        }

        if result.len() != self.nodes.len() {
            return Err(GraphError::DependencyGraphCorrupted {
                details: format!(
                    "Topological sort incomplete: {} unprocessed nodes",
                    self.nodes.len() - result.len()
                ),
            });
        }

        Ok(result)
    }

    /// Detect cycles in the dependency graph using DFS
    pub fn detect_cycle(&self) -> Option<Vec<ComponentId>> {
        let mut visited = HashSet::new();
        let mut rec_stack = HashSet::new();
        let mut path = Vec::new();

        for id in self.nodes.keys() {
            if !visited.contains(id) {
                if let Some(cycle) = self.dfs_cycle_detect(id, &mut visited, &mut rec_stack, &mut path)
                {
                    return Some(cycle);
                }
            }
        }

        None
    }

    fn dfs_cycle_detect(
        &self,
        node: &ComponentId,
        visited: &mut HashSet<ComponentId>,
        rec_stack: &mut HashSet<ComponentId>,
        path: &mut Vec<ComponentId>,
    ) -> Option<Vec<ComponentId>> {
        visited.insert(node.clone());
        rec_stack.insert(node.clone());
        path.push(node.clone());

        for dependency in self.get_dependencies(node) {
            if !visited.contains(&dependency) {
                if let Some(cycle) = self.dfs_cycle_detect(&dependency, visited, rec_stack, path) {
                    return Some(cycle);
                }
            } else if rec_stack.contains(&dependency) {
                // Back edge: the cycle starts where `dependency` entered the path
                let start = path.iter().position(|x| x == &dependency).unwrap_or(0);
                let mut cycle = path[start..].to_vec();
                cycle.push(dependency);
                return Some(cycle);
            }
        }

        rec_stack.remove(node);
        path.pop();
        None
    }

    /// Get graph statistics for monitoring
    pub fn get_stats(&self) -> GraphStats {
        let edge_count: usize = self.nodes.values().map(|n| n.dependencies.len()).sum();
        let max_dependencies = self
            .nodes
            .values()
            .map(|n| n.dependencies.len())
            .max()
            .unwrap_or(0);
        let nodes_with_no_deps = self.nodes.values().filter(|n| !n.has_dependencies()).count();

        GraphStats {
            total_nodes: self.nodes.len(),
            total_edges: edge_count,
            max_dependencies,
            nodes_with_no_dependencies: nodes_with_no_deps,
        }
    }

    /// Components nothing else in the graph depends on
    pub fn get_leaf_components(&self) -> Vec<ComponentId> {
        self.nodes
            .values()
            .filter(|n| n.dependents.is_empty())
            .map(|n| n.id.clone())
            .collect()
    }
}

/// Graph statistics for monitoring and debugging
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub max_dependencies: usize,
    pub nodes_with_no_dependencies: usize,
}

impl GraphStats {
    pub fn average_dependencies(&self) -> f64 {
        if self.total_nodes == 0 {
            0.0
        } else {
            self.total_edges as f64 / self.total_nodes as f64
        }
    }
}
