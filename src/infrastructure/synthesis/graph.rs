// Copyright 2025 the eks-forge Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The resource graph: every synthesized resource is a node, dependencies
//! are edges, and the apply order is a topological ordering of the graph.

use crate::domain::config::TagSet;
use crate::shared::error::StackError;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceKind {
    Cluster,
    NodeGroup,
    ClusterRole,
    ClusterRoleBinding,
    IdentityMap,
    Manifest,
    HelmRelease,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Cluster => "Cluster",
            ResourceKind::NodeGroup => "NodeGroup",
            ResourceKind::ClusterRole => "ClusterRole",
            ResourceKind::ClusterRoleBinding => "ClusterRoleBinding",
            ResourceKind::IdentityMap => "IdentityMap",
            ResourceKind::Manifest => "Manifest",
            ResourceKind::HelmRelease => "HelmRelease",
        }
    }
}

/// One declared resource. Properties are an opaque JSON object; the graph
/// sequences application, it does not interpret them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceNode {
    pub id: String,
    pub kind: ResourceKind,
    pub properties: serde_json::Value,
    #[serde(default)]
    pub depends_on: Vec<String>,
    #[serde(default)]
    pub tags: TagSet,
}

impl ResourceNode {
    pub fn new(id: impl Into<String>, kind: ResourceKind, properties: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            kind,
            properties,
            depends_on: Vec::new(),
            tags: TagSet::new(),
        }
    }

    pub fn depends_on(mut self, id: impl Into<String>) -> Self {
        self.depends_on.push(id.into());
        self
    }
}

#[derive(Debug, Default)]
pub struct ResourceGraph {
    nodes: Vec<ResourceNode>,
    index: HashMap<String, usize>,
}

impl ResourceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node. Duplicate ids are rejected.
    pub fn add(&mut self, node: ResourceNode) -> Result<(), StackError> {
        if self.index.contains_key(&node.id) {
            return Err(StackError::validation_error(format!(
                "Duplicate resource id: '{}'",
                node.id
            )));
        }

        self.index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
        Ok(())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&ResourceNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut ResourceNode> {
        self.index.get(id).copied().map(move |i| &mut self.nodes[i])
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceNode> {
        self.nodes.iter()
    }

    /// Merge the given tags into every node. Node-specific tags win on
    /// key collision.
    pub fn apply_tags(&mut self, tags: &TagSet) {
        for node in &mut self.nodes {
            for (key, value) in tags {
                node.tags
                    .entry(key.clone())
                    .or_insert_with(|| value.clone());
            }
        }
    }

    /// Topological apply order (Kahn). Deterministic: ties break by
    /// insertion order. Unknown dependencies and cycles are validation
    /// errors.
    pub fn ordered(&self) -> Result<Vec<&ResourceNode>, StackError> {
        let mut indegree = vec![0usize; self.nodes.len()];
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); self.nodes.len()];

        for (i, node) in self.nodes.iter().enumerate() {
            for dep in &node.depends_on {
                let &dep_index = self.index.get(dep).ok_or_else(|| {
                    StackError::validation_error(format!(
                        "Resource '{}' depends on unknown resource '{}'",
                        node.id, dep
                    ))
                })?;
                indegree[i] += 1;
                dependents[dep_index].push(i);
            }
        }

        let mut ready: VecDeque<usize> = (0..self.nodes.len())
            .filter(|&i| indegree[i] == 0)
            .collect();

        let mut order = Vec::with_capacity(self.nodes.len());
        while let Some(i) = ready.pop_front() {
            order.push(&self.nodes[i]);
            for &dependent in &dependents[i] {
                indegree[dependent] -= 1;
                if indegree[dependent] == 0 {
                    ready.push_back(dependent);
                }
            }
        }

        if order.len() != self.nodes.len() {
            return Err(StackError::validation_error(
                "Resource graph contains a dependency cycle".to_string(),
            ));
        }

        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(id: &str, deps: &[&str]) -> ResourceNode {
        let mut node = ResourceNode::new(id, ResourceKind::Manifest, json!({}));
        node.depends_on = deps.iter().map(|d| d.to_string()).collect();
        node
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut graph = ResourceGraph::new();
        graph.add(node("a", &[])).unwrap();
        assert!(graph.add(node("a", &[])).is_err());
    }

    #[test]
    fn test_topological_order() {
        let mut graph = ResourceGraph::new();
        // declared out of dependency order on purpose
        graph.add(node("binding", &["role"])).unwrap();
        graph.add(node("role", &["cluster"])).unwrap();
        graph.add(node("cluster", &[])).unwrap();

        let order: Vec<_> = graph.ordered().unwrap().iter().map(|n| n.id.clone()).collect();
        let pos = |id: &str| order.iter().position(|n| n == id).unwrap();
        assert!(pos("cluster") < pos("role"));
        assert!(pos("role") < pos("binding"));
    }

    #[test]
    fn test_unknown_dependency() {
        let mut graph = ResourceGraph::new();
        graph.add(node("a", &["missing"])).unwrap();
        assert!(graph.ordered().is_err());
    }

    #[test]
    fn test_cycle_detected() {
        let mut graph = ResourceGraph::new();
        graph.add(node("a", &["b"])).unwrap();
        graph.add(node("b", &["a"])).unwrap();
        assert!(graph.ordered().is_err());
    }

    #[test]
    fn test_tags_do_not_override_node_tags() {
        let mut graph = ResourceGraph::new();
        let mut n = node("a", &[]);
        n.tags.insert("team".to_string(), "storage".to_string());
        graph.add(n).unwrap();

        let mut tags = TagSet::new();
        tags.insert("team".to_string(), "platform".to_string());
        tags.insert("env".to_string(), "test".to_string());
        graph.apply_tags(&tags);

        let node = graph.node("a").unwrap();
        assert_eq!(node.tags.get("team").map(String::as_str), Some("storage"));
        assert_eq!(node.tags.get("env").map(String::as_str), Some("test"));
    }
}
