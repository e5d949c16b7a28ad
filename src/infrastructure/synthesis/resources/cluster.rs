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

use crate::domain::config::{ClusterSpec, IngressRule};
use crate::infrastructure::cloud::network::{NetworkRef, Subnet};
use crate::infrastructure::constants::{NODE_PREFIX_CLUSTER, NODE_PREFIX_NODE_GROUP};
use crate::infrastructure::synthesis::graph::{ResourceGraph, ResourceKind, ResourceNode};
use crate::shared::error::StackError;
use serde_json::json;

/// Emits the cluster node (and its default node group, if any) into the
/// graph and returns the handle downstream stages borrow.
pub struct ClusterBuilder<'a> {
    spec: &'a ClusterSpec,
    network: &'a NetworkRef,
}

impl<'a> ClusterBuilder<'a> {
    pub fn new(spec: &'a ClusterSpec, network: &'a NetworkRef) -> Self {
        Self { spec, network }
    }

    pub fn build(&self, graph: &mut ResourceGraph) -> Result<ClusterHandle, StackError> {
        let subnets = self
            .network
            .select_subnets(self.spec.subnet_selection, self.spec.availability_zones)?;

        let node_id = format!("{}/{}", NODE_PREFIX_CLUSTER, self.spec.name);
        let subnet_ids: Vec<&str> = subnets.iter().map(|s| s.id.as_str()).collect();

        graph.add(ResourceNode::new(
            node_id.clone(),
            ResourceKind::Cluster,
            json!({
                "name": self.spec.name,
                "version": self.spec.version.as_str(),
                "network": self.network.id,
                "subnets": subnet_ids,
                "endpoint_access": self.spec.endpoint_access.as_str(),
                "ingress_rules": [],
            }),
        ))?;

        if let Some(node_group) = &self.spec.node_group {
            graph.add(
                ResourceNode::new(
                    format!("{}/{}-default", NODE_PREFIX_NODE_GROUP, self.spec.name),
                    ResourceKind::NodeGroup,
                    json!({
                        "cluster": self.spec.name,
                        "size": node_group.size,
                        "instance_type": node_group.instance_type,
                    }),
                )
                .depends_on(node_id.clone()),
            )?;
        }

        Ok(ClusterHandle {
            name: self.spec.name.clone(),
            node_id,
            subnets,
            ingress_rules: Vec::new(),
        })
    }
}

/// The constructed cluster. Owned by the build context; downstream stages
/// borrow it. The only post-creation mutation is ingress attachment.
#[derive(Debug, Clone)]
pub struct ClusterHandle {
    pub name: String,
    pub node_id: String,
    pub subnets: Vec<Subnet>,
    pub ingress_rules: Vec<IngressRule>,
}

impl ClusterHandle {
    /// Attach an inbound rule to the cluster's security boundary.
    /// Idempotent: re-applying an identical rule changes nothing and
    /// returns false.
    pub fn allow_ingress(
        &mut self,
        graph: &mut ResourceGraph,
        rule: IngressRule,
    ) -> Result<bool, StackError> {
        if self.ingress_rules.contains(&rule) {
            return Ok(false);
        }

        self.ingress_rules.push(rule);

        let node = graph.node_mut(&self.node_id).ok_or_else(|| {
            StackError::not_found("cluster resource", &self.node_id)
        })?;
        node.properties["ingress_rules"] = serde_json::to_value(&self.ingress_rules)?;

        Ok(true)
    }
}
