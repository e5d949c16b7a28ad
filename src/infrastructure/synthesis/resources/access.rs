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

//! Access-policy application: permission groups become ClusterRole nodes,
//! bindings become ClusterRoleBinding nodes depending on their group, IAM
//! mappings and the baseline account land in the identity map, and raw
//! manifests pass through verbatim.

use crate::domain::config::{AccessBinding, IdentityMapping, PermissionGroup};
use crate::infrastructure::cloud::provider::CloudProvider;
use crate::infrastructure::constants::{
    NODE_ID_IDENTITY_MAP, NODE_PREFIX_CLUSTER_ROLE, NODE_PREFIX_CLUSTER_ROLE_BINDING,
    NODE_PREFIX_MANIFEST,
};
use crate::infrastructure::synthesis::graph::{ResourceGraph, ResourceKind, ResourceNode};
use crate::infrastructure::synthesis::resources::cluster::ClusterHandle;
use crate::shared::error::StackError;
use serde::Serialize;
use serde_json::json;
use std::collections::HashSet;
use tracing::debug;

/// An IAM role mapped into the cluster's authorization layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MappedRole {
    pub arn: String,
    pub username: String,
    pub groups: Vec<String>,
}

/// What the access stage produced; add-on installation depends on it
#[derive(Debug, Clone)]
pub struct AppliedAccessPolicy {
    pub node_ids: Vec<String>,
    pub trusted_accounts: Vec<String>,
    pub mapped_roles: Vec<MappedRole>,
}

pub struct AccessPolicyBuilder<'a> {
    cluster: &'a ClusterHandle,
    account: &'a str,
}

impl<'a> AccessPolicyBuilder<'a> {
    pub fn new(cluster: &'a ClusterHandle, account: &'a str) -> Self {
        Self { cluster, account }
    }

    pub async fn apply(
        &self,
        provider: &dyn CloudProvider,
        groups: &[PermissionGroup],
        bindings: &[AccessBinding],
        mappings: &[IdentityMapping],
        manifests: &[serde_yaml::Value],
        graph: &mut ResourceGraph,
    ) -> Result<AppliedAccessPolicy, StackError> {
        let mut node_ids = Vec::new();

        let declared: HashSet<&str> = groups.iter().map(|g| g.name.as_str()).collect();

        for group in groups {
            let node_id = format!("{}/{}", NODE_PREFIX_CLUSTER_ROLE, group.name);
            graph.add(
                ResourceNode::new(
                    node_id.clone(),
                    ResourceKind::ClusterRole,
                    serde_json::to_value(group.to_cluster_role())?,
                )
                .depends_on(self.cluster.node_id.clone()),
            )?;
            node_ids.push(node_id);
        }

        // A binding's group node is a declared dependency, so topological
        // ordering holds regardless of declaration order.
        for binding in bindings {
            if !declared.contains(binding.group.as_str()) {
                return Err(StackError::not_found("permission group", &binding.group));
            }

            let node_id = format!("{}/{}", NODE_PREFIX_CLUSTER_ROLE_BINDING, binding.name);
            graph.add(
                ResourceNode::new(
                    node_id.clone(),
                    ResourceKind::ClusterRoleBinding,
                    serde_json::to_value(binding.to_cluster_role_binding())?,
                )
                .depends_on(self.cluster.node_id.clone())
                .depends_on(format!("{}/{}", NODE_PREFIX_CLUSTER_ROLE, binding.group)),
            )?;
            node_ids.push(node_id);
        }

        // The build account is always trusted, before any explicit mapping.
        let trusted_accounts = vec![self.account.to_string()];

        let mut mapped_roles = Vec::with_capacity(mappings.len());
        for mapping in mappings {
            let role = provider.lookup_role(&mapping.role_name).await?;
            debug!(role = %mapping.role_name, arn = %role.arn, "resolved identity mapping");
            mapped_roles.push(MappedRole {
                arn: role.arn,
                username: mapping.username.clone(),
                groups: mapping.groups.clone(),
            });
        }

        graph.add(
            ResourceNode::new(
                NODE_ID_IDENTITY_MAP,
                ResourceKind::IdentityMap,
                json!({
                    "accounts": trusted_accounts,
                    "roles": mapped_roles,
                }),
            )
            .depends_on(self.cluster.node_id.clone()),
        )?;
        node_ids.push(NODE_ID_IDENTITY_MAP.to_string());

        for (index, doc) in manifests.iter().enumerate() {
            let node_id = manifest_node_id(doc, index, graph);
            graph.add(
                ResourceNode::new(
                    node_id.clone(),
                    ResourceKind::Manifest,
                    serde_json::to_value(doc)?,
                )
                .depends_on(self.cluster.node_id.clone()),
            )?;
            node_ids.push(node_id);
        }

        Ok(AppliedAccessPolicy {
            node_ids,
            trusted_accounts,
            mapped_roles,
        })
    }
}

/// Derive a stable node id from the document's kind and name; fall back to
/// the document index when either is absent or the id is taken.
fn manifest_node_id(doc: &serde_yaml::Value, index: usize, graph: &ResourceGraph) -> String {
    let kind = doc.get("kind").and_then(|v| v.as_str());
    let name = doc
        .get("metadata")
        .and_then(|m| m.get("name"))
        .and_then(|v| v.as_str());

    if let (Some(kind), Some(name)) = (kind, name) {
        let id = format!("{}/{}-{}", NODE_PREFIX_MANIFEST, kind.to_lowercase(), name);
        if !graph.contains(&id) {
            return id;
        }
    }

    format!("{}/{}", NODE_PREFIX_MANIFEST, index)
}
