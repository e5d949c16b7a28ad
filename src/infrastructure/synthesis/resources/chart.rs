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

use crate::domain::config::AddOnSpec;
use crate::infrastructure::cloud::provider::CloudProvider;
use crate::infrastructure::constants::NODE_PREFIX_HELM;
use crate::infrastructure::synthesis::graph::{ResourceGraph, ResourceKind, ResourceNode};
use crate::infrastructure::synthesis::resources::cluster::ClusterHandle;
use crate::shared::error::StackError;
use serde_json::json;
use tracing::warn;

/// Emits one HelmRelease node per add-on. The release node depends on the
/// cluster and on every access-policy node: installers commonly require
/// cluster-level permissions already in place.
pub struct HelmChartBuilder<'a> {
    cluster: &'a ClusterHandle,
    access_node_ids: &'a [String],
}

impl<'a> HelmChartBuilder<'a> {
    pub fn new(cluster: &'a ClusterHandle, access_node_ids: &'a [String]) -> Self {
        Self {
            cluster,
            access_node_ids,
        }
    }

    /// Install one add-on. Returns the node id, or None when the
    /// (cluster, release) key was already installed.
    pub async fn install(
        &self,
        provider: &dyn CloudProvider,
        spec: &AddOnSpec,
        graph: &mut ResourceGraph,
    ) -> Result<Option<String>, StackError> {
        let node_id = format!("{}/{}/{}", NODE_PREFIX_HELM, self.cluster.name, spec.release);

        if graph.contains(&node_id) {
            warn!(
                release = %spec.release,
                cluster = %self.cluster.name,
                "duplicate release, skipping"
            );
            return Ok(None);
        }

        let chart = provider
            .resolve_chart(&spec.repository, &spec.chart, &spec.version)
            .await?;

        let mut node = ResourceNode::new(
            node_id.clone(),
            ResourceKind::HelmRelease,
            json!({
                "cluster": self.cluster.name,
                "chart": chart.chart,
                "version": chart.version,
                "repository": chart.repository,
                "release": spec.release,
            }),
        )
        .depends_on(self.cluster.node_id.clone());

        for access_node in self.access_node_ids {
            node = node.depends_on(access_node.clone());
        }

        graph.add(node)?;
        Ok(Some(node_id))
    }
}
