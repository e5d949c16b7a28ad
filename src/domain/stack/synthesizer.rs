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

//! The five-stage synthesis pipeline. Stages run strictly in order, each
//! depending on the handle produced by the previous one; the first failure
//! aborts the whole build.

use crate::domain::config::{StackConfig, TagSet};
use crate::domain::stack::validator::StackValidator;
use crate::infrastructure::cloud::network::NetworkRef;
use crate::infrastructure::cloud::provider::CloudProvider;
use crate::infrastructure::constants::{
    TAG_MANAGED_BY, TAG_MANAGED_BY_VALUE, TAG_STACK,
};
use crate::infrastructure::synthesis::graph::ResourceGraph;
use crate::infrastructure::synthesis::resources::{
    AccessPolicyBuilder, ClusterBuilder, ClusterHandle, HelmChartBuilder,
};
use crate::infrastructure::synthesis::template::SynthesizedStack;
use crate::shared::error::StackError;
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStage {
    ResolveNetwork,
    BuildCluster,
    ApplyAccessPolicy,
    InstallAddOns,
    PropagateTags,
}

impl BuildStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildStage::ResolveNetwork => "resolve-network",
            BuildStage::BuildCluster => "build-cluster",
            BuildStage::ApplyAccessPolicy => "apply-access-policy",
            BuildStage::InstallAddOns => "install-add-ons",
            BuildStage::PropagateTags => "propagate-tags",
        }
    }
}

impl std::fmt::Display for BuildStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    Unbuilt,
    Synthesized,
    Failed { stage: BuildStage },
}

/// Build state threaded explicitly through each stage function.
/// Owns the graph and the cluster handle; downstream stages borrow them.
pub struct BuildContext {
    pub config: StackConfig,
    pub account: String,
    pub region: String,
    pub graph: ResourceGraph,
    pub network: Option<NetworkRef>,
    pub cluster: Option<ClusterHandle>,
    pub access_node_ids: Vec<String>,
}

impl BuildContext {
    /// Resolves the target environment up front. No resource exists yet
    /// when this fails with `MissingEnvironment`.
    pub fn new(config: StackConfig) -> Result<Self, StackError> {
        let account = config.resolved_account()?;
        let region = config.resolved_region()?;

        Ok(Self {
            config,
            account,
            region,
            graph: ResourceGraph::new(),
            network: None,
            cluster: None,
            access_node_ids: Vec::new(),
        })
    }
}

/// Stage 1: resolve the pre-existing network by name. Read-only; fatal
/// `NotFound` with no fallback.
pub async fn resolve_network(
    provider: &dyn CloudProvider,
    ctx: &mut BuildContext,
) -> Result<(), StackError> {
    let network = provider.lookup_network(&ctx.config.network).await?;
    info!(network = %network.name, id = %network.id, "network resolved");
    ctx.network = Some(network);
    Ok(())
}

/// Stage 2: construct the cluster on the resolved network, plus its default
/// node group and the declared ingress rule.
pub fn build_cluster(ctx: &mut BuildContext) -> Result<(), StackError> {
    let network = ctx
        .network
        .as_ref()
        .ok_or_else(|| StackError::dependency_order("cluster", "a resolved network"))?;

    let mut handle = ClusterBuilder::new(&ctx.config.cluster, network).build(&mut ctx.graph)?;
    info!(
        cluster = %handle.name,
        subnets = handle.subnets.len(),
        "cluster constructed"
    );

    if let Some(rule) = ctx.config.ingress.clone() {
        handle.allow_ingress(&mut ctx.graph, rule)?;
    }

    ctx.cluster = Some(handle);
    Ok(())
}

/// Stage 3: permission groups, bindings, identity mappings, and raw
/// manifests, in topological order.
pub async fn apply_access_policy(
    provider: &dyn CloudProvider,
    ctx: &mut BuildContext,
) -> Result<(), StackError> {
    let cluster = ctx
        .cluster
        .as_ref()
        .ok_or_else(|| StackError::dependency_order("access policy", "a cluster handle"))?;

    let manifests = load_manifests(&ctx.config.manifest_files)?;

    let applied = AccessPolicyBuilder::new(cluster, &ctx.account)
        .apply(
            provider,
            &ctx.config.permission_groups,
            &ctx.config.access_bindings,
            &ctx.config.identity_mappings,
            &manifests,
            &mut ctx.graph,
        )
        .await?;

    info!(
        groups = ctx.config.permission_groups.len(),
        bindings = ctx.config.access_bindings.len(),
        mapped_roles = applied.mapped_roles.len(),
        "access policy applied"
    );
    ctx.access_node_ids = applied.node_ids;
    Ok(())
}

/// Stage 4: install declared add-ons, strictly after the cluster and the
/// access-policy resources exist.
pub async fn install_add_ons(
    provider: &dyn CloudProvider,
    ctx: &mut BuildContext,
) -> Result<(), StackError> {
    if ctx.config.add_ons.is_empty() {
        return Ok(());
    }

    let cluster = ctx
        .cluster
        .as_ref()
        .ok_or_else(|| StackError::dependency_order("add-on installation", "a cluster handle"))?;

    let builder = HelmChartBuilder::new(cluster, &ctx.access_node_ids);
    for addon in &ctx.config.add_ons {
        if let Some(node_id) = builder.install(provider, addon, &mut ctx.graph).await? {
            info!(release = %addon.release, node = %node_id, "add-on installed");
        }
    }

    Ok(())
}

/// Stage 5: stamp the stack's tag set (plus baseline ownership tags) onto
/// every resource produced within this build.
pub fn propagate_tags(ctx: &mut BuildContext) {
    let mut tags = ctx.config.tags.clone();
    baseline_tags(&ctx.config.stack_id, &mut tags);
    ctx.graph.apply_tags(&tags);
}

fn baseline_tags(stack_id: &str, tags: &mut TagSet) {
    tags.entry(TAG_MANAGED_BY.to_string())
        .or_insert_with(|| TAG_MANAGED_BY_VALUE.to_string());
    tags.entry(TAG_STACK.to_string())
        .or_insert_with(|| stack_id.to_string());
}

fn load_manifests(paths: &[String]) -> Result<Vec<serde_yaml::Value>, StackError> {
    let mut documents = Vec::new();
    for path in paths {
        let content = std::fs::read_to_string(path).map_err(|e| {
            StackError::ConfigError(format!("Failed to read manifest file {}: {}", path, e))
        })?;

        for doc in serde_yaml::Deserializer::from_str(&content) {
            let value = serde_yaml::Value::deserialize(doc)?;
            if !value.is_null() {
                documents.push(value);
            }
        }
    }
    Ok(documents)
}

/// Runs the pipeline: validate, then the five stages, then emit the
/// artifact. Terminal states are Synthesized or Failed(stage).
pub struct StackSynthesizer {
    provider: Box<dyn CloudProvider>,
    state: BuildState,
}

impl StackSynthesizer {
    pub fn new(provider: Box<dyn CloudProvider>) -> Self {
        Self {
            provider,
            state: BuildState::Unbuilt,
        }
    }

    pub fn state(&self) -> BuildState {
        self.state
    }

    pub async fn synthesize(
        &mut self,
        config: StackConfig,
    ) -> Result<SynthesizedStack, StackError> {
        // Fail-fast: environment and configuration are checked before any
        // resource is constructed.
        let mut ctx = BuildContext::new(config)?;
        StackValidator::validate(&ctx.config)?;

        if let Err(err) = self.run_stages(&mut ctx).await {
            if let Some(stage) = err.failed_stage() {
                self.state = BuildState::Failed { stage };
            }
            return Err(err);
        }

        let stack = SynthesizedStack::from_graph(
            ctx.config.stack_id.clone(),
            ctx.account,
            ctx.region,
            &ctx.graph,
        )?;

        self.state = BuildState::Synthesized;
        info!(
            stack = %stack.stack_id,
            resources = stack.resources.len(),
            "stack synthesized"
        );
        Ok(stack)
    }

    async fn run_stages(&self, ctx: &mut BuildContext) -> Result<(), StackError> {
        let provider = self.provider.as_ref();

        resolve_network(provider, ctx)
            .await
            .map_err(|e| StackError::stage(BuildStage::ResolveNetwork, e))?;
        build_cluster(ctx).map_err(|e| StackError::stage(BuildStage::BuildCluster, e))?;
        apply_access_policy(provider, ctx)
            .await
            .map_err(|e| StackError::stage(BuildStage::ApplyAccessPolicy, e))?;
        install_add_ons(provider, ctx)
            .await
            .map_err(|e| StackError::stage(BuildStage::InstallAddOns, e))?;
        propagate_tags(ctx);

        Ok(())
    }
}
