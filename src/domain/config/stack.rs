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

use crate::domain::config::access::{AccessBinding, IdentityMapping, PermissionGroup};
use crate::domain::config::addon::AddOnSpec;
use crate::domain::config::cluster::{is_valid_cluster_name, ClusterSpec};
use crate::infrastructure::constants::{DEFAULT_INGRESS_PROTOCOL, ENV_ACCOUNT, ENV_REGION};
use crate::shared::error::StackError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::read_to_string;

/// Ownership labels applied to every resource the stack produces.
/// Keys are unique by construction.
pub type TagSet = BTreeMap<String, String>;

/// Inbound rule attached to the cluster's security boundary after creation:
/// allow a named external security group on a fixed port. Re-applying an
/// identical rule is a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngressRule {
    pub source_security_group: String,
    pub port: u16,
    #[serde(default = "default_protocol")]
    pub protocol: String,
}

fn default_protocol() -> String {
    DEFAULT_INGRESS_PROTOCOL.to_string()
}

impl IngressRule {
    pub fn validate(&self) -> Result<(), StackError> {
        if self.source_security_group.is_empty() {
            return Err(StackError::ConfigError(
                "ingress.source_security_group must not be empty".to_string(),
            ));
        }
        if self.port == 0 {
            return Err(StackError::ConfigError(
                "ingress.port must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// The whole declarative input to one synthesis run. Loaded from a TOML file,
/// overridable from CLI flags; account and region fall back to the process
/// environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackConfig {
    /// Stack identifier (also used in baseline tags)
    pub stack_id: String,
    /// Target account; `EKS_FORGE_ACCOUNT` when absent
    #[serde(default)]
    pub account: Option<String>,
    /// Target region; `EKS_FORGE_REGION` when absent
    #[serde(default)]
    pub region: Option<String>,
    /// Name of the pre-existing network to attach to
    pub network: String,
    pub cluster: ClusterSpec,
    #[serde(default)]
    pub ingress: Option<IngressRule>,
    #[serde(default)]
    pub permission_groups: Vec<PermissionGroup>,
    #[serde(default)]
    pub access_bindings: Vec<AccessBinding>,
    #[serde(default)]
    pub identity_mappings: Vec<IdentityMapping>,
    /// YAML files whose documents are passed through to the cluster verbatim
    #[serde(default)]
    pub manifest_files: Vec<String>,
    #[serde(default)]
    pub add_ons: Vec<AddOnSpec>,
    #[serde(default)]
    pub tags: TagSet,
}

impl StackConfig {
    /// Load configuration from a TOML file
    pub fn from_file<T: AsRef<str>>(path: T) -> Result<Self, StackError> {
        let content = read_to_string(path.as_ref()).map_err(|e| {
            StackError::ConfigError(format!(
                "Failed to read stack config {}: {}",
                path.as_ref(),
                e
            ))
        })?;

        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Target account, from the config or the process environment.
    /// Absence is `MissingEnvironment`, raised before any resource exists.
    pub fn resolved_account(&self) -> Result<String, StackError> {
        match &self.account {
            Some(account) if !account.is_empty() => Ok(account.clone()),
            _ => std::env::var(ENV_ACCOUNT)
                .map_err(|_| StackError::missing_environment(ENV_ACCOUNT)),
        }
    }

    /// Target region, from the config or the process environment
    pub fn resolved_region(&self) -> Result<String, StackError> {
        match &self.region {
            Some(region) if !region.is_empty() => Ok(region.clone()),
            _ => std::env::var(ENV_REGION).map_err(|_| StackError::missing_environment(ENV_REGION)),
        }
    }

    /// Field-level validation. Cross-entity checks (binding references,
    /// duplicate names) live in `StackValidator`.
    pub fn validate(&self) -> Result<(), StackError> {
        if !is_valid_cluster_name(&self.stack_id) {
            return Err(StackError::ConfigError(format!(
                "Invalid stack_id: '{}'",
                self.stack_id
            )));
        }

        if self.network.is_empty() {
            return Err(StackError::ConfigError(
                "network must not be empty".to_string(),
            ));
        }

        self.cluster.validate()?;

        if let Some(ingress) = &self.ingress {
            ingress.validate()?;
        }

        for group in &self.permission_groups {
            group.validate()?;
        }
        for binding in &self.access_bindings {
            binding.validate()?;
        }
        for mapping in &self.identity_mappings {
            mapping.validate()?;
        }
        for addon in &self.add_ons {
            addon.validate()?;
        }

        if self.tags.keys().any(|key| key.is_empty()) {
            return Err(StackError::ConfigError(
                "tag keys must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
