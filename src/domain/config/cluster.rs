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

use crate::infrastructure::constants::{
    DEFAULT_INSTANCE_TYPE, DEFAULT_NODE_GROUP_SIZE, MAX_CLUSTER_NAME_LEN,
};
use crate::shared::error::StackError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Desired configuration of a managed cluster. Immutable once validated;
/// the synthesizer reads it but never writes it back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterSpec {
    /// Cluster name, unique within the target account/region pair
    pub name: String,
    /// Control-plane version (finite supported set)
    pub version: KubernetesVersion,
    #[serde(default)]
    pub subnet_selection: SubnetSelection,
    /// Number of availability zones the cluster must span
    #[serde(default = "default_availability_zones")]
    pub availability_zones: u32,
    #[serde(default)]
    pub endpoint_access: EndpointAccess,
    /// Default node group; None provisions a control plane with no capacity
    #[serde(default)]
    pub node_group: Option<NodeGroupSpec>,
}

fn default_availability_zones() -> u32 {
    crate::infrastructure::constants::DEFAULT_AVAILABILITY_ZONES
}

impl ClusterSpec {
    pub fn validate(&self) -> Result<(), StackError> {
        if !is_valid_cluster_name(&self.name) {
            return Err(StackError::ConfigError(format!(
                "Invalid cluster name: '{}' (lowercase alphanumeric and '-', must start and end alphanumeric)",
                self.name
            )));
        }

        if self.name.len() > MAX_CLUSTER_NAME_LEN {
            return Err(StackError::ConfigError(format!(
                "Cluster name too long (max {} chars): {}",
                MAX_CLUSTER_NAME_LEN, self.name
            )));
        }

        if self.availability_zones == 0 {
            return Err(StackError::ConfigError(
                "cluster.availability_zones must be > 0".to_string(),
            ));
        }

        if let Some(node_group) = &self.node_group {
            node_group.validate()?;
        }

        Ok(())
    }
}

/// Supported control-plane versions. Anything outside this set is rejected
/// at the configuration boundary, not at synthesis time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KubernetesVersion {
    #[serde(rename = "1.21")]
    V1_21,
    #[serde(rename = "1.22")]
    V1_22,
    #[serde(rename = "1.23")]
    V1_23,
    #[serde(rename = "1.24")]
    V1_24,
    #[serde(rename = "1.25")]
    V1_25,
    #[serde(rename = "1.26")]
    V1_26,
    #[serde(rename = "1.27")]
    V1_27,
}

impl KubernetesVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            KubernetesVersion::V1_21 => "1.21",
            KubernetesVersion::V1_22 => "1.22",
            KubernetesVersion::V1_23 => "1.23",
            KubernetesVersion::V1_24 => "1.24",
            KubernetesVersion::V1_25 => "1.25",
            KubernetesVersion::V1_26 => "1.26",
            KubernetesVersion::V1_27 => "1.27",
        }
    }

    pub const SUPPORTED: &'static [KubernetesVersion] = &[
        KubernetesVersion::V1_21,
        KubernetesVersion::V1_22,
        KubernetesVersion::V1_23,
        KubernetesVersion::V1_24,
        KubernetesVersion::V1_25,
        KubernetesVersion::V1_26,
        KubernetesVersion::V1_27,
    ];
}

impl std::str::FromStr for KubernetesVersion {
    type Err = StackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        for version in Self::SUPPORTED {
            if version.as_str() == s {
                return Ok(*version);
            }
        }
        Err(StackError::ConfigError(format!(
            "Unsupported Kubernetes version: '{}' (supported: {})",
            s,
            Self::SUPPORTED
                .iter()
                .map(|v| v.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )))
    }
}

impl std::fmt::Display for KubernetesVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which subnets of the attached network the cluster places itself into.
/// One subnet per availability zone is always selected; the policy controls
/// eligibility by tier (PerAz accepts any tier).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubnetSelection {
    #[default]
    Public,
    Private,
    PerAz,
}

impl SubnetSelection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubnetSelection::Public => "public",
            SubnetSelection::Private => "private",
            SubnetSelection::PerAz => "per-az",
        }
    }
}

impl std::str::FromStr for SubnetSelection {
    type Err = StackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(SubnetSelection::Public),
            "private" => Ok(SubnetSelection::Private),
            "per-az" => Ok(SubnetSelection::PerAz),
            _ => Err(StackError::ConfigError(format!(
                "Invalid subnet selection: '{}' (public, private, per-az)",
                s
            ))),
        }
    }
}

/// Control-plane endpoint reachability
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EndpointAccess {
    Public,
    Private,
    #[default]
    PublicAndPrivate,
}

impl EndpointAccess {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointAccess::Public => "public",
            EndpointAccess::Private => "private",
            EndpointAccess::PublicAndPrivate => "public-and-private",
        }
    }
}

impl std::str::FromStr for EndpointAccess {
    type Err = StackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(EndpointAccess::Public),
            "private" => Ok(EndpointAccess::Private),
            "public-and-private" => Ok(EndpointAccess::PublicAndPrivate),
            _ => Err(StackError::ConfigError(format!(
                "Invalid endpoint access mode: '{}' (public, private, public-and-private)",
                s
            ))),
        }
    }
}

/// Default node group attached to the cluster at creation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeGroupSpec {
    pub size: u32,
    pub instance_type: String,
}

impl Default for NodeGroupSpec {
    fn default() -> Self {
        Self {
            size: DEFAULT_NODE_GROUP_SIZE,
            instance_type: DEFAULT_INSTANCE_TYPE.to_string(),
        }
    }
}

impl NodeGroupSpec {
    pub fn validate(&self) -> Result<(), StackError> {
        if self.size == 0 {
            return Err(StackError::ConfigError(
                "node_group.size must be > 0".to_string(),
            ));
        }

        if !instance_type_pattern().is_match(&self.instance_type) {
            return Err(StackError::ConfigError(format!(
                "Invalid instance type: '{}' (expected family.size, e.g. t4g.small)",
                self.instance_type
            )));
        }

        Ok(())
    }
}

fn instance_type_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[a-z][a-z0-9-]*\.[a-z0-9]+$").expect("instance type pattern is valid")
    })
}

pub(crate) fn is_valid_cluster_name(name: &str) -> bool {
    if name.is_empty() {
        return false;
    }

    if !name.chars().next().unwrap_or(' ').is_alphanumeric() {
        return false;
    }
    if !name.chars().last().unwrap_or(' ').is_alphanumeric() {
        return false;
    }

    name.chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
