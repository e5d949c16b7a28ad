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

//! TOML-backed description of the target environment: the networks, IAM
//! roles, and chart repositories that lookups may resolve against. The
//! deterministic stand-in for live cloud queries.

use crate::infrastructure::cloud::network::NetworkRef;
use crate::infrastructure::cloud::provider::{ChartRef, CloudProvider, ResolvedRole};
use crate::shared::error::StackError;
use serde::{Deserialize, Serialize};
use std::fs::read_to_string;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentCatalog {
    pub networks: Vec<NetworkRef>,
    pub roles: Vec<CatalogRole>,
    pub charts: Vec<CatalogChart>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogRole {
    pub name: String,
    pub arn: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogChart {
    pub repository: String,
    pub chart: String,
    pub versions: Vec<String>,
}

impl EnvironmentCatalog {
    /// Load a catalog from a TOML file
    pub fn from_file<T: AsRef<str>>(path: T) -> Result<Self, StackError> {
        let content = read_to_string(path.as_ref()).map_err(|e| {
            StackError::ConfigError(format!(
                "Failed to read environment catalog {}: {}",
                path.as_ref(),
                e
            ))
        })?;

        let catalog: Self = toml::from_str(&content)?;
        Ok(catalog)
    }

    pub fn with_network(mut self, network: NetworkRef) -> Self {
        self.networks.push(network);
        self
    }

    pub fn with_role(mut self, name: impl Into<String>, arn: impl Into<String>) -> Self {
        self.roles.push(CatalogRole {
            name: name.into(),
            arn: arn.into(),
        });
        self
    }

    pub fn with_chart(
        mut self,
        repository: impl Into<String>,
        chart: impl Into<String>,
        versions: Vec<String>,
    ) -> Self {
        self.charts.push(CatalogChart {
            repository: repository.into(),
            chart: chart.into(),
            versions,
        });
        self
    }
}

#[async_trait::async_trait]
impl CloudProvider for EnvironmentCatalog {
    async fn lookup_network(&self, name: &str) -> Result<NetworkRef, StackError> {
        self.networks
            .iter()
            .find(|network| network.name == name)
            .cloned()
            .ok_or_else(|| StackError::not_found("network", name))
    }

    async fn lookup_role(&self, name: &str) -> Result<ResolvedRole, StackError> {
        self.roles
            .iter()
            .find(|role| role.name == name)
            .map(|role| ResolvedRole {
                name: role.name.clone(),
                arn: role.arn.clone(),
            })
            .ok_or_else(|| StackError::UnknownRole(name.to_string()))
    }

    async fn resolve_chart(
        &self,
        repository: &str,
        chart: &str,
        version: &str,
    ) -> Result<ChartRef, StackError> {
        self.charts
            .iter()
            .find(|entry| {
                entry.repository == repository
                    && entry.chart == chart
                    && entry.versions.iter().any(|v| v == version)
            })
            .map(|entry| ChartRef {
                repository: entry.repository.clone(),
                chart: entry.chart.clone(),
                version: version.to_string(),
            })
            .ok_or_else(|| StackError::chart_not_found(repository, chart, version))
    }
}
