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

use crate::infrastructure::cloud::network::NetworkRef;
use crate::shared::error::StackError;
use serde::{Deserialize, Serialize};

/// Read-only lookups against the target environment. Synthesis never calls
/// the cloud; implementations answer from a catalog of known resources.
#[async_trait::async_trait]
pub trait CloudProvider: Send + Sync {
    /// Resolve a pre-existing network by name. `NotFound` if absent.
    async fn lookup_network(&self, name: &str) -> Result<NetworkRef, StackError>;

    /// Resolve an IAM role by name in the target account.
    /// `UnknownRole` if absent.
    async fn lookup_role(&self, name: &str) -> Result<ResolvedRole, StackError>;

    /// Check that (repository, chart, version) resolves.
    /// `ChartNotFound` if it does not.
    async fn resolve_chart(
        &self,
        repository: &str,
        chart: &str,
        version: &str,
    ) -> Result<ChartRef, StackError>;
}

/// An IAM role resolved in the target account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedRole {
    pub name: String,
    pub arn: String,
}

/// A resolved chart coordinate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartRef {
    pub repository: String,
    pub chart: String,
    pub version: String,
}
