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

// Core modules
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod shared;

// Re-export commonly used types
pub use domain::config::{
    AccessBinding, AddOnSpec, ClusterSpec, EndpointAccess, IdentityMapping, IngressRule,
    KubernetesVersion, NodeGroupSpec, PermissionGroup, StackConfig, SubnetSelection, TagSet,
};
pub use domain::stack::{BuildContext, BuildStage, BuildState, StackSynthesizer, StackValidator};
pub use infrastructure::cloud::{CloudProvider, EnvironmentCatalog, NetworkRef, Subnet, SubnetTier};
pub use infrastructure::synthesis::{OutputFormat, ResourceKind, SynthesizedStack};
pub use shared::{Result, StackError};

// Re-export builders for internal use
#[doc(hidden)]
pub use infrastructure::synthesis::resources::{
    AccessPolicyBuilder, ClusterBuilder, ClusterHandle, HelmChartBuilder,
};
