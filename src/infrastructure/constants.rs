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

/// Environment parameters (target account and region)
pub const ENV_ACCOUNT: &str = "EKS_FORGE_ACCOUNT";
pub const ENV_REGION: &str = "EKS_FORGE_REGION";

/// Cluster defaults
pub const DEFAULT_NODE_GROUP_SIZE: u32 = 1;
pub const DEFAULT_INSTANCE_TYPE: &str = "t4g.small";
pub const DEFAULT_AVAILABILITY_ZONES: u32 = 2;

/// Cluster name limit imposed by EKS
pub const MAX_CLUSTER_NAME_LEN: usize = 100;

/// Ingress defaults
pub const DEFAULT_INGRESS_PROTOCOL: &str = "tcp";

/// Resource node id prefixes
pub const NODE_PREFIX_CLUSTER: &str = "cluster";
pub const NODE_PREFIX_NODE_GROUP: &str = "nodegroup";
pub const NODE_PREFIX_CLUSTER_ROLE: &str = "rbac/clusterrole";
pub const NODE_PREFIX_CLUSTER_ROLE_BINDING: &str = "rbac/clusterrolebinding";
pub const NODE_PREFIX_MANIFEST: &str = "manifest";
pub const NODE_PREFIX_HELM: &str = "helm";

/// Identity map node id (one per stack)
pub const NODE_ID_IDENTITY_MAP: &str = "auth/identity-map";

/// Baseline tags stamped on every resource
pub const TAG_MANAGED_BY: &str = "managed-by";
pub const TAG_MANAGED_BY_VALUE: &str = "eks-forge";
pub const TAG_STACK: &str = "stack";

/// RBAC manifest constants
pub const RBAC_API_GROUP: &str = "rbac.authorization.k8s.io";
pub const KIND_CLUSTER_ROLE: &str = "ClusterRole";
pub const KIND_CLUSTER_ROLE_BINDING: &str = "ClusterRoleBinding";
