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

//! Access-control declarations: permission groups (ClusterRoles), bindings,
//! and IAM identity mappings. The synthesizer sequences their application;
//! manifest semantics beyond that are the cluster's concern.

use crate::infrastructure::constants::{KIND_CLUSTER_ROLE, RBAC_API_GROUP};
use crate::shared::error::StackError;
use k8s_openapi::api::rbac::v1::{ClusterRole, ClusterRoleBinding, PolicyRule, RoleRef, Subject};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::{Deserialize, Serialize};

/// A named set of (resource-type, verb) pairs. Immutable once declared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionGroup {
    pub name: String,
    pub rules: Vec<AccessRule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessRule {
    #[serde(default)]
    pub api_groups: Vec<String>,
    pub resources: Vec<String>,
    pub verbs: Vec<String>,
}

impl PermissionGroup {
    pub fn validate(&self) -> Result<(), StackError> {
        if self.name.is_empty() {
            return Err(StackError::ConfigError(
                "permission group name must not be empty".to_string(),
            ));
        }

        for rule in &self.rules {
            if rule.resources.is_empty() || rule.verbs.is_empty() {
                return Err(StackError::ConfigError(format!(
                    "permission group '{}' has a rule with empty resources or verbs",
                    self.name
                )));
            }
        }

        Ok(())
    }

    /// Render as a ClusterRole manifest
    pub fn to_cluster_role(&self) -> ClusterRole {
        ClusterRole {
            metadata: ObjectMeta {
                name: Some(self.name.clone()),
                ..Default::default()
            },
            rules: Some(
                self.rules
                    .iter()
                    .map(|rule| PolicyRule {
                        api_groups: Some(rule.api_groups.clone()),
                        resources: Some(rule.resources.clone()),
                        verbs: rule.verbs.clone(),
                        ..Default::default()
                    })
                    .collect(),
            ),
            ..Default::default()
        }
    }
}

/// Maps external identities to a declared permission group. The referenced
/// group must exist; the binding is always applied after it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessBinding {
    pub name: String,
    /// Name of the referenced PermissionGroup
    pub group: String,
    pub subjects: Vec<BindingSubject>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BindingSubject {
    /// User, Group, or ServiceAccount
    pub kind: String,
    pub name: String,
}

impl AccessBinding {
    pub fn validate(&self) -> Result<(), StackError> {
        if self.name.is_empty() || self.group.is_empty() {
            return Err(StackError::ConfigError(
                "access binding name and group must not be empty".to_string(),
            ));
        }

        if self.subjects.is_empty() {
            return Err(StackError::ConfigError(format!(
                "access binding '{}' has no subjects",
                self.name
            )));
        }

        Ok(())
    }

    /// Render as a ClusterRoleBinding manifest
    pub fn to_cluster_role_binding(&self) -> ClusterRoleBinding {
        ClusterRoleBinding {
            metadata: ObjectMeta {
                name: Some(self.name.clone()),
                ..Default::default()
            },
            role_ref: RoleRef {
                api_group: RBAC_API_GROUP.to_string(),
                kind: KIND_CLUSTER_ROLE.to_string(),
                name: self.group.clone(),
            },
            subjects: Some(
                self.subjects
                    .iter()
                    .map(|subject| Subject {
                        api_group: Some(RBAC_API_GROUP.to_string()),
                        kind: subject.kind.clone(),
                        name: subject.name.clone(),
                        ..Default::default()
                    })
                    .collect(),
            ),
        }
    }
}

/// Translates an external IAM principal into the username/group pair the
/// cluster's authorization layer recognizes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityMapping {
    /// IAM role name, resolved against the target account at synthesis time
    pub role_name: String,
    pub username: String,
    #[serde(default)]
    pub groups: Vec<String>,
}

impl IdentityMapping {
    pub fn validate(&self) -> Result<(), StackError> {
        if self.role_name.is_empty() || self.username.is_empty() {
            return Err(StackError::ConfigError(
                "identity mapping role_name and username must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_group() -> PermissionGroup {
        PermissionGroup {
            name: "pod-reader".to_string(),
            rules: vec![AccessRule {
                api_groups: vec!["".to_string()],
                resources: vec!["pods".to_string()],
                verbs: vec!["get".to_string(), "list".to_string()],
            }],
        }
    }

    #[test]
    fn test_cluster_role_rendering() {
        let role = sample_group().to_cluster_role();
        assert_eq!(role.metadata.name.as_deref(), Some("pod-reader"));
        let rules = role.rules.unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].resources.as_deref(), Some(&["pods".to_string()][..]));
    }

    #[test]
    fn test_binding_references_group() {
        let binding = AccessBinding {
            name: "pod-reader-binding".to_string(),
            group: "pod-reader".to_string(),
            subjects: vec![BindingSubject {
                kind: "Group".to_string(),
                name: "developers".to_string(),
            }],
        };
        let rendered = binding.to_cluster_role_binding();
        assert_eq!(rendered.role_ref.name, "pod-reader");
        assert_eq!(rendered.role_ref.kind, "ClusterRole");
    }

    #[test]
    fn test_empty_rule_rejected() {
        let mut group = sample_group();
        group.rules[0].verbs.clear();
        assert!(group.validate().is_err());
    }
}
