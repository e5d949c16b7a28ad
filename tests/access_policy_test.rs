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

#[cfg(test)]
mod tests {
    use eks_forge::domain::config::{AccessRule, BindingSubject};
    use eks_forge::infrastructure::cloud::network::{Subnet, SubnetTier};
    use eks_forge::*;
    use std::io::Write;

    fn test_catalog() -> EnvironmentCatalog {
        EnvironmentCatalog::default()
            .with_network(NetworkRef {
                id: "vpc-0123".to_string(),
                name: "shared-vpc".to_string(),
                subnets: vec![
                    Subnet {
                        id: "subnet-a1".to_string(),
                        availability_zone: "eu-west-1a".to_string(),
                        tier: SubnetTier::Public,
                    },
                    Subnet {
                        id: "subnet-b1".to_string(),
                        availability_zone: "eu-west-1b".to_string(),
                        tier: SubnetTier::Public,
                    },
                ],
            })
            .with_role("deployer", "arn:aws:iam::111122223333:role/deployer")
    }

    fn pod_reader() -> PermissionGroup {
        PermissionGroup {
            name: "pod-reader".to_string(),
            rules: vec![AccessRule {
                api_groups: vec!["".to_string()],
                resources: vec!["pods".to_string()],
                verbs: vec!["get".to_string(), "list".to_string()],
            }],
        }
    }

    fn pod_reader_binding() -> AccessBinding {
        AccessBinding {
            name: "pod-reader-binding".to_string(),
            group: "pod-reader".to_string(),
            subjects: vec![BindingSubject {
                kind: "Group".to_string(),
                name: "developers".to_string(),
            }],
        }
    }

    fn test_config() -> StackConfig {
        StackConfig {
            stack_id: "example".to_string(),
            account: Some("111122223333".to_string()),
            region: Some("eu-west-1".to_string()),
            network: "shared-vpc".to_string(),
            cluster: ClusterSpec {
                name: "test-cluster".to_string(),
                version: KubernetesVersion::V1_21,
                subnet_selection: SubnetSelection::Public,
                availability_zones: 2,
                endpoint_access: EndpointAccess::PublicAndPrivate,
                node_group: None,
            },
            ingress: None,
            permission_groups: Vec::new(),
            access_bindings: Vec::new(),
            identity_mappings: Vec::new(),
            manifest_files: Vec::new(),
            add_ons: Vec::new(),
            tags: TagSet::new(),
        }
    }

    #[tokio::test]
    async fn test_groups_applied_before_bindings() {
        let mut config = test_config();
        // bindings declared first on purpose; apply order must still put
        // the group ahead of the binding
        config.access_bindings = vec![pod_reader_binding()];
        config.permission_groups = vec![pod_reader()];

        let mut synthesizer = StackSynthesizer::new(Box::new(test_catalog()));
        let stack = synthesizer.synthesize(config).await.unwrap();

        let pos = |id: &str| {
            stack
                .resources
                .iter()
                .position(|r| r.id == id)
                .unwrap_or_else(|| panic!("missing resource {}", id))
        };
        assert!(
            pos("rbac/clusterrole/pod-reader") < pos("rbac/clusterrolebinding/pod-reader-binding")
        );
    }

    #[tokio::test]
    async fn test_build_account_always_trusted() {
        // no explicit identity mappings at all
        let mut synthesizer = StackSynthesizer::new(Box::new(test_catalog()));
        let stack = synthesizer.synthesize(test_config()).await.unwrap();

        let identity_map = stack.resource("auth/identity-map").unwrap();
        let accounts = identity_map.properties["accounts"].as_array().unwrap();
        assert!(accounts.iter().any(|a| a == "111122223333"));
    }

    #[tokio::test]
    async fn test_unknown_role_fails_access_stage() {
        let mut config = test_config();
        config.identity_mappings = vec![IdentityMapping {
            role_name: "nonexistent".to_string(),
            username: "ops".to_string(),
            groups: vec!["system:masters".to_string()],
        }];

        let mut synthesizer = StackSynthesizer::new(Box::new(test_catalog()));
        let err = synthesizer.synthesize(config).await.unwrap_err();

        assert_eq!(err.failed_stage(), Some(BuildStage::ApplyAccessPolicy));
        match err {
            StackError::StageFailed { source, .. } => {
                assert!(matches!(*source, StackError::UnknownRole(_)))
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_identity_mapping_resolved_to_arn() {
        let mut config = test_config();
        config.identity_mappings = vec![IdentityMapping {
            role_name: "deployer".to_string(),
            username: "deployer".to_string(),
            groups: vec!["system:masters".to_string()],
        }];

        let mut synthesizer = StackSynthesizer::new(Box::new(test_catalog()));
        let stack = synthesizer.synthesize(config).await.unwrap();

        let identity_map = stack.resource("auth/identity-map").unwrap();
        let roles = identity_map.properties["roles"].as_array().unwrap();
        assert_eq!(roles.len(), 1);
        assert_eq!(roles[0]["arn"], "arn:aws:iam::111122223333:role/deployer");
        assert_eq!(roles[0]["username"], "deployer");
    }

    #[tokio::test]
    async fn test_undeclared_group_rejected_before_any_resource() {
        let mut config = test_config();
        config.access_bindings = vec![pod_reader_binding()];

        let mut synthesizer = StackSynthesizer::new(Box::new(test_catalog()));
        let err = synthesizer.synthesize(config).await.unwrap_err();

        assert!(matches!(err, StackError::ValidationError(_)));
        assert_eq!(synthesizer.state(), BuildState::Unbuilt);
    }

    #[tokio::test]
    async fn test_manifests_passed_through_verbatim() {
        let content = r#"apiVersion: v1
kind: Namespace
metadata:
  name: argocd
---
apiVersion: v1
kind: ConfigMap
metadata:
  name: argocd-cm
data:
  url: https://argocd.example.com
"#;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();

        let mut config = test_config();
        config.manifest_files = vec![file.path().to_string_lossy().to_string()];

        let mut synthesizer = StackSynthesizer::new(Box::new(test_catalog()));
        let stack = synthesizer.synthesize(config).await.unwrap();

        let namespace = stack.resource("manifest/namespace-argocd").unwrap();
        assert_eq!(namespace.kind, ResourceKind::Manifest);
        assert_eq!(namespace.properties["apiVersion"], "v1");
        assert_eq!(namespace.properties["metadata"]["name"], "argocd");

        let configmap = stack.resource("manifest/configmap-argocd-cm").unwrap();
        assert_eq!(
            configmap.properties["data"]["url"],
            "https://argocd.example.com"
        );
    }

    #[tokio::test]
    async fn test_permission_group_rendered_as_cluster_role() {
        let mut config = test_config();
        config.permission_groups = vec![pod_reader()];

        let mut synthesizer = StackSynthesizer::new(Box::new(test_catalog()));
        let stack = synthesizer.synthesize(config).await.unwrap();

        let role = stack.resource("rbac/clusterrole/pod-reader").unwrap();
        assert_eq!(role.properties["metadata"]["name"], "pod-reader");
        let rules = role.properties["rules"].as_array().unwrap();
        assert_eq!(rules[0]["resources"][0], "pods");
        assert_eq!(rules[0]["verbs"][1], "list");
    }
}
