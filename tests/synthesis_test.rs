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
    use eks_forge::domain::stack::{install_add_ons, BuildContext};
    use eks_forge::infrastructure::cloud::network::{Subnet, SubnetTier};
    use eks_forge::*;

    fn test_network(zones: usize) -> NetworkRef {
        let zone_names = ["eu-west-1a", "eu-west-1b", "eu-west-1c"];
        let mut subnets = Vec::new();
        for zone in zone_names.iter().take(zones) {
            subnets.push(Subnet {
                id: format!("subnet-pub-{}", zone),
                availability_zone: zone.to_string(),
                tier: SubnetTier::Public,
            });
            subnets.push(Subnet {
                id: format!("subnet-priv-{}", zone),
                availability_zone: zone.to_string(),
                tier: SubnetTier::Private,
            });
        }

        NetworkRef {
            id: "vpc-0123".to_string(),
            name: "shared-vpc".to_string(),
            subnets,
        }
    }

    fn test_catalog(zones: usize) -> EnvironmentCatalog {
        EnvironmentCatalog::default()
            .with_network(test_network(zones))
            .with_role("deployer", "arn:aws:iam::111122223333:role/deployer")
            .with_chart(
                "https://argoproj.github.io/argo-helm",
                "argo-cd",
                vec!["4.9.8".to_string()],
            )
    }

    fn argo_addon() -> AddOnSpec {
        AddOnSpec {
            chart: "argo-cd".to_string(),
            version: "4.9.8".to_string(),
            repository: "https://argoproj.github.io/argo-helm".to_string(),
            release: "argo-cd".to_string(),
        }
    }

    fn test_config() -> StackConfig {
        let mut tags = TagSet::new();
        tags.insert("team".to_string(), "platform".to_string());

        StackConfig {
            stack_id: "example".to_string(),
            account: Some("111122223333".to_string()),
            region: Some("eu-west-1".to_string()),
            network: "shared-vpc".to_string(),
            cluster: ClusterSpec {
                name: "test-cluster".to_string(),
                version: KubernetesVersion::V1_21,
                subnet_selection: SubnetSelection::PerAz,
                availability_zones: 3,
                endpoint_access: EndpointAccess::PublicAndPrivate,
                node_group: Some(NodeGroupSpec::default()),
            },
            ingress: None,
            permission_groups: Vec::new(),
            access_bindings: Vec::new(),
            identity_mappings: Vec::new(),
            manifest_files: Vec::new(),
            add_ons: vec![argo_addon()],
            tags,
        }
    }

    #[tokio::test]
    async fn test_end_to_end_synthesis() {
        let mut synthesizer = StackSynthesizer::new(Box::new(test_catalog(3)));
        let stack = synthesizer.synthesize(test_config()).await.unwrap();

        assert_eq!(synthesizer.state(), BuildState::Synthesized);
        assert_eq!(stack.account, "111122223333");
        assert_eq!(stack.region, "eu-west-1");

        let cluster = stack.resource("cluster/test-cluster").unwrap();
        assert_eq!(cluster.kind, ResourceKind::Cluster);
        assert_eq!(
            cluster.properties["subnets"].as_array().unwrap().len(),
            3
        );
        assert_eq!(cluster.properties["version"], "1.21");

        // apply order: cluster before node group, identity map, and release
        let pos = |id: &str| {
            stack
                .resources
                .iter()
                .position(|r| r.id == id)
                .unwrap_or_else(|| panic!("missing resource {}", id))
        };
        assert!(pos("cluster/test-cluster") < pos("nodegroup/test-cluster-default"));
        assert!(pos("cluster/test-cluster") < pos("auth/identity-map"));
        assert!(pos("auth/identity-map") < pos("helm/test-cluster/argo-cd"));
    }

    #[tokio::test]
    async fn test_insufficient_subnets() {
        let mut synthesizer = StackSynthesizer::new(Box::new(test_catalog(2)));
        let err = synthesizer.synthesize(test_config()).await.unwrap_err();

        assert_eq!(err.failed_stage(), Some(BuildStage::BuildCluster));
        match err {
            StackError::StageFailed { source, .. } => assert!(matches!(
                *source,
                StackError::InsufficientSubnets {
                    requested: 3,
                    available: 2
                }
            )),
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(
            synthesizer.state(),
            BuildState::Failed {
                stage: BuildStage::BuildCluster
            }
        );
    }

    #[tokio::test]
    async fn test_network_not_found() {
        let catalog = EnvironmentCatalog::default();
        let mut synthesizer = StackSynthesizer::new(Box::new(catalog));
        let err = synthesizer.synthesize(test_config()).await.unwrap_err();

        assert_eq!(err.failed_stage(), Some(BuildStage::ResolveNetwork));
    }

    #[tokio::test]
    async fn test_missing_environment_fails_before_any_resource() {
        std::env::remove_var("EKS_FORGE_ACCOUNT");
        std::env::remove_var("EKS_FORGE_REGION");

        let mut config = test_config();
        config.account = None;
        config.region = None;

        let mut synthesizer = StackSynthesizer::new(Box::new(test_catalog(3)));
        let err = synthesizer.synthesize(config).await.unwrap_err();

        assert!(matches!(err, StackError::MissingEnvironment(_)));
        // nothing was built
        assert_eq!(synthesizer.state(), BuildState::Unbuilt);
    }

    #[tokio::test]
    async fn test_addon_before_cluster_is_dependency_order_error() {
        let mut ctx = BuildContext::new(test_config()).unwrap();
        let catalog = test_catalog(3);

        let err = install_add_ons(&catalog, &mut ctx).await.unwrap_err();
        assert!(matches!(err, StackError::DependencyOrder { .. }));
    }

    #[tokio::test]
    async fn test_chart_not_found() {
        let mut config = test_config();
        config.add_ons[0].version = "0.0.1".to_string();

        let mut synthesizer = StackSynthesizer::new(Box::new(test_catalog(3)));
        let err = synthesizer.synthesize(config).await.unwrap_err();

        assert_eq!(err.failed_stage(), Some(BuildStage::InstallAddOns));
        match err {
            StackError::StageFailed { source, .. } => {
                assert!(matches!(*source, StackError::ChartNotFound { .. }))
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_ingress_rule_recorded_once() {
        let mut config = test_config();
        config.ingress = Some(IngressRule {
            source_security_group: "sg-bastion".to_string(),
            port: 443,
            protocol: "tcp".to_string(),
        });

        let mut synthesizer = StackSynthesizer::new(Box::new(test_catalog(3)));
        let stack = synthesizer.synthesize(config).await.unwrap();

        let cluster = stack.resource("cluster/test-cluster").unwrap();
        let rules = cluster.properties["ingress_rules"].as_array().unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0]["source_security_group"], "sg-bastion");
        assert_eq!(rules[0]["port"], 443);
    }

    #[tokio::test]
    async fn test_tags_propagated_to_every_resource() {
        let mut synthesizer = StackSynthesizer::new(Box::new(test_catalog(3)));
        let stack = synthesizer.synthesize(test_config()).await.unwrap();

        assert!(!stack.resources.is_empty());
        for resource in &stack.resources {
            assert_eq!(
                resource.tags.get("team").map(String::as_str),
                Some("platform"),
                "resource {} missing team tag",
                resource.id
            );
            assert_eq!(
                resource.tags.get("managed-by").map(String::as_str),
                Some("eks-forge"),
                "resource {} missing managed-by tag",
                resource.id
            );
            assert_eq!(
                resource.tags.get("stack").map(String::as_str),
                Some("example")
            );
        }
    }

    #[tokio::test]
    async fn test_duplicate_release_collapses_to_one_installation() {
        let mut config = test_config();
        config.add_ons.push(argo_addon());

        let mut synthesizer = StackSynthesizer::new(Box::new(test_catalog(3)));
        let stack = synthesizer.synthesize(config).await.unwrap();

        let releases = stack
            .resources
            .iter()
            .filter(|r| r.kind == ResourceKind::HelmRelease)
            .count();
        assert_eq!(releases, 1);
    }

    #[tokio::test]
    async fn test_unsupported_version_rejected_at_boundary() {
        assert!("1.99".parse::<KubernetesVersion>().is_err());
        assert!("1.27".parse::<KubernetesVersion>().is_ok());
    }
}
