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

use crate::domain::config::SubnetSelection;
use crate::shared::error::StackError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A pre-existing virtual network, resolved once at build time by name.
/// Never mutated by the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkRef {
    pub id: String,
    pub name: String,
    pub subnets: Vec<Subnet>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subnet {
    pub id: String,
    pub availability_zone: String,
    pub tier: SubnetTier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubnetTier {
    Public,
    Private,
}

impl SubnetTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubnetTier::Public => "public",
            SubnetTier::Private => "private",
        }
    }
}

impl NetworkRef {
    /// Select one subnet per availability zone, up to the requested zone
    /// count. Eligibility follows the selection policy; fewer eligible zones
    /// than requested is `InsufficientSubnets`. Selection is deterministic:
    /// zones in lexical order, first subnet (by id) within each zone.
    pub fn select_subnets(
        &self,
        selection: SubnetSelection,
        zones: u32,
    ) -> Result<Vec<Subnet>, StackError> {
        let mut by_zone: BTreeMap<&str, &Subnet> = BTreeMap::new();
        for subnet in self.subnets.iter().filter(|s| eligible(s, selection)) {
            let entry = by_zone
                .entry(subnet.availability_zone.as_str())
                .or_insert(subnet);
            if subnet.id < entry.id {
                *entry = subnet;
            }
        }

        if (by_zone.len() as u32) < zones {
            return Err(StackError::InsufficientSubnets {
                requested: zones,
                available: by_zone.len() as u32,
            });
        }

        Ok(by_zone
            .values()
            .take(zones as usize)
            .map(|subnet| (*subnet).clone())
            .collect())
    }
}

fn eligible(subnet: &Subnet, selection: SubnetSelection) -> bool {
    match selection {
        SubnetSelection::Public => subnet.tier == SubnetTier::Public,
        SubnetSelection::Private => subnet.tier == SubnetTier::Private,
        SubnetSelection::PerAz => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn network(subnets: Vec<(&str, &str, SubnetTier)>) -> NetworkRef {
        NetworkRef {
            id: "vpc-0123".to_string(),
            name: "shared-vpc".to_string(),
            subnets: subnets
                .into_iter()
                .map(|(id, zone, tier)| Subnet {
                    id: id.to_string(),
                    availability_zone: zone.to_string(),
                    tier,
                })
                .collect(),
        }
    }

    #[test]
    fn test_one_subnet_per_zone() {
        let network = network(vec![
            ("subnet-a1", "eu-west-1a", SubnetTier::Public),
            ("subnet-a2", "eu-west-1a", SubnetTier::Public),
            ("subnet-b1", "eu-west-1b", SubnetTier::Public),
            ("subnet-c1", "eu-west-1c", SubnetTier::Public),
        ]);

        let selected = network.select_subnets(SubnetSelection::Public, 3).unwrap();
        assert_eq!(selected.len(), 3);

        let zones: Vec<_> = selected.iter().map(|s| s.availability_zone.as_str()).collect();
        assert_eq!(zones, vec!["eu-west-1a", "eu-west-1b", "eu-west-1c"]);
        // lowest id wins within a zone
        assert_eq!(selected[0].id, "subnet-a1");
    }

    #[test]
    fn test_insufficient_zones() {
        let network = network(vec![
            ("subnet-a1", "eu-west-1a", SubnetTier::Public),
            ("subnet-b1", "eu-west-1b", SubnetTier::Private),
        ]);

        let err = network
            .select_subnets(SubnetSelection::Public, 2)
            .unwrap_err();
        assert!(matches!(
            err,
            StackError::InsufficientSubnets {
                requested: 2,
                available: 1
            }
        ));
    }

    #[test]
    fn test_per_az_ignores_tier() {
        let network = network(vec![
            ("subnet-a1", "eu-west-1a", SubnetTier::Public),
            ("subnet-b1", "eu-west-1b", SubnetTier::Private),
        ]);

        let selected = network.select_subnets(SubnetSelection::PerAz, 2).unwrap();
        assert_eq!(selected.len(), 2);
    }
}
