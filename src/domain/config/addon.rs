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

use crate::shared::error::StackError;
use serde::{Deserialize, Serialize};

/// A chart installation request: package name, pinned version, source
/// repository, and release name. The chart contents are never fetched or
/// inspected here. Idempotency key is (cluster, release).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddOnSpec {
    pub chart: String,
    pub version: String,
    pub repository: String,
    pub release: String,
}

impl AddOnSpec {
    pub fn validate(&self) -> Result<(), StackError> {
        if self.chart.is_empty() || self.version.is_empty() || self.release.is_empty() {
            return Err(StackError::ConfigError(
                "add-on chart, version, and release must not be empty".to_string(),
            ));
        }

        if !self.repository.starts_with("https://")
            && !self.repository.starts_with("http://")
            && !self.repository.starts_with("oci://")
        {
            return Err(StackError::ConfigError(format!(
                "add-on '{}' repository must be an http(s) or oci URL: '{}'",
                self.release, self.repository
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_addon_validation() {
        let addon = AddOnSpec {
            chart: "argo-cd".to_string(),
            version: "4.9.8".to_string(),
            repository: "https://argoproj.github.io/argo-helm".to_string(),
            release: "argo-cd".to_string(),
        };
        assert!(addon.validate().is_ok());

        let mut bad = addon.clone();
        bad.repository = "argoproj.github.io".to_string();
        assert!(bad.validate().is_err());

        let mut bad = addon;
        bad.release = String::new();
        assert!(bad.validate().is_err());
    }
}
