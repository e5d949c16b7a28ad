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

use crate::domain::config::StackConfig;
use crate::shared::error::StackError;
use std::collections::HashSet;

/// Pre-flight checks run before the first stage. When this fails, no
/// resource has been constructed.
pub struct StackValidator;

impl StackValidator {
    pub fn validate(config: &StackConfig) -> Result<(), StackError> {
        config.validate()?;
        Self::validate_access(config)?;
        Ok(())
    }

    fn validate_access(config: &StackConfig) -> Result<(), StackError> {
        let mut declared: HashSet<&str> = HashSet::new();
        for group in &config.permission_groups {
            if !declared.insert(group.name.as_str()) {
                return Err(StackError::validation_error(format!(
                    "Duplicate permission group: '{}'",
                    group.name
                )));
            }
        }

        let mut binding_names: HashSet<&str> = HashSet::new();
        for binding in &config.access_bindings {
            if !binding_names.insert(binding.name.as_str()) {
                return Err(StackError::validation_error(format!(
                    "Duplicate access binding: '{}'",
                    binding.name
                )));
            }

            if !declared.contains(binding.group.as_str()) {
                return Err(StackError::validation_error(format!(
                    "\n Access binding references an undeclared permission group\n\
                    \n  Binding: '{}'\n\
                    Group: '{}'\n\
                    \n Declared groups:\n{}\n\
                    \n Declare the group in [[permission_groups]] before binding to it.",
                    binding.name,
                    binding.group,
                    if declared.is_empty() {
                        "  (none declared)".to_string()
                    } else {
                        declared
                            .iter()
                            .map(|g| format!("  - {}", g))
                            .collect::<Vec<_>>()
                            .join("\n")
                    }
                )));
            }
        }

        Ok(())
    }
}
