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

use crate::infrastructure::synthesis::graph::{ResourceGraph, ResourceNode};
use crate::shared::error::StackError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The synthesized deployment artifact: every resource of the stack in
/// apply order, handed off to an external deployment collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesizedStack {
    pub stack_id: String,
    pub account: String,
    pub region: String,
    pub synthesized_at: DateTime<Utc>,
    pub resources: Vec<ResourceNode>,
}

impl SynthesizedStack {
    pub fn from_graph(
        stack_id: String,
        account: String,
        region: String,
        graph: &ResourceGraph,
    ) -> Result<Self, StackError> {
        let resources = graph.ordered()?.into_iter().cloned().collect();

        Ok(Self {
            stack_id,
            account,
            region,
            synthesized_at: Utc::now(),
            resources,
        })
    }

    pub fn resource(&self, id: &str) -> Option<&ResourceNode> {
        self.resources.iter().find(|node| node.id == id)
    }

    pub fn to_json(&self) -> Result<String, StackError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_yaml(&self) -> Result<String, StackError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn render(&self, format: OutputFormat) -> Result<String, StackError> {
        match format {
            OutputFormat::Json => self.to_json(),
            OutputFormat::Yaml => self.to_yaml(),
        }
    }

    pub fn write_to(&self, path: impl AsRef<Path>, format: OutputFormat) -> Result<(), StackError> {
        std::fs::write(path.as_ref(), self.render(format)?)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = StackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            _ => Err(StackError::ConfigError(format!(
                "Invalid output format: '{}' (json, yaml)",
                s
            ))),
        }
    }
}
