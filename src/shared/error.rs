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

use crate::domain::stack::BuildStage;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StackError>;

/// Every error is fatal to the build. There is no retry or partial-success
/// mode; a failed stage aborts the whole synthesis.
#[derive(Error, Debug)]
pub enum StackError {
    #[error("Resource not found: {resource_type} '{name}'")]
    NotFound { resource_type: String, name: String },

    #[error(
        "Insufficient subnets: {requested} availability zone(s) requested, \
         {available} zone(s) have eligible subnets"
    )]
    InsufficientSubnets { requested: u32, available: u32 },

    #[error("Unknown IAM role: '{0}' cannot be resolved in the target account")]
    UnknownRole(String),

    #[error("Chart not found: '{chart}' version '{version}' in repository '{repository}'")]
    ChartNotFound {
        repository: String,
        chart: String,
        version: String,
    },

    #[error("Missing environment parameter: {0} is not set")]
    MissingEnvironment(String),

    #[error("Dependency ordering violation: {resource} requires {requires} to exist first")]
    DependencyOrder { resource: String, requires: String },

    #[error("Stage '{stage}' failed: {source}")]
    StageFailed {
        stage: BuildStage,
        source: Box<StackError>,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl StackError {
    pub fn config_error(context: impl Into<String>) -> Self {
        Self::ConfigError(context.into())
    }

    pub fn validation_error(context: impl Into<String>) -> Self {
        Self::ValidationError(context.into())
    }

    pub fn not_found(resource_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            name: name.into(),
        }
    }

    pub fn chart_not_found(
        repository: impl Into<String>,
        chart: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self::ChartNotFound {
            repository: repository.into(),
            chart: chart.into(),
            version: version.into(),
        }
    }

    pub fn missing_environment(var: impl Into<String>) -> Self {
        Self::MissingEnvironment(var.into())
    }

    pub fn dependency_order(resource: impl Into<String>, requires: impl Into<String>) -> Self {
        Self::DependencyOrder {
            resource: resource.into(),
            requires: requires.into(),
        }
    }

    pub fn stage(stage: BuildStage, source: StackError) -> Self {
        Self::StageFailed {
            stage,
            source: Box::new(source),
        }
    }

    /// The stage an error surfaced in, if it was wrapped by the pipeline.
    pub fn failed_stage(&self) -> Option<BuildStage> {
        match self {
            Self::StageFailed { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}
