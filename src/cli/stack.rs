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

//! Stack synthesis commands

use crate::cli::display::{StatusIcon, TableRenderer};
use crate::domain::config::StackConfig;
use crate::domain::stack::{StackSynthesizer, StackValidator};
use crate::infrastructure::cloud::EnvironmentCatalog;
use crate::infrastructure::synthesis::OutputFormat;
use clap::Parser;
use colored::Colorize;

#[derive(Parser, Debug, Clone)]
pub struct SynthCommand {
    /// Path to the stack configuration file (TOML)
    #[arg(long, short = 'f', value_name = "PATH")]
    pub config_file: String,

    /// Path to the environment catalog file (TOML)
    /// Describes the networks, IAM roles, and chart repositories lookups
    /// resolve against
    #[arg(long, short = 'C', value_name = "PATH")]
    pub catalog: String,

    /// Target account (overrides config file and EKS_FORGE_ACCOUNT)
    #[arg(long)]
    pub account: Option<String>,

    /// Target region (overrides config file and EKS_FORGE_REGION)
    #[arg(long)]
    pub region: Option<String>,

    /// Write the synthesized stack to this path instead of stdout
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<String>,

    /// Output format (json, yaml)
    #[arg(long, default_value = "json")]
    pub format: String,
}

#[derive(Parser, Debug, Clone)]
pub struct PreviewCommand {
    /// Path to the stack configuration file (TOML)
    #[arg(long, short = 'f', value_name = "PATH")]
    pub config_file: String,

    /// Path to the environment catalog file (TOML)
    #[arg(long, short = 'C', value_name = "PATH")]
    pub catalog: String,

    /// Target account (overrides config file and EKS_FORGE_ACCOUNT)
    #[arg(long)]
    pub account: Option<String>,

    /// Target region (overrides config file and EKS_FORGE_REGION)
    #[arg(long)]
    pub region: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ValidateCommand {
    /// Path to the stack configuration file (TOML)
    #[arg(long, short = 'f', value_name = "PATH")]
    pub config_file: String,

    /// Path to the environment catalog file (TOML); when given, the catalog
    /// is loaded and checked for the referenced network
    #[arg(long, short = 'C', value_name = "PATH")]
    pub catalog: Option<String>,
}

fn load_config(
    path: &str,
    account: &Option<String>,
    region: &Option<String>,
) -> anyhow::Result<StackConfig> {
    let mut config = StackConfig::from_file(path)?;

    // Priority: command line > config file > environment
    if account.is_some() {
        config.account = account.clone();
    }
    if region.is_some() {
        config.region = region.clone();
    }

    Ok(config)
}

impl SynthCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let config = load_config(&self.config_file, &self.account, &self.region)?;
        let catalog = EnvironmentCatalog::from_file(&self.catalog)?;
        let format: OutputFormat = self.format.parse()?;

        let mut synthesizer = StackSynthesizer::new(Box::new(catalog));
        let stack = synthesizer.synthesize(config).await?;

        match &self.output {
            Some(path) => {
                stack.write_to(path, format)?;
                println!(
                    "{} Synthesized {} resource(s) to {}",
                    StatusIcon::SUCCESS.green(),
                    stack.resources.len(),
                    path
                );
            }
            None => {
                println!("{}", stack.render(format)?);
            }
        }

        Ok(())
    }
}

impl PreviewCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let config = load_config(&self.config_file, &self.account, &self.region)?;
        let catalog = EnvironmentCatalog::from_file(&self.catalog)?;

        let mut synthesizer = StackSynthesizer::new(Box::new(catalog));
        let stack = synthesizer.synthesize(config).await?;

        println!("{}", TableRenderer::new().render_plan(&stack));
        Ok(())
    }
}

impl ValidateCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let config = StackConfig::from_file(&self.config_file)?;
        StackValidator::validate(&config)?;
        println!(
            "{} Stack configuration is valid",
            StatusIcon::SUCCESS.green()
        );

        if let Some(catalog_path) = &self.catalog {
            let catalog = EnvironmentCatalog::from_file(catalog_path)?;
            if !catalog
                .networks
                .iter()
                .any(|network| network.name == config.network)
            {
                anyhow::bail!(
                    "{} Network '{}' not present in catalog {}",
                    StatusIcon::ERROR.red(),
                    config.network,
                    catalog_path
                );
            }
            println!(
                "{} Network '{}' found in catalog",
                StatusIcon::SUCCESS.green(),
                config.network
            );
        }

        Ok(())
    }
}
