// CLI command definitions

use super::stack::{PreviewCommand, SynthCommand, ValidateCommand};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "eks-forge",
    version,
    about = "Declarative EKS stack synthesizer",
    long_about = "A standalone CLI tool for declaring and synthesizing AWS EKS cluster stacks"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Synthesize the stack into a deployment artifact (JSON or YAML)
    Synth(SynthCommand),

    /// Run the pipeline and print the resource plan as a table
    Preview(PreviewCommand),

    /// Validate the stack configuration without synthesizing
    Validate(ValidateCommand),
}
