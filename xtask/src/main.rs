//! Build automation for eks-forge
//!
//! Usage: cargo xtask <command>
//!
//! Release artifacts follow the crate metadata: `dist` produces the tarball
//! cargo-binstall downloads, `deb` drives cargo-deb.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use xshell::{cmd, Shell};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation for eks-forge")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the workspace
    Build {
        /// Build in release mode
        #[arg(long)]
        release: bool,
    },
    /// Run the full test suite
    Test,
    /// Run CI checks (format, clippy, tests)
    Ci,
    /// Build the release tarball cargo-binstall expects
    Dist {
        /// Target triple baked into the archive name
        #[arg(long)]
        target: Option<String>,
    },
    /// Build a Debian package via cargo-deb
    Deb,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let sh = Shell::new()?;

    sh.change_dir(workspace_root());

    match cli.command {
        Commands::Build { release } => build(&sh, release),
        Commands::Test => test(&sh),
        Commands::Ci => ci(&sh),
        Commands::Dist { target } => dist(&sh, target.as_deref()),
        Commands::Deb => deb(&sh),
    }
}

fn build(sh: &Shell, release: bool) -> Result<()> {
    if release {
        cmd!(sh, "cargo build --release").run()?;
    } else {
        cmd!(sh, "cargo build").run()?;
    }
    Ok(())
}

fn test(sh: &Shell) -> Result<()> {
    cmd!(sh, "cargo test --all").run()?;
    Ok(())
}

fn ci(sh: &Shell) -> Result<()> {
    cmd!(sh, "cargo fmt --all -- --check").run()?;
    cmd!(sh, "cargo clippy --all-targets --all-features -- -D warnings").run()?;
    cmd!(sh, "cargo test --all").run()?;

    println!("✅ All CI checks passed");
    Ok(())
}

/// Stage the release binary and README into dist/ and pack the tarball.
fn dist(sh: &Shell, target: Option<&str>) -> Result<()> {
    let binary = match target {
        Some(triple) => {
            cmd!(sh, "cargo build --release --target {triple}").run()?;
            workspace_root().join(format!("target/{triple}/release/eks-forge"))
        }
        None => {
            cmd!(sh, "cargo build --release").run()?;
            workspace_root().join("target/release/eks-forge")
        }
    };

    let dist_dir = workspace_root().join("dist");
    sh.create_dir(&dist_dir)?;
    sh.copy_file(&binary, dist_dir.join("eks-forge"))?;
    sh.copy_file(workspace_root().join("README.md"), dist_dir.join("README.md"))?;

    let archive = archive_name(target);
    cmd!(sh, "tar -czf {archive} -C dist eks-forge README.md")
        .run()
        .context("Failed to create release tarball")?;

    println!("✅ Release tarball created: {}", archive);
    Ok(())
}

fn deb(sh: &Shell) -> Result<()> {
    cmd!(sh, "cargo deb")
        .run()
        .context("cargo-deb is required (cargo install cargo-deb)")?;
    Ok(())
}

/// Target-named archives match the binstall pkg-url in Cargo.toml; the
/// host build falls back to a plain name.
fn archive_name(target: Option<&str>) -> String {
    match target {
        Some(triple) => format!("eks-forge-{}.tar.gz", triple),
        None => "eks-forge.tar.gz".to_string(),
    }
}

fn workspace_root() -> PathBuf {
    Path::new(&env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(1)
        .unwrap()
        .to_path_buf()
}
