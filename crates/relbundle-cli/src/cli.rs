//! CLI argument definitions for relbundle.
//!
//! Uses `clap` derive macros to define the command surface. Each command
//! corresponds to a handler in the [`super::commands`] module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use relbundle_core::config::ConfigOverrides;

#[derive(Parser, Debug)]
#[command(
    name = "relbundle",
    version,
    about = "Assemble and upload Maven Central deployment bundles",
    long_about = "relbundle gathers a build's POM, jars and signatures into the Maven \
                  repository layout, writes MD5 and SHA-1 sidecars, zips the tree into a \
                  deployment bundle and uploads it to the publisher API."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Options accepted by every command.
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Release version (defaults to GITHUB_REF_NAME without its leading 'v')
    #[arg(long, global = true, value_name = "VERSION")]
    pub release_version: Option<String>,

    /// Build output directory, relative to the project root
    #[arg(long, global = true, value_name = "DIR")]
    pub build_dir: Option<PathBuf>,

    /// Publisher upload endpoint
    #[arg(long, global = true, env = "RELBUNDLE_ENDPOINT", value_name = "URL")]
    pub endpoint: Option<String>,

    /// Upload timeout in seconds
    #[arg(long, global = true, env = "RELBUNDLE_TIMEOUT", value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Extra attempts after a connection failure or timeout
    #[arg(long, global = true, value_name = "N")]
    pub retries: Option<u32>,

    /// Create missing signatures with gpg instead of requiring them
    #[arg(long, global = true)]
    pub sign: bool,
}

impl GlobalArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            release_version: self.release_version.clone(),
            build_dir: self.build_dir.clone(),
            endpoint: self.endpoint.clone(),
            timeout_secs: self.timeout,
            retries: self.retries,
            sign: self.sign,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Copy the POM, jars and signatures into deployment-artifacts
    Collect,

    /// Write detached gpg signatures for collected artifacts that lack one
    Sign,

    /// Write .md5 and .sha1 sidecars for every collected artifact
    Checksum,

    /// Zip deployment-artifacts into the deployment bundle
    Bundle,

    /// Upload the deployment bundle to the publisher API
    Upload,

    /// Run every stage: collect, sign, checksum, bundle, upload
    Release {
        /// Stop after the bundle has been created
        #[arg(long)]
        skip_upload: bool,
    },

    /// List the entries of the deployment bundle
    Inspect,

    /// Show the resolved release configuration
    Env {
        /// Show secret values instead of masking them
        #[arg(long)]
        reveal: bool,
    },

    /// Remove deployment-artifacts and deployment-bundle
    Clean,
}

/// Parse command-line arguments into a [`Cli`] struct.
pub fn parse() -> Cli {
    Cli::parse()
}
