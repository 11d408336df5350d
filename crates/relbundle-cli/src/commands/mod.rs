//! Command dispatch and handler modules.

mod bundle;
mod checksum;
mod clean;
mod collect;
mod env;
mod inspect;
mod release;
mod sign;
mod upload;

use std::future::Future;

use miette::Result;

use relbundle_core::config::ReleaseConfig;
use relbundle_core::manifest::MANIFEST_NAME;
use relbundle_util::errors::ReleaseError;
use relbundle_util::fs::find_ancestor_with;

use crate::cli::{Cli, Command, GlobalArgs};

/// Route a parsed CLI invocation to the appropriate command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    let config = load_config(&cli.global)?;
    match cli.command {
        Command::Collect => collect::exec(&config),
        Command::Sign => sign::exec(&config),
        Command::Checksum => checksum::exec(&config),
        Command::Bundle => bundle::exec(&config),
        Command::Upload => upload::exec(&config),
        Command::Release { skip_upload } => release::exec(&config, skip_upload),
        Command::Inspect => inspect::exec(&config),
        Command::Env { reveal } => env::exec(&config, reveal),
        Command::Clean => clean::exec(&config),
    }
}

/// Find `bundle.toml` from the working directory upwards and resolve the
/// release configuration against it.
fn load_config(global: &GlobalArgs) -> Result<ReleaseConfig> {
    let cwd = std::env::current_dir().map_err(ReleaseError::Io)?;
    let project_root =
        find_ancestor_with(&cwd, MANIFEST_NAME).ok_or_else(|| ReleaseError::Configuration {
            message: format!("Could not find {MANIFEST_NAME} in this directory or any parent"),
        })?;
    ReleaseConfig::load(&project_root, &global.overrides())
}

/// Drive an async operation to completion on a fresh runtime.
fn block_on<F: Future<Output = Result<T>>, T>(future: F) -> Result<T> {
    let rt = tokio::runtime::Runtime::new().map_err(ReleaseError::Io)?;
    rt.block_on(future)
}
