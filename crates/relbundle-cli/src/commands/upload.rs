//! Handler for `relbundle upload`.

use miette::Result;

use relbundle_core::config::ReleaseConfig;

pub fn exec(config: &ReleaseConfig) -> Result<()> {
    super::block_on(relbundle_ops::ops_upload::upload(config))?;
    Ok(())
}
