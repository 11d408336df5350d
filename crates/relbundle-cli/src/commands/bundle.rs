use miette::Result;

use relbundle_core::config::ReleaseConfig;

pub fn exec(config: &ReleaseConfig) -> Result<()> {
    relbundle_ops::ops_bundle::bundle(config)?;
    Ok(())
}
