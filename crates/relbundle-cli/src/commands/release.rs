//! Handler for `relbundle release`.

use miette::Result;

use relbundle_core::config::ReleaseConfig;
use relbundle_ops::ops_release::{self, ReleaseOptions};
use relbundle_util::progress::status;

pub fn exec(config: &ReleaseConfig, skip_upload: bool) -> Result<()> {
    let report = super::block_on(ops_release::release(
        config,
        ReleaseOptions { skip_upload },
    ))?;

    match report.upload {
        Some(_) => status("Released", &config.coordinate.to_string()),
        None => status(
            "Finished",
            &format!("{} (upload skipped)", report.bundle.path.display()),
        ),
    }
    Ok(())
}
