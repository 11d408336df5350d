use miette::Result;

use relbundle_core::config::ReleaseConfig;

pub fn exec(config: &ReleaseConfig) -> Result<()> {
    let entries = relbundle_ops::ops_inspect::inspect(config)?;
    println!("{} ({} entries):", config.bundle_file_name(), entries.len());
    for entry in &entries {
        println!("  {entry}");
    }
    Ok(())
}
