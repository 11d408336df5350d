use miette::Result;

use relbundle_core::config::ReleaseConfig;
use relbundle_ops::ops_clean::{self, CleanResult};

pub fn exec(config: &ReleaseConfig) -> Result<()> {
    match ops_clean::clean(config)? {
        CleanResult::Removed(dirs) => {
            for dir in dirs {
                println!("Removed {}", dir.display());
            }
        }
        CleanResult::NothingToClean => println!("Nothing to clean"),
    }
    Ok(())
}
