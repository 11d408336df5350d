use console::Style;
use miette::Result;

use relbundle_core::config::ReleaseConfig;

pub fn exec(config: &ReleaseConfig, reveal: bool) -> Result<()> {
    let rows = relbundle_ops::ops_env::describe(config, reveal);
    let width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    let bold = Style::new().bold();
    for (key, value) in &rows {
        println!("  {} = {value}", bold.apply_to(format!("{key:<width$}")));
    }
    Ok(())
}
