//! `ccx config`: configuration lookup and display.

use std::path::Path;

use ccx_config::CcxConfig;

use crate::{GlobalArgs, OutputFormat};

/// Loads the configuration selected by the global flags.
///
/// `--config` names the file explicitly; otherwise the nearest `ccx.toml`
/// above `start` is used, and the defaults when there is none.
pub fn resolve_config(
    global: &GlobalArgs,
    start: &Path,
) -> Result<CcxConfig, Box<dyn std::error::Error>> {
    let config = match global.config {
        Some(ref path) => ccx_config::load_config_file(path)?,
        None => ccx_config::discover_config(start)?,
    };
    Ok(config)
}

/// Runs the `ccx config` command.
pub fn run(format: OutputFormat, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    let config = resolve_config(global, &cwd)?;
    println!("{}", render(&config, format)?);
    Ok(0)
}

fn render(config: &CcxConfig, format: OutputFormat) -> Result<String, Box<dyn std::error::Error>> {
    let out = match format {
        OutputFormat::Text => toml::to_string_pretty(config)?,
        OutputFormat::Json => serde_json::to_string_pretty(config)?,
    };
    Ok(out)
}
