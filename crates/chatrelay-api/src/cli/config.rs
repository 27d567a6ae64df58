//! `relay config`: print the effective configuration.

use std::path::Path;

use anyhow::Result;

use chatrelay_types::config::RelayConfig;

/// Render `config` as TOML, prefixed with where it was loaded from.
pub fn render_config(config: &RelayConfig, source: &Path) -> Result<String> {
    let body = toml::to_string_pretty(config)?;
    Ok(format!("# source: {}\n{body}", source.display()))
}

pub fn show_config(config: &RelayConfig, source: &Path) -> Result<()> {
    print!("{}", render_config(config, source)?);
    if let Err(e) = config.validate() {
        eprintln!("warning: {e}");
    }
    Ok(())
}
