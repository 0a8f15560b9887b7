//! Session configuration loaded from TOML.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use meltdown_core::SessionConfig;

/// Loads the session configuration, falling back to defaults without a path.
pub(crate) fn load(path: Option<&Path>) -> Result<SessionConfig> {
    let Some(path) = path else {
        return Ok(SessionConfig::default());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read session config at {}", path.display()))?;
    parse(&contents).with_context(|| format!("invalid session config at {}", path.display()))
}

fn parse(contents: &str) -> Result<SessionConfig> {
    let config: SessionConfig =
        toml::from_str(contents).context("failed to parse session config toml contents")?;
    if config.columns == 0 || config.rows == 0 {
        bail!(
            "grid dimensions must be positive, got {}x{}",
            config.columns,
            config.rows
        );
    }
    if config.timing.ice_step_ms == 0 {
        bail!("ice_step_ms must be positive");
    }
    Ok(config)
}
