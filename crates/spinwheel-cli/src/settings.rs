//! Resolving a [`SpinConfig`] from defaults, a config file and CLI flags.
//!
//! Precedence, highest first: CLI flag, config file, built-in default.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use spinwheel::{PhaseProportions, SpinConfig};

use crate::cli::Cli;

/// Loads a config file, picking the format from its extension.
///
/// `.json` files are parsed as JSON; everything else as TOML. Missing
/// fields take their defaults.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_file(path: &Path) -> Result<SpinConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let config = if is_json {
        serde_json::from_str(&text)
            .with_context(|| format!("invalid JSON config {}", path.display()))?
    } else {
        toml::from_str(&text).with_context(|| format!("invalid TOML config {}", path.display()))?
    };
    tracing::debug!(path = %path.display(), "loaded config file");
    Ok(config)
}

/// Builds the effective configuration for this run.
///
/// # Errors
///
/// Returns an error if the config file is unusable or the resolved values
/// are invalid.
pub fn resolve(cli: &Cli) -> Result<SpinConfig> {
    let mut config = match &cli.config {
        Some(path) => load_file(path)?,
        None => SpinConfig::default(),
    };

    if let Some(target) = cli.target {
        config.target_angle = target;
    }
    if let Some(coefficient) = cli.coefficient {
        config.spins_coefficient = coefficient;
    }
    if let Some(duration) = cli.duration {
        config.spin_time = duration;
    }
    if let Some(initial) = cli.initial {
        config.initial_angle = initial;
    }
    if let Some(values) = &cli.proportions {
        config.proportions = PhaseProportions::from_slice(values)?;
    }
    if let Some(sectors) = cli.sectors {
        config.sectors = sectors;
    }
    if let Some(rate) = cli.rate {
        config.poll_rate = rate;
    }

    config.validate()?;
    Ok(config)
}
