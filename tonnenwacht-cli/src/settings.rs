//! Settings file loading.

use std::{env, fs, path::PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use tonnenwacht_core::model::Address;

const DEFAULT_PATH: &str = "settings.json";
const PATH_ENV: &str = "TONNENWACHT_SETTINGS";

/// Static per-household configuration, read once at startup.
#[derive(Debug, Deserialize)]
pub(crate) struct Settings {
    /// Entry URL of the lookup form.
    pub awg_url: String,
    /// Address submitted to the form.
    pub haus_details: Address,
}

/// Load settings from `settings.json` in the working directory, or from
/// the path named by `TONNENWACHT_SETTINGS`.
pub(crate) fn load() -> Result<Settings> {
    let path = env::var(PATH_ENV).map_or_else(|_| PathBuf::from(DEFAULT_PATH), PathBuf::from);

    let raw = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read settings file {}", path.display()))?;

    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse settings file {}", path.display()))
}
