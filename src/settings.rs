//! Client configuration.
//!
//! Values are layered: built-in defaults, then an optional YAML file, then
//! `WALLET_*` environment variables (a `.env` file is honoured).

use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

pub const DEFAULT_CATEGORY_ICON: &str = "category";
pub const DEFAULT_CATEGORY_COLOR: &str = "#9E9E9E";

/// Configuration options of the synchronization client.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ClientSettings {
    /// Icon token applied to categories the backend sent without one.
    pub fallback_icon: String,
    /// Color token applied to categories the backend sent without one.
    pub fallback_color: String,
    /// Open the cached copy (flagged stale) when the authority cannot be
    /// reached while starting an edit.
    pub stale_edit_fallback: bool,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            fallback_icon: DEFAULT_CATEGORY_ICON.to_string(),
            fallback_color: DEFAULT_CATEGORY_COLOR.to_string(),
            stale_edit_fallback: true,
        }
    }
}

impl ClientSettings {
    /// Loads settings from `path` (if it exists) and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("fallback_icon", defaults.fallback_icon)?
            .set_default("fallback_color", defaults.fallback_color)?
            .set_default("stale_edit_fallback", defaults.stale_edit_fallback)?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(false));
        }

        let settings = builder
            .add_source(Environment::with_prefix("WALLET"))
            .build()?
            .try_deserialize::<Self>()?;

        log::debug!("Loaded client settings: {settings:?}");
        Ok(settings)
    }
}
