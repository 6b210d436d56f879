//! CIX configuration.
//!
//! Precedence (highest wins):
//! 1. Environment variables `CIX_CONTEXT_PATH`, `CIX_RESOURCE_ROOT`, `CIX_LOCALE`
//! 2. TOML file passed explicitly, else `./cix.toml` when present
//! 3. Built-in defaults

use crate::error::{ConfigError, Result};
use crate::icon::RequestContext;
use crate::l10n::Locale;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::path::Path;
use tracing::{debug, info};

pub const DEFAULT_CONFIG_FILE: &str = "cix.toml";

/// Static resource prefix derived from the crate version, so a new release
/// gets fresh URLs: `/static/<first 8 hex of sha256(version)>`.
pub fn default_resource_root() -> String {
    let digest = Sha256::digest(crate::VERSION.as_bytes());
    let hex = hex::encode(digest);
    format!("/static/{}", &hex[..8])
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    context_path: Option<String>,
    resource_root: Option<String>,
    locale: Option<String>,
}

/// Resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CixConfig {
    /// Mount point of the web application (`""` for root)
    pub context_path: String,

    /// Static resource prefix under the context path
    pub resource_root: String,

    /// Locale descriptions are rendered in when the caller names none
    pub locale: Locale,
}

impl Default for CixConfig {
    fn default() -> Self {
        Self {
            context_path: String::new(),
            resource_root: default_resource_root(),
            locale: Locale::root(),
        }
    }
}

impl CixConfig {
    /// Load defaults, then the config file, then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        match path {
            Some(path) => config.merge_file(path)?,
            None => {
                let local = Path::new(DEFAULT_CONFIG_FILE);
                if local.is_file() {
                    config.merge_file(local)?;
                }
            }
        }

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a TOML document over the current values.
    pub fn merge_toml(&mut self, text: &str) -> Result<()> {
        let file: FileConfig = toml::from_str(text).map_err(ConfigError::from)?;
        if let Some(context_path) = file.context_path {
            self.context_path = context_path;
        }
        if let Some(resource_root) = file.resource_root {
            self.resource_root = resource_root;
        }
        if let Some(locale) = file.locale {
            self.locale = parse_locale("locale", &locale)?;
        }
        Ok(())
    }

    fn merge_file(&mut self, path: &Path) -> Result<()> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        info!(path = %path.display(), "loading config");
        self.merge_toml(&text)
    }

    /// Overlay values from `lookup` (normally the process environment).
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(context_path) = lookup("CIX_CONTEXT_PATH") {
            debug!(%context_path, "context path from environment");
            self.context_path = context_path;
        }
        if let Some(resource_root) = lookup("CIX_RESOURCE_ROOT") {
            debug!(%resource_root, "resource root from environment");
            self.resource_root = resource_root;
        }
        if let Some(locale) = lookup("CIX_LOCALE") {
            self.locale = parse_locale("CIX_LOCALE", &locale)?;
        }
        Ok(())
    }

    /// Request context for icon resolution outside a live HTTP request.
    pub fn request_context(&self) -> RequestContext {
        RequestContext::new(&self.context_path, &self.resource_root)
    }
}

fn parse_locale(key: &str, raw: &str) -> Result<Locale> {
    raw.parse().map_err(|e: crate::L10nError| {
        ConfigError::InvalidValue {
            key: key.to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}
