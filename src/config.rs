//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/manview/manview.toml`
//! 3. Explicit config file (`--config`)
//! 4. Environment variables: `MANVIEW_*` prefix, nested keys joined by `__`

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::infrastructure::traits::{RenderFormat, RenderOptions};

/// Narrowest page width `man` produces readable output for.
pub const MIN_WIDTH: u16 = 20;

/// How documents of a location are enumerated.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ListingStrategy {
    /// `man -k .` against the location's whatis index
    #[default]
    Apropos,
    /// Walk `man<N>/` directories below the location
    Scan,
}

/// Page rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RenderSettings {
    /// Terminal width pages are formatted for
    pub width: u16,
    /// Light text on dark background for HTML pages
    pub dark: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 80,
            dark: true,
        }
    }
}

/// `man` invocation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ManSettings {
    /// Program to run (default: "man")
    pub command: String,
    pub listing: ListingStrategy,
}

impl Default for ManSettings {
    fn default() -> Self {
        Self {
            command: "man".into(),
            listing: ListingStrategy::default(),
        }
    }
}

/// Raw settings for intermediate parsing (every field optional to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub render: RawRenderSettings,
    pub man: RawManSettings,
    pub artifact_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawRenderSettings {
    pub width: Option<u16>,
    pub dark: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawManSettings {
    pub command: Option<String>,
    pub listing: Option<ListingStrategy>,
}

/// Unified configuration for manview.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub render: RenderSettings,
    pub man: ManSettings,
    /// Directory for rendered pages (default: system temp dir)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_dir: Option<PathBuf>,
}

/// Get the XDG config directory for manview.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "manview").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("manview.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}`; unknown variables leave the input unchanged.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    /// Render options for full HTML pages.
    pub fn page_options(&self) -> RenderOptions {
        RenderOptions {
            width: self.render.width,
            format: RenderFormat::Html,
            dark: self.render.dark,
        }
    }

    /// Render options for plain text used by section queries.
    pub fn text_options(&self) -> RenderOptions {
        RenderOptions::plain(self.render.width)
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(dir) = &self.artifact_dir {
            self.artifact_dir = Some(PathBuf::from(expand_env_vars(&dir.to_string_lossy())));
        }
        self.man.command = expand_env_vars(&self.man.command);
    }

    /// Overlay wins wherever it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            render: RenderSettings {
                width: overlay.render.width.unwrap_or(self.render.width),
                dark: overlay.render.dark.unwrap_or(self.render.dark),
            },
            man: ManSettings {
                command: overlay
                    .man
                    .command
                    .clone()
                    .unwrap_or_else(|| self.man.command.clone()),
                listing: overlay.man.listing.unwrap_or(self.man.listing),
            },
            artifact_dir: overlay
                .artifact_dir
                .clone()
                .or_else(|| self.artifact_dir.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file; must exist if given
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/manview/manview.toml`
    /// 3. Explicit config file
    /// 4. Environment variables: `MANVIEW_*`
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(path) = config_file {
            let raw = load_raw_settings(path)?;
            current = current.merge_with(&raw);
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();
        current.validate()?;

        Ok(current)
    }

    /// Apply MANVIEW_* environment variables as explicit overrides.
    ///
    /// e.g. `MANVIEW_RENDER__WIDTH=100`, `MANVIEW_MAN__LISTING=scan`,
    /// `MANVIEW_ARTIFACT_DIR=/tmp/pages`.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("MANVIEW")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get::<u16>("render.width") {
            settings.render.width = val;
        }
        if let Ok(val) = config.get_bool("render.dark") {
            settings.render.dark = val;
        }
        if let Ok(val) = config.get_string("man.command") {
            settings.man.command = val;
        }
        if let Ok(val) = config.get::<ListingStrategy>("man.listing") {
            settings.man.listing = val;
        }
        if let Ok(val) = config.get_string("artifact_dir") {
            settings.artifact_dir = Some(PathBuf::from(val));
        }

        Ok(settings)
    }

    /// Reject settings `man` cannot work with.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        if self.render.width < MIN_WIDTH {
            return Err(ApplicationError::Config {
                message: format!(
                    "render.width must be at least {MIN_WIDTH}, got {}",
                    self.render.width
                ),
            });
        }
        if self.man.command.trim().is_empty() {
            return Err(ApplicationError::Config {
                message: "man.command must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# manview configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/manview/manview.toml
#   File:   manview --config <file>
#   Env:    MANVIEW_* environment variables, e.g. MANVIEW_RENDER__WIDTH=100

# Directory for rendered pages, removed again on exit (default: system temp dir)
# artifact_dir = "~/.cache/manview"

[render]
# Terminal width pages are formatted for (minimum 20)
# width = 80

# Light text on dark background
# dark = true

[man]
# Program used to list, render and summarize pages
# command = "man"

# "apropos" uses the whatis index (man -k), "scan" walks man<N>/ directories
# listing = "apropos"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
