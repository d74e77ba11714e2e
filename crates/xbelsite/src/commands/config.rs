//! Configuration file (xbelsite.toml).

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use xbelsite_static::Layout;

/// Configuration file structure.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub build: BuildSettings,
}

#[derive(Debug, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default)]
    pub layout: Layout,
    /// Directory holding base.css and themes/ for the tiles layout
    #[serde(default = "default_styles_dir")]
    pub styles_dir: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            output: default_output(),
            layout: Layout::default(),
            styles_dir: default_styles_dir(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BuildSettings {
    #[serde(default = "default_minify")]
    pub minify: bool,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            minify: default_minify(),
        }
    }
}

fn default_title() -> String {
    "My Bookmarks".to_string()
}
fn default_output() -> String {
    "dist".to_string()
}
fn default_styles_dir() -> String {
    "styles".to_string()
}
fn default_minify() -> bool {
    true
}

/// Load configuration from `path` if it exists.
/// Returns an error if the file exists but is malformed.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        return Ok(ConfigFile::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    tracing::info!("Loaded config from {}", path.display());
    Ok(config)
}
