//! Static site build command.

use std::path::{Path, PathBuf};

use anyhow::Result;
use xbelsite_static::{BuildConfig, Layout, SiteBuilder};

use super::config::load_config;

/// Options given on the command line; unset values come from the config file.
#[derive(Debug, Default)]
pub struct BuildArgs {
    pub files: Vec<PathBuf>,
    pub output: Option<PathBuf>,
    pub title: Option<String>,
    pub layout: Option<Layout>,
    pub styles_dir: Option<String>,
    pub no_minify: bool,
}

/// Merge command-line options over the config file.
fn resolve_config(config_path: &Path, args: BuildArgs) -> Result<BuildConfig> {
    let file_config = load_config(config_path)?;

    Ok(BuildConfig {
        inputs: args.files,
        output_dir: args
            .output
            .unwrap_or_else(|| PathBuf::from(&file_config.site.output)),
        title: args.title.unwrap_or(file_config.site.title),
        layout: args.layout.unwrap_or(file_config.site.layout),
        styles_dir: args.styles_dir.unwrap_or(file_config.site.styles_dir),
        minify: !args.no_minify && file_config.build.minify,
    })
}

/// Run the build command.
pub fn run(config_path: &Path, args: BuildArgs) -> Result<()> {
    let config = resolve_config(config_path, args)?;

    tracing::info!(
        "Building {} from {} file(s) with the {} layout...",
        config.output_dir.display(),
        config.inputs.len(),
        config.layout
    );

    let result = SiteBuilder::new(config).build()?;

    tracing::info!(
        "Built {} pages with {} bookmarks in {}ms",
        result.pages,
        result.bookmarks,
        result.duration_ms
    );

    println!("Wrote {} and subpages", result.index.display());

    Ok(())
}
