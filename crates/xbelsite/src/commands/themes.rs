//! List the stylesheets the tiles layout links to.

use anyhow::Result;
use xbelsite_static::assets::AssetPipeline;

/// Run the themes command.
pub fn run(styles_dir: &str) -> Result<()> {
    tracing::debug!("Stylesheets are resolved by the browser; none are checked here");

    for stylesheet in AssetPipeline::theme_stylesheets(styles_dir) {
        println!("{stylesheet}");
    }

    Ok(())
}
