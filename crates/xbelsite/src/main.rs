//! xbelsite CLI - static HTML bookmark sites from XBEL files.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};
use xbelsite_static::Layout;

mod commands;

#[derive(Parser)]
#[command(name = "xbelsite")]
#[command(about = "Generate a static HTML bookmark collection from XBEL files")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to xbelsite.toml config file
    #[arg(short, long, default_value = "xbelsite.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the bookmark site
    Build {
        /// One or more .xbel files to include in the collection
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Directory where index.html will be written (defaults to config or "dist")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Page title to render (defaults to config or "My Bookmarks")
        #[arg(short, long)]
        title: Option<String>,

        /// Page layout: classic or tiles
        #[arg(short, long)]
        layout: Option<Layout>,

        /// Stylesheet directory linked by the tiles layout
        #[arg(long)]
        styles_dir: Option<String>,

        /// Skip minification of the embedded stylesheet
        #[arg(long)]
        no_minify: bool,
    },

    /// List the stylesheets the tiles layout expects
    Themes {
        /// Stylesheet directory (defaults to config or "styles")
        #[arg(long)]
        styles_dir: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    // Execute command
    match cli.command {
        Commands::Build {
            files,
            output,
            title,
            layout,
            styles_dir,
            no_minify,
        } => {
            let args = commands::build::BuildArgs {
                files,
                output,
                title,
                layout,
                styles_dir,
                no_minify,
            };
            commands::build::run(&cli.config, args)?;
        }
        Commands::Themes { styles_dir } => {
            let styles_dir = match styles_dir {
                Some(dir) => dir,
                None => commands::config::load_config(&cli.config)?.site.styles_dir,
            };
            commands::themes::run(&styles_dir)?;
        }
    }

    Ok(())
}
