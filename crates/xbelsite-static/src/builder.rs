//! Static site builder.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Utc;
use xbelsite_xbel::{parse_xbel_file, Folder, Node, XbelError};

use crate::assets::AssetPipeline;
use crate::slug::{assign_slugs, Page};
use crate::templates::{Layout, RenderOptions, TemplateEngine};

/// Configuration for building a static site.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// XBEL files to include, in order
    pub inputs: Vec<PathBuf>,

    /// Output directory
    pub output_dir: PathBuf,

    /// Collection title, used for the root page
    pub title: String,

    /// Page layout
    pub layout: Layout,

    /// Stylesheet directory referenced by the tiles layout
    pub styles_dir: String,

    /// Minify the embedded stylesheet
    pub minify: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            inputs: vec![],
            output_dir: PathBuf::from("dist"),
            title: "My Bookmarks".to_string(),
            layout: Layout::default(),
            styles_dir: "styles".to_string(),
            minify: true,
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of pages written (one per folder, root included)
    pub pages: usize,

    /// Number of bookmarks across all pages
    pub bookmarks: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Path of the root page
    pub index: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Missing input files: {}", join_paths(.0))]
    MissingInputs(Vec<PathBuf>),

    #[error(transparent)]
    Xbel(#[from] XbelError),

    #[error("Failed to render {slug}: {message}")]
    Template { slug: String, message: String },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse every input and wrap the results under one root folder.
pub fn load_collection(inputs: &[PathBuf], title: &str) -> Result<Folder, XbelError> {
    let folders = inputs
        .iter()
        .map(|path| parse_xbel_file(path).map(Node::Folder))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Folder::new(title, folders))
}

/// Static site builder.
pub struct SiteBuilder {
    config: BuildConfig,
    templates: TemplateEngine,
}

impl SiteBuilder {
    /// Create a new site builder.
    pub fn new(config: BuildConfig) -> Self {
        Self {
            config,
            templates: TemplateEngine::new(),
        }
    }

    /// Build the static site.
    ///
    /// Every input is parsed before anything is written, so a malformed file
    /// aborts the build without touching the output directory.
    pub fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        self.check_inputs()?;

        let root = load_collection(&self.config.inputs, &self.config.title)?;
        let site = assign_slugs(&root);

        fs::create_dir_all(&self.config.output_dir).map_err(|source| BuildError::Write {
            path: self.config.output_dir.clone(),
            source,
        })?;

        let options = RenderOptions {
            site_title: self.config.title.clone(),
            generated_at: Utc::now(),
            layout: self.config.layout,
            styles_dir: self.config.styles_dir.clone(),
            stylesheet: match self.config.layout {
                Layout::Classic => AssetPipeline::classic_css(self.config.minify),
                Layout::Tiles => String::new(),
            },
        };

        let pages = self.write_pages(&site, None, &options)?;

        Ok(BuildResult {
            pages,
            bookmarks: root.bookmark_count(),
            duration_ms: start.elapsed().as_millis() as u64,
            index: self.config.output_dir.join(&site.slug),
        })
    }

    /// Fail once, naming every input that does not exist.
    fn check_inputs(&self) -> Result<(), BuildError> {
        let missing: Vec<PathBuf> = self
            .config
            .inputs
            .iter()
            .filter(|path| !path.exists())
            .cloned()
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(BuildError::MissingInputs(missing))
        }
    }

    /// Write `page` and its subtree in pre-order, returning the page count.
    fn write_pages(
        &self,
        page: &Page<'_>,
        parent: Option<&str>,
        options: &RenderOptions,
    ) -> Result<usize, BuildError> {
        let html = self
            .templates
            .render_page(page, parent, options)
            .map_err(|e| BuildError::Template {
                slug: page.slug.clone(),
                message: e.to_string(),
            })?;

        let path = self.config.output_dir.join(&page.slug);
        write_file(&path, &html)?;
        tracing::debug!("Wrote {} ({})", path.display(), page.folder.title);

        let mut written = 1;
        for subpage in &page.subpages {
            written += self.write_pages(subpage, Some(&page.slug), options)?;
        }
        Ok(written)
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), BuildError> {
    fs::write(path, contents).map_err(|source| BuildError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, TempDir};

    const WORK: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xbel version="1.0">
  <title>Work</title>
  <folder>
    <title>My Links</title>
    <bookmark href="https://example.com" added="2023-05-01T10:00:00Z">
      <title>Example</title>
    </bookmark>
    <bookmark added="2023-05-01"><title>Dropped</title></bookmark>
    <folder>
      <bookmark href="https://nested.example"/>
    </folder>
  </folder>
  <folder><title>My Links</title></folder>
</xbel>"#;

    const HOME: &str = r#"<xbel>
  <bookmark href="https://a.com/?q=&lt;b&gt;"><title>&lt;script&gt;alert(1)&lt;/script&gt;</title></bookmark>
  <bookmark href="https://b.example" modified="not-a-date"/>
</xbel>"#;

    fn write_inputs(temp: &TempDir, files: &[(&str, &str)]) -> Vec<PathBuf> {
        files
            .iter()
            .map(|(name, content)| {
                let path = temp.path().join(name);
                fs::write(&path, content).unwrap();
                path
            })
            .collect()
    }

    fn html_files(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".html"))
            .collect();
        names.sort();
        names
    }

    fn build(inputs: Vec<PathBuf>, output_dir: PathBuf) -> Result<BuildResult, BuildError> {
        SiteBuilder::new(BuildConfig {
            inputs,
            output_dir,
            minify: false,
            ..Default::default()
        })
        .build()
    }

    #[test]
    fn writes_one_page_per_folder() {
        let temp = tempdir().unwrap();
        let inputs = write_inputs(&temp, &[("work.xbel", WORK), ("home.xbel", HOME)]);
        let out = temp.path().join("dist");

        let result = build(inputs, out.clone()).unwrap();

        // root + work + my links + untitled + my links + home
        assert_eq!(result.pages, 6);
        assert_eq!(result.bookmarks, 4);
        assert_eq!(result.index, out.join("index.html"));
        assert_eq!(
            html_files(&out),
            [
                "home.html",
                "index.html",
                "my-links-2.html",
                "my-links.html",
                "untitled-folder.html",
                "work.html",
            ]
        );
    }

    #[test]
    fn root_links_to_each_input() {
        let temp = tempdir().unwrap();
        let inputs = write_inputs(&temp, &[("work.xbel", WORK), ("home.xbel", HOME)]);
        let out = temp.path().join("dist");

        build(inputs, out.clone()).unwrap();

        let index = fs::read_to_string(out.join("index.html")).unwrap();
        assert!(index.contains("<h1>My Bookmarks</h1>"));
        assert!(index.contains(r#"<a href="work.html">Work</a>"#));
        assert!(index.contains(r#"<a href="home.html">home</a>"#));
        assert!(index.contains("No bookmarks."));
        assert!(!index.contains("class=\"parent\""));
    }

    #[test]
    fn pages_link_back_to_parent() {
        let temp = tempdir().unwrap();
        let inputs = write_inputs(&temp, &[("work.xbel", WORK)]);
        let out = temp.path().join("dist");

        build(inputs, out.clone()).unwrap();

        let links = fs::read_to_string(out.join("my-links.html")).unwrap();
        assert!(links.contains(r#"<a class="parent" href="work.html">"#));
        assert!(links.contains(">Example</a>"));
        assert!(links.contains("added 2023-05-01"));
        assert!(!links.contains("Dropped"));
        assert!(links.contains(r#"<a href="untitled-folder.html">Untitled folder</a>"#));

        let nested = fs::read_to_string(out.join("untitled-folder.html")).unwrap();
        assert!(nested.contains(r#"<a class="parent" href="my-links.html">"#));
        assert!(nested.contains(
            r#"<a href="https://nested.example" target="_blank" rel="noreferrer noopener">https://nested.example</a>"#
        ));
        assert!(nested.contains("No subfolders."));
    }

    #[test]
    fn escapes_markup_from_inputs() {
        let temp = tempdir().unwrap();
        let inputs = write_inputs(&temp, &[("home.xbel", HOME)]);
        let out = temp.path().join("dist");

        build(inputs, out.clone()).unwrap();

        let home = fs::read_to_string(out.join("home.html")).unwrap();
        assert!(!home.contains("<script>"));
        assert!(home.contains("&lt;script&gt;alert(1)"));
        assert!(!home.contains("q=<b>"));
        assert!(home.contains(r#"href="https://a.com/?q=&lt;b&gt;""#));
        assert!(home.contains("updated not-a-date"));
    }

    #[test]
    fn output_is_deterministic() {
        let temp = tempdir().unwrap();
        let inputs = write_inputs(&temp, &[("work.xbel", WORK), ("home.xbel", HOME)]);
        let first = temp.path().join("first");
        let second = temp.path().join("second");

        build(inputs.clone(), first.clone()).unwrap();
        build(inputs, second.clone()).unwrap();

        let strip = |html: String| -> String {
            html.lines()
                .filter(|line| !line.contains("class=\"updated\""))
                .collect::<Vec<_>>()
                .join("\n")
        };

        assert_eq!(html_files(&first), html_files(&second));
        for name in html_files(&first) {
            let a = strip(fs::read_to_string(first.join(&name)).unwrap());
            let b = strip(fs::read_to_string(second.join(&name)).unwrap());
            assert_eq!(a, b, "{name} differs between runs");
        }
    }

    #[test]
    fn dropped_bookmarks_do_not_change_slugs() {
        let temp = tempdir().unwrap();
        let with = write_inputs(
            &temp,
            &[(
                "a.xbel",
                r#"<xbel><bookmark><title>x</title></bookmark><folder><title>A</title></folder></xbel>"#,
            )],
        );
        let out = temp.path().join("dist");

        let result = build(with, out.clone()).unwrap();

        assert_eq!(result.pages, 3);
        assert_eq!(result.bookmarks, 0);
        assert_eq!(html_files(&out), ["a-2.html", "a.html", "index.html"]);
    }

    #[test]
    fn reports_every_missing_input() {
        let temp = tempdir().unwrap();
        let mut inputs = write_inputs(&temp, &[("work.xbel", WORK)]);
        inputs.push(temp.path().join("gone.xbel"));
        inputs.push(temp.path().join("lost.xbel"));
        let out = temp.path().join("dist");

        let err = build(inputs, out.clone()).unwrap_err();

        match &err {
            BuildError::MissingInputs(paths) => assert_eq!(paths.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
        let message = err.to_string();
        assert!(message.starts_with("Missing input files: "));
        assert!(message.contains("gone.xbel"));
        assert!(message.contains("lost.xbel"));
        assert!(!out.exists());
    }

    #[test]
    fn malformed_input_aborts_before_writing() {
        let temp = tempdir().unwrap();
        let inputs = write_inputs(
            &temp,
            &[("work.xbel", WORK), ("bad.xbel", "<xbel><folder></xbel>")],
        );
        let out = temp.path().join("dist");

        let err = build(inputs, out.clone()).unwrap_err();

        assert!(matches!(err, BuildError::Xbel(XbelError::Parse { .. })));
        assert!(err.to_string().contains("bad.xbel"));
        assert!(!out.exists());
    }

    #[test]
    fn tiles_layout_references_theme_stylesheets() {
        let temp = tempdir().unwrap();
        let inputs = write_inputs(&temp, &[("work.xbel", WORK)]);
        let out = temp.path().join("dist");

        SiteBuilder::new(BuildConfig {
            inputs,
            output_dir: out.clone(),
            layout: Layout::Tiles,
            ..Default::default()
        })
        .build()
        .unwrap();

        let index = fs::read_to_string(out.join("index.html")).unwrap();
        assert!(index.contains("theme-select"));
        assert!(index.contains("base.css"));
        assert!(!out.join("styles").exists());
    }

    #[test]
    fn load_collection_wraps_inputs_in_order() {
        let temp = tempdir().unwrap();
        let inputs = write_inputs(&temp, &[("home.xbel", HOME), ("work.xbel", WORK)]);

        let root = load_collection(&inputs, "All").unwrap();

        assert_eq!(root.title, "All");
        let titles: Vec<_> = root.folders().map(|f| f.title.as_str()).collect();
        assert_eq!(titles, ["home", "Work"]);
    }
}
