//! Static site generator for XBEL bookmark collections.
//!
//! Renders every folder of a bookmark tree as its own HTML page, linked to its
//! parent and subfolders by relative filenames.

pub mod assets;
pub mod builder;
pub mod slug;
pub mod templates;
pub mod timestamp;

pub use builder::{load_collection, BuildConfig, BuildError, BuildResult, SiteBuilder};
pub use slug::{assign_slugs, slugify, Page, INDEX_PAGE};
pub use templates::{Layout, RenderOptions, TemplateEngine};
