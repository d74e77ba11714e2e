//! Output filename assignment for folder pages.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use xbelsite_xbel::Folder;

/// Filename reserved for the collection root.
pub const INDEX_PAGE: &str = "index.html";

/// Extension shared by every generated page.
const PAGE_EXTENSION: &str = "html";

/// Base used when a title has no usable characters.
const FALLBACK_SLUG: &str = "folder";

static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[^a-z0-9]+").expect("valid slug pattern"));

/// A folder paired with its output filename.
///
/// Mirrors the folder tree: `subpages` holds one page per child folder, in
/// the same order as `folder.folders()`.
#[derive(Debug)]
pub struct Page<'a> {
    /// The folder rendered on this page
    pub folder: &'a Folder,
    /// Output filename, relative to the site root
    pub slug: String,
    /// Pages of the child folders
    pub subpages: Vec<Page<'a>>,
}

impl Page<'_> {
    /// Number of pages in this subtree, including this one.
    pub fn page_count(&self) -> usize {
        1 + self.subpages.iter().map(Page::page_count).sum::<usize>()
    }

    /// Slugs of every page in pre-order.
    pub fn slugs(&self) -> Vec<&str> {
        let mut slugs = vec![self.slug.as_str()];
        for page in &self.subpages {
            slugs.extend(page.slugs());
        }
        slugs
    }
}

/// Assign a unique filename to every folder under `root`.
///
/// The root always receives [`INDEX_PAGE`]. Other folders are named after
/// their titles in pre-order, so the result only depends on the tree.
pub fn assign_slugs(root: &Folder) -> Page<'_> {
    let mut allocator = SlugAllocator::default();
    allocator.used.insert(INDEX_PAGE.to_string());
    plan(root, INDEX_PAGE.to_string(), &mut allocator)
}

fn plan<'a>(folder: &'a Folder, slug: String, allocator: &mut SlugAllocator) -> Page<'a> {
    let subpages = folder
        .folders()
        .map(|child| {
            let slug = allocator.allocate(&slugify(&child.title));
            plan(child, slug, allocator)
        })
        .collect();

    Page {
        folder,
        slug,
        subpages,
    }
}

#[derive(Default)]
struct SlugAllocator {
    used: HashSet<String>,
}

impl SlugAllocator {
    fn allocate(&mut self, base: &str) -> String {
        let mut candidate = format!("{base}.{PAGE_EXTENSION}");
        let mut counter = 2;
        while self.used.contains(&candidate) {
            candidate = format!("{base}-{counter}.{PAGE_EXTENSION}");
            counter += 1;
        }
        self.used.insert(candidate.clone());
        candidate
    }
}

/// Convert a folder title to a filesystem-safe base name.
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let slug = NON_ALPHANUMERIC.replace_all(&lowered, "-");
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug.to_string()
    }
}
