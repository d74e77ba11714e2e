//! XBEL document interpretation.

use std::fs;
use std::path::{Path, PathBuf};

use crate::model::{Bookmark, Folder, Node, UNTITLED_FOLDER};
use crate::reader::{read_document, Element, ParseError};

/// Errors that can occur when loading an XBEL file.
#[derive(Debug, thiserror::Error)]
pub enum XbelError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: ParseError,
    },
}

/// Parse an XBEL file into a folder tree.
///
/// The document's root element becomes the returned folder. Its title falls
/// back to the file stem when the document has no usable `title` element.
pub fn parse_xbel_file(path: &Path) -> Result<Folder, XbelError> {
    let source = fs::read(path).map_err(|source| XbelError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let fallback = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    let folder = parse_xbel(&source, &fallback).map_err(|source| XbelError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(
        "Parsed {}: {} folders, {} bookmarks",
        path.display(),
        folder.folder_count(),
        folder.bookmark_count()
    );

    Ok(folder)
}

/// Parse an XBEL document held in memory.
pub fn parse_xbel(source: &[u8], fallback_title: &str) -> Result<Folder, ParseError> {
    let root = read_document(source)?;
    Ok(folder_from(&root, fallback_title))
}

fn folder_from(element: &Element, fallback_title: &str) -> Folder {
    let title = child_text(element, "title").unwrap_or_else(|| fallback_title.to_string());

    let children = element
        .children
        .iter()
        .filter_map(|child| match child.name.as_str() {
            "folder" => Some(Node::Folder(folder_from(child, UNTITLED_FOLDER))),
            "bookmark" => bookmark_from(child).map(Node::Bookmark),
            _ => None,
        })
        .collect();

    Folder { title, children }
}

/// Bookmarks without an href are dropped.
fn bookmark_from(element: &Element) -> Option<Bookmark> {
    let href = element.attr("href").filter(|href| !href.is_empty())?;

    Some(Bookmark {
        title: child_text(element, "title").unwrap_or_else(|| href.to_string()),
        href: href.to_string(),
        desc: child_text(element, "desc"),
        added: element.attr("added").map(str::to_string),
        modified: element.attr("modified").map(str::to_string),
    })
}

/// Trimmed text of the first matching child, if non-blank.
fn child_text(element: &Element, name: &str) -> Option<String> {
    let text = element.child(name)?.text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
