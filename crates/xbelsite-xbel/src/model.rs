//! Bookmark tree types.

/// Title given to nested folders that have no usable `title` element.
pub const UNTITLED_FOLDER: &str = "Untitled folder";

/// A single bookmark entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bookmark {
    /// Display title (falls back to the href)
    pub title: String,

    /// Target URL
    pub href: String,

    /// Optional description
    pub desc: Option<String>,

    /// Raw `added` attribute
    pub added: Option<String>,

    /// Raw `modified` attribute
    pub modified: Option<String>,
}

/// A folder holding bookmarks and nested folders in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    /// Display title
    pub title: String,

    /// Child nodes, in document order
    pub children: Vec<Node>,
}

/// A child of a folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Folder(Folder),
    Bookmark(Bookmark),
}

impl Folder {
    /// Create a folder from a title and its children.
    pub fn new(title: impl Into<String>, children: Vec<Node>) -> Self {
        Self {
            title: title.into(),
            children,
        }
    }

    /// Direct child folders, in order.
    pub fn folders(&self) -> impl Iterator<Item = &Folder> {
        self.children.iter().filter_map(|child| match child {
            Node::Folder(folder) => Some(folder),
            Node::Bookmark(_) => None,
        })
    }

    /// Direct child bookmarks, in order.
    pub fn bookmarks(&self) -> impl Iterator<Item = &Bookmark> {
        self.children.iter().filter_map(|child| match child {
            Node::Bookmark(bookmark) => Some(bookmark),
            Node::Folder(_) => None,
        })
    }

    /// Number of folders in this subtree, including this one.
    pub fn folder_count(&self) -> usize {
        1 + self.folders().map(Folder::folder_count).sum::<usize>()
    }

    /// Number of bookmarks anywhere in this subtree.
    pub fn bookmark_count(&self) -> usize {
        self.bookmarks().count() + self.folders().map(Folder::bookmark_count).sum::<usize>()
    }
}
