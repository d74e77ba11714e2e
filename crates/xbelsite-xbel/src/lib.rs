//! XBEL bookmark parser.
//!
//! This crate reads XBEL documents, checks that they are well-formed XML, and
//! turns them into an ordered tree of folders and bookmarks.

pub mod model;
pub mod parser;
pub mod reader;

pub use model::{Bookmark, Folder, Node, UNTITLED_FOLDER};
pub use parser::{parse_xbel, parse_xbel_file, XbelError};
pub use reader::ParseError;
