/*!
 * Core types and data structures for repo2tree
 */

use serde::Serialize;

/// Fixed description carried by every generated document
pub const DESCRIPTION: &str = "Formatted repository tree for AI models";

/// A node of the serialized repository tree
///
/// Both variants serialize as `{"type", "path", "children"}`; for files the
/// `children` field carries the file content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TreeNode {
    /// Directory with its filtered entries in enumeration order
    Directory {
        /// Path relative to the walk root, `/`-separated
        path: String,
        /// Directory contents
        children: Vec<TreeNode>,
    },
    /// Included file
    File {
        /// Path relative to the walk root, `/`-separated
        path: String,
        /// File content, minified when requested
        #[serde(rename = "children")]
        content: String,
    },
}

impl TreeNode {
    /// Relative path of the node
    pub fn path(&self) -> &str {
        match self {
            Self::Directory { path, .. } | Self::File { path, .. } => path,
        }
    }
}

/// Top-level document handed to the serializer
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryDocument<'a> {
    /// Name of the walked directory
    pub repository_name: &'a str,
    /// Always [`DESCRIPTION`]
    pub description: &'static str,
    /// Children of the walk root
    pub tree: &'a [TreeNode],
}

impl<'a> RepositoryDocument<'a> {
    /// Wrap a tree with the document metadata
    pub fn new(repository_name: &'a str, tree: &'a [TreeNode]) -> Self {
        Self {
            repository_name,
            description: DESCRIPTION,
            tree,
        }
    }
}
