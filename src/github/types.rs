//! GitHub API type definitions

use serde::{Deserialize, Serialize};

/// GitHub repository information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubRepo {
    pub name: String,
    pub full_name: String,
    pub default_branch: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// GitHub branch information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubBranch {
    pub name: String,
    pub commit: BranchCommit,
}

/// Commit a branch points at
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchCommit {
    pub sha: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// Recursive tree listing for a commit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubTree {
    pub sha: String,
    /// Set when the listing exceeded GitHub's size limit and entries
    /// were omitted
    #[serde(default)]
    pub truncated: bool,
    pub tree: Vec<TreeEntry>,
}

/// Kind of object a tree entry refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeEntryType {
    Blob,
    Tree,
    Commit,
    #[serde(other)]
    Unknown,
}

/// One entry of a tree listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub entry_type: TreeEntryType,
    pub sha: String,
    #[serde(default)]
    pub size: Option<u64>,
    /// API URL of the blob (or subtree)
    #[serde(default)]
    pub url: Option<String>,
}

/// Blob payload from the git data API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubBlob {
    pub content: String,
    pub encoding: String,
}

/// Error body GitHub returns with non-2xx responses
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubErrorBody {
    pub message: String,
}

/// A ref resolved to the commit it currently points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoDetails {
    pub git_ref: String,
    pub commit_sha: String,
}
