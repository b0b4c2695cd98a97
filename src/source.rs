use async_trait::async_trait;

use crate::{
    error::Result,
    types::{FileContent, RemoteEntry},
};

/// Core abstraction for remote template sources
///
/// Implementors expose a hierarchical listing API: the root listing, the
/// listing of any directory entry it returned, and raw file downloads
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// List the entries at the template root
    ///
    /// Returns `ScaffoldError::TemplateNotFound` if the template doesn't exist
    async fn list_root(&self) -> Result<Vec<RemoteEntry>>;

    /// List the children of a directory entry
    async fn list_directory(&self, entry: &RemoteEntry) -> Result<Vec<RemoteEntry>>;

    /// Download the raw bytes of a file entry
    async fn fetch_file(&self, entry: &RemoteEntry) -> Result<FileContent>;

    /// Get a human-readable identifier for this source (for logging/debugging)
    fn identifier(&self) -> String;
}
