use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Raw bytes of a downloaded template file
#[derive(Debug, Clone)]
pub struct FileContent {
    /// The raw bytes of the file
    pub content: bytes::Bytes,
    /// The URL the bytes were downloaded from
    pub source_url: String,
}

/// One node of a remote template listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEntry {
    /// Name of the file or folder
    pub name: String,
    /// Path inside the remote repository
    pub path: String,
    /// Type of entry
    pub entry_type: EntryType,
    /// Listing URL for this entry's children (directories)
    pub content_url: String,
    /// Raw download URL (empty for directories)
    pub download_url: String,
}

impl RemoteEntry {
    pub fn file(name: &str, path: &str, download_url: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            entry_type: EntryType::File,
            content_url: String::new(),
            download_url: download_url.to_string(),
        }
    }

    pub fn dir(name: &str, path: &str, content_url: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            entry_type: EntryType::Dir,
            content_url: content_url.to_string(),
            download_url: String::new(),
        }
    }

    pub fn is_dir(&self) -> bool {
        self.entry_type == EntryType::Dir
    }
}

/// Type of remote entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    File,
    Dir,
}

/// Summary of a completed template fetch
#[derive(Debug, Clone, Default)]
pub struct FetchReport {
    /// Local paths of every file written, in creation order
    pub files_written: Vec<PathBuf>,
    /// Number of directories created below the project root
    pub directories_created: usize,
    /// Sum of all downloaded file sizes
    pub total_bytes: u64,
}
