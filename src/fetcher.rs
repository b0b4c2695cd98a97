use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::fs;
use tracing::{debug, info};

use crate::{
    error::{Result, ScaffoldError},
    source::ContentSource,
    types::{FetchReport, RemoteEntry},
};

/// Materializes a remote template tree on local disk
///
/// The walk is depth-first in listing order, driven by an explicit stack of
/// pending `(entry, parent path)` pairs so nesting depth never grows the call
/// stack. The first failure aborts the walk; files already written are left
/// in place
pub struct TreeFetcher {
    source: Arc<dyn ContentSource>,
}

impl TreeFetcher {
    pub fn new(source: Arc<dyn ContentSource>) -> Self {
        Self { source }
    }

    /// Fetch the whole template into `local_root`, which must not exist yet
    pub async fn fetch(&self, local_root: &Path) -> Result<FetchReport> {
        ensure_absent(local_root)?;

        info!(source = %self.source.identifier(), target = %local_root.display(), "fetching template");

        // Not wrapped: a missing template must surface as TemplateNotFound.
        let root_entries = self.source.list_root().await?;

        fs::create_dir_all(local_root)
            .await
            .map_err(|e| ScaffoldError::fs(local_root, e))?;

        let mut report = FetchReport::default();
        let mut pending: Vec<(RemoteEntry, PathBuf)> = Vec::new();
        push_children(&mut pending, root_entries, Path::new(""));

        while let Some((entry, parent)) = pending.pop() {
            let relative = parent.join(checked_name(&entry)?);
            let local_path = local_root.join(&relative);

            if entry.is_dir() {
                debug!(path = %entry.path, "creating directory");
                fs::create_dir_all(&local_path)
                    .await
                    .map_err(|e| ScaffoldError::fetch(&entry.path, ScaffoldError::fs(&local_path, e)))?;
                report.directories_created += 1;

                let children = self
                    .source
                    .list_directory(&entry)
                    .await
                    .map_err(|e| ScaffoldError::fetch(&entry.path, e))?;
                push_children(&mut pending, children, &relative);
            } else {
                debug!(path = %entry.path, "downloading file");
                let file = self
                    .source
                    .fetch_file(&entry)
                    .await
                    .map_err(|e| ScaffoldError::fetch(&entry.path, e))?;
                write_file(&local_path, &file.content)
                    .await
                    .map_err(|e| ScaffoldError::fetch(&entry.path, e))?;

                report.total_bytes += file.content.len() as u64;
                report.files_written.push(local_path);
            }
        }

        info!(
            files = report.files_written.len(),
            directories = report.directories_created,
            bytes = report.total_bytes,
            "template fetched"
        );
        Ok(report)
    }
}

/// Pre-flight check: the target must not exist in any form
pub fn ensure_absent(path: &Path) -> Result<()> {
    match path.try_exists() {
        Ok(false) => Ok(()),
        Ok(true) => Err(ScaffoldError::DirectoryExists {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(ScaffoldError::fs(path, e)),
    }
}

/// Push in reverse so the stack pops entries in listing order
fn push_children(pending: &mut Vec<(RemoteEntry, PathBuf)>, entries: Vec<RemoteEntry>, parent: &Path) {
    pending.extend(
        entries
            .into_iter()
            .rev()
            .map(|entry| (entry, parent.to_path_buf())),
    );
}

/// Reject names that would escape or collapse the mirrored hierarchy
fn checked_name(entry: &RemoteEntry) -> Result<&str> {
    let name = entry.name.as_str();
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(ScaffoldError::fetch(
            &entry.path,
            ScaffoldError::InvalidListing {
                message: format!("unsafe entry name '{name}'"),
            },
        ));
    }
    Ok(name)
}

async fn write_file(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| ScaffoldError::fs(parent, e))?;
    }
    fs::write(path, content)
        .await
        .map_err(|e| ScaffoldError::fs(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FileContent;
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::sync::Mutex;

    /// Records every call so the walk order can be asserted
    struct RecordingSource {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ContentSource for RecordingSource {
        async fn list_root(&self) -> Result<Vec<RemoteEntry>> {
            self.calls.lock().unwrap().push("list:/".to_string());
            Ok(vec![
                RemoteEntry::dir("a", "t/a", "a"),
                RemoteEntry::file("z.txt", "t/z.txt", "z"),
                RemoteEntry::dir("b", "t/b", "b"),
            ])
        }

        async fn list_directory(&self, entry: &RemoteEntry) -> Result<Vec<RemoteEntry>> {
            self.calls.lock().unwrap().push(format!("list:{}", entry.path));
            Ok(match entry.name.as_str() {
                "a" => vec![
                    RemoteEntry::file("1.txt", "t/a/1.txt", "a1"),
                    RemoteEntry::file("2.txt", "t/a/2.txt", "a2"),
                ],
                _ => vec![],
            })
        }

        async fn fetch_file(&self, entry: &RemoteEntry) -> Result<FileContent> {
            self.calls.lock().unwrap().push(format!("get:{}", entry.path));
            Ok(FileContent {
                content: Bytes::from(entry.download_url.clone()),
                source_url: entry.download_url.clone(),
            })
        }

        fn identifier(&self) -> String {
            "recording".to_string()
        }
    }

    #[tokio::test]
    async fn test_walk_is_depth_first_in_listing_order() {
        let source = Arc::new(RecordingSource {
            calls: Mutex::new(Vec::new()),
        });
        let temp = tempfile::TempDir::new().unwrap();
        let root = temp.path().join("app");

        let report = TreeFetcher::new(source.clone()).fetch(&root).await.unwrap();

        assert_eq!(
            *source.calls.lock().unwrap(),
            vec![
                "list:/",
                "list:t/a",
                "get:t/a/1.txt",
                "get:t/a/2.txt",
                "get:t/z.txt",
                "list:t/b",
            ]
        );
        assert_eq!(report.directories_created, 2);
        assert_eq!(report.files_written.len(), 3);
        assert_eq!(report.total_bytes, 5);
        assert!(root.join("b").is_dir());
    }

    #[test]
    fn test_checked_name_rejects_traversal() {
        for name in ["", ".", "..", "../etc", "a/b", "a\\b"] {
            let entry = RemoteEntry::file(name, "t/x", "x");
            assert!(checked_name(&entry).is_err(), "{name:?} should be rejected");
        }
        let entry = RemoteEntry::file(".env.example", "t/.env.example", "x");
        assert_eq!(checked_name(&entry).unwrap(), ".env.example");
    }

    #[test]
    fn test_ensure_absent() {
        let temp = tempfile::TempDir::new().unwrap();
        assert!(ensure_absent(&temp.path().join("new")).is_ok());
        assert!(matches!(
            ensure_absent(temp.path()),
            Err(ScaffoldError::DirectoryExists { .. })
        ));
    }
}
