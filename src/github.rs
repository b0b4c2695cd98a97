use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::{
    config::TemplateConfig,
    error::{Result, ScaffoldError},
    source::ContentSource,
    types::{EntryType, FileContent, RemoteEntry},
};

/// GitHub-backed template source
///
/// Walks a template using the repository contents API:
/// - `GET /repos/{repo}/contents/{template}?ref={branch}` for the root listing
/// - the `url` of each directory entry for nested listings
/// - the `download_url` of each file entry for raw bytes
#[derive(Clone)]
pub struct GitHubSource {
    client: Client,
    api_base: String,
    repo: String,
    template: String,
    branch: String,
}

#[derive(Deserialize)]
struct GitHubApiEntry {
    name: String,
    path: String,
    #[serde(rename = "type")]
    entry_type: String,
    url: Option<String>,
    download_url: Option<String>,
}

impl From<GitHubApiEntry> for RemoteEntry {
    fn from(e: GitHubApiEntry) -> Self {
        RemoteEntry {
            name: e.name,
            path: e.path,
            entry_type: match e.entry_type.as_str() {
                "dir" => EntryType::Dir,
                _ => EntryType::File, // symlinks and submodules go through download_url
            },
            content_url: e.url.unwrap_or_default(),
            download_url: e.download_url.unwrap_or_default(),
        }
    }
}

impl GitHubSource {
    /// Create a new GitHub source for the configured template
    pub fn new(config: &TemplateConfig) -> Self {
        let client = Client::builder()
            .user_agent(concat!("bold-cli/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            repo: config.repo.clone(),
            template: config.template.trim_matches('/').to_string(),
            branch: config.branch.clone(),
        }
    }

    /// Build the API URL for the root listing
    fn root_url(&self) -> String {
        format!(
            "{}/repos/{}/contents/{}?ref={}",
            self.api_base, self.repo, self.template, self.branch
        )
    }

    async fn get(&self, url: &str, listing: bool) -> Result<Response> {
        let mut request = self.client.get(url);
        if listing {
            request = request.header("Accept", "application/vnd.github.v3+json");
        }
        request.send().await.map_err(|source| ScaffoldError::Transport {
            url: url.to_string(),
            source,
        })
    }

    async fn read_listing(&self, url: &str, response: Response) -> Result<Vec<RemoteEntry>> {
        let body = response
            .bytes()
            .await
            .map_err(|source| ScaffoldError::Transport {
                url: url.to_string(),
                source,
            })?;
        decode_listing(url, &body)
    }
}

/// Decode a contents API listing body into remote entries
fn decode_listing(url: &str, body: &[u8]) -> Result<Vec<RemoteEntry>> {
    let api_entries: Vec<GitHubApiEntry> =
        serde_json::from_slice(body).map_err(|source| ScaffoldError::Decode {
            url: url.to_string(),
            source,
        })?;
    Ok(api_entries.into_iter().map(RemoteEntry::from).collect())
}

fn unexpected(url: &str, status: StatusCode) -> ScaffoldError {
    ScaffoldError::UnexpectedStatus {
        url: url.to_string(),
        status: status.as_u16(),
    }
}

#[async_trait]
impl ContentSource for GitHubSource {
    async fn list_root(&self) -> Result<Vec<RemoteEntry>> {
        let url = self.root_url();
        debug!(url = %url, "listing template root");

        let response = self.get(&url, true).await?;
        match response.status() {
            StatusCode::OK => self.read_listing(&url, response).await,
            StatusCode::NOT_FOUND => Err(ScaffoldError::TemplateNotFound {
                template: self.template.clone(),
            }),
            status => Err(unexpected(&url, status)),
        }
    }

    async fn list_directory(&self, entry: &RemoteEntry) -> Result<Vec<RemoteEntry>> {
        if entry.content_url.is_empty() {
            return Err(ScaffoldError::InvalidListing {
                message: format!("directory '{}' has no listing URL", entry.path),
            });
        }
        let url = entry.content_url.as_str();
        debug!(url = %url, "listing directory");

        let response = self.get(url, true).await?;
        match response.status() {
            StatusCode::OK => self.read_listing(url, response).await,
            status => Err(unexpected(url, status)),
        }
    }

    async fn fetch_file(&self, entry: &RemoteEntry) -> Result<FileContent> {
        if entry.download_url.is_empty() {
            return Err(ScaffoldError::InvalidListing {
                message: format!("file '{}' has no download URL", entry.path),
            });
        }
        let url = entry.download_url.as_str();

        let response = self.get(url, false).await?;
        match response.status() {
            StatusCode::OK => {
                let content = response
                    .bytes()
                    .await
                    .map_err(|source| ScaffoldError::Transport {
                        url: url.to_string(),
                        source,
                    })?;
                Ok(FileContent {
                    content,
                    source_url: url.to_string(),
                })
            }
            status => Err(unexpected(url, status)),
        }
    }

    fn identifier(&self) -> String {
        format!("github://{}/{}@{}", self.repo, self.template, self.branch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(template: &str, api_base: &str) -> GitHubSource {
        GitHubSource::new(&TemplateConfig {
            template: template.to_string(),
            repo: "go-bold/templates".to_string(),
            branch: "main".to_string(),
            api_base: api_base.to_string(),
        })
    }

    #[test]
    fn test_root_url() {
        let source = source("default", "https://api.github.com");
        assert_eq!(
            source.root_url(),
            "https://api.github.com/repos/go-bold/templates/contents/default?ref=main"
        );
    }

    #[test]
    fn test_root_url_trims_slashes() {
        let source = source("/api/", "http://127.0.0.1:1234/");
        assert_eq!(
            source.root_url(),
            "http://127.0.0.1:1234/repos/go-bold/templates/contents/api?ref=main"
        );
    }

    #[test]
    fn test_identifier() {
        let source = source("default", "https://api.github.com");
        assert_eq!(source.identifier(), "github://go-bold/templates/default@main");
    }

    #[test]
    fn test_decode_listing() {
        let body = br#"[
            {"name": "main.go", "path": "default/main.go", "type": "file",
             "url": "https://api/x/main.go", "download_url": "https://raw/main.go"},
            {"name": "app", "path": "default/app", "type": "dir",
             "url": "https://api/x/app", "download_url": null},
            {"name": "link", "path": "default/link", "type": "symlink",
             "url": "https://api/x/link", "download_url": "https://raw/link"}
        ]"#;

        let entries = decode_listing("https://api/x", body).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].entry_type, EntryType::File);
        assert_eq!(entries[0].download_url, "https://raw/main.go");
        assert_eq!(entries[1].entry_type, EntryType::Dir);
        assert_eq!(entries[1].content_url, "https://api/x/app");
        assert_eq!(entries[1].download_url, "");
        assert_eq!(entries[2].entry_type, EntryType::File);
    }

    #[test]
    fn test_decode_listing_rejects_non_array() {
        let body = br#"{"name": "main.go", "type": "file"}"#;
        match decode_listing("https://api/x", body) {
            Err(ScaffoldError::Decode { url, .. }) => assert_eq!(url, "https://api/x"),
            other => panic!("expected decode error, got {other:?}"),
        }
    }
}
