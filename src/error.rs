use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while scaffolding projects and migrations
#[derive(Error, Debug)]
pub enum ScaffoldError {
    #[error("directory '{}' already exists", .path.display())]
    DirectoryExists { path: PathBuf },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("template '{template}' not found")]
    TemplateNotFound { template: String },

    #[error("{url} returned HTTP {status}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("failed to parse listing from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid listing entry: {message}")]
    InvalidListing { message: String },

    #[error("filesystem error at '{}': {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to fetch '{path}': {source}")]
    Fetch {
        path: String,
        #[source]
        source: Box<ScaffoldError>,
    },

    #[error("error parsing template: {message}")]
    TemplateParse { message: String },

    #[error("error writing migration: {message}")]
    TemplateRender { message: String },

    #[error("invalid migration name '{name}': {reason}")]
    InvalidMigrationName { name: String, reason: String },

    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("{message}")]
    Process { message: String },

    #[error("'{program}' exited with {}", exit_description(.code))]
    ChildFailed { program: String, code: Option<i32> },
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("status {c}"),
        None => "a signal".to_string(),
    }
}

impl ScaffoldError {
    /// Exit code `main` should terminate with for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            ScaffoldError::ChildFailed { code: Some(c), .. } if *c != 0 => *c,
            _ => 1,
        }
    }

    pub(crate) fn fs(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScaffoldError::Filesystem {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn fetch(path: impl Into<String>, source: ScaffoldError) -> Self {
        ScaffoldError::Fetch {
            path: path.into(),
            source: Box::new(source),
        }
    }
}

/// Result type alias for scaffolding operations
pub type Result<T> = std::result::Result<T, ScaffoldError>;
