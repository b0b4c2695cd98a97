use std::path::PathBuf;

use crate::error::{Result, ScaffoldError};

pub const DEFAULT_TEMPLATE: &str = "default";
pub const DEFAULT_TEMPLATE_REPO: &str = "go-bold/templates";
pub const DEFAULT_TEMPLATE_BRANCH: &str = "main";
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Where `bold new` downloads the project template from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateConfig {
    /// Template directory inside the repository
    pub template: String,
    /// Repository in `owner/name` form
    pub repo: String,
    /// Branch, tag or commit to fetch from
    pub branch: String,
    /// Base URL of the content API
    pub api_base: String,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
            repo: DEFAULT_TEMPLATE_REPO.to_string(),
            branch: DEFAULT_TEMPLATE_BRANCH.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

impl TemplateConfig {
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| Err(ScaffoldError::InvalidConfig { message });

        match self.repo.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {}
            _ => {
                return invalid(format!(
                    "repository '{}' must be of the form owner/name",
                    self.repo
                ))
            }
        }
        if self.branch.trim().is_empty() {
            return invalid("branch must not be empty".to_string());
        }
        if self.api_base.trim().is_empty() {
            return invalid("API base URL must not be empty".to_string());
        }
        Ok(())
    }
}

/// Where and how migration files are generated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationConfig {
    /// Output directory, relative to the working directory
    pub directory: PathBuf,
    /// Source file extension without the leading dot
    pub extension: String,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("database/migrations"),
            extension: "go".to_string(),
        }
    }
}

/// Options for `bold serve`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServeConfig {
    pub port: u16,
    pub hot_reload: bool,
    pub project_root: PathBuf,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            hot_reload: true,
            project_root: PathBuf::from("."),
        }
    }
}
