use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    error::{Result, ScaffoldError},
    fetcher::{ensure_absent, TreeFetcher},
    source::ContentSource,
    substitute::{substitute, BinaryFilter, SubstitutionMap, SubstitutionReport},
    types::FetchReport,
};

/// Outcome of `create_project`
#[derive(Debug)]
pub struct ProjectReport {
    /// Root directory of the new project
    pub root: PathBuf,
    pub fetch: FetchReport,
    /// Present when placeholder substitution completed
    pub substitution: Option<SubstitutionReport>,
    /// Why substitution did not complete; the project still counts as created
    pub substitution_warning: Option<String>,
}

fn validate_project_name(name: &str) -> Result<()> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(ScaffoldError::InvalidConfig {
            message: format!("'{name}' is not a valid project name"),
        });
    }
    Ok(())
}

async fn run_substitution(
    root: PathBuf,
    vars: SubstitutionMap,
) -> std::result::Result<SubstitutionReport, String> {
    let task = tokio::task::spawn_blocking(move || {
        substitute(&root, &vars, &BinaryFilter::default())
    });
    match task.await {
        Ok(result) => result.map_err(|e| e.to_string()),
        Err(e) => Err(format!("substitution task failed: {e}")),
    }
}

/// Create `<parent>/<name>` from the remote template and fill in placeholders
///
/// Fetch failures are fatal and leave whatever was already written on disk.
/// Substitution walks the tree with blocking `std::fs` calls, so it runs on
/// tokio's blocking pool and is awaited before returning. Its failures are
/// logged and reported in [`ProjectReport::substitution_warning`] instead
pub async fn create_project(
    name: &str,
    parent: &Path,
    source: Arc<dyn ContentSource>,
) -> Result<ProjectReport> {
    validate_project_name(name)?;
    let root = parent.join(name);
    ensure_absent(&root)?;

    let vars = SubstitutionMap::for_project(name)?;

    let fetch = TreeFetcher::new(source).fetch(&root).await?;

    let (substitution, substitution_warning) = match run_substitution(root.clone(), vars).await {
        Ok(report) => (Some(report), None),
        Err(message) => {
            warn!(error = %message, "could not process some template variables");
            (None, Some(message))
        }
    };

    info!(project = %name, root = %root.display(), "project created");
    Ok(ProjectReport {
        root,
        fetch,
        substitution,
        substitution_warning,
    })
}
