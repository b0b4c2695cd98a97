use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use colored::Colorize;
use tracing::{debug, warn};

use crate::config::ServeConfig;
use crate::error::{Result, ScaffoldError};

const AIR_CONFIG: &str = include_str!("templates/air.toml");
const AIR_CONFIG_FILE: &str = ".air.toml";

/// A project root has both `go.mod` and `main.go`
pub fn is_project(root: &Path) -> bool {
    root.join("go.mod").is_file() && root.join("main.go").is_file()
}

/// Write the default `.air.toml` unless one exists. Returns whether it wrote
pub fn ensure_air_config(root: &Path) -> Result<bool> {
    let path = root.join(AIR_CONFIG_FILE);
    if path.exists() {
        return Ok(false);
    }
    fs::write(&path, AIR_CONFIG).map_err(|e| ScaffoldError::fs(&path, e))?;
    Ok(true)
}

fn go_run_command() -> Command {
    let mut cmd = Command::new("go");
    cmd.args(["run", "main.go"]);
    cmd
}

/// Pick `air` when hot reload is on and it is usable, `go run` otherwise
fn launch_command(config: &ServeConfig, air: Option<PathBuf>) -> Command {
    if !config.hot_reload {
        return go_run_command();
    }
    println!("{} Hot reload enabled", "->".blue());

    let Some(air) = air else {
        eprintln!("{} Hot reload requires 'air' to be installed", "!".yellow());
        eprintln!("  go install github.com/air-verse/air@latest");
        eprintln!("Starting without hot reload...");
        return go_run_command();
    };

    match ensure_air_config(&config.project_root) {
        Ok(written) => {
            if written {
                debug!("wrote default {AIR_CONFIG_FILE}");
            }
            Command::new(air)
        }
        Err(e) => {
            warn!(error = %e, "cannot create {AIR_CONFIG_FILE}");
            eprintln!("{} Cannot create {AIR_CONFIG_FILE}", "!".yellow());
            eprintln!("Starting server without hot reload...");
            go_run_command()
        }
    }
}

/// Run the development server in the foreground until it exits
pub fn run(config: &ServeConfig) -> Result<()> {
    let root = &config.project_root;
    if !is_project(root) {
        return Err(ScaffoldError::Process {
            message: "This is not a Go Bold project directory.\nRun 'bold new myapp' to create a new project".to_string(),
        });
    }

    println!(
        "{}",
        format!("Starting Go Bold development server on port {}...", config.port)
            .blue()
            .bold()
    );

    let mut cmd = launch_command(config, which::which("air").ok());
    cmd.current_dir(root).env("PORT", config.port.to_string());

    let program = cmd.get_program().to_string_lossy().to_string();
    debug!(program = %program, "launching");

    let status = cmd.status().map_err(|e| ScaffoldError::Process {
        message: format!("failed to start '{program}': {e}"),
    })?;

    if !status.success() {
        return Err(ScaffoldError::ChildFailed {
            program,
            code: status.code(),
        });
    }
    Ok(())
}
