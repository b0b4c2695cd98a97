use std::path::Path;
use std::sync::Arc;

use colored::Colorize;

use crate::{
    config::{MigrationConfig, ServeConfig, TemplateConfig},
    error::Result,
    github::GitHubSource,
    migration::MigrationGenerator,
    project::create_project,
    serve,
};

/// `bold new <name>`
pub async fn new_project(name: &str, config: &TemplateConfig) -> Result<()> {
    config.validate()?;

    println!("{} Creating Go Bold application '{}'...", "->".blue(), name.green());
    println!(
        "{} Downloading template '{}' from {}@{}...",
        "->".blue(),
        config.template,
        config.repo,
        config.branch
    );

    let source = Arc::new(GitHubSource::new(config));
    let report = create_project(name, Path::new("."), source).await?;

    println!(
        "{} Downloaded {} files ({} bytes)",
        "✓".green(),
        report.fetch.files_written.len(),
        report.fetch.total_bytes
    );
    match (&report.substitution, &report.substitution_warning) {
        (Some(subst), _) => println!(
            "{} Processed template variables in {} files",
            "✓".green(),
            subst.files_rewritten
        ),
        (None, Some(warning)) => eprintln!(
            "{} Warning: Could not process some template variables: {}",
            "!".yellow(),
            warning
        ),
        (None, None) => {}
    }

    println!();
    println!("{} Successfully created Go Bold application '{}'", "✓".green(), name);
    println!();
    println!("Get started:");
    println!("  cd {name}");
    println!("  go mod tidy");
    println!("  bold serve");
    Ok(())
}

/// `bold make migration <name>` / `bold make:migration <name>`
pub fn make_migration(name: &str, config: &MigrationConfig) -> Result<()> {
    let path = MigrationGenerator::new(config.clone()).generate(name)?;
    println!(
        "{} Migration created successfully: {}",
        "✓".green(),
        path.display().to_string().cyan()
    );
    Ok(())
}

/// `bold serve`
pub fn serve(config: &ServeConfig) -> Result<()> {
    serve::run(config)
}
