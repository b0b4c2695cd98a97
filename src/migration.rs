use std::fs;
use std::io::Write;
use std::path::PathBuf;

use chrono::{DateTime, Local};
use tracing::info;

use crate::config::MigrationConfig;
use crate::error::{Result, ScaffoldError};
use crate::naming::{infer_table_name, to_struct_name};

const CREATE_TABLE_TEMPLATE: &str = include_str!("templates/create_table.go.liquid");
const ADD_COLUMN_TEMPLATE: &str = include_str!("templates/add_column.go.liquid");

/// Sortable, second-granularity prefix for migration file names
const TIMESTAMP_FORMAT: &str = "%Y_%m_%d_%H%M%S";

/// Which of the two migration templates a name maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    CreateTable,
    AlterTable,
}

impl TemplateKind {
    /// `add_..._to_...` alters an existing table; everything else creates one
    pub fn select(identifier: &str) -> Self {
        if identifier.starts_with("add_") && identifier.contains("_to_") {
            TemplateKind::AlterTable
        } else {
            TemplateKind::CreateTable
        }
    }

    pub fn source(self) -> &'static str {
        match self {
            TemplateKind::CreateTable => CREATE_TABLE_TEMPLATE,
            TemplateKind::AlterTable => ADD_COLUMN_TEMPLATE,
        }
    }
}

/// Everything derived from a migration name before rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationSpec {
    pub identifier: String,
    pub struct_name: String,
    pub table_name: String,
    pub timestamp: String,
    pub template_kind: TemplateKind,
}

impl MigrationSpec {
    pub fn new(identifier: &str, now: &DateTime<Local>) -> Self {
        Self {
            identifier: identifier.to_string(),
            struct_name: to_struct_name(identifier),
            table_name: infer_table_name(identifier),
            timestamp: now.format(TIMESTAMP_FORMAT).to_string(),
            template_kind: TemplateKind::select(identifier),
        }
    }

    pub fn file_name(&self, extension: &str) -> String {
        format!("{}_{}.{}", self.timestamp, self.identifier, extension)
    }
}

/// Render a Liquid migration template with `StructName` and `TableName`
pub fn render(template: &str, spec: &MigrationSpec) -> Result<String> {
    let parser = liquid::ParserBuilder::with_stdlib()
        .build()
        .map_err(|e| ScaffoldError::TemplateParse {
            message: e.to_string(),
        })?;
    let template = parser
        .parse(template)
        .map_err(|e| ScaffoldError::TemplateParse {
            message: e.to_string(),
        })?;

    let globals = liquid::object!({
        "StructName": spec.struct_name,
        "TableName": spec.table_name,
    });
    template
        .render(&globals)
        .map_err(|e| ScaffoldError::TemplateRender {
            message: e.to_string(),
        })
}

fn validate_identifier(identifier: &str) -> Result<()> {
    let reason = if identifier.is_empty() {
        "name must not be empty"
    } else if identifier.contains(['/', '\\']) {
        "name must not contain a path separator"
    } else if identifier == "." || identifier == ".." {
        "name must not be a relative directory"
    } else {
        return Ok(());
    };
    Err(ScaffoldError::InvalidMigrationName {
        name: identifier.to_string(),
        reason: reason.to_string(),
    })
}

/// Writes one migration file per call into the configured directory
pub struct MigrationGenerator {
    config: MigrationConfig,
}

impl MigrationGenerator {
    pub fn new(config: MigrationConfig) -> Self {
        Self { config }
    }

    /// Generate a migration stamped with the current local time
    pub fn generate(&self, identifier: &str) -> Result<PathBuf> {
        self.generate_at(identifier, &Local::now())
    }

    pub fn generate_at(&self, identifier: &str, now: &DateTime<Local>) -> Result<PathBuf> {
        validate_identifier(identifier)?;
        let spec = MigrationSpec::new(identifier, now);

        let dir = &self.config.directory;
        fs::create_dir_all(dir).map_err(|e| ScaffoldError::fs(dir, e))?;

        let content = render(spec.template_kind.source(), &spec)?;

        let path = dir.join(spec.file_name(&self.config.extension));
        let mut file = fs::File::create(&path).map_err(|e| ScaffoldError::fs(&path, e))?;
        file.write_all(content.as_bytes())
            .map_err(|e| ScaffoldError::fs(&path, e))?;

        info!(path = %path.display(), kind = ?spec.template_kind, "migration created");
        Ok(path)
    }
}
