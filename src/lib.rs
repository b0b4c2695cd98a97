pub mod commands;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod github;
pub mod migration;
pub mod naming;
pub mod project;
pub mod serve;
pub mod source;
pub mod substitute;
pub mod types;

pub use config::{MigrationConfig, ServeConfig, TemplateConfig};
pub use error::{Result, ScaffoldError};
pub use fetcher::TreeFetcher;
pub use github::GitHubSource;
pub use migration::{MigrationGenerator, MigrationSpec, TemplateKind};
pub use naming::{infer_table_name, to_struct_name};
pub use project::{create_project, ProjectReport};
pub use source::ContentSource;
pub use substitute::{substitute, BinaryFilter, SubstitutionMap, SubstitutionReport};
pub use types::{EntryType, FetchReport, FileContent, RemoteEntry};
