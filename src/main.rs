use std::path::PathBuf;

use bold_cli::{commands, config, MigrationConfig, ServeConfig, TemplateConfig};
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "bold",
    version,
    about = "Go Bold CLI: create applications, generate migrations, run the dev server"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new Go Bold application
    New {
        /// Project name
        name: String,
        /// Template type
        #[arg(short, long, env = "BOLD_TEMPLATE", default_value = config::DEFAULT_TEMPLATE)]
        template: String,
        /// Template repository
        #[arg(long, env = "BOLD_TEMPLATE_REPO", default_value = config::DEFAULT_TEMPLATE_REPO)]
        repo: String,
        /// Template repository branch
        #[arg(long, env = "BOLD_TEMPLATE_BRANCH", default_value = config::DEFAULT_TEMPLATE_BRANCH)]
        branch: String,
        /// Content API base URL
        #[arg(long, env = "BOLD_API_BASE", default_value = config::DEFAULT_API_BASE, hide = true)]
        api_base: String,
    },
    /// Generate application components
    Make {
        #[command(subcommand)]
        kind: MakeKind,
    },
    /// Create a new migration file
    #[command(name = "make:migration")]
    MakeMigration {
        /// Migration name (e.g. create_users_table)
        name: String,
    },
    /// Start the development server
    Serve {
        /// Port to run the server on
        #[arg(short, long, env = "BOLD_PORT", default_value_t = 8000)]
        port: u16,
        /// Enable hot reload
        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        hot: bool,
    },
}

#[derive(Subcommand)]
enum MakeKind {
    /// Create a new migration file in database/migrations
    Migration {
        /// Migration name (e.g. create_users_table)
        name: String,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::New {
            name,
            template,
            repo,
            branch,
            api_base,
        } => {
            let config = TemplateConfig {
                template,
                repo,
                branch,
                api_base,
            };
            commands::new_project(&name, &config).await
        }
        Commands::Make {
            kind: MakeKind::Migration { name },
        }
        | Commands::MakeMigration { name } => {
            commands::make_migration(&name, &MigrationConfig::default())
        }
        Commands::Serve { port, hot } => commands::serve(&ServeConfig {
            port,
            hot_reload: hot,
            project_root: PathBuf::from("."),
        }),
    };

    if let Err(e) = result {
        eprintln!("{}", format!("Error: {e}").red());
        std::process::exit(e.exit_code());
    }
}
