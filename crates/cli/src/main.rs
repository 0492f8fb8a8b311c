//! `library` command-line entrypoint.
//!
//! Commands:
//! - library serve [--ephemeral]
//! - library migrate
//! - library migrations
//! - library routes

use anyhow::Context;
use clap::{Parser, Subcommand};
use library_kernel::settings::Settings;

/// Authors and books service
#[derive(Parser, Debug)]
#[command(name = "library")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP service
    Serve {
        /// Serve from a private in-memory store instead of the configured one
        #[arg(long)]
        ephemeral: bool,
    },

    /// Apply pending migrations to the configured store
    Migrate,

    /// List migrations recorded in the store
    Migrations,

    /// List the HTTP routes the service exposes
    Routes,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load().context("failed to load library settings")?;
    library_telemetry::init(&settings.telemetry)?;

    tracing::debug!(env = ?settings.environment, command = ?cli.command, "library CLI starting");

    match cli.command {
        Command::Serve { ephemeral } => {
            if ephemeral {
                settings.database.url = "sqlite::memory:".to_string();
                settings.database.run_migrations = true;
                let db = library_db::memory_pool()
                    .await
                    .context("failed to open in-memory store")?;
                tracing::warn!("serving from an in-memory store; data is lost on exit");
                library_app::app::serve_with(settings, db).await
            } else {
                library_app::app::serve(settings).await
            }
        }
        Command::Migrate => {
            let registry = library_app::app::registry()?;
            let db = library_app::app::connect(&settings).await?;
            let applied = library_app::app::migrate(&db, &registry).await?;
            db.close().await;

            println!("applied {applied} migration(s)");
            Ok(())
        }
        Command::Migrations => {
            let db = library_app::app::connect(&settings).await?;
            let records = library_db::applied_migrations(&db)
                .await
                .context("failed to read migration ledger")?;
            db.close().await;

            if records.is_empty() {
                println!("no migrations applied");
            }
            for record in records {
                println!(
                    "{:<10} {:<12} {}",
                    record.module,
                    record.id,
                    record.applied_at.to_rfc3339()
                );
            }
            Ok(())
        }
        Command::Routes => {
            let registry = library_app::app::registry()?;
            for (method, path) in documented_routes(&registry) {
                println!("{method:<7} {path}");
            }
            Ok(())
        }
    }
}

/// `(METHOD, path)` pairs from the merged OpenAPI document, sorted by path.
fn documented_routes(registry: &library_kernel::ModuleRegistry) -> Vec<(String, String)> {
    let spec = library_http::router::merged_openapi(registry);
    let mut routes: Vec<(String, String)> = spec["paths"]
        .as_object()
        .into_iter()
        .flatten()
        .flat_map(|(path, item)| {
            item.as_object()
                .into_iter()
                .flatten()
                .map(move |(method, _)| (method.to_uppercase(), path.clone()))
        })
        .collect();

    routes.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
    routes
}
