//! CLI entry point for schemagen

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use schemagen::config::{defaults, GeneratorConfig};
use schemagen::{ArtifactKind, GenerationReport, MySqlCatalog, SchemaCatalog};

#[derive(Parser)]
#[command(name = "schemagen")]
#[command(about = "Generate Eloquent models, migrations and form requests from a MySQL schema")]
#[command(version)]
struct Cli {
    /// Path to configuration file (TOML format)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// MySQL connection URL (overrides config)
    #[arg(short, long, global = true)]
    url: Option<String>,

    /// Schema to inspect (defaults to the URL's database)
    #[arg(short, long, global = true)]
    database: Option<String>,

    /// Overwrite existing files without asking
    #[arg(short, long, global = true)]
    force: bool,

    /// Dry run - show what would be generated without writing files
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate Eloquent models
    Model {
        /// Table name, `*` matches any run of characters (e.g. `user*`)
        #[arg(default_value = defaults::TABLE_PATTERN)]
        table: String,
    },
    /// Generate create-table migrations
    Migration {
        #[arg(default_value = defaults::TABLE_PATTERN)]
        table: String,
    },
    /// Generate form request classes
    Request {
        #[arg(default_value = defaults::TABLE_PATTERN)]
        table: String,
    },
    /// Generate models, migrations and requests
    All {
        #[arg(default_value = defaults::TABLE_PATTERN)]
        table: String,
    },
    /// Inspect schema (show catalog metadata for debugging)
    Inspect {
        #[arg(default_value = defaults::TABLE_PATTERN)]
        table: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (before logging, so we can use config.log_level)
    let mut config = GeneratorConfig::load(cli.config.as_deref())?;

    // Initialize logging
    // Priority: RUST_LOG env var > config.log_level > default (debug for dev, info for release)
    let default_level = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };
    let log_level = config.log_level.as_deref().unwrap_or(default_level);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .init();

    // Apply CLI overrides
    if let Some(url) = cli.url {
        config.database_url = url;
    }
    if let Some(database) = cli.database {
        config.database = Some(database);
    }
    if cli.force {
        config.force = true;
    }
    if cli.dry_run {
        config.dry_run = true;
    }

    config.validate()?;

    let catalog = MySqlCatalog::new(&config.database_url, config.database_name()?)?;
    let result = run(&catalog, &config, cli.command).await;
    catalog.disconnect().await?;
    result
}

async fn run(catalog: &MySqlCatalog, config: &GeneratorConfig, command: Commands) -> Result<()> {
    let (pattern, kinds) = match command {
        Commands::Inspect { table } => return inspect_schema(catalog, &table).await,
        Commands::Model { table } => (table, vec![ArtifactKind::Model]),
        Commands::Migration { table } => (table, vec![ArtifactKind::Migration]),
        Commands::Request { table } => (table, vec![ArtifactKind::Request]),
        Commands::All { table } => (table, ArtifactKind::ALL.to_vec()),
    };

    let tables = catalog.list_tables(&pattern).await?;
    if tables.is_empty() {
        bail!("No tables found matching: {}", pattern);
    }

    println!("\nTables in {}:", catalog.database());
    for table in &tables {
        let exists = kinds
            .iter()
            .filter_map(|kind| kind.target_path(config, &table.name))
            .any(|path| path.exists());
        if exists {
            println!("  {} (exists)", table.name);
        } else {
            println!("  {}", table.name);
        }
    }
    println!();

    if !config.force && !config.dry_run && !confirm("Generate files for these tables?")? {
        return Ok(());
    }

    info!("Generating {:?} for {} tables", kinds, tables.len());
    let report = schemagen::generate_tables(catalog, config, &tables, &kinds).await?;
    print_report(config, &report);
    Ok(())
}

/// Ask a yes/no question on stdin; anything but `y`/`yes` is no
fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes"
    ))
}

fn print_report(config: &GeneratorConfig, report: &GenerationReport) {
    if config.dry_run {
        println!("Dry run mode - would generate:");
        for artifact in &report.artifacts {
            println!(
                "  {:<9} {}",
                artifact.kind,
                artifact.kind.output_dir(config).join(&artifact.file_name).display()
            );
        }
        return;
    }

    for path in &report.written {
        println!("Created: {}", path.display());
    }
    for path in &report.skipped {
        println!("Skipped: {} (already exists)", path.display());
    }
}

async fn inspect_schema(catalog: &MySqlCatalog, pattern: &str) -> Result<()> {
    let tables = catalog.list_tables(pattern).await?;
    if tables.is_empty() {
        bail!("No tables found matching: {}", pattern);
    }

    println!("Found {} tables:\n", tables.len());
    for table in &tables {
        println!("Table: {}", table.name);

        println!("  Columns:");
        for col in catalog.list_columns(&table.name).await? {
            let nullable = if col.nullable { "NULL" } else { "NOT NULL" };
            let default = match &col.default_value {
                Some(value) => format!(" DEFAULT {}", value),
                None => String::new(),
            };
            println!(
                "    - {} {} {}{} [{:?}]",
                col.name, col.column_type, nullable, default, col.key_class
            );
        }

        let foreign_keys = catalog.list_foreign_keys(&table.name).await?;
        if !foreign_keys.is_empty() {
            println!("  Foreign Keys:");
            for fk in &foreign_keys {
                println!(
                    "    - {} -> {}.{}",
                    fk.column_name, fk.referenced_table, fk.referenced_column
                );
            }
        }

        let references = catalog.list_reverse_references(&table.name).await?;
        if !references.is_empty() {
            println!("  Referenced By:");
            for reference in &references {
                println!(
                    "    - {}.{} -> {}",
                    reference.table_name, reference.column_name, reference.referenced_column
                );
            }
        }
        println!();
    }

    Ok(())
}
