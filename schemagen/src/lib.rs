//! schemagen: Generate Laravel models, migrations and form requests from a live MySQL schema
//!
//! This crate provides both a CLI tool and a library. It reads table metadata
//! from `information_schema` and renders, per table:
//!
//! - An Eloquent model with fillable fields and `belongsTo` / `hasMany` relations
//! - A `Schema::create` migration with typed columns and foreign keys
//! - A `FormRequest` class with per-column validation rules
//!
//! # Library Usage
//!
//! ```rust,ignore
//! use schemagen::{ArtifactKind, GeneratorConfig, MySqlCatalog};
//!
//! #[tokio::main]
//! async fn main() -> schemagen::Result<()> {
//!     let config = GeneratorConfig::default_with_url("mysql://root@localhost:3306/shop");
//!     let catalog = MySqlCatalog::new(&config.database_url, config.database_name()?)?;
//!
//!     let report = schemagen::generate(&catalog, &config, "order*", &ArtifactKind::ALL).await?;
//!     println!("wrote {} files", report.written.len());
//!
//!     catalog.disconnect().await
//! }
//! ```
//!
//! Or with the builder:
//!
//! ```rust,ignore
//! schemagen::GeneratorBuilder::new("mysql://root@localhost:3306/shop")
//!     .output_root("../my-laravel-app")
//!     .models_only()
//!     .generate("user*")
//!     .await?;
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! schemagen --url mysql://root@localhost:3306/shop all 'order*'
//! ```

pub mod catalog;
pub mod codegen;
pub mod config;
pub mod error;
pub mod writer;

use std::path::{Path, PathBuf};

use tracing::{debug, info};

pub use catalog::{InMemoryCatalog, MySqlCatalog, SchemaCatalog, TableDescriptor};
pub use codegen::{Artifact, ArtifactKind};
pub use self::config::GeneratorConfig;
pub use error::{CodegenError, Result};
pub use writer::WriteOutcome;

use codegen::{MigrationGenerator, ModelGenerator, RequestGenerator};

/// Summary of one generation run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    /// Tables generated for, in catalog order
    pub tables: Vec<String>,
    /// Files written
    pub written: Vec<PathBuf>,
    /// Files left alone because they already existed
    pub skipped: Vec<PathBuf>,
    /// Every rendered artifact, in generation order
    pub artifacts: Vec<Artifact>,
}

impl GenerationReport {
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Main entry point for generation
///
/// Renders the requested `kinds` for every table matching `pattern` and
/// writes them under the configured output directories, unless
/// `config.dry_run` is set. No matching table is not an error: the report is
/// simply empty.
pub async fn generate<C>(
    catalog: &C,
    config: &GeneratorConfig,
    pattern: &str,
    kinds: &[ArtifactKind],
) -> Result<GenerationReport>
where
    C: SchemaCatalog + ?Sized,
{
    let tables = catalog.list_tables(pattern).await?;
    info!("Found {} tables matching {:?}", tables.len(), pattern);

    generate_tables(catalog, config, &tables, kinds).await
}

/// Generate for an already resolved table list
///
/// Used when the tables were listed (and confirmed) beforehand, so the run
/// covers exactly those tables.
pub async fn generate_tables<C>(
    catalog: &C,
    config: &GeneratorConfig,
    tables: &[TableDescriptor],
    kinds: &[ArtifactKind],
) -> Result<GenerationReport>
where
    C: SchemaCatalog + ?Sized,
{
    let mut report = GenerationReport {
        tables: tables.iter().map(|t| t.name.clone()).collect(),
        ..Default::default()
    };

    let models = ModelGenerator::new(config);
    let requests = RequestGenerator::new(config);
    // One clock per run keeps migration names strictly increasing
    let mut migrations = MigrationGenerator::new(config);

    for table in tables {
        for kind in ArtifactKind::ALL.iter().filter(|k| kinds.contains(*k)) {
            let artifact = match kind {
                ArtifactKind::Model => models.generate(catalog, &table.name).await?,
                ArtifactKind::Migration => migrations.generate(catalog, &table.name).await?,
                ArtifactKind::Request => requests.generate(catalog, &table.name).await?,
            };
            debug!("Rendered {} for {} -> {}", kind, table.name, artifact.file_name);

            if !config.dry_run {
                match writer::write_artifact(kind.output_dir(config), &artifact, config.force)? {
                    WriteOutcome::Created(path) => {
                        info!("Created: {}", path.display());
                        report.written.push(path);
                    }
                    WriteOutcome::Skipped(path) => report.skipped.push(path),
                }
            }
            report.artifacts.push(artifact);
        }
    }

    info!(
        "Generation complete: {} written, {} skipped",
        report.written.len(),
        report.skipped.len()
    );
    Ok(report)
}

/// Builder for generating against a MySQL database without managing the catalog
pub struct GeneratorBuilder {
    config: GeneratorConfig,
    kinds: Vec<ArtifactKind>,
}

impl GeneratorBuilder {
    /// Create a new builder for the given connection URL
    pub fn new(database_url: impl Into<String>) -> Self {
        Self::from_config(GeneratorConfig::default_with_url(database_url))
    }

    /// Start from an existing configuration
    pub fn from_config(config: GeneratorConfig) -> Self {
        Self {
            config,
            kinds: ArtifactKind::ALL.to_vec(),
        }
    }

    /// Inspect this schema instead of the URL's database
    pub fn database(mut self, name: &str) -> Self {
        self.config.database = Some(name.to_string());
        self
    }

    /// Resolve all output directories against a project root
    pub fn output_root(mut self, root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        self.config.model_output_path = root.join(&self.config.model_output_path);
        self.config.request_output_path = root.join(&self.config.request_output_path);
        self.config.migration_output_path = root.join(&self.config.migration_output_path);
        self
    }

    /// Generate only models
    pub fn models_only(mut self) -> Self {
        self.kinds = vec![ArtifactKind::Model];
        self
    }

    /// Generate only migrations
    pub fn migrations_only(mut self) -> Self {
        self.kinds = vec![ArtifactKind::Migration];
        self
    }

    /// Generate only form requests
    pub fn requests_only(mut self) -> Self {
        self.kinds = vec![ArtifactKind::Request];
        self
    }

    /// Overwrite existing files
    pub fn force(mut self) -> Self {
        self.config.force = true;
        self
    }

    /// Enable dry run mode (render without writing files)
    pub fn dry_run(mut self) -> Self {
        self.config.dry_run = true;
        self
    }

    /// The configuration the builder will run with
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Connect, generate for every table matching `pattern`, and disconnect
    pub async fn generate(self, pattern: &str) -> Result<GenerationReport> {
        self.config.validate()?;
        let catalog = MySqlCatalog::new(&self.config.database_url, self.config.database_name()?)?;
        let report = generate(&catalog, &self.config, pattern, &self.kinds).await;
        catalog.disconnect().await?;
        report
    }
}
