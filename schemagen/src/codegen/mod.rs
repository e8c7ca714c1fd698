//! Code generation module

mod migration_generator;
mod model_generator;
mod naming;
mod relation;
mod request_generator;
mod type_map;

pub use migration_generator::*;
pub use model_generator::*;
pub use naming::*;
pub use relation::*;
pub use request_generator::*;
pub use type_map::*;

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::GeneratorConfig;

/// Kind of generated file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Model,
    Migration,
    Request,
}

impl ArtifactKind {
    /// Every kind, in generation order
    pub const ALL: [ArtifactKind; 3] = [
        ArtifactKind::Model,
        ArtifactKind::Migration,
        ArtifactKind::Request,
    ];

    /// Directory the kind is written to
    pub fn output_dir<'c>(&self, config: &'c GeneratorConfig) -> &'c Path {
        match self {
            ArtifactKind::Model => &config.model_output_path,
            ArtifactKind::Migration => &config.migration_output_path,
            ArtifactKind::Request => &config.request_output_path,
        }
    }

    /// Path the artifact for `table` is written to, when it does not depend on
    /// the run. Migrations carry a timestamp, so they have none.
    pub fn target_path(&self, config: &GeneratorConfig, table: &str) -> Option<PathBuf> {
        let file_name = match self {
            ArtifactKind::Model => ModelGenerator::file_name(table),
            ArtifactKind::Request => RequestGenerator::file_name(table),
            ArtifactKind::Migration => return None,
        };
        Some(self.output_dir(config).join(file_name))
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ArtifactKind::Model => "model",
            ArtifactKind::Migration => "migration",
            ArtifactKind::Request => "request",
        };
        f.pad(label)
    }
}

/// A rendered file, not yet written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    /// Table the file was generated from
    pub table: String,
    pub file_name: String,
    pub contents: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_dirs() {
        let config = GeneratorConfig::default();
        assert_eq!(
            ArtifactKind::Model.output_dir(&config),
            PathBuf::from("app/Models")
        );
        assert_eq!(
            ArtifactKind::Migration.output_dir(&config),
            PathBuf::from("database/migrations")
        );
        assert_eq!(
            ArtifactKind::Request.output_dir(&config),
            PathBuf::from("app/Http/Requests")
        );
    }

    #[test]
    fn test_target_paths() {
        let config = GeneratorConfig::default();
        assert_eq!(
            ArtifactKind::Model.target_path(&config, "order_item"),
            Some(PathBuf::from("app/Models/OrderItem.php"))
        );
        assert_eq!(
            ArtifactKind::Request.target_path(&config, "order_item"),
            Some(PathBuf::from("app/Http/Requests/OrderItemRequest.php"))
        );
        assert_eq!(ArtifactKind::Migration.target_path(&config, "order_item"), None);
    }

    #[test]
    fn test_kind_labels() {
        let labels: Vec<String> = ArtifactKind::ALL.iter().map(|k| k.to_string()).collect();
        assert_eq!(labels, vec!["model", "migration", "request"]);
    }
}
