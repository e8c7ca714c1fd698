//! Model generator - renders Eloquent models from catalog metadata

use tracing::debug;

use crate::catalog::{
    ColumnDescriptor, ForeignKeyDescriptor, ReverseReferenceDescriptor, SchemaCatalog,
};
use crate::config::GeneratorConfig;
use crate::error::Result;

use super::naming::to_model_class_name;
use super::relation::{plan_belongs_to, plan_has_many, PlannedRelation};
use super::{Artifact, ArtifactKind};

/// Columns listed in `$fillable` but commented out
const GUARDED_COLUMNS: &[&str] = &["id", "deleted_at"];

/// Renders one model class per table
pub struct ModelGenerator<'a> {
    config: &'a GeneratorConfig,
}

impl<'a> ModelGenerator<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self { config }
    }

    /// Read `table` from the catalog and render its model
    pub async fn generate<C>(&self, catalog: &C, table: &str) -> Result<Artifact>
    where
        C: SchemaCatalog + ?Sized,
    {
        let columns = catalog.list_columns(table).await?;
        let foreign_keys = catalog.list_foreign_keys(table).await?;
        let references = catalog.list_reverse_references(table).await?;

        Ok(Artifact {
            kind: ArtifactKind::Model,
            table: table.to_string(),
            file_name: Self::file_name(table),
            contents: self.render(table, &columns, &foreign_keys, &references),
        })
    }

    /// File name of the model for a table
    pub fn file_name(table: &str) -> String {
        format!("{}.php", to_model_class_name(table))
    }

    /// Render the model source
    pub fn render(
        &self,
        table: &str,
        columns: &[ColumnDescriptor],
        foreign_keys: &[ForeignKeyDescriptor],
        references: &[ReverseReferenceDescriptor],
    ) -> String {
        let class_name = to_model_class_name(table);
        let soft_deletes = columns.iter().any(|c| c.name == "deleted_at");
        let timestamps = columns.iter().any(|c| c.name == "created_at");
        debug!(
            "Rendering model {} (soft_deletes={}, timestamps={})",
            class_name, soft_deletes, timestamps
        );

        let mut code = String::new();
        code.push_str("<?php\n\n");
        code.push_str(&format!("namespace {};\n\n", self.config.model_namespace));
        code.push_str("use Illuminate\\Database\\Eloquent\\Model;\n");
        if soft_deletes {
            code.push_str("use Illuminate\\Database\\Eloquent\\SoftDeletes;\n");
        }
        code.push('\n');

        code.push_str(&format!("class {} extends Model\n{{\n", class_name));
        if soft_deletes {
            code.push_str("    use SoftDeletes;\n\n");
        }
        code.push_str(&format!("    protected $table = '{}';\n\n", table));
        code.push_str(&format!("    public $timestamps = {};\n\n", timestamps));
        code.push_str(&format!(
            "    protected $fillable = {};",
            render_fillable(columns)
        ));

        let relations: Vec<String> = plan_belongs_to(foreign_keys)
            .iter()
            .chain(plan_has_many(references).iter())
            .map(render_relation)
            .collect();
        if !relations.is_empty() {
            code.push_str("\n\n");
            code.push_str(&relations.join("\n\n"));
        }

        code.push_str("\n}\n");
        code
    }
}

/// Render the `$fillable` array, one entry per column in ordinal order
fn render_fillable(columns: &[ColumnDescriptor]) -> String {
    let lines: Vec<String> = columns
        .iter()
        .map(|column| {
            let prefix = if GUARDED_COLUMNS.contains(&column.name.as_str()) {
                "//"
            } else {
                ""
            };
            let comment = if column.comment.is_empty() {
                String::new()
            } else {
                format!(" /* {} */", column.comment)
            };
            format!(
                "        {}'{}', // ({}){}",
                prefix, column.name, column.column_type, comment
            )
        })
        .collect();

    format!("[\n{}\n    ]", lines.join("\n"))
}

fn render_relation(relation: &PlannedRelation) -> String {
    format!(
        "    public function {}()\n    {{\n        return $this->{}({}::class, '{}', '{}');\n    }}",
        relation.method_name,
        relation.relation_type.eloquent_method(),
        relation.related_class,
        relation.foreign_key,
        relation.owner_key
    )
}
