//! Request generator - renders form-request validation classes

use std::collections::HashMap;

use crate::catalog::{ColumnDescriptor, ForeignKeyDescriptor, SchemaCatalog};
use crate::config::GeneratorConfig;
use crate::error::Result;

use super::naming::to_request_class_name;
use super::type_map::TypeMapper;
use super::{Artifact, ArtifactKind};

/// Renders one validation class per table
pub struct RequestGenerator<'a> {
    config: &'a GeneratorConfig,
}

impl<'a> RequestGenerator<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self { config }
    }

    /// Read `table` from the catalog and render its request class
    pub async fn generate<C>(&self, catalog: &C, table: &str) -> Result<Artifact>
    where
        C: SchemaCatalog + ?Sized,
    {
        let columns = catalog.list_columns(table).await?;
        let foreign_keys = catalog.list_foreign_keys(table).await?;

        Ok(Artifact {
            kind: ArtifactKind::Request,
            table: table.to_string(),
            file_name: Self::file_name(table),
            contents: self.render(table, &columns, &foreign_keys),
        })
    }

    pub fn file_name(table: &str) -> String {
        format!("{}.php", to_request_class_name(table))
    }

    /// Render the request source. The `id` column gets no rule.
    pub fn render(
        &self,
        table: &str,
        columns: &[ColumnDescriptor],
        foreign_keys: &[ForeignKeyDescriptor],
    ) -> String {
        let referenced_tables: HashMap<&str, &str> = foreign_keys
            .iter()
            .map(|fk| (fk.column_name.as_str(), fk.referenced_table.as_str()))
            .collect();

        let mut code = String::new();
        code.push_str("<?php\n\n");
        code.push_str(&format!("namespace {};\n\n", self.config.request_namespace));
        code.push_str("use Illuminate\\Foundation\\Http\\FormRequest;\n\n");
        code.push_str(&format!(
            "class {} extends FormRequest\n{{\n",
            to_request_class_name(table)
        ));
        code.push_str("    public function authorize(): bool\n    {\n        return true;\n    }\n\n");
        code.push_str("    public function rules(): array\n    {\n        return [\n");
        for column in columns.iter().filter(|c| !c.is_id()) {
            let referenced = referenced_tables.get(column.name.as_str()).copied();
            code.push_str(&format!(
                "            '{}' => '{}',\n",
                column.name,
                rules_for(column, referenced)
            ));
        }
        code.push_str("        ];\n    }\n}\n");
        code
    }
}

/// Pipe-joined rule string for one column
fn rules_for(column: &ColumnDescriptor, referenced_table: Option<&str>) -> String {
    let presence = if column.nullable { "nullable" } else { "required" };
    let mut rules = vec![presence.to_string()];

    if let Some(rule) = TypeMapper::validation_rule(&column.data_type) {
        rules.push(rule.token().to_string());
    }

    if column.name.eq_ignore_ascii_case("email") {
        rules.push("email".to_string());
    }

    // Applies to every type, not only strings
    if let Some(length) = column.max_length.filter(|l| *l > 0) {
        rules.push(format!("max:{}", length));
    }

    // Existence is always checked against `id`
    if let Some(table) = referenced_table {
        rules.push(format!("exists:{},id", table));
    }

    rules.join("|")
}
