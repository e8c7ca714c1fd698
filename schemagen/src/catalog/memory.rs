//! In-memory catalog

use async_trait::async_trait;

use super::metadata::{
    ColumnDescriptor, ForeignKeyDescriptor, ReverseReferenceDescriptor, TableDescriptor,
};
use super::{to_like_pattern, SchemaCatalog};
use crate::error::Result;

#[derive(Debug, Clone)]
struct TableEntry {
    name: String,
    columns: Vec<ColumnDescriptor>,
    foreign_keys: Vec<ForeignKeyDescriptor>,
}

/// Catalog served from descriptors held in memory.
///
/// Follows the same ordering contract as [`super::MySqlCatalog`]: tables in
/// insertion order, columns in insertion order, foreign keys and reverse
/// references sorted by column name. Table patterns match like the `LIKE`
/// query: `_` is a single-character wildcard and case is ignored. Reverse
/// references are derived from the foreign keys registered on the other tables.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    tables: Vec<TableEntry>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table with its columns (ordinal order).
    pub fn with_table(mut self, name: impl Into<String>, columns: Vec<ColumnDescriptor>) -> Self {
        self.tables.push(TableEntry {
            name: name.into(),
            columns,
            foreign_keys: Vec::new(),
        });
        self
    }

    /// Register a foreign key on an already registered table.
    ///
    /// Keys for unknown tables are ignored.
    pub fn with_foreign_key(mut self, table: &str, foreign_key: ForeignKeyDescriptor) -> Self {
        if let Some(entry) = self.tables.iter_mut().find(|t| t.name == table) {
            entry.foreign_keys.push(foreign_key);
        }
        self
    }

    fn table(&self, name: &str) -> Option<&TableEntry> {
        self.tables.iter().find(|t| t.name == name)
    }
}

/// Match `name` the way MySQL `LIKE` does under a case-insensitive collation:
/// `%` is any run of characters and `_` exactly one.
fn like_match(like: &str, name: &str) -> bool {
    let pattern: Vec<char> = like.to_lowercase().chars().collect();
    let name: Vec<char> = name.to_lowercase().chars().collect();
    let (mut p, mut n) = (0, 0);
    // Last `%` seen and the name position it currently stands in for
    let mut backtrack: Option<(usize, usize)> = None;

    while n < name.len() {
        match pattern.get(p) {
            Some('%') => {
                backtrack = Some((p, n));
                p += 1;
            }
            Some(c) if *c == '_' || *c == name[n] => {
                p += 1;
                n += 1;
            }
            _ => match backtrack {
                Some((percent, start)) => {
                    backtrack = Some((percent, start + 1));
                    p = percent + 1;
                    n = start + 1;
                }
                None => return false,
            },
        }
    }
    pattern[p..].iter().all(|c| *c == '%')
}

#[async_trait]
impl SchemaCatalog for InMemoryCatalog {
    async fn list_tables(&self, pattern: &str) -> Result<Vec<TableDescriptor>> {
        let like = to_like_pattern(pattern);
        Ok(self
            .tables
            .iter()
            .filter(|t| like_match(&like, &t.name))
            .map(|t| TableDescriptor::new(t.name.clone()))
            .collect())
    }

    async fn list_columns(&self, table: &str) -> Result<Vec<ColumnDescriptor>> {
        Ok(self
            .table(table)
            .map(|t| t.columns.clone())
            .unwrap_or_default())
    }

    async fn list_foreign_keys(&self, table: &str) -> Result<Vec<ForeignKeyDescriptor>> {
        let mut keys = self
            .table(table)
            .map(|t| t.foreign_keys.clone())
            .unwrap_or_default();
        keys.sort_by(|a, b| a.column_name.cmp(&b.column_name));
        Ok(keys)
    }

    async fn list_reverse_references(
        &self,
        table: &str,
    ) -> Result<Vec<ReverseReferenceDescriptor>> {
        let mut references: Vec<ReverseReferenceDescriptor> = self
            .tables
            .iter()
            .flat_map(|t| {
                t.foreign_keys
                    .iter()
                    .filter(|fk| fk.referenced_table == table)
                    .map(|fk| {
                        ReverseReferenceDescriptor::new(
                            t.name.clone(),
                            fk.column_name.clone(),
                            fk.referenced_column.clone(),
                        )
                    })
            })
            .collect();
        references.sort_by(|a, b| a.column_name.cmp(&b.column_name));
        Ok(references)
    }
}
