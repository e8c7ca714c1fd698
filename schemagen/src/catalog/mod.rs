//! Schema catalog access
//!
//! The catalog is the only I/O boundary of the generators. [`SchemaCatalog`]
//! exposes the four metadata reads; [`MySqlCatalog`] answers them from
//! `information_schema`, [`InMemoryCatalog`] from descriptors held in memory.

mod memory;
mod metadata;
mod mysql;

pub use memory::InMemoryCatalog;
pub use metadata::*;
pub use mysql::MySqlCatalog;

use async_trait::async_trait;

use crate::error::Result;

/// Read access to a database catalog, scoped to one schema fixed at construction.
///
/// Every call issues a fresh query; nothing is cached between calls. Failures
/// are returned as-is, without retry.
#[async_trait]
pub trait SchemaCatalog: Send + Sync {
    /// Tables whose name matches `pattern`, where `*` means any run of characters.
    /// No match yields an empty list.
    async fn list_tables(&self, pattern: &str) -> Result<Vec<TableDescriptor>>;

    /// Columns of `table` in ordinal order.
    async fn list_columns(&self, table: &str) -> Result<Vec<ColumnDescriptor>>;

    /// Outgoing foreign keys of `table`, ordered by column name.
    async fn list_foreign_keys(&self, table: &str) -> Result<Vec<ForeignKeyDescriptor>>;

    /// Columns of other tables referencing `table`, ordered by column name.
    async fn list_reverse_references(
        &self,
        table: &str,
    ) -> Result<Vec<ReverseReferenceDescriptor>>;
}

/// Translate a `*` wildcard pattern into SQL `LIKE` syntax.
///
/// `%` and `_` already in the pattern keep their `LIKE` meaning.
pub fn to_like_pattern(pattern: &str) -> String {
    pattern.replace('*', "%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_like_pattern() {
        assert_eq!(to_like_pattern("*"), "%");
        assert_eq!(to_like_pattern("user*"), "user%");
        assert_eq!(to_like_pattern("*_log*"), "%_log%");
        assert_eq!(to_like_pattern("orders"), "orders");
    }
}
