//! `information_schema` backed catalog

use async_trait::async_trait;
use mysql_async::prelude::*;
use mysql_async::{Pool as MysqlAsyncPool, Row as MySqlAsyncRow};
use tracing::debug;

use super::metadata::{
    ColumnDescriptor, ForeignKeyDescriptor, KeyClass, ReverseReferenceDescriptor,
    TableDescriptor,
};
use super::{to_like_pattern, SchemaCatalog};
use crate::error::{CodegenError, Result};

const TABLES_SQL: &str = "SELECT TABLE_NAME AS name
     FROM information_schema.tables
     WHERE TABLE_SCHEMA = ? AND TABLE_NAME LIKE ?";

const COLUMNS_SQL: &str = "SELECT
        COLUMN_NAME AS name,
        COLUMN_DEFAULT AS default_value,
        IS_NULLABLE AS nullable,
        DATA_TYPE AS data_type,
        CHARACTER_MAXIMUM_LENGTH AS max_length,
        NUMERIC_PRECISION AS `precision`,
        NUMERIC_SCALE AS scale,
        COLUMN_TYPE AS column_type,
        COLUMN_KEY AS column_key,
        COLUMN_COMMENT AS comment
     FROM information_schema.columns
     WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ?
     ORDER BY ORDINAL_POSITION";

const FOREIGN_KEYS_SQL: &str = "SELECT
        COLUMN_NAME AS column_name,
        REFERENCED_TABLE_NAME AS referenced_table,
        REFERENCED_COLUMN_NAME AS referenced_column
     FROM information_schema.KEY_COLUMN_USAGE
     WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ?
       AND REFERENCED_TABLE_NAME IS NOT NULL
     ORDER BY COLUMN_NAME";

const REVERSE_REFERENCES_SQL: &str = "SELECT
        TABLE_NAME AS table_name,
        COLUMN_NAME AS column_name,
        REFERENCED_COLUMN_NAME AS referenced_column
     FROM information_schema.KEY_COLUMN_USAGE
     WHERE REFERENCED_TABLE_SCHEMA = ? AND REFERENCED_TABLE_NAME = ?
     ORDER BY COLUMN_NAME";

/// Catalog reader over a MySQL connection pool.
///
/// Cloning is cheap: the inner pool is `Arc`-backed.
#[derive(Clone)]
pub struct MySqlCatalog {
    pool: MysqlAsyncPool,
    database: String,
}

impl MySqlCatalog {
    /// Create a catalog for `database` from a connection URL.
    ///
    /// No connection is opened until the first query.
    pub fn new(url: &str, database: impl Into<String>) -> Result<Self> {
        let opts = mysql_async::Opts::from_url(url)
            .map_err(|e| CodegenError::ConfigError(format!("Invalid database_url: {}", e)))?;
        Ok(Self::with_pool(MysqlAsyncPool::new(opts), database))
    }

    /// Create a catalog from an existing pool.
    pub fn with_pool(pool: MysqlAsyncPool, database: impl Into<String>) -> Self {
        Self {
            pool,
            database: database.into(),
        }
    }

    /// The schema this catalog reads.
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Disconnect and drop the pool.
    pub async fn disconnect(self) -> Result<()> {
        self.pool.disconnect().await?;
        Ok(())
    }

    async fn query(&self, sql: &str, name: &str) -> Result<Vec<MySqlAsyncRow>> {
        let mut conn = self.pool.get_conn().await?;
        let rows: Vec<MySqlAsyncRow> = conn.exec(sql, (self.database.as_str(), name)).await?;
        Ok(rows)
    }
}

/// Take a named column out of a catalog row.
fn take<T: FromValue>(row: &mut MySqlAsyncRow, column: &str) -> Result<T> {
    row.take_opt(column)
        .ok_or_else(|| CodegenError::Catalog(format!("Column not found: {}", column)))?
        .map_err(|e| CodegenError::Catalog(format!("Failed to decode {}: {:?}", column, e)))
}

/// Raw `information_schema.COLUMNS` values, before normalization
#[derive(Debug, Clone, Default)]
struct CatalogColumn {
    name: String,
    default_value: Option<String>,
    is_nullable: String,
    data_type: String,
    max_length: Option<u64>,
    precision: Option<u64>,
    scale: Option<u64>,
    column_type: String,
    column_key: Option<String>,
    comment: Option<String>,
}

impl CatalogColumn {
    fn from_row(mut row: MySqlAsyncRow) -> Result<Self> {
        Ok(Self {
            name: take(&mut row, "name")?,
            default_value: take(&mut row, "default_value")?,
            is_nullable: take(&mut row, "nullable")?,
            data_type: take(&mut row, "data_type")?,
            max_length: take(&mut row, "max_length")?,
            precision: take(&mut row, "precision")?,
            scale: take(&mut row, "scale")?,
            column_type: take(&mut row, "column_type")?,
            column_key: take(&mut row, "column_key")?,
            comment: take(&mut row, "comment")?,
        })
    }

    /// `YES`/`NO` to bool, lower-case type, NULL key and comment to their empty forms
    fn into_descriptor(self) -> ColumnDescriptor {
        ColumnDescriptor {
            name: self.name,
            default_value: self.default_value,
            nullable: self.is_nullable == "YES",
            data_type: self.data_type.to_lowercase(),
            max_length: self.max_length,
            precision: self.precision,
            scale: self.scale,
            column_type: self.column_type,
            key_class: KeyClass::from_catalog(self.column_key.as_deref().unwrap_or_default()),
            comment: self.comment.unwrap_or_default(),
        }
    }
}

fn column_from_row(row: MySqlAsyncRow) -> Result<ColumnDescriptor> {
    Ok(CatalogColumn::from_row(row)?.into_descriptor())
}

#[async_trait]
impl SchemaCatalog for MySqlCatalog {
    async fn list_tables(&self, pattern: &str) -> Result<Vec<TableDescriptor>> {
        let like = to_like_pattern(pattern);
        debug!("Listing tables in {} LIKE {:?}", self.database, like);

        self.query(TABLES_SQL, &like)
            .await?
            .into_iter()
            .map(|mut row| Ok(TableDescriptor::new(take::<String>(&mut row, "name")?)))
            .collect()
    }

    async fn list_columns(&self, table: &str) -> Result<Vec<ColumnDescriptor>> {
        self.query(COLUMNS_SQL, table)
            .await?
            .into_iter()
            .map(column_from_row)
            .collect()
    }

    async fn list_foreign_keys(&self, table: &str) -> Result<Vec<ForeignKeyDescriptor>> {
        self.query(FOREIGN_KEYS_SQL, table)
            .await?
            .into_iter()
            .map(|mut row| {
                Ok(ForeignKeyDescriptor {
                    column_name: take(&mut row, "column_name")?,
                    referenced_table: take(&mut row, "referenced_table")?,
                    referenced_column: take(&mut row, "referenced_column")?,
                })
            })
            .collect()
    }

    async fn list_reverse_references(
        &self,
        table: &str,
    ) -> Result<Vec<ReverseReferenceDescriptor>> {
        self.query(REVERSE_REFERENCES_SQL, table)
            .await?
            .into_iter()
            .map(|mut row| {
                Ok(ReverseReferenceDescriptor {
                    table_name: take(&mut row, "table_name")?,
                    column_name: take(&mut row, "column_name")?,
                    referenced_column: take(&mut row, "referenced_column")?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(is_nullable: &str, data_type: &str) -> CatalogColumn {
        CatalogColumn {
            name: "email".to_string(),
            is_nullable: is_nullable.to_string(),
            data_type: data_type.to_string(),
            column_type: "varchar(191)".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_nullable_flag() {
        assert!(raw("YES", "varchar").into_descriptor().nullable);
        assert!(!raw("NO", "varchar").into_descriptor().nullable);
        assert!(!raw("yes", "varchar").into_descriptor().nullable);
    }

    #[test]
    fn test_data_type_is_lowercased() {
        let column = raw("NO", "VARCHAR").into_descriptor();
        assert_eq!(column.data_type, "varchar");
        assert_eq!(column.column_type, "varchar(191)");
    }

    #[test]
    fn test_null_key_and_comment() {
        let column = raw("NO", "int").into_descriptor();
        assert_eq!(column.key_class, KeyClass::None);
        assert_eq!(column.comment, "");
        assert_eq!(column.default_value, None);
    }

    #[test]
    fn test_all_fields_carried_over() {
        let column = CatalogColumn {
            name: "price".to_string(),
            default_value: Some("0.00".to_string()),
            is_nullable: "NO".to_string(),
            data_type: "decimal".to_string(),
            max_length: None,
            precision: Some(10),
            scale: Some(2),
            column_type: "decimal(10,2)".to_string(),
            column_key: Some("UNI".to_string()),
            comment: Some("unit price".to_string()),
        }
        .into_descriptor();

        let expected = ColumnDescriptor::new("price", "decimal")
            .with_default("0.00")
            .with_precision(10, Some(2))
            .with_column_type("decimal(10,2)")
            .with_key_class(KeyClass::Unique)
            .with_comment("unit price");
        assert_eq!(column, expected);
    }

    #[test]
    fn test_queries_alias_every_decoded_column() {
        let columns = [
            "name",
            "default_value",
            "nullable",
            "data_type",
            "max_length",
            "`precision`",
            "scale",
            "column_type",
            "column_key",
            "comment",
        ];
        for alias in columns {
            assert!(COLUMNS_SQL.contains(&format!("AS {}", alias)), "{}", alias);
        }
        for alias in ["column_name", "referenced_table", "referenced_column"] {
            assert!(FOREIGN_KEYS_SQL.contains(&format!("AS {}", alias)), "{}", alias);
        }
        for alias in ["table_name", "column_name", "referenced_column"] {
            assert!(
                REVERSE_REFERENCES_SQL.contains(&format!("AS {}", alias)),
                "{}",
                alias
            );
        }
        assert!(TABLES_SQL.contains("AS name"));
    }
}
