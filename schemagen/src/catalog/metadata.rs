//! Descriptors materialized from catalog rows

use serde::{Deserialize, Serialize};

/// A table returned by a pattern query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDescriptor {
    /// Table name
    pub name: String,
}

impl TableDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Index participation of a column, from `COLUMN_KEY`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyClass {
    Primary,
    Unique,
    Multiple,
    #[default]
    None,
}

impl KeyClass {
    /// Map the catalog flag (`PRI`, `UNI`, `MUL`, empty)
    pub fn from_catalog(flag: &str) -> Self {
        match flag {
            "PRI" => Self::Primary,
            "UNI" => Self::Unique,
            "MUL" => Self::Multiple,
            _ => Self::None,
        }
    }
}

/// Metadata for a column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name, unique within its table
    pub name: String,

    /// Default value expression (if any)
    pub default_value: Option<String>,

    /// Whether the column is nullable (`IS_NULLABLE = 'YES'`)
    pub nullable: bool,

    /// Lower-case type keyword (e.g., "varchar", "int", "enum")
    pub data_type: String,

    /// Character length for string types
    pub max_length: Option<u64>,

    /// Numeric precision
    pub precision: Option<u64>,

    /// Numeric scale
    pub scale: Option<u64>,

    /// Full type as written in the catalog (e.g., "enum('a','b')", "int(11)")
    pub column_type: String,

    /// Index participation
    pub key_class: KeyClass,

    /// Column comment, empty when absent
    pub comment: String,
}

impl ColumnDescriptor {
    /// A non-nullable column with no length, default or comment.
    ///
    /// `column_type` starts out equal to `data_type`.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        let data_type = data_type.into().to_lowercase();
        Self {
            name: name.into(),
            default_value: None,
            nullable: false,
            column_type: data_type.clone(),
            data_type,
            max_length: None,
            precision: None,
            scale: None,
            key_class: KeyClass::None,
            comment: String::new(),
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn with_max_length(mut self, max_length: u64) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn with_precision(mut self, precision: u64, scale: Option<u64>) -> Self {
        self.precision = Some(precision);
        self.scale = scale;
        self
    }

    pub fn with_column_type(mut self, column_type: impl Into<String>) -> Self {
        self.column_type = column_type.into();
        self
    }

    pub fn with_default(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }

    pub fn with_key_class(mut self, key_class: KeyClass) -> Self {
        self.key_class = key_class;
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Whether this is the conventional `id` primary key column
    pub fn is_id(&self) -> bool {
        self.name == "id"
    }
}

/// An outgoing reference: a column of this table pointing at another table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyDescriptor {
    /// Column name in this table
    pub column_name: String,

    /// Referenced table name
    pub referenced_table: String,

    /// Referenced column name
    pub referenced_column: String,
}

impl ForeignKeyDescriptor {
    pub fn new(
        column_name: impl Into<String>,
        referenced_table: impl Into<String>,
        referenced_column: impl Into<String>,
    ) -> Self {
        Self {
            column_name: column_name.into(),
            referenced_table: referenced_table.into(),
            referenced_column: referenced_column.into(),
        }
    }
}

/// An incoming reference: a column of another table pointing at this table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReverseReferenceDescriptor {
    /// The referencing table
    pub table_name: String,

    /// Column on the referencing table
    pub column_name: String,

    /// Column on the queried table
    pub referenced_column: String,
}

impl ReverseReferenceDescriptor {
    pub fn new(
        table_name: impl Into<String>,
        column_name: impl Into<String>,
        referenced_column: impl Into<String>,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            column_name: column_name.into(),
            referenced_column: referenced_column.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_class_from_catalog() {
        assert_eq!(KeyClass::from_catalog("PRI"), KeyClass::Primary);
        assert_eq!(KeyClass::from_catalog("UNI"), KeyClass::Unique);
        assert_eq!(KeyClass::from_catalog("MUL"), KeyClass::Multiple);
        assert_eq!(KeyClass::from_catalog(""), KeyClass::None);
    }

    #[test]
    fn test_column_builder_defaults() {
        let col = ColumnDescriptor::new("price", "DECIMAL").with_precision(10, Some(2));
        assert_eq!(col.data_type, "decimal");
        assert_eq!(col.column_type, "decimal");
        assert!(!col.nullable);
        assert_eq!(col.precision, Some(10));
        assert_eq!(col.scale, Some(2));
        assert!(!col.is_id());
        assert!(ColumnDescriptor::new("id", "int").is_id());
    }
}
