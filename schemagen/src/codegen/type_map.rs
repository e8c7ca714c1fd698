//! MySQL type keyword to schema-builder method and validation rule mapping

/// Schema builder method for a catalog type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderMethod {
    BigInteger,
    Binary,
    Boolean,
    Char,
    Date,
    DateTime,
    Decimal,
    Double,
    Enum,
    Float,
    Integer,
    Json,
    Jsonb,
    LongText,
    MediumInteger,
    MediumText,
    SmallInteger,
    String,
    Text,
    Time,
    Timestamp,
    TinyInteger,
}

impl BuilderMethod {
    /// Method name on the `Blueprint` builder
    pub fn method_name(&self) -> &'static str {
        match self {
            Self::BigInteger => "bigInteger",
            Self::Binary => "binary",
            Self::Boolean => "boolean",
            Self::Char => "char",
            Self::Date => "date",
            Self::DateTime => "dateTime",
            Self::Decimal => "decimal",
            Self::Double => "double",
            Self::Enum => "enum",
            Self::Float => "float",
            Self::Integer => "integer",
            Self::Json => "json",
            Self::Jsonb => "jsonb",
            Self::LongText => "longText",
            Self::MediumInteger => "mediumInteger",
            Self::MediumText => "mediumText",
            Self::SmallInteger => "smallInteger",
            Self::String => "string",
            Self::Text => "text",
            Self::Time => "time",
            Self::Timestamp => "timestamp",
            Self::TinyInteger => "tinyInteger",
        }
    }
}

/// Every catalog type with a direct builder method.
///
/// Adding support for a type is one line here.
pub const BUILDER_METHODS: &[(&str, BuilderMethod)] = &[
    ("bigint", BuilderMethod::BigInteger),
    ("blob", BuilderMethod::Binary),
    ("boolean", BuilderMethod::Boolean),
    ("char", BuilderMethod::Char),
    ("date", BuilderMethod::Date),
    ("datetime", BuilderMethod::DateTime),
    ("decimal", BuilderMethod::Decimal),
    ("double", BuilderMethod::Double),
    ("enum", BuilderMethod::Enum),
    ("float", BuilderMethod::Float),
    ("int", BuilderMethod::Integer),
    ("integer", BuilderMethod::Integer),
    ("json", BuilderMethod::Json),
    ("jsonb", BuilderMethod::Jsonb),
    ("longtext", BuilderMethod::LongText),
    ("mediumint", BuilderMethod::MediumInteger),
    ("mediumtext", BuilderMethod::MediumText),
    ("smallint", BuilderMethod::SmallInteger),
    ("text", BuilderMethod::Text),
    ("time", BuilderMethod::Time),
    ("timestamp", BuilderMethod::Timestamp),
    ("tinyint", BuilderMethod::TinyInteger),
    ("varchar", BuilderMethod::String),
];

/// Binary types the builder cannot express; emitted as raw `ALTER TABLE` statements
pub const RAW_BLOB_TYPES: &[&str] = &["longblob", "mediumblob"];

/// How a column is emitted in a migration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnMapping {
    /// A structured builder call
    Builder(BuilderMethod),
    /// A raw statement after the table is created, carrying the SQL type
    RawStatement(&'static str),
    /// Not emitted
    Unsupported,
}

/// Validation rule token for a catalog type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationRule {
    Integer,
    Numeric,
    Date,
    Boolean,
    Json,
}

impl ValidationRule {
    pub fn token(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Numeric => "numeric",
            Self::Date => "date",
            Self::Boolean => "boolean",
            Self::Json => "json",
        }
    }
}

/// Every catalog type with a type-specific validation rule
pub const VALIDATION_RULES: &[(&str, ValidationRule)] = &[
    ("int", ValidationRule::Integer),
    ("integer", ValidationRule::Integer),
    ("bigint", ValidationRule::Integer),
    ("smallint", ValidationRule::Integer),
    ("mediumint", ValidationRule::Integer),
    ("tinyint", ValidationRule::Integer),
    ("decimal", ValidationRule::Numeric),
    ("double", ValidationRule::Numeric),
    ("float", ValidationRule::Numeric),
    ("date", ValidationRule::Date),
    ("datetime", ValidationRule::Date),
    ("timestamp", ValidationRule::Date),
    ("boolean", ValidationRule::Boolean),
    ("json", ValidationRule::Json),
    ("jsonb", ValidationRule::Json),
];

/// Resolve catalog type keywords to builder methods and validation rules
pub struct TypeMapper;

impl TypeMapper {
    /// Builder method for a type keyword (case-insensitive)
    pub fn builder_method(data_type: &str) -> Option<BuilderMethod> {
        let data_type = data_type.to_lowercase();
        BUILDER_METHODS
            .iter()
            .find(|(name, _)| *name == data_type)
            .map(|(_, method)| *method)
    }

    /// How a column of this type is emitted in a migration
    pub fn column_mapping(data_type: &str) -> ColumnMapping {
        let data_type = data_type.to_lowercase();
        if let Some(raw) = RAW_BLOB_TYPES.iter().find(|t| **t == data_type) {
            return ColumnMapping::RawStatement(*raw);
        }
        match Self::builder_method(&data_type) {
            Some(method) => ColumnMapping::Builder(method),
            None => ColumnMapping::Unsupported,
        }
    }

    /// Validation rule for a type keyword (case-insensitive)
    pub fn validation_rule(data_type: &str) -> Option<ValidationRule> {
        let data_type = data_type.to_lowercase();
        VALIDATION_RULES
            .iter()
            .find(|(name, _)| *name == data_type)
            .map(|(_, rule)| *rule)
    }
}
