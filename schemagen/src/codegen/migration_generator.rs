//! Migration generator - renders `Schema::create` migrations from catalog metadata

use chrono::{Local, NaiveDateTime, TimeDelta, Timelike};
use tracing::{debug, warn};

use crate::catalog::{ColumnDescriptor, ForeignKeyDescriptor, KeyClass, SchemaCatalog};
use crate::config::GeneratorConfig;
use crate::error::Result;

use super::type_map::{BuilderMethod, ColumnMapping, TypeMapper};
use super::{Artifact, ArtifactKind};

/// Timestamp format of migration file names
const TIMESTAMP_FORMAT: &str = "%Y_%m_%d_%H%M%S";

/// Issues strictly increasing migration timestamps.
///
/// Within one run, a timestamp that would not be later than the previous one
/// is bumped to the previous one plus a second, so file names never collide
/// and keep their creation order.
#[derive(Debug, Default)]
pub struct MigrationClock {
    last: Option<NaiveDateTime>,
}

impl MigrationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next timestamp based on the local wall clock
    pub fn next_timestamp(&mut self) -> String {
        self.next_after(Local::now().naive_local())
    }

    /// Next timestamp given the current time
    pub fn next_after(&mut self, now: NaiveDateTime) -> String {
        let now = now.with_nanosecond(0).unwrap_or(now);
        let issued = match self.last {
            Some(last) if now <= last => last + TimeDelta::seconds(1),
            _ => now,
        };
        self.last = Some(issued);
        issued.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Renders one create-table migration per table
pub struct MigrationGenerator<'a> {
    config: &'a GeneratorConfig,
    clock: MigrationClock,
}

impl<'a> MigrationGenerator<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self::with_clock(config, MigrationClock::new())
    }

    pub fn with_clock(config: &'a GeneratorConfig, clock: MigrationClock) -> Self {
        Self { config, clock }
    }

    /// Read `table` from the catalog and render its migration
    pub async fn generate<C>(&mut self, catalog: &C, table: &str) -> Result<Artifact>
    where
        C: SchemaCatalog + ?Sized,
    {
        let columns = catalog.list_columns(table).await?;
        let foreign_keys = catalog.list_foreign_keys(table).await?;

        Ok(Artifact {
            kind: ArtifactKind::Migration,
            table: table.to_string(),
            file_name: self.file_name(table),
            contents: self.render(table, &columns, &foreign_keys),
        })
    }

    /// File name for a table: `<timestamp>_create_<table>_table.php`
    pub fn file_name(&mut self, table: &str) -> String {
        migration_file_name(&self.clock.next_timestamp(), table)
    }

    /// Render the migration source. The `id` column is replaced by `$table->id()`.
    pub fn render(
        &self,
        table: &str,
        columns: &[ColumnDescriptor],
        foreign_keys: &[ForeignKeyDescriptor],
    ) -> String {
        let mut statements = Vec::new();
        let mut raw_statements = Vec::new();

        for column in columns.iter().filter(|c| !c.is_id()) {
            match TypeMapper::column_mapping(&column.data_type) {
                ColumnMapping::Builder(method) => {
                    statements.push(format!(
                        "            {};",
                        column_definition(table, column, method)
                    ));
                }
                ColumnMapping::RawStatement(sql_type) => {
                    raw_statements.push(format!(
                        "        DB::statement('ALTER TABLE ' . $this->table . ' ADD {} {}');",
                        column.name,
                        sql_type.to_uppercase()
                    ));
                }
                ColumnMapping::Unsupported => {
                    debug!(
                        "Skipping {}.{}: unsupported type {}",
                        table, column.name, column.data_type
                    );
                }
            }
        }

        let mut code = String::new();
        code.push_str("<?php\n\n");
        code.push_str("use Illuminate\\Database\\Migrations\\Migration;\n");
        code.push_str("use Illuminate\\Database\\Schema\\Blueprint;\n");
        if !raw_statements.is_empty() {
            code.push_str("use Illuminate\\Support\\Facades\\DB;\n");
        }
        code.push_str("use Illuminate\\Support\\Facades\\Schema;\n\n");

        code.push_str("return new class extends Migration\n{\n");
        code.push_str(&format!("    protected $table = '{}';\n\n", table));
        code.push_str("    public function up(): void\n    {\n");
        code.push_str("        Schema::create($this->table, function (Blueprint $table) {\n");
        code.push_str("            $table->id();\n");
        for statement in &statements {
            code.push_str(statement);
            code.push('\n');
        }

        if !foreign_keys.is_empty() {
            code.push('\n');
            for foreign_key in foreign_keys {
                code.push_str(&self.foreign_key_definition(foreign_key));
                code.push('\n');
            }
        }
        code.push_str("        });\n");

        // Types without a builder method are added once the table exists
        if !raw_statements.is_empty() {
            code.push('\n');
            for statement in &raw_statements {
                code.push_str(statement);
                code.push('\n');
            }
        }
        code.push_str("    }\n\n");

        code.push_str("    public function down(): void\n    {\n");
        code.push_str("        Schema::dropIfExists($this->table);\n");
        code.push_str("    }\n};\n");
        code
    }

    fn foreign_key_definition(&self, foreign_key: &ForeignKeyDescriptor) -> String {
        format!(
            "            $table->foreign('{}')->references('{}')->on('{}')->onUpdate('{}')->onDelete('{}');",
            foreign_key.column_name,
            foreign_key.referenced_column,
            foreign_key.referenced_table,
            self.config.foreign_key_on_update,
            self.config.foreign_key_on_delete
        )
    }
}

/// Build a migration file name from a timestamp and table name
pub fn migration_file_name(timestamp: &str, table: &str) -> String {
    format!("{}_create_{}_table.php", timestamp, table.to_lowercase())
}

/// Build `$table->method('name', args...)` plus modifiers for a column
fn column_definition(table: &str, column: &ColumnDescriptor, method: BuilderMethod) -> String {
    let mut args = vec![format!("'{}'", column.name)];

    match method {
        BuilderMethod::Char | BuilderMethod::String => {
            if let Some(length) = column.max_length.filter(|l| *l > 0) {
                args.push(length.to_string());
            }
        }
        BuilderMethod::Decimal | BuilderMethod::Double => {
            if let (Some(precision), Some(scale)) =
                (column.precision.filter(|p| *p > 0), column.scale)
            {
                args.push(precision.to_string());
                args.push(scale.to_string());
            }
        }
        BuilderMethod::Enum => {
            let values = enum_values(&column.column_type).unwrap_or_else(|| {
                warn!(
                    "Column {}.{} has malformed enum type {:?}; emitting it unchanged",
                    table, column.name, column.column_type
                );
                column.column_type.as_str()
            });
            args.push(format!("[{}]", values));
        }
        _ => {}
    }

    let mut definition = format!("$table->{}({})", method.method_name(), args.join(", "));

    if column.nullable {
        definition.push_str("->nullable()");
    }

    if column.key_class == KeyClass::Unique {
        definition.push_str("->unique()");
    }

    if let Some(default) = column.default_value.as_deref().filter(|d| !d.is_empty()) {
        if is_numeric(default) {
            definition.push_str(&format!("->default({})", default));
        } else {
            definition.push_str(&format!("->default('{}')", escape_single_quoted(default)));
        }
    }

    definition
}

/// The literal list inside `enum(...)`, verbatim
/// e.g., "enum('a','b')" -> "'a','b'"
fn enum_values(column_type: &str) -> Option<&str> {
    column_type
        .strip_prefix("enum(")
        .and_then(|rest| rest.strip_suffix(')'))
        .filter(|values| !values.is_empty())
}

/// Whether a default renders as a bare number ("12", "-1.5", "1e3")
fn is_numeric(value: &str) -> bool {
    value
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
        && value.parse::<f64>().is_ok()
}

fn escape_single_quoted(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;
    use chrono::NaiveDate;

    fn render(table: &str, columns: &[ColumnDescriptor], keys: &[ForeignKeyDescriptor]) -> String {
        let config = GeneratorConfig::default();
        MigrationGenerator::new(&config).render(table, columns, keys)
    }

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_milli_opt(h, m, s, 250)
            .unwrap()
    }

    #[test]
    fn test_basic_migration() {
        let columns = vec![ColumnDescriptor::new("name", "varchar").with_max_length(255)];
        let code = render("user", &columns, &[]);

        assert!(code.contains("return new class extends Migration"));
        assert!(code.contains("protected $table = 'user';"));
        assert!(code.contains("Schema::create($this->table, function (Blueprint $table) {"));
        assert!(code.contains("            $table->id();\n            $table->string('name', 255);\n        });\n"));
        assert!(code.contains("Schema::dropIfExists($this->table);"));
        assert!(!code.contains("Facades\\DB"));
    }

    #[test]
    fn test_id_column_is_replaced() {
        let columns = vec![
            ColumnDescriptor::new("id", "int")
                .with_column_type("int(11)")
                .with_key_class(KeyClass::Primary),
            ColumnDescriptor::new("name", "varchar").with_max_length(255),
        ];
        let code = render("user", &columns, &[]);
        assert!(code.contains("$table->id()"));
        assert!(!code.contains("$table->integer('id')"));
        assert!(code.contains("$table->string('name', 255)"));
    }

    #[test]
    fn test_type_mapping() {
        let columns = vec![
            ColumnDescriptor::new("count", "int"),
            ColumnDescriptor::new("title", "varchar").with_max_length(100),
            ColumnDescriptor::new("code", "char").with_max_length(3),
            ColumnDescriptor::new("body", "longtext").with_max_length(4294967295),
            ColumnDescriptor::new("views", "bigint"),
            ColumnDescriptor::new("published_at", "datetime"),
        ];
        let code = render("post", &columns, &[]);
        assert!(code.contains("$table->integer('count');"));
        assert!(code.contains("$table->string('title', 100);"));
        assert!(code.contains("$table->char('code', 3);"));
        assert!(code.contains("$table->longText('body');"));
        assert!(code.contains("$table->bigInteger('views');"));
        assert!(code.contains("$table->dateTime('published_at');"));
    }

    #[test]
    fn test_decimal_precision() {
        let both = vec![ColumnDescriptor::new("price", "decimal").with_precision(10, Some(2))];
        assert!(render("product", &both, &[]).contains("$table->decimal('price', 10, 2);"));

        let no_scale = vec![ColumnDescriptor::new("price", "decimal").with_precision(10, None)];
        assert!(render("product", &no_scale, &[]).contains("$table->decimal('price');"));

        let zero_scale = vec![ColumnDescriptor::new("ratio", "double").with_precision(8, Some(0))];
        assert!(render("product", &zero_scale, &[]).contains("$table->double('ratio', 8, 0);"));
    }

    #[test]
    fn test_enum_values_verbatim() {
        let columns = vec![ColumnDescriptor::new("status", "enum")
            .with_column_type("enum('draft','published','archived')")];
        let code = render("post", &columns, &[]);
        assert!(code.contains("$table->enum('status', ['draft','published','archived']);"));

        let abc = vec![ColumnDescriptor::new("grade", "enum").with_column_type("enum('a','b','c')")];
        assert!(render("post", &abc, &[]).contains("['a','b','c']"));
    }

    #[test]
    fn test_malformed_enum_passes_through() {
        let columns = vec![ColumnDescriptor::new("kind", "enum").with_column_type("weird")];
        assert!(render("post", &columns, &[]).contains("$table->enum('kind', [weird]);"));
        assert_eq!(enum_values("enum()"), None);
        assert_eq!(enum_values("enum('x')"), Some("'x'"));
    }

    #[test]
    fn test_modifiers_in_order() {
        let columns = vec![ColumnDescriptor::new("email", "varchar")
            .with_max_length(255)
            .nullable()
            .with_key_class(KeyClass::Unique)
            .with_default("none")];
        let code = render("user", &columns, &[]);
        assert!(code.contains("$table->string('email', 255)->nullable()->unique()->default('none');"));
    }

    #[test]
    fn test_multiple_key_is_not_unique() {
        let columns = vec![ColumnDescriptor::new("user_id", "int").with_key_class(KeyClass::Multiple)];
        assert!(!render("post", &columns, &[]).contains("->unique()"));
    }

    #[test]
    fn test_defaults() {
        let columns = vec![
            ColumnDescriptor::new("status", "varchar").with_max_length(50).with_default("pending"),
            ColumnDescriptor::new("stock", "int").with_default("0"),
            ColumnDescriptor::new("rate", "decimal").with_default("-1.50"),
            ColumnDescriptor::new("note", "varchar").with_default(""),
            ColumnDescriptor::new("label", "varchar").with_default("it's"),
        ];
        let code = render("item", &columns, &[]);
        assert!(code.contains("$table->string('status', 50)->default('pending');"));
        assert!(code.contains("$table->integer('stock')->default(0);"));
        assert!(code.contains("$table->decimal('rate')->default(-1.50);"));
        assert!(code.contains("$table->string('note');"));
        assert!(code.contains("->default('it\\'s');"));
    }

    #[test]
    fn test_is_numeric() {
        for value in ["0", "42", "-7", "+3", "1.5", ".5", "1e3"] {
            assert!(is_numeric(value), "{}", value);
        }
        for value in ["", "abc", "1a", "inf", "NaN", "0x1A", "CURRENT_TIMESTAMP", " 1"] {
            assert!(!is_numeric(value), "{}", value);
        }
    }

    #[test]
    fn test_nullable_modifier() {
        let columns = vec![ColumnDescriptor::new("bio", "text").nullable()];
        assert!(render("profile", &columns, &[]).contains("$table->text('bio')->nullable();"));
    }

    #[test]
    fn test_unsupported_type_is_skipped() {
        let columns = vec![
            ColumnDescriptor::new("area", "geometry"),
            ColumnDescriptor::new("name", "varchar"),
        ];
        let code = render("zone", &columns, &[]);
        assert!(!code.contains("area"));
        assert!(code.contains("$table->string('name');"));
    }

    #[test]
    fn test_blob_fallback_after_create() {
        let columns = vec![
            ColumnDescriptor::new("name", "varchar").with_max_length(80),
            ColumnDescriptor::new("payload", "longblob"),
            ColumnDescriptor::new("thumb", "mediumblob"),
            ColumnDescriptor::new("raw", "blob"),
        ];
        let code = render("upload", &columns, &[]);

        assert!(code.contains("use Illuminate\\Support\\Facades\\DB;\n"));
        assert!(code.contains("$table->binary('raw');"));
        let expected = "        });\n\n        DB::statement('ALTER TABLE ' . $this->table . ' ADD payload LONGBLOB');\n        DB::statement('ALTER TABLE ' . $this->table . ' ADD thumb MEDIUMBLOB');\n    }\n";
        assert!(code.contains(expected), "{}", code);
    }

    #[test]
    fn test_foreign_keys_with_explicit_actions() {
        let columns = vec![ColumnDescriptor::new("user_id", "int").with_key_class(KeyClass::Multiple)];
        let keys = vec![ForeignKeyDescriptor::new("user_id", "user", "id")];
        let code = render("order", &columns, &keys);

        assert!(code.contains(
            "            $table->integer('user_id');\n\n            $table->foreign('user_id')->references('id')->on('user')->onUpdate('no action')->onDelete('no action');\n        });"
        ));
    }

    #[test]
    fn test_configured_foreign_key_actions() {
        use crate::config::ForeignKeyAction;

        let config = GeneratorConfig {
            foreign_key_on_update: ForeignKeyAction::Cascade,
            foreign_key_on_delete: ForeignKeyAction::SetNull,
            ..Default::default()
        };
        let keys = vec![ForeignKeyDescriptor::new("user_id", "user", "id")];
        let code = MigrationGenerator::new(&config).render("order", &[], &keys);
        assert!(code.contains("->onUpdate('cascade')->onDelete('set null');"));
    }

    #[test]
    fn test_file_name() {
        assert_eq!(
            migration_file_name("2024_03_09_101500", "User_Profile"),
            "2024_03_09_101500_create_user_profile_table.php"
        );

        let config = GeneratorConfig::default();
        let name = MigrationGenerator::new(&config).file_name("user_profile");
        let (timestamp, rest) = name.split_at(17);
        assert_eq!(rest, "_create_user_profile_table.php");
        assert!(timestamp
            .chars()
            .all(|c| c.is_ascii_digit() || c == '_'));
        assert_eq!(timestamp.matches('_').count(), 3);
    }

    #[test]
    fn test_clock_is_strictly_increasing() {
        let mut clock = MigrationClock::new();
        assert_eq!(clock.next_after(at(10, 15, 0)), "2024_03_09_101500");
        assert_eq!(clock.next_after(at(10, 15, 0)), "2024_03_09_101501");
        assert_eq!(clock.next_after(at(10, 15, 0)), "2024_03_09_101502");
        assert_eq!(clock.next_after(at(10, 15, 1)), "2024_03_09_101503");
        assert_eq!(clock.next_after(at(10, 20, 0)), "2024_03_09_102000");
    }

    #[tokio::test]
    async fn test_generate_from_catalog() {
        let catalog = InMemoryCatalog::new()
            .with_table(
                "order",
                vec![
                    ColumnDescriptor::new("id", "int"),
                    ColumnDescriptor::new("user_id", "int"),
                ],
            )
            .with_foreign_key("order", ForeignKeyDescriptor::new("user_id", "user", "id"));
        let config = GeneratorConfig::default();
        let mut generator = MigrationGenerator::new(&config);

        let first = generator.generate(&catalog, "order").await.unwrap();
        let second = generator.generate(&catalog, "order").await.unwrap();

        assert_eq!(first.kind, ArtifactKind::Migration);
        assert!(first.file_name.ends_with("_create_order_table.php"));
        assert!(first.file_name < second.file_name);
        assert_eq!(first.contents, second.contents);
        assert!(first.contents.contains("->on('user')"));
    }
}
