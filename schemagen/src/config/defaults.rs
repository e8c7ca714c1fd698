//! Default configuration values - single source of truth

/// Default namespace for generated Eloquent models
pub const MODEL_NAMESPACE: &str = "App\\Models";

/// Default namespace for generated form requests
pub const REQUEST_NAMESPACE: &str = "App\\Http\\Requests";

/// Default output directory for models
pub const MODEL_OUTPUT_PATH: &str = "app/Models";

/// Default output directory for form requests
pub const REQUEST_OUTPUT_PATH: &str = "app/Http/Requests";

/// Default output directory for migrations
pub const MIGRATION_OUTPUT_PATH: &str = "database/migrations";

/// Default table pattern (all tables)
pub const TABLE_PATTERN: &str = "*";

/// Whether existing files are overwritten by default
pub const FORCE: bool = false;

/// Whether to run in dry-run mode by default
pub const DRY_RUN: bool = false;

/// Prefix for environment variable overrides (`SCHEMAGEN_*`)
pub const ENV_PREFIX: &str = "SCHEMAGEN";

/// Config file looked up when none is given explicitly
pub const CONFIG_FILE_NAME: &str = "schemagen";
