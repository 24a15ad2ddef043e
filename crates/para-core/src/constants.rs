/// Current crate version, stamped into exported artifacts.
pub const PARA_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable holding the tracing filter directive.
pub const LOG_ENV_VAR: &str = "PARA_LOG";

/// Prefix for environment variable config overrides.
pub const ENV_PREFIX: &str = "PARA_";

/// Project-level config file name, looked up in the project root.
pub const PROJECT_CONFIG_FILE: &str = "para.toml";

/// User-level config directory under the home directory.
pub const USER_CONFIG_DIR: &str = ".para";

/// Tolerance used when comparing blended scores for ties.
pub const SCORE_EPSILON: f64 = 1e-9;

/// Weight version assigned to the compiled default vector.
pub const DEFAULT_WEIGHT_VERSION: u64 = 0;
