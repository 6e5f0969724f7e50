/// Environment variable prefix for layered overrides (e.g. `ART__BASE_PATH`).
pub const ENV_PREFIX: &str = "ART";
/// Separator between nested keys in environment overrides.
pub const ENV_SEPARATOR: &str = "__";
/// Separator between a target's unique id and the storage key scoped to it.
pub const TARGET_KEY_SEPARATOR: char = '#';

pub const DEFAULT_BASE_PATH: &str = "./";
pub const DEFAULT_MODULE_PATH: &str = "modules/";
pub const DEFAULT_LOG_LEVEL: &str = "info";
