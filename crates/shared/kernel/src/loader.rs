//! Layered file loading for settings and art manifests.

use art_domain::constants::{ENV_PREFIX, ENV_SEPARATOR};
use art_domain::settings::Settings;
use art_error::{error_context, format_context};
use config::{Config, Environment, File, Map};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::Path;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

error_context!(LoadError, LoadErrorExt, variants: [Config], sources: [Config(config::ConfigError)]);

/// Loads `T` from a file and overlays environment overrides.
///
/// The file format is picked from the extension (`toml`, `yaml`, `json`, ...). Values
/// from environment variables prefixed with `ART__` win over the file; nested keys
/// are separated by double underscores (`ART__LOGGING__LEVEL` maps to `logging.level`).
///
/// # Errors
/// Returns [`LoadError::Config`] if the file is missing, cannot be parsed, or does not
/// match the structure of `T`.
///
/// # Example
/// ```rust,no_run
/// use art_kernel::loader::load;
///
/// #[derive(Default, serde::Deserialize)]
/// struct HostConfig {
///     port: u16,
/// }
///
/// let cfg: HostConfig = load("config/host.toml").unwrap_or_default();
/// ```
pub fn load<T>(path: impl AsRef<Path>) -> Result<T, LoadError>
where
    T: DeserializeOwned,
{
    load_layered(path.as_ref(), None)
}

/// `env` replaces the process environment when set.
fn load_layered<T>(path: &Path, env: Option<Map<String, String>>) -> Result<T, LoadError>
where
    T: DeserializeOwned,
{
    info!(path = %path.display(), "Loading configuration");

    Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator(ENV_SEPARATOR)
                .convert_case(config::Case::Snake)
                .source(env),
        )
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")
}

/// Loads `T` from a single file, without environment overrides.
///
/// # Errors
/// Returns [`LoadError::Config`] if the file is missing or malformed.
pub fn load_file<T>(path: impl AsRef<Path>) -> Result<T, LoadError>
where
    T: DeserializeOwned,
{
    let path = path.as_ref();

    Config::builder()
        .add_source(File::from(path).required(true))
        .build()
        .context(format!("Failed to read {}", path.display()))?
        .try_deserialize::<T>()
        .context(format!("Failed to deserialize {}", path.display()))
}

/// Loads [`Settings`] with environment overrides; missing keys keep their defaults.
///
/// # Errors
/// See [`load`].
pub fn load_settings(path: impl AsRef<Path>) -> Result<Settings, LoadError> {
    load(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    #[test]
    fn load_settings_merges_file_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "module_path = \"art/\"\nexecute_actions = false\n").unwrap();

        let settings = load_settings(&path).unwrap();
        assert_eq!(settings.module_path, PathBuf::from("art/"));
        assert!(!settings.execute_actions);
        assert!(settings.auto_trigger);
    }

    #[test]
    fn env_overrides_win_over_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "module_path = \"art/\"\n[logging]\njson = true\n").unwrap();

        let env: Map<String, String> = [
            ("ART__EXECUTE_ACTIONS", "false"),
            ("ART__AUTO_TRIGGER", "FALSE"),
            ("ART__LOGGING__LEVEL", "debug"),
            ("ART__BASE_PATH", "2024"),
            ("OTHER__EXECUTE_ACTIONS", "true"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect();

        let settings: Settings = load_layered(&path, Some(env)).unwrap();
        assert!(!settings.execute_actions);
        assert!(!settings.auto_trigger);
        assert!(settings.auto_register_all_art);
        assert_eq!(settings.module_path, PathBuf::from("art/"));
        assert_eq!(settings.base_path, PathBuf::from("2024"));
        assert_eq!(settings.logging.level, "debug");
        assert!(settings.logging.json);
    }

    #[test]
    fn missing_file_reports_context() {
        let err = load_file::<Settings>("does/not/exist.toml").unwrap_err();
        let LoadError::Config { context, .. } = &err;
        assert!(context.as_deref().is_some_and(|c| c.contains("does/not/exist.toml")));
        assert!(err.to_string().starts_with("Config error ("));
    }
}
