use crate::constants::{DEFAULT_BASE_PATH, DEFAULT_LOG_LEVEL, DEFAULT_MODULE_PATH};
use serde::{Deserialize, Serialize};
use std::ops::Deref;
use std::path::PathBuf;
use std::sync::Arc;

/// Framework-wide settings values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsInner {
    /// Root directory every relative framework path is resolved against.
    pub base_path: PathBuf,
    /// Directory (relative to `base_path`) scanned for art modules.
    pub module_path: PathBuf,
    /// Register every discoverable art object during bootstrap.
    pub auto_register_all_art: bool,
    /// Fire the actions of a trigger even if nobody listens to it.
    pub auto_trigger: bool,
    /// Global switch for executing actions fired by triggers.
    pub execute_actions: bool,
    pub logging: LoggingSettings,
}

/// Thin Arc-wrapped settings value, cheap to clone into every subsystem.
///
/// Settings are treated as a value object: there is no mutable access. Use the
/// `with_*` methods to derive a modified copy and install it with
/// `Configuration::set_settings`.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings {
    inner: Arc<SettingsInner>,
}

impl Deref for Settings {
    type Target = SettingsInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl From<SettingsInner> for Settings {
    fn from(inner: SettingsInner) -> Self {
        Self { inner: Arc::new(inner) }
    }
}

impl Settings {
    fn with(&self, update: impl FnOnce(&mut SettingsInner)) -> Self {
        let mut inner = Arc::clone(&self.inner);
        update(Arc::make_mut(&mut inner));
        Self { inner }
    }

    #[must_use]
    pub fn with_base_path(&self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        self.with(|s| s.base_path = path)
    }

    #[must_use]
    pub fn with_module_path(&self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        self.with(|s| s.module_path = path)
    }

    #[must_use]
    pub fn with_auto_register_all_art(&self, enabled: bool) -> Self {
        self.with(|s| s.auto_register_all_art = enabled)
    }

    #[must_use]
    pub fn with_auto_trigger(&self, enabled: bool) -> Self {
        self.with(|s| s.auto_trigger = enabled)
    }

    #[must_use]
    pub fn with_execute_actions(&self, enabled: bool) -> Self {
        self.with(|s| s.execute_actions = enabled)
    }

    #[must_use]
    pub fn with_logging(&self, logging: LoggingSettings) -> Self {
        self.with(|s| s.logging = logging)
    }

    /// Absolute-or-relative module directory, resolved against `base_path`.
    #[must_use]
    pub fn module_dir(&self) -> PathBuf {
        self.base_path.join(&self.module_path)
    }
}

/// Log output knobs consumed by the logger bootstrap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default level directive (`trace`, `debug`, `info`, `warn`, `error`).
    pub level: String,
    pub json: bool,
    /// Write rolling log files here in addition to the console.
    pub directory: Option<PathBuf>,
}

// --- Default ---

impl Default for SettingsInner {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from(DEFAULT_BASE_PATH),
            module_path: PathBuf::from(DEFAULT_MODULE_PATH),
            auto_register_all_art: true,
            auto_trigger: true,
            execute_actions: true,
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self { level: DEFAULT_LOG_LEVEL.to_owned(), json: false, directory: None }
    }
}
