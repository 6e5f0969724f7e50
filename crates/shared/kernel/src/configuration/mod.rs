//! The [`Configuration`] aggregate: one swappable slot per framework subsystem.
//!
//! Every slot is guarded by its own lock. Accessors clone the installed `Arc` under a
//! read lock; setters exchange it under a write lock. The convenience methods
//! (`action`, `target`, `add_all_art`, ...) look the provider up on every call and
//! release the lock before delegating, so a provider may call back into the aggregate
//! and a `set_*` that returned earlier is always honored.

mod builder;
mod snapshot;

pub use builder::ConfigurationBuilder;
pub use snapshot::ConfigurationSnapshot;

use crate::art::{Action, ArtError, ArtProvider, ArtType, Requirement, Trigger};
use crate::scheduler::Scheduler;
use crate::storage::{Storage, default_storage};
use crate::target::{Target, TargetError, TargetProvider};
use art_domain::settings::Settings;
use art_error::{error_context, format_context};
use parking_lot::RwLock;
use std::any::Any;
use std::borrow::Cow;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Configuration validation error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Configuration snapshot error{}: {source}", format_context(.context))]
    Snapshot { source: serde_json::Error, context: Option<Cow<'static, str>> },
}

error_context!(
    ConfigurationError, ConfigurationErrorExt,
    variants: [Validation, Snapshot],
    sources: [Snapshot(serde_json::Error)]
);

/// A replacement for one subsystem slot, for the tagged [`Configuration::set`].
#[derive(Debug, Clone)]
pub enum Subsystem {
    Art(Arc<dyn ArtProvider>),
    /// `None` uninstalls the scheduler.
    Scheduler(Option<Arc<dyn Scheduler>>),
    Storage(Arc<dyn Storage>),
    Settings(Settings),
    Targets(Arc<dyn TargetProvider>),
}

impl From<Arc<dyn ArtProvider>> for Subsystem {
    fn from(art: Arc<dyn ArtProvider>) -> Self {
        Self::Art(art)
    }
}

impl From<Arc<dyn Scheduler>> for Subsystem {
    fn from(scheduler: Arc<dyn Scheduler>) -> Self {
        Self::Scheduler(Some(scheduler))
    }
}

impl From<Option<Arc<dyn Scheduler>>> for Subsystem {
    fn from(scheduler: Option<Arc<dyn Scheduler>>) -> Self {
        Self::Scheduler(scheduler)
    }
}

impl From<Arc<dyn Storage>> for Subsystem {
    fn from(storage: Arc<dyn Storage>) -> Self {
        Self::Storage(storage)
    }
}

impl From<Settings> for Subsystem {
    fn from(settings: Settings) -> Self {
        Self::Settings(settings)
    }
}

impl From<Arc<dyn TargetProvider>> for Subsystem {
    fn from(targets: Arc<dyn TargetProvider>) -> Self {
        Self::Targets(targets)
    }
}

#[derive(Debug)]
struct ConfigurationInner {
    art: RwLock<Arc<dyn ArtProvider>>,
    scheduler: RwLock<Option<Arc<dyn Scheduler>>>,
    storage: RwLock<Arc<dyn Storage>>,
    settings: RwLock<Settings>,
    targets: RwLock<Arc<dyn TargetProvider>>,
}

/// Holds the active implementation of every framework subsystem.
///
/// Cloning is cheap and clones share the same slots: a replacement made through one
/// handle is visible through all of them.
///
/// # Example
/// ```rust
/// # use art_kernel::prelude::*;
/// # use std::sync::Arc;
/// let config = Configuration::new(
///     Arc::new(DefaultArtProvider::default()),
///     Arc::new(DefaultTargetProvider::default()),
/// );
///
/// let tuned = config.settings().with_auto_trigger(false);
/// config.set_settings(tuned).set_storage(Arc::new(MemoryStorage::new()));
///
/// assert!(!config.settings().auto_trigger);
/// assert!(!art_kernel::storage::is_default(&config.storage()));
/// ```
#[derive(Debug, Clone)]
pub struct Configuration {
    inner: Arc<ConfigurationInner>,
}

impl Configuration {
    /// Builds a configuration from the two mandatory providers; storage and settings
    /// start out as their defaults and no scheduler is installed.
    #[must_use]
    pub fn new(art: Arc<dyn ArtProvider>, targets: Arc<dyn TargetProvider>) -> Self {
        Self::from_parts(art, None, default_storage(), Settings::default(), targets)
    }

    #[must_use]
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::default()
    }

    fn from_parts(
        art: Arc<dyn ArtProvider>,
        scheduler: Option<Arc<dyn Scheduler>>,
        storage: Arc<dyn Storage>,
        settings: Settings,
        targets: Arc<dyn TargetProvider>,
    ) -> Self {
        Self {
            inner: Arc::new(ConfigurationInner {
                art: RwLock::new(art),
                scheduler: RwLock::new(scheduler),
                storage: RwLock::new(storage),
                settings: RwLock::new(settings),
                targets: RwLock::new(targets),
            }),
        }
    }

    // --- Accessors ---

    #[must_use]
    pub fn art(&self) -> Arc<dyn ArtProvider> {
        Arc::clone(&*self.inner.art.read())
    }

    /// The installed scheduler, or `None` if the host did not provide one.
    #[must_use]
    pub fn scheduler(&self) -> Option<Arc<dyn Scheduler>> {
        self.inner.scheduler.read().clone()
    }

    #[must_use]
    pub fn storage(&self) -> Arc<dyn Storage> {
        Arc::clone(&*self.inner.storage.read())
    }

    #[must_use]
    pub fn settings(&self) -> Settings {
        self.inner.settings.read().clone()
    }

    #[must_use]
    pub fn targets(&self) -> Arc<dyn TargetProvider> {
        Arc::clone(&*self.inner.targets.read())
    }

    // --- Replacement ---

    /// Installs a new art provider and returns the one it replaced.
    pub fn replace_art(&self, art: Arc<dyn ArtProvider>) -> Arc<dyn ArtProvider> {
        exchange("art", &self.inner.art, art)
    }

    pub fn replace_scheduler(
        &self,
        scheduler: Option<Arc<dyn Scheduler>>,
    ) -> Option<Arc<dyn Scheduler>> {
        exchange("scheduler", &self.inner.scheduler, scheduler)
    }

    pub fn replace_storage(&self, storage: Arc<dyn Storage>) -> Arc<dyn Storage> {
        exchange("storage", &self.inner.storage, storage)
    }

    pub fn replace_settings(&self, settings: Settings) -> Settings {
        exchange("settings", &self.inner.settings, settings)
    }

    pub fn replace_targets(&self, targets: Arc<dyn TargetProvider>) -> Arc<dyn TargetProvider> {
        exchange("targets", &self.inner.targets, targets)
    }

    pub fn set_art(&self, art: Arc<dyn ArtProvider>) -> &Self {
        self.replace_art(art);
        self
    }

    /// Installs `scheduler`; pass `None` to uninstall the current one.
    pub fn set_scheduler(&self, scheduler: Option<Arc<dyn Scheduler>>) -> &Self {
        self.replace_scheduler(scheduler);
        self
    }

    pub fn set_storage(&self, storage: Arc<dyn Storage>) -> &Self {
        self.replace_storage(storage);
        self
    }

    pub fn set_settings(&self, settings: Settings) -> &Self {
        self.replace_settings(settings);
        self
    }

    pub fn set_targets(&self, targets: Arc<dyn TargetProvider>) -> &Self {
        self.replace_targets(targets);
        self
    }

    /// Replaces whichever slot `subsystem` is tagged for. Other slots are untouched.
    pub fn set(&self, subsystem: impl Into<Subsystem>) -> &Self {
        match subsystem.into() {
            Subsystem::Art(art) => self.set_art(art),
            Subsystem::Scheduler(scheduler) => self.set_scheduler(scheduler),
            Subsystem::Storage(storage) => self.set_storage(storage),
            Subsystem::Settings(settings) => self.set_settings(settings),
            Subsystem::Targets(targets) => self.set_targets(targets),
        }
    }

    // --- Delegation to the installed art provider ---

    /// Registers everything the installed art provider can discover.
    ///
    /// # Errors
    /// Whatever [`ArtProvider::register_all`] returns, unchanged.
    pub fn add_all_art(&self) -> Result<&Self, ArtError> {
        self.art().register_all()?;
        Ok(self)
    }

    /// Registers the art listed at `location` with the installed art provider.
    ///
    /// # Errors
    /// Whatever [`ArtProvider::register_all_from`] returns, unchanged.
    pub fn add_all_art_from(&self, location: impl AsRef<Path>) -> Result<&Self, ArtError> {
        self.art().register_all_from(location.as_ref())?;
        Ok(self)
    }

    /// # Errors
    /// Whatever [`ArtProvider::action_type`] returns, unchanged.
    pub fn action_type<A: Action + Default>(&self) -> Result<&Self, ArtError> {
        self.art().action_type(ArtType::action::<A>())?;
        Ok(self)
    }

    /// # Errors
    /// Whatever [`ArtProvider::action`] returns, unchanged.
    pub fn action(&self, action: Arc<dyn Action>) -> Result<&Self, ArtError> {
        self.art().action(action)?;
        Ok(self)
    }

    /// # Errors
    /// Whatever [`ArtProvider::requirement_type`] returns, unchanged.
    pub fn requirement_type<R: Requirement + Default>(&self) -> Result<&Self, ArtError> {
        self.art().requirement_type(ArtType::requirement::<R>())?;
        Ok(self)
    }

    /// # Errors
    /// Whatever [`ArtProvider::requirement`] returns, unchanged.
    pub fn requirement(&self, requirement: Arc<dyn Requirement>) -> Result<&Self, ArtError> {
        self.art().requirement(requirement)?;
        Ok(self)
    }

    /// # Errors
    /// Whatever [`ArtProvider::trigger_type`] returns, unchanged.
    pub fn trigger_type<T: Trigger + Default>(&self) -> Result<&Self, ArtError> {
        self.art().trigger_type(ArtType::trigger::<T>())?;
        Ok(self)
    }

    /// # Errors
    /// Whatever [`ArtProvider::trigger`] returns, unchanged.
    pub fn trigger(&self, trigger: Arc<dyn Trigger>) -> Result<&Self, ArtError> {
        self.art().trigger(trigger)?;
        Ok(self)
    }

    // --- Delegation to the installed target provider ---

    /// Registers `factory` as the way to wrap sources of type `T` into a [`Target`],
    /// overriding any earlier factory for `T`.
    ///
    /// # Errors
    /// Whatever the installed [`TargetProvider`] returns, unchanged.
    pub fn target<T, F>(&self, factory: F) -> Result<&Self, TargetError>
    where
        T: Any,
        F: Fn(&T) -> Arc<dyn Target> + Send + Sync + 'static,
    {
        self.targets().add::<T, F>(factory)?;
        Ok(self)
    }

    // --- Snapshot ---

    /// Captures the transferable part of this configuration.
    #[must_use]
    pub fn snapshot(&self) -> ConfigurationSnapshot {
        ConfigurationSnapshot {
            settings: self.settings(),
            scheduler_installed: self.scheduler().is_some(),
        }
    }

    /// Starts a builder preloaded with the snapshot's settings. Providers, storage and
    /// the scheduler are never part of a snapshot and must be supplied again.
    #[must_use]
    pub fn restore(snapshot: ConfigurationSnapshot) -> ConfigurationBuilder {
        Self::builder().settings(snapshot.settings)
    }

    /// Whether both handles point at the same aggregate.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

fn exchange<T>(slot: &'static str, lock: &RwLock<T>, value: T) -> T {
    let previous = std::mem::replace(&mut *lock.write(), value);
    debug!(slot, "Replaced subsystem");
    previous
}
