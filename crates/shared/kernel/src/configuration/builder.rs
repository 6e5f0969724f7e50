use super::{Configuration, ConfigurationError};
use crate::art::ArtProvider;
use crate::scheduler::Scheduler;
use crate::storage::{Storage, default_storage};
use crate::target::TargetProvider;
use art_domain::settings::Settings;
use std::sync::Arc;
use tracing::debug;

/// Assembles a [`Configuration`].
///
/// The art and target providers are mandatory and checked in [`build`](Self::build);
/// storage and settings fall back to their defaults, the scheduler stays absent.
#[derive(Debug, Default)]
pub struct ConfigurationBuilder {
    art: Option<Arc<dyn ArtProvider>>,
    scheduler: Option<Arc<dyn Scheduler>>,
    storage: Option<Arc<dyn Storage>>,
    settings: Option<Settings>,
    targets: Option<Arc<dyn TargetProvider>>,
}

impl ConfigurationBuilder {
    #[must_use]
    pub fn art(mut self, art: Arc<dyn ArtProvider>) -> Self {
        self.art = Some(art);
        self
    }

    #[must_use]
    pub fn scheduler(mut self, scheduler: Arc<dyn Scheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    #[must_use]
    pub fn storage(mut self, storage: Arc<dyn Storage>) -> Self {
        self.storage = Some(storage);
        self
    }

    #[must_use]
    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = Some(settings);
        self
    }

    #[must_use]
    pub fn targets(mut self, targets: Arc<dyn TargetProvider>) -> Self {
        self.targets = Some(targets);
        self
    }

    /// # Errors
    /// Returns [`ConfigurationError::Validation`] if no art provider or no target
    /// provider was supplied.
    pub fn build(self) -> Result<Configuration, ConfigurationError> {
        let art = self.art.ok_or_else(|| ConfigurationError::Validation {
            message: "ArtProvider not provided".into(),
            context: None,
        })?;
        let targets = self.targets.ok_or_else(|| ConfigurationError::Validation {
            message: "TargetProvider not provided".into(),
            context: None,
        })?;
        let storage = self.storage.unwrap_or_else(default_storage);
        let settings = self.settings.unwrap_or_default();

        debug!(scheduler = self.scheduler.is_some(), "Configuration assembled");
        Ok(Configuration::from_parts(art, self.scheduler, storage, settings, targets))
    }
}
