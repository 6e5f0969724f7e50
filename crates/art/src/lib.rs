//! Facade crate for the art framework.
//! Re-exports domain/kernel primitives and the optional infrastructure crates.
//! Keep this crate thin: it composes other crates and holds no subsystem logic.
//!
//! ## Usage
//! - Add `art` with the desired feature flags (`logger`/`scheduler`).
//! - Build a [`Configuration`](kernel::Configuration), then call [`bootstrap`] once
//!   before handing it to the rest of the host.

pub use art_domain as domain;
pub use art_kernel as kernel;
#[cfg(feature = "logger")]
pub use art_logger as logger;
#[cfg(feature = "scheduler")]
pub use art_scheduler as scheduler;

use art_kernel::Configuration;
use art_kernel::art::ArtError;
use tracing::info;

pub mod prelude {
    pub use art_kernel::prelude::*;
    #[cfg(feature = "logger")]
    pub use art_logger::{LevelFilter, Logger};
    #[cfg(feature = "scheduler")]
    pub use art_scheduler::TokioScheduler;
}

/// Build-time enabled infrastructure.
pub mod features {
    pub const ENABLED: &[&str] = &[
        #[cfg(feature = "logger")]
        "logger",
        #[cfg(feature = "scheduler")]
        "scheduler",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

/// Applies the startup policy carried by the configuration's settings.
///
/// Registers every discoverable art object when `auto_register_all_art` is set.
///
/// # Errors
/// Whatever the installed art provider returns, unchanged.
pub fn bootstrap(config: &Configuration) -> Result<&Configuration, ArtError> {
    let settings = config.settings();
    if settings.auto_register_all_art {
        config.add_all_art()?;
    }
    info!(
        auto_register_all_art = settings.auto_register_all_art,
        scheduler = config.scheduler().is_some(),
        "Art configuration bootstrapped"
    );
    Ok(config)
}
