//! Kernel of the framework: the subsystem contracts and the [`Configuration`] aggregate
//! that wires them together.
//!
//! A host builds one [`Configuration`] at startup, optionally swaps any subsystem through
//! the `set_*` methods, and hands clones of it to the rest of the framework. Every
//! convenience method on the aggregate resolves the installed subsystem at call time,
//! so a replacement is honored by all later calls.
//!
//! ```rust
//! # use art_kernel::prelude::*;
//! # use std::sync::Arc;
//! let config = Configuration::new(
//!     Arc::new(DefaultArtProvider::default()),
//!     Arc::new(DefaultTargetProvider::default()),
//! );
//! assert!(config.scheduler().is_none());
//! assert_eq!(config.settings(), Settings::default());
//! ```

pub mod art;
pub mod configuration;
pub mod loader;
pub mod prelude;
pub mod scheduler;
pub mod storage;
pub mod target;

pub use art_domain as domain;
pub use configuration::{Configuration, ConfigurationBuilder, ConfigurationError, Subsystem};
