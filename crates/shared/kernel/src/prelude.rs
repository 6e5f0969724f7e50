pub use crate::art::{
    Action, ArtCatalog, ArtError, ArtInstance, ArtObject, ArtProvider, ArtType,
    DefaultArtProvider, Requirement, Trigger,
};
pub use crate::configuration::{
    Configuration, ConfigurationBuilder, ConfigurationError, ConfigurationSnapshot, Subsystem,
};
pub use crate::scheduler::{Scheduler, SchedulerError, TaskId};
pub use crate::storage::{MemoryStorage, Storage, StorageError};
pub use crate::target::{DefaultTargetProvider, SourceType, Target, TargetError, TargetProvider};
pub use art_domain::art::{ArtKind, ArtManifest};
pub use art_domain::settings::{LoggingSettings, Settings};
