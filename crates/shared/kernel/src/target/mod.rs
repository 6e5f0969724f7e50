//! Uniform [`Target`] wrappers around arbitrary source objects and the registry that
//! maps source types to wrapper factories.

mod registry;

pub use registry::DefaultTargetProvider;

use art_error::{error_context, format_context};
use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::fmt::{self, Debug};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum TargetError {
    #[error("Target provider error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

error_context!(TargetError, TargetErrorExt, variants: [Internal]);

/// A wrapper giving any source object (a player, an entity, a chest) a stable identity.
///
/// Implementations must be immutable: neither the source nor the unique id may change
/// for the lifetime of the wrapper.
pub trait Target: Debug + Send + Sync {
    /// Identifier that is consistent across wrappers of the same underlying object.
    fn unique_id(&self) -> Cow<'_, str>;

    /// The wrapped source object.
    fn source(&self) -> &dyn Any;
}

impl dyn Target + '_ {
    /// Downcasts the wrapped source to `T`.
    #[must_use]
    pub fn source_as<T: Any>(&self) -> Option<&T> {
        self.source().downcast_ref::<T>()
    }

    #[must_use]
    pub fn is_source<T: Any>(&self) -> bool {
        self.source().is::<T>()
    }
}

/// Identity of a source type that target factories are keyed by.
#[derive(Clone, Copy)]
pub struct SourceType {
    id: TypeId,
    name: &'static str,
}

impl SourceType {
    #[must_use]
    pub fn of<T: Any>() -> Self {
        Self { id: TypeId::of::<T>(), name: std::any::type_name::<T>() }
    }

    #[must_use]
    pub const fn type_id(&self) -> TypeId {
        self.id
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for SourceType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for SourceType {}

impl Hash for SourceType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Debug for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Type-erased factory; yields `None` when handed a source of a different type.
pub type TargetFactory = Arc<dyn Fn(&dyn Any) -> Option<Arc<dyn Target>> + Send + Sync>;

/// Registry of target factories keyed by source type.
///
/// Adding a factory for a source type that already has one replaces the earlier mapping.
pub trait TargetProvider: Debug + Send + Sync {
    /// Registers `factory` for `source`, overriding any existing mapping.
    ///
    /// # Errors
    /// Implementation specific; the default provider never fails.
    fn add_factory(&self, source: SourceType, factory: TargetFactory) -> Result<(), TargetError>;

    /// Wraps `source` using the factory registered for its concrete type.
    fn get(&self, source: &dyn Any) -> Option<Arc<dyn Target>>;

    fn exists(&self, source: &dyn Any) -> bool {
        self.get(source).is_some()
    }

    /// Removes the mapping for `source`; returns whether one existed.
    fn remove(&self, source: SourceType) -> bool;

    fn clear(&self);

    /// All source types that currently have a factory.
    fn all(&self) -> Vec<SourceType>;
}

impl dyn TargetProvider + '_ {
    /// Typed entry point for [`TargetProvider::add_factory`].
    ///
    /// # Errors
    /// Propagates the provider's error unchanged.
    pub fn add<T, F>(&self, factory: F) -> Result<(), TargetError>
    where
        T: Any,
        F: Fn(&T) -> Arc<dyn Target> + Send + Sync + 'static,
    {
        self.add_factory(SourceType::of::<T>(), erase(factory))
    }

    /// Wraps a typed source; see [`TargetProvider::get`].
    #[must_use]
    pub fn target_of<T: Any>(&self, source: &T) -> Option<Arc<dyn Target>> {
        self.get(source)
    }
}

fn erase<T, F>(factory: F) -> TargetFactory
where
    T: Any,
    F: Fn(&T) -> Arc<dyn Target> + Send + Sync + 'static,
{
    Arc::new(move |source: &dyn Any| source.downcast_ref::<T>().map(&factory))
}
