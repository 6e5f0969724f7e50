//! Art objects (actions, requirements, triggers) and the provider contract that
//! registers them.
//!
//! How an art object behaves when it runs is up to the object itself; this module only
//! defines what is needed to identify and register one.

mod registry;

pub use registry::{ArtCatalog, DefaultArtProvider};

use crate::loader::LoadError;
use crate::target::Target;
use art_domain::art::ArtKind;
use art_error::{error_context, format_context};
use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::fmt::Debug;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum ArtError {
    #[error("Duplicate art registration{}: {message}", format_context(.context))]
    Duplicate { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Unknown art{}: {message}", format_context(.context))]
    UnknownArt { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Art kind mismatch{}: {message}", format_context(.context))]
    KindMismatch { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Art manifest error{}: {source}", format_context(.context))]
    Manifest { source: LoadError, context: Option<Cow<'static, str>> },

    #[error("Art provider error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

error_context!(
    ArtError, ArtErrorExt,
    variants: [Duplicate, UnknownArt, KindMismatch, Manifest, Internal],
    sources: [Manifest(LoadError)]
);

impl From<&'static str> for ArtError {
    fn from(s: &'static str) -> Self {
        Self::Internal { message: Cow::Borrowed(s), context: None }
    }
}

impl From<String> for ArtError {
    fn from(s: String) -> Self {
        Self::Internal { message: Cow::Owned(s), context: None }
    }
}

/// Common base of every registrable behavior definition.
pub trait ArtObject: Any + Debug + Send + Sync {
    /// Stable identifier used by manifests and lookups. Defaults to the type's short name.
    fn identifier(&self) -> Cow<'static, str> {
        let name = std::any::type_name::<Self>();
        Cow::Borrowed(name.rsplit("::").next().unwrap_or(name))
    }
}

/// Something that happens to a target.
pub trait Action: ArtObject {
    fn execute(&self, target: &dyn Target);
}

/// A check a target has to pass before actions run.
pub trait Requirement: ArtObject {
    fn test(&self, target: &dyn Target) -> bool;
}

/// A source of events that fire actions.
pub trait Trigger: ArtObject {}

/// A concrete, registered art object of any kind.
#[derive(Debug, Clone)]
pub enum ArtInstance {
    Action(Arc<dyn Action>),
    Requirement(Arc<dyn Requirement>),
    Trigger(Arc<dyn Trigger>),
}

impl ArtInstance {
    #[must_use]
    pub const fn kind(&self) -> ArtKind {
        match self {
            Self::Action(_) => ArtKind::Action,
            Self::Requirement(_) => ArtKind::Requirement,
            Self::Trigger(_) => ArtKind::Trigger,
        }
    }

    #[must_use]
    pub fn identifier(&self) -> Cow<'static, str> {
        match self {
            Self::Action(a) => a.identifier(),
            Self::Requirement(r) => r.identifier(),
            Self::Trigger(t) => t.identifier(),
        }
    }

    #[must_use]
    pub fn as_action(&self) -> Option<&Arc<dyn Action>> {
        match self {
            Self::Action(a) => Some(a),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_requirement(&self) -> Option<&Arc<dyn Requirement>> {
        match self {
            Self::Requirement(r) => Some(r),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_trigger(&self) -> Option<&Arc<dyn Trigger>> {
        match self {
            Self::Trigger(t) => Some(t),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum ArtFactory {
    Action(fn() -> Arc<dyn Action>),
    Requirement(fn() -> Arc<dyn Requirement>),
    Trigger(fn() -> Arc<dyn Trigger>),
}

/// Registration by type: the provider builds the instance itself.
#[derive(Debug, Clone, Copy)]
pub struct ArtType {
    id: TypeId,
    name: &'static str,
    factory: ArtFactory,
}

fn make_action<A: Action + Default>() -> Arc<dyn Action> {
    Arc::new(A::default())
}

fn make_requirement<R: Requirement + Default>() -> Arc<dyn Requirement> {
    Arc::new(R::default())
}

fn make_trigger<T: Trigger + Default>() -> Arc<dyn Trigger> {
    Arc::new(T::default())
}

impl ArtType {
    #[must_use]
    pub fn action<A: Action + Default>() -> Self {
        Self::new::<A>(ArtFactory::Action(make_action::<A>))
    }

    #[must_use]
    pub fn requirement<R: Requirement + Default>() -> Self {
        Self::new::<R>(ArtFactory::Requirement(make_requirement::<R>))
    }

    #[must_use]
    pub fn trigger<T: Trigger + Default>() -> Self {
        Self::new::<T>(ArtFactory::Trigger(make_trigger::<T>))
    }

    fn new<T: Any>(factory: ArtFactory) -> Self {
        Self { id: TypeId::of::<T>(), name: std::any::type_name::<T>(), factory }
    }

    #[must_use]
    pub const fn kind(&self) -> ArtKind {
        match self.factory {
            ArtFactory::Action(_) => ArtKind::Action,
            ArtFactory::Requirement(_) => ArtKind::Requirement,
            ArtFactory::Trigger(_) => ArtKind::Trigger,
        }
    }

    #[must_use]
    pub const fn type_id(&self) -> TypeId {
        self.id
    }

    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.name
    }

    /// Builds a fresh instance through the type's `Default` impl.
    #[must_use]
    pub fn instantiate(&self) -> ArtInstance {
        match self.factory {
            ArtFactory::Action(make) => ArtInstance::Action(make()),
            ArtFactory::Requirement(make) => ArtInstance::Requirement(make()),
            ArtFactory::Trigger(make) => ArtInstance::Trigger(make()),
        }
    }

    /// Identifier the type registers under.
    #[must_use]
    pub fn identifier(&self) -> Cow<'static, str> {
        self.instantiate().identifier()
    }

    fn expect_kind(self, kind: ArtKind) -> Result<Self, ArtError> {
        if self.kind() == kind {
            Ok(self)
        } else {
            Err(ArtError::KindMismatch {
                message: format!("{} is a {}, not a {kind}", self.name, self.kind()).into(),
                context: None,
            })
        }
    }
}

/// Registry and builder for art objects.
///
/// Validation and duplicate policy live entirely in the provider; callers receive its
/// errors unchanged.
pub trait ArtProvider: Debug + Send + Sync {
    /// Registers every art object the provider can discover on its own.
    ///
    /// # Errors
    /// Implementation specific.
    fn register_all(&self) -> Result<(), ArtError>;

    /// Registers the art objects listed at an external location.
    ///
    /// # Errors
    /// Implementation specific.
    fn register_all_from(&self, location: &Path) -> Result<(), ArtError>;

    /// # Errors
    /// Implementation specific, e.g. [`ArtError::Duplicate`].
    fn register_type(&self, art_type: ArtType) -> Result<(), ArtError>;

    /// # Errors
    /// Implementation specific, e.g. [`ArtError::Duplicate`].
    fn register(&self, art: ArtInstance) -> Result<(), ArtError>;

    /// # Errors
    /// [`ArtError::KindMismatch`] if `action` is not an action type, or any error of
    /// [`ArtProvider::register_type`].
    fn action_type(&self, action: ArtType) -> Result<(), ArtError> {
        self.register_type(action.expect_kind(ArtKind::Action)?)
    }

    /// # Errors
    /// Any error of [`ArtProvider::register`].
    fn action(&self, action: Arc<dyn Action>) -> Result<(), ArtError> {
        self.register(ArtInstance::Action(action))
    }

    /// # Errors
    /// [`ArtError::KindMismatch`] if `requirement` is not a requirement type, or any
    /// error of [`ArtProvider::register_type`].
    fn requirement_type(&self, requirement: ArtType) -> Result<(), ArtError> {
        self.register_type(requirement.expect_kind(ArtKind::Requirement)?)
    }

    /// # Errors
    /// Any error of [`ArtProvider::register`].
    fn requirement(&self, requirement: Arc<dyn Requirement>) -> Result<(), ArtError> {
        self.register(ArtInstance::Requirement(requirement))
    }

    /// # Errors
    /// [`ArtError::KindMismatch`] if `trigger` is not a trigger type, or any error of
    /// [`ArtProvider::register_type`].
    fn trigger_type(&self, trigger: ArtType) -> Result<(), ArtError> {
        self.register_type(trigger.expect_kind(ArtKind::Trigger)?)
    }

    /// # Errors
    /// Any error of [`ArtProvider::register`].
    fn trigger(&self, trigger: Arc<dyn Trigger>) -> Result<(), ArtError> {
        self.register(ArtInstance::Trigger(trigger))
    }
}
