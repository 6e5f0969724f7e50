use super::{ArtError, ArtInstance, ArtProvider, ArtType};
use crate::loader;
use art_domain::art::{ArtKind, ArtManifest};
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// The art types a host makes discoverable to [`DefaultArtProvider::register_all`].
#[derive(Debug, Clone, Default)]
pub struct ArtCatalog {
    types: Vec<ArtType>,
}

impl ArtCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, art_type: ArtType) -> Self {
        self.push(art_type);
        self
    }

    pub fn push(&mut self, art_type: ArtType) {
        if !self.types.iter().any(|t| t.type_id() == art_type.type_id()) {
            self.types.push(art_type);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ArtType> {
        self.types.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Looks up a catalog entry by kind and registration identifier.
    #[must_use]
    pub fn find(&self, kind: ArtKind, identifier: &str) -> Option<ArtType> {
        self.types.iter().copied().find(|t| t.kind() == kind && t.identifier() == identifier)
    }
}

impl FromIterator<ArtType> for ArtCatalog {
    fn from_iter<I: IntoIterator<Item = ArtType>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), Self::with)
    }
}

/// In-memory [`ArtProvider`].
///
/// Registration is additive and keyed by kind and identifier; registering the same key
/// twice is refused with [`ArtError::Duplicate`]. Bulk registration through
/// [`ArtProvider::register_all`] and [`ArtProvider::register_all_from`] skips entries
/// that are already present, so it can run repeatedly.
#[derive(Debug, Default)]
pub struct DefaultArtProvider {
    catalog: ArtCatalog,
    entries: RwLock<FxHashMap<ArtKind, BTreeMap<String, ArtInstance>>>,
}

impl DefaultArtProvider {
    #[must_use]
    pub fn new(catalog: ArtCatalog) -> Self {
        Self { catalog, entries: RwLock::default() }
    }

    #[must_use]
    pub const fn catalog(&self) -> &ArtCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn get(&self, kind: ArtKind, identifier: &str) -> Option<ArtInstance> {
        self.entries.read().get(&kind).and_then(|by_id| by_id.get(identifier)).cloned()
    }

    #[must_use]
    pub fn contains(&self, kind: ArtKind, identifier: &str) -> bool {
        self.entries.read().get(&kind).is_some_and(|by_id| by_id.contains_key(identifier))
    }

    /// Sorted identifiers registered for `kind`.
    #[must_use]
    pub fn all(&self, kind: ArtKind) -> Vec<String> {
        self.entries
            .read()
            .get(&kind)
            .map(|by_id| by_id.keys().cloned().collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().values().map(BTreeMap::len).sum()
    }

    fn register_missing(&self, types: impl IntoIterator<Item = ArtType>) -> usize {
        // Host constructors run before the lock is taken; they may call back into `self`.
        let instances: Vec<_> = types
            .into_iter()
            .map(|art_type| {
                let art = art_type.instantiate();
                (art.kind(), art.identifier(), art)
            })
            .collect();

        let mut entries = self.entries.write();
        let mut added = 0;
        for (kind, identifier, art) in instances {
            let by_id = entries.entry(kind).or_default();
            if by_id.contains_key(identifier.as_ref()) {
                debug!(%kind, %identifier, "Already registered, skipping");
                continue;
            }
            info!(%kind, %identifier, "[REGISTERED] art");
            by_id.insert(identifier.into_owned(), art);
            added += 1;
        }
        added
    }
}

impl ArtProvider for DefaultArtProvider {
    fn register_all(&self) -> Result<(), ArtError> {
        let added = self.register_missing(self.catalog.iter().copied());
        info!(added, catalog = self.catalog.len(), "Registered all discoverable art");
        Ok(())
    }

    fn register_all_from(&self, location: &Path) -> Result<(), ArtError> {
        let manifest: ArtManifest = loader::load_file(location)?;

        // Resolve the whole manifest first; an unknown entry registers nothing.
        let types = manifest
            .entries()
            .map(|(kind, identifier)| {
                self.catalog.find(kind, identifier).ok_or_else(|| ArtError::UnknownArt {
                    message: format!("{kind} '{identifier}'").into(),
                    context: Some(format!("Listed in {}", location.display()).into()),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let added = self.register_missing(types);
        info!(added, path = %location.display(), "Registered art from manifest");
        Ok(())
    }

    fn register_type(&self, art_type: ArtType) -> Result<(), ArtError> {
        self.register(art_type.instantiate())
    }

    fn register(&self, art: ArtInstance) -> Result<(), ArtError> {
        let kind = art.kind();
        let identifier = art.identifier();
        let mut entries = self.entries.write();
        let by_id = entries.entry(kind).or_default();
        if by_id.contains_key(identifier.as_ref()) {
            warn!(%kind, %identifier, "Refusing duplicate art registration");
            return Err(ArtError::Duplicate {
                message: format!("{kind} '{identifier}'").into(),
                context: None,
            });
        }
        info!(%kind, %identifier, "[REGISTERED] art");
        by_id.insert(identifier.into_owned(), art);
        Ok(())
    }
}
