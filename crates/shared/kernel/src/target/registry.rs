use super::{SourceType, Target, TargetError, TargetFactory, TargetProvider};
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

/// In-memory [`TargetProvider`] keyed by the exact source type.
#[derive(Default)]
pub struct DefaultTargetProvider {
    factories: RwLock<FxHashMap<TypeId, (SourceType, TargetFactory)>>,
}

impl DefaultTargetProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.read().len()
    }
}

impl fmt::Debug for DefaultTargetProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultTargetProvider").field("sources", &self.all()).finish()
    }
}

impl TargetProvider for DefaultTargetProvider {
    fn add_factory(&self, source: SourceType, factory: TargetFactory) -> Result<(), TargetError> {
        let previous = self.factories.write().insert(source.type_id(), (source, factory));
        if previous.is_some() {
            warn!(source = source.name(), "Overwriting existing target registration");
        }
        info!(source = source.name(), "[REGISTERED] target");
        Ok(())
    }

    fn get(&self, source: &dyn Any) -> Option<Arc<dyn Target>> {
        // Clone the factory out so it runs without holding the lock.
        let factory = self
            .factories
            .read()
            .get(&Any::type_id(source))
            .map(|(_, factory)| Arc::clone(factory))?;
        factory(source)
    }

    fn remove(&self, source: SourceType) -> bool {
        self.factories.write().remove(&source.type_id()).is_some()
    }

    fn clear(&self) {
        self.factories.write().clear();
    }

    fn all(&self) -> Vec<SourceType> {
        let mut sources: Vec<_> = self.factories.read().values().map(|(s, _)| *s).collect();
        sources.sort_unstable_by_key(|s| s.name());
        sources
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;

    #[derive(Debug)]
    struct Player {
        name: String,
    }

    #[derive(Debug)]
    struct PlayerTarget {
        player: Arc<Player>,
        prefix: &'static str,
    }

    impl Target for PlayerTarget {
        fn unique_id(&self) -> Cow<'_, str> {
            Cow::Owned(format!("{}{}", self.prefix, self.player.name))
        }

        fn source(&self) -> &dyn Any {
            self.player.as_ref()
        }
    }

    fn player_factory(prefix: &'static str) -> impl Fn(&Player) -> Arc<dyn Target> {
        move |p: &Player| {
            Arc::new(PlayerTarget { player: Arc::new(Player { name: p.name.clone() }), prefix })
                as Arc<dyn Target>
        }
    }

    #[test]
    fn get_uses_registered_factory() {
        let provider: Arc<dyn TargetProvider> = Arc::new(DefaultTargetProvider::new());
        provider.add::<Player, _>(player_factory("p:")).unwrap();

        let player = Player { name: "steve".to_owned() };
        let target = provider.target_of(&player).expect("target for player");
        assert_eq!(target.unique_id(), "p:steve");
        assert!(target.is_source::<Player>());
        assert_eq!(target.source_as::<Player>().map(|p| p.name.as_str()), Some("steve"));
    }

    #[test]
    fn later_add_overrides_earlier_mapping() {
        let provider: Arc<dyn TargetProvider> = Arc::new(DefaultTargetProvider::new());
        provider.add::<Player, _>(player_factory("first:")).unwrap();
        provider.add::<Player, _>(player_factory("second:")).unwrap();

        let player = Player { name: "alex".to_owned() };
        assert_eq!(provider.target_of(&player).unwrap().unique_id(), "second:alex");
        assert_eq!(provider.all().len(), 1);
    }

    #[test]
    fn unknown_source_has_no_target() {
        let provider = DefaultTargetProvider::new();
        assert!(!provider.exists(&42_u32));
        assert!(provider.get(&"text").is_none());
    }

    #[test]
    fn remove_and_clear() {
        let provider: Arc<dyn TargetProvider> = Arc::new(DefaultTargetProvider::new());
        provider.add::<Player, _>(player_factory("p:")).unwrap();

        assert!(provider.remove(SourceType::of::<Player>()));
        assert!(!provider.remove(SourceType::of::<Player>()));

        provider.add::<Player, _>(player_factory("p:")).unwrap();
        provider.clear();
        assert!(provider.all().is_empty());
    }
}
