use art_kernel::prelude::*;
use art_kernel::storage::is_default;
use parking_lot::Mutex;
use std::any::Any;
use std::borrow::Cow;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Art provider that only records what it was asked to register.
#[derive(Debug, Default)]
struct RecordingArt {
    registered: Mutex<Vec<String>>,
    bulk_calls: Mutex<Vec<Option<String>>>,
}

impl RecordingArt {
    fn registered(&self) -> Vec<String> {
        self.registered.lock().clone()
    }
}

impl ArtProvider for RecordingArt {
    fn register_all(&self) -> Result<(), ArtError> {
        self.bulk_calls.lock().push(None);
        Ok(())
    }

    fn register_all_from(&self, location: &Path) -> Result<(), ArtError> {
        self.bulk_calls.lock().push(Some(location.display().to_string()));
        Ok(())
    }

    fn register_type(&self, art_type: ArtType) -> Result<(), ArtError> {
        self.registered.lock().push(art_type.identifier().into_owned());
        Ok(())
    }

    fn register(&self, art: ArtInstance) -> Result<(), ArtError> {
        self.registered.lock().push(art.identifier().into_owned());
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Greet;
impl ArtObject for Greet {}
impl Action for Greet {
    fn execute(&self, _target: &dyn Target) {}
}

#[derive(Debug, Default)]
struct Ignite;
impl ArtObject for Ignite {}
impl Action for Ignite {
    fn execute(&self, _target: &dyn Target) {}
}

#[derive(Debug, Default)]
struct IsSneaking;
impl ArtObject for IsSneaking {}
impl Requirement for IsSneaking {
    fn test(&self, _target: &dyn Target) -> bool {
        false
    }
}

#[derive(Debug, Default)]
struct OnDeath;
impl ArtObject for OnDeath {}
impl Trigger for OnDeath {}

#[derive(Debug)]
struct Player {
    name: &'static str,
}

#[derive(Debug)]
struct PlayerTarget {
    id: String,
    player: &'static str,
}

impl Target for PlayerTarget {
    fn unique_id(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.id)
    }

    fn source(&self) -> &dyn Any {
        &self.player
    }
}

#[derive(Debug, Default)]
struct NoopScheduler;

impl Scheduler for NoopScheduler {
    fn schedule(
        &self,
        _task: art_kernel::scheduler::Task,
        _delay: Duration,
    ) -> Result<TaskId, SchedulerError> {
        Ok(TaskId(0))
    }

    fn schedule_repeating(
        &self,
        _task: art_kernel::scheduler::RepeatingTask,
        _delay: Duration,
        _period: Duration,
    ) -> Result<TaskId, SchedulerError> {
        Ok(TaskId(0))
    }

    fn cancel(&self, _id: TaskId) -> Result<(), SchedulerError> {
        Ok(())
    }

    fn cancel_all(&self) {}

    fn is_queued(&self, _id: TaskId) -> bool {
        false
    }

    fn is_running(&self, _id: TaskId) -> bool {
        false
    }
}

fn player_target(version: &str, player: &Player) -> Arc<dyn Target> {
    Arc::new(PlayerTarget { id: format!("{version}:{}", player.name), player: player.name })
}

fn configuration_with(art: Arc<dyn ArtProvider>) -> Configuration {
    Configuration::new(art, Arc::new(DefaultTargetProvider::new()))
}

#[test]
fn action_after_set_reaches_new_provider_only() {
    let first = Arc::new(RecordingArt::default());
    let config = configuration_with(first.clone());

    let returned = config.action_type::<Greet>().unwrap();
    assert!(std::ptr::eq(returned, &config));
    assert_eq!(first.registered(), vec!["Greet".to_owned()]);

    let second = Arc::new(RecordingArt::default());
    config.set_art(second.clone()).action_type::<Ignite>().unwrap();

    assert_eq!(second.registered(), vec!["Ignite".to_owned()]);
    assert_eq!(first.registered(), vec!["Greet".to_owned()]);
}

#[test]
fn every_art_delegate_resolves_the_current_provider() {
    let config = configuration_with(Arc::new(RecordingArt::default()));
    let current = Arc::new(RecordingArt::default());
    config.set(current.clone() as Arc<dyn ArtProvider>);

    config
        .action(Arc::new(Greet))
        .and_then(|c| c.requirement_type::<IsSneaking>())
        .and_then(|c| c.requirement(Arc::new(IsSneaking)))
        .and_then(|c| c.trigger_type::<OnDeath>())
        .and_then(|c| c.trigger(Arc::new(OnDeath)))
        .and_then(Configuration::add_all_art)
        .and_then(|c| c.add_all_art_from("art.toml"))
        .unwrap();

    assert_eq!(
        current.registered(),
        ["Greet", "IsSneaking", "IsSneaking", "OnDeath", "OnDeath"]
    );
    assert_eq!(*current.bulk_calls.lock(), vec![None, Some("art.toml".to_owned())]);
}

#[test]
fn fresh_configuration_uses_defaults() {
    let config = configuration_with(Arc::new(RecordingArt::default()));

    assert!(config.scheduler().is_none());
    assert!(is_default(&config.storage()));
    assert_eq!(config.settings(), Settings::default());
}

#[test]
fn setting_one_slot_leaves_the_others_alone() {
    let art: Arc<dyn ArtProvider> = Arc::new(RecordingArt::default());
    let targets: Arc<dyn TargetProvider> = Arc::new(DefaultTargetProvider::new());
    let config = Configuration::new(Arc::clone(&art), Arc::clone(&targets));

    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    config.set_storage(Arc::clone(&storage));
    config.set_settings(Settings::default().with_auto_trigger(false));
    config.set_scheduler(Some(Arc::new(NoopScheduler)));

    assert!(Arc::ptr_eq(&config.art(), &art));
    assert!(Arc::ptr_eq(&config.targets(), &targets));
    assert!(Arc::ptr_eq(&config.storage(), &storage));
    assert!(!config.settings().auto_trigger);
    assert!(config.settings().execute_actions);

    config.set(None::<Arc<dyn Scheduler>>);
    assert!(config.scheduler().is_none());
    assert!(Arc::ptr_eq(&config.storage(), &storage));
}

#[test]
fn replace_returns_previous_subsystem() {
    let config = configuration_with(Arc::new(RecordingArt::default()));
    let custom = Settings::default().with_module_path("plugins/");

    let previous = config.replace_settings(custom.clone());
    assert_eq!(previous, Settings::default());
    assert_eq!(config.replace_settings(Settings::default()), custom);

    let installed: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    assert!(is_default(&config.replace_storage(Arc::clone(&installed))));
    assert!(Arc::ptr_eq(&config.replace_storage(Arc::new(MemoryStorage::new())), &installed));
}

#[test]
fn later_target_factory_overrides_earlier_one() {
    let config = configuration_with(Arc::new(RecordingArt::default()));

    config
        .target::<Player, _>(|p| player_target("v1", p))
        .unwrap()
        .target::<Player, _>(|p| player_target("v2", p))
        .unwrap();

    let steve = Player { name: "steve" };
    let targets = config.targets();
    let target = targets.target_of(&steve).unwrap();

    assert_eq!(target.unique_id(), "v2:steve");
    assert_eq!(target.source_as::<&'static str>(), Some(&"steve"));
    assert_eq!(targets.all(), vec![SourceType::of::<Player>()]);
    assert!(targets.target_of(&"not a player").is_none());
}

#[test]
fn target_after_set_reaches_new_provider_only() {
    let first = Arc::new(DefaultTargetProvider::new());
    let second = Arc::new(DefaultTargetProvider::new());
    let config = Configuration::new(Arc::new(RecordingArt::default()), first.clone());

    config.target::<Player, _>(|p| player_target("v1", p)).unwrap();
    config
        .set_targets(second.clone())
        .target::<Player, _>(|p| player_target("v2", p))
        .unwrap();

    let steve = Player { name: "steve" };
    let first: Arc<dyn TargetProvider> = first;
    let second: Arc<dyn TargetProvider> = second;

    assert!(Arc::ptr_eq(&config.targets(), &second));
    assert_eq!(second.target_of(&steve).unwrap().unique_id(), "v2:steve");
    assert_eq!(first.target_of(&steve).unwrap().unique_id(), "v1:steve");
    assert_eq!(first.all().len(), 1);
    assert_eq!(second.all().len(), 1);
}

#[test]
fn delegated_errors_pass_through_unchanged() {
    let config = configuration_with(Arc::new(DefaultArtProvider::default()));
    config.action(Arc::new(Greet)).unwrap();

    let err = config.action_type::<Greet>().unwrap_err();
    assert!(matches!(err, ArtError::Duplicate { context: None, .. }));

    let err = config.add_all_art_from("does/not/exist.toml").unwrap_err();
    assert!(matches!(err, ArtError::Manifest { .. }));
}

#[test]
fn add_all_art_from_manifest_registers_listed_entries() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = dir.path().join("art.json");
    std::fs::write(&manifest, r#"{ "actions": ["Ignite"], "triggers": ["OnDeath"] }"#).unwrap();

    let catalog: ArtCatalog = [
        ArtType::action::<Greet>(),
        ArtType::action::<Ignite>(),
        ArtType::trigger::<OnDeath>(),
    ]
    .into_iter()
    .collect();
    let provider = Arc::new(DefaultArtProvider::new(catalog));
    let config = configuration_with(provider.clone());

    config.add_all_art_from(&manifest).unwrap();

    assert_eq!(provider.all(ArtKind::Action), vec!["Ignite".to_owned()]);
    assert_eq!(provider.all(ArtKind::Trigger), vec!["OnDeath".to_owned()]);
}

#[test]
fn builder_requires_both_providers() {
    let err = Configuration::builder()
        .targets(Arc::new(DefaultTargetProvider::new()))
        .build()
        .unwrap_err();
    assert!(matches!(err, ConfigurationError::Validation { .. }));
    assert!(err.to_string().contains("ArtProvider"));

    let err = Configuration::builder().art(Arc::new(RecordingArt::default())).build().unwrap_err();
    assert!(err.to_string().contains("TargetProvider"));
}

#[test]
fn builder_applies_optional_subsystems() {
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    let config = Configuration::builder()
        .art(Arc::new(RecordingArt::default()))
        .targets(Arc::new(DefaultTargetProvider::new()))
        .storage(Arc::clone(&storage))
        .scheduler(Arc::new(NoopScheduler))
        .settings(Settings::default().with_execute_actions(false))
        .build()
        .unwrap();

    assert!(Arc::ptr_eq(&config.storage(), &storage));
    assert!(config.scheduler().is_some());
    assert!(!config.settings().execute_actions);
}

#[test]
fn clones_share_slots() {
    let config = configuration_with(Arc::new(RecordingArt::default()));
    let handle = config.clone();

    handle.set_settings(Settings::default().with_auto_register_all_art(false));

    assert!(config.ptr_eq(&handle));
    assert!(!config.settings().auto_register_all_art);
}

#[test]
fn snapshot_carries_settings_only() {
    let config = configuration_with(Arc::new(RecordingArt::default()));
    config
        .set_settings(Settings::default().with_base_path("/srv/art").with_auto_trigger(false))
        .set_scheduler(Some(Arc::new(NoopScheduler)));

    let json = config.snapshot().to_json().unwrap();
    let snapshot = ConfigurationSnapshot::from_json(&json).unwrap();
    assert!(snapshot.scheduler_installed);
    assert_eq!(snapshot, config.snapshot());

    let restored = Configuration::restore(snapshot)
        .art(Arc::new(RecordingArt::default()))
        .targets(Arc::new(DefaultTargetProvider::new()))
        .build()
        .unwrap();

    assert_eq!(restored.settings(), config.settings());
    assert!(restored.scheduler().is_none());
    assert!(is_default(&restored.storage()));
    assert!(!restored.ptr_eq(&config));
}

#[test]
fn malformed_snapshot_is_rejected() {
    let err = ConfigurationSnapshot::from_json("{\"settings\": 42}").unwrap_err();
    assert!(matches!(err, ConfigurationError::Snapshot { context: Some(_), .. }));
}

#[test]
fn reader_observes_writes_in_order() {
    const ROUNDS: usize = 200;
    let config = configuration_with(Arc::new(RecordingArt::default()));

    let writer = {
        let config = config.clone();
        thread::spawn(move || {
            for round in 1..=ROUNDS {
                config.set_settings(Settings::default().with_module_path(format!("m{round}/")));
            }
        })
    };

    let reader = {
        let config = config.clone();
        thread::spawn(move || {
            let mut last_seen = 0;
            while last_seen < ROUNDS {
                let module_path = config.settings().module_path.to_string_lossy().into_owned();
                let seen = module_path
                    .trim_start_matches('m')
                    .trim_end_matches('/')
                    .parse::<usize>()
                    .unwrap_or(0);
                assert!(seen >= last_seen, "went back from {last_seen} to {seen}");
                last_seen = seen;
            }
        })
    };

    writer.join().unwrap();
    reader.join().unwrap();
    assert_eq!(config.settings().module_path.to_str(), Some("m200/"));
}
