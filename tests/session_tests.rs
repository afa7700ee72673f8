//! Tests for the sheet session: local persistence, sign-in and sync.
//!
//! These tests verify:
//! - Saved sheets survive a reopen, including through a file store
//! - Legacy and malformed documents
//! - Sign-in pull overwriting local state
//! - Debounced pushes and failure notices
//! - Pushes scheduled from outside the runtime and explicit syncs

use diesheet::resolver::NullSink;
use diesheet::roller::ScriptedRoller;
use diesheet::storage::{FileStore, KeyValueStore, MemoryStore};
use diesheet::sync::{
    Credentials, MemoryRemoteStore, RecordingNotifier, StaticAuthenticator, UserId,
};
use diesheet::*;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

const KEY: &str = "megaMechaState";

fn pilot() -> UserId {
    UserId("pilot-7".to_string())
}

fn auth() -> StaticAuthenticator {
    StaticAuthenticator::new().with_account("rin@example.com", "overdrive", pilot())
}

fn creds() -> Credentials {
    Credentials::new("rin@example.com", "overdrive")
}

/// Test that a reopened session sees every saved field.
#[test]
fn test_reopen_restores_sheet() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let first = SheetSession::open(SheetConfig::default(), store.clone());
    first.apply(SheetAction::SetCharName("Vex".into()));
    first.apply(SheetAction::SelectBackground(Some(Stat::Resonance)));
    first.apply(SheetAction::AetherIncrement);
    first.apply(SheetAction::ToggleHpSlot(4));
    first.apply(SheetAction::ToggleShield);

    let second = SheetSession::open(SheetConfig::default(), store);
    assert_eq!(second.snapshot(), first.snapshot());
    assert_eq!(second.snapshot().effective_die(Stat::Resonance), DieSize::D6);
}

/// Test persistence through the file store.
#[tokio::test(start_paused = true)]
async fn test_file_store_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("storage.json");

    let session = SheetSession::open(
        SheetConfig::default(),
        Arc::new(FileStore::open(&path).unwrap()),
    )
    .with_roller(ScriptedRoller::new([4, 6, 2]));
    session.apply(SheetAction::SetPlayerName("Rin".into()));
    session.roll(Stat::Style, &NullSink).await;

    let reopened = SheetSession::open(
        SheetConfig::default(),
        Arc::new(FileStore::open(&path).unwrap()),
    );
    let sheet = reopened.snapshot();
    assert_eq!(sheet.player_name(), "Rin");
    assert_eq!(sheet.effective_die(Stat::Style), DieSize::D8);
}

/// Test that an older document shape still loads.
#[test]
fn test_legacy_document_loads() {
    let store = Arc::new(MemoryStore::new());
    store
        .set(
            KEY,
            r#"{
                "playerName": "Rin",
                "aetherTokens": 42,
                "background": "Overdrive",
                "mech": "VerdammisMech",
                "statBaseIndex": { "Overdrive": 3, "Charm": 2 },
                "hpSlots": [true, true]
            }"#,
        )
        .unwrap();

    let sheet = SheetSession::open(SheetConfig::default(), store).snapshot();
    assert_eq!(sheet.aether().value(), 42);
    assert_eq!(sheet.bonuses().mech(), Some(MechChoice::Verdammis));
    assert_eq!(sheet.effective_die(Stat::Overdrive), DieSize::D20);
    assert_eq!(sheet.vitals().slots(), [true, true, false, false, false]);
}

/// Test that a malformed document leaves a blank sheet which is then
/// saved over on the next change.
#[test]
fn test_malformed_document_is_replaced() {
    let store = Arc::new(MemoryStore::new());
    store.set(KEY, "[1, 2").unwrap();

    let session = SheetSession::open(SheetConfig::default(), store.clone());
    assert_eq!(session.snapshot(), CharacterSheet::default());

    session.apply(SheetAction::MonologIncrement);
    let saved = SheetDocument::from_json(&store.get(KEY).unwrap().unwrap()).unwrap();
    assert_eq!(saved.monolog, 1);
}

/// Test that sign-in pulls the remote sheet over the local one.
#[tokio::test(start_paused = true)]
async fn test_sign_in_pull_overwrites_local() {
    let store = Arc::new(MemoryStore::new());
    let remote = Arc::new(MemoryRemoteStore::new());
    let mut remote_sheet = CharacterSheet::default();
    remote_sheet.apply(SheetAction::SetCharName("Remote".into()));
    remote.insert(pilot(), remote_sheet.to_document());

    let session = SheetSession::open(SheetConfig::default(), store.clone());
    session.apply(SheetAction::SetCharName("Local".into()));

    let user = session.sign_in(&auth(), remote.clone(), &creds()).await.unwrap();
    assert_eq!(user, pilot());
    assert_eq!(session.user(), Some(pilot()));
    assert_eq!(session.snapshot().char_name(), "Remote");

    let saved = SheetDocument::from_json(&store.get(KEY).unwrap().unwrap()).unwrap();
    assert_eq!(saved.char_name, "Remote");
    assert_eq!(remote.push_count(), 0);
}

/// Test that signing in with no remote sheet uploads the local one.
#[tokio::test(start_paused = true)]
async fn test_sign_in_uploads_when_remote_empty() {
    let remote = Arc::new(MemoryRemoteStore::new());
    let session = SheetSession::open(SheetConfig::default(), Arc::new(MemoryStore::new()));
    session.apply(SheetAction::SetCharName("Local".into()));

    session.sign_in(&auth(), remote.clone(), &creds()).await.unwrap();
    assert_eq!(remote.push_count(), 1);
    assert_eq!(remote.document(&pilot()).unwrap().char_name, "Local");
}

/// Test that a refused sign-in leaves the session local and notifies.
#[tokio::test]
async fn test_failed_sign_in_notifies() {
    let notifier = Arc::new(RecordingNotifier::new());
    let session = SheetSession::open(SheetConfig::default(), Arc::new(MemoryStore::new()))
        .with_notifier(notifier.clone());

    let result = session
        .sign_in(
            &auth(),
            Arc::new(MemoryRemoteStore::new()),
            &Credentials::new("rin@example.com", "wrong"),
        )
        .await;

    assert!(matches!(result, Err(SheetError::Remote(RemoteError::Auth(_)))));
    assert_eq!(session.user(), None);
    let messages = notifier.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].starts_with("Sign-in failed"));
}

/// Test that a burst of changes produces one debounced push.
#[tokio::test(start_paused = true)]
async fn test_changes_push_once_after_debounce() {
    let remote = Arc::new(MemoryRemoteStore::new());
    remote.insert(pilot(), SheetDocument::default());
    let session = SheetSession::open(SheetConfig::default(), Arc::new(MemoryStore::new()));
    session.sign_in(&auth(), remote.clone(), &creds()).await.unwrap();

    for _ in 0..5 {
        session.apply(SheetAction::AetherIncrement);
        tokio::time::sleep(Duration::from_secs(2)).await;
    }
    assert_eq!(remote.push_count(), 0);

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(remote.push_count(), 1);
    assert_eq!(remote.document(&pilot()).unwrap().aether, 5);
}

/// Test that a failed push is reported once and not retried.
#[tokio::test(start_paused = true)]
async fn test_failed_push_notifies() {
    let remote = Arc::new(MemoryRemoteStore::new());
    remote.insert(pilot(), SheetDocument::default());
    let notifier = Arc::new(RecordingNotifier::new());
    let session = SheetSession::open(SheetConfig::default(), Arc::new(MemoryStore::new()))
        .with_notifier(notifier.clone());
    session.sign_in(&auth(), remote.clone(), &creds()).await.unwrap();

    remote.set_failing(true);
    session.apply(SheetAction::ToggleShield);
    tokio::time::sleep(Duration::from_secs(60)).await;

    assert_eq!(notifier.messages().len(), 1);
    assert!(!remote.document(&pilot()).unwrap().shield_active);
}

/// Test that signing out drops a pending push.
#[tokio::test(start_paused = true)]
async fn test_sign_out_drops_pending_push() {
    let remote = Arc::new(MemoryRemoteStore::new());
    remote.insert(pilot(), SheetDocument::default());
    let session = SheetSession::open(SheetConfig::default(), Arc::new(MemoryStore::new()));
    session.sign_in(&auth(), remote.clone(), &creds()).await.unwrap();

    session.apply(SheetAction::ToggleShield);
    session.sign_out();
    tokio::time::sleep(Duration::from_secs(30)).await;

    assert_eq!(remote.push_count(), 0);
    assert_eq!(session.user(), None);
}

/// Test that a completed roll schedules a push but a busy one does not
/// write anything.
#[tokio::test(start_paused = true)]
async fn test_roll_schedules_push() {
    let remote = Arc::new(MemoryRemoteStore::new());
    remote.insert(pilot(), SheetDocument::default());
    let session = SheetSession::open(SheetConfig::default(), Arc::new(MemoryStore::new()))
        .with_roller(ScriptedRoller::new([4, 5]));
    session.sign_in(&auth(), remote.clone(), &creds()).await.unwrap();

    let (first, second) = tokio::join!(
        session.roll(Stat::Focus, &NullSink),
        session.roll(Stat::Focus, &NullSink)
    );
    assert_eq!(first.outcome().unwrap().total, 9);
    assert!(second.is_busy());

    tokio::time::sleep(Duration::from_secs(11)).await;
    assert_eq!(remote.push_count(), 1);
    assert_eq!(remote.document(&pilot()).unwrap().stat_base_index["Focus"], 1);
}

/// Test that a change applied from a thread outside the runtime is still
/// pushed after sign-in.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_apply_from_plain_thread_pushes() {
    let remote = Arc::new(MemoryRemoteStore::new());
    remote.insert(pilot(), SheetDocument::default());
    let config = SheetConfig {
        sync_debounce_ms: 50,
        ..SheetConfig::default()
    };
    let session = SheetSession::open(config, Arc::new(MemoryStore::new()));
    session.sign_in(&auth(), remote.clone(), &creds()).await.unwrap();

    std::thread::scope(|scope| {
        scope.spawn(|| session.apply(SheetAction::SetCharName("Vex".into())));
    });

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(remote.push_count(), 1);
    assert_eq!(remote.document(&pilot()).unwrap().char_name, "Vex");
}

/// Test that an explicit sync needs a signed-in user and pushes at once.
#[tokio::test(start_paused = true)]
async fn test_sync_now() {
    let remote = Arc::new(MemoryRemoteStore::new());
    remote.insert(pilot(), SheetDocument::default());
    let session = SheetSession::open(SheetConfig::default(), Arc::new(MemoryStore::new()));

    let result = session.sync_now().await;
    assert!(matches!(result, Err(SheetError::Remote(RemoteError::NotSignedIn))));

    session.sign_in(&auth(), remote.clone(), &creds()).await.unwrap();
    session.apply(SheetAction::MonologIncrement);
    session.sync_now().await.unwrap();
    assert_eq!(remote.push_count(), 1);
    assert_eq!(remote.document(&pilot()).unwrap().monolog, 1);

    // The debounced push was replaced by the explicit one.
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(remote.push_count(), 1);
}
