//! Session example: Persistence and remote sync
//!
//! This example demonstrates:
//! - Opening a session over a file store
//! - Concurrent rolls on different stats
//! - Signing in and the debounced remote push

use diesheet::resolver::RecordingSink;
use diesheet::storage::FileStore;
use diesheet::sync::{
    Credentials, MemoryRemoteStore, RecordingNotifier, StaticAuthenticator, UserId,
};
use diesheet::*;
use std::sync::Arc;
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<(), SheetError> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "diesheet=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = SheetConfig {
        sync_debounce_ms: 1_000,
        ..SheetConfig::from_env()
    };
    let path = std::env::temp_dir().join("diesheet-demo.json");
    let store = Arc::new(FileStore::open(&path)?);
    let notifier = Arc::new(RecordingNotifier::new());
    let session = SheetSession::open(config, store).with_notifier(notifier.clone());
    println!("Storage: {}", path.display());

    let auth = StaticAuthenticator::new().with_account(
        "pilot@example.com",
        "overdrive",
        UserId("pilot".to_string()),
    );
    let remote = Arc::new(MemoryRemoteStore::new());
    let user = session
        .sign_in(&auth, remote.clone(), &Credentials::new("pilot@example.com", "overdrive"))
        .await?;
    println!("Signed in as {}", user);

    session.apply(SheetAction::SelectBackground(Some(Stat::Willpower)));
    session.apply(SheetAction::AetherIncrement);

    let sink = RecordingSink::new();
    let (willpower, style, again) = tokio::join!(
        session.roll(Stat::Willpower, &sink),
        session.roll(Stat::Style, &sink),
        session.roll(Stat::Willpower, &sink),
    );
    for resolution in [willpower, style, again] {
        match resolution {
            Resolution::Rolled(outcome) => println!("{}", outcome),
            Resolution::Busy(stat) => println!("{} was already rolling", stat),
        }
    }
    for event in sink.events() {
        println!("  {}", event);
    }

    tokio::time::sleep(session.config().sync_debounce() * 2).await;
    println!("Remote pushes: {}", remote.push_count());
    for message in notifier.messages() {
        println!("Notice: {}", message);
    }

    let sheet = session.snapshot();
    println!("Rank: {}", sheet.rank().code().to_uppercase());
    Ok(())
}
