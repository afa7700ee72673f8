//! Evolution example: Rolling stats until they grow
//!
//! This example demonstrates:
//! - Auto-mode rolls that evolve a die on a maximum face
//! - Re-rolls at the D20 ceiling
//! - Pauses between steps with a seeded roller

use diesheet::resolver::RollSink;
use diesheet::roller::RngRoller;
use diesheet::*;
use std::sync::Mutex;
use tracing_subscriber::prelude::*;

struct PrintSink;

impl RollSink for PrintSink {
    fn on_event(&self, event: &RollEvent) {
        println!("  {}", event);
    }

    fn on_total(&self, outcome: &RollOutcome) {
        println!("  => {}\n", outcome);
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "diesheet=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = SheetConfig::from_env();
    let sheet = Mutex::new(CharacterSheet::new(&config));
    let roller = Mutex::new(RngRoller::seeded(2024));
    let resolver = RollResolver::new(config.roll_delay());

    for round in 1..=5 {
        println!("--- Round {} ---", round);
        for stat in [Stat::Focus, Stat::Overdrive] {
            resolver.resolve(&sheet, stat, &roller, &PrintSink).await;
        }
    }

    let sheet = sheet.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    println!("Final dice:");
    for stat in Stat::ALL {
        println!("  {:<10} {}", stat, sheet.effective_die(stat));
    }
    println!("Rank: {}", sheet.rank().code().to_uppercase());
}
