//! # diesheet - Mega Mecha Overdrive Character Sheet Engine
//!
//! A character sheet engine for the Mega Mecha Overdrive tabletop game that
//! provides:
//! - **Die evolution**: stats are dice on a fixed ladder that grow when rolled high
//! - **Deterministic** rules (the same draws always produce the same outcome)
//! - **Ordered** roll events, each observable before the next draw
//! - **Persistence** to a local store with optional debounced remote sync
//!
//! ## Core Concepts
//!
//! ### Die Ladder
//!
//! Every stat is a die on the ladder:
//!
//! ```text
//! D4 → D6 → D8 → D10 → D12 → D20
//! ```
//!
//! A stat's effective die is its base level plus one step per matching
//! background or mech bonus, capped at the D20.
//!
//! ### Roll Sequence
//!
//! 1. Draw the effective die and add it to the total
//! 2. A maximum face below the D20 grows the stat and draws the bigger die
//! 3. A maximum face on the D20 draws the D20 again
//! 4. Any other face ends the sequence
//!
//! In manual mode every sequence ends after one draw.
//!
//! ### Rank
//!
//! The character's rank (E through S) is derived from how many stats have
//! reached each die size and is recomputed whenever an effective die moves.
//!
//! ## Example
//!
//! ```rust
//! use diesheet::*;
//! use diesheet::resolver::NullSink;
//! use diesheet::roller::ScriptedRoller;
//!
//! let mut sheet = CharacterSheet::new(&SheetConfig::default());
//! sheet.apply(SheetAction::SelectBackground(Some(Stat::Focus)));
//!
//! // D6 rolls 6, Focus grows to a D8 which rolls 2
//! let mut roller = ScriptedRoller::new([6, 2]);
//! let outcome = sheet.roll_now(Stat::Focus, &mut roller, &NullSink).into_outcome().unwrap();
//!
//! assert_eq!(outcome.total, 8);
//! assert_eq!(sheet.effective_die(Stat::Focus), DieSize::D8);
//! ```
//!
//! ## Modules
//!
//! - [`stat`] - The six named stats
//! - [`die`] - Die ladder and effective die computation
//! - [`source`] - Bonus count sources
//! - [`bonus`] - Background and mech bonus selection
//! - [`model`] - Per-stat growth and roll state
//! - [`roller`] - Random draws
//! - [`context`] - Roll mode and per-roll context
//! - [`resolver`] - Roll sequence state machine and async driver
//! - [`resolved`] - Roll events and outcomes
//! - [`rank`] - Rank derivation
//! - [`resources`] - Aether tokens and the Monolog-o-meter
//! - [`vitals`] - HP slots and shield
//! - [`sanitize`] - Free-text sanitization
//! - [`sheet`] - The character sheet aggregate
//! - [`document`] - Persisted document format
//! - [`storage`] - Local key-value stores
//! - [`sync`] - Authentication and remote sync
//! - [`session`] - Sheet session with persistence
//! - [`config`] - Configuration
//! - [`error`] - Error types

pub mod bonus;
pub mod config;
pub mod context;
pub mod die;
pub mod document;
pub mod error;
pub mod model;
pub mod rank;
pub mod resolved;
pub mod resolver;
pub mod resources;
pub mod roller;
pub mod sanitize;
pub mod session;
pub mod sheet;
pub mod source;
pub mod stat;
pub mod storage;
pub mod sync;
pub mod vitals;

// Re-export main types for convenience
pub use config::SheetConfig;
pub use context::{RollContext, RollMode};
pub use die::DieSize;
pub use error::{RemoteError, SheetError, StorageError};
pub use model::{RollState, StatModel};
pub use resolved::{Resolution, RollEvent, RollOutcome};
pub use resolver::{RollResolver, RollSequence, RollSink, StatStore};
pub use session::SheetSession;
pub use sheet::{CharacterSheet, SheetAction};
pub use stat::Stat;

// Re-export bonus types
pub use bonus::{BonusSelection, MechChoice};
pub use source::BonusSource;

// Re-export derived and persisted types
pub use document::{SelectionRecord, SheetDocument};
pub use rank::{derive_rank, Rank};
