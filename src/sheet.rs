//! Character sheet aggregate.
//!
//! `CharacterSheet` owns every piece of character state as one value. UI
//! events arrive as [`SheetAction`]s; the sheet applies them, clamping
//! anything out of range, and re-derives the rank whenever an effective
//! die may have moved.

use crate::bonus::{BonusSelection, MechChoice};
use crate::config::SheetConfig;
use crate::context::{RollContext, RollMode};
use crate::die::DieSize;
use crate::document::{SelectionRecord, SheetDocument};
use crate::model::StatModel;
use crate::rank::{Rank, RankCounts};
use crate::resolved::Resolution;
use crate::resolver::{resolve_now, RollSink, StatStore};
use crate::resources::{AetherCounter, MonologMeter};
use crate::roller::DieRoller;
use crate::sanitize::{restore_name, sanitize_name, sanitize_notes};
use crate::source::BonusSource;
use crate::stat::Stat;
use crate::vitals::Vitals;
use std::sync::{Mutex, PoisonError};

/// A user-triggered change to the sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetAction {
    SetPlayerName(String),
    SetCharName(String),
    SetNotes(String),
    AetherIncrement,
    AetherDecrement,
    AetherReset,
    MonologIncrement,
    MonologUse,
    SelectBackground(Option<Stat>),
    SelectMech(Option<MechChoice>),
    LockBonuses,
    /// Manual mode only: move a stat's base level by `delta`, clamped.
    AdjustLevel { stat: Stat, delta: i32 },
    ToggleHpSlot(usize),
    ToggleShield,
    SetMode(RollMode),
    /// Clear every character field back to a blank sheet.
    Reset,
}

/// The full state of one character.
///
/// # Examples
///
/// ```rust
/// use diesheet::{CharacterSheet, SheetAction, SheetConfig, Stat, DieSize, MechChoice};
///
/// let mut sheet = CharacterSheet::new(&SheetConfig::default());
/// sheet.apply(SheetAction::SelectBackground(Some(Stat::Focus)));
/// sheet.apply(SheetAction::SelectMech(Some(MechChoice::Stat(Stat::Focus))));
///
/// assert_eq!(sheet.effective_die(Stat::Focus), DieSize::D8);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterSheet {
    player_name: String,
    char_name: String,
    notes: String,
    aether: AetherCounter,
    monolog: MonologMeter,
    bonuses: BonusSelection,
    stats: StatModel,
    vitals: Vitals,
    mode: RollMode,
    rank: Rank,
}

impl CharacterSheet {
    /// A blank sheet.
    pub fn new(config: &SheetConfig) -> Self {
        Self {
            player_name: String::new(),
            char_name: String::new(),
            notes: String::new(),
            aether: AetherCounter::new(config.aether_max),
            monolog: MonologMeter::new(config.monolog_max),
            bonuses: BonusSelection::new(),
            stats: StatModel::new(),
            vitals: Vitals::new(),
            mode: RollMode::Auto,
            rank: Rank::E,
        }
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn char_name(&self) -> &str {
        &self.char_name
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn aether(&self) -> &AetherCounter {
        &self.aether
    }

    pub fn monolog(&self) -> &MonologMeter {
        &self.monolog
    }

    pub fn bonuses(&self) -> &BonusSelection {
        &self.bonuses
    }

    pub fn stats(&self) -> &StatModel {
        &self.stats
    }

    pub fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    pub fn mode(&self) -> RollMode {
        self.mode
    }

    pub fn rank(&self) -> Rank {
        self.rank
    }

    /// Current effective die of a stat.
    pub fn effective_die(&self, stat: Stat) -> DieSize {
        self.stats.effective_die(stat, &self.bonuses)
    }

    /// Current effective die of every stat, in sheet order.
    pub fn effective_dice(&self) -> [DieSize; 6] {
        self.stats.effective_dice(&self.bonuses)
    }

    pub fn rank_counts(&self) -> RankCounts {
        RankCounts::from_dice(&self.effective_dice())
    }

    /// Re-derive the rank from the current effective dice.
    ///
    /// Returns whether the rank changed.
    pub fn refresh_rank(&mut self) -> bool {
        let rank = self.rank_counts().rank();
        if rank == self.rank {
            return false;
        }
        tracing::info!(from = %self.rank, to = %rank, "rank changed");
        self.rank = rank;
        true
    }

    /// The context a roll for `stat` starts with.
    pub fn roll_context(&self, stat: Stat) -> RollContext {
        RollContext::new(self.mode, self.bonuses.bonus_count(stat))
    }

    /// Roll a stat synchronously, without pauses between steps.
    pub fn roll_now<R>(&mut self, stat: Stat, roller: &mut R, sink: &dyn RollSink) -> Resolution
    where
        R: DieRoller + ?Sized,
    {
        let context = self.roll_context(stat);
        let resolution = resolve_now(&mut self.stats, stat, context, roller, sink);
        self.refresh_rank();
        resolution
    }

    /// Apply one action. Returns whether anything changed.
    pub fn apply(&mut self, action: SheetAction) -> bool {
        let changed = match action {
            SheetAction::SetPlayerName(name) => {
                replace(&mut self.player_name, sanitize_name(&name))
            }
            SheetAction::SetCharName(name) => replace(&mut self.char_name, sanitize_name(&name)),
            SheetAction::SetNotes(notes) => replace(&mut self.notes, sanitize_notes(&notes)),
            SheetAction::AetherIncrement => self.aether.increment(),
            SheetAction::AetherDecrement => self.aether.decrement(),
            SheetAction::AetherReset => self.aether.reset(),
            SheetAction::MonologIncrement => self.monolog.increment(),
            SheetAction::MonologUse => self.monolog.use_meter(),
            SheetAction::SelectBackground(background) => {
                let before = self.bonuses.clone();
                self.bonuses.select_background(background) && before != self.bonuses
            }
            SheetAction::SelectMech(mech) => {
                let before = self.bonuses.clone();
                self.bonuses.select_mech(mech) && before != self.bonuses
            }
            SheetAction::LockBonuses => self.bonuses.lock(),
            SheetAction::AdjustLevel { stat, delta } => {
                if !self.mode.is_manual() {
                    tracing::warn!(stat = %stat, "manual level adjustment outside manual mode");
                    false
                } else {
                    let level = i32::from(self.stats.base_level(stat)).saturating_add(delta);
                    self.stats.set_level(stat, level)
                }
            }
            SheetAction::ToggleHpSlot(index) => self.vitals.toggle_slot(index),
            SheetAction::ToggleShield => {
                self.vitals.toggle_shield();
                true
            }
            SheetAction::SetMode(mode) => replace(&mut self.mode, mode),
            SheetAction::Reset => {
                self.reset();
                true
            }
        };
        if changed {
            self.refresh_rank();
        }
        changed
    }

    /// Clear every character field. The roll mode is a preference and is
    /// kept.
    pub fn reset(&mut self) {
        self.player_name.clear();
        self.char_name.clear();
        self.notes.clear();
        self.aether.reset();
        self.monolog.reset();
        self.bonuses.reset();
        self.stats.reset();
        self.vitals.reset();
        self.rank = Rank::E;
    }

    /// The persisted form of this sheet.
    pub fn to_document(&self) -> SheetDocument {
        SheetDocument {
            player_name: self.player_name.clone(),
            char_name: self.char_name.clone(),
            rank: self.rank.code().to_string(),
            notes: self.notes.clone(),
            aether: i64::from(self.aether.value()),
            monolog: i64::from(self.monolog.value()),
            background: SelectionRecord::new(
                self.bonuses
                    .background()
                    .map(|s| s.to_string())
                    .unwrap_or_default(),
                self.bonuses.background_index(),
            ),
            mech: SelectionRecord::new(
                self.bonuses.mech().map(|m| m.value()).unwrap_or_default(),
                self.bonuses.mech_index(),
            ),
            bonuses_locked: self.bonuses.is_locked(),
            stat_base_index: Stat::ALL
                .iter()
                .map(|&s| (s.to_string(), i64::from(self.stats.base_level(s))))
                .collect(),
            hp_slots: self.vitals.slots().to_vec(),
            shield_active: self.vitals.shield_active(),
            manual_mode: self.mode.is_manual(),
        }
    }

    /// Replace this sheet's state with a stored document.
    ///
    /// Out-of-range values are clamped and unknown names are skipped. Text
    /// fields are sanitized as if they had been typed in. Roll states are
    /// left alone so a roll in flight still finishes cleanly.
    pub fn load_document(&mut self, doc: &SheetDocument) {
        self.player_name = restore_name(&doc.player_name);
        self.char_name = restore_name(&doc.char_name);
        self.notes = sanitize_notes(&doc.notes);
        self.aether.set(clamp_count(doc.aether));
        self.monolog.set(clamp_count(doc.monolog));

        let background = parse_choice::<Stat>("background", &doc.background.value);
        let mech = parse_choice::<MechChoice>("mech", &doc.mech.value);
        self.bonuses = BonusSelection::restore(background, mech, doc.bonuses_locked);

        for stat in Stat::ALL {
            self.stats.set_level(stat, 0);
        }
        for (name, level) in &doc.stat_base_index {
            match name.parse::<Stat>() {
                Ok(stat) => {
                    self.stats
                        .set_level(stat, (*level).clamp(i32::MIN.into(), i32::MAX.into()) as i32);
                }
                Err(_) => tracing::warn!(stat = %name, "unknown stat in document"),
            }
        }

        self.vitals = Vitals::restore(&doc.hp_slots, doc.shield_active);
        self.mode = if doc.manual_mode {
            RollMode::Manual
        } else {
            RollMode::Auto
        };
        self.refresh_rank();
    }

    /// Build a sheet from a stored document.
    pub fn from_document(doc: &SheetDocument, config: &SheetConfig) -> Self {
        let mut sheet = Self::new(config);
        sheet.load_document(doc);
        sheet
    }
}

impl Default for CharacterSheet {
    fn default() -> Self {
        Self::new(&SheetConfig::default())
    }
}

impl StatStore for Mutex<CharacterSheet> {
    fn roll_context(&self, stat: Stat) -> RollContext {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .roll_context(stat)
    }

    fn with_stats<R>(&self, f: impl FnOnce(&mut StatModel) -> R) -> R {
        let mut sheet = self.lock().unwrap_or_else(PoisonError::into_inner);
        let result = f(&mut sheet.stats);
        sheet.refresh_rank();
        result
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

fn clamp_count(value: i64) -> u32 {
    value.clamp(0, i64::from(u32::MAX)) as u32
}

fn parse_choice<T: std::str::FromStr>(field: &str, value: &str) -> Option<T> {
    if value.is_empty() {
        return None;
    }
    let parsed = value.parse().ok();
    if parsed.is_none() {
        tracing::warn!(field, value, "unknown selection in document");
    }
    parsed
}
