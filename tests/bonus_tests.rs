//! Tests for bonus selection and the sheet rules around it.
//!
//! These tests verify:
//! - Background and mech selection, including the Verdammis mech
//! - Lock gating
//! - Rank derivation as bonuses and levels change
//! - Resource and vitals actions through the sheet

use diesheet::*;
use strum::IntoEnumIterator;

fn sheet() -> CharacterSheet {
    CharacterSheet::new(&SheetConfig::default())
}

/// Test that background and mech on the same stat stack two steps.
#[test]
fn test_background_and_mech_stack() {
    let mut sheet = sheet();
    sheet.apply(SheetAction::SelectBackground(Some(Stat::Instinct)));
    sheet.apply(SheetAction::SelectMech(Some(MechChoice::Stat(Stat::Instinct))));

    assert_eq!(sheet.bonuses().bonus_count(Stat::Instinct), 2);
    assert_eq!(sheet.effective_die(Stat::Instinct), DieSize::D8);
    for stat in Stat::iter().filter(|&s| s != Stat::Instinct) {
        assert_eq!(sheet.effective_die(stat), DieSize::D4);
    }
}

/// Test that the Verdammis mech boosts Overdrive and needs an Overdrive
/// background.
#[test]
fn test_verdammis_requires_overdrive_background() {
    let mut sheet = sheet();
    assert!(!sheet.apply(SheetAction::SelectMech(Some(MechChoice::Verdammis))));

    sheet.apply(SheetAction::SelectBackground(Some(Stat::Overdrive)));
    assert!(!sheet.apply(SheetAction::SelectMech(Some(MechChoice::Stat(Stat::Overdrive)))));
    assert!(sheet.apply(SheetAction::SelectMech(Some(MechChoice::Verdammis))));
    assert_eq!(sheet.effective_die(Stat::Overdrive), DieSize::D8);

    // Moving the background away drops the Verdammis mech.
    sheet.apply(SheetAction::SelectBackground(Some(Stat::Focus)));
    assert_eq!(sheet.bonuses().mech(), None);
    assert_eq!(sheet.effective_die(Stat::Overdrive), DieSize::D4);
    assert_eq!(sheet.effective_die(Stat::Focus), DieSize::D6);
}

/// Test that an Overdrive mech is cleared when the background becomes
/// Overdrive.
#[test]
fn test_overdrive_background_clears_overdrive_mech() {
    let mut sheet = sheet();
    sheet.apply(SheetAction::SelectMech(Some(MechChoice::Stat(Stat::Overdrive))));
    assert_eq!(sheet.effective_die(Stat::Overdrive), DieSize::D6);

    sheet.apply(SheetAction::SelectBackground(Some(Stat::Overdrive)));
    assert_eq!(sheet.bonuses().mech(), None);
    assert_eq!(sheet.effective_die(Stat::Overdrive), DieSize::D6);
}

/// Test that locking needs both choices and freezes them.
#[test]
fn test_lock_gating() {
    let mut sheet = sheet();
    sheet.apply(SheetAction::SelectBackground(Some(Stat::Style)));
    assert!(!sheet.apply(SheetAction::LockBonuses));

    sheet.apply(SheetAction::SelectMech(Some(MechChoice::Stat(Stat::Focus))));
    assert!(sheet.apply(SheetAction::LockBonuses));
    assert!(sheet.bonuses().is_locked());
    assert!(!sheet.apply(SheetAction::LockBonuses));

    assert!(!sheet.apply(SheetAction::SelectBackground(Some(Stat::Focus))));
    assert!(!sheet.apply(SheetAction::SelectMech(None)));
    assert_eq!(sheet.bonuses().background(), Some(Stat::Style));

    sheet.apply(SheetAction::Reset);
    assert!(!sheet.bonuses().is_locked());
    assert_eq!(sheet.bonuses().background(), None);
}

/// Test dropdown indices of the stored selections.
#[test]
fn test_selection_indices() {
    let mut sheet = sheet();
    sheet.apply(SheetAction::SelectBackground(Some(Stat::Overdrive)));
    sheet.apply(SheetAction::SelectMech(Some(MechChoice::Verdammis)));

    let doc = sheet.to_document();
    assert_eq!(doc.background, SelectionRecord::new("Overdrive", 3));
    assert_eq!(doc.mech, SelectionRecord::new("VerdammisMech", 7));
}

/// Test rank thresholds through manual adjustment.
#[test]
fn test_rank_ladder() {
    let mut sheet = sheet();
    sheet.apply(SheetAction::SetMode(RollMode::Manual));
    let four = [Stat::Focus, Stat::Instinct, Stat::Overdrive, Stat::Resonance];

    let expected = [Rank::D, Rank::C, Rank::B, Rank::A];
    for rank in expected {
        for stat in four {
            sheet.apply(SheetAction::AdjustLevel { stat, delta: 1 });
        }
        assert_eq!(sheet.rank(), rank);
    }

    // Four stats at D20 stay at A; S needs all six.
    for stat in four {
        sheet.apply(SheetAction::AdjustLevel { stat, delta: 1 });
    }
    assert_eq!(sheet.rank(), Rank::A);
    for stat in [Stat::Style, Stat::Willpower] {
        sheet.apply(SheetAction::AdjustLevel { stat, delta: 5 });
    }
    assert_eq!(sheet.rank(), Rank::S);

    assert!(!sheet.refresh_rank());
    assert_eq!(sheet.rank(), Rank::S);
}

/// Test that a bonus can carry the fourth stat over a threshold.
#[test]
fn test_bonus_unlocks_rank() {
    let mut sheet = sheet();
    sheet.apply(SheetAction::SetMode(RollMode::Manual));
    for stat in [Stat::Focus, Stat::Instinct, Stat::Overdrive] {
        sheet.apply(SheetAction::AdjustLevel { stat, delta: 2 });
    }
    sheet.apply(SheetAction::AdjustLevel {
        stat: Stat::Style,
        delta: 1,
    });
    assert_eq!(sheet.rank(), Rank::D);

    sheet.apply(SheetAction::SelectBackground(Some(Stat::Style)));
    assert_eq!(sheet.rank_counts().at_least_d8, 4);
    assert_eq!(sheet.rank(), Rank::C);

    sheet.apply(SheetAction::SelectBackground(None));
    assert_eq!(sheet.rank(), Rank::D);
}

/// Test that aether clamps at its maximum and decrement stays enabled.
#[test]
fn test_aether_clamps_at_max() {
    let doc = SheetDocument {
        aether: 200,
        ..SheetDocument::default()
    };
    let mut sheet = CharacterSheet::from_document(&doc, &SheetConfig::default());

    assert!(!sheet.apply(SheetAction::AetherIncrement));
    assert_eq!(sheet.aether().value(), 200);
    assert!(!sheet.aether().can_increment());
    assert!(sheet.aether().can_decrement());

    assert!(sheet.apply(SheetAction::AetherDecrement));
    assert_eq!(sheet.aether().value(), 199);
    assert!(sheet.apply(SheetAction::AetherReset));
    assert_eq!(sheet.aether().value(), 0);
    assert!(!sheet.apply(SheetAction::AetherDecrement));
}

/// Test that the Monolog-o-meter can only be used when full.
#[test]
fn test_monolog_use_when_full() {
    let mut sheet = sheet();
    assert!(!sheet.apply(SheetAction::MonologUse));
    for _ in 0..10 {
        sheet.apply(SheetAction::MonologIncrement);
    }
    assert_eq!(sheet.monolog().value(), 6);
    assert!(sheet.monolog().can_use());

    assert!(sheet.apply(SheetAction::MonologUse));
    assert_eq!(sheet.monolog().value(), 0);
}

/// Test that a configured meter capacity is honored.
#[test]
fn test_monolog_configured_capacity() {
    let config = SheetConfig {
        monolog_max: 5,
        ..SheetConfig::default()
    };
    let mut sheet = CharacterSheet::new(&config);
    for _ in 0..5 {
        sheet.apply(SheetAction::MonologIncrement);
    }
    assert!(sheet.monolog().can_use());
    assert!(!sheet.apply(SheetAction::MonologIncrement));
}

/// Test HP slot and shield toggles.
#[test]
fn test_vitals_toggles() {
    let mut sheet = sheet();
    assert!(sheet.apply(SheetAction::ToggleHpSlot(2)));
    assert!(!sheet.apply(SheetAction::ToggleHpSlot(5)));
    assert!(sheet.apply(SheetAction::ToggleShield));

    assert_eq!(sheet.vitals().slots(), [false, false, true, false, false]);
    assert!(sheet.vitals().shield_active());

    sheet.apply(SheetAction::ToggleHpSlot(2));
    assert_eq!(sheet.vitals().marked(), 0);
}
