//! Background and mech bonus selection.
//!
//! A character picks one background and one mech. Each choice names a stat
//! and grants that stat one step up the die ladder, so a stat can receive
//! at most two bonus steps. The Verdammis-class mech is a special option
//! that counts as `Overdrive` and is only available to Overdrive
//! backgrounds, which in turn cannot take the ordinary Overdrive mech.

use crate::source::BonusSource;
use crate::stat::Stat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Document value of the Verdammis-class mech option.
pub const VERDAMMIS_VALUE: &str = "VerdammisMech";

/// Dropdown index of the Verdammis-class mech option.
pub const VERDAMMIS_INDEX: u32 = 7;

/// A mech choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MechChoice {
    /// An ordinary mech that boosts the named stat.
    Stat(Stat),
    /// The Verdammis-class Ifrit. Boosts `Overdrive`.
    Verdammis,
}

impl MechChoice {
    /// The stat this mech boosts.
    pub fn boosted_stat(self) -> Stat {
        match self {
            MechChoice::Stat(stat) => stat,
            MechChoice::Verdammis => Stat::Overdrive,
        }
    }

    /// Value stored in the persisted document.
    pub fn value(self) -> String {
        match self {
            MechChoice::Stat(stat) => stat.to_string(),
            MechChoice::Verdammis => VERDAMMIS_VALUE.to_string(),
        }
    }

    /// Dropdown index of this option (the empty option is 0).
    pub fn index(self) -> u32 {
        match self {
            MechChoice::Stat(stat) => stat.index() as u32 + 1,
            MechChoice::Verdammis => VERDAMMIS_INDEX,
        }
    }
}

impl fmt::Display for MechChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value())
    }
}

impl FromStr for MechChoice {
    type Err = strum::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == VERDAMMIS_VALUE {
            return Ok(MechChoice::Verdammis);
        }
        s.parse().map(MechChoice::Stat)
    }
}

/// The background/mech selection for a character.
///
/// # Examples
///
/// ```rust
/// use diesheet::{BonusSelection, BonusSource, MechChoice, Stat};
///
/// let mut bonuses = BonusSelection::new();
/// assert!(bonuses.select_background(Some(Stat::Overdrive)));
/// assert!(bonuses.select_mech(Some(MechChoice::Verdammis)));
///
/// // Verdammis counts as Overdrive, so both bonuses stack.
/// assert_eq!(bonuses.bonus_count(Stat::Overdrive), 2);
///
/// assert!(bonuses.lock());
/// assert!(!bonuses.select_background(Some(Stat::Focus)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BonusSelection {
    background: Option<Stat>,
    mech: Option<MechChoice>,
    locked: bool,
}

impl BonusSelection {
    /// Create an empty, unlocked selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a selection from stored values.
    ///
    /// The same rules as interactive selection apply, so a stored mech that
    /// is not available for the stored background is dropped.
    pub fn restore(background: Option<Stat>, mech: Option<MechChoice>, locked: bool) -> Self {
        let mut selection = Self::new();
        selection.select_background(background);
        if mech.is_some_and(|m| selection.is_mech_enabled(m)) {
            selection.mech = mech;
        }
        selection.locked = locked;
        selection
    }

    pub fn background(&self) -> Option<Stat> {
        self.background
    }

    pub fn mech(&self) -> Option<MechChoice> {
        self.mech
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Whether both a background and a mech have been chosen.
    pub fn is_complete(&self) -> bool {
        self.background.is_some() && self.mech.is_some()
    }

    /// Whether a mech option can currently be selected.
    ///
    /// Verdammis is only offered to Overdrive backgrounds, and the ordinary
    /// Overdrive mech is withheld from them.
    pub fn is_mech_enabled(&self, choice: MechChoice) -> bool {
        let overdrive_background = self.background == Some(Stat::Overdrive);
        match choice {
            MechChoice::Verdammis => overdrive_background,
            MechChoice::Stat(Stat::Overdrive) => !overdrive_background,
            MechChoice::Stat(_) => true,
        }
    }

    /// Choose (or clear) the background.
    ///
    /// Returns `false` without changing anything if the selection is locked.
    /// A mech choice that becomes unavailable is cleared.
    pub fn select_background(&mut self, background: Option<Stat>) -> bool {
        if self.locked {
            return false;
        }
        self.background = background;
        if self.mech.is_some_and(|m| !self.is_mech_enabled(m)) {
            self.mech = None;
        }
        true
    }

    /// Choose (or clear) the mech.
    ///
    /// Returns `false` if the selection is locked or the option is disabled
    /// for the current background.
    pub fn select_mech(&mut self, mech: Option<MechChoice>) -> bool {
        if self.locked {
            return false;
        }
        if mech.is_some_and(|m| !self.is_mech_enabled(m)) {
            return false;
        }
        self.mech = mech;
        true
    }

    /// Lock both choices in. Only possible once both are made.
    pub fn lock(&mut self) -> bool {
        if self.locked || !self.is_complete() {
            return false;
        }
        self.locked = true;
        true
    }

    /// Clear both choices and unlock.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Dropdown index of the background (0 when unset).
    pub fn background_index(&self) -> u32 {
        self.background.map_or(0, |s| s.index() as u32 + 1)
    }

    /// Dropdown index of the mech (0 when unset).
    pub fn mech_index(&self) -> u32 {
        self.mech.map_or(0, MechChoice::index)
    }
}

impl BonusSource for BonusSelection {
    fn bonus_count(&self, stat: Stat) -> u8 {
        let mut count = 0;
        if self.background == Some(stat) {
            count += 1;
        }
        if self.mech.map(MechChoice::boosted_stat) == Some(stat) {
            count += 1;
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bonus_count_background_and_mech() {
        let mut bonuses = BonusSelection::new();
        bonuses.select_background(Some(Stat::Focus));
        bonuses.select_mech(Some(MechChoice::Stat(Stat::Style)));

        assert_eq!(bonuses.bonus_count(Stat::Focus), 1);
        assert_eq!(bonuses.bonus_count(Stat::Style), 1);
        assert_eq!(bonuses.bonus_count(Stat::Instinct), 0);
    }

    #[test]
    fn test_bonus_stacks_on_same_stat() {
        let mut bonuses = BonusSelection::new();
        bonuses.select_background(Some(Stat::Resonance));
        bonuses.select_mech(Some(MechChoice::Stat(Stat::Resonance)));
        assert_eq!(bonuses.bonus_count(Stat::Resonance), 2);
    }

    #[test]
    fn test_verdammis_aliases_overdrive() {
        let mut bonuses = BonusSelection::new();
        bonuses.select_background(Some(Stat::Overdrive));
        assert!(bonuses.select_mech(Some(MechChoice::Verdammis)));
        assert_eq!(bonuses.bonus_count(Stat::Overdrive), 2);
    }

    #[test]
    fn test_verdammis_requires_overdrive_background() {
        let mut bonuses = BonusSelection::new();
        bonuses.select_background(Some(Stat::Focus));
        assert!(!bonuses.select_mech(Some(MechChoice::Verdammis)));
        assert_eq!(bonuses.mech(), None);
    }

    #[test]
    fn test_overdrive_background_withholds_plain_overdrive_mech() {
        let mut bonuses = BonusSelection::new();
        bonuses.select_mech(Some(MechChoice::Stat(Stat::Overdrive)));
        bonuses.select_background(Some(Stat::Overdrive));
        assert_eq!(bonuses.mech(), None);
        assert!(!bonuses.select_mech(Some(MechChoice::Stat(Stat::Overdrive))));
    }

    #[test]
    fn test_leaving_overdrive_background_clears_verdammis() {
        let mut bonuses = BonusSelection::new();
        bonuses.select_background(Some(Stat::Overdrive));
        bonuses.select_mech(Some(MechChoice::Verdammis));
        bonuses.select_background(Some(Stat::Willpower));
        assert_eq!(bonuses.mech(), None);
    }

    #[test]
    fn test_lock_requires_both_choices() {
        let mut bonuses = BonusSelection::new();
        assert!(!bonuses.lock());
        bonuses.select_background(Some(Stat::Focus));
        assert!(!bonuses.lock());
        bonuses.select_mech(Some(MechChoice::Stat(Stat::Instinct)));
        assert!(bonuses.lock());
        assert!(bonuses.is_locked());
        assert!(!bonuses.select_mech(None));
    }

    #[test]
    fn test_reset_unlocks() {
        let mut bonuses = BonusSelection::restore(
            Some(Stat::Focus),
            Some(MechChoice::Stat(Stat::Style)),
            true,
        );
        bonuses.reset();
        assert_eq!(bonuses, BonusSelection::new());
    }

    #[test]
    fn test_restore_drops_unavailable_mech() {
        let mech = Some(MechChoice::Verdammis);
        let bonuses = BonusSelection::restore(Some(Stat::Focus), mech, false);
        assert_eq!(bonuses.background(), Some(Stat::Focus));
        assert_eq!(bonuses.mech(), None);
    }

    #[test]
    fn test_indices() {
        let bonuses = BonusSelection::restore(
            Some(Stat::Overdrive),
            Some(MechChoice::Verdammis),
            false,
        );
        assert_eq!(bonuses.background_index(), 3);
        assert_eq!(bonuses.mech_index(), VERDAMMIS_INDEX);
        assert_eq!(BonusSelection::new().mech_index(), 0);
    }

    #[test]
    fn test_mech_choice_parse() {
        assert_eq!("VerdammisMech".parse::<MechChoice>().unwrap(), MechChoice::Verdammis);
        assert_eq!(
            "Style".parse::<MechChoice>().unwrap(),
            MechChoice::Stat(Stat::Style)
        );
        assert!("".parse::<MechChoice>().is_err());
    }
}
