//! Roll results module.
//!
//! Contains the events a roll sequence emits and the outcome it returns.
//! Outcomes are ephemeral: only the base-level change and the total are
//! visible once the sequence ends.

use crate::die::DieSize;
use crate::stat::Stat;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An intermediate event of a roll sequence, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RollEvent {
    /// A die was drawn.
    Rolled {
        stat: Stat,
        faces: u8,
        result: u8,
        crit: bool,
    },
    /// A crit grew the stat; the sequence continues on the larger die.
    Evolved { stat: Stat, die: DieSize },
    /// A crit at the ladder ceiling; the sequence re-rolls the same die.
    CriticalReroll { stat: Stat, result: u8 },
}

impl RollEvent {
    pub fn stat(&self) -> Stat {
        match *self {
            RollEvent::Rolled { stat, .. }
            | RollEvent::Evolved { stat, .. }
            | RollEvent::CriticalReroll { stat, .. } => stat,
        }
    }

    /// Whether this event announces that the sequence will continue.
    pub fn is_continuation(&self) -> bool {
        !matches!(self, RollEvent::Rolled { .. })
    }
}

impl fmt::Display for RollEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            RollEvent::Rolled {
                stat,
                faces,
                result,
                crit,
            } => {
                write!(f, "{} rolls D{} \u{2192} {}", stat, faces, result)?;
                if crit {
                    f.write_str(" (crit!)")?;
                }
                Ok(())
            }
            RollEvent::Evolved { stat, die } => write!(f, "\u{26a1} {} is now a {}!", stat, die),
            RollEvent::CriticalReroll { stat, result } => {
                write!(f, "\u{1f501} {} {} - CRIT! Rolling again...", stat, result)
            }
        }
    }
}

/// The result of one complete roll sequence.
///
/// # Examples
///
/// ```rust
/// use diesheet::{RollOutcome, RollEvent, Stat, DieSize};
///
/// let outcome = RollOutcome {
///     stat: Stat::Focus,
///     total: 3,
///     final_die: DieSize::D4,
///     events: vec![RollEvent::Rolled { stat: Stat::Focus, faces: 4, result: 3, crit: false }],
/// };
/// assert_eq!(outcome.draws().count(), 1);
/// assert_eq!(outcome.to_string(), "Focus total = 3");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollOutcome {
    /// The stat that was rolled.
    pub stat: Stat,
    /// Sum of every draw, re-rolls included.
    pub total: u32,
    /// Effective die after the sequence ended.
    pub final_die: DieSize,
    /// Every event, in emission order.
    pub events: Vec<RollEvent>,
}

impl RollOutcome {
    /// The `(faces, result, crit)` tuple of every draw.
    pub fn draws(&self) -> impl Iterator<Item = (u8, u8, bool)> + '_ {
        self.events.iter().filter_map(|event| match *event {
            RollEvent::Rolled {
                faces,
                result,
                crit,
                ..
            } => Some((faces, result, crit)),
            _ => None,
        })
    }

    /// Number of times the stat evolved during the sequence.
    pub fn evolutions(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, RollEvent::Evolved { .. }))
            .count()
    }
}

impl fmt::Display for RollOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} total = {}", self.stat, self.total)
    }
}

/// What a roll request produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The sequence ran to completion.
    Rolled(RollOutcome),
    /// A sequence for this stat was already in flight; nothing happened.
    Busy(Stat),
}

impl Resolution {
    pub fn outcome(&self) -> Option<&RollOutcome> {
        match self {
            Resolution::Rolled(outcome) => Some(outcome),
            Resolution::Busy(_) => None,
        }
    }

    pub fn into_outcome(self) -> Option<RollOutcome> {
        match self {
            Resolution::Rolled(outcome) => Some(outcome),
            Resolution::Busy(_) => None,
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, Resolution::Busy(_))
    }
}
