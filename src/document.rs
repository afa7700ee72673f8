//! Persisted sheet document.
//!
//! The same JSON shape is written to the local store and to the remote
//! document store. Reading is lenient: every field is optional, older
//! key names are accepted, and range checks happen when the document is
//! applied to a [`CharacterSheet`](crate::CharacterSheet).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A dropdown selection as stored: the option value and its index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SelectionRepr")]
pub struct SelectionRecord {
    /// Option value; empty when nothing is selected.
    pub value: String,
    /// Option index; 0 is the empty option.
    pub index: u32,
}

impl SelectionRecord {
    pub fn new(value: impl Into<String>, index: u32) -> Self {
        Self {
            value: value.into(),
            index,
        }
    }
}

/// Older documents stored only the option value.
#[derive(Deserialize)]
#[serde(untagged)]
enum SelectionRepr {
    Plain(String),
    Record {
        #[serde(default)]
        value: String,
        #[serde(default)]
        index: u32,
    },
}

impl From<SelectionRepr> for SelectionRecord {
    fn from(repr: SelectionRepr) -> Self {
        match repr {
            SelectionRepr::Plain(value) => Self { value, index: 0 },
            SelectionRepr::Record { value, index } => Self { value, index },
        }
    }
}

/// The persisted form of a character sheet.
///
/// # Examples
///
/// ```rust
/// use diesheet::SheetDocument;
///
/// let doc = SheetDocument::from_json(r#"{ "playerName": "Rin", "aetherTokens": 12 }"#).unwrap();
/// assert_eq!(doc.player_name, "Rin");
/// assert_eq!(doc.aether, 12);
/// assert_eq!(doc.rank, "e");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SheetDocument {
    pub player_name: String,
    pub char_name: String,
    pub rank: String,
    pub notes: String,
    #[serde(alias = "aetherTokens")]
    pub aether: i64,
    pub monolog: i64,
    pub background: SelectionRecord,
    pub mech: SelectionRecord,
    pub bonuses_locked: bool,
    pub stat_base_index: BTreeMap<String, i64>,
    pub hp_slots: Vec<bool>,
    pub shield_active: bool,
    pub manual_mode: bool,
}

impl Default for SheetDocument {
    fn default() -> Self {
        Self {
            player_name: String::new(),
            char_name: String::new(),
            rank: "e".to_string(),
            notes: String::new(),
            aether: 0,
            monolog: 0,
            background: SelectionRecord::default(),
            mech: SelectionRecord::default(),
            bonuses_locked: false,
            stat_base_index: BTreeMap::new(),
            hp_slots: Vec::new(),
            shield_active: false,
            manual_mode: false,
        }
    }
}

impl SheetDocument {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
