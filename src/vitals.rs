//! Hit-point and shield track.

/// Number of hit-point slots on the sheet.
pub const HP_SLOTS: usize = 5;

/// Five hit-point slots and a shield toggle.
///
/// # Examples
///
/// ```rust
/// use diesheet::vitals::Vitals;
///
/// let mut vitals = Vitals::new();
/// assert!(vitals.toggle_slot(0));
/// assert_eq!(vitals.slots(), [true, false, false, false, false]);
/// assert!(!vitals.toggle_slot(9));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Vitals {
    slots: [bool; HP_SLOTS],
    shield: bool,
}

impl Vitals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from stored values. Missing slots read as unmarked; extra
    /// slots are ignored.
    pub fn restore(slots: &[bool], shield: bool) -> Self {
        let mut vitals = Self::new();
        for (slot, value) in vitals.slots.iter_mut().zip(slots) {
            *slot = *value;
        }
        vitals.shield = shield;
        vitals
    }

    pub fn slots(&self) -> [bool; HP_SLOTS] {
        self.slots
    }

    pub fn shield_active(&self) -> bool {
        self.shield
    }

    /// Flip one slot. An out-of-range index is a no-op returning `false`.
    pub fn toggle_slot(&mut self, index: usize) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) => {
                *slot = !*slot;
                true
            }
            None => false,
        }
    }

    pub fn toggle_shield(&mut self) {
        self.shield = !self.shield;
    }

    /// Number of marked slots.
    pub fn marked(&self) -> usize {
        self.slots.iter().filter(|&&s| s).count()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
