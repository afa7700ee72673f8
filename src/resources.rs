//! Consumable resource counters.
//!
//! Aether tokens are spent and earned one at a time within `[0, max]`.
//! The Monolog-o-meter fills one step at a time and can only be used
//! (emptied) once full. Requests outside the range are clamped no-ops.

/// Default Aether token cap.
pub const DEFAULT_AETHER_MAX: u32 = 200;

/// Default Monolog-o-meter capacity.
pub const DEFAULT_MONOLOG_MAX: u32 = 6;

/// Aether token counter.
///
/// # Examples
///
/// ```rust
/// use diesheet::resources::AetherCounter;
///
/// let mut aether = AetherCounter::new(200);
/// aether.set(200);
/// assert!(!aether.increment());
/// assert_eq!(aether.value(), 200);
/// assert!(aether.can_decrement());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AetherCounter {
    value: u32,
    max: u32,
}

impl AetherCounter {
    pub fn new(max: u32) -> Self {
        Self { value: 0, max }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    /// Set the value, clamped to `[0, max]`.
    pub fn set(&mut self, value: u32) {
        self.value = value.min(self.max);
    }

    /// Add one token unless at the cap. Returns whether the value changed.
    pub fn increment(&mut self) -> bool {
        if self.value < self.max {
            self.value += 1;
            true
        } else {
            false
        }
    }

    /// Spend one token unless empty. Returns whether the value changed.
    pub fn decrement(&mut self) -> bool {
        if self.value > 0 {
            self.value -= 1;
            true
        } else {
            false
        }
    }

    /// Drop back to zero. Returns whether the value changed.
    pub fn reset(&mut self) -> bool {
        let changed = self.value != 0;
        self.value = 0;
        changed
    }

    pub fn can_increment(&self) -> bool {
        self.value < self.max
    }

    pub fn can_decrement(&self) -> bool {
        self.value > 0
    }
}

impl Default for AetherCounter {
    fn default() -> Self {
        Self::new(DEFAULT_AETHER_MAX)
    }
}

/// The Monolog-o-meter.
///
/// # Examples
///
/// ```rust
/// use diesheet::resources::MonologMeter;
///
/// let mut meter = MonologMeter::new(2);
/// assert!(!meter.use_meter());
/// meter.increment();
/// meter.increment();
/// assert!(meter.can_use());
/// assert!(meter.use_meter());
/// assert_eq!(meter.value(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonologMeter {
    value: u32,
    max: u32,
}

impl MonologMeter {
    pub fn new(max: u32) -> Self {
        Self { value: 0, max }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    /// Set the value, clamped to `[0, max]`.
    pub fn set(&mut self, value: u32) {
        self.value = value.min(self.max);
    }

    /// Fill one step unless full. Returns whether the value changed.
    pub fn increment(&mut self) -> bool {
        if self.value < self.max {
            self.value += 1;
            true
        } else {
            false
        }
    }

    /// Whether the meter is full and can be used.
    pub fn can_use(&self) -> bool {
        self.value >= self.max
    }

    pub fn can_increment(&self) -> bool {
        self.value < self.max
    }

    /// Empty a full meter. Returns `false` if it was not full.
    pub fn use_meter(&mut self) -> bool {
        if !self.can_use() {
            return false;
        }
        self.value = 0;
        true
    }

    /// Empty the meter regardless of its level.
    pub fn reset(&mut self) {
        self.value = 0;
    }
}

impl Default for MonologMeter {
    fn default() -> Self {
        Self::new(DEFAULT_MONOLOG_MAX)
    }
}
