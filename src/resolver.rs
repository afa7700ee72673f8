//! Roll resolver module.
//!
//! Executes one complete roll sequence for a stat: draw the effective die,
//! accumulate, and on a maximum face either evolve the stat (below the
//! ladder ceiling) or re-roll the same die (at the ceiling) until a
//! non-maximum face ends the sequence. In manual mode every sequence ends
//! after one draw.
//!
//! The sequence itself is the synchronous state machine [`RollSequence`].
//! [`RollResolver`] drives it asynchronously, pausing after every
//! continuation announcement so an observer sees each event before the
//! next draw replaces it.

use crate::context::RollContext;
use crate::die::{effective_index, DieSize};
use crate::model::StatModel;
use crate::resolved::{Resolution, RollEvent, RollOutcome};
use crate::roller::DieRoller;
use crate::stat::Stat;
use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Default pause between a continuation announcement and the next draw.
pub const DEFAULT_ROLL_DELAY: Duration = Duration::from_millis(600);

/// Receives roll events for display.
pub trait RollSink: Send + Sync {
    /// Called once per event, in emission order.
    fn on_event(&self, event: &RollEvent);

    /// Called once when a sequence finishes.
    fn on_total(&self, _outcome: &RollOutcome) {}
}

/// A sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl RollSink for NullSink {
    fn on_event(&self, _event: &RollEvent) {}
}

/// A sink that records everything it receives.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<RollEvent>>,
    totals: Mutex<Vec<(Stat, u32)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events received so far, in order.
    pub fn events(&self) -> Vec<RollEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Totals received so far, in order.
    pub fn totals(&self) -> Vec<(Stat, u32)> {
        self.totals
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl RollSink for RecordingSink {
    fn on_event(&self, event: &RollEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(*event);
    }

    fn on_total(&self, outcome: &RollOutcome) {
        self.totals
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((outcome.stat, outcome.total));
    }
}

/// Async pause used between roll steps.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Never pauses.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

#[async_trait]
impl Sleeper for NoDelay {
    async fn sleep(&self, _duration: Duration) {}
}

/// Shared state a roll can be driven against.
///
/// Implementations hand out short, non-suspending access to the stat
/// model. The resolver never holds that access across a pause, so
/// sequences for different stats interleave freely.
pub trait StatStore {
    /// The context a sequence for `stat` should start with.
    fn roll_context(&self, stat: Stat) -> RollContext;

    /// Run `f` with exclusive access to the stat model.
    fn with_stats<R>(&self, f: impl FnOnce(&mut StatModel) -> R) -> R;
}

/// Whether a sequence continues after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    Finished,
}

/// State machine for one roll sequence.
///
/// # Examples
///
/// ```rust
/// use diesheet::resolver::{RollSequence, Step};
/// use diesheet::roller::ScriptedRoller;
/// use diesheet::{RollContext, RollMode, Stat, StatModel};
///
/// let mut model = StatModel::new();
/// let mut roller = ScriptedRoller::new([4, 3]);
/// let context = RollContext::default();
/// let mut sequence = RollSequence::start(&mut model, Stat::Focus, context).unwrap();
///
/// assert_eq!(sequence.step(&mut model, &mut roller), Step::Continue);
/// assert_eq!(sequence.step(&mut model, &mut roller), Step::Finished);
///
/// let outcome = sequence.finish(&mut model);
/// assert_eq!(outcome.total, 7);
/// assert_eq!(model.base_level(Stat::Focus), 1);
/// ```
#[derive(Debug, Clone)]
pub struct RollSequence {
    stat: Stat,
    context: RollContext,
    index: usize,
    total: u32,
    events: Vec<RollEvent>,
    finished: bool,
}

impl RollSequence {
    /// Mark `stat` as resolving and set up a sequence on its effective die.
    ///
    /// Returns `None` if a sequence for `stat` is already in flight.
    pub fn start(model: &mut StatModel, stat: Stat, context: RollContext) -> Option<Self> {
        if !model.begin_roll(stat) {
            return None;
        }
        Some(Self {
            stat,
            context,
            index: effective_index(model.base_level(stat), context.bonus_count),
            total: 0,
            events: Vec::new(),
            finished: false,
        })
    }

    pub fn stat(&self) -> Stat {
        self.stat
    }

    /// The die the next draw will use.
    pub fn die(&self) -> DieSize {
        DieSize::from_index(self.index)
    }

    /// Running total.
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Events emitted so far.
    pub fn events(&self) -> &[RollEvent] {
        &self.events
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Perform one draw and apply its consequences.
    ///
    /// Calling `step` on a finished sequence draws nothing.
    pub fn step<R>(&mut self, model: &mut StatModel, roller: &mut R) -> Step
    where
        R: DieRoller + ?Sized,
    {
        if self.finished {
            return Step::Finished;
        }

        let die = self.die();
        let faces = die.faces();
        let result = roller.roll(faces);
        let crit = result == faces;
        self.total += u32::from(result);
        self.events.push(RollEvent::Rolled {
            stat: self.stat,
            faces,
            result,
            crit,
        });
        tracing::debug!(stat = %self.stat, faces, result, crit, "die drawn");

        if self.context.mode.is_manual() || !crit {
            self.finished = true;
            return Step::Finished;
        }

        if die.is_ceiling() {
            self.events.push(RollEvent::CriticalReroll {
                stat: self.stat,
                result,
            });
            tracing::debug!(stat = %self.stat, result, "critical re-roll at ceiling");
        } else {
            model.grow(self.stat);
            self.index = effective_index(model.base_level(self.stat), self.context.bonus_count);
            let evolved = self.die();
            self.events.push(RollEvent::Evolved {
                stat: self.stat,
                die: evolved,
            });
            tracing::info!(stat = %self.stat, die = %evolved, "stat evolved");
        }
        Step::Continue
    }

    /// End the sequence, returning the stat to idle.
    pub fn finish(self, model: &mut StatModel) -> RollOutcome {
        model.end_roll(self.stat);
        RollOutcome {
            stat: self.stat,
            total: self.total,
            final_die: DieSize::from_index(self.index),
            events: self.events,
        }
    }
}

/// Run a full sequence synchronously, without pauses.
///
/// Events are delivered to `sink` as they are emitted.
pub fn resolve_now<R>(
    model: &mut StatModel,
    stat: Stat,
    context: RollContext,
    roller: &mut R,
    sink: &dyn RollSink,
) -> Resolution
where
    R: DieRoller + ?Sized,
{
    let Some(mut sequence) = RollSequence::start(model, stat, context) else {
        tracing::debug!(stat = %stat, "roll ignored, already resolving");
        return Resolution::Busy(stat);
    };

    loop {
        let emitted = sequence.events().len();
        let step = sequence.step(model, roller);
        for event in &sequence.events()[emitted..] {
            sink.on_event(event);
        }
        if step == Step::Finished {
            break;
        }
    }

    let outcome = sequence.finish(model);
    tracing::debug!(stat = %stat, total = outcome.total, "roll finished");
    sink.on_total(&outcome);
    Resolution::Rolled(outcome)
}

/// Returns the stat to idle if a driven sequence is abandoned midway.
struct BusyGuard<'a, T: StatStore + ?Sized> {
    store: &'a T,
    stat: Stat,
    armed: bool,
}

impl<T: StatStore + ?Sized> Drop for BusyGuard<'_, T> {
    fn drop(&mut self) {
        if self.armed {
            let stat = self.stat;
            self.store.with_stats(|model| model.end_roll(stat));
        }
    }
}

/// Asynchronous driver for roll sequences.
///
/// # Examples
///
/// ```rust
/// use std::sync::Mutex;
/// use std::time::Duration;
/// use diesheet::resolver::{NoDelay, RecordingSink, RollResolver};
/// use diesheet::roller::ScriptedRoller;
/// use diesheet::{CharacterSheet, SheetConfig, Stat};
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let sheet = Mutex::new(CharacterSheet::new(&SheetConfig::default()));
/// let roller = Mutex::new(ScriptedRoller::new([4, 3]));
/// let sink = RecordingSink::new();
///
/// let resolver = RollResolver::with_sleeper(NoDelay, Duration::ZERO);
/// let resolution = resolver.resolve(&sheet, Stat::Focus, &roller, &sink).await;
///
/// assert_eq!(resolution.outcome().unwrap().total, 7);
/// assert_eq!(sink.events().len(), 3);
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct RollResolver<S = TokioSleeper> {
    sleeper: S,
    delay: Duration,
}

impl RollResolver<TokioSleeper> {
    /// A resolver pausing `delay` on the tokio timer between steps.
    pub fn new(delay: Duration) -> Self {
        Self::with_sleeper(TokioSleeper, delay)
    }
}

impl Default for RollResolver<TokioSleeper> {
    fn default() -> Self {
        Self::new(DEFAULT_ROLL_DELAY)
    }
}

impl<S: Sleeper> RollResolver<S> {
    pub fn with_sleeper(sleeper: S, delay: Duration) -> Self {
        Self { sleeper, delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run a full sequence for `stat` against shared state.
    ///
    /// Returns [`Resolution::Busy`] immediately if `stat` is already
    /// resolving. Every event reaches `sink` before the pause that follows
    /// it, and no access to `store` is held during a pause.
    pub async fn resolve<T, R>(
        &self,
        store: &T,
        stat: Stat,
        roller: &Mutex<R>,
        sink: &dyn RollSink,
    ) -> Resolution
    where
        T: StatStore + ?Sized,
        R: DieRoller + ?Sized,
    {
        let context = store.roll_context(stat);
        let Some(mut sequence) =
            store.with_stats(|model| RollSequence::start(model, stat, context))
        else {
            tracing::debug!(stat = %stat, "roll ignored, already resolving");
            return Resolution::Busy(stat);
        };
        let mut guard = BusyGuard {
            store,
            stat,
            armed: true,
        };

        loop {
            let emitted = sequence.events().len();
            let step = store.with_stats(|model| {
                let mut roller = roller.lock().unwrap_or_else(PoisonError::into_inner);
                sequence.step(model, &mut *roller)
            });
            for event in &sequence.events()[emitted..] {
                sink.on_event(event);
            }
            if step == Step::Finished {
                break;
            }
            self.sleeper.sleep(self.delay).await;
        }

        let outcome = store.with_stats(|model| sequence.finish(model));
        guard.armed = false;
        tracing::debug!(stat = %stat, total = outcome.total, "roll finished");
        sink.on_total(&outcome);
        Resolution::Rolled(outcome)
    }
}
