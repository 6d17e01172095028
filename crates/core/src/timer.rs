//! Active-time measurement for a quiz round.
//!
//! The timer only accumulates while a segment is open (the user is answering)
//! and is paused while feedback is shown. A display can subscribe to a
//! per-second notification through a [`Ticker`].

use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crate::time::{Clock, millis_between};

/// How often a scheduled ticker notifies the display.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Receives the elapsed active time in whole seconds.
///
/// Periodic ticks run with the timer state locked; the callback must not call
/// back into the timer.
pub type TickCallback = Arc<dyn Fn(u64) + Send + Sync>;

/// Repeating work scheduled by a [`Ticker`].
pub type TickWork = Box<dyn FnMut() + Send>;

/// Minimal "schedule repeating work, cancel it" capability.
pub trait Ticker: Send {
    /// Runs `work` every `period` until cancelled. Replaces any earlier schedule.
    fn schedule_repeating(&mut self, period: Duration, work: TickWork);

    /// Stops the scheduled work. No-op when nothing is scheduled.
    fn cancel(&mut self);
}

//
// ─── MANUAL TICKER ────────────────────────────────────────────────────────────
//

/// Ticker that only fires when told to. Clones share the same schedule.
#[derive(Clone, Default)]
pub struct ManualTicker {
    work: Arc<Mutex<Option<TickWork>>>,
}

impl ManualTicker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs the scheduled work once. Returns false if nothing is scheduled.
    pub fn fire(&self) -> bool {
        let mut guard = self.work.lock().unwrap_or_else(PoisonError::into_inner);
        match guard.as_mut() {
            Some(work) => {
                work();
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn is_scheduled(&self) -> bool {
        self.work
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl Ticker for ManualTicker {
    fn schedule_repeating(&mut self, _period: Duration, work: TickWork) {
        *self.work.lock().unwrap_or_else(PoisonError::into_inner) = Some(work);
    }

    fn cancel(&mut self) {
        *self.work.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl fmt::Debug for ManualTicker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualTicker")
            .field("scheduled", &self.is_scheduled())
            .finish()
    }
}

//
// ─── TIMER ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPhase {
    /// Not started, or finalized.
    Stopped,
    /// A segment is open and accumulating.
    Running,
    /// Started, but no segment is open.
    Paused,
}

#[derive(Debug)]
struct Segments {
    accumulated_ms: i64,
    segment_start: Option<DateTime<Utc>>,
    phase: TimerPhase,
}

impl Segments {
    fn elapsed_ms(&self, now: DateTime<Utc>) -> i64 {
        let live = self
            .segment_start
            .map_or(0, |start| millis_between(start, now));
        self.accumulated_ms + live
    }

    fn close_segment(&mut self, now: DateTime<Utc>) {
        if let Some(start) = self.segment_start.take() {
            self.accumulated_ms += millis_between(start, now);
        }
    }
}

fn whole_seconds(ms: i64) -> u64 {
    u64::try_from(ms / 1_000).unwrap_or(0)
}

/// Stopwatch that counts only active (answering) segments.
///
/// `begin_segment` while running and `end_segment` while paused are no-ops,
/// so callers can fire them at every UI boundary without double counting.
pub struct ActiveTimer {
    clock: Clock,
    state: Arc<Mutex<Segments>>,
    ticker: Option<Box<dyn Ticker>>,
    on_tick: Option<TickCallback>,
}

impl ActiveTimer {
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self {
            clock,
            state: Arc::new(Mutex::new(Segments {
                accumulated_ms: 0,
                segment_start: None,
                phase: TimerPhase::Stopped,
            })),
            ticker: None,
            on_tick: None,
        }
    }

    /// Notify `on_tick` at every transition and, with a ticker, once per second.
    #[must_use]
    pub fn with_on_tick(mut self, on_tick: impl Fn(u64) + Send + Sync + 'static) -> Self {
        self.on_tick = Some(Arc::new(on_tick));
        self
    }

    /// Drive the per-second notification through `ticker`.
    #[must_use]
    pub fn with_ticker(mut self, ticker: impl Ticker + 'static) -> Self {
        self.ticker = Some(Box::new(ticker));
        self
    }

    fn segments(&self) -> std::sync::MutexGuard<'_, Segments> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn phase(&self) -> TimerPhase {
        self.segments().phase
    }

    /// Accumulated active time plus the open segment, if any.
    #[must_use]
    pub fn elapsed_ms(&self) -> i64 {
        let now = self.clock.now();
        self.segments().elapsed_ms(now)
    }

    /// Resets the total, opens a segment and starts the periodic notification.
    pub fn start(&mut self) {
        if let Some(ticker) = self.ticker.as_mut() {
            ticker.cancel();
        }

        {
            let now = self.clock.now();
            let mut segments = self.segments();
            segments.accumulated_ms = 0;
            segments.segment_start = Some(now);
            segments.phase = TimerPhase::Running;
        }
        self.notify();

        let (Some(ticker), Some(on_tick)) = (self.ticker.as_mut(), self.on_tick.as_ref()) else {
            return;
        };
        let clock = self.clock.clone();
        let state = Arc::clone(&self.state);
        let on_tick = Arc::clone(on_tick);
        ticker.schedule_repeating(
            TICK_PERIOD,
            Box::new(move || {
                // Held across the callback so `finalize` waits for an in-flight tick.
                let segments = state.lock().unwrap_or_else(PoisonError::into_inner);
                if segments.phase == TimerPhase::Stopped {
                    return;
                }
                on_tick(whole_seconds(segments.elapsed_ms(clock.now())));
            }),
        );
    }

    /// Resumes accumulation. No-op if a segment is already open or the timer is stopped.
    pub fn begin_segment(&mut self) {
        {
            let mut segments = self.segments();
            if segments.phase != TimerPhase::Paused {
                return;
            }
            segments.segment_start = Some(self.clock.now());
            segments.phase = TimerPhase::Running;
        }
        self.notify();
    }

    /// Pauses accumulation. No-op unless a segment is open.
    pub fn end_segment(&mut self) {
        {
            let now = self.clock.now();
            let mut segments = self.segments();
            if segments.phase != TimerPhase::Running {
                return;
            }
            segments.close_segment(now);
            segments.phase = TimerPhase::Paused;
        }
        self.notify();
    }

    /// Closes any open segment, stops the notification and returns the total.
    pub fn finalize(&mut self) -> i64 {
        if let Some(ticker) = self.ticker.as_mut() {
            ticker.cancel();
        }

        let total = {
            let now = self.clock.now();
            let mut segments = self.segments();
            segments.close_segment(now);
            segments.phase = TimerPhase::Stopped;
            segments.accumulated_ms
        };
        self.notify();
        total
    }

    fn notify(&self) {
        if let Some(on_tick) = self.on_tick.as_ref() {
            on_tick(whole_seconds(self.elapsed_ms()));
        }
    }
}

impl Drop for ActiveTimer {
    fn drop(&mut self) {
        if let Some(ticker) = self.ticker.as_mut() {
            ticker.cancel();
        }
    }
}

impl fmt::Debug for ActiveTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let segments = self.segments();
        f.debug_struct("ActiveTimer")
            .field("phase", &segments.phase)
            .field("accumulated_ms", &segments.accumulated_ms)
            .field("segment_start", &segments.segment_start)
            .field("has_ticker", &self.ticker.is_some())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_clock;

    fn recording_timer(clock: &Clock) -> (ActiveTimer, ManualTicker, Arc<Mutex<Vec<u64>>>) {
        let ticks = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&ticks);
        let ticker = ManualTicker::new();
        let timer = ActiveTimer::new(clock.clone())
            .with_ticker(ticker.clone())
            .with_on_tick(move |secs| sink.lock().unwrap().push(secs));
        (timer, ticker, ticks)
    }

    #[test]
    fn two_segments_sum_and_pause_is_excluded() {
        let clock = fixed_clock();
        let mut timer = ActiveTimer::new(clock.clone());

        timer.start();
        clock.advance_ms(1_200);
        timer.end_segment();
        clock.advance_ms(5_000);
        timer.begin_segment();
        clock.advance_ms(800);

        assert_eq!(timer.finalize(), 2_000);
        assert_eq!(timer.phase(), TimerPhase::Stopped);
    }

    #[test]
    fn repeated_begin_does_not_double_count() {
        let clock = fixed_clock();
        let mut timer = ActiveTimer::new(clock.clone());

        timer.start();
        clock.advance_ms(300);
        timer.begin_segment();
        clock.advance_ms(300);
        timer.begin_segment();
        clock.advance_ms(400);

        assert_eq!(timer.elapsed_ms(), 1_000);
        assert_eq!(timer.finalize(), 1_000);
    }

    #[test]
    fn repeated_end_is_a_no_op() {
        let clock = fixed_clock();
        let mut timer = ActiveTimer::new(clock.clone());

        timer.start();
        clock.advance_ms(500);
        timer.end_segment();
        clock.advance_ms(500);
        timer.end_segment();

        assert_eq!(timer.phase(), TimerPhase::Paused);
        assert_eq!(timer.elapsed_ms(), 500);
    }

    #[test]
    fn elapsed_includes_open_segment_without_mutating() {
        let clock = fixed_clock();
        let mut timer = ActiveTimer::new(clock.clone());
        assert_eq!(timer.elapsed_ms(), 0);

        timer.start();
        clock.advance_ms(250);
        assert_eq!(timer.elapsed_ms(), 250);
        clock.advance_ms(250);
        assert_eq!(timer.elapsed_ms(), 500);
        assert_eq!(timer.phase(), TimerPhase::Running);
    }

    #[test]
    fn start_resets_previous_total() {
        let clock = fixed_clock();
        let mut timer = ActiveTimer::new(clock.clone());

        timer.start();
        clock.advance_ms(3_000);
        assert_eq!(timer.finalize(), 3_000);

        timer.start();
        clock.advance_ms(100);
        assert_eq!(timer.finalize(), 100);
    }

    #[test]
    fn begin_segment_before_start_is_ignored() {
        let clock = fixed_clock();
        let mut timer = ActiveTimer::new(clock.clone());

        timer.begin_segment();
        clock.advance_ms(1_000);
        assert_eq!(timer.phase(), TimerPhase::Stopped);
        assert_eq!(timer.elapsed_ms(), 0);
    }

    #[test]
    fn finalize_is_stable_when_called_twice() {
        let clock = fixed_clock();
        let mut timer = ActiveTimer::new(clock.clone());

        timer.start();
        clock.advance_ms(700);
        assert_eq!(timer.finalize(), 700);
        clock.advance_ms(700);
        assert_eq!(timer.finalize(), 700);
        assert_eq!(timer.elapsed_ms(), 700);
    }

    #[test]
    fn ticker_reports_floored_seconds() {
        let clock = fixed_clock();
        let (mut timer, ticker, ticks) = recording_timer(&clock);

        assert!(!ticker.is_scheduled());
        timer.start();
        assert!(ticker.is_scheduled());

        clock.advance_ms(1_999);
        assert!(ticker.fire());
        clock.advance_ms(1);
        assert!(ticker.fire());

        assert_eq!(*ticks.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn ticker_never_fires_after_finalize() {
        let clock = fixed_clock();
        let (mut timer, ticker, ticks) = recording_timer(&clock);

        timer.start();
        clock.advance_ms(4_000);
        assert_eq!(timer.finalize(), 4_000);
        let before = ticks.lock().unwrap().len();

        assert!(!ticker.is_scheduled());
        assert!(!ticker.fire());
        assert_eq!(ticks.lock().unwrap().len(), before);
    }

    #[test]
    fn transitions_notify_immediately() {
        let clock = fixed_clock();
        let (mut timer, _ticker, ticks) = recording_timer(&clock);

        timer.start();
        clock.advance_ms(2_500);
        timer.end_segment();
        timer.end_segment();
        timer.begin_segment();
        clock.advance_ms(600);
        timer.finalize();

        assert_eq!(*ticks.lock().unwrap(), vec![0, 2, 2, 3]);
    }

    #[test]
    fn on_tick_without_ticker_only_reports_transitions() {
        let clock = fixed_clock();
        let ticks = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&ticks);
        let mut timer = ActiveTimer::new(clock.clone())
            .with_on_tick(move |secs| sink.lock().unwrap().push(secs));

        timer.start();
        clock.advance_ms(1_000);
        timer.finalize();

        assert_eq!(*ticks.lock().unwrap(), vec![0, 1]);
    }
}
