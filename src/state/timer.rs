//! Countdown timer engine and mode configuration

use serde::{Deserialize, Serialize};

/// Session mode for the focus timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerMode {
    Focus,
    ShortBreak,
    LongBreak,
}

impl TimerMode {
    /// Display label shown next to the countdown
    pub fn label(&self) -> &'static str {
        match self {
            TimerMode::Focus => "Deep Work",
            TimerMode::ShortBreak => "Short Break",
            TimerMode::LongBreak => "Decompress",
        }
    }

    /// All modes in switcher order
    pub fn all() -> [TimerMode; 3] {
        [TimerMode::Focus, TimerMode::ShortBreak, TimerMode::LongBreak]
    }

    /// Parse a mode from its API path segment
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "focus" => Some(TimerMode::Focus),
            "short-break" | "short_break" => Some(TimerMode::ShortBreak),
            "long-break" | "long_break" => Some(TimerMode::LongBreak),
            _ => None,
        }
    }
}

/// Configured duration in seconds for each mode
#[derive(Debug, Clone, Copy)]
pub struct ModeDurations {
    pub focus: u64,
    pub short_break: u64,
    pub long_break: u64,
}

impl ModeDurations {
    /// Duration in seconds for the given mode
    pub fn duration(&self, mode: TimerMode) -> u64 {
        match mode {
            TimerMode::Focus => self.focus,
            TimerMode::ShortBreak => self.short_break,
            TimerMode::LongBreak => self.long_break,
        }
    }
}

impl Default for ModeDurations {
    fn default() -> Self {
        Self {
            focus: 25 * 60,
            short_break: 5 * 60,
            long_break: 15 * 60,
        }
    }
}

/// Result of applying a tick to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// One second counted down, timer still running
    Counted,
    /// The countdown just reached zero; the session is complete
    Completed,
    /// The engine was not running; nothing changed
    Ignored,
}

/// Countdown state machine for a single focus session.
///
/// The engine owns no clock: it is advanced by explicit `tick()` calls from
/// the countdown driver, so all transitions are testable synchronously.
#[derive(Debug, Clone)]
pub struct TimerEngine {
    mode: TimerMode,
    remaining_seconds: u64,
    running: bool,
    /// Bumped on every entry into the running state. The countdown driver
    /// captures this when it starts a run and discards ticks whose
    /// generation no longer matches, so a stale tick can never decrement a
    /// freshly reset counter.
    run_id: u64,
    durations: ModeDurations,
}

impl TimerEngine {
    /// Create an engine in Focus mode, idle, at full duration
    pub fn new(durations: ModeDurations) -> Self {
        Self {
            mode: TimerMode::Focus,
            remaining_seconds: durations.duration(TimerMode::Focus),
            running: false,
            run_id: 0,
            durations,
        }
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run_id(&self) -> u64 {
        self.run_id
    }

    /// Full configured duration of the current mode
    pub fn duration(&self) -> u64 {
        self.durations.duration(self.mode)
    }

    /// Whether the countdown has reached zero
    pub fn is_finished(&self) -> bool {
        self.remaining_seconds == 0
    }

    /// Start the countdown. No-op when already running or when finished.
    pub fn start(&mut self) {
        if self.running || self.remaining_seconds == 0 {
            return;
        }
        self.run_id += 1;
        self.running = true;
    }

    /// Pause the countdown. No-op when not running.
    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Pause when running, start otherwise
    pub fn toggle(&mut self) {
        if self.running {
            self.pause();
        } else {
            self.start();
        }
    }

    /// Count down one second. Only has an effect while running; reaching
    /// zero stops the engine and reports completion.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.running {
            return TickOutcome::Ignored;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.running = false;
            TickOutcome::Completed
        } else {
            TickOutcome::Counted
        }
    }

    /// Restore the current mode to its full duration and stop
    pub fn reset(&mut self) {
        self.running = false;
        self.remaining_seconds = self.duration();
    }

    /// Switch to another mode at full duration, stopped
    pub fn switch_mode(&mut self, mode: TimerMode) {
        self.running = false;
        self.mode = mode;
        self.remaining_seconds = self.durations.duration(mode);
    }

    /// Fraction of the session remaining, 1.0 at full duration down to 0.0
    /// at completion. Derived on every read, never stored.
    pub fn progress(&self) -> f64 {
        let total = self.duration();
        if total == 0 {
            return 0.0;
        }
        self.remaining_seconds as f64 / total as f64
    }

    /// Immutable view of the engine for channels and API responses
    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            mode: self.mode,
            label: self.mode.label().to_string(),
            remaining_seconds: self.remaining_seconds,
            running: self.running,
            finished: self.is_finished(),
            progress: self.progress(),
            clock: format_clock(self.remaining_seconds),
            run_id: self.run_id,
        }
    }
}

/// Point-in-time view of the timer, published on the watch channel and
/// returned by the status endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub mode: TimerMode,
    pub label: String,
    pub remaining_seconds: u64,
    pub running: bool,
    pub finished: bool,
    pub progress: f64,
    pub clock: String,
    #[serde(skip)]
    pub run_id: u64,
}

/// Format a second count as `MM:SS`, both fields zero-padded. Minutes are
/// an unbounded field, so durations past an hour render as e.g. `75:00`.
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
