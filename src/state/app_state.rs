//! Session controller: owns the timer engine and task store

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
    time::Instant,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, watch};
use tracing::{info, warn};
use uuid::Uuid;

use crate::services::{Notifier, SubtaskGenerator};
use crate::state::tasks::{Task, TaskStore};
use crate::state::timer::{ModeDurations, TickOutcome, TimerEngine, TimerMode, TimerSnapshot};

/// Event broadcast when a countdown reaches zero
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionComplete {
    pub mode: TimerMode,
    pub label: String,
    pub completed_at: DateTime<Utc>,
}

/// Result of a planning request against the generator service
#[derive(Debug)]
pub enum PlanOutcome {
    /// The service produced subtasks; all were added to the store
    Planned(Vec<Task>),
    /// The service declined or failed; the raw goal was added as one task
    FellBack(Task),
    /// Empty goal, rejected silently
    Ignored,
    /// Another planning request is still in flight
    Busy,
}

/// Composition root for the session. Every mutation of timer or task state
/// is serialized through this controller; the countdown driver, the HTTP
/// handlers, and generator responses never touch the state directly.
pub struct AppState {
    timer: Mutex<TimerEngine>,
    tasks: Mutex<TaskStore>,
    pub generator: Arc<dyn SubtaskGenerator>,
    pub notifier: Notifier,
    /// Completion alerts can be muted without pausing the timer
    sound_enabled: AtomicBool,
    /// Admission control: at most one generation request in flight
    planning_in_flight: AtomicBool,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
    /// Channel for session-complete events
    pub session_complete_tx: broadcast::Sender<SessionComplete>,
    /// Channel for timer snapshot updates
    pub timer_update_tx: watch::Sender<TimerSnapshot>,
    /// Keep the receiver alive to prevent channel closure
    _timer_update_rx: watch::Receiver<TimerSnapshot>,
}

impl AppState {
    pub fn new(
        durations: ModeDurations,
        generator: Arc<dyn SubtaskGenerator>,
        notifier: Notifier,
    ) -> Self {
        let engine = TimerEngine::new(durations);
        let (session_complete_tx, _) = broadcast::channel(16);
        let (timer_update_tx, timer_update_rx) = watch::channel(engine.snapshot());

        Self {
            timer: Mutex::new(engine),
            tasks: Mutex::new(TaskStore::new()),
            generator,
            notifier,
            sound_enabled: AtomicBool::new(true),
            planning_in_flight: AtomicBool::new(false),
            start_time: Instant::now(),
            port: 0,
            host: String::new(),
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
            session_complete_tx,
            timer_update_tx,
            _timer_update_rx: timer_update_rx,
        }
    }

    /// Record the bind address for the status endpoint
    pub fn with_server_info(mut self, host: String, port: u16) -> Self {
        self.host = host;
        self.port = port;
        self
    }

    /// Apply a mutation to the timer engine, publish the resulting snapshot,
    /// and record the action
    fn update_timer<F>(&self, action: &str, updater: F) -> Result<TimerSnapshot, String>
    where
        F: FnOnce(&mut TimerEngine),
    {
        let mut engine = self
            .timer
            .lock()
            .map_err(|e| format!("Failed to lock timer state: {}", e))?;
        updater(&mut engine);
        let snapshot = engine.snapshot();
        drop(engine);

        self.record_action(action);
        self.publish_snapshot(&snapshot);
        Ok(snapshot)
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    fn publish_snapshot(&self, snapshot: &TimerSnapshot) {
        if let Err(e) = self.timer_update_tx.send(snapshot.clone()) {
            warn!("Failed to send timer update: {}", e);
        }
    }

    /// Start the timer if paused, pause it if running
    pub fn toggle_timer(&self) -> Result<TimerSnapshot, String> {
        self.update_timer("timer-toggle", |engine| engine.toggle())
    }

    /// Stop the timer and restore the current mode to its full duration
    pub fn reset_timer(&self) -> Result<TimerSnapshot, String> {
        self.update_timer("timer-reset", |engine| engine.reset())
    }

    /// Switch mode; always lands stopped at the new mode's full duration
    pub fn switch_mode(&self, mode: TimerMode) -> Result<TimerSnapshot, String> {
        info!("Switching timer mode to {:?}", mode);
        self.update_timer("mode-switch", |engine| engine.switch_mode(mode))
    }

    /// Current timer view without mutating anything
    pub fn timer_snapshot(&self) -> Result<TimerSnapshot, String> {
        self.timer
            .lock()
            .map(|engine| engine.snapshot())
            .map_err(|e| format!("Failed to lock timer state: {}", e))
    }

    /// Count down one second on behalf of the countdown driver.
    ///
    /// `run_id` is the generation the driver scheduled this tick for; a
    /// mismatch means the engine left that run (pause, reset, mode switch)
    /// after the tick was scheduled, and the tick is discarded. The check
    /// and the decrement happen under the same lock, so cancellation is
    /// synchronous with the state transition.
    pub fn apply_tick(&self, run_id: u64) -> Result<Option<SessionComplete>, String> {
        let mut engine = self
            .timer
            .lock()
            .map_err(|e| format!("Failed to lock timer state: {}", e))?;

        if engine.run_id() != run_id {
            return Ok(None);
        }

        let outcome = engine.tick();
        let snapshot = engine.snapshot();
        let mode = engine.mode();
        drop(engine);

        match outcome {
            TickOutcome::Ignored => Ok(None),
            TickOutcome::Counted => {
                self.publish_snapshot(&snapshot);
                Ok(None)
            }
            TickOutcome::Completed => {
                self.publish_snapshot(&snapshot);
                let event = SessionComplete {
                    mode,
                    label: mode.label().to_string(),
                    completed_at: Utc::now(),
                };
                // No subscribers is fine; completion is best-effort fan-out
                let _ = self.session_complete_tx.send(event.clone());
                info!("{} session complete", event.label);
                Ok(Some(event))
            }
        }
    }

    /// Snapshot of the task list in insertion order
    pub fn tasks(&self) -> Result<Vec<Task>, String> {
        self.tasks
            .lock()
            .map(|store| store.tasks().to_vec())
            .map_err(|e| format!("Failed to lock task store: {}", e))
    }

    /// Add a manual task; `None` when the title was blank
    pub fn add_task(&self, title: &str) -> Result<Option<Task>, String> {
        let mut store = self
            .tasks
            .lock()
            .map_err(|e| format!("Failed to lock task store: {}", e))?;
        let added = store.add(title);
        drop(store);
        if added.is_some() {
            self.record_action("task-add");
        }
        Ok(added)
    }

    pub fn toggle_task(&self, id: Uuid) -> Result<bool, String> {
        let mut store = self
            .tasks
            .lock()
            .map_err(|e| format!("Failed to lock task store: {}", e))?;
        Ok(store.toggle(id))
    }

    pub fn remove_task(&self, id: Uuid) -> Result<bool, String> {
        let mut store = self
            .tasks
            .lock()
            .map_err(|e| format!("Failed to lock task store: {}", e))?;
        Ok(store.remove(id))
    }

    /// Ask the generator service to expand a goal into subtasks.
    ///
    /// The fallback policy lives here, not in the client: an empty result
    /// and a failed call are treated identically, and the raw goal text is
    /// added as a single plain task so the user's input is never lost.
    pub async fn plan_tasks(&self, goal: &str) -> Result<PlanOutcome, String> {
        let goal = goal.trim().to_string();
        if goal.is_empty() {
            return Ok(PlanOutcome::Ignored);
        }

        if self
            .planning_in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Ok(PlanOutcome::Busy);
        }

        let result = self.generator.generate_subtasks(&goal).await;
        self.planning_in_flight.store(false, Ordering::SeqCst);

        let subtasks = match result {
            Ok(subtasks) if !subtasks.is_empty() => subtasks,
            Ok(_) => {
                info!("Generator returned no subtasks, falling back to manual task");
                return self.fallback_task(&goal);
            }
            Err(e) => {
                warn!("Subtask generation failed: {}, falling back to manual task", e);
                return self.fallback_task(&goal);
            }
        };

        let mut store = self
            .tasks
            .lock()
            .map_err(|e| format!("Failed to lock task store: {}", e))?;
        let added = store.add_many(&subtasks);
        drop(store);

        self.record_action("tasks-plan");
        info!("Added {} generated subtasks", added.len());
        Ok(PlanOutcome::Planned(added))
    }

    fn fallback_task(&self, goal: &str) -> Result<PlanOutcome, String> {
        match self.add_task(goal)? {
            Some(task) => Ok(PlanOutcome::FellBack(task)),
            None => Ok(PlanOutcome::Ignored),
        }
    }

    /// Whether completion alerts should be delivered
    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled.load(Ordering::Relaxed)
    }

    /// Flip the alert mute switch, returning the new value
    pub fn toggle_sound(&self) -> bool {
        let enabled = !self.sound_enabled.load(Ordering::Relaxed);
        self.sound_enabled.store(enabled, Ordering::Relaxed);
        self.record_action(if enabled { "sound-on" } else { "sound-off" });
        enabled
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::GeneratorError;
    use async_trait::async_trait;

    struct FixedGenerator(Vec<String>);

    #[async_trait]
    impl SubtaskGenerator for FixedGenerator {
        async fn generate_subtasks(&self, _goal: &str) -> Result<Vec<String>, GeneratorError> {
            Ok(self.0.clone())
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl SubtaskGenerator for FailingGenerator {
        async fn generate_subtasks(&self, _goal: &str) -> Result<Vec<String>, GeneratorError> {
            Err(GeneratorError::Network("connection refused".to_string()))
        }
    }

    /// Blocks until released, to hold a planning slot open
    struct StalledGenerator(Arc<tokio::sync::Notify>);

    #[async_trait]
    impl SubtaskGenerator for StalledGenerator {
        async fn generate_subtasks(&self, _goal: &str) -> Result<Vec<String>, GeneratorError> {
            self.0.notified().await;
            Ok(vec![])
        }
    }

    fn state_with(generator: Arc<dyn SubtaskGenerator>) -> AppState {
        AppState::new(ModeDurations::default(), generator, Notifier::disabled())
    }

    #[tokio::test]
    async fn planning_adds_generated_subtasks_in_order() {
        let state = state_with(Arc::new(FixedGenerator(vec![
            "Outline key points".to_string(),
            "Write script".to_string(),
        ])));

        let outcome = state.plan_tasks("Plan my video script").await.unwrap();
        assert!(matches!(outcome, PlanOutcome::Planned(ref added) if added.len() == 2));

        let tasks = state.tasks().unwrap();
        let titles: Vec<_> = tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Outline key points", "Write script"]);
        assert!(tasks.iter().all(|t| !t.completed));
    }

    #[tokio::test]
    async fn failed_generation_falls_back_to_the_raw_goal() {
        let state = state_with(Arc::new(FailingGenerator));

        let outcome = state.plan_tasks("Plan my video script").await.unwrap();
        assert!(matches!(outcome, PlanOutcome::FellBack(_)));

        let tasks = state.tasks().unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Plan my video script");
    }

    #[tokio::test]
    async fn empty_generation_result_also_falls_back() {
        let state = state_with(Arc::new(FixedGenerator(vec![])));

        let outcome = state.plan_tasks("Edit the draft").await.unwrap();
        assert!(matches!(outcome, PlanOutcome::FellBack(_)));
        assert_eq!(state.tasks().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn blank_goal_is_rejected_silently() {
        let state = state_with(Arc::new(FailingGenerator));
        let outcome = state.plan_tasks("   ").await.unwrap();
        assert!(matches!(outcome, PlanOutcome::Ignored));
        assert!(state.tasks().unwrap().is_empty());
    }

    #[tokio::test]
    async fn second_concurrent_planning_request_is_refused() {
        let release = Arc::new(tokio::sync::Notify::new());
        let state = Arc::new(state_with(Arc::new(StalledGenerator(release.clone()))));

        let first = {
            let state = Arc::clone(&state);
            tokio::spawn(async move { state.plan_tasks("goal one").await })
        };
        // Let the first request reach the generator and park there
        tokio::task::yield_now().await;

        let second = state.plan_tasks("goal two").await.unwrap();
        assert!(matches!(second, PlanOutcome::Busy));

        release.notify_one();
        let first = first.await.unwrap().unwrap();
        assert!(matches!(first, PlanOutcome::FellBack(_)));

        // The slot is free again once the first request settles
        let third = state.plan_tasks("goal three").await.unwrap();
        assert!(matches!(third, PlanOutcome::FellBack(_)));
    }

    #[tokio::test]
    async fn stale_tick_is_discarded_after_reset() {
        let state = state_with(Arc::new(FailingGenerator));
        let snapshot = state.toggle_timer().unwrap();
        assert!(snapshot.running);
        let old_run = snapshot.run_id;

        // Reset while "a tick is in flight", then start a new run
        state.reset_timer().unwrap();
        let new_snapshot = state.toggle_timer().unwrap();
        assert_ne!(new_snapshot.run_id, old_run);

        // The stale tick must not touch the new run's counter
        assert!(state.apply_tick(old_run).unwrap().is_none());
        assert_eq!(
            state.timer_snapshot().unwrap().remaining_seconds,
            new_snapshot.remaining_seconds
        );

        // A current-generation tick counts down as usual
        assert!(state.apply_tick(new_snapshot.run_id).unwrap().is_none());
        assert_eq!(
            state.timer_snapshot().unwrap().remaining_seconds,
            new_snapshot.remaining_seconds - 1
        );
    }

    #[tokio::test]
    async fn completing_run_emits_exactly_one_event() {
        let state = AppState::new(
            ModeDurations {
                focus: 2,
                short_break: 300,
                long_break: 900,
            },
            Arc::new(FailingGenerator),
            Notifier::disabled(),
        );
        let mut events = state.session_complete_tx.subscribe();

        let snapshot = state.toggle_timer().unwrap();
        assert!(state.apply_tick(snapshot.run_id).unwrap().is_none());
        let event = state.apply_tick(snapshot.run_id).unwrap();
        assert!(event.is_some());
        assert_eq!(event.unwrap().mode, TimerMode::Focus);

        // Engine is finished; further ticks produce nothing
        assert!(state.apply_tick(snapshot.run_id).unwrap().is_none());
        assert!(events.try_recv().is_ok());
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn sound_toggle_round_trips() {
        let state = state_with(Arc::new(FailingGenerator));
        assert!(state.sound_enabled());
        assert!(!state.toggle_sound());
        assert!(state.toggle_sound());
    }
}
