//! Countdown driver background task

use std::{sync::Arc, time::Duration};
use tokio::{sync::watch, time::sleep};
use tracing::{debug, error, info};

use crate::state::{AppState, TimerSnapshot};

const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Background task that advances the timer engine while it is running.
///
/// The driver is the only component with time-based side effects: it sleeps
/// one nominal second per tick and applies the tick through the session
/// controller. Each tick decrements by exactly 1 regardless of scheduler
/// jitter; no drift correction is attempted. Cancellation is handled by the
/// controller's run-generation check, so a tick scheduled for a run the
/// engine has already left is discarded without touching the counter.
pub async fn countdown_task(state: Arc<AppState>) {
    info!("Starting countdown driver");

    let mut timer_rx = state.timer_update_tx.subscribe();

    loop {
        // Wait for the engine to enter a run
        let run_id = loop {
            let snapshot = timer_rx.borrow_and_update().clone();
            if snapshot.running {
                break snapshot.run_id;
            }
            if timer_rx.changed().await.is_err() {
                info!("Timer channel closed, stopping countdown driver");
                return;
            }
        };

        debug!("Countdown run {} started", run_id);
        drive_run(&state, run_id, &mut timer_rx).await;
    }
}

/// Tick one run until it completes or the engine leaves it
async fn drive_run(state: &Arc<AppState>, run_id: u64, timer_rx: &mut watch::Receiver<TimerSnapshot>) {
    loop {
        tokio::select! {
            // Nominal one-second tick
            _ = sleep(TICK_INTERVAL) => {
                match state.apply_tick(run_id) {
                    Ok(Some(event)) => {
                        if state.sound_enabled() {
                            state.notifier.notify(
                                "Luplup",
                                &format!("{} session complete!", event.label),
                            );
                        } else {
                            debug!("Completion alert muted");
                        }
                        // No auto-advance to the next mode; switching stays
                        // a deliberate user action
                        return;
                    }
                    Ok(None) => {
                        let snapshot = state.timer_snapshot().unwrap_or_else(|_| {
                            timer_rx.borrow().clone()
                        });
                        if !snapshot.running || snapshot.run_id != run_id {
                            debug!("Countdown run {} ended", run_id);
                            return;
                        }
                    }
                    Err(e) => {
                        error!("Failed to apply tick: {}", e);
                        return;
                    }
                }
            }

            // State change - stop driving this run once the engine leaves it
            changed = timer_rx.changed() => {
                if changed.is_err() {
                    return;
                }
                let snapshot = timer_rx.borrow_and_update().clone();
                if !snapshot.running || snapshot.run_id != run_id {
                    debug!("Countdown run {} cancelled", run_id);
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{GeneratorError, Notifier, SubtaskGenerator};
    use crate::state::{ModeDurations, TimerMode};
    use async_trait::async_trait;
    use tokio::time::{timeout, Duration};

    struct NullGenerator;

    #[async_trait]
    impl SubtaskGenerator for NullGenerator {
        async fn generate_subtasks(&self, _goal: &str) -> Result<Vec<String>, GeneratorError> {
            Ok(vec![])
        }
    }

    fn state(focus_secs: u64) -> Arc<AppState> {
        Arc::new(AppState::new(
            ModeDurations {
                focus: focus_secs,
                short_break: 300,
                long_break: 900,
            },
            Arc::new(NullGenerator),
            Notifier::disabled(),
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn drives_a_run_to_completion() {
        let state = state(3);
        let mut events = state.session_complete_tx.subscribe();
        tokio::spawn(countdown_task(Arc::clone(&state)));
        tokio::task::yield_now().await;

        state.toggle_timer().unwrap();

        let event = timeout(Duration::from_secs(30), events.recv())
            .await
            .expect("session should complete within the timeout")
            .unwrap();
        assert_eq!(event.mode, TimerMode::Focus);

        let snapshot = state.timer_snapshot().unwrap();
        assert_eq!(snapshot.remaining_seconds, 0);
        assert!(!snapshot.running);
        assert!(snapshot.finished);
    }

    #[tokio::test(start_paused = true)]
    async fn pausing_stops_further_decrements() {
        let state = state(100);
        tokio::spawn(countdown_task(Arc::clone(&state)));
        tokio::task::yield_now().await;

        state.toggle_timer().unwrap();
        tokio::time::sleep(Duration::from_millis(2500)).await;

        state.toggle_timer().unwrap();
        let frozen = state.timer_snapshot().unwrap().remaining_seconds;
        assert!(frozen < 100);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(state.timer_snapshot().unwrap().remaining_seconds, frozen);
    }

    #[tokio::test(start_paused = true)]
    async fn mode_switch_cancels_the_run_and_resumes_cleanly() {
        let state = state(100);
        tokio::spawn(countdown_task(Arc::clone(&state)));
        tokio::task::yield_now().await;

        state.toggle_timer().unwrap();
        tokio::time::sleep(Duration::from_millis(1500)).await;

        // Switching mode must land stopped at the new mode's full duration
        // and stay there
        state.switch_mode(TimerMode::ShortBreak).unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;
        let snapshot = state.timer_snapshot().unwrap();
        assert_eq!(snapshot.remaining_seconds, 300);
        assert!(!snapshot.running);

        // A fresh run in the new mode ticks normally
        state.toggle_timer().unwrap();
        tokio::time::sleep(Duration::from_millis(2500)).await;
        let snapshot = state.timer_snapshot().unwrap();
        assert!(snapshot.running);
        assert!(snapshot.remaining_seconds < 300);
    }
}
