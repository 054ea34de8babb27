//! Waiting for a subtree to stop changing.
//!
//! Three signals race for one resolution: the quiet-window poll, the hard timeout and
//! the mutation stream that keeps pushing the quiet window back. Whichever finishes the
//! wait, the receiver and both timers are dropped on the way out.
use std::time::Duration;

use printer_logging::{printer_debug, printer_info};
use tokio::sync::broadcast::error::RecvError;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::host::ContentElement;

/// Shortest poll period; a zero interval would never yield to the other signals.
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StabilitySettings {
    /// Delay before observation starts, so an empty shell is not mistaken for settled.
    pub initial_delay: Duration,
    pub quiet_window: Duration,
    pub poll_interval: Duration,
    /// Upper bound on observation, counted from the end of the initial delay.
    pub hard_timeout: Duration,
}

impl Default for StabilitySettings {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(500),
            quiet_window: Duration::from_millis(1000),
            poll_interval: Duration::from_millis(100),
            hard_timeout: Duration::from_millis(5000),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettledBy {
    Quiescence,
    Timeout,
}

/// Diagnostics of one finished wait. Both terminal states are success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StabilityOutcome {
    pub settled_by: SettledBy,
    pub mutation_count: u64,
    /// Time from the call until resolution, initial delay included.
    pub elapsed: Duration,
}

#[derive(Debug)]
struct StabilityObservation {
    mutation_count: u64,
    last_mutation: Instant,
    started: Instant,
    settled: Option<SettledBy>,
}

impl StabilityObservation {
    fn new(now: Instant) -> Self {
        Self {
            mutation_count: 0,
            last_mutation: now,
            started: now,
            settled: None,
        }
    }

    fn record_mutations(&mut self, count: u64, now: Instant) {
        self.mutation_count += count;
        self.last_mutation = now;
    }

    fn is_quiet(&self, now: Instant, window: Duration) -> bool {
        now.duration_since(self.last_mutation) > window
    }

    /// Moves to the terminal state; only the first call has an effect.
    fn settle(&mut self, by: SettledBy) -> bool {
        if self.settled.is_some() {
            return false;
        }
        self.settled = Some(by);
        true
    }
}

/// Resolves once `root` has gone `quiet_window` without a mutation, or when the hard
/// timeout expires. Never fails; a zero `poll_interval` is raised to one millisecond.
pub async fn await_quiescence(
    root: &dyn ContentElement,
    settings: StabilitySettings,
) -> StabilityOutcome {
    let called = Instant::now();
    time::sleep(settings.initial_delay).await;

    let mut mutations = root.observe();
    let mut observation = StabilityObservation::new(Instant::now());
    let deadline = time::sleep(settings.hard_timeout);
    tokio::pin!(deadline);
    let poll_interval = settings.poll_interval.max(MIN_POLL_INTERVAL);
    let mut poll = time::interval_at(observation.started + poll_interval, poll_interval);
    poll.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut observing = true;

    loop {
        tokio::select! {
            biased;
            _ = &mut deadline => {
                observation.settle(SettledBy::Timeout);
            }
            received = mutations.recv(), if observing => match received {
                Ok(_) => observation.record_mutations(1, Instant::now()),
                Err(RecvError::Lagged(skipped)) => {
                    observation.record_mutations(skipped, Instant::now())
                }
                Err(RecvError::Closed) => {
                    printer_debug!("observed element dropped; waiting out the quiet window");
                    observing = false;
                }
            },
            _ = poll.tick() => {
                if observation.is_quiet(Instant::now(), settings.quiet_window) {
                    observation.settle(SettledBy::Quiescence);
                }
            }
        }
        if let Some(settled_by) = observation.settled {
            let outcome = StabilityOutcome {
                settled_by,
                mutation_count: observation.mutation_count,
                elapsed: called.elapsed(),
            };
            printer_info!(
                "content settled by {:?} after {:?} ({} mutations observed)",
                outcome.settled_by,
                outcome.elapsed,
                outcome.mutation_count
            );
            return outcome;
        }
    }
}
