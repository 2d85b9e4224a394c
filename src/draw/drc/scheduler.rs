//! Debounced DRC scheduling
//!
//! Idle -> Scheduled -> Running -> Idle. Every board change replaces the
//! pending `ScheduledRun` with a fresh one due after the settle delay. A
//! change during a run never interrupts it; it queues exactly one
//! follow-up run that is scheduled when the current run finishes.
//!
//! The scheduler holds no timers itself. The owner asks for
//! `next_deadline()`, waits, then calls `poll(now)`. Time is always passed
//! in, which keeps the state machine deterministic under test.

use std::time::{Duration, Instant};

/// A pending run, replaced (and thereby cancelled) by every new change
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduledRun {
    generation: u64,
    due: Instant,
}

impl ScheduledRun {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn due(&self) -> Instant {
        self.due
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.due
    }
}

/// Proof that a run was started; handed back to `finish`
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a started run must be finished"]
pub struct RunTicket {
    generation: u64,
}

impl RunTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Observable scheduler phase
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrcPhase {
    Idle,
    Scheduled,
    Running,
}

#[derive(Debug)]
enum State {
    Idle,
    Scheduled(ScheduledRun),
    Running { generation: u64, follow_up: bool },
}

#[derive(Debug)]
pub struct DrcScheduler {
    settle: Duration,
    state: State,
    next_generation: u64,
    last_change: Option<Instant>,
    runs_started: u64,
}

impl DrcScheduler {
    pub fn new(settle: Duration) -> Self {
        Self {
            settle,
            state: State::Idle,
            next_generation: 1,
            last_change: None,
            runs_started: 0,
        }
    }

    pub fn settle_delay(&self) -> Duration {
        self.settle
    }

    pub fn phase(&self) -> DrcPhase {
        match self.state {
            State::Idle => DrcPhase::Idle,
            State::Scheduled(_) => DrcPhase::Scheduled,
            State::Running { .. } => DrcPhase::Running,
        }
    }

    pub fn pending(&self) -> Option<ScheduledRun> {
        match self.state {
            State::Scheduled(run) => Some(run),
            _ => None,
        }
    }

    /// When the pending run becomes due, if any
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending().map(|run| run.due)
    }

    pub fn runs_started(&self) -> u64 {
        self.runs_started
    }

    fn schedule(&mut self, due: Instant) -> ScheduledRun {
        let run = ScheduledRun {
            generation: self.next_generation,
            due,
        };
        self.next_generation += 1;
        self.state = State::Scheduled(run);
        run
    }

    /// Record a board change
    pub fn notify_change(&mut self, now: Instant) {
        self.last_change = Some(now);
        if let State::Running { follow_up, .. } = &mut self.state {
            *follow_up = true;
            tracing::debug!("[DRC] Change during run, follow-up queued");
            return;
        }
        let run = self.schedule(now + self.settle);
        tracing::trace!("[DRC] Run #{} scheduled", run.generation);
    }

    /// Drop the pending run without running it
    pub fn cancel(&mut self) {
        if let State::Scheduled(_) = self.state {
            self.state = State::Idle;
        }
    }

    /// Start the pending run if it is due
    pub fn poll(&mut self, now: Instant) -> Option<RunTicket> {
        match self.state {
            State::Scheduled(run) if run.is_due(now) => {
                self.state = State::Running {
                    generation: run.generation,
                    follow_up: false,
                };
                self.runs_started += 1;
                Some(RunTicket {
                    generation: run.generation,
                })
            }
            _ => None,
        }
    }

    /// Complete a run; schedules the follow-up if changes arrived meanwhile
    pub fn finish(&mut self, ticket: RunTicket, now: Instant) {
        let State::Running { generation, follow_up } = self.state else {
            tracing::warn!("[DRC] finish() called while no run is active");
            return;
        };
        if generation != ticket.generation {
            tracing::warn!(
                "[DRC] Stale ticket #{} for active run #{}",
                ticket.generation,
                generation
            );
            return;
        }

        if follow_up {
            let settled = self.last_change.map_or(now, |t| t + self.settle);
            self.schedule(settled.max(now));
        } else {
            self.state = State::Idle;
        }
    }

    /// Poll, and if a run is due execute `run` and finish it
    pub fn run_if_due<T>(&mut self, now: Instant, run: impl FnOnce() -> T) -> Option<T> {
        let ticket = self.poll(now)?;
        let result = run();
        self.finish(ticket, Instant::now().max(now));
        Some(result)
    }
}

impl Default for DrcScheduler {
    fn default() -> Self {
        Self::new(Duration::from_millis(800))
    }
}
