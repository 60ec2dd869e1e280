//! Single-flight scheduling of ingestion passes.
//!
//! Triggers arriving while a pass is running never start a second pass; they set a
//! pending flag, and exactly one follow-up pass runs once the current one finishes, no
//! matter how many triggers arrived in between.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Scheduler state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Idle,
    Running,
    /// Running, with one follow-up pass owed.
    RunningQueued,
}

/// What the caller must do after feeding an event to the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Start a pass now.
    StartRun,
    /// A follow-up pass has been recorded (or already was).
    Queued,
    /// Nothing left to do.
    Idle,
}

/// Finite-state gate guaranteeing at most one pass in flight.
#[derive(Debug, Default)]
pub struct RunGate {
    state: RunState,
}

impl RunGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// A trigger arrived.
    pub fn trigger(&mut self) -> Transition {
        match self.state {
            RunState::Idle => {
                self.state = RunState::Running;
                Transition::StartRun
            }
            RunState::Running | RunState::RunningQueued => {
                self.state = RunState::RunningQueued;
                Transition::Queued
            }
        }
    }

    /// The in-flight pass completed.
    pub fn finish(&mut self) -> Transition {
        match self.state {
            RunState::RunningQueued => {
                self.state = RunState::Running;
                Transition::StartRun
            }
            RunState::Running | RunState::Idle => {
                self.state = RunState::Idle;
                Transition::Idle
            }
        }
    }
}

/// Drive `run` from a trigger stream until the stream closes.
///
/// `run` executes on the blocking pool; `on_complete` receives each pass's result on
/// the driver task. Buffered triggers are always drained before a completion is
/// handled. When the trigger stream closes, the in-flight pass and any owed follow-up
/// still complete before this returns. Returns the number of passes executed.
pub async fn drive<T, F, C>(
    mut triggers: mpsc::UnboundedReceiver<()>,
    run: F,
    mut on_complete: C,
) -> usize
where
    T: Send + 'static,
    F: Fn() -> T + Send + Sync + 'static,
    C: FnMut(T),
{
    let run = Arc::new(run);
    let spawn_run = |run: &Arc<F>| {
        let run = Arc::clone(run);
        tokio::task::spawn_blocking(move || run())
    };

    let mut gate = RunGate::new();
    let mut in_flight: Option<JoinHandle<T>> = None;
    let mut triggers_open = true;
    let mut passes = 0;

    loop {
        if !triggers_open && in_flight.is_none() {
            break;
        }

        tokio::select! {
            biased;

            trigger = triggers.recv(), if triggers_open => match trigger {
                Some(()) => {
                    if gate.trigger() == Transition::StartRun {
                        in_flight = Some(spawn_run(&run));
                    } else {
                        log::debug!("watch: pass in progress, follow-up queued");
                    }
                }
                None => triggers_open = false,
            },

            joined = async { in_flight.as_mut().expect("guarded by select condition").await },
                if in_flight.is_some() =>
            {
                in_flight = None;
                passes += 1;
                match joined {
                    Ok(result) => on_complete(result),
                    Err(e) => log::error!("watch: ingestion pass panicked: {}", e),
                }
                if gate.finish() == Transition::StartRun {
                    in_flight = Some(spawn_run(&run));
                }
            }
        }
    }

    passes
}
