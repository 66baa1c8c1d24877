//! Coalescing analysis scheduler.
//!
//! One coordinating task owns a [`SchedulerState`] with two slots, `running`
//! and `pending`. A submission while idle starts immediately; a submission
//! while busy overwrites `pending`, discarding whatever was there. When the
//! running analysis finishes its outcome is delivered and the pending request
//! (if any) starts. At most one analysis executes at a time and outcomes are
//! delivered in execution order.
//!
//! Callers only talk to the coordinator through channels: [`SchedulerHandle`]
//! for submissions and an unbounded receiver for outcomes.

use std::sync::{Arc, Mutex};

use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, error, info};

use pathwise_common::{PathwiseError, Result};

use crate::executor::AnalysisExecutor;
use crate::outcome::{AnalysisOutcome, OutcomeStatus};
use crate::request::{AnalysisRequest, RequestId};

// ── State machine ───────────────────────────────────────────────────────────

/// Result of admitting a request into the state machine.
#[derive(Debug)]
pub enum Admission {
    /// The scheduler was idle; execute this request now.
    Start(AnalysisRequest),
    /// The scheduler is busy; the request now occupies the pending slot.
    Queued { superseded: Option<RequestId> },
}

/// Two-slot scheduler state. Mutated only through `submit` and `complete`.
#[derive(Debug, Default)]
pub struct SchedulerState {
    running: Option<AnalysisRequest>,
    pending: Option<AnalysisRequest>,
}

impl SchedulerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submit(&mut self, request: AnalysisRequest) -> Admission {
        if self.running.is_none() {
            self.running = Some(request.clone());
            Admission::Start(request)
        } else {
            let superseded = self.pending.replace(request).map(|old| old.id());
            Admission::Queued { superseded }
        }
    }

    /// The running request finished. Promotes the pending request, returning
    /// it if there is one to start.
    pub fn complete(&mut self) -> Option<AnalysisRequest> {
        self.running = self.pending.take();
        self.running.clone()
    }

    pub fn running(&self) -> Option<&AnalysisRequest> {
        self.running.as_ref()
    }

    pub fn pending(&self) -> Option<&AnalysisRequest> {
        self.pending.as_ref()
    }

    pub fn is_idle(&self) -> bool {
        self.running.is_none()
    }

    pub fn status(&self) -> SchedulerStatus {
        SchedulerStatus {
            running: self.running.as_ref().map(AnalysisRequest::id),
            pending: self.pending.as_ref().map(AnalysisRequest::id),
        }
    }
}

/// Snapshot of the slots, published for callers that show a busy indicator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SchedulerStatus {
    pub running: Option<RequestId>,
    pub pending: Option<RequestId>,
}

impl SchedulerStatus {
    pub fn is_busy(&self) -> bool {
        self.running.is_some()
    }
}

// ── Handle ──────────────────────────────────────────────────────────────────

/// Caller-side handle. Cheap to clone; the coordinator exits once every
/// handle is dropped and its remaining work is delivered.
///
/// Clones share one id counter, and an id is taken and sent under the same
/// lock, so the coordinator sees ids in strictly increasing order no matter
/// which clone or thread submitted them.
#[derive(Debug, Clone)]
pub struct SchedulerHandle {
    commands: mpsc::UnboundedSender<AnalysisRequest>,
    status: watch::Receiver<SchedulerStatus>,
    next_id: Arc<Mutex<u64>>,
}

impl SchedulerHandle {
    /// Fire-and-forget submission. Never blocks and never waits for the
    /// analysis; returns the id assigned to the request.
    pub fn submit(&self, mut request: AnalysisRequest) -> Result<RequestId> {
        let mut last = self.next_id.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let id = RequestId(*last + 1);
        request.assign_id(id);
        self.commands
            .send(request)
            .map_err(|_| PathwiseError::SchedulerClosed)?;
        *last = id.0;
        Ok(id)
    }

    pub fn status(&self) -> SchedulerStatus {
        *self.status.borrow()
    }

    pub fn is_busy(&self) -> bool {
        self.status().is_busy()
    }

    /// Receiver that observes every status change.
    pub fn watch_status(&self) -> watch::Receiver<SchedulerStatus> {
        self.status.clone()
    }
}

// ── Coordinator ─────────────────────────────────────────────────────────────

pub struct Scheduler;

impl Scheduler {
    /// Spawn the coordinating task on the current tokio runtime.
    pub fn spawn<E: AnalysisExecutor>(
        executor: E,
    ) -> (SchedulerHandle, mpsc::UnboundedReceiver<AnalysisOutcome>) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        let (status_tx, status_rx) = watch::channel(SchedulerStatus::default());

        tokio::spawn(coordinate(Arc::new(executor), command_rx, outcome_tx, status_tx));

        let handle = SchedulerHandle {
            commands: command_tx,
            status: status_rx,
            next_id: Arc::new(Mutex::new(0)),
        };
        (handle, outcome_rx)
    }
}

async fn coordinate<E: AnalysisExecutor>(
    executor: Arc<E>,
    mut commands: mpsc::UnboundedReceiver<AnalysisRequest>,
    outcomes: mpsc::UnboundedSender<AnalysisOutcome>,
    status: watch::Sender<SchedulerStatus>,
) {
    info!("Started analysis scheduler");

    let mut state = SchedulerState::new();
    let mut task: Option<JoinHandle<AnalysisOutcome>> = None;
    let mut accepting = true;

    loop {
        tokio::select! {
            // Drain queued submissions before looking at a finished task, so
            // a burst of submissions coalesces deterministically.
            biased;

            command = commands.recv(), if accepting => match command {
                Some(request) => match state.submit(request) {
                    Admission::Start(request) => {
                        task = Some(start(&executor, request));
                    }
                    Admission::Queued { superseded } => {
                        if let Some(old) = superseded {
                            debug!(request_id = %old, "Pending analysis superseded");
                        }
                    }
                },
                None => accepting = false,
            },

            joined = join_running(&mut task), if task.is_some() => {
                task = None;
                let outcome = match joined {
                    Ok(outcome) => Some(outcome),
                    Err(e) => aborted_outcome(&state, e),
                };
                if let Some(outcome) = outcome {
                    if outcomes.send(outcome).is_err() {
                        debug!("Outcome receiver dropped; discarding result");
                    }
                }
                if let Some(next) = state.complete() {
                    task = Some(start(&executor, next));
                }
            }
        }

        let _ = status.send(state.status());

        if !accepting && task.is_none() {
            break;
        }
    }

    info!("Analysis scheduler stopped");
}

fn start<E: AnalysisExecutor>(executor: &Arc<E>, request: AnalysisRequest) -> JoinHandle<AnalysisOutcome> {
    debug!(request_id = %request.id(), "Starting analysis");
    let executor = Arc::clone(executor);
    tokio::task::spawn_blocking(move || executor.execute(&request))
}

async fn join_running(
    task: &mut Option<JoinHandle<AnalysisOutcome>>,
) -> std::result::Result<AnalysisOutcome, JoinError> {
    match task {
        Some(handle) => handle.await,
        None => std::future::pending().await,
    }
}

/// Still deliver exactly one outcome when the computation panicked.
fn aborted_outcome(state: &SchedulerState, e: JoinError) -> Option<AnalysisOutcome> {
    error!("Analysis task failed: {}", e);
    state
        .running()
        .map(|request| AnalysisOutcome::for_request(request, OutcomeStatus::Aborted(e.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathwise_catalog::{ResolvedUniverse, RestrictedCatalog};
    use pathwise_common::FeatureSet;

    fn request(id: u64) -> AnalysisRequest {
        let mut r = AnalysisRequest::new(
            ResolvedUniverse {
                foreground: FeatureSet::from_raw(["A"]),
                background: FeatureSet::from_raw(["A", "B"]),
            },
            Arc::new(RestrictedCatalog::default()),
        );
        r.assign_id(RequestId(id));
        r
    }

    #[test]
    fn test_idle_submission_starts() {
        let mut state = SchedulerState::new();
        assert!(matches!(state.submit(request(1)), Admission::Start(r) if r.id() == RequestId(1)));
        assert_eq!(state.status().running, Some(RequestId(1)));
        assert!(state.pending().is_none());
    }

    #[test]
    fn test_busy_submissions_overwrite_pending() {
        let mut state = SchedulerState::new();
        state.submit(request(1));
        assert!(matches!(state.submit(request(2)), Admission::Queued { superseded: None }));
        assert!(matches!(
            state.submit(request(3)),
            Admission::Queued { superseded: Some(RequestId(2)) }
        ));
        assert_eq!(
            state.status(),
            SchedulerStatus { running: Some(RequestId(1)), pending: Some(RequestId(3)) }
        );
    }

    #[test]
    fn test_complete_promotes_pending_then_idles() {
        let mut state = SchedulerState::new();
        state.submit(request(1));
        state.submit(request(2));
        assert_eq!(state.complete().map(|r| r.id()), Some(RequestId(2)));
        assert!(state.pending().is_none());
        assert!(state.complete().is_none());
        assert!(state.is_idle());
    }

    #[test]
    fn test_cloned_handles_deliver_ids_in_order() {
        let (commands, mut received) = mpsc::unbounded_channel();
        let (_status_tx, status) = watch::channel(SchedulerStatus::default());
        let handle = SchedulerHandle { commands, status, next_id: Arc::new(Mutex::new(0)) };

        let threads: Vec<_> = (0..4)
            .map(|_| {
                let handle = handle.clone();
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        handle.submit(request(0)).unwrap();
                    }
                })
            })
            .collect();
        for t in threads {
            t.join().unwrap();
        }

        let mut ids = Vec::new();
        while let Ok(r) = received.try_recv() {
            ids.push(r.id().0);
        }
        assert_eq!(ids, (1..=200).collect::<Vec<u64>>());
    }

    #[test]
    fn test_failed_submit_does_not_consume_id() {
        let (commands, received) = mpsc::unbounded_channel();
        let (_status_tx, status) = watch::channel(SchedulerStatus::default());
        let handle = SchedulerHandle { commands, status, next_id: Arc::new(Mutex::new(0)) };
        drop(received);
        assert!(matches!(handle.submit(request(0)), Err(PathwiseError::SchedulerClosed)));
        assert_eq!(*handle.next_id.lock().unwrap(), 0);
    }
}
