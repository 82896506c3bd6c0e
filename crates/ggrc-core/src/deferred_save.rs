//! Deferred save coordination
//!
//! UI actions that touch the same instance in quick succession (toggling
//! several role assignments, say) each want the instance saved. The
//! coordinator collects those requests into rounds and runs exactly one
//! underlying save per round:
//!
//! ```text
//! Idle --push--> Collecting --delay elapses--> InFlight --settles--> Idle
//!                    ^                                       |
//!                    +------- pushes queued while in flight -+
//! ```
//!
//! Every action queued for a round is applied to the instance right before
//! that round's save starts, and every caller of the round observes the same
//! outcome. Pushes that arrive while a save is in flight are queued for the
//! next round, which starts only after the current one has settled, so at
//! most one save is in flight per coordinator. A panic in an action or in
//! the save fails that round with an `Internal` error and the coordinator
//! carries on.

use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use futures::future::{BoxFuture, FutureExt};
use serde_json::Value;
use tokio::sync::oneshot;

use crate::config::SaveConfig;
use crate::core_types::RequestId;
use crate::errors::{ExError, ExErrorKind, GgrcError};
use crate::instance::Instance;
use crate::{log_op_end, log_op_error, log_op_start};

/// Outcome shared by every caller of a save round
pub type SaveOutcome = std::result::Result<Value, ExError>;

type SaveFn = dyn Fn() -> BoxFuture<'static, SaveOutcome> + Send + Sync;
type Action = Box<dyn FnOnce() + Send>;

/// Coordinator phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// At least one push is waiting for the batching delay to elapse
    Collecting,
    InFlight,
}

struct Queued {
    action: Action,
    reply: oneshot::Sender<SaveOutcome>,
}

struct State {
    phase: Phase,
    queue: Vec<Queued>,
    rounds: u64,
}

struct Shared {
    label: String,
    save: Box<SaveFn>,
    delay: Duration,
    state: Mutex<State>,
}

impl Shared {
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Coalesces save requests for one instance into single saves
///
/// Cloning yields another handle to the same coordinator. `push` must be
/// called from within a tokio runtime.
#[derive(Clone)]
pub struct DeferredSave {
    shared: Arc<Shared>,
}

impl DeferredSave {
    /// Create a coordinator around a save-invocation function
    ///
    /// `save` is called once per round and performs the persistence call;
    /// `delay` is how long a round collects pushes before saving (may be 0).
    pub fn new<F, Fut>(save: F, delay: Duration) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = SaveOutcome> + Send + 'static,
    {
        Self::build("instance".to_string(), Box::new(move || save().boxed()), delay)
    }

    /// Coordinator whose rounds call `instance.save()`
    pub fn for_instance(instance: Arc<Instance>, config: &SaveConfig) -> Self {
        let label = instance.class().name.clone();
        let save = move || {
            let instance = instance.clone();
            async move { instance.save().await }.boxed()
        };
        Self::build(label, Box::new(save), config.delay())
    }

    fn build(label: String, save: Box<SaveFn>, delay: Duration) -> Self {
        Self {
            shared: Arc::new(Shared {
                label,
                save,
                delay,
                state: Mutex::new(State {
                    phase: Phase::Idle,
                    queue: Vec::new(),
                    rounds: 0,
                }),
            }),
        }
    }

    /// Queue `action` for the current or next round
    ///
    /// The returned handle resolves with the outcome of the round the
    /// action was applied in.
    pub fn push<A>(&self, action: A) -> SaveHandle
    where
        A: FnOnce() + Send + 'static,
    {
        let (reply, rx) = oneshot::channel();
        let start_driver = {
            let mut state = self.shared.state();
            state.queue.push(Queued {
                action: Box::new(action),
                reply,
            });
            if state.phase == Phase::Idle {
                state.phase = Phase::Collecting;
                true
            } else {
                false
            }
        };

        if start_driver {
            tokio::spawn(drive(self.shared.clone()));
        }

        SaveHandle {
            rx,
            label: self.shared.label.clone(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.shared.state().phase
    }

    /// Number of rounds that have started saving
    pub fn rounds_started(&self) -> u64 {
        self.shared.state().rounds
    }

    /// Actions waiting for a round that has not started yet
    pub fn queued_len(&self) -> usize {
        self.shared.state().queue.len()
    }

    pub fn delay(&self) -> Duration {
        self.shared.delay
    }
}

impl std::fmt::Debug for DeferredSave {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.shared.state();
        f.debug_struct("DeferredSave")
            .field("label", &self.shared.label)
            .field("delay", &self.shared.delay)
            .field("phase", &state.phase)
            .field("queued", &state.queue.len())
            .field("rounds", &state.rounds)
            .finish()
    }
}

/// Runs rounds until the queue is drained, then returns the coordinator to
/// `Idle`. One driver exists at a time: it is spawned by the push that
/// leaves `Idle`.
async fn drive(shared: Arc<Shared>) {
    loop {
        if shared.delay.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(shared.delay).await;
        }

        let (batch, round) = {
            let mut state = shared.state();
            state.phase = Phase::InFlight;
            state.rounds += 1;
            (std::mem::take(&mut state.queue), state.rounds)
        };

        let request_id = RequestId::new();
        let started = Instant::now();
        let queued_len = batch.len() as u64;
        log_op_start!(
            "deferred_save",
            round = round,
            queued_len = queued_len,
            request_id = %request_id
        );

        let mut replies = Vec::with_capacity(batch.len());
        let mut panicked_actions = 0usize;
        for queued in batch {
            if panic::catch_unwind(AssertUnwindSafe(queued.action)).is_err() {
                panicked_actions += 1;
            }
            replies.push(queued.reply);
        }

        // A panicking edit may have left the instance half-updated, so the
        // round is failed instead of saved.
        let outcome: SaveOutcome = if panicked_actions > 0 {
            Err(round_panicked(
                &shared.label,
                format!("{} queued action(s) panicked; round not saved", panicked_actions),
            ))
        } else {
            AssertUnwindSafe((shared.save)())
                .catch_unwind()
                .await
                .unwrap_or_else(|_| Err(round_panicked(&shared.label, "save panicked".to_string())))
        };
        let outcome = outcome.map_err(|err| err.with_request_id(request_id.clone()));

        let duration_ms = started.elapsed().as_millis() as u64;
        match &outcome {
            Ok(_) => {
                log_op_end!("deferred_save", duration_ms = duration_ms, round = round);
            }
            Err(err) => {
                log_op_error!("deferred_save", err.clone(), duration_ms = duration_ms, round = round);
            }
        }

        for reply in replies {
            // A caller that dropped its handle no longer cares
            let _ = reply.send(outcome.clone());
        }

        let mut state = shared.state();
        if state.queue.is_empty() {
            state.phase = Phase::Idle;
            return;
        }
        state.phase = Phase::Collecting;
    }
}

fn round_panicked(label: &str, message: String) -> ExError {
    ExError::new(ExErrorKind::Internal)
        .with_op("deferred_save")
        .with_entity_id(label)
        .with_message(message)
}

/// Completion handle returned by [`DeferredSave::push`]
#[derive(Debug)]
pub struct SaveHandle {
    rx: oneshot::Receiver<SaveOutcome>,
    label: String,
}

impl Future for SaveHandle {
    type Output = SaveOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let label = self.label.clone();
        Pin::new(&mut self.rx).poll(cx).map(|received| {
            received.unwrap_or_else(|_| Err(GgrcError::RoundAbandoned { model: label }.into()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_zero_delay_round_resolves() {
        let saves = Arc::new(AtomicUsize::new(0));
        let counter = saves.clone();
        let coordinator = DeferredSave::new(
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Ok(json!({"ok": true})) }
            },
            Duration::ZERO,
        );

        let outcome = coordinator.push(|| {}).await;

        assert_eq!(outcome.unwrap(), json!({"ok": true}));
        assert_eq!(saves.load(Ordering::SeqCst), 1);
        assert_eq!(coordinator.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn test_actions_run_before_save() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let save_log = log.clone();
        let coordinator = DeferredSave::new(
            move || {
                save_log.lock().unwrap().push("save");
                async { Ok(Value::Null) }
            },
            Duration::ZERO,
        );

        let a = log.clone();
        let b = log.clone();
        let first = coordinator.push(move || a.lock().unwrap().push("action-1"));
        let second = coordinator.push(move || b.lock().unwrap().push("action-2"));
        first.await.unwrap();
        second.await.unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["action-1", "action-2", "save"]);
    }

    #[tokio::test]
    async fn test_failure_reaches_every_caller() {
        let coordinator = DeferredSave::new(
            || async { Err(ExError::new(ExErrorKind::SaveFailed).with_message("boom")) },
            Duration::ZERO,
        );

        let handles: Vec<_> = (0..3).map(|_| coordinator.push(|| {})).collect();
        for handle in handles {
            let err = handle.await.unwrap_err();
            assert_eq!(err.kind(), ExErrorKind::SaveFailed);
            assert_eq!(err.message(), "boom");
            assert!(err.request_id().is_some());
        }
        assert_eq!(coordinator.rounds_started(), 1);
        assert_eq!(coordinator.phase(), Phase::Idle);
    }

    #[test]
    fn test_new_coordinator_is_idle() {
        let coordinator = DeferredSave::new(|| async { Ok(Value::Null) }, Duration::from_millis(5));
        assert_eq!(coordinator.phase(), Phase::Idle);
        assert_eq!(coordinator.queued_len(), 0);
        assert_eq!(coordinator.delay(), Duration::from_millis(5));
    }
}
