use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use ggrc_core::{ExError, ExErrorKind, Instance, InstanceBackend, ModelClass};
use serde_json::{json, Value};

/// In-memory stand-in for the REST client
///
/// Counts calls, tracks how many saves overlap, and can be switched to fail.
/// Each successful save answers `{"ok": true, "save": <n>}`.
#[derive(Default)]
pub struct MockBackend {
    saves: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    refreshes: AtomicUsize,
    fail_saves: AtomicBool,
    save_latency: Duration,
    refresh_body: Mutex<Value>,
}

#[allow(dead_code)]
impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(latency: Duration) -> Self {
        Self {
            save_latency: latency,
            ..Self::default()
        }
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub fn set_refresh_body(&self, body: Value) {
        *self.refresh_body.lock().unwrap() = body;
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn refreshes(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InstanceBackend for MockBackend {
    async fn save(&self, _model: &str, _attrs: Value) -> Result<Value, ExError> {
        let n = self.saves.fetch_add(1, Ordering::SeqCst) + 1;
        let overlapping = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(overlapping, Ordering::SeqCst);

        if !self.save_latency.is_zero() {
            tokio::time::sleep(self.save_latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(ExError::new(ExErrorKind::SaveFailed)
                .with_op("put")
                .with_message(format!("save {} rejected", n)));
        }
        Ok(json!({"ok": true, "save": n}))
    }

    async fn refresh(&self, _model: &str, _id: Option<i64>) -> Result<Value, ExError> {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        Ok(self.refresh_body.lock().unwrap().clone())
    }
}

/// Instance of `model` backed by `backend`
#[allow(dead_code)]
pub fn new_instance(model: &str, attrs: Value, backend: Arc<MockBackend>) -> Arc<Instance> {
    Arc::new(Instance::new(ModelClass::new(model), attrs, backend))
}
