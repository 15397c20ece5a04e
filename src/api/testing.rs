use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;

use super::transport::{Query, Transport};
use crate::error::{Error, Result};

/// Records every request; answers canned bodies by path and 500 otherwise.
pub(crate) struct FakeTransport {
    reachable: bool,
    probe_delay: Duration,
    probes: AtomicUsize,
    calls: Mutex<Vec<(String, Query)>>,
    responses: HashMap<String, Value>,
}

impl FakeTransport {
    pub(crate) fn reachable() -> Self {
        Self::new(true)
    }

    pub(crate) fn unreachable() -> Self {
        Self::new(false)
    }

    fn new(reachable: bool) -> Self {
        Self {
            reachable,
            probe_delay: Duration::ZERO,
            probes: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
            responses: HashMap::new(),
        }
    }

    pub(crate) fn respond(mut self, path: &str, body: Value) -> Self {
        self.responses.insert(path.to_string(), body);
        self
    }

    /// Make every probe take `delay` so concurrent callers overlap
    pub(crate) fn with_probe_delay(mut self, delay: Duration) -> Self {
        self.probe_delay = delay;
        self
    }

    pub(crate) fn probe_count(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    pub(crate) fn calls(&self) -> Vec<(String, Query)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Transport for FakeTransport {
    async fn get(&self, path: &str, query: &Query) -> Result<Value> {
        self.calls
            .lock()
            .unwrap()
            .push((path.to_string(), query.clone()));
        self.responses
            .get(path)
            .cloned()
            .ok_or(Error::HttpStatus(StatusCode::INTERNAL_SERVER_ERROR))
    }

    async fn probe(&self) -> bool {
        self.probes.fetch_add(1, Ordering::SeqCst);
        if !self.probe_delay.is_zero() {
            tokio::time::sleep(self.probe_delay).await;
        }
        self.reachable
    }
}
