//! Per-view data-fetching state containers.
//!
//! A [`FetchHook`] owns one `(data, loading, error)` triple and publishes it
//! over a `watch` channel. Each input change starts a fetch tagged with a
//! generation number; results from superseded generations are dropped, so a
//! slow early request can never overwrite a newer one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::future::BoxFuture;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::api::Envelope;

pub mod anime;

pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred";

#[derive(Debug, Clone, PartialEq)]
pub struct HookState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> HookState<T> {
    pub fn loading() -> Self {
        Self {
            data: None,
            loading: true,
            error: None,
        }
    }

    pub fn cleared() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }

    pub fn loaded(data: T) -> Self {
        Self {
            data: Some(data),
            loading: false,
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            data: None,
            loading: false,
            error: Some(message.into()),
        }
    }
}

/// What to do with an input before any request is made
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    Fetch,
    /// Reset to empty state without fetching
    Clear,
    /// Surface the message as the hook's error without fetching
    Reject(&'static str),
}

fn always_fetch<I>(_: &I) -> Guard {
    Guard::Fetch
}

type Fetcher<I, T> = Arc<dyn Fn(I) -> BoxFuture<'static, Envelope<T>> + Send + Sync>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct FetchHook<I, T> {
    state: Arc<watch::Sender<HookState<T>>>,
    generation: Arc<AtomicU64>,
    fetcher: Fetcher<I, T>,
    guard: fn(&I) -> Guard,
    default_error: &'static str,
    debounce: Option<Duration>,
    last_input: Mutex<Option<I>>,
    pending_timer: Mutex<Option<JoinHandle<()>>>,
}

impl<I, T> FetchHook<I, T>
where
    I: Clone + PartialEq + Send + 'static,
    T: Send + Sync + 'static,
{
    /// `default_error` is reported when a failed envelope has no message.
    pub fn new<F>(fetcher: F, default_error: &'static str) -> Self
    where
        F: Fn(I) -> BoxFuture<'static, Envelope<T>> + Send + Sync + 'static,
    {
        let (state, _) = watch::channel(HookState::loading());
        Self {
            state: Arc::new(state),
            generation: Arc::new(AtomicU64::new(0)),
            fetcher: Arc::new(fetcher),
            guard: always_fetch::<I>,
            default_error,
            debounce: None,
            last_input: Mutex::new(None),
            pending_timer: Mutex::new(None),
        }
    }

    pub fn with_guard(mut self, guard: fn(&I) -> Guard) -> Self {
        self.guard = guard;
        self
    }

    /// Wait `delay` after the latest input before fetching
    pub fn with_debounce(mut self, delay: Duration) -> Self {
        self.debounce = Some(delay);
        self
    }

    /// Fetch for `input` unless it equals the previous input.
    pub fn update(&self, input: I) {
        if lock(&self.last_input).as_ref() == Some(&input) {
            return;
        }
        self.trigger(input);
    }

    /// Fetch again for the last input
    pub fn refetch(&self) {
        let last = lock(&self.last_input).clone();
        if let Some(input) = last {
            self.trigger(input);
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<HookState<T>> {
        self.state.subscribe()
    }

    fn trigger(&self, input: I) {
        *lock(&self.last_input) = Some(input.clone());

        // Only the timer is cancelled; a fetch already running is left to
        // finish and gets discarded by the generation check.
        if let Some(timer) = lock(&self.pending_timer).take() {
            timer.abort();
        }

        let guard = (self.guard)(&input);
        let next = match guard {
            Guard::Fetch => HookState::loading(),
            Guard::Clear => HookState::cleared(),
            Guard::Reject(message) => HookState::failed(message),
        };

        let mut generation = 0;
        self.state.send_modify(|state| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *state = next;
        });

        if guard != Guard::Fetch {
            return;
        }

        let state = self.state.clone();
        let latest = self.generation.clone();
        let fetcher = self.fetcher.clone();
        let default_error = self.default_error;
        let run = async move {
            apply(state, latest, generation, (*fetcher)(input), default_error).await;
        };

        match self.debounce {
            Some(delay) => {
                let timer = tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    tokio::spawn(run);
                });
                *lock(&self.pending_timer) = Some(timer);
            }
            None => {
                tokio::spawn(run);
            }
        }
    }
}

impl<I, T> FetchHook<I, T>
where
    T: Clone,
{
    pub fn snapshot(&self) -> HookState<T> {
        self.state.borrow().clone()
    }

    /// Wait until no fetch is pending and return the resulting state
    pub async fn settled(&self) -> HookState<T> {
        let mut rx = self.state.subscribe();
        match rx.wait_for(|state| !state.loading).await {
            Ok(state) => state.clone(),
            Err(_) => self.snapshot(),
        }
    }
}

impl<I, T> Drop for FetchHook<I, T> {
    fn drop(&mut self) {
        if let Some(timer) = lock(&self.pending_timer).take() {
            timer.abort();
        }
    }
}

async fn apply<T>(
    state: Arc<watch::Sender<HookState<T>>>,
    latest: Arc<AtomicU64>,
    generation: u64,
    fetch: BoxFuture<'static, Envelope<T>>,
    default_error: &'static str,
) where
    T: Send + 'static,
{
    let next = match tokio::spawn(fetch).await {
        Ok(envelope) => match envelope.into_result(default_error) {
            Ok(data) => HookState::loaded(data),
            Err(message) => HookState::failed(message),
        },
        Err(e) => {
            error!(error = %e, "Fetch task failed");
            HookState::failed(UNEXPECTED_ERROR)
        }
    };

    let applied = state.send_if_modified(|current| {
        if latest.load(Ordering::SeqCst) != generation {
            return false;
        }
        *current = next;
        true
    });

    if !applied {
        debug!(generation, "Discarded stale fetch result");
    }
}
