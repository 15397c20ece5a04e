use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::Mutex as AsyncMutex;
use tracing::info;

use super::transport::Transport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Availability {
    #[default]
    Unknown,
    Available,
    Unavailable,
}

impl From<bool> for Availability {
    fn from(reachable: bool) -> Self {
        if reachable {
            Availability::Available
        } else {
            Availability::Unavailable
        }
    }
}

/// Remembered backend reachability. Shared by every client built on it and
/// resettable so tests do not depend on process state.
///
/// The cache also owns the single-flight lock, so clients sharing one cache
/// never probe concurrently.
#[derive(Debug, Default)]
pub struct AvailabilityCache {
    state: Mutex<Availability>,
    in_flight: AsyncMutex<()>,
}

impl AvailabilityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Availability {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set(&self, availability: Availability) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = availability;
    }

    pub fn reset(&self) {
        self.set(Availability::Unknown);
    }

    /// Return the cached answer, probing through `transport` only when it is
    /// still unknown. Concurrent callers wait on the first probe.
    pub async fn get_or_probe(&self, transport: &dyn Transport) -> bool {
        match self.get() {
            Availability::Available => return true,
            Availability::Unavailable => return false,
            Availability::Unknown => {}
        }

        let _guard = self.in_flight.lock().await;

        // Another caller may have resolved it while we waited
        match self.get() {
            Availability::Available => true,
            Availability::Unavailable => false,
            Availability::Unknown => {
                let reachable = transport.probe().await;
                self.set(reachable.into());
                if reachable {
                    info!("Backend reachable, using live API");
                } else {
                    info!("Backend unreachable, serving mock data");
                }
                reachable
            }
        }
    }
}

/// Binds a transport to the shared cache it probes through.
pub struct Prober {
    cache: Arc<AvailabilityCache>,
    transport: Arc<dyn Transport>,
}

impl Prober {
    pub fn new(cache: Arc<AvailabilityCache>, transport: Arc<dyn Transport>) -> Self {
        Self { cache, transport }
    }

    pub fn cache(&self) -> &Arc<AvailabilityCache> {
        &self.cache
    }

    pub async fn is_available(&self) -> bool {
        self.cache.get_or_probe(self.transport.as_ref()).await
    }
}
