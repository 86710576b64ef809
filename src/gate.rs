use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Idle,
    InFlight,
}

/// Admits one outstanding request at a time. Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct RequestGate {
    in_flight: Arc<AtomicBool>,
}

/// Held for the duration of a request; releases the gate on drop.
#[derive(Debug)]
pub struct RequestPermit {
    in_flight: Arc<AtomicBool>,
}

impl RequestGate {
    pub fn try_acquire(&self) -> Option<RequestPermit> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RequestPermit {
                in_flight: Arc::clone(&self.in_flight),
            })
    }

    pub fn state(&self) -> RequestState {
        if self.in_flight.load(Ordering::Acquire) {
            RequestState::InFlight
        } else {
            RequestState::Idle
        }
    }
}

impl Drop for RequestPermit {
    fn drop(&mut self) {
        self.in_flight.store(false, Ordering::Release);
    }
}
