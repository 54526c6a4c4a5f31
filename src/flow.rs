//! Observable state and effect streams
//!
//! [`StateFlow`] holds the latest value and replays it to every new
//! subscriber before any later update. [`EffectFlow`] delivers each
//! value once to the subscribers attached when it was emitted.
//!
//! Both are backed by `tokio::sync::broadcast`, so every subscriber
//! sees every published value in order. A state subscriber that falls
//! more than [`CAPACITY`] values behind jumps to the newest value; an
//! effect subscriber continues with the oldest effect still buffered.

use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tracing::trace;

/// Values buffered per subscriber.
pub const CAPACITY: usize = 64;

/// Latest-value stream with replay on subscribe.
pub struct StateFlow<T> {
    current: Mutex<T>,
    tx: broadcast::Sender<T>,
}

impl<T: Clone + PartialEq> StateFlow<T> {
    #[must_use]
    pub fn new(initial: T) -> Self {
        let (tx, _) = broadcast::channel(CAPACITY);
        Self {
            current: Mutex::new(initial),
            tx,
        }
    }

    /// A copy of the current value.
    #[must_use]
    pub fn value(&self) -> T {
        self.lock().clone()
    }

    /// Mutate the value and publish it if it changed.
    ///
    /// Returns whether a new value was published.
    pub fn update(&self, f: impl FnOnce(&mut T)) -> bool {
        let mut current = self.lock();
        let mut next = current.clone();
        f(&mut next);
        if next == *current {
            return false;
        }
        *current = next.clone();
        // Sent under the lock so a concurrent subscribe either sees
        // the old value and this update, or only the new value.
        let receivers = self.tx.send(next).unwrap_or(0);
        drop(current);
        trace!(receivers, "published state");
        true
    }

    /// Subscribe, starting with the current value.
    #[must_use]
    pub fn subscribe(&self) -> StateReceiver<T> {
        let current = self.lock();
        let rx = self.tx.subscribe();
        let pending = Some(current.clone());
        drop(current);
        StateReceiver { pending, rx }
    }

    fn lock(&self) -> MutexGuard<'_, T> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Subscriber side of a [`StateFlow`].
pub struct StateReceiver<T> {
    pending: Option<T>,
    rx: broadcast::Receiver<T>,
}

impl<T: Clone> StateReceiver<T> {
    /// Wait for the next value.
    ///
    /// The first call returns the value current at subscription time.
    /// Returns `None` once the flow is dropped and drained.
    pub async fn recv(&mut self) -> Option<T> {
        if let Some(value) = self.pending.take() {
            return Some(value);
        }
        loop {
            match self.rx.recv().await {
                Ok(value) => return Some(value),
                Err(RecvError::Lagged(skipped)) => {
                    trace!(skipped, "state subscriber lagged");
                    if let Some(latest) = self.latest() {
                        return Some(latest);
                    }
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// The next value if one is already available.
    pub fn try_recv(&mut self) -> Option<T> {
        if let Some(value) = self.pending.take() {
            return Some(value);
        }
        loop {
            match self.rx.try_recv() {
                Ok(value) => return Some(value),
                Err(TryRecvError::Lagged(skipped)) => {
                    trace!(skipped, "state subscriber lagged");
                    if let Some(latest) = self.latest() {
                        return Some(latest);
                    }
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }

    /// Drop everything buffered except the newest value.
    fn latest(&mut self) -> Option<T> {
        let mut latest = None;
        loop {
            match self.rx.try_recv() {
                Ok(value) => latest = Some(value),
                Err(TryRecvError::Lagged(_)) => {}
                Err(TryRecvError::Empty | TryRecvError::Closed) => return latest,
            }
        }
    }
}

/// Fire-once stream without replay.
pub struct EffectFlow<T> {
    tx: broadcast::Sender<T>,
}

impl<T: Clone> EffectFlow<T> {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CAPACITY);
        Self { tx }
    }

    /// Deliver `effect` to the current subscribers.
    ///
    /// Dropped when nobody is subscribed.
    pub fn emit(&self, effect: T) {
        let receivers = self.tx.send(effect).unwrap_or(0);
        trace!(receivers, "emitted effect");
    }

    #[must_use]
    pub fn subscribe(&self) -> EffectReceiver<T> {
        EffectReceiver {
            rx: self.tx.subscribe(),
        }
    }
}

impl<T: Clone> Default for EffectFlow<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Subscriber side of an [`EffectFlow`].
pub struct EffectReceiver<T> {
    rx: broadcast::Receiver<T>,
}

impl<T: Clone> EffectReceiver<T> {
    /// Wait for the next effect; `None` once the flow is gone.
    pub async fn recv(&mut self) -> Option<T> {
        loop {
            match self.rx.recv().await {
                Ok(value) => return Some(value),
                Err(RecvError::Lagged(skipped)) => {
                    trace!(skipped, "effect subscriber lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    pub fn try_recv(&mut self) -> Option<T> {
        loop {
            match self.rx.try_recv() {
                Ok(value) => return Some(value),
                Err(TryRecvError::Lagged(_)) => {}
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }
}
