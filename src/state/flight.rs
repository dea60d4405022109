//! Single-flight task slots.
//!
//! A [`SingleFlight`] owns at most one spawned task. Starting work under the
//! key of a task that is still running joins that task; starting work under a
//! different key aborts the old task first. Dropping the slot aborts whatever
//! is still running.
//!
//! [`KeyedFlights`] keeps one task per key instead, for work that must not be
//! superseded by work under another key.

use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard, PoisonError};

use futures_util::future::{BoxFuture, FutureExt, Shared};
use tokio::task::AbortHandle;
use tracing::debug;

/// Resolves once the task behind an operation has ended, whether it finished,
/// was aborted or panicked. Dropping it does not cancel the task.
pub type Completion = Shared<BoxFuture<'static, ()>>;

/// A completion that is already resolved, for operations that had nothing to do.
pub fn completed() -> Completion {
    futures_util::future::ready(()).boxed().shared()
}

struct Flight<K> {
    key: K,
    abort: AbortHandle,
    completion: Completion,
}

/// At most one running task, identified by a key.
pub struct SingleFlight<K> {
    slot: Mutex<Option<Flight<K>>>,
}

impl<K> Default for SingleFlight<K> {
    fn default() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }
}

impl<K: PartialEq + Debug> SingleFlight<K> {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> MutexGuard<'_, Option<Flight<K>>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Spawn `future` under `key`, or join the running task with the same key.
    pub fn run<F>(&self, key: K, future: F) -> Completion
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.run_if(key, || Some(future))
    }

    /// Like [`run`](Self::run), but `start` may decline to produce work.
    ///
    /// `start` is only called when no task with the same key is running, and
    /// a running task under another key is only aborted when `start` returns
    /// a future.
    pub fn run_if<F, S>(&self, key: K, start: S) -> Completion
    where
        F: Future<Output = ()> + Send + 'static,
        S: FnOnce() -> Option<F>,
    {
        let mut slot = self.slot();

        if let Some(flight) = slot.as_ref() {
            if flight.key == key && !flight.abort.is_finished() {
                debug!("Joining in-flight task {:?}", key);
                return flight.completion.clone();
            }
        }

        let Some(future) = start() else {
            return completed();
        };

        if let Some(old) = slot.take() {
            if !old.abort.is_finished() {
                debug!("Cancelling superseded task {:?}", old.key);
                old.abort.abort();
            }
        }

        let (abort, completion) = spawn_shared(future);
        *slot = Some(Flight {
            key,
            abort,
            completion: completion.clone(),
        });
        completion
    }

    /// Abort the running task, if any.
    pub fn cancel(&self) {
        if let Some(flight) = self.slot().take() {
            flight.abort.abort();
        }
    }

    /// Whether a task is still running.
    pub fn is_running(&self) -> bool {
        self.slot()
            .as_ref()
            .map(|f| !f.abort.is_finished())
            .unwrap_or(false)
    }
}

impl<K> Drop for SingleFlight<K> {
    fn drop(&mut self) {
        let slot = self.slot.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(flight) = slot.take() {
            flight.abort.abort();
        }
    }
}

/// One running task per key. Tasks under different keys run side by side;
/// a task under the same key is joined.
pub struct KeyedFlights<K> {
    slots: Mutex<HashMap<K, Flight<K>>>,
}

impl<K> Default for KeyedFlights<K> {
    fn default() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }
}

impl<K: Eq + Hash + Clone + Debug> KeyedFlights<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn the future produced by `start` under `key`, or join the task
    /// already running under that key. `start` is only called when a new
    /// task is spawned.
    pub fn run_with<F, S>(&self, key: K, start: S) -> Completion
    where
        F: Future<Output = ()> + Send + 'static,
        S: FnOnce() -> F,
    {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.retain(|_, flight| !flight.abort.is_finished());

        if let Some(flight) = slots.get(&key) {
            debug!("Joining in-flight task {:?}", key);
            return flight.completion.clone();
        }

        let (abort, completion) = spawn_shared(start());
        slots.insert(
            key.clone(),
            Flight {
                key,
                abort,
                completion: completion.clone(),
            },
        );
        completion
    }

    /// Number of tasks still running.
    pub fn running(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|f| !f.abort.is_finished())
            .count()
    }
}

impl<K> Drop for KeyedFlights<K> {
    fn drop(&mut self) {
        let slots = self.slots.get_mut().unwrap_or_else(PoisonError::into_inner);
        for (_, flight) in slots.drain() {
            flight.abort.abort();
        }
    }
}

fn spawn_shared<F>(future: F) -> (AbortHandle, Completion)
where
    F: Future<Output = ()> + Send + 'static,
{
    let handle = tokio::spawn(future);
    let abort = handle.abort_handle();
    let completion = async move {
        let _ = handle.await;
    }
    .boxed()
    .shared();
    (abort, completion)
}
