//! One-shot completion gate for a crawl.
//!
//! The crawl task reports through exactly one of its success or failure
//! paths. Both paths share one [`CompletionGate`]; the first report is
//! delivered and any later one is dropped.

use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;

use crate::error::{AppError, Result};

/// Completing side of the gate. Cheap to clone; all clones share one slot.
pub struct CompletionGate<T> {
    slot: Arc<Mutex<Option<oneshot::Sender<Result<T>>>>>,
}

impl<T> Clone for CompletionGate<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

/// Waiting side of the gate.
pub struct Completion<T> {
    receiver: oneshot::Receiver<Result<T>>,
}

impl<T> CompletionGate<T> {
    /// Create a gate and the handle that waits on it.
    pub fn new() -> (Self, Completion<T>) {
        let (sender, receiver) = oneshot::channel();
        let gate = Self {
            slot: Arc::new(Mutex::new(Some(sender))),
        };
        (gate, Completion { receiver })
    }

    /// Report success. Returns `false` if the gate already fired.
    pub fn succeed(&self, value: T) -> bool {
        self.complete(Ok(value))
    }

    /// Report failure. Returns `false` if the gate already fired.
    pub fn fail(&self, error: AppError) -> bool {
        self.complete(Err(error))
    }

    fn complete(&self, outcome: Result<T>) -> bool {
        let sender = match self.slot.lock() {
            Ok(mut slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        match sender {
            // A dropped waiter still counts as the gate having fired.
            Some(sender) => {
                let _ = sender.send(outcome);
                true
            }
            None => false,
        }
    }
}

impl<T> Completion<T> {
    /// Wait for the gate to fire.
    ///
    /// Fails if every completing handle was dropped without reporting.
    pub async fn wait(self) -> Result<T> {
        self.receiver.await.unwrap_or_else(|_| {
            Err(AppError::crawl(
                "completion",
                "task ended without reporting an outcome",
            ))
        })
    }
}
