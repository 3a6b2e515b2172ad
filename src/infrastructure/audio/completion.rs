use std::sync::{Arc, Mutex, PoisonError};

/// Callback run when audio finishes playing on its own
pub type OnEnded = Box<dyn FnOnce() + Send + 'static>;

/// Shared holder for a completion callback.
///
/// The callback runs at most once: whichever of `fire` or `detach` gets to it
/// first takes it out of the slot. Backends keep a clone and fire it on
/// natural end; the player detaches it before halting a backend so a stop
/// never looks like a natural end.
#[derive(Clone)]
pub struct CompletionSlot {
    inner: Arc<Mutex<Option<OnEnded>>>,
}

impl CompletionSlot {
    pub fn new(on_ended: OnEnded) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Some(on_ended))),
        }
    }

    /// Run the callback if it is still attached. Returns whether it ran.
    pub fn fire(&self) -> bool {
        let callback = self.take();
        match callback {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }

    /// Drop the callback without running it. Returns whether one was attached.
    pub fn detach(&self) -> bool {
        self.take().is_some()
    }

    pub fn is_armed(&self) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn take(&self) -> Option<OnEnded> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

impl std::fmt::Debug for CompletionSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionSlot")
            .field("armed", &self.is_armed())
            .finish()
    }
}
