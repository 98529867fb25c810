//=========================================================================
// Lifecycle Guard
//=========================================================================
//
// Idempotent initialize/deinitialize wrapper for manager-like objects.
//
// Initializing twice is a warning and a no-op; deinitializing something
// that was never initialized is silently ignored. Dropping the guard
// deinitializes the wrapped manager.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, warn};

//=== Initializable Trait =================================================

/// Objects with explicit setup and teardown steps.
pub trait Initializable {
    /// Human readable name used in log messages.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn on_initialize(&mut self) {}

    fn on_deinitialize(&mut self) {}
}

//=== Lifecycle Event =====================================================

/// Notification sent after a lifecycle transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    Initialized,
    Deinitialized,
}

//=== Lifecycle ===========================================================

/// Guard tracking whether `M` has been initialized.
pub struct Lifecycle<M: Initializable> {
    inner: M,
    initialized: bool,
    subscribers: Vec<Sender<LifecycleEvent>>,
}

impl<M: Initializable> Lifecycle<M> {
    /// Wraps an uninitialized manager.
    pub fn new(inner: M) -> Self {
        Self {
            inner,
            initialized: false,
            subscribers: Vec::new(),
        }
    }

    /// Runs `on_initialize` unless already initialized.
    ///
    /// Returns true if the manager was initialized by this call.
    pub fn initialize(&mut self) -> bool {
        if self.initialized {
            warn!("Cannot initialize {} - manager is already initialized", self.inner.name());
            return false;
        }

        self.inner.on_initialize();
        self.initialized = true;
        debug!("Initialized {}", self.inner.name());
        self.notify(LifecycleEvent::Initialized);
        true
    }

    /// Runs `on_deinitialize` if initialized.
    ///
    /// Returns true if the manager was deinitialized by this call.
    pub fn deinitialize(&mut self) -> bool {
        if !self.initialized {
            return false;
        }

        self.inner.on_deinitialize();
        self.initialized = false;
        debug!("Deinitialized {}", self.inner.name());
        self.notify(LifecycleEvent::Deinitialized);
        true
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Subscribes to lifecycle transitions.
    pub fn subscribe(&mut self) -> Receiver<LifecycleEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    pub fn get(&self) -> &M {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut M {
        &mut self.inner
    }

    fn notify(&mut self, event: LifecycleEvent) {
        self.subscribers.retain(|tx| tx.send(event).is_ok());
    }
}

impl<M: Initializable> Drop for Lifecycle<M> {
    fn drop(&mut self) {
        self.deinitialize();
    }
}

//=== Tests ===============================================================
