//! Single-completion event waiting
//!
//! A flow registers for each lifecycle event it cares about exactly once,
//! before it submits the operation that will cause it, and later awaits the
//! resulting [`PendingEvent`].

use std::collections::HashSet;
use tokio::sync::oneshot;

use depositx_core::errors::{DepositError, Result};

use crate::client::{DepositHandle, LifecycleEvent, LifecycleEventKind};

/// Subscriptions made by one flow against one deposit
pub struct EventWaiter<'a> {
    handle: &'a dyn DepositHandle,
    subscribed: HashSet<LifecycleEventKind>,
}

impl<'a> EventWaiter<'a> {
    pub fn new(handle: &'a dyn DepositHandle) -> Self {
        Self {
            handle,
            subscribed: HashSet::new(),
        }
    }

    /// # Errors
    /// `DuplicateSubscription` if this flow already waits on `kind`.
    pub fn subscribe(&mut self, kind: LifecycleEventKind) -> Result<PendingEvent> {
        if !self.subscribed.insert(kind) {
            return Err(DepositError::DuplicateSubscription { event: kind.name() });
        }
        let (tx, rx) = oneshot::channel();
        self.handle.subscribe(kind, tx);
        Ok(PendingEvent { kind, rx })
    }
}

/// A registered, not yet observed, lifecycle event
#[derive(Debug)]
pub struct PendingEvent {
    kind: LifecycleEventKind,
    rx: oneshot::Receiver<LifecycleEvent>,
}

impl PendingEvent {
    pub fn kind(&self) -> LifecycleEventKind {
        self.kind
    }

    /// Suspend until the handle delivers the event
    ///
    /// # Errors
    /// `EventStreamClosed` if the handle dropped the listener, `Internal` if
    /// it delivered an event of another kind.
    pub async fn wait(self) -> Result<LifecycleEvent> {
        let event = self
            .rx
            .await
            .map_err(|_| DepositError::EventStreamClosed {
                event: self.kind.name(),
            })?;
        if event.kind() != self.kind {
            return Err(DepositError::Internal {
                message: format!(
                    "expected {} event, received {}",
                    self.kind.name(),
                    event.kind().name()
                ),
            });
        }
        tracing::debug!(
            component = module_path!(),
            event = depositx_core_types::schema::EVENT_LIFECYCLE,
            lifecycle = self.kind.name(),
            "lifecycle event observed"
        );
        Ok(event)
    }
}
