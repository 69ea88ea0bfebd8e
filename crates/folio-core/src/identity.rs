//! Visitor identity and the shared identity slot.
//!
//! Identity is sourced from a shared, externally-mutable slot: the login
//! flow (out of scope here) writes it, the conversation manager only reads
//! and observes it. [`IdentitySlot`] is the write surface handed to that
//! external flow; [`IdentityWatcher`] is the read/subscribe capability
//! injected into the conversation controller, which keeps identity-change
//! handling deterministic and testable instead of a hidden global.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;

/// The current visitor identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Identity {
    /// Visitor has not logged in; transcripts live in session storage only.
    Anonymous,
    /// Visitor is identified by a display name; transcripts are durable.
    Named(String),
}

impl Identity {
    /// Creates a named identity.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Returns the display name for a named identity.
    pub fn display_name(&self) -> Option<&str> {
        match self {
            Self::Anonymous => None,
            Self::Named(name) => Some(name),
        }
    }
}

impl Default for Identity {
    fn default() -> Self {
        Self::Anonymous
    }
}

/// The shared identity slot.
///
/// Cloneable write handle over a watch channel. The login/logout flow calls
/// [`IdentitySlot::set`]; everything else holds an [`IdentityWatcher`]
/// obtained from [`IdentitySlot::watch`].
#[derive(Clone)]
pub struct IdentitySlot {
    tx: Arc<watch::Sender<Identity>>,
}

impl IdentitySlot {
    /// Creates a slot holding the given initial identity.
    ///
    /// An absent persisted identity reads as [`Identity::Anonymous`]; use
    /// [`IdentitySlot::default`] for that case.
    pub fn new(initial: Identity) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Writes a new identity, notifying all watchers.
    pub fn set(&self, identity: Identity) {
        self.tx.send_replace(identity);
    }

    /// Returns the identity currently in the slot.
    pub fn current(&self) -> Identity {
        self.tx.borrow().clone()
    }

    /// Registers a watcher for this slot.
    ///
    /// The watcher holds the subscription for its lifetime; dropping it
    /// deregisters it on every exit path.
    pub fn watch(&self) -> IdentityWatcher {
        IdentityWatcher {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for IdentitySlot {
    fn default() -> Self {
        Self::new(Identity::Anonymous)
    }
}

/// Read-only subscription to the identity slot.
pub struct IdentityWatcher {
    rx: watch::Receiver<Identity>,
}

impl IdentityWatcher {
    /// Returns the latest identity and marks it as seen.
    pub fn latest(&mut self) -> Identity {
        self.rx.borrow_and_update().clone()
    }

    /// Returns true when the slot changed since the last `latest()` call.
    pub fn has_changed(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }

    /// Waits for the next external identity change.
    ///
    /// Returns the new identity, or `None` if the slot was dropped.
    pub async fn changed(&mut self) -> Option<Identity> {
        match self.rx.changed().await {
            Ok(()) => Some(self.rx.borrow_and_update().clone()),
            Err(_) => None,
        }
    }
}
