//! Process-wide visibility of the add-repository dialog
//!
//! All reads and writes go through [`DialogVisibility`]. The state carries a
//! session counter that advances on every close, which lets controllers detect
//! a close that happened elsewhere (or while they awaited).

use once_cell::sync::Lazy;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

static GLOBAL: Lazy<DialogVisibility> = Lazy::new(DialogVisibility::new);

/// Snapshot of the dialog visibility
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisibilityState {
    pub open: bool,
    /// Number of close requests so far
    pub session: u64,
}

/// Shared handle to the dialog visibility flag
#[derive(Debug, Clone)]
pub struct DialogVisibility {
    sender: Arc<watch::Sender<VisibilityState>>,
}

impl Default for DialogVisibility {
    fn default() -> Self {
        Self::new()
    }
}

impl DialogVisibility {
    /// Create an independent visibility flag (closed)
    pub fn new() -> Self {
        let (sender, _) = watch::channel(VisibilityState::default());
        Self {
            sender: Arc::new(sender),
        }
    }

    /// The process-wide flag used by [`open`] and [`close`]
    pub fn global() -> &'static DialogVisibility {
        &GLOBAL
    }

    /// Show the dialog; no effect when already open
    pub fn open(&self) {
        let changed = self.sender.send_if_modified(|state| {
            if state.open {
                return false;
            }
            state.open = true;
            true
        });
        if changed {
            debug!("Add repository dialog opened");
        }
    }

    /// Hide the dialog and start a new session.
    /// Work started before the call is treated as stale even if the dialog was never shown.
    pub fn close(&self) {
        let mut was_open = false;
        self.sender.send_modify(|state| {
            was_open = state.open;
            state.open = false;
            state.session += 1;
        });
        if was_open {
            debug!("Add repository dialog closed");
        }
    }

    pub fn is_open(&self) -> bool {
        self.sender.borrow().open
    }

    pub fn session(&self) -> u64 {
        self.sender.borrow().session
    }

    /// Watch for visibility changes
    pub fn subscribe(&self) -> watch::Receiver<VisibilityState> {
        self.sender.subscribe()
    }
}

/// Open the dialog from anywhere in the application
pub fn open() {
    DialogVisibility::global().open();
}

/// Close the dialog from anywhere in the application; its draft is discarded
pub fn close() {
    DialogVisibility::global().close();
}
