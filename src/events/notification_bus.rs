//! User-facing notifications for the add-repository workflow

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::broadcast;
use tracing::{debug, error, info};

/// Sink for fire-and-forget user notifications
pub trait Notifier: Send + Sync {
    /// Report a completed action
    fn notify_success(&self, content: &str);

    /// Report a failed action
    fn notify_error(&self, content: &str);
}

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Ok,
    Error,
}

/// A notification as delivered to subscribers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

/// Broadcasts notifications to any number of subscribers and keeps a short history
pub struct NotificationBus {
    /// Broadcast sender for notifications
    sender: broadcast::Sender<Notification>,

    /// Recent notifications, oldest first
    history: Mutex<VecDeque<Notification>>,

    /// Maximum history size
    max_history_size: usize,
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationBus {
    /// Create a new notification bus
    pub fn new() -> Self {
        Self::with_history_size(100)
    }

    /// Create a bus that retains at most `max_history_size` notifications
    pub fn with_history_size(max_history_size: usize) -> Self {
        let (sender, _) = broadcast::channel(64);

        Self {
            sender,
            history: Mutex::new(VecDeque::new()),
            max_history_size,
        }
    }

    /// Subscribe to notifications published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    /// Snapshot of the retained notifications
    pub fn history(&self) -> Vec<Notification> {
        match self.history.lock() {
            Ok(history) => history.iter().cloned().collect(),
            Err(poisoned) => poisoned.into_inner().iter().cloned().collect(),
        }
    }

    /// Publish a notification
    pub fn publish(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Ok => info!("{}", notification.message),
            NotificationLevel::Error => error!("{}", notification.message),
        }

        {
            let mut history = match self.history.lock() {
                Ok(history) => history,
                Err(poisoned) => poisoned.into_inner(),
            };
            history.push_back(notification.clone());
            while history.len() > self.max_history_size {
                history.pop_front();
            }
        }

        // Having no subscribers is fine
        if self.sender.send(notification).is_err() {
            debug!("Notification published with no active subscribers");
        }
    }
}

impl Notifier for NotificationBus {
    fn notify_success(&self, content: &str) {
        self.publish(Notification {
            level: NotificationLevel::Ok,
            message: content.to_string(),
        });
    }

    fn notify_error(&self, content: &str) {
        self.publish(Notification {
            level: NotificationLevel::Error,
            message: content.to_string(),
        });
    }
}
