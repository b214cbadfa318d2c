//! Notification system for dialog outcomes

pub mod notification_bus;

// Re-export main types
pub use notification_bus::{Notification, NotificationBus, NotificationLevel, Notifier};
