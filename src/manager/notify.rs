//! Progress reporting
//!
//! Long operations (waiting for a stop) tell the caller what they are doing
//! through a [`Notifier`]. Notifications are fire-and-forget.

use std::sync::Arc;

pub trait Notifier {
    fn notify(&self, msg: &str);
}

impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    fn notify(&self, msg: &str) {
        (**self).notify(msg)
    }
}

/// Sends notifications to the `log` facade at info level
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, msg: &str) {
        log::info!("{}", msg);
    }
}

/// Drops every notification
#[derive(Debug, Clone, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _msg: &str) {}
}
