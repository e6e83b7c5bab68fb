//! Notification sinks.
//!
//! Emitting is fire-and-forget: a notifier never reports failure back to the
//! tracker and never blocks it.

use super::events::TrackerEvent;
use crate::ui::messages;

pub trait Notifier {
    fn emit(&self, title: &str, body: &str);
}

/// Prints notifications to the terminal, ringing the bell.
pub struct TerminalNotifier {
    enabled: bool,
}

impl TerminalNotifier {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl Notifier for TerminalNotifier {
    fn emit(&self, title: &str, body: &str) {
        if self.enabled {
            messages::notice(title, body);
        }
    }
}

/// Drops every notification.
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn emit(&self, _title: &str, _body: &str) {}
}

/// Forward the event's notification, if it has one. Returns whether a
/// notification was emitted.
pub fn dispatch(notifier: &dyn Notifier, event: &TrackerEvent) -> bool {
    match event.notification() {
        Some((title, body)) => {
            tracing::debug!(title, body = %body, "emitting notification");
            notifier.emit(title, &body);
            true
        }
        None => false,
    }
}
