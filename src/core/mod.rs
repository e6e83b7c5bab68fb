pub mod clock;
pub mod distance;
pub mod events;
pub mod history;
pub mod log;
pub mod notifier;
pub mod tracker;
pub mod watch;
