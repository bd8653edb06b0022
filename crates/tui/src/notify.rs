//! Toast notifications.
//!
//! Pages report outcomes through [`Notifier`] so they never depend on how the
//! message ends up on screen.

use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

const TOAST_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

pub trait Notifier {
    fn notify(&mut self, level: ToastLevel, message: String);

    fn info(&mut self, message: &str) {
        self.notify(ToastLevel::Info, message.to_string());
    }

    fn success(&mut self, message: &str) {
        self.notify(ToastLevel::Success, message.to_string());
    }

    fn error(&mut self, message: &str) {
        self.notify(ToastLevel::Error, message.to_string());
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
    shown_since: Option<Instant>,
}

/// Toasts shown one at a time, each for a few seconds.
#[derive(Debug, Default)]
pub struct ToastQueue {
    pending: VecDeque<Toast>,
}

impl ToastQueue {
    pub fn current(&self) -> Option<&Toast> {
        self.pending.front()
    }

    /// Starts the clock of the front toast and drops it once expired.
    pub fn tick(&mut self, now: Instant) {
        let Some(front) = self.pending.front_mut() else {
            return;
        };
        match front.shown_since {
            None => front.shown_since = Some(now),
            Some(since) if now.duration_since(since) >= TOAST_TTL => {
                self.pending.pop_front();
                if let Some(next) = self.pending.front_mut() {
                    next.shown_since = Some(now);
                }
            }
            Some(_) => {}
        }
    }

    pub fn dismiss(&mut self) {
        self.pending.pop_front();
    }
}

impl Notifier for ToastQueue {
    fn notify(&mut self, level: ToastLevel, message: String) {
        match level {
            ToastLevel::Error => tracing::warn!("{message}"),
            _ => tracing::debug!("{message}"),
        }
        self.pending.push_back(Toast {
            level,
            message,
            shown_since: None,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toasts_expire_in_order() {
        let mut queue = ToastQueue::default();
        queue.success("Patient saved");
        queue.error("Server unreachable");
        assert_eq!(queue.pending.len(), 2);

        let start = Instant::now();
        queue.tick(start);
        assert_eq!(queue.current().unwrap().message, "Patient saved");

        queue.tick(start + Duration::from_secs(1));
        assert_eq!(queue.pending.len(), 2);

        queue.tick(start + TOAST_TTL);
        let current = queue.current().unwrap();
        assert_eq!(current.level, ToastLevel::Error);
        assert_eq!(current.message, "Server unreachable");

        queue.tick(start + TOAST_TTL * 2);
        assert!(queue.current().is_none());
    }

    #[test]
    fn dismiss_drops_front() {
        let mut queue = ToastQueue::default();
        queue.info("Loading");
        queue.dismiss();
        assert_eq!(queue.pending.len(), 0);
        queue.dismiss();
    }
}
