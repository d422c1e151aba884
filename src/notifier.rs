//! Toast notifications.
//!
//! One slot: showing a toast replaces whatever was shown before, and a toast
//! disappears on its own once [`TOAST_TIMEOUT_SECS`] have passed.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

pub const TOAST_TIMEOUT_SECS: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

impl ToastKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ToastKind::Success => "success",
            ToastKind::Error => "error",
            ToastKind::Info => "info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Toast {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.created_at >= Duration::seconds(TOAST_TIMEOUT_SECS)
    }
}

#[derive(Debug, Default)]
pub struct Notifier {
    current: Option<Toast>,
}

impl Notifier {
    pub fn show(&mut self, kind: ToastKind, message: impl Into<String>) {
        self.show_at(kind, message, Utc::now());
    }

    pub fn show_at(&mut self, kind: ToastKind, message: impl Into<String>, now: DateTime<Utc>) {
        self.current = Some(Toast {
            kind,
            message: message.into(),
            created_at: now,
        });
    }

    /// The visible toast, if any. Expired toasts are dropped.
    pub fn current(&mut self, now: DateTime<Utc>) -> Option<Toast> {
        if self.current.as_ref().is_some_and(|toast| toast.is_expired(now)) {
            self.current = None;
        }
        self.current.clone()
    }
}
