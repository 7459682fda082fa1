//! Toast notifications
//!
//! The crate decides *what* to show and with which severity; displaying and
//! expiring messages is the job of a [`NotificationSink`]. [`MessageQueue`] is
//! an in-memory sink for clients that render from a list.

pub mod poller;

use crate::config::SiteConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use uuid::Uuid;

/// Display time of ordinary messages
pub const DEFAULT_DURATION: Duration = Duration::from_millis(3000);

/// Display time of form validation messages
pub const FORM_DURATION: Duration = Duration::from_millis(6000);

/// Message severity
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    /// Blue
    Default,
    /// Gray, low emphasis
    Secondary,
    /// Green
    Success,
    /// Yellow
    Warning,
    /// Red
    Error,
}

impl Severity {
    /// CSS class of the alert box
    pub const fn css_class(self) -> &'static str {
        match self {
            Severity::Default => "",
            Severity::Secondary => "am-alert-secondary",
            Severity::Success => "am-alert-success",
            Severity::Warning => "am-alert-warning",
            Severity::Error => "am-alert-danger",
        }
    }
}

/// Receives messages to display
pub trait NotificationSink {
    fn notify(&self, severity: Severity, text: &str, duration: Duration);

    fn text(&self, text: &str) {
        self.notify(Severity::Default, text, DEFAULT_DURATION);
    }

    fn secondary(&self, text: &str) {
        self.notify(Severity::Secondary, text, DEFAULT_DURATION);
    }

    fn success(&self, text: &str) {
        self.notify(Severity::Success, text, DEFAULT_DURATION);
    }

    fn warning(&self, text: &str) {
        self.notify(Severity::Warning, text, DEFAULT_DURATION);
    }

    fn error(&self, text: &str) {
        self.notify(Severity::Error, text, DEFAULT_DURATION);
    }
}

/// A message currently on screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: Uuid,
    pub severity: Severity,
    pub text: String,
    pub class: &'static str,
    pub created_at: DateTime<Utc>,
}

/// In-memory message list with timed expiry.
///
/// Cloning shares the list. Expiry runs on the ambient tokio runtime; without
/// one, messages stay until [`dismiss`](Self::dismiss)ed.
#[derive(Debug, Clone, Default)]
pub struct MessageQueue {
    messages: Arc<Mutex<Vec<Notification>>>,
}

impl MessageQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a message and schedules its removal
    pub fn push(&self, severity: Severity, text: impl Into<String>, duration: Duration) -> Uuid {
        let notification = Notification {
            id: Uuid::new_v4(),
            severity,
            text: text.into(),
            class: severity.css_class(),
            created_at: Utc::now(),
        };
        let id = notification.id;
        self.lock().push(notification);

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let queue = self.clone();
                handle.spawn(async move {
                    tokio::time::sleep(duration).await;
                    queue.dismiss(id);
                });
            }
            Err(_) => tracing::debug!("No runtime, message {id} will not expire on its own"),
        }
        id
    }

    /// Removes a message early. Returns whether it was still shown.
    pub fn dismiss(&self, id: Uuid) -> bool {
        let mut messages = self.lock();
        let before = messages.len();
        messages.retain(|m| m.id != id);
        messages.len() != before
    }

    /// Messages in display order
    pub fn snapshot(&self) -> Vec<Notification> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Notification>> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl NotificationSink for MessageQueue {
    fn notify(&self, severity: Severity, text: &str, duration: Duration) {
        self.push(severity, text, duration);
    }
}

/// Reports an API return code: success in green, anything else in red.
///
/// Without explicit `text`, the configured text for the code is used, then
/// the bare code.
pub fn message_by_code<S: NotificationSink + ?Sized>(
    sink: &S,
    config: &SiteConfig,
    code: i32,
    text: Option<&str>,
    duration: Duration,
) {
    let text = match text {
        Some(t) => t.to_string(),
        None => config
            .retinfo(code)
            .map_or_else(|| format!("code {code}"), str::to_string),
    };
    let severity = if config.is_success(code) {
        Severity::Success
    } else {
        Severity::Error
    };
    sink.notify(severity, &text, duration);
}

/// Reports form submission results.
///
/// On failure, each `(field, error)` pair becomes its own message, labelled
/// with the field's alias when one is given. On success a single message is
/// shown.
pub fn message_by_form<S: NotificationSink + ?Sized>(
    sink: &S,
    config: &SiteConfig,
    code: i32,
    errors: &BTreeMap<String, Vec<String>>,
    alias: &HashMap<String, String>,
    duration: Duration,
) {
    if config.is_success(code) {
        message_by_code(sink, config, code, None, duration);
        return;
    }
    for (field, field_errors) in errors {
        let name = alias.get(field).unwrap_or(field);
        for err in field_errors {
            message_by_code(sink, config, code, Some(&format!("{name}：{err}")), duration);
        }
    }
}
