//! Per-client session state
//!
//! Holds what the rest of the client reads about "who is logged in": the
//! current user, whether the websocket push channel is up, and the last
//! unread-notification payload.

use crate::config::SiteConfig;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};

/// Logged-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub nickname: String,
    /// Permission group; higher is more privileged
    #[serde(default)]
    pub group: i32,
}

#[derive(Debug, Default)]
pub struct Session {
    user: RwLock<Option<User>>,
    ws_connected: AtomicBool,
    unread: RwLock<Option<serde_json::Value>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(&self) -> Option<User> {
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_user(&self, user: Option<User>) {
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = user;
    }

    pub fn is_logged_in(&self) -> bool {
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Whether the current user's group reaches the configured admin group
    pub fn is_admin(&self, config: &SiteConfig) -> bool {
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|u| u.group >= config.user_group.admin)
    }

    pub fn ws_connected(&self) -> bool {
        self.ws_connected.load(Ordering::Acquire)
    }

    pub fn set_ws_connected(&self, connected: bool) {
        self.ws_connected.store(connected, Ordering::Release);
    }

    pub fn unread(&self) -> Option<serde_json::Value> {
        self.unread
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_unread(&self, unread: serde_json::Value) {
        *self.unread.write().unwrap_or_else(PoisonError::into_inner) = Some(unread);
    }
}
