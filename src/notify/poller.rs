//! Unread notification polling
//!
//! Fallback for when the websocket push channel is down: every
//! [`POLL_INTERVAL`] the unread counters are fetched and stored in the
//! [`Session`].

use crate::core::api::{ApiResult, NotifApi};
use crate::session::Session;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

pub const POLL_INTERVAL: Duration = Duration::from_secs(15);

#[derive(Debug, Default)]
pub struct UnreadPoller {
    started: AtomicBool,
}

impl UnreadPoller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetches unread counters once.
    ///
    /// Does nothing and returns `Ok(false)` while the websocket is connected
    /// or nobody is logged in.
    pub async fn poll_once<A: NotifApi>(api: &A, session: &Session) -> ApiResult<bool> {
        if session.ws_connected() || !session.is_logged_in() {
            return Ok(false);
        }
        if let Some(unread) = api.refresh_unread().await? {
            session.set_unread(unread);
        }
        Ok(true)
    }

    /// Polls once right away and starts the polling task.
    ///
    /// Only the first call on a poller spawns the interval task, whose handle
    /// is returned. Later calls still poll once; the handle of that single
    /// poll is returned instead.
    pub fn start<A>(&self, api: Arc<A>, session: Arc<Session>) -> JoinHandle<()>
    where
        A: NotifApi + Send + Sync + 'static,
    {
        if self.started.swap(true, Ordering::AcqRel) {
            tracing::debug!("Unread poller already running, polling once");
            return tokio::spawn(async move {
                poll_logged(&*api, &session).await;
            });
        }

        tokio::spawn(async move {
            poll_logged(&*api, &session).await;

            let mut ticker = tokio::time::interval_at(Instant::now() + POLL_INTERVAL, POLL_INTERVAL);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                poll_logged(&*api, &session).await;
            }
        })
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }
}

async fn poll_logged<A: NotifApi>(api: &A, session: &Session) {
    if let Err(e) = UnreadPoller::poll_once(api, session).await {
        tracing::warn!("Unread poll failed: {e}");
    }
}
