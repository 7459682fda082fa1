//! Shared test utilities for core module tests
//!
//! Provides mock API clients and board builders to avoid duplication across
//! test suites. This module is only compiled in test mode.

use crate::core::api::{ApiResult, BoardApi, NotifApi, UploadApi};
use crate::core::board::{Board, BoardId, OrderSpec};
use crate::core::error::ApiError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Root board with an integer id
pub fn board(id: i64, name: &str) -> Board {
    Board::new(id, None, name)
}

/// Board whose parent is `parent`
pub fn child(id: i64, parent: i64, name: &str) -> Board {
    Board::new(id, Some(BoardId::from(parent)), name)
}

pub fn ids(values: &[i64]) -> Vec<BoardId> {
    values.iter().copied().map(BoardId::from).collect()
}

/// Scripted board listing endpoint.
///
/// Clones share state, so a test can keep one handle while the cache owns
/// another.
#[derive(Debug, Clone)]
pub struct MockBoardApi {
    response: Arc<Mutex<ApiResult<Vec<Board>>>>,
    calls: Arc<AtomicUsize>,
    last_order: Arc<Mutex<Option<String>>>,
}

impl MockBoardApi {
    pub fn new(boards: Vec<Board>) -> Self {
        Self::with_response(Ok(boards))
    }

    pub fn failing(err: ApiError) -> Self {
        Self::with_response(Err(err))
    }

    fn with_response(response: ApiResult<Vec<Board>>) -> Self {
        Self {
            response: Arc::new(Mutex::new(response)),
            calls: Arc::new(AtomicUsize::new(0)),
            last_order: Arc::new(Mutex::new(None)),
        }
    }

    pub fn set_response(&self, response: ApiResult<Vec<Board>>) {
        *self.response.lock().unwrap() = response;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_order(&self) -> Option<String> {
        self.last_order.lock().unwrap().clone()
    }
}

impl BoardApi for MockBoardApi {
    async fn list_boards(&self, order: &OrderSpec) -> ApiResult<Vec<Board>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_order.lock().unwrap() = Some(order.to_string());
        self.response.lock().unwrap().clone()
    }
}

/// Upload token endpoint handing out `token-1`, `token-2`, ...
#[derive(Debug, Clone, Default)]
pub struct MockUploadApi {
    calls: Arc<AtomicUsize>,
    fail: Arc<Mutex<Option<ApiError>>>,
    requests: Arc<Mutex<Vec<(String, bool)>>>,
}

impl MockUploadApi {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn fail_with(&self, err: Option<ApiError>) {
        *self.fail.lock().unwrap() = err;
    }

    pub fn requests(&self) -> Vec<(String, bool)> {
        self.requests.lock().unwrap().clone()
    }
}

impl UploadApi for MockUploadApi {
    async fn upload_token(&self, kind: &str, is_avatar: bool) -> ApiResult<String> {
        self.requests
            .lock()
            .unwrap()
            .push((kind.to_string(), is_avatar));
        if let Some(err) = self.fail.lock().unwrap().clone() {
            return Err(err);
        }
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("token-{n}"))
    }
}

/// Unread refresh endpoint returning a fixed payload
#[derive(Debug, Clone)]
pub struct MockNotifApi {
    response: Arc<Mutex<ApiResult<Option<serde_json::Value>>>>,
    calls: Arc<AtomicUsize>,
}

impl MockNotifApi {
    pub fn new(response: ApiResult<Option<serde_json::Value>>) -> Self {
        Self {
            response: Arc::new(Mutex::new(response)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl NotifApi for MockNotifApi {
    async fn refresh_unread(&self) -> ApiResult<Option<serde_json::Value>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.lock().unwrap().clone()
    }
}
