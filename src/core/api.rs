//! API client seams
//!
//! The network client lives outside this crate. These traits describe the
//! calls the caches make; every call resolves to either the payload or a typed
//! [`ApiError`].

use crate::core::board::{Board, OrderSpec};
use crate::core::error::ApiError;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::PathBuf;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Return code the backend uses for success unless configured otherwise
pub const DEFAULT_SUCCESS_CODE: i32 = 0;

/// Raw response envelope: `{"code": 0, "data": ...}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub msg: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Converts the envelope into a result.
    ///
    /// A success code with no `data` is still a failure: there is no payload
    /// to hand back.
    pub fn into_result(self, success_code: i32) -> ApiResult<T> {
        if self.code != success_code {
            let mut err = ApiError::new(self.code);
            err.message = self.msg;
            return Err(err);
        }
        self.data.ok_or_else(|| {
            ApiError::new(self.code).with_message("response carried no data")
        })
    }
}

/// Payload of the board listing endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardPage {
    #[serde(default)]
    pub items: Vec<Board>,
}

/// Board listing
pub trait BoardApi {
    fn list_boards(&self, order: &OrderSpec) -> impl Future<Output = ApiResult<Vec<Board>>> + Send;
}

/// Upload credential issuing
pub trait UploadApi {
    fn upload_token(
        &self,
        kind: &str,
        is_avatar: bool,
    ) -> impl Future<Output = ApiResult<String>> + Send;
}

/// Unread notification refresh.
///
/// `Ok(None)` means the call succeeded but the backend had nothing to report.
pub trait NotifApi {
    fn refresh_unread(&self) -> impl Future<Output = ApiResult<Option<serde_json::Value>>> + Send;
}

impl<T: BoardApi + Sync> BoardApi for std::sync::Arc<T> {
    fn list_boards(&self, order: &OrderSpec) -> impl Future<Output = ApiResult<Vec<Board>>> + Send {
        (**self).list_boards(order)
    }
}

impl<T: NotifApi + Sync> NotifApi for std::sync::Arc<T> {
    fn refresh_unread(&self) -> impl Future<Output = ApiResult<Option<serde_json::Value>>> + Send {
        (**self).refresh_unread()
    }
}

/// Board source backed by a JSON file holding a listing response envelope.
///
/// Used by the CLI and for offline fixtures. The file is re-read on every
/// call so a forced refresh picks up edits.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
    success_code: i32,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            success_code: DEFAULT_SUCCESS_CODE,
        }
    }

    pub fn with_success_code(mut self, code: i32) -> Self {
        self.success_code = code;
        self
    }
}

/// Local failures (unreadable file, bad JSON) are reported with this code
pub const LOCAL_SOURCE_ERROR: i32 = -1;

impl BoardApi for JsonFileSource {
    async fn list_boards(&self, order: &OrderSpec) -> ApiResult<Vec<Board>> {
        tracing::debug!("Reading boards from {} (order {order})", self.path.display());

        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            ApiError::new(LOCAL_SOURCE_ERROR)
                .with_message(format!("cannot read {}: {e}", self.path.display()))
        })?;

        let response: ApiResponse<BoardPage> = serde_json::from_str(&content).map_err(|e| {
            ApiError::new(LOCAL_SOURCE_ERROR)
                .with_message(format!("invalid board list {}: {e}", self.path.display()))
        })?;

        response.into_result(self.success_code).map(|page| page.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_success() {
        let resp: ApiResponse<BoardPage> = serde_json::from_value(json!({
            "code": 0,
            "data": {"items": [{"id": 1, "name": "a"}]}
        }))
        .unwrap();
        let page = resp.into_result(0).unwrap();
        assert_eq!(page.items.len(), 1);
    }

    #[test]
    fn test_envelope_failure_keeps_code_and_message() {
        let resp: ApiResponse<BoardPage> =
            serde_json::from_value(json!({"code": 5, "msg": "busy"})).unwrap();
        let err = resp.into_result(0).unwrap_err();
        assert_eq!(err.code, 5);
        assert_eq!(err.message.as_deref(), Some("busy"));
    }

    #[test]
    fn test_envelope_success_without_data_is_error() {
        let resp: ApiResponse<String> = serde_json::from_value(json!({"code": 0})).unwrap();
        assert!(resp.into_result(0).is_err());
    }

    #[tokio::test]
    async fn test_json_file_source_missing_file() {
        let source = JsonFileSource::new("/nonexistent/forumkit/boards.json");
        let err = source.list_boards(&OrderSpec::boards()).await.unwrap_err();
        assert_eq!(err.code, LOCAL_SOURCE_ERROR);
    }

    #[tokio::test]
    async fn test_json_file_source_reads_items() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("boards.json");
        std::fs::write(
            &path,
            r#"{"code": 0, "data": {"items": [{"id": 1, "name": "a"}, {"id": 2, "parent_id": 1, "name": "b"}]}}"#,
        )
        .unwrap();

        let boards = JsonFileSource::new(&path)
            .list_boards(&OrderSpec::boards())
            .await
            .unwrap();
        assert_eq!(boards.len(), 2);
        assert!(boards[0].is_root());
        assert!(!boards[1].is_root());
    }
}
