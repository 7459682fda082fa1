//! Upload token cache
//!
//! Upload tokens are valid for a backend-configured window. Regular uploads
//! reuse one token until it is within two minutes of that window; avatar
//! uploads always ask for a fresh one.

use crate::core::api::{ApiResult, UploadApi};
use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::Mutex;

/// Token kind requested for user uploads
pub const USER_UPLOAD_KIND: &str = "user";

/// Refresh this long before the backend deadline
pub const TOKEN_SAFETY_MARGIN_SECS: i64 = 2 * 60;

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    fetched_at: DateTime<Utc>,
}

/// Caches the regular upload token
#[derive(Debug)]
pub struct UploadTokenCache {
    max_age: TimeDelta,
    cached: Mutex<Option<CachedToken>>,
}

impl UploadTokenCache {
    /// `deadline_offset_secs` is the validity window the backend grants a token.
    /// Windows beyond what a `TimeDelta` can hold are clamped to its range.
    pub fn new(deadline_offset_secs: i64) -> Self {
        Self {
            max_age: TimeDelta::try_seconds(
                deadline_offset_secs.saturating_sub(TOKEN_SAFETY_MARGIN_SECS),
            )
            .unwrap_or(if deadline_offset_secs < 0 {
                TimeDelta::MIN
            } else {
                TimeDelta::MAX
            }),
            cached: Mutex::new(None),
        }
    }

    /// Returns an upload token, fetching one when needed.
    ///
    /// # Errors
    ///
    /// Returns the API error when a needed fetch fails. A cached token is kept
    /// on failure but not returned once it has aged out.
    pub async fn token<A: UploadApi>(&self, api: &A, is_avatar: bool) -> ApiResult<String> {
        self.token_at(api, is_avatar, Utc::now()).await
    }

    /// [`token`](Self::token) with an explicit clock reading
    pub async fn token_at<A: UploadApi>(
        &self,
        api: &A,
        is_avatar: bool,
        now: DateTime<Utc>,
    ) -> ApiResult<String> {
        if is_avatar {
            return api.upload_token(USER_UPLOAD_KIND, true).await;
        }

        // Held across the fetch so concurrent callers share one refresh
        let mut cached = self.cached.lock().await;
        if let Some(entry) = cached.as_ref()
            && now - entry.fetched_at <= self.max_age
        {
            return Ok(entry.token.clone());
        }

        tracing::debug!("Upload token missing or near expiry, requesting a new one");
        let token = api.upload_token(USER_UPLOAD_KIND, false).await.inspect_err(|e| {
            tracing::warn!("Upload token request failed: {e}");
        })?;
        *cached = Some(CachedToken {
            token: token.clone(),
            fetched_at: now,
        });
        Ok(token)
    }

    /// Drops the cached token so the next call fetches
    pub async fn invalidate(&self) {
        *self.cached.lock().await = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ApiError;
    use crate::core::test_helpers::MockUploadApi;

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[tokio::test]
    async fn test_token_reused_within_window() {
        let api = MockUploadApi::default();
        let cache = UploadTokenCache::new(3600);

        let first = cache.token_at(&api, false, t0()).await.unwrap();
        let again = cache
            .token_at(&api, false, t0() + TimeDelta::seconds(3000))
            .await
            .unwrap();
        assert_eq!(first, again);
        assert_eq!(api.calls(), 1);
    }

    #[tokio::test]
    async fn test_token_refreshed_near_deadline() {
        let api = MockUploadApi::default();
        let cache = UploadTokenCache::new(3600);

        let first = cache.token_at(&api, false, t0()).await.unwrap();
        // 3600 - 120 = 3480 seconds of reuse
        let later = cache
            .token_at(&api, false, t0() + TimeDelta::seconds(3481))
            .await
            .unwrap();
        assert_ne!(first, later);
        assert_eq!(api.calls(), 2);
    }

    #[tokio::test]
    async fn test_avatar_tokens_never_cached() {
        let api = MockUploadApi::default();
        let cache = UploadTokenCache::new(3600);

        let a = cache.token_at(&api, true, t0()).await.unwrap();
        let b = cache.token_at(&api, true, t0()).await.unwrap();
        assert_ne!(a, b);
        assert_eq!(
            api.requests(),
            vec![("user".to_string(), true), ("user".to_string(), true)]
        );

        // Avatar fetches leave the regular slot empty
        cache.token_at(&api, false, t0()).await.unwrap();
        assert_eq!(api.calls(), 3);
    }

    #[tokio::test]
    async fn test_failed_refresh_returns_error() {
        let api = MockUploadApi::default();
        let cache = UploadTokenCache::new(3600);
        cache.token_at(&api, false, t0()).await.unwrap();

        api.fail_with(Some(ApiError::new(9)));
        let err = cache
            .token_at(&api, false, t0() + TimeDelta::hours(2))
            .await
            .unwrap_err();
        assert_eq!(err.code, 9);

        // Still fresh relative to the original fetch time
        assert_eq!(
            cache.token_at(&api, false, t0()).await.unwrap(),
            "token-1"
        );
    }

    #[tokio::test]
    async fn test_out_of_range_deadline_clamped() {
        let api = MockUploadApi::default();

        let forever = UploadTokenCache::new(i64::MAX / 100);
        forever.token_at(&api, false, t0()).await.unwrap();
        forever
            .token_at(&api, false, t0() + TimeDelta::days(365 * 100))
            .await
            .unwrap();
        assert_eq!(api.calls(), 1);

        // Negative windows never reuse a token
        let never = UploadTokenCache::new(i64::MIN);
        never.token_at(&api, false, t0()).await.unwrap();
        never.token_at(&api, false, t0()).await.unwrap();
        assert_eq!(api.calls(), 3);
    }

    #[tokio::test]
    async fn test_invalidate_forces_fetch() {
        let api = MockUploadApi::default();
        let cache = UploadTokenCache::new(3600);
        cache.token_at(&api, false, t0()).await.unwrap();
        cache.invalidate().await;
        cache.token_at(&api, false, t0()).await.unwrap();
        assert_eq!(api.calls(), 2);
    }
}
