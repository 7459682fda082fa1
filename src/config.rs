use crate::core::error::{Error, Result};
use crate::utils::get_data_dir;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Site constants normally delivered by the backend alongside the first page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default, alias = "BACKEND_CONFIG")]
    pub backend: BackendConfig,
    #[serde(default, alias = "USER_GROUP")]
    pub user_group: UserGroups,
    #[serde(default)]
    pub retcode: RetCodes,
    /// Human readable text per return code
    #[serde(default, alias = "retinfo_cn")]
    pub retinfo: HashMap<i32, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL uploaded files are served from
    #[serde(default, alias = "UPLOAD_STATIC_HOST")]
    pub upload_static_host: String,
    /// Validity window of an upload token, in seconds
    #[serde(
        default = "default_upload_deadline",
        alias = "UPLOAD_QINIU_DEADLINE_OFFSET"
    )]
    pub upload_deadline_offset_secs: i64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            upload_static_host: String::new(),
            upload_deadline_offset_secs: default_upload_deadline(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserGroups {
    /// Lowest group value with admin rights
    #[serde(default = "default_admin_group", alias = "ADMIN")]
    pub admin: i32,
}

impl Default for UserGroups {
    fn default() -> Self {
        Self {
            admin: default_admin_group(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetCodes {
    #[serde(default, alias = "SUCCESS")]
    pub success: i32,
}

impl Default for RetCodes {
    fn default() -> Self {
        Self {
            success: crate::core::api::DEFAULT_SUCCESS_CODE,
        }
    }
}

fn default_upload_deadline() -> i64 {
    3600
}

fn default_admin_group() -> i32 {
    50
}

impl SiteConfig {
    /// Public URL of an uploaded object
    pub fn static_url(&self, key: &str) -> String {
        format!("{}/{key}", self.backend.upload_static_host)
    }

    pub fn retinfo(&self, code: i32) -> Option<&str> {
        self.retinfo.get(&code).map(String::as_str)
    }

    pub fn is_success(&self, code: i32) -> bool {
        code == self.retcode.success
    }
}

/// Saves the site config to disk using an atomic write pattern.
/// 1. Writes to a temporary file.
/// 2. Sets restrictive permissions (0o600).
/// 3. Atomically renames to the target path.
///
/// # Async
/// Uses `tokio::fs` for non-blocking I/O.
pub async fn save_config_to(config: &SiteConfig, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    let temp_path = path.with_extension("json.tmp");

    #[cfg(unix)]
    {
        use tokio::fs::OpenOptions;
        use tokio::io::AsyncWriteExt;

        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .mode(0o600) // Set permissions BEFORE any data is written
            .open(&temp_path)
            .await?;

        file.write_all(json.as_bytes()).await?;
        file.sync_all().await?;
    }

    #[cfg(not(unix))]
    {
        use tokio::io::AsyncWriteExt;

        let mut file = tokio::fs::File::create(&temp_path).await?;
        file.write_all(json.as_bytes()).await?;
        file.sync_all().await?;
    }

    tokio::fs::rename(&temp_path, path).await?;
    Ok(())
}

/// Saves to `config.json` in the data directory
pub async fn save_config(config: &SiteConfig) -> Result<()> {
    let dir = get_data_dir().ok_or_else(|| Error::Config("no data directory".to_string()))?;
    tokio::fs::create_dir_all(&dir).await?;
    save_config_to(config, &dir.join("config.json")).await
}

/// Loads a config file, reporting what went wrong.
///
/// # Errors
///
/// Returns `Err` if the file cannot be read or is not valid config JSON.
pub async fn load_config_from(path: &Path) -> Result<SiteConfig> {
    let json = tokio::fs::read_to_string(path).await?;
    let config = serde_json::from_str(&json)?;
    Ok(config)
}

/// Loads `config.json` from the data directory, or returns defaults if it is
/// missing or unreadable.
pub async fn load_config() -> SiteConfig {
    if let Some(mut path) = get_data_dir() {
        path.push("config.json");
        match load_config_from(&path).await {
            Ok(config) => return config,
            Err(Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Ignoring config at {}: {e}", path.display()),
        }
    }
    SiteConfig::default()
}
