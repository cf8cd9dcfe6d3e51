use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// 目錄服務的固定識別（不可由設定變更）
pub const DIRECTORY_AUTHORITY: &str = "com.neilturner.aerialviews.media";

/// 要列舉的目錄路徑
pub const CATALOG_PATH: &str = "/local";

/// 間接定位字串的 scheme 前綴，需要透過目錄服務解析
pub const CONTENT_SCHEME_PREFIX: &str = "content://";

/// 次級查詢結果中的顯示名稱欄位
pub const DISPLAY_NAME_COLUMN: &str = "_display_name";

#[must_use]
pub fn catalog_uri() -> String {
    format!("{CONTENT_SCHEME_PREFIX}{DIRECTORY_AUTHORITY}{CATALOG_PATH}")
}

/// 使用者設定（`settings.json`）
///
/// 只決定如何連到目錄服務，不改變要查詢的服務本身。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeSettings {
    /// HTTP 傳輸端點，例如 `http://192.168.1.20:8080`
    pub http_base_url: Option<String>,
    /// 改用靜態 JSON 資料當作目錄服務
    pub fixture_path: Option<PathBuf>,
    pub request_timeout_secs: u64,
    pub image_decode_timeout_secs: u64,
    pub video_ready_timeout_secs: u64,
    pub ffprobe_path: String,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            http_base_url: None,
            fixture_path: None,
            request_timeout_secs: 30,
            image_decode_timeout_secs: 30,
            video_ready_timeout_secs: 20,
            ffprobe_path: "ffprobe".to_string(),
        }
    }
}

impl ProbeSettings {
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    #[must_use]
    pub const fn image_decode_timeout(&self) -> Duration {
        Duration::from_secs(self.image_decode_timeout_secs)
    }

    #[must_use]
    pub const fn video_ready_timeout(&self) -> Duration {
        Duration::from_secs(self.video_ready_timeout_secs)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub settings: ProbeSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_uri_is_fixed() {
        assert_eq!(catalog_uri(), "content://com.neilturner.aerialviews.media/local");
    }

    #[test]
    fn test_partial_settings_use_defaults() {
        let settings: ProbeSettings =
            serde_json::from_str(r#"{"http_base_url": "http://localhost:8080"}"#).unwrap();
        assert_eq!(settings.http_base_url.as_deref(), Some("http://localhost:8080"));
        assert_eq!(settings.video_ready_timeout(), Duration::from_secs(20));
        assert_eq!(settings.ffprobe_path, "ffprobe");
    }
}
