use crate::config::types::{Config, ProbeSettings};
use anyhow::{Context, Result};
use log::warn;
use std::fs;
use std::path::Path;

const SETTINGS_FILE: &str = "settings.json";

impl Config {
    /// 從工作目錄的 `settings.json` 載入；檔案不存在或無法解析時使用預設值
    #[must_use]
    pub fn new() -> Self {
        let settings = match Self::load_settings(Path::new(SETTINGS_FILE)) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("設定檔無法使用，改用預設值: {e:#}");
                ProbeSettings::default()
            }
        };

        Self { settings }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        Ok(Self {
            settings: Self::load_settings(path)?,
        })
    }

    fn load_settings(path: &Path) -> Result<ProbeSettings> {
        if !path.exists() {
            return Ok(ProbeSettings::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))
    }
}
