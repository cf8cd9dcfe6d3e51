use super::status::ValidationStatus;
use crate::tools::Transport;
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
}

/// 外部的圖片解碼能力
#[async_trait]
pub trait ImageDecoder: Send + Sync {
    async fn decode(&self, locator: &str) -> Result<DecodedImage>;
}

/// 先讀取完整內容，再用 `image` 在 blocking 執行緒上解碼
#[derive(Debug, Clone)]
pub struct FetchingImageDecoder {
    transport: Transport,
}

impl FetchingImageDecoder {
    #[must_use]
    pub const fn new(transport: Transport) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl ImageDecoder for FetchingImageDecoder {
    async fn decode(&self, locator: &str) -> Result<DecodedImage> {
        let bytes = self.transport.fetch(locator).await?;
        let size = bytes.len();

        let image = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes))
            .await
            .context("圖片解碼任務失敗")?
            .with_context(|| format!("無法解碼圖片 ({size} bytes)"))?;

        let (width, height) = (image.width(), image.height());
        if width == 0 || height == 0 {
            bail!("解碼結果尺寸為 0");
        }

        Ok(DecodedImage { width, height })
    }
}

/// 完整解碼一張圖片以確認可以顯示
#[derive(Clone)]
pub struct ImageValidator {
    decoder: Arc<dyn ImageDecoder>,
    timeout: Duration,
}

impl ImageValidator {
    #[must_use]
    pub fn new(decoder: Arc<dyn ImageDecoder>, timeout: Duration) -> Self {
        Self { decoder, timeout }
    }

    /// 回傳 `Success` 或 `Error`，逾時與任務失敗都視為錯誤
    pub async fn validate(&self, locator: &str) -> ValidationStatus {
        info!("驗證圖片: {locator}");

        let decoder = Arc::clone(&self.decoder);
        let target = locator.to_string();
        let mut task = tokio::spawn(async move { decoder.decode(&target).await });

        let status = match tokio::time::timeout(self.timeout, &mut task).await {
            Ok(Ok(Ok(image))) => {
                info!("圖片解碼成功 {}x{}: {locator}", image.width, image.height);
                ValidationStatus::Success(locator.to_string())
            }
            Ok(Ok(Err(e))) => ValidationStatus::failed(format!("{e:#}")),
            Ok(Err(e)) => ValidationStatus::failed(format!("decoder task failed: {e}")),
            Err(_) => {
                task.abort();
                ValidationStatus::failed(format!(
                    "image decode timed out after {}s",
                    self.timeout.as_secs_f32()
                ))
            }
        };

        if let ValidationStatus::Error(message) = &status {
            warn!("圖片驗證失敗 {locator}: {message}");
        }
        status
    }
}
