use super::status::ValidationStatus;
use crate::tools::{MediaLocation, StreamInfo, Transport, probe_stream};
use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, timeout_at};

/// 播放工作階段回報的狀態
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    Buffering,
    Ready(StreamInfo),
    Error(String),
    Ended,
}

/// 一個已開啟的串流工作階段
///
/// 驗證器在任何結果下都會呼叫 `release`，包含 `next_event` panic 的情況。
#[async_trait]
pub trait StreamSession: Send {
    /// 工作階段已關閉且沒有更多事件時回傳 `None`
    async fn next_event(&mut self) -> Option<PlayerEvent>;

    /// 釋放解碼與播放資源
    async fn release(&mut self);
}

/// 外部的串流開啟能力
#[async_trait]
pub trait StreamOpener: Send + Sync {
    async fn open(&self, locator: &str) -> Result<Box<dyn StreamSession>>;
}

/// 以 ffprobe 開啟串流，讀到視訊串流資訊即視為 ready
#[derive(Debug, Clone)]
pub struct FfprobeStreamOpener {
    transport: Transport,
    ffprobe_path: String,
}

impl FfprobeStreamOpener {
    #[must_use]
    pub fn new(transport: Transport, ffprobe_path: impl Into<String>) -> Self {
        Self {
            transport,
            ffprobe_path: ffprobe_path.into(),
        }
    }
}

#[async_trait]
impl StreamOpener for FfprobeStreamOpener {
    async fn open(&self, locator: &str) -> Result<Box<dyn StreamSession>> {
        let input = match self.transport.locate(locator)? {
            MediaLocation::Remote(url) => url.to_string(),
            MediaLocation::Local(path) => path.to_string_lossy().into_owned(),
        };
        debug!("開啟串流: {input}");

        let (events, receiver) = mpsc::channel(4);
        let ffprobe_path = self.ffprobe_path.clone();
        let task = tokio::spawn(async move {
            let _ = events.send(PlayerEvent::Buffering).await;
            let event = match probe_stream(&ffprobe_path, &input).await {
                Ok(info) => PlayerEvent::Ready(info),
                Err(e) => PlayerEvent::Error(format!("{e:#}")),
            };
            let _ = events.send(event).await;
        });

        Ok(Box::new(FfprobeSession {
            events: receiver,
            task: Some(task),
        }))
    }
}

struct FfprobeSession {
    events: mpsc::Receiver<PlayerEvent>,
    task: Option<JoinHandle<()>>,
}

#[async_trait]
impl StreamSession for FfprobeSession {
    async fn next_event(&mut self) -> Option<PlayerEvent> {
        self.events.recv().await
    }

    async fn release(&mut self) {
        // 中止任務會丟棄 ffprobe 子行程（kill_on_drop）
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
        }
        self.events.close();
    }
}

impl Drop for FfprobeSession {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// 開啟串流並等待 ready 或錯誤，兩者先到者為準
#[derive(Clone)]
pub struct VideoValidator {
    opener: Arc<dyn StreamOpener>,
    ready_timeout: Duration,
}

impl VideoValidator {
    #[must_use]
    pub fn new(opener: Arc<dyn StreamOpener>, ready_timeout: Duration) -> Self {
        Self {
            opener,
            ready_timeout,
        }
    }

    /// 回傳 `Success` 或 `Error`；工作階段在任何結果下都會被釋放
    pub async fn validate(&self, locator: &str) -> ValidationStatus {
        info!("驗證影片: {locator}");

        let opener = Arc::clone(&self.opener);
        let target = locator.to_string();
        let deadline = Instant::now() + self.ready_timeout;
        let task =
            tokio::spawn(async move { await_ready(opener.as_ref(), &target, deadline).await });

        let status = match task.await {
            Ok(Ok(info)) => {
                info!(
                    "影片可播放 {}x{} ({}): {locator}",
                    info.width,
                    info.height,
                    info.codec.as_deref().unwrap_or("unknown codec")
                );
                ValidationStatus::Success(locator.to_string())
            }
            Ok(Err(e)) => ValidationStatus::failed(format!("{e:#}")),
            Err(e) => ValidationStatus::failed(format!("player task failed: {e}")),
        };

        if let ValidationStatus::Error(message) = &status {
            warn!("影片驗證失敗 {locator}: {message}");
        }
        status
    }
}

async fn await_ready(
    opener: &dyn StreamOpener,
    locator: &str,
    deadline: Instant,
) -> Result<StreamInfo> {
    let session = timeout_at(deadline, opener.open(locator))
        .await
        .map_err(|_| anyhow!("timed out opening stream"))?
        .context("無法開啟串流")?;

    let mut guard = SessionGuard::new(session);
    let outcome = guard.drive(deadline).await;
    guard.release().await;
    outcome
}

/// 持有已開啟的工作階段；未經 `release` 就被丟棄時（例如 panic 展開）改在背景釋放
struct SessionGuard {
    session: Option<Box<dyn StreamSession>>,
}

impl SessionGuard {
    const fn new(session: Box<dyn StreamSession>) -> Self {
        Self {
            session: Some(session),
        }
    }

    async fn drive(&mut self, deadline: Instant) -> Result<StreamInfo> {
        let Some(session) = self.session.as_deref_mut() else {
            bail!("session already released");
        };
        timeout_at(deadline, wait_for_ready(session))
            .await
            .unwrap_or_else(|_| Err(anyhow!("timed out waiting for player to become ready")))
    }

    async fn release(mut self) {
        if let Some(mut session) = self.session.take() {
            session.release().await;
        }
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        let Some(mut session) = self.session.take() else {
            return;
        };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                debug!("工作階段未正常結束，改在背景釋放");
                handle.spawn(async move { session.release().await });
            }
            Err(_) => warn!("沒有可用的 runtime，串流工作階段未釋放"),
        }
    }
}

async fn wait_for_ready(session: &mut dyn StreamSession) -> Result<StreamInfo> {
    loop {
        match session.next_event().await {
            Some(PlayerEvent::Buffering) => debug!("串流緩衝中..."),
            Some(PlayerEvent::Ready(info)) => return Ok(info),
            Some(PlayerEvent::Error(message)) => bail!("player error: {message}"),
            Some(PlayerEvent::Ended) => bail!("playback ended before the player became ready"),
            None => bail!("session closed before the player became ready"),
        }
    }
}
