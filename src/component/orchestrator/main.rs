use super::state::{PipelineState, QueryOutcome, QuerySummary, SampleReport, Track};
use crate::component::directory::{DirectoryClient, DirectoryService};
use crate::component::metadata_resolver::MetadataResolver;
use crate::component::sampler::sample;
use crate::component::validator::{
    FetchingImageDecoder, FfprobeStreamOpener, ImageValidator, VideoValidator,
};
use crate::config::ProbeSettings;
use crate::tools::{MediaKind, Transport};
use log::{debug, info, warn};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// 串起整條驗證流程並對外公開目前狀態
///
/// 流程：查詢 → 抽樣 → 解析中繼資料 → 分類 → 單一軌道驗證。
/// 同一時間只處理一個查詢；關閉結果後才抵達的驗證結果會被丟棄。
pub struct Orchestrator {
    client: DirectoryClient,
    resolver: MetadataResolver,
    image_validator: ImageValidator,
    video_validator: VideoValidator,
    state: watch::Sender<PipelineState>,
}

impl Orchestrator {
    #[must_use]
    pub fn new(
        service: Arc<dyn DirectoryService>,
        image_validator: ImageValidator,
        video_validator: VideoValidator,
    ) -> Arc<Self> {
        let (state, _) = watch::channel(PipelineState::default());
        Arc::new(Self {
            client: DirectoryClient::new(Arc::clone(&service)),
            resolver: MetadataResolver::new(service),
            image_validator,
            video_validator,
            state,
        })
    }

    /// 使用預設的解碼（`image`）與串流（ffprobe）能力
    #[must_use]
    pub fn from_settings(
        settings: &ProbeSettings,
        service: Arc<dyn DirectoryService>,
        transport: &Transport,
    ) -> Arc<Self> {
        let image_validator = ImageValidator::new(
            Arc::new(FetchingImageDecoder::new(transport.clone())),
            settings.image_decode_timeout(),
        );
        let video_validator = VideoValidator::new(
            Arc::new(FfprobeStreamOpener::new(
                transport.clone(),
                settings.ffprobe_path.clone(),
            )),
            settings.video_ready_timeout(),
        );
        Self::new(service, image_validator, video_validator)
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PipelineState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn state(&self) -> PipelineState {
        self.state.borrow().clone()
    }

    /// 外部觸發：開始一次查詢
    ///
    /// 查詢階段仍在進行時回傳 `None`。回傳的任務在驗證結束後完成。
    pub fn start(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        let run_id = Uuid::new_v4();
        let started = self.state.send_if_modified(|state| {
            if state.is_loading {
                return false;
            }
            *state = PipelineState {
                run_id: Some(run_id),
                is_loading: true,
                ..PipelineState::default()
            };
            true
        });

        if !started {
            warn!("已有查詢進行中，忽略這次觸發");
            return None;
        }

        info!("開始執行 {run_id}");
        let this = Arc::clone(self);
        Some(tokio::spawn(async move { this.run(run_id).await }))
    }

    /// 外部觸發：關閉結果，回到 Idle
    ///
    /// 不會中止執行中的驗證，但其結果之後會被丟棄。
    pub fn dismiss(&self) {
        let previous = self.state.send_replace(PipelineState::default());
        if let Some(run_id) = previous.run_id {
            info!("關閉 {run_id} 的結果");
        }
    }

    async fn run(&self, run_id: Uuid) {
        let outcome = self.query_stage().await;

        let dispatch = match &outcome {
            QueryOutcome::Success {
                sample: Some(report),
                ..
            } => Track::for_kind(report.kind).map(|track| (track, report.entry.locator.clone())),
            _ => None,
        };

        let published = self.state.send_if_modified(|state| {
            if !state.is_current(run_id) {
                return false;
            }
            state.is_loading = false;
            state.outcome = Some(outcome);
            if let Some((track, _)) = &dispatch {
                state.track_mut(*track).begin();
            }
            true
        });

        if !published {
            debug!("{run_id} 已被關閉，捨棄查詢結果");
            return;
        }

        let Some((track, locator)) = dispatch else {
            return;
        };

        let status = match track {
            Track::Image => self.image_validator.validate(&locator).await,
            Track::Video => self.video_validator.validate(&locator).await,
        };
        debug!("{run_id} {track:?} 驗證結束: {status:?}");

        let applied = self
            .state
            .send_if_modified(|state| state.is_current(run_id) && state.track_mut(track).settle(status));
        if !applied {
            debug!("{run_id} 已被關閉，捨棄驗證結果");
        }
    }

    async fn query_stage(&self) -> QueryOutcome {
        let rows = match self.client.query().await {
            Ok(rows) => rows,
            Err(e) => {
                return QueryOutcome::Error {
                    message: e.to_string(),
                };
            }
        };

        let summary = QuerySummary {
            uri: self.client.catalog_uri().to_string(),
            count: rows.count(),
            columns: rows.columns().to_vec(),
        };

        let Some(entry) = sample(&rows) else {
            info!("目錄沒有任何資料，不進行驗證");
            return QueryOutcome::Success {
                summary,
                sample: None,
            };
        };

        let metadata = self
            .resolver
            .resolve(&entry.locator, entry.content_type_hint.as_deref())
            .await;
        let content_type = metadata.effective_content_type(entry.content_type_hint.as_deref());
        let kind = if entry.has_locator() {
            MediaKind::classify(&entry.locator, content_type)
        } else {
            MediaKind::Unknown
        };

        info!(
            "抽樣: {} (MIME: {}, 檔名: {}) → {kind}",
            entry.locator,
            content_type.unwrap_or("-"),
            metadata.display_name.as_deref().unwrap_or("-")
        );
        if kind == MediaKind::Unknown {
            warn!("無法判斷媒體類型: {}", entry.locator);
        }

        QueryOutcome::Success {
            summary,
            sample: Some(SampleReport {
                entry,
                metadata,
                kind,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::directory::{RowSet, StaticDirectory};
    use crate::component::validator::{
        DecodedImage, ImageDecoder, StreamOpener, StreamSession, ValidationStatus,
    };
    use anyhow::{Result, bail};
    use async_trait::async_trait;
    use std::time::Duration;

    struct AcceptingDecoder;

    #[async_trait]
    impl ImageDecoder for AcceptingDecoder {
        async fn decode(&self, _locator: &str) -> Result<DecodedImage> {
            Ok(DecodedImage {
                width: 4,
                height: 4,
            })
        }
    }

    struct NoStreams;

    #[async_trait]
    impl StreamOpener for NoStreams {
        async fn open(&self, locator: &str) -> Result<Box<dyn StreamSession>> {
            bail!("no player for {locator}")
        }
    }

    fn orchestrator(directory: StaticDirectory) -> Arc<Orchestrator> {
        Orchestrator::new(
            Arc::new(directory),
            ImageValidator::new(Arc::new(AcceptingDecoder), Duration::from_secs(1)),
            VideoValidator::new(Arc::new(NoStreams), Duration::from_secs(1)),
        )
    }

    fn single_row(url: &str, mime: Option<&str>) -> RowSet {
        RowSet::new(
            vec!["url".into(), "mime_type".into()],
            vec![vec![Some(url.into()), mime.map(Into::into)]],
        )
    }

    #[tokio::test]
    async fn test_image_track_success() {
        let orchestrator = orchestrator(StaticDirectory::new(single_row("https://cdn/a.png", None)));
        orchestrator.start().unwrap().await.unwrap();

        let state = orchestrator.state();
        assert!(!state.is_loading);
        assert_eq!(state.image, ValidationStatus::Success("https://cdn/a.png".into()));
        assert_eq!(state.video, ValidationStatus::Idle);
    }

    #[tokio::test]
    async fn test_video_track_error_does_not_touch_image() {
        let orchestrator =
            orchestrator(StaticDirectory::new(single_row("https://cdn/clip", Some("video/mp4"))));
        orchestrator.start().unwrap().await.unwrap();

        let state = orchestrator.state();
        assert!(matches!(state.video, ValidationStatus::Error(_)));
        assert_eq!(state.image, ValidationStatus::Idle);
        assert!(state.outcome.unwrap().is_success());
    }

    #[tokio::test]
    async fn test_dismiss_resets_everything() {
        let orchestrator = orchestrator(StaticDirectory::new(single_row("https://cdn/a.png", None)));
        orchestrator.start().unwrap().await.unwrap();
        orchestrator.dismiss();
        assert_eq!(orchestrator.state(), PipelineState::default());
    }

    #[tokio::test]
    async fn test_hint_without_locator_dispatches_nothing() {
        let rows = RowSet::new(
            vec!["_id".into(), "mime_type".into()],
            vec![vec![Some("1".into()), Some("image/png".into())]],
        );
        let orchestrator = orchestrator(StaticDirectory::new(rows));
        orchestrator.start().unwrap().await.unwrap();

        let state = orchestrator.state();
        let Some(QueryOutcome::Success {
            sample: Some(report),
            ..
        }) = state.outcome
        else {
            panic!("expected a sampled entry");
        };
        assert_eq!(report.kind, MediaKind::Unknown);
        assert_eq!(state.image, ValidationStatus::Idle);
        assert_eq!(state.video, ValidationStatus::Idle);
    }
}
