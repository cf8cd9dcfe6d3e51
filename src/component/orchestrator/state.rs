use crate::component::metadata_resolver::ResolvedMetadata;
use crate::component::sampler::SampledEntry;
use crate::component::validator::ValidationStatus;
use crate::tools::MediaKind;
use uuid::Uuid;

/// 由查詢結果整理出的摘要
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySummary {
    pub uri: String,
    pub count: usize,
    pub columns: Vec<String>,
}

/// 被抽中的一筆及其解析與分類結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleReport {
    pub entry: SampledEntry,
    pub metadata: ResolvedMetadata,
    pub kind: MediaKind,
}

impl SampleReport {
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.metadata
            .effective_content_type(self.entry.content_type_hint.as_deref())
    }
}

/// 查詢階段的最終結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    Success {
        summary: QuerySummary,
        /// 目錄為空時沒有抽樣
        sample: Option<SampleReport>,
    },
    Error {
        message: String,
    },
}

impl QueryOutcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// 驗證軌道，每次執行最多啟用一條
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Track {
    Image,
    Video,
}

impl Track {
    #[must_use]
    pub const fn for_kind(kind: MediaKind) -> Option<Self> {
        match kind {
            MediaKind::Image => Some(Self::Image),
            MediaKind::Video => Some(Self::Video),
            MediaKind::Unknown => None,
        }
    }
}

/// 每次狀態轉換都會整份送給呈現層
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineState {
    /// 目前這次執行的識別；`None` 代表 Idle
    pub run_id: Option<Uuid>,
    pub is_loading: bool,
    pub outcome: Option<QueryOutcome>,
    pub image: ValidationStatus,
    pub video: ValidationStatus,
}

impl PipelineState {
    #[must_use]
    pub const fn track(&self, track: Track) -> &ValidationStatus {
        match track {
            Track::Image => &self.image,
            Track::Video => &self.video,
        }
    }

    pub fn track_mut(&mut self, track: Track) -> &mut ValidationStatus {
        match track {
            Track::Image => &mut self.image,
            Track::Video => &mut self.video,
        }
    }

    #[must_use]
    pub fn is_current(&self, run_id: Uuid) -> bool {
        self.run_id == Some(run_id)
    }

    /// 查詢與驗證都已結束
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        !self.is_loading && !self.image.is_loading() && !self.video.is_loading()
    }
}
