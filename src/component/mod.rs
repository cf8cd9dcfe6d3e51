//! 功能元件模組
//!
//! 資料流單向：directory → sampler → metadata_resolver → 分類 → validator，
//! 由 orchestrator 串接。

pub mod directory;
pub mod metadata_resolver;
pub mod orchestrator;
pub mod sampler;
pub mod validator;

pub use directory::{DirectoryClient, DirectoryService, HttpDirectory, StaticDirectory};
pub use metadata_resolver::{MetadataResolver, ResolvedMetadata};
pub use orchestrator::{Orchestrator, PipelineState, QueryOutcome};
pub use sampler::SampledEntry;
pub use validator::{ImageValidator, ValidationStatus, VideoValidator};
