//! 驗證流程的狀態機
//!
//! 由單一「開始」觸發驅動，狀態以 `PipelineState` 整份發布給呈現層，
//! 呈現層只會回傳「關閉」訊號。

mod main;
mod state;

pub use main::Orchestrator;
pub use state::{PipelineState, QueryOutcome, QuerySummary, SampleReport, Track};
