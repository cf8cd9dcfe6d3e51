//! 隨機抽樣元件
//!
//! 從已完整取得的查詢結果中抽一列，並用欄位啟發式取出定位字串與提示。

mod column_extractor;
mod main;

pub use column_extractor::{DATA_COLUMN, ExtractedFields, URL_COLUMN, extract_fields};
pub use main::{SampledEntry, sample, sample_with};
