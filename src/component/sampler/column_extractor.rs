use crate::component::directory::{MIME_TYPE_COLUMN, Row};

pub const URL_COLUMN: &str = "url";
pub const DATA_COLUMN: &str = "_data";

/// 備援掃描時可視為定位字串的前綴
const LOCATOR_PREFIXES: [&str; 2] = ["http", "content"];

/// 從單列取出的欄位
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    pub locator: Option<String>,
    pub local_path_hint: Option<String>,
    pub content_type_hint: Option<String>,
}

/// 依固定順序套用欄位啟發式
///
/// 1. `url` 欄位 → 定位字串
/// 2. `_data` 欄位 → 本機路徑提示
/// 3. `mime_type` 欄位 → 內容類型提示
/// 4. 若 1 沒有結果，依欄位順序找第一個以 `http` 或 `content` 開頭的值
#[must_use]
pub fn extract_fields(row: &Row) -> ExtractedFields {
    let locator = row
        .get(URL_COLUMN)
        .or_else(|| scan_for_locator(row))
        .map(ToString::to_string);

    ExtractedFields {
        locator,
        local_path_hint: row.get(DATA_COLUMN).map(ToString::to_string),
        content_type_hint: row.get(MIME_TYPE_COLUMN).map(ToString::to_string),
    }
}

fn scan_for_locator(row: &Row) -> Option<&str> {
    row.values()
        .flatten()
        .find(|value| LOCATOR_PREFIXES.iter().any(|prefix| value.starts_with(prefix)))
}
