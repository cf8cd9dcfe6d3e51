use thiserror::Error;

/// 整條驗證流程的錯誤分類
///
/// 查詢階段的錯誤會直接成為 `QueryOutcome::Error` 的訊息；
/// 其餘種類只在各自的範圍內被記錄或轉成單一軌道的狀態。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// 目錄服務不存在、未匯出或無法連線
    #[error("Directory service unreachable: {0}")]
    Unreachable(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// 服務回傳了空的結果容器（與 0 筆資料不同）
    #[error(
        "Directory service returned no result container. Check that it is exported and handles the /local path."
    )]
    EmptyResponse,

    /// 欄位啟發式找不到可用的定位字串，不會中斷流程
    #[error("No usable locator in row: {0}")]
    MalformedRow(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Error: {0}")]
    Query(String),
}
