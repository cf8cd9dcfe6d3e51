use super::row_set::{Row, RowSet};
use crate::error::ProbeError;
use async_trait::async_trait;

pub const MIME_TYPE_COLUMN: &str = "mime_type";

/// 服務註冊檢查的結果，只用於診斷
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderProbe {
    Found { package_name: String, exported: bool },
    NotFound,
}

/// 外部目錄服務的查詢能力
///
/// 具體後端（HTTP、靜態資料、測試替身）都實作這個介面，彼此可以互換。
#[async_trait]
pub trait DirectoryService: Send + Sync {
    /// 列舉 `uri` 指向的目錄；`Ok(None)` 代表服務沒有回傳任何結果容器
    async fn query(&self, uri: &str) -> Result<Option<RowSet>, ProbeError>;

    /// 對間接定位字串做次級查詢，回傳第一列
    async fn resolve(&self, uri: &str) -> Result<Option<Row>, ProbeError>;

    /// 查詢內容類型，預設取次級查詢結果的 `mime_type` 欄位
    async fn content_type(&self, uri: &str) -> Result<Option<String>, ProbeError> {
        Ok(self
            .resolve(uri)
            .await?
            .and_then(|row| row.get(MIME_TYPE_COLUMN).map(ToString::to_string)))
    }

    /// 檢查服務是否已註冊
    async fn probe(&self, _authority: &str) -> Result<ProviderProbe, ProbeError> {
        Ok(ProviderProbe::NotFound)
    }
}
