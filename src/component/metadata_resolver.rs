use crate::component::directory::{DirectoryService, run_guarded};
use crate::config::{CONTENT_SCHEME_PREFIX, DISPLAY_NAME_COLUMN};
use log::{debug, warn};
use std::sync::Arc;

/// 間接定位字串解析出的資訊；解析失敗時欄位保持空白
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedMetadata {
    pub display_name: Option<String>,
    pub content_type: Option<String>,
}

impl ResolvedMetadata {
    /// 分類用的內容類型：抽樣時的提示優先
    #[must_use]
    pub fn effective_content_type<'a>(&'a self, hint: Option<&'a str>) -> Option<&'a str> {
        hint.or(self.content_type.as_deref())
    }
}

/// 透過目錄服務解析 `content://` 定位字串的名稱與類型
#[derive(Clone)]
pub struct MetadataResolver {
    service: Arc<dyn DirectoryService>,
}

impl MetadataResolver {
    #[must_use]
    pub fn new(service: Arc<dyn DirectoryService>) -> Self {
        Self { service }
    }

    #[must_use]
    pub fn is_indirect(locator: &str) -> bool {
        locator.starts_with(CONTENT_SCHEME_PREFIX)
    }

    /// 不會失敗；任何錯誤只記錄並讓對應欄位保持空白
    pub async fn resolve(&self, locator: &str, content_type_hint: Option<&str>) -> ResolvedMetadata {
        let mut metadata = ResolvedMetadata::default();
        if !Self::is_indirect(locator) {
            return metadata;
        }

        if content_type_hint.is_none() {
            let service = Arc::clone(&self.service);
            let uri = locator.to_string();
            match run_guarded(async move { service.content_type(&uri).await }).await {
                Ok(content_type) => metadata.content_type = content_type,
                Err(e) => warn!("無法取得 {locator} 的內容類型: {e}"),
            }
        }

        let service = Arc::clone(&self.service);
        let uri = locator.to_string();
        match run_guarded(async move { service.resolve(&uri).await }).await {
            Ok(Some(row)) => {
                metadata.display_name = row.get(DISPLAY_NAME_COLUMN).map(ToString::to_string);
            }
            Ok(None) => debug!("{locator} 沒有可用的中繼資料"),
            Err(e) => warn!("無法解析 {locator} 的檔名: {e}"),
        }

        debug!(
            "解析結果 {locator}: name={:?}, type={:?}",
            metadata.display_name, metadata.content_type
        );
        metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::directory::{Row, RowSet, StaticDirectory};
    use crate::error::ProbeError;

    fn metadata_row() -> Row {
        [("_display_name", Some("sunset.png")), ("mime_type", Some("image/png"))]
            .into_iter()
            .collect()
    }

    fn resolver(directory: StaticDirectory) -> MetadataResolver {
        MetadataResolver::new(Arc::new(directory))
    }

    #[tokio::test]
    async fn test_direct_url_not_resolved() {
        let resolver = resolver(
            StaticDirectory::new(RowSet::default()).with_metadata("https://cdn/a.png", metadata_row()),
        );
        let metadata = resolver.resolve("https://cdn/a.png", None).await;
        assert_eq!(metadata, ResolvedMetadata::default());
    }

    #[tokio::test]
    async fn test_content_uri_resolved() {
        let resolver = resolver(
            StaticDirectory::new(RowSet::default()).with_metadata("content://provider/42", metadata_row()),
        );
        let metadata = resolver.resolve("content://provider/42", None).await;
        assert_eq!(metadata.display_name.as_deref(), Some("sunset.png"));
        assert_eq!(metadata.content_type.as_deref(), Some("image/png"));
    }

    #[tokio::test]
    async fn test_hint_skips_type_lookup() {
        let resolver = resolver(
            StaticDirectory::new(RowSet::default()).with_metadata("content://provider/42", metadata_row()),
        );
        let metadata = resolver
            .resolve("content://provider/42", Some("video/mp4"))
            .await;
        assert_eq!(metadata.content_type, None);
        assert_eq!(metadata.display_name.as_deref(), Some("sunset.png"));
        assert_eq!(metadata.effective_content_type(Some("video/mp4")), Some("video/mp4"));
    }

    #[tokio::test]
    async fn test_fault_is_absorbed() {
        let resolver = resolver(
            StaticDirectory::new(RowSet::default())
                .with_metadata("content://provider/42", metadata_row())
                .with_resolve_fault(ProbeError::PermissionDenied("revoked".into())),
        );
        let metadata = resolver.resolve("content://provider/42", None).await;
        assert_eq!(metadata, ResolvedMetadata::default());
    }
}
