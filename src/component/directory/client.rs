use super::row_set::RowSet;
use super::service::{DirectoryService, ProviderProbe};
use crate::config::{DIRECTORY_AUTHORITY, catalog_uri};
use crate::error::ProbeError;
use log::{debug, error, info, warn};
use std::future::Future;
use std::sync::Arc;

/// 查詢目錄服務的目錄清單
///
/// 所有失敗都以 `ProbeError` 回傳，後端 panic 也會被轉成錯誤值。
#[derive(Clone)]
pub struct DirectoryClient {
    service: Arc<dyn DirectoryService>,
    catalog_uri: String,
}

impl DirectoryClient {
    #[must_use]
    pub fn new(service: Arc<dyn DirectoryService>) -> Self {
        Self {
            service,
            catalog_uri: catalog_uri(),
        }
    }

    #[must_use]
    pub const fn service(&self) -> &Arc<dyn DirectoryService> {
        &self.service
    }

    #[must_use]
    pub fn catalog_uri(&self) -> &str {
        &self.catalog_uri
    }

    pub async fn query(&self) -> Result<RowSet, ProbeError> {
        info!("開始查詢目錄服務...");
        self.log_provider_probe().await;

        info!("查詢 URI: {}", self.catalog_uri);
        let service = Arc::clone(&self.service);
        let uri = self.catalog_uri.clone();
        let result = run_guarded(async move { service.query(&uri).await }).await;

        match result {
            Ok(Some(rows)) => {
                info!(
                    "查詢成功，共 {} 筆，欄位: {}",
                    rows.count(),
                    rows.columns().join(", ")
                );
                Ok(rows)
            }
            Ok(None) => {
                error!("目錄服務沒有回傳結果容器");
                Err(ProbeError::EmptyResponse)
            }
            Err(e) => {
                error!("查詢失敗: {e}");
                Err(e)
            }
        }
    }

    /// 僅供診斷，結果不影響查詢
    async fn log_provider_probe(&self) {
        let service = Arc::clone(&self.service);
        let probe = run_guarded(async move { service.probe(DIRECTORY_AUTHORITY).await }).await;

        match probe {
            Ok(ProviderProbe::Found {
                package_name,
                exported,
            }) => debug!("找到服務提供者: {package_name}, exported: {exported}"),
            Ok(ProviderProbe::NotFound) => warn!("找不到服務提供者，應用程式可能未安裝"),
            Err(e) => warn!("無法檢查服務提供者: {e}"),
        }
    }
}

/// 在獨立任務中執行，任務 panic 時轉成 `ProbeError::Query`
pub(crate) async fn run_guarded<T, F>(future: F) -> Result<T, ProbeError>
where
    F: Future<Output = Result<T, ProbeError>> + Send + 'static,
    T: Send + 'static,
{
    tokio::spawn(future)
        .await
        .unwrap_or_else(|e| Err(ProbeError::Query(format!("directory task failed: {e}"))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::directory::{Row, StaticDirectory};
    use async_trait::async_trait;

    struct PanickingDirectory;

    #[async_trait]
    impl DirectoryService for PanickingDirectory {
        async fn query(&self, _uri: &str) -> Result<Option<RowSet>, ProbeError> {
            panic!("backend exploded")
        }

        async fn resolve(&self, _uri: &str) -> Result<Option<Row>, ProbeError> {
            Ok(None)
        }

        async fn probe(&self, _authority: &str) -> Result<ProviderProbe, ProbeError> {
            Err(ProbeError::Unreachable("no package manager".into()))
        }
    }

    #[tokio::test]
    async fn test_zero_rows_is_success() {
        let client = DirectoryClient::new(Arc::new(StaticDirectory::new(RowSet::new(
            vec!["url".into()],
            vec![],
        ))));
        let rows = client.query().await.unwrap();
        assert_eq!(rows.count(), 0);
    }

    #[tokio::test]
    async fn test_missing_container_is_empty_response() {
        let client = DirectoryClient::new(Arc::new(StaticDirectory::without_result()));
        assert_eq!(client.query().await.unwrap_err(), ProbeError::EmptyResponse);
    }

    #[tokio::test]
    async fn test_backend_panic_is_captured() {
        let client = DirectoryClient::new(Arc::new(PanickingDirectory));
        let err = client.query().await.unwrap_err();
        assert!(matches!(err, ProbeError::Query(_)));
    }

    #[test]
    fn test_catalog_uri() {
        let client = DirectoryClient::new(Arc::new(StaticDirectory::without_result()));
        assert_eq!(client.catalog_uri(), "content://com.neilturner.aerialviews.media/local");
    }
}
