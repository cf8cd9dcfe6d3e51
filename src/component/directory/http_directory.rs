use super::row_set::{Row, RowSet, RowSetBody};
use super::service::{DirectoryService, ProviderProbe};
use crate::error::ProbeError;
use crate::tools::{ContentRoute, Transport};
use async_trait::async_trait;
use log::debug;
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

#[derive(Deserialize)]
struct ProviderBody {
    package_name: String,
    #[serde(default)]
    exported: bool,
}

#[derive(Deserialize)]
struct TypeBody {
    mime_type: Option<String>,
}

/// 透過 HTTP JSON 端點存取目錄服務
///
/// 路由：`provider/{authority}`、`query/{authority}{path}`、
/// `type/{authority}{path}`，媒體內容本身由 `Transport` 走 `open/`。
#[derive(Debug, Clone)]
pub struct HttpDirectory {
    transport: Transport,
}

impl HttpDirectory {
    #[must_use]
    pub const fn new(transport: Transport) -> Self {
        Self { transport }
    }

    fn route(&self, route: ContentRoute, uri: &str) -> Result<Url, ProbeError> {
        self.transport
            .content_url(route, uri)
            .map_err(|e| ProbeError::Query(format!("{e:#}")))
    }

    async fn send(&self, url: &Url) -> Result<Response, ProbeError> {
        debug!("GET {url}");
        self.transport
            .client()
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ProbeError::Unreachable(format!("{url}: {e}")))
    }

    async fn read_json<T: DeserializeOwned>(
        url: &Url,
        response: Response,
    ) -> Result<Option<T>, ProbeError> {
        let status = response.status();
        match status {
            StatusCode::NO_CONTENT => return Ok(None),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                let body = response.text().await.unwrap_or_default();
                let message = if body.trim().is_empty() {
                    format!("{url} answered {status}")
                } else {
                    body.trim().to_string()
                };
                return Err(ProbeError::PermissionDenied(message));
            }
            StatusCode::NOT_FOUND => {
                return Err(ProbeError::Unreachable(format!(
                    "{url} is not exported (404)"
                )));
            }
            _ if !status.is_success() => {
                return Err(ProbeError::Query(format!("HTTP {status} from {url}")));
            }
            _ => {}
        }

        response
            .json::<Option<T>>()
            .await
            .map_err(|e| ProbeError::Query(format!("invalid response from {url}: {e}")))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>, ProbeError> {
        let response = self.send(&url).await?;
        Self::read_json(&url, response).await
    }
}

#[async_trait]
impl DirectoryService for HttpDirectory {
    async fn query(&self, uri: &str) -> Result<Option<RowSet>, ProbeError> {
        let url = self.route(ContentRoute::Query, uri)?;
        let body: Option<RowSetBody> = self.get_json(url).await?;
        Ok(body.map(RowSet::from))
    }

    async fn resolve(&self, uri: &str) -> Result<Option<Row>, ProbeError> {
        let rows = self.query(uri).await?;
        Ok(rows.and_then(|rows| rows.rows().first().cloned()))
    }

    async fn content_type(&self, uri: &str) -> Result<Option<String>, ProbeError> {
        let url = self.route(ContentRoute::Type, uri)?;
        let body: Option<TypeBody> = self.get_json(url).await?;
        Ok(body.and_then(|b| b.mime_type))
    }

    async fn probe(&self, authority: &str) -> Result<ProviderProbe, ProbeError> {
        let url = self
            .transport
            .provider_url(authority)
            .map_err(|e| ProbeError::Query(format!("{e:#}")))?;
        let response = self.send(&url).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(ProviderProbe::NotFound);
        }

        let body: Option<ProviderBody> = Self::read_json(&url, response).await?;
        Ok(body.map_or(ProviderProbe::NotFound, |b| ProviderProbe::Found {
            package_name: b.package_name,
            exported: b.exported,
        }))
    }
}
