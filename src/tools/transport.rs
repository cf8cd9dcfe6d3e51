use crate::config::CONTENT_SCHEME_PREFIX;
use anyhow::{Context, Result, anyhow, bail};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// HTTP 端點上的路由，對應目錄服務的各項能力
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentRoute {
    Provider,
    Query,
    Type,
    Open,
}

impl ContentRoute {
    const fn segment(self) -> &'static str {
        match self {
            Self::Provider => "provider",
            Self::Query => "query",
            Self::Type => "type",
            Self::Open => "open",
        }
    }
}

/// 可實際讀取的媒體位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaLocation {
    Remote(Url),
    Local(PathBuf),
}

/// 把定位字串轉成可讀取的位置並取得內容
///
/// `content://` 定位字串必須透過設定的 HTTP 端點轉換；
/// `http(s)://` 直接使用；`file://` 與一般路徑視為本機檔案。
#[derive(Debug, Clone)]
pub struct Transport {
    client: reqwest::Client,
    content_base: Option<Url>,
}

impl Transport {
    pub fn new(content_base: Option<&str>, timeout: Duration) -> Result<Self> {
        let content_base = content_base.map(parse_base).transpose()?;
        let client = reqwest::Client::builder()
            .user_agent(concat!("media_provider_probe/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("無法建立 HTTP client")?;

        Ok(Self {
            client,
            content_base,
        })
    }

    #[must_use]
    pub const fn client(&self) -> &reqwest::Client {
        &self.client
    }

    #[must_use]
    pub const fn content_base(&self) -> Option<&Url> {
        self.content_base.as_ref()
    }

    /// `{base}/provider/{authority}`
    pub fn provider_url(&self, authority: &str) -> Result<Url> {
        let base = self.require_base(authority)?;
        base.join(&format!("{}/{authority}", ContentRoute::Provider.segment()))
            .with_context(|| format!("無法組合 provider 路徑: {authority}"))
    }

    /// `{base}/{route}/{authority}{path}`
    pub fn content_url(&self, route: ContentRoute, content_uri: &str) -> Result<Url> {
        let uri = Url::parse(content_uri)
            .with_context(|| format!("無效的 content URI: {content_uri}"))?;
        if uri.scheme() != "content" {
            bail!("不是 content URI: {content_uri}");
        }
        let authority = uri
            .host_str()
            .filter(|host| !host.is_empty())
            .ok_or_else(|| anyhow!("content URI 缺少 authority: {content_uri}"))?;

        let base = self.require_base(content_uri)?;
        let mut target = base
            .join(&format!("{}/{authority}{}", route.segment(), uri.path()))
            .with_context(|| format!("無法組合 {} 路徑: {content_uri}", route.segment()))?;
        target.set_query(uri.query());
        Ok(target)
    }

    pub fn locate(&self, locator: &str) -> Result<MediaLocation> {
        if locator.is_empty() {
            bail!("定位字串為空");
        }

        if locator.starts_with("http://") || locator.starts_with("https://") {
            let url = Url::parse(locator).with_context(|| format!("無效的 URL: {locator}"))?;
            return Ok(MediaLocation::Remote(url));
        }

        if locator.starts_with(CONTENT_SCHEME_PREFIX) {
            return self
                .content_url(ContentRoute::Open, locator)
                .map(MediaLocation::Remote);
        }

        if locator.starts_with("file://") {
            let url = Url::parse(locator).with_context(|| format!("無效的檔案 URL: {locator}"))?;
            let path = url
                .to_file_path()
                .map_err(|()| anyhow!("無法轉換為本機路徑: {locator}"))?;
            return Ok(MediaLocation::Local(path));
        }

        Ok(MediaLocation::Local(PathBuf::from(locator)))
    }

    /// 讀取定位字串指向的完整內容
    pub async fn fetch(&self, locator: &str) -> Result<Vec<u8>> {
        match self.locate(locator)? {
            MediaLocation::Remote(url) => {
                let response = self
                    .client
                    .get(url.clone())
                    .send()
                    .await
                    .with_context(|| format!("無法下載 {url}"))?
                    .error_for_status()
                    .with_context(|| format!("下載失敗 {url}"))?;
                let bytes = response
                    .bytes()
                    .await
                    .with_context(|| format!("讀取回應內容失敗 {url}"))?;
                Ok(bytes.to_vec())
            }
            MediaLocation::Local(path) => tokio::fs::read(&path)
                .await
                .with_context(|| format!("無法讀取檔案: {}", path.display())),
        }
    }

    fn require_base(&self, what: &str) -> Result<&Url> {
        self.content_base
            .as_ref()
            .ok_or_else(|| anyhow!("未設定 http_base_url，無法解析 {what}"))
    }
}

/// 確保 base 以 `/` 結尾，`Url::join` 才會接在後面而不是取代最後一段
fn parse_base(raw: &str) -> Result<Url> {
    let mut base = Url::parse(raw).with_context(|| format!("無效的 http_base_url: {raw}"))?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base)
}
