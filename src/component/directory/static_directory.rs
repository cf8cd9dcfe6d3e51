use super::row_set::{Row, RowSet, RowSetBody};
use super::service::{DirectoryService, ProviderProbe};
use crate::config::catalog_uri;
use crate::error::ProbeError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

#[derive(Deserialize)]
struct FixtureProvider {
    package_name: String,
    #[serde(default = "default_exported")]
    exported: bool,
}

const fn default_exported() -> bool {
    true
}

#[derive(Deserialize)]
struct Fixture {
    columns: Option<Vec<String>>,
    #[serde(default)]
    rows: Vec<Vec<Option<String>>>,
    count: Option<usize>,
    #[serde(default)]
    metadata: HashMap<String, BTreeMap<String, Option<String>>>,
    provider: Option<FixtureProvider>,
}

/// 記憶體中的目錄服務，資料固定不變
#[derive(Debug, Clone)]
pub struct StaticDirectory {
    catalog_uri: String,
    catalog: Option<RowSet>,
    metadata: HashMap<String, Row>,
    provider: ProviderProbe,
    query_fault: Option<ProbeError>,
    resolve_fault: Option<ProbeError>,
}

impl StaticDirectory {
    #[must_use]
    pub fn new(catalog: RowSet) -> Self {
        Self {
            catalog_uri: catalog_uri(),
            catalog: Some(catalog),
            metadata: HashMap::new(),
            provider: ProviderProbe::NotFound,
            query_fault: None,
            resolve_fault: None,
        }
    }

    /// 查詢時回傳空的結果容器
    #[must_use]
    pub fn without_result() -> Self {
        Self {
            catalog: None,
            ..Self::new(RowSet::default())
        }
    }

    /// 每次查詢都以指定錯誤失敗
    #[must_use]
    pub fn failing(fault: ProbeError) -> Self {
        Self {
            query_fault: Some(fault),
            ..Self::without_result()
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, uri: impl Into<String>, row: Row) -> Self {
        self.metadata.insert(uri.into(), row);
        self
    }

    #[must_use]
    pub fn with_provider(mut self, package_name: impl Into<String>, exported: bool) -> Self {
        self.provider = ProviderProbe::Found {
            package_name: package_name.into(),
            exported,
        };
        self
    }

    /// 次級查詢一律失敗
    #[must_use]
    pub fn with_resolve_fault(mut self, fault: ProbeError) -> Self {
        self.resolve_fault = Some(fault);
        self
    }

    /// 從 JSON 檔載入，格式與 HTTP `query` 回應相同，另可附 `metadata` 與 `provider`
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("無法讀取靜態資料: {}", path.display()))?;
        let fixture: Fixture = serde_json::from_str(&content)
            .with_context(|| format!("無法解析靜態資料: {}", path.display()))?;

        let mut directory = match fixture.columns {
            Some(columns) => Self::new(RowSet::from(RowSetBody {
                columns,
                rows: fixture.rows,
                count: fixture.count,
            })),
            None => Self::without_result(),
        };
        for (uri, columns) in fixture.metadata {
            directory = directory.with_metadata(uri, columns.into_iter().collect());
        }
        if let Some(provider) = fixture.provider {
            directory = directory.with_provider(provider.package_name, provider.exported);
        }

        Ok(directory)
    }
}

#[async_trait]
impl DirectoryService for StaticDirectory {
    async fn query(&self, uri: &str) -> Result<Option<RowSet>, ProbeError> {
        if let Some(fault) = &self.query_fault {
            return Err(fault.clone());
        }

        if uri == self.catalog_uri {
            return Ok(self.catalog.clone());
        }

        let row = self.resolve(uri).await?;
        Ok(row.map(|row| {
            let (columns, values): (Vec<String>, Vec<Option<String>>) = row
                .cells()
                .map(|(name, value)| (name.to_string(), value.map(ToString::to_string)))
                .unzip();
            RowSet::new(columns, vec![values])
        }))
    }

    async fn resolve(&self, uri: &str) -> Result<Option<Row>, ProbeError> {
        if let Some(fault) = &self.resolve_fault {
            return Err(fault.clone());
        }
        Ok(self.metadata.get(uri).cloned())
    }

    async fn probe(&self, _authority: &str) -> Result<ProviderProbe, ProbeError> {
        Ok(self.provider.clone())
    }
}
