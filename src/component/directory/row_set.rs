use serde::Deserialize;

/// 一列資料：依欄位宣告順序排列的 (欄位名稱, 值)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: Vec<(String, Option<String>)>,
}

impl Row {
    #[must_use]
    pub const fn new(cells: Vec<(String, Option<String>)>) -> Self {
        Self { cells }
    }

    /// 第一個名稱完全相符的欄位；欄位不存在與值為 null 都回傳 `None`
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .and_then(|(_, value)| value.as_deref())
    }

    #[must_use]
    pub fn has_column(&self, column: &str) -> bool {
        self.cells.iter().any(|(name, _)| name == column)
    }

    pub fn cells(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.cells
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_deref()))
    }

    /// 依宣告順序列出所有值
    pub fn values(&self) -> impl Iterator<Item = Option<&str>> {
        self.cells.iter().map(|(_, value)| value.as_deref())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K, V> FromIterator<(K, Option<V>)> for Row
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, Option<V>)>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.map(Into::into)))
                .collect(),
        )
    }
}

/// 一次查詢的完整結果，建立後不再變動
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowSet {
    columns: Vec<String>,
    rows: Vec<Row>,
    count: usize,
}

impl RowSet {
    /// 以欄位名稱與各列的值建立；每列的值依 `columns` 順序對齊
    #[must_use]
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        let count = rows.len();
        Self::with_declared_count(columns, rows, count)
    }

    /// 服務宣告的筆數可能與實際帶回的列數不同
    #[must_use]
    pub fn with_declared_count(
        columns: Vec<String>,
        rows: Vec<Vec<Option<String>>>,
        count: usize,
    ) -> Self {
        let rows = rows
            .into_iter()
            .map(|values| {
                Row::new(
                    columns
                        .iter()
                        .cloned()
                        .zip(values.into_iter().chain(std::iter::repeat(None)))
                        .collect(),
                )
            })
            .collect();

        Self {
            columns,
            rows,
            count,
        }
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    #[must_use]
    pub fn row(&self, position: usize) -> Option<&Row> {
        self.rows.get(position)
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }
}

/// HTTP 與靜態資料共用的 JSON 格式
#[derive(Debug, Clone, Deserialize)]
pub struct RowSetBody {
    pub columns: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<Option<String>>>,
    pub count: Option<usize>,
}

impl From<RowSetBody> for RowSet {
    fn from(body: RowSetBody) -> Self {
        let count = body.count.unwrap_or(body.rows.len());
        Self::with_declared_count(body.columns, body.rows, count)
    }
}
