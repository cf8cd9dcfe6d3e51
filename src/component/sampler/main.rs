use super::column_extractor::{ExtractedFields, extract_fields};
use crate::component::directory::RowSet;
use crate::error::ProbeError;
use log::{debug, warn};
use rand::Rng;

/// 從目錄中抽出的一筆資料，建立後不再變動
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampledEntry {
    /// 找不到時為空字串
    pub locator: String,
    pub local_path_hint: Option<String>,
    pub content_type_hint: Option<String>,
    /// 被抽中的列索引
    pub position: usize,
}

impl SampledEntry {
    #[must_use]
    pub fn has_locator(&self) -> bool {
        !self.locator.is_empty()
    }
}

/// 以 thread RNG 隨機抽一列
#[must_use]
pub fn sample(rows: &RowSet) -> Option<SampledEntry> {
    sample_with(rows, &mut rand::rng())
}

/// 在 `[0, count)` 均勻選一個索引並取出欄位；`count == 0` 時不抽樣
pub fn sample_with<R: Rng + ?Sized>(rows: &RowSet, rng: &mut R) -> Option<SampledEntry> {
    let count = rows.count();
    if count == 0 {
        debug!("目錄為空，略過抽樣");
        return None;
    }

    let position = rng.random_range(0..count);
    let fields = match rows.row(position) {
        Some(row) => extract_fields(row),
        None => {
            warn!("宣告筆數為 {count}，但第 {position} 列不存在");
            ExtractedFields::default()
        }
    };

    let entry = SampledEntry {
        locator: fields.locator.unwrap_or_default(),
        local_path_hint: fields.local_path_hint,
        content_type_hint: fields.content_type_hint,
        position,
    };

    if entry.has_locator() {
        debug!("抽中第 {position} 列: {}", entry.locator);
    } else {
        warn!(
            "{}",
            ProbeError::MalformedRow(format!("row {position} of {count}"))
        );
    }

    Some(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rows_with_urls(count: usize) -> RowSet {
        RowSet::new(
            vec!["_id".into(), "url".into()],
            (0..count)
                .map(|i| vec![Some(i.to_string()), Some(format!("https://cdn/{i}.jpg"))])
                .collect(),
        )
    }

    #[test]
    fn test_empty_row_set_yields_nothing() {
        let rows = RowSet::new(vec!["url".into()], vec![]);
        assert!(sample(&rows).is_none());
    }

    #[test]
    fn test_single_row_always_chosen() {
        let entry = sample(&rows_with_urls(1)).unwrap();
        assert_eq!(entry.position, 0);
        assert_eq!(entry.locator, "https://cdn/0.jpg");
    }

    #[test]
    fn test_selection_is_uniform() {
        const N: usize = 5;
        const TRIALS: usize = 10_000;

        let rows = rows_with_urls(N);
        let mut rng = StdRng::seed_from_u64(42);
        let mut hits = [0usize; N];
        for _ in 0..TRIALS {
            let entry = sample_with(&rows, &mut rng).unwrap();
            assert_eq!(entry.locator, format!("https://cdn/{}.jpg", entry.position));
            hits[entry.position] += 1;
        }

        let expected = TRIALS / N;
        for (position, count) in hits.iter().enumerate() {
            assert!(
                count.abs_diff(expected) < expected / 5,
                "position {position} chosen {count} times, expected about {expected}"
            );
        }
    }

    #[test]
    fn test_missing_row_gives_empty_locator() {
        let rows = RowSet::with_declared_count(vec!["url".into()], vec![], 3);
        let entry = sample(&rows).unwrap();
        assert!(!entry.has_locator());
        assert!(entry.position < 3);
    }
}
