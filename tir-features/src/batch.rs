//! 批处理：条目之间互不依赖，在 rayon 线程池上并行提取；
//! 结果顺序与输入顺序一致，单条失败只记录，不中断批次。

use rayon::prelude::*;

use crate::cds::CdsHint;
use crate::error::{FeatureError, FeatureResult};
use crate::features::{FeatureExtractor, FeatureRecord};
use crate::io::fasta::SequenceRecord;

#[derive(Debug, Clone)]
pub struct BatchItem {
    pub id: String,
    pub seq: Vec<u8>,
    pub hint: FeatureResult<CdsHint>,
}

impl From<SequenceRecord> for BatchItem {
    fn from(rec: SequenceRecord) -> Self {
        let hint = rec.hint();
        Self { id: rec.id, seq: rec.seq, hint }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemSuccess {
    pub index: usize,
    pub id: String,
    pub record: FeatureRecord,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemFailure {
    pub index: usize,
    pub id: String,
    pub error: FeatureError,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BatchEntry {
    Ok(ItemSuccess),
    Failed(ItemFailure),
}

/// 按输入顺序排列的批处理结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub entries: Vec<BatchEntry>,
}

impl BatchReport {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn successes(&self) -> impl Iterator<Item = &ItemSuccess> {
        self.entries.iter().filter_map(|e| match e {
            BatchEntry::Ok(s) => Some(s),
            BatchEntry::Failed(_) => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = &ItemFailure> {
        self.entries.iter().filter_map(|e| match e {
            BatchEntry::Failed(f) => Some(f),
            BatchEntry::Ok(_) => None,
        })
    }

    pub fn n_ok(&self) -> usize {
        self.successes().count()
    }

    pub fn n_degraded(&self) -> usize {
        self.successes().filter(|s| s.record.degraded.any()).count()
    }

    pub fn n_failed(&self) -> usize {
        self.failures().count()
    }
}

pub fn run_batch(extractor: &FeatureExtractor<'_>, items: Vec<BatchItem>) -> BatchReport {
    let entries: Vec<BatchEntry> = items
        .into_par_iter()
        .enumerate()
        .map(|(index, item)| process_item(extractor, index, item))
        .collect();
    BatchReport { entries }
}

fn process_item(extractor: &FeatureExtractor<'_>, index: usize, item: BatchItem) -> BatchEntry {
    let result = item.hint.and_then(|hint| extractor.extract(&item.seq, hint));
    match result {
        Ok(record) => {
            if record.degraded.any() {
                log::debug!("item {} ('{}') degraded: {}", index, item.id, record.degraded.labels());
            }
            BatchEntry::Ok(ItemSuccess { index, id: item.id, record })
        }
        Err(error) => {
            log::warn!("item {} ('{}') skipped: {}", index, item.id, error);
            BatchEntry::Failed(ItemFailure { index, id: item.id, error })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FeatureConfig;
    use crate::fold::{FoldError, FoldResult, Folded};

    fn oracle(w: &[u8]) -> FoldResult<Folded> {
        Ok(Folded { structure: ".".repeat(w.len()), mfe: -(w.len() as f64) })
    }

    fn item(id: &str, seq: &str) -> BatchItem {
        BatchItem { id: id.to_string(), seq: seq.as_bytes().to_vec(), hint: Ok(CdsHint::Search) }
    }

    #[test]
    fn malformed_middle_item_is_recorded_in_place() {
        let cfg = FeatureConfig::default();
        let ex = FeatureExtractor::new(&cfg, &oracle);
        let report = run_batch(
            &ex,
            vec![item("first", "CCAUGGCCUAA"), item("bad", "AUGNNUAA"), item("third", "AUGAAAUGA")],
        );

        assert_eq!(report.len(), 3);
        assert_eq!(report.n_ok(), 2);
        let ids: Vec<&str> = report.successes().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["first", "third"]);

        let failures: Vec<&ItemFailure> = report.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].index, 1);
        assert_eq!(failures[0].id, "bad");
        assert_eq!(failures[0].error.kind(), "InvalidAlphabet");
    }

    #[test]
    fn order_is_stable_for_large_batches() {
        let cfg = FeatureConfig::default();
        let ex = FeatureExtractor::new(&cfg, &oracle);
        // utr length encodes the input index
        let items: Vec<BatchItem> = (0..200)
            .map(|i| item(&format!("s{}", i), &format!("{}AUGCCCUAA", "C".repeat(i))))
            .collect();
        let report = run_batch(&ex, items);
        for (i, s) in report.successes().enumerate() {
            assert_eq!(s.index, i);
            assert_eq!(s.record.features.length_of_5prime_utr, i);
        }
        assert_eq!(report.n_ok(), 200);
    }

    #[test]
    fn oracle_failure_and_bad_hint_are_per_item() {
        let cfg = FeatureConfig::default();
        let picky = |w: &[u8]| -> FoldResult<Folded> {
            if w.starts_with(b"GG") {
                Err(FoldError::Timeout(std::time::Duration::from_millis(1)))
            } else {
                Ok(Folded { structure: String::new(), mfe: 0.0 })
            }
        };
        let ex = FeatureExtractor::new(&cfg, &picky);
        let mut bad_hint = item("hint", "AUGUAA");
        bad_hint.hint = Err(FeatureError::InvalidCodonPosition {
            position: 3,
            expected: "a start position alongside the stop position",
            found: "stop only".into(),
        });

        let report = run_batch(&ex, vec![item("slow", "GGAUGUAA"), bad_hint, item("ok", "AUGUAA")]);
        let kinds: Vec<&str> = report.failures().map(|f| f.error.kind()).collect();
        assert_eq!(kinds, ["OracleTimeout", "InvalidCodonPosition"]);
        assert_eq!(report.n_ok(), 1);
        assert_eq!(report.n_degraded(), 1);
    }
}
