//! 特征向量组装。
//!
//! 字段顺序与列名在编译期固定（[`SCHEMA`]），与下游回归模型训练时的特征表一致，
//! 不从运行时数据推导。

use serde::Serialize;

use crate::cds::{count_in_frame_aug, locate_cds, CdsHint, CodingRegion};
use crate::config::FeatureConfig;
use crate::error::FeatureResult;
use crate::fold::{round_energy, FoldingOracle};
use crate::kozak::{kozak_features, KozakContext};
use crate::sequence::RnaSequence;
use crate::window::sample_windows;

pub const N_FEATURES: usize = 8;

pub const SCHEMA: [&str; N_FEATURES] = [
    "gene_length",
    "length_of_5prime_utr",
    "kozak_score",
    "kozak_pos1",
    "kozak_pos4",
    "folding_energy_70",
    "folding_energy_80",
    "in_frame_aug",
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector {
    pub gene_length: usize,
    pub length_of_5prime_utr: usize,
    pub kozak_score: u32,
    pub kozak_pos1: u8,
    pub kozak_pos4: u8,
    pub folding_energy_70: f64,
    pub folding_energy_80: f64,
    pub in_frame_aug: usize,
}

impl FeatureVector {
    /// 按 SCHEMA 顺序输出模型输入行
    pub fn to_row(&self) -> [f64; N_FEATURES] {
        [
            self.gene_length as f64,
            self.length_of_5prime_utr as f64,
            f64::from(self.kozak_score),
            f64::from(self.kozak_pos1),
            f64::from(self.kozak_pos4),
            self.folding_energy_70,
            self.folding_energy_80,
            self.in_frame_aug as f64,
        ]
    }

    /// 按 SCHEMA 顺序输出文本字段；能量固定两位小数
    pub fn to_text_fields(&self) -> [String; N_FEATURES] {
        [
            self.gene_length.to_string(),
            self.length_of_5prime_utr.to_string(),
            self.kozak_score.to_string(),
            self.kozak_pos1.to_string(),
            self.kozak_pos4.to_string(),
            format!("{:.2}", self.folding_energy_70),
            format!("{:.2}", self.folding_energy_80),
            self.in_frame_aug.to_string(),
        ]
    }

    /// 由记录反推 CDS 边界
    pub fn coding_region(&self) -> CodingRegion {
        let start = self.length_of_5prime_utr;
        CodingRegion { start, stop: start + self.gene_length - 3 }
    }
}

/// 降级标记：哪些字段使用了哨兵值或被裁剪的窗口
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Degradation {
    pub kozak_window: bool,
    pub five_prime_window: bool,
    pub start_window: bool,
}

impl Degradation {
    pub fn any(&self) -> bool {
        self.kozak_window || self.five_prime_window || self.start_window
    }

    /// 逗号分隔的标签，未降级时为空串
    pub fn labels(&self) -> String {
        let mut tags = Vec::new();
        if self.kozak_window {
            tags.push("kozak_window");
        }
        if self.five_prime_window {
            tags.push("five_prime_window");
        }
        if self.start_window {
            tags.push("start_window");
        }
        tags.join(",")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    pub cds: CodingRegion,
    pub kozak: KozakContext,
    pub features: FeatureVector,
    pub degraded: Degradation,
}

/// 特征提取器：持有配置和外部注入的折叠预测器句柄
pub struct FeatureExtractor<'a> {
    config: &'a FeatureConfig,
    oracle: &'a dyn FoldingOracle,
}

impl<'a> FeatureExtractor<'a> {
    pub fn new(config: &'a FeatureConfig, oracle: &'a dyn FoldingOracle) -> Self {
        Self { config, oracle }
    }

    pub fn config(&self) -> &FeatureConfig {
        self.config
    }

    /// 从原始字节开始：规范化、校验、组装
    pub fn extract(&self, raw: &[u8], hint: CdsHint) -> FeatureResult<FeatureRecord> {
        let seq = RnaSequence::parse(raw, self.config.transcribe_dna)?;
        self.assemble(&seq, hint)
    }

    pub fn assemble(&self, seq: &RnaSequence, hint: CdsHint) -> FeatureResult<FeatureRecord> {
        let cds = locate_cds(seq, hint)?;
        let bases = seq.as_bytes();

        let kozak = kozak_features(bases, cds.start, &self.config.kozak);
        let windows = sample_windows(bases, cds.start, &self.config.windows);

        let fe70 = self.oracle.fold(windows.five_prime)?;
        let fe80 = self.oracle.fold(windows.start_centered)?;

        let features = FeatureVector {
            gene_length: cds.cds_len(),
            length_of_5prime_utr: cds.utr5_len(),
            kozak_score: kozak.score(),
            kozak_pos1: kozak.pos1(),
            kozak_pos4: kozak.pos4(),
            folding_energy_70: round_energy(fe70.mfe),
            folding_energy_80: round_energy(fe80.mfe),
            in_frame_aug: count_in_frame_aug(cds.slice(seq)),
        };
        let degraded = Degradation {
            kozak_window: kozak.is_degraded(),
            five_prime_window: windows.five_prime_truncated,
            start_window: windows.start_clipped,
        };

        Ok(FeatureRecord { cds, kozak, features, degraded })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FeatureError;
    use crate::fold::{FoldError, FoldResult, Folded};

    /// 能量 = -0.1 × 窗口长度，便于断言送入预测器的窗口
    fn length_oracle(w: &[u8]) -> FoldResult<Folded> {
        Ok(Folded { structure: ".".repeat(w.len()), mfe: -0.1 * w.len() as f64 })
    }

    fn long_seq() -> Vec<u8> {
        // 50 nt UTR ending in a strong Kozak context, then AUG ... UAA, then tail
        let mut s = b"CCUUCCUUCCUUCCUUCCUUCCUUCCUUCCUUCCUUCCUUCCUUAAAAAA".to_vec();
        s.extend_from_slice(b"AUGUCUAUGGCCAUGGCUUAA");
        s.extend_from_slice(&b"GCGCGCGCGC".repeat(6));
        s
    }

    #[test]
    fn schema_is_fixed() {
        assert_eq!(SCHEMA.len(), N_FEATURES);
        assert_eq!(SCHEMA[0], "gene_length");
        assert_eq!(SCHEMA[7], "in_frame_aug");
    }

    #[test]
    fn assemble_full_record() {
        let cfg = FeatureConfig::default();
        let ex = FeatureExtractor::new(&cfg, &length_oracle);
        let rec = ex.extract(&long_seq(), CdsHint::Search).unwrap();

        assert_eq!(rec.cds, CodingRegion { start: 50, stop: 68 });
        let f = rec.features;
        assert_eq!(f.gene_length, 21);
        assert_eq!(f.length_of_5prime_utr, 50);
        // AAAAAA|AUG|UCU: all nine checks pass
        assert_eq!(f.kozak_score, 9);
        assert_eq!(f.kozak_pos1, 1);
        assert_eq!(f.kozak_pos4, 2);
        assert_eq!(f.folding_energy_70, -7.0);
        assert_eq!(f.folding_energy_80, -8.0);
        assert_eq!(f.in_frame_aug, 3);
        assert!(!rec.degraded.any());
    }

    #[test]
    fn start_at_zero_degrades_kozak_context() {
        let cfg = FeatureConfig::default();
        let ex = FeatureExtractor::new(&cfg, &length_oracle);
        let rec = ex.extract(b"AUGGCCAAAUAGCC", CdsHint::Search).unwrap();
        let f = rec.features;
        assert_eq!((f.kozak_score, f.kozak_pos1, f.kozak_pos4), (0, 0, 0));
        assert_eq!(f.gene_length, 12);
        assert_eq!(f.length_of_5prime_utr, 0);
        assert_eq!(f.in_frame_aug, 1);
        assert!(rec.degraded.kozak_window);
        assert_eq!(rec.degraded.labels(), "kozak_window,five_prime_window,start_window");
    }

    #[test]
    fn record_recovers_coding_region() {
        let cfg = FeatureConfig::default();
        let ex = FeatureExtractor::new(&cfg, &length_oracle);
        let seq = long_seq();
        let rec = ex.extract(&seq, CdsHint::Search).unwrap();
        assert_eq!(rec.features.coding_region(), rec.cds);

        let again = ex
            .extract(&seq, CdsHint::Explicit { start: rec.cds.start, stop: rec.cds.stop })
            .unwrap();
        assert_eq!(again, rec);
    }

    #[test]
    fn assemble_is_deterministic() {
        let cfg = FeatureConfig::default();
        let ex = FeatureExtractor::new(&cfg, &length_oracle);
        let a = ex.extract(&long_seq(), CdsHint::Search).unwrap();
        let b = ex.extract(&long_seq(), CdsHint::Search).unwrap();
        assert_eq!(a.features.to_text_fields(), b.features.to_text_fields());
    }

    #[test]
    fn locator_and_oracle_failures_propagate() {
        let cfg = FeatureConfig::default();
        let ex = FeatureExtractor::new(&cfg, &length_oracle);
        assert!(matches!(ex.extract(b"", CdsHint::Search), Err(FeatureError::InvalidAlphabet { .. })));
        assert!(matches!(ex.extract(b"AUGCU", CdsHint::Search), Err(FeatureError::NoStopCodon { .. })));

        let down = |_: &[u8]| -> FoldResult<Folded> { Err(FoldError::Unavailable("gone".into())) };
        let ex = FeatureExtractor::new(&cfg, &down);
        assert!(matches!(
            ex.extract(&long_seq(), CdsHint::Search),
            Err(FeatureError::OracleUnavailable { .. })
        ));
    }

    #[test]
    fn text_fields_format_energies() {
        let v = FeatureVector {
            gene_length: 9,
            length_of_5prime_utr: 0,
            kozak_score: 0,
            kozak_pos1: 0,
            kozak_pos4: 0,
            folding_energy_70: -3.1,
            folding_energy_80: 0.0,
            in_frame_aug: 1,
        };
        assert_eq!(v.to_text_fields()[5], "-3.10");
        assert_eq!(v.to_text_fields()[6], "0.00");
        assert_eq!(v.to_row()[0], 9.0);
    }
}
