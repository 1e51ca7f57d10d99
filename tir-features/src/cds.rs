use crate::error::{FeatureError, FeatureResult};
use crate::sequence::RnaSequence;
use crate::util::rna::{self, CODON_LEN};

/// 调用方对起止密码子位置的提示，决定定位器是“搜索”还是“校验”
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CdsHint {
    /// 搜索最左侧 AUG，再按读框搜索终止密码子
    #[default]
    Search,
    /// 校验给定起始位置是 AUG，再按读框搜索终止密码子
    FromStart(usize),
    /// 同时校验起始与终止位置
    Explicit { start: usize, stop: usize },
}

/// 编码区：[start, stop + 3)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodingRegion {
    pub start: usize,
    pub stop: usize,
}

impl CodingRegion {
    /// CDS 长度（含终止密码子）
    pub fn cds_len(&self) -> usize {
        self.stop - self.start + CODON_LEN
    }

    pub fn utr5_len(&self) -> usize {
        self.start
    }

    pub fn slice<'a>(&self, seq: &'a RnaSequence) -> &'a [u8] {
        &seq.as_bytes()[self.start..self.stop + CODON_LEN]
    }
}

pub fn locate_cds(seq: &RnaSequence, hint: CdsHint) -> FeatureResult<CodingRegion> {
    match hint {
        CdsHint::Search => {
            let start = find_start_codon(seq.as_bytes()).ok_or(FeatureError::NoStartCodon)?;
            let stop = find_in_frame_stop(seq.as_bytes(), start)
                .ok_or(FeatureError::NoStopCodon { start })?;
            Ok(CodingRegion { start, stop })
        }
        CdsHint::FromStart(start) => {
            expect_codon(seq, start, "AUG", rna::is_start_codon)?;
            let stop = find_in_frame_stop(seq.as_bytes(), start)
                .ok_or(FeatureError::NoStopCodon { start })?;
            Ok(CodingRegion { start, stop })
        }
        CdsHint::Explicit { start, stop } => {
            expect_codon(seq, start, "AUG", rna::is_start_codon)?;
            if stop < start + CODON_LEN || (stop - start) % CODON_LEN != 0 {
                return Err(FeatureError::InvalidCodonPosition {
                    position: stop,
                    expected: "in-frame stop codon after start",
                    found: format!("offset {} from start {}", stop as i64 - start as i64, start),
                });
            }
            expect_codon(seq, stop, "UAA/UAG/UGA", rna::is_stop_codon)?;
            // 终止位置必须是读框内第一个终止密码子
            if let Some(first) = find_in_frame_stop(seq.as_bytes(), start).filter(|&f| f < stop) {
                return Err(FeatureError::InvalidCodonPosition {
                    position: stop,
                    expected: "first in-frame stop codon",
                    found: format!("earlier stop codon at {}", first),
                });
            }
            Ok(CodingRegion { start, stop })
        }
    }
}

/// 最左侧 AUG 的偏移
pub fn find_start_codon(seq: &[u8]) -> Option<usize> {
    seq.windows(CODON_LEN).position(rna::is_start_codon)
}

/// 从 start + 3 开始按读框逐个密码子扫描终止密码子
pub fn find_in_frame_stop(seq: &[u8], start: usize) -> Option<usize> {
    let first = start + CODON_LEN;
    if first + CODON_LEN > seq.len() {
        return None;
    }
    (first..=seq.len() - CODON_LEN)
        .step_by(CODON_LEN)
        .find(|&i| rna::is_stop_codon(&seq[i..i + CODON_LEN]))
}

/// 按读框、不重叠地统计 CDS 内的 AUG 数（包括起始密码子本身）
pub fn count_in_frame_aug(cds: &[u8]) -> usize {
    cds.chunks_exact(CODON_LEN)
        .filter(|c| rna::is_start_codon(c))
        .count()
}

fn expect_codon(
    seq: &RnaSequence,
    pos: usize,
    expected: &'static str,
    accept: fn(&[u8]) -> bool,
) -> FeatureResult<()> {
    match seq.codon_at(pos) {
        Some(codon) if accept(codon) => Ok(()),
        Some(codon) => Err(FeatureError::InvalidCodonPosition {
            position: pos,
            expected,
            found: String::from_utf8_lossy(codon).into_owned(),
        }),
        None => Err(FeatureError::InvalidCodonPosition {
            position: pos,
            expected,
            found: format!("end of sequence (length {})", seq.len()),
        }),
    }
}
