use crate::config::KozakConfig;
use crate::util::rna::{encode_base, CODON_LEN, SENTINEL_CODE};

/// 起始密码子上游/下游需要的碱基数
pub const KOZAK_UPSTREAM: usize = 6;
pub const KOZAK_DOWNSTREAM: usize = 3;

/// 九个共识检查，按窗口下标：−6 −5 −4 −3 −2 −1 +3 +4 +5（相对 AUG 的 A）。
/// 这里 +3 即 `start + 3`；`pos4` 读的就是这一位，名字沿用 Kozak 的 1 起编号（A=+1）。
const CONSENSUS: [&[u8]; 9] = [
    b"AU", // -6
    b"A",  // -5
    b"AC", // -4
    b"A",  // -3
    b"AC", // -2
    b"A",  // -1
    b"U",  // +3
    b"C",  // +4
    b"UC", // +5
];

/// Kozak 上下文结果。窗口不完整时为 `Degraded`，不是错误。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KozakContext {
    Scored { score: u32, pos1: u8, pos4: u8 },
    Degraded,
}

impl KozakContext {
    pub fn score(&self) -> u32 {
        match *self {
            Self::Scored { score, .. } => score,
            Self::Degraded => 0,
        }
    }

    pub fn pos1(&self) -> u8 {
        match *self {
            Self::Scored { pos1, .. } => pos1,
            Self::Degraded => SENTINEL_CODE,
        }
    }

    pub fn pos4(&self) -> u8 {
        match *self {
            Self::Scored { pos4, .. } => pos4,
            Self::Degraded => SENTINEL_CODE,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded)
    }
}

/// 取 [start−6, start) ++ [start+3, start+6) 组成的 9 碱基窗口
pub fn kozak_window(seq: &[u8], start: usize) -> Option<[u8; 9]> {
    if start < KOZAK_UPSTREAM || seq.len() < start + CODON_LEN + KOZAK_DOWNSTREAM {
        return None;
    }
    let mut w = [0u8; 9];
    w[..6].copy_from_slice(&seq[start - KOZAK_UPSTREAM..start]);
    w[6..].copy_from_slice(&seq[start + CODON_LEN..start + CODON_LEN + KOZAK_DOWNSTREAM]);
    Some(w)
}

pub fn consensus_matches(window: &[u8; 9]) -> u32 {
    window
        .iter()
        .zip(CONSENSUS.iter())
        .filter(|(b, allowed)| allowed.contains(*b))
        .count() as u32
}

pub fn kozak_features(seq: &[u8], start: usize, cfg: &KozakConfig) -> KozakContext {
    let Some(window) = kozak_window(seq, start) else {
        return KozakContext::Degraded;
    };
    // pos1 的锚点可配置（start−6 / start−5），都落在窗口之内
    let pos1 = encode_base(seq[start - cfg.pos1_anchor.upstream_offset()]);
    // Kozak 编号中的 +4，即 AUG 之后的第一个碱基
    let pos4 = encode_base(seq[start + CODON_LEN]);
    KozakContext::Scored {
        score: consensus_matches(&window) + cfg.baseline,
        pos1,
        pos4,
    }
}
