use std::fmt;

use crate::error::{FeatureError, FeatureResult};
use crate::util::rna;

/// 经过校验的 mRNA 序列：非空，且只包含 {A, U, G, C}。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RnaSequence {
    bases: Vec<u8>,
}

impl RnaSequence {
    pub fn new(bases: Vec<u8>) -> FeatureResult<Self> {
        if bases.is_empty() {
            return Err(FeatureError::invalid_alphabet("empty sequence"));
        }
        if let Some(pos) = bases.iter().position(|&b| !rna::is_rna_base(b)) {
            return Err(FeatureError::invalid_alphabet(format!(
                "unexpected character {:?} at position {}",
                bases[pos] as char, pos
            )));
        }
        Ok(Self { bases })
    }

    /// 先规范化（大写，可选 T→U）再校验
    pub fn parse(raw: &[u8], transcribe_dna: bool) -> FeatureResult<Self> {
        Self::new(rna::normalize_seq(raw, transcribe_dna))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bases
    }

    pub fn len(&self) -> usize {
        self.bases.len()
    }

    /// 校验保证非空；保留该方法以满足 clippy::len_without_is_empty
    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    /// 取 [pos, pos+3) 的密码子，越界返回 None
    pub fn codon_at(&self, pos: usize) -> Option<&[u8]> {
        self.bases.get(pos..pos.checked_add(rna::CODON_LEN)?)
    }
}

impl fmt::Display for RnaSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.bases))
    }
}
