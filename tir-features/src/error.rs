//! 单条序列的特征提取错误。
//!
//! 所有变体都是“逐条”错误：批处理中只会让对应条目失败，不会中断整个批次。

use std::time::Duration;

use thiserror::Error;

use crate::fold::FoldError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FeatureError {
    #[error("invalid alphabet: {detail}")]
    InvalidAlphabet { detail: String },

    #[error("no start codon (AUG) found")]
    NoStartCodon,

    #[error("no in-frame stop codon found after start codon at {start}")]
    NoStopCodon { start: usize },

    #[error("invalid codon position {position}: expected {expected}, found {found}")]
    InvalidCodonPosition {
        position: usize,
        expected: &'static str,
        found: String,
    },

    #[error("folding oracle unavailable: {message}")]
    OracleUnavailable { message: String },

    #[error("folding oracle timed out after {after:?}")]
    OracleTimeout { after: Duration },
}

impl FeatureError {
    pub fn invalid_alphabet<S: Into<String>>(detail: S) -> Self {
        Self::InvalidAlphabet { detail: detail.into() }
    }

    /// 短标签，用于失败报告的 reason 列
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidAlphabet { .. } => "InvalidAlphabet",
            Self::NoStartCodon => "NoStartCodon",
            Self::NoStopCodon { .. } => "NoStopCodon",
            Self::InvalidCodonPosition { .. } => "InvalidCodonPosition",
            Self::OracleUnavailable { .. } => "OracleUnavailable",
            Self::OracleTimeout { .. } => "OracleTimeout",
        }
    }
}

impl From<FoldError> for FeatureError {
    fn from(err: FoldError) -> Self {
        match err {
            FoldError::Timeout(after) => Self::OracleTimeout { after },
            other => Self::OracleUnavailable { message: other.to_string() },
        }
    }
}

pub type FeatureResult<T> = Result<T, FeatureError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_errors_map_to_oracle_kinds() {
        let e: FeatureError = FoldError::Timeout(Duration::from_secs(2)).into();
        assert_eq!(e.kind(), "OracleTimeout");

        let e: FeatureError = FoldError::Unavailable("RNAfold not found".into()).into();
        assert_eq!(e.kind(), "OracleUnavailable");
        assert!(e.to_string().contains("RNAfold not found"));

        let e: FeatureError = FoldError::Parse("no energy".into()).into();
        assert!(matches!(e, FeatureError::OracleUnavailable { .. }));
    }

    #[test]
    fn display_includes_position_detail() {
        let e = FeatureError::InvalidCodonPosition {
            position: 41,
            expected: "AUG",
            found: "UGA".to_string(),
        };
        assert_eq!(e.to_string(), "invalid codon position 41: expected AUG, found UGA");
    }
}
