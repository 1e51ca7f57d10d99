//! 折叠自由能预测器（外部协作者）。
//!
//! 引擎不实现折叠算法，只通过 [`FoldingOracle`] 调用：给定窗口序列，返回二级结构
//! 和最小自由能（MFE）。预测器由调用方创建一次并在线程间只读共享。

use std::time::Duration;

use thiserror::Error;

pub mod retry;
pub mod rnafold;

pub use retry::Retrying;
pub use rnafold::RnaFold;

#[derive(Debug, Clone, PartialEq)]
pub struct Folded {
    /// dot-bracket 表示
    pub structure: String,
    /// kcal/mol
    pub mfe: f64,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FoldError {
    #[error("folding tool unavailable: {0}")]
    Unavailable(String),

    #[error("folding timed out after {0:?}")]
    Timeout(Duration),

    #[error("cannot parse folding output: {0}")]
    Parse(String),
}

pub type FoldResult<T> = Result<T, FoldError>;

pub trait FoldingOracle: Send + Sync {
    fn fold(&self, window: &[u8]) -> FoldResult<Folded>;

    fn name(&self) -> &str {
        "oracle"
    }
}

impl<F> FoldingOracle for F
where
    F: Fn(&[u8]) -> FoldResult<Folded> + Send + Sync,
{
    fn fold(&self, window: &[u8]) -> FoldResult<Folded> {
        self(window)
    }

    fn name(&self) -> &str {
        "closure"
    }
}

/// 保留两位小数；-0.00 归一为 0.00
#[inline]
pub fn round_energy(mfe: f64) -> f64 {
    let r = (mfe * 100.0).round() / 100.0;
    if r == 0.0 { 0.0 } else { r }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_oracles() {
        let oracle = |w: &[u8]| -> FoldResult<Folded> {
            Ok(Folded { structure: ".".repeat(w.len()), mfe: -(w.len() as f64) / 10.0 })
        };
        let f = oracle.fold(b"ACGUA").unwrap();
        assert_eq!(f.structure, ".....");
        assert_eq!(f.mfe, -0.5);
    }

    #[test]
    fn rounding_to_two_decimals() {
        assert_eq!(round_energy(-12.345_6), -12.35);
        assert_eq!(format!("{:.2}", round_energy(-0.004)), "0.00");
        assert_eq!(round_energy(3.1), 3.1);
    }
}
