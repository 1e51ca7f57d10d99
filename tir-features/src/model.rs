//! 回归模型接口。
//!
//! 模型由调用方加载一次，以只读句柄注入；本 crate 只规定 `predict` 的形状：
//! 每行一个特征向量（SCHEMA 顺序），输出与输入行一一对应、顺序不变。

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::features::{N_FEATURES, SCHEMA};

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("cannot read model file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid model file: {0}")]
    Format(#[from] serde_json::Error),

    #[error("model schema mismatch: {0}")]
    Schema(String),
}

pub trait RegressionModel: Send + Sync {
    fn predict(&self, rows: &[[f64; N_FEATURES]]) -> Vec<f64>;
}

/// 线性模型：y = intercept + Σ weight[field] · x[field]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModelFile {
    pub intercept: f64,
    pub weights: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinearModel {
    intercept: f64,
    weights: [f64; N_FEATURES],
}

impl LinearModel {
    /// 权重必须恰好覆盖 SCHEMA 中的全部字段
    pub fn from_weights(file: LinearModelFile) -> Result<Self, ModelError> {
        if let Some(extra) = file.weights.keys().find(|k| !SCHEMA.iter().any(|s| s == k)) {
            return Err(ModelError::Schema(format!("unknown feature '{}'", extra)));
        }
        let mut weights = [0.0; N_FEATURES];
        for (w, name) in weights.iter_mut().zip(SCHEMA) {
            *w = *file
                .weights
                .get(name)
                .ok_or_else(|| ModelError::Schema(format!("missing weight for '{}'", name)))?;
        }
        Ok(Self { intercept: file.intercept, weights })
    }

    pub fn from_json_str(s: &str) -> Result<Self, ModelError> {
        Self::from_weights(serde_json::from_str(s)?)
    }

    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let f = std::fs::File::open(path)?;
        let file: LinearModelFile = serde_json::from_reader(std::io::BufReader::new(f))?;
        Self::from_weights(file)
    }
}

impl RegressionModel for LinearModel {
    fn predict(&self, rows: &[[f64; N_FEATURES]]) -> Vec<f64> {
        rows.iter()
            .map(|row| {
                self.intercept
                    + row
                        .iter()
                        .zip(self.weights.iter())
                        .map(|(x, w)| x * w)
                        .sum::<f64>()
            })
            .collect()
    }
}
