//! 特征提取配置。
//!
//! 下游模型是在某一种特定约定下训练的，因此窗口宽度、Kozak 基线和 pos1 锚点
//! 都是显式参数。默认值对应参考特征脚本的行为：80 nt 对称起始窗口、基线 0、
//! pos1 取 start−6。同一次运行内这些参数保持不变。

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeatureConfig {
    /// 把输入中的 T 转写为 U（DNA 输入）；默认关闭，T 视为非法字符
    pub transcribe_dna: bool,
    pub kozak: KozakConfig,
    pub windows: WindowConfig,
    pub oracle: OracleConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KozakConfig {
    /// 加到匹配数上的常数；部分历史版本固定 +1
    pub baseline: u32,
    pub pos1_anchor: Pos1Anchor,
}

/// kozak_pos1 读取的上游位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Pos1Anchor {
    /// start − 6
    #[default]
    Minus6,
    /// start − 5
    Minus5,
}

impl Pos1Anchor {
    pub fn upstream_offset(self) -> usize {
        match self {
            Self::Minus6 => 6,
            Self::Minus5 => 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    /// 5′ 端窗口长度
    pub five_prime_len: usize,
    /// 起始密码子上游取多少碱基
    pub upstream: usize,
    pub start_window: StartWindow,
}

/// 起始密码子中心窗口的下游约定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum StartWindow {
    /// start−40 .. start+40
    #[default]
    Symmetric80,
    /// start−40 .. start+43
    Asymmetric83,
}

impl StartWindow {
    pub fn downstream(self) -> usize {
        match self {
            Self::Symmetric80 => 40,
            Self::Asymmetric83 => 43,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OracleConfig {
    /// RNAfold 可执行文件路径或名称
    pub binary: String,
    pub timeout_ms: u64,
    /// OracleUnavailable 的最大重试次数（不含首次调用）
    pub max_retries: u32,
    /// 首次重试前的等待；之后每次翻倍
    pub backoff_ms: u64,
}

impl Default for KozakConfig {
    fn default() -> Self {
        Self { baseline: 0, pos1_anchor: Pos1Anchor::Minus6 }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            five_prime_len: 70,
            upstream: 40,
            start_window: StartWindow::Symmetric80,
        }
    }
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            binary: "RNAfold".to_string(),
            timeout_ms: 10_000,
            max_retries: 3,
            backoff_ms: 100,
        }
    }
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            transcribe_dna: false,
            kozak: KozakConfig::default(),
            windows: WindowConfig::default(),
            oracle: OracleConfig::default(),
        }
    }
}

impl FeatureConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("invalid feature configuration")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config '{}'", path.display()))?;
        Self::from_toml_str(&text)
            .with_context(|| format!("while parsing config '{}'", path.display()))
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("cannot serialize configuration")
    }
}
