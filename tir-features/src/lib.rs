//! # tir-features
//!
//! 翻译起始速率（TIR）回归模型的 mRNA 特征提取引擎。
//!
//! 对每条序列：
//!
//! - **CDS 定位**：搜索最左侧 AUG 与同读框终止密码子，或校验调用方给出的位置
//! - **Kozak 上下文**：起始密码子周围 9 碱基窗口的共识得分与两个位置的类别编码
//! - **结构窗口**：5′ 端 70 nt 窗口与以起始密码子为中心的窗口，交给外部折叠预测器求 MFE
//! - **特征向量**：按固定 schema 组装，降级（哨兵值 / 裁剪窗口）显式标记
//!
//! ## 快速示例
//!
//! ```rust
//! use tir_features::cds::CdsHint;
//! use tir_features::config::FeatureConfig;
//! use tir_features::features::FeatureExtractor;
//! use tir_features::fold::{FoldResult, Folded};
//!
//! // 任何 Fn(&[u8]) -> FoldResult<Folded> 都可以作为折叠预测器
//! fn flat(w: &[u8]) -> FoldResult<Folded> {
//!     Ok(Folded { structure: ".".repeat(w.len()), mfe: 0.0 })
//! }
//!
//! let config = FeatureConfig::default();
//! let extractor = FeatureExtractor::new(&config, &flat);
//! let rec = extractor.extract(b"GCCACCAUGGCUUAA", CdsHint::Search).unwrap();
//! assert_eq!(rec.features.length_of_5prime_utr, 6);
//! assert_eq!(rec.features.gene_length, 9);
//! ```
//!
//! ## 模块说明
//!
//! - [`cds`] — CDS 定位与同读框 AUG 计数
//! - [`kozak`] — Kozak 共识得分与位置编码
//! - [`window`] — 折叠窗口采样
//! - [`fold`] — 折叠预测器接口、RNAfold 子进程封装与重试
//! - [`features`] — 特征向量 schema 与组装
//! - [`batch`] — 并行批处理、逐条失败收集
//! - [`model`] — 回归模型接口与线性模型
//! - [`io`] — FASTA / 逐行序列读取，CSV / TSV 输出
//! - [`config`] — 配置（TOML）

pub mod batch;
pub mod cds;
pub mod config;
pub mod error;
pub mod features;
pub mod fold;
pub mod io;
pub mod kozak;
pub mod model;
pub mod report;
pub mod sequence;
pub mod util;
pub mod window;

pub use error::{FeatureError, FeatureResult};
