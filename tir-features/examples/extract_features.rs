//! 演示如何在 library 模式下使用 tir-features 提取特征并打分。
//!
//! 运行方式：
//! ```bash
//! cargo run --example extract_features
//! ```
//!
//! 这里用一个按 GC 含量估算能量的闭包代替 RNAfold，便于在没有 ViennaRNA 的环境中运行。

use tir_features::batch::{run_batch, BatchItem};
use tir_features::cds::CdsHint;
use tir_features::config::FeatureConfig;
use tir_features::features::{FeatureExtractor, SCHEMA};
use tir_features::fold::{FoldResult, Folded};

fn gc_energy(w: &[u8]) -> FoldResult<Folded> {
    let gc = w.iter().filter(|&&b| b == b'G' || b == b'C').count();
    Ok(Folded { structure: ".".repeat(w.len()), mfe: -0.25 * gc as f64 })
}

fn main() {
    // 1. 配置（默认：80 nt 对称窗口，Kozak 基线 0）
    let config = FeatureConfig::default();
    let extractor = FeatureExtractor::new(&config, &gc_energy);

    // 2. 单条序列
    let seq = b"GGCUUUCCAGCCACCAUGGCUAGCAAAGGAGAAGAACUUUUCACUGGAGUUGUCCCAAUUCUUGUUUAA";
    match extractor.extract(seq, CdsHint::Search) {
        Ok(rec) => {
            println!("CDS: start={} stop={}", rec.cds.start, rec.cds.stop);
            for (name, value) in SCHEMA.iter().zip(rec.features.to_text_fields()) {
                println!("  {:<22} {}", name, value);
            }
            if rec.degraded.any() {
                println!("  degraded: {}", rec.degraded.labels());
            }
        }
        Err(e) => println!("failed: {}", e),
    }

    // 3. 批处理：失败条目单独记录，不影响其他条目
    let items = vec![
        BatchItem { id: "ok".into(), seq: seq.to_vec(), hint: Ok(CdsHint::Search) },
        BatchItem { id: "no_stop".into(), seq: b"AUGCU".to_vec(), hint: Ok(CdsHint::Search) },
        BatchItem { id: "short".into(), seq: b"AUGGCCUAA".to_vec(), hint: Ok(CdsHint::Search) },
    ];
    let report = run_batch(&extractor, items);
    println!("\n批处理: {} ok, {} failed", report.n_ok(), report.n_failed());
    for f in report.failures() {
        println!("  #{} {}: {}", f.index, f.id, f.error);
    }
}
