use anyhow::Result;
use serde::Serialize;

use crate::batch::BatchReport;
use crate::config::FeatureConfig;
use crate::features::SCHEMA;

/// 运行摘要（JSON），记录产生特征表时使用的约定，便于与模型训练时的约定核对
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub input: Option<String>,
    pub run_args: String,
    pub run_timestamp: String,
    pub schema: Vec<&'static str>,
    pub config: FeatureConfig,
    pub oracle: String,
    pub total: usize,
    pub ok: usize,
    pub degraded: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn new(input: Option<String>, config: &FeatureConfig, oracle: &str, report: &BatchReport) -> Self {
        Self {
            input,
            run_args: std::env::args().collect::<Vec<_>>().join(" "),
            run_timestamp: chrono::Utc::now().to_rfc3339(),
            schema: SCHEMA.to_vec(),
            config: config.clone(),
            oracle: oracle.to_string(),
            total: report.len(),
            ok: report.n_ok(),
            degraded: report.n_degraded(),
            failed: report.n_failed(),
        }
    }

    pub fn save_to_file(&self, path: &str) -> Result<()> {
        let f = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(f), self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_serializes_counts_and_convention() {
        let cfg = FeatureConfig::default();
        let s = RunSummary::new(Some("in.fa".into()), &cfg, "RNAfold", &BatchReport::default());
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(v["total"], 0);
        assert_eq!(v["schema"][5], "folding_energy_70");
        assert_eq!(v["config"]["windows"]["start_window"], "symmetric80");
        assert!(v["run_timestamp"].as_str().unwrap().contains('T'));
    }
}
