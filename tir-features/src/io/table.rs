use anyhow::Result;
use std::io::Write;

use crate::batch::{BatchReport, ItemFailure};
use crate::features::SCHEMA;

/// 特征表：`id` + SCHEMA 列 + `degraded`，可选追加 `predicted_tir`
pub fn write_feature_csv<W: Write>(out: W, report: &BatchReport, predictions: Option<&[f64]>) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);

    let mut header: Vec<&str> = Vec::with_capacity(SCHEMA.len() + 3);
    header.push("id");
    header.extend(SCHEMA);
    header.push("degraded");
    if predictions.is_some() {
        header.push("predicted_tir");
    }
    wtr.write_record(&header)?;

    for (i, item) in report.successes().enumerate() {
        let mut row: Vec<String> = Vec::with_capacity(header.len());
        row.push(item.id.clone());
        row.extend(item.record.features.to_text_fields());
        row.push(item.record.degraded.labels());
        if let Some(p) = predictions {
            let v = p
                .get(i)
                .ok_or_else(|| anyhow::anyhow!("missing prediction for row {} ('{}')", i, item.id))?;
            row.push(format!("{:.4}", v));
        }
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// 失败条目：TSV，index 为输入中从 0 开始的序号
pub fn write_failures_tsv<W: Write>(out: W, failures: &[&ItemFailure]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().delimiter(b'\t').from_writer(out);
    wtr.write_record(["index", "id", "kind", "reason"])?;
    for f in failures {
        wtr.write_record([
            f.index.to_string(),
            f.id.clone(),
            f.error.kind().to_string(),
            f.error.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::{run_batch, BatchItem};
    use crate::cds::CdsHint;
    use crate::config::FeatureConfig;
    use crate::features::FeatureExtractor;
    use crate::fold::{FoldResult, Folded};

    fn flat_oracle(w: &[u8]) -> FoldResult<Folded> {
        Ok(Folded { structure: ".".repeat(w.len()), mfe: -1.234 })
    }

    fn report() -> BatchReport {
        let cfg = FeatureConfig::default();
        let ex = FeatureExtractor::new(&cfg, &flat_oracle);
        let items = vec![
            BatchItem { id: "a".into(), seq: b"AUGGCCUAA".to_vec(), hint: Ok(CdsHint::Search) },
            BatchItem { id: "b".into(), seq: b"AUGCU".to_vec(), hint: Ok(CdsHint::Search) },
        ];
        run_batch(&ex, items)
    }

    #[test]
    fn feature_csv_layout() {
        let mut buf = Vec::new();
        write_feature_csv(&mut buf, &report(), None).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "id,gene_length,length_of_5prime_utr,kozak_score,kozak_pos1,kozak_pos4,folding_energy_70,folding_energy_80,in_frame_aug,degraded"
        );
        assert_eq!(lines[1], "a,9,0,0,0,0,-1.23,-1.23,1,\"kozak_window,five_prime_window,start_window\"");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn prediction_column_is_appended() {
        let mut buf = Vec::new();
        write_feature_csv(&mut buf, &report(), Some(&[0.5])).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.lines().next().unwrap().ends_with(",degraded,predicted_tir"));
        assert!(text.lines().nth(1).unwrap().ends_with(",0.5000"));
    }

    #[test]
    fn failures_tsv_layout() {
        let r = report();
        let mut buf = Vec::new();
        write_failures_tsv(&mut buf, &r.failures().collect::<Vec<_>>()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "index\tid\tkind\treason");
        assert_eq!(
            lines[1],
            "1\tb\tNoStopCodon\tno in-frame stop codon found after start codon at 0"
        );
    }
}
