use crate::config::WindowConfig;

/// 送入折叠预测器的两个结构窗口
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructuralWindows<'a> {
    pub five_prime: &'a [u8],
    pub start_centered: &'a [u8],
    /// 序列短于 five_prime_len，5′ 窗口被截断
    pub five_prime_truncated: bool,
    /// 起始窗口越界，被裁剪到序列范围内
    pub start_clipped: bool,
}

pub fn sample_windows<'a>(seq: &'a [u8], start: usize, cfg: &WindowConfig) -> StructuralWindows<'a> {
    let five_end = cfg.five_prime_len.min(seq.len());

    let want_lo = start as isize - cfg.upstream as isize;
    let want_hi = start + cfg.start_window.downstream();
    let lo = start.saturating_sub(cfg.upstream);
    let hi = want_hi.min(seq.len());
    // start 总在序列内，lo <= start < hi
    let lo = lo.min(hi);

    StructuralWindows {
        five_prime: &seq[..five_end],
        start_centered: &seq[lo..hi],
        five_prime_truncated: five_end < cfg.five_prime_len,
        start_clipped: want_lo < 0 || want_hi > seq.len(),
    }
}
