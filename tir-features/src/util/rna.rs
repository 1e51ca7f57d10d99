pub const START_CODON: &[u8; 3] = b"AUG";
pub const STOP_CODONS: [&[u8; 3]; 3] = [b"UAA", b"UAG", b"UGA"];
pub const CODON_LEN: usize = 3;

/// 位置编码的哨兵值（缺失或无法识别的碱基）
pub const SENTINEL_CODE: u8 = 0;

/// 类别编码 {A:1, U:2, G:3, C:4}，其他字符映射为哨兵 0
#[inline]
pub fn encode_base(b: u8) -> u8 {
    match b.to_ascii_uppercase() {
        b'A' => 1,
        b'U' => 2,
        b'G' => 3,
        b'C' => 4,
        _ => SENTINEL_CODE,
    }
}

#[inline]
pub fn is_rna_base(b: u8) -> bool {
    matches!(b, b'A' | b'U' | b'G' | b'C')
}

#[inline]
pub fn is_stop_codon(codon: &[u8]) -> bool {
    STOP_CODONS.iter().any(|s| &s[..] == codon)
}

#[inline]
pub fn is_start_codon(codon: &[u8]) -> bool {
    codon == &START_CODON[..]
}

/// 规范化输入：转大写，可选地把 DNA 的 T 转写为 U。
/// 不做合法性检查，非法字符原样保留，交给 `RnaSequence::new` 报错。
pub fn normalize_seq(seq: &[u8], transcribe_dna: bool) -> Vec<u8> {
    let mut out = Vec::with_capacity(seq.len());
    for &b in seq {
        let up = b.to_ascii_uppercase();
        let nb = match up {
            b'T' if transcribe_dna => b'U',
            _ => up,
        };
        out.push(nb);
    }
    out
}
