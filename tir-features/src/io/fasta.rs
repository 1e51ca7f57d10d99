use anyhow::Result;
use std::io::BufRead;

use crate::cds::CdsHint;
use crate::error::{FeatureError, FeatureResult};

/// 一条输入序列。`start` / `stop` 来自 FASTA 头中的 `start=<n>` / `stop=<n>`。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    pub id: String,
    pub desc: Option<String>,
    pub seq: Vec<u8>,
    pub start: Option<usize>,
    pub stop: Option<usize>,
    /// 无法解析的位置 token（如 `start=x`），在 `hint()` 中作为该条目的错误返回
    pub bad_position: Option<String>,
}

impl SequenceRecord {
    pub fn new(id: impl Into<String>, seq: Vec<u8>) -> Self {
        Self { id: id.into(), desc: None, seq, start: None, stop: None, bad_position: None }
    }

    /// 给了起始就校验，否则搜索；只给终止不给起始视为非法位置
    pub fn hint(&self) -> FeatureResult<CdsHint> {
        if let Some(tok) = &self.bad_position {
            return Err(FeatureError::InvalidCodonPosition {
                position: 0,
                expected: "a non-negative integer position",
                found: format!("'{}'", tok),
            });
        }
        match (self.start, self.stop) {
            (None, None) => Ok(CdsHint::Search),
            (Some(start), None) => Ok(CdsHint::FromStart(start)),
            (Some(start), Some(stop)) => Ok(CdsHint::Explicit { start, stop }),
            (None, Some(stop)) => Err(FeatureError::InvalidCodonPosition {
                position: stop,
                expected: "a start position alongside the stop position",
                found: "stop only".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    Unknown,
    /// `>` 头 + 多行序列
    Fasta,
    /// 每个非空行是一条序列
    Lines,
}

/// 读取 FASTA 或逐行序列列表；格式由第一个非空行决定。
///
/// 逐行格式中也可以出现 `>` 头，它只为紧随其后的那一行序列提供 id 和位置。
pub struct SequenceReader<R: BufRead> {
    reader: R,
    buf: String,
    done: bool,
    layout: Layout,
    peek_header: Option<String>,
    n_read: usize,
}

impl<R: BufRead> SequenceReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: String::new(),
            done: false,
            layout: Layout::Unknown,
            peek_header: None,
            n_read: 0,
        }
    }

    pub fn next_record(&mut self) -> Result<Option<SequenceRecord>> {
        if self.done {
            return Ok(None);
        }
        loop {
            match self.layout {
                Layout::Fasta => return self.next_fasta(),
                Layout::Lines => return self.next_line(),
                Layout::Unknown => {
                    self.buf.clear();
                    if self.reader.read_line(&mut self.buf)? == 0 {
                        self.done = true;
                        return Ok(None);
                    }
                    let line = self.buf.trim();
                    if line.is_empty() {
                        continue;
                    }
                    if let Some(h) = line.strip_prefix('>') {
                        self.peek_header = Some(h.trim().to_string());
                        self.layout = Layout::Fasta;
                    } else {
                        let seq = clean_bases(line);
                        self.layout = Layout::Lines;
                        return Ok(Some(self.unnamed(seq)));
                    }
                }
            }
        }
    }

    pub fn read_all(&mut self) -> Result<Vec<SequenceRecord>> {
        let mut out = Vec::new();
        while let Some(rec) = self.next_record()? {
            out.push(rec);
        }
        Ok(out)
    }

    fn unnamed(&mut self, seq: Vec<u8>) -> SequenceRecord {
        self.n_read += 1;
        SequenceRecord::new(format!("seq{}", self.n_read), seq)
    }

    fn next_line(&mut self) -> Result<Option<SequenceRecord>> {
        loop {
            self.buf.clear();
            if self.reader.read_line(&mut self.buf)? == 0 {
                self.done = true;
                // 末尾孤立的头部仍产出一条空记录，交给校验阶段报错
                return Ok(self.peek_header.take().map(|h| self.named(&h, Vec::new())));
            }
            let line = self.buf.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(h) = line.strip_prefix('>') {
                self.peek_header = Some(h.trim().to_string());
                continue;
            }
            let seq = clean_bases(line);
            return Ok(Some(match self.peek_header.take() {
                Some(header) => self.named(&header, seq),
                None => self.unnamed(seq),
            }));
        }
    }

    /// 按头部建记录：第一个 token 为 id，其余为描述（含位置 token）
    fn named(&mut self, header: &str, seq: Vec<u8>) -> SequenceRecord {
        self.n_read += 1;
        let mut parts = header.splitn(2, char::is_whitespace);
        let id = parts.next().unwrap_or("").to_string();
        let desc = parts
            .next()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let positions = desc.as_deref().map(parse_positions).unwrap_or_default();

        SequenceRecord {
            id: if id.is_empty() { format!("seq{}", self.n_read) } else { id },
            desc,
            seq,
            start: positions.start,
            stop: positions.stop,
            bad_position: positions.bad,
        }
    }

    fn next_fasta(&mut self) -> Result<Option<SequenceRecord>> {
        let Some(header) = self.peek_header.take() else {
            self.done = true;
            return Ok(None);
        };

        // Read sequence lines
        let mut seq: Vec<u8> = Vec::new();
        loop {
            self.buf.clear();
            let n = self.reader.read_line(&mut self.buf)?;
            if n == 0 {
                self.done = true;
                break;
            }
            if let Some(h) = self.buf.strip_prefix('>') {
                self.peek_header = Some(h.trim().to_string());
                break;
            }
            seq.extend(clean_bases(&self.buf));
        }

        Ok(Some(self.named(&header, seq)))
    }
}

/// 去掉空白并转大写；其他字符保留给校验阶段报告
fn clean_bases(line: &str) -> Vec<u8> {
    line.bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .map(|b| b.to_ascii_uppercase())
        .collect()
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Positions {
    start: Option<usize>,
    stop: Option<usize>,
    bad: Option<String>,
}

/// 解析描述中的 `start=<n>` / `stop=<n>`，其他 token 忽略；
/// 解析失败的 token 记下来，留给该条目报错
fn parse_positions(desc: &str) -> Positions {
    let mut pos = Positions::default();
    for tok in desc.split_whitespace() {
        let (slot, v) = if let Some(v) = tok.strip_prefix("start=") {
            (&mut pos.start, v)
        } else if let Some(v) = tok.strip_prefix("stop=") {
            (&mut pos.stop, v)
        } else {
            continue;
        };
        match v.parse() {
            Ok(n) => *slot = Some(n),
            Err(_) => {
                pos.bad.get_or_insert_with(|| tok.to_string());
            }
        }
    }
    pos
}
