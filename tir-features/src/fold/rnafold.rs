//! ViennaRNA `RNAfold` 子进程封装。
//!
//! 每个窗口启动一次 `RNAfold --noPS`，序列写入 stdin，从 stdout 解析
//! dot-bracket 与 MFE。超过超时时间的子进程会被 kill。

use std::io::Write;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use super::{FoldError, FoldResult, Folded, FoldingOracle};

const POLL_INTERVAL: Duration = Duration::from_millis(2);

pub struct RnaFold {
    binary_path: String,
    timeout: Duration,
}

impl RnaFold {
    pub fn new(binary_path: impl Into<String>, timeout: Duration) -> Self {
        Self { binary_path: binary_path.into(), timeout }
    }

    pub fn binary_path(&self) -> &str {
        &self.binary_path
    }

    /// 检查可执行文件是否存在且能运行
    pub fn is_available(&self) -> bool {
        Command::new(&self.binary_path)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    fn run(&self, window: &[u8]) -> FoldResult<String> {
        let mut child = Command::new(&self.binary_path)
            .arg("--noPS")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| FoldError::Unavailable(format!("cannot start {}: {}", self.binary_path, e)))?;

        {
            let mut stdin = child
                .stdin
                .take()
                .ok_or_else(|| FoldError::Unavailable("stdin not captured".to_string()))?;
            stdin
                .write_all(window)
                .and_then(|_| stdin.write_all(b"\n"))
                .map_err(|e| FoldError::Unavailable(format!("cannot write to {}: {}", self.binary_path, e)))?;
            // stdin dropped here so RNAfold sees EOF
        }

        let deadline = Instant::now() + self.timeout;
        loop {
            match child.try_wait() {
                Ok(Some(_)) => break,
                Ok(None) if Instant::now() >= deadline => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(FoldError::Timeout(self.timeout));
                }
                Ok(None) => std::thread::sleep(POLL_INTERVAL),
                Err(e) => return Err(FoldError::Unavailable(format!("wait failed: {}", e))),
            }
        }

        let output = child
            .wait_with_output()
            .map_err(|e| FoldError::Unavailable(format!("cannot read output: {}", e)))?;
        if !output.status.success() {
            return Err(FoldError::Unavailable(format!(
                "{} exited with {}: {}",
                self.binary_path,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for RnaFold {
    fn default() -> Self {
        Self::new("RNAfold", Duration::from_secs(10))
    }
}

impl FoldingOracle for RnaFold {
    fn fold(&self, window: &[u8]) -> FoldResult<Folded> {
        let stdout = self.run(window)?;
        parse_rnafold_output(&stdout)
    }

    fn name(&self) -> &str {
        "RNAfold"
    }
}

/// 解析 RNAfold 输出，形如：
///
/// ```text
/// GGGGAAAACCCC
/// ((((....)))) ( -5.70)
/// ```
pub fn parse_rnafold_output(stdout: &str) -> FoldResult<Folded> {
    for line in stdout.lines().rev() {
        let line = line.trim_end();
        if !line.ends_with(')') {
            continue;
        }
        let Some(open) = line.rfind('(') else { continue };
        let inner = line[open + 1..line.len() - 1].trim();
        if let Ok(mfe) = inner.parse::<f64>() {
            let structure = line[..open].trim().to_string();
            if structure.is_empty() {
                continue;
            }
            return Ok(Folded { structure, mfe });
        }
    }
    Err(FoldError::Parse(format!("no energy line in output: {:?}", stdout.trim())))
}
