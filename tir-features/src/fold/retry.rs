use std::time::Duration;

use super::{FoldError, FoldResult, Folded, FoldingOracle};

/// 对 `Unavailable` 做有限次指数退避重试；超时与解析错误直接返回。
pub struct Retrying<O> {
    inner: O,
    max_retries: u32,
    backoff: Duration,
}

impl<O: FoldingOracle> Retrying<O> {
    pub fn new(inner: O, max_retries: u32, backoff: Duration) -> Self {
        Self { inner, max_retries, backoff }
    }

    pub fn inner(&self) -> &O {
        &self.inner
    }
}

impl<O: FoldingOracle> FoldingOracle for Retrying<O> {
    fn fold(&self, window: &[u8]) -> FoldResult<Folded> {
        let mut delay = self.backoff;
        let mut attempt = 0u32;
        loop {
            match self.inner.fold(window) {
                Err(FoldError::Unavailable(msg)) if attempt < self.max_retries => {
                    attempt += 1;
                    log::debug!(
                        "{} unavailable ({}), retry {}/{} in {:?}",
                        self.inner.name(),
                        msg,
                        attempt,
                        self.max_retries,
                        delay
                    );
                    std::thread::sleep(delay);
                    delay = delay.saturating_mul(2);
                }
                other => return other,
            }
        }
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
