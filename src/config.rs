//! Runtime configuration of a cover session.

use std::path::PathBuf;
use std::time::Duration;
use crate::oracle::OracleKind;

/// Default wall-clock budget of a single SAT attempt.
///
/// A timed-out attempt raises its oracle's interrupt flag. `varisat` does not observe it, so its
/// worker thread keeps running until the abandoned solve finishes.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10 * 60);

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SolveConfig {
    /// Budget per SAT attempt, `None` runs attempts inline without a limit.
    pub timeout: Option<Duration>,
    pub oracle: OracleKind,
    /// File to append experiment records (covers and execution times) to.
    pub record: Option<PathBuf>,
}

impl Default for SolveConfig {
    fn default() -> Self {
        SolveConfig {
            timeout: Some(DEFAULT_TIMEOUT),
            oracle: OracleKind::default(),
            record: None,
        }
    }
}

impl SolveConfig {

    /// Sets the per-attempt budget in seconds, `0` disables it.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = if secs == 0 {
            None
        } else {
            Some(Duration::from_secs(secs))
        };
        self
    }

    pub fn with_oracle(mut self, oracle: OracleKind) -> Self {
        self.oracle = oracle;
        self
    }

    pub fn with_record(mut self, record: Option<PathBuf>) -> Self {
        self.record = record;
        self
    }
}
