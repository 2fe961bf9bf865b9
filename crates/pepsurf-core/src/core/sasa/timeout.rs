use super::{OracleError, SasaOracle, SasaResult};
use crate::core::models::residue::Residue;
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_ORACLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Runs the wrapped oracle on a worker thread and gives up after `timeout`.
///
/// A timed-out worker is detached, not killed; its result is discarded when
/// it eventually arrives. Every residue of a timed-out batch fails with
/// [`OracleError::Timeout`].
pub struct TimeoutOracle<O: SasaOracle + 'static> {
    inner: Arc<O>,
    timeout: Duration,
}

impl<O: SasaOracle + 'static> TimeoutOracle<O> {
    pub fn new(inner: O, timeout: Duration) -> Self {
        Self {
            inner: Arc::new(inner),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn fail_all(&self, count: usize, error: OracleError) -> Vec<SasaResult> {
        vec![Err(error); count]
    }
}

impl<O: SasaOracle + 'static> SasaOracle for TimeoutOracle<O> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn sasa(&self, residues: &[Residue]) -> Vec<SasaResult> {
        let (sender, receiver) = mpsc::channel();
        let inner = Arc::clone(&self.inner);
        let batch = residues.to_vec();

        let spawned = thread::Builder::new()
            .name("sasa-oracle".to_string())
            .spawn(move || {
                let areas = inner.sasa(&batch);
                // The receiver is gone if the caller already timed out.
                let _ = sender.send(areas);
            });

        if let Err(e) = spawned {
            return self.fail_all(
                residues.len(),
                OracleError::Unavailable {
                    message: format!("failed to start oracle worker: {}", e),
                },
            );
        }

        match receiver.recv_timeout(self.timeout) {
            Ok(areas) => areas,
            Err(RecvTimeoutError::Timeout) => {
                warn!(
                    oracle = self.inner.name(),
                    timeout_secs = self.timeout.as_secs_f64(),
                    "SASA oracle timed out; marking batch as unknown."
                );
                self.fail_all(
                    residues.len(),
                    OracleError::Timeout {
                        seconds: self.timeout.as_secs_f64(),
                    },
                )
            }
            Err(RecvTimeoutError::Disconnected) => self.fail_all(
                residues.len(),
                OracleError::Unavailable {
                    message: "oracle worker terminated without a result".to_string(),
                },
            ),
        }
    }
}
