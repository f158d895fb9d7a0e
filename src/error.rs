// Counter read errors

use crate::models::Domain;

/// Failure of a single domain read. Never fatal to the sampler: the domain
/// keeps its previous value for the cycle.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("{0} counters are not available on this platform")]
    Unsupported(Domain),
    #[error("failed to read {path}: {source}")]
    Io {
        path: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed {what}: {detail}")]
    Parse { what: &'static str, detail: String },
    #[error("{0} lock poisoned")]
    LockPoisoned(&'static str),
    #[error("blocking read task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
