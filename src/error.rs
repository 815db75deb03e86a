//! Error taxonomy for sync runs.

use thiserror::Error;

/// Errors with dedicated user-facing behavior.
///
/// Everything else travels as a plain `anyhow::Error` with context and aborts
/// the run for the requested resource kind.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The config.json holding the account credentials is absent or unreadable.
    #[error("No configuration file named: {0} could be found.")]
    ConfigurationMissing(String),

    /// push/edit/validate was requested for a kind with no local files.
    #[error("No {0} are locally available. Consider pulling {0} first.")]
    NoLocalFiles(String),

    /// The (action, kind) pair has no handler.
    #[error("'{action} {kind}' is not supported")]
    UnsupportedOperation { action: String, kind: String },

    /// The API answered with an error status. On the push path this is
    /// reported per instance and the run continues with the next one;
    /// everywhere else it aborts the run.
    #[error("API request failed: {status}: {detail}")]
    RemoteApi { status: u16, detail: String },
}
