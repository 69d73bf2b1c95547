use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced while resolving credentials for one invocation.
///
/// Every variant aborts the current invocation only; nothing here is retried
/// and nothing crashes the process. `StoreCorrupted` is deliberately distinct
/// from "record absent": a record that fails its integrity check must never
/// send the caller down the fallback path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("no verified access token on the request")]
    Unauthenticated,
    #[error("access token carries no usable tenant claim")]
    IdentityMissing,
    #[error("credential store transport failure: {0}")]
    StoreTransport(String),
    #[error("credential record failed decryption or integrity check")]
    StoreCorrupted,
    #[error("invalid encryption key: {0}")]
    InvalidKey(String),
    #[error("credential bundle encoding error: {0}")]
    Encoding(String),
    #[error("crypto error: {0}")]
    Crypto(String),
}
