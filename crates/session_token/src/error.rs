use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid token format")]
    TokenFormat,
    #[error("invalid base64url encoding")]
    Base64,
    #[error("invalid json")]
    Json(#[from] serde_json::Error),
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlg(String),
    #[error("signing key must be at least {minimum} bytes, got {actual}")]
    KeyTooShort { actual: usize, minimum: usize },
    #[error("signing key rejected by HMAC")]
    InvalidKey,
    #[error("invalid signature")]
    InvalidSignature,
    #[error("invalid issued-at")]
    InvalidIat,
    #[error("token expired")]
    Expired,
}
