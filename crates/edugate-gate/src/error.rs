//! Gate error types.

use thiserror::Error;

/// Result type for gate operations.
pub type GateResult<T> = Result<T, GateError>;

/// Reasons a request to a protected path is not admitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    /// No session credential accompanied the request.
    #[error("missing session credential")]
    MissingCredential,

    /// The credential could not be decoded or verified.
    #[error("malformed session credential: {0}")]
    MalformedCredential(String),

    /// The credential expired before the request was evaluated.
    #[error("session expired at {expired_at}")]
    ExpiredCredential {
        /// Expiry claim, seconds since the Unix epoch.
        expired_at: i64,
    },

    /// The session role is not admitted by a matching route rule.
    #[error("role {role} may not access {prefix}")]
    InsufficientRole { role: String, prefix: String },
}

impl GateError {
    /// Returns whether the caller has to authenticate again.
    pub fn requires_login(&self) -> bool {
        !matches!(self, GateError::InsufficientRole { .. })
    }
}

impl From<DecodeError> for GateError {
    fn from(err: DecodeError) -> Self {
        GateError::MalformedCredential(err.to_string())
    }
}

/// Errors produced while turning a raw credential into session claims.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The token failed signature verification.
    #[error("invalid signature")]
    InvalidSignature,

    /// The token is not a well-formed session token.
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// The role claim is not a known role.
    #[error("unknown role: {0}")]
    UnknownRole(String),

    /// A claim needed to build a session identity is absent.
    #[error("missing claim: {0}")]
    MissingClaim(&'static str),

    /// A claim is present but does not parse.
    #[error("invalid {claim} claim: {value}")]
    InvalidClaim { claim: &'static str, value: String },

    /// The expiry claim is outside the representable range.
    #[error("expiry out of range: {0}")]
    ExpiryOutOfRange(i64),
}

impl From<jsonwebtoken::errors::Error> for DecodeError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            jsonwebtoken::errors::ErrorKind::InvalidSignature => DecodeError::InvalidSignature,
            _ => DecodeError::InvalidToken(err.to_string()),
        }
    }
}
