// src/models/outcome.rs
//! Outcomes returned by the credential client operations.
//!
//! Each operation resolves to exactly one variant of its outcome type. Failure
//! text is opaque: the raw response body for server rejections, the transport's
//! reason for connection problems, or a formatted diagnostic for local and
//! upstream configuration problems.

use url::Url;

/// Result of submitting a new implicit credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateCredentialOutcome {
    /// The server accepted the credential
    Success,
    /// A credential for this principal/provider already lives at the given location
    AlreadyExists(Url),
    /// The request was rejected or could not be completed
    Failure(String),
}

/// Result of replacing an existing implicit credential's token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateCredentialOutcome {
    Success,
    Failure(String),
}

/// Result of minting and registering a voucher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateVoucherOutcome {
    /// The voucher was registered; carries the bearer token to hand to the principal
    Success(String),
    Failure(String),
}

impl CreateCredentialOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl UpdateCredentialOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl CreateVoucherOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The voucher token, if the flow succeeded.
    pub fn token(&self) -> Option<&str> {
        match self {
            Self::Success(token) => Some(token),
            Self::Failure(_) => None,
        }
    }
}
