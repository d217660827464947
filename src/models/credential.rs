// src/models/credential.rs
//! Credential record data model.
//!
//! Defines the wire entity submitted to the authorization server's credential
//! endpoint. A record is built per call, serialized, sent and dropped; the
//! client never keeps one around.

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;
use uuid::Uuid;

/// Validation mechanism the authorization server applies to a credential.
///
/// # Variants
/// - `Implicit`: username/password pair checked directly by the server
/// - `Voucher`: server-issued, time-boxed bearer token used in place of a password
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialValidationMethod {
    Implicit,
    Voucher,
}

/// A login credential as understood by the authorization server.
///
/// # Fields
/// - `authorization_id`: principal the credential authenticates; the server's conflict key
/// - `method`: which validation mechanism applies, and therefore which fields matter
/// - `provider`: identity provider namespace the credential belongs to
/// - `user_id`: login identifier (username, or the simple-form id for vouchers)
/// - `token`: secret material (password or voucher token)
/// - `claims_providers`: optional claims sources, passed through untouched
///
/// # Serialization
/// Field names are PascalCase on the wire (`AuthorizationId`, `Method`, ...).
/// `ClaimsProviders` is omitted when empty.
///
/// # Security Considerations
/// - `Debug` output redacts `token`
/// - Records are never logged in full
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct CredentialRecord {
    pub authorization_id: Uuid,

    pub method: CredentialValidationMethod,

    pub provider: Url,

    pub user_id: String,

    pub token: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub claims_providers: Vec<Url>,
}

impl CredentialRecord {
    /// Builds an implicit (username/password) credential.
    ///
    /// # Arguments
    /// * `authorization_id` - Principal being authenticated
    /// * `provider` - Identity provider namespace
    /// * `username` - Login identifier
    /// * `password` - Plain password; hashing happens server-side
    pub fn implicit(authorization_id: Uuid, provider: Url, username: &str, password: &str) -> Self {
        Self {
            authorization_id,
            method: CredentialValidationMethod::Implicit,
            provider,
            user_id: username.to_string(),
            token: password.to_string(),
            claims_providers: Vec::new(),
        }
    }

    /// Builds a voucher credential.
    ///
    /// The login identifier is the authorization id in simple form, see
    /// [`simple_id`].
    pub fn voucher(authorization_id: Uuid, provider: Url, token: &str) -> Self {
        Self {
            authorization_id,
            method: CredentialValidationMethod::Voucher,
            provider,
            user_id: simple_id(&authorization_id),
            token: token.to_string(),
            claims_providers: Vec::new(),
        }
    }

    /// Attaches claims providers to the record.
    pub fn with_claims_providers(mut self, claims_providers: Vec<Url>) -> Self {
        self.claims_providers = claims_providers;
        self
    }
}

impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("authorization_id", &self.authorization_id)
            .field("method", &self.method)
            .field("provider", &self.provider.as_str())
            .field("user_id", &self.user_id)
            .field("token", &"<redacted>")
            .field("claims_providers", &self.claims_providers)
            .finish()
    }
}

/// Formats an identifier as 32 lowercase hex digits with no separators.
///
/// The server matches voucher login identifiers by string equality, so this
/// form must not change.
///
/// # Example
/// ```
/// use credential_session_client::models::credential::simple_id;
/// use uuid::Uuid;
///
/// let id = Uuid::parse_str("9f0c2e4a-5b1d-4c7e-8a3f-112233445566").unwrap();
/// assert_eq!(simple_id(&id), "9f0c2e4a5b1d4c7e8a3f112233445566");
/// ```
pub fn simple_id(id: &Uuid) -> String {
    id.simple().to_string()
}
