// src/tokens/voucher.rs
//! Voucher token generation.
//!
//! A voucher is a time-boxed bearer token that stands in for a password. The
//! generator only reports configuration problems: a setting that is absent, or
//! one that is present but unusable. Both carry the setting's name so the
//! caller can tell an operator exactly what to fix.

use crate::models::credential::simple_id;
use crate::settings::VoucherSettings;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;
use uuid::Uuid;

/// Shortest HMAC secret accepted for HS256 signing, in bytes.
pub const MIN_SIGNING_KEY_LEN: usize = 32;

const SIGNING_KEY_SETTING: &str = "voucher.signing_key";
const ISSUER_SETTING: &str = "voucher.issuer";
const DURATION_SETTING: &str = "voucher duration";

/// Configuration problems reported by a voucher generator.
///
/// The `Display` form is the diagnostic handed back to callers of
/// `create_voucher`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VoucherError {
    #[error("Server missing configuration setting:{0}")]
    MissingSetting(String),

    #[error("Server misconfigured:\nsetting:{setting}\nissue:{issue}")]
    Misconfigured { setting: String, issue: String },
}

/// Produces signed voucher tokens.
#[async_trait]
pub trait VoucherTokenGenerator: Send + Sync {
    /// Mints a token for `subject_id` that stops being valid at `expires_at`.
    async fn generate_token(
        &self,
        subject_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<String, VoucherError>;
}

/// Claims carried by a voucher token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoucherClaims {
    /// Subject, the authorization id in simple form
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

/// HS256 JWT voucher generator.
///
/// Settings are checked on every call rather than at construction, so a
/// misconfigured deployment still gets a named diagnostic per request.
#[derive(Clone)]
pub struct JwtVoucherGenerator {
    signing_key: Option<String>,
    issuer: Option<String>,
}

impl JwtVoucherGenerator {
    pub fn new(signing_key: Option<String>, issuer: Option<String>) -> Self {
        Self {
            signing_key,
            issuer,
        }
    }

    pub fn from_settings(settings: &VoucherSettings) -> Self {
        Self::new(settings.signing_key.clone(), settings.issuer.clone())
    }

    fn signing_key(&self) -> Result<&str, VoucherError> {
        let key = self
            .signing_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| VoucherError::MissingSetting(SIGNING_KEY_SETTING.to_string()))?;

        if key.len() < MIN_SIGNING_KEY_LEN {
            return Err(VoucherError::Misconfigured {
                setting: SIGNING_KEY_SETTING.to_string(),
                issue: format!(
                    "key is {} bytes, at least {} required",
                    key.len(),
                    MIN_SIGNING_KEY_LEN
                ),
            });
        }
        Ok(key)
    }

    fn issuer(&self) -> Result<Option<String>, VoucherError> {
        match self.issuer.as_deref() {
            None => Ok(None),
            Some(raw) => Url::parse(raw)
                .map(|url| Some(url.to_string()))
                .map_err(|e| VoucherError::Misconfigured {
                    setting: ISSUER_SETTING.to_string(),
                    issue: format!("not an absolute URL: {}", e),
                }),
        }
    }

    /// Signs a token as of `issued_at`.
    pub fn sign(
        &self,
        subject_id: Uuid,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<String, VoucherError> {
        let key = self.signing_key()?;
        let iss = self.issuer()?;

        if expires_at <= issued_at {
            return Err(VoucherError::Misconfigured {
                setting: DURATION_SETTING.to_string(),
                issue: format!("expiration {} is not after {}", expires_at, issued_at),
            });
        }

        let claims = VoucherClaims {
            sub: simple_id(&subject_id),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            iss,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(key.as_bytes()),
        )
        .map_err(|e| VoucherError::Misconfigured {
            setting: SIGNING_KEY_SETTING.to_string(),
            issue: e.to_string(),
        })
    }
}

#[async_trait]
impl VoucherTokenGenerator for JwtVoucherGenerator {
    async fn generate_token(
        &self,
        subject_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<String, VoucherError> {
        self.sign(subject_id, Utc::now(), expires_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use jsonwebtoken::{decode, DecodingKey, Validation};

    const KEY: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn test_error_messages() {
        assert_eq!(
            VoucherError::MissingSetting("AuthServerUrl".to_string()).to_string(),
            "Server missing configuration setting:AuthServerUrl"
        );
        assert_eq!(
            VoucherError::Misconfigured {
                setting: "voucher.signing_key".to_string(),
                issue: "too short".to_string(),
            }
            .to_string(),
            "Server misconfigured:\nsetting:voucher.signing_key\nissue:too short"
        );
    }

    #[test]
    fn test_signed_token_decodes_with_claims() {
        let generator = JwtVoucherGenerator::new(
            Some(KEY.to_string()),
            Some("https://auth.example.test/".to_string()),
        );
        let subject = Uuid::parse_str("00112233-4455-6677-8899-aabbccddeeff").unwrap();
        let expires_at = Utc::now() + Duration::hours(1);

        let token = tokio_test::block_on(generator.generate_token(subject, expires_at)).unwrap();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&["https://auth.example.test/"]);
        let data = decode::<VoucherClaims>(
            &token,
            &DecodingKey::from_secret(KEY.as_bytes()),
            &validation,
        )
        .unwrap();

        assert_eq!(data.claims.sub, "00112233445566778899aabbccddeeff");
        assert_eq!(data.claims.exp, expires_at.timestamp());
        assert!(data.claims.iat <= data.claims.exp);
    }

    #[test]
    fn test_missing_signing_key() {
        let generator = JwtVoucherGenerator::new(None, None);
        let result = tokio_test::block_on(
            generator.generate_token(Uuid::new_v4(), Utc::now() + Duration::minutes(5)),
        );

        assert_eq!(
            result,
            Err(VoucherError::MissingSetting("voucher.signing_key".to_string()))
        );
    }

    #[test]
    fn test_short_signing_key_is_misconfigured() {
        let generator = JwtVoucherGenerator::new(Some("short".to_string()), None);
        let result = generator.sign(Uuid::new_v4(), Utc::now(), Utc::now() + Duration::hours(1));

        match result {
            Err(VoucherError::Misconfigured { setting, .. }) => {
                assert_eq!(setting, "voucher.signing_key")
            }
            other => panic!("expected misconfiguration, got {:?}", other),
        }
    }

    #[test]
    fn test_relative_issuer_is_misconfigured() {
        let generator =
            JwtVoucherGenerator::new(Some(KEY.to_string()), Some("vouchers".to_string()));
        let result = generator.sign(Uuid::new_v4(), Utc::now(), Utc::now() + Duration::hours(1));

        assert!(matches!(
            result,
            Err(VoucherError::Misconfigured { ref setting, .. }) if setting == "voucher.issuer"
        ));
    }

    #[test]
    fn test_expiration_must_follow_issue_time() {
        let generator = JwtVoucherGenerator::new(Some(KEY.to_string()), None);
        let now = Utc::now();

        assert!(matches!(
            generator.sign(Uuid::new_v4(), now, now),
            Err(VoucherError::Misconfigured { .. })
        ));
    }
}
