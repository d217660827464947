// src/utils/serialization.rs
//! Serialization utilities for the credential client.
//!
//! Provides the wire encoding of credential records. JSON is the only format
//! the credential endpoint is sent.

use serde::Serialize;
use serde_json;

/// Media type announced for serialized request bodies.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Serializes a value to a JSON string.
///
/// # Arguments
/// * `data` - The value to serialize (must implement `Serialize`)
///
/// # Returns
/// - `Ok(String)` with JSON representation on success
/// - `Err(serde_json::Error)` if serialization fails
pub fn serialize<T: Serialize>(data: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::credential::{CredentialRecord, CredentialValidationMethod};
    use url::Url;
    use uuid::Uuid;

    #[test]
    fn test_record_survives_wire_encoding() {
        let provider = Url::parse("https://login.example.test/").unwrap();
        let record = CredentialRecord::voucher(Uuid::new_v4(), provider, "token-value");

        let json = serialize(&record).unwrap();
        let decoded: CredentialRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(decoded, record);
        assert_eq!(decoded.method, CredentialValidationMethod::Voucher);
    }

    #[test]
    fn test_unknown_method_is_rejected() {
        let json = r#"{
            "AuthorizationId": "00112233-4455-6677-8899-aabbccddeeff",
            "Method": "Certificate",
            "Provider": "https://login.example.test/",
            "UserId": "x",
            "Token": "y"
        }"#;

        assert!(serde_json::from_str::<CredentialRecord>(json).is_err());
    }
}
