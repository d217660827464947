// src/lib.rs

//! # Credential Session Client
//!
//! Client side of the authorization server's credential protocol. It submits
//! and updates username/password ("implicit") credentials and mints
//! short-lived voucher tokens for principals that are already authorized.
//!
//! ## Architecture Overview
//! 1. **Models**: `CredentialRecord` sent on the wire and the outcome enums
//! 2. **Services**: `CredentialClient`, the three request flows and their classification
//! 3. **Transport**: `CredentialTransport` trait and its `reqwest` implementation
//! 4. **Tokens**: `VoucherTokenGenerator` trait and the HS256 JWT generator
//! 5. **Settings**: layered configuration and the base URL resolver
//!
//! ## Example
//! ```no_run
//! use credential_session_client::{CreateCredentialOutcome, CredentialClient, Settings};
//! use url::Url;
//! use uuid::Uuid;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Settings::load()?;
//! let client = CredentialClient::from_settings(&settings)?;
//! let provider = Url::parse("https://login.example.com/local")?;
//!
//! match client.create_credential(Uuid::new_v4(), &provider, "alice", "s3cret").await {
//!     CreateCredentialOutcome::Success => println!("created"),
//!     CreateCredentialOutcome::AlreadyExists(at) => println!("already at {}", at),
//!     CreateCredentialOutcome::Failure(why) => eprintln!("failed: {}", why),
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod models;
pub mod services;
pub mod settings;
pub mod tokens;
pub mod transport;
pub mod utils;

pub use error::{ClientError, Result};
pub use models::credential::{CredentialRecord, CredentialValidationMethod};
pub use models::outcome::{CreateCredentialOutcome, CreateVoucherOutcome, UpdateCredentialOutcome};
pub use services::credential_client::CredentialClient;
pub use settings::{ServerUrlResolver, Settings, VoucherSettings};
pub use tokens::voucher::{JwtVoucherGenerator, VoucherError, VoucherTokenGenerator};
pub use transport::http_transport::{
    CredentialTransport, ReqwestTransport, RequestMethod, TransportOutcome,
};
