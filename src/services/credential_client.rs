// src/services/credential_client.rs
//! Credential Client Service
//!
//! Submits implicit (username/password) credentials to the authorization
//! server, replaces their tokens, and mints voucher credentials for principals
//! that are already authorized.
//!
//! Every operation is a single-shot relay: build a record, send it once,
//! classify what came back. Nothing is retried and nothing is kept between
//! calls, so operations on one client may run concurrently.

use crate::error::{ClientError, Result};
use crate::models::credential::CredentialRecord;
use crate::models::outcome::{CreateCredentialOutcome, CreateVoucherOutcome, UpdateCredentialOutcome};
use crate::settings::{ServerUrlResolver, Settings};
use crate::tokens::voucher::{JwtVoucherGenerator, VoucherTokenGenerator};
use crate::transport::http_transport::{
    CredentialTransport, RequestMethod, ReqwestTransport, TransportOutcome,
};
use crate::utils::serialization::serialize;
use chrono::{Duration, Utc};
use log::{debug, info, warn};
use reqwest::StatusCode;
use std::sync::Arc;
use url::Url;
use uuid::Uuid;

/// Path of the credential resource, relative to the server base URL.
pub const CREDENTIAL_PATH: &str = "/api/Credential";

/// Client for the authorization server's credential endpoint.
///
/// Holds only shared, immutable collaborators:
/// - the transport that performs HTTP requests
/// - the resolver for the server base URL
/// - the voucher token generator
pub struct CredentialClient {
    transport: Arc<dyn CredentialTransport>,
    server_url: Arc<dyn ServerUrlResolver>,
    vouchers: Arc<dyn VoucherTokenGenerator>,
}

impl CredentialClient {
    /// Creates a client from explicit collaborators.
    pub fn new(
        transport: Arc<dyn CredentialTransport>,
        server_url: Arc<dyn ServerUrlResolver>,
        vouchers: Arc<dyn VoucherTokenGenerator>,
    ) -> Self {
        Self {
            transport,
            server_url,
            vouchers,
        }
    }

    /// Creates a client wired to the production collaborators.
    ///
    /// # Errors
    /// Returns `ClientError::Http` if the HTTP client cannot be built. Missing
    /// server or voucher settings are not errors here; they surface as
    /// failures of the individual operations.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let transport = ReqwestTransport::from_settings(settings)?;
        let vouchers = JwtVoucherGenerator::from_settings(&settings.voucher);
        Ok(Self::new(
            Arc::new(transport),
            Arc::new(settings.clone()),
            Arc::new(vouchers),
        ))
    }

    /// Submits a new implicit credential.
    ///
    /// # Returns
    /// - `Success` on a 2xx response
    /// - `AlreadyExists(location)` on 409 with an absolute URI in `Location`
    /// - `Failure(body)` on any other non-success status
    /// - `Failure(reason)` when the request could not be sent or completed
    pub async fn create_credential(
        &self,
        auth_id: Uuid,
        provider_id: &Url,
        username: &str,
        password: &str,
    ) -> CreateCredentialOutcome {
        let record = CredentialRecord::implicit(auth_id, provider_id.clone(), username, password);

        match self.submit(RequestMethod::Post, &record).await {
            TransportOutcome::Success { .. } => {
                info!("Created implicit credential for {}", auth_id);
                CreateCredentialOutcome::Success
            }
            TransportOutcome::Status {
                status,
                body,
                location,
            } => {
                if status == StatusCode::CONFLICT {
                    if let Some(location) = location.as_deref().and_then(absolute_uri) {
                        info!("Credential for {} already exists at {}", auth_id, location);
                        return CreateCredentialOutcome::AlreadyExists(location);
                    }
                }
                warn!("Credential creation for {} rejected with {}", auth_id, status);
                CreateCredentialOutcome::Failure(body)
            }
            TransportOutcome::ConnectionFailed(reason) => {
                warn!("Credential creation for {} failed: {}", auth_id, reason);
                CreateCredentialOutcome::Failure(reason)
            }
        }
    }

    /// Replaces the token of an existing implicit credential.
    ///
    /// A 409 here is an ordinary failure; update has no conflict outcome.
    pub async fn update_credential(
        &self,
        auth_id: Uuid,
        provider_id: &Url,
        username: &str,
        password: &str,
    ) -> UpdateCredentialOutcome {
        let record = CredentialRecord::implicit(auth_id, provider_id.clone(), username, password);

        match self.submit(RequestMethod::Put, &record).await {
            TransportOutcome::Success { .. } => {
                info!("Updated implicit credential for {}", auth_id);
                UpdateCredentialOutcome::Success
            }
            TransportOutcome::Status { status, body, .. } => {
                warn!("Credential update for {} rejected with {}", auth_id, status);
                UpdateCredentialOutcome::Failure(body)
            }
            TransportOutcome::ConnectionFailed(reason) => {
                warn!("Credential update for {} failed: {}", auth_id, reason);
                UpdateCredentialOutcome::Failure(reason)
            }
        }
    }

    /// Mints a voucher valid for `duration` and registers it as a credential.
    ///
    /// # Process Flow
    /// 1. Rejects a zero or negative `duration` without calling the generator
    /// 2. Requests a token expiring at `now + duration`
    /// 3. On generator failure, returns its diagnostic without contacting the server
    /// 4. Submits a voucher credential carrying the token
    /// 5. Returns the token itself on success
    pub async fn create_voucher(
        &self,
        auth_id: Uuid,
        provider_id: &Url,
        duration: Duration,
    ) -> CreateVoucherOutcome {
        if duration <= Duration::zero() {
            warn!("Voucher duration {} for {} is not positive", duration, auth_id);
            return CreateVoucherOutcome::Failure(format!(
                "Voucher duration must be positive: {}",
                duration
            ));
        }

        let Some(expires_at) = Utc::now().checked_add_signed(duration) else {
            warn!("Voucher duration {} for {} is out of range", duration, auth_id);
            return CreateVoucherOutcome::Failure(format!(
                "Voucher duration out of range: {}",
                duration
            ));
        };

        let token = match self.vouchers.generate_token(auth_id, expires_at).await {
            Ok(token) => token,
            Err(e) => {
                warn!("Voucher generation for {} failed: {}", auth_id, e);
                return CreateVoucherOutcome::Failure(e.to_string());
            }
        };

        let record = CredentialRecord::voucher(auth_id, provider_id.clone(), &token);

        // 409 is not classified for vouchers; it falls through to Failure.
        match self.submit(RequestMethod::Post, &record).await {
            TransportOutcome::Success { .. } => {
                info!("Registered voucher for {} expiring at {}", auth_id, expires_at);
                CreateVoucherOutcome::Success(token)
            }
            TransportOutcome::Status { status, body, .. } => {
                if status == StatusCode::CONFLICT {
                    warn!("Voucher registration for {} hit an existing credential", auth_id);
                } else {
                    warn!("Voucher registration for {} rejected with {}", auth_id, status);
                }
                CreateVoucherOutcome::Failure(body)
            }
            TransportOutcome::ConnectionFailed(reason) => {
                warn!("Voucher registration for {} failed: {}", auth_id, reason);
                CreateVoucherOutcome::Failure(reason)
            }
        }
    }

    /// Resolves the endpoint, serializes the record and sends it once.
    ///
    /// Local problems are folded into `ConnectionFailed` so that callers
    /// classify them as plain failures; nothing is sent in that case.
    async fn submit(&self, method: RequestMethod, record: &CredentialRecord) -> TransportOutcome {
        let prepared = self
            .credential_endpoint()
            .and_then(|endpoint| Ok((endpoint, serialize(record)?)));

        match prepared {
            Ok((endpoint, body)) => {
                debug!(
                    "Sending {:?} {} for {} ({:?})",
                    method, endpoint, record.authorization_id, record.method
                );
                self.transport.send(method, &endpoint, body).await
            }
            Err(e) => TransportOutcome::ConnectionFailed(e.to_string()),
        }
    }

    /// `<base url>/api/Credential`, tolerating a trailing slash on the base.
    /// Any query on the base is kept after the credential path.
    pub fn credential_endpoint(&self) -> Result<Url> {
        let base = self.server_url.base_server_url()?;
        credential_endpoint(&base)
    }
}

impl Clone for CredentialClient {
    /// Creates a clone sharing the same collaborators
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            server_url: self.server_url.clone(),
            vouchers: self.vouchers.clone(),
        }
    }
}

/// Builds the credential endpoint for a server base URL.
///
/// # Errors
/// Returns `ClientError::InvalidSetting` if the base cannot carry a path
/// (e.g. `mailto:`) or carries a fragment.
pub fn credential_endpoint(base: &Url) -> Result<Url> {
    if base.fragment().is_some() {
        return Err(invalid_base("base URL must not carry a fragment"));
    }

    let mut endpoint = base.clone();
    endpoint
        .path_segments_mut()
        .map_err(|_| invalid_base("base URL cannot carry a path"))?
        .pop_if_empty()
        .extend(CREDENTIAL_PATH.split('/').filter(|segment| !segment.is_empty()));
    Ok(endpoint)
}

fn invalid_base(issue: &str) -> ClientError {
    ClientError::InvalidSetting {
        setting: "server_url".to_string(),
        issue: issue.to_string(),
    }
}

fn absolute_uri(raw: &str) -> Option<Url> {
    Url::parse(raw.trim()).ok()
}
