//! Live HTTP client for the platform API.
//!
//! Implements every client seam in the crate against the real backend.
//! The bearer token is held as a [`SecretString`] and never appears in
//! debug output. Requests carry the configured timeout; failures are
//! mapped through [`crate::AptoError`] and are never retried
//! automatically — the caller decides what to surface and when to retry.

use crate::access::{AccessClient, AccessDetails, AccessMap};
use crate::catalog::{CatalogClient, Feature};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::payment::{
    ActivePackageCheck, ConfirmPaymentRequest, ConfirmPaymentResponse, CreatePaymentRequest,
    CreatePaymentResponse, PaymentClient,
};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;

/// Production client for the platform API.
///
/// # Example
///
/// ```rust,no_run
/// use apto_client::{ClientConfig, LiveApiClient};
///
/// # fn main() -> apto_client::Result<()> {
/// let config = ClientConfig::builder().from_env().build()?;
/// let client = LiveApiClient::new(config)?.with_auth_token("session-token".to_string());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct LiveApiClient {
    http: reqwest::Client,
    config: ClientConfig,
    auth_token: Option<SecretString>,
}

impl LiveApiClient {
    /// Create an unauthenticated client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            http,
            config,
            auth_token: None,
        })
    }

    /// Attach a session bearer token.
    #[must_use]
    pub fn with_auth_token(mut self, token: impl Into<SecretString>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Whether a bearer token is attached.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.auth_token.is_some()
    }

    /// The configuration this client was built with.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build the absolute URL for an API path.
    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.api_base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn apply_auth(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth_token {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path);
        tracing::debug!(target: "apto::http", %url, "GET");

        let response = self
            .apply_auth(self.http.get(&url))
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }

    async fn post_json<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.endpoint(path);
        tracing::debug!(target: "apto::http", %url, "POST");

        let response = self
            .apply_auth(self.http.post(&url))
            .json(body)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }
}

// Debug implementation that doesn't expose the bearer token
impl std::fmt::Debug for LiveApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveApiClient")
            .field("config", &self.config)
            .field("is_authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CatalogClient for LiveApiClient {
    async fn list_features(&self) -> Result<Vec<Feature>> {
        self.get_json("feature").await
    }
}

#[async_trait]
impl AccessClient for LiveApiClient {
    async fn feature_access_status(&self) -> Result<AccessMap> {
        self.get_json("users/feature-access-status").await
    }

    async fn feature_access_details(&self) -> Result<AccessDetails> {
        self.get_json("users/feature-access-details").await
    }
}

#[async_trait]
impl PaymentClient for LiveApiClient {
    async fn check_active_package(&self) -> Result<ActivePackageCheck> {
        self.get_json("payment/check-active-package").await
    }

    async fn create_payment(&self, request: &CreatePaymentRequest) -> Result<CreatePaymentResponse> {
        self.post_json("payment/create", request).await
    }

    async fn confirm_payment(
        &self,
        request: ConfirmPaymentRequest,
    ) -> Result<ConfirmPaymentResponse> {
        let url = self.endpoint("payment/confirm");
        tracing::debug!(target: "apto::http", %url, payment_id = %request.payment_id, "POST multipart");

        let proof_part = reqwest::multipart::Part::bytes(request.proof.bytes)
            .file_name(request.proof.file_name)
            .mime_str(&request.proof.content_type)?;

        let form = reqwest::multipart::Form::new()
            .text("payment_id", request.payment_id)
            .text("email", request.email)
            .text("phone", request.phone)
            .part("proof_image", proof_part);

        let response = self
            .apply_auth(self.http.post(&url))
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }
}
