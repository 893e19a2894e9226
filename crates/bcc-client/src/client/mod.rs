//! HTTP client for the BigCommerce store API.

mod paginate;

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Url};
use serde::Serialize;

use crate::error::ClientError;
use crate::pagination::{parse_page, Resource};
use crate::rate_limit::RequestPacer;
use crate::remote_error::{normalize_remote_error, ConflictMatcher, CreateFailure, RawRemoteError};
use crate::types::{Coupon, CouponPayload};

pub const DEFAULT_API_BASE_URL: &str = "https://api.bigcommerce.com";

const USER_AGENT: &str = "bcc/0.1 (coupon-manager)";

/// Tunables for [`BigCommerceClient`].
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Whole-request timeout. `None` keeps reqwest's default (no timeout).
    pub request_timeout_secs: Option<u64>,
    /// Items requested per list page.
    pub page_size: u32,
    /// Fixed delay between consecutive page requests.
    pub page_delay_ms: u64,
    /// Substrings marking a duplicate-code rejection.
    pub conflict_markers: Vec<String>,
}

impl ClientSettings {
    /// Client-relevant subset of the application config.
    #[must_use]
    pub fn from_app_config(config: &bcc_core::AppConfig) -> Self {
        Self {
            request_timeout_secs: config.request_timeout_secs,
            page_size: config.page_size,
            page_delay_ms: config.page_delay_ms,
            conflict_markers: config.conflict_markers.clone(),
        }
    }
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            request_timeout_secs: None,
            page_size: 250,
            page_delay_ms: 50,
            conflict_markers: vec!["already exists".to_string(), "conflict".to_string()],
        }
    }
}

/// Authenticated client for one store.
///
/// Every request carries the store's `X-Auth-Token`. List calls are paced by a
/// fixed delay; create calls are not, because the generation workflow paces
/// them itself.
pub struct BigCommerceClient {
    client: Client,
    store_url: Url,
    access_token: String,
    page_size: u32,
    pacer: RequestPacer,
    conflicts: ConflictMatcher,
}

impl BigCommerceClient {
    /// Creates a client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        store_hash: &str,
        access_token: &str,
        settings: &ClientSettings,
    ) -> Result<Self, ClientError> {
        Self::with_base_url(DEFAULT_API_BASE_URL, store_hash, access_token, settings)
    }

    /// Creates a client from the loaded application config, honouring its API
    /// base URL.
    ///
    /// # Errors
    ///
    /// See [`Self::with_base_url`].
    pub fn from_app_config(config: &bcc_core::AppConfig) -> Result<Self, ClientError> {
        Self::with_base_url(
            &config.api_base_url,
            &config.store_hash,
            &config.access_token,
            &ClientSettings::from_app_config(config),
        )
    }

    /// Creates a client with a custom API host (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidBaseUrl`] if the base
    /// URL and store hash do not form a valid URL.
    pub fn with_base_url(
        base_url: &str,
        store_hash: &str,
        access_token: &str,
        settings: &ClientSettings,
    ) -> Result<Self, ClientError> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(secs) = settings.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        let store_url = Self::store_url(base_url, store_hash)?;

        Ok(Self {
            client,
            store_url,
            access_token: access_token.to_owned(),
            page_size: settings.page_size.max(1),
            pacer: RequestPacer::from_millis(settings.page_delay_ms),
            conflicts: ConflictMatcher::new(settings.conflict_markers.iter().cloned()),
        })
    }

    /// `{base}/stores/{hash}/`, always with exactly one trailing slash so that
    /// relative joins append rather than replace the last segment.
    fn store_url(base_url: &str, store_hash: &str) -> Result<Url, ClientError> {
        let invalid = |reason: String| ClientError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason,
        };

        let hash = store_hash.trim().trim_matches('/');
        if hash.is_empty() {
            return Err(invalid("store hash is empty".to_string()));
        }

        let normalised = format!("{}/stores/{hash}/", base_url.trim_end_matches('/'));
        Url::parse(&normalised).map_err(|e| invalid(e.to_string()))
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.store_url
            .join(path)
            .map_err(|e| ClientError::InvalidBaseUrl {
                base_url: self.store_url.to_string(),
                reason: e.to_string(),
            })
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("X-Auth-Token", &self.access_token)
            .header(reqwest::header::ACCEPT, "application/json")
    }

    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Sends a GET and returns the body text of a 2xx response.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::UnexpectedStatus`] for non-2xx responses, with the
    ///   remote message normalized.
    async fn get_text(&self, url: Url) -> Result<String, ClientError> {
        let response = self.request(Method::GET, url.clone()).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
                message: normalize_remote_error(&raw_from_body(&body, status)),
            });
        }

        Ok(body)
    }

    /// Fetches a single page of `resource`.
    ///
    /// # Errors
    ///
    /// Propagates [`Self::get_text`] errors, and [`ClientError::Deserialize`]
    /// if the page cannot be parsed.
    pub async fn fetch_page<T: serde::de::DeserializeOwned>(
        &self,
        resource: Resource,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<T>, ClientError> {
        let mut url = self.endpoint(resource.path())?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("limit", &page_size.to_string());

        tracing::debug!(path = resource.path(), page, page_size, "fetching page");
        let body = self.get_text(url).await?;
        parse_page(&body, &format!("{} page {page}", resource.path()))
    }

    /// Looks up a coupon by its exact code.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails or the body cannot be parsed.
    pub async fn find_coupon_by_code(&self, code: &str) -> Result<Option<Coupon>, ClientError> {
        let mut url = self.endpoint(Resource::Coupons.path())?;
        url.query_pairs_mut().append_pair("code", code);

        let body = self.get_text(url).await?;
        let mut matches: Vec<Coupon> = parse_page(&body, &format!("coupon lookup {code}"))?;
        Ok(if matches.is_empty() {
            None
        } else {
            Some(matches.swap_remove(0))
        })
    }

    /// Creates one coupon.
    ///
    /// Never panics or propagates transport errors: every failure becomes a
    /// classified [`CreateFailure`] with a normalized message.
    ///
    /// # Errors
    ///
    /// Returns [`CreateFailure`] with kind `Transport` when no response was
    /// received, `Conflict` when the code is taken, and `Validation` otherwise.
    pub async fn create_coupon(&self, payload: &CouponPayload) -> Result<Coupon, CreateFailure> {
        self.post_coupon(&payload.code, payload).await
    }

    /// Creates one coupon from a caller-built JSON object, sent unchanged.
    ///
    /// Used for hand-written coupon files, which may carry fields
    /// [`CouponPayload`] does not model (`restricted_to`, `shipping_methods`).
    ///
    /// # Errors
    ///
    /// Same classification as [`Self::create_coupon`].
    pub async fn create_coupon_object(
        &self,
        object: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<Coupon, CreateFailure> {
        let code = object
            .get("code")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default();
        self.post_coupon(code, object).await
    }

    async fn post_coupon<B: Serialize + ?Sized>(
        &self,
        code: &str,
        body: &B,
    ) -> Result<Coupon, CreateFailure> {
        let url = self
            .endpoint(Resource::Coupons.path())
            .map_err(|e| self.transport_failure(&e.to_string()))?;

        let response = self
            .request(Method::POST, url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_failure(&e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_failure(&e.to_string()))?;

        if !status.is_success() {
            let failure = self
                .conflicts
                .failure(Some(status.as_u16()), &raw_from_body(&body, status));
            tracing::debug!(
                code,
                status = status.as_u16(),
                kind = %failure.kind,
                message = %failure.message,
                "coupon create rejected"
            );
            return Err(failure);
        }

        serde_json::from_str::<Coupon>(&body).map_err(|e| CreateFailure {
            kind: crate::RemoteErrorKind::Validation,
            status: Some(status.as_u16()),
            message: format!("unexpected create response: {e}"),
        })
    }

    fn transport_failure(&self, message: &str) -> CreateFailure {
        self.conflicts
            .failure(None, &RawRemoteError::Transport(message.to_owned()))
    }
}

/// Wraps a response body for normalization. Empty bodies fall back to the
/// status line so the message is never blank.
fn raw_from_body(body: &str, status: reqwest::StatusCode) -> RawRemoteError {
    if body.trim().is_empty() {
        return RawRemoteError::Text(format!("HTTP {status}"));
    }
    serde_json::from_str::<serde_json::Value>(body)
        .map_or_else(|_| RawRemoteError::Text(body.to_owned()), RawRemoteError::Json)
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
