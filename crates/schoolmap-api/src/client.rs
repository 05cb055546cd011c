// School map API HTTP client
//
// Wraps `reqwest::Client` with base-URL path construction and response
// decoding. Endpoint groups (schools, regions, location) are implemented
// as inherent methods in separate files to keep this module focused on
// transport mechanics.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::ApiErrorBody;
use crate::transport::TransportConfig;

const USER_ID_HEADER: &str = "x-user-id";

/// Raw HTTP client for the school map REST API.
///
/// All methods return decoded wire types from [`crate::models`]; a
/// non-success status is turned into [`Error::Api`] carrying the message
/// from the `{error, details}` body when the server sent one.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `user_id` is the opaque caller identity sent as `x-user-id`; the
    /// user-location store keys saved positions by it.
    pub fn new(
        base_url: Url,
        user_id: Option<&str>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        if let Some(id) = user_id {
            let value = HeaderValue::from_str(id)
                .map_err(|e| Error::InvalidData(format!("invalid user id header: {e}")))?;
            headers.insert(HeaderName::from_static(USER_ID_HEADER), value);
        }
        let http = transport.build_client_with_headers(headers)?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for an API path: `{base}/{path}`.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.api_url(path)?;
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await?;
        Self::decode(resp).await
    }

    /// Send a POST request with a JSON body and decode the JSON response.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        let url = self.api_url(path)?;
        debug!("POST {}", url);

        let resp = self.http.post(url).json(body).send().await?;
        Self::decode(resp).await
    }

    /// Check the status, then parse the body as `T`.
    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        let body = resp.text().await?;
        trace!(%status, bytes = body.len(), "response received");

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .ok()
                .and_then(ApiErrorBody::into_message)
                .unwrap_or_else(|| preview(&body).to_owned());
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body,
        })
    }
}

/// First 200 bytes of a body, cut on a char boundary.
pub(crate) fn preview(body: &str) -> &str {
    let mut end = body.len().min(200);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

/// Treat a 404 as an empty collection. The API answers 404 rather than
/// `[]` when a table has no rows.
pub(crate) fn empty_on_not_found<T>(
    endpoint: &str,
    result: Result<Vec<T>, Error>,
) -> Result<Vec<T>, Error> {
    match result {
        Err(ref e) if e.is_not_found() => {
            debug!("{endpoint}: no rows (404), treating as empty");
            Ok(Vec::new())
        }
        other => other,
    }
}
