use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Method;

use super::error::TransportError;

/// Request path of the remote bulk-write API
pub const BULK_PATH: &str = "/_bulk";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// One outbound request handed to the transport
#[derive(Debug, Clone)]
pub struct WireRequest {
    pub method: Method,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl WireRequest {
    /// Build the bulk-write POST for an encoded payload.
    pub fn bulk(payload: String) -> Self {
        Self {
            method: Method::POST,
            path: BULK_PATH.to_string(),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Bytes::from(payload),
        }
    }
}

/// Response surfaced back from the transport
#[derive(Debug, Clone)]
pub struct WireResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl WireResponse {
    /// Build a headerless response, which is all the sink ever inspects.
    pub fn new(status: u16, body: Bytes) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Send boundary of the sink. Implementations own authentication and the
/// actual network exchange; the sink never sees either.
#[async_trait]
pub trait SignedTransport: Send + Sync + 'static {
    async fn send(&self, request: WireRequest) -> Result<WireResponse, TransportError>;
}

/// Delegate through shared ownership, so a caller can hand the sink a
/// transport while keeping its own handle on it.
#[async_trait]
impl<T> SignedTransport for Arc<T>
where
    T: SignedTransport + ?Sized,
{
    async fn send(&self, request: WireRequest) -> Result<WireResponse, TransportError> {
        (**self).send(request).await
    }
}

/// Plain HTTPS transport without request signing
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport for `endpoint`, e.g. `https://search.example:9200`.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let base_url = endpoint.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl SignedTransport for HttpTransport {
    async fn send(&self, request: WireRequest) -> Result<WireResponse, TransportError> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = self.client.request(request.method, url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let response = builder.body(request.body).send().await?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.bytes().await?;
        Ok(WireResponse {
            status,
            headers,
            body,
        })
    }
}
