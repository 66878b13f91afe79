//! HTTP transport implementation using reqwest.
//!
//! Sends a [`RequestDescriptor`] exactly as described: same method, URL,
//! headers and body. Multipart bodies get their `Content-Type` (with the
//! boundary) from reqwest.

use async_trait::async_trait;
use jimeng_application::ports::{GenerationTransport, TransportError, TransportResponse};
use jimeng_domain::{HttpMethod, RequestBody, RequestDescriptor};
use reqwest::{Client, Method, RequestBuilder, Url};
use serde_json::Value;
use tracing::debug;

use crate::http::build_multipart_form;

/// Generation transport backed by `reqwest::Client`.
///
/// No request timeout is configured: generation calls can run for minutes.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Creates a transport with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new() -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(concat!("jimeng-console/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;

        Ok(Self { client })
    }

    /// Creates a transport with a custom reqwest client.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
        }
    }

    /// Translates a descriptor into a reqwest request builder.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL or the body cannot be encoded.
    pub fn prepare(&self, request: &RequestDescriptor) -> Result<RequestBuilder, TransportError> {
        let url = Url::parse(&request.url)
            .map_err(|e| TransportError::InvalidUrl(format!("{e}: {}", request.url)))?;

        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method), url);

        for header in &request.headers {
            if header.is_multipart_content_type() {
                continue;
            }
            builder = builder.header(&header.name, &header.value);
        }

        match &request.body {
            RequestBody::None => Ok(builder),
            RequestBody::Json(value) => {
                let bytes = serde_json::to_vec(value)
                    .map_err(|e| TransportError::InvalidBody(e.to_string()))?;
                Ok(builder.body(bytes))
            }
            RequestBody::Multipart { parts } => {
                let form = build_multipart_form(parts)
                    .map_err(|e| TransportError::InvalidBody(e.to_string()))?;
                Ok(builder.multipart(form))
            }
        }
    }

    /// Maps reqwest errors to `TransportError`.
    fn map_error(error: &reqwest::Error) -> TransportError {
        if error.is_timeout() {
            return TransportError::Timeout;
        }
        if error.is_connect() {
            return TransportError::ConnectionFailed(error.to_string());
        }
        if error.is_builder() {
            return TransportError::InvalidBody(error.to_string());
        }
        TransportError::Other(error.to_string())
    }

    /// Parses a response body as JSON, wrapping anything else in a string.
    fn parse_body(bytes: &[u8]) -> Value {
        if bytes.is_empty() {
            return Value::Null;
        }
        serde_json::from_slice(bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
    }
}

#[async_trait]
impl GenerationTransport for ReqwestTransport {
    async fn send(&self, request: &RequestDescriptor) -> Result<TransportResponse, TransportError> {
        let builder = self.prepare(request)?;
        debug!(method = %request.method, url = %request.url, "sending request");

        let response = builder.send().await.map_err(|e| Self::map_error(&e))?;
        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| TransportError::Other(format!("Failed to read body: {e}")))?;

        debug!(status, len = bytes.len(), "response received");
        Ok(TransportResponse::new(status, Self::parse_body(&bytes)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use jimeng_domain::{FileAttachment, Part};
    use pretty_assertions::assert_eq;
    use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
    use serde_json::json;

    fn transport() -> ReqwestTransport {
        ReqwestTransport::with_client(Client::new())
    }

    #[test]
    fn test_to_reqwest_method() {
        assert_eq!(ReqwestTransport::to_reqwest_method(HttpMethod::Get), Method::GET);
        assert_eq!(ReqwestTransport::to_reqwest_method(HttpMethod::Post), Method::POST);
    }

    #[test]
    fn test_client_creation() {
        assert!(ReqwestTransport::new().is_ok());
    }

    #[test]
    fn json_descriptor_is_sent_verbatim() {
        let body = json!({ "model": "jimeng-4.0", "prompt": "cat" });
        let descriptor =
            RequestDescriptor::new(HttpMethod::Post, "http://localhost:5100/v1/images/generations")
                .with_bearer_token("tok")
                .with_body(RequestBody::Json(body.clone()));

        let request = transport().prepare(&descriptor).unwrap().build().unwrap();

        assert_eq!(request.method(), Method::POST);
        assert_eq!(request.url().as_str(), descriptor.url);
        assert_eq!(request.headers()[AUTHORIZATION], "Bearer tok");
        assert_eq!(request.headers()[CONTENT_TYPE], "application/json");
        let sent = request.body().and_then(reqwest::Body::as_bytes).unwrap();
        assert_eq!(serde_json::from_slice::<Value>(sent).unwrap(), body);
    }

    #[test]
    fn multipart_descriptor_gets_boundary_from_reqwest() {
        let descriptor = RequestDescriptor::new(
            HttpMethod::Post,
            "http://localhost:5100/v1/images/compositions?model=jimeng-4.0",
        )
        .with_bearer_token("tok")
        .with_header("Content-Type", "multipart/form-data")
        .with_body(RequestBody::Multipart {
            parts: vec![
                Part::text("prompt", "cat"),
                Part::file("images", FileAttachment::new("a.png", vec![1, 2, 3])),
            ],
        });

        let request = transport().prepare(&descriptor).unwrap().build().unwrap();

        assert_eq!(request.url().query(), Some("model=jimeng-4.0"));
        let content_type = request.headers()[CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("multipart/form-data; boundary="));
        assert_eq!(request.headers().get_all(CONTENT_TYPE).iter().count(), 1);
    }

    #[test]
    fn get_descriptor_has_no_body() {
        let descriptor = RequestDescriptor::new(HttpMethod::Get, "http://localhost:5100/v1/models");
        let request = transport().prepare(&descriptor).unwrap().build().unwrap();
        assert_eq!(request.method(), Method::GET);
        assert!(request.body().is_none());
    }

    #[test]
    fn invalid_url_is_rejected() {
        let descriptor = RequestDescriptor::new(HttpMethod::Get, "not a url/v1/models");
        assert!(matches!(
            transport().prepare(&descriptor),
            Err(TransportError::InvalidUrl(_))
        ));
    }

    #[test]
    fn non_json_body_is_wrapped() {
        assert_eq!(ReqwestTransport::parse_body(b""), Value::Null);
        assert_eq!(ReqwestTransport::parse_body(br#"{"a":1}"#), json!({ "a": 1 }));
        assert_eq!(
            ReqwestTransport::parse_body(b"Bad Gateway"),
            Value::String("Bad Gateway".to_string())
        );
    }
}
