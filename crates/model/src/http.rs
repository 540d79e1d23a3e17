//! Shared HTTP transport for LLM providers.
//!
//! `HttpEngine` wraps a `reqwest::Client` with pre-configured headers,
//! a chat endpoint, and a models endpoint. Provides `post()` for
//! non-streaming calls, `sse_data()` for Server-Sent Events payloads,
//! and `get_models()` for catalogue probes. SSE framing (`\n\n` block
//! buffering, `data:` extraction, `[DONE]` sentinel) is handled here;
//! payload interpretation is dialect-specific and happens upstream.

use crate::Result;
use async_stream::try_stream;
use futures_core::Stream;
use futures_util::StreamExt;
use reqwest::{
    Client, Method,
    header::{self, HeaderMap, HeaderName, HeaderValue},
};
use serde::Serialize;

/// HTTP transport with pre-built headers and endpoints.
#[derive(Clone)]
pub struct HttpEngine {
    client: Client,
    headers: HeaderMap,
    chat_endpoint: String,
    models_endpoint: String,
}

impl HttpEngine {
    /// Create a transport with Bearer token authentication.
    pub fn bearer(
        client: Client,
        key: &str,
        chat_endpoint: &str,
        models_endpoint: &str,
    ) -> Result<Self> {
        let mut headers = base_headers();
        headers.insert(
            header::AUTHORIZATION,
            format!("Bearer {key}")
                .parse()
                .map_err(|_| crate::Error::Config("API key is not a valid header value".into()))?,
        );
        Ok(Self {
            client,
            headers,
            chat_endpoint: chat_endpoint.to_owned(),
            models_endpoint: models_endpoint.to_owned(),
        })
    }

    /// Create a transport with a custom authentication header.
    ///
    /// Used by providers that don't use Bearer tokens (Anthropic uses
    /// `x-api-key` plus a version header).
    pub fn custom_headers(
        client: Client,
        auth: &[(&str, &str)],
        chat_endpoint: &str,
        models_endpoint: &str,
    ) -> Result<Self> {
        let mut headers = base_headers();
        for (name, value) in auth {
            headers.insert(
                name.parse::<HeaderName>()
                    .map_err(|e| crate::Error::Config(format!("invalid header name: {e}")))?,
                value
                    .parse::<HeaderValue>()
                    .map_err(|e| crate::Error::Config(format!("invalid header value: {e}")))?,
            );
        }
        Ok(Self {
            client,
            headers,
            chat_endpoint: chat_endpoint.to_owned(),
            models_endpoint: models_endpoint.to_owned(),
        })
    }

    /// Send a non-streaming request and return the raw response body.
    /// Non-2xx statuses surface as transport errors.
    pub async fn post(&self, body: &impl Serialize) -> Result<String> {
        if let Ok(body) = serde_json::to_string(body) {
            tracing::trace!("request: {}", body);
        }
        let text = self
            .client
            .request(Method::POST, &self.chat_endpoint)
            .headers(self.headers.clone())
            .json(body)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(text)
    }

    /// Stream the SSE payloads of a chat request.
    ///
    /// Buffers on `\n\n` block boundaries, yields each block's `data:`
    /// payload, and drops the `[DONE]` sentinel. The payload is raw
    /// JSON text; callers parse it per dialect.
    pub fn sse_data(&self, body: &impl Serialize) -> impl Stream<Item = Result<String>> + Send {
        if let Ok(body) = serde_json::to_string(body) {
            tracing::trace!("request: {}", body);
        }
        let request = self
            .client
            .request(Method::POST, &self.chat_endpoint)
            .headers(self.headers.clone())
            .json(body);

        try_stream! {
            let response = request.send().await?.error_for_status()?;
            let mut stream = response.bytes_stream();
            let mut buf = String::new();
            while let Some(next) = stream.next().await {
                let bytes = next?;
                buf.push_str(&String::from_utf8_lossy(&bytes));
                while let Some(pos) = buf.find("\n\n") {
                    let block = buf[..pos].to_owned();
                    buf = buf[pos + 2..].to_owned();
                    if let Some(data) = extract_data(&block) {
                        yield data;
                    }
                }
            }
            // Handle any remaining data in buffer.
            if !buf.trim().is_empty()
                && let Some(data) = extract_data(&buf)
            {
                yield data;
            }
        }
    }

    /// Fetch the provider's model catalogue endpoint.
    pub async fn get_models(&self) -> Result<String> {
        let text = self
            .client
            .request(Method::GET, &self.models_endpoint)
            .headers(self.headers.clone())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(text)
    }
}

fn base_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

/// Extract the `data:` payload of a single SSE block (a block may
/// contain `event:` and `data:` lines).
fn extract_data(block: &str) -> Option<String> {
    let mut data = None;
    for line in block.lines() {
        if let Some(d) = line.strip_prefix("data:") {
            data = Some(d.trim());
        }
    }
    let data = data?;
    if data.is_empty() || data == "[DONE]" {
        return None;
    }
    Some(data.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_data_payload() {
        let block = "event: content_block_delta\ndata: {\"x\":1}";
        assert_eq!(extract_data(block).as_deref(), Some("{\"x\":1}"));
    }

    #[test]
    fn done_sentinel_is_dropped() {
        assert_eq!(extract_data("data: [DONE]"), None);
        assert_eq!(extract_data("event: ping"), None);
    }
}
