//! The "send request, receive status and body" primitive adapters call.
//!
//! Adapters never touch the HTTP client directly. They build a [`Request`]
//! and hand it to a [`Transport`], which lets tests swap in a recording
//! mock and keeps connection handling out of the venue code.

use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::{ExchangeError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully built, already signed request.
#[derive(Clone, Debug, PartialEq)]
pub struct Request {
    pub method: Method,
    pub base_url: String,
    pub path: String,
    /// Encoded query string without the leading `?`.
    pub query: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl Request {
    pub fn new(method: Method, base_url: &str, path: &str) -> Self {
        Self {
            method,
            base_url: base_url.to_string(),
            path: path.to_string(),
            query: String::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn with_query(mut self, query: String) -> Self {
        self.query = query;
        self
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    pub fn with_body(mut self, body: String) -> Self {
        self.body = Some(body);
        self
    }

    pub fn url(&self) -> String {
        if self.query.is_empty() {
            format!("{}{}", self.base_url, self.path)
        } else {
            format!("{}{}?{}", self.base_url, self.path, self.query)
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Synchronous request execution. No retry, no rate limiting.
pub trait Transport: Send + Sync {
    fn send(&self, request: &Request) -> Result<RawResponse>;
}

// ============================================================================
// HTTP Transport
// ============================================================================

/// Blocking HTTP transport backed by a pooled reqwest client.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: Self::build_client(),
        }
    }

    /// Pooled client with connect and keepalive settings. No overall
    /// request timeout: a hung call blocks its caller.
    fn build_client() -> Client {
        Client::builder()
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .timeout(None)
            .connect_timeout(Duration::from_secs(10))
            .tcp_keepalive(Duration::from_secs(60))
            .build()
            .unwrap_or_else(|e| {
                tracing::error!("Failed to build HTTP client, using default: {}", e);
                Client::new()
            })
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &Request) -> Result<RawResponse> {
        let url = request.url();
        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Delete => self.client.delete(&url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder
            .send()
            .map_err(|e| ExchangeError::Transport(format!("{} {}: {}", request.method, url, e)))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .map_err(|e| ExchangeError::Transport(format!("Failed to read response: {}", e)))?;

        Ok(RawResponse {
            status,
            body: body.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_with_and_without_query() {
        let req = Request::new(Method::Get, "https://www.okex.com", "/api/v1/ticker.do");
        assert_eq!(req.url(), "https://www.okex.com/api/v1/ticker.do");
        let req = req.with_query("symbol=BTC_USD".to_string());
        assert_eq!(req.url(), "https://www.okex.com/api/v1/ticker.do?symbol=BTC_USD");
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let req = Request::new(Method::Post, "https://api.binance.com", "/api/v3/order")
            .with_header("X-MBX-APIKEY", "key");
        assert_eq!(req.header("x-mbx-apikey"), Some("key"));
        assert_eq!(req.header("Authorization"), None);
    }

    #[test]
    fn test_method_names() {
        assert_eq!(Method::Get.as_str(), "GET");
        assert_eq!(Method::Delete.to_string(), "DELETE");
    }
}
