//! Shared REST plumbing: base URL, transport handle and request logging.
//! Signing stays in each venue's `account` module.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::{ExchangeError, Result};
use crate::response::Response;
use crate::sign::encode_params;
use crate::transport::{Method, Request, Transport};

pub type Params = BTreeMap<String, String>;

/// Builds a parameter map from literal pairs.
pub fn params<const N: usize>(pairs: [(&str, String); N]) -> Params {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

/// The stored credentials, or a validation error naming the venue.
pub fn credentials<'a, A>(auth: &'a Option<A>, exchange: &str) -> Result<&'a A> {
    auth.as_ref().ok_or_else(|| {
        ExchangeError::Validation(format!(
            "{} requires credentials for private endpoints; call set_key first",
            exchange
        ))
    })
}

#[derive(Clone)]
pub struct RestClient {
    exchange: &'static str,
    base_url: &'static str,
    transport: Arc<dyn Transport>,
}

impl RestClient {
    pub fn new(exchange: &'static str, base_url: &'static str, transport: Arc<dyn Transport>) -> Self {
        Self {
            exchange,
            base_url,
            transport,
        }
    }

    pub fn base_url(&self) -> &'static str {
        self.base_url
    }

    /// Starts a request against this venue.
    pub fn request(&self, method: Method, path: &str) -> Request {
        Request::new(method, self.base_url, path)
    }

    /// Unsigned GET with form-encoded query parameters.
    pub fn get_public(&self, path: &str, params: &Params) -> Result<Response> {
        let request = self
            .request(Method::Get, path)
            .with_query(encode_params(params));
        self.execute(request, false)
    }

    /// Sends a built request and parses the body.
    pub fn execute(&self, request: Request, signed: bool) -> Result<Response> {
        debug!(
            exchange = self.exchange,
            method = request.method.as_str(),
            path = %request.path,
            signed,
            "sending request"
        );
        let raw = self.transport.send(&request)?;
        debug!(exchange = self.exchange, status = raw.status, "received response");
        Response::parse(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_required() {
        let none: Option<String> = None;
        assert!(matches!(
            credentials(&none, "binance"),
            Err(ExchangeError::Validation(_))
        ));
        let some = Some("key".to_string());
        assert_eq!(credentials(&some, "binance").unwrap(), "key");
    }

    #[test]
    fn test_params_builder_sorts_keys() {
        let p = params([("b", "2".to_string()), ("a", "1".to_string())]);
        assert_eq!(encode_params(&p), "a=1&b=2");
    }
}
