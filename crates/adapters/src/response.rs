//! Status-driven response dispatch.
//!
//! Every call yields a status code and a parsed JSON body. A 2xx status goes
//! to the adapter's success handler. Any other status goes to its error
//! handler, which digs the vendor message out of that venue's envelope.
//!
//! ```ignore
//! response
//!     .dispatch(EXCHANGE)
//!     .on_success(|js| Ok(Price { price: lenient::number(&js["last"], "last") }))
//!     .on_error(resp_err)
//!     .run()
//! ```

use serde_json::Value;

use crate::error::{ExchangeError, Result};
use crate::transport::RawResponse;

#[derive(Clone, Debug, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: Value,
}

impl Response {
    /// Parses a raw body. Empty bodies become `null`. Anything else that is
    /// not JSON is a [`ExchangeError::Decode`] and never reaches a handler.
    pub fn parse(raw: RawResponse) -> Result<Self> {
        let body = if raw.body.iter().all(u8::is_ascii_whitespace) {
            Value::Null
        } else {
            serde_json::from_slice(&raw.body).map_err(|e| {
                let preview: String = String::from_utf8_lossy(&raw.body).chars().take(200).collect();
                ExchangeError::Decode(format!("status {}: {} ({})", raw.status, e, preview))
            })?
        };
        Ok(Self {
            status: raw.status,
            body,
        })
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn dispatch<'a, T>(self, exchange: &'a str) -> Dispatch<'a, T> {
        Dispatch {
            exchange,
            response: self,
            on_success: None,
            on_error: None,
        }
    }
}

type SuccessHandler<'a, T> = Box<dyn FnOnce(Value) -> Result<T> + 'a>;
type ErrorHandler<'a> = Box<dyn FnOnce(&Value) -> ExchangeError + 'a>;

/// A pending response with its success and error handlers.
pub struct Dispatch<'a, T> {
    exchange: &'a str,
    response: Response,
    on_success: Option<SuccessHandler<'a, T>>,
    on_error: Option<ErrorHandler<'a>>,
}

impl<'a, T> Dispatch<'a, T> {
    pub fn on_success(mut self, handler: impl FnOnce(Value) -> Result<T> + 'a) -> Self {
        self.on_success = Some(Box::new(handler));
        self
    }

    pub fn on_error(mut self, handler: impl FnOnce(&Value) -> ExchangeError + 'a) -> Self {
        self.on_error = Some(Box::new(handler));
        self
    }

    /// Runs the handler for the branch the status selects. A missing handler
    /// is a [`ExchangeError::MissingHandler`], distinct from any vendor error.
    pub fn run(self) -> Result<T> {
        if self.response.is_success() {
            let handler = self.on_success.ok_or_else(|| ExchangeError::MissingHandler {
                exchange: self.exchange.to_string(),
                branch: "success",
            })?;
            handler(self.response.body)
        } else {
            let handler = self.on_error.ok_or_else(|| ExchangeError::MissingHandler {
                exchange: self.exchange.to_string(),
                branch: "error",
            })?;
            Err(handler(&self.response.body))
        }
    }
}

/// Builds an API error from the string at `pointer`, or "unknown" when the
/// envelope carries no message there.
pub fn message_at(exchange: &str, body: &Value, pointer: &str) -> ExchangeError {
    match body.pointer(pointer) {
        Some(Value::String(s)) if !s.is_empty() => ExchangeError::api(exchange, s.clone()),
        Some(Value::Number(n)) => ExchangeError::api(exchange, n.to_string()),
        _ => ExchangeError::api(exchange, "unknown"),
    }
}
