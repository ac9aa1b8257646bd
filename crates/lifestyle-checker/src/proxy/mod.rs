//! Server-side relay to the patient record API.
//!
//! The proxy takes an NHS number, makes exactly one outbound GET and turns whatever comes back
//! into a `{status, JSON body}` pair for the caller:
//!
//! * upstream success relays the body unchanged with 200,
//! * upstream failure relays the status with `{"error": message}` (or "Login failed"),
//! * anything unexpected becomes 500 `{"error": "Server error"}` and is only logged.

pub mod router;
pub mod transport;

use axum::http::StatusCode;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::{json, Value};
use tracing::{debug, error, warn};

use crate::config::UpstreamConfig;
use crate::patients::mask_nhs_number;

pub use router::proxy_router;
pub use transport::{
    ReqwestTransport, TransportError, UpstreamReply, UpstreamRequest, UpstreamTransport,
};

pub const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

pub const MISSING_NHS_NUMBER: &str = "nhsnum is required";
pub const LOGIN_FAILED: &str = "Login failed";
pub const SERVER_ERROR: &str = "Server error";

/// Characters `encodeURIComponent` leaves alone besides ASCII alphanumerics.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn encode_path_segment(raw: &str) -> String {
    utf8_percent_encode(raw, PATH_SEGMENT).to_string()
}

/// What the proxy hands back to its caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl ProxyResponse {
    fn error(status: StatusCode, message: impl Into<Value>) -> Self {
        Self {
            status,
            body: json!({ "error": message.into() }),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == StatusCode::OK
    }

    /// The record on success, otherwise the error text a user should see.
    pub fn into_lookup(self) -> Result<Value, String> {
        if self.is_success() {
            return Ok(self.body);
        }
        let message = match self.body.get("error") {
            Some(Value::String(text)) => text.clone(),
            Some(Value::Null) | None => LOGIN_FAILED.to_string(),
            Some(other) => other.to_string(),
        };
        Err(message)
    }
}

/// Relays patient lookups to the configured record API.
#[derive(Debug, Clone)]
pub struct UpstreamProxy<T> {
    config: UpstreamConfig,
    transport: T,
}

impl<T> UpstreamProxy<T>
where
    T: UpstreamTransport,
{
    pub fn new(config: UpstreamConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &UpstreamConfig {
        &self.config
    }

    pub fn request_for(&self, nhs_number: &str) -> UpstreamRequest {
        UpstreamRequest {
            url: format!(
                "{}/{}",
                self.config.base_url,
                encode_path_segment(nhs_number)
            ),
            headers: vec![
                ("Content-Type", "application/json".to_string()),
                (SUBSCRIPTION_KEY_HEADER, self.config.api_key.clone()),
            ],
        }
    }

    /// Look up a patient. An absent or empty identifier is rejected without calling upstream.
    pub async fn lookup(&self, nhs_number: Option<&str>) -> ProxyResponse {
        let nhs_number = match nhs_number {
            Some(value) if !value.is_empty() => value,
            _ => return ProxyResponse::error(StatusCode::BAD_REQUEST, MISSING_NHS_NUMBER),
        };

        let masked = mask_nhs_number(nhs_number);
        debug!(nhs_number = %masked, "forwarding patient lookup");

        let reply = match self.transport.get(self.request_for(nhs_number)).await {
            Ok(reply) => reply,
            Err(err) => {
                error!(nhs_number = %masked, error = %err, "patient lookup failed");
                return ProxyResponse::error(StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR);
            }
        };

        if !reply.is_success() {
            return relay_rejection(&reply, &masked);
        }

        match serde_json::from_slice::<Value>(&reply.body) {
            Ok(body) => ProxyResponse {
                status: StatusCode::OK,
                body,
            },
            Err(err) => {
                error!(nhs_number = %masked, error = %err, "upstream sent a non-JSON record");
                ProxyResponse::error(StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR)
            }
        }
    }
}

fn relay_rejection(reply: &UpstreamReply, masked: &str) -> ProxyResponse {
    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::BAD_GATEWAY);
    let message = serde_json::from_slice::<Value>(&reply.body)
        .ok()
        .and_then(|body| body.get("message").cloned())
        .filter(|message| !message.is_null())
        .unwrap_or_else(|| Value::from(LOGIN_FAILED));

    warn!(nhs_number = %masked, status = reply.status, "upstream rejected patient lookup");
    ProxyResponse::error(status, message)
}
