use std::future::Future;

/// A single outbound GET as the proxy wants it sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRequest {
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
}

/// Status and undecoded body of the upstream reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamReply {
    pub status: u16,
    pub body: Vec<u8>,
}

impl UpstreamReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("upstream request could not be built: {0}")]
    InvalidRequest(String),
    #[error("upstream unreachable: {0}")]
    Unreachable(String),
    #[error("upstream body could not be read: {0}")]
    Body(String),
}

/// HTTP client seam so the proxy contract can be exercised without a network.
pub trait UpstreamTransport: Send + Sync {
    fn get(
        &self,
        request: UpstreamRequest,
    ) -> impl Future<Output = Result<UpstreamReply, TransportError>> + Send;
}

/// Production transport. Uses reqwest's default timeouts; no retries.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl UpstreamTransport for ReqwestTransport {
    async fn get(&self, request: UpstreamRequest) -> Result<UpstreamReply, TransportError> {
        let mut builder = self.client.get(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }

        // The URL ends in the NHS number; keep it out of error text.
        let response = builder.send().await.map_err(|e| {
            if e.is_builder() {
                TransportError::InvalidRequest(e.without_url().to_string())
            } else {
                TransportError::Unreachable(e.without_url().to_string())
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Body(e.without_url().to_string()))?;

        Ok(UpstreamReply {
            status,
            body: body.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn relative_url_is_rejected_before_sending() {
        let transport = ReqwestTransport::default();
        let err = transport
            .get(UpstreamRequest {
                url: "/111222333".to_string(),
                headers: Vec::new(),
            })
            .await
            .expect_err("relative url cannot be sent");
        assert!(matches!(err, TransportError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn connection_failure_does_not_echo_the_identifier() {
        let transport = ReqwestTransport::default();
        let err = transport
            .get(UpstreamRequest {
                url: "http://127.0.0.1:1/9434765919".to_string(),
                headers: Vec::new(),
            })
            .await
            .expect_err("nothing listens on port 1");
        assert!(matches!(err, TransportError::Unreachable(_)));
        assert!(!err.to_string().contains("9434765919"), "{err}");
    }

    #[tokio::test]
    async fn invalid_request_does_not_echo_the_identifier() {
        let transport = ReqwestTransport::default();
        let err = transport
            .get(UpstreamRequest {
                url: "/9434765919".to_string(),
                headers: Vec::new(),
            })
            .await
            .expect_err("relative url cannot be sent");
        assert!(!err.to_string().contains("9434765919"), "{err}");
    }
}
