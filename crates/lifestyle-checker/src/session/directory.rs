use std::future::Future;

use serde_json::Value;

use crate::proxy::{UpstreamProxy, UpstreamTransport};

/// Where the login flow fetches patient records from.
///
/// Resolves to the raw record, or to the message to show on the login error screen.
pub trait PatientDirectory: Send + Sync {
    fn find(&self, nhs_number: &str) -> impl Future<Output = Result<Value, String>> + Send;
}

impl<T> PatientDirectory for UpstreamProxy<T>
where
    T: UpstreamTransport,
{
    async fn find(&self, nhs_number: &str) -> Result<Value, String> {
        self.lookup(Some(nhs_number)).await.into_lookup()
    }
}
