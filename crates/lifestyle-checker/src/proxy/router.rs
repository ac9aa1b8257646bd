use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::{UpstreamProxy, UpstreamTransport, SERVER_ERROR};

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub nhsnum: Option<String>,
}

/// Mounts the lookup relay at `GET /api/login?nhsnum=`.
pub fn proxy_router<T>(proxy: Arc<UpstreamProxy<T>>) -> Router
where
    T: UpstreamTransport + 'static,
{
    Router::new()
        .route("/api/login", get(login_handler::<T>))
        .with_state(proxy)
}

pub(crate) async fn login_handler<T>(
    State(proxy): State<Arc<UpstreamProxy<T>>>,
    query: Result<Query<LoginQuery>, QueryRejection>,
) -> Response
where
    T: UpstreamTransport + 'static,
{
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => {
            error!(error = %rejection, "malformed login query");
            let payload = json!({ "error": SERVER_ERROR });
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response();
        }
    };

    let response = proxy.lookup(query.nhsnum.as_deref()).await;
    (response.status, Json(response.body)).into_response()
}
