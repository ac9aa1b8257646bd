use crate::infra::{session_cookie, session_from_headers, AppState, InMemorySessionStore};
use crate::pages;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{AppendHeaders, Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Extension, Form, Json, Router};
use chrono::Local;
use lifestyle_checker::patients::LoginForm;
use lifestyle_checker::proxy::{proxy_router, UpstreamProxy, UpstreamTransport};
use lifestyle_checker::questionnaire::Answers;
use lifestyle_checker::session::{PatientDirectory, TransitionError, ViewController};
use serde_json::json;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

pub(crate) struct PageState<T> {
    proxy: Arc<UpstreamProxy<T>>,
    sessions: InMemorySessionStore,
}

impl<T> Clone for PageState<T> {
    fn clone(&self) -> Self {
        Self {
            proxy: Arc::clone(&self.proxy),
            sessions: self.sessions.clone(),
        }
    }
}

/// Screens, the lookup relay and the operational endpoints.
///
/// `/ready` and `/metrics` need an [`AppState`] extension layered on by the server.
pub fn app_router<T>(proxy: Arc<UpstreamProxy<T>>, sessions: InMemorySessionStore) -> Router
where
    T: UpstreamTransport + 'static,
{
    let state = PageState {
        proxy: Arc::clone(&proxy),
        sessions,
    };

    Router::new()
        .route("/", get(home::<T>))
        .route("/login", post(login::<T>))
        .route("/login/back", post(back_to_login::<T>))
        .route("/logout", post(logout::<T>))
        .route("/questionnaire", post(questionnaire::<T>))
        .with_state(state)
        .merge(proxy_router(proxy))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

fn see_home(id: &Uuid) -> Response {
    (
        AppendHeaders([(header::SET_COOKIE, session_cookie(id))]),
        Redirect::to("/"),
    )
        .into_response()
}

/// The form flow always lands back on `/`; an action the current screen does not offer
/// just re-renders it.
fn settle<R>(id: &Uuid, outcome: Result<R, TransitionError>) -> Response {
    if let Err(err) = outcome {
        debug!(error = %err, "ignoring form action");
    }
    see_home(id)
}

fn apply<T>(
    state: &PageState<T>,
    headers: &HeaderMap,
    action: impl FnOnce(&mut ViewController) -> Result<(), TransitionError>,
) -> Response {
    let id = state.sessions.resolve(session_from_headers(headers));
    let outcome = state.sessions.update(&id, action);
    settle(&id, outcome)
}

pub(crate) async fn home<T>(State(state): State<PageState<T>>, headers: HeaderMap) -> Response
where
    T: UpstreamTransport + 'static,
{
    let id = state.sessions.resolve(session_from_headers(&headers));
    let screen = state.sessions.screen(&id);
    (
        AppendHeaders([(header::SET_COOKIE, session_cookie(&id))]),
        Html(pages::render(&screen)),
    )
        .into_response()
}

pub(crate) async fn login<T>(
    State(state): State<PageState<T>>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Response
where
    T: UpstreamTransport + 'static,
{
    let id = state.sessions.resolve(session_from_headers(&headers));
    let attempt = match state
        .sessions
        .update(&id, |controller| controller.begin_login(form))
    {
        Ok(Some(attempt)) => attempt,
        other => return settle(&id, other),
    };

    // If the client goes away here, the session stays on `Verifying` until the next
    // submission supersedes this attempt or the visitor goes back to the login form.
    let lookup = state.proxy.find(&attempt.form.nhs_number).await;
    let today = Local::now().date_naive();
    let outcome = state.sessions.update(&id, |controller| {
        controller.complete_login(attempt.id, lookup, today)
    });
    settle(&id, outcome)
}

pub(crate) async fn back_to_login<T>(
    State(state): State<PageState<T>>,
    headers: HeaderMap,
) -> Response
where
    T: UpstreamTransport + 'static,
{
    apply(&state, &headers, ViewController::back_to_login)
}

pub(crate) async fn logout<T>(State(state): State<PageState<T>>, headers: HeaderMap) -> Response
where
    T: UpstreamTransport + 'static,
{
    apply(&state, &headers, ViewController::logout)
}

pub(crate) async fn questionnaire<T>(
    State(state): State<PageState<T>>,
    headers: HeaderMap,
    Form(answers): Form<Answers>,
) -> Response
where
    T: UpstreamTransport + 'static,
{
    apply(&state, &headers, |controller| {
        controller.submit_questionnaire(answers)
    })
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
