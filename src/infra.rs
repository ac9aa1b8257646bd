use axum::http::{header, HeaderMap};
use lifestyle_checker::session::{Screen, ViewController};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "lifestyle_session";

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Screen state per browser, held in memory only. A restart logs everyone out.
#[derive(Default, Clone)]
pub struct InMemorySessionStore {
    sessions: Arc<Mutex<HashMap<Uuid, ViewController>>>,
}

impl InMemorySessionStore {
    /// The caller's session id, or a new one. Nothing is stored until a transition leaves
    /// the visitor somewhere other than an empty login form.
    pub(crate) fn resolve(&self, requested: Option<Uuid>) -> Uuid {
        requested.unwrap_or_else(Uuid::new_v4)
    }

    pub(crate) fn screen(&self, id: &Uuid) -> Screen {
        let guard = self.sessions.lock().expect("session mutex poisoned");
        guard
            .get(id)
            .map(|controller| controller.screen().clone())
            .unwrap_or_default()
    }

    /// Run a synchronous transition. Never call across an await point.
    ///
    /// Sessions back on an empty login form are dropped, so logout and abandoned logins
    /// release their entry.
    pub(crate) fn update<R>(&self, id: &Uuid, action: impl FnOnce(&mut ViewController) -> R) -> R {
        let mut guard = self.sessions.lock().expect("session mutex poisoned");
        let controller = guard.entry(*id).or_default();
        let outcome = action(controller);
        if controller.screen() == &Screen::default() {
            guard.remove(id);
        }
        outcome
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().expect("session mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub(crate) fn session_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value).ok())
}

pub(crate) fn session_cookie(id: &Uuid) -> String {
    format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax")
}
