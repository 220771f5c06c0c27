//! Coffee fortune in-browser WASM server.
//!
//! Exports `configure(json)` and `handle_request(method, path, query, body)`
//! for the worker bridge to call. Uses `matchit` for URL routing. Every
//! response is an HTML fragment for HTMX to swap into the page.
//!
//! Flow: intro → loading (fixed dwell) → result, with the result encoded in
//! a shareable URL. Daily views, likes and dislikes are counted in Firebase
//! when configured, locally otherwise.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;

pub mod analytics;
pub mod app;
pub mod config;
pub mod error;
pub mod flow;
pub mod fortune;
pub mod routes;
pub mod stats;

use app::{App, Dispatch};
use config::AppConfig;
use flow::controller::Effect;
use stats::{CounterStore, PlatformTransport};

thread_local! {
    static APP: RefCell<App<PlatformTransport>> = RefCell::new(App::new());
}

/// Apply the host configuration (Firebase, GA4, loading dwell).
///
/// Returns `"ok"`, or `"error: …"` when the document is rejected; the
/// previous configuration then stays in effect.
#[wasm_bindgen]
pub fn configure(config_json: &str) -> String {
    match AppConfig::from_json(config_json) {
        Ok(config) => {
            APP.with(|app| app.borrow_mut().configure(&config));
            "ok".to_string()
        }
        Err(e) => {
            tracing::warn!(error = %e, "configuration rejected");
            format!("error: {e}")
        }
    }
}

/// Process an HTTP-like request and return an HTML fragment.
///
/// # Arguments
/// * `method` — HTTP method (`"GET"` or `"POST"`)
/// * `path`   — hash route path (e.g. `"/result"`)
/// * `query`  — query string (e.g. `"?id=3&color=Red&num=7&place=Terrace"`)
/// * `body`   — form-encoded body for POST requests, empty for GET
#[wasm_bindgen]
pub async fn handle_request(method: String, path: String, query: String, body: String) -> String {
    let (dispatch, store) = APP.with(|app| {
        let mut app = app.borrow_mut();
        let dispatch = app.route(&method, &path, &query, &body);
        (dispatch, app.store())
    });

    match dispatch {
        Dispatch::Handled(response) => {
            dispatch_effects(store, response.effects).await;
            response.html
        }
        Dispatch::TodayStats(language) => {
            routes::stats::handle_today_get(store.as_ref(), language).await
        }
    }
}

/// Counter updates run in the background; the fragment does not wait.
#[cfg(target_arch = "wasm32")]
async fn dispatch_effects(store: Rc<CounterStore<PlatformTransport>>, effects: Vec<Effect>) {
    if effects.is_empty() {
        return;
    }
    wasm_bindgen_futures::spawn_local(async move {
        app::run_effects(store.as_ref(), &effects).await;
    });
}

/// Without a browser event loop the updates complete before returning.
#[cfg(not(target_arch = "wasm32"))]
async fn dispatch_effects(store: Rc<CounterStore<PlatformTransport>>, effects: Vec<Effect>) {
    app::run_effects(store.as_ref(), &effects).await;
}
