//! Composition root: owns the flow controller, the counter store and the
//! route table, and turns a request into a fragment.
//!
//! Routing is synchronous. The only route that needs to wait on the store
//! (today's view count) comes back as [`Dispatch::TodayStats`] so the caller
//! can await it without holding a borrow of the app.

use std::rc::Rc;

use crate::analytics::Analytics;
use crate::config::AppConfig;
use crate::flow::controller::{Effect, FlowController};
use crate::fortune::catalog::Language;
use crate::routes::{self, Response};
use crate::stats::{CounterStore, DailyCounterStore, RemoteStore, Transport};

/// Result of routing one request.
#[derive(Debug, PartialEq, Eq)]
pub enum Dispatch {
    Handled(Response),
    /// Render today's view count once the store answered.
    TodayStats(Language),
}

pub struct App<T> {
    flow: FlowController,
    store: Rc<CounterStore<T>>,
    router: matchit::Router<&'static str>,
}

impl<T: Transport + Default> Default for App<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport + Default> App<T> {
    /// Local counters, no analytics, default dwell. [`configure`](Self::configure)
    /// upgrades the collaborators.
    pub fn new() -> Self {
        Self {
            flow: FlowController::default(),
            store: Rc::new(CounterStore::local()),
            router: build_router(),
        }
    }

    /// Apply the host configuration. Firebase settings that are missing
    /// or blank keep the local store.
    pub fn configure(&mut self, config: &AppConfig) {
        let analytics = Analytics::new(config.ga4_id().map(str::to_string));
        self.flow.reconfigure(analytics, config.loading_dwell_ms);

        self.store = if config.is_firebase_enabled() {
            tracing::info!("daily counters backed by Firebase");
            Rc::new(CounterStore::remote(RemoteStore::new(
                config.firebase.clone(),
                T::default(),
            )))
        } else {
            tracing::info!("Firebase not configured, daily counters kept locally");
            Rc::new(CounterStore::local())
        };
    }

    pub fn flow(&self) -> &FlowController {
        &self.flow
    }

    /// Shared handle to the store, for work that outlives the current borrow.
    pub fn store(&self) -> Rc<CounterStore<T>> {
        Rc::clone(&self.store)
    }

    pub fn route(&mut self, method: &str, path: &str, query: &str, body: &str) -> Dispatch {
        let tag = match self.router.at(path) {
            Ok(matched) => *matched.value,
            Err(_) => {
                let transition = self.flow.normalize(path);
                return Dispatch::Handled(routes::screen_response(&mut self.flow, transition));
            }
        };

        let flow = &mut self.flow;
        let response = match (tag, method) {
            // Screens
            ("intro", "GET") => routes::intro::handle_intro_get(flow),
            ("loading", "GET") => routes::loading::handle_loading_get(flow, query),
            ("result", "GET") => routes::result::handle_result_get(flow, query),
            ("draw", "GET") => {
                routes::loading::handle_draw_get(flow, query, &mut rand::thread_rng())
            }

            // Screen actions
            ("language_toggle", "POST") => routes::handle_language_toggle_post(flow),
            ("feedback", "POST") => routes::result::handle_feedback_post(flow, body),
            ("share", "POST") => routes::result::handle_share_post(flow, body),
            ("retry", "POST") => routes::result::handle_retry_post(flow),
            ("slide", "POST") => routes::result::handle_slide_post(flow, body),

            // Counters
            ("stats_today", "GET") => return Dispatch::TodayStats(flow.language()),
            ("stats_export", "GET") => {
                Response::html(routes::stats::handle_export_get(self.store.local_store()))
            }
            ("stats_import", "POST") => {
                Response::html(routes::stats::handle_import_post(self.store.local_store(), body))
            }

            _ => Response::html(routes::method_not_allowed()),
        };
        Dispatch::Handled(response)
    }
}

fn build_router() -> matchit::Router<&'static str> {
    let mut router = matchit::Router::new();

    router.insert("/", "intro").ok();
    router.insert("/loading", "loading").ok();
    router.insert("/result", "result").ok();
    router.insert("/api/fortune/draw", "draw").ok();

    router.insert("/api/language/toggle", "language_toggle").ok();
    router.insert("/api/result/feedback", "feedback").ok();
    router.insert("/api/result/share", "share").ok();
    router.insert("/api/result/retry", "retry").ok();
    router.insert("/api/result/slide", "slide").ok();

    router.insert("/api/stats/today", "stats_today").ok();
    router.insert("/api/stats/export", "stats_export").ok();
    router.insert("/api/stats/import", "stats_import").ok();

    router
}

/// Run counter-store effects in order. Failures are logged and dropped;
/// they never reach the visitor.
pub async fn run_effects<S: DailyCounterStore>(store: &S, effects: &[Effect]) {
    for effect in effects {
        let outcome = match effect {
            Effect::IncrementViews => store.increment_views().await.map(|_| ()),
            Effect::RecordFeedback(kind) => store.record_feedback(*kind).await,
        };
        if let Err(e) = outcome {
            tracing::warn!(error = %e, ?effect, "counter update failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FirebaseConfig;
    use crate::flow::controller::FlowState;
    use crate::stats::{FeedbackKind, NoTransport};

    type TestApp = App<NoTransport>;

    fn handled(dispatch: Dispatch) -> Response {
        match dispatch {
            Dispatch::Handled(response) => response,
            other => panic!("expected a handled response, got {:?}", other),
        }
    }

    fn get(app: &mut TestApp, path: &str, query: &str) -> Response {
        handled(app.route("GET", path, query, ""))
    }

    fn post(app: &mut TestApp, path: &str, body: &str) -> Response {
        handled(app.route("POST", path, "", body))
    }

    /// Query the intro button sends, token included.
    fn intro_query(app: &TestApp) -> String {
        let token = app.flow().intro_token().expect("intro token");
        format!("?from_intro=true&intro_token={token}")
    }

    fn current_view(app: &TestApp) -> u64 {
        app.flow().result_view().map(|v| v.id).unwrap_or_default()
    }

    #[test]
    fn unknown_path_lands_on_intro_without_history_entry() {
        let mut app = TestApp::new();
        let response = get(&mut app, "/menu/secret", "");
        assert_eq!(app.flow().state(), &FlowState::Intro);
        assert!(response.html.contains("replaceState"));
        assert!(response.html.contains(r#"hx-get="/loading""#));
    }

    #[test]
    fn typed_loading_url_is_rejected() {
        let mut app = TestApp::new();
        let response = get(&mut app, "/loading", "");
        assert_eq!(app.flow().state(), &FlowState::Intro);
        assert!(response.html.contains("replaceState"));
    }

    #[test]
    fn typed_loading_url_with_marker_is_rejected() {
        let mut app = TestApp::new();
        let response = get(&mut app, "/loading", "?from_intro=true");
        assert_eq!(app.flow().state(), &FlowState::Intro);
        assert!(response.html.contains("replaceState"));
        assert!(!response.html.contains("/api/fortune/draw"));
    }

    #[test]
    fn loading_from_result_screen_is_rejected() {
        let mut app = TestApp::new();
        let query = intro_query(&app);
        get(&mut app, "/result", "?id=0&color=Red&num=7&place=Terrace");
        assert!(app.flow().result_view().is_some());

        let response = get(&mut app, "/loading", &query);
        assert_eq!(app.flow().state(), &FlowState::Intro);
        assert!(response.html.contains("replaceState"));
        assert!(response.effects.is_empty());
    }

    #[test]
    fn negative_lucky_number_link_shows_result() {
        let mut app = TestApp::new();
        let response = get(&mut app, "/result", "?id=0&color=Red&num=-7&place=Terrace");
        let view = app.flow().result_view().expect("result view");
        assert_eq!(view.selection.lucky_number, -7);
        assert_eq!(response.effects, vec![Effect::IncrementViews]);
    }

    #[test]
    fn link_missing_a_key_goes_to_intro() {
        let mut app = TestApp::new();
        let response = get(&mut app, "/result", "?id=1&color=Red&place=Terrace");
        assert_eq!(app.flow().state(), &FlowState::Intro);
        assert!(response.effects.is_empty());
    }

    #[test]
    fn wrong_method_on_known_path_is_405() {
        let mut app = TestApp::new();
        let response = post(&mut app, "/", "");
        assert!(response.html.contains("405"));
        let response = get(&mut app, "/api/result/feedback", "");
        assert!(response.html.contains("405"));
    }

    #[test]
    fn stats_today_is_deferred() {
        let mut app = TestApp::new();
        post(&mut app, "/api/language/toggle", "");
        assert_eq!(
            app.route("GET", "/api/stats/today", "", ""),
            Dispatch::TodayStats(Language::En)
        );
    }

    #[tokio::test]
    async fn intro_to_result_counts_one_view_and_one_feedback() {
        let mut app = TestApp::new();
        get(&mut app, "/", "");
        let query = intro_query(&app);
        get(&mut app, "/loading", &query);
        let FlowState::Loading { ticket } = *app.flow().state() else {
            panic!("expected loading");
        };

        let response = get(&mut app, "/api/fortune/draw", &format!("?ticket={ticket}"));
        assert_eq!(response.effects, vec![Effect::IncrementViews]);
        run_effects(app.store().as_ref(), &response.effects).await;

        let view = current_view(&app);
        let like = post(&mut app, "/api/result/feedback", &format!("view={view}&kind=like"));
        run_effects(app.store().as_ref(), &like.effects).await;
        let again = post(&mut app, "/api/result/feedback", &format!("view={view}&kind=like"));
        run_effects(app.store().as_ref(), &again.effects).await;

        let stats = app.store().local_store().today();
        assert_eq!(stats.views, 1);
        assert_eq!(stats.likes, 1);
        assert_eq!(stats.dislikes, 0);
    }

    #[tokio::test]
    async fn language_toggle_does_not_count_a_view() {
        let mut app = TestApp::new();
        let response = get(&mut app, "/result", "?id=3&color=Green&num=5&place=Terrace");
        run_effects(app.store().as_ref(), &response.effects).await;

        let toggled = post(&mut app, "/api/language/toggle", "");
        assert!(toggled.effects.is_empty());
        assert!(toggled.html.contains("Green"));
        assert_eq!(app.store().local_store().today().views, 1);
    }

    #[test]
    fn configure_without_firebase_stays_local() {
        let mut app = TestApp::new();
        let config = AppConfig::from_json(r#"{"loadingDwellMs": 500}"#).unwrap();
        app.configure(&config);
        assert!(!app.store().is_remote());
        assert_eq!(app.flow().loading_dwell_ms(), 500);
        assert!(!app.flow().analytics().is_enabled());
    }

    #[tokio::test]
    async fn unreachable_remote_falls_back_to_local_counts() {
        let mut app = TestApp::new();
        app.configure(&AppConfig {
            firebase: FirebaseConfig {
                api_key: Some("key".to_string()),
                database_url: Some("https://demo.firebaseio.com".to_string()),
                project_id: Some("demo".to_string()),
                ..FirebaseConfig::default()
            },
            ga4_measurement_id: Some("G-TEST1".to_string()),
            ..AppConfig::default()
        });
        assert!(app.store().is_remote());
        assert!(app.flow().analytics().is_enabled());

        run_effects(
            app.store().as_ref(),
            &[
                Effect::IncrementViews,
                Effect::RecordFeedback(FeedbackKind::Dislike),
            ],
        )
        .await;
        let stats = app.store().local_store().today();
        assert_eq!((stats.views, stats.dislikes), (1, 1));
    }

    #[test]
    fn export_and_import_round_trip_through_routes() {
        let mut app = TestApp::new();
        let snapshot = r#"{"2024-03-01":{"views":7,"likes":2,"dislikes":1}}"#;
        let imported = post(&mut app, "/api/stats/import", snapshot);
        assert!(imported.html.contains("Restored 1 day(s)"));

        let exported = get(&mut app, "/api/stats/export", "");
        assert_eq!(exported.html, snapshot);
    }
}
