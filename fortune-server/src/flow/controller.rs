//! Three-screen flow: intro → loading → result.
//!
//! The controller owns the session's screen state and display language and
//! decides transitions. It performs no I/O: counter-store work comes back as
//! [`Effect`]s for the composition root to run, analytics events are queued
//! in the owned [`Analytics`], and history changes come back as
//! [`Navigation`]s for the renderer to emit.

use rand::Rng;
use serde_json::{json, Map, Value};

use crate::analytics::Analytics;
use crate::config::DEFAULT_LOADING_DWELL_MS;
use crate::flow::guard::{guard_loading, GuardDecision, NavigationIntent};
use crate::fortune::catalog::{Language, TextKey, MENU_ITEMS};
use crate::fortune::codec::{self, SharableState, KEY_UTM_SOURCE};
use crate::fortune::generator::generate;
use crate::fortune::FortuneSelection;
use crate::stats::FeedbackKind;

pub const INTRO_PATH: &str = "/";
pub const LOADING_PATH: &str = "/loading";
pub const RESULT_PATH: &str = "/result";

/// Feedback state of one result view. Leaves `None` at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedbackSelection {
    #[default]
    None,
    Like,
    Dislike,
}

impl From<FeedbackKind> for FeedbackSelection {
    fn from(kind: FeedbackKind) -> Self {
        match kind {
            FeedbackKind::Like => FeedbackSelection::Like,
            FeedbackKind::Dislike => FeedbackSelection::Dislike,
        }
    }
}

/// One mounted result screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    /// Session-unique id; feedback posted for another id is ignored.
    pub id: u64,
    pub selection: FortuneSelection,
    pub feedback: FeedbackSelection,
    pub utm_source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState {
    Intro,
    /// Waiting for the dwell to elapse. Only a draw carrying this ticket completes it.
    Loading { ticket: u64 },
    Result(ResultView),
}

/// Counter-store work requested by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    IncrementViews,
    RecordFeedback(FeedbackKind),
}

/// History change the page should apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub path: String,
    /// Replace the current history entry instead of pushing a new one.
    pub replace: bool,
}

impl Navigation {
    pub fn push(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            replace: false,
        }
    }

    pub fn replace(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            replace: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transition {
    pub navigation: Option<Navigation>,
    pub effects: Vec<Effect>,
    pub toast: Option<TextKey>,
}

impl Transition {
    fn redirect_to_intro() -> Self {
        Self {
            navigation: Some(Navigation::replace(INTRO_PATH)),
            ..Self::default()
        }
    }
}

pub struct FlowController {
    state: FlowState,
    language: Language,
    analytics: Analytics,
    loading_dwell_ms: u32,
    next_ticket: u64,
    next_view: u64,
    /// One-time token of the intro on screen; consumed by `enter_loading`.
    intro_token: Option<u64>,
}

impl Default for FlowController {
    fn default() -> Self {
        Self::new(Language::default(), Analytics::disabled(), DEFAULT_LOADING_DWELL_MS)
    }
}

impl FlowController {
    pub fn new(language: Language, analytics: Analytics, loading_dwell_ms: u32) -> Self {
        Self {
            state: FlowState::Intro,
            language,
            analytics,
            loading_dwell_ms,
            next_ticket: 1,
            next_view: 1,
            intro_token: Some(rand::random()),
        }
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn loading_dwell_ms(&self) -> u32 {
        self.loading_dwell_ms
    }

    pub fn analytics(&self) -> &Analytics {
        &self.analytics
    }

    pub fn analytics_mut(&mut self) -> &mut Analytics {
        &mut self.analytics
    }

    /// Swap in new collaborators after the host configured the app.
    pub fn reconfigure(&mut self, analytics: Analytics, loading_dwell_ms: u32) {
        self.analytics = analytics;
        self.loading_dwell_ms = loading_dwell_ms;
    }

    /// Token the rendered intro hands back with its loading request.
    pub fn intro_token(&self) -> Option<u64> {
        match self.state {
            FlowState::Intro => self.intro_token,
            _ => None,
        }
    }

    pub fn result_view(&self) -> Option<&ResultView> {
        match &self.state {
            FlowState::Result(view) => Some(view),
            _ => None,
        }
    }

    // ── Screens ────────────────────────────────────────────────────

    /// Show the intro. Any pending loading is abandoned.
    pub fn enter_intro(&mut self) -> Transition {
        self.show_intro();
        Transition::default()
    }

    /// Unknown paths land on the intro without leaving a history entry.
    pub fn normalize(&mut self, path: &str) -> Transition {
        tracing::debug!(path, "unrecognized path, normalizing to intro");
        self.show_intro();
        Transition::redirect_to_intro()
    }

    /// Enter the loading screen if the request came from the intro button
    /// currently on screen. The intro's token is spent either way.
    pub fn enter_loading(&mut self, intent: Option<NavigationIntent>) -> Transition {
        match guard_loading(intent, self.intro_token()) {
            GuardDecision::Allow => {
                let ticket = self.next_ticket;
                self.next_ticket += 1;
                self.intro_token = None;
                self.state = FlowState::Loading { ticket };
                Transition::default()
            }
            GuardDecision::RedirectToIntro => {
                tracing::debug!("loading entered without intro intent, redirecting");
                self.show_intro();
                Transition::redirect_to_intro()
            }
        }
    }

    /// The dwell elapsed: draw, encode into the result URL and enter the result.
    ///
    /// A ticket that no longer matches the current loading state belongs to a
    /// torn-down loading screen and is ignored.
    pub fn complete_loading<R: Rng + ?Sized>(&mut self, ticket: u64, rng: &mut R) -> Transition {
        if self.state != (FlowState::Loading { ticket }) {
            tracing::debug!(ticket, "stale loading timer cancelled");
            return Transition::default();
        }

        let selection = generate(self.language, rng);
        let link = match codec::encode(&selection, self.language) {
            Ok(link) => link,
            Err(e) => {
                tracing::warn!(error = %e, "drawn fortune could not be encoded");
                self.show_intro();
                return Transition::redirect_to_intro();
            }
        };

        let mut transition = self.enter_result(&link);
        if matches!(self.state, FlowState::Result(_)) {
            transition.navigation = Some(Navigation::push(format!(
                "{RESULT_PATH}?{}",
                link.to_query()
            )));
        }
        transition
    }

    /// Mount a result view from a link (fresh draw, reload or shared URL).
    pub fn enter_result(&mut self, link: &SharableState) -> Transition {
        let selection = match codec::decode(link, self.language) {
            Ok(selection) => selection,
            Err(e) => {
                tracing::debug!(error = %e, "unresolvable fortune link");
                self.show_intro();
                return Transition::redirect_to_intro();
            }
        };

        let view = ResultView {
            id: self.next_view,
            selection,
            feedback: FeedbackSelection::None,
            utm_source: link
                .get(KEY_UTM_SOURCE)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        };
        self.next_view += 1;
        self.intro_token = None;
        self.state = FlowState::Result(view);
        self.track_result_view();

        Transition {
            effects: vec![Effect::IncrementViews],
            ..Transition::default()
        }
    }

    // ── Result actions ─────────────────────────────────────────────

    /// Record the first like/dislike of the current view; later ones are ignored.
    pub fn feedback(&mut self, view_id: u64, kind: FeedbackKind) -> Transition {
        let FlowState::Result(view) = &mut self.state else {
            return Transition::default();
        };
        if view.id != view_id || view.feedback != FeedbackSelection::None {
            tracing::debug!(view_id, kind = kind.as_str(), "feedback ignored");
            return Transition::default();
        }
        view.feedback = kind.into();

        let mut params = json!({
            "type": kind.as_str(),
            "fortune_id": view.selection.fortune_id,
        });
        add_utm(&mut params, view.utm_source.as_deref());
        self.analytics.track("feedback", params);

        Transition {
            effects: vec![Effect::RecordFeedback(kind)],
            toast: Some(TextKey::FeedbackToast),
            ..Transition::default()
        }
    }

    /// The page copied `url` to the clipboard.
    pub fn share(&mut self, url: &str) -> Transition {
        let Some(view) = self.result_view() else {
            return Transition::default();
        };
        let mut params = json!({ "url": url });
        add_utm(&mut params, view.utm_source.as_deref());
        self.analytics.track("share", params);
        Transition {
            toast: Some(TextKey::ShareToast),
            ..Transition::default()
        }
    }

    /// Leave the result for a new draw. Nothing is carried back.
    pub fn retry(&mut self) -> Transition {
        if self.result_view().is_some() {
            self.analytics.track("retry_fortune", Value::Null);
        }
        self.show_intro();
        Transition {
            navigation: Some(Navigation::push(INTRO_PATH)),
            ..Transition::default()
        }
    }

    /// The promotional slider showed slide `index`.
    pub fn view_slide(&mut self, index: usize) -> Transition {
        if self.result_view().is_none() {
            return Transition::default();
        }
        if let Some(item) = MENU_ITEMS.get(index) {
            self.analytics.track(
                "view_slide",
                json!({ "menu_id": item.id, "menu_name": item.name.get(self.language) }),
            );
        }
        Transition::default()
    }

    // ── Language ───────────────────────────────────────────────────

    /// Change the display language. Stored indices are kept; only the
    /// rendered text changes.
    pub fn set_language(&mut self, language: Language) -> Transition {
        if self.language != language {
            self.language = language;
            if self.result_view().is_some() {
                self.track_result_view();
            }
        }
        Transition::default()
    }

    pub fn toggle_language(&mut self) -> Transition {
        self.set_language(self.language.other())
    }

    /// Put the intro on screen with a fresh token.
    fn show_intro(&mut self) {
        self.state = FlowState::Intro;
        self.intro_token = Some(rand::random());
    }

    fn track_result_view(&mut self) {
        let language = self.language;
        let Some(view) = self.result_view() else {
            return;
        };
        let mut params = json!({
            "fortune_id": view.selection.fortune_id,
            "language": language.code(),
        });
        add_utm(&mut params, view.utm_source.as_deref());
        self.analytics.track("view_fortune", params);
    }
}

fn add_utm(params: &mut Value, utm_source: Option<&str>) {
    if let (Value::Object(map), Some(source)) = (params, utm_source) {
        insert(map, "utm_source", source);
    }
}

fn insert(map: &mut Map<String, Value>, key: &str, value: &str) {
    map.insert(key.to_string(), Value::String(value.to_string()));
}
