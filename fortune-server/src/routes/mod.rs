//! Route handlers and the HTML fragments they return.
//!
//! Every screen replaces the contents of `#app`. History changes, analytics
//! scripts and toasts ride along as out-of-band swaps into `#effects` and
//! `#toast`, which the page shell provides.

pub mod intro;
pub mod loading;
pub mod result;
pub mod stats;
pub mod util;

use crate::flow::controller::{Effect, FlowController, FlowState, Navigation, Transition};
use crate::fortune::catalog::{t, Language};
use util::{escape_html, script_json};

/// A rendered fragment plus the counter-store work the transition asked for.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Response {
    pub html: String,
    pub effects: Vec<Effect>,
}

impl Response {
    pub fn html(html: String) -> Self {
        Self {
            html,
            effects: Vec::new(),
        }
    }
}

/// Render whichever screen the controller is on.
pub fn render_screen(flow: &FlowController) -> String {
    let language = flow.language();
    match flow.state() {
        FlowState::Intro => intro::render_intro(language, flow.intro_token()),
        FlowState::Loading { ticket } => {
            loading::render_loading(language, *ticket, flow.loading_dwell_ms())
        }
        FlowState::Result(view) => match result::render_result(language, view) {
            Some(html) => html,
            None => {
                tracing::warn!(view = view.id, "result view no longer resolves");
                intro::render_intro(language, None)
            }
        },
    }
}

/// Attach the side channels of a transition to `body`: the history script,
/// the toast and any queued analytics.
pub fn finish(flow: &mut FlowController, transition: Transition, body: String) -> Response {
    let Transition {
        navigation,
        effects,
        toast,
    } = transition;

    let mut html = body;
    if let Some(key) = toast {
        html.push_str(&render_toast(t(key, flow.language())));
    }

    let mut scripts = String::new();
    if let Some(nav) = navigation {
        scripts.push_str(&render_navigation(&nav));
    }
    scripts.push_str(&flow.analytics_mut().flush());
    if !scripts.is_empty() {
        html.push_str(r#"<div id="effects" hx-swap-oob="innerHTML">"#);
        html.push_str(&scripts);
        html.push_str("</div>");
    }

    Response { html, effects }
}

/// Re-render the current screen after `transition`.
pub fn screen_response(flow: &mut FlowController, transition: Transition) -> Response {
    let body = render_screen(flow);
    finish(flow, transition, body)
}

/// History update for the hash-routed page.
pub fn render_navigation(nav: &Navigation) -> String {
    let method = if nav.replace { "replaceState" } else { "pushState" };
    let target = script_json(&serde_json::Value::String(format!("#{}", nav.path)));
    format!("<script>history.{method}(null, '', {target});</script>")
}

/// Two-second notice, swapped into `#toast` out of band.
pub fn render_toast(message: &str) -> String {
    format!(
        r#"<div id="toast" hx-swap-oob="true" x-data="{{ show: true }}" x-init="setTimeout(() => show = false, 2000)" x-show="show" x-transition.opacity class="fixed bottom-8 left-1/2 -translate-x-1/2 bg-stone-800 text-amber-50 text-sm px-4 py-2 rounded-full shadow-lg">{}</div>"#,
        escape_html(message)
    )
}

/// Toggle button labelled with the language it switches to.
pub fn render_language_toggle(language: Language) -> String {
    format!(
        r##"<button class="absolute top-4 right-4 text-xs font-bold border border-stone-400 text-stone-600 rounded-full px-3 py-1 hover:bg-stone-100" hx-post="/api/language/toggle" hx-target="#app" hx-swap="innerHTML">{}</button>"##,
        language.other().code()
    )
}

/// POST /api/language/toggle
pub fn handle_language_toggle_post(flow: &mut FlowController) -> Response {
    let transition = flow.toggle_language();
    screen_response(flow, transition)
}

pub fn method_not_allowed() -> String {
    r#"<span class="text-red-700">405 — method not allowed</span>"#.to_string()
}
