//! `/loading` and `/api/fortune/draw` — the dwell between intro and result.

use rand::Rng;

use crate::flow::controller::FlowController;
use crate::flow::guard::NavigationIntent;
use crate::fortune::catalog::{t, Language, TextKey};
use crate::routes::util::{escape_html, get_param, parse_query};
use crate::routes::{render_language_toggle, screen_response, Response};

// ── GET /loading ───────────────────────────────────────────────────

/// Handle GET /loading?from_intro=true&intro_token={n}
/// Without the marker and the current intro's token the guard sends the
/// request back to the intro.
pub fn handle_loading_get(flow: &mut FlowController, query: &str) -> Response {
    let params = parse_query(query);
    let transition = flow.enter_loading(NavigationIntent::from_params(&params));
    screen_response(flow, transition)
}

// ── GET /api/fortune/draw ──────────────────────────────────────────

/// Handle GET /api/fortune/draw?ticket={n}
/// Fired by the loading screen once the dwell elapsed. A stale or missing
/// ticket leaves the current screen as it is.
pub fn handle_draw_get<R: Rng + ?Sized>(
    flow: &mut FlowController,
    query: &str,
    rng: &mut R,
) -> Response {
    let params = parse_query(query);
    let Some(ticket) = get_param(&params, "ticket").and_then(|s| s.parse::<u64>().ok()) else {
        tracing::debug!(query, "draw without a valid ticket");
        return screen_response(flow, Default::default());
    };
    let transition = flow.complete_loading(ticket, rng);
    screen_response(flow, transition)
}

/// Render the loading screen. The hidden trigger fires the draw after
/// `dwell_ms`; if the screen is swapped out first the request never leaves.
pub fn render_loading(language: Language, ticket: u64, dwell_ms: u32) -> String {
    let mut html = String::with_capacity(1024);
    html.push_str(&format!(
        r#"<section class="relative min-h-screen flex flex-col items-center justify-center gap-8 bg-amber-50 px-6" lang="{}">"#,
        language.html_lang()
    ));
    html.push_str(&render_language_toggle(language));
    html.push_str(
        r#"<div class="w-16 h-16 border-4 border-stone-300 border-t-stone-800 rounded-full animate-spin" aria-hidden="true"></div>"#,
    );
    html.push_str(&format!(
        r#"<p class="text-lg text-stone-700 text-center">{}</p>"#,
        escape_html(t(TextKey::LoadingMessage, language))
    ));
    html.push_str(&format!(
        r##"<div hx-get="/api/fortune/draw?ticket={ticket}" hx-trigger="load delay:{dwell_ms}ms" hx-target="#app" hx-swap="innerHTML"></div>"##
    ));
    html.push_str("</section>");
    html
}
