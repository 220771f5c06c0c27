//! `/result` and `/api/result/*` — the fortune, feedback, sharing and retry.

use crate::flow::controller::{FeedbackSelection, FlowController, ResultView};
use crate::fortune::catalog::{t, Language, TextKey, MENU_ITEMS};
use crate::fortune::codec::SharableState;
use crate::routes::util::{escape_html, get_param, parse_form_body};
use crate::routes::{finish, render_language_toggle, screen_response, Response};
use crate::stats::FeedbackKind;

// ── GET /result ────────────────────────────────────────────────────

/// Handle GET /result?id=&color=&num=&place=[&utm_source=]
/// Fresh draws, reloads and shared links all arrive here. A link that does
/// not decode sends the visitor to the intro.
pub fn handle_result_get(flow: &mut FlowController, query: &str) -> Response {
    let link = SharableState::from_query(query);
    let transition = flow.enter_result(&link);
    screen_response(flow, transition)
}

// ── POST /api/result/feedback ──────────────────────────────────────

/// Handle POST /api/result/feedback
/// Body params: view={id}&kind=like|dislike
/// Returns the re-rendered feedback block.
pub fn handle_feedback_post(flow: &mut FlowController, body: &str) -> Response {
    let params = parse_form_body(body);
    let view_id = get_param(&params, "view").and_then(|s| s.parse::<u64>().ok());
    let kind = get_param(&params, "kind").and_then(FeedbackKind::parse);

    let transition = match (view_id, kind) {
        (Some(view_id), Some(kind)) => flow.feedback(view_id, kind),
        _ => {
            tracing::debug!(body, "malformed feedback request");
            Default::default()
        }
    };
    let language = flow.language();
    let block = flow
        .result_view()
        .map(|view| render_feedback(language, view))
        .unwrap_or_default();
    finish(flow, transition, block)
}

// ── POST /api/result/share ─────────────────────────────────────────

/// Handle POST /api/result/share
/// Body params: url={copied url}
/// Sent after the page copied the link; answers with the toast only.
pub fn handle_share_post(flow: &mut FlowController, body: &str) -> Response {
    let params = parse_form_body(body);
    let url = get_param(&params, "url").unwrap_or("");
    let transition = flow.share(url);
    finish(flow, transition, String::new())
}

// ── POST /api/result/retry ─────────────────────────────────────────

/// Handle POST /api/result/retry
/// Back to the intro for another draw.
pub fn handle_retry_post(flow: &mut FlowController) -> Response {
    let transition = flow.retry();
    screen_response(flow, transition)
}

// ── POST /api/result/slide ─────────────────────────────────────────

/// Handle POST /api/result/slide
/// Body params: index={n}
pub fn handle_slide_post(flow: &mut FlowController, body: &str) -> Response {
    let params = parse_form_body(body);
    let transition = match get_param(&params, "index").and_then(|s| s.parse::<usize>().ok()) {
        Some(index) => flow.view_slide(index),
        None => Default::default(),
    };
    finish(flow, transition, String::new())
}

// ── Rendering ──────────────────────────────────────────────────────

/// Render the result screen for `view`. `None` when the stored indices do
/// not resolve in either language.
pub fn render_result(language: Language, view: &ResultView) -> Option<String> {
    let fortune = view.selection.resolve_or_fallback(language)?;

    let mut html = String::with_capacity(4096);
    html.push_str(&format!(
        r#"<section class="relative min-h-screen flex flex-col items-center gap-6 bg-amber-50 px-6 py-12" lang="{}">"#,
        language.html_lang()
    ));
    html.push_str(&render_language_toggle(language));

    // Fortune
    html.push_str(&format!(
        r#"<h1 class="text-2xl font-bold text-stone-800">{}</h1>"#,
        escape_html(t(TextKey::TodaysFortune, language))
    ));
    html.push_str(&format!(
        r#"<p class="max-w-md text-lg text-stone-700 text-center leading-relaxed whitespace-pre-wrap">{}</p>"#,
        escape_html(fortune.text)
    ));

    // Lucky items
    html.push_str(r#"<div class="w-full max-w-md bg-white rounded-2xl shadow p-5">"#);
    html.push_str(&format!(
        r#"<h2 class="text-sm font-bold text-stone-500 mb-3">{}</h2>"#,
        escape_html(t(TextKey::LuckyItems, language))
    ));
    html.push_str(r#"<dl class="grid grid-cols-3 gap-3 text-center">"#);
    html.push_str(&format!(
        r#"<div><dt class="text-xs text-stone-500">{}</dt><dd class="flex items-center justify-center gap-1 font-bold text-stone-800"><span class="inline-block w-3 h-3 rounded-full border border-stone-300" style="background-color: {}"></span>{}</dd></div>"#,
        escape_html(t(TextKey::LuckyColor, language)),
        escape_html(fortune.color_hex),
        escape_html(fortune.color_name)
    ));
    html.push_str(&format!(
        r#"<div><dt class="text-xs text-stone-500">{}</dt><dd class="font-bold text-stone-800">{}</dd></div>"#,
        escape_html(t(TextKey::LuckyNumber, language)),
        fortune.lucky_number
    ));
    html.push_str(&format!(
        r#"<div><dt class="text-xs text-stone-500">{}</dt><dd class="font-bold text-stone-800">{}</dd></div>"#,
        escape_html(t(TextKey::LuckyPlace, language)),
        escape_html(fortune.place)
    ));
    html.push_str("</dl></div>");

    html.push_str(&render_feedback(language, view));
    html.push_str(r#"<hr class="w-full max-w-md border-stone-200">"#);
    html.push_str(&render_menu_slider(language));
    html.push_str(&render_actions(language));
    html.push_str(&render_footer(language));

    html.push_str("</section>");
    Some(html)
}

/// Like/dislike block. After a choice both buttons are disabled and the
/// chosen one stays highlighted.
pub fn render_feedback(language: Language, view: &ResultView) -> String {
    let chosen = view.feedback != FeedbackSelection::None;
    let mut html = String::with_capacity(1024);
    html.push_str(r#"<div id="feedback" class="flex flex-col items-center gap-2">"#);
    html.push_str(&format!(
        r#"<p class="text-sm text-stone-600">{}</p>"#,
        escape_html(t(TextKey::FeedbackPrompt, language))
    ));
    html.push_str(r#"<div class="flex gap-4">"#);
    for (kind, selection, icon) in [
        (FeedbackKind::Like, FeedbackSelection::Like, "\u{1F44D}"),
        (FeedbackKind::Dislike, FeedbackSelection::Dislike, "\u{1F44E}"),
    ] {
        let state_classes = if view.feedback == selection {
            "bg-stone-800 ring-2 ring-amber-400"
        } else if chosen {
            "bg-stone-100 opacity-40"
        } else {
            "bg-stone-100 hover:bg-stone-200"
        };
        let disabled = if chosen { " disabled" } else { "" };
        html.push_str(&format!(
            r##"<button class="text-2xl rounded-full w-14 h-14 {state_classes}" aria-label="{kind}" hx-post="/api/result/feedback" hx-vals='{{"view":"{view}","kind":"{kind}"}}' hx-target="#feedback" hx-swap="outerHTML"{disabled}>{icon}</button>"##,
            kind = kind.as_str(),
            view = view.id,
        ));
    }
    html.push_str("</div></div>");
    html
}

/// Promotional menu carousel. Each slide change is reported for analytics.
fn render_menu_slider(language: Language) -> String {
    let count = MENU_ITEMS.len();
    let mut html = String::with_capacity(2048);
    html.push_str(&format!(
        r#"<div class="w-full max-w-md" x-data="{{ i: 0, n: {count} }}" x-init="$watch('i', v => htmx.ajax('POST', '/api/result/slide', {{ values: {{ index: v }}, swap: 'none' }})); htmx.ajax('POST', '/api/result/slide', {{ values: {{ index: 0 }}, swap: 'none' }})">"#
    ));
    html.push_str(&format!(
        r#"<h2 class="text-sm font-bold text-stone-500 mb-3">{}</h2>"#,
        escape_html(t(TextKey::NewMenu, language))
    ));
    html.push_str(r#"<div class="relative overflow-hidden rounded-2xl bg-white shadow">"#);
    for (index, item) in MENU_ITEMS.iter().enumerate() {
        html.push_str(&format!(
            r#"<figure class="p-4 flex flex-col items-center gap-2" x-show="i === {index}" data-menu-id="{}"><img src="{}" alt="{}" class="w-40 h-40 object-cover rounded-xl" loading="lazy"><figcaption class="text-center"><p class="font-bold text-stone-800">{}</p><p class="text-xs text-stone-500">{}</p></figcaption></figure>"#,
            item.id,
            escape_html(item.image),
            escape_html(item.name.get(language)),
            escape_html(item.name.get(language)),
            escape_html(item.description.get(language)),
        ));
    }
    html.push_str(
        r#"<button class="absolute left-2 top-1/2 -translate-y-1/2 text-stone-500" aria-label="previous" @click="i = (i + n - 1) % n">&#8249;</button>"#,
    );
    html.push_str(
        r#"<button class="absolute right-2 top-1/2 -translate-y-1/2 text-stone-500" aria-label="next" @click="i = (i + 1) % n">&#8250;</button>"#,
    );
    html.push_str("</div></div>");
    html
}

fn render_actions(language: Language) -> String {
    let mut html = String::with_capacity(1024);
    html.push_str(r#"<div class="flex gap-3">"#);
    html.push_str(&format!(
        r#"<button class="border border-stone-800 text-stone-800 font-bold rounded-full px-6 py-3 hover:bg-stone-100" x-data @click="navigator.clipboard.writeText(location.href).then(() => htmx.ajax('POST', '/api/result/share', {{ values: {{ url: location.href }}, swap: 'none' }}))">{}</button>"#,
        escape_html(t(TextKey::ShareButton, language))
    ));
    html.push_str(&format!(
        r##"<button class="bg-stone-800 text-amber-50 font-bold rounded-full px-6 py-3 hover:bg-stone-700" hx-post="/api/result/retry" hx-target="#app" hx-swap="innerHTML">{}</button>"##,
        escape_html(t(TextKey::RetryButton, language))
    ));
    html.push_str("</div>");
    html
}

/// Footer with today's view count (loaded after mount) and the cafe info.
fn render_footer(language: Language) -> String {
    format!(
        r#"<footer class="mt-6 flex flex-col items-center gap-1 text-xs text-stone-500"><p id="view-count" hx-get="/api/stats/today" hx-trigger="load" hx-swap="innerHTML"></p><p class="font-bold">{}</p><p>{}</p></footer>"#,
        escape_html(t(TextKey::CafeInfo, language)),
        escape_html(t(TextKey::CafeAddress, language))
    )
}
