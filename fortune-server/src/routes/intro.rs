//! `/` — the intro screen.

use crate::flow::controller::FlowController;
use crate::flow::guard::{FROM_INTRO_PARAM, INTRO_TOKEN_PARAM};
use crate::fortune::catalog::{t, Language, TextKey};
use crate::routes::util::escape_html;
use crate::routes::{render_language_toggle, screen_response, Response};

/// Handle GET /
pub fn handle_intro_get(flow: &mut FlowController) -> Response {
    let transition = flow.enter_intro();
    screen_response(flow, transition)
}

/// Render the intro: title, the fortune button and the language toggle.
///
/// The button is the only way into the loading screen. It carries the
/// `from_intro` marker and the intro's one-time `token` as request values,
/// so neither appears in the URL.
pub fn render_intro(language: Language, token: Option<u64>) -> String {
    let vals = match token {
        Some(token) => {
            format!(r#"{{"{FROM_INTRO_PARAM}":"true","{INTRO_TOKEN_PARAM}":"{token}"}}"#)
        }
        None => format!(r#"{{"{FROM_INTRO_PARAM}":"true"}}"#),
    };
    let mut html = String::with_capacity(1024);
    html.push_str(&format!(
        r#"<section class="relative min-h-screen flex flex-col items-center justify-center gap-10 bg-amber-50 px-6" lang="{}">"#,
        language.html_lang()
    ));
    html.push_str(&render_language_toggle(language));
    html.push_str(r#"<img src="/assets/cup.svg" alt="" class="w-28 h-28">"#);
    html.push_str(&format!(
        r#"<h1 class="text-3xl font-bold text-stone-800 text-center">{}</h1>"#,
        escape_html(t(TextKey::MainTitle, language))
    ));
    html.push_str(&format!(
        r##"<button class="bg-stone-800 text-amber-50 text-lg font-bold rounded-full px-10 py-4 shadow hover:bg-stone-700 active:bg-stone-900" hx-get="/loading" hx-vals='{vals}' hx-target="#app" hx-swap="innerHTML" hx-push-url="#/loading">{}</button>"##,
        escape_html(t(TextKey::ViewFortuneButton, language))
    ));
    html.push_str("</section>");
    html
}
