//! `/api/stats/*` — today's view count and the local snapshot the page keeps
//! in localStorage.

use crate::fortune::catalog::{t, Language, TextKey};
use crate::routes::util::{escape_html, format_count};
use crate::stats::{DailyCounterStore, LocalStore};

// ── GET /api/stats/today ───────────────────────────────────────────

/// Handle GET /api/stats/today
/// Returns the localized view-count line, or nothing when no count could
/// be read.
pub async fn handle_today_get<S: DailyCounterStore>(store: &S, language: Language) -> String {
    match store.today_stats().await {
        Ok(stats) => render_view_count(stats.views, language),
        Err(e) => {
            tracing::warn!(error = %e, "today's stats unavailable");
            String::new()
        }
    }
}

pub fn render_view_count(views: u64, language: Language) -> String {
    escape_html(&t(TextKey::ViewCount, language).replace("{count}", &format_count(views)))
}

// ── GET /api/stats/export ──────────────────────────────────────────

/// Handle GET /api/stats/export
/// Returns the local counters as JSON for the page to persist.
pub fn handle_export_get(store: &LocalStore) -> String {
    store.export_json()
}

// ── POST /api/stats/import ─────────────────────────────────────────

/// Handle POST /api/stats/import
/// Body: JSON snapshot from a previous export.
pub fn handle_import_post(store: &LocalStore, body: &str) -> String {
    if body.trim().is_empty() {
        return r#"<span class="text-red-700">Missing snapshot</span>"#.to_string();
    }
    match store.import_json(body) {
        Ok(days) => {
            tracing::debug!(days, "local stats restored");
            format!(r#"<span class="text-emerald-600">Restored {days} day(s)</span>"#)
        }
        Err(e) => {
            tracing::warn!(error = %e, "local stats snapshot rejected");
            format!(
                r#"<span class="text-red-700">Invalid snapshot: {}</span>"#,
                escape_html(&e.to_string())
            )
        }
    }
}
