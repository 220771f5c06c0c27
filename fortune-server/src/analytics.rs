//! Analytics collaborator.
//!
//! `track` never fails and never blocks: events are buffered and flushed into
//! the next response fragment as a `gtag` script for the page to run. Without
//! a GA4 measurement id the events are written to the log instead.

use serde_json::{Map, Value};

use crate::routes::util::script_json;

const GTAG_LOADER: &str = "https://www.googletagmanager.com/gtag/js?id=";

#[derive(Debug, Clone, PartialEq)]
pub struct TrackedEvent {
    pub name: String,
    pub params: Map<String, Value>,
}

#[derive(Debug, Default)]
pub struct Analytics {
    measurement_id: Option<String>,
    initialized: bool,
    pending: Vec<TrackedEvent>,
}

impl Analytics {
    pub fn new(measurement_id: Option<String>) -> Self {
        Self {
            measurement_id,
            initialized: false,
            pending: Vec::new(),
        }
    }

    pub fn disabled() -> Self {
        Self::new(None)
    }

    pub fn is_enabled(&self) -> bool {
        self.measurement_id.is_some()
    }

    /// Queue an event. Non-object `params` are treated as no parameters.
    pub fn track(&mut self, name: &str, params: Value) {
        let params = match params {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        self.pending.push(TrackedEvent {
            name: name.to_string(),
            params,
        });
    }

    /// Events queued since the last flush.
    pub fn pending(&self) -> &[TrackedEvent] {
        &self.pending
    }

    /// Drain queued events. Returns a `<script>` fragment when GA4 is
    /// configured (including the one-time loader), otherwise logs the events
    /// and returns an empty string.
    pub fn flush(&mut self) -> String {
        if self.pending.is_empty() {
            return String::new();
        }
        let events = std::mem::take(&mut self.pending);

        let Some(id) = self.measurement_id.as_deref() else {
            for event in &events {
                let params = Value::Object(event.params.clone());
                tracing::info!(event = %event.name, params = %params, "analytics event (not configured)");
            }
            return String::new();
        };

        let id_literal = script_json(&Value::String(id.to_string()));
        let mut script = String::with_capacity(256 + events.len() * 96);
        script.push_str("<script>\n(function() {\n");
        if !self.initialized {
            script.push_str(&format!(
                "  var s = document.createElement('script');\n  s.async = true;\n  s.src = {};\n  document.head.appendChild(s);\n",
                script_json(&Value::String(format!("{GTAG_LOADER}{id}")))
            ));
            script.push_str("  window.dataLayer = window.dataLayer || [];\n");
            script.push_str("  window.gtag = window.gtag || function() { window.dataLayer.push(arguments); };\n");
            script.push_str("  window.gtag('js', new Date());\n");
            script.push_str(&format!("  window.gtag('config', {id_literal});\n"));
            self.initialized = true;
            tracing::info!(measurement_id = id, "analytics initialized");
        }
        for event in events {
            script.push_str(&format!(
                "  window.gtag('event', {}, {});\n",
                script_json(&Value::String(event.name)),
                script_json(&Value::Object(event.params))
            ));
        }
        script.push_str("})();\n</script>");
        script
    }
}
