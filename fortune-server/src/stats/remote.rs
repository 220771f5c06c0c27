//! Firebase Realtime Database client over the REST API.
//!
//! ```text
//! daily_stats/
//! └── "2024-05-01"
//!     ├── views: u64
//!     ├── likes: u64
//!     └── dislikes: u64
//! ```
//!
//! Increments use the `{".sv": {"increment": 1}}` server value, so the add
//! happens atomically on the server even when many viewers share a bucket.

use std::cell::OnceCell;

use crate::config::FirebaseConfig;
use crate::error::StoreError;
use crate::stats::day::{Clock, DayKey};
use crate::stats::{DailyCounterStore, DailyStats, FeedbackKind};

const STATS_ROOT: &str = "daily_stats";
const INCREMENT_BODY: &str = r#"{".sv":{"increment":1}}"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Put,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Put => "PUT",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<String>,
}

/// Sends one request and returns the response body of a 2xx reply.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send(&self, request: HttpRequest) -> Result<String, StoreError>;
}

/// Transport for targets without a network bridge; every call fails, which
/// routes the counter store to its local fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTransport;

impl Transport for NoTransport {
    async fn send(&self, _request: HttpRequest) -> Result<String, StoreError> {
        Err(StoreError::Transport(
            "no network transport on this target".to_string(),
        ))
    }
}

pub struct RemoteStore<T> {
    config: FirebaseConfig,
    endpoint: OnceCell<String>,
    transport: T,
    clock: Clock,
}

impl<T: Transport> RemoteStore<T> {
    pub fn new(config: FirebaseConfig, transport: T) -> Self {
        Self::with_clock(config, transport, DayKey::today)
    }

    pub fn with_clock(config: FirebaseConfig, transport: T, clock: Clock) -> Self {
        Self {
            config,
            endpoint: OnceCell::new(),
            transport,
            clock,
        }
    }

    /// Resolve the database endpoint once; later calls return the cached value.
    pub fn ensure_connected(&self) -> Result<&str, StoreError> {
        if let Some(endpoint) = self.endpoint.get() {
            return Ok(endpoint.as_str());
        }
        if !self.config.is_enabled() {
            return Err(StoreError::NotConfigured);
        }
        let url = self
            .config
            .database_url
            .as_deref()
            .map(str::trim)
            .unwrap_or_default();
        if !url.starts_with("https://") {
            return Err(StoreError::InvalidEndpoint(url.to_string()));
        }
        let endpoint = self
            .endpoint
            .get_or_init(|| url.trim_end_matches('/').to_string());
        tracing::info!(%endpoint, "remote counter store connected");
        Ok(endpoint.as_str())
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn day_url(&self, field: Option<&str>) -> Result<String, StoreError> {
        let endpoint = self.ensure_connected()?;
        let day = (self.clock)();
        Ok(match field {
            Some(field) => format!("{endpoint}/{STATS_ROOT}/{day}/{field}.json"),
            None => format!("{endpoint}/{STATS_ROOT}/{day}.json"),
        })
    }

    async fn increment(&self, field: &str) -> Result<String, StoreError> {
        let url = self.day_url(Some(field))?;
        self.transport
            .send(HttpRequest {
                method: Method::Put,
                url,
                body: Some(INCREMENT_BODY.to_string()),
            })
            .await
    }
}

impl<T: Transport> DailyCounterStore for RemoteStore<T> {
    async fn today_stats(&self) -> Result<DailyStats, StoreError> {
        let url = self.day_url(None)?;
        let body = self
            .transport
            .send(HttpRequest {
                method: Method::Get,
                url,
                body: None,
            })
            .await?;
        // A day nobody has visited yet comes back as `null`.
        let stats: Option<DailyStats> = serde_json::from_str(&body)?;
        Ok(stats.unwrap_or_default())
    }

    async fn increment_views(&self) -> Result<Option<u64>, StoreError> {
        let body = self.increment("views").await?;
        // The increment already happened; an odd reply must not trigger the fallback.
        match serde_json::from_str::<u64>(&body) {
            Ok(count) => Ok(Some(count)),
            Err(e) => {
                tracing::debug!(error = %e, "view increment reply without a count");
                Ok(None)
            }
        }
    }

    async fn record_feedback(&self, kind: FeedbackKind) -> Result<(), StoreError> {
        self.increment(kind.counter_field()).await.map(|_| ())
    }
}

/// Scripted transport for tests: records requests, replays canned replies.
#[cfg(test)]
#[derive(Default)]
pub struct ScriptedTransport {
    pub requests: std::cell::RefCell<Vec<HttpRequest>>,
    pub replies: std::cell::RefCell<std::collections::VecDeque<Result<String, StoreError>>>,
}

#[cfg(test)]
impl ScriptedTransport {
    pub fn replying(replies: Vec<Result<String, StoreError>>) -> Self {
        Self {
            requests: Default::default(),
            replies: std::cell::RefCell::new(replies.into()),
        }
    }
}

#[cfg(test)]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<String, StoreError> {
        self.requests.borrow_mut().push(request);
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(StoreError::Transport("no scripted reply".to_string())))
    }
}

#[cfg(target_arch = "wasm32")]
mod fetch {
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Request, RequestInit, Response, WorkerGlobalScope};

    use super::{HttpRequest, Transport};
    use crate::error::StoreError;

    /// `fetch` from the worker global scope the module runs in.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct FetchTransport;

    fn js_error(value: JsValue) -> StoreError {
        StoreError::Transport(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }

    impl Transport for FetchTransport {
        async fn send(&self, request: HttpRequest) -> Result<String, StoreError> {
            let init = RequestInit::new();
            init.set_method(request.method.as_str());
            if let Some(body) = &request.body {
                init.set_body(&JsValue::from_str(body));
            }
            let req = Request::new_with_str_and_init(&request.url, &init).map_err(js_error)?;

            let scope: WorkerGlobalScope = js_sys::global().unchecked_into();
            let value = JsFuture::from(scope.fetch_with_request(&req))
                .await
                .map_err(js_error)?;
            let response: Response = value.dyn_into().map_err(js_error)?;
            if !response.ok() {
                return Err(StoreError::Status(response.status()));
            }
            let text = JsFuture::from(response.text().map_err(js_error)?)
                .await
                .map_err(js_error)?;
            Ok(text.as_string().unwrap_or_default())
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use fetch::FetchTransport;
