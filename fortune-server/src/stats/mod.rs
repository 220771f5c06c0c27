//! Daily counter store — views, likes and dislikes per Seoul calendar day.
//!
//! The remote store (Firebase Realtime Database over REST) is used when the
//! host configured it; every failure silently degrades to the in-memory
//! [`LocalStore`], which the host persists to localStorage through
//! `/api/stats/export` and `/api/stats/import`.
//!
//! Counters only ever move through atomic increments: server-side increments
//! remotely, `AtomicU64` locally. Nothing reads a value and writes it back.

pub mod day;
pub mod local;
pub mod remote;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
pub use day::DayKey;
pub use local::LocalStore;
pub use remote::{HttpRequest, Method, NoTransport, RemoteStore, Transport};

#[cfg(target_arch = "wasm32")]
pub use remote::FetchTransport;

/// Transport used by the composition root on this target.
#[cfg(target_arch = "wasm32")]
pub type PlatformTransport = FetchTransport;
#[cfg(not(target_arch = "wasm32"))]
pub type PlatformTransport = NoTransport;

/// Aggregate counters of one daily bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyStats {
    pub views: u64,
    pub likes: u64,
    pub dislikes: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    Like,
    Dislike,
}

impl FeedbackKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "like" => Some(FeedbackKind::Like),
            "dislike" => Some(FeedbackKind::Dislike),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FeedbackKind::Like => "like",
            FeedbackKind::Dislike => "dislike",
        }
    }

    /// Name of the counter field this feedback increments.
    pub fn counter_field(self) -> &'static str {
        match self {
            FeedbackKind::Like => "likes",
            FeedbackKind::Dislike => "dislikes",
        }
    }
}

/// The three operations the flow needs from a daily counter store.
/// All of them act on today's bucket.
#[allow(async_fn_in_trait)]
pub trait DailyCounterStore {
    async fn today_stats(&self) -> Result<DailyStats, StoreError>;

    /// Add one view. Returns the new count when the backend reports it.
    async fn increment_views(&self) -> Result<Option<u64>, StoreError>;

    async fn record_feedback(&self, kind: FeedbackKind) -> Result<(), StoreError>;
}

/// Store selected by configuration: remote with a local fallback, or local only.
pub enum CounterStore<T> {
    Local(LocalStore),
    Remote {
        remote: RemoteStore<T>,
        fallback: LocalStore,
    },
}

impl<T: Transport> CounterStore<T> {
    pub fn local() -> Self {
        CounterStore::Local(LocalStore::new())
    }

    pub fn remote(remote: RemoteStore<T>) -> Self {
        CounterStore::Remote {
            remote,
            fallback: LocalStore::new(),
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, CounterStore::Remote { .. })
    }

    /// The local counters: the whole store, or the fallback behind the remote.
    pub fn local_store(&self) -> &LocalStore {
        match self {
            CounterStore::Local(local) => local,
            CounterStore::Remote { fallback, .. } => fallback,
        }
    }
}

fn log_fallback(operation: &str, error: &StoreError) {
    tracing::warn!(%error, operation, "remote counter store unavailable, using local fallback");
}

impl<T: Transport> DailyCounterStore for CounterStore<T> {
    async fn today_stats(&self) -> Result<DailyStats, StoreError> {
        match self {
            CounterStore::Local(local) => local.today_stats().await,
            CounterStore::Remote { remote, fallback } => match remote.today_stats().await {
                Ok(stats) => Ok(stats),
                Err(e) => {
                    log_fallback("today_stats", &e);
                    fallback.today_stats().await
                }
            },
        }
    }

    async fn increment_views(&self) -> Result<Option<u64>, StoreError> {
        match self {
            CounterStore::Local(local) => local.increment_views().await,
            CounterStore::Remote { remote, fallback } => match remote.increment_views().await {
                Ok(count) => Ok(count),
                Err(e) => {
                    log_fallback("increment_views", &e);
                    fallback.increment_views().await
                }
            },
        }
    }

    async fn record_feedback(&self, kind: FeedbackKind) -> Result<(), StoreError> {
        match self {
            CounterStore::Local(local) => local.record_feedback(kind).await,
            CounterStore::Remote { remote, fallback } => {
                match remote.record_feedback(kind).await {
                    Ok(()) => Ok(()),
                    Err(e) => {
                        log_fallback("record_feedback", &e);
                        fallback.record_feedback(kind).await
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FirebaseConfig;

    fn firebase() -> FirebaseConfig {
        FirebaseConfig {
            api_key: Some("key".to_string()),
            database_url: Some("https://demo.firebaseio.com".to_string()),
            project_id: Some("demo".to_string()),
            ..FirebaseConfig::default()
        }
    }

    #[test]
    fn feedback_kind_parse() {
        assert_eq!(FeedbackKind::parse("like"), Some(FeedbackKind::Like));
        assert_eq!(FeedbackKind::parse("dislike"), Some(FeedbackKind::Dislike));
        assert_eq!(FeedbackKind::parse("meh"), None);
        assert_eq!(FeedbackKind::Dislike.counter_field(), "dislikes");
    }

    #[test]
    fn daily_stats_tolerates_missing_fields() {
        let stats: DailyStats = serde_json::from_str(r#"{"views":4}"#).unwrap();
        assert_eq!(
            stats,
            DailyStats {
                views: 4,
                likes: 0,
                dislikes: 0
            }
        );
    }

    #[tokio::test]
    async fn local_store_counts_views_and_feedback() {
        let store: CounterStore<NoTransport> = CounterStore::local();
        assert!(!store.is_remote());
        assert_eq!(store.increment_views().await.unwrap(), Some(1));
        assert_eq!(store.increment_views().await.unwrap(), Some(2));
        store.record_feedback(FeedbackKind::Like).await.unwrap();
        store.record_feedback(FeedbackKind::Dislike).await.unwrap();
        store.record_feedback(FeedbackKind::Dislike).await.unwrap();

        let stats = store.today_stats().await.unwrap();
        assert_eq!(
            stats,
            DailyStats {
                views: 2,
                likes: 1,
                dislikes: 2
            }
        );
    }

    #[tokio::test]
    async fn unreachable_remote_falls_back_to_local() {
        let store = CounterStore::remote(RemoteStore::new(firebase(), NoTransport));
        assert!(store.is_remote());

        assert_eq!(store.increment_views().await.unwrap(), Some(1));
        store.record_feedback(FeedbackKind::Like).await.unwrap();

        let stats = store.today_stats().await.unwrap();
        assert_eq!(stats.views, 1);
        assert_eq!(stats.likes, 1);
        assert_eq!(store.local_store().today().views, 1);
    }
}
