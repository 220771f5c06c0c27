//! In-memory daily counters.
//!
//! Each day bucket holds three `AtomicU64`s; the map lock is held only long
//! enough to find or create a bucket, so concurrent sessions incrementing the
//! same day never lose an update.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::StoreError;
use crate::stats::day::{Clock, DayKey};
use crate::stats::{DailyCounterStore, DailyStats, FeedbackKind};

#[derive(Debug, Default)]
struct DayBucket {
    views: AtomicU64,
    likes: AtomicU64,
    dislikes: AtomicU64,
}

impl DayBucket {
    fn snapshot(&self) -> DailyStats {
        DailyStats {
            views: self.views.load(Ordering::Relaxed),
            likes: self.likes.load(Ordering::Relaxed),
            dislikes: self.dislikes.load(Ordering::Relaxed),
        }
    }

    fn from_stats(stats: DailyStats) -> Self {
        Self {
            views: AtomicU64::new(stats.views),
            likes: AtomicU64::new(stats.likes),
            dislikes: AtomicU64::new(stats.dislikes),
        }
    }

    fn feedback_counter(&self, kind: FeedbackKind) -> &AtomicU64 {
        match kind {
            FeedbackKind::Like => &self.likes,
            FeedbackKind::Dislike => &self.dislikes,
        }
    }
}

#[derive(Debug)]
pub struct LocalStore {
    days: Mutex<HashMap<DayKey, Arc<DayBucket>>>,
    clock: Clock,
}

impl Default for LocalStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalStore {
    pub fn new() -> Self {
        Self::with_clock(DayKey::today)
    }

    pub fn with_clock(clock: Clock) -> Self {
        Self {
            days: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Bucket for `day`, created empty on first access.
    fn bucket(&self, day: DayKey) -> Arc<DayBucket> {
        self.days.lock().entry(day).or_default().clone()
    }

    pub fn stats_on(&self, day: DayKey) -> DailyStats {
        self.bucket(day).snapshot()
    }

    /// Add one view to `day` and return the new count.
    pub fn increment_views_on(&self, day: DayKey) -> u64 {
        self.bucket(day).views.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn record_feedback_on(&self, day: DayKey, kind: FeedbackKind) -> u64 {
        self.bucket(day)
            .feedback_counter(kind)
            .fetch_add(1, Ordering::Relaxed)
            + 1
    }

    /// Today's counters.
    pub fn today(&self) -> DailyStats {
        self.stats_on((self.clock)())
    }

    /// Snapshot of every bucket as JSON keyed by `YYYY-MM-DD`, for the host
    /// to keep in localStorage.
    pub fn export_json(&self) -> String {
        let snapshot: BTreeMap<String, DailyStats> = self
            .days
            .lock()
            .iter()
            .map(|(day, bucket)| (day.to_string(), bucket.snapshot()))
            .collect();
        serde_json::to_string(&snapshot).unwrap_or_else(|_| "{}".to_string())
    }

    /// Restore buckets from a previous [`export_json`](Self::export_json).
    /// Days present in the snapshot replace the in-memory buckets; malformed
    /// day keys are skipped.
    pub fn import_json(&self, json: &str) -> Result<usize, StoreError> {
        let snapshot: BTreeMap<String, DailyStats> = serde_json::from_str(json)?;
        let mut days = self.days.lock();
        let mut restored = 0;
        for (key, stats) in snapshot {
            match key.parse::<chrono::NaiveDate>() {
                Ok(date) => {
                    days.insert(DayKey::from_date(date), Arc::new(DayBucket::from_stats(stats)));
                    restored += 1;
                }
                Err(e) => tracing::debug!(day = %key, error = %e, "skipping malformed day key"),
            }
        }
        Ok(restored)
    }
}

impl DailyCounterStore for LocalStore {
    async fn today_stats(&self) -> Result<DailyStats, StoreError> {
        Ok(self.today())
    }

    async fn increment_views(&self) -> Result<Option<u64>, StoreError> {
        Ok(Some(self.increment_views_on((self.clock)())))
    }

    async fn record_feedback(&self, kind: FeedbackKind) -> Result<(), StoreError> {
        self.record_feedback_on((self.clock)(), kind);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::thread;

    fn fixed_day() -> DayKey {
        DayKey::from_date(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
    }

    fn next_day() -> DayKey {
        DayKey::from_date(NaiveDate::from_ymd_opt(2024, 5, 2).unwrap())
    }

    #[test]
    fn first_access_creates_empty_bucket() {
        let store = LocalStore::with_clock(fixed_day);
        assert_eq!(store.today(), DailyStats::default());
    }

    #[test]
    fn days_are_independent() {
        let store = LocalStore::with_clock(fixed_day);
        store.increment_views_on(fixed_day());
        store.increment_views_on(next_day());
        store.increment_views_on(next_day());
        assert_eq!(store.stats_on(fixed_day()).views, 1);
        assert_eq!(store.stats_on(next_day()).views, 2);
    }

    #[test]
    fn concurrent_sessions_do_not_lose_updates() {
        let store = Arc::new(LocalStore::with_clock(fixed_day));
        let sessions: Vec<_> = (0..2)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..1000 {
                        store.increment_views_on(fixed_day());
                        store.record_feedback_on(fixed_day(), FeedbackKind::Like);
                    }
                })
            })
            .collect();
        for session in sessions {
            session.join().unwrap();
        }
        let stats = store.today();
        assert_eq!(stats.views, 2000);
        assert_eq!(stats.likes, 2000);
        assert_eq!(stats.dislikes, 0);
    }

    #[test]
    fn export_import_roundtrip() {
        let store = LocalStore::with_clock(fixed_day);
        store.increment_views_on(fixed_day());
        store.record_feedback_on(fixed_day(), FeedbackKind::Dislike);

        let json = store.export_json();
        assert!(json.contains("2024-05-01"));

        let restored = LocalStore::with_clock(fixed_day);
        assert_eq!(restored.import_json(&json).unwrap(), 1);
        assert_eq!(
            restored.today(),
            DailyStats {
                views: 1,
                likes: 0,
                dislikes: 1
            }
        );

        // Restored buckets keep counting from the imported values.
        assert_eq!(restored.increment_views_on(fixed_day()), 2);
    }

    #[test]
    fn import_skips_bad_day_keys() {
        let store = LocalStore::with_clock(fixed_day);
        let restored = store
            .import_json(r#"{"yesterday":{"views":3},"2024-05-01":{"views":9}}"#)
            .unwrap();
        assert_eq!(restored, 1);
        assert_eq!(store.today().views, 9);
    }

    #[test]
    fn import_invalid_json_returns_error() {
        let store = LocalStore::new();
        assert!(store.import_json("not valid json {{{").is_err());
    }

    #[tokio::test]
    async fn trait_operations_use_clock_day() {
        let store = LocalStore::with_clock(fixed_day);
        assert_eq!(store.increment_views().await.unwrap(), Some(1));
        store.record_feedback(FeedbackKind::Like).await.unwrap();
        assert_eq!(store.stats_on(fixed_day()).likes, 1);
        assert_eq!(store.today_stats().await.unwrap().views, 1);
    }
}
