//! Session-lifetime toast store. Entries keep insertion order, carry unique
//! monotonic ids and expire on their own once their duration elapses. Removal is
//! idempotent so a user dismissal racing the expiry timer is harmless.

use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
    time::Duration,
};
use tokio::{runtime::Handle, sync::watch, time::sleep};
use tracing::{debug, warn};
use ulid::{Generator, Ulid};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        };
        formatter.write_str(label)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub id: Ulid,
    pub message: String,
    pub kind: NotificationKind,
    /// Zero means the entry never expires on its own.
    pub duration_ms: u64,
}

/// Shared toast store. Cloning shares the same entries.
#[derive(Clone)]
pub struct NotificationStore {
    inner: Arc<Inner>,
}

struct Inner {
    entries: Mutex<Vec<Notification>>,
    ids: Mutex<Generator>,
    default_duration_ms: u64,
    changes: watch::Sender<u64>,
}

impl NotificationStore {
    #[must_use]
    pub fn new(default_duration_ms: u64) -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            inner: Arc::new(Inner {
                entries: Mutex::new(Vec::new()),
                ids: Mutex::new(Generator::new()),
                default_duration_ms,
                changes,
            }),
        }
    }

    /// Appends a notification and returns its id. A positive duration schedules
    /// removal on the current tokio runtime.
    pub fn add(&self, message: impl Into<String>, kind: NotificationKind, duration_ms: u64) -> Ulid {
        let id = self.next_id();
        let notification = Notification {
            id,
            message: message.into(),
            kind,
            duration_ms,
        };
        debug!(%id, %kind, duration_ms, "notification added");

        self.entries().push(notification);
        self.changed();

        if duration_ms > 0 {
            self.schedule_removal(id, Duration::from_millis(duration_ms));
        }

        id
    }

    /// Removes the entry with `id`; unknown ids are ignored.
    pub fn remove(&self, id: Ulid) {
        let removed = {
            let mut entries = self.entries();
            let before = entries.len();
            entries.retain(|entry| entry.id != id);
            before != entries.len()
        };

        if removed {
            self.changed();
        }
    }

    /// Removes every entry.
    pub fn clear(&self) {
        let had_entries = {
            let mut entries = self.entries();
            let had_entries = !entries.is_empty();
            entries.clear();
            had_entries
        };

        if had_entries {
            self.changed();
        }
    }

    pub fn success(&self, message: impl Into<String>, duration_ms: Option<u64>) -> Ulid {
        self.add(message, NotificationKind::Success, self.duration(duration_ms))
    }

    pub fn error(&self, message: impl Into<String>, duration_ms: Option<u64>) -> Ulid {
        self.add(message, NotificationKind::Error, self.duration(duration_ms))
    }

    pub fn warning(&self, message: impl Into<String>, duration_ms: Option<u64>) -> Ulid {
        self.add(message, NotificationKind::Warning, self.duration(duration_ms))
    }

    pub fn info(&self, message: impl Into<String>, duration_ms: Option<u64>) -> Ulid {
        self.add(message, NotificationKind::Info, self.duration(duration_ms))
    }

    /// Current entries in insertion order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Notification> {
        self.entries().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: Ulid) -> bool {
        self.entries().iter().any(|entry| entry.id == id)
    }

    /// Receiver bumped on every mutation, for renderers that redraw on change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.changes.subscribe()
    }

    fn duration(&self, duration_ms: Option<u64>) -> u64 {
        duration_ms.unwrap_or(self.inner.default_duration_ms)
    }

    fn next_id(&self) -> Ulid {
        let mut ids = self
            .inner
            .ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // overflow only happens after 2^80 ids within one millisecond
        ids.generate().unwrap_or_else(|_| Ulid::new())
    }

    fn entries(&self) -> MutexGuard<'_, Vec<Notification>> {
        self.inner
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn changed(&self) {
        self.inner.changes.send_modify(|version| *version = version.wrapping_add(1));
    }

    fn schedule_removal(&self, id: Ulid, after: Duration) {
        let Ok(handle) = Handle::try_current() else {
            warn!(%id, "no async runtime, notification will not expire");
            return;
        };

        let store: Weak<Inner> = Arc::downgrade(&self.inner);
        handle.spawn(async move {
            sleep(after).await;
            if let Some(inner) = store.upgrade() {
                NotificationStore { inner }.remove(id);
            }
        });
    }
}

impl Default for NotificationStore {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_TOAST_DURATION_MS)
    }
}

impl fmt::Debug for NotificationStore {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("NotificationStore")
            .field("entries", &self.len())
            .field("default_duration_ms", &self.inner.default_duration_ms)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_appends_in_order_with_unique_ids() {
        let store = NotificationStore::new(0);
        let first = store.info("first", None);
        let second = store.error("second", None);
        let third = store.success("third", None);

        let messages: Vec<_> = store.snapshot().into_iter().map(|n| n.message).collect();
        assert_eq!(messages, vec!["first", "second", "third"]);
        assert_ne!(first, second);
        assert_ne!(second, third);
        assert!(first < second && second < third);
    }

    #[test]
    fn remove_keeps_order_and_is_idempotent() {
        let store = NotificationStore::new(0);
        let first = store.info("first", None);
        let second = store.warning("second", None);
        let third = store.info("third", None);

        store.remove(second);
        store.remove(second);
        store.remove(Ulid::new());

        let ids: Vec<_> = store.snapshot().into_iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![first, third]);
    }

    #[test]
    fn clear_twice_equals_clear_once() {
        let store = NotificationStore::new(0);
        store.info("a", None);
        store.error("b", None);

        store.clear();
        assert!(store.is_empty());
        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn convenience_variants_fix_kind_and_default_duration() {
        let store = NotificationStore::new(0);
        store.success("s", None);
        store.error("e", None);
        store.warning("w", None);
        store.info("i", None);

        let kinds: Vec<_> = store.snapshot().into_iter().map(|n| n.kind).collect();
        assert_eq!(
            kinds,
            vec![
                NotificationKind::Success,
                NotificationKind::Error,
                NotificationKind::Warning,
                NotificationKind::Info
            ]
        );
        assert!(store.snapshot().iter().all(|n| n.duration_ms == 0));
    }

    #[test]
    fn add_without_runtime_does_not_expire() {
        let store = NotificationStore::new(10);
        let id = store.info("stays", None);
        assert!(store.contains(id));
    }

    #[tokio::test]
    async fn entries_expire_after_duration() {
        let store = NotificationStore::new(5_000);
        let short = store.add("short", NotificationKind::Info, 20);
        let sticky = store.add("sticky", NotificationKind::Info, 0);

        assert!(store.contains(short));
        sleep(Duration::from_millis(200)).await;

        assert!(!store.contains(short));
        assert!(store.contains(sticky));
    }

    #[tokio::test]
    async fn dismissal_before_expiry_is_harmless() {
        let store = NotificationStore::new(5_000);
        let id = store.add("dismissed", NotificationKind::Error, 20);
        let other = store.add("other", NotificationKind::Error, 0);

        store.remove(id);
        sleep(Duration::from_millis(100)).await;

        assert_eq!(store.len(), 1);
        assert!(store.contains(other));
    }

    #[tokio::test]
    async fn subscribe_sees_mutations() {
        let store = NotificationStore::new(0);
        let mut changes = store.subscribe();

        store.info("hello", None);
        assert!(changes.has_changed().unwrap_or(false));
        changes.borrow_and_update();

        store.remove(Ulid::new());
        assert!(!changes.has_changed().unwrap_or(true));
    }
}
