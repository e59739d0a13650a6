//! Durable key-value storage shared by browsing contexts.
//!
//! [`StorageArea`] is the host's string-keyed store (one per origin). Every
//! browsing context holds its own handle; a write made through one handle is
//! announced to every *other* handle on the same area as a [`StorageEvent`],
//! never to the writer itself.
//!
//! Two hosts are provided:
//! - [`MemoryStorage`] - in-process area with change notifications, one
//!   handle per simulated tab
//! - [`FileStorage`] - a JSON object on disk, used by the CLI host; it does
//!   not notify

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use fs2::FileExt;
use thiserror::Error;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use uuid::Uuid;

/// Capacity of the change-notification channel per storage area.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Errors writing to a storage area.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage file is not a JSON object: {0}")]
    Format(#[from] serde_json::Error),
}

/// Identifies one browsing context (tab, window, CLI invocation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(Uuid);

impl ContextId {
    /// Allocate a fresh context ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ContextId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A change made to a storage area by some browsing context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    /// Changed key; `None` when the whole area was cleared.
    pub key: Option<String>,
    pub old_value: Option<String>,
    /// New value; `None` when the key was removed.
    pub new_value: Option<String>,
    /// Context that made the change.
    pub origin: ContextId,
}

impl StorageEvent {
    /// Whether this event can have changed `key`.
    #[must_use]
    pub fn affects(&self, key: &str) -> bool {
        self.key.as_deref().is_none_or(|changed| changed == key)
    }
}

/// A string-keyed durable store as seen from one browsing context.
pub trait StorageArea: Send + Sync {
    /// Context this handle writes as.
    fn context(&self) -> ContextId;

    fn get_item(&self, key: &str) -> Option<String>;

    /// Overwrite `key` with `value`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing medium cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key` if present.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing medium cannot be written.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;

    /// Subscribe to changes made by other contexts.
    ///
    /// Returns `None` when the host cannot deliver notifications.
    fn subscribe(&self) -> Option<StorageSubscription>;
}

/// Receives [`StorageEvent`]s made by other contexts.
///
/// Events originating from the subscribing context are filtered out.
pub struct StorageSubscription {
    receiver: broadcast::Receiver<StorageEvent>,
    context: ContextId,
}

/// What a subscription yielded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// A change from another context.
    Changed(StorageEvent),
    /// Notifications were dropped; the subscriber must assume anything changed.
    Missed(u64),
}

impl StorageSubscription {
    fn new(receiver: broadcast::Receiver<StorageEvent>, context: ContextId) -> Self {
        Self { receiver, context }
    }

    /// Take the next pending notification without waiting.
    ///
    /// Returns `None` when nothing is pending or the area is gone.
    pub fn try_next(&mut self) -> Option<Notification> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) if event.origin == self.context => {}
                Ok(event) => return Some(Notification::Changed(event)),
                Err(TryRecvError::Lagged(missed)) => return Some(Notification::Missed(missed)),
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }

    /// Wait for the next notification.
    ///
    /// Returns `None` once the storage area has been dropped.
    pub async fn next(&mut self) -> Option<Notification> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if event.origin == self.context => {}
                Ok(event) => return Some(Notification::Changed(event)),
                Err(RecvError::Lagged(missed)) => return Some(Notification::Missed(missed)),
                Err(RecvError::Closed) => return None,
            }
        }
    }
}

// =============================================================================
// MemoryStorage
// =============================================================================

struct MemoryArea {
    entries: RwLock<HashMap<String, String>>,
    events: broadcast::Sender<StorageEvent>,
}

/// In-process storage area, one handle per browsing context.
///
/// ```rust,ignore
/// let tab_a = MemoryStorage::new();
/// let tab_b = tab_a.open_context();
/// tab_a.set_item("cart", "[]")?;       // tab_b's subscription sees this
/// ```
pub struct MemoryStorage {
    area: Arc<MemoryArea>,
    context: ContextId,
}

impl MemoryStorage {
    /// Create a new, empty storage area with a first context attached.
    #[must_use]
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            area: Arc::new(MemoryArea {
                entries: RwLock::new(HashMap::new()),
                events,
            }),
            context: ContextId::new(),
        }
    }

    /// Attach another browsing context to the same area.
    #[must_use]
    pub fn open_context(&self) -> Self {
        Self {
            area: Arc::clone(&self.area),
            context: ContextId::new(),
        }
    }

    /// Remove every key, announcing a whole-area clear.
    pub fn clear(&self) {
        self.area
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.publish(None, None, None);
    }

    fn publish(&self, key: Option<&str>, old_value: Option<String>, new_value: Option<String>) {
        // No receivers is fine: nobody else is listening.
        let _ = self.area.events.send(StorageEvent {
            key: key.map(str::to_string),
            old_value,
            new_value,
            origin: self.context,
        });
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageArea for MemoryStorage {
    fn context(&self) -> ContextId {
        self.context
    }

    fn get_item(&self, key: &str) -> Option<String> {
        self.area
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let old_value = self
            .area
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        self.publish(Some(key), old_value, Some(value.to_string()));
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let old_value = self
            .area
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        if old_value.is_some() {
            self.publish(Some(key), old_value, None);
        }
        Ok(())
    }

    fn subscribe(&self) -> Option<StorageSubscription> {
        Some(StorageSubscription::new(
            self.area.events.subscribe(),
            self.context,
        ))
    }
}

// =============================================================================
// FileStorage
// =============================================================================

/// Storage area persisted as a single JSON object file.
///
/// Every read goes to disk so that writes from another process are seen on
/// the next access. Writes hold an exclusive lock on a sibling `.lock` file
/// for the read-modify-write and replace the whole file by renaming a
/// temporary sibling over it, so readers never see a partial file.
pub struct FileStorage {
    path: PathBuf,
    context: ContextId,
}

impl FileStorage {
    /// Open (or lazily create) the storage file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            context: ContextId::new(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn file_name(&self) -> String {
        self.path
            .file_name()
            .map_or_else(|| "storage".to_string(), |n| n.to_string_lossy().into_owned())
    }

    fn sibling(&self, name: &str) -> PathBuf {
        self.path.with_file_name(name)
    }

    fn ensure_parent(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Exclusive lock held until the returned file is dropped.
    fn lock(&self) -> Result<File, StorageError> {
        self.ensure_parent()?;
        let lock_path = self.sibling(&format!(".{}.lock", self.file_name()));
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)?;
        file.lock_exclusive()?;
        Ok(file)
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Caller must hold the lock.
    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let content = serde_json::to_string_pretty(entries)?;
        let tmp = self.sibling(&format!(
            ".{}.tmp.{}.{}",
            self.file_name(),
            std::process::id(),
            self.context
        ));
        {
            let mut file = File::create(&tmp)?;
            file.write_all(content.as_bytes())?;
            file.sync_all()?;
        }
        if let Err(e) = std::fs::rename(&tmp, &self.path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }

    /// Entries for a write. A corrupt file is replaced rather than blocking writes.
    fn entries_for_write(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match self.read_entries() {
            Err(StorageError::Format(e)) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Discarding unreadable storage file");
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }

    fn update(
        &self,
        apply: impl FnOnce(&mut BTreeMap<String, String>) -> bool,
    ) -> Result<(), StorageError> {
        let _lock = self.lock()?;
        let mut entries = self.entries_for_write()?;
        if apply(&mut entries) {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}

impl StorageArea for FileStorage {
    fn context(&self) -> ContextId {
        self.context
    }

    fn get_item(&self, key: &str) -> Option<String> {
        match self.read_entries() {
            Ok(mut entries) => entries.remove(key),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to read storage file");
                None
            }
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
            true
        })
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.update(|entries| entries.remove(key).is_some())
    }

    fn subscribe(&self) -> Option<StorageSubscription> {
        None
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_contexts_share_entries() {
        let tab_a = MemoryStorage::new();
        let tab_b = tab_a.open_context();

        tab_a.set_item("cart", "[]").unwrap();
        assert_eq!(tab_b.get_item("cart").as_deref(), Some("[]"));
        assert_ne!(tab_a.context(), tab_b.context());
    }

    #[test]
    fn test_writer_does_not_see_its_own_event() {
        let tab_a = MemoryStorage::new();
        let tab_b = tab_a.open_context();
        let mut own = tab_a.subscribe().unwrap();
        let mut other = tab_b.subscribe().unwrap();

        tab_a.set_item("cart", "[1]").unwrap();

        assert!(own.try_next().is_none());
        let Some(Notification::Changed(event)) = other.try_next() else {
            panic!("expected a change notification");
        };
        assert_eq!(event.key.as_deref(), Some("cart"));
        assert_eq!(event.new_value.as_deref(), Some("[1]"));
        assert_eq!(event.origin, tab_a.context());
    }

    #[test]
    fn test_remove_absent_key_is_silent() {
        let tab_a = MemoryStorage::new();
        let tab_b = tab_a.open_context();
        let mut sub = tab_b.subscribe().unwrap();

        tab_a.remove_item("cart").unwrap();
        assert!(sub.try_next().is_none());
    }

    #[test]
    fn test_clear_event_affects_every_key() {
        let tab_a = MemoryStorage::new();
        let tab_b = tab_a.open_context();
        let mut sub = tab_b.subscribe().unwrap();

        tab_a.set_item("cart", "[]").unwrap();
        tab_a.clear();

        let _ = sub.try_next();
        let Some(Notification::Changed(event)) = sub.try_next() else {
            panic!("expected clear notification");
        };
        assert!(event.key.is_none());
        assert!(event.affects("cart"));
        assert!(tab_b.get_item("cart").is_none());
    }

    #[test]
    fn test_lagging_subscriber_is_told_it_missed_events() {
        let tab_a = MemoryStorage::new();
        let tab_b = tab_a.open_context();
        let mut sub = tab_b.subscribe().unwrap();

        for i in 0..(EVENT_CHANNEL_CAPACITY + 5) {
            tab_a.set_item("cart", &i.to_string()).unwrap();
        }

        assert!(matches!(sub.try_next(), Some(Notification::Missed(_))));
    }

    #[tokio::test]
    async fn test_async_next_receives_change() {
        let tab_a = MemoryStorage::new();
        let tab_b = tab_a.open_context();
        let mut sub = tab_b.subscribe().unwrap();

        tab_a.set_item("currency", "EUR").unwrap();
        let notification = sub.next().await.unwrap();
        assert!(matches!(notification, Notification::Changed(ref e) if e.affects("currency")));
    }

    #[test]
    fn test_file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        let storage = FileStorage::new(&path);

        assert!(storage.get_item("cart").is_none());
        storage.set_item("cart", "[]").unwrap();
        storage.set_item("currency", "HTG").unwrap();
        assert_eq!(storage.get_item("cart").as_deref(), Some("[]"));

        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.get_item("currency").as_deref(), Some("HTG"));

        reopened.remove_item("cart").unwrap();
        assert!(storage.get_item("cart").is_none());
        assert!(storage.subscribe().is_none());
    }

    #[test]
    fn test_file_storage_recovers_from_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "not json").unwrap();
        let storage = FileStorage::new(&path);

        assert!(storage.get_item("cart").is_none());
        storage.set_item("cart", "[]").unwrap();
        assert_eq!(storage.get_item("cart").as_deref(), Some("[]"));
    }

    #[test]
    fn test_file_reader_never_sees_partial_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        let writer = FileStorage::new(&path);
        writer.set_item("currency", "EUR").unwrap();
        let reader = FileStorage::new(&path);

        std::thread::scope(|scope| {
            scope.spawn(|| {
                for i in 0..200 {
                    writer.set_item("cart", &format!("[{i}]")).unwrap();
                }
            });
            for _ in 0..200 {
                assert_eq!(reader.get_item("currency").as_deref(), Some("EUR"));
            }
        });
    }

    #[test]
    fn test_concurrent_file_writers_keep_both_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        let tab_a = FileStorage::new(&path);
        let tab_b = FileStorage::new(&path);

        std::thread::scope(|scope| {
            scope.spawn(|| {
                for i in 0..200 {
                    tab_a.set_item("cart", &format!("[{i}]")).unwrap();
                }
            });
            scope.spawn(|| {
                for i in 0..200 {
                    tab_b.set_item("currency", &format!("C{i}")).unwrap();
                }
            });
        });

        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.get_item("cart").as_deref(), Some("[199]"));
        assert_eq!(reopened.get_item("currency").as_deref(), Some("C199"));
    }
}
