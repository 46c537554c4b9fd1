//! In-memory image store with programmable failures.

use async_trait::async_trait;
use imgbed_core::{RepositoryTarget, StoredObject};
use imgbed_error::{StoreError, StoreErrorKind, StoreResult};
use imgbed_store::{ImageStore, ObjectMetadata};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Store operations that can be failed or counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    Put,
    List,
    Fetch,
    Delete,
}

#[derive(Debug, Default)]
struct Inner {
    objects: BTreeMap<String, (String, Vec<u8>)>,
    failures: HashMap<(StoreOp, String), StoreErrorKind>,
    calls: HashMap<StoreOp, usize>,
    next_sha: usize,
}

/// Image store keeping objects in a map.
///
/// Failures are keyed by operation and path (the root path for `List`), so a test can fail
/// one object while its siblings succeed.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
    put_delay: Option<Duration>,
    panics: Arc<Mutex<HashSet<String>>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every put sleep, so concurrent uploads overlap.
    pub fn with_put_delay(mut self, delay: Duration) -> Self {
        self.put_delay = Some(delay);
        self
    }

    /// Make every put on `path` panic.
    pub fn panic_on_put(&self, path: &str) {
        self.panics.lock().unwrap().insert(path.to_string());
    }

    /// Insert an object directly, returning its revision.
    pub fn seed(&self, path: &str, bytes: &[u8]) -> String {
        let mut inner = self.inner.lock().unwrap();
        inner.next_sha += 1;
        let sha = format!("sha-{}", inner.next_sha);
        inner
            .objects
            .insert(path.to_string(), (sha.clone(), bytes.to_vec()));
        sha
    }

    /// Fail the next and every later `op` on `path` with `kind`.
    pub fn fail(&self, op: StoreOp, path: &str, kind: StoreErrorKind) {
        self.inner
            .lock()
            .unwrap()
            .failures
            .insert((op, path.to_string()), kind);
    }

    /// Number of calls made for `op`, including failed ones.
    pub fn calls(&self, op: StoreOp) -> usize {
        *self.inner.lock().unwrap().calls.get(&op).unwrap_or(&0)
    }

    /// Total calls across all operations.
    pub fn total_calls(&self) -> usize {
        self.inner.lock().unwrap().calls.values().sum()
    }

    /// Paths currently stored, sorted.
    pub fn paths(&self) -> Vec<String> {
        self.inner.lock().unwrap().objects.keys().cloned().collect()
    }

    /// Bytes stored at `path`.
    pub fn bytes(&self, path: &str) -> Option<Vec<u8>> {
        self.inner
            .lock()
            .unwrap()
            .objects
            .get(path)
            .map(|(_, bytes)| bytes.clone())
    }

    /// Highest number of puts observed in flight at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn record(&self, op: StoreOp, path: &str) -> StoreResult<()> {
        let mut inner = self.inner.lock().unwrap();
        *inner.calls.entry(op).or_insert(0) += 1;
        match inner.failures.get(&(op, path.to_string())) {
            Some(kind) => Err(StoreError::new(kind.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ImageStore for MemoryStore {
    async fn put_object(
        &self,
        target: &RepositoryTarget,
        path: &str,
        bytes: &[u8],
        overwrite_hash: Option<&str>,
    ) -> StoreResult<StoredObject> {
        target.ensure_remote_ready()?;

        let should_panic = self.panics.lock().unwrap().contains(path);
        if should_panic {
            panic!("store crashed while writing {}", path);
        }

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.put_delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.record(StoreOp::Put, path)?;

        let mut inner = self.inner.lock().unwrap();
        let current = inner.objects.get(path).map(|(sha, _)| sha.clone());
        if current.as_deref() != overwrite_hash {
            return Err(StoreError::new(StoreErrorKind::RemoteRejected {
                status: 422,
                message: format!("{} revision mismatch", path),
            }));
        }
        inner.next_sha += 1;
        let sha = format!("sha-{}", inner.next_sha);
        inner
            .objects
            .insert(path.to_string(), (sha.clone(), bytes.to_vec()));
        Ok(StoredObject::new(path, sha, target))
    }

    async fn list(&self, target: &RepositoryTarget) -> StoreResult<Vec<StoredObject>> {
        target.ensure_remote_ready()?;
        self.record(StoreOp::List, target.root_path())?;

        let prefix = if target.root_path().is_empty() {
            String::new()
        } else {
            format!("{}/", target.root_path())
        };
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .objects
            .iter()
            .filter(|(path, _)| {
                path.strip_prefix(&prefix)
                    .is_some_and(|rest| !rest.contains('/'))
            })
            .map(|(path, (sha, _))| StoredObject::new(path.as_str(), sha.as_str(), target))
            .collect())
    }

    async fn fetch_metadata(
        &self,
        target: &RepositoryTarget,
        path: &str,
    ) -> StoreResult<ObjectMetadata> {
        target.ensure_remote_ready()?;
        self.record(StoreOp::Fetch, path)?;

        let inner = self.inner.lock().unwrap();
        match inner.objects.get(path) {
            Some((sha, bytes)) => Ok(ObjectMetadata::new(path, sha.as_str(), bytes.clone())),
            None => Err(StoreError::new(StoreErrorKind::NotFound(path.to_string()))),
        }
    }

    async fn delete(
        &self,
        target: &RepositoryTarget,
        path: &str,
        content_hash: &str,
    ) -> StoreResult<()> {
        target.ensure_remote_ready()?;
        self.record(StoreOp::Delete, path)?;

        let mut inner = self.inner.lock().unwrap();
        match inner.objects.get(path) {
            None => Err(StoreError::new(StoreErrorKind::NotFound(path.to_string()))),
            Some((sha, _)) if sha != content_hash => {
                Err(StoreError::new(StoreErrorKind::RemoteRejected {
                    status: 409,
                    message: format!("{} does not match {}", path, content_hash),
                }))
            }
            Some(_) => {
                inner.objects.remove(path);
                Ok(())
            }
        }
    }
}
