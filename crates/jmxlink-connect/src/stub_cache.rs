//! StubCache: reuse of registry-resolved stubs across connection attempts

use crate::error::ConnectError;
use jmxlink_interface::{RegistryEndpoint, RemoteStub};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};
use tracing::debug;

/// How cached stubs are matched to registry endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CachePolicy {
    /// One slot for every endpoint: the first stub resolved is reused for
    /// all later attempts, whatever host/port they name
    #[default]
    Process,

    /// One slot per registry host/port
    Keyed,
}

type Slot = Arc<OnceCell<Arc<RemoteStub>>>;

/// Lazily populated cache of resolved stubs
///
/// Each slot is populated at most once by a check-then-populate sequence, so
/// concurrent callers on an empty slot trigger exactly one resolution and
/// never see a partially stored value. A failed resolution leaves the slot
/// empty; entries are never refreshed on their own.
///
/// The slot map is only locked to fetch or insert a slot. Under
/// `CachePolicy::Keyed` a pending resolution for one registry never delays
/// attempts against another.
///
/// Share one cache between connectors by wrapping it in an `Arc`.
pub struct StubCache {
    policy: CachePolicy,
    slots: Mutex<HashMap<Option<RegistryEndpoint>, Slot>>,
}

impl StubCache {
    pub fn new(policy: CachePolicy) -> Self {
        Self {
            policy,
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    fn key(&self, endpoint: &RegistryEndpoint) -> Option<RegistryEndpoint> {
        match self.policy {
            CachePolicy::Process => None,
            CachePolicy::Keyed => Some(endpoint.clone()),
        }
    }

    async fn slot(&self, endpoint: &RegistryEndpoint) -> Slot {
        self.slots
            .lock()
            .await
            .entry(self.key(endpoint))
            .or_default()
            .clone()
    }

    /// Return the stub cached for `endpoint`, resolving and storing it first
    /// if there is none
    pub async fn get_or_resolve<F, Fut>(
        &self,
        endpoint: &RegistryEndpoint,
        resolve: F,
    ) -> Result<Arc<RemoteStub>, ConnectError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<RemoteStub, ConnectError>>,
    {
        let slot = self.slot(endpoint).await;

        if let Some(stub) = slot.get() {
            debug!(
                "Reusing cached stub from {} for registry {}",
                stub.registry, endpoint
            );
            return Ok(stub.clone());
        }

        let stub = slot
            .get_or_try_init(|| async {
                let stub = resolve().await?;
                debug!("Cached stub resolved from registry {}", endpoint);
                Ok::<_, ConnectError>(Arc::new(stub))
            })
            .await?;

        Ok(stub.clone())
    }

    /// Cached stub that an attempt against `endpoint` would use, without resolving
    pub async fn peek(&self, endpoint: &RegistryEndpoint) -> Option<Arc<RemoteStub>> {
        let slots = self.slots.lock().await;
        slots
            .get(&self.key(endpoint))
            .and_then(|slot| slot.get().cloned())
    }

    /// Store `stub` for `endpoint`, replacing whatever was cached there
    ///
    /// Under `CachePolicy::Process` the endpoint is ignored: the single
    /// shared slot is overwritten.
    pub async fn replace(&self, endpoint: RegistryEndpoint, stub: RemoteStub) {
        let key = self.key(&endpoint);
        let slot = Arc::new(OnceCell::new_with(Some(Arc::new(stub))));
        self.slots.lock().await.insert(key, slot);
    }

    /// Drop every cached stub so the next attempt resolves again
    ///
    /// A resolution already in flight still completes for its caller but is
    /// not kept.
    pub async fn clear(&self) {
        self.slots.lock().await.clear();
    }

    pub async fn len(&self) -> usize {
        let slots = self.slots.lock().await;
        slots.values().filter(|slot| slot.initialized()).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for StubCache {
    fn default() -> Self {
        Self::new(CachePolicy::default())
    }
}
