//! In-process engine lifecycle
//!
//! `EmbeddedEngine` plays the role of a locally started database process:
//! it must be started before the first operation and stopped after the
//! last. Like a server bound to a fixed port, only one instance of a given
//! launcher may run at a time; a second `start` reports the backend as
//! unavailable.
//!
//! Clients connected through an `EngineHandle` share one store. Once the
//! handle is stopped every operation on those clients returns
//! `StoreError::Unavailable`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{info, warn};

use kvharness_core::{
    BackendHandle, BackendLauncher, BackendUnavailable, StoreClient, StoreError, StoreResult,
};

use crate::ordered::OrderedStore;
use crate::sharded::ShardedStore;

/// Which reference adapter an engine serves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineKind {
    /// `OrderedStore`: BTreeMap behind one RwLock
    Ordered,
    /// `ShardedStore`: DashMap of per-table BTreeMaps
    Sharded,
}

impl EngineKind {
    /// Stable backend name
    pub fn as_str(self) -> &'static str {
        match self {
            EngineKind::Ordered => "ordered",
            EngineKind::Sharded => "sharded",
        }
    }

    /// Parse a backend name
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "ordered" => Some(EngineKind::Ordered),
            "sharded" => Some(EngineKind::Sharded),
            _ => None,
        }
    }
}

/// Liveness of the engine a store belongs to
///
/// Standalone stores are always live.
#[derive(Debug, Clone, Default)]
pub struct Liveness(Option<Arc<AtomicBool>>);

impl Liveness {
    /// Liveness of a store that is not owned by an engine
    pub fn always() -> Self {
        Liveness(None)
    }

    fn tracked(flag: Arc<AtomicBool>) -> Self {
        Liveness(Some(flag))
    }

    /// Whether the owning engine is running
    pub fn is_live(&self) -> bool {
        self.0
            .as_ref()
            .map_or(true, |flag| flag.load(Ordering::Acquire))
    }

    /// Fail with `Unavailable` if the owning engine was stopped
    pub fn check(&self, backend: &str) -> StoreResult<()> {
        if self.is_live() {
            Ok(())
        } else {
            Err(StoreError::Unavailable(format!("{} engine is stopped", backend)))
        }
    }
}

/// Launcher for an in-process reference engine
#[derive(Debug, Clone)]
pub struct EmbeddedEngine {
    kind: EngineKind,
    /// Set while a handle from this launcher is running
    in_use: Arc<AtomicBool>,
}

impl EmbeddedEngine {
    /// Create a launcher for the given engine kind
    pub fn new(kind: EngineKind) -> Self {
        EmbeddedEngine {
            kind,
            in_use: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Engine kind served by this launcher
    pub fn kind(&self) -> EngineKind {
        self.kind
    }
}

impl BackendLauncher for EmbeddedEngine {
    type Handle = EngineHandle;

    fn name(&self) -> &str {
        self.kind.as_str()
    }

    fn start(&self) -> Result<EngineHandle, BackendUnavailable> {
        if self
            .in_use
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!(
                target: "kvharness::engine",
                backend = self.kind.as_str(),
                "Engine already running"
            );
            return Err(BackendUnavailable::new(
                self.kind.as_str(),
                "an instance of this engine is already running",
            ));
        }

        let alive = Arc::new(AtomicBool::new(true));
        let liveness = Liveness::tracked(alive.clone());
        let store = match self.kind {
            EngineKind::Ordered => EngineStore::Ordered(OrderedStore::attached(liveness)),
            EngineKind::Sharded => EngineStore::Sharded(ShardedStore::attached(liveness)),
        };

        info!(target: "kvharness::engine", backend = self.kind.as_str(), "Engine started");
        Ok(EngineHandle {
            kind: self.kind,
            alive,
            in_use: self.in_use.clone(),
            store,
        })
    }
}

#[derive(Debug)]
enum EngineStore {
    Ordered(OrderedStore),
    Sharded(ShardedStore),
}

/// A running in-process engine
#[derive(Debug)]
pub struct EngineHandle {
    kind: EngineKind,
    alive: Arc<AtomicBool>,
    in_use: Arc<AtomicBool>,
    store: EngineStore,
}

impl EngineHandle {
    /// Engine kind
    pub fn kind(&self) -> EngineKind {
        self.kind
    }

    /// Connect a new client to this engine
    ///
    /// # Errors
    ///
    /// Returns `BackendUnavailable` if the engine was stopped.
    pub fn connect(&self) -> Result<Box<dyn StoreClient>, BackendUnavailable> {
        if !self.is_running() {
            return Err(BackendUnavailable::new(
                self.kind.as_str(),
                "engine is stopped",
            ));
        }
        let client: Box<dyn StoreClient> = match &self.store {
            EngineStore::Ordered(store) => Box::new(store.clone()),
            EngineStore::Sharded(store) => Box::new(store.clone()),
        };
        Ok(client)
    }
}

impl BackendHandle for EngineHandle {
    fn stop(&mut self) {
        if self.alive.swap(false, Ordering::AcqRel) {
            self.in_use.store(false, Ordering::Release);
            info!(target: "kvharness::engine", backend = self.kind.as_str(), "Engine stopped");
        }
    }

    fn is_running(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
