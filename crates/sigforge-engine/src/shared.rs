//! Engine shared between threads.
//!
//! The table and cache only grow, so one mutex around the whole engine is
//! enough: every caller sees either the state before a build or after it.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};
use sigforge_types::{HostModules, TableStats};

use crate::engine::{SignatureEngine, SignatureSet};
use crate::layout::LayoutConfig;
use crate::render::FunctionKind;

/// Cloneable handle to one [`SignatureEngine`].
#[derive(Debug, Clone, Default)]
pub struct SharedEngine {
    inner: Arc<Mutex<SignatureEngine>>,
}

impl SharedEngine {
    /// Share `engine`.
    pub fn new(engine: SignatureEngine) -> Self {
        SharedEngine {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// See [`SignatureEngine::add_descriptors`].
    pub fn add_descriptors(&self, owner: &str, text: &str) {
        self.inner.lock().add_descriptors(owner, text);
    }

    /// See [`SignatureEngine::signature`].
    pub fn signature(
        &self,
        owner: &str,
        member: &str,
        kind: FunctionKind,
        layout: &LayoutConfig,
    ) -> Option<SignatureSet> {
        self.inner.lock().signature(owner, member, kind, layout)
    }

    /// See [`SignatureEngine::refresh`].
    pub fn refresh(&self, host: &dyn HostModules) -> usize {
        self.inner.lock().refresh(host)
    }

    /// Lookup counters.
    pub fn stats(&self) -> TableStats {
        self.inner.lock().stats()
    }

    /// Run `f` with the engine locked.
    pub fn with<R>(&self, f: impl FnOnce(&mut SignatureEngine) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Lock the engine.
    pub fn lock(&self) -> MutexGuard<'_, SignatureEngine> {
        self.inner.lock()
    }
}

impl From<SignatureEngine> for SharedEngine {
    fn from(engine: SignatureEngine) -> Self {
        Self::new(engine)
    }
}
