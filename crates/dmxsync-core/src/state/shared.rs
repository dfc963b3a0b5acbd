use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::apply::decode_and_apply;
use crate::protocols::e131::DecodeError;

use super::commit::Applied;
use super::table::UniverseTable;
use super::universe::DmxFrame;

/// A universe table shared between receiver threads and readers.
///
/// A single lock covers the whole table, so a sync swap touching several
/// universes is observed either entirely or not at all.
#[derive(Debug, Clone)]
pub struct SharedUniverseTable {
    inner: Arc<Mutex<UniverseTable>>,
}

impl SharedUniverseTable {
    pub fn new(table: UniverseTable) -> Self {
        Self {
            inner: Arc::new(Mutex::new(table)),
        }
    }

    pub fn decode_and_apply(&self, datagram: &[u8]) -> Result<Applied, DecodeError> {
        decode_and_apply(&mut self.lock(), datagram)
    }

    /// Run `f` against a consistent view of the whole table.
    pub fn with_table<R>(&self, f: impl FnOnce(&UniverseTable) -> R) -> R {
        f(&self.lock())
    }

    /// Run `f` against the active frame of `universe`, if managed.
    pub fn with_active<R>(&self, universe: u16, f: impl FnOnce(&DmxFrame) -> R) -> Option<R> {
        let table = self.lock();
        table.universe(universe).map(|entry| f(entry.active()))
    }

    /// Copy every active frame out under one lock.
    pub fn active_frames(&self) -> Vec<(u16, DmxFrame)> {
        self.lock()
            .iter()
            .map(|(number, universe)| (number, universe.active().clone()))
            .collect()
    }

    // A panicking reader cannot leave a half-swapped table behind, so a
    // poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, UniverseTable> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
