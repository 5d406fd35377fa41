use rustc_hash::FxHashMap;

use super::{
    memory::MemoryPool,
    state::{MemoryUnits, ProcessKey},
};

/// Checks pool accounting after every trace event.
#[derive(Debug, Default)]
pub struct Observer {
    step: u64,
    outstanding: FxHashMap<ProcessKey, MemoryUnits>,
    admissions: u64,
    releases: u64,
}

impl Observer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_reserve(&mut self, key: ProcessKey, units: MemoryUnits) {
        let previous = self.outstanding.insert(key, units);
        debug_assert!(
            previous.is_none(),
            "Process {key:?} admitted while still holding memory"
        );
        self.admissions += 1;
    }

    pub fn on_release(&mut self, key: ProcessKey, units: MemoryUnits) {
        let held = self.outstanding.remove(&key);
        debug_assert_eq!(
            held,
            Some(units),
            "Process {key:?} released memory it does not hold"
        );
        self.releases += 1;
    }

    pub fn observe(&mut self, pool: &MemoryPool) {
        self.step += 1;

        debug_assert!(
            pool.available() <= pool.capacity(),
            "Pool available {} exceeds capacity {} at step {}",
            pool.available(),
            pool.capacity(),
            self.step
        );

        let held: MemoryUnits = self.outstanding.values().sum();
        debug_assert_eq!(
            held,
            pool.in_use(),
            "Outstanding reservations disagree with pool usage at step {}",
            self.step
        );
    }

    pub fn steps(&self) -> u64 {
        self.step
    }

    pub fn admissions(&self) -> u64 {
        self.admissions
    }

    pub fn releases(&self) -> u64 {
        self.releases
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding.len()
    }
}
