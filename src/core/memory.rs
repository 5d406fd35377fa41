use super::state::{MemoryUnits, ProcessKey};

/// Memory held by one admitted process. Only `MemoryPool::release` can
/// consume it, so each admission is released exactly once.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a reservation must be released back to its pool"]
pub struct Reservation {
    key: ProcessKey,
    units: MemoryUnits,
}

impl Reservation {
    pub fn key(&self) -> ProcessKey {
        self.key
    }

    pub fn units(&self) -> MemoryUnits {
        self.units
    }
}

#[derive(Debug, Clone)]
pub struct MemoryPool {
    capacity: MemoryUnits,
    available: MemoryUnits,
}

impl MemoryPool {
    pub fn new(capacity: MemoryUnits) -> Self {
        Self {
            capacity,
            available: capacity,
        }
    }

    pub fn capacity(&self) -> MemoryUnits {
        self.capacity
    }

    pub fn available(&self) -> MemoryUnits {
        self.available
    }

    pub fn in_use(&self) -> MemoryUnits {
        self.capacity - self.available
    }

    pub fn can_fit(&self, units: MemoryUnits) -> bool {
        units <= self.available
    }

    pub fn try_reserve(&mut self, key: ProcessKey, units: MemoryUnits) -> Option<Reservation> {
        if !self.can_fit(units) {
            return None;
        }
        self.available -= units;
        Some(Reservation { key, units })
    }

    pub fn release(&mut self, reservation: Reservation) -> MemoryUnits {
        let restored = self.available + reservation.units;
        debug_assert!(
            restored <= self.capacity,
            "Releasing {} units overfills pool of {}",
            reservation.units,
            self.capacity
        );
        self.available = restored.min(self.capacity);
        reservation.units
    }
}
