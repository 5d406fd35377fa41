use log::debug;

use super::{
    event::TraceEvent,
    memory::{MemoryPool, Reservation},
    observer::Observer,
    queue::RejectedQueue,
    state::{CpuId, MemoryUnits, ProcessKey, ProcessRecord, Ticks},
    trace::TraceSink,
};
use crate::error::SimError;

/// Shared state every pass drives: the memory pool, the rejected queue and
/// the trace sink. All trace lines go out through here, in order.
pub struct SchedCore<T: TraceSink> {
    pool: MemoryPool,
    rejected: RejectedQueue,
    observer: Observer,
    sink: T,
}

impl<T: TraceSink> SchedCore<T> {
    pub fn new(capacity: MemoryUnits, sink: T) -> Self {
        Self {
            pool: MemoryPool::new(capacity),
            rejected: RejectedQueue::new(),
            observer: Observer::new(),
            sink,
        }
    }

    pub fn pool(&self) -> &MemoryPool {
        &self.pool
    }

    pub fn rejected(&self) -> &RejectedQueue {
        &self.rejected
    }

    pub fn take_rejected(&mut self) -> RejectedQueue {
        std::mem::take(&mut self.rejected)
    }

    pub fn observer(&self) -> &Observer {
        &self.observer
    }

    pub fn sink(&self) -> &T {
        &self.sink
    }

    pub fn into_sink(self) -> T {
        self.sink
    }

    fn emit(&mut self, event: TraceEvent) -> Result<(), SimError> {
        self.sink.emit(&event)?;
        self.observer.observe(&self.pool);
        Ok(())
    }

    /// Reserves the process's memory. On failure the process goes to the
    /// rejected queue and `None` comes back.
    pub fn try_admit(
        &mut self,
        key: ProcessKey,
        record: &ProcessRecord,
    ) -> Result<Option<Reservation>, SimError> {
        match self.pool.try_reserve(key, record.ram_required) {
            Some(reservation) => {
                self.observer.on_reserve(key, reservation.units());
                debug!(
                    "admit {} ({} units, {} left)",
                    record.name,
                    record.ram_required,
                    self.pool.available()
                );
                Ok(Some(reservation))
            }
            None => {
                self.reject(key, record)?;
                Ok(None)
            }
        }
    }

    pub fn reject(&mut self, key: ProcessKey, record: &ProcessRecord) -> Result<(), SimError> {
        debug!(
            "reject {} ({} units, {} left)",
            record.name,
            record.ram_required,
            self.pool.available()
        );
        self.emit(TraceEvent::Rejected {
            name: record.name.clone(),
        })?;
        self.rejected.push(key);
        self.emit(TraceEvent::Queued {
            name: record.name.clone(),
        })
    }

    /// Logs a run that finishes the process, then releases its memory.
    pub fn complete(
        &mut self,
        reservation: Reservation,
        record: &ProcessRecord,
        cpu: CpuId,
        start: Ticks,
        end: Ticks,
    ) -> Result<(), SimError> {
        let name = &record.name;
        self.emit(TraceEvent::Assigned {
            name: name.clone(),
            cpu,
        })?;
        self.emit(TraceEvent::Started {
            name: name.clone(),
            time: start,
            cpu,
        })?;
        self.emit(TraceEvent::Completes {
            name: name.clone(),
            time: end,
        })?;
        self.emit(TraceEvent::Terminated { name: name.clone() })?;
        self.release(reservation, record)
    }

    /// Logs one quantum that leaves the process unfinished, then releases
    /// its memory.
    pub fn expire(
        &mut self,
        reservation: Reservation,
        record: &ProcessRecord,
        cpu: CpuId,
        start: Ticks,
    ) -> Result<(), SimError> {
        let name = &record.name;
        self.emit(TraceEvent::Assigned {
            name: name.clone(),
            cpu,
        })?;
        self.emit(TraceEvent::Started {
            name: name.clone(),
            time: start,
            cpu,
        })?;
        self.emit(TraceEvent::QuantumExpired { name: name.clone() })?;
        self.release(reservation, record)
    }

    fn release(&mut self, reservation: Reservation, record: &ProcessRecord) -> Result<(), SimError> {
        self.observer
            .on_release(reservation.key(), reservation.units());
        let units = self.pool.release(reservation);
        debug!(
            "release {} ({} units, {} left)",
            record.name,
            units,
            self.pool.available()
        );
        self.emit(TraceEvent::Released {
            name: record.name.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PRIMARY_CPU, PriorityClass, ProcessTable};

    fn table() -> ProcessTable {
        let mut table = ProcessTable::new();
        for (name, ram) in [("small", 512), ("huge", 4096)] {
            table
                .insert(ProcessRecord {
                    name: name.to_string(),
                    arrival_time: 0,
                    priority: PriorityClass::Realtime,
                    burst_time: 3,
                    ram_required: ram,
                    cpu_usage: 0,
                })
                .unwrap();
        }
        table
    }

    #[test]
    fn completion_emits_lines_in_order_and_restores_pool() {
        let table = table();
        let key = table.find("small").unwrap();
        let mut core = SchedCore::new(2048, Vec::new());

        let reservation = core.try_admit(key, table.get(key)).unwrap().unwrap();
        assert_eq!(core.pool().available(), 1536);
        core.complete(reservation, table.get(key), PRIMARY_CPU, 0, 3).unwrap();

        assert_eq!(core.pool().available(), 2048);
        assert_eq!(core.observer().admissions(), 1);
        assert_eq!(core.observer().releases(), 1);
        assert_eq!(core.observer().outstanding(), 0);

        let lines: Vec<String> = core.sink().iter().map(ToString::to_string).collect();
        assert_eq!(
            lines,
            [
                "Process small is assigned to CPU-1.",
                "Process small starts at time 0 on CPU-1.",
                "Process small completes at time 3.",
                "Process small is completed and terminated.",
                "Process small releases RAM.",
            ]
        );
    }

    #[test]
    fn failed_admission_lands_in_rejected_queue() {
        let table = table();
        let key = table.find("huge").unwrap();
        let mut core = SchedCore::new(2048, Vec::new());

        assert!(core.try_admit(key, table.get(key)).unwrap().is_none());
        assert_eq!(core.rejected().iter().collect::<Vec<_>>(), [key]);
        assert_eq!(core.pool().available(), 2048);
        assert_eq!(
            core.into_sink(),
            [
                TraceEvent::Rejected {
                    name: "huge".into()
                },
                TraceEvent::Queued {
                    name: "huge".into()
                },
            ]
        );
    }
}
