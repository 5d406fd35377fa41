use log::{info, warn};
use rustc_hash::FxHashMap;

use super::{Discipline, Dispatch, PassKind, PassReport};
use crate::{
    core::{
        PriorityClass, ProcessKey, ProcessTable, ReadyQueue, SECONDARY_CPU, SchedCore, Ticks,
        Timelines, TraceSink,
    },
    error::SimError,
};

/// Round robin over a single priority class on CPU-2.
///
/// Processes start in table order. A process owing more than one quantum
/// runs for a quantum and goes to the back of the ready queue; otherwise it
/// runs to completion. Memory is admitted and released around every slice.
pub struct RoundRobinScheduler {
    class: PriorityClass,
    quantum: Ticks,
}

impl RoundRobinScheduler {
    pub fn new(class: PriorityClass, quantum: Ticks) -> Self {
        assert!(quantum > 0, "Round robin requires a positive quantum");
        Self { class, quantum }
    }
}

impl Discipline for RoundRobinScheduler {
    fn kind(&self) -> PassKind {
        PassKind::RoundRobin {
            class: self.class,
            quantum: self.quantum,
        }
    }

    fn run<T: TraceSink>(
        &mut self,
        core: &mut SchedCore<T>,
        table: &ProcessTable,
        timelines: &mut Timelines,
    ) -> Result<PassReport, SimError> {
        let mut report = PassReport::new(self.kind());

        let mut remaining: FxHashMap<ProcessKey, Ticks> = table
            .of_class(self.class)
            .map(|(key, record)| (key, record.burst_time))
            .collect();
        let mut ready: ReadyQueue = table.of_class(self.class).map(|(key, _)| key).collect();
        info!(
            "RR pass (q={}) on CPU-2 over {} processes",
            self.quantum,
            ready.len()
        );

        while let Some(key) = ready.pop_front() {
            let record = table.get(key);
            let Some(&owed) = remaining.get(&key) else {
                continue;
            };

            let Some(reservation) = core.try_admit(key, record)? else {
                // The pool is whole between slices, so no later sweep helps.
                warn!(
                    "RR: {} needs {} units but only {} exist; dropping from pass",
                    record.name,
                    record.ram_required,
                    core.pool().available()
                );
                report.rejected.push(key);
                report.starved.push(key);
                remaining.remove(&key);
                continue;
            };

            let slice = owed.min(self.quantum);
            let (start, end) = timelines.occupy(SECONDARY_CPU, slice)?;
            let left = owed - slice;
            remaining.insert(key, left);

            if left == 0 {
                core.complete(reservation, record, SECONDARY_CPU, start, end)?;
            } else {
                core.expire(reservation, record, SECONDARY_CPU, start)?;
                ready.push_back(key);
            }

            report.dispatches.push(Dispatch {
                key,
                cpu: SECONDARY_CPU,
                start,
                end,
                remaining: left,
            });
        }

        Ok(report)
    }
}
