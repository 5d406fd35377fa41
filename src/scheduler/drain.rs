use log::info;
use rustc_hash::FxHashSet;

use super::{Discipline, Dispatch, PassKind, PassReport};
use crate::{
    core::{ProcessTable, SchedCore, Timelines, TraceSink},
    error::SimError,
};

/// Optional final pass that empties the rejected queue.
///
/// Each distinct rejected process gets one more admission attempt on its home
/// CPU and, if admitted, runs its full burst. Processes rejected again go
/// back to the rejected queue through the normal rejection path.
pub struct DrainPass;

impl Discipline for DrainPass {
    fn kind(&self) -> PassKind {
        PassKind::Drain
    }

    fn run<T: TraceSink>(
        &mut self,
        core: &mut SchedCore<T>,
        table: &ProcessTable,
        timelines: &mut Timelines,
    ) -> Result<PassReport, SimError> {
        let mut report = PassReport::new(self.kind());
        let mut backlog = core.take_rejected();
        let mut seen = FxHashSet::default();
        info!("drain pass over {} rejected entries", backlog.len());

        while let Some(key) = backlog.pop() {
            if !seen.insert(key) {
                continue;
            }

            let record = table.get(key);
            let Some(reservation) = core.try_admit(key, record)? else {
                report.rejected.push(key);
                continue;
            };

            let cpu = record.priority.home_cpu();
            let (start, end) = timelines.occupy(cpu, record.burst_time)?;
            core.complete(reservation, record, cpu, start, end)?;
            report.dispatches.push(Dispatch {
                key,
                cpu,
                start,
                end,
                remaining: 0,
            });
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PRIMARY_CPU, PriorityClass, ProcessRecord};

    #[test]
    fn retries_each_rejected_process_once() {
        let mut table = ProcessTable::new();
        for (name, priority, ram_required) in [
            ("fits", PriorityClass::Realtime, 100),
            ("never", PriorityClass::Batch, 9000),
        ] {
            table
                .insert(ProcessRecord {
                    name: name.to_string(),
                    arrival_time: 0,
                    priority,
                    burst_time: 6,
                    ram_required,
                    cpu_usage: 0,
                })
                .unwrap();
        }
        let fits = table.find("fits").unwrap();
        let never = table.find("never").unwrap();

        let mut core = SchedCore::new(2048, Vec::new());
        // Rejected twice by earlier passes
        core.reject(fits, table.get(fits)).unwrap();
        core.reject(never, table.get(never)).unwrap();
        core.reject(fits, table.get(fits)).unwrap();

        let report = DrainPass
            .run(&mut core, &table, &mut Timelines::new(2))
            .unwrap();

        assert_eq!(report.dispatches.len(), 1);
        assert_eq!(report.dispatches[0].key, fits);
        assert_eq!(report.dispatches[0].cpu, PRIMARY_CPU);
        assert_eq!(report.rejected, [never]);
        assert_eq!(core.rejected().iter().collect::<Vec<_>>(), [never]);
    }
}
