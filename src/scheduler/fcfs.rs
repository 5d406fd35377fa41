use log::info;

use super::{Discipline, Dispatch, PassKind, PassReport};
use crate::{
    core::{PRIMARY_CPU, PriorityClass, ProcessTable, SchedCore, Timelines, TraceSink},
    error::SimError,
};

/// Realtime processes on CPU-1, in table order, each for its full burst.
/// A rejected process is not retried within the pass.
pub struct FcfsScheduler;

impl Discipline for FcfsScheduler {
    fn kind(&self) -> PassKind {
        PassKind::Fcfs
    }

    fn run<T: TraceSink>(
        &mut self,
        core: &mut SchedCore<T>,
        table: &ProcessTable,
        timelines: &mut Timelines,
    ) -> Result<PassReport, SimError> {
        let mut report = PassReport::new(self.kind());
        info!("FCFS pass on CPU-1");

        for (key, record) in table.of_class(PriorityClass::Realtime) {
            let Some(reservation) = core.try_admit(key, record)? else {
                report.rejected.push(key);
                continue;
            };

            let (start, end) = timelines.occupy(PRIMARY_CPU, record.burst_time)?;
            core.complete(reservation, record, PRIMARY_CPU, start, end)?;
            report.dispatches.push(Dispatch {
                key,
                cpu: PRIMARY_CPU,
                start,
                end,
                remaining: 0,
            });
        }

        Ok(report)
    }
}
