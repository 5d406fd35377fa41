use log::info;

use super::{Discipline, Dispatch, PassKind, PassReport};
use crate::{
    core::{
        CpuId, MemoryPool, MemoryUnits, PRIMARY_CPU, PriorityClass, ProcessRecord, ProcessTable,
        SECONDARY_CPU, SchedCore, Timelines, TraceSink,
    },
    error::SimError,
};

/// Picks a CPU for each process in the admission pass.
///
/// Every CPU carries a memory quota for the pass. Realtime processes take
/// CPU-1 while its quota covers them, then CPU-2, and are turned away when
/// neither does. Everything else goes straight to CPU-2. A routing decision
/// debits the chosen quota for the rest of the pass.
#[derive(Debug, Clone)]
pub struct AdmissionPolicy {
    quotas: Vec<MemoryUnits>,
}

impl AdmissionPolicy {
    pub fn new(primary_budget: MemoryUnits, secondary_budget: MemoryUnits) -> Self {
        Self {
            quotas: vec![primary_budget, secondary_budget],
        }
    }

    pub fn quota(&self, cpu: CpuId) -> MemoryUnits {
        self.quotas[cpu]
    }

    pub fn route(&mut self, record: &ProcessRecord, pool: &MemoryPool) -> Option<CpuId> {
        if !pool.can_fit(record.ram_required) {
            return None;
        }

        let ram = record.ram_required;
        let cpu = match record.priority {
            PriorityClass::Realtime => [PRIMARY_CPU, SECONDARY_CPU]
                .into_iter()
                .find(|&cpu| self.quotas[cpu] >= ram)?,
            _ => SECONDARY_CPU,
        };
        self.quotas[cpu] = self.quotas[cpu].saturating_sub(ram);
        Some(cpu)
    }
}

/// Initial bulk pass: every process, in table order, runs its full burst on
/// whichever CPU the policy picks.
pub struct AdmissionPass {
    policy: AdmissionPolicy,
}

impl AdmissionPass {
    pub fn new(policy: AdmissionPolicy) -> Self {
        Self { policy }
    }
}

impl Discipline for AdmissionPass {
    fn kind(&self) -> PassKind {
        PassKind::Admission
    }

    fn run<T: TraceSink>(
        &mut self,
        core: &mut SchedCore<T>,
        table: &ProcessTable,
        timelines: &mut Timelines,
    ) -> Result<PassReport, SimError> {
        let mut report = PassReport::new(self.kind());
        info!("admission pass over {} processes", table.len());

        for (key, record) in table.iter() {
            let Some(cpu) = self.policy.route(record, core.pool()) else {
                core.reject(key, record)?;
                report.rejected.push(key);
                continue;
            };
            let Some(reservation) = core.try_admit(key, record)? else {
                report.rejected.push(key);
                continue;
            };

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
    use crate::core::{ProcessKey, TraceEvent};

    fn record(name: &str, priority: PriorityClass, burst_time: u64, ram: u64) -> ProcessRecord {
        ProcessRecord {
            name: name.to_string(),
            arrival_time: 0,
            priority,
            burst_time,
            ram_required: ram,
            cpu_usage: 0,
        }
    }

    #[test]
    fn realtime_falls_back_to_secondary_cpu() {
        let pool = MemoryPool::new(2048);
        let mut policy = AdmissionPolicy::new(512, 1536);

        let a = record("A", PriorityClass::Realtime, 1, 400);
        let b = record("B", PriorityClass::Realtime, 1, 200);
        let c = record("C", PriorityClass::Realtime, 1, 1500);
        let d = record("D", PriorityClass::Normal, 1, 100);

        assert_eq!(policy.route(&a, &pool), Some(PRIMARY_CPU));
        assert_eq!(policy.quota(PRIMARY_CPU), 112);
        // 200 no longer fits CPU-1's quota
        assert_eq!(policy.route(&b, &pool), Some(SECONDARY_CPU));
        assert_eq!(policy.quota(SECONDARY_CPU), 1336);
        // Neither quota covers 1500
        assert_eq!(policy.route(&c, &pool), None);
        assert_eq!(policy.route(&d, &pool), Some(SECONDARY_CPU));
    }

    #[test]
    fn secondary_quota_never_blocks_lower_classes() {
        let pool = MemoryPool::new(2048);
        let mut policy = AdmissionPolicy::new(512, 1536);
        let big = record("big", PriorityClass::Batch, 1, 1500);

        assert_eq!(policy.route(&big, &pool), Some(SECONDARY_CPU));
        assert_eq!(policy.route(&big, &pool), Some(SECONDARY_CPU));
        assert_eq!(policy.quota(SECONDARY_CPU), 0);
    }

    #[test]
    fn pass_runs_each_process_once_and_rejects_oversized() {
        let mut table = ProcessTable::new();
        table.insert(record("A", PriorityClass::Realtime, 5, 100)).unwrap();
        table.insert(record("B", PriorityClass::Interactive, 3, 100)).unwrap();
        table.insert(record("X", PriorityClass::Normal, 3, 9000)).unwrap();
        table.insert(record("C", PriorityClass::Batch, 4, 100)).unwrap();

        let mut core = SchedCore::new(2048, Vec::new());
        let mut timelines = Timelines::new(2);
        let mut pass = AdmissionPass::new(AdmissionPolicy::new(512, 1536));
        let report = pass.run(&mut core, &table, &mut timelines).unwrap();

        let spans: Vec<(&str, CpuId, u64, u64)> = report
            .dispatches
            .iter()
            .map(|d| (table.get(d.key).name.as_str(), d.cpu, d.start, d.end))
            .collect();
        assert_eq!(
            spans,
            [
                ("A", PRIMARY_CPU, 0, 5),
                ("B", SECONDARY_CPU, 0, 3),
                ("C", SECONDARY_CPU, 3, 7),
            ]
        );

        let x: ProcessKey = table.find("X").unwrap();
        assert_eq!(report.rejected, [x]);
        assert_eq!(core.rejected().iter().collect::<Vec<_>>(), [x]);
        assert_eq!(core.pool().available(), 2048);

        let events = core.into_sink();
        let x_events: Vec<&TraceEvent> = events.iter().filter(|e| e.name() == "X").collect();
        assert_eq!(
            x_events,
            [
                &TraceEvent::Rejected { name: "X".into() },
                &TraceEvent::Queued { name: "X".into() },
            ]
        );
    }
}
