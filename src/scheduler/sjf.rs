use std::cmp::Ordering;

use keyed_priority_queue::KeyedPriorityQueue;
use log::{info, warn};

use super::{Discipline, Dispatch, PassKind, PassReport};
use crate::{
    core::{
        CpuTimeline, PriorityClass, ProcessKey, ProcessTable, SECONDARY_CPU, SchedCore, Ticks,
        Timelines, TraceSink,
    },
    error::SimError,
};

/// Ready-set ordering: shortest burst first, then earliest table position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SjfRank {
    burst: Ticks,
    index: usize,
}

// KeyedPriorityQueue pops the maximum, so the comparison is reversed
impl Ord for SjfRank {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .burst
            .cmp(&self.burst)
            .then_with(|| other.index.cmp(&self.index))
    }
}

impl PartialOrd for SjfRank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Non-preemptive shortest-job-first over interactive processes on CPU-2.
///
/// The pass keeps its own clock starting at 0 and ignores the shared
/// timelines. When nothing has arrived yet the clock jumps to the next
/// arrival.
pub struct SjfScheduler;

impl Discipline for SjfScheduler {
    fn kind(&self) -> PassKind {
        PassKind::Sjf
    }

    fn run<T: TraceSink>(
        &mut self,
        core: &mut SchedCore<T>,
        table: &ProcessTable,
        _timelines: &mut Timelines,
    ) -> Result<PassReport, SimError> {
        let mut report = PassReport::new(self.kind());

        let mut pending: Vec<(usize, ProcessKey)> = table
            .of_class(PriorityClass::Interactive)
            .map(|(key, _)| key)
            .enumerate()
            .collect();
        pending.sort_by_key(|&(_, key)| table.get(key).arrival_time);
        info!("SJF pass on CPU-2 over {} processes", pending.len());

        let mut clock = CpuTimeline::new(SECONDARY_CPU);
        let mut ready: KeyedPriorityQueue<ProcessKey, SjfRank> = KeyedPriorityQueue::new();
        let mut arrivals = pending.into_iter().peekable();

        loop {
            while let Some(&(index, key)) = arrivals.peek() {
                let record = table.get(key);
                if record.arrival_time > clock.now() {
                    break;
                }
                ready.push(
                    key,
                    SjfRank {
                        burst: record.burst_time,
                        index,
                    },
                );
                arrivals.next();
            }

            let Some((key, _)) = ready.pop() else {
                match arrivals.peek() {
                    Some(&(_, next)) => {
                        clock.advance_to(table.get(next).arrival_time);
                        continue;
                    }
                    None => break,
                }
            };

            let record = table.get(key);
            let Some(reservation) = core.try_admit(key, record)? else {
                // The pool is whole again after every run, so this can never
                // succeed later in the pass.
                warn!(
                    "SJF: {} needs {} units but only {} exist; dropping from pass",
                    record.name,
                    record.ram_required,
                    core.pool().available()
                );
                report.rejected.push(key);
                report.starved.push(key);
                continue;
            };

            let (start, end) = clock.occupy(record.burst_time)?;
            core.complete(reservation, record, SECONDARY_CPU, start, end)?;
            report.dispatches.push(Dispatch {
                key,
                cpu: SECONDARY_CPU,
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
    use crate::core::{ProcessRecord, TraceEvent};

    fn table(jobs: &[(&str, Ticks, Ticks, u64)]) -> ProcessTable {
        let mut table = ProcessTable::new();
        for &(name, arrival_time, burst_time, ram_required) in jobs {
            table
                .insert(ProcessRecord {
                    name: name.to_string(),
                    arrival_time,
                    priority: PriorityClass::Interactive,
                    burst_time,
                    ram_required,
                    cpu_usage: 0,
                })
                .unwrap();
        }
        table
    }

    fn spans(table: &ProcessTable, report: &PassReport) -> Vec<(String, Ticks, Ticks)> {
        report
            .dispatches
            .iter()
            .map(|d| (table.get(d.key).name.clone(), d.start, d.end))
            .collect()
    }

    fn run(table: &ProcessTable) -> (PassReport, Vec<TraceEvent>) {
        let mut core = SchedCore::new(2048, Vec::new());
        let report = SjfScheduler
            .run(&mut core, table, &mut Timelines::new(2))
            .unwrap();
        (report, core.into_sink())
    }

    #[test]
    fn shortest_burst_first() {
        let table = table(&[("A", 0, 10, 50), ("B", 0, 4, 50), ("C", 0, 6, 50)]);
        let (report, _) = run(&table);
        assert_eq!(
            spans(&table, &report),
            [
                ("B".to_string(), 0, 4),
                ("C".to_string(), 4, 10),
                ("A".to_string(), 10, 20),
            ]
        );
    }

    #[test]
    fn equal_bursts_keep_table_order() {
        let table = table(&[("late", 0, 5, 50), ("early", 0, 5, 50), ("short", 3, 1, 50)]);
        let (report, _) = run(&table);
        assert_eq!(
            spans(&table, &report),
            [
                ("late".to_string(), 0, 5),
                ("short".to_string(), 5, 6),
                ("early".to_string(), 6, 11),
            ]
        );
    }

    #[test]
    fn idle_clock_jumps_to_next_arrival() {
        let table = table(&[("A", 100, 4, 50), ("B", 3, 2, 50)]);
        let (report, _) = run(&table);
        assert_eq!(
            spans(&table, &report),
            [("B".to_string(), 3, 5), ("A".to_string(), 100, 104)]
        );
    }

    #[test]
    fn unadmittable_process_is_dropped_once() {
        let table = table(&[("big", 0, 1, 4096), ("ok", 0, 2, 64)]);
        let (report, events) = run(&table);

        let big = table.find("big").unwrap();
        assert_eq!(report.starved, [big]);
        assert_eq!(spans(&table, &report), [("ok".to_string(), 0, 2)]);

        let lines: Vec<String> = events.iter().map(ToString::to_string).collect();
        assert_eq!(
            lines[..2],
            [
                "Process big could not be assigned due to insufficient RAM.",
                "Process big is queued due to insufficient RAM.",
            ]
        );
        assert_eq!(events.iter().filter(|e| e.name() == "big").count(), 2);
    }
}
