use average::{Estimate, Mean};
use rustc_hash::FxHashSet;

use crate::core::{CpuId, PriorityClass, ProcessKey, ProcessTable, Ticks};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    Admission,
    Fcfs,
    Sjf,
    RoundRobin {
        class: PriorityClass,
        quantum: Ticks,
    },
    Drain,
}

impl PassKind {
    pub fn label(&self) -> String {
        match self {
            Self::Admission => "CPU-1/CPU-2 admission:".to_string(),
            Self::Fcfs => "CPU-1 que1(priority-0)(FCFS):".to_string(),
            Self::Sjf => "CPU-2 que2(priority-1) (Sjf):".to_string(),
            Self::RoundRobin { class, quantum } => {
                let level = class.level();
                format!("CPU-2 que{}(priority-{level}) (RR-q{quantum}):", level + 1)
            }
            Self::Drain => "CPU-1/CPU-2 drain:".to_string(),
        }
    }
}

/// One stretch of CPU time given to a process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub key: ProcessKey,
    pub cpu: CpuId,
    pub start: Ticks,
    pub end: Ticks,
    /// Burst still owed after this dispatch; zero once the process is done.
    pub remaining: Ticks,
}

impl Dispatch {
    pub fn is_final(&self) -> bool {
        self.remaining == 0
    }
}

#[derive(Debug, Clone)]
pub struct PassReport {
    pub kind: PassKind,
    pub dispatches: Vec<Dispatch>,
    pub rejected: Vec<ProcessKey>,
    /// Processes dropped from the pass after an admission that can never
    /// succeed within it.
    pub starved: Vec<ProcessKey>,
}

impl PassReport {
    pub fn new(kind: PassKind) -> Self {
        Self {
            kind,
            dispatches: Vec::new(),
            rejected: Vec::new(),
            starved: Vec::new(),
        }
    }

    pub fn finished(&self) -> impl Iterator<Item = &Dispatch> + '_ {
        self.dispatches.iter().filter(|d| d.is_final())
    }

    /// `CPU-1 que1(priority-0)(FCFS):A-B`
    pub fn summary_line(&self, table: &ProcessTable) -> String {
        let names: Vec<&str> = self
            .dispatches
            .iter()
            .map(|d| table.get(d.key).name.as_str())
            .collect();
        format!("{}{}", self.kind.label(), names.join("-"))
    }

    /// Mean of (completion - arrival) over finished processes. Pass clocks
    /// are local, so this is relative to the pass's own timeline. `None` when
    /// nothing finished.
    pub fn mean_turnaround(&self, table: &ProcessTable) -> Option<f64> {
        mean(
            self.finished()
                .map(|d| d.end.saturating_sub(table.get(d.key).arrival_time) as f64),
        )
    }

    /// Mean of (first start - arrival) over dispatched processes.
    pub fn mean_response(&self, table: &ProcessTable) -> Option<f64> {
        let mut seen = FxHashSet::default();
        mean(
            self.dispatches
                .iter()
                .filter(|d| seen.insert(d.key))
                .map(|d| d.start.saturating_sub(table.get(d.key).arrival_time) as f64),
        )
    }
}

fn mean(iter: impl Iterator<Item = f64>) -> Option<f64> {
    let mean: Mean = iter.collect();
    (mean.len() > 0).then(|| mean.estimate())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PRIMARY_CPU, ProcessRecord};

    #[test]
    fn summary_and_averages() {
        let mut table = ProcessTable::new();
        let mut keys = Vec::new();
        for (name, arrival_time) in [("A", 0), ("B", 2)] {
            keys.push(
                table
                    .insert(ProcessRecord {
                        name: name.to_string(),
                        arrival_time,
                        priority: PriorityClass::Normal,
                        burst_time: 10,
                        ram_required: 1,
                        cpu_usage: 0,
                    })
                    .unwrap(),
            );
        }

        let mut report = PassReport::new(PassKind::RoundRobin {
            class: PriorityClass::Normal,
            quantum: 8,
        });
        for (key, start, end, remaining) in [
            (keys[0], 0, 8, 2),
            (keys[1], 8, 16, 2),
            (keys[0], 16, 18, 0),
            (keys[1], 18, 20, 0),
        ] {
            report.dispatches.push(Dispatch {
                key,
                cpu: PRIMARY_CPU,
                start,
                end,
                remaining,
            });
        }

        assert_eq!(
            report.summary_line(&table),
            "CPU-2 que3(priority-2) (RR-q8):A-B-A-B"
        );
        assert_eq!(report.finished().count(), 2);
        // (18 - 0 + 20 - 2) / 2
        assert_eq!(report.mean_turnaround(&table), Some(18.0));
        // (0 - 0 + 8 - 2) / 2
        assert_eq!(report.mean_response(&table), Some(3.0));
    }

    #[test]
    fn empty_pass_has_no_averages() {
        let table = ProcessTable::new();
        let report = PassReport::new(PassKind::Sjf);
        assert_eq!(report.summary_line(&table), "CPU-2 que2(priority-1) (Sjf):");
        assert_eq!(report.mean_turnaround(&table), None);
        assert_eq!(report.mean_response(&table), None);
    }
}
