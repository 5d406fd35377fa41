use std::{fmt, io::BufRead, str::FromStr};

use crate::{
    core::{MemoryUnits, PriorityClass, ProcessRecord, Ticks},
    error::SimError,
};

/// One input line: `name,arrival_time,priority,burst_time,ram_required,cpu_usage`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub name: String,
    pub arrival_time: Ticks,
    pub priority: u8,
    pub burst_time: Ticks,
    pub ram_required: MemoryUnits,
    pub cpu_usage: u64,
}

impl Job {
    pub const FIELDS: usize = 6;

    /// Parses one line. `line_no` is 1-based and only used in errors.
    pub fn parse_line(line: &str, line_no: usize) -> Result<Job, SimError> {
        let fields: Vec<&str> = line.trim_end_matches(['\r', '\n']).split(',').collect();
        if fields.len() != Self::FIELDS {
            return Err(SimError::MalformedInput {
                line: line_no,
                reason: format!("expected {} fields, found {}", Self::FIELDS, fields.len()),
            });
        }

        let name = fields[0].trim();
        if name.is_empty() {
            return Err(SimError::MalformedInput {
                line: line_no,
                reason: "process name is empty".to_string(),
            });
        }

        Ok(Job {
            name: name.to_string(),
            arrival_time: field(fields[1], "arrival_time", line_no)?,
            priority: field(fields[2], "priority", line_no)?,
            burst_time: field(fields[3], "burst_time", line_no)?,
            ram_required: field(fields[4], "ram_required", line_no)?,
            cpu_usage: field(fields[5], "cpu_usage", line_no)?,
        })
    }

    pub fn into_record(self) -> Result<ProcessRecord, SimError> {
        let priority =
            PriorityClass::try_from(self.priority).map_err(|level| SimError::AllocationFailure {
                name: self.name.clone(),
                reason: format!("priority {level} is outside 0-3"),
            })?;

        Ok(ProcessRecord {
            name: self.name,
            arrival_time: self.arrival_time,
            priority,
            burst_time: self.burst_time,
            ram_required: self.ram_required,
            cpu_usage: self.cpu_usage,
        })
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{},{},{}",
            self.name,
            self.arrival_time,
            self.priority,
            self.burst_time,
            self.ram_required,
            self.cpu_usage
        )
    }
}

fn field<N: FromStr>(raw: &str, what: &str, line_no: usize) -> Result<N, SimError> {
    raw.trim().parse().map_err(|_| SimError::MalformedInput {
        line: line_no,
        reason: format!("{what} {:?} is not a non-negative integer", raw.trim()),
    })
}

/// Reads every non-blank line as a job, stopping at the first bad one.
pub fn parse_jobs<R: BufRead>(reader: R) -> Result<Vec<Job>, SimError> {
    let mut jobs = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        jobs.push(Job::parse_line(&line, index + 1)?);
    }
    Ok(jobs)
}
