use std::io::{self, Write};

use super::event::TraceEvent;

/// Consumer of the ordered trace.
pub trait TraceSink {
    fn emit(&mut self, event: &TraceEvent) -> io::Result<()>;
}

impl TraceSink for Vec<TraceEvent> {
    fn emit(&mut self, event: &TraceEvent) -> io::Result<()> {
        self.push(event.clone());
        Ok(())
    }
}

/// Writes one event per line.
#[derive(Debug)]
pub struct LineWriter<W: Write> {
    inner: W,
    lines: u64,
}

impl<W: Write> LineWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, lines: 0 }
    }

    pub fn lines_written(&self) -> u64 {
        self.lines
    }

    pub fn into_inner(mut self) -> io::Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

impl<W: Write> TraceSink for LineWriter<W> {
    fn emit(&mut self, event: &TraceEvent) -> io::Result<()> {
        writeln!(self.inner, "{event}")?;
        self.lines += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{PRIMARY_CPU, PriorityClass, ProcessRecord, ProcessTable, SchedCore},
        error::SimError,
    };

    struct FullDisk;

    impl Write for FullDisk {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn line_writer_terminates_each_event() {
        let mut sink = LineWriter::new(Vec::new());
        sink.emit(&TraceEvent::Released { name: "A".into() }).unwrap();
        sink.emit(&TraceEvent::Terminated { name: "B".into() }).unwrap();
        assert_eq!(sink.lines_written(), 2);

        let bytes = sink.into_inner().unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "Process A releases RAM.\nProcess B is completed and terminated.\n"
        );
    }

    #[test]
    fn write_failure_surfaces_as_io_error() {
        let mut table = ProcessTable::new();
        let key = table
            .insert(ProcessRecord {
                name: "A".to_string(),
                arrival_time: 0,
                priority: PriorityClass::Realtime,
                burst_time: 3,
                ram_required: 64,
                cpu_usage: 0,
            })
            .unwrap();
        let mut core = SchedCore::new(2048, LineWriter::new(FullDisk));

        let reservation = core.try_admit(key, table.get(key)).unwrap().unwrap();
        let err = core
            .complete(reservation, table.get(key), PRIMARY_CPU, 0, 3)
            .unwrap_err();
        assert!(matches!(&err, SimError::Io(e) if e.to_string() == "disk full"));
        assert_eq!(core.sink().lines_written(), 0);
    }
}
