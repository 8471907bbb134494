//! Output sinks for fully formatted lines.
//!
//! A sink is the only place where concurrent writers need to be serialised;
//! formatters stay lock-free.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// Destination for formatted lines.
pub trait Sink: Send + Sync {
    /// Write one line; the sink appends the line terminator.
    fn write_line(&self, line: &str) -> io::Result<()>;

    fn flush(&self) -> io::Result<()> {
        Ok(())
    }
}

impl<S: Sink + ?Sized> Sink for Arc<S> {
    fn write_line(&self, line: &str) -> io::Result<()> {
        (**self).write_line(line)
    }

    fn flush(&self) -> io::Result<()> {
        (**self).flush()
    }
}

fn poisoned() -> io::Error {
    io::Error::other("sink lock poisoned")
}

/// Sink writing to any `Write` implementation behind a mutex.
pub struct StreamSink<W = io::Stderr> {
    writer: Mutex<W>,
}

impl StreamSink<io::Stderr> {
    /// Sink writing to stderr.
    pub fn stderr() -> Self {
        StreamSink::new(io::stderr())
    }
}

impl StreamSink<io::Stdout> {
    /// Sink writing to stdout.
    pub fn stdout() -> Self {
        StreamSink::new(io::stdout())
    }
}

impl<W: Write + Send> StreamSink<W> {
    pub fn new(writer: W) -> Self {
        StreamSink {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(|e| e.into_inner())
    }
}

impl<W: Write + Send> Sink for StreamSink<W> {
    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut writer = self.writer.lock().map_err(|_| poisoned())?;
        writeln!(writer, "{}", line)
    }

    fn flush(&self) -> io::Result<()> {
        self.writer.lock().map_err(|_| poisoned())?.flush()
    }
}

/// Sink collecting lines in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every line written so far.
    pub fn lines(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(e) => e.into_inner().clone(),
        }
    }
}

impl Sink for MemorySink {
    fn write_line(&self, line: &str) -> io::Result<()> {
        self.lines
            .lock()
            .map_err(|_| poisoned())?
            .push(line.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_sink_appends_newline() {
        let sink = StreamSink::new(Vec::new());
        sink.write_line("one").unwrap();
        sink.write_line("two").unwrap();
        sink.flush().unwrap();
        assert_eq!(sink.into_inner(), b"one\ntwo\n");
    }

    #[test]
    fn test_memory_sink_collects_lines() {
        let sink = Arc::new(MemorySink::new());
        let shared: Arc<dyn Sink> = sink.clone();
        shared.write_line("a=1;").unwrap();
        assert_eq!(sink.lines(), ["a=1;"]);
    }

    #[test]
    fn test_concurrent_writes_are_whole_lines() {
        let sink = Arc::new(StreamSink::new(Vec::new()));
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let sink = sink.clone();
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        sink.write_line(&format!("thread-{i}")).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let sink = Arc::try_unwrap(sink).ok().expect("sole owner");
        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out.lines().count(), 200);
        assert!(out.lines().all(|l| l.starts_with("thread-") && l.len() == 8));
    }
}
