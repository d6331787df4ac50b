//! Run observers — progress reporting hooks for the chunked runner.
//!
//! Observers receive notifications at chunk boundaries without coupling to
//! worker logic. They are an observability concern only: nothing an
//! observer does (or fails to do) may change output bytes.
//!
//! Callbacks take `&self` and may run concurrently from worker threads;
//! implementations keep their own state in atomics.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use log::info;

use super::runner::{ChunkReport, RunReport};

/// Chunk-boundary callbacks. All methods have no-op defaults.
pub trait ProgressObserver: Sync {
    /// The run is about to dispatch `total_chunks` chunks over `file_size`
    /// bytes.
    fn on_run_start(&self, _total_chunks: usize, _file_size: u64) {}

    /// A worker finished its chunk. Called from the worker thread, in
    /// completion order (not chunk order).
    fn on_chunk_done(&self, _index: usize, _report: &ChunkReport) {}

    /// The merged output has been published.
    fn on_run_done(&self, _report: &RunReport) {}
}

/// Observer that does nothing, for zero-overhead runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {}

/// Observer that reports progress through the `log` facade.
#[derive(Debug, Default)]
pub struct LogObserver {
    total_chunks: AtomicUsize,
    completed: AtomicUsize,
    units_done: AtomicU64,
}

impl LogObserver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressObserver for LogObserver {
    fn on_run_start(&self, total_chunks: usize, file_size: u64) {
        self.total_chunks.store(total_chunks, Ordering::Relaxed);
        info!(
            "dispatching {total_chunks} chunks over {:.2} GB",
            file_size as f64 / (1u64 << 30) as f64
        );
    }

    fn on_chunk_done(&self, index: usize, report: &ChunkReport) {
        let done = self.completed.fetch_add(1, Ordering::Relaxed) + 1;
        let units = self.units_done.fetch_add(report.units_in, Ordering::Relaxed) + report.units_in;
        let total = self.total_chunks.load(Ordering::Relaxed);
        let pct = if total > 0 {
            done as f64 / total as f64 * 100.0
        } else {
            100.0
        };
        info!(
            "chunk {index} done ({done}/{total}, {pct:.0}%) | units so far: {units} | kept {} / dropped {}",
            report.units_kept, report.units_dropped
        );
    }

    fn on_run_done(&self, report: &RunReport) {
        let secs = report.elapsed.as_secs_f64();
        if secs > 0.0 {
            info!(
                "run complete: {} units in {:.1}s ({:.0} units/s, {:.1} MB/s)",
                report.units_in,
                secs,
                report.units_in as f64 / secs,
                report.bytes_in as f64 / (1u64 << 20) as f64 / secs
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    /// Observer that counts callbacks, exercising concurrent use.
    #[derive(Default)]
    struct CountingObserver {
        started: AtomicUsize,
        chunks: AtomicUsize,
        finished: AtomicUsize,
    }

    impl ProgressObserver for CountingObserver {
        fn on_run_start(&self, _total: usize, _size: u64) {
            self.started.fetch_add(1, Ordering::Relaxed);
        }
        fn on_chunk_done(&self, _index: usize, _report: &ChunkReport) {
            self.chunks.fetch_add(1, Ordering::Relaxed);
        }
        fn on_run_done(&self, _report: &RunReport) {
            self.finished.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[test]
    fn test_default_methods_are_noops() {
        let obs = NoopObserver;
        obs.on_run_start(4, 1024);
        obs.on_chunk_done(0, &ChunkReport::default());
        obs.on_run_done(&RunReport {
            chunks: 4,
            units_in: 0,
            units_kept: 0,
            units_dropped: 0,
            bytes_in: 0,
            bytes_out: 0,
            elapsed: Duration::ZERO,
        });
    }

    #[test]
    fn test_counting_observer_receives_callbacks() {
        let obs = CountingObserver::default();
        obs.on_run_start(2, 100);
        obs.on_chunk_done(0, &ChunkReport::default());
        obs.on_chunk_done(1, &ChunkReport::default());
        assert_eq!(obs.started.load(Ordering::Relaxed), 1);
        assert_eq!(obs.chunks.load(Ordering::Relaxed), 2);
        assert_eq!(obs.finished.load(Ordering::Relaxed), 0);
    }
}
