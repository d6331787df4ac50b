//! Chunked runner — dispatches workers and reassembles output in order.
//!
//! Contract: for a given input and transform, the output file is
//! byte-identical to single-threaded sequential processing, regardless of
//! worker count, completion order, or scheduling. Ordering is the only
//! cross-worker invariant; nothing else is shared but the read-only
//! transform.
//!
//! Failure model: any worker error fails the whole run. Intermediate
//! artifacts live in a run-scoped temp directory that is removed on every
//! exit path, so no partial output is ever published.

use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;
use std::time::{Duration, Instant};

use rayon::prelude::*;

use crate::error::{PipelineError, Result};

use super::chunk::plan_chunks;
use super::document::DocumentReader;
use super::observer::ProgressObserver;
use super::worker::WorkerContext;
use super::{UnitFormat, UnitTransform};

/// Counters for one chunk.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChunkReport {
    pub units_in: u64,
    pub units_kept: u64,
    pub units_dropped: u64,
    pub bytes_read: u64,
    pub bytes_written: u64,
}

/// Aggregated counters for a completed run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub chunks: usize,
    pub units_in: u64,
    pub units_kept: u64,
    pub units_dropped: u64,
    pub bytes_in: u64,
    pub bytes_out: u64,
    pub elapsed: Duration,
}

impl RunReport {
    fn from_chunks(reports: &[ChunkReport], elapsed: Duration) -> Self {
        Self {
            chunks: reports.len(),
            units_in: reports.iter().map(|r| r.units_in).sum(),
            units_kept: reports.iter().map(|r| r.units_kept).sum(),
            units_dropped: reports.iter().map(|r| r.units_dropped).sum(),
            bytes_in: reports.iter().map(|r| r.bytes_read).sum(),
            bytes_out: reports.iter().map(|r| r.bytes_written).sum(),
            elapsed,
        }
    }

    /// Fraction of units that survived, in `[0, 1]`.
    pub fn keep_rate(&self) -> f64 {
        if self.units_in == 0 {
            0.0
        } else {
            self.units_kept as f64 / self.units_in as f64
        }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.elapsed.as_secs_f64();
        writeln!(f, "  Units processed:  {:>12}", self.units_in)?;
        writeln!(f, "  Units kept:       {:>12}", self.units_kept)?;
        writeln!(f, "  Units dropped:    {:>12}", self.units_dropped)?;
        writeln!(f, "  Keep rate:        {:>11.1}%", self.keep_rate() * 100.0)?;
        writeln!(f, "  Bytes in:         {:>12}", self.bytes_in)?;
        writeln!(f, "  Bytes out:        {:>12}", self.bytes_out)?;
        writeln!(f, "  Wall time:        {:>11.1}s", secs)?;
        if secs > 0.0 {
            writeln!(
                f,
                "  Throughput:       {:>9.1} MB/s",
                self.bytes_in as f64 / (1u64 << 20) as f64 / secs
            )?;
        }
        Ok(())
    }
}

/// Order-preserving chunked parallel file processor.
#[derive(Debug, Clone)]
pub struct ChunkedRunner {
    workers: usize,
}

impl Default for ChunkedRunner {
    fn default() -> Self {
        Self::new(Self::available_workers())
    }
}

impl ChunkedRunner {
    /// A runner with a fixed pool of `workers` (clamped to at least 1).
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    /// Available cores minus a reserve of one, never below one.
    pub fn available_workers() -> usize {
        std::thread::available_parallelism()
            .map(|n| n.get().saturating_sub(1))
            .unwrap_or(1)
            .max(1)
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Process `input` into `output` with the given transform.
    ///
    /// Chunk-parallel for [`UnitFormat::Lines`] and
    /// [`UnitFormat::EscapedDocs`]; [`UnitFormat::BlankLineDocs`] runs
    /// sequentially because its unit boundaries cannot be chunk-aligned.
    pub fn run<T>(
        &self,
        input: &Path,
        output: &Path,
        transform: &T,
        format: UnitFormat,
        observer: &dyn ProgressObserver,
    ) -> Result<RunReport>
    where
        T: UnitTransform,
    {
        // Input errors are fatal before any chunk is dispatched.
        let metadata = std::fs::metadata(input).map_err(|source| PipelineError::Input {
            path: input.to_path_buf(),
            source,
        })?;
        let file_size = metadata.len();

        if matches!(format, UnitFormat::BlankLineDocs) {
            return self.run_blank_line_docs(input, output, transform, observer, file_size);
        }

        let started = Instant::now();
        let chunks = plan_chunks(file_size, self.workers);
        observer.on_run_start(chunks.len(), file_size);

        // Intermediates live here; dropped (and deleted) on every exit path.
        let artifact_dir = tempfile::Builder::new().prefix("shuddhi-run-").tempdir()?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()?;

        // `collect` over an indexed parallel iterator preserves chunk order
        // no matter the completion order.
        let artifacts = pool.install(|| {
            chunks
                .par_iter()
                .map(|&chunk| {
                    let ctx = WorkerContext::new(chunk, transform, format);
                    let artifact =
                        ctx.run(input, artifact_dir.path())
                            .map_err(|source| PipelineError::Worker {
                                chunk: chunk.index,
                                source,
                            })?;
                    observer.on_chunk_done(chunk.index, &artifact.report);
                    Ok(artifact)
                })
                .collect::<Result<Vec<_>>>()
        })?;

        // Concatenate in chunk-index order into the final output.
        let mut writer = BufWriter::new(File::create(output)?);
        for artifact in &artifacts {
            let mut reader = File::open(&artifact.path)?;
            io::copy(&mut reader, &mut writer)?;
        }
        writer.flush()?;

        let reports: Vec<ChunkReport> = artifacts.iter().map(|a| a.report).collect();
        let report = RunReport::from_chunks(&reports, started.elapsed());
        observer.on_run_done(&report);
        Ok(report)
    }

    /// Sequential path for blank-line-delimited documents. Streams one
    /// document at a time; output documents are separated by one blank
    /// line.
    fn run_blank_line_docs<T>(
        &self,
        input: &Path,
        output: &Path,
        transform: &T,
        observer: &dyn ProgressObserver,
        file_size: u64,
    ) -> Result<RunReport>
    where
        T: UnitTransform,
    {
        let started = Instant::now();
        observer.on_run_start(1, file_size);

        let reader = BufReader::new(File::open(input).map_err(|source| PipelineError::Input {
            path: input.to_path_buf(),
            source,
        })?);
        let mut writer = BufWriter::new(File::create(output)?);
        let mut report = ChunkReport::default();

        for doc in DocumentReader::new(reader) {
            let doc = doc.map_err(|source| PipelineError::Worker { chunk: 0, source })?;
            report.units_in += 1;
            report.bytes_read += doc.len() as u64;
            match transform.apply(&doc) {
                Some(cleaned) => {
                    report.units_kept += 1;
                    report.bytes_written += cleaned.len() as u64 + 2;
                    writer.write_all(cleaned.as_bytes())?;
                    writer.write_all(b"\n\n")?;
                }
                None => report.units_dropped += 1,
            }
        }
        writer.flush()?;

        observer.on_chunk_done(0, &report);
        let run_report = RunReport::from_chunks(&[report], started.elapsed());
        observer.on_run_done(&run_report);
        Ok(run_report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::observer::NoopObserver;
    use std::io::Write as _;

    struct Upper;
    impl UnitTransform for Upper {
        fn apply(&self, unit: &str) -> Option<String> {
            if unit.is_empty() {
                None
            } else {
                Some(unit.to_ascii_uppercase())
            }
        }
    }

    fn write_file(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_missing_input_fails_before_dispatch() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ChunkedRunner::new(2);
        let err = runner
            .run(
                Path::new("/nonexistent/input.txt"),
                &dir.path().join("out.txt"),
                &Upper,
                UnitFormat::Lines,
                &NoopObserver,
            )
            .unwrap_err();
        assert!(matches!(err, PipelineError::Input { .. }));
    }

    #[test]
    fn test_report_counts() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_file(dir.path(), "in.txt", "a\nb\n\nc\n");
        let output = dir.path().join("out.txt");

        let report = ChunkedRunner::new(2)
            .run(&input, &output, &Upper, UnitFormat::Lines, &NoopObserver)
            .unwrap();

        assert_eq!(report.units_in, 4);
        assert_eq!(report.units_kept, 3);
        assert_eq!(report.units_dropped, 1);
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "A\nB\nC\n");
    }

    #[test]
    fn test_worker_count_is_clamped() {
        assert_eq!(ChunkedRunner::new(0).workers(), 1);
        assert!(ChunkedRunner::available_workers() >= 1);
    }

    #[test]
    fn test_blank_line_docs_sequential() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_file(dir.path(), "in.txt", "one\ntwo\n\n\nthree\n");
        let output = dir.path().join("out.txt");

        let report = ChunkedRunner::new(4)
            .run(&input, &output, &Upper, UnitFormat::BlankLineDocs, &NoopObserver)
            .unwrap();

        assert_eq!(report.units_in, 2);
        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "ONE\nTWO\n\nTHREE\n\n"
        );
    }

    #[test]
    fn test_keep_rate() {
        let report = RunReport {
            chunks: 1,
            units_in: 10,
            units_kept: 7,
            units_dropped: 3,
            bytes_in: 0,
            bytes_out: 0,
            elapsed: Duration::ZERO,
        };
        assert!((report.keep_rate() - 0.7).abs() < 1e-9);
    }
}
