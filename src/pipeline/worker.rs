//! Per-chunk worker: stream a byte range line-by-line, apply the transform,
//! write to a private intermediate artifact.
//!
//! Memory discipline: one line (or one escaped document) in memory at a
//! time. Workers never return payloads through the dispatch channel — only
//! the artifact path and counters.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use super::chunk::Chunk;
use super::document;
use super::runner::ChunkReport;
use super::{UnitFormat, UnitTransform};

const READ_BUFFER: usize = 1 << 20; // 1 MiB
const WRITE_BUFFER: usize = 8 << 20; // 8 MiB

/// Worker-local state for one chunk: its own file handle, its own output
/// artifact, and a borrow of the shared read-only transform. Constructed at
/// worker start and dropped when the chunk completes.
pub(super) struct WorkerContext<'a, T: UnitTransform + ?Sized> {
    chunk: Chunk,
    transform: &'a T,
    format: UnitFormat,
}

/// The artifact a finished worker hands back to the dispatcher.
pub(super) struct ChunkArtifact {
    pub path: PathBuf,
    pub report: ChunkReport,
}

impl<'a, T: UnitTransform + ?Sized> WorkerContext<'a, T> {
    pub fn new(chunk: Chunk, transform: &'a T, format: UnitFormat) -> Self {
        Self {
            chunk,
            transform,
            format,
        }
    }

    /// Stream the assigned range and write transformed units to a private
    /// file under `artifact_dir`. Runs to completion or fails the chunk;
    /// there is no mid-chunk cancellation.
    pub fn run(&self, input: &Path, artifact_dir: &Path) -> std::io::Result<ChunkArtifact> {
        let artifact_path = artifact_dir.join(format!("chunk-{:04}.part", self.chunk.index));
        let mut reader = BufReader::with_capacity(READ_BUFFER, File::open(input)?);
        let mut writer = BufWriter::with_capacity(WRITE_BUFFER, File::create(&artifact_path)?);
        let mut report = ChunkReport::default();

        let mut pos = self.chunk.start;
        let mut buf: Vec<u8> = Vec::new();

        if self.chunk.start > 0 {
            reader.seek(SeekFrom::Start(self.chunk.start))?;
            // Discard the partial line the previous chunk owns.
            pos += reader.read_until(b'\n', &mut buf)? as u64;
        }

        while pos < self.chunk.end {
            buf.clear();
            let n = reader.read_until(b'\n', &mut buf)?;
            if n == 0 {
                break;
            }
            pos += n as u64;
            report.bytes_read += n as u64;

            // Undecodable byte sequences become replacement characters;
            // decoding problems are never fatal.
            let raw = String::from_utf8_lossy(&buf);
            let line = raw.trim_end_matches(['\n', '\r']);

            report.units_in += 1;
            match self.apply(line) {
                Some(out) => {
                    report.units_kept += 1;
                    report.bytes_written += out.len() as u64;
                    writer.write_all(out.as_bytes())?;
                }
                None => report.units_dropped += 1,
            }
        }

        writer.flush()?;
        Ok(ChunkArtifact {
            path: artifact_path,
            report,
        })
    }

    /// Apply the transform to one input line according to the unit format,
    /// returning the exact bytes to append to the artifact.
    fn apply(&self, line: &str) -> Option<String> {
        match self.format {
            UnitFormat::Lines => self.transform.apply(line).map(|mut s| {
                s.push('\n');
                s
            }),
            UnitFormat::EscapedDocs { escape_output } => {
                let doc = document::unescape(line);
                let cleaned = self.transform.apply(&doc)?;
                let mut out = if escape_output {
                    document::escape(&cleaned).into_owned()
                } else {
                    cleaned
                };
                if escape_output {
                    out.push('\n');
                } else {
                    // Blank-line document separator.
                    out.push_str("\n\n");
                }
                Some(out)
            }
            // Blank-line documents never reach the chunked path; the runner
            // routes them to its sequential loop.
            UnitFormat::BlankLineDocs => self.transform.apply(line).map(|mut s| {
                s.push('\n');
                s
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::chunk::plan_chunks;
    use std::io::Write as _;

    /// Uppercases ASCII and drops lines containing "drop".
    struct TestTransform;

    impl UnitTransform for TestTransform {
        fn apply(&self, unit: &str) -> Option<String> {
            if unit.contains("drop") {
                None
            } else {
                Some(unit.to_ascii_uppercase())
            }
        }
    }

    fn write_input(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("input.txt");
        let mut f = File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_single_chunk_processes_all_lines() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), "one\ntwo\ndrop me\nthree\n");
        let chunk = Chunk { index: 0, start: 0, end: 22 };

        let ctx = WorkerContext::new(chunk, &TestTransform, UnitFormat::Lines);
        let artifact = ctx.run(&input, dir.path()).unwrap();

        let out = std::fs::read_to_string(&artifact.path).unwrap();
        assert_eq!(out, "ONE\nTWO\nTHREE\n");
        assert_eq!(artifact.report.units_in, 4);
        assert_eq!(artifact.report.units_kept, 3);
        assert_eq!(artifact.report.units_dropped, 1);
    }

    #[test]
    fn test_chunks_never_split_or_duplicate_lines() {
        let dir = tempfile::tempdir().unwrap();
        let content: String = (0..50).map(|i| format!("line number {i}\n")).collect();
        let input = write_input(dir.path(), &content);
        let size = content.len() as u64;

        let mut merged = String::new();
        for chunk in plan_chunks(size, 7) {
            let ctx = WorkerContext::new(chunk, &TestTransform, UnitFormat::Lines);
            let artifact = ctx.run(&input, dir.path()).unwrap();
            merged.push_str(&std::fs::read_to_string(&artifact.path).unwrap());
        }

        let expected: String = (0..50).map(|i| format!("LINE NUMBER {i}\n")).collect();
        assert_eq!(merged, expected);
    }

    #[test]
    fn test_escaped_docs_unescaped_before_transform() {
        struct LineCounter;
        impl UnitTransform for LineCounter {
            fn apply(&self, unit: &str) -> Option<String> {
                Some(format!("{} lines", unit.lines().count()))
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), "a\\nb\\nc\nd\n");
        let chunk = Chunk { index: 0, start: 0, end: 10 };

        let ctx = WorkerContext::new(
            chunk,
            &LineCounter,
            UnitFormat::EscapedDocs { escape_output: false },
        );
        let artifact = ctx.run(&input, dir.path()).unwrap();
        let out = std::fs::read_to_string(&artifact.path).unwrap();
        assert_eq!(out, "3 lines\n\n1 lines\n\n");
    }

    #[test]
    fn test_escaped_docs_reescaped_output() {
        struct Identity;
        impl UnitTransform for Identity {
            fn apply(&self, unit: &str) -> Option<String> {
                Some(unit.to_string())
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), "a\\nb\n");
        let chunk = Chunk { index: 0, start: 0, end: 6 };

        let ctx = WorkerContext::new(
            chunk,
            &Identity,
            UnitFormat::EscapedDocs { escape_output: true },
        );
        let artifact = ctx.run(&input, dir.path()).unwrap();
        let out = std::fs::read_to_string(&artifact.path).unwrap();
        assert_eq!(out, "a\\nb\n");
    }

    #[test]
    fn test_invalid_utf8_replaced_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.txt");
        let mut f = File::create(&path).unwrap();
        f.write_all(b"ok\n\xFF\xFEbad\n").unwrap();

        let chunk = Chunk { index: 0, start: 0, end: 9 };
        let ctx = WorkerContext::new(chunk, &TestTransform, UnitFormat::Lines);
        let artifact = ctx.run(&path, dir.path()).unwrap();

        let out = std::fs::read_to_string(&artifact.path).unwrap();
        assert!(out.starts_with("OK\n"));
        assert!(out.contains('\u{FFFD}'));
    }
}
