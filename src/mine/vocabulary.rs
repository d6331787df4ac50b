//! Parallel vocabulary extraction for the pair miner.
//!
//! Streams the corpus in byte-range chunks (same planning as the cleaning
//! runner) and collects every distinct Malayalam word that could take part
//! in a chillu correction. Membership in a set is order-independent, so
//! chunk results merge by plain union and the vocabulary is invariant to
//! scheduling.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

use rayon::prelude::*;
use rustc_hash::FxHashSet;

use crate::error::{PipelineError, Result};
use crate::pipeline::{plan_chunks, Chunk};
use crate::script::{classify, is_malayalam, CharClass, VIRAMA};

/// Scalars a line must contain for any of its words to be interesting:
/// the virama or an atomic chillu. Lines without one are skipped wholesale.
fn line_may_match(line: &str) -> bool {
    line.chars()
        .any(|c| c == VIRAMA || classify(c) == CharClass::AtomicChillu)
}

/// The five consonants participating in rule-based chillu resolution.
fn participates(c: char) -> bool {
    matches!(c, 'ണ' | 'ന' | 'ര' | 'ല' | 'ള')
}

/// Does this word carry either an atomic chillu (canonical evidence) or a
/// participating consonant+virama that is not opening a geminate with
/// another participating consonant (legacy candidate)?
fn is_candidate(word: &str) -> bool {
    let chars: Vec<char> = word.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        if classify(c) == CharClass::AtomicChillu {
            return true;
        }
        if participates(c) && chars.get(i + 1) == Some(&VIRAMA) {
            match chars.get(i + 2) {
                Some(&next) if participates(next) => {}
                _ => return true,
            }
        }
    }
    false
}

/// Collect candidate words from one byte-range chunk.
fn scan_chunk(input: &Path, chunk: Chunk) -> std::io::Result<FxHashSet<String>> {
    let mut reader = BufReader::with_capacity(1 << 20, File::open(input)?);
    let mut words = FxHashSet::default();

    let mut pos = chunk.start;
    let mut buf: Vec<u8> = Vec::new();

    if chunk.start > 0 {
        reader.seek(SeekFrom::Start(chunk.start))?;
        pos += reader.read_until(b'\n', &mut buf)? as u64;
    }

    while pos < chunk.end {
        buf.clear();
        let n = reader.read_until(b'\n', &mut buf)?;
        if n == 0 {
            break;
        }
        pos += n as u64;

        let line = String::from_utf8_lossy(&buf);
        if !line_may_match(&line) {
            continue;
        }

        // Words are maximal runs of Malayalam-block scalars.
        for word in line.split(|c: char| !is_malayalam(c)) {
            if !word.is_empty() && is_candidate(word) {
                words.insert(word.to_string());
            }
        }
    }

    Ok(words)
}

/// Extract the deduplicated candidate vocabulary from `input` using
/// `workers` parallel chunk scanners.
pub fn extract_vocabulary(input: &Path, workers: usize) -> Result<FxHashSet<String>> {
    let metadata = std::fs::metadata(input).map_err(|source| PipelineError::Input {
        path: input.to_path_buf(),
        source,
    })?;

    let chunks = plan_chunks(metadata.len(), workers);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .build()?;

    let sets = pool.install(|| {
        chunks
            .par_iter()
            .map(|&chunk| {
                scan_chunk(input, chunk).map_err(|source| PipelineError::Worker {
                    chunk: chunk.index,
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()
    })?;

    let mut vocabulary = FxHashSet::default();
    for set in sets {
        vocabulary.extend(set);
    }
    Ok(vocabulary)
}

/// Persist the vocabulary, sorted, one word per line (audit artifact).
pub fn save_vocabulary(path: &Path, vocabulary: &FxHashSet<String>) -> Result<()> {
    let mut words: Vec<&String> = vocabulary.iter().collect();
    words.sort();

    let mut writer = BufWriter::new(File::create(path)?);
    for word in words {
        writer.write_all(word.as_bytes())?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}
