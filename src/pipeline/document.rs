//! Document codec and streaming document reader.
//!
//! Two document shapes flow through the pipeline:
//!
//! - **escaped**: one document per input line with internal newlines written
//!   as the two-character literal `\n` — the chunk-safe shape, since a unit
//!   never spans a line boundary;
//! - **blank-line delimited**: a document is a maximal run of lines, with
//!   two or more consecutive blank lines marking the boundary. A single
//!   blank line is a paragraph break *within* a document.

use std::borrow::Cow;
use std::io::{self, BufRead};

/// Turn an escaped one-line document back into real multi-line text.
pub fn unescape(line: &str) -> Cow<'_, str> {
    if line.contains("\\n") {
        Cow::Owned(line.replace("\\n", "\n"))
    } else {
        Cow::Borrowed(line)
    }
}

/// Escape a document's newlines so it fits on one output line.
pub fn escape(doc: &str) -> Cow<'_, str> {
    if doc.contains('\n') {
        Cow::Owned(doc.replace('\n', "\\n"))
    } else {
        Cow::Borrowed(doc)
    }
}

/// Streaming reader yielding blank-line-delimited documents.
///
/// Constant memory: holds at most one document at a time. Paragraph breaks
/// (single blank lines) inside a document are preserved as empty lines in
/// the yielded text.
pub struct DocumentReader<R> {
    reader: R,
    current: Vec<String>,
    pending_blanks: usize,
    done: bool,
}

impl<R: BufRead> DocumentReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            current: Vec::new(),
            pending_blanks: 0,
            done: false,
        }
    }

    fn take_document(&mut self) -> Option<String> {
        if self.current.is_empty() {
            None
        } else {
            let doc = self.current.join("\n");
            self.current.clear();
            Some(doc)
        }
    }
}

impl<R: BufRead> Iterator for DocumentReader<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut line = String::new();
        loop {
            line.clear();
            match self.reader.read_line(&mut line) {
                Ok(0) => {
                    self.done = true;
                    return self.take_document().map(Ok);
                }
                Ok(_) => {}
                Err(e) => return Some(Err(e)),
            }
            let trimmed = line.trim_end_matches(['\n', '\r']);

            if trimmed.trim().is_empty() {
                self.pending_blanks += 1;
                continue;
            }

            if self.pending_blanks >= 2 {
                // Document boundary: yield what we have, stash this line as
                // the start of the next document.
                self.pending_blanks = 0;
                if let Some(doc) = self.take_document() {
                    self.current.push(trimmed.to_string());
                    return Some(Ok(doc));
                }
                self.current.push(trimmed.to_string());
                continue;
            }

            if self.pending_blanks == 1 && !self.current.is_empty() {
                // Paragraph break within the document.
                self.current.push(String::new());
            }
            self.pending_blanks = 0;
            self.current.push(trimmed.to_string());
        }
    }
}
