//! Decoding of newline-delimited JSON generate streams.
//!
//! Each line of the body is one JSON object. A line may carry answer
//! text (`response`), reasoning text (`thinking`), and on the last line
//! `done` plus a `done_reason`. Network chunks do not respect line
//! boundaries, so bytes are buffered until a newline arrives.

use serde::Deserialize;
use tracing::{debug, trace, warn};

/// One line of a generate stream as sent by the model server.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateChunk {
    /// Answer text fragment.
    #[serde(default)]
    pub response: Option<String>,
    /// Reasoning text fragment.
    #[serde(default)]
    pub thinking: Option<String>,
    /// Set on the final line.
    #[serde(default)]
    pub done: bool,
    /// Why generation stopped, on the final line.
    #[serde(default)]
    pub done_reason: Option<String>,
}

/// A decoded piece of the stream, tagged by lane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// Reasoning text. Logged, never parsed for a move.
    Thinking(String),
    /// Answer text.
    Answer(String),
    /// Terminal marker.
    Done {
        /// Completion reason reported by the server.
        reason: Option<String>,
    },
}

impl GenerateChunk {
    /// Splits the chunk into its non-empty fragments.
    pub fn into_fragments(self) -> Vec<Fragment> {
        let mut fragments = Vec::new();
        if let Some(thinking) = self.thinking.filter(|t| !t.is_empty()) {
            fragments.push(Fragment::Thinking(thinking));
        }
        if let Some(response) = self.response.filter(|r| !r.is_empty()) {
            fragments.push(Fragment::Answer(response));
        }
        if self.done {
            fragments.push(Fragment::Done {
                reason: self.done_reason,
            });
        }
        fragments
    }
}

/// Everything collected from one generate stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completion {
    answer: String,
    thinking: String,
    done: bool,
    done_reason: Option<String>,
    skipped_lines: usize,
}

impl Completion {
    /// Answer lane, concatenated and trimmed.
    pub fn answer(&self) -> &str {
        self.answer.trim()
    }

    /// Reasoning lane, concatenated.
    pub fn thinking(&self) -> &str {
        &self.thinking
    }

    /// Whether the terminal marker was seen.
    pub fn done(&self) -> bool {
        self.done
    }

    /// Completion reason from the terminal marker.
    pub fn done_reason(&self) -> Option<&str> {
        self.done_reason.as_deref()
    }

    /// Lines that could not be decoded and were skipped.
    pub fn skipped_lines(&self) -> usize {
        self.skipped_lines
    }

    fn absorb(&mut self, fragment: Fragment) {
        match fragment {
            Fragment::Thinking(text) => {
                trace!(thinking = %text, "Thinking fragment");
                self.thinking.push_str(&text);
            }
            Fragment::Answer(text) => self.answer.push_str(&text),
            Fragment::Done { reason } => {
                self.done = true;
                self.done_reason = reason;
            }
        }
    }
}

/// Incremental decoder for a generate stream.
#[derive(Debug, Default)]
pub struct StreamDecoder {
    pending: Vec<u8>,
    completion: Completion,
}

impl StreamDecoder {
    /// Creates an empty decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds raw body bytes, decoding every complete line.
    pub fn push(&mut self, bytes: &[u8]) {
        self.pending.extend_from_slice(bytes);
        while let Some(newline) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=newline).collect();
            self.decode_line(&line);
        }
    }

    /// Decodes any trailing line without a newline and returns the result.
    pub fn finish(mut self) -> Completion {
        let rest = std::mem::take(&mut self.pending);
        self.decode_line(&rest);
        debug!(
            answer_len = self.completion.answer.len(),
            thinking_len = self.completion.thinking.len(),
            done = self.completion.done,
            done_reason = ?self.completion.done_reason,
            skipped = self.completion.skipped_lines,
            "Stream finished"
        );
        self.completion
    }

    fn decode_line(&mut self, line: &[u8]) {
        let line = line.trim_ascii();
        if line.is_empty() {
            return;
        }
        match serde_json::from_slice::<GenerateChunk>(line) {
            Ok(chunk) => {
                for fragment in chunk.into_fragments() {
                    self.completion.absorb(fragment);
                }
            }
            Err(e) => {
                warn!(error = %e, line = %String::from_utf8_lossy(line), "Skipping undecodable stream line");
                self.completion.skipped_lines += 1;
            }
        }
    }
}
