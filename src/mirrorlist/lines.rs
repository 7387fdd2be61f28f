// src/mirrorlist/lines.rs
// =============================================================================
// Everything that happens to the response body after the headers check out.
//
// The body arrives in chunks of arbitrary size. We turn that into a lazy
// stream of lines (each keeping its '\n'), rewrite every line, and collect
// the result into MirrorLines together with the reason the stream ended.
//
// Pieces:
// - LineSplitter: buffers bytes and hands out complete lines
// - split_lines(): wraps any chunk stream into a line stream
// - uncomment_servers() / looks_like_html(): the per-line rules
// - MirrorLines + Termination: what a fetch returns
//
// Rust concepts:
// - Streams: the async version of iterators (from the futures crate)
// - stream::unfold: build a stream from a state value and an async closure
// =============================================================================

use futures::stream::{self, Stream, StreamExt};
use std::pin::Pin;

use crate::error::FetchError;

/// Marker that shows up when the server sent an HTML page instead of the list
const HTML_MARKER: &str = "<!DOCTYPE html>";

/// Commented-out server entry as it appears in the mirror list
const COMMENTED_SERVER: &str = "#Server";

/// Uncomments every `#Server` entry in the line.
pub fn uncomment_servers(line: &str) -> String {
    line.replace(COMMENTED_SERVER, "Server")
}

/// True when the line looks like the start of an HTML document.
pub fn looks_like_html(line: &str) -> bool {
    line.contains(HTML_MARKER)
}

// Why the line stream stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// The whole body was read
    EndOfInput,
    /// Reading the body failed part-way; the message is the underlying error
    ReadError(String),
}

/// The processed mirror list, one entry per line of the response body.
///
/// Lines are decoded as UTF-8; invalid byte sequences become U+FFFD, so the
/// text is not guaranteed to be byte-for-byte what the server sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorLines {
    lines: Vec<String>,
    termination: Termination,
    html_detected: bool,
}

impl MirrorLines {
    pub fn new(lines: Vec<String>, termination: Termination) -> Self {
        Self {
            lines,
            termination,
            html_detected: false,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn termination(&self) -> &Termination {
        &self.termination
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// True when some line carried the HTML doctype marker
    pub fn html_detected(&self) -> bool {
        self.html_detected
    }

    /// Turns a truncated list into an error instead of accepting the partial data.
    pub fn into_complete(self) -> Result<Self, FetchError> {
        match self.termination {
            Termination::EndOfInput => Ok(self),
            Termination::ReadError(message) => Err(FetchError::Truncated {
                lines: self.lines.len(),
                message,
            }),
        }
    }
}

// Accumulates raw bytes and hands out complete lines
//
// Lines are only decoded once they are complete, so a multi-byte UTF-8
// character split across two chunks still decodes correctly.
#[derive(Debug, Default)]
pub struct LineSplitter {
    buffer: Vec<u8>,
}

impl LineSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Next complete line including its `\n`, if one is buffered
    pub fn next_line(&mut self) -> Option<String> {
        let end = self.buffer.iter().position(|&b| b == b'\n')?;
        let line: Vec<u8> = self.buffer.drain(..=end).collect();
        Some(String::from_utf8_lossy(&line).into_owned())
    }

    /// Whatever is left after the last `\n`. Empty leftovers yield nothing.
    pub fn finish(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        let rest = std::mem::take(&mut self.buffer);
        Some(String::from_utf8_lossy(&rest).into_owned())
    }
}

struct SplitState<S, E> {
    chunks: Pin<Box<S>>,
    splitter: LineSplitter,
    pending_error: Option<E>,
    exhausted: bool,
}

// Turns a stream of byte chunks into a lazy stream of lines
//
// The stream yields Ok(line) for every line and ends either silently (end of
// input) or with exactly one Err (read error). Bytes received before a read
// error are still delivered as a final line first.
pub fn split_lines<S, B, E>(chunks: S) -> impl Stream<Item = Result<String, E>>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
{
    let state = SplitState {
        chunks: Box::pin(chunks),
        splitter: LineSplitter::new(),
        pending_error: None,
        exhausted: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(line) = state.splitter.next_line() {
                return Some((Ok(line), state));
            }
            if let Some(error) = state.pending_error.take() {
                return Some((Err(error), state));
            }
            if state.exhausted {
                return None;
            }

            let next = state.chunks.next().await;
            match next {
                Some(Ok(chunk)) => state.splitter.push(chunk.as_ref()),
                Some(Err(error)) => {
                    state.exhausted = true;
                    match state.splitter.finish() {
                        Some(rest) => {
                            state.pending_error = Some(error);
                            return Some((Ok(rest), state));
                        }
                        None => return Some((Err(error), state)),
                    }
                }
                None => {
                    state.exhausted = true;
                    return state.splitter.finish().map(|rest| (Ok(rest), state));
                }
            }
        }
    })
}

// Drains a line stream, applying the per-line rules
//
// Stops at the first error and records it in the Termination instead of
// failing; the lines read so far are kept.
pub async fn collect_mirror_lines<S, E>(lines: S) -> MirrorLines
where
    S: Stream<Item = Result<String, E>>,
    E: std::fmt::Display,
{
    let mut lines = Box::pin(lines);
    let mut out = Vec::new();
    let mut termination = Termination::EndOfInput;
    let mut html_detected = false;

    while let Some(item) = lines.next().await {
        match item {
            Ok(line) => {
                if looks_like_html(&line) {
                    html_detected = true;
                    log::warn!("Found an HTML tag. Perhaps got HTML? The mirror list may not work!");
                }
                out.push(uncomment_servers(&line));
            }
            Err(e) => {
                log::warn!("Reading the mirror list stopped after {} line(s): {}", out.len(), e);
                termination = Termination::ReadError(e.to_string());
                break;
            }
        }
    }

    MirrorLines {
        lines: out,
        termination,
        html_detected,
    }
}
