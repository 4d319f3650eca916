//! Output buffer with tail-limited prompt search.
//!
//! Command output can be large (full routing tables); the prompt only
//! ever appears at the end. Searching just the last few hundred bytes
//! keeps prompt detection cheap no matter how much a device prints.

use regex::bytes::Regex;

/// How many bytes from the end of the buffer are searched for a prompt.
const SEARCH_DEPTH: usize = 1000;

/// Accumulates session output and answers "has the prompt appeared yet".
///
/// ANSI escape sequences are stripped on the way in, so prompt patterns
/// match what an operator would see, not raw terminal control bytes.
#[derive(Debug, Default)]
pub(crate) struct PromptBuffer {
    buffer: Vec<u8>,
}

impl PromptBuffer {
    pub(crate) fn new() -> Self {
        Self {
            buffer: Vec::with_capacity(4096),
        }
    }

    /// Append a chunk of session output, stripping ANSI escapes.
    pub(crate) fn extend(&mut self, data: &[u8]) {
        let cleaned = strip_ansi_escapes::strip(data);
        self.buffer.extend_from_slice(&cleaned);
    }

    /// Whether `pattern` matches within the searched tail of the buffer.
    pub(crate) fn tail_contains(&self, pattern: &Regex) -> bool {
        let start = self.buffer.len().saturating_sub(SEARCH_DEPTH);
        pattern.is_match(&self.buffer[start..])
    }

    /// Take the accumulated output as text, leaving the buffer empty.
    pub(crate) fn take_text(&mut self) -> String {
        String::from_utf8_lossy(&std::mem::take(&mut self.buffer)).into_owned()
    }

    pub(crate) fn clear(&mut self) {
        self.buffer.clear();
    }

    #[cfg(test)]
    fn as_slice(&self) -> &[u8] {
        &self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extend_strips_ansi() {
        let mut buffer = PromptBuffer::new();
        buffer.extend(b"\x1b[32m<CE6850>\x1b[0m");
        assert_eq!(buffer.as_slice(), b"<CE6850>");
    }

    #[test]
    fn test_tail_contains_prompt() {
        let mut buffer = PromptBuffer::new();
        buffer.extend(b"Cisco IOS Software, C2960 Software\r\n");
        buffer.extend(b"Switch#");
        let prompt = Regex::new(r"(?m)^[\w.\-]+#\s?$").unwrap();
        assert!(buffer.tail_contains(&prompt));
    }

    #[test]
    fn test_prompt_outside_tail_not_found() {
        let mut buffer = PromptBuffer::new();
        buffer.extend(b"Switch#\n");
        buffer.extend(&vec![b'x'; SEARCH_DEPTH + 100]);
        let prompt = Regex::new(r"Switch#").unwrap();
        assert!(!buffer.tail_contains(&prompt));
    }

    #[test]
    fn test_take_text_resets() {
        let mut buffer = PromptBuffer::new();
        buffer.extend(b"show version\r\noutput\r\nSwitch#");
        let text = buffer.take_text();
        assert!(text.contains("output"));
        assert!(!buffer.tail_contains(&Regex::new("output").unwrap()));
    }
}
