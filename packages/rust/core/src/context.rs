//! The running context buffer fed back into prompts.

/// Everything generated so far, read back only through a trailing window.
///
/// The buffer grows monotonically; truncation happens at read time in
/// [`ContextAccumulator::tail`], never at write time.
#[derive(Debug, Clone, Default)]
pub struct ContextAccumulator {
    buffer: String,
}

impl ContextAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    /// The last `max_chars` characters, or the whole buffer if it is shorter.
    pub fn tail(&self, max_chars: usize) -> &str {
        tail_chars(&self.buffer, max_chars)
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

/// Suffix of `text` holding at most `max_chars` characters (not bytes).
pub fn tail_chars(text: &str, max_chars: usize) -> &str {
    if max_chars == 0 {
        return "";
    }
    match text.char_indices().rev().nth(max_chars - 1) {
        Some((start, _)) => &text[start..],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_preserves_order() {
        let mut ctx = ContextAccumulator::new();
        ctx.append("first\n\n");
        let before = ctx.as_str().to_string();
        ctx.append("second\n\n");

        assert_eq!(ctx.as_str(), format!("{before}second\n\n"));
    }

    #[test]
    fn tail_longer_than_buffer_returns_everything() {
        let mut ctx = ContextAccumulator::new();
        ctx.append("abcdef");

        assert_eq!(ctx.tail(6), "abcdef");
        assert_eq!(ctx.tail(100), "abcdef");
    }

    #[test]
    fn tail_returns_exact_suffix() {
        let mut ctx = ContextAccumulator::new();
        ctx.append("abcdef");

        assert_eq!(ctx.tail(3), "def");
        assert_eq!(ctx.tail(1), "f");
        assert_eq!(ctx.tail(0), "");
    }

    #[test]
    fn tail_counts_characters_not_bytes() {
        let mut ctx = ContextAccumulator::new();
        ctx.append("ação é útil");

        assert_eq!(ctx.tail(4), "útil");
        assert_eq!(ctx.tail(6), "é útil");
    }

    #[test]
    fn empty_buffer() {
        let ctx = ContextAccumulator::new();
        assert!(ctx.is_empty());
        assert_eq!(ctx.tail(10), "");
    }
}
