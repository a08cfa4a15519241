//! The document being assembled: headings and section text in generation order.

/// Markdown for one numbered section.
pub fn render_section(part: usize, section: usize, title: &str, body: &str) -> String {
    format!("## {part}.{section}. {title}\n\n{body}\n\n")
}

/// Append-only markdown document.
#[derive(Debug, Clone, Default)]
pub struct Document {
    text: String,
}

impl Document {
    /// Start a document with its top-level title.
    pub fn new(title: &str) -> Self {
        Self {
            text: format!("# {title}\n\n"),
        }
    }

    pub fn begin_part(&mut self, part: usize, title: &str) {
        self.text.push_str(&format!("# {part}. {title}\n\n"));
    }

    pub fn push_section(&mut self, part: usize, section: usize, title: &str, body: &str) {
        self.text.push_str(&render_section(part, section, title, body));
    }

    pub fn push_raw(&mut self, text: &str) {
        self.text.push_str(text);
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Byte length; usable as an offset for [`Document::since`].
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Everything appended after `offset` (a previous [`Document::len`]).
    pub fn since(&self, offset: usize) -> &str {
        self.text.get(offset..).unwrap_or("")
    }
}
