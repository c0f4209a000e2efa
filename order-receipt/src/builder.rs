//! Receipt byte builder
//!
//! Provides a fluent API for building receipt documents.

/// Container header written before any content
const DOCUMENT_HEADER: &[u8] = b"%PDF-1.4\n% Comprovante simulado gerado localmente\n";

/// Receipt document builder
///
/// Lines are separated by `\n`; no newline follows the last line.
pub struct ReceiptBuilder {
    buf: Vec<u8>,
    lines: usize,
}

impl ReceiptBuilder {
    /// Create a new builder with the container header already written
    pub fn new() -> Self {
        let mut buf = Vec::with_capacity(512);
        buf.extend_from_slice(DOCUMENT_HEADER);
        Self { buf, lines: 0 }
    }

    /// Write a line of text
    pub fn line(&mut self, s: &str) -> &mut Self {
        if self.lines > 0 {
            self.buf.push(b'\n');
        }
        self.buf.extend_from_slice(s.as_bytes());
        self.lines += 1;
        self
    }

    /// Write a `label: value` line
    pub fn field(&mut self, label: &str, value: &str) -> &mut Self {
        self.line(&format!("{label}: {value}"))
    }

    /// Write an empty line
    pub fn blank(&mut self) -> &mut Self {
        self.line("")
    }

    /// Finish and return the document bytes
    pub fn build(self) -> Vec<u8> {
        self.buf
    }
}

impl Default for ReceiptBuilder {
    fn default() -> Self {
        Self::new()
    }
}
