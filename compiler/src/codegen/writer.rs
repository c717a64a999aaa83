//! Indent-aware string builder for Nextflow code generation.
//!
//! Generated scripts use 4-space indentation.

const INDENT: &str = "    ";

/// Indent-aware string builder that produces formatted Nextflow source.
pub struct CodeWriter {
    buf: String,
    indent_level: usize,
}

impl CodeWriter {
    pub fn new() -> Self {
        Self {
            buf: String::with_capacity(4096),
            indent_level: 0,
        }
    }

    /// Write a complete line (appends newline).
    pub fn line(&mut self, text: &str) {
        for _ in 0..self.indent_level {
            self.buf.push_str(INDENT);
        }
        self.buf.push_str(text);
        self.buf.push('\n');
    }

    /// Write an empty line. Never indented, so output has no trailing spaces.
    pub fn blank(&mut self) {
        self.buf.push('\n');
    }

    /// Write a `// ` comment at the current indent.
    pub fn comment(&mut self, text: &str) {
        self.line(&format!("// {text}"));
    }

    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn dedent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    /// Write `text {` and increase indent (e.g. `process fastqc_1 {`).
    pub fn block_open(&mut self, text: &str) {
        self.line(&format!("{} {{", text));
        self.indent();
    }

    /// Decrease indent and write `}`.
    pub fn block_close(&mut self) {
        self.dedent();
        self.line("}");
    }

    /// Consume the writer and return the generated string.
    pub fn finish(self) -> String {
        self.buf
    }
}

impl Default for CodeWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_line() {
        let mut w = CodeWriter::new();
        w.line("params.fastq = null");
        assert_eq!(w.finish(), "params.fastq = null\n");
    }

    #[test]
    fn block_open_close() {
        let mut w = CodeWriter::new();
        w.block_open("process a_1");
        w.line("script:");
        w.block_close();
        assert_eq!(w.finish(), "process a_1 {\n    script:\n}\n");
    }

    #[test]
    fn nested_indent() {
        let mut w = CodeWriter::new();
        w.block_open("workflow outer");
        w.block_open("if (true)");
        w.line("inner()");
        w.block_close();
        w.block_close();
        assert_eq!(
            w.finish(),
            "workflow outer {\n    if (true) {\n        inner()\n    }\n}\n"
        );
    }

    #[test]
    fn blank_line_inside_block_has_no_indent() {
        let mut w = CodeWriter::new();
        w.block_open("process a_1");
        w.line("a");
        w.blank();
        w.line("b");
        w.block_close();
        assert_eq!(w.finish(), "process a_1 {\n    a\n\n    b\n}\n");
    }

    #[test]
    fn comment_line() {
        let mut w = CodeWriter::new();
        w.indent();
        w.comment("fork");
        assert_eq!(w.finish(), "    // fork\n");
    }

    #[test]
    fn dedent_saturates_at_zero() {
        let mut w = CodeWriter::new();
        w.dedent();
        w.line("x");
        assert_eq!(w.finish(), "x\n");
    }
}
