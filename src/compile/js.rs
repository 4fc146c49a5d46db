//! JavaScript source emission helpers

use serde_json::Value;

/// A JS string literal for arbitrary text.
///
/// JSON string syntax is a subset of JS string syntax, so quoting through
/// serde_json escapes quotes, backslashes and control characters.
pub fn str_lit(text: &str) -> String {
    Value::String(text.to_string()).to_string()
}

/// A JS expression for a JSON value
pub fn value_lit(value: &Value) -> String {
    value.to_string()
}

/// A JS array literal of status codes
pub fn status_list(codes: &[u16]) -> String {
    let items: Vec<String> = codes.iter().map(u16::to_string).collect();
    format!("[{}]", items.join(", "))
}

/// Line-oriented source builder with two-space indentation
#[derive(Default)]
pub struct SourceWriter {
    out: String,
    depth: usize,
}

impl SourceWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&mut self, text: &str) -> &mut Self {
        if !text.is_empty() {
            for _ in 0..self.depth {
                self.out.push_str("  ");
            }
            self.out.push_str(text);
        }
        self.out.push('\n');
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.out.push('\n');
        self
    }

    pub fn open(&mut self, text: &str) -> &mut Self {
        self.line(text);
        self.depth += 1;
        self
    }

    pub fn close(&mut self, text: &str) -> &mut Self {
        self.depth = self.depth.saturating_sub(1);
        self.line(text)
    }

    pub fn finish(self) -> String {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_str_lit_escapes() {
        assert_eq!(str_lit(r#"a"b\c"#), r#""a\"b\\c""#);
        assert_eq!(str_lit("line\nnext"), r#""line\nnext""#);
        assert_eq!(str_lit("button:has-text('Go')"), r#""button:has-text('Go')""#);
    }

    #[test]
    fn test_writer_indents_blocks() {
        let mut w = SourceWriter::new();
        w.open("a {").line("b;").close("}");
        assert_eq!(w.finish(), "a {\n  b;\n}\n");
    }
}
