//! Output trait for rendering reports to different formats.

/// Target output for reports.
///
/// Reports describe *what* to output using these semantic methods.
/// Implementations decide *how* to render (terminal, JSON, HTML, etc).
pub trait Output {
    /// Start a new section with a heading.
    fn section(&mut self, name: &str);

    /// Render a key-value pair.
    fn key_value(&mut self, key: &str, value: &str);

    /// Render an indented key-value pair.
    fn key_value_indented(&mut self, key: &str, value: &str);

    /// Render a bullet list item.
    fn list_item(&mut self, text: &str);

    /// Render a removed item (e.g., pruned artifact).
    fn removed_item(&mut self, text: &str);

    /// Render an error message.
    fn error(&mut self, msg: &str);

    /// Render a warning message.
    fn warning(&mut self, msg: &str);

    /// Render a separator/divider with a label.
    fn divider(&mut self, label: &str);

    /// Render a block of preformatted text.
    fn preformatted(&mut self, text: &str);

    /// Render a blank line.
    fn newline(&mut self);
}

/// A report that can render itself to an output.
pub trait Report {
    /// Render this report to the given output.
    fn render(&self, out: &mut dyn Output);
}

/// Terminal output implementation.
pub struct TerminalOutput;

impl TerminalOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl Output for TerminalOutput {
    fn section(&mut self, name: &str) {
        println!("{}:", name);
    }

    fn key_value(&mut self, key: &str, value: &str) {
        println!("{}: {}", key, value);
    }

    fn key_value_indented(&mut self, key: &str, value: &str) {
        println!("  {}: {}", key, value);
    }

    fn list_item(&mut self, text: &str) {
        println!("  - {}", text);
    }

    fn removed_item(&mut self, text: &str) {
        println!("  - {}", text);
    }

    fn error(&mut self, msg: &str) {
        eprintln!("error: {}", msg);
    }

    fn warning(&mut self, msg: &str) {
        eprintln!("warning: {}", msg);
    }

    fn divider(&mut self, label: &str) {
        println!("── {} ──", label);
    }

    fn preformatted(&mut self, text: &str) {
        println!("{}", text);
    }

    fn newline(&mut self) {
        println!();
    }
}

/// Plain-text output, captured for snapshot tests.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct TextOutput {
    lines: Vec<String>,
}

#[cfg(test)]
impl TextOutput {
    pub fn render(report: &dyn Report) -> String {
        let mut out = Self::default();
        report.render(&mut out);
        out.lines.join("\n")
    }

    fn push(&mut self, line: String) {
        self.lines.push(line);
    }
}

#[cfg(test)]
impl Output for TextOutput {
    fn section(&mut self, name: &str) {
        self.push(format!("{}:", name));
    }

    fn key_value(&mut self, key: &str, value: &str) {
        self.push(format!("{}: {}", key, value));
    }

    fn key_value_indented(&mut self, key: &str, value: &str) {
        self.push(format!("  {}: {}", key, value));
    }

    fn list_item(&mut self, text: &str) {
        self.push(format!("  - {}", text));
    }

    fn removed_item(&mut self, text: &str) {
        self.push(format!("  - {}", text));
    }

    fn error(&mut self, msg: &str) {
        self.push(format!("error: {}", msg));
    }

    fn warning(&mut self, msg: &str) {
        self.push(format!("warning: {}", msg));
    }

    fn divider(&mut self, label: &str) {
        self.push(format!("── {} ──", label));
    }

    fn preformatted(&mut self, text: &str) {
        self.push(text.to_string());
    }

    fn newline(&mut self) {
        self.push(String::new());
    }
}
