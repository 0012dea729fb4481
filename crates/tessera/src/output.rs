//! Colored terminal output.

use std::path::Path;

use console::{Style, Term};

/// Terminal output formatter (writes to stderr).
pub(crate) struct Output {
    term: Term,
    green: Style,
    yellow: Style,
    red: Style,
    dim: Style,
    cyan_bold: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
            dim: Style::new().dim(),
            cyan_bold: Style::new().cyan().bold(),
        }
    }

    fn line(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }

    /// Plain message.
    pub(crate) fn info(&self, msg: &str) {
        self.line(msg);
    }

    /// Green message.
    pub(crate) fn success(&self, msg: &str) {
        self.line(&self.green.apply_to(msg).to_string());
    }

    /// Yellow message.
    pub(crate) fn warning(&self, msg: &str) {
        self.line(&self.yellow.apply_to(msg).to_string());
    }

    /// Red message.
    pub(crate) fn error(&self, msg: &str) {
        self.line(&self.red.apply_to(msg).to_string());
    }

    /// One collected page: key in bold cyan, counts dimmed.
    pub(crate) fn page(&self, key: &str, sections: usize) {
        let noun = if sections == 1 { "section" } else { "sections" };
        self.line(&format!(
            "Processed page: {} {}",
            self.cyan_bold.apply_to(key),
            self.dim.apply_to(format!("({sections} {noun})"))
        ));
    }

    /// A labelled path, e.g. the artifact location.
    pub(crate) fn path(&self, label: &str, path: &Path) {
        self.line(&format!("{label}: {}", self.dim.apply_to(path.display())));
    }
}
