//! Append-only Go source accumulator.

/// Ordered statements, each with its block depth relative to the fragment.
/// Emitters build fragments and hand them up; parents splice them in with
/// [`Source::append`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Source {
    lines: Vec<(usize, String)>,
    depth: usize,
}

impl Source {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&mut self, text: impl Into<String>) {
        self.lines.push((self.depth, text.into()));
    }

    /// `header {` and indent.
    pub fn open(&mut self, header: impl AsRef<str>) {
        self.line(format!("{} {{", header.as_ref()));
        self.depth += 1;
    }

    pub fn close(&mut self) {
        debug_assert!(self.depth > 0, "unbalanced close");
        self.depth = self.depth.saturating_sub(1);
        self.line("}");
    }

    /// Splice a finished fragment in at the current depth.
    pub fn append(&mut self, other: Source) {
        debug_assert_eq!(other.depth, 0, "appending an unclosed fragment");
        let base = self.depth;
        self.lines
            .extend(other.lines.into_iter().map(|(depth, text)| (base + depth, text)));
    }

    /// `header { fragment }`, or nothing when the fragment is empty.
    pub fn block(&mut self, header: impl AsRef<str>, body: Source) {
        if body.is_empty() {
            return;
        }
        self.open(header);
        self.append(body);
        self.close();
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Render with gofmt-style tab indentation, starting at `indent` tabs.
    pub fn render(&self, indent: usize) -> String {
        let mut out = String::new();
        for (depth, text) in &self.lines {
            for _ in 0..indent + depth {
                out.push('\t');
            }
            out.push_str(text);
            out.push('\n');
        }
        out
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragments_nest_under_open_blocks() {
        let mut inner = Source::new();
        inner.open("if x");
        inner.line("return y");
        inner.close();

        let mut out = Source::new();
        out.block("for _, x := range xs", inner);
        out.block("if never", Source::new());
        assert_eq!(
            out.render(0),
            "for _, x := range xs {\n\tif x {\n\t\treturn y\n\t}\n}\n"
        );
    }
}
