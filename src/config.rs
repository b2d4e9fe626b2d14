/// Switches that change how a [`Scanner`](crate::scanner::Scanner) classifies input.
///
/// The default configuration recognizes punctuation and the comparison
/// operators only.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanConfig {
    line_comments: bool,
}

impl ScanConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip `//` and the rest of its line instead of emitting two `Slash` tokens.
    pub fn line_comments(mut self, enabled: bool) -> Self {
        self.line_comments = enabled;
        self
    }

    pub fn skips_line_comments(&self) -> bool {
        self.line_comments
    }
}
