use crate::error::Error;
use std::borrow::Cow;
use std::fmt;

/// Title used when a document has no `<title>` element
pub const NO_TITLE: &str = "No title found";

/// Raw markup retrieved for one URL
#[derive(Debug, Clone)]
pub struct Page {
    /// URL the content was fetched from
    pub url: String,

    /// Document source; fetchers store it as UTF-8
    pub content: Vec<u8>,
}

impl Page {
    /// Create a new page instance
    pub fn new(url: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            url: url.into(),
            content: content.into(),
        }
    }

    /// Content decoded as UTF-8, replacing invalid sequences
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }
}

/// Readable content recovered from a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedContent {
    /// Document title, or [`NO_TITLE`]
    pub title: String,

    /// Body text, one trimmed text node per line
    pub text: String,
}

/// Markdown summary of one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// Title of the summarized page
    pub title: String,

    /// Markdown returned by the model
    pub markdown: String,
}

/// Outcome of one target's pipeline, tagged with its position in the input
#[derive(Debug)]
pub struct SummaryResult {
    /// Position of the target in the submitted list
    pub index: usize,

    /// URL as the user supplied it
    pub url: String,

    pub outcome: Result<Summary, Error>,
}

impl SummaryResult {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Separator printed around every summary block
pub fn separator() -> String {
    format!("\n{}\n", "-".repeat(80))
}

/// Full console report: a leading separator, then each block followed by a separator
pub fn render_report(results: &[SummaryResult]) -> String {
    let mut report = format!("{}\n", separator());
    for result in results {
        report.push_str(&format!("{}\n{}\n", result, separator()));
    }
    report
}

impl fmt::Display for SummaryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Ok(summary) => writeln!(f, "Summary for {}:\n{}", self.url, summary.markdown),
            Err(e) => writeln!(f, "Summary for {} failed: {}", self.url, e),
        }
    }
}
