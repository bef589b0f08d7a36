pub mod html;


use crate::results::{ExtractedContent, Page};

/// Extracts the title and readable body text from a fetched page
///
/// Pure and infallible: malformed markup, a missing `<title>` or a missing
/// `<body>` degrade to the title sentinel and empty text.
pub fn extract(page: &Page) -> ExtractedContent {
    let content = html::extract(&page.text());

    ::log::debug!(
        "Extracted {} bytes of text from {} (title: {:?})",
        content.text.len(),
        page.url,
        content.title
    );

    content
}
