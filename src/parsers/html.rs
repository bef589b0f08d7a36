use crate::results::{ExtractedContent, NO_TITLE};
use scraper::{ElementRef, Html, Selector};

/// Elements whose whole subtree is dropped from the body text
pub const EXCLUDED_TAGS: &[&str] = &[
    "script", "style", "img", "input", "head", "title", "meta", "html",
];

/// Parses an HTML document into its title and body text
pub fn extract(html: &str) -> ExtractedContent {
    let doc = Html::parse_document(html);

    // html5ever synthesizes a <body> for any document, so stray content in
    // markup without one would otherwise be reported as body text.
    let text = if declares_body(html) {
        extract_body_text(&doc)
    } else {
        String::new()
    };

    ExtractedContent {
        title: extract_title(&doc),
        text,
    }
}

/// Text of the first `<title>` element, or [`NO_TITLE`] when absent or blank
pub fn extract_title(doc: &Html) -> String {
    let title_selector = Selector::parse("title").expect("static selector");

    doc.select(&title_selector)
        .next()
        .map(|title| title.text().collect::<String>().trim().to_string())
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| NO_TITLE.to_string())
}

/// Whether the source contains a `<body>` start tag, in any case, with or without attributes
pub fn declares_body(html: &str) -> bool {
    const TAG: &[u8] = b"<body";

    html.as_bytes().windows(TAG.len() + 1).any(|window| {
        window[..TAG.len()].eq_ignore_ascii_case(TAG)
            && matches!(
                window[TAG.len()],
                b'>' | b'/' | b' ' | b'\t' | b'\n' | b'\r' | b'\x0c'
            )
    })
}

/// Body text nodes outside excluded elements, trimmed and joined by newlines
pub fn extract_body_text(doc: &Html) -> String {
    let body_selector = Selector::parse("body").expect("static selector");

    let mut lines = Vec::new();
    if let Some(body) = doc.select(&body_selector).next() {
        collect_text(body, &mut lines);
    }
    lines.join("\n")
}

fn collect_text(element: ElementRef<'_>, lines: &mut Vec<String>) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                lines.push(trimmed.to_string());
            }
        } else if let Some(child_element) = ElementRef::wrap(child) {
            if !EXCLUDED_TAGS.contains(&child_element.value().name()) {
                collect_text(child_element, lines);
            }
        }
    }
}
