//! Plain-text helpers for rendered HTML fields.

use scraper::Html;
use unicode_segmentation::UnicodeSegmentation;

/// Trailing "read more" marker WordPress appends to generated excerpts.
const EXCERPT_MORE: &str = "[…]";

/// Strip tags from an HTML fragment, decode entities and collapse whitespace.
pub fn strip_html(html: &str) -> String {
    if !html.contains('<') && !html.contains('&') {
        return collapse_whitespace(html);
    }
    let fragment = Html::parse_fragment(html);
    let text: String = fragment.root_element().text().collect();
    collapse_whitespace(&text)
}

/// Plain-text excerpt with the trailing `[…]` marker removed.
pub fn excerpt_text(html: &str) -> String {
    let text = strip_html(html);
    text.trim_end_matches(EXCERPT_MORE).trim_end().to_string()
}

pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate to at most `max` user-perceived characters, appending `…` when cut.
pub fn truncate(text: &str, max: usize) -> String {
    let graphemes: Vec<&str> = text.graphemes(true).collect();
    if graphemes.len() <= max {
        return text.to_string();
    }
    let cut: String = graphemes[..max].concat();
    format!("{}…", cut.trim_end())
}
