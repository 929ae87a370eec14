//! Normalized search hits and text flattening.
//!
//! ```rust
//! use rsearch::{SearchHit, flatten_hits};
//!
//! let hits = vec![SearchHit::new("Rust", "A language", "https://rust-lang.org")];
//! assert_eq!(
//!     flatten_hits(&hits, 5).as_deref(),
//!     Some("Rust: A language (https://rust-lang.org)")
//! );
//! assert_eq!(flatten_hits(&[], 5), None);
//! ```

pub const MAX_RESULT_LINES: usize = 5;
pub const MAX_TEXT_CHARS: usize = 300;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchHit {
    pub title: String,
    pub text: String,
    pub url: String,
}

impl SearchHit {
    pub fn new(title: impl Into<String>, text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            url: url.into(),
        }
    }

    /// One line: `title: text (url)`, dropping whichever parts are blank.
    pub fn to_line(&self) -> Option<String> {
        let title = collapse_whitespace(&self.title);
        let text = collapse_whitespace(&self.text)
            .chars()
            .take(MAX_TEXT_CHARS)
            .collect::<String>();
        let url = self.url.trim();

        let mut line = match (title.is_empty(), text.is_empty()) {
            (true, true) => return None,
            (false, true) => title,
            (true, false) => text,
            (false, false) => format!("{title}: {text}"),
        };
        if !url.is_empty() {
            line.push_str(&format!(" ({url})"));
        }
        Some(line)
    }
}

fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Newline-joined lines for at most `limit` non-blank hits; `None` when nothing remains.
pub fn flatten_hits(hits: &[SearchHit], limit: usize) -> Option<String> {
    let lines = hits
        .iter()
        .filter_map(SearchHit::to_line)
        .take(limit)
        .collect::<Vec<_>>();

    (!lines.is_empty()).then(|| lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_drop_blank_parts() {
        assert_eq!(
            SearchHit::new("", "just text", "https://a.test").to_line().as_deref(),
            Some("just text (https://a.test)")
        );
        assert_eq!(
            SearchHit::new("Title", "  ", "").to_line().as_deref(),
            Some("Title")
        );
        assert_eq!(SearchHit::new(" ", "", "https://a.test").to_line(), None);
    }

    #[test]
    fn text_is_single_line_and_bounded() {
        let long = "word ".repeat(200);
        let line = SearchHit::new("T", format!("line one\nline two {long}"), "")
            .to_line()
            .expect("line");

        assert!(!line.contains('\n'));
        assert!(line.starts_with("T: line one line two"));
        assert!(line.chars().count() <= "T: ".len() + MAX_TEXT_CHARS);
    }

    #[test]
    fn flatten_caps_line_count_and_skips_blank_hits() {
        let mut hits = vec![SearchHit::default()];
        hits.extend((0..8).map(|index| SearchHit::new(format!("t{index}"), "x", "")));

        let flattened = flatten_hits(&hits, MAX_RESULT_LINES).expect("non-empty");
        assert_eq!(flattened.lines().count(), 5);
        assert!(flattened.starts_with("t0: x"));
    }
}
