//! Partial-document rewriting.
//!
//! The listing container is located by its markers and replaced wholesale;
//! every byte outside the matched span is carried over untouched.

use std::ops::Range;

use regex::Regex;
use tracing::debug;

use fairsync_shared::{AnchorConfig, FairSyncError, Result};

/// Result of one splice attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Splice {
    /// The new document text (the original when nothing was replaced).
    pub text: String,
    /// Whether `text` differs from the input document.
    pub changed: bool,
    /// How many anchor spans were found. Only exactly one is replaced.
    pub matches: usize,
}

impl Splice {
    fn untouched(document: &str, matches: usize) -> Self {
        Self {
            text: document.to_string(),
            changed: false,
            matches,
        }
    }

    pub fn anchor_found(&self) -> bool {
        self.matches == 1
    }
}

/// Replaces the listing container in a document with a new block.
pub trait Splicer {
    fn splice(&self, document: &str, block: &str) -> Splice;
}

/// Locates the container by its textual markers.
///
/// The span starts at `anchor.open` and ends at the first `anchor.close` that
/// is followed, whitespace aside, by the `anchor.trailing` markers. The
/// shortest such span wins, so unrelated containers elsewhere are left alone.
/// The trailing context is matched but never replaced.
#[derive(Debug, Clone)]
pub struct MarkerSplicer {
    pattern: Regex,
}

impl MarkerSplicer {
    pub fn new(anchor: &AnchorConfig) -> Result<Self> {
        // Without trailing context the lazy match ends at the first inner close,
        // so reruns would keep matching inside the freshly spliced block.
        if anchor.trailing.iter().all(|marker| marker.trim().is_empty()) {
            return Err(FairSyncError::validation(
                "anchor needs at least one non-blank trailing marker",
            ));
        }

        let trailing: String = anchor
            .trailing
            .iter()
            .map(|marker| format!(r"\s*{}", regex::escape(marker)))
            .collect();
        let source = format!(
            r"(?s)({}.*?{}){trailing}",
            regex::escape(&anchor.open),
            regex::escape(&anchor.close),
        );

        let pattern = Regex::new(&source)
            .map_err(|e| FairSyncError::config(format!("invalid anchor pattern: {e}")))?;
        Ok(Self { pattern })
    }

    fn spans(&self, document: &str) -> Vec<Range<usize>> {
        self.pattern
            .captures_iter(document)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.range())
            .collect()
    }
}

impl Splicer for MarkerSplicer {
    fn splice(&self, document: &str, block: &str) -> Splice {
        let spans = self.spans(document);
        let [span] = spans.as_slice() else {
            debug!(matches = spans.len(), "anchor did not match exactly once");
            return Splice::untouched(document, spans.len());
        };

        let mut text = String::with_capacity(document.len() - span.len() + block.len());
        text.push_str(&document[..span.start]);
        text.push_str(block);
        text.push_str(&document[span.end..]);

        let changed = text != document;
        debug!(start = span.start, end = span.end, changed, "anchor span replaced");
        Splice {
            text,
            changed,
            matches: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
<body>
    <section class="upcoming">
        <div class="container">
            <div class="fair-card"><p>Next fair soon</p></div>
        </div>
    </section>
    <section class="past-fairs">
        <div class="container">
            <h2>Past Fair Highlights</h2>
                <div class="fairs-grid">
                    <div class="fair-item"><h3>Old</h3></div>
                </div>
        </div>
    </section>
    <footer><div>Footer</div></footer>
</body>
</html>
"#;

    fn splicer() -> MarkerSplicer {
        MarkerSplicer::new(&AnchorConfig::default()).unwrap()
    }

    const BLOCK: &str = "<div class=\"fairs-grid\">\n<p>new</p>\n                </div>";

    #[test]
    fn replaces_only_the_anchor_span() {
        let out = splicer().splice(PAGE, BLOCK);

        assert!(out.changed);
        assert_eq!(out.matches, 1);
        assert!(out.text.contains("<p>new</p>"));
        assert!(!out.text.contains("<h3>Old</h3>"));

        let start = PAGE.find("<div class=\"fairs-grid\">").unwrap();
        let old_end = PAGE.find("<h3>Old</h3></div>\n                </div>").unwrap()
            + "<h3>Old</h3></div>\n                </div>".len();
        assert_eq!(&out.text[..start], &PAGE[..start]);
        assert_eq!(
            &out.text[start + BLOCK.len()..],
            &PAGE[old_end..],
            "bytes after the span must be preserved"
        );
    }

    #[test]
    fn unrelated_containers_are_not_matched() {
        let out = splicer().splice(PAGE, BLOCK);
        assert!(out.text.contains(r#"<div class="fair-card"><p>Next fair soon</p></div>"#));
        assert!(out.text.contains("<footer><div>Footer</div></footer>"));
    }

    #[test]
    fn splice_is_idempotent() {
        let first = splicer().splice(PAGE, BLOCK);
        let second = splicer().splice(&first.text, BLOCK);

        assert_eq!(second.matches, 1);
        assert!(!second.changed);
        assert_eq!(second.text, first.text);
    }

    #[test]
    fn missing_anchor_leaves_document_unchanged() {
        let doc = "<html><body><section><div>No grid here</div></section></body></html>";
        let out = splicer().splice(doc, BLOCK);

        assert_eq!(out.matches, 0);
        assert!(!out.changed);
        assert!(!out.anchor_found());
        assert_eq!(out.text, doc);
    }

    #[test]
    fn marker_without_trailing_context_is_not_an_anchor() {
        let doc = r#"<div class="fairs-grid"><p>x</p></div><p>loose</p>"#;
        let out = splicer().splice(doc, BLOCK);
        assert_eq!(out.matches, 0);
        assert_eq!(out.text, doc);
    }

    #[test]
    fn ambiguous_anchor_is_not_replaced() {
        let section = "<section><div><div class=\"fairs-grid\"></div></div></section>\n";
        let doc = format!("{section}{section}");
        let out = splicer().splice(&doc, BLOCK);

        assert_eq!(out.matches, 2);
        assert!(!out.changed);
        assert_eq!(out.text, doc);
    }

    #[test]
    fn nested_divs_inside_grid_are_consumed() {
        // Lazy matching must skip inner closers that lack the trailing context.
        let doc = "<section><div class=\"container\"><div class=\"fairs-grid\">\
                   <div><div>a</div></div>\n</div>\n</div>\n</section>";
        let out = splicer().splice(doc, "<div class=\"fairs-grid\">B</div>");
        assert_eq!(
            out.text,
            "<section><div class=\"container\"><div class=\"fairs-grid\">B</div>\n</div>\n</section>"
        );
    }

    #[test]
    fn anchor_without_trailing_markers_is_rejected() {
        let mut anchor = AnchorConfig::default();
        anchor.trailing.clear();
        let err = MarkerSplicer::new(&anchor).unwrap_err();
        assert!(matches!(err, FairSyncError::Validation { .. }));

        anchor.trailing = vec![" ".into()];
        assert!(MarkerSplicer::new(&anchor).is_err());
    }

    #[test]
    fn regex_metacharacters_in_markers_are_literal() {
        let anchor = AnchorConfig {
            open: "<ul class=\"a.b\">".into(),
            close: "</ul>".into(),
            trailing: vec!["</nav>".into()],
        };
        let splicer = MarkerSplicer::new(&anchor).unwrap();

        let doc = "<nav><ul class=\"aXb\"></ul></nav>";
        assert_eq!(splicer.splice(doc, "<ul class=\"a.b\"></ul>").matches, 0);

        let doc = "<nav><ul class=\"a.b\"><li>1</li></ul> </nav>";
        let out = splicer.splice(doc, "<ul class=\"a.b\"><li>2</li></ul>");
        assert_eq!(out.text, "<nav><ul class=\"a.b\"><li>2</li></ul> </nav>");
    }
}
