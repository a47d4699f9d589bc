//! HTML generation for the past-events listing.
//!
//! - [`render`] — one record + its assets → a `fair-item` fragment
//! - [`assemble`] — ordered fragments → the container block
//! - [`description::paragraphs`] — long-description splitting

pub mod description;
pub mod escape;
pub mod render;
pub mod section;

pub use escape::escape_html;
pub use render::{RenderOptions, render};
pub use section::assemble;

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::LazyLock;

    use regex::Regex;

    const VOID: &[&str] = &["br", "hr", "img", "input", "link", "meta"];

    /// Panic unless every opened non-void element is closed in order.
    pub(crate) fn assert_balanced(html: &str) {
        static COMMENT_RE: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"));
        static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"<(/?)([a-zA-Z][a-zA-Z0-9-]*)[^>]*>").expect("valid regex")
        });

        let stripped = COMMENT_RE.replace_all(html, "");
        let mut stack: Vec<String> = Vec::new();

        for caps in TAG_RE.captures_iter(&stripped) {
            let name = caps[2].to_ascii_lowercase();
            if VOID.contains(&name.as_str()) {
                continue;
            }
            if &caps[1] == "/" {
                let open = stack.pop();
                assert_eq!(
                    open.as_deref(),
                    Some(name.as_str()),
                    "unbalanced </{name}> in:\n{html}"
                );
            } else {
                stack.push(name);
            }
        }

        assert!(stack.is_empty(), "unclosed elements {stack:?} in:\n{html}");
    }
}
