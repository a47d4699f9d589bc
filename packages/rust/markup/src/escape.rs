//! Field insertion policy.

use std::borrow::Cow;

/// Escape the five HTML-significant characters.
pub fn escape_html(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(value);
    }

    let mut out = String::with_capacity(value.len() + 16);
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Prepare a record field for insertion: verbatim, or escaped when `escape` is set.
pub(crate) fn field(value: &str, escape: bool) -> Cow<'_, str> {
    if escape {
        escape_html(value)
    } else {
        Cow::Borrowed(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_borrowed() {
        assert!(matches!(escape_html("Summer Fair 2024"), Cow::Borrowed(_)));
    }

    #[test]
    fn special_characters_are_escaped() {
        assert_eq!(
            escape_html(r#"Arts & Crafts <b>"live"</b> 'n' more"#),
            "Arts &amp; Crafts &lt;b&gt;&quot;live&quot;&lt;/b&gt; &#39;n&#39; more"
        );
    }

    #[test]
    fn verbatim_by_default() {
        assert_eq!(field("<em>Now</em>", false), "<em>Now</em>");
        assert_eq!(field("<em>Now</em>", true), "&lt;em&gt;Now&lt;/em&gt;");
    }
}
