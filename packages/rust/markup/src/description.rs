//! Description → paragraph formatting.
//!
//! Short descriptions stay a single paragraph. Long ones are split on
//! sentence boundaries into exactly two paragraphs, each ending in a period.

/// Sentence boundary used when splitting long descriptions.
pub const SENTENCE_DELIMITER: &str = ". ";

/// Split a description into one or two paragraphs of plain text.
///
/// The input is trimmed first. Below `threshold` characters the result is the
/// trimmed text alone. Otherwise the sentence list is divided at its midpoint,
/// the first half taking the extra sentence on odd counts.
pub fn paragraphs(description: &str, threshold: usize) -> Vec<String> {
    let text = description.trim();
    if text.chars().count() < threshold {
        return vec![text.to_string()];
    }

    let sentences: Vec<&str> = text.split(SENTENCE_DELIMITER).collect();
    let (first, second) = if sentences.len() >= 2 {
        let mid = sentences.len().div_ceil(2);
        (
            sentences[..mid].join(SENTENCE_DELIMITER),
            sentences[mid..].join(SENTENCE_DELIMITER),
        )
    } else {
        split_at_midpoint(text)
    };

    vec![terminate(first), terminate(second)]
}

/// Split delimiter-free text at the whitespace closest to its middle.
///
/// `text` must already be trimmed, so any interior whitespace has content on
/// both sides. Text without whitespace is cut at the middle character.
fn split_at_midpoint(text: &str) -> (String, String) {
    let char_count = text.chars().count();
    let mid = (char_count / 2).max(1);

    let nearest_space = text
        .char_indices()
        .enumerate()
        .filter(|(_, (_, c))| c.is_whitespace())
        .min_by_key(|(i, _)| i.abs_diff(mid))
        .map(|(_, (byte, _))| byte);

    match nearest_space {
        Some(byte) => (
            text[..byte].trim_end().to_string(),
            text[byte..].trim_start().to_string(),
        ),
        None => {
            let byte = text
                .char_indices()
                .nth(mid)
                .map_or(text.len(), |(byte, _)| byte);
            (text[..byte].to_string(), text[byte..].to_string())
        }
    }
}

fn terminate(mut paragraph: String) -> String {
    if !paragraph.ends_with('.') {
        paragraph.push('.');
    }
    paragraph
}
