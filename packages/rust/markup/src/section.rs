//! Section assembly: wraps rendered fragments in the container markers.

use fairsync_shared::AnchorConfig;

/// Indentation of the container's closing marker.
const CLOSE_INDENT: &str = "                ";

/// Concatenate fragments, in the order given, inside the anchor's container.
///
/// The block begins exactly with `anchor.open` so that splicing it back over
/// its own output reproduces the same bytes. No sorting or filtering happens
/// here; record order is the data source's business.
pub fn assemble<I, S>(fragments: I, anchor: &AnchorConfig) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut block = String::new();
    block.push_str(&anchor.open);
    block.push('\n');

    for fragment in fragments {
        block.push('\n');
        block.push_str(fragment.as_ref());
        block.push('\n');
    }

    block.push_str(CLOSE_INDENT);
    block.push_str(&anchor.close);
    block
}
