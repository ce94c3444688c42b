//! Comment decoration stripping
//!
//! First pipeline stage. Turns a raw `/** ... */` block into plain lines of
//! text; byte offsets reported by later stages point into this output.

/// Characters removed from the start of every line
const DECORATION: &[char] = &['/', '*', ' '];

/// Strip `/**`, `*` and leading spaces from each line of a raw comment block.
///
/// Lines that reduce to nothing are omitted rather than kept as blank lines.
/// Everything after the leading run is kept verbatim.
pub fn normalize(raw: &str) -> String {
    raw.split('\n')
        .map(|line| line.trim_start_matches(DECORATION))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
