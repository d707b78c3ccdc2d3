//! Body segmentation — splits text into chunks that fit a septet budget.

use crate::gsm::char_weight;

/// Split `text` into ordered chunks whose weighted length is at most
/// `capacity` septets.
///
/// A character is never divided: if its full weight does not fit in the
/// current chunk it starts the next one. Chunks are only closed when the
/// next character would overflow, so the chunk count is minimal.
///
/// A character heavier than `capacity` occupies a chunk on its own.
/// Empty input yields no chunks.
pub fn chunk(text: &str, capacity: usize) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut used = 0;

    for (idx, c) in text.char_indices() {
        let weight = char_weight(c);
        if idx > start && used + weight > capacity {
            chunks.push(&text[start..idx]);
            start = idx;
            used = 0;
        }
        used += weight;
    }

    if start < text.len() {
        chunks.push(&text[start..]);
    }

    chunks
}
