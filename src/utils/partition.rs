use std::ops::Range;

/// Split `0..len` into `parts` contiguous ranges whose sizes differ by at most one.
/// The first `len % parts` ranges get the extra element; ranges may be empty
/// when `parts > len`.
pub fn split_even(len: usize, parts: usize) -> Vec<Range<usize>> {
    debug_assert!(parts > 0, "parts must be positive");
    let parts = parts.max(1);
    let base = len / parts;
    let extra = len % parts;
    let mut ranges = Vec::with_capacity(parts);
    let mut start = 0;
    for i in 0..parts {
        let size = base + usize::from(i < extra);
        ranges.push(start..start + size);
        start += size;
    }
    debug_assert_eq!(start, len);
    ranges
}

/// Iterate `0..len` in consecutive blocks of `block_size` (last one may be shorter)
pub fn blocks(len: usize, block_size: usize) -> impl Iterator<Item = Range<usize>> {
    let block_size = block_size.max(1);
    (0..len)
        .step_by(block_size)
        .map(move |start| start..(start + block_size).min(len))
}
