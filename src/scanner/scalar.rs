//! Scalar scanner path
//!
//! Drives the search with a `memchr` sweep over the first anchor byte,
//! then rejects candidates on the remaining anchors before the full
//! compare. Bit-exact with the vector path; also used as its tail.

use super::Needle;

/// Caller guarantees `2 <= needle.len() <= haystack.len()`.
pub(crate) fn find(haystack: &[u8], needle: &Needle) -> bool {
    let n = needle.bytes();
    let a = needle.anchors();
    let n_len = n.len();
    let max_start = haystack.len() - n_len;

    // Candidate start i corresponds to index i in this window: the
    // first-anchor byte of a match at i sits at haystack[i + a.first].
    let window = &haystack[a.first..=max_start + a.first];

    for start in memchr::memchr_iter(n[a.first], window) {
        if haystack[start + a.mid] == n[a.mid]
            && haystack[start + a.last] == n[a.last]
            && haystack[start..start + n_len] == *n
        {
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::Needle;

    #[test]
    fn test_scalar_basic() {
        let needle = Needle::new(b"world");
        assert!(find(b"hello world", &needle));
        assert!(!find(b"hello earth", &needle));
    }

    #[test]
    fn test_scalar_match_at_end() {
        let needle = Needle::new(b"xy");
        assert!(find(b"aaaaxy", &needle));
        assert!(!find(b"aaaayx", &needle));
    }

    #[test]
    fn test_scalar_anchor_rejection() {
        // First anchor hits repeatedly, later anchors must reject
        let needle = Needle::new(b"aaab");
        assert!(!find(b"aaacaaacaaac", &needle));
        assert!(find(b"aaacaaab", &needle));
    }
}
