//! AVX2 scanner path
//!
//! Tests 32 candidate positions per iteration. For window base `i`, the
//! three loads read the haystack shifted by the three anchor offsets;
//! a candidate survives only if all three anchor comparisons set its
//! lane. Survivors are confirmed lowest-bit-first: needles of up to
//! three bytes are fully covered by the anchors, longer needles get a
//! full compare. Positions the vector loop cannot load in-bounds fall
//! through to the scalar anchor check.

use super::Needle;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::{
    __m256i, _mm256_and_si256, _mm256_cmpeq_epi8, _mm256_loadu_si256, _mm256_movemask_epi8,
    _mm256_set1_epi8,
};

const LANES: usize = 32;

/// Caller guarantees `2 <= needle.len() <= haystack.len()`.
///
/// # Safety
///
/// The caller must have verified AVX2 support (`is_x86_feature_detected!`).
#[target_feature(enable = "avx2")]
pub(crate) unsafe fn find(haystack: &[u8], needle: &Needle) -> bool {
    let n = needle.bytes();
    let a = needle.anchors();
    let n_len = n.len();
    let h_len = haystack.len();

    let v_first = _mm256_set1_epi8(n[a.first] as i8);
    let v_mid = _mm256_set1_epi8(n[a.mid] as i8);
    let v_last = _mm256_set1_epi8(n[a.last] as i8);

    let mut i = 0usize;

    // a.last is the largest anchor offset, so it bounds all three loads.
    while i + a.last + LANES <= h_len {
        let h_first = load(haystack, i + a.first);
        let h_mid = load(haystack, i + a.mid);
        let h_last = load(haystack, i + a.last);

        let eq = _mm256_and_si256(
            _mm256_and_si256(
                _mm256_cmpeq_epi8(h_first, v_first),
                _mm256_cmpeq_epi8(h_mid, v_mid),
            ),
            _mm256_cmpeq_epi8(h_last, v_last),
        );

        let mut mask = _mm256_movemask_epi8(eq) as u32;
        while mask != 0 {
            let candidate = i + mask.trailing_zeros() as usize;
            // A pivoted last anchor sits before the needle's end, so the
            // candidate tail can exceed the haystack; reject those lanes.
            if candidate + n_len <= h_len
                && (n_len <= 3 || haystack[candidate..candidate + n_len] == *n)
            {
                return true;
            }
            mask &= mask - 1;
        }

        i += LANES;
    }

    // Scalar tail over the remaining candidate positions
    if i <= h_len - n_len {
        return super::scalar::find(&haystack[i..], needle);
    }

    false
}

#[target_feature(enable = "avx2")]
unsafe fn load(haystack: &[u8], offset: usize) -> __m256i {
    _mm256_loadu_si256(haystack.as_ptr().add(offset) as *const __m256i)
}
