//! Fixed-needle substring scanner
//!
//! Searches a byte haystack for one occurrence of a fixed byte needle.
//! The needle is compiled once (anchor selection, CPU feature probe)
//! and shared read-only by every worker.
//!
//! # Algorithm
//!
//! Three anchor positions are chosen within the needle - first, middle,
//! last - pivoted so their byte values are mutually distinct whenever
//! the needle permits. The vector path broadcasts the three anchor
//! bytes and compares them against the haystack shifted by the three
//! offsets, one SIMD window at a time; a candidate position survives
//! only if all three anchors match, which makes the full byte-compare
//! verification rare on real inputs. Repeated characters and biased
//! alphabets (UTF-8 continuation bytes, padded logs) are exactly the
//! inputs where naive first-byte filtering collapses, hence the pivot
//! toward distinct anchor bytes.
//!
//! Three vector tiers share one structure and differ only in window
//! width and mask extraction: AVX2 (32 lanes, runtime-detected), SSE2
//! (16 lanes, x86_64 baseline), and NEON (16 lanes, aarch64 baseline).
//! The scalar path implements the identical contract and serves both as
//! the portable implementation and the tail handler for every vector
//! tier.

mod scalar;

#[cfg(target_arch = "x86_64")]
mod avx2;

#[cfg(target_arch = "aarch64")]
mod neon;

#[cfg(target_arch = "x86_64")]
mod sse2;

/// Anchor offsets within the needle used as the primary match filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Anchors {
    pub first: usize,
    pub mid: usize,
    pub last: usize,
}

impl Anchors {
    /// Pick anchor offsets for `pattern`.
    ///
    /// Starts from {0, len/2, len-1}. If the needle is longer than three
    /// bytes and any two anchor bytes collide, the middle offset pivots
    /// right until its byte differs from the first, then the last offset
    /// pivots left until its byte differs from both. Bounds preserve
    /// `first <= mid < last` for pivoted needles, so every anchor load
    /// stays within the needle.
    fn select(pattern: &[u8]) -> Self {
        let len = pattern.len();
        if len == 0 {
            return Self {
                first: 0,
                mid: 0,
                last: 0,
            };
        }

        let first = 0;
        let mut mid = len / 2;
        let mut last = len - 1;

        let has_duplicates = pattern[first] == pattern[mid]
            || pattern[first] == pattern[last]
            || pattern[mid] == pattern[last];

        if len > 3 && has_duplicates {
            while pattern[mid] == pattern[first] && mid + 1 < last {
                mid += 1;
            }
            while (pattern[last] == pattern[mid] || pattern[last] == pattern[first])
                && last > mid + 1
            {
                last -= 1;
            }
        }

        Self { first, mid, last }
    }
}

/// A compiled search needle, immutable after construction.
#[derive(Debug)]
pub struct Needle {
    bytes: Box<[u8]>,
    anchors: Anchors,
    #[cfg(target_arch = "x86_64")]
    use_avx2: bool,
}

impl Needle {
    /// Compile a needle from raw pattern bytes
    pub fn new(pattern: &[u8]) -> Self {
        Self {
            bytes: pattern.into(),
            anchors: Anchors::select(pattern),
            #[cfg(target_arch = "x86_64")]
            use_avx2: is_x86_feature_detected!("avx2"),
        }
    }

    /// The pattern bytes
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Pattern length in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub(crate) fn anchors(&self) -> Anchors {
        self.anchors
    }

    /// Returns true iff the needle occurs as a contiguous byte
    /// subsequence of `haystack`.
    ///
    /// Correct for arbitrary byte content including NULs. An empty
    /// needle matches trivially; a needle longer than the haystack
    /// never matches.
    pub fn find(&self, haystack: &[u8]) -> bool {
        let n_len = self.bytes.len();
        if n_len == 0 {
            return true;
        }
        if n_len > haystack.len() {
            return false;
        }
        if n_len == 1 {
            return memchr::memchr(self.bytes[0], haystack).is_some();
        }

        #[cfg(target_arch = "x86_64")]
        {
            if self.use_avx2 {
                // Safety: feature presence checked at construction.
                return unsafe { avx2::find(haystack, self) };
            }
            // SSE2 is part of the x86_64 baseline.
            return unsafe { sse2::find(haystack, self) };
        }

        #[cfg(target_arch = "aarch64")]
        // Safety: NEON is part of the aarch64 baseline.
        return unsafe { neon::find(haystack, self) };

        #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
        scalar::find(haystack, self)
    }
}
