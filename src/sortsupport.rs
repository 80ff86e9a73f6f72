//! Abbreviated-key sort support.
//!
//! A sort that supports abbreviation converts every value to a machine-word key up front and
//! compares keys with plain integer comparison, consulting the full comparator only on ties.
//! That pays off only when leading bytes are diverse, so [`UuidSortSupport`] tracks the
//! cardinality of the keys it hands out and tells the sort to give up on abbreviation when the
//! keys turn out to be too repetitive.

use std::{cmp::Ordering, mem};

use tracing::debug;

use crate::hash::hash_uint32;
use crate::hyperloglog::HyperLogLog;
use crate::Uuid;

/// Abbreviated key: the leading bytes of a UUID packed into a native word.
pub type AbbrevKey = usize;

const WORD_SIZE: usize = mem::size_of::<AbbrevKey>();

/// Register width of the cardinality estimator (1024 registers).
const ESTIMATOR_BWIDTH: u8 = 10;

/// Both the rows held in memory and the values converted must reach this count before the
/// abort policy is evaluated.
const MIN_ROWS_BEFORE_ABORT: u64 = 10_000;

/// Estimated cardinality above which abbreviation is assumed profitable for good.
const TRUSTED_CARDINALITY: f64 = 100_000.0;

/// At least one distinct key is required per this many values.
const VALUES_PER_DISTINCT_KEY: f64 = 2_000.0;

/// Row count at which [`sort_abbreviated`] first consults the abort policy; it then doubles.
const FIRST_ABORT_CHECK: usize = 10;

/// Plug-in contract between a datatype and a generic sort.
///
/// The sort calls [`convert`](SortSupport::convert) once per value, orders values by
/// [`compare_abbreviated`](SortSupport::compare_abbreviated), and must break ties on the
/// abbreviated key with [`compare_full`](SortSupport::compare_full). Equal abbreviated keys never
/// imply equal values. The sort periodically asks [`should_abort`](SortSupport::should_abort)
/// whether to discard the abbreviated keys and fall back to full comparisons.
pub trait SortSupport {
    /// The type being sorted.
    type Datum;

    /// The abbreviated representation.
    type Abbrev: Copy;

    /// Authoritative comparison of two values.
    fn compare_full(&self, a: &Self::Datum, b: &Self::Datum) -> Ordering;

    /// Comparison of two abbreviated keys; a refinement-compatible prefix of `compare_full`.
    fn compare_abbreviated(&self, a: Self::Abbrev, b: Self::Abbrev) -> Ordering;

    /// Converts a value to its abbreviated key.
    fn convert(&mut self, original: &Self::Datum) -> Self::Abbrev;

    /// Returns true if the sort should stop using abbreviated keys.
    fn should_abort(&mut self, rows_in_memory: usize) -> bool;
}

/// Sort-support session for UUIDs; one instance per sort operation.
///
/// # Examples
///
/// ```rust
/// use uuidcore::sortsupport::{sort_abbreviated, UuidSortSupport};
/// use uuidcore::Uuid;
///
/// let mut values: Vec<Uuid> = (0..1_000u128).rev().map(Uuid::from).collect();
/// let abbreviated = sort_abbreviated(&mut values, &mut UuidSortSupport::new());
/// assert!(abbreviated);
/// assert!(values.windows(2).all(|w| w[0] < w[1]));
/// ```
#[derive(Clone, Debug)]
pub struct UuidSortSupport {
    input_count: u64,
    estimating: bool,
    abbr_card: HyperLogLog,
}

impl Default for UuidSortSupport {
    fn default() -> Self {
        Self::new()
    }
}

impl UuidSortSupport {
    /// Begins a sort-support session.
    pub fn new() -> Self {
        Self {
            input_count: 0,
            estimating: true,
            abbr_card: HyperLogLog::new(ESTIMATOR_BWIDTH),
        }
    }

    /// Returns the number of values converted so far.
    pub fn input_count(&self) -> u64 {
        self.input_count
    }

    /// Returns true while the cardinality estimator is still being fed.
    pub fn is_estimating(&self) -> bool {
        self.estimating
    }
}

impl SortSupport for UuidSortSupport {
    type Datum = Uuid;
    type Abbrev = AbbrevKey;

    fn compare_full(&self, a: &Uuid, b: &Uuid) -> Ordering {
        a.compare(b)
    }

    fn compare_abbreviated(&self, a: AbbrevKey, b: AbbrevKey) -> Ordering {
        a.cmp(&b)
    }

    /// Packs the first `size_of::<usize>()` bytes into a word whose unsigned integer order
    /// matches the byte-wise order of those bytes.
    fn convert(&mut self, original: &Uuid) -> AbbrevKey {
        let mut word = [0u8; WORD_SIZE];
        word.copy_from_slice(&original.as_bytes()[..WORD_SIZE]);
        let raw = AbbrevKey::from_ne_bytes(word);
        self.input_count += 1;

        if self.estimating {
            #[cfg(target_pointer_width = "64")]
            let folded = (raw as u32) ^ ((raw as u64 >> 32) as u32);
            #[cfg(not(target_pointer_width = "64"))]
            let folded = raw as u32;

            self.abbr_card.add(hash_uint32(folded));
        }

        // byte-swap on little-endian targets so integer comparison follows byte order
        AbbrevKey::from_be(raw)
    }

    /// Decides whether abbreviation is still worth it, from the abbreviated key cardinality
    /// alone.
    fn should_abort(&mut self, rows_in_memory: usize) -> bool {
        if (rows_in_memory as u64) < MIN_ROWS_BEFORE_ABORT
            || self.input_count < MIN_ROWS_BEFORE_ABORT
            || !self.estimating
        {
            return false;
        }

        let abbr_card = self.abbr_card.estimate();

        // enough distinct keys; the estimate is no longer consulted
        if abbr_card > TRUSTED_CARDINALITY {
            debug!(
                cardinality = abbr_card,
                input_count = self.input_count,
                rows = rows_in_memory,
                "abbreviated key cardinality estimation ended"
            );
            self.estimating = false;
            return false;
        }

        // the 0.5 fudge aborts early on data with a single key in the first 2000 values
        let threshold = self.input_count as f64 / VALUES_PER_DISTINCT_KEY + 0.5;
        if abbr_card < threshold {
            debug!(
                cardinality = abbr_card,
                threshold,
                input_count = self.input_count,
                rows = rows_in_memory,
                "aborting abbreviated keys"
            );
            return true;
        }

        debug!(
            cardinality = abbr_card,
            input_count = self.input_count,
            rows = rows_in_memory,
            "abbreviated key cardinality"
        );
        false
    }
}

/// Sorts `values` in place through the [`SortSupport`] contract.
///
/// Every value is converted to its abbreviated key, consulting the abort policy at 10, 20, 40...
/// rows. Returns true if the abbreviated keys were used, or false if the policy aborted and the
/// values were sorted by the full comparator alone.
pub fn sort_abbreviated<S>(values: &mut [S::Datum], support: &mut S) -> bool
where
    S: SortSupport,
    S::Datum: Clone,
{
    let mut keys = Vec::with_capacity(values.len());
    let mut next_check = FIRST_ABORT_CHECK;
    let mut aborted = false;
    for (i, value) in values.iter().enumerate() {
        keys.push(support.convert(value));
        if i + 1 >= next_check {
            next_check *= 2;
            if support.should_abort(i + 1) {
                aborted = true;
                break;
            }
        }
    }

    let support = &*support;
    if aborted {
        values.sort_by(|a, b| support.compare_full(a, b));
        return false;
    }

    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&i, &j| {
        support
            .compare_abbreviated(keys[i], keys[j])
            .then_with(|| support.compare_full(&values[i], &values[j]))
    });
    let sorted: Vec<S::Datum> = order.into_iter().map(|i| values[i].clone()).collect();
    values.clone_from_slice(&sorted);
    true
}

#[cfg(test)]
mod tests {
    use super::{sort_abbreviated, SortSupport, UuidSortSupport, WORD_SIZE};
    use crate::Uuid;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use std::cmp::Ordering;

    /// Returns a value whose leading word is one of `prefixes` distinct patterns
    fn with_prefix(rng: &mut ChaCha8Rng, prefixes: u64) -> Uuid {
        let mut bytes: [u8; 16] = rng.gen();
        let prefix = rng.gen_range(0..prefixes).wrapping_mul(0x9e37_79b9_7f4a_7c15);
        bytes[..8].copy_from_slice(&prefix.to_be_bytes());
        Uuid::from(bytes)
    }

    /// Orders abbreviated keys consistently with full comparison
    #[test]
    fn orders_abbreviated_keys_consistently_with_full_comparison() {
        let mut ssup = UuidSortSupport::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..10_000 {
            let a = Uuid::from(rng.gen::<u128>() >> rng.gen_range(0..128));
            let b = Uuid::from(rng.gen::<u128>() >> rng.gen_range(0..128));
            let (ka, kb) = (ssup.convert(&a), ssup.convert(&b));
            match ssup.compare_abbreviated(ka, kb) {
                Ordering::Equal => {
                    assert_eq!(a.as_bytes()[..WORD_SIZE], b.as_bytes()[..WORD_SIZE]);
                }
                ord => assert_eq!(ssup.compare_full(&a, &b), ord),
            }
        }
    }

    /// Packs leading bytes in big-endian order
    #[test]
    fn packs_leading_bytes_in_big_endian_order() {
        let e: Uuid = "01020304-0506-0708-090a-0b0c0d0e0f10".parse().unwrap();
        let key = UuidSortSupport::new().convert(&e);
        #[cfg(target_pointer_width = "64")]
        assert_eq!(key, 0x0102_0304_0506_0708);
        #[cfg(target_pointer_width = "32")]
        assert_eq!(key, 0x0102_0304);
    }

    /// Does not abort below row thresholds
    #[test]
    fn does_not_abort_below_row_thresholds() {
        let mut ssup = UuidSortSupport::new();
        for _ in 0..9_999 {
            ssup.convert(&Uuid::NIL);
        }
        assert!(!ssup.should_abort(1_000_000));
        ssup.convert(&Uuid::NIL);
        assert!(!ssup.should_abort(9_999));
        assert!(ssup.should_abort(10_000));
        assert_eq!(ssup.input_count(), 10_000);
    }

    /// Keeps abbreviation for distinct values
    #[test]
    fn keeps_abbreviation_for_distinct_values() {
        let mut ssup = UuidSortSupport::new();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        for _ in 0..10_000 {
            ssup.convert(&Uuid::from(rng.gen::<u128>()));
        }
        assert!(!ssup.should_abort(10_000));
        assert!(ssup.is_estimating());
    }

    /// Aborts for few distinct prefixes
    #[test]
    fn aborts_for_few_distinct_prefixes() {
        let mut ssup = UuidSortSupport::new();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..10_000 {
            ssup.convert(&with_prefix(&mut rng, 5));
        }
        // five keys against a threshold of 10_000 / 2000 + 0.5
        assert!(ssup.should_abort(10_000));

        for _ in 0..10_000 {
            ssup.convert(&with_prefix(&mut rng, 5));
        }
        assert!(ssup.should_abort(20_000));
    }

    /// Stops estimating once cardinality is high
    #[test]
    fn stops_estimating_once_cardinality_is_high() {
        let mut ssup = UuidSortSupport::new();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        for _ in 0..200_000 {
            ssup.convert(&Uuid::from(rng.gen::<u128>()));
        }
        assert!(ssup.is_estimating());
        assert!(!ssup.should_abort(200_000));
        assert!(!ssup.is_estimating());

        // degenerate input afterwards cannot trigger an abort any more
        for _ in 0..1_000_000 {
            ssup.convert(&Uuid::NIL);
        }
        assert!(!ssup.should_abort(1_200_000));
        assert_eq!(ssup.input_count(), 1_200_000);
    }

    /// Sorts with abbreviated keys
    #[test]
    fn sorts_with_abbreviated_keys() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut values: Vec<Uuid> = (0..50_000)
            .map(|i| match i % 3 {
                0 => Uuid::from(rng.gen::<u128>()),
                // shared leading word forces tie-breaking on the tail
                1 => with_prefix(&mut rng, 50_000),
                _ => Uuid::from(rng.gen::<u128>() >> 64),
            })
            .collect();
        let mut expected = values.clone();
        expected.sort();

        assert!(sort_abbreviated(&mut values, &mut UuidSortSupport::new()));
        assert_eq!(values, expected);
    }

    /// Falls back to full comparison after abort
    #[test]
    fn falls_back_to_full_comparison_after_abort() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let mut values: Vec<Uuid> = (0..30_000).map(|_| with_prefix(&mut rng, 3)).collect();
        let mut expected = values.clone();
        expected.sort();

        assert!(!sort_abbreviated(&mut values, &mut UuidSortSupport::new()));
        assert_eq!(values, expected);
    }
}
