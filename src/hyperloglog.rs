//! HyperLogLog cardinality estimator.
//!
//! A fixed array of `2^bwidth` one-byte registers records, for the hashes routed to each
//! register, the longest run of leading zeros seen (plus one). Estimates use the standard
//! harmonic-mean formula with the small-range (linear counting) and large-range corrections for
//! 32-bit hashes.

const POW_2_32: f64 = 4_294_967_296.0;

/// Online estimator of the number of distinct 32-bit hashes added.
#[derive(Clone, Debug)]
pub struct HyperLogLog {
    register_width: u8,
    alpha_mm: f64,
    registers: Vec<u8>,
}

impl HyperLogLog {
    /// Creates an estimator with `2^bwidth` registers.
    ///
    /// # Panics
    ///
    /// Panics if `bwidth` is not in `4..=16`.
    pub fn new(bwidth: u8) -> Self {
        assert!(
            (4..=16).contains(&bwidth),
            "bit width must be between 4 and 16 inclusive"
        );

        let n_registers = 1usize << bwidth;
        let alpha = match bwidth {
            4 => 0.673,
            5 => 0.697,
            6 => 0.709,
            _ => 0.7213 / (1.0 + 1.079 / n_registers as f64),
        };

        Self {
            register_width: bwidth,
            alpha_mm: alpha * n_registers as f64 * n_registers as f64,
            registers: vec![0; n_registers],
        }
    }

    /// Records one hashed element.
    ///
    /// The input must already be a well-mixed hash; the top `bwidth` bits select the register.
    pub fn add(&mut self, hash: u32) {
        let index = (hash >> (u32::BITS - u32::from(self.register_width))) as usize;
        let count = rho(
            hash << self.register_width,
            u32::BITS as u8 - self.register_width,
        );
        let register = &mut self.registers[index];
        *register = (*register).max(count);
    }

    /// Estimates the number of distinct elements added so far.
    pub fn estimate(&self) -> f64 {
        let n_registers = self.registers.len() as f64;
        let sum: f64 = self
            .registers
            .iter()
            .map(|&r| 1.0 / f64::from(r).exp2())
            .sum();
        let result = self.alpha_mm / sum;

        if result <= 5.0 / 2.0 * n_registers {
            let zero_count = self.registers.iter().filter(|&&r| r == 0).count();
            if zero_count != 0 {
                return n_registers * (n_registers / zero_count as f64).ln();
            }
        } else if result > POW_2_32 / 30.0 {
            return -POW_2_32 * (1.0 - result / POW_2_32).ln();
        }
        result
    }
}

/// Position of the leftmost 1-bit in `x`, counting from one, capped at `b + 1`.
fn rho(x: u32, b: u8) -> u8 {
    let j = x.leading_zeros() as u8 + 1;
    j.min(b + 1)
}

#[cfg(test)]
mod tests {
    use super::{rho, HyperLogLog};
    use crate::hash::hash_uint32;

    /// Counts leading zeros with cap
    #[test]
    fn counts_leading_zeros_with_cap() {
        assert_eq!(rho(0x8000_0000, 22), 1);
        assert_eq!(rho(0x4000_0000, 22), 2);
        assert_eq!(rho(0x0000_0400, 22), 22);
        assert_eq!(rho(0x0000_0200, 22), 23);
        assert_eq!(rho(0, 22), 23);
    }

    /// Estimates zero for empty state
    #[test]
    fn estimates_zero_for_empty_state() {
        assert_eq!(HyperLogLog::new(10).estimate(), 0.0);
    }

    /// Ignores duplicates
    #[test]
    fn ignores_duplicates() {
        let mut hll = HyperLogLog::new(10);
        for _ in 0..10_000 {
            for k in 0..5u32 {
                hll.add(hash_uint32(k));
            }
        }
        let estimate = hll.estimate();
        assert!((3.5..6.5).contains(&estimate), "estimate: {}", estimate);
    }

    /// Estimates within expected error
    #[test]
    fn estimates_within_expected_error() {
        for n in [100u32, 1_000, 10_000, 100_000, 1_000_000] {
            let mut hll = HyperLogLog::new(10);
            for k in 0..n {
                hll.add(hash_uint32(k));
            }
            // standard error is 1.04 / sqrt(1024), about 3.25%
            let error = (hll.estimate() - f64::from(n)).abs() / f64::from(n);
            assert!(error < 0.15, "n = {}: relative error {}", n, error);
        }
    }

    /// Rejects out of range width
    #[test]
    #[should_panic]
    fn rejects_out_of_range_width() {
        HyperLogLog::new(17);
    }
}
