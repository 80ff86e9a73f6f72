//! Integration with `rand` (v0.8) crate.

use super::{RandSource, StdSystemTime, V7Generator};
use rand::RngCore;

/// An adapter that implements [`RandSource`] for [`RngCore`] types.
///
/// Only cryptographically strong generators (such as [`rand::rngs::OsRng`]) should back a
/// generator whose output must be unguessable.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct Adapter<T>(/** The wrapped [`RngCore`] type. */ pub T);

impl<T: RngCore> RandSource for Adapter<T> {
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.0.try_fill_bytes(dest)
    }
}

impl<T: RngCore> V7Generator<Adapter<T>, StdSystemTime> {
    /// Creates a generator object with a specified random number generator that implements
    /// [`RngCore`] from `rand` (v0.8) crate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uuidcore::V7Generator;
    ///
    /// let mut g = V7Generator::with_rand08(rand::rngs::OsRng);
    /// println!("{}", g.generate()?);
    /// # Ok::<(), uuidcore::Error>(())
    /// ```
    pub const fn with_rand08(rng: T) -> Self {
        Self::new(Adapter(rng))
    }
}
