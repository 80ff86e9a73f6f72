//! UUIDv7 generator and related types.

use std::time;

use tracing::{trace, warn};

use crate::{Error, Result, Uuid};

pub mod with_rand08;


/// A trait that defines the strong random byte source interface for [`V7Generator`].
///
/// Implementations must report exhaustion or unavailability as an error instead of falling back
/// to weaker randomness.
pub trait RandSource {
    /// Fills `dest` entirely with random data, or fails without partial success.
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error>;
}

/// A trait that defines the system clock interface for [`V7Generator`].
pub trait TimeSource {
    /// Returns the current Unix time in milliseconds.
    fn unix_ts_ms(&mut self) -> u64;
}

/// The default [`TimeSource`] that reads the system real-time clock.
///
/// A clock set before the Unix epoch reads as zero.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Default)]
pub struct StdSystemTime;

impl TimeSource for StdSystemTime {
    fn unix_ts_ms(&mut self) -> u64 {
        time::SystemTime::now()
            .duration_since(time::UNIX_EPOCH)
            .map_or(0, |d| d.as_millis() as u64)
    }
}

/// Largest value of the 18-bit sequence counter.
const MAX_COUNTER: u32 = 0x3_ffff;

/// Largest value of the 48-bit `unix_ts_ms` field.
const MAX_TIMESTAMP: u64 = (1 << 48) - 1;

/// Represents a UUIDv7 generator that encapsulates a counter and guarantees the monotonic order of
/// UUIDs generated within the same millisecond.
///
/// The generator remembers the last timestamp it emitted and an 18-bit sequence counter. A clock
/// reading that did not advance (or went backward) reuses the remembered timestamp and increments
/// the counter; a counter overflow moves the remembered timestamp one millisecond ahead, so the
/// emitted timestamp may run ahead of the real clock under sustained load. The generator never
/// emits a timestamp smaller than one it emitted before.
///
/// Only the top 12 counter bits reach the output (`rand_a`, bytes 6 and 7); the low 6 bits are
/// overwritten by the random tail. Successive outputs therefore have non-decreasing bytes 0 to 7,
/// while the order of outputs that share those bytes is decided by the random tail.
///
/// The state is owned by the generator object. Share one instance behind a lock to extend the
/// guarantee across threads:
///
/// # Examples
///
/// ```rust
/// use rand::rngs::OsRng;
/// use std::{sync, thread};
/// use uuidcore::V7Generator;
///
/// let g = sync::Arc::new(sync::Mutex::new(V7Generator::with_rand08(OsRng)));
/// thread::scope(|s| {
///     for i in 0..4 {
///         let g = sync::Arc::clone(&g);
///         s.spawn(move || {
///             for _ in 0..8 {
///                 let uuid = g.lock().unwrap().generate().unwrap();
///                 println!("{} by thread {}", uuid, i);
///                 thread::yield_now();
///             }
///         });
///     }
/// });
/// ```
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct V7Generator<R, T = StdSystemTime> {
    previous_timestamp: u64,
    sequence_counter: u32,

    /// The random number generator used by the generator.
    rand_source: R,

    /// The clock used by the generator.
    time_source: T,
}

impl<R: RandSource> V7Generator<R> {
    /// Creates a generator instance that reads the system clock.
    pub const fn new(rand_source: R) -> Self {
        Self::with_rand_and_time_sources(rand_source, StdSystemTime)
    }
}

impl<R: RandSource, T: TimeSource> V7Generator<R, T> {
    /// Creates a generator instance with the specified random source and clock.
    pub const fn with_rand_and_time_sources(rand_source: R, time_source: T) -> Self {
        Self {
            previous_timestamp: 0,
            sequence_counter: 0,
            rand_source,
            time_source,
        }
    }

    /// Generates a new UUIDv7 object from the current timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RandomSourceFailure`] if the random source fails; the generator state is
    /// left untouched in that case.
    ///
    /// # Panics
    ///
    /// Panics if the time source reports a value that does not fit in 48 bits.
    pub fn generate(&mut self) -> Result<Uuid> {
        let unix_ts_ms = self.time_source.unix_ts_ms();
        self.generate_core(unix_ts_ms)
    }

    /// Generates a new UUIDv7 object from the `unix_ts_ms` passed.
    ///
    /// A `unix_ts_ms` not greater than the previous one is replaced by the previous one and the
    /// counter is incremented instead. Once both the timestamp and the counter reach their
    /// maximums, the generator keeps emitting that maximum prefix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RandomSourceFailure`] if the random source fails; the generator state is
    /// left untouched in that case.
    ///
    /// # Panics
    ///
    /// Panics if `unix_ts_ms` does not fit in 48 bits.
    pub fn generate_core(&mut self, unix_ts_ms: u64) -> Result<Uuid> {
        assert!(
            unix_ts_ms <= MAX_TIMESTAMP,
            "`unix_ts_ms` must be a 48-bit integer"
        );

        let mut rand_b = [0u8; 8];
        self.fill_random(&mut rand_b)?;

        let timestamp = if unix_ts_ms <= self.previous_timestamp {
            if self.sequence_counter < MAX_COUNTER {
                self.sequence_counter += 1;
            } else if self.previous_timestamp < MAX_TIMESTAMP {
                // increment timestamp at counter overflow
                self.sequence_counter = 0;
                self.previous_timestamp += 1;
                trace!(
                    timestamp = self.previous_timestamp,
                    clock = unix_ts_ms,
                    "uuidv7 counter overflow"
                );
            } else {
                // both fields exhausted; the counter stays saturated at the last timestamp
                trace!(timestamp = self.previous_timestamp, "uuidv7 timestamp exhausted");
            }
            self.previous_timestamp
        } else {
            self.sequence_counter = 0;
            self.previous_timestamp = unix_ts_ms;
            unix_ts_ms
        };

        let counter = self.sequence_counter;
        let mut bytes = [0u8; 16];
        bytes[..6].copy_from_slice(&timestamp.to_be_bytes()[2..]);
        bytes[6] = (counter >> 14) as u8;
        bytes[7] = (counter >> 6) as u8;
        bytes[8] = counter as u8;

        // the random tail replaces the low six counter bits placed in byte 8
        bytes[8..].copy_from_slice(&rand_b);
        bytes[6] = (bytes[6] & 0x0f) | 0x70;
        bytes[8] = (bytes[8] & 0x3f) | 0x80;
        Ok(Uuid::from(bytes))
    }

    /// Generates a new UUIDv4 object utilizing the random number generator inside.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RandomSourceFailure`] if the random source fails.
    pub fn generate_v4(&mut self) -> Result<Uuid> {
        let mut bytes = [0u8; 16];
        self.fill_random(&mut bytes)?;
        bytes[6] = (bytes[6] & 0x0f) | 0x40;
        bytes[8] = (bytes[8] & 0x3f) | 0x80;
        Ok(Uuid::from(bytes))
    }

    fn fill_random(&mut self, dest: &mut [u8]) -> Result<()> {
        self.rand_source.try_fill_bytes(dest).map_err(|err| {
            warn!(error = %err, "could not generate random values");
            Error::RandomSourceFailure(err)
        })
    }
}

/// Supports operations as an infinite iterator that produces a new UUIDv7 object for each call of
/// `next()`.
///
/// # Examples
///
/// ```rust
/// use uuidcore::V7Generator;
///
/// V7Generator::with_rand08(rand::thread_rng())
///     .enumerate()
///     .skip(4)
///     .take(4)
///     .for_each(|(i, e)| println!("[{}] {}", i, e.unwrap()));
/// ```
impl<R: RandSource, T: TimeSource> Iterator for V7Generator<R, T> {
    type Item = Result<Uuid>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.generate())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

impl<R: RandSource, T: TimeSource> std::iter::FusedIterator for V7Generator<R, T> {}
