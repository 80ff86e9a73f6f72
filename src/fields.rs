//! Extraction of the version, variant, and embedded timestamp fields.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::Uuid;

/// The variant field classification of a UUID, determined by the top bits of byte 8.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum Variant {
    /// `0xxx`: reserved for NCS backward compatibility; includes the Nil UUID.
    Var0,

    /// `10xx`: the variant defined by RFC 9562.
    Var10,

    /// `110x`: reserved for Microsoft backward compatibility.
    Var110,

    /// `111x`: reserved for future definition; includes the Max UUID.
    Var111,
}

impl Variant {
    /// Returns the numeric code of the variant: `0`, `0b10`, `0b110`, or `0b111`.
    pub const fn code(self) -> u8 {
        match self {
            Self::Var0 => 0,
            Self::Var10 => 0b10,
            Self::Var110 => 0b110,
            Self::Var111 => 0b111,
        }
    }
}

/// A point in time with microsecond precision, relative to the Unix epoch.
///
/// Timestamps embedded in version 1 and 6 UUIDs count from 1582, so the value may be negative.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Timestamp {
    unix_micros: i64,
}

impl Timestamp {
    /// Creates a timestamp from microseconds since the Unix epoch.
    pub const fn from_unix_micros(unix_micros: i64) -> Self {
        Self { unix_micros }
    }

    /// Returns microseconds since the Unix epoch.
    pub const fn as_unix_micros(&self) -> i64 {
        self.unix_micros
    }

    /// Returns milliseconds since the Unix epoch, rounded toward negative infinity.
    pub const fn as_unix_millis(&self) -> i64 {
        self.unix_micros.div_euclid(1_000)
    }

    /// Converts the timestamp to a [`SystemTime`], or `None` if the platform cannot represent it.
    ///
    /// Some platforms, Windows among them, cannot represent every date back to 1582.
    pub fn to_system_time(&self) -> Option<SystemTime> {
        let offset = Duration::from_micros(self.unix_micros.unsigned_abs());
        if self.unix_micros < 0 {
            UNIX_EPOCH.checked_sub(offset)
        } else {
            UNIX_EPOCH.checked_add(offset)
        }
    }

    /// Converts the timestamp to a `chrono` UTC date-time, or `None` if out of its range.
    #[cfg(feature = "chrono")]
    #[cfg_attr(docsrs, doc(cfg(feature = "chrono")))]
    pub fn to_chrono(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        chrono::DateTime::from_timestamp_micros(self.unix_micros)
    }
}


/// Microseconds between the Gregorian epoch (1582-10-15) and the Unix epoch.
const GREGORIAN_TO_UNIX_MICROS: i64 = 12_219_292_800 * 1_000_000;

/// Number of 100-nanosecond intervals per microsecond.
const TICKS_PER_MICRO: u64 = 10;

// Bit positions of each byte within the 60-bit timestamp of version 1. The field is stored as
// time_low (bytes 0-3), time_mid (bytes 4-5), then time_hi (low nibble of byte 6, byte 7).
const V1_SHIFTS: [u32; 8] = [24, 16, 8, 0, 40, 32, 56, 48];

// Version 6 stores the same 60-bit value most significant bits first.
const V6_SHIFTS: [u32; 8] = [52, 44, 36, 28, 20, 12, 8, 0];

/// Assembles a 60-bit Gregorian timestamp from bytes 0-7, dropping the version nibble.
fn gregorian_ticks(bytes: &[u8; 16], shifts: &[u32; 8]) -> u64 {
    bytes[..8]
        .iter()
        .zip(shifts)
        .enumerate()
        .map(|(i, (&b, &shift))| {
            let b = if i == 6 { b & 0x0f } else { b };
            u64::from(b) << shift
        })
        .sum()
}

/// Converts 100-nanosecond ticks since 1582-10-15 to microseconds since the Unix epoch.
fn gregorian_micros(ticks: u64) -> i64 {
    (ticks / TICKS_PER_MICRO) as i64 - GREGORIAN_TO_UNIX_MICROS
}

/// Reads bytes 0-5 as a big-endian 48-bit millisecond count.
fn unix_ts_ms(bytes: &[u8; 16]) -> u64 {
    bytes[..6]
        .iter()
        .fold(0u64, |acc, &b| (acc << 8) | u64::from(b))
}

impl Uuid {
    /// Returns the variant field classification.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uuidcore::{Uuid, Variant};
    ///
    /// assert_eq!(Uuid::NIL.variant(), Variant::Var0);
    /// assert_eq!(Uuid::MAX.variant(), Variant::Var111);
    /// ```
    pub const fn variant(&self) -> Variant {
        match self.as_bytes()[8] >> 4 {
            0x0..=0x7 => Variant::Var0,
            0x8..=0xb => Variant::Var10,
            0xc..=0xd => Variant::Var110,
            _ => Variant::Var111,
        }
    }

    /// Returns the version field if the UUID is of the RFC variant (`10`), or `None` otherwise.
    pub const fn version(&self) -> Option<u8> {
        match self.variant() {
            Variant::Var10 => Some(self.as_bytes()[6] >> 4),
            _ => None,
        }
    }

    /// Returns the embedded creation time of a version 1, 6, or 7 UUID of the RFC variant, or
    /// `None` for any other UUID.
    ///
    /// Version 7 carries milliseconds since the Unix epoch; versions 1 and 6 carry
    /// 100-nanosecond intervals since 1582-10-15, truncated here to microseconds.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uuidcore::Uuid;
    ///
    /// let v7: Uuid = "017f22e2-79b0-7cc3-98c4-dc0c0c07398f".parse()?;
    /// let v1: Uuid = "c232ab00-9414-11ec-b3c8-9f6bdeced846".parse()?;
    /// assert_eq!(v7.timestamp(), v1.timestamp());
    /// assert_eq!(v7.timestamp().map(|t| t.as_unix_millis()), Some(1_645_557_742_000));
    /// # Ok::<(), uuidcore::ParseError>(())
    /// ```
    pub fn timestamp(&self) -> Option<Timestamp> {
        let bytes = self.as_bytes();
        let unix_micros = match self.version()? {
            7 => unix_ts_ms(bytes) as i64 * 1_000,
            1 => gregorian_micros(gregorian_ticks(bytes, &V1_SHIFTS)),
            6 => gregorian_micros(gregorian_ticks(bytes, &V6_SHIFTS)),
            _ => return None,
        };
        Some(Timestamp::from_unix_micros(unix_micros))
    }
}
