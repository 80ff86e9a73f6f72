use std::{cmp, fmt, ops, str};

use crate::ParseError;

/// Represents a Universally Unique IDentifier.
///
/// The derived ordering compares the 16 bytes as an unsigned big-endian integer, byte 0 being
/// the most significant; it is the one authoritative order for the type.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Uuid([u8; 16]);

impl Uuid {
    /// Nil UUID (00000000-0000-0000-0000-000000000000)
    pub const NIL: Self = Self([0x00; 16]);

    /// Max UUID (ffffffff-ffff-ffff-ffff-ffffffffffff)
    pub const MAX: Self = Self([0xff; 16]);

    /// Creates a UUID from a 16-byte array in network (big-endian) order.
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Returns a reference to the underlying byte array.
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Three-way comparison of two UUIDs as unsigned 128-bit big-endian integers.
    ///
    /// Equivalent to [`Ord::cmp`]; provided under the name index and sort code expect.
    pub fn compare(&self, other: &Self) -> cmp::Ordering {
        self.0.cmp(&other.0)
    }

    /// Returns the 8-4-4-4-12 hexadecimal string representation stored in a stack-allocated
    /// structure that can be dereferenced as `str` and [`Display`](fmt::Display)ed.
    ///
    /// This is the only textual form this type emits, although [`str::parse`] accepts a few
    /// more.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uuidcore::Uuid;
    ///
    /// let x = "{550E8400-E29B-41D4-A716-446655440000}".parse::<Uuid>()?;
    /// let y = x.encode();
    /// assert_eq!(&y as &str, "550e8400-e29b-41d4-a716-446655440000");
    /// assert_eq!(format!("{}", y), "550e8400-e29b-41d4-a716-446655440000");
    /// # Ok::<(), uuidcore::ParseError>(())
    /// ```
    pub fn encode(&self) -> impl ops::Deref<Target = str> + fmt::Display {
        const DIGITS: &[u8; 16] = b"0123456789abcdef";

        let mut buffer = [b'-'; 36];
        let mut pos = 0;
        for (i, e) in self.0.iter().enumerate() {
            if matches!(i, 4 | 6 | 8 | 10) {
                pos += 1;
            }
            buffer[pos] = DIGITS[(e >> 4) as usize];
            buffer[pos + 1] = DIGITS[(e & 15) as usize];
            pos += 2;
        }
        debug_assert!(buffer.is_ascii());
        UuidStr(buffer)
    }
}

impl fmt::Display for Uuid {
    /// Returns the 8-4-4-4-12 canonical hexadecimal string representation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl str::FromStr for Uuid {
    type Err = ParseError;

    /// Creates an object from a hexadecimal string representation.
    ///
    /// Accepts 32 hexadecimal digits in either case. A hyphen may follow each of the first four
    /// groups of the 8-4-4-4-12 layout, and the whole string may be enclosed in braces. Nothing
    /// else is tolerated, including surrounding whitespace.
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        let err = || ParseError::new(src);

        let body = match src.strip_prefix('{') {
            Some(inner) => inner.strip_suffix('}').ok_or_else(err)?,
            None => src,
        };

        let mut dst = [0u8; 16];
        let mut rest = body.as_bytes();
        for (i, e) in dst.iter_mut().enumerate() {
            let [hi, lo, tail @ ..] = rest else {
                return Err(err());
            };
            *e = (hex_value(*hi).ok_or_else(err)? << 4) | hex_value(*lo).ok_or_else(err)?;
            rest = match tail {
                [b'-', after @ ..] if matches!(i, 3 | 5 | 7 | 9) => after,
                _ => tail,
            };
        }

        if rest.is_empty() {
            Ok(Self(dst))
        } else {
            Err(err())
        }
    }
}

fn hex_value(c: u8) -> Option<u8> {
    (c as char).to_digit(16).map(|d| d as u8)
}

impl From<Uuid> for [u8; 16] {
    fn from(src: Uuid) -> Self {
        src.0
    }
}

impl From<[u8; 16]> for Uuid {
    fn from(src: [u8; 16]) -> Self {
        Self(src)
    }
}

impl AsRef<[u8]> for Uuid {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<Uuid> for u128 {
    fn from(src: Uuid) -> Self {
        Self::from_be_bytes(src.0)
    }
}

impl From<u128> for Uuid {
    fn from(src: u128) -> Self {
        Self(src.to_be_bytes())
    }
}

impl From<Uuid> for String {
    fn from(src: Uuid) -> Self {
        src.to_string()
    }
}

impl TryFrom<String> for Uuid {
    type Error = ParseError;

    fn try_from(src: String) -> Result<Self, Self::Error> {
        src.parse()
    }
}

/// Concrete return type of [`Uuid::encode()`] containing the stack-allocated 8-4-4-4-12 string
/// representation.
struct UuidStr([u8; 36]);

impl ops::Deref for UuidStr {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        debug_assert!(self.0.is_ascii());
        // only ASCII hex digits and hyphens are ever written
        unsafe { str::from_utf8_unchecked(&self.0) }
    }
}

impl fmt::Display for UuidStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self)
    }
}

#[cfg(feature = "uuid")]
#[cfg_attr(docsrs, doc(cfg(feature = "uuid")))]
mod uuid_support {
    use super::Uuid;

    impl From<Uuid> for uuid::Uuid {
        fn from(src: Uuid) -> Self {
            uuid::Uuid::from_bytes(src.0)
        }
    }

    impl From<uuid::Uuid> for Uuid {
        fn from(src: uuid::Uuid) -> Self {
            Self(src.into_bytes())
        }
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod serde_support {
    use super::{fmt, Uuid};
    use serde::{de, Deserializer, Serializer};

    impl serde::Serialize for Uuid {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if serializer.is_human_readable() {
                serializer.serialize_str(&self.encode())
            } else {
                serializer.serialize_bytes(self.as_bytes())
            }
        }
    }

    impl<'de> serde::Deserialize<'de> for Uuid {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            if deserializer.is_human_readable() {
                deserializer.deserialize_str(VisitorImpl)
            } else {
                deserializer.deserialize_bytes(VisitorImpl)
            }
        }
    }

    struct VisitorImpl;

    impl<'de> de::Visitor<'de> for VisitorImpl {
        type Value = Uuid;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "a UUID representation")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            value.parse::<Self::Value>().map_err(de::Error::custom)
        }

        fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Self::Value, E> {
            <[u8; 16]>::try_from(value)
                .map(Self::Value::from)
                .map_err(|_| de::Error::invalid_length(value.len(), &self))
        }
    }

}
