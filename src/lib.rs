//! A UUID value type with canonical text and binary codecs, abbreviated-key sort support, and
//! UUIDv4/v7 generation
//!
//! ```rust
//! use uuidcore::Uuid;
//!
//! let uuid: Uuid = "{01809424-3E59-7C05-9219-566F82FFF672}".parse()?;
//! println!("{}", uuid); // "01809424-3e59-7c05-9219-566f82fff672"
//! assert_eq!(uuid.version(), Some(7));
//! assert_eq!(uuid.timestamp().map(|t| t.as_unix_millis()), Some(0x0180_9424_3e59));
//! # Ok::<(), uuidcore::ParseError>(())
//! ```
//!
//! # Text form
//!
//! [`Uuid`] always formats as 36 lowercase characters in the 8-4-4-4-12 grouping. Parsing is
//! case-insensitive, accepts an optional pair of braces around the whole value, and accepts each
//! of the four group separators independently, so `a0eebc999c0b4ef8bb6d6bb9bd380a11` and
//! `a0eebc99-9c0b4ef8-bb6d6bb9-bd380a11` parse to the same value as the canonical form.
//!
//! # Ordering and hashing
//!
//! Values order as unsigned 128-bit big-endian integers. [`Uuid::hash32`] and
//! [`Uuid::hash_extended`] are deterministic across processes; with seed 0 the low 32 bits of
//! the extended hash equal the 32-bit hash.
//!
//! # Field and bit layout
//!
//! [`V7Generator`] produces identifiers with the following bit layout:
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                          unix_ts_ms                           |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |          unix_ts_ms           |  ver  |        counter        |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |var|                          rand                             |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                             rand                              |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! Where:
//!
//! - The 48-bit `unix_ts_ms` field is dedicated to the Unix timestamp in
//!   milliseconds.
//! - The 4-bit `ver` field is set at `0111`.
//! - The 12-bit `counter` field holds the top 12 bits of an 18-bit sequence counter
//!   that is reset to zero whenever the `unix_ts_ms` advances and incremented by one
//!   for each new ID generated within the same timestamp.
//! - The 2-bit `var` field is set at `10`.
//! - The remaining 62 `rand` bits are filled with random numbers. They overwrite the
//!   low 6 bits of the sequence counter.
//!
//! Consequently, 64 consecutive IDs within one millisecond share the same first 8
//! bytes and are ordered among themselves only by chance. When the 18-bit counter
//! overflows, this library increments the `unix_ts_ms`; therefore, the `unix_ts_ms`
//! may have a larger value than that of the real-time clock. A clock that moves
//! backward never lowers the emitted `unix_ts_ms`.
//!
//! # Other features
//!
//! This library also supports the generation of UUID version 4:
//!
//! ```rust
//! let uuid = uuidcore::uuid4()?;
//! println!("{}", uuid); // e.g. "2ca4b2ce-6c13-40d4-bccf-37d222820f6f"
//! println!("{:?}", uuid.as_bytes()); // as 16-byte big-endian array
//! # Ok::<(), uuidcore::Error>(())
//! ```
//!
//! # Crate features
//!
//! - `global_gen` (default): [`uuid7`] and [`uuid4`] backed by a process-wide generator.
//! - `serde`: serialization as the canonical string or as 16 bytes.
//! - `uuid`: conversions from and into [`uuid::Uuid`](https://docs.rs/uuid).
//! - `chrono`: [`Timestamp::to_chrono`].

#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
pub use error::{Error, ParseError, Result};

mod id;
pub use id::Uuid;

mod wire;
pub use wire::WIRE_LEN;

mod fields;
pub use fields::{Timestamp, Variant};

pub mod hash;
pub mod hyperloglog;
pub mod sortsupport;

pub mod generator;
pub use generator::{RandSource, StdSystemTime, TimeSource, V7Generator};

mod global_gen;
#[cfg(feature = "global_gen")]
pub use global_gen::{uuid4, uuid7};
