//! Fixed 16-byte binary form.
//!
//! The wire form is the byte array itself in natural order, without a length prefix.

use bytes::{Buf, BufMut};

use crate::{Error, Result, Uuid};

/// Length of the binary representation in bytes.
pub const WIRE_LEN: usize = 16;

impl Uuid {
    /// Reads a UUID from the next 16 bytes of `buf`.
    ///
    /// Nothing is consumed if fewer than 16 bytes remain.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TruncatedInput`] if `buf` holds fewer than 16 bytes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uuidcore::Uuid;
    ///
    /// let mut msg: &[u8] = &[0x01; 20];
    /// let uuid = Uuid::decode_wire(&mut msg)?;
    /// assert_eq!(uuid.as_bytes(), &[0x01; 16]);
    /// assert_eq!(msg.len(), 4);
    /// # Ok::<(), uuidcore::Error>(())
    /// ```
    pub fn decode_wire<B: Buf>(buf: &mut B) -> Result<Self> {
        let remaining = buf.remaining();
        if remaining < WIRE_LEN {
            return Err(Error::TruncatedInput { remaining });
        }

        let mut bytes = [0u8; WIRE_LEN];
        buf.copy_to_slice(&mut bytes);
        Ok(Self::from_bytes(bytes))
    }

    /// Appends the 16-byte binary form to `buf`.
    pub fn encode_wire<B: BufMut>(&self, buf: &mut B) {
        buf.put_slice(self.as_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::WIRE_LEN;
    use crate::{Error, Uuid};
    use bytes::{Buf, BytesMut};

    /// Round-trips random values through the wire form
    #[test]
    fn round_trips_random_values_through_the_wire_form() {
        let mut buf = BytesMut::new();
        let samples: Vec<Uuid> = (0..1_000).map(|_| Uuid::from(rand::random::<u128>())).collect();
        for e in &samples {
            e.encode_wire(&mut buf);
        }
        assert_eq!(buf.len(), samples.len() * WIRE_LEN);

        let mut frozen = buf.freeze();
        for e in &samples {
            assert_eq!(Uuid::decode_wire(&mut frozen).unwrap(), *e);
        }
        assert!(!frozen.has_remaining());
    }

    /// Writes bytes in natural order without prefix
    #[test]
    fn writes_bytes_in_natural_order_without_prefix() {
        let e: Uuid = "00112233-4455-6677-8899-aabbccddeeff".parse().unwrap();
        let mut out = Vec::new();
        e.encode_wire(&mut out);
        assert_eq!(
            out,
            [
                0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc,
                0xdd, 0xee, 0xff
            ]
        );
    }

    /// Fails on truncated input without consuming it
    #[test]
    fn fails_on_truncated_input_without_consuming_it() {
        for len in 0..WIRE_LEN {
            let data = vec![0xabu8; len];
            let mut buf = &data[..];
            match Uuid::decode_wire(&mut buf) {
                Err(Error::TruncatedInput { remaining }) => assert_eq!(remaining, len),
                other => panic!("unexpected result: {:?}", other),
            }
            assert_eq!(buf.len(), len);
        }
    }
}
