//! Bytewise hash primitives and the UUID hash functions built on them.
//!
//! The primitives follow Bob Jenkins' lookup3 construction (`hashlittle`), with words read in
//! little-endian order and the key length folded into the initial state.

use crate::Uuid;

const GOLDEN_RATIO: u32 = 0x9e37_79b9;
const INIT_BIAS: u32 = 3_923_095;

#[derive(Clone, Copy)]
struct State {
    a: u32,
    b: u32,
    c: u32,
}

impl State {
    fn new(len: usize) -> Self {
        let init = GOLDEN_RATIO
            .wrapping_add(len as u32)
            .wrapping_add(INIT_BIAS);
        Self {
            a: init,
            b: init,
            c: init,
        }
    }

    fn mix(&mut self) {
        let Self { a, b, c } = self;
        *a = a.wrapping_sub(*c);
        *a ^= c.rotate_left(4);
        *c = c.wrapping_add(*b);
        *b = b.wrapping_sub(*a);
        *b ^= a.rotate_left(6);
        *a = a.wrapping_add(*c);
        *c = c.wrapping_sub(*b);
        *c ^= b.rotate_left(8);
        *b = b.wrapping_add(*a);
        *a = a.wrapping_sub(*c);
        *a ^= c.rotate_left(16);
        *c = c.wrapping_add(*b);
        *b = b.wrapping_sub(*a);
        *b ^= a.rotate_left(19);
        *a = a.wrapping_add(*c);
        *c = c.wrapping_sub(*b);
        *c ^= b.rotate_left(4);
        *b = b.wrapping_add(*a);
    }

    fn finalize(&mut self) {
        let Self { a, b, c } = self;
        *c ^= *b;
        *c = c.wrapping_sub(b.rotate_left(14));
        *a ^= *c;
        *a = a.wrapping_sub(c.rotate_left(11));
        *b ^= *a;
        *b = b.wrapping_sub(a.rotate_left(25));
        *c ^= *b;
        *c = c.wrapping_sub(b.rotate_left(16));
        *a ^= *c;
        *a = a.wrapping_sub(c.rotate_left(4));
        *b ^= *a;
        *b = b.wrapping_sub(a.rotate_left(14));
        *c ^= *b;
        *c = c.wrapping_sub(b.rotate_left(24));
    }

    /// Absorbs all of `key` and runs the final mix.
    fn absorb(&mut self, key: &[u8]) {
        let mut chunks = key.chunks_exact(12);
        for chunk in &mut chunks {
            self.a = self.a.wrapping_add(le_word(&chunk[0..4]));
            self.b = self.b.wrapping_add(le_word(&chunk[4..8]));
            self.c = self.c.wrapping_add(le_word(&chunk[8..12]));
            self.mix();
        }

        // the lowest byte of `c` is reserved for the length in lookup3, so the last tail bytes
        // land one position up
        let tail = chunks.remainder();
        let mut block = [0u8; 12];
        block[..tail.len()].copy_from_slice(tail);
        self.a = self.a.wrapping_add(le_word(&block[0..4]));
        self.b = self.b.wrapping_add(le_word(&block[4..8]));
        self.c = self.c.wrapping_add(le_word(&block[8..12]) << 8);
        self.finalize();
    }
}

fn le_word(bytes: &[u8]) -> u32 {
    let mut word = [0u8; 4];
    word.copy_from_slice(bytes);
    u32::from_le_bytes(word)
}

/// Hashes an arbitrary byte string to 32 bits.
pub fn hash_bytes(key: &[u8]) -> u32 {
    let mut state = State::new(key.len());
    state.absorb(key);
    state.c
}

/// Hashes an arbitrary byte string to 64 bits, perturbed by `seed`.
///
/// With a zero seed, the low 32 bits of the result equal [`hash_bytes`].
pub fn hash_bytes_extended(key: &[u8], seed: u64) -> u64 {
    let mut state = State::new(key.len());
    if seed != 0 {
        state.a = state.a.wrapping_add((seed >> 32) as u32);
        state.b = state.b.wrapping_add(seed as u32);
        state.mix();
    }
    state.absorb(key);
    (u64::from(state.b) << 32) | u64::from(state.c)
}

/// Hashes a single 32-bit integer.
pub fn hash_uint32(k: u32) -> u32 {
    let mut state = State::new(4);
    state.a = state.a.wrapping_add(k);
    state.finalize();
    state.c
}

impl Uuid {
    /// Returns a 32-bit hash of the 16 raw bytes, suitable for hash tables and hash indexes.
    pub fn hash32(&self) -> u32 {
        hash_bytes(self.as_bytes())
    }

    /// Returns a seeded 64-bit hash of the 16 raw bytes.
    ///
    /// A zero seed yields a value whose low 32 bits equal [`Uuid::hash32`].
    pub fn hash_extended(&self, seed: u64) -> u64 {
        hash_bytes_extended(self.as_bytes(), seed)
    }
}
