// Copyright 2022 Sebastian Ramacher
// SPDX-License-Identifier: MIT

use aead::{
    consts::{U0, U1, U12, U128, U144, U16, U18, U20, U34, U8},
    generic_array::typenum::Unsigned,
    KeySizeUser,
};

use crate::{
    ascon_impl::impl_aead_for, keccak_p::keccak_p, AbsorbingState, AeadCore, AeadInPlace, Isap,
    Key, KeyInit, Nonce, Result, Tag,
};

/// Absorbing wrapper around the Keccak-p[400] permutation state.
///
/// Lanes are 16 bit wide and serialized little-endian: byte 0 of the state
/// is the least significant byte of lane 0. `idx` tracks the number of bytes
/// absorbed into the current rate block; inputs are not lane-aligned, so
/// absorption is byte-granular with a two-byte fast path.
#[derive(Debug, Default)]
pub(crate) struct KeccakState {
    state: [u16; 25],
    idx: usize,
}

impl KeccakState {
    fn absorb_two_bytes<R: Unsigned>(&mut self, byte0: u8, byte1: u8) {
        debug_assert!(self.idx % 2 == 0);
        self.state[self.idx / 2] ^= u16::from_le_bytes([byte0, byte1]);
        self.idx += 2;
        if self.idx == Self::RATE {
            self.permute_n::<R>();
        }
    }
}

impl AbsorbingState for KeccakState {
    const RATE: usize = 18;

    fn absorb_bit(&mut self, bit: u8) {
        debug_assert!(self.idx == 0 && bit <= 1);
        self.state[0] ^= u16::from(bit) << 7;
    }

    fn absorb_byte<R: Unsigned>(&mut self, byte: u8) {
        self.state[self.idx / 2] ^= u16::from(byte) << ((self.idx % 2) * 8);
        self.idx += 1;
        if self.idx == Self::RATE {
            self.permute_n::<R>();
        }
    }

    fn absorb_bytes<R: Unsigned>(&mut self, mut bytes: &[u8]) {
        // re-align to a lane boundary
        if self.idx % 2 != 0 && !bytes.is_empty() {
            self.absorb_byte::<R>(bytes[0]);
            bytes = &bytes[1..];
        }

        while bytes.len() >= 2 {
            self.absorb_two_bytes::<R>(bytes[0], bytes[1]);
            bytes = &bytes[2..];
        }

        if !bytes.is_empty() {
            self.absorb_byte::<R>(bytes[0]);
        }
    }

    fn permute_n<R: Unsigned>(&mut self) {
        keccak_p(&mut self.state, R::USIZE);
        self.idx = 0;
    }

    fn permute_n_if<R: Unsigned>(&mut self) {
        if self.idx != 0 {
            self.permute_n::<R>();
        }
    }

    fn separate_domains(&mut self) {
        // lane 24 holds state bytes 48 and 49; the separator sits in the low
        // bit of byte 49, the lane's high byte
        self.state[24] ^= 0x100;
    }

    fn extract_bytes<const LEN: usize>(&self) -> [u8; LEN] {
        debug_assert!(LEN % 2 == 0 && LEN <= 50);

        let mut ret = [0u8; LEN];
        for (idx, chunk) in ret.chunks_exact_mut(2).enumerate() {
            chunk.copy_from_slice(&u16::to_le_bytes(self.state[idx]));
        }
        ret
    }

    fn overwrite_bytes<const LEN: usize, O: Unsigned>(&mut self, bytes: &[u8; LEN]) {
        debug_assert!(LEN % 2 == 0 && O::USIZE % 2 == 0 && LEN + O::USIZE <= 50);

        for (idx, chunk) in bytes.chunks_exact(2).enumerate() {
            self.state[idx + O::USIZE / 2] = u16::from_le_bytes(chunk.try_into().unwrap());
        }
    }
}

/// XOR the 18 byte rate into a full block of `buffer`.
fn xor_keystream_block(state: &KeccakState, buffer: &mut [u8]) {
    let key_stream: [u8; 18] = state.extract_bytes();
    for (b, k) in buffer[..18].iter_mut().zip(key_stream) {
        *b ^= k;
    }
}

/// XOR the rate into a final block shorter than the rate.
fn xor_keystream_bytes(state: KeccakState, buffer: &mut [u8]) {
    let key_stream: [u8; 18] = state.extract_bytes();
    for (b, k) in buffer.iter_mut().zip(key_stream) {
        *b ^= k;
    }
}

/// ISAP-K-128A: the Keccak-p[400] instance with aggressive round counts.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "zeroize", derive(zeroize::ZeroizeOnDrop))]
pub struct IsapK128A {
    k: [u8; 16],
}

impl Isap for IsapK128A {
    type KeySizeBits = U128;
    type RateBits = U144;
    type RateBytes = U18;
    type RateSessionKeyBits = U1;
    type RoundsKey = U8;
    type RoundsBit = U1;
    type RoundsEncryption = U8;
    type RoundsMAC = U16;
    type SessionKeyBytes = U34;
    type State = KeccakState;

    fn isap_enc_process_block(state: &Self::State, buffer: &mut [u8]) {
        xor_keystream_block(state, buffer);
    }

    fn isap_enc_process_bytes(state: Self::State, buffer: &mut [u8]) {
        xor_keystream_bytes(state, buffer);
    }
}

impl_aead_for!(IsapK128A);

/// ISAP-K-128: the conservative Keccak-p[400] instance.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "zeroize", derive(zeroize::ZeroizeOnDrop))]
pub struct IsapK128 {
    k: [u8; 16],
}

impl Isap for IsapK128 {
    type KeySizeBits = U128;
    type RateBits = U144;
    type RateBytes = U18;
    type RateSessionKeyBits = U1;
    type RoundsKey = U12;
    type RoundsBit = U12;
    type RoundsEncryption = U12;
    type RoundsMAC = U20;
    type SessionKeyBytes = U34;
    type State = KeccakState;

    fn isap_enc_process_block(state: &Self::State, buffer: &mut [u8]) {
        xor_keystream_block(state, buffer);
    }

    fn isap_enc_process_bytes(state: Self::State, buffer: &mut [u8]) {
        xor_keystream_bytes(state, buffer);
    }
}

impl_aead_for!(IsapK128);

#[cfg(test)]
mod tests {
    use super::{AbsorbingState, KeccakState, Unsigned};
    use aead::consts::{U16, U18, U2, U34};

    #[test]
    fn absorb_matches_lane_layout() {
        let data: [u8; 21] = core::array::from_fn(|i| i as u8);

        let mut byte_wise = KeccakState::default();
        for byte in data {
            byte_wise.absorb_byte::<U16>(byte);
        }

        let mut lane_wise = KeccakState::default();
        lane_wise.absorb_bytes::<U16>(&data);

        assert_eq!(
            byte_wise.extract_bytes::<50>(),
            lane_wise.extract_bytes::<50>()
        );
        assert_eq!(byte_wise.idx, 3);
    }

    #[test]
    fn absorb_handles_odd_alignment() {
        // starting mid-lane exercises the re-alignment path
        let mut split = KeccakState::default();
        split.absorb_byte::<U16>(0x5a);
        split.absorb_bytes::<U16>(&[1, 2, 3, 4, 5]);

        let mut joined = KeccakState::default();
        joined.absorb_bytes::<U16>(&[0x5a, 1, 2, 3, 4, 5]);

        assert_eq!(split.extract_bytes::<50>(), joined.extract_bytes::<50>());
    }

    #[test]
    fn bit_absorption_hits_bit_seven_of_byte_zero() {
        let mut state = KeccakState::default();
        state.absorb_bit(1);
        assert_eq!(state.extract_bytes::<2>()[0], 0x80);
    }

    #[test]
    fn overwrite_is_reflected_in_extract() {
        let mut state = KeccakState::default();
        state.overwrite_bytes::<16, U34>(&[0xcd; 16]);
        let bytes: [u8; 50] = state.extract_bytes();
        assert_eq!(&bytes[..34], &[0; 34]);
        assert_eq!(&bytes[34..], &[0xcd; 16]);
    }

    #[test]
    fn rate_constants_are_consistent() {
        assert_eq!(KeccakState::RATE, U18::USIZE);
        assert_eq!(KeccakState::RATE % U2::USIZE, 0);
    }
}
