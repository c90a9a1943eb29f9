// Copyright 2022 Sebastian Ramacher
// SPDX-License-Identifier: MIT

use aead::{
    consts::{U0, U1, U12, U128, U16, U24, U6, U64, U8},
    generic_array::typenum::Unsigned,
    KeySizeUser,
};

use crate::{
    ascon_p::State, AbsorbingState, AeadCore, AeadInPlace, Isap, Key, KeyInit, Nonce, Result, Tag,
};

/// Absorbing wrapper around the Ascon permutation state.
///
/// Lanes are 64 bit wide and serialized big-endian: byte 0 of the state is
/// the most significant byte of lane 0. `idx` tracks the number of bytes
/// absorbed into the current rate block.
#[derive(Debug, Default)]
pub(crate) struct AsconState {
    state: State,
    idx: usize,
}

impl AbsorbingState for AsconState {
    const RATE: usize = 8;

    fn absorb_bit(&mut self, bit: u8) {
        debug_assert!(self.idx == 0 && bit <= 1);
        self.state[0] ^= u64::from(bit) << 63;
    }

    fn absorb_byte<R: Unsigned>(&mut self, byte: u8) {
        self.state[0] ^= u64::from(byte) << ((7 - self.idx) * 8);
        self.idx += 1;
        if self.idx == Self::RATE {
            self.permute_n::<R>();
        }
    }

    fn absorb_bytes<R: Unsigned>(&mut self, mut bytes: &[u8]) {
        // fill up a partially absorbed block first
        while self.idx != 0 && !bytes.is_empty() {
            self.absorb_byte::<R>(bytes[0]);
            bytes = &bytes[1..];
        }

        // full blocks as whole lanes
        while bytes.len() >= Self::RATE {
            self.state[0] ^= u64::from_be_bytes(bytes[..8].try_into().unwrap());
            self.permute_n::<R>();
            bytes = &bytes[Self::RATE..];
        }

        if !bytes.is_empty() {
            let mut tmp = [0u8; 8];
            tmp[..bytes.len()].copy_from_slice(bytes);
            self.state[0] ^= u64::from_be_bytes(tmp);
            self.idx = bytes.len();
        }
    }

    fn permute_n<R: Unsigned>(&mut self) {
        match R::USIZE {
            12 => self.state.permute_12(),
            6 => self.state.permute_6(),
            1 => self.state.permute_1(),
            rounds => self.state.permute_n(rounds),
        }
        self.idx = 0;
    }

    fn permute_n_if<R: Unsigned>(&mut self) {
        if self.idx != 0 {
            self.permute_n::<R>();
        }
    }

    fn separate_domains(&mut self) {
        // lane 4 holds the last 8 state bytes; its least significant bit is
        // the low bit of byte 39
        self.state[4] ^= 0x1;
    }

    fn extract_bytes<const LEN: usize>(&self) -> [u8; LEN] {
        debug_assert!(LEN % 8 == 0 && LEN <= 40);

        let mut ret = [0u8; LEN];
        for (idx, chunk) in ret.chunks_exact_mut(8).enumerate() {
            chunk.copy_from_slice(&u64::to_be_bytes(self.state[idx]));
        }
        ret
    }

    fn overwrite_bytes<const LEN: usize, O: Unsigned>(&mut self, bytes: &[u8; LEN]) {
        debug_assert!(LEN % 8 == 0 && O::USIZE % 8 == 0 && LEN + O::USIZE <= 40);

        for (idx, chunk) in bytes.chunks_exact(8).enumerate() {
            self.state[idx + O::USIZE / 8] = u64::from_be_bytes(chunk.try_into().unwrap());
        }
    }
}

/// XOR the 8 byte rate into a full block of `buffer`.
fn xor_keystream_block(state: &AsconState, buffer: &mut [u8]) {
    let key_stream = u64::from_ne_bytes(state.extract_bytes());
    let t = key_stream ^ u64::from_ne_bytes(buffer[..8].try_into().unwrap());
    buffer[..8].copy_from_slice(&u64::to_ne_bytes(t));
}

/// XOR the rate into a final block shorter than the rate.
fn xor_keystream_bytes(state: AsconState, buffer: &mut [u8]) {
    let key_stream: [u8; 8] = state.extract_bytes();
    for (b, k) in buffer.iter_mut().zip(key_stream) {
        *b ^= k;
    }
}

macro_rules! impl_aead_for {
    ($cipher:ident) => {
        impl AeadCore for $cipher {
            type NonceSize = U16;
            type TagSize = U16;
            type CiphertextOverhead = U0;
        }

        impl KeySizeUser for $cipher {
            type KeySize = U16;
        }

        impl KeyInit for $cipher {
            fn new(key: &Key<Self>) -> Self {
                Self { k: (*key).into() }
            }
        }

        impl AeadInPlace for $cipher {
            fn encrypt_in_place_detached(
                &self,
                nonce: &Nonce<Self>,
                associated_data: &[u8],
                buffer: &mut [u8],
            ) -> Result<Tag<Self>> {
                let nonce: [u8; 16] = (*nonce).into();
                Self::encrypt_impl(&self.k, &nonce, associated_data, buffer).map(|tag| tag.into())
            }

            fn decrypt_in_place_detached(
                &self,
                nonce: &Nonce<Self>,
                associated_data: &[u8],
                buffer: &mut [u8],
                tag: &Tag<Self>,
            ) -> Result<()> {
                let nonce: [u8; 16] = (*nonce).into();
                Self::decrypt_impl(&self.k, &nonce, associated_data, buffer, tag)
            }
        }
    };
}

pub(crate) use impl_aead_for;

/// ISAP-A-128A: the Ascon-p instance with aggressive round counts.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "zeroize", derive(zeroize::ZeroizeOnDrop))]
pub struct IsapA128A {
    k: [u8; 16],
}

impl Isap for IsapA128A {
    type KeySizeBits = U128;
    type RateBits = U64;
    type RateBytes = U8;
    type RateSessionKeyBits = U1;
    type RoundsKey = U12;
    type RoundsBit = U1;
    type RoundsEncryption = U6;
    type RoundsMAC = U12;
    type SessionKeyBytes = U24;
    type State = AsconState;

    fn isap_enc_process_block(state: &Self::State, buffer: &mut [u8]) {
        xor_keystream_block(state, buffer);
    }

    fn isap_enc_process_bytes(state: Self::State, buffer: &mut [u8]) {
        xor_keystream_bytes(state, buffer);
    }
}

impl_aead_for!(IsapA128A);

/// ISAP-A-128: the conservative Ascon-p instance, all permutations with 12
/// rounds.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "zeroize", derive(zeroize::ZeroizeOnDrop))]
pub struct IsapA128 {
    k: [u8; 16],
}

impl Isap for IsapA128 {
    type KeySizeBits = U128;
    type RateBits = U64;
    type RateBytes = U8;
    type RateSessionKeyBits = U1;
    type RoundsKey = U12;
    type RoundsBit = U12;
    type RoundsEncryption = U12;
    type RoundsMAC = U12;
    type SessionKeyBytes = U24;
    type State = AsconState;

    fn isap_enc_process_block(state: &Self::State, buffer: &mut [u8]) {
        xor_keystream_block(state, buffer);
    }

    fn isap_enc_process_bytes(state: Self::State, buffer: &mut [u8]) {
        xor_keystream_bytes(state, buffer);
    }
}

impl_aead_for!(IsapA128);

#[cfg(test)]
mod tests {
    use super::{AbsorbingState, AsconState, Unsigned};
    use aead::consts::{U12, U16, U8};

    #[test]
    fn absorb_matches_lane_layout() {
        // byte-wise and lane-wise absorption agree
        let data: [u8; 11] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11];

        let mut byte_wise = AsconState::default();
        for byte in data {
            byte_wise.absorb_byte::<U12>(byte);
        }

        let mut lane_wise = AsconState::default();
        lane_wise.absorb_bytes::<U12>(&data);

        assert_eq!(
            byte_wise.extract_bytes::<40>(),
            lane_wise.extract_bytes::<40>()
        );
        assert_eq!(byte_wise.idx, 3);
    }

    #[test]
    fn bit_absorption_hits_the_top_bit() {
        let mut state = AsconState::default();
        state.absorb_bit(1);
        assert_eq!(state.extract_bytes::<8>()[0], 0x80);
    }

    #[test]
    fn overwrite_is_reflected_in_extract() {
        let mut state = AsconState::default();
        state.overwrite_bytes::<16, U16>(&[0xab; 16]);
        let bytes: [u8; 40] = state.extract_bytes();
        assert_eq!(&bytes[16..32], &[0xab; 16]);
        assert_eq!(&bytes[..16], &[0; 16]);
        assert_eq!(&bytes[32..], &[0; 8]);
    }

    #[test]
    fn rate_constants_are_consistent() {
        assert_eq!(AsconState::RATE, U8::USIZE);
    }
}
