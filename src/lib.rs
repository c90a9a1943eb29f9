// Copyright 2022 Sebastian Ramacher
// SPDX-License-Identifier: MIT

//! # Pure Rust implementation of the ISAP v2 authenticated encryption schemes
//!
//! ISAP is a family of authenticated encryption schemes with associated data
//! (AEAD) designed for robustness against differential power analysis. It was
//! a finalist of the [NIST lightweight cryptography
//! competition](https://csrc.nist.gov/projects/lightweight-cryptography). The
//! family consists of four instances sharing one mode: [`IsapA128`] and
//! [`IsapA128A`] build on the Ascon permutation, [`IsapK128`] and
//! [`IsapK128A`] on Keccak-p\[400\]. All instances use 128 bit keys, 128 bit
//! nonces and 128 bit tags.
//!
//! The DPA protection comes from the re-keying function: its input is
//! absorbed one bit per permutation call, so every key-dependent state update
//! depends on at most one fresh input bit.
//!
//! ## Usage
//!
//! ```
//! # #[cfg(feature = "alloc")]
//! # fn demo() -> isap_lwc::Result<()> {
//! use isap_lwc::aead::{Aead, KeyInit};
//! use isap_lwc::{IsapA128A, Key, Nonce};
//!
//! let key = Key::<IsapA128A>::from_slice(b"an example key16");
//! let cipher = IsapA128A::new(key);
//! let nonce = Nonce::<IsapA128A>::from_slice(b"unique nonce 016");
//! let ciphertext = cipher.encrypt(nonce, b"plaintext message".as_ref())?;
//! let plaintext = cipher.decrypt(nonce, ciphertext.as_ref())?;
//! assert_eq!(&plaintext, b"plaintext message");
//! # Ok(())
//! # }
//! # #[cfg(feature = "alloc")]
//! # demo().unwrap();
//! ```
//!
//! Decryption fails with an opaque [`Error`] whenever the tag does not
//! verify; no plaintext is produced in that case.

#![no_std]
#![warn(missing_docs, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod ascon_impl;
mod ascon_p;
#[cfg(feature = "capi")]
#[cfg_attr(docsrs, doc(cfg(feature = "capi")))]
pub mod capi;
mod keccak_impl;
mod keccak_p;

pub use aead::{self, AeadCore, AeadInPlace, Error, Key, KeyInit, Nonce, Result, Tag};
pub use ascon_impl::{IsapA128, IsapA128A};
pub use keccak_impl::{IsapK128, IsapK128A};

use aead::{
    consts::{U0, U16},
    generic_array::typenum::Unsigned,
};
use subtle::ConstantTimeEq;

/// IV type byte of the MAC initialization vector.
const IV_A: u8 = 0x01;
/// IV type byte for re-keying in MAC mode.
const IV_KA: u8 = 0x02;
/// IV type byte for re-keying in ENC mode.
const IV_KE: u8 = 0x03;

/// Operations on a permutation state required by the ISAP mode.
///
/// Implementations encapsulate the lane representation, including its byte
/// order, so that the mode itself stays endianness-free. `RATE` is the
/// absorption/squeezing rate r_H in bytes.
pub(crate) trait AbsorbingState: Default {
    const RATE: usize;

    /// XOR a single bit into the most significant bit of the first state
    /// byte. Only valid at a block boundary.
    fn absorb_bit(&mut self, bit: u8);
    /// XOR a byte into the rate, permuting with `R` rounds on a full block.
    fn absorb_byte<R: Unsigned>(&mut self, byte: u8);
    /// XOR bytes into the rate, permuting with `R` rounds after each full
    /// block.
    fn absorb_bytes<R: Unsigned>(&mut self, bytes: &[u8]);
    /// Apply the permutation with `R` rounds.
    fn permute_n<R: Unsigned>(&mut self);
    /// Apply the permutation with `R` rounds if a block is partially
    /// absorbed.
    fn permute_n_if<R: Unsigned>(&mut self);
    /// Flip the least significant bit of the last state byte.
    fn separate_domains(&mut self);
    /// Read the first `LEN` bytes of the serialized state.
    fn extract_bytes<const LEN: usize>(&self) -> [u8; LEN];
    /// Replace `LEN` bytes of the serialized state starting at offset `O`.
    fn overwrite_bytes<const LEN: usize, O: Unsigned>(&mut self, bytes: &[u8; LEN]);
}

/// Parameter bundle of one ISAP instance.
///
/// The round counts are `typenum` constants so that the permutation calls
/// monomorphize per instance; the provided methods implement the AEAD
/// composition shared by all four instances.
pub(crate) trait Isap: AeadCore + Sized {
    /// Key size in bits (IV byte 1).
    type KeySizeBits: Unsigned;
    /// Rate r_H in bits (IV byte 2).
    type RateBits: Unsigned;
    /// Rate r_H in bytes.
    type RateBytes: Unsigned;
    /// Re-keying absorption rate in bits (IV byte 3).
    type RateSessionKeyBits: Unsigned;
    /// Rounds s_K of the re-keying initialization and finalization.
    type RoundsKey: Unsigned;
    /// Rounds s_B of the bit-wise re-keying absorption.
    type RoundsBit: Unsigned;
    /// Rounds s_E of the keystream squeeze.
    type RoundsEncryption: Unsigned;
    /// Rounds s_H of the MAC absorption and finalization.
    type RoundsMAC: Unsigned;
    /// Length of the ENC-mode session key, i.e. the state size minus the 16
    /// trailing nonce bytes.
    type SessionKeyBytes: Unsigned;
    /// The permutation state the instance runs on.
    type State: AbsorbingState;

    /// XOR the rate into a full block of `buffer`.
    fn isap_enc_process_block(state: &Self::State, buffer: &mut [u8]);
    /// XOR the rate into a final block shorter than the rate.
    fn isap_enc_process_bytes(state: Self::State, buffer: &mut [u8]);

    fn encrypt_impl(
        key: &[u8; 16],
        nonce: &[u8; 16],
        associated_data: &[u8],
        buffer: &mut [u8],
    ) -> Result<[u8; 16]> {
        isap_enc::<Self>(key, nonce, buffer);
        Ok(isap_mac::<Self>(key, nonce, associated_data, buffer))
    }

    fn decrypt_impl(
        key: &[u8; 16],
        nonce: &[u8; 16],
        associated_data: &[u8],
        buffer: &mut [u8],
        tag: &Tag<Self>,
    ) -> Result<()> {
        let expected_tag = isap_mac::<Self>(key, nonce, associated_data, buffer);
        if !bool::from(expected_tag[..].ct_eq(tag.as_slice())) {
            return Err(Error);
        }

        isap_enc::<Self>(key, nonce, buffer);
        Ok(())
    }
}

/// Initialization vector ⟨type, k, r_H, r_B, s_H, s_B, s_E, s_K⟩ with all
/// sizes in bits, table 2.3 of the ISAP specification.
fn isap_iv<A: Isap>(flag: u8) -> [u8; 8] {
    [
        flag,
        A::KeySizeBits::U8,
        A::RateBits::U8,
        A::RateSessionKeyBits::U8,
        A::RoundsMAC::U8,
        A::RoundsBit::U8,
        A::RoundsEncryption::U8,
        A::RoundsKey::U8,
    ]
}

/// ISAP_Rk: derive a session key state from the long-term key and a 128 bit
/// string `y`.
///
/// `y` is absorbed one bit per s_B-round permutation call, most significant
/// bit of each byte first; the final bit is followed by s_K rounds instead.
/// This bit-granular schedule is the DPA countermeasure at the heart of
/// ISAP.
fn isap_rk<A: Isap>(key: &[u8; 16], flag: u8, y: &[u8; 16]) -> A::State {
    let mut state = A::State::default();
    state.overwrite_bytes::<16, U0>(key);
    state.overwrite_bytes::<8, U16>(&isap_iv::<A>(flag));
    state.permute_n::<A::RoundsKey>();

    for byte in &y[..15] {
        for bit_index in 0..8 {
            state.absorb_bit((byte >> (7 - bit_index)) & 0x1);
            state.permute_n::<A::RoundsBit>();
        }
    }
    let byte = y[15];
    for bit_index in 0..7 {
        state.absorb_bit((byte >> (7 - bit_index)) & 0x1);
        state.permute_n::<A::RoundsBit>();
    }
    state.absorb_bit(byte & 0x1);
    state.permute_n::<A::RoundsKey>();

    state
}

/// ISAP_Enc: XOR the keystream derived from (key, nonce) into `buffer`.
///
/// The keystream does not depend on the buffer contents, so encryption and
/// decryption are the same operation.
fn isap_enc<A: Isap>(key: &[u8; 16], nonce: &[u8; 16], mut buffer: &mut [u8]) {
    // The re-keying state already holds the session key in its leading
    // n - 16 bytes; placing the nonce in the trailing bytes yields K* ∥ N.
    let mut state = isap_rk::<A>(key, IV_KE, nonce);
    state.overwrite_bytes::<16, A::SessionKeyBytes>(nonce);

    while buffer.len() >= A::RateBytes::USIZE {
        state.permute_n::<A::RoundsEncryption>();
        A::isap_enc_process_block(&state, buffer);
        buffer = &mut buffer[A::RateBytes::USIZE..];
    }

    if !buffer.is_empty() {
        state.permute_n::<A::RoundsEncryption>();
        A::isap_enc_process_bytes(state, buffer);
    }
}

/// Absorb one padded input: `0x80`-then-zeros padding is applied even when
/// the input is block-aligned, so an aligned input gains a full padding
/// block.
fn absorb<A: Isap>(state: &mut A::State, data: &[u8]) {
    state.absorb_bytes::<A::RoundsMAC>(data);
    state.absorb_byte::<A::RoundsMAC>(0x80);
    state.permute_n_if::<A::RoundsMAC>();
}

/// ISAP_Mac: authenticate associated data and ciphertext into a 128 bit tag.
fn isap_mac<A: Isap>(
    key: &[u8; 16],
    nonce: &[u8; 16],
    associated_data: &[u8],
    ciphertext: &[u8],
) -> [u8; 16] {
    let mut state = A::State::default();
    state.overwrite_bytes::<16, U0>(nonce);
    state.overwrite_bytes::<8, U16>(&isap_iv::<A>(IV_A));
    state.permute_n::<A::RoundsMAC>();

    absorb::<A>(&mut state, associated_data);
    state.separate_domains();
    absorb::<A>(&mut state, ciphertext);

    // derive K_A* from the current state and finalize; this is the only
    // place a 16 byte window is written instead of the rate
    let y: [u8; 16] = state.extract_bytes();
    let session_key: [u8; 16] = isap_rk::<A>(key, IV_KA, &y).extract_bytes();
    state.overwrite_bytes::<16, U0>(&session_key);
    state.permute_n::<A::RoundsMAC>();
    state.extract_bytes()
}
