// Copyright 2022 Sebastian Ramacher
// SPDX-License-Identifier: MIT

//! C-ABI wrappers around the four ISAP instances.
//!
//! Each instance is exposed as an `encrypt`/`decrypt` pair with raw
//! pointer/length buffers. Keys, nonces and tags are fixed 16 byte buffers;
//! associated data and message buffers carry explicit lengths and may be
//! null when their length is zero. The decrypt functions return the
//! verification flag; on failure the plaintext buffer is zeroed so that no
//! keystream-derived bytes reach the caller.
//!
//! # Safety
//!
//! All pointers must be valid for the advertised lengths and must not alias
//! each other. Violating either contract is undefined behavior, exactly as
//! for the equivalent C prototypes.

use core::slice;

use crate::{isap_enc, isap_mac, Isap, IsapA128, IsapA128A, IsapK128, IsapK128A};
use subtle::ConstantTimeEq;

unsafe fn slice_or_empty<'a>(data: *const u8, len: usize) -> &'a [u8] {
    if len == 0 {
        &[]
    } else {
        slice::from_raw_parts(data, len)
    }
}

unsafe fn slice_or_empty_mut<'a>(data: *mut u8, len: usize) -> &'a mut [u8] {
    if len == 0 {
        &mut []
    } else {
        slice::from_raw_parts_mut(data, len)
    }
}

unsafe fn encrypt_raw<A: Isap>(
    key: *const u8,
    nonce: *const u8,
    data: *const u8,
    data_len: usize,
    msg: *const u8,
    cipher: *mut u8,
    msg_len: usize,
    tag: *mut u8,
) {
    let key = &*(key as *const [u8; 16]);
    let nonce = &*(nonce as *const [u8; 16]);
    let associated_data = slice_or_empty(data, data_len);

    if msg_len != 0 {
        core::ptr::copy_nonoverlapping(msg, cipher, msg_len);
    }
    let buffer = slice_or_empty_mut(cipher, msg_len);

    isap_enc::<A>(key, nonce, buffer);
    let computed_tag = isap_mac::<A>(key, nonce, associated_data, buffer);
    core::ptr::copy_nonoverlapping(computed_tag.as_ptr(), tag, 16);
}

unsafe fn decrypt_raw<A: Isap>(
    key: *const u8,
    nonce: *const u8,
    tag: *const u8,
    data: *const u8,
    data_len: usize,
    cipher: *const u8,
    msg: *mut u8,
    msg_len: usize,
) -> bool {
    let key = &*(key as *const [u8; 16]);
    let nonce = &*(nonce as *const [u8; 16]);
    let tag = &*(tag as *const [u8; 16]);
    let associated_data = slice_or_empty(data, data_len);

    if msg_len != 0 {
        core::ptr::copy_nonoverlapping(cipher, msg, msg_len);
    }
    let buffer = slice_or_empty_mut(msg, msg_len);

    let expected_tag = isap_mac::<A>(key, nonce, associated_data, buffer);
    if !bool::from(expected_tag[..].ct_eq(&tag[..])) {
        buffer.fill(0);
        return false;
    }

    isap_enc::<A>(key, nonce, buffer);
    true
}

macro_rules! capi_pair {
    ($(#[$doc:meta])* $cipher:ty, $encrypt:ident, $decrypt:ident) => {
        $(#[$doc])*
        ///
        /// `key` and `nonce` are 16 byte buffers; `data` is `data_len` bytes
        /// of associated data; `msg` is `msg_len` bytes of plaintext;
        /// `cipher` receives `msg_len` bytes of ciphertext and `tag` the 16
        /// byte authentication tag.
        ///
        /// # Safety
        ///
        /// See the module documentation for the pointer contracts.
        #[no_mangle]
        pub unsafe extern "C" fn $encrypt(
            key: *const u8,
            nonce: *const u8,
            data: *const u8,
            data_len: usize,
            msg: *const u8,
            cipher: *mut u8,
            msg_len: usize,
            tag: *mut u8,
        ) {
            encrypt_raw::<$cipher>(key, nonce, data, data_len, msg, cipher, msg_len, tag);
        }

        /// Verified decryption counterpart of the matching encrypt function.
        ///
        /// Returns the verification flag; unless it is `true`, the contents
        /// of `msg` (zeroed on failure) must not be consumed.
        ///
        /// # Safety
        ///
        /// See the module documentation for the pointer contracts.
        #[no_mangle]
        pub unsafe extern "C" fn $decrypt(
            key: *const u8,
            nonce: *const u8,
            tag: *const u8,
            data: *const u8,
            data_len: usize,
            cipher: *const u8,
            msg: *mut u8,
            msg_len: usize,
        ) -> bool {
            decrypt_raw::<$cipher>(key, nonce, tag, data, data_len, cipher, msg, msg_len)
        }
    };
}

capi_pair!(
    /// Encrypt with ISAP-A-128A.
    IsapA128A,
    isap_a_128a_encrypt,
    isap_a_128a_decrypt
);
capi_pair!(
    /// Encrypt with ISAP-A-128.
    IsapA128,
    isap_a_128_encrypt,
    isap_a_128_decrypt
);
capi_pair!(
    /// Encrypt with ISAP-K-128A.
    IsapK128A,
    isap_k_128a_encrypt,
    isap_k_128a_decrypt
);
capi_pair!(
    /// Encrypt with ISAP-K-128.
    IsapK128,
    isap_k_128_encrypt,
    isap_k_128_decrypt
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_and_reject() {
        let key = [0x0f; 16];
        let nonce = [0xf0; 16];
        let ad = [1u8, 2, 3];
        let msg = *b"isap over a c abi";
        let mut cipher = [0u8; 17];
        let mut tag = [0u8; 16];

        unsafe {
            isap_a_128a_encrypt(
                key.as_ptr(),
                nonce.as_ptr(),
                ad.as_ptr(),
                ad.len(),
                msg.as_ptr(),
                cipher.as_mut_ptr(),
                msg.len(),
                tag.as_mut_ptr(),
            );
        }
        assert_ne!(cipher, msg);

        let mut plain = [0u8; 17];
        let ok = unsafe {
            isap_a_128a_decrypt(
                key.as_ptr(),
                nonce.as_ptr(),
                tag.as_ptr(),
                ad.as_ptr(),
                ad.len(),
                cipher.as_ptr(),
                plain.as_mut_ptr(),
                plain.len(),
            )
        };
        assert!(ok);
        assert_eq!(plain, msg);

        // a flipped ciphertext bit must zero the output buffer
        cipher[0] ^= 0x01;
        let ok = unsafe {
            isap_a_128a_decrypt(
                key.as_ptr(),
                nonce.as_ptr(),
                tag.as_ptr(),
                ad.as_ptr(),
                ad.len(),
                cipher.as_ptr(),
                plain.as_mut_ptr(),
                plain.len(),
            )
        };
        assert!(!ok);
        assert_eq!(plain, [0u8; 17]);
    }

    #[test]
    fn null_pointers_allowed_for_empty_buffers() {
        let key = [0u8; 16];
        let nonce = [0u8; 16];
        let mut tag = [0u8; 16];

        unsafe {
            isap_k_128_encrypt(
                key.as_ptr(),
                nonce.as_ptr(),
                core::ptr::null(),
                0,
                core::ptr::null(),
                core::ptr::null_mut(),
                0,
                tag.as_mut_ptr(),
            );
            assert!(isap_k_128_decrypt(
                key.as_ptr(),
                nonce.as_ptr(),
                tag.as_ptr(),
                core::ptr::null(),
                0,
                core::ptr::null(),
                core::ptr::null_mut(),
                0,
            ));
        }
    }
}
