// Copyright 2022 Sebastian Ramacher
// SPDX-License-Identifier: MIT

//! The Keccak-p[400] permutation.
//!
//! The state consists of twenty-five 16 bit lanes in row-major order: the
//! lane at coordinates (x, y) sits at index `5 * y + x`. Byte/lane
//! conversions are little-endian. A reduced-round permutation applies the
//! tail of the 20-round constant schedule, as in FIPS 202.

const ROUNDS: usize = 20;

/// Round constants of Keccak-f[1600] truncated to 16 bit lanes.
const ROUND_CONSTANTS: [u16; ROUNDS] = [
    0x0001, 0x8082, 0x808a, 0x8000, 0x808b, 0x0001, 0x8081, 0x8009, 0x008a, 0x0088, 0x8009,
    0x000a, 0x808b, 0x008b, 0x8089, 0x8003, 0x8002, 0x0080, 0x800a, 0x000a,
];

/// ρ rotation offsets of lanes 1..24, taken mod 16; lane 0 is not rotated.
const ROTATION_OFFSETS: [u32; 24] = [
    1, 14, 12, 11, 4, 12, 6, 7, 4, 3, 10, 11, 9, 7, 9, 13, 15, 5, 8, 2, 2, 13, 8, 14,
];

fn round(state: &mut [u16; 25], rc: u16) {
    // θ
    let mut c = [0u16; 5];
    for x in 0..5 {
        c[x] = state[x] ^ state[x + 5] ^ state[x + 10] ^ state[x + 15] ^ state[x + 20];
    }
    for x in 0..5 {
        let d = c[(x + 4) % 5] ^ c[(x + 1) % 5].rotate_left(1);
        for y in 0..5 {
            state[5 * y + x] ^= d;
        }
    }

    // ρ
    for i in 1..25 {
        state[i] = state[i].rotate_left(ROTATION_OFFSETS[i - 1]);
    }

    // π
    let mut b = [0u16; 25];
    for y in 0..5 {
        for x in 0..5 {
            b[5 * y + x] = state[5 * x + (x + 3 * y) % 5];
        }
    }

    // χ
    for y in 0..5 {
        for x in 0..5 {
            state[5 * y + x] = b[5 * y + x] ^ (!b[5 * y + (x + 1) % 5] & b[5 * y + (x + 2) % 5]);
        }
    }

    // ι
    state[0] ^= rc;
}

/// Apply the last `rounds` rounds of the 20-round schedule.
pub(crate) fn keccak_p(state: &mut [u16; 25], rounds: usize) {
    debug_assert!((1..=ROUNDS).contains(&rounds));
    for &rc in &ROUND_CONSTANTS[ROUNDS - rounds..] {
        round(state, rc);
    }
}
