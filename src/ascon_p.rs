// Copyright 2022 Sebastian Ramacher
// SPDX-License-Identifier: MIT

//! The Ascon permutation on a 320 bit state.
//!
//! The state consists of five 64 bit lanes. Byte/lane conversions are
//! big-endian: byte offset 0 of the serialized state is the most significant
//! byte of lane 0. A reduced-round permutation applies the tail of the
//! 12-round constant schedule.

use core::ops::{Index, IndexMut};

/// Round constants, table A.2 of the ISAP specification.
const ROUND_CONSTANTS: [u64; 12] = [
    0xf0, 0xe1, 0xd2, 0xc3, 0xb4, 0xa5, 0x96, 0x87, 0x78, 0x69, 0x5a, 0x4b,
];

/// The 320 bit Ascon permutation state.
#[derive(Clone, Debug, Default)]
pub(crate) struct State {
    x: [u64; 5],
}

impl State {
    fn round(&mut self, rc: u64) {
        // addition of the round constant
        self.x[2] ^= rc;

        // substitution layer, bitsliced 5 bit S-box
        self.x[0] ^= self.x[4];
        self.x[4] ^= self.x[3];
        self.x[2] ^= self.x[1];

        let t0 = !self.x[0] & self.x[1];
        let t1 = !self.x[1] & self.x[2];
        let t2 = !self.x[2] & self.x[3];
        let t3 = !self.x[3] & self.x[4];
        let t4 = !self.x[4] & self.x[0];

        self.x[0] ^= t1;
        self.x[1] ^= t2;
        self.x[2] ^= t3;
        self.x[3] ^= t4;
        self.x[4] ^= t0;

        self.x[1] ^= self.x[0];
        self.x[0] ^= self.x[4];
        self.x[3] ^= self.x[2];
        self.x[2] = !self.x[2];

        // linear diffusion layer
        self.x[0] ^= self.x[0].rotate_right(19) ^ self.x[0].rotate_right(28);
        self.x[1] ^= self.x[1].rotate_right(61) ^ self.x[1].rotate_right(39);
        self.x[2] ^= self.x[2].rotate_right(1) ^ self.x[2].rotate_right(6);
        self.x[3] ^= self.x[3].rotate_right(10) ^ self.x[3].rotate_right(17);
        self.x[4] ^= self.x[4].rotate_right(7) ^ self.x[4].rotate_right(41);
    }

    /// Apply the last `rounds` rounds of the 12-round schedule.
    pub(crate) fn permute_n(&mut self, rounds: usize) {
        debug_assert!((1..=12).contains(&rounds));
        for &rc in &ROUND_CONSTANTS[12 - rounds..] {
            self.round(rc);
        }
    }

    pub(crate) fn permute_12(&mut self) {
        for &rc in &ROUND_CONSTANTS {
            self.round(rc);
        }
    }

    pub(crate) fn permute_6(&mut self) {
        self.permute_n(6);
    }

    pub(crate) fn permute_1(&mut self) {
        self.round(ROUND_CONSTANTS[11]);
    }
}

impl Index<usize> for State {
    type Output = u64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.x[index]
    }
}

impl IndexMut<usize> for State {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.x[index]
    }
}
