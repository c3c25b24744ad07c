//! Closed form for flocks too large to search exhaustively.
//!
//! Axioms:
//! 1. Never choose 1 as a part since it doesn't increase the product
//!     (except n=1)
//!
//! 2. [3, 1] is no bueno, [2, 2] covers the same heads for 4 instead of 3
//!
//! 3. Any part >= 4 splits into 2s and 3s without losing power, so the
//!     head cap never binds here
//!
//! 4. For n > 4, 3 is preferrable to choose over 2

use num_bigint::BigUint;
use num_traits::One;

use crate::{Power, MAX_HEADS};

pub fn power(n: u32) -> Power {
    let threes = n / 3;
    match n % 3 {
        0 => pow3(threes),
        1 if threes == 0 => Power::one(),
        // swap one 3 for [2, 2]
        1 => pow3(threes - 1) * 4u32,
        2 => pow3(threes) * 2u32,
        _ => unreachable!(),
    }
}

pub fn parts(n: u32) -> Vec<u32> {
    let threes = (n / 3) as usize;
    let parts = match n % 3 {
        0 => vec![3; threes],
        1 if threes == 0 => vec![1],
        // we reduce back to a 4 -> [_, 2, 2]
        1 => {
            let mut parts = vec![3; threes + 1];
            let len = parts.len();
            parts[len - 2] = 2;
            parts[len - 1] = 2;
            parts
        }
        // we reduce back to a 5 -> [_, 3, 2]
        2 => {
            let mut parts = vec![3; threes + 1];
            let len = parts.len();
            parts[len - 1] = 2;
            parts
        }
        _ => unreachable!(),
    };
    debug_assert!(parts.iter().all(|part| (1..=MAX_HEADS).contains(part)));
    parts
}

fn pow3(exp: u32) -> Power {
    BigUint::from(3u8).pow(exp)
}
