//! Maximum power of a dragon flock.
//!
//! A flock with `n` heads in total is split into dragons of at most
//! [`MAX_HEADS`] heads each. The power of the flock is the product of the
//! head counts of its dragons, so this is the problem of partitioning `n`
//! into parts `1..=MAX_HEADS` with maximum product.
//!
//! Small flocks (up to [`EXHAUSTIVE_LIMIT`] heads) are searched exhaustively,
//! larger ones use the closed form based on threes. Both regimes agree on
//! every flock they can both handle.

mod closed_form;
mod search;

use std::fmt::Display;

use itertools::Itertools;
use num_bigint::BigUint;
use thiserror::Error;
use tracing::{debug, trace};

/// Most heads a single dragon can have.
pub const MAX_HEADS: u32 = 7;

/// Largest flock that is searched exhaustively.
pub const EXHAUSTIVE_LIMIT: u32 = 21;

/// Largest flock the command line accepts.
pub const MAX_FLOCK: u32 = 99;

// only up to here is a lone dragon the unique best split
const SINGLE_DRAGON_LIMIT: u32 = 3;

/// Product of the head counts, grows like `3^(n/3)`.
pub type Power = BigUint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PowerError {
    #[error("a flock needs at least one head, got {n}")]
    InvalidInput { n: u32 },
}

/// Head counts of the dragons in a flock.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Partition(Vec<u32>);

impl Partition {
    pub fn parts(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of heads.
    pub fn heads(&self) -> u32 {
        self.0.iter().sum()
    }

    pub fn power(&self) -> Power {
        self.0.iter().copied().map(Power::from).product()
    }
}

impl From<Vec<u32>> for Partition {
    fn from(parts: Vec<u32>) -> Self {
        Self(parts)
    }
}

impl IntoIterator for Partition {
    type Item = u32;
    type IntoIter = std::vec::IntoIter<u32>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl Display for Partition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().join(" × "))
    }
}

fn validate(n: u32) -> Result<(), PowerError> {
    if n == 0 {
        return Err(PowerError::InvalidInput { n });
    }
    Ok(())
}

/// Maximum power of a flock with `n` heads.
pub fn max_power(n: u32) -> Result<Power, PowerError> {
    validate(n)?;

    let regime = if n <= EXHAUSTIVE_LIMIT {
        "exhaustive"
    } else {
        "closed-form"
    };
    debug!(n, regime, "computing max power");
    let power = compute_power(n);
    trace!(n, %power, "max power");
    Ok(power)
}

fn compute_power(n: u32) -> Power {
    if n <= EXHAUSTIVE_LIMIT {
        // [1; n] always completes, the fallback is never taken
        search::best_power(n, 1, MAX_HEADS).unwrap_or_else(|| Power::from(n))
    } else {
        closed_form::power(n)
    }
}

/// One split of `n` heads whose power is [`max_power`]`(n)`.
pub fn best_partition(n: u32) -> Result<Partition, PowerError> {
    validate(n)?;

    let partition = if n <= SINGLE_DRAGON_LIMIT {
        debug!(n, regime = "single dragon", "recovering partition");
        Partition(vec![n])
    } else if n <= EXHAUSTIVE_LIMIT {
        debug!(n, regime = "exhaustive", "recovering partition");
        search::best_parts(n, 1, MAX_HEADS)
            .map(|parts| parts.into_iter().collect())
            .unwrap_or_else(|| vec![n])
            .into()
    } else {
        debug!(n, regime = "closed-form", "recovering partition");
        closed_form::parts(n).into()
    };
    trace!(n, %partition, "recovered partition");

    debug_assert_eq!(partition.heads(), n);
    debug_assert!(partition
        .parts()
        .iter()
        .all(|part| (1..=MAX_HEADS).contains(part)));
    debug_assert_eq!(partition.power(), compute_power(n));
    Ok(partition)
}
