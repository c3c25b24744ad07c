//! Exhaustive search over non-decreasing partitions.
//!
//! Both searches scan the next part from `min_part` up to `cap`, so every
//! multiset of parts is visited exactly once. The best completion of a
//! remainder only depends on `(remaining, min_part)`, which lets the
//! recursion return it directly instead of threading the partial product.

use im::Vector;
use num_traits::One;

use crate::Power;

/// Best product over all non-decreasing partitions of `remaining` with parts
/// in `min_part..=cap`, `None` if there is no such partition.
pub fn best_power(remaining: u32, min_part: u32, cap: u32) -> Option<Power> {
    debug_assert_ne!(min_part, 0);
    if remaining == 0 {
        return Some(Power::one());
    }

    (min_part..=cap.min(remaining))
        .filter_map(|part| best_power(remaining - part, part, cap).map(|rest| rest * part))
        .max()
}

/// Same search as [`best_power`] but keeps the parts.
///
/// On ties the partition with the smallest leading part wins.
pub fn best_parts(remaining: u32, min_part: u32, cap: u32) -> Option<Vector<u32>> {
    debug_assert_ne!(min_part, 0);
    if remaining == 0 {
        return Some(Vector::new());
    }

    (min_part..=cap.min(remaining))
        // `max_by_key` keeps the last maximum
        .rev()
        .filter_map(|part| {
            best_parts(remaining - part, part, cap).map(|mut rest| {
                rest.push_front(part);
                rest
            })
        })
        .max_by_key(prod)
}

fn prod(parts: &Vector<u32>) -> Power {
    parts.iter().copied().map(Power::from).product()
}
