//! Workload splitting.
//!
//! Splits a weekly lesson volume over a number of positions, preferring
//! round loads and staying inside the workload band.
//!
//! # Algorithm
//!
//! 1. Pick the position count: pinned by the caller, or round(total /
//!    target mean) moved down while loads fall below `min` and up while
//!    they exceed `max`. A pinned count is only ever raised.
//! 2. Every position but the last takes round(total / n), snapped to the
//!    first preferred load within `snap_tolerance`, clamped into
//!    [min, max], then narrowed so the remaining positions can still be
//!    filled within the band. When the band cannot be met at all (a
//!    pinned count on a small volume), the volume is split evenly.
//! 3. The last position takes the remainder.

use crate::config::WorkloadPolicy;

/// Splits `total` weekly lessons into per-position loads.
///
/// Loads always sum to `total` and are each at least 1. With `pinned`
/// set, the result has at least that many positions (fewer only when
/// `total` is smaller than the pinned count).
///
/// ```
/// use u_timetable::config::WorkloadPolicy;
/// use u_timetable::staffing::distribute_workload;
///
/// let policy = WorkloadPolicy::default();
/// assert_eq!(distribute_workload(45, Some(2), &policy), vec![20, 25]);
/// assert_eq!(distribute_workload(100, None, &policy), vec![20, 20, 20, 20, 20]);
/// assert_eq!(distribute_workload(9, None, &policy), vec![9]);
/// ```
pub fn distribute_workload(total: u32, pinned: Option<u32>, policy: &WorkloadPolicy) -> Vec<u32> {
    if total == 0 {
        return Vec::new();
    }
    let max = policy.max.max(1);
    let min = policy.min.min(max);

    let mut n = match pinned {
        Some(n) => n.max(1),
        None => {
            let mut n = round_half_even(total, policy.target_mean.max(1)).max(1);
            while n > 1 && total < min * n {
                n -= 1;
            }
            n
        }
    };
    while total > max * n {
        n += 1;
    }
    let n = n.min(total);

    let target = round_half_even(total, n);
    let mut loads = Vec::with_capacity(n as usize);
    let mut remaining = total;

    for i in 0..n {
        let left = n - i - 1;
        if left == 0 {
            loads.push(remaining);
            break;
        }

        let slots = left + 1;
        let load = if remaining < min * slots {
            // band unreachable for the rest: split what is left evenly
            (remaining + left) / slots
        } else {
            let mut load = target;
            if let Some(&round) = policy
                .preferred
                .iter()
                .find(|&&p| p.abs_diff(target) <= policy.snap_tolerance && p <= remaining)
            {
                load = round;
            }
            // Keep the rest fillable at between `min` and `max` each.
            let floor = remaining.saturating_sub(max * left);
            let ceiling = remaining - min * left;
            load.clamp(min, max).min(ceiling).max(floor)
        };

        loads.push(load);
        remaining -= load;
    }
    loads
}

/// `num / den` rounded to the nearest integer, ties to even.
pub(crate) fn round_half_even(num: u32, den: u32) -> u32 {
    let q = num / den;
    let r = num % den;
    match (2 * r).cmp(&den) {
        std::cmp::Ordering::Less => q,
        std::cmp::Ordering::Greater => q + 1,
        std::cmp::Ordering::Equal => q + (q % 2),
    }
}
