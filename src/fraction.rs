//! Display of ingredient quantities as the simplest equivalent fraction.
//!
//! A quantity like `0.3333333333333333` is really `1/3` that went through a
//! float. [`simplest_from_float`] finds the fraction with the smallest
//! denominator that converts back to exactly the same `f64`, walking the
//! Stern-Brocot tree with galloping steps so large integers or tiny values
//! don't take millions of iterations.

use std::cmp::Ordering;
use std::fmt;

/// Numerators and denominators stay below this so `p as f64 / q as f64` is a
/// correctly rounded division of exact operands.
const MAX_EXACT: u64 = 1 << 53;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fraction {
    pub numer: i64,
    pub denom: u64,
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denom == 1 {
            write!(f, "{}", self.numer)
        } else {
            write!(f, "{}/{}", self.numer, self.denom)
        }
    }
}

/// Simplest fraction that rounds to exactly `value`, or `None` when `value`
/// is not finite or needs more than 53 bits on either side.
pub fn simplest_from_float(value: f64) -> Option<Fraction> {
    if !value.is_finite() {
        return None;
    }
    let sign: i64 = if value < 0.0 { -1 } else { 1 };
    let target = value.abs();

    if target.fract() == 0.0 {
        if target >= MAX_EXACT as f64 {
            return None;
        }
        return Some(Fraction {
            numer: sign * target as i64,
            denom: 1,
        });
    }

    let floor = target.floor() as u64;
    let (mut lp, mut lq) = (floor, 1u64);
    let (mut rp, mut rq) = (floor + 1, 1u64);

    loop {
        let (mp, mq) = (lp + rp, lq + rq);
        if mp >= MAX_EXACT || mq >= MAX_EXACT {
            return None;
        }
        match compare(mp, mq, target) {
            Ordering::Equal => {
                return Some(Fraction {
                    numer: sign * mp as i64,
                    denom: mq,
                })
            }
            Ordering::Less => {
                let k = gallop(|k| {
                    step(lp, lq, rp, rq, k)
                        .is_some_and(|(p, q)| compare(p, q, target) == Ordering::Less)
                });
                lp += k * rp;
                lq += k * rq;
            }
            Ordering::Greater => {
                let k = gallop(|k| {
                    step(rp, rq, lp, lq, k)
                        .is_some_and(|(p, q)| compare(p, q, target) == Ordering::Greater)
                });
                rp += k * lp;
                rq += k * lq;
            }
        }
    }
}

/// Render a quantity the way it appears on an ingredient line.
pub fn format_quantity(quantity: f64) -> String {
    match simplest_from_float(quantity) {
        Some(fraction) => fraction.to_string(),
        None => quantity.to_string(),
    }
}

fn compare(p: u64, q: u64, target: f64) -> Ordering {
    (p as f64 / q as f64)
        .partial_cmp(&target)
        .unwrap_or(Ordering::Equal)
}

/// `(p + k * dp) / (q + k * dq)`, if it stays exactly representable.
fn step(p: u64, q: u64, dp: u64, dq: u64, k: u64) -> Option<(u64, u64)> {
    let p = k.checked_mul(dp)?.checked_add(p)?;
    let q = k.checked_mul(dq)?.checked_add(q)?;
    (p < MAX_EXACT && q < MAX_EXACT).then_some((p, q))
}

/// Largest `k >= 1` for which `holds(k)` is true, given `holds(1)` is true
/// and `holds` is monotone.
fn gallop(holds: impl Fn(u64) -> bool) -> u64 {
    let mut low = 1u64;
    let mut high = 2u64;
    while holds(high) {
        low = high;
        high *= 2;
    }
    while high - low > 1 {
        let mid = low + (high - low) / 2;
        if holds(mid) {
            low = mid;
        } else {
            high = mid;
        }
    }
    low
}
