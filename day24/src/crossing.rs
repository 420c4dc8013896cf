use std::ops::RangeInclusive;

use itertools::Itertools;
use num::{BigInt, BigRational, Signed, Zero};

use crate::{rational, Hailstone};

/// Whether the XY paths of `a` and `b` cross inside `area`, at a time that is
/// not in the past for either hailstone. Z is ignored.
pub fn crosses_within(a: &Hailstone, b: &Hailstone, area: &RangeInclusive<i64>) -> bool {
    let (va, vb) = (a.velocity, b.velocity);

    // a.p + t * a.v = b.p + s * b.v, solved for t and s with Cramer's rule
    let det = BigInt::from(vb.x) * va.y - BigInt::from(va.x) * vb.y;
    if det.is_zero() {
        return false;
    }

    let dx = BigInt::from(b.position.x) - a.position.x;
    let dy = BigInt::from(b.position.y) - a.position.y;

    let t = BigRational::new(&dy * vb.x - &dx * vb.y, det.clone());
    let s = BigRational::new(&dy * va.x - &dx * va.y, det);
    if t.is_negative() || s.is_negative() {
        return false;
    }

    let x = rational(a.position.x) + &t * rational(va.x);
    let y = rational(a.position.y) + &t * rational(va.y);

    let area = rational(*area.start())..=rational(*area.end());
    area.contains(&x) && area.contains(&y)
}

pub fn count_crossings(hailstones: &[Hailstone], area: &RangeInclusive<i64>) -> usize {
    hailstones
        .iter()
        .tuple_combinations()
        .filter(|(a, b)| crosses_within(a, b, area))
        .count()
}
