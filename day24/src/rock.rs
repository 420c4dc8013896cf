use std::fmt;

use itertools::Itertools;
use num::{BigInt, BigRational, Signed, Zero};
use tracing::{debug, info, warn};

use crate::elimination::{solve_exact, EliminationError};
use crate::{rational, HailError, Hailstone, Vec3};

/// Three hailstones pin down the rock unless their paths are degenerate.
pub const MIN_OBSERVATIONS: usize = 3;

const UNKNOWNS: usize = 6;
const UNKNOWN_NAMES: [&str; UNKNOWNS] = ["px", "py", "pz", "vx", "vy", "vz"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RockSolver {
    /// How many hailstones from the start of the input build the equations.
    pub observations: usize,
    /// Reject trajectories that only meet a hailstone at a negative time.
    pub forward_only: bool,
}

impl Default for RockSolver {
    fn default() -> Self {
        Self {
            observations: 4,
            forward_only: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RockSolution {
    pub position: [BigRational; 3],
    pub velocity: [BigRational; 3],
    /// Number of leading hailstones whose equations determined the rock.
    pub observations: usize,
    /// Collision time for every hailstone of the input, in input order.
    pub times: Vec<BigRational>,
}

impl RockSolution {
    pub fn position_sum(&self) -> BigRational {
        self.position.iter().sum()
    }

    pub fn position_at(&self, time: &BigRational) -> [BigRational; 3] {
        [0, 1, 2].map(|axis| &self.position[axis] + time * &self.velocity[axis])
    }
}

impl fmt::Display for RockSolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rock = UNKNOWN_NAMES
            .iter()
            .zip(self.position.iter().chain(self.velocity.iter()))
            .map(|(name, value)| format!("{name} = {value}"));
        let times = self
            .times
            .iter()
            .take(self.observations)
            .enumerate()
            .map(|(i, t)| format!("t_{i} = {t}"));

        write!(f, "{}", rock.chain(times).join(", "))
    }
}

fn to_big(v: Vec3) -> [BigInt; 3] {
    v.to_array().map(BigInt::from)
}

fn sub(a: &[BigInt; 3], b: &[BigInt; 3]) -> [BigInt; 3] {
    [&a[0] - &b[0], &a[1] - &b[1], &a[2] - &b[2]]
}

fn cross(a: &[BigInt; 3], b: &[BigInt; 3]) -> [BigInt; 3] {
    [
        &a[1] * &b[2] - &a[2] * &b[1],
        &a[2] * &b[0] - &a[0] * &b[2],
        &a[0] * &b[1] - &a[1] * &b[0],
    ]
}

// Hitting hailstone i means (P - p_i) x (V - v_i) = 0. Taking the difference of
// two such equations cancels P x V and leaves
//   P x (v_a - v_b) + (p_a - p_b) x V = p_a x v_a - p_b x v_b
// which is linear in px, py, pz, vx, vy, vz.
fn pair_equations(a: &Hailstone, b: &Hailstone) -> [[BigInt; UNKNOWNS + 1]; 3] {
    let (pa, va) = (to_big(a.position), to_big(a.velocity));
    let (pb, vb) = (to_big(b.position), to_big(b.velocity));

    let w = sub(&va, &vb);
    let d = sub(&pa, &pb);
    let rhs = sub(&cross(&pa, &va), &cross(&pb, &vb));
    let [rx, ry, rz] = rhs;

    [
        [BigInt::zero(), w[2].clone(), -&w[1], BigInt::zero(), -&d[2], d[1].clone(), rx],
        [-&w[2], BigInt::zero(), w[0].clone(), d[2].clone(), BigInt::zero(), -&d[0], ry],
        [w[1].clone(), -&w[0], BigInt::zero(), -&d[1], d[0].clone(), BigInt::zero(), rz],
    ]
}

fn linear_system(observed: &[Hailstone]) -> Vec<Vec<BigRational>> {
    let (first, rest) = match observed.split_first() {
        Some(split) => split,
        None => return vec![],
    };

    rest.iter()
        .flat_map(|other| pair_equations(first, other))
        .map(|row| row.into_iter().map(BigRational::from_integer).collect())
        .collect()
}

/// Time at which the rock meets `hailstone`, if it does.
///
/// Every axis with differing velocities must agree on the time, and every axis
/// with equal velocities must already have equal positions.
fn collision_time(
    position: &[BigRational; 3],
    velocity: &[BigRational; 3],
    hailstone: &Hailstone,
) -> Option<BigRational> {
    let p = hailstone.position.to_array();
    let v = hailstone.velocity.to_array();

    let mut time: Option<BigRational> = None;
    for axis in 0..3 {
        // P + tV = p + tv  <=>  P - p = t (v - V)
        let gap = &position[axis] - rational(p[axis]);
        let closing = rational(v[axis]) - &velocity[axis];

        if closing.is_zero() {
            if !gap.is_zero() {
                return None;
            }
            continue;
        }

        let t = gap / closing;
        match &time {
            Some(prev) if *prev != t => return None,
            _ => time = Some(t),
        }
    }

    Some(time.unwrap_or_else(BigRational::zero))
}

impl RockSolver {
    pub fn new(observations: usize) -> Self {
        Self {
            observations,
            ..Self::default()
        }
    }

    pub fn forward_only(mut self, forward_only: bool) -> Self {
        self.forward_only = forward_only;
        self
    }

    /// Finds the rock trajectory from the first `observations` hailstones and
    /// checks that it meets every hailstone in `hailstones`.
    pub fn solve(&self, hailstones: &[Hailstone]) -> Result<RockSolution, HailError> {
        if self.observations < MIN_OBSERVATIONS {
            return Err(HailError::InsufficientData {
                needed: MIN_OBSERVATIONS,
                got: self.observations,
            });
        }
        if hailstones.len() < MIN_OBSERVATIONS {
            return Err(HailError::InsufficientData {
                needed: MIN_OBSERVATIONS,
                got: hailstones.len(),
            });
        }

        let observations = self.observations.min(hailstones.len());
        let rows = linear_system(&hailstones[..observations]);
        debug!(
            observations,
            equations = rows.len(),
            "solving linearized rock system"
        );

        let unknowns = solve_exact(rows, UNKNOWNS).map_err(|e| {
            debug!(%e, "elimination failed");
            match e {
                EliminationError::Inconsistent(_) => HailError::NoSolution,
                EliminationError::Underdetermined { rank, .. } => HailError::Ambiguous { rank },
            }
        })?;

        let [px, py, pz, vx, vy, vz]: [BigRational; UNKNOWNS] =
            unknowns.try_into().map_err(|_| HailError::NoSolution)?;
        let position = [px, py, pz];
        let velocity = [vx, vy, vz];

        let times = hailstones
            .iter()
            .enumerate()
            .map(|(index, hailstone)| {
                collision_time(&position, &velocity, hailstone).ok_or_else(|| HailError::Miss {
                    index,
                    hailstone: *hailstone,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        for (index, time) in times.iter().enumerate() {
            if time.is_negative() {
                warn!(index, %time, "rock meets hailstone in the past");
                if self.forward_only {
                    return Err(HailError::PastCollision {
                        index,
                        time: time.clone(),
                    });
                }
            }
        }

        let solution = RockSolution {
            position,
            velocity,
            observations,
            times,
        };
        info!(%solution, "rock trajectory verified against {} hailstones", hailstones.len());

        Ok(solution)
    }
}
