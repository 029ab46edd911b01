use super::coefficients;
use super::{InvertFlag, SignFlag, Star, Wave};
use crate::core::IntVec;
use crate::engine::error::BasisError;
use crate::core::crystal::SpaceGroup;
use crate::core::mesh::{Mesh, WaveList};
use crate::engine::config::BasisConfig;
use crate::engine::progress::{Progress, ProgressReporter};
use num_complex::Complex64;
use std::cmp::Ordering;
use std::f64::consts::TAU;
use tracing::debug;

/// Waves, stars and lookup produced by a basis build.
pub(super) struct Layout<const D: usize> {
    pub waves: Vec<Wave<D>>,
    pub stars: Vec<Star<D>>,
    /// Wave id of every mesh rank.
    pub wave_ids: Vec<usize>,
    pub n_basis: usize,
}

/// Mesh ranks of one star, in descending minimum-image order, each with its
/// phase factor.
#[derive(Debug, Clone)]
struct Orbit {
    members: Vec<(usize, Complex64)>,
    cancel: bool,
}

impl Orbit {
    fn first_rank(&self) -> usize {
        self.members[0].0
    }

    fn phase_of(&self, rank: usize) -> Option<Complex64> {
        self.members
            .iter()
            .find(|(member, _)| *member == rank)
            .map(|(_, phase)| *phase)
    }

    /// Rescales phases so that the first wave has phase one.
    fn normalized(mut self) -> Self {
        let reference = self.members[0].1.conj();
        for (_, phase) in &mut self.members {
            *phase *= reference;
        }
        self
    }

    /// The orbit of the inverse waves, with conjugated phases.
    fn inverted<const D: usize>(&self, list: &WaveList<D>) -> Self {
        let mesh = list.mesh();
        let mut members: Vec<_> = self
            .members
            .iter()
            .map(|&(rank, phase)| (inverse_rank(mesh, list, rank), phase.conj()))
            .collect();
        sort_descending(&mut members, list);
        Self {
            members,
            cancel: self.cancel,
        }
    }
}

enum Unit {
    /// A self-inverse orbit with the phase of the inverse of its first wave.
    Closed(Orbit, Complex64),
    Pair(Orbit, Orbit),
}

struct RankedUnit<const D: usize> {
    sq_norm: f64,
    key: IntVec<D>,
    unit: Unit,
}

fn inverse_rank<const D: usize>(mesh: &Mesh<D>, list: &WaveList<D>, rank: usize) -> usize {
    mesh.wrapped_rank(&list.minimum_image(rank).map(|g| -g))
}

fn sort_descending<const D: usize>(members: &mut [(usize, Complex64)], list: &WaveList<D>) {
    members.sort_by(|a, b| list.minimum_image(b.0).cmp(list.minimum_image(a.0)));
}

/// Applies every group operation to the seed wave, recording the phase of
/// each image. Two operations reaching the same wave with different phases
/// cancel the orbit.
///
/// Every image must share the seed's `|G|²`; otherwise the group does not
/// fit the unit cell.
fn trace_orbit<const D: usize>(
    seed: usize,
    list: &WaveList<D>,
    group: &SpaceGroup<D>,
    config: &BasisConfig,
) -> Result<Orbit, BasisError> {
    let mesh = list.mesh();
    let seed_bz = list.minimum_image(seed);
    let seed_ksq = list.ksq(seed);
    let width = config.norm_tolerance * seed_ksq.abs().max(1.0);
    let mut members: Vec<(usize, Complex64)> = Vec::with_capacity(group.order());
    let mut cancel = false;
    for symmetry in group.iter() {
        let rank = mesh.wrapped_rank(&symmetry.apply_to_wave(seed_bz));
        if (list.ksq(rank) - seed_ksq).abs() > width {
            return Err(BasisError::MetricInconsistency(format!(
                "operation '{symmetry}' maps wave {:?} (|G|² = {seed_ksq:.6e}) to {:?} (|G|² = {:.6e}); the group does not fit the unit cell",
                seed_bz,
                list.minimum_image(rank),
                list.ksq(rank)
            )));
        }
        let phase = Complex64::from_polar(1.0, TAU * symmetry.phase_fraction(seed_bz));
        let existing = members
            .iter()
            .find(|(member, _)| *member == rank)
            .map(|&(_, p)| p);
        match existing {
            Some(existing) => {
                if (existing - phase).norm() > config.phase_tolerance {
                    cancel = true;
                }
            }
            None => members.push((rank, phase)),
        }
    }
    sort_descending(&mut members, list);
    Ok(Orbit { members, cancel })
}

pub(super) fn build_layout<const D: usize>(
    list: &WaveList<D>,
    group: &SpaceGroup<D>,
    config: &BasisConfig,
    reporter: &ProgressReporter,
) -> Result<Layout<D>, BasisError> {
    let mesh = list.mesh();
    let n_wave = list.len();
    let mut visited = vec![false; n_wave];
    let mut units: Vec<RankedUnit<D>> = Vec::new();

    reporter.report(Progress::TaskStart {
        total_steps: n_wave as u64,
    });
    for seed in 0..n_wave {
        if visited[seed] {
            continue;
        }
        let orbit = trace_orbit(seed, list, group, config)?;
        let mut steps = orbit.members.len();
        for &(rank, _) in &orbit.members {
            visited[rank] = true;
        }

        let unit = if orbit.phase_of(inverse_rank(mesh, list, seed)).is_some() {
            let orbit = orbit.normalized();
            let inverse = orbit
                .phase_of(inverse_rank(mesh, list, orbit.first_rank()))
                .ok_or_else(|| {
                    BasisError::Inconsistent(format!(
                        "closed orbit of wave {:?} lacks the inverse of its first wave",
                        list.minimum_image(seed)
                    ))
                })?;
            Unit::Closed(orbit, inverse)
        } else {
            let partner = orbit.inverted(list);
            for &(rank, _) in &partner.members {
                visited[rank] = true;
            }
            steps += partner.members.len();
            let orbit_first = list.minimum_image(orbit.first_rank());
            let partner_first = list.minimum_image(partner.first_rank());
            let first = if orbit_first > partner_first {
                orbit.normalized()
            } else {
                partner.normalized()
            };
            let second = first.inverted(list);
            Unit::Pair(first, second)
        };

        let head = match &unit {
            Unit::Closed(orbit, _) | Unit::Pair(orbit, _) => orbit.first_rank(),
        };
        units.push(RankedUnit {
            sq_norm: list.ksq(head),
            key: *list.minimum_image(head),
            unit,
        });
        reporter.report(Progress::TaskAdvance {
            steps: steps as u64,
        });
    }
    reporter.report(Progress::TaskFinish);

    order_units(&mut units, config.norm_tolerance);
    Ok(flatten(units, list, config))
}

/// Sorts by decreasing norm, then orders each shell of (nearly) equal norms
/// by characteristic wave, descending.
fn order_units<const D: usize>(units: &mut [RankedUnit<D>], tolerance: f64) {
    units.sort_by(|a, b| b.sq_norm.total_cmp(&a.sq_norm));
    let mut start = 0;
    while start < units.len() {
        let reference = units[start].sq_norm;
        let width = tolerance * reference.abs().max(1.0);
        let end = units[start..]
            .iter()
            .position(|unit| (reference - unit.sq_norm).abs() > width)
            .map_or(units.len(), |offset| start + offset);
        units[start..end].sort_by(|a, b| match b.key.cmp(&a.key) {
            Ordering::Equal => b.sq_norm.total_cmp(&a.sq_norm),
            other => other,
        });
        start = end;
    }
}

fn flatten<const D: usize>(
    units: Vec<RankedUnit<D>>,
    list: &WaveList<D>,
    config: &BasisConfig,
) -> Layout<D> {
    let mut layout = Layout {
        waves: Vec::with_capacity(list.len()),
        stars: Vec::with_capacity(units.len()),
        wave_ids: vec![0; list.len()],
        n_basis: 0,
    };
    for ranked in units {
        match ranked.unit {
            Unit::Closed(orbit, inverse) => {
                let (coeffs, sign_flag) = if orbit.cancel {
                    (coefficients::cancelled(orbit.members.len()), SignFlag::Even)
                } else {
                    let phases: Vec<_> = orbit.members.iter().map(|(_, p)| *p).collect();
                    coefficients::closed_star(&phases, inverse, config.phase_tolerance)
                };
                push_star(&mut layout, list, &orbit, coeffs, InvertFlag::Closed, sign_flag);
            }
            Unit::Pair(first, second) => {
                for (orbit, flag, sign) in [
                    (&first, InvertFlag::First, SignFlag::Even),
                    (&second, InvertFlag::Second, SignFlag::Odd),
                ] {
                    let (coeffs, sign) = if orbit.cancel {
                        (coefficients::cancelled(orbit.members.len()), SignFlag::Even)
                    } else {
                        let phases: Vec<_> = orbit.members.iter().map(|(_, p)| *p).collect();
                        (coefficients::paired_star(&phases), sign)
                    };
                    push_star(&mut layout, list, orbit, coeffs, flag, sign);
                }
            }
        }
    }
    let n_cancel = layout.stars.iter().filter(|star| star.cancel).count();
    debug!(
        n_star = layout.stars.len(),
        n_cancel, "Ordered stars into shells."
    );
    layout
}

fn push_star<const D: usize>(
    layout: &mut Layout<D>,
    list: &WaveList<D>,
    orbit: &Orbit,
    coeffs: Vec<Complex64>,
    invert_flag: InvertFlag,
    sign_flag: SignFlag,
) {
    let mesh = list.mesh();
    let star_id = layout.stars.len();
    let begin_id = layout.waves.len();
    for (&(rank, _), coeff) in orbit.members.iter().zip(coeffs) {
        layout.wave_ids[rank] = layout.waves.len();
        layout.waves.push(Wave {
            coeff,
            sq_norm: list.ksq(rank),
            indices_dft: mesh.position(rank).map(|p| p as i32),
            indices_bz: *list.minimum_image(rank),
            star_id,
            implicit: list.is_implicit(rank),
        });
    }
    let end_id = layout.waves.len() - 1;
    let characteristic = match invert_flag {
        InvertFlag::Second => end_id,
        _ => begin_id,
    };
    let basis_id = if orbit.cancel {
        None
    } else {
        layout.n_basis += 1;
        Some(layout.n_basis - 1)
    };
    layout.stars.push(Star {
        size: orbit.members.len(),
        begin_id,
        end_id,
        invert_flag,
        sign_flag,
        wave_bz: layout.waves[characteristic].indices_bz,
        cancel: orbit.cancel,
        basis_id,
    });
}
