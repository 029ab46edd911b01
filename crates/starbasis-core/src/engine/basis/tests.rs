use super::*;
use crate::core::crystal::SpaceSymmetry;
use crate::core::field::DftField;
use approx::assert_relative_eq;

fn build<const D: usize>(
    dimensions: [usize; D],
    lattice: Lattice,
    parameters: &[f64],
    group: &str,
) -> Basis<D> {
    let mesh = Mesh::new(dimensions).unwrap();
    let cell = UnitCell::new(lattice, parameters).unwrap();
    let group = SpaceGroup::from_name(group).unwrap();
    Basis::build(&mesh, &cell, &group, BasisConfig::default()).unwrap()
}

fn sample(n: usize) -> Vec<f64> {
    (0..n).map(|i| ((i as f64 + 1.0) * 0.37).sin()).collect()
}

fn assert_round_trip<const D: usize>(basis: &Basis<D>) {
    let components = sample(basis.n_basis());
    let dft = basis.components_to_dft(&components).unwrap();
    let recovered = basis.dft_to_components(&dft).unwrap();
    for (a, b) in components.iter().zip(recovered.iter()) {
        assert_relative_eq!(a, b, epsilon = 1e-10);
    }
}

#[test]
fn identity_group_gives_one_star_per_wave() {
    let basis = build([4, 4], Lattice::Square, &[1.0], "p 1");
    assert_eq!(basis.n_wave(), 16);
    assert_eq!(basis.n_star(), 16);
    assert_eq!(basis.n_basis(), 16);
    assert!(basis.stars().iter().all(|star| !star.cancel && star.size == 1));
    basis.validate().unwrap();
}

#[test]
fn homogeneous_component_round_trips() {
    let basis = build([4, 4], Lattice::Square, &[1.0], "p 1");
    let mut components = vec![0.0; basis.n_basis()];
    let origin = basis.wave_by_indices(&[0, 0]).unwrap();
    let origin_basis = basis.star(origin.star_id).unwrap().basis_id.unwrap();
    components[origin_basis] = 1.0;

    let dft = basis.components_to_dft(&components).unwrap();
    assert_relative_eq!(dft[0].re, 1.0);
    assert!(dft.iter().skip(1).all(|c| c.norm() < 1e-14));
    assert_eq!(basis.dft_to_components(&dft).unwrap(), components);
}

#[test]
fn stars_are_ordered_by_decreasing_norm_then_index() {
    let basis = build([4, 4], Lattice::Square, &[1.0], "p 1");
    let first = &basis.stars()[0];
    assert_eq!(first.wave_bz, [2, 2]);
    let last = basis.stars().last().unwrap();
    assert_eq!(last.wave_bz, [0, 0]);
    assert_eq!(last.basis_id, Some(15));

    let bz: Vec<_> = basis.stars()[1..5].iter().map(|s| s.wave_bz).collect();
    assert_eq!(bz, vec![[2, 1], [2, -1], [1, 2], [-1, 2]]);
    assert_eq!(basis.stars()[1].invert_flag, InvertFlag::First);
    assert_eq!(basis.stars()[2].invert_flag, InvertFlag::Second);

    for pair in basis.stars().windows(2) {
        let a = basis.wave(pair[0].characteristic_id()).unwrap().sq_norm;
        let b = basis.wave(pair[1].characteristic_id()).unwrap().sq_norm;
        assert!(a >= b - 1e-9);
    }
}

#[test]
fn centrosymmetric_group_has_only_closed_even_stars() {
    let basis = build([4, 4], Lattice::Square, &[1.0], "p 2");
    assert_eq!(basis.n_star(), 10);
    assert_eq!(basis.n_basis(), 10);
    for star in basis.stars() {
        assert_eq!(star.invert_flag, InvertFlag::Closed);
        assert_eq!(star.sign_flag, SignFlag::Even);
        let first = basis.wave(star.begin_id).unwrap();
        assert!(first.coeff.im.abs() < 1e-12 && first.coeff.re > 0.0);
    }
    basis.validate().unwrap();
    assert_round_trip(&basis);
}

#[test]
fn glide_plane_cancels_odd_reflections() {
    let basis = build([4, 4], Lattice::Square, &[1.0], "p g");
    let cancelled = basis
        .waves()
        .iter()
        .filter(|wave| basis.stars()[wave.star_id].cancel)
        .count();
    assert_eq!(cancelled, 4);

    let wave = basis.wave_by_indices(&[0, 1]).unwrap();
    let star = basis.star(wave.star_id).unwrap();
    assert!(star.cancel);
    assert_eq!(star.basis_id, None);
    assert_eq!(wave.coeff, Complex64::new(0.0, 0.0));
    assert!(!basis.stars()[basis.wave_by_indices(&[0, 2]).unwrap().star_id].cancel);

    basis.validate().unwrap();
    assert_round_trip(&basis);
}

#[test]
fn screw_axis_cancels_odd_axial_reflections() {
    let basis = build([4, 4, 4], Lattice::Monoclinic, &[1.0, 1.1, 1.2, 1.7], "P_1_21_1");
    let wave = basis.wave_by_indices(&[0, 1, 0]).unwrap();
    assert!(basis.star(wave.star_id).unwrap().cancel);
    let wave = basis.wave_by_indices(&[0, 2, 0]).unwrap();
    assert!(!basis.star(wave.star_id).unwrap().cancel);
    basis.validate().unwrap();
    assert_round_trip(&basis);
}

#[test]
fn mirror_without_inversion_forms_pairs() {
    let basis = build([4, 4], Lattice::Rectangular, &[1.0, 1.3], "p m");
    let wave = basis.wave_by_indices(&[1, 1]).unwrap();
    let star = basis.star(wave.star_id).unwrap();
    assert_eq!(star.size, 2);
    let partner_id = match star.invert_flag {
        InvertFlag::First => wave.star_id + 1,
        InvertFlag::Second => wave.star_id - 1,
        InvertFlag::Closed => panic!("star of (1, 1) should not be closed"),
    };
    let partner = basis.star(partner_id).unwrap();
    assert_eq!(partner.size, star.size);
    assert_ne!(partner.invert_flag, star.invert_flag);
    assert_eq!(
        partner.basis_id.unwrap().abs_diff(star.basis_id.unwrap()),
        1
    );

    let first = if star.invert_flag == InvertFlag::First { star } else { partner };
    assert_eq!(first.sign_flag, SignFlag::Even);
    basis.validate().unwrap();
    assert_round_trip(&basis);
}

#[test]
fn off_origin_inversion_gives_odd_star() {
    let mesh = Mesh::new([4]).unwrap();
    let cell = UnitCell::new(Lattice::Lamellar, &[1.0]).unwrap();
    let group = SpaceGroup::from_generators("shifted", &[SpaceSymmetry::new([[-1]], [0.5])]).unwrap();
    let basis = Basis::build(&mesh, &cell, &group, BasisConfig::default()).unwrap();

    assert_eq!(basis.n_star(), 3);
    assert_eq!(basis.n_basis(), 3);
    let flags: Vec<_> = basis.stars().iter().map(|s| s.sign_flag).collect();
    assert_eq!(flags, vec![SignFlag::Even, SignFlag::Odd, SignFlag::Even]);

    let odd = basis.wave_by_indices(&[1]).unwrap();
    assert_relative_eq!(odd.coeff.re, 0.0, epsilon = 1e-12);
    assert_relative_eq!(odd.coeff.im, -1.0 / 2.0_f64.sqrt(), epsilon = 1e-12);
    basis.validate().unwrap();
    assert_round_trip(&basis);
}

#[test]
fn two_fold_rotation_keeps_fixed_waves_closed_and_pairs_generic_ones() {
    let basis = build([4, 4, 4], Lattice::Monoclinic, &[1.0, 1.1, 1.2, 1.7], "P 1 2 1");

    let origin = basis.wave_by_indices(&[0, 0, 0]).unwrap();
    let origin_star = basis.star(origin.star_id).unwrap();
    assert_eq!(origin_star.invert_flag, InvertFlag::Closed);
    assert_eq!(origin_star.invert_flag.value(), 0);

    let generic = basis.wave_by_indices(&[1, 1, 1]).unwrap();
    let star = basis.star(generic.star_id).unwrap();
    assert_eq!(star.size, 2);
    let (first, second) = match star.invert_flag {
        InvertFlag::First => (generic.star_id, generic.star_id + 1),
        InvertFlag::Second => (generic.star_id - 1, generic.star_id),
        InvertFlag::Closed => panic!("star of (1, 1, 1) should be paired"),
    };
    assert_eq!(basis.star(first).unwrap().invert_flag.value(), 1);
    assert_eq!(basis.star(second).unwrap().invert_flag.value(), -1);
    basis.validate().unwrap();
    assert_round_trip(&basis);
}

#[test]
fn higher_symmetry_groups_round_trip() {
    assert_round_trip(&build([8, 8], Lattice::Square, &[1.0], "p 4 m m"));
    assert_round_trip(&build([8, 8], Lattice::Square, &[1.0], "p 4 g m"));
    assert_round_trip(&build([12, 12], Lattice::Hexagonal2D, &[1.0], "p 6 m m"));
    assert_round_trip(&build([8, 6], Lattice::Rectangular, &[1.0, 1.5], "c 2 m m"));
    assert_round_trip(&build([8, 8, 8], Lattice::Cubic, &[1.0], "I m -3 m"));
    assert_round_trip(&build([4, 4, 8], Lattice::Orthorhombic, &[1.0, 1.2, 2.0], "P 21 21 21"));
}

#[test]
fn asymmetric_input_is_rejected_but_projectable() {
    let basis = build([4, 4], Lattice::Square, &[1.0], "p 2");
    let mesh = *basis.mesh().unwrap();
    let mut dft = DftField::new(&mesh);
    // (1, 0) and (3, 0) are both stored explicitly.
    dft[3] = Complex64::new(0.0, 1.0);
    dft[9] = Complex64::new(0.0, 1.0);

    let err = basis.dft_to_components(&dft).unwrap_err();
    assert!(matches!(err, BasisError::SymmetryViolation { .. }));

    let mut components = vec![0.0; basis.n_basis()];
    basis.project_dft_to_components(&dft, &mut components).unwrap();
    assert!(components.iter().all(|c| c.abs() < 1e-12));
    assert!(!basis.has_symmetry(&dft, 1e-8).unwrap());

    let symmetric = basis.components_to_dft(&sample(basis.n_basis())).unwrap();
    assert!(basis.has_symmetry(&symmetric, 1e-8).unwrap());
}

#[test]
fn length_mismatches_are_reported() {
    let basis = build([4, 4], Lattice::Square, &[1.0], "p 4");
    let err = basis.components_to_dft(&[1.0]).unwrap_err();
    assert!(matches!(err, BasisError::LengthMismatch { found: 1, .. }));
    let other = DftField::new(&Mesh::new([8, 8]).unwrap());
    assert!(basis.dft_to_components(&other).is_err());
}

#[test]
fn incompatible_mesh_is_rejected() {
    let mesh = Mesh::new([4, 6]).unwrap();
    let cell = UnitCell::new(Lattice::Square, &[1.0]).unwrap();
    let group = SpaceGroup::from_name("p 4").unwrap();
    let err = Basis::build(&mesh, &cell, &group, BasisConfig::default()).unwrap_err();
    assert!(matches!(err, BasisError::IncompatibleMesh { .. }));
}

#[test]
fn group_that_does_not_fit_the_cell_is_rejected() {
    let mesh = Mesh::new([4, 4]).unwrap();
    let cell = UnitCell::new(Lattice::Rectangular, &[1.0, 2.0]).unwrap();
    let group = SpaceGroup::from_name("p 4").unwrap();
    let mut basis = Basis::<2>::default();
    let err = basis.make_basis(&mesh, &cell, &group).unwrap_err();
    assert!(matches!(err, BasisError::MetricInconsistency(_)));
    assert!(!basis.is_initialized());
    assert_eq!(basis.n_star(), 0);
}

#[test]
fn validate_detects_mixed_and_misordered_norms() {
    let basis = build([8, 8], Lattice::Square, &[1.0], "p 4 m m");
    basis.validate().unwrap();

    let mut mixed = basis.clone();
    let star = mixed.stars.iter().find(|star| star.size > 1).unwrap().clone();
    mixed.waves[star.end_id].sq_norm *= 2.0;
    assert!(matches!(mixed.validate(), Err(BasisError::Inconsistent(_))));

    let mut misordered = basis.clone();
    let last = misordered.stars.last().unwrap().clone();
    assert_eq!(last.size, 1);
    misordered.waves[last.begin_id].sq_norm = 1.0e6;
    assert!(matches!(misordered.validate(), Err(BasisError::Inconsistent(_))));
}

#[test]
fn stars_keep_their_order_after_a_metric_update() {
    let mut basis = build([8, 8], Lattice::Rectangular, &[1.0, 1.3], "p 2 m m");
    let cell = UnitCell::new(Lattice::Rectangular, &[1.0, 4.0]).unwrap();
    basis.update(&cell).unwrap();
    basis.validate().unwrap();
}

#[test]
fn unknown_group_and_unset_cell_are_rejected() {
    let mesh = Mesh::new([4, 4]).unwrap();
    let cell = UnitCell::new(Lattice::Square, &[1.0]).unwrap();
    let mut basis = Basis::<2>::default();
    let err = basis.make_basis_from_name(&mesh, &cell, "p 7").unwrap_err();
    assert!(matches!(err, BasisError::InvalidGroupName { .. }));

    let group = SpaceGroup::from_name("p 1").unwrap();
    let err = basis
        .make_basis(&mesh, &UnitCell::default(), &group)
        .unwrap_err();
    assert!(matches!(err, BasisError::MetricInconsistency(_)));
    assert!(!basis.is_initialized());
}

#[test]
fn uninitialized_basis_refuses_queries() {
    let basis = Basis::<3>::default();
    assert_eq!(basis.tables().unwrap_err(), BasisError::Uninitialized);
    assert_eq!(basis.wave_id(&[0, 0, 0]).unwrap_err(), BasisError::Uninitialized);
    assert_eq!(basis.dksq(0, 0).unwrap_err(), BasisError::Uninitialized);
    assert!(matches!(
        basis.wave(0).unwrap_err(),
        BasisError::IndexOutOfRange { kind: "wave", .. }
    ));
}

#[test]
fn update_rescales_norms_and_keeps_stars() {
    let mut basis = build([8, 8], Lattice::Square, &[1.0], "p 4 m m");
    let stars_before = basis.stars().to_vec();
    let norms_before: Vec<f64> = basis.waves().iter().map(|w| w.sq_norm).collect();

    let cell = UnitCell::new(Lattice::Square, &[2.0]).unwrap();
    basis.update(&cell).unwrap();
    basis.make_dksq(&cell).unwrap();

    assert_eq!(basis.stars(), stars_before.as_slice());
    for (wave, before) in basis.waves().iter().zip(norms_before) {
        assert_relative_eq!(wave.sq_norm, before / 4.0, epsilon = 1e-10);
    }
    for (id, star) in basis.stars().iter().enumerate() {
        let ksq = basis.wave(star.characteristic_id()).unwrap().sq_norm;
        assert_relative_eq!(basis.dksq(0, id).unwrap(), -ksq, epsilon = 1e-9);
    }
    assert!(matches!(
        basis.dksq(1, 0).unwrap_err(),
        BasisError::IndexOutOfRange { kind: "cell parameter", .. }
    ));
}

#[test]
fn update_with_other_lattice_is_rejected() {
    let mut basis = build([4, 4], Lattice::Square, &[1.0], "p 1");
    let cell = UnitCell::new(Lattice::Rectangular, &[1.0, 2.0]).unwrap();
    let err = basis.update(&cell).unwrap_err();
    assert_eq!(
        err,
        BasisError::LatticeMismatch {
            expected: Lattice::Square,
            found: Lattice::Rectangular
        }
    );
}

#[test]
fn tables_are_shared_between_clones() {
    let basis = build([4], Lattice::Lamellar, &[1.0], "-1");
    let tables = basis.tables().unwrap();
    assert_eq!(tables.n_wave(), 4);
    assert_eq!(tables.dft_size(), 3);
    assert_eq!(tables.n_basis(), basis.n_basis());
    let other = basis.clone();
    assert!(Arc::ptr_eq(&tables, &other.tables().unwrap()));
}
