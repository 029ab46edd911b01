use super::SignFlag;
use num_complex::Complex64;
use std::f64::consts::PI;

pub(super) fn cancelled(size: usize) -> Vec<Complex64> {
    vec![Complex64::new(0.0, 0.0); size]
}

/// Coefficients of a closed star.
///
/// `phases` are relative to the first wave `G0` and `inverse_phase` is the
/// phase of `-G0`, `exp(iθ)` with `θ ∈ (-π, π]`. Rotating every phase by
/// `exp(-iθ/2)` makes `c(-G) = conj(c(G))`. The star is odd exactly when
/// `θ ≈ π`; `θ ≈ -π` is treated as `π`.
pub(super) fn closed_star(
    phases: &[Complex64],
    inverse_phase: Complex64,
    tolerance: f64,
) -> (Vec<Complex64>, SignFlag) {
    let mut theta = inverse_phase.arg();
    if theta < -PI + tolerance {
        theta = PI;
    }
    let sign = if (theta - PI).abs() < tolerance {
        SignFlag::Odd
    } else {
        SignFlag::Even
    };
    let rotation = Complex64::from_polar(1.0 / (phases.len() as f64).sqrt(), -0.5 * theta);
    (phases.iter().map(|&p| p * rotation).collect(), sign)
}

/// Coefficients of one star of an inversion pair, normalized so that the
/// pair together has unit norm.
pub(super) fn paired_star(phases: &[Complex64]) -> Vec<Complex64> {
    let scale = 1.0 / (2.0 * phases.len() as f64).sqrt();
    phases.iter().map(|&p| p * scale).collect()
}
