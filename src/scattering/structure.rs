// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The directional coefficients of the phase structure function, and the
//! Psaltis et al. (2018) approximation of the structure function itself.

use super::{AnisotropyFamily, AnisotropyParams, ScatteringError};
use crate::{
    constants::QUADRATURE_MAX_DEPTH,
    math::{
        float, gamma, integrate_piecewise, quadrature_tolerance, QuadratureError, ScatteringFloat,
    },
};

/// The prefactor shared by Bmaj and Bmin.
pub fn calc_b_prefac<F: ScatteringFloat>(alpha: F, c: F) -> F {
    let two = float::<F>(2.0);
    c * two.powf(two - alpha) * F::PI().sqrt() / (alpha * gamma((alpha + F::one()) / two))
}

/// Integrate `|axis(ϕ0 − ϕ)|^α Pϕ(ϕ)` over a full turn. The integrand has
/// kinks where the axis function crosses zero and jumps wherever Pϕ does, so
/// the domain is split at all of those.
fn integrate_axis<F, K, Axis>(
    alpha: F,
    params: &AnisotropyParams<F>,
    family: &K,
    axis: Axis,
) -> Result<F, QuadratureError>
where
    F: ScatteringFloat,
    K: AnisotropyFamily,
    Axis: Fn(F) -> F,
{
    let mut breaks = family.discontinuities(params);
    breaks.extend((-4..=4).map(|n| params.phi0 + float::<F>(f64::from(n)) * F::FRAC_PI_2()));
    let integrand = |phi: F| axis(params.phi0 - phi).abs().powf(alpha) * family.p_phi(phi, params);
    integrate_piecewise(
        &integrand,
        F::zero(),
        F::TAU(),
        &breaks,
        quadrature_tolerance(),
        QUADRATURE_MAX_DEPTH,
    )
}

/// The large-separation (r ≫ r_in) structure-function coefficient along the
/// major axis.
pub fn calc_bmaj<F: ScatteringFloat, K: AnisotropyFamily>(
    alpha: F,
    params: &AnisotropyParams<F>,
    family: &K,
    prefac: F,
) -> Result<F, ScatteringError> {
    Ok(prefac * integrate_axis(alpha, params, family, |x: F| x.cos())?)
}

/// The large-separation (r ≫ r_in) structure-function coefficient along the
/// minor axis.
pub fn calc_bmin<F: ScatteringFloat, K: AnisotropyFamily>(
    alpha: F,
    params: &AnisotropyParams<F>,
    family: &K,
    prefac: F,
) -> Result<F, ScatteringError> {
    Ok(prefac * integrate_axis(alpha, params, family, |x: F| x.sin())?)
}

/// The structure function along one axis, blending the quadratic regime
/// `a (r/r_in)²` at small separations into the power law `b (r/r_in)^α` at
/// large ones. `lambda_ratio` is λ / λ0.
pub(crate) fn axis_structure_function<F: ScatteringFloat>(
    alpha: F,
    a: F,
    b: F,
    r_over_rin: F,
    lambda_ratio: F,
) -> F {
    let two = float::<F>(2.0);
    let x = two * a / (alpha * b);
    let y = x.powf(two / (two - alpha)) * r_over_rin * r_over_rin;
    // (1 + y)^(α/2) − 1 without cancellation at small y.
    let blend = (alpha / two * y.ln_1p()).exp_m1();
    lambda_ratio * lambda_ratio * b * x.powf(-alpha / (two - alpha)) * blend
}
