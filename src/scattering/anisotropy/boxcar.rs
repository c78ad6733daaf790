// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The periodic-boxcar anisotropy kernel.
//!
//! Pϕ takes the constant value (1 + kζ) / 2π, except for angles whose offset
//! from ϕ0 (modulo π) lies strictly inside
//! (π / 2(1 + kζ), π − π / 2(1 + kζ)), where it is zero. Integrating
//! cos(2(ϕ − ϕ0)) against it gives ζ0 = (1 + kζ)/π · sin(π / (1 + kζ)).

use super::{AnisotropyFamily, AnisotropyParams, AnisotropyType};
use crate::{
    math::{float, to_f64, wrap, ScatteringFloat},
    scattering::ScatteringError,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeriodicBoxcar;

/// ζ0 as a function of kζ for the periodic boxcar.
pub fn boxcar_zeta<F: ScatteringFloat>(kzeta: F) -> F {
    let one_plus_k = F::one() + kzeta;
    // sin(π / (1 + k)) = sin(πk / (1 + k)); each argument is kept away from
    // π, where the sine loses all relative precision.
    let sine = if kzeta < F::one() {
        (F::PI() * kzeta / one_plus_k).sin()
    } else {
        (F::PI() / one_plus_k).sin()
    };
    one_plus_k / F::PI() * sine
}

/// Solve (1 + kζ)/π · sin(π / (1 + kζ)) = ζ0 for kζ > 0.
///
/// # Errors
///
/// Returns `ConfigurationError::ZetaOutOfRange` if ζ0 isn't inside (0, 1), or
/// a root-finding error if Brent's method fails.
pub fn find_kzeta_boxcar<F: ScatteringFloat>(zeta0: F) -> Result<F, ScatteringError> {
    PeriodicBoxcar.find_kzeta(zeta0)
}

/// Evaluate the periodic-boxcar Pϕ with explicit parameters.
pub fn p_phi_boxcar<F: ScatteringFloat>(phi: F, phi0: F, kzeta: F, p_phi0: F) -> F {
    let two = float::<F>(2.0);
    let one_plus_k = F::one() + kzeta;
    let dphi = wrap(phi - phi0, F::PI());
    let notch_start = F::PI() / (two * one_plus_k);
    let notch_end = F::PI() * (F::one() - F::one() / (two * one_plus_k));
    if dphi > notch_start && dphi < notch_end {
        F::zero()
    } else {
        p_phi0
    }
}

impl AnisotropyFamily for PeriodicBoxcar {
    fn get_anisotropy_type(&self) -> AnisotropyType {
        AnisotropyType::PeriodicBoxcar
    }

    // The residual is −ζ0 at kζ = 0 and increases monotonically towards
    // 1 − ζ0; kζ grows like π / sqrt(6(1 − ζ0)) as ζ0 → 1.
    fn zeta_residual<F: ScatteringFloat>(&self, kzeta: F, zeta0: F) -> F {
        boxcar_zeta(kzeta) - zeta0
    }

    fn p_phi_prefactor<F: ScatteringFloat>(&self, kzeta: F) -> Result<F, ScatteringError> {
        let p_phi0 = (F::one() + kzeta) / F::TAU();
        if p_phi0 == F::zero() || !p_phi0.is_finite() {
            return Err(ScatteringError::NumericInstability {
                quantity: "Pϕ0",
                value: to_f64(p_phi0),
            });
        }
        Ok(p_phi0)
    }

    fn p_phi<F: ScatteringFloat>(&self, phi: F, params: &AnisotropyParams<F>) -> F {
        p_phi_boxcar(phi, params.phi0, params.kzeta, params.p_phi0)
    }

    fn discontinuities<F: ScatteringFloat>(&self, params: &AnisotropyParams<F>) -> Vec<F> {
        let two = float::<F>(2.0);
        let one_plus_k = F::one() + params.kzeta;
        let notch_start = F::PI() / (two * one_plus_k);
        let notch_end = F::PI() * (F::one() - F::one() / (two * one_plus_k));
        (-2..=2)
            .flat_map(|n| {
                let offset = params.phi0 + float::<F>(f64::from(n)) * F::PI();
                [offset + notch_start, offset + notch_end]
            })
            .collect()
    }
}
