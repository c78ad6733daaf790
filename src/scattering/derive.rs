// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Closed-form physical constants of the anisotropic scattering model.
//!
//! These are pure functions of the model's physical inputs. Inputs must be in
//! the units stated by each function; domain checks happen when a
//! [`super::ScatteringModel`] is constructed.

use crate::{
    constants::{MAS_TO_RAD, PI},
    math::{float, gamma, ScatteringFloat},
};

/// `sqrt(2 ln 2) / π`: converts a Gaussian FWHM into the width appearing in
/// its Fourier transform.
fn fwhm_factor<F: ScatteringFloat>() -> F {
    (float::<F>(2.0) * F::LN_2()).sqrt() / F::PI()
}

/// Convert an angle in milliarcseconds to radians.
#[inline]
pub fn calc_theta_rad<F: ScatteringFloat>(theta_mas: F) -> F {
    theta_mas * float(MAS_TO_RAD)
}

/// The asymmetry of the scattering kernel, θmaj / θmin.
#[inline]
pub fn calc_a<F: ScatteringFloat>(theta_maj: F, theta_min: F) -> F {
    theta_maj / theta_min
}

/// The anisotropy target ζ0 = (A² − 1) / (A² + 1).
#[inline]
pub fn calc_zeta0<F: ScatteringFloat>(a: F) -> F {
    // A − 1 is exact for A near 1, where A² − 1 would cancel.
    (a - F::one()) * (a + F::one()) / (a * a + F::one())
}

/// The magnification M = (D + R) / R, where `d` is the observer-screen
/// distance and `r` is the screen-source distance (same units).
#[inline]
pub fn calc_m<F: ScatteringFloat>(d: F, r: F) -> F {
    (d + r) / r
}

fn calc_axis_amplitude<F: ScatteringFloat>(r_in_cm: F, lambda0_cm: F, m: F, theta_rad: F) -> F {
    let x = r_in_cm * m * theta_rad / (fwhm_factor::<F>() * lambda0_cm);
    x * x
}

/// Amplitude of the quadratic (r < r_in) phase structure function along the
/// major axis.
pub fn calc_amaj<F: ScatteringFloat>(r_in_cm: F, lambda0_cm: F, m: F, theta_maj_rad: F) -> F {
    calc_axis_amplitude(r_in_cm, lambda0_cm, m, theta_maj_rad)
}

/// Amplitude of the quadratic (r < r_in) phase structure function along the
/// minor axis.
pub fn calc_amin<F: ScatteringFloat>(r_in_cm: F, lambda0_cm: F, m: F, theta_min_rad: F) -> F {
    calc_axis_amplitude(r_in_cm, lambda0_cm, m, theta_min_rad)
}

/// Normalisation of the power spectrum of phase fluctuations.
pub fn calc_qbar<F: ScatteringFloat>(
    alpha: F,
    r_in_cm: F,
    lambda0_cm: F,
    m: F,
    theta_maj_rad: F,
    theta_min_rad: F,
) -> F {
    let two = float::<F>(2.0);
    let reduced_lambda0 = lambda0_cm / F::TAU();
    let x = r_in_cm * r_in_cm * m / (fwhm_factor::<F>() * reduced_lambda0 * reduced_lambda0);
    // x² alone can overflow single precision.
    let maj = x * theta_maj_rad;
    let min = x * theta_min_rad;
    two / gamma(F::one() - alpha / two) * (maj * maj + min * min)
}

/// Amplitude of the power spectrum. Analytically this equals Amaj + Amin.
pub fn calc_c<F: ScatteringFloat>(alpha: F, r_in_cm: F, lambda0_cm: F, qbar: F) -> F {
    let two = float::<F>(2.0);
    let reduced_lambda0 = lambda0_cm / F::TAU();
    reduced_lambda0 * reduced_lambda0 * qbar * gamma(F::one() - alpha / two)
        / (float::<F>(8.0 * PI * PI) * r_in_cm * r_in_cm)
}

/// Convert a position angle measured east of north (i.e. from the declination
/// axis, counter-clockwise on the sky) \[degrees\] to an angle measured from
/// the right-ascension axis towards declination \[radians\].
#[inline]
pub fn calc_phi0<F: ScatteringFloat>(pos_ang_deg: F) -> F {
    (float::<F>(90.0) - pos_ang_deg).to_radians()
}
