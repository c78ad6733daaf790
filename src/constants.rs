// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Useful constants.

All constants *must* be double precision. Derived scattering quantities are
converted into the requested precision only after being read from here.
 */

pub use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// Speed of light \[cm/s\].
pub const VEL_C_CM: f64 = 29_979_245_800.0;

/// Milliarcseconds to radians.
pub const MAS_TO_RAD: f64 = PI / (180.0 * 3600.0 * 1000.0);

/// Parsecs to centimetres (IAU 2015 B2).
pub const PC_TO_CM: f64 = 3.085_677_581_491_367e18;

// Best-fit Sgr A* scattering parameters from Johnson et al. (2018).

/// Power-law index of the phase structure function (Kolmogorov is 5/3).
pub const DEFAULT_ALPHA: f64 = 1.38;

/// Inner scale of the turbulence \[cm\].
pub const DEFAULT_R_IN_CM: f64 = 800e5;

/// FWHM of the scattering kernel's major axis at the reference wavelength
/// \[mas\].
pub const DEFAULT_THETA_MAJ_MAS: f64 = 1.380;

/// FWHM of the scattering kernel's minor axis at the reference wavelength
/// \[mas\].
pub const DEFAULT_THETA_MIN_MAS: f64 = 0.703;

/// Position angle of the major axis, east of north \[degrees\].
pub const DEFAULT_POS_ANG_DEG: f64 = 81.9;

/// Wavelength at which the FWHMs are quoted \[cm\].
pub const DEFAULT_LAMBDA0_CM: f64 = 1.0;

/// Distance between the observer and the scattering screen \[pc\].
pub const DEFAULT_SCREEN_DISTANCE_PC: f64 = 2.82;

/// Distance between the scattering screen and the source \[pc\].
pub const DEFAULT_SOURCE_DISTANCE_PC: f64 = 5.53;

/// Relative tolerance on kζ when solving the anisotropy equation.
pub const ROOT_FIND_REL_TOL: f64 = 1e-12;

/// Upper limit of iterations used by the root finder.
pub const ROOT_FIND_MAX_ITER: usize = 100;

/// Upper limit of interval subdivisions in adaptive quadrature. Each piece
/// of an integral costs at most ~`20 * 2^QUADRATURE_MAX_DEPTH` evaluations.
pub const QUADRATURE_MAX_DEPTH: usize = 20;
