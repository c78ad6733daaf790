// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to abstract over the angular distribution of scattering-screen
//! anisotropy.
//!
//! [`AnisotropyFamily`] is a trait detailing the family-specific parts of the
//! model: the equation linking ζ0 to the shape parameter kζ, and the
//! distribution Pϕ itself. By making this trait, the constant derivation and
//! kernel evaluation are neatly decoupled from any single family. Only the
//! [`PeriodicBoxcar`] family is currently implemented.

mod boxcar;

pub use boxcar::{boxcar_zeta, find_kzeta_boxcar, p_phi_boxcar, PeriodicBoxcar};

use log::debug;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

use super::{ConfigurationError, ScatteringError};
use crate::{
    constants::{ROOT_FIND_MAX_ITER, ROOT_FIND_REL_TOL},
    math::{brent, expand_bracket, float, to_f64, ScatteringFloat},
};

/// Doublings of the initial kζ bracket [0, 1] before giving up. 2^64 is far
/// beyond any kζ whose ζ0 is representable below 1.
const MAX_BRACKET_DOUBLINGS: usize = 64;

lazy_static::lazy_static! {
    pub static ref ANISOTROPY_TYPES_COMMA_SEPARATED: String = {
        use itertools::Itertools;
        use strum::IntoEnumIterator;

        AnisotropyType::iter().join(", ")
    };
}

/// Supported anisotropy-kernel families.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
pub enum AnisotropyType {
    /// Uniform weight with a notch carved out perpendicular to the major axis.
    #[default]
    #[strum(to_string = "boxcar", serialize = "periodic-boxcar")]
    #[serde(rename = "boxcar", alias = "periodic-boxcar")]
    PeriodicBoxcar,
}

/// The solved anisotropy constants of a model. These are everything needed to
/// evaluate Pϕ; they are computed once, before the directional
/// structure-function coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnisotropyParams<F: ScatteringFloat> {
    /// (A² − 1) / (A² + 1).
    pub zeta0: F,

    /// The family's shape parameter, solved from `zeta0`.
    pub kzeta: F,

    /// The value of Pϕ inside its support.
    pub p_phi0: F,

    /// Reference angle of the major axis, measured from the RA axis
    /// \[radians\].
    pub phi0: F,
}

/// A trait abstracting anisotropy-kernel families.
pub trait AnisotropyFamily: std::fmt::Debug + Clone + Copy + Default + Send + Sync {
    /// Get the type of this family.
    fn get_anisotropy_type(&self) -> AnisotropyType;

    /// The family's defining equation written as a residual; it is zero when
    /// `kzeta` reproduces `zeta0`. It must be negative at kζ = 0 and change
    /// sign once for kζ > 0.
    fn zeta_residual<F: ScatteringFloat>(&self, kzeta: F, zeta0: F) -> F;

    /// Solve the defining equation for kζ given ζ0 in (0, 1). The bracket
    /// [0, 1] is widened until the residual changes sign, then Brent's method
    /// is used.
    ///
    /// # Errors
    ///
    /// Returns an error if ζ0 is out of range, or if the root can't be
    /// bracketed or doesn't converge.
    fn find_kzeta<F: ScatteringFloat>(&self, zeta0: F) -> Result<F, ScatteringError> {
        if !(zeta0 > F::zero() && zeta0 < F::one()) {
            return Err(ConfigurationError::ZetaOutOfRange(to_f64(zeta0)).into());
        }

        let residual = |k: F| self.zeta_residual(k, zeta0);
        let lo = F::zero();
        let hi = expand_bracket(&residual, lo, F::one(), MAX_BRACKET_DOUBLINGS)?;
        let (kzeta, iterations) = brent(
            residual,
            lo,
            hi,
            float(ROOT_FIND_REL_TOL),
            ROOT_FIND_MAX_ITER,
        )?;
        debug!("Solved kζ = {kzeta} for ζ0 = {zeta0} in {iterations} iterations");

        if !(kzeta > F::zero()) || !kzeta.is_finite() {
            return Err(ScatteringError::NumericInstability {
                quantity: "kζ",
                value: to_f64(kzeta),
            });
        }
        Ok(kzeta)
    }

    /// The normalisation of Pϕ for the given shape parameter.
    fn p_phi_prefactor<F: ScatteringFloat>(&self, kzeta: F) -> Result<F, ScatteringError>;

    /// Evaluate Pϕ at the screen angle `phi` \[radians\].
    fn p_phi<F: ScatteringFloat>(&self, phi: F, params: &AnisotropyParams<F>) -> F;

    /// Angles at which Pϕ is discontinuous. Points may lie outside of
    /// [0, 2π); integration code ignores those.
    fn discontinuities<F: ScatteringFloat>(&self, _params: &AnisotropyParams<F>) -> Vec<F> {
        vec![]
    }
}
