// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The anisotropic thin-screen scattering model.
//!
//! A [`ScatteringModel`] is built once from the physical parameters in a
//! [`ScatteringModelParams`]. Construction derives every constant needed by
//! the approximate phase structure function (including a root find for the
//! anisotropy parameter kζ); after that the model is immutable.

mod anisotropy;
pub mod derive;
mod error;
mod structure;
#[cfg(test)]
mod tests;

pub use anisotropy::{
    boxcar_zeta, find_kzeta_boxcar, p_phi_boxcar, AnisotropyFamily, AnisotropyParams,
    AnisotropyType, PeriodicBoxcar, ANISOTROPY_TYPES_COMMA_SEPARATED,
};
pub use error::{ConfigurationError, ScatteringError};
pub use structure::{calc_b_prefac, calc_bmaj, calc_bmin};

pub use crate::math::ScatteringFloat;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    constants::*,
    math::{float, to_f64},
};
use derive::*;
use structure::axis_structure_function;

/// The physical parameters of a scattering model, in user units. The defaults
/// are the best-fit values for Sgr A* from Johnson et al. (2018).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScatteringModelParams {
    /// Power-law index of the phase structure function.
    pub alpha: f64,

    /// Inner scale of the turbulence \[cm\].
    pub r_in_cm: f64,

    /// Major-axis FWHM of the scattering kernel at `lambda0_cm` \[mas\].
    pub theta_maj_mas: f64,

    /// Minor-axis FWHM of the scattering kernel at `lambda0_cm` \[mas\].
    pub theta_min_mas: f64,

    /// Position angle of the major axis, east of north \[degrees\].
    pub pos_ang_deg: f64,

    /// Reference wavelength of the FWHMs \[cm\].
    pub lambda0_cm: f64,

    /// Observer-screen distance \[pc\].
    pub screen_distance_pc: f64,

    /// Screen-source distance \[pc\].
    pub source_distance_pc: f64,

    /// The anisotropy-kernel family.
    pub anisotropy: AnisotropyType,
}

impl Default for ScatteringModelParams {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            r_in_cm: DEFAULT_R_IN_CM,
            theta_maj_mas: DEFAULT_THETA_MAJ_MAS,
            theta_min_mas: DEFAULT_THETA_MIN_MAS,
            pos_ang_deg: DEFAULT_POS_ANG_DEG,
            lambda0_cm: DEFAULT_LAMBDA0_CM,
            screen_distance_pc: DEFAULT_SCREEN_DISTANCE_PC,
            source_distance_pc: DEFAULT_SOURCE_DISTANCE_PC,
            anisotropy: AnisotropyType::default(),
        }
    }
}

impl ScatteringModelParams {
    /// Check that every parameter is inside its physical domain.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let positive = [
            ("The inner scale", self.r_in_cm),
            ("The major-axis FWHM", self.theta_maj_mas),
            ("The minor-axis FWHM", self.theta_min_mas),
            ("The reference wavelength", self.lambda0_cm),
            ("The observer-screen distance", self.screen_distance_pc),
            ("The screen-source distance", self.source_distance_pc),
        ];
        let others = [("α", self.alpha), ("The position angle", self.pos_ang_deg)];
        for (name, value) in others.into_iter().chain(positive) {
            if !value.is_finite() {
                return Err(ConfigurationError::NotFinite { name, value });
            }
        }
        if !(self.alpha > 0.0 && self.alpha < 2.0) {
            return Err(ConfigurationError::AlphaOutOfRange(self.alpha));
        }
        for (name, value) in positive {
            if value <= 0.0 {
                return Err(ConfigurationError::NotPositive { name, value });
            }
        }
        if self.theta_maj_mas <= self.theta_min_mas {
            return Err(ConfigurationError::NotAnisotropic {
                maj: self.theta_maj_mas,
                min: self.theta_min_mas,
            });
        }
        Ok(())
    }
}

/// Fail on a derived quantity that isn't finite.
fn finite<F: ScatteringFloat>(quantity: &'static str, value: F) -> Result<F, ScatteringError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ScatteringError::NumericInstability {
            quantity,
            value: to_f64(value),
        })
    }
}

/// Fail on a derived quantity that isn't finite and positive.
fn finite_positive<F: ScatteringFloat>(
    quantity: &'static str,
    value: F,
) -> Result<F, ScatteringError> {
    match finite(quantity, value)? {
        v if v > F::zero() => Ok(v),
        v => Err(ScatteringError::NumericInstability {
            quantity,
            value: to_f64(v),
        }),
    }
}

macro_rules! getters {
    ($($(#[$doc:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$doc])*
            #[inline]
            pub fn $name(&self) -> F {
                self.$name
            }
        )*
    };
}

/// An anisotropic thin-screen scattering model with all derived constants.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatteringModel<F: ScatteringFloat = f64, K: AnisotropyFamily = PeriodicBoxcar> {
    family: K,

    alpha: F,
    r_in_cm: F,
    theta_maj_mas: F,
    theta_min_mas: F,
    pos_ang_deg: F,
    lambda0_cm: F,
    screen_distance_cm: F,
    source_distance_cm: F,

    m: F,
    zeta0: F,
    a: F,
    kzeta: F,
    p_phi0: F,
    bmaj: F,
    bmin: F,
    qbar: F,
    c: F,
    amaj: F,
    amin: F,
    phi0: F,
}

impl<F: ScatteringFloat, K: AnisotropyFamily> ScatteringModel<F, K> {
    /// Derive all constants of a scattering model from its physical
    /// parameters.
    ///
    /// # Errors
    ///
    /// Fails if any parameter is outside of its domain, if kζ can't be solved
    /// for, or if any derived constant isn't finite.
    pub fn new(params: &ScatteringModelParams) -> Result<Self, ScatteringError> {
        let family = K::default();
        if params.anisotropy != family.get_anisotropy_type() {
            return Err(ConfigurationError::AnisotropyMismatch {
                requested: params.anisotropy,
                model: family.get_anisotropy_type(),
            }
            .into());
        }
        params.validate()?;

        let alpha: F = float(params.alpha);
        let r_in_cm: F = float(params.r_in_cm);
        let theta_maj_mas: F = float(params.theta_maj_mas);
        let theta_min_mas: F = float(params.theta_min_mas);
        let pos_ang_deg: F = float(params.pos_ang_deg);
        let lambda0_cm: F = float(params.lambda0_cm);
        let screen_distance_cm: F = float(params.screen_distance_pc * PC_TO_CM);
        let source_distance_cm: F = float(params.source_distance_pc * PC_TO_CM);

        let theta_maj_rad = finite_positive("θmaj", calc_theta_rad(theta_maj_mas))?;
        let theta_min_rad = finite_positive("θmin", calc_theta_rad(theta_min_mas))?;

        let m = finite_positive("M", calc_m(screen_distance_cm, source_distance_cm))?;
        let a = finite_positive("A", calc_a(theta_maj_mas, theta_min_mas))?;
        let zeta0 = finite("ζ0", calc_zeta0(a))?;
        if !(zeta0 > F::zero() && zeta0 < F::one()) {
            return Err(ConfigurationError::ZetaOutOfRange(to_f64(zeta0)).into());
        }

        let amaj = finite_positive("Amaj", calc_amaj(r_in_cm, lambda0_cm, m, theta_maj_rad))?;
        let amin = finite_positive("Amin", calc_amin(r_in_cm, lambda0_cm, m, theta_min_rad))?;
        let qbar = finite_positive(
            "Qbar",
            calc_qbar(alpha, r_in_cm, lambda0_cm, m, theta_maj_rad, theta_min_rad),
        )?;
        let c = finite_positive("C", calc_c(alpha, r_in_cm, lambda0_cm, qbar))?;
        let phi0 = finite("ϕ0", calc_phi0(pos_ang_deg))?;

        let kzeta = family.find_kzeta(zeta0)?;
        let p_phi0 = family.p_phi_prefactor(kzeta)?;
        let anisotropy = AnisotropyParams {
            zeta0,
            kzeta,
            p_phi0,
            phi0,
        };

        let prefac = finite_positive("B prefactor", calc_b_prefac(alpha, c))?;
        let bmaj = finite_positive("Bmaj", calc_bmaj(alpha, &anisotropy, &family, prefac)?)?;
        let bmin = finite_positive("Bmin", calc_bmin(alpha, &anisotropy, &family, prefac)?)?;

        debug!(
            "{} scattering model: M = {m}, A = {a}, ζ0 = {zeta0}, kζ = {kzeta}, Pϕ0 = {p_phi0}",
            family.get_anisotropy_type()
        );
        debug!("Qbar = {qbar}, C = {c}, Amaj = {amaj}, Amin = {amin}");
        debug!("Bmaj = {bmaj}, Bmin = {bmin}, ϕ0 = {phi0} rad");

        Ok(Self {
            family,
            alpha,
            r_in_cm,
            theta_maj_mas,
            theta_min_mas,
            pos_ang_deg,
            lambda0_cm,
            screen_distance_cm,
            source_distance_cm,
            m,
            zeta0,
            a,
            kzeta,
            p_phi0,
            bmaj,
            bmin,
            qbar,
            c,
            amaj,
            amin,
            phi0,
        })
    }

    /// The model with the Johnson et al. (2018) parameters.
    pub fn default_model() -> Result<Self, ScatteringError> {
        Self::new(&ScatteringModelParams::default())
    }

    getters!(
        /// Power-law index of the phase structure function.
        alpha,
        /// Inner scale \[cm\].
        r_in_cm,
        /// Major-axis FWHM at the reference wavelength \[mas\].
        theta_maj_mas,
        /// Minor-axis FWHM at the reference wavelength \[mas\].
        theta_min_mas,
        /// Position angle of the major axis, east of north \[degrees\].
        pos_ang_deg,
        /// Reference wavelength \[cm\].
        lambda0_cm,
        /// Observer-screen distance \[cm\].
        screen_distance_cm,
        /// Screen-source distance \[cm\].
        source_distance_cm,
        /// Magnification, (D + R) / R.
        m,
        /// Anisotropy target of the kernel.
        zeta0,
        /// Asymmetry, θmaj / θmin.
        a,
        /// Anisotropy shape parameter.
        kzeta,
        /// Value of Pϕ inside its support.
        p_phi0,
        /// Large-separation structure-function coefficient (major axis).
        bmaj,
        /// Large-separation structure-function coefficient (minor axis).
        bmin,
        /// Power-spectrum normalisation.
        qbar,
        /// Power-spectrum amplitude.
        c,
        /// Small-separation structure-function coefficient (major axis).
        amaj,
        /// Small-separation structure-function coefficient (minor axis).
        amin,
        /// Major-axis angle from the RA axis \[radians\].
        phi0,
    );

    /// The anisotropy-kernel family of this model.
    pub fn family(&self) -> K {
        self.family
    }

    pub fn get_anisotropy_type(&self) -> AnisotropyType {
        self.family.get_anisotropy_type()
    }

    /// The solved anisotropy constants.
    pub fn anisotropy_params(&self) -> AnisotropyParams<F> {
        AnisotropyParams {
            zeta0: self.zeta0,
            kzeta: self.kzeta,
            p_phi0: self.p_phi0,
            phi0: self.phi0,
        }
    }

    /// Evaluate the anisotropy distribution Pϕ at screen angle `phi`
    /// \[radians\].
    pub fn p_phi(&self, phi: F) -> F {
        self.family.p_phi(phi, &self.anisotropy_params())
    }

    /// Major-axis FWHM at the reference wavelength \[radians\].
    pub fn theta_maj_rad(&self) -> F {
        calc_theta_rad(self.theta_maj_mas)
    }

    /// Minor-axis FWHM at the reference wavelength \[radians\].
    pub fn theta_min_rad(&self) -> F {
        calc_theta_rad(self.theta_min_mas)
    }

    /// Major-axis FWHM of the ensemble-average kernel in the Gaussian
    /// (long-wavelength) limit at wavelength `lambda_cm` \[radians\].
    pub fn theta_maj_rad_at(&self, lambda_cm: F) -> F {
        let ratio = lambda_cm / self.lambda0_cm;
        self.theta_maj_rad() * ratio * ratio
    }

    /// Minor-axis FWHM of the ensemble-average kernel in the Gaussian
    /// (long-wavelength) limit at wavelength `lambda_cm` \[radians\].
    pub fn theta_min_rad_at(&self, lambda_cm: F) -> F {
        let ratio = lambda_cm / self.lambda0_cm;
        self.theta_min_rad() * ratio * ratio
    }

    /// The Fresnel scale of the screen at wavelength `lambda_cm` \[cm\].
    pub fn fresnel_scale(&self, lambda_cm: F) -> F {
        let d = self.screen_distance_cm;
        let r = self.source_distance_cm;
        (d * r / (d + r) * lambda_cm / F::TAU()).sqrt()
    }

    /// Phase structure function along the major axis, for a separation
    /// `r_cm` on the screen at wavelength `lambda_cm`.
    pub fn dmaj(&self, r_cm: F, lambda_cm: F) -> F {
        axis_structure_function(
            self.alpha,
            self.amaj,
            self.bmaj,
            r_cm / self.r_in_cm,
            lambda_cm / self.lambda0_cm,
        )
    }

    /// Phase structure function along the minor axis, for a separation
    /// `r_cm` on the screen at wavelength `lambda_cm`.
    pub fn dmin(&self, r_cm: F, lambda_cm: F) -> F {
        axis_structure_function(
            self.alpha,
            self.amin,
            self.bmin,
            r_cm / self.r_in_cm,
            lambda_cm / self.lambda0_cm,
        )
    }

    /// The approximate phase structure function for a separation of `r_cm`
    /// in the direction `phi` (measured from the RA axis) \[radians\].
    pub fn dphi_approx(&self, r_cm: F, phi: F, lambda_cm: F) -> F {
        let two = float::<F>(2.0);
        let dmaj = self.dmaj(r_cm, lambda_cm);
        let dmin = self.dmin(r_cm, lambda_cm);
        (dmaj + dmin) / two + (dmaj - dmin) / two * (two * (phi - self.phi0)).cos()
    }
}
