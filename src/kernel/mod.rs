// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The ensemble-averaged scattering kernel in visibility space.
//!
//! An [`ApproximatedScatteringKernel`] borrows an immutable
//! [`ScatteringModel`] and evaluates the Psaltis et al. (2018) approximate
//! kernel, a real factor by which an unscattered visibility should be
//! multiplied. Evaluation is pure, so a kernel can be shared between threads
//! freely.


use ndarray::prelude::*;
use num_complex::Complex;
use rayon::prelude::*;

use crate::{
    math::{float, to_f64},
    scattering::{
        derive::calc_theta_rad, AnisotropyFamily, ConfigurationError, PeriodicBoxcar,
        ScatteringError, ScatteringFloat, ScatteringModel,
    },
    units::nu2lambda_cm,
};

/// A single visibility query. `u` and `v` are baseline coordinates
/// \[wavelengths\], `time` is unused by the time-stationary kernel, and `freq`
/// \[Hz\] may be exactly zero to mean "use the kernel's reference frequency".
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VisPoint<F: ScatteringFloat = f64> {
    pub u: F,
    pub v: F,
    pub time: F,
    pub freq: F,
}

#[derive(Debug, Clone, Copy)]
pub struct ApproximatedScatteringKernel<
    'a,
    F: ScatteringFloat = f64,
    K: AnisotropyFamily = PeriodicBoxcar,
> {
    model: &'a ScatteringModel<F, K>,

    /// \[Hz\]
    nu_ref: F,
}

impl<'a, F: ScatteringFloat, K: AnisotropyFamily> ApproximatedScatteringKernel<'a, F, K> {
    /// Wrap a model with a reference frequency \[Hz\], which must be positive.
    pub fn new(model: &'a ScatteringModel<F, K>, nu_ref: F) -> Result<Self, ScatteringError> {
        if !nu_ref.is_finite() {
            return Err(ConfigurationError::NotFinite {
                name: "The reference frequency",
                value: to_f64(nu_ref),
            }
            .into());
        }
        if nu_ref <= F::zero() {
            return Err(ConfigurationError::NotPositive {
                name: "The reference frequency",
                value: to_f64(nu_ref),
            }
            .into());
        }
        Ok(Self { model, nu_ref })
    }

    pub fn model(&self) -> &'a ScatteringModel<F, K> {
        self.model
    }

    pub fn nu_ref(&self) -> F {
        self.nu_ref
    }

    /// The angular radius \[radians\] outside of which the scattered image is
    /// negligible at the reference frequency.
    pub fn angular_scale(&self) -> F {
        let lambda_ratio = nu2lambda_cm(self.nu_ref) / self.model.lambda0_cm();
        float::<F>(5.0) * calc_theta_rad(self.model.theta_maj_mas()) * lambda_ratio * lambda_ratio
    }

    /// Evaluate the kernel for a single query. The imaginary part of the
    /// result is always zero.
    ///
    /// # Errors
    ///
    /// Fails if the frequency is negative or not finite, or if the structure
    /// function can't be evaluated at this point.
    pub fn visibility_point(&self, point: &VisPoint<F>) -> Result<Complex<F>, ScatteringError> {
        let freq = if point.freq == F::zero() {
            self.nu_ref
        } else {
            point.freq
        };
        if !(freq > F::zero()) || !freq.is_finite() {
            return Err(ScatteringError::InvalidFrequency(to_f64(point.freq)));
        }

        let lambda_cm = nu2lambda_cm(freq);
        let r_cm = lambda_cm * point.u.hypot(point.v) / self.model.m();
        let phi = point.v.atan2(point.u);
        let dphi = self.model.dphi_approx(r_cm, phi, lambda_cm);
        let vis = (-dphi / float(2.0)).exp();
        if !dphi.is_finite() || !vis.is_finite() {
            return Err(ScatteringError::NumericInstability {
                quantity: "Dϕ",
                value: to_f64(dphi),
            });
        }
        Ok(Complex::new(vis, F::zero()))
    }

    /// Evaluate the kernel with the query given as separate arguments.
    pub fn evaluate(&self, u: F, v: F, time: F, freq: F) -> Result<Complex<F>, ScatteringError> {
        self.visibility_point(&VisPoint { u, v, time, freq })
    }

    /// Evaluate the kernel for many queries in parallel. The first error
    /// encountered is returned.
    pub fn visibilities(&self, points: &[VisPoint<F>]) -> Result<Vec<Complex<F>>, ScatteringError> {
        points
            .par_iter()
            .map(|point| self.visibility_point(point))
            .collect()
    }

    /// Evaluate the kernel on the grid of baselines formed by `us` and `vs` at
    /// the frequency `freq` \[Hz\]. The result has shape `(vs.len(),
    /// us.len())`.
    pub fn visibility_grid(
        &self,
        us: &[F],
        vs: &[F],
        freq: F,
    ) -> Result<Array2<Complex<F>>, ScatteringError> {
        let mut grid = Array2::from_elem((vs.len(), us.len()), Complex::default());
        grid.outer_iter_mut()
            .into_par_iter()
            .zip(vs.par_iter())
            .try_for_each(|(mut row, &v)| {
                row.iter_mut().zip(us.iter()).try_for_each(|(vis, &u)| {
                    *vis = self.visibility_point(&VisPoint {
                        u,
                        v,
                        time: F::zero(),
                        freq,
                    })?;
                    Ok::<(), ScatteringError>(())
                })
            })?;
        Ok(grid)
    }
}
