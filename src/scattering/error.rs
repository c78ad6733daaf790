// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error types for scattering-model construction and kernel evaluation.

use thiserror::Error;

use super::AnisotropyType;
use crate::math::{QuadratureError, RootFindError};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScatteringError {
    #[error("Invalid scattering configuration: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Couldn't solve for the anisotropy parameter kζ: {0}")]
    RootFind(#[from] RootFindError),

    #[error("Couldn't integrate the directional structure-function coefficients: {0}")]
    Quadrature(#[from] QuadratureError),

    #[error("Numerical instability: {quantity} evaluated to {value}")]
    NumericInstability { quantity: &'static str, value: f64 },

    #[error("Cannot evaluate the scattering kernel at a frequency of {0} Hz")]
    InvalidFrequency(f64),
}

/// A physical input (or a quantity derived directly from the inputs) is
/// outside of its domain.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("{name} must be finite, but got {value}")]
    NotFinite { name: &'static str, value: f64 },

    #[error("{name} must be positive, but got {value}")]
    NotPositive { name: &'static str, value: f64 },

    #[error("The power-law index α must be in the open interval (0, 2), but got {0}")]
    AlphaOutOfRange(f64),

    #[error("The major-axis FWHM ({maj} mas) must be larger than the minor-axis FWHM ({min} mas)")]
    NotAnisotropic { maj: f64, min: f64 },

    #[error("ζ0 must be in the open interval (0, 1), but got {0}")]
    ZetaOutOfRange(f64),

    #[error("The requested anisotropy kernel '{requested}' doesn't match the model's '{model}'")]
    AnisotropyMismatch {
        requested: AnisotropyType,
        model: AnisotropyType,
    },
}
