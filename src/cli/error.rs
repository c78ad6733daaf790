// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all `scatter`-related errors. This should be the *only*
//! error enum that is publicly visible from the CLI.

use thiserror::Error;

use super::kernel::KernelArgsError;
use crate::scattering::ScatteringError;

/// The *only* publicly visible error from the `scatter` binary.
#[derive(Error, Debug)]
pub enum ScatterError {
    /// An error related to the scattering model's parameters.
    #[error("{0}\n\nSee `scatter model --help` for the model parameters and their defaults.")]
    Model(String),

    /// An error related to kernel evaluation.
    #[error("{0}\n\nSee `scatter kernel --help` for the kernel options.")]
    Kernel(String),

    /// An error related to argument files.
    #[error("{0}\n\nArgument files must be toml or json, with tables named after the argument groups (e.g. [model]).")]
    ArgFile(String),

    /// A generic error that can't be clarified further, e.g. IO errors.
    #[error("{0}")]
    Generic(String),
}

impl From<ScatteringError> for ScatterError {
    fn from(e: ScatteringError) -> Self {
        match e {
            ScatteringError::Configuration(_) | ScatteringError::RootFind(_) => {
                Self::Model(e.to_string())
            }
            ScatteringError::InvalidFrequency(_) => Self::Kernel(e.to_string()),
            ScatteringError::Quadrature(_) | ScatteringError::NumericInstability { .. } => {
                Self::Generic(e.to_string())
            }
        }
    }
}

impl From<KernelArgsError> for ScatterError {
    fn from(e: KernelArgsError) -> Self {
        Self::Kernel(e.to_string())
    }
}

impl From<std::io::Error> for ScatterError {
    fn from(e: std::io::Error) -> Self {
        Self::Generic(e.to_string())
    }
}

impl From<toml::ser::Error> for ScatterError {
    fn from(e: toml::ser::Error) -> Self {
        Self::Generic(format!("Couldn't serialise arguments to toml: {e}"))
    }
}

impl From<log::SetLoggerError> for ScatterError {
    fn from(e: log::SetLoggerError) -> Self {
        Self::Generic(format!("Failed to initialise logging: {e}"))
    }
}
