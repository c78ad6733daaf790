// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Ensemble-averaged interstellar-scattering kernels for VLBI visibilities.

The anisotropic thin-screen model of Psaltis et al. (2018) is configured with
the parameter conventions of Johnson et al. (2018). A [`ScatteringModel`] is
built once from a handful of physical parameters; an
[`ApproximatedScatteringKernel`] wrapping it then gives the multiplicative
factor that scattering imposes on a visibility at any baseline and frequency.
 */

pub mod cli;
pub mod constants;
pub mod kernel;
pub(crate) mod math;
pub mod scattering;
pub mod units;

// Re-exports.
pub use cli::{Scatter, ScatterError};
pub use kernel::{ApproximatedScatteringKernel, VisPoint};
pub use math::{QuadratureError, RootFindError};
pub use scattering::{
    AnisotropyFamily, AnisotropyParams, AnisotropyType, ConfigurationError, PeriodicBoxcar,
    ScatteringError, ScatteringFloat, ScatteringModel, ScatteringModelParams,
};
pub use units::{lambda_cm2nu, nu2lambda_cm};
