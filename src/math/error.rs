// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors from numerical root finding and quadrature.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RootFindError {
    #[error("No sign change in the search bracket [{lo}, {hi}] (f(lo) = {f_lo}, f(hi) = {f_hi})")]
    NoSignChange {
        lo: f64,
        hi: f64,
        f_lo: f64,
        f_hi: f64,
    },

    #[error("Root finding did not converge within {iterations} iterations (last estimate {best})")]
    NoConvergence { iterations: usize, best: f64 },

    #[error("The function being solved was not finite at {x}")]
    NonFinite { x: f64 },
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Adaptive quadrature did not converge on [{lo}, {hi}] within the subdivision limit (error estimate {error}, tolerance {tol})")]
pub struct QuadratureError {
    pub lo: f64,
    pub hi: f64,
    pub error: f64,
    pub tol: f64,
}
