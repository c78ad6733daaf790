// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Some helper mathematics: one-dimensional root finding, adaptive
//! quadrature, and the few special functions the scattering model needs.

mod error;

pub use error::{QuadratureError, RootFindError};

use std::fmt::{Debug, Display};

use log::trace;
use num_traits::{Float, FloatConst, FromPrimitive};

/// The floating-point types that scattering quantities can be computed in.
/// This is implemented for `f32` and `f64`.
pub trait ScatteringFloat:
    Float + FloatConst + FromPrimitive + Debug + Display + Default + Send + Sync + 'static
{
}

impl<F> ScatteringFloat for F where
    F: Float + FloatConst + FromPrimitive + Debug + Display + Default + Send + Sync + 'static
{
}

/// Convert a double-precision constant into `F`. A failed conversion yields
/// NaN, which is caught by the finiteness checks on every derived quantity.
#[inline]
pub(crate) fn float<F: ScatteringFloat>(x: f64) -> F {
    F::from_f64(x).unwrap_or_else(F::nan)
}

/// Convert `F` into a double, for error reporting and `statrs`.
#[inline]
pub(crate) fn to_f64<F: ScatteringFloat>(x: F) -> f64 {
    x.to_f64().unwrap_or(f64::NAN)
}

/// The gamma function, evaluated in double precision.
#[inline]
pub(crate) fn gamma<F: ScatteringFloat>(x: F) -> F {
    float(statrs::function::gamma::gamma(to_f64(x)))
}

/// Wrap an angle into `[0, period)`.
///
/// # Examples
///
/// `assert_abs_diff_eq!(wrap(-0.5, PI), PI - 0.5);`
#[inline]
pub(crate) fn wrap<F: ScatteringFloat>(x: F, period: F) -> F {
    let r = x % period;
    if r >= F::zero() {
        return r;
    }
    // A tiny negative remainder can round up to the period itself.
    let r = r + period;
    if r >= period {
        F::zero()
    } else {
        r
    }
}

/// Starting from `[lo, hi]`, double `hi` until `f` changes sign across the
/// interval. `lo` is never moved. Returns the new `hi`.
pub(crate) fn expand_bracket<F: ScatteringFloat, Func: Fn(F) -> F>(
    f: &Func,
    lo: F,
    mut hi: F,
    max_doublings: usize,
) -> Result<F, RootFindError> {
    let f_lo = f(lo);
    let two = float::<F>(2.0);
    let mut f_hi = f(hi);
    for _ in 0..max_doublings {
        if f_lo * f_hi <= F::zero() {
            return Ok(hi);
        }
        hi = hi * two;
        f_hi = f(hi);
    }
    if f_lo * f_hi <= F::zero() {
        Ok(hi)
    } else {
        Err(RootFindError::NoSignChange {
            lo: to_f64(lo),
            hi: to_f64(hi),
            f_lo: to_f64(f_lo),
            f_hi: to_f64(f_hi),
        })
    }
}

/// Find a root of `f` inside `[a, b]` with Brent's method (bisection, secant
/// and inverse quadratic interpolation). `f(a)` and `f(b)` must have opposite
/// signs. Iteration stops once the bracket is narrower than `rel_tol` relative
/// to the current estimate (plus a few ULPs).
///
/// The root and the number of iterations used are returned.
pub(crate) fn brent<F: ScatteringFloat, Func: Fn(F) -> F>(
    f: Func,
    mut a: F,
    mut b: F,
    rel_tol: F,
    max_iter: usize,
) -> Result<(F, usize), RootFindError> {
    let zero = F::zero();
    let half = float::<F>(0.5);
    let two = float::<F>(2.0);
    let three = float::<F>(3.0);

    let mut fa = f(a);
    let mut fb = f(b);
    if !fa.is_finite() || !fb.is_finite() {
        return Err(RootFindError::NonFinite {
            x: to_f64(if fa.is_finite() { b } else { a }),
        });
    }
    if (fa > zero && fb > zero) || (fa < zero && fb < zero) {
        return Err(RootFindError::NoSignChange {
            lo: to_f64(a),
            hi: to_f64(b),
            f_lo: to_f64(fa),
            f_hi: to_f64(fb),
        });
    }

    let mut c = b;
    let mut fc = fb;
    let mut d = b - a;
    let mut e = d;
    for iter in 0..max_iter {
        if (fb > zero && fc > zero) || (fb < zero && fc < zero) {
            // The root is between a and b; make c the other end.
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tol1 = two * F::epsilon() * b.abs() + half * rel_tol * b.abs();
        let xm = half * (c - b);
        trace!("brent iteration {iter}: b = {b}, f(b) = {fb}, half-bracket = {xm}");
        if xm.abs() <= tol1 || fb == zero {
            return Ok((b, iter));
        }

        if e.abs() >= tol1 && fa.abs() > fb.abs() {
            // Attempt interpolation.
            let s = fb / fa;
            let (mut p, mut q) = if a == c {
                (two * xm * s, F::one() - s)
            } else {
                let q = fa / fc;
                let r = fb / fc;
                (
                    s * (two * xm * q * (q - r) - (b - a) * (r - F::one())),
                    (q - F::one()) * (r - F::one()) * (s - F::one()),
                )
            };
            if p > zero {
                q = -q;
            }
            p = p.abs();
            let min1 = three * xm * q - (tol1 * q).abs();
            let min2 = (e * q).abs();
            if two * p < min1.min(min2) {
                e = d;
                d = p / q;
            } else {
                // Interpolation failed; bisect.
                d = xm;
                e = d;
            }
        } else {
            d = xm;
            e = d;
        }

        a = b;
        fa = fb;
        b = if d.abs() > tol1 {
            b + d
        } else if xm > zero {
            b + tol1
        } else {
            b - tol1
        };
        fb = f(b);
        if !fb.is_finite() {
            return Err(RootFindError::NonFinite { x: to_f64(b) });
        }
    }

    Err(RootFindError::NoConvergence {
        iterations: max_iter,
        best: to_f64(b),
    })
}

// Five-point Gauss-Legendre nodes and weights on [-1, 1]. All nodes are
// interior, so integrands are never evaluated on interval edges.
const GL5_NODES: [f64; 5] = [
    0.0,
    -0.538_469_310_105_683_1,
    0.538_469_310_105_683_1,
    -0.906_179_845_938_664,
    0.906_179_845_938_664,
];
const GL5_WEIGHTS: [f64; 5] = [
    0.568_888_888_888_888_9,
    0.478_628_670_499_366_5,
    0.478_628_670_499_366_5,
    0.236_926_885_056_189_1,
    0.236_926_885_056_189_1,
];

fn gauss_legendre_5<F: ScatteringFloat, Func: Fn(F) -> F>(f: &Func, a: F, b: F) -> F {
    let half = float::<F>(0.5);
    let h = half * (b - a);
    let m = half * (a + b);
    h * GL5_NODES
        .iter()
        .zip(GL5_WEIGHTS.iter())
        .fold(F::zero(), |acc, (&x, &w)| {
            acc + float::<F>(w) * f(m + h * float(x))
        })
}

fn integrate_recursive<F: ScatteringFloat, Func: Fn(F) -> F>(
    f: &Func,
    a: F,
    b: F,
    tol: F,
    whole: F,
    depth: usize,
) -> Result<F, QuadratureError> {
    let half = float::<F>(0.5);
    let m = half * (a + b);
    let left = gauss_legendre_5(f, a, m);
    let right = gauss_legendre_5(f, m, b);
    let error = (left + right - whole).abs();
    // Differences at the level of rounding can't be refined away.
    let floor = float::<F>(8.0) * F::epsilon() * (left.abs() + right.abs());
    if error <= tol.max(floor) {
        return Ok(left + right);
    }
    if depth == 0 || !error.is_finite() {
        return Err(QuadratureError {
            lo: to_f64(a),
            hi: to_f64(b),
            error: to_f64(error),
            tol: to_f64(tol),
        });
    }
    Ok(integrate_recursive(f, a, m, tol * half, left, depth - 1)?
        + integrate_recursive(f, m, b, tol * half, right, depth - 1)?)
}

/// Integrate `f` over `[a, b]` with adaptive five-point Gauss-Legendre
/// quadrature. Each interval is split in two until the halves agree with the
/// whole to within `tol` (halved at every level). At most `max_depth` levels
/// of splitting are used, so the cost is bounded by `10 * 2^max_depth`
/// evaluations of `f`.
///
/// # Errors
///
/// Fails if an interval still disagrees with its halves after `max_depth`
/// levels, or if `f` isn't finite.
pub(crate) fn integrate<F: ScatteringFloat, Func: Fn(F) -> F>(
    f: &Func,
    a: F,
    b: F,
    tol: F,
    max_depth: usize,
) -> Result<F, QuadratureError> {
    if a == b {
        return Ok(F::zero());
    }
    let whole = gauss_legendre_5(f, a, b);
    integrate_recursive(f, a, b, tol, whole, max_depth)
}

/// Integrate `f` over `[a, b]`, splitting the domain at `breakpoints` (which
/// need not be sorted; points outside `(a, b)` are ignored). Use this when
/// `f` is discontinuous or has a kink at known locations. The absolute
/// tolerance `tol` is shared between the pieces in proportion to their width.
pub(crate) fn integrate_piecewise<F: ScatteringFloat, Func: Fn(F) -> F>(
    f: &Func,
    a: F,
    b: F,
    breakpoints: &[F],
    tol: F,
    max_depth: usize,
) -> Result<F, QuadratureError> {
    let mut edges: Vec<F> = breakpoints
        .iter()
        .copied()
        .filter(|&x| x > a && x < b)
        .collect();
    edges.push(a);
    edges.push(b);
    edges.sort_by(|x, y| x.partial_cmp(y).unwrap_or(std::cmp::Ordering::Equal));
    edges.dedup();

    let width = b - a;
    edges.windows(2).try_fold(F::zero(), |acc, w| {
        Ok(acc + integrate(f, w[0], w[1], tol * (w[1] - w[0]) / width, max_depth)?)
    })
}

/// The absolute tolerance to use for quadrature of O(1) integrands in the
/// precision `F`; ε^(3/4), i.e. ~2e-12 for `f64` and ~6e-6 for `f32`.
pub(crate) fn quadrature_tolerance<F: ScatteringFloat>() -> F {
    F::epsilon().powf(float(0.75))
}
