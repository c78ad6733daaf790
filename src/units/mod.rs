// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Frequency/wavelength conversions, and code to parse strings into
//! frequencies with an optional unit.

mod error;

pub use error::UnitParseError;

use strum::IntoEnumIterator;
use strum_macros::{EnumIter, EnumString, IntoStaticStr};

use crate::{constants::VEL_C_CM, math::float, scattering::ScatteringFloat};

/// Convert a frequency \[Hz\] to a wavelength \[cm\].
#[inline]
pub fn nu2lambda_cm<F: ScatteringFloat>(freq_hz: F) -> F {
    float::<F>(VEL_C_CM) / freq_hz
}

/// Convert a wavelength \[cm\] to a frequency \[Hz\].
#[inline]
pub fn lambda_cm2nu<F: ScatteringFloat>(lambda_cm: F) -> F {
    float::<F>(VEL_C_CM) / lambda_cm
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumString, IntoStaticStr)]
#[allow(non_camel_case_types)]
pub enum FreqFormat {
    /// Hertz
    Hz,

    /// kiloHertz
    kHz,

    /// MegaHertz
    MHz,

    /// GigaHertz
    GHz,

    NoUnit,
}

impl FreqFormat {
    /// Multiply a number in this format by this to get Hz. Unitless numbers
    /// are taken to be Hz.
    pub fn to_hz_factor(self) -> f64 {
        match self {
            FreqFormat::Hz | FreqFormat::NoUnit => 1.0,
            FreqFormat::kHz => 1e3,
            FreqFormat::MHz => 1e6,
            FreqFormat::GHz => 1e9,
        }
    }
}

/// Parse a string that may have a unit of frequency attached to it.
pub fn parse_freq(s: &str) -> Result<(f64, FreqFormat), UnitParseError> {
    // Try to parse a naked number.
    let s = s.trim();
    if let Ok(number) = s.parse() {
        return Ok((number, FreqFormat::NoUnit));
    }

    // That didn't work; split the string after its last digit and compare
    // what's left against our supported formats.
    let split = s
        .rfind(|c: char| c.is_ascii_digit() || c == '.')
        .map(|i| i + 1)
        .unwrap_or(0);
    let (prefix, suffix) = s.split_at(split);
    let suffix = suffix.trim();
    for freq_format in FreqFormat::iter().filter(|&ff| ff != FreqFormat::NoUnit) {
        let freq_format_str: &'static str = freq_format.into();
        if suffix.eq_ignore_ascii_case(freq_format_str) {
            return match prefix.trim().parse() {
                Ok(number) => Ok((number, freq_format)),
                Err(_) => Err(UnitParseError::GotFreqUnitButCantParse {
                    input: s.to_string(),
                    unit: freq_format_str,
                }),
            };
        }
    }

    // If we made it this far, we don't know how to parse the string.
    Err(UnitParseError::Unknown {
        input: s.to_string(),
        unit_type: "frequency",
    })
}

/// Parse a string that may have a unit of frequency attached to it, returning
/// the frequency in Hz.
pub fn parse_freq_hz(s: &str) -> Result<f64, UnitParseError> {
    let (number, freq_format) = parse_freq(s)?;
    Ok(number * freq_format.to_hz_factor())
}
