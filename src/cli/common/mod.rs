// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Common arguments for command-line interfaces. Both `scatter` subcommands
//! build a scattering model, so the model arguments are shared between them.

mod printers;

pub(super) use printers::InfoPrinter;
pub(crate) use printers::{display_warnings, Warn};

use std::str::FromStr;

use clap::Parser;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use super::ScatterError;
use crate::{
    constants::*,
    scattering::{AnisotropyType, ScatteringModelParams, ANISOTROPY_TYPES_COMMA_SEPARATED},
};

lazy_static::lazy_static! {
    pub(super) static ref ARG_FILE_TYPES_COMMA_SEPARATED: String = ArgFileTypes::iter().join(", ");

    pub(super) static ref ARG_FILE_HELP: String =
        format!("All arguments may be specified in a file. Any CLI arguments override arguments set in the file. Supported formats: {}", *ARG_FILE_TYPES_COMMA_SEPARATED);

    static ref ALPHA_HELP: String =
        format!("The power-law index of the phase structure function; must be between 0 and 2. Default: {DEFAULT_ALPHA}");

    static ref R_IN_HELP: String =
        format!("The inner scale of the turbulence [cm]. Default: {DEFAULT_R_IN_CM:e}");

    static ref THETA_MAJ_HELP: String =
        format!("The major-axis FWHM of the scattering kernel at the reference wavelength [mas]. Default: {DEFAULT_THETA_MAJ_MAS}");

    static ref THETA_MIN_HELP: String =
        format!("The minor-axis FWHM of the scattering kernel at the reference wavelength [mas]. Default: {DEFAULT_THETA_MIN_MAS}");

    static ref POS_ANG_HELP: String =
        format!("The position angle of the major axis, east of north [degrees]. Default: {DEFAULT_POS_ANG_DEG}");

    static ref LAMBDA0_HELP: String =
        format!("The wavelength at which the FWHMs are specified [cm]. Default: {DEFAULT_LAMBDA0_CM}");

    static ref SCREEN_DISTANCE_HELP: String =
        format!("The distance from the observer to the scattering screen [pc]. Default: {DEFAULT_SCREEN_DISTANCE_PC}");

    static ref SOURCE_DISTANCE_HELP: String =
        format!("The distance from the scattering screen to the source [pc]. Default: {DEFAULT_SOURCE_DISTANCE_PC}");

    static ref ANISOTROPY_HELP: String =
        format!("The family of the anisotropy kernel. Supported families: {}. Default: {}", *ANISOTROPY_TYPES_COMMA_SEPARATED, AnisotropyType::default());
}

#[derive(Debug, Display, EnumIter, EnumString)]
pub(super) enum ArgFileTypes {
    #[strum(serialize = "toml")]
    Toml,
    #[strum(serialize = "json")]
    Json,
}

macro_rules! unpack_arg_file {
    ($arg_file:expr) => ({
        use std::{fs::File, io::Read, str::FromStr};

        use crate::cli::common::{ArgFileTypes, ARG_FILE_TYPES_COMMA_SEPARATED};

        debug!("Attempting to parse argument file {}", $arg_file.display());

        let mut contents = String::new();
        let arg_file_type = $arg_file
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .and_then(|e| ArgFileTypes::from_str(&e).ok());

        match arg_file_type {
            Some(ArgFileTypes::Toml) => {
                debug!("Parsing toml file...");
                let mut fh = File::open(&$arg_file)?;
                fh.read_to_string(&mut contents)?;
                toml::from_str(&contents).map_err(|err| {
                    ScatterError::ArgFile(format!(
                        "Couldn't decode toml structure from {:?}:\n{err}",
                        $arg_file
                    ))
                })?
            }
            Some(ArgFileTypes::Json) => {
                debug!("Parsing json file...");
                let mut fh = File::open(&$arg_file)?;
                fh.read_to_string(&mut contents)?;
                serde_json::from_str(&contents).map_err(|err| {
                    ScatterError::ArgFile(format!(
                        "Couldn't decode json structure from {:?}:\n{err}",
                        $arg_file
                    ))
                })?
            }

            None => {
                return Err(ScatterError::ArgFile(format!(
                    "Argument file '{:?}' doesn't have a recognised file extension! Valid extensions are: {}", $arg_file, *ARG_FILE_TYPES_COMMA_SEPARATED)
                ))
            }
        }
    });
}

/// Physical parameters of the scattering model. Anything not given takes the
/// Johnson et al. (2018) value for Sgr A*.
#[derive(Parser, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(super) struct ScatteringModelArgs {
    #[clap(long, help = ALPHA_HELP.as_str(), help_heading = "SCATTERING MODEL")]
    pub(super) alpha: Option<f64>,

    #[clap(long, help = R_IN_HELP.as_str(), help_heading = "SCATTERING MODEL")]
    pub(super) rin: Option<f64>,

    #[clap(long, help = THETA_MAJ_HELP.as_str(), help_heading = "SCATTERING MODEL")]
    pub(super) theta_maj: Option<f64>,

    #[clap(long, help = THETA_MIN_HELP.as_str(), help_heading = "SCATTERING MODEL")]
    pub(super) theta_min: Option<f64>,

    #[clap(
        long,
        help = POS_ANG_HELP.as_str(),
        help_heading = "SCATTERING MODEL",
        allow_hyphen_values = true
    )]
    pub(super) pos_ang: Option<f64>,

    #[clap(long, help = LAMBDA0_HELP.as_str(), help_heading = "SCATTERING MODEL")]
    pub(super) lambda0: Option<f64>,

    #[clap(long, help = SCREEN_DISTANCE_HELP.as_str(), help_heading = "SCATTERING MODEL")]
    pub(super) screen_distance: Option<f64>,

    #[clap(long, help = SOURCE_DISTANCE_HELP.as_str(), help_heading = "SCATTERING MODEL")]
    pub(super) source_distance: Option<f64>,

    #[clap(long, help = ANISOTROPY_HELP.as_str(), help_heading = "SCATTERING MODEL")]
    pub(super) anisotropy: Option<String>,
}

impl ScatteringModelArgs {
    /// Prefer `self` over `other`.
    pub(super) fn merge(self, other: Self) -> Self {
        Self {
            alpha: self.alpha.or(other.alpha),
            rin: self.rin.or(other.rin),
            theta_maj: self.theta_maj.or(other.theta_maj),
            theta_min: self.theta_min.or(other.theta_min),
            pos_ang: self.pos_ang.or(other.pos_ang),
            lambda0: self.lambda0.or(other.lambda0),
            screen_distance: self.screen_distance.or(other.screen_distance),
            source_distance: self.source_distance.or(other.source_distance),
            anisotropy: self.anisotropy.or(other.anisotropy),
        }
    }

    /// Fill in defaults. The parameters aren't checked for physical sense
    /// here; that happens when a model is built from them.
    pub(super) fn parse(self) -> Result<ScatteringModelParams, ScatterError> {
        let Self {
            alpha,
            rin,
            theta_maj,
            theta_min,
            pos_ang,
            lambda0,
            screen_distance,
            source_distance,
            anisotropy,
        } = self;

        let anisotropy = match anisotropy {
            None => AnisotropyType::default(),
            Some(s) => AnisotropyType::from_str(&s).map_err(|_| {
                ScatterError::Model(format!(
                    "Unrecognised anisotropy family '{s}'. Supported families: {}",
                    *ANISOTROPY_TYPES_COMMA_SEPARATED
                ))
            })?,
        };

        Ok(ScatteringModelParams {
            alpha: alpha.unwrap_or(DEFAULT_ALPHA),
            r_in_cm: rin.unwrap_or(DEFAULT_R_IN_CM),
            theta_maj_mas: theta_maj.unwrap_or(DEFAULT_THETA_MAJ_MAS),
            theta_min_mas: theta_min.unwrap_or(DEFAULT_THETA_MIN_MAS),
            pos_ang_deg: pos_ang.unwrap_or(DEFAULT_POS_ANG_DEG),
            lambda0_cm: lambda0.unwrap_or(DEFAULT_LAMBDA0_CM),
            screen_distance_pc: screen_distance.unwrap_or(DEFAULT_SCREEN_DISTANCE_PC),
            source_distance_pc: source_distance.unwrap_or(DEFAULT_SOURCE_DISTANCE_PC),
            anisotropy,
        })
    }
}

/// Lines describing the physical inputs of a model, for an [`InfoPrinter`].
pub(super) fn describe_params(params: &ScatteringModelParams) -> Vec<std::borrow::Cow<'static, str>> {
    vec![
        format!("α: {}", params.alpha).into(),
        format!("Inner scale: {:e} cm", params.r_in_cm).into(),
        format!(
            "FWHMs at {} cm: {} × {} mas",
            params.lambda0_cm, params.theta_maj_mas, params.theta_min_mas
        )
        .into(),
        format!("Position angle: {}°", params.pos_ang_deg).into(),
        format!(
            "Screen distance: {} pc, source distance: {} pc",
            params.screen_distance_pc, params.source_distance_pc
        )
        .into(),
        format!("Anisotropy: {}", params.anisotropy).into(),
    ]
}
