// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Build a scattering model and report its derived constants.

use std::path::PathBuf;

use clap::Parser;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use super::{
    common::{describe_params, display_warnings, InfoPrinter, ScatteringModelArgs, ARG_FILE_HELP},
    ScatterError,
};
use crate::{scattering::ScatteringModel, units::nu2lambda_cm};

/// Frequencies at which the scattered image size is reported [Hz].
const REPORT_FREQS_HZ: [f64; 3] = [86e9, 230e9, 345e9];

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct ModelArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) args_file: Option<PathBuf>,

    #[clap(flatten)]
    #[serde(rename = "model")]
    #[serde(default)]
    pub(super) model_args: ScatteringModelArgs,
}

impl ModelArgs {
    /// Consolidate the command-line arguments with those in the arguments
    /// file (if any), preferring the command line.
    pub(super) fn merge(self) -> Result<ModelArgs, ScatterError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            let ModelArgs {
                args_file: _,
                model_args,
            } = unpack_arg_file!(arg_file);

            Ok(ModelArgs {
                args_file: None,
                model_args: cli_args.model_args.merge(model_args),
            })
        } else {
            Ok(cli_args)
        }
    }

    pub(super) fn run(self, dry_run: bool) -> Result<(), ScatterError> {
        debug!("Converting arguments into parameters");
        trace!("{:#?}", self);
        let params = self.model_args.parse()?;

        let mut printer = InfoPrinter::new("Scattering model parameters".into());
        printer.push_block(describe_params(&params));
        printer.display();
        display_warnings();

        if dry_run {
            info!("Dry run -- exiting now.");
            return Ok(());
        }

        let model = ScatteringModel::<f64>::new(&params)?;

        let mut printer = InfoPrinter::new("Derived constants".into());
        printer.push_block(vec![
            format!("M:    {}", model.m()).into(),
            format!("A:    {}", model.a()).into(),
            format!("ζ0:   {}", model.zeta0()).into(),
            format!("kζ:   {}", model.kzeta()).into(),
            format!("Pϕ0:  {}", model.p_phi0()).into(),
            format!("ϕ0:   {} rad", model.phi0()).into(),
        ]);
        printer.push_block(vec![
            format!("Qbar: {:e}", model.qbar()).into(),
            format!("C:    {}", model.c()).into(),
            format!("Amaj: {}", model.amaj()).into(),
            format!("Amin: {}", model.amin()).into(),
            format!("Bmaj: {}", model.bmaj()).into(),
            format!("Bmin: {}", model.bmin()).into(),
        ]);
        printer.display();

        let mut printer = InfoPrinter::new("Scattered image size (Gaussian limit)".into());
        for freq_hz in REPORT_FREQS_HZ {
            let lambda_cm = nu2lambda_cm(freq_hz);
            printer.push_line(
                format!(
                    "{:>3} GHz: {:.4} × {:.4} mas, Fresnel scale {:.3e} cm",
                    freq_hz / 1e9,
                    model.theta_maj_rad_at(lambda_cm).to_degrees() * 3.6e6,
                    model.theta_min_rad_at(lambda_cm).to_degrees() * 3.6e6,
                    model.fresnel_scale(lambda_cm)
                )
                .into(),
            );
        }
        printer.display();

        Ok(())
    }
}
