// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Evaluate the scattering kernel on a grid of baselines.


use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use clap::Parser;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    common::{
        describe_params, display_warnings, InfoPrinter, ScatteringModelArgs, Warn, ARG_FILE_HELP,
    },
    ScatterError,
};
use crate::{
    kernel::ApproximatedScatteringKernel,
    math::{float, to_f64},
    scattering::{ScatteringFloat, ScatteringModel, ScatteringModelParams},
    units::parse_freq_hz,
};

const DEFAULT_REF_FREQ: &str = "230GHz";
const DEFAULT_MAX_BASELINE: f64 = 1e10;
const DEFAULT_NUM_POINTS: usize = 101;
const DEFAULT_OUTPUT: &str = "scattering_kernel.tsv";

lazy_static::lazy_static! {
    static ref REF_FREQ_HELP: String =
        format!("The reference frequency of the kernel. A unit (Hz, kHz, MHz, GHz) may be given; without one, Hz is assumed. Default: {DEFAULT_REF_FREQ}");

    static ref FREQ_HELP: String =
        "The frequency at which to evaluate the kernel. A unit (Hz, kHz, MHz, GHz) may be given; without one, Hz is assumed. Default: the reference frequency".to_string();

    static ref MAX_BASELINE_HELP: String =
        format!("The largest |u| and |v| on the grid [wavelengths]. Default: {DEFAULT_MAX_BASELINE:e}");

    static ref NUM_POINTS_HELP: String =
        format!("The number of grid points along each of u and v. Default: {DEFAULT_NUM_POINTS}");

    static ref OUTPUT_HELP: String =
        format!("The file to write the kernel to. Each line is tab-separated u, v, and the real and imaginary parts of the kernel. Default: {DEFAULT_OUTPUT}");
}

#[derive(Parser, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(super) struct KernelCliArgs {
    #[clap(short, long, help = REF_FREQ_HELP.as_str(), help_heading = "KERNEL")]
    pub(super) ref_freq: Option<String>,

    #[clap(short, long, help = FREQ_HELP.as_str(), help_heading = "KERNEL")]
    pub(super) freq: Option<String>,

    #[clap(short, long, help = MAX_BASELINE_HELP.as_str(), help_heading = "KERNEL")]
    pub(super) max_baseline: Option<f64>,

    #[clap(short, long, help = NUM_POINTS_HELP.as_str(), help_heading = "KERNEL")]
    pub(super) num_points: Option<usize>,

    /// Evaluate the model and kernel in single precision.
    #[clap(long, help_heading = "KERNEL")]
    #[serde(default)]
    pub(super) single: bool,

    #[clap(short, long, help = OUTPUT_HELP.as_str(), help_heading = "OUTPUT FILES")]
    pub(super) output: Option<PathBuf>,
}

impl KernelCliArgs {
    fn merge(self, other: Self) -> Self {
        Self {
            ref_freq: self.ref_freq.or(other.ref_freq),
            freq: self.freq.or(other.freq),
            max_baseline: self.max_baseline.or(other.max_baseline),
            num_points: self.num_points.or(other.num_points),
            single: self.single || other.single,
            output: self.output.or(other.output),
        }
    }
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct KernelArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) args_file: Option<PathBuf>,

    #[clap(flatten)]
    #[serde(rename = "model")]
    #[serde(default)]
    pub(super) model_args: ScatteringModelArgs,

    #[clap(flatten)]
    #[serde(rename = "kernel")]
    #[serde(default)]
    pub(super) kernel_args: KernelCliArgs,
}

/// Everything needed to write out a kernel grid.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct KernelParams {
    pub(super) model_params: ScatteringModelParams,
    pub(super) nu_ref_hz: f64,

    /// Zero means the reference frequency.
    pub(super) freq_hz: f64,
    pub(super) max_baseline: f64,
    pub(super) num_points: usize,
    pub(super) single: bool,
    pub(super) output: PathBuf,
}

impl KernelArgs {
    /// Consolidate the command-line arguments with those in the arguments
    /// file (if any), preferring the command line.
    pub(super) fn merge(self) -> Result<KernelArgs, ScatterError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            // Ensure all of the file args are accounted for by pattern
            // matching.
            let KernelArgs {
                args_file: _,
                model_args,
                kernel_args,
            } = unpack_arg_file!(arg_file);

            Ok(KernelArgs {
                args_file: None,
                model_args: cli_args.model_args.merge(model_args),
                kernel_args: cli_args.kernel_args.merge(kernel_args),
            })
        } else {
            Ok(cli_args)
        }
    }

    pub(super) fn parse(self) -> Result<KernelParams, ScatterError> {
        trace!("{:#?}", self);

        let KernelArgs {
            args_file: _,
            model_args,
            kernel_args:
                KernelCliArgs {
                    ref_freq,
                    freq,
                    max_baseline,
                    num_points,
                    single,
                    output,
                },
        } = self;

        let model_params = model_args.parse()?;
        let nu_ref_hz = parse_freq_hz(ref_freq.as_deref().unwrap_or(DEFAULT_REF_FREQ))
            .map_err(KernelArgsError::ParseRefFreq)?;
        if !(nu_ref_hz > 0.0) || !nu_ref_hz.is_finite() {
            return Err(KernelArgsError::BadRefFreq(nu_ref_hz).into());
        }
        let freq_hz = match freq {
            Some(f) => parse_freq_hz(&f).map_err(KernelArgsError::ParseFreq)?,
            None => 0.0,
        };

        let max_baseline = max_baseline.unwrap_or(DEFAULT_MAX_BASELINE);
        if !(max_baseline > 0.0) || !max_baseline.is_finite() {
            return Err(KernelArgsError::BadMaxBaseline(max_baseline).into());
        }

        let num_points = num_points.unwrap_or(DEFAULT_NUM_POINTS);
        match num_points {
            0 => return Err(KernelArgsError::NoPoints.into()),
            n if n % 2 == 0 => format!(
                "An even number of grid points ({n}) doesn't include the zero-length baseline"
            )
            .warn(),
            _ => (),
        }

        Ok(KernelParams {
            model_params,
            nu_ref_hz,
            freq_hz,
            max_baseline,
            num_points,
            single,
            output: output.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
        })
    }

    pub(super) fn run(self, dry_run: bool) -> Result<(), ScatterError> {
        debug!("Converting arguments into parameters");
        let params = self.parse()?;

        let mut printer = InfoPrinter::new("Scattering model parameters".into());
        printer.push_block(describe_params(&params.model_params));
        printer.display();

        let mut printer = InfoPrinter::new("Kernel grid".into());
        printer.push_line(format!("Reference frequency: {} Hz", params.nu_ref_hz).into());
        if params.freq_hz == 0.0 {
            printer.push_line("Evaluation frequency: the reference frequency".into());
        } else {
            printer.push_line(format!("Evaluation frequency: {} Hz", params.freq_hz).into());
        }
        printer.push_block(vec![
            format!(
                "{n} × {n} points, |u|, |v| ≤ {:e} wavelengths",
                params.max_baseline,
                n = params.num_points
            )
            .into(),
            format!(
                "Precision: {}",
                if params.single { "single" } else { "double" }
            )
            .into(),
        ]);
        printer.push_line(format!("Output: {}", params.output.display()).into());
        printer.display();
        display_warnings();

        if dry_run {
            info!("Dry run -- exiting now.");
            return Ok(());
        }

        if params.single {
            write_kernel_grid::<f32>(&params)
        } else {
            write_kernel_grid::<f64>(&params)
        }
    }
}

/// Evenly spaced points from `-max` to `max` inclusive.
pub(super) fn gen_baselines<F: ScatteringFloat>(max: f64, num_points: usize) -> Vec<F> {
    if num_points == 1 {
        return vec![F::zero()];
    }
    let step = 2.0 * max / (num_points - 1) as f64;
    (0..num_points)
        .map(|i| float(-max + step * i as f64))
        .collect()
}

fn write_kernel_grid<F: ScatteringFloat>(params: &KernelParams) -> Result<(), ScatterError> {
    let model = ScatteringModel::<F>::new(&params.model_params)?;
    let kernel = ApproximatedScatteringKernel::new(&model, float(params.nu_ref_hz))?;
    info!(
        "Kernel angular scale: {:e} rad",
        to_f64(kernel.angular_scale())
    );

    let baselines: Vec<F> = gen_baselines(params.max_baseline, params.num_points);
    let grid = kernel.visibility_grid(&baselines, &baselines, float(params.freq_hz))?;

    write_tsv(&params.output, &baselines, &baselines, grid.view())?;
    info!("Wrote {}", params.output.display());
    Ok(())
}

fn write_tsv<F: ScatteringFloat>(
    path: &Path,
    us: &[F],
    vs: &[F],
    grid: ndarray::ArrayView2<num_complex::Complex<F>>,
) -> Result<(), std::io::Error> {
    let mut out = BufWriter::new(File::create(path)?);
    for (row, v) in grid.outer_iter().zip(vs) {
        for (vis, u) in row.iter().zip(us) {
            writeln!(
                &mut out,
                "{:e}\t{:e}\t{:e}\t{:e}",
                to_f64(*u),
                to_f64(*v),
                to_f64(vis.re),
                to_f64(vis.im)
            )?;
        }
    }
    out.flush()
}

#[derive(Error, Debug)]
pub(super) enum KernelArgsError {
    #[error("Couldn't parse the reference frequency: {0}")]
    ParseRefFreq(crate::units::UnitParseError),

    #[error("The reference frequency must be positive, but got {0} Hz")]
    BadRefFreq(f64),

    #[error("Couldn't parse the evaluation frequency: {0}")]
    ParseFreq(crate::units::UnitParseError),

    #[error("The maximum baseline must be a positive number of wavelengths, but got {0}")]
    BadMaxBaseline(f64),

    #[error("The kernel grid needs at least one point")]
    NoPoints,
}
