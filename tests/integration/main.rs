// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Integration tests.
//!
//! Some help for laying out these tests was taken from:
//! https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::str::from_utf8;

use approx::assert_abs_diff_eq;
use assert_cmd::{output::OutputError, Command};
use indoc::indoc;
use tempfile::TempDir;

fn scatter() -> Command {
    Command::cargo_bin("scatter").unwrap()
}

fn get_cmd_output(result: Result<Output, OutputError>) -> (String, String) {
    let output = match result {
        Ok(o) => o,
        Err(o) => o.as_output().unwrap().clone(),
    };
    (
        from_utf8(&output.stdout).unwrap().to_string(),
        from_utf8(&output.stderr).unwrap().to_string(),
    )
}

fn make_file_in_dir<T: AsRef<Path>, U: AsRef<Path>>(filename: T, dir: U) -> (PathBuf, File) {
    let path = dir.as_ref().join(filename);
    let f = File::create(&path).expect("couldn't make file");
    (path, f)
}

/// Read a kernel TSV back as rows of (u, v, re, im).
fn read_kernel_tsv(path: &Path) -> Vec<[f64; 4]> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| {
            let values: Vec<f64> = line.split('\t').map(|s| s.parse().unwrap()).collect();
            assert_eq!(values.len(), 4, "bad line: {line}");
            [values[0], values[1], values[2], values[3]]
        })
        .collect()
}

#[test]
fn test_help_is_correct() {
    let cmd = scatter().arg("--help").ok();
    assert!(cmd.is_ok());
    let (stdout, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty());
    assert!(stdout.contains("model"));
    assert!(stdout.contains("kernel"));

    let cmd = scatter().args(["kernel", "-h"]).ok();
    assert!(cmd.is_ok());
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("--ref-freq"));
    assert!(stdout.contains("--theta-maj"));
}

#[test]
fn test_model_prints_derived_constants() {
    let cmd = scatter().arg("model").ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    let (stdout, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty(), "{stderr}");
    assert!(stdout.contains("Derived constants"));
    assert!(stdout.contains("kζ:   0.8599927"));
    assert!(stdout.contains("Bmaj: 10.64815"));
    assert!(stdout.contains("230 GHz"));
}

#[test]
fn test_model_dry_run_skips_derivation() {
    let cmd = scatter().args(["model", "--dry-run"]).ok();
    assert!(cmd.is_ok());
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("Scattering model parameters"));
    assert!(stdout.contains("Dry run"));
    assert!(!stdout.contains("Derived constants"));
}

#[test]
fn test_model_rejects_bad_alpha() {
    let cmd = scatter().args(["model", "--alpha", "2.5"]).ok();
    assert!(cmd.is_err());
    let output = cmd.unwrap_err().as_output().unwrap().clone();
    assert_eq!(output.status.code(), Some(1));
    let stderr = from_utf8(&output.stderr).unwrap();
    assert!(stderr.starts_with("Error:"), "{stderr}");
    assert!(stderr.contains("scatter model --help"), "{stderr}");
}

#[test]
fn test_model_rejects_isotropic_screen() {
    let cmd = scatter()
        .args(["model", "--theta-maj", "1.0", "--theta-min", "1.0"])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("Error:"), "{stderr}");
}

#[test]
fn test_model_accepts_negative_position_angle() {
    let cmd = scatter().args(["model", "--pos-ang", "-30"]).ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
}

#[test]
fn test_kernel_writes_grid() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let output = tmp_dir.path().join("kernel.tsv");
    #[rustfmt::skip]
    let cmd = scatter()
        .args([
            "kernel",
            "-n", "5",
            "-m", "4e9",
            "-o", &format!("{}", output.display()),
        ])
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));

    let rows = read_kernel_tsv(&output);
    assert_eq!(rows.len(), 25);
    // v is the outer loop; the middle point is the zero-length baseline.
    assert_abs_diff_eq!(rows[0][0], -4e9);
    assert_abs_diff_eq!(rows[0][1], -4e9);
    assert_abs_diff_eq!(rows[1][0], -2e9);
    assert_abs_diff_eq!(rows[12][0], 0.0);
    assert_abs_diff_eq!(rows[12][1], 0.0);
    assert_abs_diff_eq!(rows[12][2], 1.0);
    for row in &rows {
        assert!(row[2] > 0.0 && row[2] <= 1.0);
        assert_abs_diff_eq!(row[3], 0.0);
    }
    // The kernel is centrosymmetric.
    for (a, b) in rows.iter().zip(rows.iter().rev()) {
        assert_abs_diff_eq!(a[2], b[2], epsilon = 1e-12);
    }
}

#[test]
fn test_kernel_single_precision_agrees_with_double() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let double = tmp_dir.path().join("double.tsv");
    let single = tmp_dir.path().join("single.tsv");

    let cmd = scatter()
        .args(["kernel", "-n", "3", "-o"])
        .arg(&double)
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    let cmd = scatter()
        .args(["kernel", "-n", "3", "--single", "-o"])
        .arg(&single)
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));

    for (d, s) in read_kernel_tsv(&double)
        .into_iter()
        .zip(read_kernel_tsv(&single))
    {
        assert_abs_diff_eq!(d[2], s[2], epsilon = 1e-4);
    }
}

#[test]
fn test_kernel_dry_run_writes_nothing() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let output = tmp_dir.path().join("kernel.tsv");
    let cmd = scatter()
        .args(["kernel", "--dry-run", "-o"])
        .arg(&output)
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    assert!(!output.exists());
}

#[test]
fn test_kernel_rejects_bad_frequencies() {
    let cmd = scatter().args(["kernel", "--dry-run", "-r", "230 furlongs"]).ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("reference frequency"), "{stderr}");
    assert!(stderr.contains("scatter kernel --help"), "{stderr}");

    let cmd = scatter().args(["kernel", "--dry-run", "-r", "0GHz"]).ok();
    assert!(cmd.is_err());

    let cmd = scatter().args(["kernel", "--dry-run", "-f", "lots"]).ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("evaluation frequency"), "{stderr}");
}

#[test]
fn test_kernel_args_file_is_used_and_overridden() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let output = tmp_dir.path().join("from_file.tsv");
    let (args_file, mut f) = make_file_in_dir("args.toml", tmp_dir.path());
    write!(
        f,
        indoc! {r#"
            [model]
            theta_maj = 2.0
            theta_min = 1.0

            [kernel]
            num_points = 7
            output = "{}"
        "#},
        output.display()
    )
    .unwrap();
    drop(f);

    let cmd = scatter().arg("kernel").arg(&args_file).ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("2 × 1 mas"), "{stdout}");
    assert_eq!(read_kernel_tsv(&output).len(), 49);

    // Command-line arguments win.
    let cmd = scatter()
        .arg("kernel")
        .arg(&args_file)
        .args(["-n", "3"])
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    assert_eq!(read_kernel_tsv(&output).len(), 9);
}

#[test]
fn test_bad_args_file_extension() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let (args_file, _) = make_file_in_dir("args.yaml", tmp_dir.path());
    let cmd = scatter().arg("model").arg(&args_file).ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("recognised file extension"), "{stderr}");
}

#[test]
fn test_save_toml_reproduces_run() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let toml_path = tmp_dir.path().join("saved.toml");
    let cmd = scatter()
        .args(["model", "--dry-run", "--alpha", "1.5", "--save-toml"])
        .arg(&toml_path)
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));

    let contents = std::fs::read_to_string(&toml_path).unwrap();
    assert!(contents.contains("[model]"), "{contents}");
    assert!(contents.contains("alpha = 1.5"), "{contents}");

    let cmd = scatter().args(["model", "--dry-run"]).arg(&toml_path).ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("α: 1.5"), "{stdout}");
}
