// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::f64::consts::{FRAC_PI_2, PI};

use approx::{assert_abs_diff_eq, assert_relative_eq};

use super::*;

fn default_model() -> ScatteringModel {
    ScatteringModel::default_model().unwrap()
}

#[test]
fn test_default_model_constants() {
    let model = default_model();
    let tol = 1e-8;
    assert_relative_eq!(model.m(), 1.5099457504520796, max_relative = tol);
    assert_relative_eq!(model.zeta0(), 0.58792033215918059, max_relative = tol);
    assert_relative_eq!(model.a(), 1.9630156472261735, max_relative = tol);
    assert_relative_eq!(model.kzeta(), 0.85999274048421457, max_relative = tol);
    assert_relative_eq!(model.p_phi0(), 0.29602703876310362, max_relative = tol);
    assert_relative_eq!(model.bmaj(), 10.648153496774235, max_relative = tol);
    assert_relative_eq!(model.bmin(), 3.8198121274697615, max_relative = tol);
    assert_relative_eq!(model.qbar(), 4.042381022103972e19, max_relative = tol);
    assert_relative_eq!(model.c(), 5.8567426819253933, max_relative = tol);
    assert_relative_eq!(model.amaj(), 4.6500203924269103, max_relative = tol);
    assert_relative_eq!(model.amin(), 1.2067222894984829, max_relative = tol);
    assert_relative_eq!(model.phi0(), 0.1413716694115407, max_relative = tol);

    assert_relative_eq!(
        calc_b_prefac(model.alpha(), model.c()),
        12.554088167068291,
        max_relative = tol
    );
}

#[test]
fn test_default_model_inputs() {
    let model = default_model();
    assert_eq!(model.alpha(), 1.38);
    assert_eq!(model.r_in_cm(), 800e5);
    assert_eq!(model.theta_maj_mas(), 1.380);
    assert_eq!(model.theta_min_mas(), 0.703);
    assert_eq!(model.pos_ang_deg(), 81.9);
    assert_eq!(model.lambda0_cm(), 1.0);
    assert_relative_eq!(model.screen_distance_cm(), 2.82 * PC_TO_CM);
    assert_relative_eq!(model.source_distance_cm(), 5.53 * PC_TO_CM);
    assert_eq!(model.get_anisotropy_type(), AnisotropyType::PeriodicBoxcar);
    assert_relative_eq!(
        model.theta_maj_rad(),
        1.380 * 4.8481368110953599e-9,
        max_relative = 1e-14
    );
}

#[test]
fn test_c_is_sum_of_amplitudes() {
    let model = default_model();
    assert_relative_eq!(model.c(), model.amaj() + model.amin(), max_relative = 1e-12);

    let params = ScatteringModelParams {
        alpha: 5.0 / 3.0,
        r_in_cm: 1e9,
        theta_maj_mas: 10.0,
        theta_min_mas: 1.0,
        ..Default::default()
    };
    let model = ScatteringModel::<f64>::new(&params).unwrap();
    assert_relative_eq!(model.c(), model.amaj() + model.amin(), max_relative = 1e-12);
}

#[test]
fn test_construction_is_deterministic() {
    let model = default_model();
    let again = default_model();
    assert_eq!(model, again);
    assert_eq!(model.bmaj().to_bits(), again.bmaj().to_bits());

    let from_threads: Vec<ScatteringModel> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4).map(|_| s.spawn(default_model)).collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    for other in from_threads {
        assert_eq!(model, other);
    }
}

#[test]
fn test_anisotropy_params_match_model() {
    let model = default_model();
    let params = model.anisotropy_params();
    assert_eq!(params.zeta0, model.zeta0());
    assert_eq!(params.kzeta, model.kzeta());
    assert_eq!(params.p_phi0, model.p_phi0());
    assert_eq!(params.phi0, model.phi0());

    assert_eq!(model.p_phi(model.phi0()), model.p_phi0());
    assert_eq!(model.p_phi(model.phi0() + FRAC_PI_2), 0.0);
    assert_eq!(
        model.p_phi(1.234),
        p_phi_boxcar(1.234, model.phi0(), model.kzeta(), model.p_phi0())
    );
}

#[test]
fn test_bmaj_larger_than_bmin() {
    let model = default_model();
    assert!(model.bmaj() > model.bmin());
    assert!(model.amaj() > model.amin());
}

#[test]
fn test_position_angle_does_not_change_magnitudes() {
    let rotated = ScatteringModel::<f64>::new(&ScatteringModelParams {
        pos_ang_deg: -30.0,
        ..Default::default()
    })
    .unwrap();
    let model = default_model();
    assert_relative_eq!(rotated.bmaj(), model.bmaj(), max_relative = 1e-10);
    assert_relative_eq!(rotated.bmin(), model.bmin(), max_relative = 1e-10);
    assert_relative_eq!(rotated.phi0(), 120.0_f64.to_radians(), max_relative = 1e-14);
}

#[test]
fn test_structure_function_limits() {
    let model = default_model();
    let r_in = model.r_in_cm();
    let lambda0 = model.lambda0_cm();

    // Quadratic regime.
    let r = 1e-4 * r_in;
    assert_relative_eq!(
        model.dmaj(r, lambda0),
        model.amaj() * 1e-8,
        max_relative = 1e-6
    );
    assert_relative_eq!(
        model.dmin(r, lambda0),
        model.amin() * 1e-8,
        max_relative = 1e-6
    );

    // Power-law regime.
    let r = 1e6 * r_in;
    let power = 1e6_f64.powf(model.alpha());
    assert_relative_eq!(
        model.dmaj(r, lambda0),
        model.bmaj() * power,
        max_relative = 1e-3
    );
    assert_relative_eq!(
        model.dmin(r, lambda0),
        model.bmin() * power,
        max_relative = 1e-3
    );

    // Zero separation.
    assert_eq!(model.dmaj(0.0, lambda0), 0.0);
    assert_eq!(model.dphi_approx(0.0, 0.3, lambda0), 0.0);
}

#[test]
fn test_structure_function_wavelength_scaling() {
    let model = default_model();
    let r = 3.0 * model.r_in_cm();
    assert_relative_eq!(
        model.dmaj(r, 2.0),
        4.0 * model.dmaj(r, 1.0),
        max_relative = 1e-14
    );
}

#[test]
fn test_dphi_approx_along_axes() {
    let model = default_model();
    let r = 2.5 * model.r_in_cm();
    let lambda = 0.13;
    let dmaj = model.dmaj(r, lambda);
    let dmin = model.dmin(r, lambda);

    assert_relative_eq!(
        model.dphi_approx(r, model.phi0(), lambda),
        dmaj,
        max_relative = 1e-14
    );
    assert_relative_eq!(
        model.dphi_approx(r, model.phi0() + FRAC_PI_2, lambda),
        dmin,
        max_relative = 1e-12
    );
    // π-periodic.
    assert_relative_eq!(
        model.dphi_approx(r, 0.4, lambda),
        model.dphi_approx(r, 0.4 + PI, lambda),
        max_relative = 1e-12
    );
}

#[test]
fn test_gaussian_limit_widths() {
    let model = default_model();
    let theta_1cm = model.theta_maj_rad_at(1.0);
    assert_relative_eq!(theta_1cm, model.theta_maj_rad());
    assert_relative_eq!(
        model.theta_maj_rad_at(3.0),
        9.0 * theta_1cm,
        max_relative = 1e-14
    );
    assert_relative_eq!(
        model.theta_maj_rad_at(0.5) / model.theta_min_rad_at(0.5),
        model.a(),
        max_relative = 1e-14
    );
}

#[test]
fn test_fresnel_scale() {
    let model = default_model();
    let d = 2.82 * PC_TO_CM;
    let r = 5.53 * PC_TO_CM;
    let expected = (d * r / (d + r) * 0.13 / (2.0 * PI)).sqrt();
    assert_relative_eq!(model.fresnel_scale(0.13), expected, max_relative = 1e-14);
}

#[test]
fn test_f32_model() {
    let single = ScatteringModel::<f32>::default_model().unwrap();
    let double = default_model();
    assert_relative_eq!(single.kzeta() as f64, double.kzeta(), max_relative = 1e-5);
    assert_relative_eq!(single.bmaj() as f64, double.bmaj(), max_relative = 1e-4);
    assert_relative_eq!(single.bmin() as f64, double.bmin(), max_relative = 1e-4);
    assert_relative_eq!(single.qbar() as f64, double.qbar(), max_relative = 1e-4);
}

#[test]
fn test_invalid_parameters() {
    let check = |params: ScatteringModelParams| {
        let result = ScatteringModel::<f64>::new(&params);
        match result {
            Err(ScatteringError::Configuration(e)) => e,
            _ => panic!("expected a configuration error, got {result:?}"),
        }
    };

    let e = check(ScatteringModelParams {
        alpha: 2.0,
        ..Default::default()
    });
    assert_eq!(e, ConfigurationError::AlphaOutOfRange(2.0));
    let e = check(ScatteringModelParams {
        alpha: 0.0,
        ..Default::default()
    });
    assert_eq!(e, ConfigurationError::AlphaOutOfRange(0.0));

    let e = check(ScatteringModelParams {
        r_in_cm: -1.0,
        ..Default::default()
    });
    assert!(matches!(e, ConfigurationError::NotPositive { value, .. } if value == -1.0));

    let e = check(ScatteringModelParams {
        screen_distance_pc: 0.0,
        ..Default::default()
    });
    assert!(matches!(e, ConfigurationError::NotPositive { .. }));

    let e = check(ScatteringModelParams {
        lambda0_cm: f64::NAN,
        ..Default::default()
    });
    assert!(matches!(e, ConfigurationError::NotFinite { .. }));

    let e = check(ScatteringModelParams {
        pos_ang_deg: f64::INFINITY,
        ..Default::default()
    });
    assert!(matches!(e, ConfigurationError::NotFinite { .. }));

    // Isotropic and inverted kernels have ζ0 ≤ 0.
    let e = check(ScatteringModelParams {
        theta_maj_mas: 1.0,
        theta_min_mas: 1.0,
        ..Default::default()
    });
    assert_eq!(e, ConfigurationError::NotAnisotropic { maj: 1.0, min: 1.0 });
    let e = check(ScatteringModelParams {
        theta_maj_mas: 0.5,
        theta_min_mas: 1.0,
        ..Default::default()
    });
    assert!(matches!(e, ConfigurationError::NotAnisotropic { .. }));
}

#[test]
fn test_negative_position_angle_is_allowed() {
    let model = ScatteringModel::<f64>::new(&ScatteringModelParams {
        pos_ang_deg: -81.9,
        ..Default::default()
    });
    assert!(model.is_ok());
}

#[test]
fn test_extreme_anisotropy_is_rejected_or_solved() {
    // ζ0 rounds to 1 here.
    let result = ScatteringModel::<f64>::new(&ScatteringModelParams {
        theta_maj_mas: 1e10,
        theta_min_mas: 1e-10,
        ..Default::default()
    });
    assert!(
        matches!(
            result,
            Err(ScatteringError::Configuration(
                ConfigurationError::ZetaOutOfRange(_)
            ))
        ),
        "{result:?}"
    );

    let model = ScatteringModel::<f64>::new(&ScatteringModelParams {
        theta_maj_mas: 30.0,
        theta_min_mas: 1.0,
        ..Default::default()
    })
    .unwrap();
    assert!(model.kzeta() > 10.0);
    assert!(model.bmaj() > model.bmin());
}

#[test]
fn test_params_serde() {
    let params: ScatteringModelParams =
        toml::from_str("alpha = 1.5\nanisotropy = \"boxcar\"").unwrap();
    assert_eq!(params.alpha, 1.5);
    assert_eq!(params.r_in_cm, DEFAULT_R_IN_CM);
    assert_eq!(params.anisotropy, AnisotropyType::PeriodicBoxcar);

    let params: ScatteringModelParams =
        serde_json::from_str(r#"{"theta_maj_mas": 2.0, "anisotropy": "periodic-boxcar"}"#)
            .unwrap();
    assert_eq!(params.theta_maj_mas, 2.0);
    assert_eq!(params.theta_min_mas, DEFAULT_THETA_MIN_MAS);

    let json = serde_json::to_string(&ScatteringModelParams::default()).unwrap();
    assert!(json.contains(r#""anisotropy":"boxcar""#));
}

#[test]
fn test_b_coefficients_for_near_isotropic_screen() {
    // A barely anisotropic screen has a barely directional structure function.
    let model = ScatteringModel::<f64>::new(&ScatteringModelParams {
        theta_maj_mas: 1.0001,
        theta_min_mas: 1.0,
        ..Default::default()
    })
    .unwrap();
    assert_relative_eq!(model.bmaj(), model.bmin(), max_relative = 1e-2);
    assert_abs_diff_eq!(model.zeta0(), 1e-4, epsilon = 1e-6);
}

#[test]
fn test_kzeta_is_accurate_for_tiny_anisotropy() {
    let model = ScatteringModel::<f64>::new(&ScatteringModelParams {
        theta_maj_mas: 1.0 + 2e-13,
        theta_min_mas: 1.0,
        ..Default::default()
    })
    .unwrap();
    assert_relative_eq!(model.zeta0(), 2e-13, max_relative = 1e-3);
    // ζ0 ≈ kζ in this limit.
    assert_relative_eq!(model.kzeta(), model.zeta0(), max_relative = 1e-11);
    assert_relative_eq!(
        boxcar_zeta(model.kzeta()),
        model.zeta0(),
        max_relative = 1e-11
    );
    assert_relative_eq!(model.bmaj(), model.bmin(), max_relative = 1e-6);
}

#[test]
fn test_zeta0_near_isotropy() {
    // A² − 1 would cancel catastrophically here.
    let a = 1.0 + 2.0_f64.powi(-40);
    let expected = 2.0_f64.powi(-40) * (2.0 + 2.0_f64.powi(-40)) / (a * a + 1.0);
    assert_relative_eq!(derive::calc_zeta0(a), expected, max_relative = 1e-15);
}
