//! Unit tests for FTP and zone estimation from power tests.

use chrono::{TimeZone, Utc};
use rustcoach::metrics::analytics::{
    estimate, AnalyticsError, CpModel, EstimationMethod, PowerTestSet, TestDuration,
    ZoneEstimator,
};

fn single(duration: TestDuration, watts: u32) -> u32 {
    estimate(&PowerTestSet::new().with(duration, watts))
        .unwrap()
        .ftp
}

#[test]
fn test_single_test_ratios() {
    assert_eq!(single(TestDuration::FiveMinute, 300), 246);
    assert_eq!(single(TestDuration::EightMinute, 300), 270);
    assert_eq!(single(TestDuration::FifteenMinute, 300), 279);
    assert_eq!(single(TestDuration::TwentyMinute, 300), 285);
}

#[test]
fn test_single_test_metadata() {
    let tests = PowerTestSet::new().with(TestDuration::FifteenMinute, 300);
    let result = estimate(&tests).unwrap();

    let meta = &result.season_data;
    assert_eq!(meta.method, EstimationMethod::SingleTestEstimation);
    assert_eq!(meta.w_prime, 0);
    assert_eq!(meta.critical_power, result.ftp);
    assert_eq!(meta.source_tests, vec![TestDuration::FifteenMinute]);
    assert!(meta.r_squared.is_none());
}

#[test]
fn test_two_test_regression() {
    let tests = PowerTestSet::new()
        .with(TestDuration::FiveMinute, 350)
        .with(TestDuration::TwentyMinute, 280);
    let result = estimate(&tests).unwrap();

    // Work: 105 kJ at 300 s, 336 kJ at 1200 s
    assert_eq!(result.ftp, 257);
    assert_eq!(result.season_data.w_prime, 28000);
    assert_eq!(
        result.season_data.method,
        EstimationMethod::CriticalPowerRegression
    );
    assert_eq!(
        result.season_data.source_tests,
        vec![TestDuration::FiveMinute, TestDuration::TwentyMinute]
    );
    // Two points fit exactly
    assert!((result.season_data.r_squared.unwrap() - 1.0).abs() < 1e-9);

    // CP is used directly as FTP, 1.5 × 257 = 385.5 rounds up
    assert_eq!(result.zones.z6.max, 386);
    assert_eq!(result.zones.z7.min, 387);
}

#[test]
fn test_four_test_regression() {
    let tests = PowerTestSet::new()
        .with(TestDuration::FiveMinute, 350)
        .with(TestDuration::EightMinute, 320)
        .with(TestDuration::FifteenMinute, 290)
        .with(TestDuration::TwentyMinute, 280);
    let result = estimate(&tests).unwrap();

    assert_eq!(result.ftp, 256);
    assert!(result.season_data.w_prime > 29_000 && result.season_data.w_prime < 30_000);
    assert_eq!(result.season_data.source_tests, TestDuration::ALL.to_vec());
    assert!(result.season_data.r_squared.unwrap() > 0.99);
    assert!(result.zones.is_monotonic());
}

#[test]
fn test_strong_five_minute_lifts_z6() {
    // Work: 150 kJ at 300 s, 300 kJ at 1200 s -> CP 167, W' 100 kJ
    let tests = PowerTestSet::new()
        .with(TestDuration::FiveMinute, 500)
        .with(TestDuration::TwentyMinute, 250);
    let result = estimate(&tests).unwrap();

    assert_eq!(result.ftp, 167);
    assert_eq!(result.season_data.w_prime, 100_000);
    assert_eq!(result.zones.z6.max, 500);
    assert_eq!(result.zones.z7.min, 501);
}

#[test]
fn test_measured_five_minute_override() {
    // Work: 120 kJ at 300 s, 336 kJ at 1200 s -> CP 240, 1.5 × CP = 360
    let tests = PowerTestSet::new()
        .with(TestDuration::FiveMinute, 400)
        .with(TestDuration::TwentyMinute, 280);
    let result = estimate(&tests).unwrap();

    assert_eq!(result.ftp, 240);
    assert_eq!(result.zones.z6.max, 400);
    assert!(result.zones.is_monotonic());
}

#[test]
fn test_extreme_test_values_keep_zones_ordered() {
    let huge_five = PowerTestSet::new().with(TestDuration::FiveMinute, u32::MAX);
    let result = estimate(&huge_five).unwrap();
    assert!(result.zones.is_monotonic());
    assert_eq!(result.zones.z7.min, u32::MAX);

    let huge_twenty = PowerTestSet::new().with(TestDuration::TwentyMinute, u32::MAX);
    assert!(estimate(&huge_twenty).unwrap().zones.is_monotonic());

    let both = huge_five.with(TestDuration::TwentyMinute, u32::MAX);
    let result = estimate(&both).unwrap();
    assert!(result.zones.is_monotonic());
}

#[test]
fn test_zero_values_are_absent() {
    let tests = PowerTestSet {
        p5min: Some(0),
        p8min: None,
        p15min: Some(0),
        p20min: Some(280),
    };
    let result = estimate(&tests).unwrap();
    assert_eq!(result.ftp, 266);
    assert_eq!(
        result.season_data.method,
        EstimationMethod::SingleTestEstimation
    );
}

#[test]
fn test_no_valid_test() {
    assert_eq!(
        estimate(&PowerTestSet::new()).unwrap_err(),
        AnalyticsError::NoValidTest
    );
    let zeros = PowerTestSet::new()
        .with(TestDuration::FiveMinute, 0)
        .with(TestDuration::TwentyMinute, 0);
    assert_eq!(estimate(&zeros).unwrap_err(), AnalyticsError::NoValidTest);
}

#[test]
fn test_falling_work_is_degenerate() {
    // Less total work over the longer test
    let tests = PowerTestSet::new()
        .with(TestDuration::FiveMinute, 1000)
        .with(TestDuration::TwentyMinute, 200);
    assert!(matches!(
        estimate(&tests),
        Err(AnalyticsError::DegenerateRegression(_))
    ));
}

#[test]
fn test_estimate_is_stamped() {
    let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    let tests = PowerTestSet::new().with(TestDuration::TwentyMinute, 280);
    let result = ZoneEstimator::new().estimate_at(&tests, at).unwrap();
    assert_eq!(result.season_data.calculated_at, at);
}

#[test]
fn test_configured_ceiling() {
    let tests = PowerTestSet::new().with(TestDuration::TwentyMinute, 280);
    let result = ZoneEstimator::with_zone_ceiling(1500)
        .estimate(&tests)
        .unwrap();
    assert_eq!(result.zones.z7.max, 1500);
}

#[test]
fn test_ftp_result_json_shape() {
    let tests = PowerTestSet::new().with(TestDuration::TwentyMinute, 280);
    let json = serde_json::to_value(estimate(&tests).unwrap()).unwrap();

    assert_eq!(json["ftp"], 266);
    assert_eq!(json["seasonData"]["method"], "SingleTestEstimation");
    assert_eq!(json["seasonData"]["sourceTests"][0], "20min");
    assert_eq!(json["seasonData"]["wPrime"], 0);
    assert!(json["seasonData"].get("rSquared").is_none());
}

#[test]
fn test_power_test_set_json() {
    let tests: PowerTestSet = serde_json::from_str(r#"{"p5min": 350, "p20min": 280}"#).unwrap();
    assert_eq!(tests.get(TestDuration::FiveMinute), Some(350));
    assert_eq!(tests.get(TestDuration::EightMinute), None);
    assert_eq!(tests.valid_tests().len(), 2);
}

#[test]
fn test_cp_model_predictions() {
    let model = CpModel::fit(&[(300, 350), (1200, 280)]).unwrap();

    // 28 kJ spent at 100 W over CP lasts 280 s
    let tte = model.time_to_exhaustion(357).unwrap();
    assert!((tte.as_secs_f64() - 280.0).abs() < 1e-6);
    assert!(model.time_to_exhaustion(250).is_none());

    assert_eq!(
        model.power_at_duration(std::time::Duration::from_secs(1200)),
        280
    );
}
