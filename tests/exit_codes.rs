//! Tests for exit code policies (--fail-on flag)

use cloud_takeover::error_handling::{ScanError, ScanErrorKind};
use cloud_takeover::models::ZoneMetadata;
use cloud_takeover::{
    evaluate_exit_code, AccountRef, CloudProvider, FailOn, Finding, ResourceType, ScanReport,
};

fn report(findings: usize, errors: usize) -> ScanReport {
    ScanReport {
        provider: CloudProvider::Aws,
        accounts_scanned: 3,
        findings: (0..findings)
            .map(|i| Finding {
                record_name: format!("r{}.example.com", i),
                target_host: format!("r{}.eu-south-1.elasticbeanstalk.com", i),
                resource_type: ResourceType::ElasticBeanstalk,
                origin_zone: ZoneMetadata {
                    name: "example.com".to_string(),
                    id: "/hostedzone/Z0PROD".to_string(),
                },
            })
            .collect(),
        errors: (0..errors)
            .map(|i| {
                ScanError::new(
                    AccountRef::new(format!("{}", i), "legacy"),
                    ScanErrorKind::Credentials,
                    "AccessDenied",
                )
            })
            .collect(),
        elapsed_seconds: 1.0,
    }
}

#[test]
fn test_fail_on_never_always_returns_zero() {
    assert_eq!(evaluate_exit_code(&FailOn::Never, &report(0, 0)), 0);
    assert_eq!(evaluate_exit_code(&FailOn::Never, &report(5, 2)), 0);
}

#[test]
fn test_fail_on_findings() {
    assert_eq!(evaluate_exit_code(&FailOn::Findings, &report(1, 0)), 2);
    assert_eq!(evaluate_exit_code(&FailOn::Findings, &report(0, 0)), 0);
    // failed accounts alone do not trip the findings policy
    assert_eq!(evaluate_exit_code(&FailOn::Findings, &report(0, 3)), 0);
}

#[test]
fn test_fail_on_any_error() {
    assert_eq!(evaluate_exit_code(&FailOn::AnyError, &report(0, 1)), 2);
    assert_eq!(evaluate_exit_code(&FailOn::AnyError, &report(1, 0)), 2);
    assert_eq!(evaluate_exit_code(&FailOn::AnyError, &report(0, 0)), 0);
}
