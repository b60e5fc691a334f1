//! End-of-run statistics.

use log::info;
use strum::IntoEnumIterator;

use crate::error_handling::{ScanError, ScanErrorKind};
use crate::models::{Finding, ResourceType};

/// Number of failed accounts per error kind, in `ScanErrorKind` order.
///
/// Kinds without failures are left out.
pub fn count_errors_by_kind(errors: &[ScanError]) -> Vec<(ScanErrorKind, usize)> {
    ScanErrorKind::iter()
        .map(|kind| (kind, errors.iter().filter(|e| e.kind == kind).count()))
        .filter(|(_, count)| *count > 0)
        .collect()
}

/// Number of findings per resource type, in `ResourceType` order.
pub fn count_findings_by_type(findings: &[Finding]) -> Vec<(ResourceType, usize)> {
    ResourceType::iter()
        .map(|ty| (ty, findings.iter().filter(|f| f.resource_type == ty).count()))
        .filter(|(_, count)| *count > 0)
        .collect()
}

/// Prints failed-account counts grouped by error kind.
pub fn print_error_statistics(errors: &[ScanError]) {
    if errors.is_empty() {
        return;
    }
    info!("Failed accounts ({} total):", errors.len());
    for (kind, count) in count_errors_by_kind(errors) {
        info!("   {}: {}", kind.as_str(), count);
    }
}

/// Prints finding counts grouped by resource type.
pub fn print_finding_statistics(findings: &[Finding]) {
    if findings.is_empty() {
        return;
    }
    info!("Dangling records ({} total):", findings.len());
    for (resource_type, count) in count_findings_by_type(findings) {
        info!("   {}: {}", resource_type, count);
    }
}

/// Prints a one-line summary of the run.
pub fn print_simple_summary(accounts: usize, findings: usize, failed: usize, elapsed_seconds: f64) {
    info!(
        "Scanned {} account{} ({} failed), {} dangling record{} in {:.1}s",
        accounts,
        if accounts == 1 { "" } else { "s" },
        failed,
        findings,
        if findings == 1 { "" } else { "s" },
        elapsed_seconds
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountRef, ZoneMetadata};

    fn error(id: &str, kind: ScanErrorKind) -> ScanError {
        ScanError::new(AccountRef::new(id, ""), kind, "boom")
    }

    fn finding(resource_type: ResourceType) -> Finding {
        Finding {
            record_name: "a.example.com".to_string(),
            target_host: "a.example.net".to_string(),
            resource_type,
            origin_zone: ZoneMetadata {
                name: "example.com".to_string(),
                id: "Z1".to_string(),
            },
        }
    }

    #[test]
    fn test_count_errors_by_kind() {
        let errors = vec![
            error("3", ScanErrorKind::Timeout),
            error("1", ScanErrorKind::Credentials),
            error("2", ScanErrorKind::Timeout),
        ];
        assert_eq!(
            count_errors_by_kind(&errors),
            vec![(ScanErrorKind::Credentials, 1), (ScanErrorKind::Timeout, 2)]
        );
        assert!(count_errors_by_kind(&[]).is_empty());
    }

    #[test]
    fn test_count_findings_by_type() {
        let findings = vec![
            finding(ResourceType::CdnEndpoint),
            finding(ResourceType::S3Bucket),
            finding(ResourceType::CdnEndpoint),
        ];
        assert_eq!(
            count_findings_by_type(&findings),
            vec![(ResourceType::S3Bucket, 1), (ResourceType::CdnEndpoint, 2)]
        );
    }

    #[test]
    fn test_printing_does_not_panic() {
        print_error_statistics(&[]);
        print_error_statistics(&[error("1", ScanErrorKind::Decode)]);
        print_finding_statistics(&[finding(ResourceType::FrontDoor)]);
        print_simple_summary(1, 1, 0, 0.25);
    }
}
