//! Fingerprint module tests.

use super::*;
use crate::models::CloudProvider;

fn zone() -> ZoneMetadata {
    ZoneMetadata {
        name: "pippopluto.it".to_string(),
        id: "/hostedzone/Z102849618Q4NTO59GFR4".to_string(),
    }
}

fn cname(name: &str, value: &str) -> RawDnsRecord {
    RawDnsRecord {
        name: name.to_string(),
        record_type: "CNAME".to_string(),
        values: vec![value.to_string()],
    }
}

#[test]
fn test_resolve_target_host_from_url() {
    assert_eq!(
        resolve_target_host("https://test23.eu-south-1.elasticbeanstalk.com"),
        Some("test23.eu-south-1.elasticbeanstalk.com".to_string())
    );
    assert_eq!(
        resolve_target_host("http://Bucket.S3.amazonaws.com/index.html"),
        Some("bucket.s3.amazonaws.com".to_string())
    );
}

#[test]
fn test_resolve_target_host_bare_hostname() {
    assert_eq!(
        resolve_target_host("  MyApp.AzureWebsites.net. "),
        Some("myapp.azurewebsites.net".to_string())
    );
}

#[test]
fn test_resolve_target_host_rejects_malformed() {
    assert_eq!(resolve_target_host(""), None);
    assert_eq!(resolve_target_host("https://"), None);
    assert_eq!(resolve_target_host("not a host"), None);
    assert_eq!(resolve_target_host("host.example.com/path"), None);
    assert_eq!(resolve_target_host("a..b.example.com"), None);
    assert_eq!(resolve_target_host("."), None);
}

#[test]
fn test_collapse_cdn_host() {
    assert_eq!(
        collapse_cdn_host("a.b.cdn-endpoint.azureedge.net"),
        "cdn-endpoint.azureedge.net"
    );
    assert_eq!(
        collapse_cdn_host("sub.cdn-endpoint.azureedge.net"),
        "cdn-endpoint.azureedge.net"
    );
    assert_eq!(
        collapse_cdn_host("cdn-endpoint.azureedge.net"),
        "cdn-endpoint.azureedge.net"
    );
    assert_eq!(collapse_cdn_host("example.com"), "example.com");
}

#[test]
fn test_match_resource_type_first_rule_wins() {
    let rules = suffix_rules(CloudProvider::Aws);
    assert_eq!(
        match_resource_type("images.example.com.s3.us-east-1.amazonaws.com", rules),
        Some(ResourceType::S3Bucket)
    );
    assert_eq!(
        match_resource_type("TEST23.EU-SOUTH-1.ELASTICBEANSTALK.COM", rules),
        Some(ResourceType::ElasticBeanstalk)
    );
    assert_eq!(match_resource_type("example.com", rules), None);

    let ordered = [
        SuffixRule {
            pattern: ".net",
            resource_type: ResourceType::TrafficManager,
        },
        SuffixRule {
            pattern: "azurewebsites.net",
            resource_type: ResourceType::AppService,
        },
    ];
    assert_eq!(
        match_resource_type("app.azurewebsites.net", &ordered),
        Some(ResourceType::TrafficManager)
    );
}

#[test]
fn test_azure_suffixes() {
    let rules = suffix_rules(CloudProvider::Azure);
    assert_eq!(
        match_resource_type("example.azurewebsites.net", rules),
        Some(ResourceType::AppService)
    );
    assert_eq!(
        match_resource_type("test.trafficmanager.net", rules),
        Some(ResourceType::TrafficManager)
    );
    assert_eq!(
        match_resource_type("myapp.azurefd.net", rules),
        Some(ResourceType::FrontDoor)
    );
    assert_eq!(
        match_resource_type("vm.westeurope.cloudapp.azure.com", rules),
        Some(ResourceType::CloudApp)
    );
    assert_eq!(
        match_resource_type("legacy.cloudapp.net", rules),
        Some(ResourceType::CloudService)
    );
    assert_eq!(match_resource_type("example.com", rules), None);
}

#[test]
fn test_fingerprint_s3_record_keyed_by_record_name() {
    let record = cname(
        "Test.PippoPluto.net.",
        "https://test.pippopluto.net.s3.eu-south-1.amazonaws.com",
    );
    let candidate = fingerprint_record(&record, &zone(), AWS_SUFFIX_RULES)
        .expect("S3 alias should be a candidate");
    assert_eq!(candidate.record_name, "test.pippopluto.net");
    assert_eq!(
        candidate.target_host,
        "test.pippopluto.net.s3.eu-south-1.amazonaws.com"
    );
    assert_eq!(candidate.resource_type, ResourceType::S3Bucket);
    assert_eq!(candidate.lookup_key, "test.pippopluto.net");
    assert_eq!(candidate.origin_zone, zone());
}

#[test]
fn test_fingerprint_beanstalk_record_keyed_by_target() {
    let record = cname(
        "test23.pippopluto.net",
        "https://test23.eu-south-1.elasticbeanstalk.com",
    );
    let candidate = fingerprint_record(&record, &zone(), AWS_SUFFIX_RULES)
        .expect("Beanstalk alias should be a candidate");
    assert_eq!(candidate.record_name, "test23.pippopluto.net");
    assert_eq!(candidate.resource_type, ResourceType::ElasticBeanstalk);
    assert_eq!(
        candidate.lookup_key,
        "test23.eu-south-1.elasticbeanstalk.com"
    );
}

#[test]
fn test_fingerprint_cdn_record_collapses_key_only() {
    let record = cname("static.contoso.com", "a.b.cdn-endpoint.azureedge.net.");
    let candidate = fingerprint_record(&record, &zone(), AZURE_SUFFIX_RULES)
        .expect("CDN alias should be a candidate");
    assert_eq!(candidate.resource_type, ResourceType::CdnEndpoint);
    assert_eq!(candidate.target_host, "a.b.cdn-endpoint.azureedge.net");
    assert_eq!(candidate.lookup_key, "cdn-endpoint.azureedge.net");
}

#[test]
fn test_fingerprint_front_door_keyed_by_record_name() {
    let record = cname("www.contoso.com", "contoso-abc123.z01.azurefd.net");
    let candidate = fingerprint_record(&record, &zone(), AZURE_SUFFIX_RULES)
        .expect("Front Door alias should be a candidate");
    assert_eq!(candidate.lookup_key, "www.contoso.com");
}

#[test]
fn test_fingerprint_skips_non_candidates() {
    let a_record = RawDnsRecord {
        name: "a.pippopluto.net".to_string(),
        record_type: "A".to_string(),
        values: vec!["images.example.com.s3.amazonaws.com".to_string()],
    };
    assert!(fingerprint_record(&a_record, &zone(), AWS_SUFFIX_RULES).is_none());

    let unrelated = cname("docs.pippopluto.net", "docs.example.org");
    assert!(fingerprint_record(&unrelated, &zone(), AWS_SUFFIX_RULES).is_none());

    let empty = RawDnsRecord {
        name: "empty.pippopluto.net".to_string(),
        record_type: "CNAME".to_string(),
        values: vec![],
    };
    assert!(fingerprint_record(&empty, &zone(), AWS_SUFFIX_RULES).is_none());

    let malformed = cname("bad.pippopluto.net", "https://");
    assert!(fingerprint_record(&malformed, &zone(), AWS_SUFFIX_RULES).is_none());
}

#[test]
fn test_extract_candidates_skips_bad_records_and_keeps_rest() {
    let records = vec![
        cname("bad.pippopluto.net", "https://"),
        cname(
            "test23.pippopluto.net",
            "https://test23.eu-south-1.elasticbeanstalk.com",
        ),
        cname("docs.pippopluto.net", "docs.example.org"),
        cname(
            "images.example.com",
            "images.example.com.s3.us-east-1.amazonaws.com",
        ),
    ];
    let candidates = extract_candidates(&records, &zone(), AWS_SUFFIX_RULES);
    assert_eq!(candidates.len(), 2);
    assert!(candidates
        .get("test23.eu-south-1.elasticbeanstalk.com")
        .is_some());
    assert!(candidates.get("images.example.com").is_some());
}

#[test]
fn test_extract_candidates_keeps_first_on_key_collision() {
    let records = vec![
        cname("one.pippopluto.net", "shared.eu-south-1.elasticbeanstalk.com"),
        cname("two.pippopluto.net", "shared.eu-south-1.elasticbeanstalk.com"),
    ];
    let candidates = extract_candidates(&records, &zone(), AWS_SUFFIX_RULES);
    assert_eq!(candidates.len(), 1);
    assert_eq!(
        candidates
            .get("shared.eu-south-1.elasticbeanstalk.com")
            .map(|c| c.record_name.as_str()),
        Some("one.pippopluto.net")
    );
}
