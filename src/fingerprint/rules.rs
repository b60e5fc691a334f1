//! Vulnerable endpoint suffixes per provider.
//!
//! Rules are evaluated in order and the first match wins, so a more specific
//! pattern must come before any pattern it contains.

use crate::models::{CloudProvider, ResourceType};

/// Substring identifying a takeover-prone cloud endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuffixRule {
    pub pattern: &'static str,
    pub resource_type: ResourceType,
}

const fn rule(pattern: &'static str, resource_type: ResourceType) -> SuffixRule {
    SuffixRule {
        pattern,
        resource_type,
    }
}

pub const AWS_SUFFIX_RULES: &[SuffixRule] = &[
    rule(".s3.", ResourceType::S3Bucket),
    rule(".elasticbeanstalk.", ResourceType::ElasticBeanstalk),
];

pub const AZURE_SUFFIX_RULES: &[SuffixRule] = &[
    rule("azure-api.net", ResourceType::ApiManagement),
    rule("azurecontainer.io", ResourceType::ContainerInstance),
    rule("azurefd.net", ResourceType::FrontDoor),
    rule("azureedge.net", ResourceType::CdnEndpoint),
    rule("azurewebsites.net", ResourceType::AppService),
    rule("blob.core.windows.net", ResourceType::BlobStorage),
    rule("cloudapp.azure.com", ResourceType::CloudApp),
    rule("cloudapp.net", ResourceType::CloudService),
    rule("trafficmanager.net", ResourceType::TrafficManager),
];

/// Rule table for a provider.
pub fn suffix_rules(provider: CloudProvider) -> &'static [SuffixRule] {
    match provider {
        CloudProvider::Aws => AWS_SUFFIX_RULES,
        CloudProvider::Azure => AZURE_SUFFIX_RULES,
    }
}

/// Resource type of the first rule whose pattern occurs in `host`.
///
/// Matching is case-insensitive substring containment.
pub fn match_resource_type(host: &str, rules: &[SuffixRule]) -> Option<ResourceType> {
    let host = host.to_lowercase();
    rules
        .iter()
        .find(|r| host.contains(r.pattern))
        .map(|r| r.resource_type)
}
