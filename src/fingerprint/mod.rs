//! DNS record fingerprinting.
//!
//! Decides which alias records point at takeover-prone cloud endpoints and
//! derives the key under which the backing resource is looked up:
//! - `resolve_target_host()` - Host of a record value (bare hostname or URL)
//! - `derive_lookup_key()` - Canonical key per resource type
//! - `extract_candidates()` - Candidate set for one page of a zone's record sets
//!
//! Everything here is pure; malformed records are skipped, never fatal.

mod rules;

use log::debug;

use crate::models::{
    canonical_name, CandidateSet, DnsCandidate, LookupKeySource, RawDnsRecord, ResourceType,
    ZoneMetadata,
};

pub use rules::{
    match_resource_type, suffix_rules, SuffixRule, AWS_SUFFIX_RULES, AZURE_SUFFIX_RULES,
};

/// Number of trailing labels a CDN alias is collapsed to.
const CDN_KEY_LABELS: usize = 3;

/// Extracts the canonical target host from a record value.
///
/// Values containing a scheme (`https://...`) are parsed as URLs and their
/// host is used; anything else must be a bare hostname. Returns `None` for
/// values that are neither.
pub fn resolve_target_host(value: &str) -> Option<String> {
    let value = value.trim();
    let host = if value.contains("://") {
        let parsed = url::Url::parse(value).ok()?;
        parsed.host_str()?.to_string()
    } else {
        if value.contains('/') || value.contains(char::is_whitespace) {
            return None;
        }
        value.to_string()
    };

    let host = canonical_name(&host);
    if host.is_empty() || host.split('.').any(|label| label.is_empty()) {
        return None;
    }
    Some(host)
}

/// Reduces a host to its last three labels when it has four or more.
///
/// ```text
/// a.b.cdn-endpoint.azureedge.net -> cdn-endpoint.azureedge.net
/// cdn-endpoint.azureedge.net     -> cdn-endpoint.azureedge.net
/// ```
pub fn collapse_cdn_host(host: &str) -> String {
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() > CDN_KEY_LABELS {
        labels[labels.len() - CDN_KEY_LABELS..].join(".")
    } else {
        host.to_string()
    }
}

/// Lookup key for a record of `resource_type`.
///
/// Both names must already be canonical.
pub fn derive_lookup_key(
    record_name: &str,
    target_host: &str,
    resource_type: ResourceType,
) -> String {
    match resource_type.lookup_key_source() {
        LookupKeySource::RecordName => record_name.to_string(),
        LookupKeySource::TargetHost => target_host.to_string(),
        LookupKeySource::CollapsedTargetHost => collapse_cdn_host(target_host),
    }
}

/// Turns one record into a candidate, if it is an alias to a vulnerable endpoint.
pub fn fingerprint_record(
    record: &RawDnsRecord,
    zone: &ZoneMetadata,
    rules: &[SuffixRule],
) -> Option<DnsCandidate> {
    if !record.is_alias() {
        return None;
    }

    let record_name = canonical_name(&record.name);
    if record_name.is_empty() {
        debug!("Skipping alias record without a name in zone {}", zone.name);
        return None;
    }

    let Some(value) = record.values.first() else {
        debug!("Skipping alias record {} without a value", record_name);
        return None;
    };

    let Some(target_host) = resolve_target_host(value) else {
        debug!(
            "Skipping alias record {} with malformed target {:?}",
            record_name, value
        );
        return None;
    };

    let resource_type = match_resource_type(&target_host, rules)?;
    let lookup_key = derive_lookup_key(&record_name, &target_host, resource_type);

    Some(DnsCandidate {
        record_name,
        target_host,
        resource_type,
        lookup_key,
        origin_zone: zone.clone(),
    })
}

/// Builds the candidate set for a batch of record sets from one zone.
///
/// When two records share a lookup key the first one wins.
pub fn extract_candidates(
    records: &[RawDnsRecord],
    zone: &ZoneMetadata,
    rules: &[SuffixRule],
) -> CandidateSet {
    let mut candidates = CandidateSet::new();
    for candidate in records
        .iter()
        .filter_map(|record| fingerprint_record(record, zone, rules))
    {
        let key = candidate.lookup_key.clone();
        let name = candidate.record_name.clone();
        if !candidates.insert(candidate) {
            debug!(
                "Ignoring {} in zone {}: lookup key {} already claimed",
                name, zone.name, key
            );
        }
    }
    candidates
}

#[cfg(test)]
mod tests;
