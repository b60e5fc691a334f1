//! Core data model for a takeover scan.
//!
//! Everything here is created fresh per scan run and discarded when the run
//! completes; nothing is persisted.

use std::collections::{HashMap, HashSet};
use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Canonical form of a DNS name or lookup key.
///
/// Trims surrounding whitespace, strips trailing dots and lower-cases. Both
/// candidate lookup keys and resource keys go through this, so
/// `"Foo.EXAMPLE.com."` and `"foo.example.com"` compare equal.
pub fn canonical_name(raw: &str) -> String {
    raw.trim().trim_end_matches('.').to_lowercase()
}

/// Cloud provider an organization snapshot belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CloudProvider {
    Aws,
    Azure,
}

impl CloudProvider {
    /// Organization label used in notifications.
    pub fn org_label(&self) -> &'static str {
        match self {
            CloudProvider::Aws => "aws",
            CloudProvider::Azure => "azure",
        }
    }
}

impl fmt::Display for CloudProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.org_label())
    }
}

/// Broad family of cloud services a DNS target can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ServiceFamily {
    ObjectStorage,
    PlatformHosting,
    CdnEdge,
    Compute,
    Networking,
}

/// Which part of a DNS record becomes its lookup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKeySource {
    /// The record's own name; the inventory is indexed by custom domain.
    RecordName,
    /// The alias target host.
    TargetHost,
    /// The alias target host reduced to its last three labels.
    CollapsedTargetHost,
}

/// Cloud services whose endpoints can be claimed again after deletion.
///
/// This is a closed set: every vulnerable suffix maps to exactly one variant,
/// and each variant fixes how its lookup key is derived.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum ResourceType {
    /// AWS S3 website bucket
    S3Bucket,
    /// AWS Elastic Beanstalk environment
    ElasticBeanstalk,
    /// Azure API Management gateway
    ApiManagement,
    /// Azure Container Instances group
    ContainerInstance,
    /// Azure Front Door endpoint
    FrontDoor,
    /// Azure CDN endpoint (classic `azureedge.net`)
    CdnEndpoint,
    /// Azure App Service site or slot
    AppService,
    /// Azure Blob Storage account
    BlobStorage,
    /// Azure public IP DNS label
    CloudApp,
    /// Azure classic cloud service
    CloudService,
    /// Azure Traffic Manager profile
    TrafficManager,
}

impl ResourceType {
    pub fn family(&self) -> ServiceFamily {
        match self {
            ResourceType::S3Bucket | ResourceType::BlobStorage => ServiceFamily::ObjectStorage,
            ResourceType::ElasticBeanstalk
            | ResourceType::AppService
            | ResourceType::ApiManagement => ServiceFamily::PlatformHosting,
            ResourceType::FrontDoor | ResourceType::CdnEndpoint => ServiceFamily::CdnEdge,
            ResourceType::ContainerInstance
            | ResourceType::CloudApp
            | ResourceType::CloudService => ServiceFamily::Compute,
            ResourceType::TrafficManager => ServiceFamily::Networking,
        }
    }

    /// How the lookup key of a candidate of this type is derived.
    ///
    /// S3 website buckets must carry the name of the custom domain they
    /// serve, and front-door inventory lists custom domains, so both are
    /// keyed by the record name. Classic CDN aliases may carry an extra
    /// label that the endpoint inventory does not know about.
    pub fn lookup_key_source(&self) -> LookupKeySource {
        match self {
            ResourceType::S3Bucket | ResourceType::FrontDoor => LookupKeySource::RecordName,
            ResourceType::CdnEndpoint => LookupKeySource::CollapsedTargetHost,
            _ => LookupKeySource::TargetHost,
        }
    }
}

/// Identifying metadata of the DNS zone hosting a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZoneMetadata {
    pub name: String,
    pub id: String,
}

/// A record set as listed by a DNS provider, before any interpretation.
///
/// Missing or `null` fields decode as empty; such records are skipped by the
/// fingerprinter instead of failing the whole listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawDnsRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub record_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub values: Vec<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl RawDnsRecord {
    /// True for CNAME records, the only type considered for takeover.
    pub fn is_alias(&self) -> bool {
        self.record_type.trim().eq_ignore_ascii_case("CNAME")
    }
}

/// A DNS alias pointing at a cloud-managed endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsCandidate {
    pub record_name: String,
    pub target_host: String,
    pub resource_type: ResourceType,
    pub lookup_key: String,
    pub origin_zone: ZoneMetadata,
}

/// Candidates keyed by lookup key, in insertion order.
///
/// When two records resolve to the same key the first one is kept; later
/// ones are rejected by [`CandidateSet::insert`].
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    candidates: Vec<DnsCandidate>,
    index: HashMap<String, usize>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a candidate unless its lookup key is already present.
    ///
    /// Returns `false` when the candidate was rejected as a duplicate.
    pub fn insert(&mut self, candidate: DnsCandidate) -> bool {
        if self.index.contains_key(&candidate.lookup_key) {
            return false;
        }
        self.index
            .insert(candidate.lookup_key.clone(), self.candidates.len());
        self.candidates.push(candidate);
        true
    }

    /// Merges `other` into `self`, keeping existing entries on key collision.
    ///
    /// Returns the number of candidates dropped as duplicates.
    pub fn merge(&mut self, other: CandidateSet) -> usize {
        let mut dropped = 0;
        for candidate in other.candidates {
            if !self.insert(candidate) {
                dropped += 1;
            }
        }
        dropped
    }

    pub fn get(&self, lookup_key: &str) -> Option<&DnsCandidate> {
        self.index.get(lookup_key).map(|&i| &self.candidates[i])
    }

    /// Iterates `(lookup_key, candidate)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DnsCandidate)> {
        self.candidates
            .iter()
            .map(|c| (c.lookup_key.as_str(), c))
    }

    /// Keeps only the candidates matching `keep`.
    pub fn retain<F>(self, mut keep: F) -> Self
    where
        F: FnMut(&DnsCandidate) -> bool,
    {
        self.candidates.into_iter().filter(|c| keep(c)).collect()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

impl FromIterator<DnsCandidate> for CandidateSet {
    fn from_iter<I: IntoIterator<Item = DnsCandidate>>(iter: I) -> Self {
        let mut set = CandidateSet::new();
        for candidate in iter {
            set.insert(candidate);
        }
        set
    }
}

/// Keys of resources that currently exist in one account.
///
/// Only built through [`ResourceKeySetBuilder`], which canonicalizes every
/// key; once built the set is read-only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceKeySet {
    keys: HashSet<String>,
}

impl ResourceKeySet {
    pub fn builder() -> ResourceKeySetBuilder {
        ResourceKeySetBuilder::default()
    }

    /// Membership test on an already canonical key.
    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for ResourceKeySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut builder = ResourceKeySet::builder();
        for key in iter {
            builder.insert(key.as_ref());
        }
        builder.build()
    }
}

/// Append-only accumulator for a [`ResourceKeySet`].
#[derive(Debug, Default)]
pub struct ResourceKeySetBuilder {
    keys: HashSet<String>,
}

impl ResourceKeySetBuilder {
    /// Adds a key; empty keys are ignored.
    pub fn insert(&mut self, raw: &str) {
        let key = canonical_name(raw);
        if !key.is_empty() {
            self.keys.insert(key);
        }
    }

    pub fn build(self) -> ResourceKeySet {
        ResourceKeySet { keys: self.keys }
    }
}

/// A dangling DNS record: its lookup key has no matching resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Finding {
    pub record_name: String,
    pub target_host: String,
    pub resource_type: ResourceType,
    pub origin_zone: ZoneMetadata,
}

impl Finding {
    /// `"<record name> -> <target host>"`
    pub fn summary(&self) -> String {
        format!("{} -> {}", self.record_name, self.target_host)
    }
}

impl From<&DnsCandidate> for Finding {
    fn from(candidate: &DnsCandidate) -> Self {
        Finding {
            record_name: candidate.record_name.clone(),
            target_host: candidate.target_host.clone(),
            resource_type: candidate.resource_type,
            origin_zone: candidate.origin_zone.clone(),
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.record_name, self.target_host)
    }
}

/// An AWS account or Azure subscription belonging to the organization.
///
/// Deserializes both the snapshot's lower-case fields and the AWS
/// Organizations casing (`Id`, `Name`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountRef {
    #[serde(alias = "Id")]
    pub id: String,
    #[serde(alias = "Name", default)]
    pub name: String,
}

impl AccountRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for AccountRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            f.write_str(&self.id)
        } else {
            write!(f, "{} - {}", self.name, self.id)
        }
    }
}
