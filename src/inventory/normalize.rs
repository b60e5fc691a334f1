//! Resource inventory normalization.
//!
//! Maps provider listings onto the lookup-key space used by the fingerprint
//! module, so that verification is a plain set-membership test.

use serde::Deserialize;

use crate::models::ResourceKeySet;

/// Lifecycle state of a platform-hosting environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum EnvironmentStatus {
    Aborting,
    Launching,
    LinkingFrom,
    LinkingTo,
    Updating,
    Ready,
    Terminating,
    Terminated,
    #[serde(other)]
    Unknown,
}

/// A platform-hosting environment as listed by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EnvironmentDescriptor {
    #[serde(default)]
    pub cname: Option<String>,
    pub status: EnvironmentStatus,
}

/// One provisioned resource, as produced by an inventory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceListing {
    /// Object-storage bucket or container, by name
    Bucket(String),
    /// Platform-hosting environment
    Environment(EnvironmentDescriptor),
    /// Custom domain attached to a front-door/CDN profile
    CustomDomain(String),
    /// Managed endpoint hostname (web app, CDN endpoint, public IP label, ...)
    Endpoint(String),
}

impl ResourceListing {
    /// The raw key this listing contributes, if any.
    ///
    /// Terminated environments and environments without a CNAME contribute
    /// nothing: their name can be claimed by anyone.
    pub fn resource_key(&self) -> Option<&str> {
        match self {
            ResourceListing::Bucket(name) => Some(name),
            ResourceListing::Environment(env) => match (&env.cname, env.status) {
                (_, EnvironmentStatus::Terminated) => None,
                (Some(cname), _) => Some(cname),
                (None, _) => None,
            },
            ResourceListing::CustomDomain(host) | ResourceListing::Endpoint(host) => Some(host),
        }
    }
}

/// Builds the set of keys for resources that currently exist.
///
/// Keys are canonicalized the same way as candidate lookup keys.
pub fn build_resource_key_set(listings: &[ResourceListing]) -> ResourceKeySet {
    let mut builder = ResourceKeySet::builder();
    for key in listings.iter().filter_map(ResourceListing::resource_key) {
        builder.insert(key);
    }
    builder.build()
}
