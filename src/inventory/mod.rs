//! Cloud inventory collaborators.
//!
//! This module provides:
//! - Collaborator traits for account enumeration, DNS listings and resource listings
//! - `drain_pages()` - Fully drains a paginated listing
//! - `collect_candidates()` / `collect_resource_keys()` - Per-account collection
//! - Resource inventory normalization into lookup keys
//! - A snapshot-backed implementation of all collaborators
//!
//! Every listing is drained completely or the whole collection fails; callers
//! never see a partially populated inventory.

mod azure;
mod normalize;
mod snapshot;

use std::future::Future;

use log::debug;

use crate::config::MAX_PAGES_PER_LISTING;
use crate::error_handling::InventoryError;
use crate::fingerprint::{extract_candidates, SuffixRule};
use crate::models::{AccountRef, CandidateSet, RawDnsRecord, ResourceKeySet, ZoneMetadata};

// Re-export public API
pub use azure::{resource_group_from_id, CdnProfile};
pub use normalize::{
    build_resource_key_set, EnvironmentDescriptor, EnvironmentStatus, ResourceListing,
};
pub use snapshot::{OrganizationSnapshot, SnapshotInventory};

/// One page of a listing plus the continuation token for the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<String>,
}

impl<T> Page<T> {
    /// A page with no continuation.
    pub fn last(items: Vec<T>) -> Self {
        Self { items, next: None }
    }
}

/// Enumerates the accounts (or subscriptions) of the organization.
pub trait AccountDirectory {
    fn list_accounts(
        &self,
    ) -> impl Future<Output = Result<Vec<AccountRef>, InventoryError>> + Send;
}

/// Paginated DNS listings for one account.
pub trait DnsInventory {
    fn list_zones(
        &self,
        account: &AccountRef,
        page: Option<String>,
    ) -> impl Future<Output = Result<Page<ZoneMetadata>, InventoryError>> + Send;

    fn list_record_sets(
        &self,
        account: &AccountRef,
        zone: &ZoneMetadata,
        page: Option<String>,
    ) -> impl Future<Output = Result<Page<RawDnsRecord>, InventoryError>> + Send;
}

/// Paginated listings of provisioned resources for one account.
pub trait ResourceInventory {
    fn list_buckets(
        &self,
        account: &AccountRef,
        page: Option<String>,
    ) -> impl Future<Output = Result<Page<String>, InventoryError>> + Send;

    fn list_environments(
        &self,
        account: &AccountRef,
        page: Option<String>,
    ) -> impl Future<Output = Result<Page<EnvironmentDescriptor>, InventoryError>> + Send;

    fn list_cdn_profiles(
        &self,
        account: &AccountRef,
        page: Option<String>,
    ) -> impl Future<Output = Result<Page<CdnProfile>, InventoryError>> + Send;

    fn list_custom_domains(
        &self,
        account: &AccountRef,
        profile: &CdnProfile,
        page: Option<String>,
    ) -> impl Future<Output = Result<Page<String>, InventoryError>> + Send;

    fn list_endpoints(
        &self,
        account: &AccountRef,
        page: Option<String>,
    ) -> impl Future<Output = Result<Page<String>, InventoryError>> + Send;
}

/// Follows continuation tokens until a page has none.
///
/// Fails on the first page error, or when `MAX_PAGES_PER_LISTING` pages
/// were fetched without reaching the end.
pub async fn drain_pages<T, F, Fut>(
    listing: &'static str,
    mut fetch: F,
) -> Result<Vec<T>, InventoryError>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>, InventoryError>>,
{
    let mut items = Vec::new();
    let mut token: Option<String> = None;
    for _ in 0..MAX_PAGES_PER_LISTING {
        let page = fetch(token.take()).await?;
        items.extend(page.items);
        match page.next {
            Some(next) if !next.is_empty() => token = Some(next),
            _ => return Ok(items),
        }
    }
    Err(InventoryError::RunawayPagination {
        listing,
        pages: MAX_PAGES_PER_LISTING,
    })
}

/// Lists every zone of the account and fingerprints its alias records.
///
/// Lookup-key collisions across records or zones keep the first candidate.
pub async fn collect_candidates<D>(
    dns: &D,
    account: &AccountRef,
    rules: &[SuffixRule],
) -> Result<CandidateSet, InventoryError>
where
    D: DnsInventory,
{
    let zones = drain_pages("DNS zones", |page| dns.list_zones(account, page)).await?;
    debug!("Account {}: {} DNS zones", account.id, zones.len());

    let mut candidates = CandidateSet::new();
    for zone in &zones {
        let records =
            drain_pages("DNS record sets", |page| dns.list_record_sets(account, zone, page)).await?;
        let dropped = candidates.merge(extract_candidates(&records, zone, rules));
        if dropped > 0 {
            debug!(
                "Zone {}: {} candidates shared a lookup key with an earlier record",
                zone.name, dropped
            );
        }
    }
    Ok(candidates)
}

/// Lists every resource family of the account and normalizes the result.
///
/// Front-door custom domains take two levels of pagination: profiles, then
/// the custom domains of each profile.
pub async fn collect_resource_listings<R>(
    resources: &R,
    account: &AccountRef,
) -> Result<Vec<ResourceListing>, InventoryError>
where
    R: ResourceInventory,
{
    let mut listings = Vec::new();

    let buckets = drain_pages("buckets", |page| resources.list_buckets(account, page)).await?;
    listings.extend(buckets.into_iter().map(ResourceListing::Bucket));

    let environments =
        drain_pages("environments", |page| resources.list_environments(account, page)).await?;
    listings.extend(environments.into_iter().map(ResourceListing::Environment));

    let endpoints = drain_pages("endpoints", |page| resources.list_endpoints(account, page)).await?;
    listings.extend(endpoints.into_iter().map(ResourceListing::Endpoint));

    let profiles =
        drain_pages("CDN profiles", |page| resources.list_cdn_profiles(account, page)).await?;
    for profile in &profiles {
        let domains = drain_pages("custom domains", |page| {
            resources.list_custom_domains(account, profile, page)
        })
        .await?;
        listings.extend(domains.into_iter().map(ResourceListing::CustomDomain));
    }

    Ok(listings)
}

/// Complete resource key set of one account.
pub async fn collect_resource_keys<R>(
    resources: &R,
    account: &AccountRef,
) -> Result<ResourceKeySet, InventoryError>
where
    R: ResourceInventory,
{
    let listings = collect_resource_listings(resources, account).await?;
    let keys = build_resource_key_set(&listings);
    debug!(
        "Account {}: {} resource listings, {} distinct keys",
        account.id,
        listings.len(),
        keys.len()
    );
    Ok(keys)
}
