//! Snapshot-backed inventory.
//!
//! Serves an exported organization inventory through the collaborator
//! traits, one page at a time. The envelope (provider, account list) is
//! strictly typed. Each account's inventory is decoded on its own, so a
//! malformed account fails only that account's scan.
//!
//! A resource listing the provider exports but the snapshot omits is a
//! listing failure, never an empty listing: an absent bucket list would
//! otherwise turn every bucket alias into a finding.

use std::collections::HashMap;

use log::{debug, warn};
use serde::Deserialize;
use tokio_retry::RetryIf;

use super::{
    AccountDirectory, CdnProfile, DnsInventory, EnvironmentDescriptor, Page, ResourceInventory,
};
use crate::error_handling::{get_retry_strategy, InventoryError};
use crate::models::{AccountRef, CloudProvider, RawDnsRecord, ZoneMetadata};

/// Top-level layout of an organization snapshot file.
#[derive(Debug, Clone, Deserialize)]
pub struct OrganizationSnapshot {
    pub provider: CloudProvider,
    pub accounts: Vec<AccountSnapshot>,
}

/// One account (or subscription) entry of a snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountSnapshot {
    #[serde(alias = "Id")]
    pub id: String,
    #[serde(alias = "Name", default)]
    pub name: String,
    /// Set when the exporter could not reach the account
    #[serde(default)]
    pub unavailable: Option<String>,
    /// Raw inventory; decoded per account
    #[serde(default)]
    pub inventory: serde_json::Value,
}

#[derive(Debug, Default, Deserialize)]
struct AccountInventory {
    #[serde(default)]
    zones: Vec<ZoneSnapshot>,
    buckets: Option<Vec<String>>,
    environments: Option<Vec<EnvironmentDescriptor>>,
    cdn_profiles: Option<Vec<ProfileSnapshot>>,
    endpoints: Option<Vec<String>>,
}

/// Whether `provider`'s exporter writes the `listing` resource family.
fn exports_listing(provider: CloudProvider, listing: &str) -> bool {
    match provider {
        CloudProvider::Aws => matches!(listing, "buckets" | "environments"),
        CloudProvider::Azure => matches!(listing, "CDN profiles" | "endpoints"),
    }
}

#[derive(Debug, Deserialize)]
struct ZoneSnapshot {
    id: String,
    name: String,
    #[serde(default)]
    records: Vec<RawDnsRecord>,
}

#[derive(Debug, Deserialize)]
struct ProfileSnapshot {
    id: String,
    name: String,
    #[serde(default)]
    custom_domains: Vec<String>,
}

enum AccountState {
    Ready(AccountInventory),
    Malformed(String),
    Unavailable(String),
}

/// Inventory collaborators backed by an [`OrganizationSnapshot`].
pub struct SnapshotInventory {
    provider: CloudProvider,
    accounts: Vec<AccountRef>,
    states: HashMap<String, AccountState>,
    page_size: usize,
}

impl SnapshotInventory {
    /// Builds the inventory, serving listings in pages of `page_size` items.
    pub fn new(snapshot: OrganizationSnapshot, page_size: usize) -> Self {
        let mut accounts = Vec::with_capacity(snapshot.accounts.len());
        let mut states = HashMap::with_capacity(snapshot.accounts.len());
        for entry in snapshot.accounts {
            let state = match entry.unavailable {
                Some(reason) => AccountState::Unavailable(reason),
                None if entry.inventory.is_null() => {
                    AccountState::Ready(AccountInventory::default())
                }
                None => match serde_json::from_value::<AccountInventory>(entry.inventory) {
                    Ok(inventory) => AccountState::Ready(inventory),
                    Err(e) => {
                        debug!("Account {} has a malformed inventory: {}", entry.id, e);
                        AccountState::Malformed(e.to_string())
                    }
                },
            };
            if states.insert(entry.id.clone(), state).is_some() {
                warn!(
                    "Account {} appears more than once in the snapshot; keeping the last entry",
                    entry.id
                );
            } else {
                accounts.push(AccountRef::new(entry.id, entry.name));
            }
        }
        Self {
            provider: snapshot.provider,
            accounts,
            states,
            page_size: page_size.max(1),
        }
    }

    /// Parses a snapshot document.
    pub fn from_json(json: &str, page_size: usize) -> Result<Self, InventoryError> {
        let snapshot: OrganizationSnapshot =
            serde_json::from_str(json).map_err(|e| InventoryError::SnapshotLoad {
                location: "<inline>".to_string(),
                message: e.to_string(),
            })?;
        Ok(Self::new(snapshot, page_size))
    }

    /// Loads a snapshot from a local path or an `http(s)` URL.
    ///
    /// Remote snapshots are fetched with retries on transient failures.
    pub async fn load(
        location: &str,
        client: &reqwest::Client,
        page_size: usize,
    ) -> Result<Self, InventoryError> {
        let load_error = |message: String| InventoryError::SnapshotLoad {
            location: location.to_string(),
            message,
        };

        let body = if location.starts_with("http://") || location.starts_with("https://") {
            RetryIf::start(
                get_retry_strategy(),
                || fetch_remote(client, location),
                |e: &reqwest::Error| {
                    e.is_timeout()
                        || e.is_connect()
                        || e.status().is_some_and(|s| s.is_server_error())
                },
            )
            .await
            .map_err(|e| load_error(e.to_string()))?
        } else {
            tokio::fs::read_to_string(location)
                .await
                .map_err(|e| load_error(e.to_string()))?
        };

        let snapshot: OrganizationSnapshot =
            serde_json::from_str(&body).map_err(|e| load_error(e.to_string()))?;
        Ok(Self::new(snapshot, page_size))
    }

    /// Provider declared by the snapshot.
    pub fn provider(&self) -> CloudProvider {
        self.provider
    }

    fn inventory(&self, account: &AccountRef) -> Result<&AccountInventory, InventoryError> {
        match self.states.get(&account.id) {
            Some(AccountState::Ready(inventory)) => Ok(inventory),
            Some(AccountState::Unavailable(reason)) => Err(InventoryError::Unavailable {
                account: account.id.clone(),
                reason: reason.clone(),
            }),
            Some(AccountState::Malformed(message)) => Err(InventoryError::Decode {
                account: account.id.clone(),
                message: message.clone(),
            }),
            None => Err(InventoryError::UnknownAccount(account.id.clone())),
        }
    }

    /// The items of a resource listing, or a listing error when the provider
    /// exports it but this account's entry has none.
    fn listing<'a, T>(
        &self,
        listing: &'static str,
        items: Option<&'a Vec<T>>,
    ) -> Result<&'a [T], InventoryError> {
        match items {
            Some(items) => Ok(items.as_slice()),
            None if exports_listing(self.provider, listing) => Err(InventoryError::Listing {
                listing,
                message: "listing missing from the snapshot".to_string(),
            }),
            None => Ok(Default::default()),
        }
    }

    /// Slices `items` into the page addressed by `token`.
    fn page<T: Clone>(
        &self,
        items: &[T],
        token: Option<String>,
    ) -> Result<Page<T>, InventoryError> {
        let start = match token {
            None => 0,
            Some(t) => t
                .parse::<usize>()
                .ok()
                .filter(|&offset| offset <= items.len())
                .ok_or(InventoryError::InvalidPageToken(t))?,
        };
        let end = (start + self.page_size).min(items.len());
        let next = (end < items.len()).then(|| end.to_string());
        Ok(Page {
            items: items[start..end].to_vec(),
            next,
        })
    }
}

async fn fetch_remote(client: &reqwest::Client, url: &str) -> Result<String, reqwest::Error> {
    client.get(url).send().await?.error_for_status()?.text().await
}

impl AccountDirectory for SnapshotInventory {
    async fn list_accounts(&self) -> Result<Vec<AccountRef>, InventoryError> {
        Ok(self.accounts.clone())
    }
}

impl DnsInventory for SnapshotInventory {
    async fn list_zones(
        &self,
        account: &AccountRef,
        page: Option<String>,
    ) -> Result<Page<ZoneMetadata>, InventoryError> {
        let zones: Vec<ZoneMetadata> = self
            .inventory(account)?
            .zones
            .iter()
            .map(|z| ZoneMetadata {
                name: z.name.clone(),
                id: z.id.clone(),
            })
            .collect();
        self.page(&zones, page)
    }

    async fn list_record_sets(
        &self,
        account: &AccountRef,
        zone: &ZoneMetadata,
        page: Option<String>,
    ) -> Result<Page<RawDnsRecord>, InventoryError> {
        let records = self
            .inventory(account)?
            .zones
            .iter()
            .find(|z| z.id == zone.id)
            .map(|z| z.records.as_slice())
            .ok_or_else(|| InventoryError::Listing {
                listing: "DNS record sets",
                message: format!("zone {} not found", zone.id),
            })?;
        self.page(records, page)
    }
}

impl ResourceInventory for SnapshotInventory {
    async fn list_buckets(
        &self,
        account: &AccountRef,
        page: Option<String>,
    ) -> Result<Page<String>, InventoryError> {
        let inventory = self.inventory(account)?;
        self.page(self.listing("buckets", inventory.buckets.as_ref())?, page)
    }

    async fn list_environments(
        &self,
        account: &AccountRef,
        page: Option<String>,
    ) -> Result<Page<EnvironmentDescriptor>, InventoryError> {
        let inventory = self.inventory(account)?;
        self.page(
            self.listing("environments", inventory.environments.as_ref())?,
            page,
        )
    }

    async fn list_cdn_profiles(
        &self,
        account: &AccountRef,
        page: Option<String>,
    ) -> Result<Page<CdnProfile>, InventoryError> {
        let inventory = self.inventory(account)?;
        let profiles = self
            .listing("CDN profiles", inventory.cdn_profiles.as_ref())?
            .iter()
            .map(|p| CdnProfile::from_resource_id(&p.name, &p.id))
            .collect::<Result<Vec<_>, _>>()?;
        self.page(&profiles, page)
    }

    async fn list_custom_domains(
        &self,
        account: &AccountRef,
        profile: &CdnProfile,
        page: Option<String>,
    ) -> Result<Page<String>, InventoryError> {
        let inventory = self.inventory(account)?;
        let domains = self
            .listing("CDN profiles", inventory.cdn_profiles.as_ref())?
            .iter()
            .find(|p| {
                p.name == profile.name
                    && super::resource_group_from_id(&p.id)
                        .is_ok_and(|rg| rg.eq_ignore_ascii_case(&profile.resource_group))
            })
            .map(|p| p.custom_domains.as_slice())
            .ok_or_else(|| InventoryError::Listing {
                listing: "custom domains",
                message: format!(
                    "profile {} in resource group {} not found",
                    profile.name, profile.resource_group
                ),
            })?;
        self.page(domains, page)
    }

    async fn list_endpoints(
        &self,
        account: &AccountRef,
        page: Option<String>,
    ) -> Result<Page<String>, InventoryError> {
        let inventory = self.inventory(account)?;
        self.page(self.listing("endpoints", inventory.endpoints.as_ref())?, page)
    }
}
