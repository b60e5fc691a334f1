//! Takeover verification.
//!
//! A candidate is dangling when its lookup key is absent from the account's
//! resource key set. The key set must be complete before `verify` runs; a
//! partially listed inventory would turn every unlisted resource into a
//! false finding.

use crate::models::{CandidateSet, Finding, ResourceKeySet};

/// Returns a finding for every candidate whose key is not a known resource.
///
/// Findings follow the candidate set's insertion order. Candidates that map
/// to resources the provider never exposes through its inventory are
/// reported too; there is no way to tell them apart from deleted ones.
pub fn verify(candidates: &CandidateSet, resource_keys: &ResourceKeySet) -> Vec<Finding> {
    candidates
        .iter()
        .filter(|(key, _)| is_dangling(resource_keys, key))
        .map(|(_, candidate)| Finding::from(candidate))
        .collect()
}

/// Whether a single key points at a resource that does not exist.
pub fn is_dangling(resource_keys: &ResourceKeySet, lookup_key: &str) -> bool {
    !resource_keys.contains(lookup_key)
}
