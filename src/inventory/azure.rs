//! Azure resource identifier helpers.

use crate::error_handling::{InventoryError, ResourceIdError};

const RESOURCE_GROUPS_KEY: &str = "resourceGroups";

/// Extracts the resource group from an ARM resource ID.
///
/// `/subscriptions/123/resourceGroups/rg1/providers/...` yields `rg1`. The
/// `resourceGroups` segment is matched case-insensitively.
pub fn resource_group_from_id(resource_id: &str) -> Result<&str, ResourceIdError> {
    let mut segments = resource_id.split('/');
    while let Some(segment) = segments.next() {
        if segment.eq_ignore_ascii_case(RESOURCE_GROUPS_KEY) {
            return match segments.next() {
                Some(group) if !group.is_empty() => Ok(group),
                _ => Err(ResourceIdError::MissingResourceGroup),
            };
        }
    }
    Err(ResourceIdError::MissingResourceGroupsKey)
}

/// A front-door/CDN profile, addressable by name within its resource group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CdnProfile {
    pub name: String,
    pub resource_group: String,
}

impl CdnProfile {
    /// Builds a profile from its name and ARM resource ID.
    pub fn from_resource_id(name: &str, resource_id: &str) -> Result<Self, InventoryError> {
        let resource_group =
            resource_group_from_id(resource_id).map_err(|source| InventoryError::InvalidResourceId {
                id: resource_id.to_string(),
                source,
            })?;
        Ok(Self {
            name: name.to_string(),
            resource_group: resource_group.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_group_from_id() {
        assert_eq!(
            resource_group_from_id("/subscriptions/123/resourceGroups/myResourceGroup/resources/456"),
            Ok("myResourceGroup")
        );
        assert_eq!(
            resource_group_from_id("/subscriptions/123/resourceGroups/myResourceGroup"),
            Ok("myResourceGroup")
        );
        assert_eq!(
            resource_group_from_id("/subscriptions/123/RESOURCEGROUPS/rg-upper/providers/x"),
            Ok("rg-upper")
        );
    }

    #[test]
    fn test_resource_group_from_id_errors() {
        assert_eq!(
            resource_group_from_id(""),
            Err(ResourceIdError::MissingResourceGroupsKey)
        );
        assert_eq!(
            resource_group_from_id("/subscriptions/123/resourceGroup/myResourceGroup/resources/456"),
            Err(ResourceIdError::MissingResourceGroupsKey)
        );
        assert_eq!(
            resource_group_from_id("/subscriptions/123/resourceGroups"),
            Err(ResourceIdError::MissingResourceGroup)
        );
        assert_eq!(
            resource_group_from_id("invalid-id"),
            Err(ResourceIdError::MissingResourceGroupsKey)
        );
    }

    #[test]
    fn test_cdn_profile_from_resource_id() {
        let profile = CdnProfile::from_resource_id(
            "profile1",
            "/subscriptions/sub1/resourceGroups/rg1/providers/Microsoft.Cdn/profiles/profile1",
        )
        .expect("valid resource ID");
        assert_eq!(
            profile,
            CdnProfile {
                name: "profile1".to_string(),
                resource_group: "rg1".to_string()
            }
        );

        let err = CdnProfile::from_resource_id("profile1", "invalid-resource-id")
            .expect_err("invalid resource ID");
        assert!(err
            .to_string()
            .contains("resource group key not found in resource ID"));
    }
}
