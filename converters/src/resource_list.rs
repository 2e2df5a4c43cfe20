// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Maps of resource names to quantities, e.g. `capacity = { storage = "10Gi" }`

use std::collections::BTreeMap;

use k8s_openapi::apimachinery::pkg::api::resource::Quantity;

use crate::ExpandError;
use crate::quantity::{expand_quantity, flatten_quantity};

pub type ResourceList = BTreeMap<String, Quantity>;

#[must_use]
pub fn flatten_resource_list(list: &ResourceList) -> BTreeMap<String, String> {
    list.iter()
        .map(|(name, quantity)| (name.clone(), flatten_quantity(quantity)))
        .collect()
}

/// Parse every quantity of the map found under `key`. Errors name the offending entry
/// as `<key>.<resource name>`.
pub fn expand_resource_list(
    key: &str,
    map: &BTreeMap<String, String>,
) -> Result<ResourceList, ExpandError> {
    map.iter()
        .map(|(name, raw)| Ok((name.clone(), expand_quantity(&format!("{key}.{name}"), raw)?)))
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    fn map(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_storage_round_trip() {
        let config = map(&[("storage", "10Gi")]);
        let list = expand_resource_list("capacity", &config).unwrap();
        assert_eq!(list["storage"], Quantity("10Gi".to_string()));
        assert_eq!(flatten_resource_list(&list), config);
    }

    #[test]
    fn test_non_canonical_values_are_canonicalized() {
        let list = expand_resource_list("capacity", &map(&[("storage", "1.5Gi")])).unwrap();
        assert_eq!(
            flatten_resource_list(&list),
            map(&[("storage", "1536Mi")])
        );
    }

    #[test]
    fn test_bad_quantity() {
        let err =
            expand_resource_list("capacity", &map(&[("iops", "100"), ("storage", "10 apples")]))
                .unwrap_err();
        assert!(matches!(
            err,
            ExpandError::InvalidValue { ref key, ref value, .. }
                if key == "capacity.storage" && value == "10 apples"
        ));
    }
}
