// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Tests for record types and deletion matching

#[cfg(test)]
mod tests {
    use crate::records::{AdditionRecord, BackendRecord, DeletionKey};
    use crate::types::NameError;

    fn record(index: &str, owner: &str, rtype: &str, rdata: &str) -> BackendRecord {
        BackendRecord {
            index: index.to_string(),
            owner: owner.to_string(),
            ttl: "3600".to_string(),
            class: "IN".to_string(),
            rtype: rtype.to_string(),
            rdata: rdata.to_string(),
        }
    }

    fn zone_records() -> Vec<BackendRecord> {
        vec![
            record("0", "@", "NS", "ns1.example.com."),
            record("1", "@", "MX", "10 mail.example.com."),
            record("2", "www", "A", "192.0.2.80"),
            record("3", "www", "A", "192.0.2.81"),
            record("4", "www", "AAAA", "2001:db8::80"),
            record("5", "mail", "A", "192.0.2.25"),
        ]
    }

    fn selected(key: &DeletionKey, records: &[BackendRecord]) -> Vec<String> {
        key.select(records).map(|r| r.index.clone()).collect()
    }

    #[test]
    fn test_addition_record_rr() {
        let rr = AdditionRecord::new("example.com.", "www", "A", "192.0.2.80").unwrap();
        assert_eq!(rr.zone, "example.com.");
        assert_eq!(rr.to_rr(), "www.example.com. A 192.0.2.80");
    }

    #[test]
    fn test_addition_record_apex() {
        let rr = AdditionRecord::new("example.net.", "@", "mx", "10 mail.example.com.").unwrap();
        assert_eq!(rr.to_rr(), "example.net. mx 10 mail.example.com.");
    }

    #[test]
    fn test_deletion_key_keeps_owner_unqualified() {
        let key = DeletionKey::owner("84.151.10.in-addr.arpa", "244").unwrap();
        assert_eq!(key.zone, "84.151.10.in-addr.arpa.");
        assert_eq!(key.owner, "244");
        assert!(key.rtype.is_empty());
        assert!(key.rdata.is_empty());
    }

    #[test]
    fn test_deletion_key_rejects_empty_owner() {
        assert_eq!(DeletionKey::owner("example.com.", ""), Err(NameError::EmptyOwner));
    }

    #[test]
    fn test_owner_only_key_removes_every_record_of_owner() {
        let key = DeletionKey::owner("example.com.", "www").unwrap();
        assert_eq!(selected(&key, &zone_records()), vec!["2", "3", "4"]);
    }

    #[test]
    fn test_full_key_narrows_by_type_and_data() {
        let key = DeletionKey::new("example.com.", "www", "A", "192.0.2.81").unwrap();
        assert_eq!(selected(&key, &zone_records()), vec!["3"]);
    }

    #[test]
    fn test_apex_key_matches_apex_records() {
        let key = DeletionKey::new("example.com.", "@", "MX", "10 mail.example.com.").unwrap();
        assert_eq!(selected(&key, &zone_records()), vec!["1"]);
    }

    #[test]
    fn test_zone_name_key_matches_apex_records() {
        let key = DeletionKey::owner("example.com.", "example.com.").unwrap();
        assert_eq!(selected(&key, &zone_records()), vec!["0", "1"]);
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let key = DeletionKey::new("example.com.", "www", "a", "192.0.2.80").unwrap();
        assert!(selected(&key, &zone_records()).is_empty());

        let key = DeletionKey::owner("example.com.", "WWW").unwrap();
        assert!(selected(&key, &zone_records()).is_empty());
    }

    #[test]
    fn test_no_partial_owner_match() {
        let key = DeletionKey::owner("example.com.", "ww").unwrap();
        assert!(selected(&key, &zone_records()).is_empty());
    }

    #[test]
    fn test_unmatched_filter_selects_nothing() {
        let key = DeletionKey::new("example.com.", "www", "A", "198.51.100.1").unwrap();
        assert!(selected(&key, &zone_records()).is_empty());
    }

    #[test]
    fn test_selection_equals_predicate_over_all_keys() {
        let records = zone_records();
        let owners = ["@", "www", "mail", "example.com.", "nope"];
        let types = ["", "A", "MX"];
        let datas = ["", "192.0.2.80", "10 mail.example.com."];

        for owner in owners {
            for rtype in types {
                for rdata in datas {
                    let key = DeletionKey::new("example.com.", owner, rtype, rdata).unwrap();
                    let effective = if owner == "@" { "example.com." } else { owner };
                    let expected: Vec<String> = records
                        .iter()
                        .filter(|r| {
                            let r_owner = if r.owner == "@" { "example.com." } else { r.owner.as_str() };
                            r_owner == effective
                                && (rtype.is_empty() || r.rtype == rtype)
                                && (rdata.is_empty() || r.rdata == rdata)
                        })
                        .map(|r| r.index.clone())
                        .collect();
                    assert_eq!(selected(&key, &records), expected, "key {:?}", key);
                }
            }
        }
    }

    #[test]
    fn test_backend_record_describe_resolves_apex() {
        let r = record("1", "@", "MX", "10 mail.example.com.");
        assert_eq!(r.describe("example.com."), "example.com. MX 10 mail.example.com.");
    }
}
