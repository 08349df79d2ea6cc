//! Tests for blocklist prefix matching

use std::io::Write;

use gopherd::access::Blocklist;

#[test]
fn test_prefix_blocks_matching_peer() {
    let list: Blocklist = ["10.0.0"].into_iter().collect();

    assert!(list.is_blocked("10.0.0.5:1234"));
    assert!(!list.is_blocked("10.0.1.5:1234"));
}

#[test]
fn test_entry_longer_than_address_does_not_match() {
    let list: Blocklist = ["10.0.0.5:1234567890"].into_iter().collect();

    assert!(!list.is_blocked("10.0.0.5:12"));
    assert!(!list.is_blocked(""));
}

#[test]
fn test_empty_blocklist_never_blocks() {
    let list = Blocklist::default();

    assert!(list.is_empty());
    assert!(!list.is_blocked("127.0.0.1:7000"));
}

#[test]
fn test_matching_is_case_sensitive() {
    let list: Blocklist = ["fe80::A"].into_iter().collect();

    assert!(list.is_blocked("fe80::A1"));
    assert!(!list.is_blocked("fe80::a1"));
}

#[test]
fn test_matching_entry_reports_first_hit() {
    let list: Blocklist = ["192.168", "192.168.1"].into_iter().collect();

    assert_eq!(list.matching_entry("192.168.1.9:70"), Some("192.168"));
    assert_eq!(list.matching_entry("172.16.0.1:70"), None);
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "10.0.0").unwrap();
    writeln!(file).unwrap();
    writeln!(file, "127.0.0.1").unwrap();

    let list = Blocklist::load(file.path()).unwrap();

    assert_eq!(list.len(), 2);
    assert!(list.is_blocked("127.0.0.1:54321"));
}
