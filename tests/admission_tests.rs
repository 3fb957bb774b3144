//! Network admission integration tests
//!
//! Covers membership against IPv4/IPv6 allow-lists, the empty-list rule,
//! fail-closed parsing, and concurrent use of a shared gate.

use rstest::rstest;
use scopegate::admission::{Admission, AdmissionGate, NetworkAllowList, admit};
use std::sync::Arc;
use std::thread;

fn list(entries: &[&str]) -> NetworkAllowList {
    NetworkAllowList::new(entries).unwrap()
}

// =============================================================================
// Membership
// =============================================================================

#[rstest]
#[case("10.0.0.5", &["10.0.0.0/24"], true)]
#[case("10.1.0.5", &["10.0.0.0/24"], false)]
#[case("not-an-ip", &["10.0.0.0/24"], false)]
#[case("10.0.0.255", &["10.0.0.0/24"], true)]
#[case("10.0.1.0", &["10.0.0.0/24"], false)]
#[case("172.16.4.4", &["10.0.0.0/8", "172.16.0.0/12"], true)]
#[case("172.32.0.1", &["10.0.0.0/8", "172.16.0.0/12"], false)]
#[case("192.168.1.20", &["192.168.1.20"], true)]
#[case("192.168.1.21", &["192.168.1.20"], false)]
#[case("2001:db8::42", &["2001:db8::/64"], true)]
#[case("2001:db8:0:1::42", &["2001:db8::/64"], false)]
#[case("::ffff:10.0.0.5", &["10.0.0.0/24"], true)]
#[case("::1", &["127.0.0.0/8"], false)]
#[case("127.0.0.1", &["::1"], false)]
#[case("10.0.0.5:8000", &["10.0.0.0/24"], true)]
#[case("[2001:db8::1]:8000", &["2001:db8::/32"], true)]
fn test_admit(#[case] address: &str, #[case] entries: &[&str], #[case] expected: bool) {
    assert_eq!(admit(address, &list(entries)), expected);

    let gate = AdmissionGate::new(list(entries));
    assert_eq!(gate.admit(address), expected);
}

#[rstest]
#[case("10.0.0.5")]
#[case("8.8.8.8")]
#[case("::1")]
#[case("fe80::1")]
#[case("203.0.113.7:443")]
fn test_empty_allow_list_admits_everything(#[case] address: &str) {
    assert!(admit(address, &NetworkAllowList::allow_all()));
    assert_eq!(AdmissionGate::allow_all().decide(address), Admission::Allow);
}

#[rstest]
#[case("")]
#[case("   ")]
#[case("10.0.0")]
#[case("10.0.0.256")]
#[case("localhost")]
#[case("10.0.0.5:notaport")]
fn test_malformed_addresses_fail_closed(#[case] address: &str) {
    let gate = AdmissionGate::new(list(&["0.0.0.0/0", "::/0"]));
    assert_eq!(gate.decide(address), Admission::Deny);
    assert!(gate.require(address).is_err());
}

#[test]
fn test_entry_order_does_not_matter() {
    let forward = list(&["10.0.0.0/8", "10.1.0.0/16", "192.168.0.0/16"]);
    let reverse = list(&["192.168.0.0/16", "10.1.0.0/16", "10.0.0.0/8"]);

    for address in ["10.1.2.3", "10.200.0.1", "192.168.9.9", "172.16.0.1"] {
        assert_eq!(
            admit(address, &forward),
            admit(address, &reverse),
            "order changed decision for {}",
            address
        );
    }
}

#[test]
fn test_require_reports_address() {
    let gate = AdmissionGate::new(list(&["10.0.0.0/24"]));
    let err = gate.require("10.1.0.5").unwrap_err();
    assert_eq!(err.address, "10.1.0.5");
    assert!(err.to_string().contains("10.1.0.5"));
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn test_gate_is_shareable_across_threads() {
    let gate = Arc::new(AdmissionGate::new(list(&["10.0.0.0/24"])));

    let handles: Vec<_> = (0..8u8)
        .map(|i| {
            let gate = Arc::clone(&gate);
            thread::spawn(move || {
                let inside = format!("10.0.0.{}", i);
                let outside = format!("10.0.1.{}", i);
                (gate.admit(&inside), gate.admit(&outside))
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), (true, false));
    }
}
