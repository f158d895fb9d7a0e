// Interface eligibility and aggregation tests

use hostmeter::interfaces::InterfaceFilter;
use hostmeter::models::*;

fn counters(bytes_in: u64, bytes_out: u64) -> ByteCounters {
    ByteCounters {
        bytes_in,
        bytes_out,
    }
}

#[test]
fn only_en0_and_bridge0_contribute() {
    let entries = vec![
        InterfaceEntry::link("en0", counters(1_000, 100)),
        InterfaceEntry::link("lo0", counters(50_000, 50_000)),
        InterfaceEntry::link("utun3", counters(70_000, 70_000)),
        InterfaceEntry::link("bridge0", counters(24, 8)),
    ];
    let total = InterfaceFilter::default().aggregate(&entries);
    assert_eq!(total, counters(1_024, 108));
}

#[test]
fn malformed_entries_are_skipped_without_aborting() {
    let entries = vec![
        // No counter payload.
        InterfaceEntry {
            name: "en1".into(),
            family: Some(AddressFamily::Link),
            counters: None,
        },
        // No address.
        InterfaceEntry {
            name: "en2".into(),
            family: None,
            counters: Some(counters(999, 999)),
        },
        // Wrong family: only link-level entries are counted.
        InterfaceEntry {
            name: "en0".into(),
            family: Some(AddressFamily::Inet6),
            counters: Some(counters(999, 999)),
        },
        InterfaceEntry::link("en0", counters(10, 20)),
        InterfaceEntry::link("wlan0", counters(1, 2)),
    ];
    let total = InterfaceFilter::default().aggregate(&entries);
    assert_eq!(total, counters(11, 22));
}

#[test]
fn eligibility_by_name() {
    let filter = InterfaceFilter::default();
    for name in ["en0", "en5", "eno1", "enp3s0", "eth0", "wlan0", "wlp2s0", "bridge100"] {
        assert!(filter.is_eligible(name), "{name} should be eligible");
    }
    for name in ["lo", "lo0", "wlo1", "utun0", "utun3", "awdl0", "llw0", "gif0", ""] {
        assert!(!filter.is_eligible(name), "{name} should be excluded");
    }
}

#[test]
fn onboard_wifi_counts_once_lo_pattern_is_dropped() {
    let filter = InterfaceFilter::new(["en", "wlo"], ["utun"]);
    assert!(filter.is_eligible("wlo1"));
    assert!(!filter.is_eligible("lo"));
    assert!(!filter.is_eligible("utun2"));
}

#[test]
fn custom_filter_from_lists() {
    let filter = InterfaceFilter::new(["ww"], Vec::<String>::new());
    let entries = vec![
        InterfaceEntry::link("wwan0", counters(5, 5)),
        InterfaceEntry::link("en0", counters(7, 7)),
    ];
    assert_eq!(filter.aggregate(&entries), counters(5, 5));
}

#[test]
fn empty_enumeration_sums_to_zero() {
    assert_eq!(
        InterfaceFilter::default().aggregate(&[]),
        ByteCounters::default()
    );
}
