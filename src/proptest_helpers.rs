use hickory_proto::rr::Name;
use proptest::prelude::*;
use std::str::FromStr;

pub fn arb_dns_label() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::char::range('a', 'z'), 1..=63)
        .prop_map(|chars| chars.into_iter().collect::<String>())
        .prop_filter("Label cannot be empty", |s| !s.is_empty())
}

pub fn arb_dns_name() -> impl Strategy<Value = Name> {
    prop::collection::vec(arb_dns_label(), 1..=4)
        .prop_filter("DNS name must be <= 253 chars total", |labels| {
            let fqdn = format!("{}.", labels.join("."));
            fqdn.len() <= 253
        })
        .prop_map(|labels| {
            let fqdn = format!("{}.", labels.join("."));
            Name::from_str(&fqdn).unwrap()
        })
}

pub fn arb_ttl() -> impl Strategy<Value = u32> {
    prop_oneof![
        Just(60u32),
        Just(300u32),
        Just(3600u32),
        Just(86400u32),
        0u32..=2147483647u32,
    ]
}

/// Short RDATA values, biased towards shared prefixes and trailing zeros so
/// that canonical ordering edge cases come up often.
pub fn arb_rdata() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        prop::collection::vec(any::<u8>(), 0..=8),
        prop::collection::vec(prop_oneof![Just(0u8), Just(1u8)], 0..=4),
    ]
}

/// At least two RDATA values, duplicates allowed.
pub fn arb_rdata_list() -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(arb_rdata(), 2..=8)
}

pub fn arb_public_key(len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), len)
}

pub fn arb_dnskey_flags() -> impl Strategy<Value = (bool, bool)> {
    (any::<bool>(), any::<bool>())
}
