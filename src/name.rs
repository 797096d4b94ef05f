//! Domain name helpers on top of hickory's `Name`.

use hickory_proto::rr::Name;

/// Lower-cased, fully-qualified form of `name`.
pub fn normalize(name: &Name) -> Name {
    let mut normalized = name.to_lowercase();
    normalized.set_fqdn(true);
    normalized
}

/// Uncompressed wire form of `name` in canonical (lower-case) spelling,
/// as used in signed data and DS digests (RFC 4034 section 6.2).
pub fn to_canonical_wire(name: &Name) -> Vec<u8> {
    let mut wire = Vec::with_capacity(name.len() + 1);
    for label in name.iter() {
        wire.push(label.len() as u8);
        wire.extend(label.iter().map(u8::to_ascii_lowercase));
    }
    wire.push(0);
    wire
}

/// Number of labels in `name`, excluding the root and a leading `*`.
pub fn count_labels(name: &Name) -> u8 {
    name.num_labels()
}

/// Every zone on the delegation path to `name`, root first and `name` last.
pub fn zones_in_chain(name: &Name) -> Vec<Name> {
    let name = normalize(name);
    let label_count = name.iter().count();
    (0..=label_count)
        .map(|labels| {
            if labels == 0 {
                Name::root()
            } else {
                normalize(&name.trim_to(labels))
            }
        })
        .collect()
}

/// Name of the owner as it stood before wildcard expansion, given the label
/// count recorded in its RRSIG.
pub fn wildcard_owner(name: &Name, labels: u8) -> Name {
    let name = normalize(name);
    if labels >= count_labels(&name) {
        return name;
    }
    let suffix = name.trim_to(usize::from(labels));
    let star: &[u8] = b"*";
    let mut owner_labels = vec![star];
    owner_labels.extend(suffix.iter());
    match Name::from_labels(owner_labels) {
        Ok(owner) => normalize(&owner),
        Err(_) => name,
    }
}
